// handlers/public/mod.rs - endpoints that never require a token

pub mod health;
pub mod login;

pub use health::health;
pub use login::login;
