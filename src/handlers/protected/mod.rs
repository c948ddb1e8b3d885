// handlers/protected/mod.rs - handlers that may sit behind token verification
//
// `whoami` is always protected. The resource handlers are shared by every
// resource family; the router decides per family whether they are gated.

pub mod resource;
pub mod whoami;

pub use whoami::whoami;
