// handlers/mod.rs - two security tiers
//
// Public (no auth): token acquisition and liveness.
// Protected: everything routed through `jwt_auth_middleware`. Which resource
// families land here is decided by `AuthScope` when the router is built.
pub mod protected;
pub mod public;
