pub mod resource_service;
pub mod validation;

pub use resource_service::{parse_id, ResourceService, ServiceError};
pub use validation::{ValidationError, Validator};
