// Utility modules for the PawTag backend

pub mod profile_errors;
pub mod service_error;
pub mod validation;

pub use profile_errors::{ProfileError, ProfileErrorResponse};
pub use service_error::ServiceError;
pub use validation::validate_profile_id;
