mod error;
mod functions;
mod traits;
mod types;

pub use error::{AuthFailure, AuthFailureReason, DirectoryError};
pub use functions::{can_edit, extract_bearer_token, permits, PRIVILEGED_GROUPS};
pub use traits::{GroupDirectory, TokenVerifier};
pub use types::Claims;
