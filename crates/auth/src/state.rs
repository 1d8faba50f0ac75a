use std::sync::Arc;

use inventory_core::auth::TokenVerifier;

/// Shared state for the authentication extractor.
#[derive(Clone)]
pub struct AuthState {
    verifier: Arc<dyn TokenVerifier>,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.verifier.as_ref()
    }
}
