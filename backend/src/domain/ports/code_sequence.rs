//! Driven port issuing business codes from a durable sequence.

use async_trait::async_trait;

use crate::domain::{BusinessCode, CodeKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by code sequence adapters.
    pub enum CodeSequenceError {
        /// Storage could not be reached.
        Connection { message: String } =>
            "code sequence connection failed: {message}",
        /// The increment failed.
        Query { message: String } =>
            "code sequence query failed: {message}",
    }
}

/// Source of collision-free sequential codes.
///
/// Values survive restarts and are never reissued, even when the entity that
/// consumed them is never stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeSequence: Send + Sync {
    /// Draw the next code for `kind`.
    async fn next_code(&self, kind: CodeKind) -> Result<BusinessCode, CodeSequenceError>;
}
