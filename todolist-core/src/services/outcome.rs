//! Conversion of internal failures into operation results

use crate::domain::result::{Error, OperationResult};
use crate::i18n::{Locale, Message};

/// Why an operation did not produce a value
#[derive(Debug)]
pub(crate) enum Failure {
    /// Expected rejection; its message is shown to the user
    Rejected(Message),
    /// Anything else; only logged, the user sees the operation's fallback
    Internal(Error),
}

impl From<Error> for Failure {
    fn from(e: Error) -> Self {
        Failure::Internal(e)
    }
}

/// Turn an internal result into the public result-or-error pair
pub(crate) fn finish<T>(
    operation: &str,
    locale: Locale,
    result: Result<T, Failure>,
    fallback: Message,
) -> OperationResult<T> {
    match result {
        Ok(value) => OperationResult::ok(value),
        Err(Failure::Rejected(message)) => {
            tracing::info!(operation, reason = ?message, "operation rejected");
            OperationResult::fail(message.text(locale))
        }
        Err(Failure::Internal(e)) => {
            tracing::error!(operation, error = %e, "operation failed");
            OperationResult::fail(fallback.text(locale))
        }
    }
}
