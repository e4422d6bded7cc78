//! Per-operation deadline shared by the timed store decorators

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::DomainError;

/// Await `fut` for at most `timeout`; an elapsed deadline is a persistence failure
pub(crate) async fn bounded<T, F>(
    store: &'static str,
    operation: &'static str,
    timeout: Duration,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = timeout.as_millis() as u64;
            warn!(store, operation, timeout_ms, "Store operation timed out");
            Err(DomainError::persistence(format!(
                "{} store {} timed out after {}ms",
                store, operation, timeout_ms
            )))
        }
    }
}
