//! Bounded waits on backing stores.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;
use crate::result::AppResult;

/// Await a store call, failing with a transient
/// [`ServiceUnavailable`](crate::error::ErrorKind::ServiceUnavailable) error
/// once `limit` elapses. Dropping the inner future cancels the call.
pub async fn within<T, F>(limit: Duration, operation: &'static str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Store call timed out"
            );
            Err(AppError::service_unavailable(format!(
                "{operation} timed out"
            )))
        }
    }
}
