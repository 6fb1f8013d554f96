pub mod auth;
pub mod todos;

use crate::error::HubError;

/// Runs a store-backed call on the blocking pool. Store mutations write the
/// snapshot file while holding the store lock, which must stay off the async
/// worker threads.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, HubError>
where
    F: FnOnce() -> Result<T, HubError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
