//! Scoped ownership of a render session
//!
//! A browser left running after the process exits is a leak the operating
//! system will not clean up, so the session is quit on every exit path: normal
//! completion, error, panic, and Ctrl-C.

use crate::render::RenderSession;
use crate::HarvestError;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Runs `body` with the session, then quits the session
///
/// A panic inside `body` is re-raised after the session has been closed.
/// Ctrl-C abandons `body` and returns [`HarvestError::Interrupted`].
pub async fn run_scoped<S, F, Fut, T>(session: S, body: F) -> Result<T, HarvestError>
where
    S: RenderSession + 'static,
    F: FnOnce(Arc<S>) -> Fut,
    Fut: Future<Output = Result<T, HarvestError>>,
{
    let session = Arc::new(session);

    let outcome = tokio::select! {
        result = AssertUnwindSafe(body(Arc::clone(&session))).catch_unwind() => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    match session.quit().await {
        Ok(()) => tracing::debug!("Browser session closed"),
        Err(e) => tracing::warn!("Failed to close browser session: {}", e),
    }

    match outcome {
        Some(Ok(result)) => result,
        Some(Err(panic)) => std::panic::resume_unwind(panic),
        None => {
            tracing::warn!("Interrupted; browser session closed");
            Err(HarvestError::Interrupted)
        }
    }
}
