// Panic isolation for inference calls
use std::any::Any;
use std::future::Future;
use tracing::error;

use crate::error::{AppError, Result};

/// Run a future on its own tokio task with panic isolation
///
/// If the future panics, the panic is caught and returned as
/// `AppError::AdapterPanicked`, so a misbehaving model cannot take the
/// server down with it.
///
/// # Example
/// ```text
/// let result = execute_guarded(async { panic!("bad weights") }).await;
/// assert!(matches!(result, Err(AppError::AdapterPanicked(_))));
/// ```
pub async fn execute_guarded<F, T>(future: F) -> Result<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(future).await {
        Ok(value) => Ok(value),
        Err(join_err) if join_err.is_panic() => {
            let panic_msg = panic_message(join_err.into_panic());
            error!(panic_msg = %panic_msg, "Inference task panicked");
            Err(AppError::AdapterPanicked(panic_msg))
        }
        Err(join_err) => Err(AppError::Internal(format!(
            "Inference task cancelled: {}",
            join_err
        ))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
