use std::future::Future;

use tokio::task::JoinHandle;

/// Spawn a background task under a readable name.
///
/// With `tokio_unstable` the name is attached to the task itself (visible in
/// tokio-console); otherwise the future runs inside a `task` tracing span so log
/// lines emitted from it carry the name.
pub fn spawn_named_task<F, S>(name: S, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
    S: Into<String>,
{
    let task_name = name.into();
    #[cfg(tokio_unstable)]
    {
        tokio::task::Builder::new()
            .name(&task_name)
            .spawn(future)
            .expect("failed to spawn task")
    }
    #[cfg(not(tokio_unstable))]
    {
        use tracing::Instrument;
        let span = tracing::info_span!("task", task_name = %task_name);
        tokio::spawn(future.instrument(span))
    }
}
