use std::future::Future;
use std::time::Instant;

/// Awaits `future`, logging when `operation` starts and how long it took.
pub async fn timed<F, T>(operation: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    tracing::info!("{} started", operation);
    let started = Instant::now();
    let output = future.await;
    tracing::info!(
        "{} completed in {:.4} seconds",
        operation,
        started.elapsed().as_secs_f64()
    );
    output
}
