//! Spawning async work that can be abandoned and cannot take its owner down.
//!
//! - `spawn_task`: runs a future on tokio, dropping it as soon as the token is cancelled
//! - `run_isolated`: runs a future in its own task so a panic comes back as a `JoinError`

use std::future::Future;

use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

/// Spawns `fut` on the current tokio runtime, dropping it unfinished once
/// `token` is cancelled.
///
/// # Panics
/// Panics if called outside a tokio runtime.
pub fn spawn_task<F>(token: CancellationToken, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(guarded(token, fut));
}

async fn guarded<F>(token: CancellationToken, fut: F)
where
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => {}
        () = fut => {}
    }
}

/// Runs `fut` as a separate tokio task and waits for it.
///
/// A panic inside `fut` is returned as `Err` instead of unwinding through the
/// caller. Dropping the returned future aborts the inner task.
pub async fn run_isolated<F>(fut: F) -> Result<F::Output, JoinError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    AbortOnDropHandle::new(tokio::spawn(fut)).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn spawned_task_runs_to_completion() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        let (tx, rx) = flume::bounded::<()>(1);

        spawn_task(CancellationToken::new(), async move {
            flag.store(true, Ordering::SeqCst);
            let _ = tx.send(());
        });

        rx.recv_async().await.expect("task should signal completion");
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_finishes() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        let token = CancellationToken::new();

        spawn_task(token.clone(), async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            flag.store(true, Ordering::SeqCst);
        });

        token.cancel();
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert!(!done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn isolated_future_returns_its_output() {
        let output = run_isolated(async { 21 * 2 }).await;
        assert_eq!(output.expect("future should not panic"), 42);
    }

    #[tokio::test]
    async fn isolated_panic_becomes_join_error() {
        async fn explode() -> u32 {
            panic!("checker blew up")
        }

        let output = run_isolated(explode()).await;

        let err = output.expect_err("panic should surface as an error");
        assert!(err.is_panic());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_outer_task_aborts_isolated_future() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        let token = CancellationToken::new();

        spawn_task(token.clone(), async move {
            let _ = run_isolated(async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                flag.store(true, Ordering::SeqCst);
            })
            .await;
        });

        tokio::task::yield_now().await;
        token.cancel();
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert!(!done.load(Ordering::SeqCst));
    }
}
