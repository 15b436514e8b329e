//! Slow-roll delay strategies.
//!
//! The handler never sleeps directly; it asks a [`Delay`] to pause. Production
//! wiring uses [`TokioSleep`], which suspends only the current request's task.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the calling request for a duration.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[async_trait]
impl Delay for TokioSleep {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn pause(&self, _duration: Duration) {}
}
