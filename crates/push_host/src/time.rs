//! Time helpers and the host timer contract used for readiness timeouts.

use std::{future::Future, pin::Pin, time::Duration};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Object-safe boxed future used by [`HostTimer`].
pub type TimerFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host timer used to bound suspension points.
pub trait HostTimer {
    /// Resolves once `duration` has elapsed.
    fn sleep<'a>(&'a self, duration: Duration) -> TimerFuture<'a, ()>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Timer that never fires, for hosts without a timer source.
pub struct NoopHostTimer;

impl HostTimer for NoopHostTimer {
    fn sleep<'a>(&'a self, _duration: Duration) -> TimerFuture<'a, ()> {
        Box::pin(futures::future::pending::<()>())
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Timer that fires immediately regardless of the requested duration.
pub struct ImmediateTimer;

impl HostTimer for ImmediateTimer {
    fn sleep<'a>(&'a self, _duration: Duration) -> TimerFuture<'a, ()> {
        Box::pin(futures::future::ready(()))
    }
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
