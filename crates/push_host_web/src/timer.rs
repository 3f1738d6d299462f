//! `setTimeout`-backed host timer.

use std::time::Duration;

use push_host::{HostTimer, TimerFuture};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Host timer scheduling wakeups on the window's timer queue.
pub struct WebHostTimer;

impl HostTimer for WebHostTimer {
    fn sleep<'a>(&'a self, duration: Duration) -> TimerFuture<'a, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        Box::pin(bridge::sleep_ms(millis))
    }
}
