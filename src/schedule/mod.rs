//! Periodic scheduling
//!
//! The watch loop is driven by an injected [`Trigger`]; the pipeline never
//! references scheduling and stays a plain callable, so the same job runs
//! identically on demand or on an interval.

use anyhow::Result;
use std::time::Duration;

pub trait Trigger {
    /// Block until the next run is due. Returning `false` ends the loop.
    fn wait_next(&mut self) -> bool;
}

/// Fixed-interval trigger that never stops on its own.
pub struct Interval {
    period: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Interval { period }
    }

    pub fn from_days(days: f64) -> Self {
        Interval::new(Duration::from_secs_f64(days * 86_400.0))
    }
}

impl Trigger for Interval {
    fn wait_next(&mut self) -> bool {
        std::thread::sleep(self.period);
        true
    }
}

/// Run `job` immediately, then once per trigger firing. A failing run is
/// logged and the loop keeps going; a stuck scrape or API outage should not
/// take the schedule down with it.
pub fn run_on<T, F>(trigger: &mut T, mut job: F) -> Result<()>
where
    T: Trigger,
    F: FnMut() -> Result<()>,
{
    loop {
        if let Err(err) = job() {
            tracing::error!("scheduled run failed: {err:#}");
        }
        if !trigger.wait_next() {
            return Ok(());
        }
    }
}
