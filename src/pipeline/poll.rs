use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{DemoError, Result};
use crate::pipeline::traits::{Probe, ProbeOutcome};

/// Re-runs a probe every `interval` until it settles or `deadline` elapses.
#[derive(Clone, Copy, Debug)]
pub struct DeadlinePoller {
    pub interval: Duration,
    pub deadline: Duration,
}

impl DeadlinePoller {
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    pub async fn run<P: Probe>(&self, probe: &mut P) -> Result<P::Output> {
        let started = Instant::now();
        let deadline = started + self.deadline;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match probe.probe().await {
                ProbeOutcome::Ready(value) => {
                    debug!(what = %probe.describe(), attempts, "probe ready");
                    return Ok(value);
                }
                ProbeOutcome::Failed(err) => {
                    debug!(what = %probe.describe(), attempts, kind = err.kind(), "probe failed");
                    return Err(err);
                }
                ProbeOutcome::NotYet => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(DemoError::DeadlineElapsed {
                    what: probe.describe(),
                    waited: now - started,
                    attempts,
                });
            }
            sleep(self.interval.min(deadline - now)).await;
        }
    }
}
