use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Period between two countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick emitted by a [`Countdown`], tagged with the generation it was armed with so
/// ticks queued by a cancelled countdown can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    /// Generation of the countdown that emitted the tick.
    pub generation: u64,
}

/// Background ticker armed for a single question.
///
/// Dropping the countdown cancels it; the background task exits on its next poll.
#[derive(Debug)]
pub struct Countdown {
    generation: u64,
    token: CancellationToken,
}

impl Countdown {
    /// Spawn a ticker sending one [`CountdownTick`] every `period`, the first one a
    /// full period after arming. Cancelling `parent` cancels the ticker too.
    pub fn arm(
        generation: u64,
        period: Duration,
        parent: &CancellationToken,
        ticks: mpsc::UnboundedSender<CountdownTick>,
    ) -> Self {
        let token = parent.child_token();
        let task_token = token.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        if ticks.send(CountdownTick { generation }).is_err() {
                            break;
                        }
                    }
                }
            }
            trace!(generation, "countdown stopped");
        });

        Self { generation, token }
    }

    /// Generation this countdown was armed with.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
