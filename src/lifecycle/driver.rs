//! 1 Hz scheduler for the lifecycle controller.

use std::ops::ControlFlow;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::engine::LifecycleController;
use super::presentation::LifecycleView;

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Wall-clock source consulted once per tick.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Why the countdown loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The event finished; no further ticks are scheduled.
    Finished,
    /// The component was torn down.
    Cancelled,
}

/// Ticks `controller` immediately and then every second until the event
/// finishes or `cancel` fires.
///
/// `after_tick` runs after every tick that was handed to the controller,
/// which is where a terminal front end redraws.
pub async fn run_countdown<V, F>(
    controller: &mut LifecycleController<V>,
    clock: &dyn Clock,
    cancel: CancellationToken,
    mut after_tick: F,
) -> StopReason
where
    V: LifecycleView,
    F: FnMut(&LifecycleController<V>),
{
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("countdown cancelled");
                return StopReason::Cancelled;
            }
            _ = interval.tick() => {
                let flow = controller.on_tick(clock.now());
                after_tick(controller);
                if let ControlFlow::Break(_) = flow {
                    debug!("countdown reached terminal phase");
                    return StopReason::Finished;
                }
            }
        }
    }
}
