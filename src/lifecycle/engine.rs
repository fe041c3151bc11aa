//! Lifecycle state machine and controller.
//!
//! [`LifecycleMachine`] holds the only mutable lifecycle state: the current
//! phase and the two one-shot guards. It knows nothing about presentation.
//! [`LifecycleController`] feeds it clock readings and turns the resulting
//! [`Tick`]s into view updates, notifications and analytics.

use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use crate::notify::{Analytics, Notifier, ToastKind, track};
use crate::observability::{Event, metrics};

use super::countdown::CountdownFields;
use super::phase::{self, EventPhase};
use super::presentation::{LifecycleView, PhasePresentation, UPCOMING_LABEL};
use super::window::EventWindow;

/// Outcome of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Phase after this tick.
    pub phase: EventPhase,
    /// Countdown to display; only present while upcoming.
    pub countdown: Option<CountdownFields>,
    /// Phase whose one-shot effects fire on this tick, if any.
    pub entered: Option<EventPhase>,
}

impl Tick {
    /// Whether the scheduler should stop ticking.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Point-in-time view of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventState {
    pub is_live: bool,
    pub is_finished: bool,
    /// Negative once the event has started.
    pub until_start: TimeDelta,
    /// Negative once the event has ended.
    pub until_end: TimeDelta,
}

/// Phase tracking with one-shot transition guards.
#[derive(Debug, Clone)]
pub struct LifecycleMachine {
    window: EventWindow,
    phase: EventPhase,
    live_announced: bool,
    finished_announced: bool,
}

impl LifecycleMachine {
    #[must_use]
    pub const fn new(window: EventWindow) -> Self {
        Self {
            window,
            phase: EventPhase::Upcoming,
            live_announced: false,
            finished_announced: false,
        }
    }

    #[must_use]
    pub const fn window(&self) -> &EventWindow {
        &self.window
    }

    #[must_use]
    pub const fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Advances to `now`.
    ///
    /// Entering a phase reports it in [`Tick::entered`] exactly once; the
    /// guards are latched, not re-derived, so later ticks in the same phase
    /// report nothing. When the first observation is already past a phase
    /// boundary, only the phase actually reached is reported.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        let next = phase::next(self.phase, now, &self.window);

        let entered = match next {
            EventPhase::Live if !self.live_announced => {
                self.live_announced = true;
                Some(EventPhase::Live)
            }
            EventPhase::Finished if !self.finished_announced => {
                self.live_announced = true;
                self.finished_announced = true;
                Some(EventPhase::Finished)
            }
            _ => None,
        };

        if next != self.phase {
            debug!(from = %self.phase, to = %next, "lifecycle phase changed");
        }
        self.phase = next;

        let countdown = (next == EventPhase::Upcoming).then(|| {
            let remaining = self.window.start() - now.fixed_offset();
            CountdownFields::from_millis(remaining.num_milliseconds())
        });

        Tick {
            phase: next,
            countdown,
            entered,
        }
    }

    /// Snapshot relative to `now`, without advancing the machine.
    #[must_use]
    pub fn state(&self, now: DateTime<Utc>) -> EventState {
        let now = now.fixed_offset();
        EventState {
            is_live: self.live_announced,
            is_finished: self.finished_announced,
            until_start: self.window.start() - now,
            until_end: self.window.end() - now,
        }
    }
}

/// Applies ticks to a view and fires the per-transition side effects.
pub struct LifecycleController<V> {
    machine: LifecycleMachine,
    view: V,
    notifier: Arc<dyn Notifier>,
    analytics: Analytics,
}

impl<V: LifecycleView> LifecycleController<V> {
    #[must_use]
    pub fn new(
        window: EventWindow,
        view: V,
        notifier: Arc<dyn Notifier>,
        analytics: Analytics,
    ) -> Self {
        Self {
            machine: LifecycleMachine::new(window),
            view,
            notifier,
            analytics,
        }
    }

    #[must_use]
    pub const fn machine(&self) -> &LifecycleMachine {
        &self.machine
    }

    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Consumes the controller, returning the view.
    pub fn into_view(self) -> V {
        self.view
    }

    /// Handles one clock reading.
    ///
    /// Returns `Break` once the lifecycle is terminal; the scheduler must
    /// not call again after that (calling again is harmless, though).
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> ControlFlow<Tick, Tick> {
        let tick = self.machine.tick(now);

        if let Some(fields) = &tick.countdown {
            self.view.render_countdown(fields, UPCOMING_LABEL);
        }

        if let Some(phase) = tick.entered {
            self.enter(phase, now);
        }

        if tick.is_terminal() {
            ControlFlow::Break(tick)
        } else {
            ControlFlow::Continue(tick)
        }
    }

    fn enter(&mut self, phase: EventPhase, now: DateTime<Utc>) {
        info!(phase = %phase, "event phase entered");

        let presentation = PhasePresentation::for_phase(phase);
        self.view.apply_phase(&presentation);

        if let Some(message) = presentation.toast {
            self.notifier.notify(message, ToastKind::Success);
        }

        metrics::record_phase_transition(phase);
        track(&self.analytics, || Event::PhaseEntered {
            timestamp: now,
            phase,
        });
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for LifecycleController<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("machine", &self.machine)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::CountdownPanel;
    use crate::notify::RecordingNotifier;

    fn window() -> EventWindow {
        EventWindow::parse("2025-12-14T12:00:00+11:00", "2025-12-15T12:00:00+11:00").unwrap()
    }

    fn start() -> DateTime<Utc> {
        window().start().with_timezone(&Utc)
    }

    fn end() -> DateTime<Utc> {
        window().end().with_timezone(&Utc)
    }

    fn controller() -> (LifecycleController<CountdownPanel>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = LifecycleController::new(
            window(),
            CountdownPanel::new("https://example.com/register"),
            notifier.clone(),
            None,
        );
        (controller, notifier)
    }

    #[test]
    fn upcoming_ticks_render_exact_countdown() {
        let mut machine = LifecycleMachine::new(window());
        let now = start() - TimeDelta::days(2) - TimeDelta::hours(3) - TimeDelta::seconds(4);

        let tick = machine.tick(now);
        assert_eq!(tick.phase, EventPhase::Upcoming);
        assert_eq!(tick.entered, None);
        assert_eq!(
            tick.countdown,
            Some(CountdownFields {
                days: 2,
                hours: 3,
                minutes: 0,
                seconds: 4,
            })
        );
    }

    #[test]
    fn live_fires_once_and_stops_countdown() {
        let mut machine = LifecycleMachine::new(window());
        machine.tick(start() - TimeDelta::seconds(1));

        let first = machine.tick(start());
        assert_eq!(first.entered, Some(EventPhase::Live));
        assert_eq!(first.countdown, None);

        for s in 1..10 {
            let later = machine.tick(start() + TimeDelta::seconds(s));
            assert_eq!(later.phase, EventPhase::Live);
            assert_eq!(later.entered, None);
            assert_eq!(later.countdown, None);
        }
    }

    #[test]
    fn finished_fires_once_even_when_called_repeatedly() {
        let mut machine = LifecycleMachine::new(window());
        machine.tick(start());

        let first = machine.tick(end());
        assert_eq!(first.entered, Some(EventPhase::Finished));
        assert!(first.is_terminal());

        for _ in 0..5 {
            let again = machine.tick(end() + TimeDelta::hours(1));
            assert_eq!(again.entered, None);
            assert!(again.is_terminal());
        }
    }

    #[test]
    fn first_observation_after_end_reports_only_finished() {
        let mut machine = LifecycleMachine::new(window());
        let tick = machine.tick(end() + TimeDelta::days(1));
        assert_eq!(tick.entered, Some(EventPhase::Finished));
        assert_eq!(machine.tick(end() + TimeDelta::days(2)).entered, None);

        let state = machine.state(end() + TimeDelta::days(2));
        assert!(state.is_live);
        assert!(state.is_finished);
        assert!(state.until_end < TimeDelta::zero());
    }

    #[test]
    fn clock_stepping_back_does_not_reverse() {
        let mut machine = LifecycleMachine::new(window());
        machine.tick(start() + TimeDelta::minutes(5));
        let tick = machine.tick(start() - TimeDelta::minutes(5));
        assert_eq!(tick.phase, EventPhase::Live);
        assert_eq!(tick.countdown, None);
    }

    #[test]
    fn state_before_start() {
        let machine = LifecycleMachine::new(window());
        let state = machine.state(start() - TimeDelta::hours(1));
        assert!(!state.is_live);
        assert!(!state.is_finished);
        assert_eq!(state.until_start, TimeDelta::hours(1));
        assert_eq!(state.until_end, TimeDelta::hours(25));
    }

    #[test]
    fn controller_drives_view_and_notifies_once() {
        let (mut controller, notifier) = controller();

        assert!(controller.on_tick(start() - TimeDelta::seconds(61)).is_continue());
        assert_eq!(controller.view().fields, ["00", "00", "01", "01"]);

        assert!(controller.on_tick(start()).is_continue());
        assert!(controller.on_tick(start() + TimeDelta::seconds(1)).is_continue());
        assert_eq!(controller.view().label, "Event is live!");
        assert_eq!(controller.view().primary_cta, "Join now");
        assert_eq!(controller.view().primary_href, "#register");
        assert_eq!(controller.view().countdown_updates, 1);

        let toasts = notifier.messages();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].0, "The CTF is now live! Join the competition.");

        assert!(controller.on_tick(end()).is_break());
        assert!(controller.on_tick(end() + TimeDelta::seconds(1)).is_break());

        let panel = controller.into_view();
        assert_eq!(panel.applied, vec![EventPhase::Live, EventPhase::Finished]);
        assert_eq!(panel.label, "Thanks for participating!");
        assert_eq!(panel.primary_cta, "View Results");
        assert_eq!(notifier.messages().len(), 1);
    }
}
