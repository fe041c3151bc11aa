//! Event lifecycle
//!
//! Derives the event's phase from its configured window and the current
//! time, and drives the countdown display and the one-shot notifications
//! that accompany each phase change.
//!
//! # Architecture
//!
//! - [`EventWindow`]: validated `start < end` pair, with a placeholder fallback
//! - [`EventPhase`] and [`phase::next`]: pure, monotonic transition function
//! - [`CountdownFields`]: day/hour/minute/second decomposition of a delay
//! - [`LifecycleMachine`]: per-tick state with one-shot transition guards
//! - [`LifecycleController`]: applies ticks to a [`LifecycleView`] and fires effects
//! - [`driver`]: 1 Hz scheduler with cancellation

pub mod countdown;
pub mod driver;
pub mod engine;
pub mod phase;
pub mod presentation;
pub mod window;

pub use countdown::CountdownFields;
pub use driver::{Clock, StopReason, SystemClock, run_countdown};
pub use engine::{EventState, LifecycleController, LifecycleMachine, Tick};
pub use phase::EventPhase;
pub use presentation::{CountdownPanel, LifecycleView, PhasePresentation};
pub use window::EventWindow;
