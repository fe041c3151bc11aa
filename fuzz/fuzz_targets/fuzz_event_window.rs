#![no_main]

use chrono::{DateTime, Utc};
use flagpole::lifecycle::{EventPhase, EventWindow, LifecycleMachine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str, i64)| {
    let (start, end, offset_secs) = data;
    let Ok(window) = EventWindow::parse(start, end) else {
        return;
    };
    assert!(window.start() < window.end());

    let Some(now) = DateTime::<Utc>::from_timestamp(offset_secs % 4_000_000_000, 0) else {
        return;
    };
    let mut machine = LifecycleMachine::new(window);
    let tick = machine.tick(now);
    assert_eq!(tick.phase, EventPhase::at(&window, now));
    assert_eq!(tick.countdown.is_some(), tick.phase == EventPhase::Upcoming);
});
