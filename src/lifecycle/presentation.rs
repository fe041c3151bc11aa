//! What each phase looks like.
//!
//! The lifecycle machine decides *when* things change; this module decides
//! *what* they change to. A [`LifecycleView`] is anything that can show a
//! countdown and swap to a phase's presentation: the headless
//! [`CountdownPanel`] used by tests and the CLI, or a real page.

use super::countdown::CountdownFields;
use super::phase::EventPhase;

pub const UPCOMING_LABEL: &str = "Event starts in:";
pub const LIVE_LABEL: &str = "Event is live!";
pub const FINISHED_LABEL: &str = "Thanks for participating!";

pub const LIVE_TOAST: &str = "The CTF is now live! Join the competition.";

const LIVE_MARKUP: &str = concat!(
    r#"<div class="live-indicator">"#,
    r#"<span class="live-dot"></span>"#,
    r#"<span class="live-text">LIVE NOW</span>"#,
    "</div>",
);

const FINISHED_MARKUP: &str = concat!(
    r#"<div class="finished-indicator">"#,
    r#"<span class="finished-text">Event Finished</span>"#,
    "</div>",
);

/// Everything that changes on the page when a phase is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePresentation {
    pub phase: EventPhase,
    /// Text above the timer.
    pub label: &'static str,
    /// Markup replacing the timer digits, if any.
    pub indicator_html: Option<&'static str>,
    /// Plain-text form of the indicator.
    pub indicator_text: Option<&'static str>,
    /// New text of the primary call-to-action.
    pub primary_cta: &'static str,
    /// New target of the primary call-to-action, if it changes.
    pub primary_href: Option<&'static str>,
    /// New text of the secondary call-to-action.
    pub secondary_cta: &'static str,
    /// Transient message to show on entry.
    pub toast: Option<&'static str>,
}

impl PhasePresentation {
    #[must_use]
    pub const fn for_phase(phase: EventPhase) -> Self {
        match phase {
            EventPhase::Upcoming => Self {
                phase,
                label: UPCOMING_LABEL,
                indicator_html: None,
                indicator_text: None,
                primary_cta: "Register free",
                primary_href: None,
                secondary_cta: "Join Discord",
                toast: None,
            },
            EventPhase::Live => Self {
                phase,
                label: LIVE_LABEL,
                indicator_html: Some(LIVE_MARKUP),
                indicator_text: Some("LIVE NOW"),
                primary_cta: "Join now",
                primary_href: Some("#register"),
                secondary_cta: "Join Discord",
                toast: Some(LIVE_TOAST),
            },
            EventPhase::Finished => Self {
                phase,
                label: FINISHED_LABEL,
                indicator_html: Some(FINISHED_MARKUP),
                indicator_text: Some("Event Finished"),
                primary_cta: "View Results",
                primary_href: None,
                secondary_cta: "Join Discord",
                toast: None,
            },
        }
    }
}

/// A surface the lifecycle can draw on.
pub trait LifecycleView {
    /// Shows the countdown to the event start.
    fn render_countdown(&mut self, fields: &CountdownFields, label: &str);

    /// Swaps to the presentation of a newly entered phase.
    fn apply_phase(&mut self, presentation: &PhasePresentation);
}

/// Headless model of the countdown section of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownPanel {
    pub label: String,
    /// Days, hours, minutes, seconds as displayed.
    pub fields: [String; 4],
    /// Set once a phase indicator replaces the digits.
    pub indicator_html: Option<String>,
    pub primary_cta: String,
    pub primary_href: String,
    pub secondary_cta: String,
    /// Number of countdown renders so far.
    pub countdown_updates: u64,
    /// Phases applied so far, in order.
    pub applied: Vec<EventPhase>,
}

impl CountdownPanel {
    /// A panel in its initial markup state, with the primary CTA pointing
    /// at `primary_href`.
    #[must_use]
    pub fn new(primary_href: impl Into<String>) -> Self {
        let initial = PhasePresentation::for_phase(EventPhase::Upcoming);
        Self {
            label: initial.label.to_string(),
            fields: std::array::from_fn(|_| "00".to_string()),
            indicator_html: None,
            primary_cta: initial.primary_cta.to_string(),
            primary_href: primary_href.into(),
            secondary_cta: initial.secondary_cta.to_string(),
            countdown_updates: 0,
            applied: Vec::new(),
        }
    }
}

impl LifecycleView for CountdownPanel {
    fn render_countdown(&mut self, fields: &CountdownFields, label: &str) {
        self.fields = fields.padded();
        label.clone_into(&mut self.label);
        self.countdown_updates += 1;
    }

    fn apply_phase(&mut self, presentation: &PhasePresentation) {
        self.label = presentation.label.to_string();
        self.indicator_html = presentation.indicator_html.map(str::to_string);
        self.primary_cta = presentation.primary_cta.to_string();
        if let Some(href) = presentation.primary_href {
            self.primary_href = href.to_string();
        }
        self.secondary_cta = presentation.secondary_cta.to_string();
        self.applied.push(presentation.phase);
    }
}
