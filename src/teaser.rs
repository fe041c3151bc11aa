//! Teaser challenge widget.
//!
//! A single fixed question. The first correct answer is remembered in
//! storage for the whole profile and locks the widget; a wrong answer shows
//! an error that clears itself after [`ERROR_DISPLAY_SECS`].

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::notify::{Analytics, Notifier, ToastKind, track};
use crate::observability::{Event, metrics};
use crate::page::{PageLocation, params, query_pair};
use crate::storage::{Storage, keys};

/// How long the "not quite right" panel stays up.
pub const ERROR_DISPLAY_SECS: i64 = 3;

pub const SOLVED_TOAST: &str = "Challenge solved! Great work!";

pub const SHARE_TITLE: &str = "ACUCyS Christmas CTF 2025";

/// A fixed-answer puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub question: &'static str,
    pub answer: &'static str,
    /// Also accepted. Exhaustive; there is no partial matching.
    pub alternatives: &'static [&'static str],
}

impl Challenge {
    /// Case-insensitive, whitespace-trimmed exact match against the answer
    /// or any alternative.
    #[must_use]
    pub fn check(&self, input: &str) -> bool {
        let guess = input.trim().to_lowercase();
        guess == self.answer.to_lowercase()
            || self
                .alternatives
                .iter()
                .any(|alt| guess == alt.to_lowercase())
    }
}

/// The teaser shipped with the page.
pub const CHALLENGE: Challenge = Challenge {
    question: "What's the most common password in the world? (Hint: it's not 'password')",
    answer: "123456",
    alternatives: &["password", "admin", "qwerty", "letmein", "welcome"],
};

/// Persisted solve state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeaserState {
    pub solved: bool,
    pub solved_at: Option<DateTime<Utc>>,
}

impl TeaserState {
    /// Reads the state from storage. Only the exact value `"true"` counts
    /// as solved.
    #[must_use]
    pub fn load(storage: &dyn Storage) -> Self {
        let solved = storage.get(keys::TEASER_SOLVED).as_deref() == Some("true");
        let solved_at = storage
            .get(keys::TEASER_SOLVE_TIME)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Self { solved, solved_at }
    }
}

/// What the result panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeaserResult {
    Hidden,
    /// `previously` is set when the solve was restored from storage.
    Solved { previously: bool },
    /// Disappears at `clears_at`.
    Incorrect { clears_at: DateTime<Utc> },
}

impl TeaserResult {
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let actions = concat!(
            r#"<div class="success-actions">"#,
            r#"<button class="btn btn-primary" id="share-success">Share your success</button>"#,
            r##"<a href="#register" class="btn btn-outline">Register for CTF</a>"##,
            "</div>",
        );
        match self {
            Self::Hidden => String::new(),
            Self::Solved { previously: false } => format!(
                concat!(
                    r#"<div class="teaser-result success"><div class="success-content">"#,
                    r#"<div class="success-icon">🎉</div><h4>Well done!</h4>"#,
                    "<p>You've solved the teaser challenge. Ready for the real thing?</p>",
                    "{}</div></div>",
                ),
                actions
            ),
            Self::Solved { previously: true } => format!(
                concat!(
                    r#"<div class="teaser-result success"><div class="success-content">"#,
                    r#"<div class="success-icon">✅</div><h4>Already solved!</h4>"#,
                    "<p>You've already completed this challenge. Ready for the real CTF?</p>",
                    "{}</div></div>",
                ),
                actions
            ),
            Self::Incorrect { .. } => concat!(
                r#"<div class="teaser-result error"><div class="error-content">"#,
                r#"<div class="error-icon">🤔</div><h4>Not quite right</h4>"#,
                "<p>Try again! Think about the most commonly used passwords.</p>",
                "</div></div>",
            )
            .to_string(),
        }
    }
}

/// Outcome of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Correct,
    Incorrect,
    /// The widget is locked; nothing was checked.
    Locked,
}

/// What the share action hands to the platform share sheet (or clipboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    pub title: &'static str,
    pub text: String,
    pub url: String,
}

/// The teaser widget bound to its collaborators.
pub struct TeaserWidget {
    challenge: Challenge,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    analytics: Analytics,
    state: TeaserState,
    result: TeaserResult,
    input: String,
    locked: bool,
}

impl TeaserWidget {
    /// Builds the widget and re-applies a stored solve.
    #[must_use]
    pub fn new(
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        analytics: Analytics,
    ) -> Self {
        let state = TeaserState::load(storage.as_ref());
        let mut widget = Self {
            challenge: CHALLENGE,
            storage,
            notifier,
            analytics,
            state,
            result: TeaserResult::Hidden,
            input: String::new(),
            locked: false,
        };
        if state.solved {
            debug!("teaser already solved on this profile");
            widget.result = TeaserResult::Solved { previously: true };
            widget.locked = true;
        }
        widget
    }

    #[must_use]
    pub const fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    #[must_use]
    pub const fn state(&self) -> TeaserState {
        self.state
    }

    #[must_use]
    pub const fn result(&self) -> TeaserResult {
        self.result
    }

    /// Whether the input and the submit control are disabled.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn input_value(&self) -> &str {
        &self.input
    }

    /// The user typed: store the text and hide any visible result.
    /// Ignored while locked.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.locked {
            return;
        }
        self.input = text.into();
        self.result = TeaserResult::Hidden;
    }

    /// Submits the current input at `now`.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Attempt {
        if self.locked {
            return Attempt::Locked;
        }

        let correct = self.challenge.check(&self.input);
        metrics::record_teaser_attempt(correct);
        track(&self.analytics, || Event::TeaserAttempted {
            timestamp: now,
            correct,
        });

        if correct {
            self.solve(now);
            Attempt::Correct
        } else {
            debug!("incorrect teaser answer");
            self.result = TeaserResult::Incorrect {
                clears_at: now + TimeDelta::seconds(ERROR_DISPLAY_SECS),
            };
            Attempt::Incorrect
        }
    }

    /// Convenience for `input` followed by `submit`.
    pub fn answer(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> Attempt {
        self.input(text);
        self.submit(now)
    }

    fn solve(&mut self, now: DateTime<Utc>) {
        info!("teaser solved");
        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let persisted = self
            .storage
            .set(keys::TEASER_SOLVED, "true")
            .and_then(|()| self.storage.set(keys::TEASER_SOLVE_TIME, &stamp));
        if let Err(e) = persisted {
            warn!(error = %e, "could not persist teaser state");
        }

        self.state = TeaserState {
            solved: true,
            solved_at: Some(now),
        };
        self.result = TeaserResult::Solved { previously: false };
        self.locked = true;

        self.notifier.notify(SOLVED_TOAST, ToastKind::Success);
        track(&self.analytics, || Event::TeaserSolved { timestamp: now });
    }

    /// Hides an error panel whose display time is over. Returns whether
    /// anything was cleared.
    pub fn clear_expired(&mut self, now: DateTime<Utc>) -> bool {
        match self.result {
            TeaserResult::Incorrect { clears_at } if now >= clears_at => {
                self.result = TeaserResult::Hidden;
                true
            }
            _ => false,
        }
    }

    /// Builds the share message and records the share.
    ///
    /// The link is the page origin, carrying the stored referral code if
    /// there is one.
    pub fn share(&self, page: &PageLocation, now: DateTime<Utc>) -> ShareMessage {
        let mut url = page.origin();
        if let Some(code) = self.storage.get(keys::REFERRAL).filter(|c| !c.is_empty()) {
            url = format!("{url}?{}", query_pair(params::REFERRAL, &code));
        }
        track(&self.analytics, || Event::TeaserShared { timestamp: now });
        ShareMessage {
            title: SHARE_TITLE,
            text: format!(
                "I just solved the ACUCyS Christmas CTF teaser challenge! 🎉 Join me for the full competition: {url}"
            ),
            url,
        }
    }

    /// Forgets the solve and unlocks the widget.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored state cannot be removed.
    pub fn reset(&mut self) -> Result<(), crate::error::StorageError> {
        self.storage.remove(keys::TEASER_SOLVED)?;
        self.storage.remove(keys::TEASER_SOLVE_TIME)?;
        self.state = TeaserState::default();
        self.result = TeaserResult::Hidden;
        self.input.clear();
        self.locked = false;
        Ok(())
    }
}

impl std::fmt::Debug for TeaserWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeaserWidget")
            .field("state", &self.state)
            .field("result", &self.result)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::notify::{AnalyticsSink, RecordingNotifier};
    use crate::storage::MemoryStorage;

    #[derive(Default)]
    struct EventLog(Mutex<Vec<Event>>);

    impl AnalyticsSink for EventLog {
        fn record(&self, event: Event) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-12-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn build(storage: &Arc<dyn Storage>) -> (TeaserWidget, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let widget = TeaserWidget::new(storage.clone(), notifier.clone(), None);
        (widget, notifier)
    }

    fn storage() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn accepted_answers() {
        for answer in ["123456", "PASSWORD", " admin ", "QwErTy", "letmein\n", "Welcome"] {
            assert!(CHALLENGE.check(answer), "{answer:?}");
        }
        for answer in ["hunter2", "1234567", "pass word", "", "admin1"] {
            assert!(!CHALLENGE.check(answer), "{answer:?}");
        }
    }

    #[test]
    fn wrong_answer_clears_after_three_seconds() {
        let (mut widget, notifier) = build(&storage());

        assert_eq!(widget.answer("hunter2", now()), Attempt::Incorrect);
        assert!(widget.result().is_visible());
        assert!(!widget.is_locked());

        assert!(!widget.clear_expired(now() + TimeDelta::milliseconds(2_999)));
        assert!(widget.result().is_visible());
        assert!(widget.clear_expired(now() + TimeDelta::seconds(3)));
        assert_eq!(widget.result(), TeaserResult::Hidden);
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn typing_hides_result() {
        let (mut widget, _) = build(&storage());
        widget.answer("nope", now());
        widget.input("1");
        assert_eq!(widget.result(), TeaserResult::Hidden);
    }

    #[test]
    fn first_correct_answer_persists_and_locks() {
        let storage = storage();
        let (mut widget, notifier) = build(&storage);

        assert_eq!(widget.answer(" 123456 ", now()), Attempt::Correct);
        assert!(widget.is_locked());
        assert_eq!(widget.result(), TeaserResult::Solved { previously: false });
        assert_eq!(storage.get(keys::TEASER_SOLVED).as_deref(), Some("true"));
        assert_eq!(
            storage.get(keys::TEASER_SOLVE_TIME).as_deref(),
            Some("2025-12-01T10:00:00.000Z")
        );
        assert_eq!(notifier.messages()[0].0, SOLVED_TOAST);

        assert_eq!(widget.answer("hunter2", now()), Attempt::Locked);
        assert_eq!(widget.result(), TeaserResult::Solved { previously: false });
    }

    #[test]
    fn reload_restores_solved_panel() {
        let storage = storage();
        build(&storage).0.answer("password", now());

        let (reloaded, notifier) = build(&storage);
        assert!(reloaded.is_locked());
        assert_eq!(reloaded.result(), TeaserResult::Solved { previously: true });
        assert!(reloaded.result().to_html().contains("Already solved!"));
        assert_eq!(reloaded.state().solved_at, Some(now()));
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn reset_unlocks() {
        let storage = storage();
        let (mut widget, _) = build(&storage);
        widget.answer("admin", now());

        widget.reset().unwrap();
        assert!(!widget.is_locked());
        assert_eq!(widget.input_value(), "");
        assert_eq!(storage.get(keys::TEASER_SOLVED), None);
        assert!(!build(&storage).0.is_locked());
    }

    #[test]
    fn share_link_carries_referral() {
        let storage = storage();
        let (widget, _) = build(&storage);
        let page = PageLocation::parse("https://ctf.acucys.org/teaser?x=1");

        assert_eq!(widget.share(&page, now()).url, "https://ctf.acucys.org");

        storage.set(keys::REFERRAL, "abc123").unwrap();
        let message = widget.share(&page, now());
        assert_eq!(message.url, "https://ctf.acucys.org?ref=abc123");
        assert!(message.text.ends_with("https://ctf.acucys.org?ref=abc123"));
        assert_eq!(message.title, SHARE_TITLE);
    }

    #[test]
    fn share_link_encodes_referral() {
        let storage = storage();
        let (widget, _) = build(&storage);
        storage.set(keys::REFERRAL, "team&b=1").unwrap();

        let message = widget.share(&PageLocation::parse("https://ctf.acucys.org/"), now());
        assert_eq!(message.url, "https://ctf.acucys.org?ref=team%26b%3D1");
        assert_eq!(
            PageLocation::parse(&message.url).param(params::REFERRAL).as_deref(),
            Some("team&b=1")
        );
    }

    #[test]
    fn share_is_recorded_at_caller_time() {
        let log = Arc::new(EventLog::default());
        let widget = TeaserWidget::new(
            storage(),
            Arc::new(RecordingNotifier::new()),
            Some(log.clone()),
        );
        let _ = widget.share(&PageLocation::none(), now());

        let events = log.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Event::TeaserShared { timestamp } if *timestamp == now()
        ));
    }

    #[test]
    fn non_true_stored_value_is_unsolved() {
        let storage = storage();
        storage.set(keys::TEASER_SOLVED, "yes").unwrap();
        assert!(!TeaserState::load(storage.as_ref()).solved);
    }
}
