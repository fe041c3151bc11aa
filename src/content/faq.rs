//! FAQ accordion with at most one open item.

use std::fmt::Write as _;

use flagpole_core::config::Faq;

use super::render::escape_html;

/// An FAQ list where opening one answer closes all the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    items: Vec<Faq>,
    active: Option<usize>,
}

impl Accordion {
    /// All items start collapsed.
    #[must_use]
    pub fn new(items: Vec<Faq>) -> Self {
        Self {
            items,
            active: None,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Faq] {
        &self.items
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the open item.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Activates `index`, closing every sibling; activating the open item
    /// closes it. Out-of-range indexes are ignored.
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        if index < self.items.len() {
            self.active = if self.active == Some(index) {
                None
            } else {
                Some(index)
            };
        }
        self.active
    }

    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    /// Value of the question button's `aria-expanded` attribute.
    #[must_use]
    pub fn aria_expanded(&self, index: usize) -> &'static str {
        if self.is_active(index) { "true" } else { "false" }
    }

    /// Element id of the answer at `index`.
    #[must_use]
    pub fn answer_id(index: usize) -> String {
        format!("faq-answer-{index}")
    }

    /// Markup of the whole list in its current state.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for (index, faq) in self.items.iter().enumerate() {
            let class = if self.is_active(index) {
                "faq-item active"
            } else {
                "faq-item"
            };
            let id = Self::answer_id(index);
            let _ = write!(
                html,
                concat!(
                    r#"<div class="{class}">"#,
                    r#"<button class="faq-question" aria-expanded="{expanded}" aria-controls="{id}">"#,
                    r#"<span>{question}</span><span class="faq-icon">▼</span></button>"#,
                    r#"<div class="faq-answer" id="{id}">{answer}</div>"#,
                    "</div>",
                ),
                class = class,
                expanded = self.aria_expanded(index),
                id = id,
                question = escape_html(&faq.question),
                answer = escape_html(&faq.answer),
            );
        }
        html
    }
}
