//! Content document validation.
//!
//! Checks a parsed [`SiteContent`] for problems the page would otherwise
//! paper over with a fallback. All issues are collected rather than
//! stopping at the first one.

use flagpole_core::config::SiteContent;

use crate::content::parse_zone;
use crate::error::{Severity, ValidationIssue, WindowError};
use crate::lifecycle::EventWindow;

/// Result of content validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Problems that make the document unfit to publish.
    pub errors: Vec<ValidationIssue>,

    /// Problems the page recovers from.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors followed by warnings.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().chain(&self.warnings)
    }
}

/// Validates `content`.
#[must_use]
pub fn validate_content(content: &SiteContent) -> ValidationResult {
    let mut validator = Validator::default();
    validator.check_metadata(content);
    validator.check_window(content);
    validator.check_links(content);
    validator.check_lists(content);
    validator.finish()
}

#[derive(Debug, Default)]
struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    fn finish(self) -> ValidationResult {
        ValidationResult {
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn add(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    fn add_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.add(ValidationIssue::error(path, message));
    }

    fn add_warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.add(ValidationIssue::warning(path, message));
    }

    // ========================================================================
    // Checks
    // ========================================================================

    fn check_metadata(&mut self, content: &SiteContent) {
        if content.event_name.trim().is_empty() {
            self.add_error("eventName", "Event name is required and cannot be empty");
        }
        if content.tagline.trim().is_empty() {
            self.add_warning("tagline", "Tagline is empty");
        }
        if let Some(name) = content.timezone.as_deref()
            && parse_zone(name).is_none()
        {
            self.add_warning(
                "timezone",
                format!("'{name}' is not a known IANA timezone; times will show their written offset"),
            );
        }
    }

    fn check_window(&mut self, content: &SiteContent) {
        match EventWindow::from_content(content) {
            Ok(_) => {}
            Err(WindowError::Missing(field)) => self.add_warning(
                field,
                "Timestamp is missing; the page will show a placeholder window",
            ),
            Err(WindowError::Unparseable { field, value }) => self.add_error(
                field,
                format!("'{value}' is not an ISO-8601 timestamp with a UTC offset"),
            ),
            Err(e @ WindowError::Inverted { .. }) => self.add_error("end", e.to_string()),
        }
    }

    fn check_links(&mut self, content: &SiteContent) {
        let absolute = [
            ("registerUrl", content.register_url.as_deref()),
            ("discordUrl", content.discord_url.as_deref()),
            ("siteUrl", content.site_url.as_deref()),
        ];
        for (path, url) in absolute {
            match url {
                Some(url) => self.check_absolute_url(path, url),
                None if path != "siteUrl" => {
                    self.add_warning(path, "Link is missing; its button will not be updated");
                }
                None => {}
            }
        }

        let guides = [
            ("beginnerGuideUrl", content.beginner_guide_url.as_deref()),
            ("whatIsCtfUrl", content.what_is_ctf_url.as_deref()),
        ];
        for (path, url) in guides {
            if let Some(url) = url
                && !url.starts_with('/')
            {
                self.check_absolute_url(path, url);
            }
        }

        for (i, club) in content.clubs.iter().enumerate() {
            if let Some(url) = &club.url {
                self.check_absolute_url(&format!("clubs[{i}].url"), url);
            }
        }
        for (i, sponsor) in content.sponsors.iter().enumerate() {
            if let Some(url) = &sponsor.url {
                self.check_absolute_url(&format!("sponsors[{i}].url"), url);
            }
        }
    }

    fn check_absolute_url(&mut self, path: &str, url: &str) {
        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => self.add_error(
                path,
                format!("URL scheme '{}' is not http or https", parsed.scheme()),
            ),
            Err(e) => self.add_error(path, format!("'{url}' is not a valid URL: {e}")),
        }
    }

    fn check_lists(&mut self, content: &SiteContent) {
        if content.clubs.is_empty() {
            self.add_warning("clubs", "No clubs listed");
        }
        for (i, club) in content.clubs.iter().enumerate() {
            if club.name.trim().is_empty() {
                self.add_error(format!("clubs[{i}].name"), "Club name cannot be empty");
            }
            if club.campus.trim().is_empty() {
                self.add_warning(format!("clubs[{i}].campus"), "Club campus is empty");
            }
        }
        for (i, sponsor) in content.sponsors.iter().enumerate() {
            if sponsor.name.trim().is_empty() {
                self.add_error(format!("sponsors[{i}].name"), "Sponsor name cannot be empty");
            }
        }
        for (i, faq) in content.faqs.iter().enumerate() {
            if faq.question.trim().is_empty() || faq.answer.trim().is_empty() {
                self.add_error(
                    format!("faqs[{i}]"),
                    "FAQ entries need both a question ('q') and an answer ('a')",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped() -> SiteContent {
        SiteContent::from_json(
            "assets/content.json",
            include_str!("../../assets/content.json"),
        )
        .unwrap()
    }

    #[test]
    fn shipped_and_embedded_documents_are_valid() {
        let result = validate_content(&shipped());
        assert!(result.is_valid(), "{:?}", result.errors);

        let result = validate_content(&SiteContent::embedded_default());
        assert!(result.is_valid(), "{:?}", result.errors);
    }

    #[test]
    fn inverted_window_is_an_error() {
        let mut content = shipped();
        content.end.clone_from(&content.start);
        let result = validate_content(&content);
        assert!(result.has_errors());
        assert_eq!(result.errors[0].path, "end");
    }

    #[test]
    fn bad_timestamp_is_an_error_and_missing_is_a_warning() {
        let mut content = shipped();
        content.start = Some("next tuesday".to_string());
        let result = validate_content(&content);
        assert!(result.errors.iter().any(|i| i.path == "start"));

        content.start = None;
        let result = validate_content(&content);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|i| i.path == "start"));
    }

    #[test]
    fn unknown_timezone_is_a_warning() {
        let mut content = shipped();
        assert!(!result_has_warning(&validate_content(&content), "timezone"));

        content.timezone = Some("Mars/Olympus_Mons".to_string());
        let result = validate_content(&content);
        assert!(result.is_valid());
        assert!(result_has_warning(&result, "timezone"));
    }

    fn result_has_warning(result: &ValidationResult, path: &str) -> bool {
        result.warnings.iter().any(|i| i.path == path)
    }

    #[test]
    fn empty_event_name_is_an_error() {
        let mut content = shipped();
        content.event_name = "  ".to_string();
        let result = validate_content(&content);
        assert!(result.errors.iter().any(|i| i.path == "eventName"));
    }

    #[test]
    fn non_http_links_are_errors() {
        let mut content = shipped();
        content.discord_url = Some("javascript:alert(1)".to_string());
        content.clubs[3].url = Some("not a url".to_string());
        let result = validate_content(&content);

        let paths: Vec<_> = result.errors.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"discordUrl"));
        assert!(paths.contains(&"clubs[3].url"));
    }

    #[test]
    fn relative_guide_links_are_allowed() {
        let mut content = shipped();
        content.beginner_guide_url = Some("/beginner-guide".to_string());
        assert!(validate_content(&content).is_valid());
    }

    #[test]
    fn issues_lists_errors_first() {
        let mut content = shipped();
        content.event_name.clear();
        content.tagline.clear();
        let result = validate_content(&content);
        let severities: Vec<_> = result.issues().map(|i| i.severity).collect();
        assert_eq!(severities.first(), Some(&Severity::Error));
        assert_eq!(severities.last(), Some(&Severity::Warning));
    }
}
