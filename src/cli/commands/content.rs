//! `content show` and `content validate`.

use tracing::{info, warn};

use crate::cli::args::{ContentFormat, ContentShowArgs, ContentValidateArgs, OutputFormat};
use crate::config::{Settings, ValidationResult, validate_content};
use crate::content::{ContentLoader, create_http_client};
use crate::error::{ConfigError, ContentError, FlagpoleError, Severity, ValidationIssue};

use super::open_site;

/// Prints the populated page.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the document cannot be
/// serialized.
pub async fn show(args: &ContentShowArgs, settings: &Settings) -> Result<(), FlagpoleError> {
    let site = open_site(settings).await?;
    let mut page = site.populate();
    if let Some(index) = args.open_faq {
        if index < page.faq.len() {
            page.faq.toggle(index);
        } else {
            warn!(index, items = page.faq.len(), "no such FAQ item");
        }
    }

    match args.format {
        ContentFormat::Human => {
            if let Some(reason) = &site.loaded().fallback_reason {
                println!("(showing built-in content: {reason})\n");
            }
            print!("{}", page.to_text());
        }
        ContentFormat::Json => {
            println!("{}", serde_json::to_string_pretty(site.content())?);
        }
        ContentFormat::Html => {
            for (id, html) in page.regions_html() {
                println!("<!-- #{id} -->");
                println!("{html}");
            }
        }
    }
    Ok(())
}

/// Fetches the document without falling back and reports every issue.
///
/// # Errors
///
/// Returns `FlagpoleError::Config` when the document fails to parse or has
/// error-severity issues (or any issue, with `--strict`). Fetch failures
/// surface as `FlagpoleError::Content`.
pub async fn validate(
    args: &ContentValidateArgs,
    settings: &Settings,
) -> Result<(), FlagpoleError> {
    let source = settings.content.to_string();
    info!(source = %source, "validating content");

    let content = ContentLoader::new(create_http_client())
        .fetch(&settings.content)
        .await
        .map_err(|e| match e {
            ContentError::Parse(config) => FlagpoleError::Config(config),
            other => FlagpoleError::Content(other),
        })?;

    let result = validate_content(&content);
    report(&source, &result, args.format);

    let failed = result.has_errors() || (args.strict && !result.warnings.is_empty());
    if failed {
        return Err(ConfigError::ValidationError {
            source_name: source,
            errors: result.issues().cloned().collect(),
        }
        .into());
    }
    Ok(())
}

fn report(source: &str, result: &ValidationResult, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            for issue in result.issues() {
                println!("{issue}");
            }
            if result.is_valid() {
                println!(
                    "{source}: valid ({} warning{})",
                    result.warnings.len(),
                    if result.warnings.len() == 1 { "" } else { "s" }
                );
            } else {
                println!(
                    "{source}: {} error(s), {} warning(s)",
                    result.errors.len(),
                    result.warnings.len()
                );
            }
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "source": source,
                "valid": result.is_valid(),
                "issues": result.issues().map(issue_json).collect::<Vec<_>>(),
            });
            println!("{report}");
        }
    }
}

fn issue_json(issue: &ValidationIssue) -> serde_json::Value {
    serde_json::json!({
        "severity": match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        },
        "path": issue.path,
        "message": issue.message,
    })
}
