//! CLI argument definitions
//!
//! All Clap derive structs for `flagpole` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_CONTENT, DEFAULT_STORAGE, Settings};
use crate::content::ContentSource;
use crate::page::PageLocation;
use crate::registration::DEFAULT_FORM_ENDPOINT;
use crate::theme::ThemeMode;

// ============================================================================
// Root CLI
// ============================================================================

/// Event landing page engine: countdown, registration, teaser and theme.
#[derive(Parser, Debug)]
#[command(name = "flagpole", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "FLAGPOLE_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "FLAGPOLE_LOG_FORMAT")]
    pub log_format: crate::observability::LogFormat,

    #[command(flatten)]
    pub site: SiteArgs,
}

/// Options describing the page being simulated.
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Content document: a file path or an http(s) URL.
    #[arg(long, global = true, default_value = DEFAULT_CONTENT, env = "FLAGPOLE_CONTENT")]
    pub content: String,

    /// Persistent client storage file.
    #[arg(long, global = true, default_value = DEFAULT_STORAGE, env = "FLAGPOLE_STORAGE")]
    pub storage: PathBuf,

    /// URL the page was opened with (supplies `ref` and `utm_*`).
    #[arg(long, global = true, env = "FLAGPOLE_PAGE_URL")]
    pub page_url: Option<String>,

    /// OS dark-mode signal.
    #[arg(
        long,
        global = true,
        env = "FLAGPOLE_PREFERS_DARK",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub prefers_dark: Option<bool>,

    /// Registration submission endpoint.
    #[arg(long, global = true, default_value = DEFAULT_FORM_ENDPOINT, env = "FLAGPOLE_FORM_ENDPOINT")]
    pub form_endpoint: String,

    /// Append structured events (JSONL) to this file.
    #[arg(long, global = true, env = "FLAGPOLE_EVENTS")]
    pub events: Option<PathBuf>,

    /// Serve Prometheus metrics on 127.0.0.1:<port>.
    #[arg(long, global = true, env = "FLAGPOLE_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

impl SiteArgs {
    /// Resolves the arguments into runtime settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            content: ContentSource::parse(&self.content),
            storage_path: self.storage.clone(),
            page: PageLocation::from_arg(self.page_url.as_deref()),
            system_theme: self.prefers_dark.map(ThemeMode::from_dark),
            form_endpoint: self.form_endpoint.clone(),
            events_path: self.events.clone(),
            metrics_port: self.metrics_port,
        }
    }
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the event countdown until the event finishes.
    Countdown(CountdownArgs),

    /// Show or validate the content document.
    Content(ContentCommand),

    /// Validate and submit a registration.
    Register(RegisterArgs),

    /// Play the teaser challenge.
    Teaser(TeaserCommand),

    /// Show or change the theme.
    Theme(ThemeCommand),

    /// Export the event as an iCalendar file.
    Calendar(CalendarArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Countdown
// ============================================================================

/// Arguments for `countdown`.
#[derive(Args, Debug)]
pub struct CountdownArgs {
    /// Print a single tick and exit.
    #[arg(long)]
    pub once: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Content
// ============================================================================

/// Content document commands.
#[derive(Args, Debug)]
pub struct ContentCommand {
    #[command(subcommand)]
    pub subcommand: ContentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ContentSubcommand {
    /// Render the populated page.
    Show(ContentShowArgs),

    /// Check the content document for problems.
    Validate(ContentValidateArgs),
}

/// Arguments for `content show`.
#[derive(Args, Debug)]
pub struct ContentShowArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: ContentFormat,

    /// FAQ item to expand (zero-based).
    #[arg(long)]
    pub open_faq: Option<usize>,
}

/// Arguments for `content validate`.
#[derive(Args, Debug)]
pub struct ContentValidateArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Register
// ============================================================================

/// Arguments for `register`. Missing fields are reported by form validation.
#[derive(Args, Debug, Default)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub university: Option<String>,

    #[arg(long)]
    pub study_level: Option<String>,

    #[arg(long)]
    pub team_status: Option<String>,

    /// Discord handle; `@` is added if missing.
    #[arg(long)]
    pub discord: Option<String>,
}

// ============================================================================
// Teaser
// ============================================================================

/// Teaser challenge commands.
#[derive(Args, Debug)]
pub struct TeaserCommand {
    #[command(subcommand)]
    pub subcommand: TeaserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TeaserSubcommand {
    /// Print the question.
    Question,

    /// Submit an answer.
    Answer(TeaserAnswerArgs),

    /// Show whether the challenge is solved.
    Status,

    /// Print the share message.
    Share,

    /// Forget the solve (testing aid).
    Reset,
}

/// Arguments for `teaser answer`.
#[derive(Args, Debug)]
pub struct TeaserAnswerArgs {
    /// The answer.
    pub answer: String,

    /// Keep the error visible for its full display time before exiting.
    #[arg(long)]
    pub wait: bool,
}

// ============================================================================
// Theme
// ============================================================================

/// Theme commands.
#[derive(Args, Debug)]
pub struct ThemeCommand {
    #[command(subcommand)]
    pub subcommand: ThemeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ThemeSubcommand {
    /// Print the current theme.
    Show,

    /// Switch theme and remember the choice.
    Toggle,

    /// Forget the choice and follow the OS.
    Reset,

    /// Simulate an OS preference change.
    SystemChange(ThemeSystemChangeArgs),
}

/// Arguments for `theme system-change`.
#[derive(Args, Debug)]
pub struct ThemeSystemChangeArgs {
    /// New OS preference.
    pub mode: ThemeMode,
}

// ============================================================================
// Calendar / Completions / Version
// ============================================================================

/// Arguments for `calendar`.
#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Output path; `-` writes to stdout.
    #[arg(short, long, default_value = crate::calendar::DEFAULT_FILENAME)]
    pub output: PathBuf,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Output format for `content show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContentFormat {
    /// Plain text.
    #[default]
    Human,
    /// The content document as loaded.
    Json,
    /// HTML fragments for each page region.
    Html,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
