//! CLI - Command Line Interface for LMDB
//!
//! Every listing, search and detail page the TUI shows is also available as a
//! subcommand. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Listings
//! lmdb popular -t tv --pages 3
//! lmdb trending -w week --limit 5
//!
//! # Search and details
//! lmdb search "the batman" --json
//! lmdb info 414906 -t movie
//! lmdb credits 1399 -t tv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{MediaKind, TimeWindow};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or configuration
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// The requested movie, show or person doesn't exist
    NotFound = 4,
    /// The listing or search came back empty
    NoResults = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// LMDB - browse The Movie Database from the terminal
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "lmdb",
    version,
    about = "Browse movies, TV shows and people from TMDB",
    long_about = "A terminal browser for The Movie Database: popular and trending \
                  listings, search, details, cast & crew and reviews.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  lmdb                              Launch interactive TUI\n\
                  lmdb search \"blade runner\"        Search (kind picked from the top hit)\n\
                  lmdb popular -t tv --pages 2      First two pages of popular shows\n\
                  lmdb info 550 -t movie --json     Movie details as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Popular movies, TV shows or people
    #[command(visible_alias = "pop")]
    Popular(PopularCmd),

    /// Trending movies or TV shows
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Top rated movies or TV shows
    #[command(visible_alias = "top")]
    TopRated(TopRatedCmd),

    /// TV shows airing today
    AiringToday(AiringTodayCmd),

    /// Search movies, TV shows or people
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Details for a movie, TV show or person
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Cast & crew of a title, or a person's filmography
    Credits(CreditsCmd),

    /// User reviews of a movie or TV show
    Reviews(ReviewsCmd),

    /// Recommendations based on a movie or TV show
    #[command(visible_alias = "rec")]
    Recommendations(RecommendationsCmd),
}

// =============================================================================
// Shared Arguments
// =============================================================================

/// Kind filter for commands that accept people
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindArg {
    #[default]
    Movie,
    Tv,
    Person,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Tv,
            KindArg::Person => MediaKind::Person,
        }
    }
}

/// Kind filter for commands that only make sense for titles
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleKind {
    #[default]
    Movie,
    Tv,
}

impl From<TitleKind> for MediaKind {
    fn from(kind: TitleKind) -> Self {
        match kind {
            TitleKind::Movie => MediaKind::Movie,
            TitleKind::Tv => MediaKind::Tv,
        }
    }
}

/// Time window for trending content
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowArg {
    /// Today's trending
    Day,
    /// This week's trending
    Week,
}

impl From<WindowArg> for TimeWindow {
    fn from(window: WindowArg) -> Self {
        match window {
            WindowArg::Day => TimeWindow::Day,
            WindowArg::Week => TimeWindow::Week,
        }
    }
}

/// Which pages of a listing to print
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    /// Fetch this single page
    #[arg(long, default_value = "1", conflicts_with = "pages")]
    pub page: u32,

    /// Load pages 1..=N, stopping early when the listing runs out
    #[arg(long)]
    pub pages: Option<u32>,

    /// Maximum number of results to print
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            page: 1,
            pages: None,
            limit: None,
        }
    }
}

// =============================================================================
// Listing Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct PopularCmd {
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: KindArg,

    #[command(flatten)]
    pub pages: PageArgs,
}

#[derive(Args, Debug)]
pub struct TrendingCmd {
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: TitleKind,

    /// Time window (defaults to the configured window)
    #[arg(long, short = 'w', value_enum)]
    pub window: Option<WindowArg>,

    #[command(flatten)]
    pub pages: PageArgs,
}

#[derive(Args, Debug)]
pub struct TopRatedCmd {
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: TitleKind,

    #[command(flatten)]
    pub pages: PageArgs,
}

#[derive(Args, Debug)]
pub struct AiringTodayCmd {
    #[command(flatten)]
    pub pages: PageArgs,
}

// =============================================================================
// Search Command
// =============================================================================

#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title or name)
    #[arg(required = true)]
    pub query: String,

    /// Kind to search; omitted, the kind of the top multi-search hit is used
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<KindArg>,

    #[command(flatten)]
    pub pages: PageArgs,
}

// =============================================================================
// Detail Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB ID
    #[arg(required = true)]
    pub id: u64,

    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: KindArg,
}

#[derive(Args, Debug)]
pub struct CreditsCmd {
    /// TMDB ID
    #[arg(required = true)]
    pub id: u64,

    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: KindArg,

    /// Maximum number of cast and crew entries each
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ReviewsCmd {
    /// TMDB ID
    #[arg(required = true)]
    pub id: u64,

    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: TitleKind,

    #[command(flatten)]
    pub pages: PageArgs,
}

#[derive(Args, Debug)]
pub struct RecommendationsCmd {
    /// TMDB ID
    #[arg(required = true)]
    pub id: u64,

    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: TitleKind,

    #[command(flatten)]
    pub pages: PageArgs,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// A listing as printed: the items plus where the listing stopped
#[derive(Debug, Serialize, Deserialize)]
pub struct ListingOutput<T> {
    /// Last page loaded
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<T>,
}

/// Cast and crew as printed
#[derive(Debug, Serialize, Deserialize)]
pub struct CreditsOutput<T> {
    pub cast: Vec<T>,
    pub crew: Vec<T>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        println!("{}", self.render(data)?);
        Ok(())
    }

    /// What [`Output::print`] writes
    pub fn render<T: Serialize>(&self, data: T) -> anyhow::Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(&JsonOutput::success(data))?)
        } else {
            Ok(serde_json::to_string_pretty(&data)?)
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["lmdb"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_popular_defaults() {
        let cli = Cli::parse_from(["lmdb", "popular"]);
        match cli.command {
            Some(Command::Popular(cmd)) => {
                assert_eq!(cmd.media_type, KindArg::Movie);
                assert_eq!(cmd.pages, PageArgs::default());
            }
            other => panic!("Expected Popular, got {:?}", other),
        }
    }

    #[test]
    fn test_page_and_pages_conflict() {
        let result = Cli::try_parse_from(["lmdb", "popular", "--page", "2", "--pages", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_trending_rejects_people() {
        assert!(Cli::try_parse_from(["lmdb", "trending", "-t", "person"]).is_err());
        let cli = Cli::parse_from(["lmdb", "trending", "-t", "tv", "-w", "week"]);
        match cli.command {
            Some(Command::Trending(cmd)) => {
                assert_eq!(MediaKind::from(cmd.media_type), MediaKind::Tv);
                assert_eq!(cmd.window.map(TimeWindow::from), Some(TimeWindow::Week));
            }
            other => panic!("Expected Trending, got {:?}", other),
        }
    }

    #[test]
    fn test_info_requires_numeric_id() {
        assert!(Cli::try_parse_from(["lmdb", "info", "tt0137523"]).is_err());
        let cli = Cli::parse_from(["lmdb", "info", "287", "-t", "person"]);
        match cli.command {
            Some(Command::Info(cmd)) => {
                assert_eq!(cmd.id, 287);
                assert_eq!(cmd.media_type, KindArg::Person);
            }
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::NoResults), 5);
    }

    #[test]
    fn test_json_envelope() {
        let output = Output {
            json: true,
            quiet: false,
        };
        let rendered = output.render(vec![1, 2]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert!(value.get("exit_code").is_none());

        let err = serde_json::to_value(JsonOutput::<()>::error_msg("nope", ExitCode::NotFound))
            .unwrap();
        assert_eq!(err["exit_code"], 4);
        assert_eq!(err["error"], "nope");
    }
}
