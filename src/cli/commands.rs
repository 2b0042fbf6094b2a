//! CLI commands and argument parsing

use crate::window::RangeSelector;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Canvas planner CLI
#[derive(Parser, Debug)]
#[command(name = "canvas-planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Canvas API base URL (overrides config and CANVAS_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Canvas access token (overrides config and CANVAS_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the authenticated user
    User,

    /// List enrolled courses
    Courses,

    /// Planner items inside a time window
    Assignments {
        /// day, week, month or semester (unknown values mean semester)
        #[arg(short, long)]
        range: Option<String>,
    },

    /// Assignments of specific courses (all courses when none given)
    CourseAssignments {
        /// Course id, repeatable
        #[arg(long = "course")]
        courses: Vec<u64>,
    },

    /// Mark a planner item complete
    Complete {
        /// Plannable id
        id: u64,

        /// Mark as not complete instead
        #[arg(long)]
        undo: bool,
    },
}

impl Commands {
    /// Selector for `assignments`, parsed leniently
    pub fn range_selector(&self) -> Option<RangeSelector> {
        match self {
            Commands::Assignments { range } => Some(RangeSelector::parse_lenient(range.as_deref())),
            _ => None,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "canvas-planner",
            "courses",
            "--base-url",
            "https://canvas.example.edu/api/v1",
            "--token",
            "abc",
            "-f",
            "pretty",
            "-v",
        ]);

        assert_eq!(cli.command, Commands::Courses);
        assert_eq!(cli.base_url.as_deref(), Some("https://canvas.example.edu/api/v1"));
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }

    #[test]
    fn test_course_assignments_repeated_flag() {
        let cli = Cli::parse_from([
            "canvas-planner",
            "course-assignments",
            "--course",
            "1",
            "--course",
            "2",
        ]);
        assert_eq!(
            cli.command,
            Commands::CourseAssignments {
                courses: vec![1, 2]
            }
        );
    }

    #[test]
    fn test_complete_undo() {
        let cli = Cli::parse_from(["canvas-planner", "complete", "42", "--undo"]);
        assert_eq!(cli.command, Commands::Complete { id: 42, undo: true });
    }

    #[test_case(None => Some(RangeSelector::Semester))]
    #[test_case(Some("week") => Some(RangeSelector::Week))]
    #[test_case(Some("fortnight") => Some(RangeSelector::Semester))]
    fn test_range_selector(range: Option<&str>) -> Option<RangeSelector> {
        Commands::Assignments {
            range: range.map(str::to_string),
        }
        .range_selector()
    }

    #[test]
    fn test_range_selector_other_command() {
        assert_eq!(Commands::User.range_selector(), None);
    }
}
