use clap::{Parser, Subcommand};
use sidenotes::model::Theme;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Version string: `v0.3.0` for releases, with the git hash and commit date
/// appended for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "sidenotes",
    bin_name = "sidenotes",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Offline-first Markdown notes in the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding notes, settings and config.json
    #[arg(long, global = true, env = "SIDENOTES_DATA_DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes, most recently updated first
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show a note in full
    #[command(alias = "v", display_order = 2)]
    Show { id: String },

    /// Create a note
    #[command(alias = "n", display_order = 3)]
    New {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Change a note's title, content or tags
    #[command(alias = "e", display_order = 4)]
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        /// Replace the tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        /// Stream content from stdin, saving after each pause in the input
        #[arg(long, conflicts_with = "content")]
        stdin: bool,
    },

    /// Delete a note permanently
    #[command(alias = "rm", display_order = 5)]
    Delete {
        id: String,

        /// Allow deleting the last remaining note
        #[arg(long)]
        force: bool,
    },

    /// Search titles, content and tags
    #[command(display_order = 10)]
    Search { query: String },

    /// List every tag in use
    #[command(display_order = 11)]
    Tags,

    /// List notes carrying a tag
    #[command(display_order = 12)]
    Tagged { tag: String },

    /// Write a backup file
    #[command(display_order = 20)]
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Replace every note with the contents of a backup file
    #[command(display_order = 21)]
    Import { file: PathBuf },

    /// Storage usage
    #[command(display_order = 22)]
    Info,

    /// Show or change preferences
    #[command(display_order = 24)]
    Settings {
        /// light, dark or system
        #[arg(long)]
        theme: Option<Theme>,

        /// Auto-save quiescence window in milliseconds
        #[arg(long)]
        autosave_ms: Option<u64>,
    },

    /// Delete all data; the next run starts from the sample notes
    #[command(display_order = 23)]
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Route one GET request through a freshly installed, in-memory cache router
    #[command(display_order = 30)]
    Fetch {
        /// Path on the application origin, e.g. /api/notes
        path: String,

        /// Override the configured origin
        #[arg(long)]
        origin: Option<String>,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_new_with_repeated_tags() {
        let cli = Cli::try_parse_from([
            "sidenotes", "new", "--title", "T", "--tag", "a", "--tag", "b",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::New { title, tags, .. }) => {
                assert_eq!(title.as_deref(), Some("T"));
                assert_eq!(tags, vec!["a", "b"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sidenotes", "list", "-v", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_settings_theme_parses() {
        let cli = Cli::try_parse_from(["sidenotes", "settings", "--theme", "dark"]).unwrap();
        match cli.command {
            Some(Commands::Settings { theme, autosave_ms }) => {
                assert_eq!(theme, Some(Theme::Dark));
                assert_eq!(autosave_ms, None);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(Cli::try_parse_from(["sidenotes", "settings", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn test_edit_tags_conflict_with_clear() {
        assert!(Cli::try_parse_from(["sidenotes", "edit", "1", "--tag", "a", "--clear-tags"]).is_err());
    }
}
