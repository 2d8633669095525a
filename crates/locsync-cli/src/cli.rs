//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};

/// locsync - Push localization resources to a remote project, key by key
#[derive(Parser, Debug)]
#[command(name = "locsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create .locsync/config.toml in the current directory
    ///
    /// Examples:
    ///   locsync init
    ///   locsync init --resources i18n --default-language en
    ///   locsync init --remote-url https://strings.example.com --project my-app
    Init(InitArgs),

    /// Show local changes since the last sync, without contacting the remote
    Status {
        /// Only consider these languages
        #[arg(short, long = "lang")]
        languages: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Push local changes to the remote project
    Push(PushArgs),
}

/// Arguments for `locsync init`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InitArgs {
    /// Resource directory, relative to the project root
    #[arg(long, default_value = "locales")]
    pub resources: String,

    /// Resource file format
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Source language of the project
    #[arg(long)]
    pub default_language: Option<String>,

    /// Base URL of the remote service
    #[arg(long, requires = "project")]
    pub remote_url: Option<String>,

    /// Project identifier on the remote
    #[arg(long, requires = "remote_url")]
    pub project: Option<String>,
}

/// Arguments for `locsync push`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PushArgs {
    /// Message recorded with the push
    #[arg(short, long)]
    pub message: Option<String>,

    /// Compute and show the changes without pushing
    #[arg(long)]
    pub dry_run: bool,

    /// Resolve every conflict with the local value
    #[arg(long, conflicts_with = "interactive")]
    pub force: bool,

    /// Resolve conflicts interactively
    #[arg(short, long)]
    pub interactive: bool,

    /// Only push these languages
    #[arg(short, long = "lang")]
    pub languages: Vec<String>,

    /// Access token for the remote service
    #[arg(long, env = "LOCSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_push_flags() {
        let cli = Cli::try_parse_from([
            "locsync", "push", "--dry-run", "--lang", "en", "--lang", "fr", "-m", "release",
        ])
        .unwrap();
        let Some(Commands::Push(args)) = cli.command else {
            panic!("expected push");
        };
        assert!(args.dry_run);
        assert_eq!(args.languages, vec!["en", "fr"]);
        assert_eq!(args.message.as_deref(), Some("release"));
    }

    #[test]
    fn force_and_interactive_conflict() {
        let result = Cli::try_parse_from(["locsync", "push", "--force", "--interactive"]);
        assert!(result.is_err());
    }

    #[test]
    fn remote_url_requires_project() {
        let result = Cli::try_parse_from(["locsync", "init", "--remote-url", "https://x.example"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["locsync", "status", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
