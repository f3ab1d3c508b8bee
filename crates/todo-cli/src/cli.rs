use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Manage your todo list and reminders from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to a JSON client config (env vars override it)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List todos
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new todo
    #[command(alias = "new")]
    Add {
        /// Todo text
        text: Vec<String>,
        /// Reminder time (RFC 3339 or "YYYY-MM-DD HH:MM" local time)
        #[arg(long, value_name = "WHEN")]
        remind_at: Option<String>,
    },
    /// Mark a todo done, or not done
    Toggle {
        /// Todo ID or unique ID prefix
        id: String,
    },
    /// Replace a todo's text and/or reminder
    Edit {
        /// Todo ID or unique ID prefix
        id: String,
        /// New todo text (kept when omitted)
        text: Vec<String>,
        /// New reminder time (RFC 3339 or "YYYY-MM-DD HH:MM" local time)
        #[arg(long, value_name = "WHEN", conflicts_with = "clear_reminder")]
        remind_at: Option<String>,
        /// Remove the reminder
        #[arg(long)]
        clear_reminder: bool,
    },
    /// Delete a todo
    #[command(alias = "rm")]
    Delete {
        /// Todo ID or unique ID prefix
        id: String,
    },
    /// Stay running and fire reminders until Ctrl-C
    Watch,
    /// Sign in, register, or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Show or toggle the color theme
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email/password and store the session in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show who is signed in
    Status,
    /// Sign out and clear the stored session
    Logout,
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Switch between light and dark
    Toggle,
}
