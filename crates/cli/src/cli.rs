// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cafe_core::HistoryDisplay;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::help;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How `history` shows participants that were called more than once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DisplayArg {
    /// Only the first call per participant
    First,
    /// Every call, grouped per participant
    All,
}

impl From<DisplayArg> for HistoryDisplay {
    fn from(arg: DisplayArg) -> Self {
        match arg {
            DisplayArg::First => HistoryDisplay::First,
            DisplayArg::All => HistoryDisplay::All,
        }
    }
}

#[derive(Parser)]
#[command(name = "cafe", version)]
#[command(about = "Chat with a room of AI participants from the terminal")]
#[command(styles = help::styles())]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
pub struct Cli {
    /// Server API base URL (overrides config and CAFE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Log debug output (to stderr, or the chat log file during chat)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Shared `--output` flag.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a session interactively (creates one if no id is given)
    #[command(after_help = "Keys:\n  \
        Enter        Send, or pick the highlighted participant\n  \
        Alt+Enter    New line\n  \
        Up/Down/Tab  Move through @mention suggestions\n  \
        Esc          Hide suggestions\n  \
        Ctrl+R       Reconnect and refresh participants, mode, stats, history\n  \
        Ctrl+C       Quit")]
    Chat {
        /// Session ID
        session: Option<String>,
    },

    /// Send one message to a session
    #[command(after_help = "Examples:\n  \
        cafe send sess_1 hello                Send a message\n  \
        cafe send sess_1 \"@Mochi what's up\"   Mention a participant")]
    Send {
        /// Session ID
        session: String,

        /// Message text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print a session timeline
    Messages {
        /// Session ID
        session: String,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Messages per page
        #[arg(long, default_value_t = 50)]
        limit: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List, create, rename and delete sessions
    #[command(subcommand)]
    Sessions(SessionsCommand),

    /// Show the participant directory
    #[command(subcommand)]
    Cats(CatsCommand),

    /// Show message counts of a session
    Stats {
        /// Session ID
        session: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show participant call history of a session
    History {
        /// Session ID
        session: String,

        /// Show repeated participants once or every call (default from config)
        #[arg(long, value_enum)]
        display: Option<DisplayArg>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show or switch session modes
    #[command(subcommand)]
    Modes(ModesCommand),

    /// Show or write configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// List sessions, most recent first as the server orders them
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Create a session
    New {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show one session
    Show {
        /// Session ID
        session: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rename a session
    Rename {
        /// Session ID
        session: String,

        /// New name
        name: String,
    },

    /// Delete a session
    Delete {
        /// Session ID
        session: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum CatsCommand {
    /// List every participant
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show one participant
    Show {
        /// Participant ID
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List participants that are idle
    Available {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum ModesCommand {
    /// List modes the server offers
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the mode of a session
    Show {
        /// Session ID
        session: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Switch a session to another mode
    Set {
        /// Session ID
        session: String,

        /// Mode name (see `cafe modes list`)
        mode: String,

        /// Mode configuration as a JSON object
        #[arg(long, value_name = "JSON")]
        config: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
