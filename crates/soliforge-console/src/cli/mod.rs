/*
[INPUT]:  Parsed subcommands, console config, session store
[OUTPUT]: Headless account and task commands
[POS]:    CLI layer
[UPDATE]: 2026-09-06 Add tasks subcommands and headless watch
*/

mod commands;

use std::path::PathBuf;

use clap::{Args, Subcommand};

pub(crate) use commands::{connect, run};

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// Sign in and persist the session
    Login {
        #[arg(long, value_name = "EMAIL")]
        username: Option<String>,
        #[arg(long, value_name = "PASSWORD")]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
        #[arg(long, value_name = "NAME")]
        username: Option<String>,
        #[arg(long, value_name = "PASSWORD")]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Manage audit tasks
    #[command(subcommand)]
    Tasks(TaskCommand),
}

#[derive(Subcommand, Debug)]
pub(crate) enum TaskCommand {
    /// List tasks, optionally filtered
    List(ListArgs),
    /// Task detail with attack matrix and recent logs
    Show { id: String },
    /// Create a task
    Create { name: String },
    /// Delete a task
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Upload a Solidity contract to a task
    Upload { id: String, file: PathBuf },
    /// Start (or restart) a task
    Start { id: String },
    /// Stop a running task
    Stop { id: String },
    /// Follow status and logs until the task stops running
    Watch { id: String },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<u32>,
    #[arg(long)]
    pub keyword: Option<String>,
    #[arg(long = "creator", value_name = "NAME")]
    pub creator: Option<String>,
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,
    #[arg(long = "from", value_name = "YYYY-MM-DD")]
    pub from: Option<String>,
    #[arg(long = "to", value_name = "YYYY-MM-DD")]
    pub to: Option<String>,
    #[arg(long = "owner", value_name = "ID")]
    pub owner: Option<String>,
}
