use clap::{Parser, Subcommand};

pub fn args_checks() -> Args {
    Args::parse()
}

#[derive(Parser)]
#[command(author, version, about = "Fetches and tracks League of Legends game data", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Champion data commands
    Champions {
        #[command(subcommand)]
        action: DataAction,
    },
    /// Game data commands
    Games {
        #[command(subcommand)]
        action: DataAction,
    },
    /// API server commands
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },
}

#[derive(Subcommand)]
pub enum DataAction {
    /// Fetch from the upstream API and store
    Fetch,
    /// Remove all stored data of this kind and reset its fetch ledger
    Wipe,
}

#[derive(Subcommand)]
pub enum ServerAction {
    /// Run the API server in the foreground
    Start,
    /// Ask a running server to shut down gracefully
    Stop,
}
