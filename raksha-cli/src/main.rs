//! Raksha CLI - command-line interface
//!
//! Demo and diagnostic frontend for the Raksha engine: run a live
//! tracking session or a one-shot nearby-service lookup from the
//! terminal.

mod commands;
mod error;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "raksha",
    version = raksha::VERSION,
    about = "Personal-safety live tracking and nearby emergency services"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a live tracking session, printing snapshots and nearby services
    Track(commands::track::TrackArgs),

    /// One-shot nearby service discovery around a coordinate
    Nearby(commands::nearby::NearbyArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Track(args) => commands::track::run(args),
        Command::Nearby(args) => commands::nearby::run(args),
    };

    if let Err(error) = result {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}
