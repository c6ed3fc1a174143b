pub mod commands;

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "rentora",
    about = "Rentora operator CLI",
    long_about = "Operate the Rentora rental backend: readiness checks, config inspection, \
                  demo data seeding, and reservation/request management.",
    after_help = "Examples:\n  rentora doctor --json\n  rentora config\n  rentora reservations add --vehicle audi-r8-v8 --start 2026-08-14 --end 2026-08-16\n  rentora requests accept --id <uuid> --pricing '{\"24h\":{\"price_chf\":390,\"included_km\":250}}'"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate config, storage writability, and per-collection file health")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Show the effective configuration with secrets redacted")]
    Config,
    #[command(about = "Write the deterministic demo reservations into the store")]
    Seed,
    #[command(subcommand, about = "Manage the availability ledger")]
    Reservations(ReservationsCommand),
    #[command(subcommand, about = "Manage rental requests (list, accept, reject, delete)")]
    Requests(RequestsCommand),
}

#[derive(Debug, Subcommand)]
enum ReservationsCommand {
    #[command(about = "List every stored reservation interval")]
    List,
    #[command(about = "Add a booked interval for a vehicle (end date inclusive)")]
    Add {
        #[arg(long)]
        vehicle: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    #[command(about = "Remove a reservation interval by id")]
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum RequestsCommand {
    #[command(about = "List rental requests with their status")]
    List,
    #[command(about = "Accept a pending request and attach pricing tiers (JSON object)")]
    Accept {
        #[arg(long)]
        id: String,
        #[arg(long, help = "Tier map, e.g. {\"24h\":{\"price_chf\":390,\"included_km\":250}}")]
        pricing: String,
    },
    #[command(about = "Reject a pending request")]
    Reject {
        #[arg(long)]
        id: String,
    },
    #[command(about = "Delete a request at any status")]
    Delete {
        #[arg(long)]
        id: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Seed => commands::seed::run(),
        Command::Reservations(command) => match command {
            ReservationsCommand::List => commands::reservations::list(),
            ReservationsCommand::Add { vehicle, start, end } => {
                commands::reservations::add(&vehicle, start, end)
            }
            ReservationsCommand::Remove { id } => commands::reservations::remove(&id),
        },
        Command::Requests(command) => match command {
            RequestsCommand::List => commands::requests::list(),
            RequestsCommand::Accept { id, pricing } => commands::requests::accept(&id, &pricing),
            RequestsCommand::Reject { id } => commands::requests::reject(&id),
            RequestsCommand::Delete { id } => commands::requests::delete(&id),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
