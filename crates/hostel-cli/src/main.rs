//! Hostel CLI
//!
//! Command-line interface for hostel management.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hostel_core::{Config, NewHostel, NewStudent, Role, StorageError, Store};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "hostel")]
#[command(about = "Hostel management - hostels, rooms, students and payments")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a hostel (creates the owner account and rooms)
    Register {
        /// Owner's full name
        #[arg(long)]
        owner_name: String,
        /// Hostel display name
        #[arg(long)]
        hostel_name: String,
        /// Hostel location
        #[arg(long)]
        location: String,
        /// Hostel offers wifi
        #[arg(long)]
        wifi: bool,
        /// Number of floors
        #[arg(long)]
        floors: u32,
        /// Rooms on each floor
        #[arg(long)]
        rooms_per_floor: u32,
        /// Owner contact phone (used to log in)
        #[arg(long)]
        contact: String,
    },
    /// Browse hostels
    Hostels {
        #[command(subcommand)]
        command: Option<HostelCommands>,
    },
    /// Show an owner account
    Owner {
        /// Owner contact phone
        contact: String,
    },
    /// Join a hostel as a student
    Join {
        /// Hostel ID given by the owner
        hostel_id: String,
        /// Student's full name
        #[arg(long)]
        name: String,
        /// Student phone (used to log in)
        #[arg(long)]
        phone: String,
        /// College or employer
        #[arg(long)]
        org: String,
        /// Preferred room
        #[arg(long)]
        room: Option<String>,
    },
    /// Manage rooms of your hostel (owner)
    Rooms {
        #[command(subcommand)]
        command: Option<RoomCommands>,
    },
    /// Students of your hostel (owner)
    Students {
        #[command(subcommand)]
        command: Option<StudentCommands>,
    },
    /// Payments received by your hostel (owner)
    Payments {
        #[command(subcommand)]
        command: Option<PaymentCommands>,
    },
    /// Room change requests for your hostel (owner)
    Requests {
        #[command(subcommand)]
        command: Option<RequestCommands>,
    },
    /// Leave your hostel (student)
    Vacate,
    /// Ask to move to another room (student)
    RequestRoom {
        /// Room number wanted
        room: String,
    },
    /// Log in as owner or student
    Login {
        /// Role: owner or student
        role: Role,
        /// Owner contact or student phone
        username: String,
        /// Password (not checked)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show status (storage location, session, record counts)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum HostelCommands {
    /// List all hostels
    #[command(alias = "ls")]
    List,
    /// Show a hostel
    Show {
        /// Hostel ID
        id: String,
    },
    /// Find the hostel run by an owner
    ByOwner {
        /// Owner contact phone
        contact: String,
    },
}

#[derive(Subcommand)]
enum RoomCommands {
    /// List rooms
    #[command(alias = "ls")]
    List,
    /// Add a room
    Add {
        /// Room number
        number: String,
    },
    /// Delete a room
    #[command(alias = "rm")]
    Delete {
        /// Room number
        number: String,
    },
}

#[derive(Subcommand)]
enum StudentCommands {
    /// List students of your hostel
    #[command(alias = "ls")]
    List,
    /// Show a student
    Show {
        /// Student phone
        phone: String,
    },
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Record a payment
    Add {
        /// Student phone
        phone: String,
        /// Amount paid
        amount: f64,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List payments
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
enum RequestCommands {
    /// List room change requests
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, pretty_json)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:?}", err);
        if let Some(hint) = storage_hint(&err) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

/// Recovery suggestion for a storage failure anywhere in the error chain
fn storage_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut store = Store::open_with_config(&config)?;
    debug!("Opened store in {:?}", config.data_dir);

    match cli.command {
        Commands::Register {
            owner_name,
            hostel_name,
            location,
            wifi,
            floors,
            rooms_per_floor,
            contact,
        } => commands::hostel::register(
            &mut store,
            NewHostel {
                owner_name,
                hostel_name,
                location,
                wifi,
                floors,
                rooms_per_floor,
                contact,
            },
            &output,
        ),
        Commands::Hostels { command } => handle_hostel_command(command, &store, &output),
        Commands::Owner { contact } => commands::hostel::owner(&store, contact, &output),
        Commands::Join {
            hostel_id,
            name,
            phone,
            org,
            room,
        } => commands::student::join(
            &mut store,
            NewStudent {
                student_name: name,
                phone,
                org,
                room,
            },
            hostel_id,
            &output,
        ),
        Commands::Rooms { command } => handle_room_command(command, &mut store, &output),
        Commands::Students { command } => handle_student_command(command, &store, &output),
        Commands::Payments { command } => handle_payment_command(command, &mut store, &output),
        Commands::Requests { command } => handle_request_command(command, &store, &output),
        Commands::Vacate => commands::student::vacate(&mut store, &output),
        Commands::RequestRoom { room } => commands::student::request_room(&mut store, room, &output),
        Commands::Login {
            role,
            username,
            password,
        } => commands::session::login(&mut store, role, username, password, &output),
        Commands::Logout => commands::session::logout(&mut store, &output),
        Commands::Whoami => commands::session::whoami(&store, &output),
        Commands::Status => commands::status::show(&store, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_hostel_command(command: Option<HostelCommands>, store: &Store, output: &Output) -> Result<()> {
    match command {
        Some(HostelCommands::List) | None => commands::hostel::list(store, output),
        Some(HostelCommands::Show { id }) => commands::hostel::show(store, id, output),
        Some(HostelCommands::ByOwner { contact }) => {
            commands::hostel::by_owner(store, contact, output)
        }
    }
}

fn handle_room_command(command: Option<RoomCommands>, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        Some(RoomCommands::List) | None => commands::room::list(store, output),
        Some(RoomCommands::Add { number }) => commands::room::add(store, number, output),
        Some(RoomCommands::Delete { number }) => commands::room::delete(store, number, output),
    }
}

fn handle_student_command(
    command: Option<StudentCommands>,
    store: &Store,
    output: &Output,
) -> Result<()> {
    match command {
        Some(StudentCommands::List) | None => commands::student::list(store, output),
        Some(StudentCommands::Show { phone }) => commands::student::show(store, phone, output),
    }
}

fn handle_payment_command(
    command: Option<PaymentCommands>,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        Some(PaymentCommands::Add {
            phone,
            amount,
            note,
        }) => commands::payment::add(store, phone, amount, note, output),
        Some(PaymentCommands::List) | None => commands::payment::list(store, output),
    }
}

fn handle_request_command(
    command: Option<RequestCommands>,
    store: &Store,
    output: &Output,
) -> Result<()> {
    match command {
        Some(RequestCommands::List) | None => commands::student::requests(store, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging to the configured log file, or stderr
///
/// Level comes from RUST_LOG, defaulting to warnings only.
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(log_path) = config.log_file.as_ref() else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_storage_hint_found_through_context() {
        let err = anyhow::Error::new(StorageError::InvalidFormat {
            key: "hostel_app_v1".to_string(),
            details: "expected value".to_string(),
        })
        .context("Failed to read hostel document");

        assert!(storage_hint(&err).is_some());
    }

    #[test]
    fn test_storage_hint_absent() {
        let err = anyhow::anyhow!("Hostel not found: X-1000");
        assert!(storage_hint(&err).is_none());

        let err = anyhow::Error::new(StorageError::NotFound {
            path: PathBuf::from("/data/hostel_app_v1.json"),
        });
        assert!(storage_hint(&err).is_none());
    }

    #[test]
    fn test_requests_list_parses() {
        let cli = Cli::try_parse_from(["hostel", "requests", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Requests {
                command: Some(RequestCommands::List)
            }
        ));

        let cli = Cli::try_parse_from(["hostel", "requests"]).unwrap();
        assert!(matches!(cli.command, Commands::Requests { command: None }));
    }
}
