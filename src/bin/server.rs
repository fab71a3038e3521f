//! Exercise server binary
//!
//! Run with: cargo run --bin exercise-server -- --help

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rpc_exercises::calculator_pro::ProRole;
use rpc_exercises::server::{run_server, Exercise, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "exercise-server")]
#[command(about = "Server side of the RPC exercises")]
struct Args {
    /// Listening port
    #[arg(long, short, default_value = "10000", global = true)]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0", global = true)]
    bind: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Number of worker threads for processing requests
    #[arg(long, default_value = "2", global = true)]
    worker_threads: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every received string
    Printer,
    /// Four-function calculator
    Calculator,
    /// Split calculator (add/sub and mul/div services)
    CalculatorPro {
        /// Services hosted by this process
        #[arg(long, value_enum, default_value_t = Role::Both)]
        role: Role,
    },
    /// Single bank account
    Bank,
    /// Number guessing game
    GuessingGame,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Role {
    AddSub,
    MulDiv,
    Both,
}

impl From<Role> for ProRole {
    fn from(role: Role) -> Self {
        match role {
            Role::AddSub => ProRole::AddSub,
            Role::MulDiv => ProRole::MulDiv,
            Role::Both => ProRole::Both,
        }
    }
}

fn listen_addr(bind: &str, port: u16) -> String {
    if bind.contains(':') && !bind.starts_with('[') {
        format!("[{}]:{}", bind, port)
    } else {
        format!("{}:{}", bind, port)
    }
}

async fn run_with_config(args: Args) -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    let exercise = match args.command {
        Commands::Printer => Exercise::Printer,
        Commands::Calculator => Exercise::Calculator,
        Commands::CalculatorPro { role } => Exercise::CalculatorPro(role.into()),
        Commands::Bank => Exercise::Bank,
        Commands::GuessingGame => Exercise::GuessingGame,
    };

    let config = ServerConfig {
        listen_addr: listen_addr(&args.bind, args.port),
    };

    tracing::info!("=== Exercise Server Configuration ===");
    tracing::info!("Exercise: {}", exercise.name());
    tracing::info!("Listening port: {}", args.port);
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Worker threads: {}", args.worker_threads);
    tracing::info!("=====================================");

    run_server(config, exercise).await
}

fn main() -> Result<()> {
    let args = Args::parse();
    let worker_threads = args.worker_threads;

    // Build tokio runtime with specified number of worker threads
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?
        .block_on(run_with_config(args))
}
