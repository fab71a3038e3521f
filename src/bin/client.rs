//! Exercise client binary
//!
//! Run with: cargo run --bin exercise-client -- --help

use anyhow::{anyhow, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rpc_exercises::bank::AccountClient;
use rpc_exercises::calculator::CalculatorClient;
use rpc_exercises::calculator_pro::{ProCalculatorClient, ProEndpoints};
use rpc_exercises::client::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT};
use rpc_exercises::guessing_game::GameClient;
use rpc_exercises::printer::PrinterClient;
use rpc_exercises::protocol::{Operands, Operation};
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(name = "exercise-client")]
#[command(about = "Client side of the RPC exercises")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug)]
struct Endpoint {
    /// Server host name or IP address (e.g. 192.168.1.140)
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(long, short, default_value_t = DEFAULT_PORT)]
    port: u16,
}

impl Endpoint {
    fn config(&self) -> ClientConfig {
        ClientConfig::new(self.host.clone(), self.port)
    }
}

#[derive(ClapArgs, Debug)]
struct Numbers {
    /// First number (prompted for when missing)
    #[arg(long, allow_hyphen_values = true)]
    num1: Option<f64>,

    /// Second number (prompted for when missing)
    #[arg(long, allow_hyphen_values = true)]
    num2: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a text to the printer
    Printer {
        #[command(flatten)]
        endpoint: Endpoint,
        /// Read the text to print from the terminal
        #[arg(long, short)]
        text: bool,
        /// Text to print when not reading from the terminal
        #[arg(long, default_value = "Hello world!")]
        message: String,
    },
    /// Run all four operations on the calculator
    Calculator {
        #[command(flatten)]
        endpoint: Endpoint,
        #[command(flatten)]
        numbers: Numbers,
    },
    /// Run all four operations on the split calculator
    CalculatorPro {
        /// Host of the add/sub service, optionally followed by the mul/div host
        #[arg(long, num_args = 1..=2)]
        host: Vec<String>,
        /// Port of the add/sub service, optionally followed by the mul/div port
        /// (defaults to the next port)
        #[arg(long, short, num_args = 1..=2)]
        port: Vec<u16>,
        #[command(flatten)]
        numbers: Numbers,
    },
    /// Operate a bank account
    Bank {
        #[command(flatten)]
        endpoint: Endpoint,
    },
    /// Play the number guessing game
    GuessingGame {
        #[command(flatten)]
        endpoint: Endpoint,
    },
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout();
    print!("{}", message);
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(anyhow!("Input closed"));
    }
    Ok(line.trim().to_string())
}

fn prompt_number<T: std::str::FromStr>(message: &str) -> Result<T> {
    loop {
        let line = prompt(message)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("'{}' is not a valid number", line),
        }
    }
}

fn read_operands(numbers: &Numbers) -> Result<Operands> {
    match (numbers.num1, numbers.num2) {
        (Some(a), Some(b)) => Ok(Operands::new(a, b)),
        _ => Ok(Operands::new(
            prompt_number("Enter the first number: ")?,
            prompt_number("Enter the second number: ")?,
        )),
    }
}

fn print_result(op: Operation, result: Result<f64, rpc_exercises::ClientError>) {
    match result {
        Ok(value) => println!("Result of {}.: {}", op, value),
        Err(e) => println!("Result of {}.: error: {}", op, e),
    }
}

async fn cmd_printer(endpoint: &Endpoint, read_text: bool, message: &str) -> Result<()> {
    let text = if read_text {
        prompt("Enter the text to be sent to the printer: ")?
    } else {
        message.to_string()
    };

    println!("Host: {} (connecting port: {})", endpoint.host, endpoint.port);
    let client = PrinterClient::connect(&endpoint.config()).await?;
    client.print_string(&text).await?;
    println!("Text sent correctly to the printer!");
    Ok(())
}

async fn cmd_calculator(endpoint: &Endpoint, numbers: &Numbers) -> Result<()> {
    let operands = read_operands(numbers)?;

    println!("Host: {} (connecting port: {})", endpoint.host, endpoint.port);
    let client = CalculatorClient::connect(&endpoint.config()).await?;
    for op in Operation::ALL {
        print_result(op, client.call(op, operands).await);
    }
    Ok(())
}

async fn cmd_calculator_pro(hosts: &[String], ports: &[u16], numbers: &Numbers) -> Result<()> {
    let endpoints = ProEndpoints::resolve(hosts, ports)?;
    let operands = read_operands(numbers)?;

    println!(
        "Hosts: ({}, {}) (connecting ports: ({}, {}))",
        endpoints.add_sub.host, endpoints.mul_div.host, endpoints.add_sub.port, endpoints.mul_div.port
    );
    let client = ProCalculatorClient::connect(&endpoints).await?;
    for op in Operation::ALL {
        print_result(op, client.call(op, operands).await);
    }
    Ok(())
}

async fn cmd_bank(endpoint: &Endpoint) -> Result<()> {
    println!("Host: {} (connecting port: {})", endpoint.host, endpoint.port);
    let account = AccountClient::connect(&endpoint.config()).await?;

    loop {
        println!();
        let option = prompt(
            "Enter operation (1: Get current balance, 2: Deposit, 3: Withdraw, \
             4: Shutdown server and exit): ",
        )?;

        match option.as_str() {
            "1" => println!("Current balance: {}", account.balance().await?),
            "2" => {
                let amount: f64 = prompt_number("Enter amount to deposit: ")?;
                match account.deposit(amount).await {
                    Ok(()) => println!("Deposit successful"),
                    Err(e) => println!("Deposit failed: {}", e),
                }
            }
            "3" => {
                let amount: f64 = prompt_number("Enter amount to withdraw: ")?;
                match account.withdraw(amount).await {
                    Ok(()) => println!("Withdrawal successful"),
                    Err(e) => println!("Withdrawal failed: {}", e),
                }
            }
            "4" => {
                println!("Shutting down the server and exiting");
                account.shutdown().await?;
                return Ok(());
            }
            _ => println!("Invalid option. Please try again."),
        }
    }
}

async fn cmd_guessing_game(endpoint: &Endpoint) -> Result<()> {
    println!("Host: {} (connecting port: {})", endpoint.host, endpoint.port);
    println!();
    let game = GameClient::connect(&endpoint.config()).await?;

    loop {
        let guess: i32 = prompt_number("Enter your guess from 1 to 100 (or 0 to quit): ")?;
        if guess == 0 {
            break;
        }

        let outcome = game.check_guess(guess).await?;
        println!("{}", outcome);
        if outcome.is_correct() {
            break;
        }
    }

    println!();
    println!("Quitting the game.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    match &args.command {
        Commands::Printer {
            endpoint,
            text,
            message,
        } => cmd_printer(endpoint, *text, message).await?,
        Commands::Calculator { endpoint, numbers } => cmd_calculator(endpoint, numbers).await?,
        Commands::CalculatorPro {
            host,
            port,
            numbers,
        } => cmd_calculator_pro(host, port, numbers).await?,
        Commands::Bank { endpoint } => cmd_bank(endpoint).await?,
        Commands::GuessingGame { endpoint } => cmd_guessing_game(endpoint).await?,
    }

    Ok(())
}
