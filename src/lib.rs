pub mod bank;
pub mod calculator;
pub mod calculator_pro;
pub mod client;
pub mod error;
pub mod guessing_game;
pub mod printer;
pub mod protocol;
pub mod server;

// Re-export generated protobuf types
pub mod pb {
    pub mod printer {
        tonic::include_proto!("printer");
    }

    pub mod calculator {
        tonic::include_proto!("calculator");
    }

    pub mod calculator_pro {
        tonic::include_proto!("calculator_pro");
    }

    pub mod bank {
        tonic::include_proto!("bank");
    }

    pub mod guessing_game {
        tonic::include_proto!("guessing_game");
    }
}

pub use bank::{Account, AccountClient};
pub use calculator::{Calculator, CalculatorClient};
pub use calculator_pro::{AddSub, MulDiv, ProCalculatorClient, ProEndpoints, ProRole};
pub use client::ClientConfig;
pub use error::{ClientError, ExerciseError};
pub use guessing_game::{Game, GameClient};
pub use printer::{Printer, PrinterClient};
pub use protocol::{GuessOutcome, Operands, Operation};
pub use server::{Exercise, ServerConfig};
