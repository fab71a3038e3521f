//! RPC exercises - Main entry point
//!
//! Five small client/server exercises on top of gRPC. Each exercise declares a
//! remote interface in `proto/`, a servant implementing it on the server, and
//! a proxy the client calls through.
//!
//! ## Exercises
//!
//! - printer: the server prints the strings it receives
//! - calculator: add, subtract, multiply and divide on one service
//! - calculator-pro: the same operations split over two services
//! - bank: deposit, withdraw and balance on one account
//! - guessing-game: guess the number the server picked
//!
//! ## Usage
//!
//! Start a server:
//! ```bash
//! cargo run --bin exercise-server -- calculator --port 10000
//! ```
//!
//! Run the matching client:
//! ```bash
//! cargo run --bin exercise-client -- calculator --num1 6 --num2 3
//! ```

fn main() {
    println!("RPC exercises");
    println!();
    println!("Use the following binaries:");
    println!("  cargo run --bin exercise-server -- --help");
    println!("  cargo run --bin exercise-client -- --help");
}
