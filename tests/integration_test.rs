//! Integration tests for the RPC exercises

use rpc_exercises::bank::AccountClient;
use rpc_exercises::calculator::CalculatorClient;
use rpc_exercises::calculator_pro::{ProCalculatorClient, ProEndpoints, ProRole};
use rpc_exercises::client::ClientConfig;
use rpc_exercises::error::ClientError;
use rpc_exercises::guessing_game::{Game, GameClient};
use rpc_exercises::printer::{Printer, PrinterClient, PrinterServiceImpl};
use rpc_exercises::protocol::GuessOutcome;
use rpc_exercises::server::{run_server_with_shutdown, Exercise, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Find an available port for testing
fn find_available_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn client_config(port: u16) -> ClientConfig {
    ClientConfig::new("127.0.0.1", port)
}

/// Start `exercise` on a fresh port. Dropping the sender stops the server.
async fn start_exercise(
    exercise: Exercise,
    port: u16,
) -> (oneshot::Sender<()>, JoinHandle<anyhow::Result<()>>) {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let config = ServerConfig {
        listen_addr: format!("127.0.0.1:{}", port),
    };

    let handle = tokio::spawn(run_server_with_shutdown(config, exercise, async move {
        let _ = stop_rx.await;
    }));

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;
    (stop_tx, handle)
}

#[tokio::test]
async fn test_printer_round_trip() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rpc_exercises=debug")
        .try_init();

    let port = find_available_port();
    let printer = Arc::new(Printer::new());
    let service = PrinterServiceImpl::new(printer.clone()).into_server();
    let server_addr = format!("127.0.0.1:{}", port);

    let server_handle = tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(service)
            .serve(server_addr.parse().unwrap())
            .await
            .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = PrinterClient::connect(&client_config(port)).await.unwrap();
    client.print_string("Hello world!").await.unwrap();
    client.print_string("second line").await.unwrap();

    assert_eq!(
        printer.history(),
        vec!["Hello world!".to_string(), "second line".to_string()]
    );

    server_handle.abort();
}

#[tokio::test]
async fn test_printer_exercise_server() {
    let port = find_available_port();
    let (stop, handle) = start_exercise(Exercise::Printer, port).await;

    let client = PrinterClient::connect(&client_config(port)).await.unwrap();
    client.print_string("Hello world!").await.unwrap();
    client.print_string("").await.unwrap();

    drop(client);
    drop(stop);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_calculator_operations() {
    let port = find_available_port();
    let (stop, handle) = start_exercise(Exercise::Calculator, port).await;

    let client = CalculatorClient::connect(&client_config(port)).await.unwrap();
    assert_eq!(client.add(6.0, 3.0).await.unwrap(), 9.0);
    assert_eq!(client.subtract(6.0, 3.0).await.unwrap(), 3.0);
    assert_eq!(client.multiply(6.0, 3.0).await.unwrap(), 18.0);
    assert_eq!(client.divide(6.0, 3.0).await.unwrap(), 2.0);

    let err = client.divide(6.0, 0.0).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(ref msg) if msg.contains("division by zero")));

    // The servant keeps answering after a refusal
    assert_eq!(client.add(-1.5, 0.5).await.unwrap(), -1.0);

    drop(client);
    drop(stop);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_calculator_pro_single_server() {
    let port = find_available_port();
    let (stop, handle) = start_exercise(Exercise::CalculatorPro(ProRole::Both), port).await;

    let endpoints = ProEndpoints::resolve(&["127.0.0.1".to_string()], &[port, port]).unwrap();
    let client = ProCalculatorClient::connect(&endpoints).await.unwrap();

    assert_eq!(client.add(2.0, 3.0).await.unwrap(), 5.0);
    assert_eq!(client.subtract(2.0, 3.0).await.unwrap(), -1.0);
    assert_eq!(client.multiply(2.0, 3.0).await.unwrap(), 6.0);
    assert_eq!(client.divide(3.0, 2.0).await.unwrap(), 1.5);

    drop(client);
    drop(stop);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_calculator_pro_split_deployment() {
    let add_sub_port = find_available_port();
    let (stop_add_sub, add_sub_handle) =
        start_exercise(Exercise::CalculatorPro(ProRole::AddSub), add_sub_port).await;
    // Picked after the first server holds its port
    let mul_div_port = find_available_port();
    let (stop_mul_div, mul_div_handle) =
        start_exercise(Exercise::CalculatorPro(ProRole::MulDiv), mul_div_port).await;

    let endpoints = ProEndpoints::resolve(
        &["127.0.0.1".to_string(), "127.0.0.1".to_string()],
        &[add_sub_port, mul_div_port],
    )
    .unwrap();
    let client = ProCalculatorClient::connect(&endpoints).await.unwrap();

    assert_eq!(client.add(10.0, 4.0).await.unwrap(), 14.0);
    assert_eq!(client.multiply(10.0, 4.0).await.unwrap(), 40.0);
    assert!(client.divide(10.0, 0.0).await.is_err());
    drop(client);

    // Pointing both proxies at the add/sub server leaves mul/div unserved
    let crossed = ProEndpoints::resolve(
        &["127.0.0.1".to_string()],
        &[add_sub_port, add_sub_port],
    )
    .unwrap();
    let crossed_client = ProCalculatorClient::connect(&crossed).await.unwrap();
    let err = crossed_client.multiply(1.0, 1.0).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport {
            code: tonic::Code::Unimplemented,
            ..
        }
    ));

    drop(crossed_client);
    drop(stop_add_sub);
    drop(stop_mul_div);
    add_sub_handle.await.unwrap().unwrap();
    mul_div_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bank_account_and_shutdown() {
    let port = find_available_port();
    let (_stop, handle) = start_exercise(Exercise::Bank, port).await;

    let account = AccountClient::connect(&client_config(port)).await.unwrap();
    assert_eq!(account.balance().await.unwrap(), 0.0);

    account.deposit(100.0).await.unwrap();
    account.withdraw(40.0).await.unwrap();
    assert_eq!(account.balance().await.unwrap(), 60.0);

    let err = account.withdraw(60.5).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(ref msg) if msg.contains("insufficient funds")));
    assert_eq!(account.balance().await.unwrap(), 60.0);

    // The server stops on its own after a shutdown request
    account.shutdown().await.unwrap();
    drop(account);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop after shutdown")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_guessing_game_binary_search() {
    let port = find_available_port();
    let service = Game::with_target(73).into_service();
    let server_addr = format!("127.0.0.1:{}", port);

    let server_handle = tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(service)
            .serve(server_addr.parse().unwrap())
            .await
            .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let game = GameClient::connect(&client_config(port)).await.unwrap();

    let (mut low, mut high) = (1, 100);
    let mut guesses = 0;
    loop {
        let guess = (low + high) / 2;
        guesses += 1;
        match game.check_guess(guess).await.unwrap() {
            GuessOutcome::Correct => {
                assert_eq!(guess, 73);
                break;
            }
            GuessOutcome::Higher => high = guess - 1,
            GuessOutcome::Lower => low = guess + 1,
        }
        assert!(guesses <= 7, "binary search over 1..=100 takes at most 7 guesses");
    }

    server_handle.abort();
}

#[tokio::test]
async fn test_guessing_game_exercise_server() {
    let port = find_available_port();
    let (stop, handle) = start_exercise(Exercise::GuessingGame, port).await;

    let game = GameClient::connect(&client_config(port)).await.unwrap();

    // The target is random; a binary search still finds it in 7 guesses
    let (mut low, mut high) = (1, 100);
    let mut guesses = 0;
    let target = loop {
        let guess = (low + high) / 2;
        guesses += 1;
        match game.check_guess(guess).await.unwrap() {
            GuessOutcome::Correct => break guess,
            GuessOutcome::Higher => high = guess - 1,
            GuessOutcome::Lower => low = guess + 1,
        }
        assert!(guesses <= 7, "binary search over 1..=100 takes at most 7 guesses");
    };
    assert!((1..=100).contains(&target));

    // The target stays fixed for the lifetime of the server
    assert_eq!(game.check_guess(target).await.unwrap(), GuessOutcome::Correct);

    drop(game);
    drop(stop);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_connect_without_server_fails() {
    let port = find_available_port();
    let result = CalculatorClient::connect(&client_config(port)).await;
    assert!(matches!(result, Err(ClientError::Connect { .. })));
}
