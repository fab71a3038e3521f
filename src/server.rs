//! Exercise server
//!
//! Binds the servants of one exercise to a listen address and serves them
//! until Ctrl-C, an external shutdown signal, or a servant-initiated shutdown.

use crate::bank::Account;
use crate::calculator::Calculator;
use crate::calculator_pro::{AddSub, MulDiv, ProRole};
use crate::guessing_game::Game;
use crate::printer::Printer;
use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;
use tonic::transport::server::Router;
use tonic::transport::Server;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// gRPC listen address
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:10000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Listen on all interfaces at `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", port),
        }
    }
}

/// Which exercise a server hosts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exercise {
    Printer,
    Calculator,
    CalculatorPro(ProRole),
    Bank,
    GuessingGame,
}

impl Exercise {
    pub fn name(&self) -> &'static str {
        match self {
            Exercise::Printer => "printer",
            Exercise::Calculator => "calculator",
            Exercise::CalculatorPro(ProRole::AddSub) => "calculator-pro (add/sub)",
            Exercise::CalculatorPro(ProRole::MulDiv) => "calculator-pro (mul/div)",
            Exercise::CalculatorPro(ProRole::Both) => "calculator-pro",
            Exercise::Bank => "bank",
            Exercise::GuessingGame => "guessing-game",
        }
    }

    /// Create the servants and add their services to a new router.
    /// `shutdown` is handed to servants that may stop the server.
    fn build_router(self, shutdown: Arc<Notify>) -> Router {
        let mut builder = Server::builder();
        match self {
            Exercise::Printer => builder.add_service(Printer::new().into_service()),
            Exercise::Calculator => builder.add_service(Calculator::new().into_service()),
            Exercise::CalculatorPro(role) => builder
                .add_optional_service(role.serves_add_sub().then(|| AddSub::new().into_service()))
                .add_optional_service(role.serves_mul_div().then(|| MulDiv::new().into_service())),
            Exercise::Bank => builder.add_service(Account::new().into_service(shutdown)),
            Exercise::GuessingGame => builder.add_service(Game::new().into_service()),
        }
    }
}

/// Run the server until Ctrl-C or a servant-initiated shutdown
pub async fn run_server(config: ServerConfig, exercise: Exercise) -> Result<()> {
    run_server_with_shutdown(config, exercise, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Run the server until `signal` resolves or a servant-initiated shutdown
pub async fn run_server_with_shutdown<F>(
    config: ServerConfig,
    exercise: Exercise,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr))?;

    let shutdown = Arc::new(Notify::new());
    let router = exercise.build_router(shutdown.clone());

    tracing::info!("Starting {} server on {}", exercise.name(), addr);

    router
        .serve_with_shutdown(addr, async move {
            tokio::select! {
                _ = signal => tracing::info!("Shutdown signal received"),
                _ = shutdown.notified() => tracing::info!("Shutdown requested by servant"),
            }
        })
        .await
        .with_context(|| format!("{} server on {} failed", exercise.name(), addr))?;

    tracing::info!("{} server stopped", exercise.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:10000");
        assert_eq!(ServerConfig::with_port(10001).listen_addr, "0.0.0.0:10001");
    }

    #[tokio::test]
    async fn test_invalid_listen_addr() {
        let config = ServerConfig {
            listen_addr: "not an address".to_string(),
        };
        let result = run_server_with_shutdown(config, Exercise::Printer, async {}).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_exercise_names() {
        assert_eq!(Exercise::Bank.name(), "bank");
        assert_eq!(
            Exercise::CalculatorPro(ProRole::MulDiv).name(),
            "calculator-pro (mul/div)"
        );
    }
}
