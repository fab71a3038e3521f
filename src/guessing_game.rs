//! Number guessing game
//!
//! The server draws one target when the servant is created and keeps it for
//! the rest of the session.

use crate::client::{connect_channel, ClientConfig};
use crate::error::ClientError;
use crate::pb::guessing_game::game_service_client::GameServiceClient;
use crate::pb::guessing_game::game_service_server::{GameService, GameServiceServer};
use crate::pb::guessing_game::{GuessReply, GuessRequest, Outcome};
use crate::protocol::GuessOutcome;
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

/// Range the target is drawn from
pub const TARGET_RANGE: RangeInclusive<i32> = 1..=100;

/// Game servant
#[derive(Debug)]
pub struct Game {
    target: i32,
    attempts: AtomicU64,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Start a session with a random target
    pub fn new() -> Self {
        Self::with_target(rand::rng().random_range(TARGET_RANGE))
    }

    pub fn with_target(target: i32) -> Self {
        tracing::debug!("New game session");
        Self {
            target,
            attempts: AtomicU64::new(0),
        }
    }

    pub fn check_guess(&self, guess: i32) -> GuessOutcome {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;

        let outcome = match guess.cmp(&self.target) {
            std::cmp::Ordering::Greater => GuessOutcome::Higher,
            std::cmp::Ordering::Less => GuessOutcome::Lower,
            std::cmp::Ordering::Equal => GuessOutcome::Correct,
        };

        if outcome.is_correct() {
            tracing::info!(
                "You won! The correct number was {} indeed ({} attempts)",
                self.target,
                attempt
            );
        } else {
            tracing::debug!("Guess {} (attempt {}): {:?}", guess, attempt, outcome);
        }
        outcome
    }

    /// Number of guesses checked so far
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Get the gRPC service for this servant
    pub fn into_service(self) -> GameServiceServer<GameServiceImpl> {
        GameServiceServer::new(GameServiceImpl {
            inner: Arc::new(self),
        })
    }
}

/// gRPC service implementation wrapper
pub struct GameServiceImpl {
    inner: Arc<Game>,
}

#[tonic::async_trait]
impl GameService for GameServiceImpl {
    async fn check_guess(
        &self,
        request: Request<GuessRequest>,
    ) -> Result<Response<GuessReply>, Status> {
        let outcome = self.inner.check_guess(request.into_inner().guess);
        Ok(Response::new(GuessReply {
            outcome: Outcome::from(outcome) as i32,
            message: outcome.message().to_string(),
        }))
    }
}

/// Game proxy
#[derive(Clone)]
pub struct GameClient {
    inner: GameServiceClient<Channel>,
}

impl GameClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let channel = connect_channel(config).await?;
        Ok(Self {
            inner: GameServiceClient::new(channel),
        })
    }

    pub async fn check_guess(&self, guess: i32) -> Result<GuessOutcome, ClientError> {
        let mut client = self.inner.clone();
        let reply = client.check_guess(GuessRequest { guess }).await?.into_inner();

        GuessOutcome::from_wire(reply.outcome).ok_or_else(|| {
            ClientError::MalformedReply(format!("unknown guess outcome {}", reply.outcome))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_target_in_range() {
        for _ in 0..50 {
            let game = Game::new();
            assert!(TARGET_RANGE.contains(&game.target));
        }
    }

    #[test]
    fn test_check_guess() {
        let game = Game::with_target(42);
        assert_eq!(game.check_guess(50), GuessOutcome::Higher);
        assert_eq!(game.check_guess(1), GuessOutcome::Lower);
        assert_eq!(game.check_guess(42), GuessOutcome::Correct);
        assert_eq!(game.attempts(), 3);

        // The target stays the same after a win
        assert_eq!(game.check_guess(42), GuessOutcome::Correct);
    }

    #[test]
    fn test_out_of_range_guesses_are_compared() {
        let game = Game::with_target(1);
        assert_eq!(game.check_guess(0), GuessOutcome::Lower);
        assert_eq!(game.check_guess(-7), GuessOutcome::Lower);
        assert_eq!(game.check_guess(i32::MAX), GuessOutcome::Higher);
    }

    #[tokio::test]
    async fn test_service_reply_carries_message() {
        let service = GameServiceImpl {
            inner: Arc::new(Game::with_target(10)),
        };

        let reply = service
            .check_guess(Request::new(GuessRequest { guess: 11 }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(reply.outcome, Outcome::Higher as i32);
        assert_eq!(reply.message, "Your guess is HIGHER than the target number!");
    }
}
