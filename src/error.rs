//! Error types shared by servants and client wrappers.

use thiserror::Error;
use tonic::{Code, Status};

/// Requests a servant refuses to carry out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExerciseError {
    #[error("division by zero: {dividend} / 0")]
    DivisionByZero { dividend: f64 },

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("deposit of {amount} would overflow balance {balance}")]
    BalanceOverflow { balance: f64, amount: f64 },
}

impl From<ExerciseError> for Status {
    fn from(err: ExerciseError) -> Self {
        match err {
            ExerciseError::DivisionByZero { .. }
            | ExerciseError::InvalidAmount(_)
            | ExerciseError::BalanceOverflow { .. } => Status::invalid_argument(err.to_string()),
            ExerciseError::InsufficientFunds { .. } => {
                Status::failed_precondition(err.to_string())
            }
        }
    }
}

/// Failures seen by a client wrapper.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint could not be reached, so no proxy was obtained.
    #[error("invalid proxy for {uri}: {source}")]
    Connect {
        uri: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("invalid endpoint {0}")]
    InvalidEndpoint(String),

    /// The servant refused the request.
    #[error("rejected by server: {0}")]
    Rejected(String),

    #[error("transport failure ({code}): {message}")]
    Transport { code: Code, message: String },

    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::InvalidArgument | Code::FailedPrecondition => {
                ClientError::Rejected(status.message().to_string())
            }
            code => ClientError::Transport {
                code,
                message: status.message().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let status: Status = ExerciseError::DivisionByZero { dividend: 1.0 }.into();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status: Status = ExerciseError::InsufficientFunds {
            requested: 10.0,
            available: 5.0,
        }
        .into();
        assert_eq!(status.code(), Code::FailedPrecondition);
        assert!(status.message().contains("insufficient funds"));

        let status: Status = ExerciseError::InvalidAmount(-1.0).into();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status: Status = ExerciseError::BalanceOverflow {
            balance: f64::MAX,
            amount: f64::MAX,
        }
        .into();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[test]
    fn test_status_maps_back_to_client_error() {
        let err: ClientError = Status::failed_precondition("insufficient funds").into();
        assert!(matches!(err, ClientError::Rejected(ref msg) if msg == "insufficient funds"));

        let err: ClientError = Status::unavailable("connection reset").into();
        assert!(matches!(
            err,
            ClientError::Transport {
                code: Code::Unavailable,
                ..
            }
        ));
    }
}
