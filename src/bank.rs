//! Bank account exercise
//!
//! One account per server. Besides the account operations the service can ask
//! its hosting server to shut down.

use crate::client::{connect_channel, ClientConfig};
use crate::error::{ClientError, ExerciseError};
use crate::pb::bank::account_service_client::AccountServiceClient;
use crate::pb::bank::account_service_server::{AccountService, AccountServiceServer};
use crate::pb::bank::{
    AccountReply, AmountRequest, BalanceReply, BalanceRequest, ShutdownReply, ShutdownRequest,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

/// Account servant
#[derive(Debug)]
pub struct Account {
    balance: Mutex<f64>,
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

impl Account {
    /// Open an empty account
    pub fn new() -> Self {
        tracing::info!("Bank account successfully opened");
        Self {
            balance: Mutex::new(0.0),
        }
    }

    pub fn balance(&self) -> f64 {
        let balance = *self.balance.lock();
        tracing::debug!("Current balance retrieved: {}", balance);
        balance
    }

    /// Add `amount` and return the new balance.
    ///
    /// Fails when the new balance would not be finite; the balance is left untouched.
    pub fn deposit(&self, amount: f64) -> Result<f64, ExerciseError> {
        validate_amount(amount)?;

        let mut balance = self.balance.lock();
        let updated = *balance + amount;
        if !updated.is_finite() {
            tracing::warn!("Deposit of {} refused, balance {}", amount, *balance);
            return Err(ExerciseError::BalanceOverflow {
                balance: *balance,
                amount,
            });
        }
        *balance = updated;
        tracing::info!("Deposit of {} completed, balance {}", amount, *balance);
        Ok(*balance)
    }

    /// Take `amount` out and return the new balance.
    ///
    /// Fails when `amount` exceeds the balance; the balance is left untouched.
    pub fn withdraw(&self, amount: f64) -> Result<f64, ExerciseError> {
        validate_amount(amount)?;

        let mut balance = self.balance.lock();
        if amount > *balance {
            tracing::warn!("Withdrawal of {} refused, balance {}", amount, *balance);
            return Err(ExerciseError::InsufficientFunds {
                requested: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        tracing::info!("Withdrawal of {} completed, balance {}", amount, *balance);
        Ok(*balance)
    }

    /// Get the gRPC service for this servant. `shutdown` is notified when a
    /// client asks the server to stop.
    pub fn into_service(self, shutdown: Arc<Notify>) -> AccountServiceServer<AccountServiceImpl> {
        AccountServiceImpl::new(Arc::new(self), shutdown).into_server()
    }
}

fn validate_amount(amount: f64) -> Result<(), ExerciseError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ExerciseError::InvalidAmount(amount));
    }
    Ok(())
}

/// gRPC service implementation wrapper
pub struct AccountServiceImpl {
    inner: Arc<Account>,
    shutdown: Arc<Notify>,
}

impl AccountServiceImpl {
    pub fn new(inner: Arc<Account>, shutdown: Arc<Notify>) -> Self {
        Self { inner, shutdown }
    }

    pub fn into_server(self) -> AccountServiceServer<Self> {
        AccountServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl AccountService for AccountServiceImpl {
    async fn deposit(
        &self,
        request: Request<AmountRequest>,
    ) -> Result<Response<AccountReply>, Status> {
        self.inner.deposit(request.into_inner().amount)?;
        Ok(Response::new(AccountReply {}))
    }

    async fn withdraw(
        &self,
        request: Request<AmountRequest>,
    ) -> Result<Response<AccountReply>, Status> {
        self.inner.withdraw(request.into_inner().amount)?;
        Ok(Response::new(AccountReply {}))
    }

    async fn get_balance(
        &self,
        _request: Request<BalanceRequest>,
    ) -> Result<Response<BalanceReply>, Status> {
        Ok(Response::new(BalanceReply {
            balance: self.inner.balance(),
        }))
    }

    async fn shutdown(
        &self,
        _request: Request<ShutdownRequest>,
    ) -> Result<Response<ShutdownReply>, Status> {
        tracing::info!("Shutdown requested by client");
        // notify_one keeps a permit if the server is not waiting yet
        self.shutdown.notify_one();
        Ok(Response::new(ShutdownReply {}))
    }
}

/// Account proxy
#[derive(Clone)]
pub struct AccountClient {
    inner: AccountServiceClient<Channel>,
}

impl AccountClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let channel = connect_channel(config).await?;
        Ok(Self {
            inner: AccountServiceClient::new(channel),
        })
    }

    pub async fn deposit(&self, amount: f64) -> Result<(), ClientError> {
        let mut client = self.inner.clone();
        client.deposit(AmountRequest { amount }).await?;
        Ok(())
    }

    pub async fn withdraw(&self, amount: f64) -> Result<(), ClientError> {
        let mut client = self.inner.clone();
        client.withdraw(AmountRequest { amount }).await?;
        Ok(())
    }

    pub async fn balance(&self) -> Result<f64, ClientError> {
        let mut client = self.inner.clone();
        let response = client.get_balance(BalanceRequest {}).await?;
        Ok(response.into_inner().balance)
    }

    /// Ask the server hosting the account to stop
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        let mut client = self.inner.clone();
        client.shutdown(ShutdownRequest {}).await?;
        Ok(())
    }
}
