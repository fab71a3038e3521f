//! Basic calculator exercise
//!
//! A single servant answers all four operations.

use crate::client::{connect_channel, ClientConfig};
use crate::error::{ClientError, ExerciseError};
use crate::pb::calculator::calculator_service_client::CalculatorServiceClient;
use crate::pb::calculator::calculator_service_server::{
    CalculatorService, CalculatorServiceServer,
};
use crate::pb::calculator::{OperandsRequest, ResultReply};
use crate::protocol::{Operands, Operation};
use std::sync::Arc;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

/// Calculator servant
#[derive(Debug, Default, Clone, Copy)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate one operation, tracing the full expression
    pub fn evaluate(&self, op: Operation, operands: Operands) -> Result<f64, ExerciseError> {
        match op.apply(operands) {
            Ok(result) => {
                tracing::info!("{} {} {} = {}", operands.a, op.symbol(), operands.b, result);
                Ok(result)
            }
            Err(e) => {
                tracing::warn!("{} {} {} refused: {}", operands.a, op.symbol(), operands.b, e);
                Err(e)
            }
        }
    }

    /// Get the gRPC service for this servant
    pub fn into_service(self) -> CalculatorServiceServer<CalculatorServiceImpl> {
        CalculatorServiceServer::new(CalculatorServiceImpl {
            inner: Arc::new(self),
        })
    }
}

/// gRPC service implementation wrapper
pub struct CalculatorServiceImpl {
    inner: Arc<Calculator>,
}

impl CalculatorServiceImpl {
    fn handle(
        &self,
        op: Operation,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        let operands: Operands = request.into_inner().into();
        let result = self.inner.evaluate(op, operands)?;
        Ok(Response::new(ResultReply { result }))
    }
}

#[tonic::async_trait]
impl CalculatorService for CalculatorServiceImpl {
    async fn add(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        self.handle(Operation::Add, request)
    }

    async fn subtract(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        self.handle(Operation::Subtract, request)
    }

    async fn multiply(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        self.handle(Operation::Multiply, request)
    }

    async fn divide(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        self.handle(Operation::Divide, request)
    }
}

/// Calculator proxy
#[derive(Clone)]
pub struct CalculatorClient {
    inner: CalculatorServiceClient<Channel>,
}

impl CalculatorClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let channel = connect_channel(config).await?;
        Ok(Self {
            inner: CalculatorServiceClient::new(channel),
        })
    }

    pub async fn add(&self, a: f64, b: f64) -> Result<f64, ClientError> {
        self.call(Operation::Add, Operands::new(a, b)).await
    }

    pub async fn subtract(&self, a: f64, b: f64) -> Result<f64, ClientError> {
        self.call(Operation::Subtract, Operands::new(a, b)).await
    }

    pub async fn multiply(&self, a: f64, b: f64) -> Result<f64, ClientError> {
        self.call(Operation::Multiply, Operands::new(a, b)).await
    }

    pub async fn divide(&self, a: f64, b: f64) -> Result<f64, ClientError> {
        self.call(Operation::Divide, Operands::new(a, b)).await
    }

    /// Invoke the remote method matching `op`
    pub async fn call(&self, op: Operation, operands: Operands) -> Result<f64, ClientError> {
        let mut client = self.inner.clone();
        let request: OperandsRequest = operands.into();

        let response = match op {
            Operation::Add => client.add(request).await?,
            Operation::Subtract => client.subtract(request).await?,
            Operation::Multiply => client.multiply(request).await?,
            Operation::Divide => client.divide(request).await?,
        };

        Ok(response.into_inner().result)
    }
}
