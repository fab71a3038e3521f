//! Calculator split across two services
//!
//! `AddSubService` and `MulDivService` are independent single-purpose servants.
//! They can share one server or run on separate endpoints; the client holds one
//! proxy per service and routes each operation to its owner.

use crate::calculator::Calculator;
use crate::client::{connect_channel, ClientConfig, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{ClientError, ExerciseError};
use crate::pb::calculator_pro::add_sub_service_client::AddSubServiceClient;
use crate::pb::calculator_pro::add_sub_service_server::{AddSubService, AddSubServiceServer};
use crate::pb::calculator_pro::mul_div_service_client::MulDivServiceClient;
use crate::pb::calculator_pro::mul_div_service_server::{MulDivService, MulDivServiceServer};
use crate::pb::calculator_pro::{OperandsRequest, ResultReply};
use crate::protocol::{Operands, Operation};
use anyhow::{anyhow, Result};
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

/// Which half (or both halves) of the calculator a server hosts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProRole {
    AddSub,
    MulDiv,
    Both,
}

impl ProRole {
    pub fn serves_add_sub(self) -> bool {
        matches!(self, ProRole::AddSub | ProRole::Both)
    }

    pub fn serves_mul_div(self) -> bool {
        matches!(self, ProRole::MulDiv | ProRole::Both)
    }
}

/// Servant for addition and subtraction
#[derive(Debug, Default, Clone, Copy)]
pub struct AddSub {
    calculator: Calculator,
}

impl AddSub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, operands: Operands) -> Result<f64, ExerciseError> {
        self.calculator.evaluate(Operation::Add, operands)
    }

    pub fn subtract(&self, operands: Operands) -> Result<f64, ExerciseError> {
        self.calculator.evaluate(Operation::Subtract, operands)
    }

    pub fn into_service(self) -> AddSubServiceServer<Self> {
        AddSubServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl AddSubService for AddSub {
    async fn add(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        let result = AddSub::add(self, request.into_inner().into())?;
        Ok(Response::new(ResultReply { result }))
    }

    async fn subtract(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        let result = AddSub::subtract(self, request.into_inner().into())?;
        Ok(Response::new(ResultReply { result }))
    }
}

/// Servant for multiplication and division
#[derive(Debug, Default, Clone, Copy)]
pub struct MulDiv {
    calculator: Calculator,
}

impl MulDiv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multiply(&self, operands: Operands) -> Result<f64, ExerciseError> {
        self.calculator.evaluate(Operation::Multiply, operands)
    }

    pub fn divide(&self, operands: Operands) -> Result<f64, ExerciseError> {
        self.calculator.evaluate(Operation::Divide, operands)
    }

    pub fn into_service(self) -> MulDivServiceServer<Self> {
        MulDivServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl MulDivService for MulDiv {
    async fn multiply(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        let result = MulDiv::multiply(self, request.into_inner().into())?;
        Ok(Response::new(ResultReply { result }))
    }

    async fn divide(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultReply>, Status> {
        let result = MulDiv::divide(self, request.into_inner().into())?;
        Ok(Response::new(ResultReply { result }))
    }
}

/// Endpoints of the two services as seen by a client
#[derive(Clone, Debug)]
pub struct ProEndpoints {
    pub add_sub: ClientConfig,
    pub mul_div: ClientConfig,
}

impl ProEndpoints {
    /// Resolve up to two hosts and two ports into one endpoint per service.
    ///
    /// A single host serves both services. A single port `p` places AddSub on
    /// `p` and MulDiv on `p + 1`; no port at all starts from the default port.
    pub fn resolve(hosts: &[String], ports: &[u16]) -> Result<Self> {
        let (add_sub_host, mul_div_host) = match hosts {
            [] => (DEFAULT_HOST.to_string(), DEFAULT_HOST.to_string()),
            [host] => (host.clone(), host.clone()),
            [first, second] => (first.clone(), second.clone()),
            _ => return Err(anyhow!("At most two hosts can be given, got {}", hosts.len())),
        };

        let (add_sub_port, mul_div_port) = match ports {
            [] => (DEFAULT_PORT, next_port(DEFAULT_PORT)?),
            [port] => (*port, next_port(*port)?),
            [first, second] => (*first, *second),
            _ => return Err(anyhow!("At most two ports can be given, got {}", ports.len())),
        };

        Ok(Self {
            add_sub: ClientConfig::new(add_sub_host, add_sub_port),
            mul_div: ClientConfig::new(mul_div_host, mul_div_port),
        })
    }
}

fn next_port(port: u16) -> Result<u16> {
    port.checked_add(1)
        .ok_or_else(|| anyhow!("No port follows {}", port))
}

/// Pair of proxies for the split calculator
#[derive(Clone)]
pub struct ProCalculatorClient {
    add_sub: AddSubServiceClient<Channel>,
    mul_div: MulDivServiceClient<Channel>,
}

impl ProCalculatorClient {
    /// Connect to both services; fails if either proxy cannot be obtained
    pub async fn connect(endpoints: &ProEndpoints) -> Result<Self, ClientError> {
        let add_sub = connect_channel(&endpoints.add_sub).await?;
        let mul_div = connect_channel(&endpoints.mul_div).await?;
        Ok(Self {
            add_sub: AddSubServiceClient::new(add_sub),
            mul_div: MulDivServiceClient::new(mul_div),
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

    /// Route `op` to the service that owns it
    pub async fn call(&self, op: Operation, operands: Operands) -> Result<f64, ClientError> {
        let request: OperandsRequest = operands.into();

        let response = match op {
            Operation::Add => self.add_sub.clone().add(request).await?,
            Operation::Subtract => self.add_sub.clone().subtract(request).await?,
            Operation::Multiply => self.mul_div.clone().multiply(request).await?,
            Operation::Divide => self.mul_div.clone().divide(request).await?,
        };

        Ok(response.into_inner().result)
    }
}
