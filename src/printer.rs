//! Printer exercise
//!
//! The servant prints every string it receives on the server console.

use crate::client::{connect_channel, ClientConfig};
use crate::error::ClientError;
use crate::pb::printer::printer_service_client::PrinterServiceClient;
use crate::pb::printer::printer_service_server::{PrinterService, PrinterServiceServer};
use crate::pb::printer::{PrintReply, PrintRequest};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

/// Number of printed strings a printer remembers
pub const HISTORY_CAPACITY: usize = 64;

/// Printer servant
#[derive(Debug)]
pub struct Printer {
    /// Most recently printed strings, oldest first, at most `capacity`
    history: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl Default for Printer {
    fn default() -> Self {
        Self::with_history_capacity(HISTORY_CAPACITY)
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Print the text on the console
    pub fn print_string(&self, text: &str) {
        println!("{}", text);
        tracing::debug!("Printed {} bytes", text.len());

        if self.capacity == 0 {
            return;
        }
        let mut history = self.history.lock();
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(text.to_string());
    }

    /// Most recently printed strings, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().iter().cloned().collect()
    }

    /// Get the gRPC service for this servant
    pub fn into_service(self) -> PrinterServiceServer<PrinterServiceImpl> {
        PrinterServiceImpl::new(Arc::new(self)).into_server()
    }
}

/// gRPC service implementation wrapper
pub struct PrinterServiceImpl {
    inner: Arc<Printer>,
}

impl PrinterServiceImpl {
    pub fn new(inner: Arc<Printer>) -> Self {
        Self { inner }
    }

    pub fn into_server(self) -> PrinterServiceServer<Self> {
        PrinterServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl PrinterService for PrinterServiceImpl {
    async fn print_string(
        &self,
        request: Request<PrintRequest>,
    ) -> Result<Response<PrintReply>, Status> {
        let req = request.into_inner();
        self.inner.print_string(&req.text);
        Ok(Response::new(PrintReply {}))
    }
}

/// Printer proxy
#[derive(Clone)]
pub struct PrinterClient {
    inner: PrinterServiceClient<Channel>,
}

impl PrinterClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let channel = connect_channel(config).await?;
        Ok(Self {
            inner: PrinterServiceClient::new(channel),
        })
    }

    /// Send text to the remote printer
    pub async fn print_string(&self, text: &str) -> Result<(), ClientError> {
        let mut client = self.inner.clone();
        client
            .print_string(PrintRequest {
                text: text.to_string(),
            })
            .await?;
        Ok(())
    }
}
