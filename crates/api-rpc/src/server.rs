//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over HTTP. Binds to localhost unless configured otherwise.

use crate::handler::RpcHandler;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use walkin_core::application::QueueService;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register method {method}: {reason}")]
    Register { method: &'static str, reason: String },
}

/// Handle of a started server
pub struct RunningServer {
    pub addr: SocketAddr,
    pub handle: ServerHandle,
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

/// Register `$method` forwarding parsed params to `RpcHandler::$call`
macro_rules! register {
    ($module:expr, $handler:expr, $method:literal, $call:ident) => {{
        let handler = Arc::clone(&$handler);
        $module
            .register_async_method($method, move |params, _, _| {
                let handler = handler.clone();
                async move { handler.$call(params.parse()?).await }
            })
            .map_err(|e| ServerError::Register {
                method: $method,
                reason: e.to_string(),
            })?;
    }};
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<QueueService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Method table
    fn build_module(&self) -> Result<RpcModule<()>, ServerError> {
        let mut module = RpcModule::new(());

        register!(module, self.handler, "org.register.v1", register);
        register!(module, self.handler, "org.get.v1", get_organization);
        register!(module, self.handler, "org.entry_code.v1", entry_code);
        register!(module, self.handler, "queue.join.v1", join);
        register!(module, self.handler, "queue.status.v1", status);
        register!(module, self.handler, "queue.list.v1", list);
        register!(module, self.handler, "queue.serve.v1", serve);
        register!(module, self.handler, "queue.call_next.v1", call_next);
        register!(module, self.handler, "queue.begin_processing.v1", begin_processing);
        register!(module, self.handler, "queue.emergency.set.v1", set_emergency);
        register!(module, self.handler, "queue.emergency.get.v1", get_emergency);

        Ok(module)
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<RunningServer, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let module = self.build_module()?;

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = server.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

        let handle = server.start(module);
        info!(addr = %local_addr, "JSON-RPC server started successfully");

        Ok(RunningServer {
            addr: local_addr,
            handle,
        })
    }
}
