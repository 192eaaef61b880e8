use std::{io, net::SocketAddr, sync::Arc};

use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tracing::{error, info, instrument, Instrument};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::runtime::Orchestrator;
use crate::stats::StatsCollector;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Line-oriented TCP front end. Each connection gets its own task, which
/// reads one request, writes its response, and only then reads the next.
pub struct Server {
    listener: TcpListener,
    orchestrator: Arc<Orchestrator>,
    quit_command: Arc<str>,
}

impl Server {
    pub async fn bind(config: &ServerConfig) -> ServerResult<Self> {
        let address = config.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;
        let orchestrator = Orchestrator::new(config, Arc::new(StatsCollector::new()));
        info!(
            address = %listener.local_addr()?,
            workers = orchestrator.pool().size(),
            "server bound"
        );
        Ok(Self {
            listener,
            orchestrator: Arc::new(orchestrator),
            quit_command: config.quit_command.as_str().into(),
        })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Accepts connections until the task is dropped. Accept failures are
    /// logged and do not stop the loop.
    pub async fn run(self) -> ServerResult<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let orchestrator = self.orchestrator.clone();
                    let quit_command = self.quit_command.clone();
                    tokio::spawn(
                        async move {
                            if let Err(e) =
                                handle_connection(stream, &orchestrator, &quit_command).await
                            {
                                error!("connection failed: {}", e);
                            }
                        }
                        .in_current_span(),
                    );
                    info!(%peer, "client connected");
                }
                Err(e) => error!("accept failed: {}", e),
            }
        }
    }
}

#[instrument(
    skip(stream, orchestrator, quit_command),
    fields(connection_id = %Uuid::new_v4())
)]
async fn handle_connection(
    stream: TcpStream,
    orchestrator: &Orchestrator,
    quit_command: &str,
) -> ServerResult<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }
        // invalid UTF-8 is answered like any other malformed request
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(['\n', '\r']);
        if line == quit_command {
            info!("quit command received");
            break;
        }
        let response = orchestrator.handle(line).await;
        writer
            .write_all(format!("{}\n", response).as_bytes())
            .await?;
        writer.flush().await?;
    }

    info!("client disconnected");
    Ok(())
}
