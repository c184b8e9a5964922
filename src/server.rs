//! WebSocket listener
//!
//! One task per connection; within a connection messages are handled
//! strictly in order, one reply per message.

use crate::dispatch::Dispatcher;
use crate::Result;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub struct BridgeServer {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
}

impl BridgeServer {
    pub async fn bind(addr: SocketAddr, dispatcher: Dispatcher) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        debug!("Bridge listener bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        info!("Bridge server listening on {:?}", self.listener.local_addr().ok());

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Bridge server shutting down");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let dispatcher = Arc::clone(&self.dispatcher);
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(stream, peer, dispatcher, shutdown).await {
                                warn!("Connection {} ended with error: {}", peer, e);
                            }
                        });
                    }
                    Err(e) => error!("Failed to accept connection: {}", e),
                },
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    shutdown: CancellationToken,
) -> Result<()> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("Client connected: {}", peer);

    let (mut sink, mut source) = ws_stream.split();

    loop {
        let message = tokio::select! {
            _ = shutdown.cancelled() => break,
            message = source.next() => match message {
                Some(message) => message?,
                None => break,
            },
        };

        let reply = match message {
            Message::Text(text) => dispatcher.dispatch(text.as_str()),
            Message::Binary(data) => dispatcher.dispatch_bytes(&data),
            Message::Close(_) => break,
            _ => continue,
        };

        sink.send(Message::Text(reply.to_text().into())).await?;
    }

    info!("Client disconnected: {}", peer);
    Ok(())
}
