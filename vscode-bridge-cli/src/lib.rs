//! Client side of vscode-bridge
//!
//! - `select_instance` - pick a bridge from the discovery registry
//! - `BridgeClient` - send command envelopes and read replies over WebSocket

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use vscode_bridge_proto::{CommandEnvelope, InstanceDescriptor, Reply};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed reply: {0}")]
    MalformedReply(#[from] serde_json::Error),

    #[error("Connection closed before a reply arrived")]
    Closed,

    #[error("No bridge instances are registered")]
    NoInstances,

    #[error("No bridge instance registered for pid {0}")]
    UnknownPid(u32),

    #[error("{0} bridge instances are registered; choose one with --pid")]
    Ambiguous(usize),
}

/// Choose the instance to talk to: the one for `pid`, or the only one registered
pub fn select_instance(
    instances: &[InstanceDescriptor],
    pid: Option<u32>,
) -> Result<&InstanceDescriptor, ClientError> {
    match pid {
        Some(pid) => instances
            .iter()
            .find(|instance| instance.process_id == pid)
            .ok_or(ClientError::UnknownPid(pid)),
        None => match instances {
            [] => Err(ClientError::NoInstances),
            [only] => Ok(only),
            many => Err(ClientError::Ambiguous(many.len())),
        },
    }
}

pub struct BridgeClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl BridgeClient {
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, _) = connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Send one command and wait for its reply
    pub async fn request(&mut self, envelope: &CommandEnvelope) -> Result<Reply, ClientError> {
        let text = serde_json::to_string(envelope)?;
        self.stream.send(Message::Text(text.into())).await?;

        while let Some(message) = self.stream.next().await {
            match message? {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Binary(data) => return Ok(serde_json::from_slice(&data)?),
                Message::Close(_) => break,
                _ => continue,
            }
        }

        Err(ClientError::Closed)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(pid: u32) -> InstanceDescriptor {
        InstanceDescriptor {
            process_id: pid,
            display_name: "[no_project]".to_string(),
            host: "localhost".to_string(),
            port: 5000 + pid as u16,
        }
    }

    #[test]
    fn test_select_single_instance() {
        let instances = vec![instance(1)];
        assert_eq!(select_instance(&instances, None).unwrap().process_id, 1);
    }

    #[test]
    fn test_select_requires_pid_when_ambiguous() {
        let instances = vec![instance(1), instance(2)];
        assert!(matches!(
            select_instance(&instances, None),
            Err(ClientError::Ambiguous(2))
        ));
        assert_eq!(select_instance(&instances, Some(2)).unwrap().port, 5002);
    }

    #[test]
    fn test_select_reports_missing() {
        assert!(matches!(
            select_instance(&[], None),
            Err(ClientError::NoInstances)
        ));
        assert!(matches!(
            select_instance(&[instance(1)], Some(9)),
            Err(ClientError::UnknownPid(9))
        ));
    }
}
