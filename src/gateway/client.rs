//! HTTP client for the swarm simulator

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use super::GatewayError;
use crate::config::SimulationConfig;

/// Something that can execute agent commands in the simulated world
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Forward a command for one agent
    async fn send_command(&self, agent_id: &str, command: &str, params: Map<String, Value>)
    -> Result<(), GatewayError>;

    /// Current state of every agent, as reported by the simulator
    async fn agent_positions(&self) -> Result<Map<String, Value>, GatewayError>;
}

/// Simulator reached over HTTP
pub struct HttpSimulationClient {
    base_url: String,
    http: Client,
}

impl HttpSimulationClient {
    pub fn from_config(config: &SimulationConfig) -> Result<Self, GatewayError> {
        debug!(?config, "from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SimulationBackend for HttpSimulationClient {
    async fn send_command(
        &self,
        agent_id: &str,
        command: &str,
        params: Map<String, Value>,
    ) -> Result<(), GatewayError> {
        debug!(%agent_id, %command, "send_command: called");
        let body = json!({
            "agent_id": agent_id,
            "command": command,
            "params": params,
        });

        let response = self
            .http
            .post(format!("{}/command", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        warn!(%agent_id, %command, %status, body = %text, "send_command: rejected");
        Err(GatewayError::CommandFailed(text))
    }

    async fn agent_positions(&self) -> Result<Map<String, Value>, GatewayError> {
        debug!("agent_positions: called");
        let response = self.http.get(format!("{}/agents", self.base_url)).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, body = %text, "agent_positions: rejected");
            return Err(GatewayError::CommandFailed(text));
        }

        match response.json::<Value>().await? {
            Value::Object(map) => Ok(map),
            other => Err(GatewayError::CommandFailed(format!("expected JSON object, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(url: String) -> HttpSimulationClient {
        HttpSimulationClient::from_config(&SimulationConfig {
            base_url: url,
            timeout_ms: 2000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_command_posts_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/command")
            .match_body(Matcher::Json(json!({
                "agent_id": "u1",
                "command": "move",
                "params": {"x": 10}
            })))
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = client_for(server.url());
        let mut params = Map::new();
        params.insert("x".to_string(), json!(10));
        client.send_command("u1", "move", params).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_command_non_200_carries_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/command")
            .with_status(400)
            .with_body("unknown agent")
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.send_command("u9", "move", Map::new()).await.unwrap_err();
        assert_eq!(err, GatewayError::CommandFailed("unknown agent".to_string()));
    }

    #[tokio::test]
    async fn test_agent_positions() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/agents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"u1": {"x": 1.0, "y": 2.0}}"#)
            .create_async()
            .await;

        let client = client_for(format!("{}/", server.url()));
        let agents = client.agent_positions().await.unwrap();
        assert_eq!(agents["u1"]["y"], json!(2.0));
    }

    #[tokio::test]
    async fn test_agent_positions_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/agents")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.agent_positions().await.unwrap_err();
        assert_eq!(err.message(), "boom");
    }

    #[tokio::test]
    async fn test_silent_simulator_times_out() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = HttpSimulationClient::from_config(&SimulationConfig {
            base_url: format!("http://{}", addr),
            timeout_ms: 100,
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = client.send_command("u1", "move", Map::new()).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            GatewayError::CommandFailed(msg) => assert!(msg.contains("timed out"), "unexpected message: {}", msg),
            other => panic!("Expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_simulator() {
        // Port 9 (discard) is not listening in test environments
        let client = client_for("http://127.0.0.1:9".to_string());
        let err = client.send_command("u1", "move", Map::new()).await.unwrap_err();
        assert!(matches!(err, GatewayError::CommandFailed(_)));
    }
}
