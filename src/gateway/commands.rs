//! CommandGateway - launch slots, status tracking and events around a backend

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use super::{GatewayError, SimulationBackend};
use crate::events::{EventEmitter, MissionEvent};

/// X coordinate every scout starts from
pub const SCOUT_START_X: i64 = 100;
/// Y coordinate of the first scout lane
pub const SCOUT_START_Y: i64 = 100;
/// Vertical spacing between scout lanes
pub const SCOUT_LANE_SPACING: i64 = 150;
/// Number of distinct scout lanes
pub const SCOUT_LANES: u64 = 5;

/// Outcome of the most recent command
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CommandStatus {
    #[default]
    None,
    Success,
    Failed(String),
}

/// Lane for an agent: the number formed by its digits, mod the lane count
///
/// Agents without digits use lane 0.
pub fn scout_lane(agent_id: &str) -> u64 {
    agent_id
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| (acc * 10 + d as u64) % SCOUT_LANES)
}

/// Starting coordinates for a scout
pub fn scout_launch_slot(agent_id: &str) -> (i64, i64) {
    let lane = scout_lane(agent_id) as i64;
    (SCOUT_START_X, SCOUT_START_Y + lane * SCOUT_LANE_SPACING)
}

/// Build a parameter map from key/value pairs (later keys win)
pub fn params_from_pairs<K, V>(pairs: &[(K, V)]) -> Map<String, Value>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    pairs
        .iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.clone().into()))
        .collect()
}

/// Parse `key=value`; the value is read as JSON when possible, else as a string
pub fn parse_param(raw: &str) -> Result<(String, Value), GatewayError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| GatewayError::InvalidParam(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(GatewayError::InvalidParam(raw.to_string()));
    }
    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Forwards agent commands to a simulation backend
pub struct CommandGateway<B> {
    backend: B,
    status: Arc<Mutex<CommandStatus>>,
    events: EventEmitter,
}

impl<B: SimulationBackend> CommandGateway<B> {
    pub fn new(backend: B, events: EventEmitter) -> Self {
        Self {
            backend,
            status: Arc::new(Mutex::new(CommandStatus::None)),
            events,
        }
    }

    /// Send a command; scouts get their launch slot injected
    pub async fn send_command(
        &self,
        agent_id: &str,
        command: &str,
        mut params: Map<String, Value>,
    ) -> Result<(), GatewayError> {
        debug!(%agent_id, %command, "send_command: called");
        if command == "scout" {
            let (x, y) = scout_launch_slot(agent_id);
            debug!(%agent_id, x, y, "send_command: scout launch slot");
            params.insert("start_x".to_string(), json!(x));
            params.insert("start_y".to_string(), json!(y));
        }

        let result = self.backend.send_command(agent_id, command, params).await;

        let status = match &result {
            Ok(()) => {
                info!(%agent_id, %command, "command sent");
                CommandStatus::Success
            }
            Err(e) => {
                warn!(%agent_id, %command, error = %e, "command failed");
                CommandStatus::Failed(e.message().to_string())
            }
        };
        self.set_status(status);
        self.events.emit(MissionEvent::CommandSent {
            agent_id: agent_id.to_string(),
            command: command.to_string(),
            success: result.is_ok(),
        });
        result
    }

    pub async fn agent_positions(&self) -> Result<Map<String, Value>, GatewayError> {
        debug!("agent_positions: called");
        self.backend.agent_positions().await
    }

    pub fn last_command_status(&self) -> CommandStatus {
        self.status.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_status(&self, status: CommandStatus) {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use async_trait::async_trait;

    type Sent = Arc<Mutex<Vec<(String, String, Map<String, Value>)>>>;

    /// Records every command; fails for agents named "broken"
    #[derive(Default)]
    struct RecordingBackend {
        sent: Sent,
    }

    #[async_trait]
    impl SimulationBackend for RecordingBackend {
        async fn send_command(
            &self,
            agent_id: &str,
            command: &str,
            params: Map<String, Value>,
        ) -> Result<(), GatewayError> {
            if agent_id == "broken" {
                return Err(GatewayError::CommandFailed("agent offline".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((agent_id.to_string(), command.to_string(), params));
            Ok(())
        }

        async fn agent_positions(&self) -> Result<Map<String, Value>, GatewayError> {
            Ok(params_from_pairs(&[("u1", json!({"x": 0, "y": 0}))]))
        }
    }

    #[test]
    fn test_scout_lane() {
        assert_eq!(scout_lane("uav_1"), 1);
        assert_eq!(scout_lane("uav_7"), 2);
        assert_eq!(scout_lane("u12"), 2);
        assert_eq!(scout_lane("boat"), 0);
        // Long digit runs do not overflow
        assert_eq!(scout_lane("u99999999999999999999999"), 4);
    }

    #[test]
    fn test_scout_launch_slot() {
        assert_eq!(scout_launch_slot("uav_0"), (100, 100));
        assert_eq!(scout_launch_slot("uav_3"), (100, 550));
        assert_eq!(scout_launch_slot("uav_5"), (100, 100));
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("x=10").unwrap(), ("x".to_string(), json!(10)));
        assert_eq!(parse_param("mode = fast").unwrap(), ("mode".to_string(), json!("fast")));
        assert_eq!(parse_param("on=true").unwrap().1, json!(true));
        assert_eq!(parse_param("empty=").unwrap().1, json!(""));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=5").is_err());
    }

    #[test]
    fn test_params_from_pairs_later_wins() {
        let params = params_from_pairs(&[("x", 1), ("y", 2), ("x", 3)]);
        assert_eq!(params.len(), 2);
        assert_eq!(params["x"], json!(3));
    }

    #[tokio::test]
    async fn test_scout_injects_launch_slot() {
        let backend = RecordingBackend::default();
        let sent = backend.sent.clone();
        let gateway = CommandGateway::new(backend, EventEmitter::detached());

        gateway
            .send_command("uav_2", "scout", params_from_pairs(&[("start_x", 5)]))
            .await
            .unwrap();
        gateway
            .send_command("uav_2", "move", params_from_pairs(&[("x", 5)]))
            .await
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].2["start_x"], json!(100));
        assert_eq!(sent[0].2["start_y"], json!(400));
        assert!(!sent[1].2.contains_key("start_y"));
    }

    #[tokio::test]
    async fn test_status_and_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let gateway = CommandGateway::new(RecordingBackend::default(), bus.emitter());
        assert_eq!(gateway.last_command_status(), CommandStatus::None);

        gateway.send_command("u1", "move", Map::new()).await.unwrap();
        assert_eq!(gateway.last_command_status(), CommandStatus::Success);

        let err = gateway.send_command("broken", "move", Map::new()).await.unwrap_err();
        assert_eq!(err.message(), "agent offline");
        assert_eq!(
            gateway.last_command_status(),
            CommandStatus::Failed("agent offline".to_string())
        );

        assert_eq!(
            rx.try_recv().unwrap(),
            MissionEvent::CommandSent {
                agent_id: "u1".to_string(),
                command: "move".to_string(),
                success: true
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            MissionEvent::CommandSent {
                agent_id: "broken".to_string(),
                command: "move".to_string(),
                success: false
            }
        );
    }

    #[tokio::test]
    async fn test_agent_positions_passthrough() {
        let gateway = CommandGateway::new(RecordingBackend::default(), EventEmitter::detached());
        let agents = gateway.agent_positions().await.unwrap();
        assert!(agents.contains_key("u1"));
    }
}
