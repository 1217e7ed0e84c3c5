use serde::{Deserialize, Serialize};

/// Stable key identifying one live-data subscription (resource or topic).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Liveness state of one channel.
///
/// Exactly one state at a time. Transitions run connecting -> connected ->
/// stale -> disconnected, with two exceptions: a heartbeat recovers any
/// state to connected, and an explicit reconnect forces connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
    Connecting,
    Connected,
    Stale,
    Disconnected,
}

impl ChannelState {
    /// Rank for worst-of aggregation: disconnected > stale > connecting >
    /// connected.
    pub fn severity(self) -> u8 {
        match self {
            ChannelState::Connected => 0,
            ChannelState::Connecting => 1,
            ChannelState::Stale => 2,
            ChannelState::Disconnected => 3,
        }
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelState::Connecting => write!(f, "connecting"),
            ChannelState::Connected => write!(f, "connected"),
            ChannelState::Stale => write!(f, "stale"),
            ChannelState::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Transport-originated signals applied to a channel entry.
///
/// Each variant maps to exactly one transition rule in the entry state
/// machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A data or keepalive event arrived; the channel is provably alive.
    Heartbeat,
    /// The transport reported an error.
    TransportError,
    /// The transport closed the stream.
    TransportClosed,
    /// An explicit reconnect cycle is re-opening the channel.
    ReconnectRequested,
}

/// Point-in-time view of one channel for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSnapshot {
    pub id: ChannelId,
    pub state: ChannelState,
    pub subscribers: usize,
    pub seconds_since_heartbeat: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_display_and_accessors() {
        let id = ChannelId::new("runs/42");
        assert_eq!(id.as_str(), "runs/42");
        assert_eq!(id.to_string(), "runs/42");
        assert_eq!(id.clone().into_inner(), "runs/42");
    }

    #[test]
    fn test_channel_id_from_str() {
        let id: ChannelId = "budget-events".into();
        assert_eq!(id.as_str(), "budget-events");
    }

    #[test]
    fn test_channel_state_severity_ordering() {
        assert!(ChannelState::Disconnected.severity() > ChannelState::Stale.severity());
        assert!(ChannelState::Stale.severity() > ChannelState::Connecting.severity());
        assert!(ChannelState::Connecting.severity() > ChannelState::Connected.severity());
    }

    #[test]
    fn test_channel_state_display() {
        assert_eq!(ChannelState::Connecting.to_string(), "connecting");
        assert_eq!(ChannelState::Connected.to_string(), "connected");
        assert_eq!(ChannelState::Stale.to_string(), "stale");
        assert_eq!(ChannelState::Disconnected.to_string(), "disconnected");
    }

    #[test]
    fn test_channel_state_serde_lowercase() {
        let json = serde_json::to_string(&ChannelState::Stale).unwrap();
        assert_eq!(json, r#""stale""#);
        let parsed: ChannelState = serde_json::from_str(r#""disconnected""#).unwrap();
        assert_eq!(parsed, ChannelState::Disconnected);
    }

    #[test]
    fn test_channel_snapshot_serializes() {
        let snapshot = ChannelSnapshot {
            id: "runs/42".into(),
            state: ChannelState::Connected,
            subscribers: 2,
            seconds_since_heartbeat: 3,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""id":"runs/42""#));
        assert!(json.contains(r#""state":"connected""#));
    }
}
