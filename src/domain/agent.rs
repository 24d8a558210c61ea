//! Agent control verbs and the statuses they produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Control verb accepted by `agent_control`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCommand {
    /// Start the agent.
    Start,
    /// Stop the agent.
    Stop,
    /// Apply a configuration update.
    UpdateConfig,
}

impl AgentCommand {
    /// Returns the wire name of the command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::UpdateConfig => "update_config",
        }
    }

    /// Returns the status an agent reports after the command is applied.
    #[must_use]
    pub const fn resulting_status(self) -> AgentStatus {
        match self {
            Self::Start => AgentStatus::Started,
            Self::Stop => AgentStatus::Stopped,
            Self::UpdateConfig => AgentStatus::ConfigUpdated,
        }
    }
}

impl FromStr for AgentCommand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "update_config" => Ok(Self::UpdateConfig),
            other => Err(ProtocolError::UnsupportedCommand(other.to_string())),
        }
    }
}

impl fmt::Display for AgentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status label echoed to the caller and broadcast to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent was started.
    Started,
    /// The agent was stopped.
    Stopped,
    /// The agent's configuration was updated.
    ConfigUpdated,
}

impl AgentStatus {
    /// Returns the wire label of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::ConfigUpdated => "config_updated",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
