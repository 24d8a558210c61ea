//! Agent control port.

use std::fmt;

use serde_json::{Map, Value};

use crate::domain::{AgentCommand, AgentStatus};

/// Applies control verbs to remote agents.
pub trait AgentController: Send + Sync + fmt::Debug {
    /// Applies `command` to `agent_id` and returns the status the agent
    /// now reports.
    fn execute(
        &self,
        agent_id: &str,
        command: AgentCommand,
        params: Option<&Map<String, Value>>,
    ) -> AgentStatus;
}

/// Controller that only logs the request and echoes the expected status.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAgentController;

impl AgentController for StubAgentController {
    fn execute(
        &self,
        agent_id: &str,
        command: AgentCommand,
        params: Option<&Map<String, Value>>,
    ) -> AgentStatus {
        match command {
            AgentCommand::Start => tracing::info!(agent_id, "starting agent"),
            AgentCommand::Stop => tracing::info!(agent_id, "stopping agent"),
            AgentCommand::UpdateConfig => {
                tracing::info!(agent_id, ?params, "updating agent config");
            }
        }
        command.resulting_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_echoes_resulting_status() {
        let controller = StubAgentController;
        assert_eq!(
            controller.execute("a1", AgentCommand::Stop, None),
            AgentStatus::Stopped
        );
        let params = Map::new();
        assert_eq!(
            controller.execute("a1", AgentCommand::UpdateConfig, Some(&params)),
            AgentStatus::ConfigUpdated
        );
    }
}
