//! Lifecycle events emitted by the agent.
//!
//! Every event kind belongs to a closed, hierarchical enumeration whose
//! string form is `"<GROUP>_<ACTION>"` (e.g. `DEPLOYMENT_TRIGGERED`,
//! `APPLICATION_SYNCED`). The payload an event carries depends on its kind:
//! deployment-scoped events reference an application and an environment,
//! agent lifecycle events reference neither. Consumers that care about the
//! difference between "no such field" and "field present but empty" use the
//! optional accessors on [`Event`].

use serde::{Deserialize, Serialize};

/// The closed set of lifecycle event kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// A deployment has been triggered.
    DeploymentTriggered,
    /// A deployment pipeline has been planned.
    DeploymentPlanned,
    /// A deployment has been approved.
    DeploymentApproved,
    /// A deployment is waiting for approval.
    DeploymentWaitApproval,
    /// A deployment is rolling back.
    DeploymentRollingBack,
    /// A deployment finished successfully.
    DeploymentSucceeded,
    /// A deployment failed.
    DeploymentFailed,
    /// A deployment was cancelled.
    DeploymentCancelled,
    /// Triggering a deployment failed.
    DeploymentTriggerFailed,
    /// An application reached its desired state.
    ApplicationSynced,
    /// An application drifted from its desired state.
    ApplicationOutOfSync,
    /// The agent process started.
    AgentStarted,
    /// The agent process stopped.
    AgentStopped,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 13] = [
        EventKind::DeploymentTriggered,
        EventKind::DeploymentPlanned,
        EventKind::DeploymentApproved,
        EventKind::DeploymentWaitApproval,
        EventKind::DeploymentRollingBack,
        EventKind::DeploymentSucceeded,
        EventKind::DeploymentFailed,
        EventKind::DeploymentCancelled,
        EventKind::DeploymentTriggerFailed,
        EventKind::ApplicationSynced,
        EventKind::ApplicationOutOfSync,
        EventKind::AgentStarted,
        EventKind::AgentStopped,
    ];

    /// Returns the canonical `"<GROUP>_<ACTION>"` string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DeploymentTriggered => "DEPLOYMENT_TRIGGERED",
            EventKind::DeploymentPlanned => "DEPLOYMENT_PLANNED",
            EventKind::DeploymentApproved => "DEPLOYMENT_APPROVED",
            EventKind::DeploymentWaitApproval => "DEPLOYMENT_WAIT_APPROVAL",
            EventKind::DeploymentRollingBack => "DEPLOYMENT_ROLLING_BACK",
            EventKind::DeploymentSucceeded => "DEPLOYMENT_SUCCEEDED",
            EventKind::DeploymentFailed => "DEPLOYMENT_FAILED",
            EventKind::DeploymentCancelled => "DEPLOYMENT_CANCELLED",
            EventKind::DeploymentTriggerFailed => "DEPLOYMENT_TRIGGER_FAILED",
            EventKind::ApplicationSynced => "APPLICATION_SYNCED",
            EventKind::ApplicationOutOfSync => "APPLICATION_OUT_OF_SYNC",
            EventKind::AgentStarted => "AGENT_STARTED",
            EventKind::AgentStopped => "AGENT_STOPPED",
        }
    }

    /// Parses a canonical string form back into a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Coarse category of this kind: the token before the first `_`.
    ///
    /// Lets operators route by category ("all deployment events") without
    /// enumerating every action.
    pub fn group(&self) -> &'static str {
        match self.as_str().split_once('_') {
            Some((group, _)) => group,
            None => self.as_str(),
        }
    }

    /// The action part of this kind: everything after the first `_`.
    pub fn action(&self) -> &'static str {
        match self.as_str().split_once('_') {
            Some((_, action)) => action,
            None => self.as_str(),
        }
    }

    /// Whether `token` names a known event, spelled either as an action
    /// token (`TRIGGERED`) or as a full string form (`DEPLOYMENT_TRIGGERED`).
    pub fn is_known_event_token(token: &str) -> bool {
        Self::ALL
            .iter()
            .any(|kind| kind.as_str() == token || kind.action() == token)
    }

    /// Whether `token` names a known event group.
    pub fn is_known_group(token: &str) -> bool {
        Self::ALL.iter().any(|kind| kind.group() == token)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the deployment an event is about.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentRef {
    /// Deployment identifier.
    pub id: String,
    /// Identifier of the application being deployed.
    pub application_id: String,
    /// Identifier of the environment being deployed into.
    pub environment_id: String,
}

/// Reference to the application an event is about.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationRef {
    /// Application identifier.
    pub id: String,
    /// Human-readable application name.
    pub name: String,
    /// Identifier of the environment the application runs in.
    pub environment_id: String,
}

/// A discrete lifecycle occurrence.
///
/// The variant is the event's kind and the payload is the metadata that
/// kind carries, so a kind/metadata mismatch cannot be constructed. The
/// wire form tags each event with its canonical kind string:
/// `{"type": "DEPLOYMENT_TRIGGERED", "deployment": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    DeploymentTriggered {
        deployment: DeploymentRef,
    },
    DeploymentPlanned {
        deployment: DeploymentRef,
        summary: String,
    },
    DeploymentApproved {
        deployment: DeploymentRef,
        approver: String,
    },
    DeploymentWaitApproval {
        deployment: DeploymentRef,
    },
    DeploymentRollingBack {
        deployment: DeploymentRef,
    },
    DeploymentSucceeded {
        deployment: DeploymentRef,
    },
    DeploymentFailed {
        deployment: DeploymentRef,
        reason: String,
    },
    DeploymentCancelled {
        deployment: DeploymentRef,
        commander: String,
    },
    DeploymentTriggerFailed {
        application: ApplicationRef,
        reason: String,
    },
    ApplicationSynced {
        application: ApplicationRef,
    },
    ApplicationOutOfSync {
        application: ApplicationRef,
    },
    AgentStarted {
        version: String,
    },
    AgentStopped {
        version: String,
    },
}

impl Event {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::DeploymentTriggered { .. } => EventKind::DeploymentTriggered,
            Event::DeploymentPlanned { .. } => EventKind::DeploymentPlanned,
            Event::DeploymentApproved { .. } => EventKind::DeploymentApproved,
            Event::DeploymentWaitApproval { .. } => EventKind::DeploymentWaitApproval,
            Event::DeploymentRollingBack { .. } => EventKind::DeploymentRollingBack,
            Event::DeploymentSucceeded { .. } => EventKind::DeploymentSucceeded,
            Event::DeploymentFailed { .. } => EventKind::DeploymentFailed,
            Event::DeploymentCancelled { .. } => EventKind::DeploymentCancelled,
            Event::DeploymentTriggerFailed { .. } => EventKind::DeploymentTriggerFailed,
            Event::ApplicationSynced { .. } => EventKind::ApplicationSynced,
            Event::ApplicationOutOfSync { .. } => EventKind::ApplicationOutOfSync,
            Event::AgentStarted { .. } => EventKind::AgentStarted,
            Event::AgentStopped { .. } => EventKind::AgentStopped,
        }
    }

    /// The application identifier, when this event is about one.
    ///
    /// Returns `None` for agent lifecycle events; an application-scoped
    /// event with an empty identifier still returns `Some("")`.
    pub fn application_id(&self) -> Option<&str> {
        match self {
            Event::DeploymentTriggered { deployment }
            | Event::DeploymentPlanned { deployment, .. }
            | Event::DeploymentApproved { deployment, .. }
            | Event::DeploymentWaitApproval { deployment }
            | Event::DeploymentRollingBack { deployment }
            | Event::DeploymentSucceeded { deployment }
            | Event::DeploymentFailed { deployment, .. }
            | Event::DeploymentCancelled { deployment, .. } => Some(&deployment.application_id),
            Event::DeploymentTriggerFailed { application, .. }
            | Event::ApplicationSynced { application }
            | Event::ApplicationOutOfSync { application } => Some(&application.id),
            Event::AgentStarted { .. } | Event::AgentStopped { .. } => None,
        }
    }

    /// The environment identifier, when this event is about one.
    pub fn environment_id(&self) -> Option<&str> {
        match self {
            Event::DeploymentTriggered { deployment }
            | Event::DeploymentPlanned { deployment, .. }
            | Event::DeploymentApproved { deployment, .. }
            | Event::DeploymentWaitApproval { deployment }
            | Event::DeploymentRollingBack { deployment }
            | Event::DeploymentSucceeded { deployment }
            | Event::DeploymentFailed { deployment, .. }
            | Event::DeploymentCancelled { deployment, .. } => Some(&deployment.environment_id),
            Event::DeploymentTriggerFailed { application, .. }
            | Event::ApplicationSynced { application }
            | Event::ApplicationOutOfSync { application } => Some(&application.environment_id),
            Event::AgentStarted { .. } | Event::AgentStopped { .. } => None,
        }
    }
}
