//! Core data model for the Convoy continuous delivery agent.

pub mod event;

pub use event::{ApplicationRef, DeploymentRef, Event, EventKind};
