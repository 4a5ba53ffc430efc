//! Cluster definition model
//!
//! The validated, defaulted in-memory representation of a cluster
//! specification. [`ClusterDefinition::load`] runs the three stages in
//! order: parse the JSON, fill orchestrator-appropriate defaults, then
//! validate every invariant. A definition that survives `load` is never
//! mutated again.

mod defaults;
mod types;
mod validate;

pub use defaults::{
    DEFAULT_AGENT_VM_SIZE, DEFAULT_CLUSTER_DOMAIN, DEFAULT_MASTER_COUNT, DEFAULT_MASTER_VM_SIZE,
};
pub use validate::{MAX_AGENT_COUNT, MAX_DISK_SIZE_GB, MIN_AGENT_COUNT, MIN_DISK_SIZE_GB};

pub use types::{
    AgentPoolProfile, ClusterDefinition, MasterProfile, OrchestratorProfile, OrchestratorType,
    OsType, StorageProfile,
};
