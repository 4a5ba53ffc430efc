//! Orchestrator-appropriate defaulting
//!
//! Defaulting fills only fields the caller left unset and is idempotent:
//! applying it twice yields the same definition. It runs after parsing and
//! before validation, so validation always sees a fully populated model.

use super::types::{ClusterDefinition, OrchestratorType, OsType, StorageProfile};

/// Default number of master nodes
pub const DEFAULT_MASTER_COUNT: u32 = 1;

/// Default VM size for master nodes
pub const DEFAULT_MASTER_VM_SIZE: &str = "Standard_D2_v2";

/// Default VM size for agent pool nodes
pub const DEFAULT_AGENT_VM_SIZE: &str = "Standard_D2_v2";

/// DNS suffix used inside the cluster (also a SAN in PKI generation)
pub const DEFAULT_CLUSTER_DOMAIN: &str = "cluster.local";

/// Default orchestrator releases
pub(super) const DEFAULT_ORCHESTRATOR_VERSION_KUBERNETES: &str = "1.4.0";
pub(super) const DEFAULT_ORCHESTRATOR_VERSION_SWARM: &str = "1.12.0";
pub(super) const DEFAULT_ORCHESTRATOR_VERSION_DCOS: &str = "1.8.4";

/// Master subnet for DCOS and Swarm
pub(super) const DEFAULT_MASTER_SUBNET: &str = "172.16.0.0/24";

/// Static IP of master 0 for DCOS and Swarm
pub(super) const DEFAULT_FIRST_STATIC_IP: &str = "172.16.0.5";

/// Master subnet for Kubernetes
pub(super) const KUBERNETES_MASTER_SUBNET: &str = "10.240.0.0/16";

/// Static IP of master 0 for Kubernetes
pub(super) const KUBERNETES_FIRST_STATIC_IP: &str = "10.240.255.5";

impl ClusterDefinition {
    /// Fill every unset field with its orchestrator-appropriate default
    pub fn set_defaults(&mut self) {
        let orchestrator = self.orchestrator_profile.orchestrator_type;

        if self.orchestrator_profile.version.is_none() {
            self.orchestrator_profile.version =
                Some(self.orchestrator_profile.version().to_string());
        }

        if self.master_profile.count.is_none() {
            self.master_profile.count = Some(DEFAULT_MASTER_COUNT);
        }
        if self.master_profile.vm_size.is_none() {
            self.master_profile.vm_size = Some(DEFAULT_MASTER_VM_SIZE.to_string());
        }

        for profile in &mut self.agent_pool_profiles {
            if profile.vm_size.is_none() {
                profile.vm_size = Some(DEFAULT_AGENT_VM_SIZE.to_string());
            }
            if profile.os_type.is_none() {
                profile.os_type = Some(OsType::Linux);
            }
            if profile.storage_profile.is_none() {
                // Kubernetes needs to attach and detach disks between nodes
                profile.storage_profile = Some(match orchestrator {
                    OrchestratorType::Kubernetes => StorageProfile::ManagedDisks,
                    _ => StorageProfile::StorageAccount,
                });
            }
        }
    }
}
