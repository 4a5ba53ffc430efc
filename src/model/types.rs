//! Cluster definition types
//!
//! Serde representations of the JSON cluster definition. Unknown JSON fields
//! are ignored, matching the behavior of the deployment tooling this feeds.
//! Fields a caller may leave unset are `Option`s so the defaulting pass can
//! tell "unset" from "explicitly set".

use serde::{Deserialize, Serialize};

use super::defaults::{
    DEFAULT_AGENT_VM_SIZE, DEFAULT_MASTER_COUNT, DEFAULT_MASTER_VM_SIZE,
    DEFAULT_ORCHESTRATOR_VERSION_DCOS, DEFAULT_ORCHESTRATOR_VERSION_KUBERNETES,
    DEFAULT_ORCHESTRATOR_VERSION_SWARM,
};
use crate::{Error, Result};

/// The orchestrator deployed onto the cluster
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum OrchestratorType {
    /// Kubernetes; requires mutual-TLS bootstrap material
    Kubernetes,
    /// Docker Swarm
    Swarm,
    /// DC/OS
    #[serde(rename = "DCOS")]
    Dcos,
}

impl OrchestratorType {
    /// Whether this orchestrator needs a PKI bundle to bootstrap trust
    pub fn requires_pki(&self) -> bool {
        matches!(self, Self::Kubernetes)
    }

    /// The canonical string form used in definitions and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kubernetes => "Kubernetes",
            Self::Swarm => "Swarm",
            Self::Dcos => "DCOS",
        }
    }
}

impl std::fmt::Display for OrchestratorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestrator type and version selection
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorProfile {
    /// Which orchestrator to deploy
    pub orchestrator_type: OrchestratorType,

    /// Orchestrator release; defaulted per orchestrator when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl OrchestratorProfile {
    /// Orchestrator version, falling back to the per-orchestrator default
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(match self.orchestrator_type {
            OrchestratorType::Kubernetes => DEFAULT_ORCHESTRATOR_VERSION_KUBERNETES,
            OrchestratorType::Swarm => DEFAULT_ORCHESTRATOR_VERSION_SWARM,
            OrchestratorType::Dcos => DEFAULT_ORCHESTRATOR_VERSION_DCOS,
        })
    }
}

/// Definition of the master (control plane) nodes
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MasterProfile {
    /// Number of masters; must be 1, 3 or 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// DNS name prefix for the cluster's public endpoint
    pub dns_prefix: String,

    /// VM size for master nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
}

impl MasterProfile {
    /// Master count, falling back to the default
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_MASTER_COUNT)
    }

    /// Master VM size, falling back to the default
    pub fn vm_size(&self) -> &str {
        self.vm_size.as_deref().unwrap_or(DEFAULT_MASTER_VM_SIZE)
    }
}

/// Operating system of an agent pool
///
/// Values are case-sensitive matches to exactly these two strings.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum OsType {
    /// Windows nodes
    Windows,
    /// Linux nodes
    #[default]
    Linux,
}

/// Disk backing for an agent pool
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum StorageProfile {
    /// Classic storage-account backed VHDs
    #[default]
    StorageAccount,
    /// Managed disks
    ManagedDisks,
}

/// A named, homogeneous group of worker nodes
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPoolProfile {
    /// Pool name; unique across the cluster, used for template addressing
    pub name: String,

    /// Number of agents in the pool; must be in [1,100]
    pub count: u32,

    /// VM size for pool nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,

    /// Node operating system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_type: Option<OsType>,

    /// Disk backing for pool nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfile>,

    /// Data disk sizes in GB, each in [1,1023]; attached in listed order
    #[serde(default, rename = "diskSizesGB", skip_serializing_if = "Vec::is_empty")]
    pub disk_sizes_gb: Vec<u32>,
}

impl AgentPoolProfile {
    /// Pool VM size, falling back to the default
    pub fn vm_size(&self) -> &str {
        self.vm_size.as_deref().unwrap_or(DEFAULT_AGENT_VM_SIZE)
    }

    /// Pool OS, falling back to Linux
    pub fn os_type(&self) -> OsType {
        self.os_type.unwrap_or_default()
    }

    /// Pool storage profile, falling back to the classic default
    pub fn storage_profile(&self) -> StorageProfile {
        self.storage_profile.unwrap_or_default()
    }

    /// Whether the pool attaches data disks
    pub fn has_disks(&self) -> bool {
        !self.disk_sizes_gb.is_empty()
    }
}

/// Root cluster definition: orchestrator, master and agent pools
///
/// Pool order is significant and maps to deployment ordering.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDefinition {
    /// Orchestrator selection
    pub orchestrator_profile: OrchestratorProfile,

    /// Master node definition
    pub master_profile: MasterProfile,

    /// Agent pools, in deployment order
    #[serde(default)]
    pub agent_pool_profiles: Vec<AgentPoolProfile>,
}

impl ClusterDefinition {
    /// Parse, default and validate a cluster definition from JSON bytes
    pub fn load(json: &[u8]) -> Result<Self> {
        let mut definition: ClusterDefinition =
            serde_json::from_slice(json).map_err(|e| Error::parse(e.to_string()))?;
        definition.set_defaults();
        definition.validate()?;
        Ok(definition)
    }

    /// Whether any agent pool runs Windows
    pub fn has_windows(&self) -> bool {
        self.agent_pool_profiles
            .iter()
            .any(|p| p.os_type() == OsType::Windows)
    }

    /// Subnet assigned to the master nodes
    pub fn master_subnet(&self) -> &'static str {
        match self.orchestrator_profile.orchestrator_type {
            OrchestratorType::Kubernetes => super::defaults::KUBERNETES_MASTER_SUBNET,
            _ => super::defaults::DEFAULT_MASTER_SUBNET,
        }
    }

    /// Static IP of the first master node
    pub fn first_consecutive_static_ip(&self) -> &'static str {
        match self.orchestrator_profile.orchestrator_type {
            OrchestratorType::Kubernetes => super::defaults::KUBERNETES_FIRST_STATIC_IP,
            _ => super::defaults::DEFAULT_FIRST_STATIC_IP,
        }
    }

    /// Subnet assigned to the agent pool at `index`
    ///
    /// Kubernetes pools share the master subnet so disks can move between
    /// nodes; other orchestrators get one subnet per pool.
    pub fn agent_subnet(&self, index: usize) -> String {
        match self.orchestrator_profile.orchestrator_type {
            OrchestratorType::Kubernetes => self.master_subnet().to_string(),
            _ => format!("10.{index}.0.0/24"),
        }
    }
}
