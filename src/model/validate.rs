//! Cluster definition validation
//!
//! Runs after defaulting; fails on the first violation encountered so the
//! error always carries one precise field path and constraint.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{AgentPoolProfile, ClusterDefinition, MasterProfile};
use crate::{Error, Result};

/// Minimum agents in a pool
pub const MIN_AGENT_COUNT: u32 = 1;

/// Maximum agents in a pool
pub const MAX_AGENT_COUNT: u32 = 100;

/// Minimum data disk size in GB
pub const MIN_DISK_SIZE_GB: u32 = 1;

/// Maximum data disk size in GB
pub const MAX_DISK_SIZE_GB: u32 = 1023;

// Pool names become VM name prefixes: lowercase, max length 12.
static POOL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]{0,11}$").expect("valid pool name regex"));

// DNS prefixes must be 3-15 chars, letter first, letter or digit last.
static DNS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]{1,13}[a-z0-9]$").expect("valid dns name regex"));

impl ClusterDefinition {
    /// Check every invariant of the definition, failing on the first violation
    pub fn validate(&self) -> Result<()> {
        self.master_profile.validate()?;

        let mut seen = HashSet::new();
        for (i, profile) in self.agent_pool_profiles.iter().enumerate() {
            profile.validate(i)?;
            if !seen.insert(profile.name.as_str()) {
                return Err(Error::validation(
                    format!("agentPoolProfiles[{i}].name"),
                    format!(
                        "pool name '{}' already exists, pool names must be unique",
                        profile.name
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl MasterProfile {
    fn validate(&self) -> Result<()> {
        let count = self.count();
        if count != 1 && count != 3 && count != 5 {
            return Err(Error::validation(
                "masterProfile.count",
                format!("count must be 1, 3 or 5, got {count}"),
            ));
        }
        if !DNS_NAME.is_match(&self.dns_prefix) {
            return Err(Error::validation(
                "masterProfile.dnsPrefix",
                format!(
                    "DNS prefix '{}' is invalid: must be 3-15 characters of letters, numbers \
                     and hyphens, starting with a letter and ending with a letter or number",
                    self.dns_prefix
                ),
            ));
        }
        if self.vm_size().is_empty() {
            return Err(Error::validation(
                "masterProfile.vmSize",
                "vmSize must be a non-empty value",
            ));
        }
        Ok(())
    }
}

impl AgentPoolProfile {
    fn validate(&self, index: usize) -> Result<()> {
        if !POOL_NAME.is_match(&self.name) {
            return Err(Error::validation(
                format!("agentPoolProfiles[{index}].name"),
                format!(
                    "pool name '{}' is invalid: must start with a lowercase letter, contain \
                     only a-z0-9 and be at most 12 characters",
                    self.name
                ),
            ));
        }
        if self.count < MIN_AGENT_COUNT || self.count > MAX_AGENT_COUNT {
            return Err(Error::validation(
                format!("agentPoolProfiles[{index}].count"),
                format!(
                    "count must be in the range [{MIN_AGENT_COUNT},{MAX_AGENT_COUNT}], got {}",
                    self.count
                ),
            ));
        }
        if self.vm_size().is_empty() {
            return Err(Error::validation(
                format!("agentPoolProfiles[{index}].vmSize"),
                "vmSize must be a non-empty value",
            ));
        }
        for (d, size) in self.disk_sizes_gb.iter().enumerate() {
            if *size < MIN_DISK_SIZE_GB || *size > MAX_DISK_SIZE_GB {
                return Err(Error::validation(
                    format!("agentPoolProfiles[{index}].diskSizesGB[{d}]"),
                    format!(
                        "disk size must be in the range [{MIN_DISK_SIZE_GB},{MAX_DISK_SIZE_GB}] GB, got {size}"
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrchestratorProfile, OrchestratorType};

    fn pool(name: &str, count: u32) -> AgentPoolProfile {
        AgentPoolProfile {
            name: name.to_string(),
            count,
            vm_size: Some("Standard_D2_v2".to_string()),
            os_type: None,
            storage_profile: None,
            disk_sizes_gb: vec![],
        }
    }

    fn definition_with_pools(pools: Vec<AgentPoolProfile>) -> ClusterDefinition {
        let mut def = ClusterDefinition {
            orchestrator_profile: OrchestratorProfile {
                orchestrator_type: OrchestratorType::Swarm,
                version: None,
            },
            master_profile: MasterProfile {
                count: Some(1),
                dns_prefix: "mycluster".to_string(),
                vm_size: Some("Standard_D2_v2".to_string()),
            },
            agent_pool_profiles: pools,
        };
        def.set_defaults();
        def
    }

    // =========================================================================
    // Agent count boundaries
    // =========================================================================

    #[test]
    fn count_boundaries_validate() {
        for count in [1, 2, 50, 99, 100] {
            let def = definition_with_pools(vec![pool("agents", count)]);
            assert!(def.validate().is_ok(), "count {count} should validate");
        }
    }

    #[test]
    fn count_zero_fails_citing_the_count_field() {
        let def = definition_with_pools(vec![pool("agents", 0)]);
        let err = def.validate().unwrap_err();
        assert!(err.to_string().contains("agentPoolProfiles[0].count"));
        assert!(err.to_string().contains("[1,100]"));
    }

    #[test]
    fn count_above_max_fails() {
        let def = definition_with_pools(vec![pool("agents", 101)]);
        let err = def.validate().unwrap_err();
        assert!(err.to_string().contains("count"));
    }

    // =========================================================================
    // Disk size boundaries
    // =========================================================================

    #[test]
    fn disk_size_boundaries_validate() {
        let mut p = pool("agents", 2);
        p.disk_sizes_gb = vec![1, 128, 1023];
        let def = definition_with_pools(vec![p]);
        assert!(def.validate().is_ok());
    }

    #[test]
    fn disk_size_zero_fails() {
        let mut p = pool("agents", 2);
        p.disk_sizes_gb = vec![128, 0];
        let def = definition_with_pools(vec![p]);
        let err = def.validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("agentPoolProfiles[0].diskSizesGB[1]"));
    }

    #[test]
    fn disk_size_above_max_fails() {
        let mut p = pool("agents", 2);
        p.disk_sizes_gb = vec![1024];
        let def = definition_with_pools(vec![p]);
        assert!(def.validate().is_err());
    }

    // =========================================================================
    // Names
    // =========================================================================

    #[test]
    fn duplicate_pool_names_fail() {
        let def = definition_with_pools(vec![pool("agents", 2), pool("agents", 3)]);
        let err = def.validate().unwrap_err();
        assert!(err.to_string().contains("unique"));
        assert!(err.to_string().contains("agentPoolProfiles[1].name"));
    }

    #[test]
    fn pool_name_rules_are_enforced() {
        for bad in ["", "Agents", "1agents", "agent-pool", "waytoolongname"] {
            let def = definition_with_pools(vec![pool(bad, 2)]);
            assert!(def.validate().is_err(), "pool name '{bad}' should fail");
        }
    }

    #[test]
    fn master_count_must_be_odd_small() {
        for (count, ok) in [(1, true), (2, false), (3, true), (4, false), (5, true)] {
            let mut def = definition_with_pools(vec![pool("agents", 2)]);
            def.master_profile.count = Some(count);
            assert_eq!(def.validate().is_ok(), ok, "master count {count}");
        }
    }

    #[test]
    fn dns_prefix_rules_are_enforced() {
        for bad in ["ab", "-cluster", "My_Cluster", "thisnameiswaytoolong"] {
            let mut def = definition_with_pools(vec![pool("agents", 2)]);
            def.master_profile.dns_prefix = bad.to_string();
            let err = def.validate().unwrap_err();
            assert!(
                err.to_string().contains("masterProfile.dnsPrefix"),
                "dns prefix '{bad}' should fail citing the field"
            );
        }
    }

    #[test]
    fn first_violation_wins() {
        // Both the master count and a pool count are invalid; the master
        // profile is checked first.
        let mut def = definition_with_pools(vec![pool("agents", 0)]);
        def.master_profile.count = Some(2);
        let err = def.validate().unwrap_err();
        assert!(err.to_string().contains("masterProfile.count"));
    }
}
