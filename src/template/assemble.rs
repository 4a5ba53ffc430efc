//! Document assembly
//!
//! An assembled document mirrors the final template's structure: four
//! sections, each split into master, agents and diagnostics fragments.
//! Composition logic is selected from a registry keyed on orchestrator type,
//! so unsupported orchestrators fail before any fragment is generated.
//!
//! Assembly performs no I/O; it is a pure function of the definition and the
//! optional PKI bundle.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::generators;
use crate::model::{ClusterDefinition, OrchestratorType};
use crate::pki::PkiBundle;
use crate::{Error, Result};

/// One named piece of the document: a JSON object or array of entries
pub type Fragment = Value;

/// The three fragments every section is split into
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFragments {
    /// Content for the master (control plane) nodes
    pub master: Fragment,
    /// Content for the agent pools, in pool order
    pub agents: Fragment,
    /// Content for the diagnostics surface
    pub diagnostics: Fragment,
}

impl SectionFragments {
    /// Collapse the three fragments into one value
    ///
    /// Objects merge key-wise in master, agents, diagnostics order; arrays
    /// concatenate in the same order.
    pub fn merged(&self) -> Fragment {
        let mut out = self.master.clone();
        for part in [&self.agents, &self.diagnostics] {
            match (&mut out, part) {
                (Value::Object(dst), Value::Object(src)) => {
                    for (key, value) in src {
                        dst.insert(key.clone(), value.clone());
                    }
                }
                (Value::Array(dst), Value::Array(src)) => dst.extend(src.iter().cloned()),
                (dst, src) => {
                    if dst.is_null() {
                        *dst = src.clone();
                    }
                }
            }
        }
        out
    }
}

/// Composition logic for one section of the document
pub trait SectionGenerator: Send + Sync {
    /// Generate the section's fragments from the definition
    fn generate(
        &self,
        definition: &ClusterDefinition,
        pki: Option<&PkiBundle>,
    ) -> Result<SectionFragments>;
}

/// The four section generators for one orchestrator type
pub struct SectionSet {
    pub(super) parameters: Box<dyn SectionGenerator>,
    pub(super) variables: Box<dyn SectionGenerator>,
    pub(super) resources: Box<dyn SectionGenerator>,
    pub(super) outputs: Box<dyn SectionGenerator>,
}

impl SectionSet {
    /// Build a set from one generator per section
    pub fn new(
        parameters: Box<dyn SectionGenerator>,
        variables: Box<dyn SectionGenerator>,
        resources: Box<dyn SectionGenerator>,
        outputs: Box<dyn SectionGenerator>,
    ) -> Self {
        Self {
            parameters,
            variables,
            resources,
            outputs,
        }
    }
}

/// The in-memory mirror of the final document's structure
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledDocument {
    /// Deployment parameters
    pub parameters: SectionFragments,
    /// Computed variables
    pub variables: SectionFragments,
    /// Deployment resources
    pub resources: SectionFragments,
    /// Deployment outputs
    pub outputs: SectionFragments,
}

impl AssembledDocument {
    /// The value tree base templates render against
    ///
    /// Each section appears merged under its own name; the unmerged fragment
    /// tree is available under `fragments` for templates that address
    /// individual fragments.
    pub fn render_context(&self) -> Value {
        serde_json::json!({
            "parameters": self.parameters.merged(),
            "variables": self.variables.merged(),
            "resources": self.resources.merged(),
            "outputs": self.outputs.merged(),
            "fragments": {
                "parameters": self.parameters,
                "variables": self.variables,
                "resources": self.resources,
                "outputs": self.outputs,
            },
        })
    }
}

/// Composes assembled documents via a registry of per-orchestrator sections
pub struct Assembler {
    registry: HashMap<OrchestratorType, SectionSet>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// An assembler with every supported orchestrator registered
    pub fn new() -> Self {
        let mut assembler = Self::empty();
        for orchestrator in [
            OrchestratorType::Kubernetes,
            OrchestratorType::Swarm,
            OrchestratorType::Dcos,
        ] {
            assembler.register(orchestrator, generators::sections_for(orchestrator));
        }
        assembler
    }

    /// An assembler with no composition logic registered
    pub fn empty() -> Self {
        Self {
            registry: HashMap::new(),
        }
    }

    /// Register (or replace) the section set for an orchestrator
    pub fn register(&mut self, orchestrator: OrchestratorType, sections: SectionSet) {
        self.registry.insert(orchestrator, sections);
    }

    /// Compose the full document for a validated definition
    ///
    /// Orchestrators that require mutual-TLS bootstrap material fail with
    /// [`Error::MissingCredentials`] when `pki` is `None`; both preconditions
    /// are checked before any fragment is generated, so a failure never
    /// leaves a partial document behind.
    pub fn assemble(
        &self,
        definition: &ClusterDefinition,
        pki: Option<&PkiBundle>,
    ) -> Result<AssembledDocument> {
        let orchestrator = definition.orchestrator_profile.orchestrator_type;

        let sections = self
            .registry
            .get(&orchestrator)
            .ok_or_else(|| Error::UnsupportedOrchestrator(orchestrator.to_string()))?;

        if orchestrator.requires_pki() && pki.is_none() {
            return Err(Error::MissingCredentials(orchestrator.to_string()));
        }

        Ok(AssembledDocument {
            parameters: sections.parameters.generate(definition, pki)?,
            variables: sections.variables.generate(definition, pki)?,
            resources: sections.resources.generate(definition, pki)?,
            outputs: sections.outputs.generate(definition, pki)?,
        })
    }
}
