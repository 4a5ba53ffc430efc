//! End-to-end generation pipeline
//!
//! Wires the stages in the mandated order: required-asset pre-flight, then
//! definition load, asset load, PKI generation (secure orchestrators only),
//! assembly, and rendering. Misconfiguration is reported before any
//! cryptographic work starts.
//!
//! Each invocation owns every structure it creates; nothing is shared between
//! runs, so concurrent generations need no coordination.

use std::path::Path;

use tracing::{debug, info};

use crate::assets::{
    verify_required_assets, TemplateAssets, DCOS_BASE_FILE, KUBERNETES_BASE_FILE, REQUIRED_ASSETS,
    SWARM_BASE_FILE,
};
use crate::model::{ClusterDefinition, OrchestratorType, DEFAULT_CLUSTER_DOMAIN};
use crate::names;
use crate::pki::{generate_pki, PkiBundle};
use crate::template::{Assembler, TemplateRenderer};
use crate::{Error, Result};

/// The base template file for an orchestrator
pub fn base_template_file(orchestrator: OrchestratorType) -> &'static str {
    match orchestrator {
        OrchestratorType::Kubernetes => KUBERNETES_BASE_FILE,
        OrchestratorType::Swarm => SWARM_BASE_FILE,
        OrchestratorType::Dcos => DCOS_BASE_FILE,
    }
}

/// Turn raw cluster-definition JSON into the rendered deployment template
///
/// `parts_dir` is the template parts directory; the per-orchestrator base
/// templates must exist there before anything else runs. The rendered
/// document is returned whole; every failure path returns no partial output.
pub fn generate_template(definition_json: &[u8], parts_dir: &Path) -> Result<String> {
    verify_required_assets(parts_dir, REQUIRED_ASSETS)?;

    let definition = ClusterDefinition::load(definition_json)?;
    let orchestrator = definition.orchestrator_profile.orchestrator_type;
    info!(
        %orchestrator,
        dns_prefix = %definition.master_profile.dns_prefix,
        pools = definition.agent_pool_profiles.len(),
        "loaded cluster definition"
    );

    let assets = TemplateAssets::load(parts_dir)?;

    let pki = if orchestrator.requires_pki() {
        Some(cluster_pki(&definition)?)
    } else {
        None
    };

    let document = Assembler::new().assemble(&definition, pki.as_ref())?;
    debug!("assembled document sections");

    let base_file = base_template_file(orchestrator);
    let source = assets.get(base_file).ok_or_else(|| Error::MissingAsset {
        path: parts_dir.join(base_file),
    })?;

    let rendered = TemplateRenderer.render(base_file, source, &document)?;
    info!(bytes = rendered.len(), "rendered deployment template");
    Ok(rendered)
}

/// Mint the trust bundle for a secure cluster
///
/// The wildcard production FQDN is the certificate subject name; the
/// per-location FQDN fan-out and the masters' static IPs go in as extra SANs
/// so the endpoint stays valid wherever the cluster lands.
fn cluster_pki(definition: &ClusterDefinition) -> Result<PkiBundle> {
    let dns_prefix = &definition.master_profile.dns_prefix;
    let master_fqdn = names::format_prod_fqdn(dns_prefix, "*");
    let extra_fqdns = names::format_prod_fqdns(dns_prefix);
    let extra_ips = names::master_ips(definition)?;

    info!(
        fqdns = extra_fqdns.len(),
        ips = extra_ips.len(),
        "generating PKI bundle"
    );
    generate_pki(
        &master_fqdn,
        &extra_fqdns,
        &extra_ips,
        DEFAULT_CLUSTER_DOMAIN,
    )
}
