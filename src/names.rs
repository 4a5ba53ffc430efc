//! Azure endpoint naming helpers
//!
//! The master endpoint is addressable in every production location, so PKI
//! generation needs the full per-location FQDN fan-out plus the wildcard
//! form.

use std::net::{IpAddr, Ipv4Addr};

use crate::model::ClusterDefinition;
use crate::{Error, Result};

/// All Azure production locations
pub const AZURE_LOCATIONS: &[&str] = &[
    "eastasia",
    "southeastasia",
    "centralus",
    "eastus",
    "eastus2",
    "westus",
    "northcentralus",
    "southcentralus",
    "northeurope",
    "westeurope",
    "japanwest",
    "japaneast",
    "brazilsouth",
    "australiaeast",
    "australiasoutheast",
    "southindia",
    "centralindia",
    "westindia",
    "canadacentral",
    "canadaeast",
    "uksouth",
    "ukwest",
    "westcentralus",
    "westus2",
];

/// Format the production FQDN for a DNS prefix in one location
pub fn format_prod_fqdn(dns_prefix: &str, location: &str) -> String {
    format!("{dns_prefix}.{location}.cloudapp.azure.com")
}

/// Format the production FQDN for every location
pub fn format_prod_fqdns(dns_prefix: &str) -> Vec<String> {
    AZURE_LOCATIONS
        .iter()
        .map(|location| format_prod_fqdn(dns_prefix, location))
        .collect()
}

/// The IP addresses of the master nodes
///
/// Masters receive consecutive addresses starting at the orchestrator's
/// first static IP.
pub fn master_ips(definition: &ClusterDefinition) -> Result<Vec<IpAddr>> {
    let first: Ipv4Addr = definition
        .first_consecutive_static_ip()
        .parse()
        .map_err(|_| {
            Error::validation(
                "masterProfile.firstConsecutiveStaticIP",
                format!(
                    "'{}' is an invalid IP address",
                    definition.first_consecutive_static_ip()
                ),
            )
        })?;

    let octets = first.octets();
    Ok((0..definition.master_profile.count())
        .map(|i| {
            IpAddr::V4(Ipv4Addr::new(
                octets[0],
                octets[1],
                octets[2],
                octets[3].wrapping_add(i as u8),
            ))
        })
        .collect())
}
