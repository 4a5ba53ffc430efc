//! PKI bundle generation for mutual-TLS cluster bootstrap
//!
//! Mints a certificate authority plus two leaf certificates (API server and
//! client) signed by that CA. The bundle is generated fresh per invocation
//! and handed to the template assembler; nothing here persists key material.
//!
//! Issuance order matters: the CA must exist before either leaf is signed.
//! A failure at any step fails the whole call; a partial bundle (a CA
//! without leaves) is never returned.

use std::net::{IpAddr, Ipv4Addr};

use rand::RngCore;
use rcgen::{
    string::Ia5String, BasicConstraints, CertificateParams, DistinguishedName, DnType, DnValue,
    ExtendedKeyUsagePurpose, IsCa, Issuer, KeyPair, KeyUsagePurpose, SanType, SerialNumber,
    PKCS_RSA_SHA256,
};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{Error, Result};

/// RSA key size for every certificate in the bundle
pub const PKI_KEY_SIZE_BITS: usize = 4096;

/// Validity window for every certificate in the bundle
pub const CERT_VALIDITY: Duration = Duration::days(2 * 365);

/// In-cluster IP of the API service, always a SAN on the server certificate
pub const API_SERVICE_IP: Ipv4Addr = Ipv4Addr::new(10, 3, 0, 1);

/// A PEM-encoded certificate and its private key
#[derive(Clone, Debug)]
pub struct CertKeyPair {
    /// PEM-encoded X.509 certificate
    pub certificate_pem: String,
    /// PEM-encoded PKCS#8 private key
    pub private_key_pem: String,
}

/// The full trust bundle for one cluster generation
#[derive(Clone, Debug)]
pub struct PkiBundle {
    /// Self-signed certificate authority
    pub ca: CertKeyPair,
    /// Server certificate for the cluster API endpoint
    pub api_server: CertKeyPair,
    /// Client certificate for node and operator authentication
    pub client: CertKeyPair,
}

/// What kind of certificate to issue
enum CertProfile<'a> {
    /// Self-signed authority
    Ca,
    /// serverAuth leaf carrying the SAN sets
    Server {
        fqdns: &'a [String],
        ips: &'a [IpAddr],
    },
    /// clientAuth leaf, no SAN
    Client,
}

/// Generate a CA, API-server and client certificate for a cluster
///
/// The API-server certificate is valid for `master_fqdn`, every name in
/// `extra_fqdns`, the canonical in-cluster service names under
/// `cluster_domain`, every address in `extra_ips` and the in-cluster API
/// service IP.
pub fn generate_pki(
    master_fqdn: &str,
    extra_fqdns: &[String],
    extra_ips: &[IpAddr],
    cluster_domain: &str,
) -> Result<PkiBundle> {
    let mut fqdns = extra_fqdns.to_vec();
    fqdns.push("kubernetes".to_string());
    fqdns.push("kubernetes.default".to_string());
    fqdns.push("kubernetes.default.svc".to_string());
    fqdns.push(format!("kubernetes.default.svc.{cluster_domain}"));
    fqdns.push("kubernetes.kube-system".to_string());
    fqdns.push("kubernetes.kube-system.svc".to_string());
    fqdns.push(format!("kubernetes.kube-system.svc.{cluster_domain}"));
    fqdns.push(master_fqdn.to_string());

    let mut ips = extra_ips.to_vec();
    ips.push(IpAddr::V4(API_SERVICE_IP));

    let (ca, ca_key) = issue("ca", CertProfile::Ca, None)?;

    let issuer = Issuer::from_ca_cert_pem(&ca.certificate_pem, ca_key)
        .map_err(|e| Error::crypto(format!("failed to build CA issuer: {e}")))?;

    let (api_server, _) = issue(
        "apiserver",
        CertProfile::Server {
            fqdns: &fqdns,
            ips: &ips,
        },
        Some(&issuer),
    )?;
    let (client, _) = issue("client", CertProfile::Client, Some(&issuer))?;

    debug!(sans = fqdns.len(), ips = ips.len(), "generated PKI bundle");
    Ok(PkiBundle {
        ca,
        api_server,
        client,
    })
}

/// Issue one certificate; omitting `issuer` signals self-signing
fn issue(
    common_name: &str,
    profile: CertProfile<'_>,
    issuer: Option<&Issuer<'_, KeyPair>>,
) -> Result<(CertKeyPair, KeyPair)> {
    let mut params = CertificateParams::default();

    let mut dn = DistinguishedName::new();
    dn.push(
        DnType::CommonName,
        DnValue::Utf8String(common_name.to_string()),
    );
    params.distinguished_name = dn;

    let now = OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now + CERT_VALIDITY;

    // 128-bit random serial; DER integers are signed, so clear the top bit
    let mut serial = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut serial);
    serial[0] &= 0x7f;
    params.serial_number = Some(SerialNumber::from_slice(&serial));

    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];

    match profile {
        CertProfile::Ca => {
            params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
            params.key_usages.push(KeyUsagePurpose::KeyCertSign);
        }
        CertProfile::Server { fqdns, ips } => {
            params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
            for fqdn in fqdns {
                let name = Ia5String::try_from(fqdn.as_str()).map_err(|e| {
                    Error::crypto(format!("'{fqdn}' is not a valid SAN DNS name: {e}"))
                })?;
                params.subject_alt_names.push(SanType::DnsName(name));
            }
            for ip in ips {
                params.subject_alt_names.push(SanType::IpAddress(*ip));
            }
        }
        CertProfile::Client => {
            params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ClientAuth];
        }
    }

    let (key_pair, private_key_pem) = new_rsa_key_pair(common_name)?;

    let certificate = match issuer {
        Some(issuer) => params.signed_by(&key_pair, issuer),
        None => params.self_signed(&key_pair),
    }
    .map_err(|e| Error::crypto(format!("failed to create '{common_name}' certificate: {e}")))?;

    Ok((
        CertKeyPair {
            certificate_pem: certificate.pem(),
            private_key_pem,
        },
        key_pair,
    ))
}

/// Generate a fresh 4096-bit RSA key pair
///
/// rcgen only generates EC keys natively, so the key itself comes from the
/// rsa crate and is bridged in as PKCS#8 PEM.
fn new_rsa_key_pair(common_name: &str) -> Result<(KeyPair, String)> {
    let mut rng = rand::rngs::OsRng;
    let private_key = RsaPrivateKey::new(&mut rng, PKI_KEY_SIZE_BITS)
        .map_err(|e| Error::crypto(format!("failed to generate '{common_name}' key: {e}")))?;

    let pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| Error::crypto(format!("failed to encode '{common_name}' key: {e}")))?;

    let key_pair = KeyPair::from_pem_and_sign_algo(&pem, &PKCS_RSA_SHA256)
        .map_err(|e| Error::crypto(format!("failed to load '{common_name}' key: {e}")))?;

    Ok((key_pair, pem.to_string()))
}
