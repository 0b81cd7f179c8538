//! Chain connection configuration.
//!
//! Mirrors the configuration surface of the node operators' bundle: one
//! account, one endpoint, the TLS material for the mutually-authenticated
//! channel, and the deployment flags that pin the digest algorithm. Every
//! file path resolves against `resource_dir`; a missing file is a fatal
//! configuration error, never a retryable one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::digest::DigestAlgorithm;
use crate::error::{ClientError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain account name; the account identity is derived from it.
    pub account: String,
    /// Account private key file, PKCS#8 PEM.
    pub account_key_file: PathBuf,
    pub account_key_password: String,

    /// Ledger node endpoint. Single node, no failover.
    pub host: String,
    pub port: u16,

    /// Client TLS private key, certificate and CA trust bundle, PEM.
    pub tls_key_file: PathBuf,
    pub tls_key_password: String,
    pub tls_cert_file: PathBuf,
    pub tls_ca_file: PathBuf,
    pub trust_store_password: String,

    /// Privacy/TEE deployment. Forces SM3 digests.
    pub tee_chain: bool,
    /// State-cryptography (national standard) deployment. Forces SM3.
    pub state_crypto: bool,

    /// Directory all relative resource paths resolve against.
    pub resource_dir: PathBuf,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            account: "demo-account".to_string(),
            account_key_file: PathBuf::from("account/user.key"),
            account_key_password: String::new(),
            host: "127.0.0.1".to_string(),
            port: 18130,
            tls_key_file: PathBuf::from("tls/client.key"),
            tls_key_password: String::new(),
            tls_cert_file: PathBuf::from("tls/client.crt"),
            tls_ca_file: PathBuf::from("tls/trust_ca.pem"),
            trust_store_password: String::new(),
            tee_chain: false,
            state_crypto: false,
            resource_dir: PathBuf::from("resources"),
        }
    }
}

impl ChainConfig {
    /// Load from a JSON file. Absent fields fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))
    }

    /// Digest pinned by the deployment flags.
    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::for_chain(self.tee_chain, self.state_crypto)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.resource_dir.join(path)
        }
    }

    /// Check that every required credential file exists. Fail-fast: the
    /// first missing file aborts with its resolved path.
    pub fn validate(&self) -> Result<()> {
        if self.account.is_empty() {
            return Err(ClientError::Config("account name is empty".to_string()));
        }
        for file in [
            &self.account_key_file,
            &self.tls_key_file,
            &self.tls_cert_file,
            &self.tls_ca_file,
        ] {
            let resolved = self.resolve(file);
            if !resolved.is_file() {
                return Err(ClientError::MissingResource(resolved));
            }
        }
        Ok(())
    }

    pub(crate) fn load_tls_material(&self) -> Result<TlsMaterial> {
        Ok(TlsMaterial {
            key_pem: self.read_resource(&self.tls_key_file)?,
            cert_pem: self.read_resource(&self.tls_cert_file)?,
            ca_pem: self.read_resource(&self.tls_ca_file)?,
        })
    }

    pub(crate) fn load_account_key(&self) -> Result<Vec<u8>> {
        let bytes = self.read_resource(&self.account_key_file)?;
        if bytes.is_empty() {
            return Err(ClientError::Config(format!(
                "account key file {} is empty",
                self.account_key_file.display()
            )));
        }
        Ok(bytes)
    }

    fn read_resource(&self, path: &Path) -> Result<Vec<u8>> {
        let resolved = self.resolve(path);
        fs::read(&resolved).map_err(|_| ClientError::MissingResource(resolved))
    }
}

/// PEM blobs for the mutually-authenticated channel. Key passwords stay in
/// the config; the rustls stack only accepts unencrypted PEM, so operators
/// decrypt at provisioning time.
pub(crate) struct TlsMaterial {
    pub key_pem: Vec<u8>,
    pub cert_pem: Vec<u8>,
    pub ca_pem: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_resources(dir: &Path) {
        for rel in ["account/user.key", "tls/client.key", "tls/client.crt", "tls/trust_ca.pem"] {
            let path = dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            let mut f = File::create(path).unwrap();
            f.write_all(b"-----BEGIN FAKE-----\n").unwrap();
        }
    }

    #[test]
    fn validate_accepts_complete_resources() {
        let dir = tempfile::tempdir().unwrap();
        write_resources(dir.path());
        let cfg = ChainConfig {
            resource_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_names_the_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_resources(dir.path());
        fs::remove_file(dir.path().join("tls/trust_ca.pem")).unwrap();

        let cfg = ChainConfig {
            resource_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        match cfg.validate() {
            Err(ClientError::MissingResource(path)) => {
                assert!(path.ends_with("tls/trust_ca.pem"));
            }
            other => panic!("expected MissingResource, got {other:?}"),
        }
    }

    #[test]
    fn empty_account_is_rejected() {
        let cfg = ChainConfig {
            account: String::new(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ClientError::Config(_))));
    }

    #[test]
    fn from_file_applies_defaults_for_absent_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, r#"{"account":"alice","tee_chain":true}"#).unwrap();

        let cfg = ChainConfig::from_file(&path).unwrap();
        assert_eq!(cfg.account, "alice");
        assert_eq!(cfg.port, 18130);
        assert_eq!(cfg.digest_algorithm(), DigestAlgorithm::Sm3);
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            ChainConfig::from_file(&path),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn absolute_paths_bypass_the_resource_dir() {
        let cfg = ChainConfig::default();
        let abs = if cfg!(windows) { PathBuf::from("C:\\x\\k.pem") } else { PathBuf::from("/x/k.pem") };
        assert_eq!(cfg.resolve(&abs), abs);
        assert_eq!(
            cfg.resolve(Path::new("tls/client.key")),
            Path::new("resources/tls/client.key")
        );
    }
}
