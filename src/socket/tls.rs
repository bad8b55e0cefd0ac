//! Per-address TLS client-certificate material.

use crate::base::neterror::NetError;
use boring::pkey::PKey;
use boring::ssl::{SslConnectorBuilder, SslFiletype};
use std::path::PathBuf;

/// Client certificate and key registered for one address, merged into the
/// SSL configuration at connect time.
#[derive(Debug, Clone)]
pub struct TlsClientAuth {
    cert: PathBuf,
    key: PathBuf,
    passphrase: Option<String>,
}

impl TlsClientAuth {
    pub fn new(cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        Self { cert: cert.into(), key: key.into(), passphrase: None }
    }

    /// Passphrase for an encrypted private key.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    pub(crate) fn apply_to_builder(
        &self,
        builder: &mut SslConnectorBuilder,
    ) -> Result<(), NetError> {
        builder
            .set_certificate_chain_file(&self.cert)
            .map_err(|e| NetError::ConnectionError {
                message: format!("loading client certificate failed: {e}"),
                code: None,
            })?;
        match &self.passphrase {
            Some(passphrase) => {
                let pem = std::fs::read(&self.key)
                    .map_err(|e| NetError::connection("reading client key failed", &e))?;
                let key = PKey::private_key_from_pem_passphrase(&pem, passphrase.as_bytes())
                    .map_err(|e| NetError::ConnectionError {
                        message: format!("decrypting client key failed: {e}"),
                        code: None,
                    })?;
                builder.set_private_key(&key).map_err(|e| NetError::ConnectionError {
                    message: format!("loading client key failed: {e}"),
                    code: None,
                })?;
            }
            None => {
                builder
                    .set_private_key_file(&self.key, SslFiletype::PEM)
                    .map_err(|e| NetError::ConnectionError {
                        message: format!("loading client key failed: {e}"),
                        code: None,
                    })?;
            }
        }
        Ok(())
    }
}
