//! The validated derivation gateway.
//!
//! A request is checked against every admission rule before the scrypt
//! backend is called. The backend runs at most once per request and only
//! after all rules pass.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::backend::{BackendError, RustCryptoScrypt, ScryptBackend};
use crate::error::{Result, ScryptError};
use crate::options::ScryptOptions;
use crate::params::{self, ScryptParams};

/// Completion signal passed to the progress notifier.
pub const COMPLETE: f64 = 1.0;

/// A single derivation request. Borrowed inputs, built per call.
#[derive(Debug, Clone, Copy)]
pub struct DerivationRequest<'a> {
    pub password: &'a [u8],
    pub salt: &'a [u8],
    pub options: ScryptOptions,
}

impl<'a> DerivationRequest<'a> {
    pub fn new(password: &'a [u8], salt: &'a [u8], options: ScryptOptions) -> Self {
        Self {
            password,
            salt,
            options,
        }
    }

    /// Runs the admission checks without deriving anything.
    pub fn validate(&self) -> std::result::Result<ScryptParams, crate::ValidationError> {
        params::admit(self.password, self.salt, &self.options)
    }
}

/// A derived key of exactly `dkLen` bytes. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(Zeroizing<Vec<u8>>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex, two characters per byte, no separators.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl AsRef<[u8]> for DerivedKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DerivedKey({} bytes)", self.len())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gateway<B = RustCryptoScrypt> {
    backend: B,
}

impl Gateway<RustCryptoScrypt> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: ScryptBackend> Gateway<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validates `request` and, if every rule passes, derives the key.
    ///
    /// `progress` is called once with [`COMPLETE`] after a successful
    /// derivation and never on failure.
    pub fn derive(
        &self,
        request: &DerivationRequest<'_>,
        progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<DerivedKey> {
        let params = request.validate().inspect_err(|e| {
            debug!(rule = %e, "scrypt request rejected");
        })?;

        debug!(
            log_n = params.log_n(),
            r = params.r(),
            p = params.p(),
            dk_len = params.dk_len(),
            memory = params.memory_cost(),
            "deriving scrypt key"
        );

        let mut key = Zeroizing::new(vec![0u8; params.dk_len()]);
        self.backend
            .derive(request.password, request.salt, &params, &mut key)
            .map_err(|e| match e {
                BackendError::OutOfMemory => {
                    warn!(memory = params.memory_cost(), "scrypt allocation failed");
                    ScryptError::OutOfMemory
                }
                BackendError::Failed(msg) => ScryptError::Primitive(msg),
            })?;

        if let Some(notify) = progress {
            notify(COMPLETE);
        }

        Ok(DerivedKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn derives_requested_length() {
        let gateway = Gateway::new();
        let request = DerivationRequest::new(
            b"password",
            b"saltsalt",
            ScryptOptions::new(1024, 8, 1, 48),
        );
        let key = gateway.derive(&request, None).unwrap();
        assert_eq!(key.len(), 48);
        assert_eq!(key.to_hex().len(), 96);
    }

    #[test]
    fn progress_fires_once_on_success() {
        let gateway = Gateway::new();
        let request =
            DerivationRequest::new(b"password", b"saltsalt", ScryptOptions::new(16, 1, 1, 16));
        let mut seen = Vec::new();
        let mut notify = |v: f64| seen.push(v);
        gateway.derive(&request, Some(&mut notify)).unwrap();
        assert_eq!(seen, vec![1.0]);
    }

    #[test]
    fn progress_is_silent_on_rejection() {
        let gateway = Gateway::new();
        let request =
            DerivationRequest::new(b"password", b"salt", ScryptOptions::new(16, 1, 1, 16));
        let mut calls = 0;
        let mut notify = |_: f64| calls += 1;
        let err = gateway.derive(&request, Some(&mut notify)).unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::SaltLength(4)));
        assert_eq!(calls, 0);
    }

    #[test]
    fn debug_output_hides_key_material() {
        let gateway = Gateway::new();
        let request =
            DerivationRequest::new(b"password", b"saltsalt", ScryptOptions::new(16, 1, 1, 8));
        let key = gateway.derive(&request, None).unwrap();
        assert_eq!(format!("{key:?}"), "DerivedKey(8 bytes)");
    }
}
