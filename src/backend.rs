//! The scrypt primitive behind the gateway.

use thiserror::Error;

use crate::params::ScryptParams;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("insufficient memory for scrypt working set")]
    OutOfMemory,

    #[error("{0}")]
    Failed(String),
}

/// An RFC 7914 scrypt implementation.
///
/// `out` is exactly `params.dk_len()` bytes long and must be completely
/// filled on success.
pub trait ScryptBackend {
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ScryptParams,
        out: &mut [u8],
    ) -> Result<(), BackendError>;
}

impl<B: ScryptBackend + ?Sized> ScryptBackend for &B {
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ScryptParams,
        out: &mut [u8],
    ) -> Result<(), BackendError> {
        (**self).derive(password, salt, params, out)
    }
}

/// Pure Rust scrypt from the `scrypt` crate.
///
/// Before deriving, the working set is reserved once with a fallible
/// allocation so that a host without enough memory yields
/// [`BackendError::OutOfMemory`] instead of aborting the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoScrypt;

impl ScryptBackend for RustCryptoScrypt {
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ScryptParams,
        out: &mut [u8],
    ) -> Result<(), BackendError> {
        reserve_working_set(params.memory_cost())?;

        // `len` only matters for PHC string output; the raw API uses `out.len()`.
        let scrypt_params = scrypt::Params::new(
            params.log_n(),
            params.r(),
            params.p(),
            scrypt::Params::RECOMMENDED_LEN,
        )
        .map_err(|_| {
            BackendError::Failed(format!(
                "parameters exceed RFC 7914 limits (N must be below 2^(16 * r), got N = 2^{} with r = {})",
                params.log_n(),
                params.r()
            ))
        })?;

        scrypt::scrypt(password, salt, &scrypt_params, out)
            .map_err(|e| BackendError::Failed(e.to_string()))
    }
}

fn reserve_working_set(bytes: u64) -> Result<(), BackendError> {
    let bytes = usize::try_from(bytes).map_err(|_| BackendError::OutOfMemory)?;
    let mut probe: Vec<u8> = Vec::new();
    probe
        .try_reserve_exact(bytes)
        .map_err(|_| BackendError::OutOfMemory)?;
    Ok(())
}
