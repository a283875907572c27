#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use scryptgate::{BackendError, ScryptBackend, ScryptParams};

/// Records every call and fills the key with a marker byte instead of
/// running scrypt.
#[derive(Debug, Default)]
pub struct CountingBackend {
    calls: AtomicUsize,
    last: Mutex<Option<ScryptParams>>,
}

impl CountingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<ScryptParams> {
        *self.last.lock().unwrap()
    }
}

impl ScryptBackend for CountingBackend {
    fn derive(
        &self,
        _password: &[u8],
        _salt: &[u8],
        params: &ScryptParams,
        out: &mut [u8],
    ) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(*params);
        out.fill(0xA5);
        Ok(())
    }
}

/// Always fails with the given error.
#[derive(Debug)]
pub struct FailingBackend(pub BackendError);

impl ScryptBackend for FailingBackend {
    fn derive(
        &self,
        _password: &[u8],
        _salt: &[u8],
        _params: &ScryptParams,
        _out: &mut [u8],
    ) -> Result<(), BackendError> {
        Err(self.0.clone())
    }
}
