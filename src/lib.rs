//! Validated scrypt key derivation.
//!
//! Every request passes a fixed sequence of admission checks before the
//! scrypt primitive runs, which bounds memory and CPU cost and rules out
//! malformed parameters. Two call shapes are provided:
//!
//! - [`scrypt_binary`]: base64 password and salt in, raw key bytes out.
//! - [`scrypt_text`]: UTF-8 password and salt in, lowercase hex out.
//!
//! ```no_run
//! use scryptgate::{ScryptOptions, scrypt_text};
//!
//! let options = ScryptOptions::new(16384, 8, 1, 32);
//! let key = scrypt_text("password", "saltsalt", &options, None)?;
//! assert_eq!(key.len(), 64);
//! # Ok::<(), scryptgate::ScryptError>(())
//! ```

pub mod backend;
pub mod error;
pub mod gateway;
pub mod options;
pub mod params;
pub mod shapes;

pub use crate::backend::{BackendError, RustCryptoScrypt, ScryptBackend};
pub use crate::error::{ErrorKind, Field, Param, Result, ScryptError, ValidationError};
pub use crate::gateway::{COMPLETE, DerivationRequest, DerivedKey, Gateway};
pub use crate::options::{Preset, ScryptOptions};
pub use crate::params::ScryptParams;
pub use crate::shapes::{Input, Output, scrypt_binary, scrypt_text};
