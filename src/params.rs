//! Admission checks and the validated scrypt parameters they produce.

use crate::error::{Param, ValidationError};
use crate::options::ScryptOptions;

pub const MAX_PASSWORD_LEN: usize = 1024;
pub const MIN_SALT_LEN: usize = 8;
pub const MAX_SALT_LEN: usize = 32;
pub const MIN_N: i64 = 2;
pub const MAX_N: i64 = 1 << 24;
pub const MAX_R: i64 = 256;
pub const MAX_P: i64 = 256;
pub const MAX_DK_LEN: i64 = 64;
/// Exclusive upper bound on `r * p`.
pub const BLOCK_BUDGET: i64 = 1 << 30;

/// Scrypt parameters that passed every admission check.
///
/// The only way to obtain one is through [`admit`], so holding a
/// `ScryptParams` means the cost of the derivation is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptParams {
    log_n: u8,
    r: u32,
    p: u32,
    dk_len: usize,
}

impl ScryptParams {
    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn n(&self) -> u64 {
        1u64 << self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    pub fn dk_len(&self) -> usize {
        self.dk_len
    }

    /// Estimated working set of a single-threaded derivation in bytes:
    /// `128 * r * (N + p + 1)`.
    pub fn memory_cost(&self) -> u64 {
        128 * u64::from(self.r) * (self.n() + u64::from(self.p) + 1)
    }
}

/// Runs the admission checks in their fixed order. The first violated
/// rule is returned and no later rule is evaluated.
pub fn admit(
    password: &[u8],
    salt: &[u8],
    options: &ScryptOptions,
) -> Result<ScryptParams, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if salt.is_empty() {
        return Err(ValidationError::EmptySalt);
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooLong(password.len()));
    }
    if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt.len()) {
        return Err(ValidationError::SaltLength(salt.len()));
    }

    let n = required(options.n, Param::N)?;
    let r = required(options.r, Param::R)?;
    let p = required(options.p, Param::P)?;
    let dk_len = required(options.dk_len, Param::DkLen)?;

    // 1 counts as a power of two here; the range check below rejects it.
    if n <= 0 || n & (n - 1) != 0 {
        return Err(ValidationError::NotPowerOfTwo(n));
    }
    if !(MIN_N..=MAX_N).contains(&n) {
        return Err(ValidationError::NOutOfRange(n));
    }
    if !(1..=MAX_R).contains(&r) {
        return Err(ValidationError::ROutOfRange(r));
    }
    if !(1..=MAX_P).contains(&p) {
        return Err(ValidationError::POutOfRange(p));
    }
    if !(1..=MAX_DK_LEN).contains(&dk_len) {
        return Err(ValidationError::DkLenOutOfRange(dk_len));
    }
    check_block_budget(r, p)?;

    Ok(ScryptParams {
        log_n: n.trailing_zeros() as u8,
        r: r as u32,
        p: p as u32,
        dk_len: dk_len as usize,
    })
}

/// Rejects `r * p >= 2^30`. The product is taken in 128 bits so that no
/// pair of `i64` inputs can overflow.
pub fn check_block_budget(r: i64, p: i64) -> Result<(), ValidationError> {
    let product = i128::from(r) * i128::from(p);
    if product >= i128::from(BLOCK_BUDGET) {
        return Err(ValidationError::BlockBudgetExceeded(
            i64::try_from(product).unwrap_or(i64::MAX),
        ));
    }
    Ok(())
}

fn required(value: Option<i64>, param: Param) -> Result<i64, ValidationError> {
    value.ok_or(ValidationError::MissingParameter(param))
}
