//! Checked capacity arithmetic.
//!
//! Capacities are whole shannons held in [`Capacity`]; every operation is
//! checked, and an overflow or underflow surfaces as
//! [`ChequeError::InvariantViolation`] instead of wrapping.

use crate::error::{ChequeError, Result};

use ckb_types::core::Capacity;

pub fn add(lhs: Capacity, rhs: Capacity) -> Result<Capacity> {
    lhs.safe_add(rhs).map_err(|err| {
        ChequeError::InvariantViolation(format!(
            "{} + {} shannons: {}",
            lhs.as_u64(),
            rhs.as_u64(),
            err
        ))
    })
}

pub fn sub(lhs: Capacity, rhs: Capacity) -> Result<Capacity> {
    lhs.safe_sub(rhs).map_err(|err| {
        ChequeError::InvariantViolation(format!(
            "{} - {} shannons: {}",
            lhs.as_u64(),
            rhs.as_u64(),
            err
        ))
    })
}

pub fn sum<I>(capacities: I) -> Result<Capacity>
where
    I: IntoIterator<Item = Capacity>,
{
    capacities
        .into_iter()
        .try_fold(Capacity::zero(), |acc, capacity| add(acc, capacity))
}

/// The capacity occupied by `len` bytes on chain.
pub fn bytes(len: usize) -> Result<Capacity> {
    Capacity::bytes(len)
        .map_err(|err| ChequeError::InvariantViolation(format!("{} bytes: {}", len, err)))
}
