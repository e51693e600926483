use crate::capacity;
use crate::cell::Cell;
use crate::error::{ChequeError, Result};

use cheque_config::ChangePolicyConfig;

use ckb_types::bytes::Bytes;
use ckb_types::core::Capacity;
use ckb_types::packed::{CellOutput, Script};
use ckb_types::prelude::*;

/// Capacity field, code hash and hash type of a lock-only cell.
const LOCK_ONLY_CELL_FIXED_BYTES: usize = 8 + 32 + 1;

/// How much capacity beyond the strict need is collected for the sender
/// change cell, which has to stay above its own minimum after paying the fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangePolicy {
    pub unit_buffer: Capacity,
    pub include_future_cell_cost: bool,
}

impl Default for ChangePolicy {
    fn default() -> Self {
        ChangePolicy::from(&ChangePolicyConfig::default())
    }
}

impl From<&ChangePolicyConfig> for ChangePolicy {
    fn from(config: &ChangePolicyConfig) -> Self {
        ChangePolicy {
            unit_buffer: Capacity::shannons(config.get_unit_buffer()),
            include_future_cell_cost: config.include_future_cell_cost(),
        }
    }
}

impl ChangePolicy {
    /// The capacity to collect from the sender: `extra_needed`, the unit
    /// buffer and the occupied capacity of a lock-only cell whose lock args
    /// are `lock_args_len` bytes long.
    pub fn required_capacity(&self, extra_needed: Capacity, lock_args_len: usize) -> Result<Capacity> {
        let required = capacity::add(extra_needed, self.unit_buffer)?;
        if self.include_future_cell_cost {
            capacity::add(required, lock_only_cell_capacity(lock_args_len)?)
        } else {
            Ok(required)
        }
    }
}

pub fn lock_only_cell_capacity(lock_args_len: usize) -> Result<Capacity> {
    capacity::bytes(LOCK_ONLY_CELL_FIXED_BYTES + lock_args_len)
}

/// The output returning freed capacity to the sender.
#[derive(Clone, Debug)]
pub struct WithdrawnChange {
    pub cell: Cell,
    /// Capacity the cell holds beyond what was freed, to be paid by the sender.
    pub extra_needed: Capacity,
}

/// Builds an empty-data, untyped cell of `sender_lock` holding
/// `freed_capacity`, raised to the cell minimum when that is not enough.
pub fn build_withdrawn_change_cell(
    sender_lock: &Script,
    freed_capacity: Capacity,
) -> Result<WithdrawnChange> {
    let output = CellOutput::new_builder().lock(sender_lock.clone()).build();
    let cell = Cell::new(output, Bytes::new());
    let minimal = cell.minimal_capacity()?;

    if freed_capacity < minimal {
        Ok(WithdrawnChange {
            cell: cell.with_capacity(minimal),
            extra_needed: capacity::sub(minimal, freed_capacity)?,
        })
    } else {
        Ok(WithdrawnChange {
            cell: cell.with_capacity(freed_capacity),
            extra_needed: Capacity::zero(),
        })
    }
}

/// Folds lock-only cells into a single output of the first cell's lock
/// holding their total capacity.
pub fn merge_lock_only_cells(cells: &[Cell]) -> Result<Cell> {
    let first = cells.first().ok_or(ChequeError::InsufficientFunds {
        required: 1,
        available: 0,
    })?;
    if let Some(cell) = cells.iter().find(|cell| !cell.is_lock_only()) {
        return Err(ChequeError::InvariantViolation(format!(
            "cell {:?} carries data or a type script",
            cell.out_point
        )));
    }
    let total = capacity::sum(cells.iter().map(Cell::capacity))?;
    let output = CellOutput::new_builder()
        .capacity(total.pack())
        .lock(first.lock())
        .build();
    Ok(Cell::new(output, Bytes::new()))
}
