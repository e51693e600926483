use crate::capacity;
use crate::cell::Cell;
use crate::error::{ChequeError, Result};

use ckb_types::bytes::Bytes;
use ckb_types::core::{Capacity, TransactionBuilder, TransactionView};
use ckb_types::packed::{CellDep, CellInput, CellOutput};
use ckb_types::prelude::*;

/// Bytes a transaction occupies in a block: its molecule encoding plus the
/// offset entry in the block's transaction vector.
pub fn serialized_size_in_block(tx: &TransactionView) -> usize {
    tx.data().as_slice().len() + 4
}

/// `fee_rate` shannons per 1000 bytes, rounded up.
pub fn calc_fee(tx: &TransactionView, fee_rate: u64) -> Capacity {
    let size = serialized_size_in_block(tx) as u64;
    let fee = size.saturating_mul(fee_rate).saturating_add(999) / 1000;
    Capacity::shannons(fee)
}

/// A transaction before its fee has been paid.
pub struct RawTransaction {
    pub inputs: Vec<CellInput>,
    pub outputs: Vec<Cell>,
    pub cell_deps: Vec<CellDep>,
    pub witnesses: Vec<Bytes>,
}

impl RawTransaction {
    pub fn build(&self) -> TransactionView {
        let (outputs, outputs_data): (Vec<CellOutput>, Vec<_>) = self
            .outputs
            .iter()
            .map(|cell| (cell.output.clone(), cell.data.pack()))
            .unzip();
        TransactionBuilder::default()
            .inputs(self.inputs.clone())
            .outputs(outputs)
            .outputs_data(outputs_data)
            .cell_deps(self.cell_deps.clone())
            .witnesses(self.witnesses.iter().map(|witness| witness.pack()))
            .build()
    }
}

/// The assembled transaction and the fee it pays.
#[derive(Clone, Debug)]
pub struct FeePaidTransaction {
    pub tx: TransactionView,
    pub fee: Capacity,
}

/// Builds the transaction, then takes `fee + extra_needed` out of the
/// output at `change_index`, which must stay at or above its minimal
/// capacity.
///
/// Capacities are fixed-width, so shrinking the change output does not
/// change the size the fee was computed on.
pub fn assemble_and_pay_fee(
    raw_tx: &RawTransaction,
    change_index: usize,
    extra_needed: Capacity,
    fee_rate: u64,
) -> Result<FeePaidTransaction> {
    let change = raw_tx.outputs.get(change_index).ok_or_else(|| {
        ChequeError::InvariantViolation(format!("no change output at {}", change_index))
    })?;
    let tx = raw_tx.build();
    let fee = calc_fee(&tx, fee_rate);
    let deduction = capacity::add(fee, extra_needed)?;
    let required = capacity::add(deduction, change.minimal_capacity()?)?;
    if change.capacity() < required {
        return Err(ChequeError::InsufficientFunds {
            required: required.as_u64(),
            available: change.capacity().as_u64(),
        });
    }
    let change_capacity = capacity::sub(change.capacity(), deduction)?;

    let outputs: Vec<CellOutput> = tx
        .outputs()
        .into_iter()
        .enumerate()
        .map(|(index, output)| {
            if index == change_index {
                output.as_builder().capacity(change_capacity.pack()).build()
            } else {
                output
            }
        })
        .collect();
    let tx = tx.as_advanced_builder().set_outputs(outputs).build();
    log::debug!(
        "transaction {:#x} is {} bytes, fee {} shannons",
        tx.hash(),
        serialized_size_in_block(&tx),
        fee.as_u64()
    );
    Ok(FeePaidTransaction { tx, fee })
}
