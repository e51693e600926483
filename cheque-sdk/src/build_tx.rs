use crate::assembler::{assemble_and_pay_fee, RawTransaction};
use crate::cell::{Cell, SearchKey};
use crate::change::{build_withdrawn_change_cell, merge_lock_only_cells, ChangePolicy};
use crate::error::{ChequeError, Result};
use crate::lock::build_cheque_lock;
use crate::provider::ChequeProvider;
use crate::query::{collect, collect_lock_only_cells};
use crate::reconcile::relock_cheque_cells;
use crate::sender_lock::SenderLocks;
use crate::since::assign_since;

use ckb_types::core::{Capacity, TransactionView};
use ckb_types::packed::Script;
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct ChequeWithdrawOptions {
    pub sender: String,
    pub receiver: String,
    /// Only withdraw cheques carrying this sUDT type script.
    pub sudt: Option<Script>,
}

/// A withdrawal transaction ready to be signed by the sender.
#[derive(Clone, Debug)]
pub struct WithdrawTransaction {
    pub tx: TransactionView,
    /// The cells spent by `tx`, in input order.
    pub input_cells: Vec<Cell>,
    pub fee: Capacity,
}

/// Builds the transaction by which a sender takes back the cheques it sent
/// to a receiver once they have matured.
///
/// Inputs are the sender capacity cells followed by the cheque cells.
/// Outputs are the cheque cells re-locked to the sender, the cell returning
/// the capacity freed by re-locking and the sender change cell.
pub struct ChequeWithdrawBuilder<'a, P: ?Sized> {
    options: ChequeWithdrawOptions,
    provider: &'a P,
    policy: ChangePolicy,
}

impl<'a, P> ChequeWithdrawBuilder<'a, P>
where
    P: ChequeProvider + ?Sized,
{
    pub fn new(options: ChequeWithdrawOptions, provider: &'a P) -> Self {
        ChequeWithdrawBuilder {
            options,
            provider,
            policy: ChangePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ChangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Same as [`build`](Self::build), but waits for any other build of
    /// the same sender to finish first.
    pub async fn build_exclusive(&self, locks: &SenderLocks) -> Result<WithdrawTransaction> {
        let sender_lock = self.provider.parse_to_script(&self.options.sender)?;
        let _guard = locks.acquire(&sender_lock).await;
        self.build().await
    }

    pub async fn build(&self) -> Result<WithdrawTransaction> {
        let provider = self.provider;
        let sender_lock = provider.parse_to_script(&self.options.sender)?;
        let receiver_lock = provider.parse_to_script(&self.options.receiver)?;
        let cheque_lock = build_cheque_lock(provider, &receiver_lock, &sender_lock)?;

        let search_key = SearchKey::lock(cheque_lock.clone()).with_filter(self.options.sudt.clone());
        let cheque_cells: Vec<Cell> = collect(provider, &search_key, |_| false)
            .await?
            .into_iter()
            .filter(|cell| cell.lock() == cheque_lock)
            .collect();
        if cheque_cells.is_empty() {
            return Err(ChequeError::NoChequeCells(format!(
                "{} has no cheque cells for {}",
                self.options.sender, self.options.receiver
            )));
        }
        log::info!("withdrawing {} cheque cells", cheque_cells.len());

        let relocked = relock_cheque_cells(&cheque_cells, &sender_lock)?;
        let withdrawn_change = build_withdrawn_change_cell(&sender_lock, relocked.freed_capacity)?;
        log::debug!(
            "freed {} shannons, {} extra needed for the withdrawn change",
            relocked.freed_capacity.as_u64(),
            withdrawn_change.extra_needed.as_u64()
        );

        let required = self.policy.required_capacity(
            withdrawn_change.extra_needed,
            receiver_lock.args().raw_data().len(),
        )?;
        let capacity_cells = collect_lock_only_cells(provider, &sender_lock, required).await?;
        let sender_change = merge_lock_only_cells(&capacity_cells)?;

        let input_cells: Vec<Cell> = capacity_cells.into_iter().chain(cheque_cells).collect();
        let outputs: Vec<Cell> = relocked
            .cells
            .into_iter()
            .chain([withdrawn_change.cell, sender_change])
            .collect();
        let change_index = outputs.len() - 1;

        let raw_tx = RawTransaction {
            inputs: assign_since(provider, &input_cells)?,
            cell_deps: provider.cell_deps_by_cells(&input_cells, &outputs)?,
            witnesses: vec![provider.witness_placeholder(&sender_lock)?],
            outputs,
        };
        let paid = assemble_and_pay_fee(
            &raw_tx,
            change_index,
            withdrawn_change.extra_needed,
            provider.min_fee_rate(),
        )?;
        log::info!(
            "built cheque withdrawal {:#x}: {} inputs, fee {} shannons",
            paid.tx.hash(),
            input_cells.len(),
            paid.fee.as_u64()
        );

        Ok(WithdrawTransaction {
            tx: paid.tx,
            input_cells,
            fee: paid.fee,
        })
    }
}

pub fn dump_data<T>(data: &T, file_name: &str) -> anyhow::Result<()>
where
    T: ?Sized + Serialize,
{
    let json_string = serde_json::to_string_pretty(data)?;
    std::fs::write(file_name, json_string).map_err(Into::into)
}
