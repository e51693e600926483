use crate::capacity;
use crate::cell::Cell;
use crate::error::{ChequeError, Result};

use ckb_types::core::Capacity;
use ckb_types::packed::Script;

/// Cheque cells moved back under the sender lock.
#[derive(Clone, Debug)]
pub struct Relocked {
    /// One output per cheque cell, in the same order, at minimal capacity.
    pub cells: Vec<Cell>,
    /// Capacity released by shrinking the cells to their minimum.
    pub freed_capacity: Capacity,
}

/// Re-locks every cheque cell to `sender_lock`, keeping data and type and
/// shrinking its capacity to the minimum the new lock allows.
pub fn relock_cheque_cells(cheque_cells: &[Cell], sender_lock: &Script) -> Result<Relocked> {
    let mut freed_capacity = Capacity::zero();
    let mut cells = Vec::with_capacity(cheque_cells.len());

    for cell in cheque_cells {
        let relocked = Cell::new(cell.output.clone(), cell.data.clone()).with_lock(sender_lock.clone());
        let minimal = relocked.minimal_capacity()?;
        let freed = cell.capacity().safe_sub(minimal).map_err(|_| {
            ChequeError::InvariantViolation(format!(
                "cheque cell {:?} holds {} shannons, less than the {} it needs under the sender lock",
                cell.out_point,
                cell.capacity().as_u64(),
                minimal.as_u64()
            ))
        })?;
        freed_capacity = capacity::add(freed_capacity, freed)?;
        cells.push(relocked.with_capacity(minimal));
    }

    Ok(Relocked {
        cells,
        freed_capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use ckb_types::bytes::Bytes;
    use ckb_types::core::ScriptHashType;
    use ckb_types::packed::CellOutput;
    use ckb_types::prelude::*;
    use ckb_types::H256;

    fn script(code_hash: u8, args_len: usize) -> Script {
        Script::new_builder()
            .code_hash(H256([code_hash; 32]).pack())
            .hash_type(ScriptHashType::Type.into())
            .args(Bytes::from(vec![code_hash; args_len]).pack())
            .build()
    }

    fn cheque_cell(capacity: u64) -> Cell {
        let output = CellOutput::new_builder()
            .capacity(Capacity::shannons(capacity).pack())
            .lock(script(1, 40))
            .type_(Some(script(3, 32)).pack())
            .build();
        Cell::new(output, Bytes::from(vec![0u8; 16]))
    }

    #[test]
    fn test_relock_frees_lock_difference() {
        let sender = script(2, 20);
        let relocked =
            relock_cheque_cells(&[cheque_cell(162_0000_0000), cheque_cell(200_0000_0000)], &sender)
                .unwrap();

        // 8 + 53 + 65 + 16 bytes under the sender lock
        let minimal = Capacity::shannons(142_0000_0000);
        assert!(relocked
            .cells
            .iter()
            .all(|cell| cell.capacity() == minimal && cell.lock() == sender));
        assert_eq!(
            relocked.freed_capacity,
            Capacity::shannons(20_0000_0000 + 58_0000_0000)
        );
    }

    #[test]
    fn test_underfunded_cheque_cell() {
        let result = relock_cheque_cells(&[cheque_cell(100_0000_0000)], &script(2, 20));
        assert!(matches!(result, Err(ChequeError::InvariantViolation(_))));
    }

    #[test]
    fn test_no_cheque_cells() {
        let relocked = relock_cheque_cells(&[], &script(2, 20)).unwrap();
        assert!(relocked.cells.is_empty());
        assert_eq!(relocked.freed_capacity, Capacity::zero());
    }
}
