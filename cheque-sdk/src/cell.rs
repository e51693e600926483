use crate::capacity;
use crate::error::{ChequeError, Result};

use ckb_types::bytes::Bytes;
use ckb_types::core::Capacity;
use ckb_types::packed::{CellOutput, OutPoint, Script};
use ckb_types::prelude::*;

/// A cell, either live on chain (with an out point) or being built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub output: CellOutput,
    pub data: Bytes,
    pub out_point: Option<OutPoint>,
}

impl Cell {
    pub fn new(output: CellOutput, data: Bytes) -> Self {
        Cell {
            output,
            data,
            out_point: None,
        }
    }

    pub fn live(output: CellOutput, data: Bytes, out_point: OutPoint) -> Self {
        Cell {
            output,
            data,
            out_point: Some(out_point),
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.output.capacity().unpack()
    }

    pub fn lock(&self) -> Script {
        self.output.lock()
    }

    pub fn type_script(&self) -> Option<Script> {
        self.output.type_().to_opt()
    }

    /// A cell holding nothing but capacity.
    pub fn is_lock_only(&self) -> bool {
        self.data.is_empty() && self.output.type_().is_none()
    }

    /// The least capacity the chain accepts for this cell: 8 bytes of
    /// capacity, the lock and type scripts and the data.
    pub fn minimal_capacity(&self) -> Result<Capacity> {
        let data_capacity = capacity::bytes(self.data.len())?;
        self.output
            .occupied_capacity(data_capacity)
            .map_err(|err| ChequeError::InvariantViolation(format!("occupied capacity: {}", err)))
    }

    pub fn with_capacity(&self, capacity: Capacity) -> Self {
        Cell {
            output: self
                .output
                .clone()
                .as_builder()
                .capacity(capacity.pack())
                .build(),
            ..self.clone()
        }
    }

    pub fn with_lock(&self, lock: Script) -> Self {
        Cell {
            output: self.output.clone().as_builder().lock(lock).build(),
            ..self.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptType {
    Lock,
    Type,
}

/// A query against the cell indexer.
///
/// `script` is matched exactly, args included; `filter` narrows matches to
/// cells carrying the other script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchKey {
    pub script: Script,
    pub script_type: ScriptType,
    pub filter: Option<Script>,
}

impl SearchKey {
    pub fn lock(script: Script) -> Self {
        SearchKey {
            script,
            script_type: ScriptType::Lock,
            filter: None,
        }
    }

    pub fn with_filter(self, filter: Option<Script>) -> Self {
        SearchKey { filter, ..self }
    }
}

/// One page of indexer results. An empty `cursor` means there is nothing
/// after this page.
#[derive(Clone, Debug, Default)]
pub struct CellPage {
    pub cells: Vec<Cell>,
    pub cursor: Option<Bytes>,
}
