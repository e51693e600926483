#![allow(dead_code)]

use cheque_config::{ScriptConfig, ScriptInfo, CHEQUE, SECP256K1_BLAKE160, SUDT};
use cheque_sdk::address::parse_lock_script;
use cheque_sdk::provider::{cell_deps_from_table, missing_template};
use cheque_sdk::witness::secp256k1_placeholder;
use cheque_sdk::{Cell, CellPage, ChequeError, ChequeProvider, Result, ScriptType, SearchKey};

use async_trait::async_trait;
use ckb_sdk::{Address, AddressPayload, NetworkType};
use ckb_types::bytes::Bytes;
use ckb_types::core::{Capacity, DepType, ScriptHashType};
use ckb_types::packed::{CellDep, CellOutput, OutPoint, Script};
use ckb_types::prelude::*;
use ckb_types::{h256, H256};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SECP_CODE_HASH: H256 =
    h256!("0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8");
pub const CHEQUE_CODE_HASH: H256 =
    h256!("0x60d5f39efce409c587cb9ea359cefdead650ca128f0bd9cb3855348f98c70d5b");
pub const SUDT_CODE_HASH: H256 =
    h256!("0xc5e5dcf215925f7ef4dfaf5f4b4f105bc321c02776d6e7d52a1db3fcd9d011a4");

pub const CKB: u64 = 1_0000_0000;

fn template(code_hash: &H256, dep_tx: u8) -> ScriptInfo {
    ScriptInfo {
        script: Script::new_builder()
            .code_hash(code_hash.pack())
            .hash_type(ScriptHashType::Type.into())
            .build(),
        cell_dep: CellDep::new_builder()
            .out_point(OutPoint::new(H256([dep_tx; 32]).pack(), 0))
            .dep_type(DepType::DepGroup.into())
            .build(),
    }
}

pub fn script_config() -> ScriptConfig {
    let mut map = HashMap::new();
    map.insert(SECP256K1_BLAKE160.to_string(), template(&SECP_CODE_HASH, 0xa1));
    map.insert(CHEQUE.to_string(), template(&CHEQUE_CODE_HASH, 0xa2));
    map.insert(SUDT.to_string(), template(&SUDT_CODE_HASH, 0xa3));
    ScriptConfig::new(map)
}

pub fn secp_lock(arg: u8) -> Script {
    script_config()
        .new_script(SECP256K1_BLAKE160, &[arg; 20])
        .unwrap()
}

pub fn sudt_type(owner: u8) -> Script {
    script_config().new_script(SUDT, &[owner; 32]).unwrap()
}

pub fn testnet_address(lock: &Script) -> String {
    let payload = AddressPayload::new_full(
        ScriptHashType::Type,
        lock.code_hash(),
        lock.args().raw_data(),
    );
    Address::new(NetworkType::Testnet, payload, true).to_string()
}

fn out_point(index: u32) -> OutPoint {
    let mut tx_hash = [0u8; 32];
    tx_hash[..4].copy_from_slice(&index.to_le_bytes());
    OutPoint::new(H256(tx_hash).pack(), index)
}

pub fn capacity_cell(lock: &Script, capacity: u64, index: u32) -> Cell {
    let output = CellOutput::new_builder()
        .capacity(Capacity::shannons(capacity).pack())
        .lock(lock.clone())
        .build();
    Cell::live(output, Bytes::new(), out_point(index))
}

pub fn sudt_cell(lock: &Script, type_script: &Script, capacity: u64, amount: u128, index: u32) -> Cell {
    let output = CellOutput::new_builder()
        .capacity(Capacity::shannons(capacity).pack())
        .lock(lock.clone())
        .type_(Some(type_script.clone()).pack())
        .build();
    Cell::live(
        output,
        Bytes::from(amount.to_le_bytes().to_vec()),
        out_point(index),
    )
}

fn matches(search_key: &SearchKey, cell: &Cell) -> bool {
    let (primary, other) = match search_key.script_type {
        ScriptType::Lock => (Some(cell.lock()), cell.type_script()),
        ScriptType::Type => (cell.type_script(), Some(cell.lock())),
    };
    let filter_match = match &search_key.filter {
        Some(filter) => other.as_ref() == Some(filter),
        None => true,
    };
    primary.as_ref() == Some(&search_key.script) && filter_match
}

/// An in-memory indexer over a fixed set of live cells. Cursors are the
/// little-endian offset of the next cell.
pub struct MockProvider {
    script_config: ScriptConfig,
    cells: Vec<Cell>,
    fee_rate: u64,
    fail_queries: bool,
    pub queries: AtomicUsize,
    pub served: AtomicUsize,
}

impl MockProvider {
    pub fn new(cells: Vec<Cell>) -> Self {
        MockProvider {
            script_config: script_config(),
            cells,
            fee_rate: 1000,
            fail_queries: false,
            queries: AtomicUsize::new(0),
            served: AtomicUsize::new(0),
        }
    }

    pub fn with_fee_rate(mut self, fee_rate: u64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChequeProvider for MockProvider {
    fn parse_to_script(&self, address: &str) -> Result<Script> {
        parse_lock_script(address, NetworkType::Testnet)
    }

    fn new_script(&self, template_name: &str, args: &[u8]) -> Result<Script> {
        self.script_config
            .new_script(template_name, args)
            .ok_or_else(|| missing_template(template_name))
    }

    fn is_template_of(&self, template_name: &str, script: &Script) -> bool {
        self.script_config.is_template_of(template_name, script)
    }

    fn cell_deps_by_cells(&self, inputs: &[Cell], outputs: &[Cell]) -> Result<Vec<CellDep>> {
        cell_deps_from_table(&self.script_config, inputs, outputs)
    }

    fn min_fee_rate(&self) -> u64 {
        self.fee_rate
    }

    fn witness_placeholder(&self, _lock: &Script) -> Result<Bytes> {
        Ok(secp256k1_placeholder())
    }

    async fn get_cells(
        &self,
        search_key: &SearchKey,
        limit: u32,
        cursor: Option<Bytes>,
    ) -> Result<CellPage> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(ChequeError::QueryFailed("indexer unreachable".to_string()));
        }
        let offset = cursor
            .map(|cursor| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&cursor[..8]);
                u64::from_le_bytes(buf) as usize
            })
            .unwrap_or(0);
        let matched: Vec<Cell> = self
            .cells
            .iter()
            .filter(|cell| matches(search_key, cell))
            .cloned()
            .collect();
        let end = (offset + limit as usize).min(matched.len());
        let cells = matched
            .get(offset..end)
            .map(|cells| cells.to_vec())
            .unwrap_or_default();
        self.served.fetch_add(cells.len(), Ordering::SeqCst);
        Ok(CellPage {
            cells,
            cursor: Some(Bytes::from((end as u64).to_le_bytes().to_vec())),
        })
    }
}
