use crate::address::{parse_lock_script, parse_network_type};
use crate::cell::{Cell, CellPage, ScriptType, SearchKey};
use crate::error::{ChequeError, Result};
use crate::provider::{cell_deps_from_table, missing_template, ChequeProvider};
use crate::witness::secp256k1_placeholder;

use cheque_config::{AppConfig, ScriptConfig, SECP256K1_BLAKE160};

use async_trait::async_trait;
use ckb_jsonrpc_types::JsonBytes;
use ckb_sdk::rpc::ckb_indexer::{self, Order, ScriptSearchMode, SearchKeyFilter};
use ckb_sdk::rpc::IndexerRpcClient;
use ckb_sdk::NetworkType;
use ckb_types::bytes::Bytes;
use ckb_types::packed::{CellDep, Script};

/// A [`ChequeProvider`] backed by a CKB indexer JSON-RPC endpoint and the
/// script table of the config file.
#[derive(Clone, Debug)]
pub struct RpcProvider {
    indexer_uri: String,
    network: NetworkType,
    script_config: ScriptConfig,
    min_fee_rate: u64,
}

impl RpcProvider {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let ckb_config = config.get_ckb_config();
        Ok(RpcProvider {
            indexer_uri: ckb_config.get_indexer_uri().to_owned(),
            network: parse_network_type(ckb_config.get_network_type())?,
            script_config: config.get_script_config(),
            min_fee_rate: config.get_fee_config().get_min_fee_rate(),
        })
    }
}

fn to_indexer_search_key(search_key: &SearchKey) -> ckb_indexer::SearchKey {
    let script_type = match search_key.script_type {
        ScriptType::Lock => ckb_indexer::ScriptType::Lock,
        ScriptType::Type => ckb_indexer::ScriptType::Type,
    };
    let filter = search_key.filter.clone().map(|script| SearchKeyFilter {
        script: Some(script.into()),
        ..Default::default()
    });
    ckb_indexer::SearchKey {
        script: search_key.script.clone().into(),
        script_type,
        script_search_mode: Some(ScriptSearchMode::Exact),
        filter,
        with_data: Some(true),
        group_by_transaction: None,
    }
}

#[async_trait]
impl ChequeProvider for RpcProvider {
    fn parse_to_script(&self, address: &str) -> Result<Script> {
        parse_lock_script(address, self.network)
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
        self.min_fee_rate
    }

    fn witness_placeholder(&self, lock: &Script) -> Result<Bytes> {
        if self.script_config.is_template_of(SECP256K1_BLAKE160, lock) {
            Ok(secp256k1_placeholder())
        } else {
            Err(ChequeError::LockMismatch(format!(
                "no witness layout known for lock {:#x}",
                lock.code_hash()
            )))
        }
    }

    async fn get_cells(
        &self,
        search_key: &SearchKey,
        limit: u32,
        cursor: Option<Bytes>,
    ) -> Result<CellPage> {
        let indexer_uri = self.indexer_uri.clone();
        let search_key = to_indexer_search_key(search_key);
        let after = cursor.map(JsonBytes::from_bytes);
        let page = tokio::task::spawn_blocking(move || {
            IndexerRpcClient::new(&indexer_uri).get_cells(search_key, Order::Asc, limit.into(), after)
        })
        .await
        .map_err(|err| ChequeError::QueryFailed(err.to_string()))?
        .map_err(|err| ChequeError::QueryFailed(err.to_string()))?;

        log::debug!("indexer returned {} cells", page.objects.len());
        let cells = page
            .objects
            .into_iter()
            .map(|cell| {
                let data = cell.output_data.map(JsonBytes::into_bytes).unwrap_or_default();
                Cell::live(cell.output.into(), data, cell.out_point.into())
            })
            .collect();
        let cursor = Some(page.last_cursor.into_bytes()).filter(|cursor| !cursor.is_empty());
        Ok(CellPage { cells, cursor })
    }
}
