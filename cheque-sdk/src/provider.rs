use crate::cell::{Cell, CellPage, SearchKey};
use crate::error::{ChequeError, Result};

use cheque_config::ScriptConfig;

use async_trait::async_trait;
use ckb_types::bytes::Bytes;
use ckb_types::packed::{CellDep, Script};

/// What the builder needs from the chain: the script template table, the
/// cell indexer and the fee configuration.
#[async_trait]
pub trait ChequeProvider: Send + Sync {
    /// Resolves an address to its lock script.
    fn parse_to_script(&self, address: &str) -> Result<Script>;

    /// Instantiates a registered script template with `args`.
    fn new_script(&self, template_name: &str, args: &[u8]) -> Result<Script>;

    /// Whether `script` was instantiated from the named template, whatever its args.
    fn is_template_of(&self, template_name: &str, script: &Script) -> bool;

    /// The cell deps needed to run every distinct script of `inputs` and
    /// `outputs`, each listed once.
    fn cell_deps_by_cells(&self, inputs: &[Cell], outputs: &[Cell]) -> Result<Vec<CellDep>>;

    /// Shannons per 1000 bytes.
    fn min_fee_rate(&self) -> u64;

    /// A witness sized like the one that will unlock cells of `lock`.
    fn witness_placeholder(&self, lock: &Script) -> Result<Bytes>;

    /// Fetches up to `limit` cells after `cursor`.
    async fn get_cells(
        &self,
        search_key: &SearchKey,
        limit: u32,
        cursor: Option<Bytes>,
    ) -> Result<CellPage>;
}

pub fn missing_template(template_name: &str) -> ChequeError {
    ChequeError::LockMismatch(format!("script template {} is not registered", template_name))
}

/// Resolves the cell deps of every distinct script template referenced by
/// `inputs` and `outputs` from the template table, in first-seen order.
pub fn cell_deps_from_table(
    script_config: &ScriptConfig,
    inputs: &[Cell],
    outputs: &[Cell],
) -> Result<Vec<CellDep>> {
    let mut cell_deps: Vec<CellDep> = Vec::new();
    let scripts = inputs
        .iter()
        .chain(outputs.iter())
        .flat_map(|cell| std::iter::once(cell.lock()).chain(cell.type_script()));
    for script in scripts {
        let (_, info) = script_config.find_template(&script).ok_or_else(|| {
            ChequeError::MissingCellDep(format!("{:#x}", script.code_hash()))
        })?;
        if !cell_deps.contains(&info.cell_dep) {
            cell_deps.push(info.cell_dep.clone());
        }
    }
    Ok(cell_deps)
}
