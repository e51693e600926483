use anyhow::{anyhow, Result};
use ckb_jsonrpc_types::{CellDep, Script};
use ckb_types::packed;
use serde::Deserialize;

/// A deployed script template and the cell dep that carries its code.
///
/// The args of `script` are not part of the template identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptInfo {
    pub script: packed::Script,
    pub cell_dep: packed::CellDep,
}

/// One `[[scripts]]` row of the config file, with `script` and `cell_dep`
/// given as JSON strings in the ckb-jsonrpc-types format.
#[derive(Deserialize, Default, Clone, Debug)]
pub struct ScriptConfigItem {
    script_name: String,
    script: String,
    cell_dep: String,
}

impl ScriptConfigItem {
    pub fn new(script_name: &str, script: &str, cell_dep: &str) -> Self {
        ScriptConfigItem {
            script_name: script_name.to_string(),
            script: script.to_string(),
            cell_dep: cell_dep.to_string(),
        }
    }

    pub fn get_script_name(&self) -> &str {
        &self.script_name
    }

    pub fn to_script_info(&self) -> Result<ScriptInfo> {
        let script = serde_json::from_str::<Script>(&self.script)
            .map_err(|err| anyhow!("script {} is malformed: {}", self.script_name, err))?;
        let cell_dep = serde_json::from_str::<CellDep>(&self.cell_dep)
            .map_err(|err| anyhow!("cell dep of {} is malformed: {}", self.script_name, err))?;
        Ok(ScriptInfo {
            script: script.into(),
            cell_dep: cell_dep.into(),
        })
    }
}
