pub mod ckb_config;
pub mod policy;
pub mod script;

pub use ckb_config::CkbConfig;
pub use policy::{ChangePolicyConfig, FeeConfig};
pub use script::{ScriptConfigItem, ScriptInfo};

use anyhow::{anyhow, Result};
use ckb_types::packed;
use ckb_types::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use std::collections::HashMap;
use std::{fs::File, io::Read, path::Path};

pub const CHEQUE: &str = "CHEQUE";
pub const SECP256K1_BLAKE160: &str = "SECP256K1_BLAKE160";
pub const SUDT: &str = "SUDT";

#[derive(Deserialize, Default, Clone, Debug)]
pub struct ConfigFile {
    pub ckb_config: CkbConfig,
    pub scripts: Vec<ScriptConfigItem>,
    #[serde(default)]
    pub fee_config: FeeConfig,
    #[serde(default)]
    pub change_policy: ChangePolicyConfig,
}

impl ConfigFile {
    pub fn to_script_map(&self) -> Result<HashMap<String, ScriptInfo>> {
        self.scripts
            .iter()
            .map(|item| Ok((item.get_script_name().to_owned(), item.to_script_info()?)))
            .collect()
    }
}

impl TryFrom<ConfigFile> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(config_file: ConfigFile) -> Result<Self> {
        Self::new(config_file)
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    ckb_config: CkbConfig,
    script_config: ScriptConfig,
    fee_config: FeeConfig,
    change_policy: ChangePolicyConfig,
}

impl AppConfig {
    pub fn new(config_file: ConfigFile) -> Result<Self> {
        let script_config = ScriptConfig::new(config_file.to_script_map()?);
        for required in [CHEQUE, SECP256K1_BLAKE160] {
            if script_config.get_script_info(required).is_none() {
                return Err(anyhow!("script {} is missing from the config", required));
            }
        }
        Ok(Self {
            ckb_config: config_file.ckb_config,
            script_config,
            fee_config: config_file.fee_config,
            change_policy: config_file.change_policy,
        })
    }

    pub fn get_ckb_config(&self) -> CkbConfig {
        self.ckb_config.clone()
    }

    pub fn get_script_config(&self) -> ScriptConfig {
        self.script_config.clone()
    }

    pub fn get_fee_config(&self) -> FeeConfig {
        self.fee_config.clone()
    }

    pub fn get_change_policy(&self) -> ChangePolicyConfig {
        self.change_policy.clone()
    }
}

/// The table of script templates deployed on the chain.
#[derive(Clone, Debug, Default)]
pub struct ScriptConfig {
    script_map: HashMap<String, ScriptInfo>,
}

impl ScriptConfig {
    pub fn new(script_map: HashMap<String, ScriptInfo>) -> Self {
        Self { script_map }
    }

    pub fn get_script_info(&self, script_name: &str) -> Option<ScriptInfo> {
        self.script_map.get(script_name).cloned()
    }

    pub fn get_cell_dep(&self, script_name: &str) -> Option<packed::CellDep> {
        self.script_map
            .get(script_name)
            .map(|info| info.cell_dep.clone())
    }

    /// Builds a script of the named template with the given args.
    pub fn new_script(&self, script_name: &str, args: &[u8]) -> Option<packed::Script> {
        self.script_map.get(script_name).map(|info| {
            info.script
                .clone()
                .as_builder()
                .args(args.pack())
                .build()
        })
    }

    pub fn is_template_of(&self, script_name: &str, script: &packed::Script) -> bool {
        self.script_map
            .get(script_name)
            .map(|info| same_template(&info.script, script))
            .unwrap_or(false)
    }

    /// Finds the template a script was instantiated from.
    pub fn find_template(&self, script: &packed::Script) -> Option<(&str, &ScriptInfo)> {
        self.script_map
            .iter()
            .find(|(_, info)| same_template(&info.script, script))
            .map(|(name, info)| (name.as_str(), info))
    }
}

fn same_template(template: &packed::Script, script: &packed::Script) -> bool {
    template.code_hash() == script.code_hash() && template.hash_type() == script.hash_type()
}

pub fn parse<T: DeserializeOwned>(name: impl AsRef<Path>) -> Result<T> {
    parse_reader(&mut File::open(name)?)
}

fn parse_reader<R: Read, T: DeserializeOwned>(r: &mut R) -> Result<T> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    Ok(toml::from_slice(&buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[ckb_config]
network_type = "ckb_testnet"
indexer_uri = "http://127.0.0.1:8116"

[[scripts]]
script_name = "CHEQUE"
script = '''
{
    "args": "0x",
    "code_hash": "0x60d5f39efce409c587cb9ea359cefdead650ca128f0bd9cb3855348f98c70d5b",
    "hash_type": "type"
}
'''
cell_dep = '''
{
    "dep_type": "dep_group",
    "out_point": {
        "index": "0x0",
        "tx_hash": "0x7f96858be0a9d584b4a9ea190e0420835156a6010a5fde15ffcdc9d9c721ccab"
    }
}
'''

[[scripts]]
script_name = "SECP256K1_BLAKE160"
script = '''
{
    "args": "0x",
    "code_hash": "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8",
    "hash_type": "type"
}
'''
cell_dep = '''
{
    "dep_type": "dep_group",
    "out_point": {
        "index": "0x0",
        "tx_hash": "0xf8de3bb47d055cdf460d93a2a6e1b05f7432f9777c8c474abf4eec1d4aee5d37"
    }
}
'''

[fee_config]
min_fee_rate = 1200

[change_policy]
unit_buffer = "0x3b9aca00"
"#;

    fn load() -> AppConfig {
        let config_file: ConfigFile = toml::from_str(CONFIG).unwrap();
        AppConfig::new(config_file).unwrap()
    }

    #[test]
    fn test_parse_config() {
        let config = load();
        assert_eq!(config.get_ckb_config().get_network_type(), "ckb_testnet");
        assert_eq!(config.get_fee_config().get_min_fee_rate(), 1200);
        assert_eq!(config.get_change_policy().get_unit_buffer(), 10_0000_0000);
        assert!(config.get_change_policy().include_future_cell_cost());
        assert!(config.get_script_config().get_cell_dep(CHEQUE).is_some());
    }

    #[test]
    fn test_template_ignores_args() {
        let scripts = load().get_script_config();
        let cheque = scripts.new_script(CHEQUE, &[7u8; 40]).unwrap();
        assert_eq!(cheque.args().raw_data().len(), 40);
        assert!(scripts.is_template_of(CHEQUE, &cheque));
        assert!(!scripts.is_template_of(SECP256K1_BLAKE160, &cheque));
        assert_eq!(scripts.find_template(&cheque).map(|(name, _)| name), Some(CHEQUE));
    }

    #[test]
    fn test_missing_required_script() {
        let mut config_file: ConfigFile = toml::from_str(CONFIG).unwrap();
        config_file
            .scripts
            .retain(|item| item.get_script_name() != CHEQUE);
        assert!(AppConfig::new(config_file).is_err());
    }

    #[test]
    fn test_defaults() {
        let config_file: ConfigFile = toml::from_str(
            r#"
scripts = []

[ckb_config]
network_type = "ckb"
indexer_uri = "http://127.0.0.1:8116"
"#,
        )
        .unwrap();
        assert_eq!(config_file.fee_config.get_min_fee_rate(), 1000);
        assert_eq!(config_file.change_policy.get_unit_buffer(), 1_0000_0000);
    }
}
