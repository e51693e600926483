use serde::Deserialize;

#[derive(Deserialize, Default, Clone, Debug)]
pub struct CkbConfig {
    network_type: String,
    indexer_uri: String,
}

impl CkbConfig {
    pub fn new(network_type: &str, indexer_uri: &str) -> Self {
        CkbConfig {
            network_type: network_type.to_string(),
            indexer_uri: indexer_uri.to_string(),
        }
    }

    /// One of `ckb`, `ckb_testnet` or `ckb_dev`.
    pub fn get_network_type(&self) -> &str {
        &self.network_type
    }

    pub fn get_indexer_uri(&self) -> &str {
        &self.indexer_uri
    }
}
