use crate::error::{ChequeError, Result};

use ckb_sdk::{Address, NetworkType};
use ckb_types::packed::Script;

use std::str::FromStr;

pub fn parse_network_type(network_type: &str) -> Result<NetworkType> {
    match network_type {
        "ckb" | "mainnet" => Ok(NetworkType::Mainnet),
        "ckb_testnet" | "testnet" => Ok(NetworkType::Testnet),
        "ckb_staging" | "staging" => Ok(NetworkType::Staging),
        "ckb_dev" | "dev" => Ok(NetworkType::Dev),
        _ => Err(ChequeError::LockMismatch(format!(
            "unknown network type {}",
            network_type
        ))),
    }
}

/// The lock script of an address, which has to belong to `network`.
pub fn parse_lock_script(address: &str, network: NetworkType) -> Result<Script> {
    let address = Address::from_str(address)
        .map_err(|err| ChequeError::LockMismatch(format!("invalid address {}: {}", address, err)))?;
    if address.network() != network {
        return Err(ChequeError::LockMismatch(format!(
            "address {} is not on {:?}",
            address, network
        )));
    }
    Ok(Script::from(&address))
}
