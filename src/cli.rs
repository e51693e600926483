use cheque_config::{AppConfig, ConfigFile, SUDT};
use cheque_sdk::{ChequeProvider, ChequeWithdrawOptions, RpcProvider};

use anyhow::{anyhow, Result};
use ckb_types::H256;
use clap::Parser;

use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path of the TOML config file.
    #[clap(short, long, env = "CHEQUE_CONFIG", default_value = "./config.toml")]
    pub config: PathBuf,

    /// Address that issued the cheques and gets them back.
    #[clap(short, long)]
    pub sender: String,

    /// Address the cheques were issued to.
    #[clap(short, long)]
    pub receiver: String,

    /// Args of the sUDT type script, to withdraw only cheques of that token.
    #[clap(long)]
    pub sudt_args: Option<String>,

    /// Write the transaction to this file instead of stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn load_config(&self) -> Result<AppConfig> {
        let config_file: ConfigFile = cheque_config::parse(&self.config)?;
        AppConfig::new(config_file)
    }

    pub fn to_options(&self, provider: &RpcProvider) -> Result<ChequeWithdrawOptions> {
        let sudt = match &self.sudt_args {
            Some(args) => {
                let args = H256::from_str(args.trim_start_matches("0x"))
                    .map_err(|err| anyhow!("invalid sudt args {}: {}", args, err))?;
                Some(provider.new_script(SUDT, args.as_bytes())?)
            }
            None => None,
        };
        Ok(ChequeWithdrawOptions {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            sudt,
        })
    }
}
