mod cli;

use cli::Args;

use cheque_sdk::build_tx::dump_data;
use cheque_sdk::{ChangePolicy, ChequeWithdrawBuilder, RpcProvider};

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        // should recognize RUST_LOG_STYLE environment variable
        env_logger::Builder::from_default_env()
            .filter(None, log::LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }

    start()
}

pub fn start() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config()?;
    let provider = RpcProvider::new(&config)?;
    let options = args.to_options(&provider)?;
    let policy = ChangePolicy::from(&config.get_change_policy());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let withdraw = runtime.block_on(async {
        ChequeWithdrawBuilder::new(options, &provider)
            .with_policy(policy)
            .build()
            .await
    })?;
    log::info!(
        "withdraws {} cells, fee {} shannons",
        withdraw.input_cells.len(),
        withdraw.fee.as_u64()
    );

    let tx = ckb_jsonrpc_types::TransactionView::from(withdraw.tx);
    match &args.output {
        Some(path) => {
            dump_data(&tx, &path.to_string_lossy())?;
            log::info!("transaction written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&tx)?),
    }

    Ok(())
}
