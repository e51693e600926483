pub mod address;
pub mod assembler;
pub mod build_tx;
pub mod capacity;
pub mod cell;
pub mod change;
pub mod error;
pub mod lock;
pub mod provider;
pub mod query;
pub mod reconcile;
pub mod rpc_provider;
pub mod sender_lock;
pub mod since;
pub mod witness;

pub use build_tx::{ChequeWithdrawBuilder, ChequeWithdrawOptions, WithdrawTransaction};
pub use cell::{Cell, CellPage, ScriptType, SearchKey};
pub use change::ChangePolicy;
pub use error::{ChequeError, Result};
pub use provider::ChequeProvider;
pub use rpc_provider::RpcProvider;
pub use sender_lock::{SenderGuard, SenderLocks};
