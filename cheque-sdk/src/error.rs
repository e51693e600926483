use derive_more::Display;
use serde::{Deserialize, Serialize};

pub type Result<T, E = ChequeError> = std::result::Result<T, E>;

#[derive(Serialize, Deserialize, Clone, Debug, Display, Hash, PartialEq, Eq)]
pub enum ChequeError {
    #[display(fmt = "cell query failed: {}", _0)]
    QueryFailed(String),

    #[display(fmt = "capacity invariant violated: {}", _0)]
    InvariantViolation(String),

    #[display(
        fmt = "insufficient funds: required {} shannons, available {}",
        required,
        available
    )]
    InsufficientFunds { required: u64, available: u64 },

    #[display(fmt = "lock mismatch: {}", _0)]
    LockMismatch(String),

    #[display(fmt = "no cell dep registered for script {}", _0)]
    MissingCellDep(String),

    #[display(fmt = "nothing to withdraw: {}", _0)]
    NoChequeCells(String),
}

impl ChequeError {
    pub fn err_code(&self) -> i64 {
        match self {
            ChequeError::QueryFailed(_) => -14000,
            ChequeError::InvariantViolation(_) => -14001,
            ChequeError::InsufficientFunds { .. } => -14002,
            ChequeError::LockMismatch(_) => -14003,
            ChequeError::MissingCellDep(_) => -14004,
            ChequeError::NoChequeCells(_) => -14005,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl std::error::Error for ChequeError {}
