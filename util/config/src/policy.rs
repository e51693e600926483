use ckb_jsonrpc_types::Capacity;
use serde::Deserialize;

pub const DEFAULT_MIN_FEE_RATE: u64 = 1000;

// 1 CKB in shannons
pub const DEFAULT_UNIT_BUFFER: u64 = 1_0000_0000;

#[derive(Deserialize, Clone, Debug)]
pub struct FeeConfig {
    /// Shannons per 1000 bytes of serialized transaction.
    #[serde(default = "default_min_fee_rate")]
    min_fee_rate: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig {
            min_fee_rate: DEFAULT_MIN_FEE_RATE,
        }
    }
}

impl FeeConfig {
    pub fn new(min_fee_rate: u64) -> Self {
        FeeConfig { min_fee_rate }
    }

    pub fn get_min_fee_rate(&self) -> u64 {
        self.min_fee_rate
    }
}

/// Sizing policy of the sender change cell.
///
/// The change cell pays the fee after it has been sized, so it is topped up
/// with `unit_buffer` plus, optionally, the occupied capacity of one more
/// lock-only cell instead of being solved for exactly.
#[derive(Deserialize, Clone, Debug)]
pub struct ChangePolicyConfig {
    #[serde(default = "default_unit_buffer")]
    unit_buffer: Capacity,
    #[serde(default = "default_true")]
    include_future_cell_cost: bool,
}

impl Default for ChangePolicyConfig {
    fn default() -> Self {
        ChangePolicyConfig {
            unit_buffer: default_unit_buffer(),
            include_future_cell_cost: true,
        }
    }
}

impl ChangePolicyConfig {
    pub fn new(unit_buffer: u64, include_future_cell_cost: bool) -> Self {
        ChangePolicyConfig {
            unit_buffer: unit_buffer.into(),
            include_future_cell_cost,
        }
    }

    pub fn get_unit_buffer(&self) -> u64 {
        self.unit_buffer.value()
    }

    pub fn include_future_cell_cost(&self) -> bool {
        self.include_future_cell_cost
    }
}

fn default_min_fee_rate() -> u64 {
    DEFAULT_MIN_FEE_RATE
}

fn default_unit_buffer() -> Capacity {
    DEFAULT_UNIT_BUFFER.into()
}

fn default_true() -> bool {
    true
}
