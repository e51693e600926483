use crate::cell::Cell;
use crate::error::{ChequeError, Result};
use crate::provider::ChequeProvider;

use cheque_config::CHEQUE;

use ckb_sdk::types::{Since, SinceType};
use ckb_types::packed::CellInput;

/// Epochs a cheque cell has to wait before the sender may withdraw it.
pub const CHEQUE_WITHDRAW_EPOCHS: u64 = 6;

const EPOCH_NUMBER_MASK: u64 = 0xff_ffff;
const EPOCH_INDEX_MASK: u64 = 0xffff;
const EPOCH_LENGTH_MASK: u64 = 0xffff;

/// An epoch with a fraction, `number + index / length`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochFraction {
    pub number: u64,
    pub index: u64,
    pub length: u64,
}

impl EpochFraction {
    pub fn new(number: u64, index: u64, length: u64) -> Self {
        EpochFraction {
            number,
            index,
            length,
        }
    }

    pub fn to_value(self) -> u64 {
        (self.number & EPOCH_NUMBER_MASK)
            | ((self.index & EPOCH_INDEX_MASK) << 24)
            | ((self.length & EPOCH_LENGTH_MASK) << 40)
    }

    pub fn from_value(value: u64) -> Self {
        EpochFraction {
            number: value & EPOCH_NUMBER_MASK,
            index: (value >> 24) & EPOCH_INDEX_MASK,
            length: (value >> 40) & EPOCH_LENGTH_MASK,
        }
    }
}

/// A decoded since field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinceDescriptor {
    Unconstrained,
    Block { relative: bool, number: u64 },
    Epoch { relative: bool, epoch: EpochFraction },
    Timestamp { relative: bool, seconds: u64 },
}

impl SinceDescriptor {
    pub fn relative_epochs(number: u64) -> Self {
        SinceDescriptor::Epoch {
            relative: true,
            epoch: EpochFraction::new(number, 0, 0),
        }
    }

    pub fn encode(self) -> u64 {
        let since = match self {
            SinceDescriptor::Unconstrained => return 0,
            SinceDescriptor::Block { relative, number } => {
                Since::new(SinceType::BlockNumber, number, relative)
            }
            SinceDescriptor::Epoch { relative, epoch } => {
                Since::new(SinceType::EpochNumberWithFraction, epoch.to_value(), relative)
            }
            SinceDescriptor::Timestamp { relative, seconds } => {
                Since::new(SinceType::Timestamp, seconds, relative)
            }
        };
        since.value()
    }

    pub fn decode(raw: u64) -> Result<Self> {
        if raw == 0 {
            return Ok(SinceDescriptor::Unconstrained);
        }
        let since = Since::from_raw_value(raw);
        let relative = since.is_relative();
        match since.extract_metric() {
            Some((SinceType::BlockNumber, number)) => Ok(SinceDescriptor::Block { relative, number }),
            Some((SinceType::EpochNumberWithFraction, value)) => Ok(SinceDescriptor::Epoch {
                relative,
                epoch: EpochFraction::from_value(value),
            }),
            Some((SinceType::Timestamp, seconds)) => {
                Ok(SinceDescriptor::Timestamp { relative, seconds })
            }
            None => Err(ChequeError::InvariantViolation(format!(
                "since {:#x} has an unknown metric",
                raw
            ))),
        }
    }
}

/// Turns the final, ordered input cells into transaction inputs. Cells
/// locked by a cheque get the withdraw waiting period, all others none.
pub fn assign_since<P>(provider: &P, input_cells: &[Cell]) -> Result<Vec<CellInput>>
where
    P: ChequeProvider + ?Sized,
{
    let cheque_since = SinceDescriptor::relative_epochs(CHEQUE_WITHDRAW_EPOCHS).encode();
    input_cells
        .iter()
        .map(|cell| {
            let out_point = cell.out_point.clone().ok_or_else(|| {
                ChequeError::InvariantViolation("input cell has no out point".to_string())
            })?;
            let since = if provider.is_template_of(CHEQUE, &cell.lock()) {
                cheque_since
            } else {
                SinceDescriptor::Unconstrained.encode()
            };
            Ok(CellInput::new(out_point, since))
        })
        .collect()
}
