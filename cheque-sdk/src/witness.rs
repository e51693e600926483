use ckb_types::bytes::Bytes;
use ckb_types::packed::WitnessArgs;
use ckb_types::prelude::*;

/// Recoverable secp256k1 signature: 64 bytes plus the recovery id.
pub const SECP256K1_SIGNATURE_SIZE: usize = 65;

/// A `WitnessArgs` whose lock field is a zeroed secp256k1 signature, so the
/// fee is computed on the size of the signed transaction.
pub fn secp256k1_placeholder() -> Bytes {
    WitnessArgs::new_builder()
        .lock(Some(Bytes::from(vec![0u8; SECP256K1_SIGNATURE_SIZE])).pack())
        .build()
        .as_bytes()
}
