use crate::error::Result;
use crate::provider::ChequeProvider;

use cheque_config::CHEQUE;

use ckb_types::packed::Script;
use ckb_types::prelude::*;

/// Bytes taken from each lock hash.
pub const LOCK_HASH_PREFIX_LEN: usize = 20;

/// The args of a cheque lock: the first 20 bytes of the receiver's lock hash
/// followed by the first 20 bytes of the sender's.
pub fn derive_cheque_args(receiver_lock: &Script, sender_lock: &Script) -> [u8; 40] {
    let receiver_hash = receiver_lock.calc_script_hash();
    let sender_hash = sender_lock.calc_script_hash();
    let mut args = [0u8; LOCK_HASH_PREFIX_LEN * 2];
    args[..LOCK_HASH_PREFIX_LEN]
        .copy_from_slice(&receiver_hash.as_slice()[..LOCK_HASH_PREFIX_LEN]);
    args[LOCK_HASH_PREFIX_LEN..]
        .copy_from_slice(&sender_hash.as_slice()[..LOCK_HASH_PREFIX_LEN]);
    args
}

/// The cheque lock a sender uses to pay a receiver.
pub fn build_cheque_lock<P>(provider: &P, receiver_lock: &Script, sender_lock: &Script) -> Result<Script>
where
    P: ChequeProvider + ?Sized,
{
    let args = derive_cheque_args(receiver_lock, sender_lock);
    provider.new_script(CHEQUE, &args)
}

#[cfg(test)]
mod tests {
    use super::*;

    use ckb_types::bytes::Bytes;
    use ckb_types::core::ScriptHashType;
    use ckb_types::h256;

    fn secp_lock(arg: u8) -> Script {
        Script::new_builder()
            .code_hash(
                h256!("0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8").pack(),
            )
            .hash_type(ScriptHashType::Type.into())
            .args(Bytes::from(vec![arg; 20]).pack())
            .build()
    }

    #[test]
    fn test_derive_cheque_args() {
        let receiver = secp_lock(1);
        let sender = secp_lock(2);
        let args = derive_cheque_args(&receiver, &sender);

        assert_eq!(&args[..20], &receiver.calc_script_hash().as_slice()[..20]);
        assert_eq!(&args[20..], &sender.calc_script_hash().as_slice()[..20]);
        assert_eq!(args, derive_cheque_args(&receiver, &sender));
        assert_ne!(args, derive_cheque_args(&sender, &receiver));
    }
}
