//! Wire payload to structured message
//!
//! `getTransaction` with base64 encoding returns the bincode-serialized
//! `VersionedTransaction`. Legacy nodes may answer with bare base58.

use base64::{engine::general_purpose, Engine as _};
use solana_sdk::message::VersionedMessage;
use solana_sdk::transaction::VersionedTransaction;
use thiserror::Error;

use super::types::{
    AddressTableLookupInfo, DecodedInstruction, DecodedTransaction, MessageHeaderInfo,
    MessageVersion,
};
use crate::rpc::EncodedPayload;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported transaction encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid base58 payload: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("malformed transaction bytes: {0}")]
    Bincode(#[from] bincode::Error),
}

pub fn decode_payload(payload: &EncodedPayload) -> Result<DecodedTransaction, DecodeError> {
    let bytes = match payload {
        EncodedPayload::Binary(data, encoding) => match encoding.as_str() {
            "base64" => general_purpose::STANDARD.decode(data)?,
            "base58" => bs58::decode(data).into_vec()?,
            other => return Err(DecodeError::UnsupportedEncoding(other.to_string())),
        },
        EncodedPayload::LegacyBinary(data) => bs58::decode(data).into_vec()?,
        EncodedPayload::Json(_) => return Err(DecodeError::UnsupportedEncoding("json".to_string())),
    };

    decode_bytes(&bytes)
}

pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedTransaction, DecodeError> {
    let tx: VersionedTransaction = bincode::deserialize(bytes)?;
    Ok(from_versioned(&tx))
}

pub fn from_versioned(tx: &VersionedTransaction) -> DecodedTransaction {
    let message = &tx.message;
    let header = message.header();

    let version = match message {
        VersionedMessage::Legacy(_) => MessageVersion::Legacy,
        VersionedMessage::V0(_) => MessageVersion::V0,
    };

    let address_table_lookups = message
        .address_table_lookups()
        .unwrap_or_default()
        .iter()
        .map(|lookup| AddressTableLookupInfo {
            account_key: lookup.account_key.to_string(),
            writable_indexes: lookup.writable_indexes.clone(),
            readonly_indexes: lookup.readonly_indexes.clone(),
        })
        .collect();

    DecodedTransaction {
        signatures: tx.signatures.iter().map(|s| s.to_string()).collect(),
        version,
        recent_blockhash: message.recent_blockhash().to_string(),
        header: MessageHeaderInfo {
            num_required_signatures: header.num_required_signatures,
            num_readonly_signed_accounts: header.num_readonly_signed_accounts,
            num_readonly_unsigned_accounts: header.num_readonly_unsigned_accounts,
        },
        account_keys: message
            .static_account_keys()
            .iter()
            .map(|k| k.to_string())
            .collect(),
        instructions: message
            .instructions()
            .iter()
            .map(|ix| DecodedInstruction {
                program_id_index: ix.program_id_index,
                accounts: ix.accounts.clone(),
                data: ix.data.clone(),
            })
            .collect(),
        address_table_lookups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::{sample_payload, sample_transaction};
    use solana_sdk::hash::Hash;
    use solana_sdk::message::{v0, MessageHeader};
    use solana_sdk::instruction::CompiledInstruction;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Signature;

    #[test]
    fn test_decode_base64_legacy() {
        let decoded = decode_payload(&sample_payload()).unwrap();

        assert_eq!(decoded.version, MessageVersion::Legacy);
        assert_eq!(decoded.header.num_required_signatures, 1);
        assert_eq!(decoded.account_keys.len(), 3);
        assert_eq!(decoded.instructions.len(), 1);
        assert_eq!(decoded.instructions[0].program_id_index, 2);
        assert_eq!(decoded.instructions[0].accounts, vec![0, 1]);
        assert_eq!(decoded.instructions[0].data.len(), 8);
        assert!(decoded.address_table_lookups.is_empty());
    }

    #[test]
    fn test_decode_base58_matches_base64() {
        let bytes = bincode::serialize(&sample_transaction()).unwrap();
        let from_b58 = decode_payload(&EncodedPayload::Binary(
            bs58::encode(&bytes).into_string(),
            "base58".to_string(),
        ))
        .unwrap();
        assert_eq!(from_b58, decode_bytes(&bytes).unwrap());
    }

    #[test]
    fn test_decode_v0_lookups() {
        let message = v0::Message {
            header: MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 1,
            },
            account_keys: vec![Pubkey::new_unique(), Pubkey::new_unique()],
            recent_blockhash: Hash::default(),
            instructions: vec![CompiledInstruction::new_from_raw_parts(1, vec![9], vec![0, 2])],
            address_table_lookups: vec![v0::MessageAddressTableLookup {
                account_key: Pubkey::new_unique(),
                writable_indexes: vec![3],
                readonly_indexes: vec![],
            }],
        };
        let tx = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::V0(message),
        };

        let decoded = decode_bytes(&bincode::serialize(&tx).unwrap()).unwrap();
        assert_eq!(decoded.version, MessageVersion::V0);
        assert_eq!(decoded.header.num_readonly_unsigned_accounts, 1);
        assert_eq!(decoded.address_table_lookups.len(), 1);
        assert_eq!(decoded.address_table_lookups[0].writable_indexes, vec![3]);
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let payload = EncodedPayload::Binary(
            general_purpose::STANDARD.encode([1u8, 2, 3]),
            "base64".to_string(),
        );
        assert!(matches!(decode_payload(&payload), Err(DecodeError::Bincode(_))));
    }

    #[test]
    fn test_json_encoding_unsupported() {
        let payload = EncodedPayload::Json(serde_json::json!({ "message": {} }));
        assert!(matches!(
            decode_payload(&payload),
            Err(DecodeError::UnsupportedEncoding(_))
        ));
    }
}
