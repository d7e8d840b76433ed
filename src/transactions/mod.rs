//! Transaction history for one wallet
//!
//! - `pipeline`: bounded-concurrency enrichment of a signature batch
//! - `decoder`: base64/bincode payload to structured message
//! - `analyzer`: fee, balance and label derivations used by the display
//! - `types`: enriched record and batch result

pub mod analyzer;
pub mod decoder;
pub mod pipeline;
pub mod types;

pub use decoder::DecodeError;
pub use pipeline::{process_count, EnrichmentPipeline, TransactionsError};
pub use types::{
    AccountTransactions, AddressTableLookupInfo, DecodedInstruction, DecodedTransaction,
    EnrichmentStats, MessageHeaderInfo, MessageVersion, TransactionInfo,
};
