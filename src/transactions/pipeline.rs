//! Bounded-concurrency transaction enrichment
//!
//! One task per signature, a semaphore capping in-flight `getTransaction`
//! calls, and a join over the task handles in index order. Each task owns
//! its slot, so the assembled batch follows input order no matter which
//! fetch finishes first.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Semaphore};
use tokio::time::Instant;

use super::decoder::decode_payload;
use super::types::{AccountTransactions, EnrichmentStats, TransactionInfo};
use crate::config::InspectorConfig;
use crate::logger::{self, LogTag};
use crate::rpc::{RpcError, RpcGateway, SignatureRef};

/// Listing size used when no limit is set (node maximum)
pub const MAX_SIGNATURES_PER_LISTING: usize = 1000;

#[derive(Debug, Error)]
pub enum TransactionsError {
    /// The only failure that aborts a batch
    #[error("failed to get signatures for account {account}: {source}")]
    SignatureListing {
        account: String,
        #[source]
        source: RpcError,
    },
}

/// How many leading signatures a batch processes; `limit == 0` means all
pub fn process_count(available: usize, limit: usize) -> usize {
    if limit > 0 {
        available.min(limit)
    } else {
        available
    }
}

/// Result of one index
#[derive(Debug)]
enum SlotOutcome {
    Ready {
        info: TransactionInfo,
        decoded: bool,
    },
    FetchFailed,
    Cancelled,
}

pub struct EnrichmentPipeline<G: RpcGateway + 'static> {
    gateway: Arc<G>,
    max_concurrent: usize,
    batch_timeout: Option<Duration>,
}

impl<G: RpcGateway + 'static> EnrichmentPipeline<G> {
    pub fn new(gateway: Arc<G>, max_concurrent: usize) -> Self {
        Self {
            gateway,
            max_concurrent: max_concurrent.max(1),
            batch_timeout: None,
        }
    }

    pub fn from_config(gateway: Arc<G>, config: &InspectorConfig) -> Self {
        let timeout = (config.batch_timeout_secs > 0)
            .then(|| Duration::from_secs(config.batch_timeout_secs));
        Self::new(gateway, config.max_concurrent_fetches).with_batch_timeout(timeout)
    }

    /// Deadline for a whole batch; unfinished indices count as cancelled
    pub fn with_batch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch_timeout = timeout;
        self
    }

    /// List recent signatures for `account`, then enrich the leading `limit`
    pub async fn fetch_account_transactions(
        &self,
        account: &str,
        limit: usize,
        cancel: &watch::Receiver<bool>,
    ) -> Result<AccountTransactions, TransactionsError> {
        let listing_limit = if limit > 0 {
            limit.min(MAX_SIGNATURES_PER_LISTING)
        } else {
            MAX_SIGNATURES_PER_LISTING
        };

        let mut shutdown = cancel.clone();
        let listing = tokio::select! {
            biased;
            _ = wait_for_shutdown(&mut shutdown) => {
                logger::info(
                    LogTag::Transactions,
                    &format!("Signature listing for {} cancelled by shutdown", account),
                );
                return Ok(AccountTransactions {
                    account: account.to_string(),
                    transactions: Vec::new(),
                    fetched_at: Utc::now(),
                    stats: EnrichmentStats::default(),
                });
            }
            listing = self.gateway.get_signatures_for_address(account, listing_limit) => listing,
        };

        let signatures = listing.map_err(|source| TransactionsError::SignatureListing {
            account: account.to_string(),
            source,
        })?;

        logger::info(
            LogTag::Transactions,
            &format!("Found {} signatures for {}", signatures.len(), account),
        );

        Ok(self.enrich(account, &signatures, limit, cancel).await)
    }

    /// Fetch full records for the leading signatures, preserving their order
    ///
    /// Never fails: fetch errors drop the index, decode errors keep the
    /// record without its decoded message.
    pub async fn enrich(
        &self,
        account: &str,
        signatures: &[SignatureRef],
        limit: usize,
        cancel: &watch::Receiver<bool>,
    ) -> AccountTransactions {
        let count = process_count(signatures.len(), limit);
        let started = std::time::Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let deadline = self.batch_timeout.map(|t| Instant::now() + t);

        logger::debug(
            LogTag::Transactions,
            &format!(
                "Enriching {} of {} signatures (max {} in flight)",
                count,
                signatures.len(),
                self.max_concurrent
            ),
        );

        let handles: Vec<_> = signatures[..count]
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, signature)| {
                let gateway = Arc::clone(&self.gateway);
                let semaphore = Arc::clone(&semaphore);
                let cancel = cancel.clone();
                tokio::spawn(fetch_slot(gateway, semaphore, signature, index, cancel, deadline))
            })
            .collect();

        // join_all keeps handle order, which is index order
        let outcomes = join_all(handles).await;

        let mut stats = EnrichmentStats {
            requested: count,
            ..Default::default()
        };
        let mut transactions = Vec::with_capacity(count);

        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(SlotOutcome::Ready { info, decoded }) => {
                    if !decoded {
                        stats.decode_failed += 1;
                    }
                    transactions.push(info);
                }
                Ok(SlotOutcome::FetchFailed) => stats.fetch_failed += 1,
                Ok(SlotOutcome::Cancelled) => stats.cancelled += 1,
                Err(e) => {
                    logger::error(
                        LogTag::Transactions,
                        &format!("Fetch task for index {} panicked: {}", index, e),
                    );
                    stats.fetch_failed += 1;
                }
            }
        }
        stats.succeeded = transactions.len();

        logger::info(
            LogTag::Transactions,
            &format!(
                "Enriched {}/{} transactions for {} in {}ms",
                stats.succeeded,
                stats.requested,
                account,
                started.elapsed().as_millis()
            ),
        );
        if stats.fetch_failed + stats.decode_failed + stats.cancelled > 0 {
            logger::warning(
                LogTag::Transactions,
                &format!(
                    "Degraded batch: {} fetch failed, {} without decoded message, {} cancelled",
                    stats.fetch_failed, stats.decode_failed, stats.cancelled
                ),
            );
        }

        AccountTransactions {
            account: account.to_string(),
            transactions,
            fetched_at: Utc::now(),
            stats,
        }
    }
}

async fn fetch_slot<G: RpcGateway + 'static>(
    gateway: Arc<G>,
    semaphore: Arc<Semaphore>,
    signature: SignatureRef,
    index: usize,
    mut cancel: watch::Receiver<bool>,
    deadline: Option<Instant>,
) -> SlotOutcome {
    if *cancel.borrow() {
        return SlotOutcome::Cancelled;
    }

    let fetch = async {
        let _permit = semaphore
            .acquire()
            .await
            .map_err(|e| RpcError::Transport(format!("fetch limiter closed: {}", e)))?;
        gateway.get_transaction(&signature.signature).await
    };

    let result = tokio::select! {
        result = fetch => result,
        _ = wait_for_shutdown(&mut cancel) => {
            logger::debug(
                LogTag::Transactions,
                &format!("Fetch #{} {} cancelled by shutdown", index, signature.signature),
            );
            return SlotOutcome::Cancelled;
        }
        _ = sleep_until_deadline(deadline) => {
            logger::warning(
                LogTag::Transactions,
                &format!("Fetch #{} {} hit the batch deadline", index, signature.signature),
            );
            return SlotOutcome::Cancelled;
        }
    };

    let raw = match result {
        Ok(raw) => raw,
        Err(e) => {
            logger::warning(
                LogTag::Transactions,
                &format!("Failed to get transaction {}: {}", signature.signature, e),
            );
            return SlotOutcome::FetchFailed;
        }
    };

    let decoded = match decode_payload(&raw.transaction) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            logger::warning(
                LogTag::Transactions,
                &format!(
                    "Failed to decode transaction {}: {} (keeping metadata)",
                    signature.signature, e
                ),
            );
            None
        }
    };

    SlotOutcome::Ready {
        decoded: decoded.is_some(),
        info: TransactionInfo {
            block_time: signature.block_time.or(raw.block_time),
            signature: signature.signature,
            slot: signature.slot,
            meta: raw.meta,
            decoded,
        },
    }
}

/// Resolves once the shutdown flag is set; never if the sender is gone
async fn wait_for_shutdown(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::{raw_transaction, MockGateway};
    use crate::rpc::EncodedPayload;

    const ACCOUNT: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn sig(i: usize) -> String {
        format!("sig-{}", i)
    }

    fn refs(n: usize) -> Vec<SignatureRef> {
        (0..n)
            .map(|i| SignatureRef::new(sig(i), 1_000 - i as u64, Some(1_700_000_000 - i as i64)))
            .collect()
    }

    /// Gateway where every signature succeeds after `delay(i)`
    fn gateway_with(n: usize, delay: impl Fn(usize) -> Duration) -> MockGateway {
        (0..n).fold(MockGateway::new().with_signatures(refs(n)), |g, i| {
            g.with_transaction(&sig(i), raw_transaction(1_000 - i as u64, 5_000), delay(i))
        })
    }

    fn idle_cancel() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    fn signatures_of(batch: &AccountTransactions) -> Vec<String> {
        batch.transactions.iter().map(|t| t.signature.clone()).collect()
    }

    #[test]
    fn test_process_count_rule() {
        assert_eq!(process_count(5, 0), 5);
        assert_eq!(process_count(5, 2), 2);
        assert_eq!(process_count(5, 5), 5);
        assert_eq!(process_count(3, 10), 3);
        assert_eq!(process_count(0, 4), 0);
        assert_eq!(process_count(0, 0), 0);
    }

    #[tokio::test]
    async fn test_output_follows_input_order_not_completion_order() {
        // Earlier indices finish last
        let gateway = Arc::new(gateway_with(6, |i| Duration::from_millis((6 - i as u64) * 15)));
        let pipeline = EnrichmentPipeline::new(gateway, 10);

        let batch = pipeline.enrich(ACCOUNT, &refs(6), 0, &idle_cancel()).await;

        assert_eq!(signatures_of(&batch), (0..6).map(sig).collect::<Vec<_>>());
        assert_eq!(batch.stats.succeeded, 6);
        assert!(batch.transactions.iter().all(|t| t.decoded.is_some()));
    }

    #[tokio::test]
    async fn test_failed_index_is_omitted() {
        let gateway = MockGateway::new()
            .with_transaction(&sig(0), raw_transaction(10, 5_000), Duration::from_millis(20))
            .with_fetch_error(&sig(1), RpcError::Timeout, Duration::ZERO)
            .with_transaction(&sig(2), raw_transaction(8, 5_000), Duration::ZERO);
        let pipeline = EnrichmentPipeline::new(Arc::new(gateway), 10);

        let batch = pipeline.enrich(ACCOUNT, &refs(3), 3, &idle_cancel()).await;

        assert_eq!(signatures_of(&batch), vec![sig(0), sig(2)]);
        assert_eq!(batch.stats.requested, 3);
        assert_eq!(batch.stats.fetch_failed, 1);
        assert_eq!(batch.stats.succeeded, 2);
    }

    #[tokio::test]
    async fn test_empty_signature_list_is_valid() {
        let gateway = Arc::new(MockGateway::new());
        let pipeline = EnrichmentPipeline::new(Arc::clone(&gateway), 4);

        let batch = pipeline.enrich(ACCOUNT, &[], 10, &idle_cancel()).await;

        assert!(batch.is_empty());
        assert_eq!(batch.account, ACCOUNT);
        assert_eq!(batch.stats, EnrichmentStats::default());
        assert!(gateway.fetched_signatures().is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_carries_account() {
        let gateway = MockGateway::new().with_listing_error(RpcError::HttpStatus {
            status: 503,
            body: "unavailable".to_string(),
        });
        let pipeline = EnrichmentPipeline::new(Arc::new(gateway), 4);

        let err = pipeline
            .fetch_account_transactions(ACCOUNT, 10, &idle_cancel())
            .await
            .unwrap_err();

        let TransactionsError::SignatureListing { account, .. } = &err;
        assert_eq!(account, ACCOUNT);
        assert!(err.to_string().contains(ACCOUNT));
    }

    #[tokio::test]
    async fn test_limit_launches_only_leading_fetches() {
        let gateway = Arc::new(gateway_with(5, |_| Duration::ZERO));
        let pipeline = EnrichmentPipeline::new(Arc::clone(&gateway), 10);

        let batch = pipeline.enrich(ACCOUNT, &refs(5), 2, &idle_cancel()).await;

        let mut fetched = gateway.fetched_signatures();
        fetched.sort();
        assert_eq!(fetched, vec![sig(0), sig(1)]);
        assert_eq!(signatures_of(&batch), vec![sig(0), sig(1)]);
        assert_eq!(batch.stats.requested, 2);
    }

    #[tokio::test]
    async fn test_fetch_account_transactions_end_to_end() {
        let gateway = Arc::new(gateway_with(5, |i| Duration::from_millis(i as u64 * 5)));
        let pipeline = EnrichmentPipeline::new(Arc::clone(&gateway), 3);

        let batch = pipeline
            .fetch_account_transactions(ACCOUNT, 4, &idle_cancel())
            .await
            .unwrap();

        assert_eq!(gateway.listing_calls(), 1);
        assert_eq!(signatures_of(&batch), (0..4).map(sig).collect::<Vec<_>>());
        assert_eq!(batch.transactions[0].slot, 1_000);
        assert_eq!(batch.transactions[0].block_time, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_bound() {
        let gateway = Arc::new(gateway_with(12, |_| Duration::from_millis(25)));
        let pipeline = EnrichmentPipeline::new(Arc::clone(&gateway), 3);

        let batch = pipeline.enrich(ACCOUNT, &refs(12), 0, &idle_cancel()).await;

        assert_eq!(batch.len(), 12);
        assert!(gateway.max_in_flight() <= 3);
        assert!(gateway.max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn test_shutdown_omits_unfinished_indices() {
        let gateway = MockGateway::new()
            .with_transaction(&sig(0), raw_transaction(10, 5_000), Duration::ZERO)
            .with_transaction(&sig(1), raw_transaction(9, 5_000), Duration::from_secs(5))
            .with_transaction(&sig(2), raw_transaction(8, 5_000), Duration::from_secs(5));
        let pipeline = EnrichmentPipeline::new(Arc::new(gateway), 10);
        let (tx, rx) = watch::channel(false);

        let signatures = refs(3);
        let start = std::time::Instant::now();
        let (batch, _) = tokio::join!(pipeline.enrich(ACCOUNT, &signatures, 0, &rx), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(true);
        });

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(signatures_of(&batch), vec![sig(0)]);
        assert_eq!(batch.stats.cancelled, 2);
    }

    #[tokio::test]
    async fn test_cancelled_fetches_release_in_flight_slots() {
        let gateway = Arc::new(gateway_with(4, |_| Duration::from_secs(5)));
        let pipeline = EnrichmentPipeline::new(Arc::clone(&gateway), 2);
        let (tx, rx) = watch::channel(false);

        let signatures = refs(4);
        let (batch, _) = tokio::join!(pipeline.enrich(ACCOUNT, &signatures, 0, &rx), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(true);
        });

        assert!(batch.is_empty());
        assert_eq!(batch.stats.cancelled, 4);
        assert_eq!(gateway.max_in_flight(), 2);
        assert_eq!(gateway.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_signature_listing() {
        let gateway = Arc::new(
            gateway_with(3, |_| Duration::ZERO).with_listing_delay(Duration::from_secs(5)),
        );
        let pipeline = EnrichmentPipeline::new(Arc::clone(&gateway), 10);
        let (tx, rx) = watch::channel(false);

        let start = std::time::Instant::now();
        let (result, _) = tokio::join!(pipeline.fetch_account_transactions(ACCOUNT, 3, &rx), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(true);
        });

        assert!(start.elapsed() < Duration::from_secs(2));
        let batch = result.unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.account, ACCOUNT);
        assert_eq!(batch.stats, EnrichmentStats::default());
        assert!(gateway.fetched_signatures().is_empty());
    }

    #[tokio::test]
    async fn test_already_cancelled_fetches_nothing() {
        let gateway = Arc::new(gateway_with(3, |_| Duration::ZERO));
        let pipeline = EnrichmentPipeline::new(Arc::clone(&gateway), 10);
        let (_tx, rx) = watch::channel(true);

        let batch = pipeline.enrich(ACCOUNT, &refs(3), 0, &rx).await;

        assert!(batch.is_empty());
        assert_eq!(batch.stats.cancelled, 3);
        assert!(gateway.fetched_signatures().is_empty());
    }

    #[tokio::test]
    async fn test_batch_deadline_bounds_wall_time() {
        let gateway = MockGateway::new()
            .with_transaction(&sig(0), raw_transaction(10, 5_000), Duration::ZERO)
            .with_transaction(&sig(1), raw_transaction(9, 5_000), Duration::from_secs(5));
        let pipeline = EnrichmentPipeline::new(Arc::new(gateway), 10)
            .with_batch_timeout(Some(Duration::from_millis(150)));

        let start = std::time::Instant::now();
        let batch = pipeline.enrich(ACCOUNT, &refs(2), 0, &idle_cancel()).await;

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(signatures_of(&batch), vec![sig(0)]);
        assert_eq!(batch.stats.cancelled, 1);
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_metadata() {
        let mut broken = raw_transaction(10, 7_000);
        broken.transaction = EncodedPayload::Binary("AQID".to_string(), "base64".to_string());
        let gateway = MockGateway::new()
            .with_transaction(&sig(0), broken, Duration::ZERO)
            .with_transaction(&sig(1), raw_transaction(9, 5_000), Duration::ZERO);
        let pipeline = EnrichmentPipeline::new(Arc::new(gateway), 10);

        let batch = pipeline.enrich(ACCOUNT, &refs(2), 0, &idle_cancel()).await;

        assert_eq!(batch.len(), 2);
        assert!(batch.transactions[0].decoded.is_none());
        assert_eq!(batch.transactions[0].meta.as_ref().map(|m| m.fee), Some(7_000));
        assert!(batch.transactions[1].decoded.is_some());
        assert_eq!(batch.stats.decode_failed, 1);
    }

    #[tokio::test]
    async fn test_rerun_is_identical() {
        let gateway = Arc::new(gateway_with(4, |i| Duration::from_millis((i as u64 % 2) * 20)));
        let pipeline = EnrichmentPipeline::new(gateway, 2);

        let first = pipeline.enrich(ACCOUNT, &refs(4), 0, &idle_cancel()).await;
        let second = pipeline.enrich(ACCOUNT, &refs(4), 0, &idle_cancel()).await;

        assert_eq!(first.transactions, second.transactions);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_from_config_reads_limits() {
        let config = InspectorConfig {
            max_concurrent_fetches: 4,
            batch_timeout_secs: 30,
            ..Default::default()
        };
        let pipeline = EnrichmentPipeline::from_config(Arc::new(MockGateway::new()), &config);
        assert_eq!(pipeline.max_concurrent, 4);
        assert_eq!(pipeline.batch_timeout, Some(Duration::from_secs(30)));
    }
}
