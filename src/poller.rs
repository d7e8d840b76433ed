/// Live signature poller
///
/// Stands in for a streaming subscription: the address history is listed
/// on an interval and signatures not seen before are reported, oldest
/// first. The seen set is seeded at start so only new activity shows up.
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::logger::{self, LogTag};
use crate::rpc::{RpcGateway, RpcResult, SignatureRef};
use crate::transactions::pipeline::MAX_SIGNATURES_PER_LISTING;

pub struct LivePoller<G: RpcGateway> {
    gateway: Arc<G>,
    wallet: String,
    interval: Duration,
    seen: HashSet<String>,
}

impl<G: RpcGateway> LivePoller<G> {
    pub fn new(gateway: Arc<G>, wallet: &str, interval: Duration) -> Self {
        Self {
            gateway,
            wallet: wallet.to_string(),
            interval,
            seen: HashSet::new(),
        }
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Mark the current history as seen; a failed listing seeds nothing
    pub async fn seed(&mut self) -> usize {
        match self.list().await {
            Ok(signatures) => {
                self.seen.extend(signatures.into_iter().map(|s| s.signature));
                self.seen.len()
            }
            Err(e) => {
                logger::warning(LogTag::Poller, &format!("Initial listing failed: {}", e));
                0
            }
        }
    }

    /// Signatures that appeared since the last call, oldest first
    pub async fn poll_once(&mut self) -> RpcResult<Vec<SignatureRef>> {
        let signatures = self.list().await?;

        // Listing is newest first
        let fresh: Vec<SignatureRef> = signatures
            .into_iter()
            .rev()
            .filter(|s| self.seen.insert(s.signature.clone()))
            .collect();
        Ok(fresh)
    }

    /// Poll until shutdown; returns how many new signatures were reported
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> usize {
        logger::info(
            LogTag::Poller,
            &format!("🔌 Listening (poll) for transactions mentioning {} ...", self.wallet),
        );

        let seeded = self.seed().await;
        logger::debug(LogTag::Poller, &format!("Seeded {} known signatures", seeded));

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        let mut observed = 0;
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(fresh) => {
                            for signature in &fresh {
                                logger::info(
                                    LogTag::Poller,
                                    &format!("🆕 Tx observed: {} (slot {})", signature.signature, signature.slot),
                                );
                            }
                            observed += fresh.len();
                        }
                        Err(e) => logger::warning(LogTag::Poller, &format!("poll error: {}", e)),
                    }
                }
            }
        }

        logger::info(LogTag::Poller, "Live poller stopped");
        observed
    }

    async fn list(&self) -> RpcResult<Vec<SignatureRef>> {
        self.gateway
            .get_signatures_for_address(&self.wallet, MAX_SIGNATURES_PER_LISTING)
            .await
    }
}
