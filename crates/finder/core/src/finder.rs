//! The finder pipeline: fetch, correlate, classify, aggregate.

use crate::{
    ChildChainProvider, FinderError, PairError, PairFailure, ParentChainProvider, Report,
    RetryableClassifier, logs::fetch_logs,
};
use alloc::{boxed::Box, vec::Vec};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolEvent;
use futures::{StreamExt, stream};
use retryable_protocol::{
    AccountingEvent, Correlator, DeliveryEvent, InboxMessageDelivered, MessageDelivered,
    RetryablePair,
};
use tracing::{info, warn};

/// The configuration of a [`RetryableFinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderConfig {
    /// The inbox emitting `InboxMessageDelivered`.
    pub inbox: Address,
    /// The bridge emitting `MessageDelivered`.
    pub bridge: Address,
    /// The maximum number of retryables classified concurrently.
    pub max_concurrency: usize,
    /// The maximum number of blocks per parent chain log query.
    pub log_batch_size: u64,
}

impl FinderConfig {
    /// The default classification concurrency.
    pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

    /// The default log query window.
    pub const DEFAULT_LOG_BATCH_SIZE: u64 = 10_000;

    /// Creates a config for the given inbox and bridge with default limits.
    pub const fn new(inbox: Address, bridge: Address) -> Self {
        Self {
            inbox,
            bridge,
            max_concurrency: Self::DEFAULT_MAX_CONCURRENCY,
            log_batch_size: Self::DEFAULT_LOG_BATCH_SIZE,
        }
    }
}

/// Resolves an optional block range against the parent chain head.
///
/// `to` defaults to the head and `from` to `lookback` blocks before `to`.
pub async fn resolve_range<P>(
    provider: &P,
    from: Option<u64>,
    to: Option<u64>,
    lookback: u64,
) -> Result<(u64, u64), FinderError>
where
    P: ParentChainProvider + Sync,
{
    let to = match to {
        Some(to) => to,
        None => {
            provider.block_number().await.map_err(|err| FinderError::BlockNumber(Box::new(err)))?
        }
    };
    let from = from.unwrap_or_else(|| to.saturating_sub(lookback));
    if from > to {
        return Err(FinderError::InvalidRange { from, to });
    }
    Ok((from, to))
}

/// Finds retryable submissions in a parent chain block range and classifies their child chain
/// outcome.
#[derive(Debug)]
pub struct RetryableFinder<P, C> {
    /// The parent chain provider.
    pub parent: P,
    /// The classifier, holding the child chain provider.
    pub classifier: RetryableClassifier<C>,
    /// The finder configuration.
    pub config: FinderConfig,
}

impl<P, C> RetryableFinder<P, C>
where
    P: ParentChainProvider + Send + Sync,
    C: ChildChainProvider + Send + Sync,
{
    /// Creates a new [`RetryableFinder`].
    pub const fn new(parent: P, classifier: RetryableClassifier<C>, config: FinderConfig) -> Self {
        Self { parent, classifier, config }
    }

    /// Resolves an optional block range against the parent chain head. See [`resolve_range`].
    pub async fn resolve_range(
        &self,
        from: Option<u64>,
        to: Option<u64>,
        lookback: u64,
    ) -> Result<(u64, u64), FinderError> {
        resolve_range(&self.parent, from, to, lookback).await
    }

    /// Finds every retryable submitted in the inclusive block range `[from, to]` and classifies
    /// it.
    ///
    /// A retryable that fails to decode, correlate or classify is reported in
    /// [`Report::failures`] without affecting its siblings. Only log query failures and incomplete
    /// derivation inputs abort the run.
    pub async fn find_pending_retryables(&self, from: u64, to: u64) -> Result<Report, FinderError> {
        if from > to {
            return Err(FinderError::InvalidRange { from, to });
        }

        let mut pairs = Vec::new();
        let mut outcomes = Vec::new();
        for (index, discovered) in self.discover(from, to).await?.into_iter().enumerate() {
            match discovered {
                Ok(pair) => pairs.push((index, pair)),
                Err(failure) => outcomes.push((index, Err(failure))),
            }
        }

        // Lookups complete out of order so one stalled pair cannot hold back the rest.
        let mut classified = stream::iter(&pairs)
            .map(|(index, pair)| async move {
                (*index, pair, self.classifier.classify(pair).await)
            })
            .buffer_unordered(self.config.max_concurrency.max(1));

        while let Some((index, pair, outcome)) = classified.next().await {
            let outcome = match outcome {
                Ok(result) => Ok(result),
                Err(PairError::DerivationInputIncomplete(err)) => return Err(err.into()),
                Err(error) => {
                    warn!(
                        target: "finder",
                        sequence_number = %pair.delivery.sequence_number,
                        parent_tx_hash = %pair.delivery.tx_hash,
                        kind = error.kind(),
                        %error,
                        "Failed to classify retryable"
                    );
                    Err(PairFailure {
                        parent_tx_hash: pair.delivery.tx_hash,
                        block_number: pair.delivery.block_number,
                        sequence_number: pair.delivery.sequence_number,
                        error,
                    })
                }
            };
            outcomes.push((index, outcome));
        }

        outcomes.sort_unstable_by_key(|(index, _)| *index);
        let mut results = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(failure) => failures.push(failure),
            }
        }

        let report = Report::aggregate(results, failures);
        #[cfg(feature = "metrics")]
        crate::Metrics::record_report(&report);

        info!(
            target: "finder",
            from,
            to,
            retryables = report.len(),
            pending = report.pending.len(),
            redeemed = report.redeemed.len(),
            failures = report.failures.len(),
            "Classified retryables"
        );
        Ok(report)
    }

    /// Fetches both parent chain event streams and correlates them.
    ///
    /// The output follows delivery order. Deliveries that do not decode, or that do not match
    /// exactly one accounting event, are returned as failures.
    async fn discover(
        &self,
        from: u64,
        to: u64,
    ) -> Result<Vec<Result<RetryablePair, PairFailure>>, FinderError> {
        let batch_size = self.config.log_batch_size;
        let (delivery_logs, accounting_logs) = futures::try_join!(
            fetch_logs(
                &self.parent,
                self.config.inbox,
                (InboxMessageDelivered::SIGNATURE, InboxMessageDelivered::SIGNATURE_HASH),
                from,
                to,
                batch_size,
            ),
            fetch_logs(
                &self.parent,
                self.config.bridge,
                (MessageDelivered::SIGNATURE, MessageDelivered::SIGNATURE_HASH),
                from,
                to,
                batch_size,
            ),
        )?;

        // An undecodable accounting log leaves its delivery unmatched, which is reported there.
        let correlator = Correlator::new(accounting_logs.iter().filter_map(|log| {
            AccountingEvent::try_from(log)
                .inspect_err(|err| warn!(target: "finder", %err, "Skipping accounting log"))
                .ok()
        }));

        let mut discovered = Vec::new();
        for log in &delivery_logs {
            let delivery = match DeliveryEvent::try_from(log) {
                Ok(delivery) => delivery,
                Err(err) => {
                    // `messageNum` is indexed, so the sequence number survives a bad payload.
                    let sequence_number = log
                        .topics()
                        .get(1)
                        .map(|topic| U256::from_be_bytes(topic.0))
                        .unwrap_or_default();
                    let skipped = matches!(
                        correlator.accountings(&sequence_number),
                        [accounting] if !accounting.kind.is_retryable()
                    );
                    if !skipped {
                        warn!(
                            target: "finder",
                            %sequence_number,
                            %err,
                            "Undecodable inbox delivery"
                        );
                        discovered.push(Err(PairFailure {
                            parent_tx_hash: log.transaction_hash.unwrap_or_default(),
                            block_number: log.block_number.unwrap_or_default(),
                            sequence_number,
                            error: err.into(),
                        }));
                    }
                    continue;
                }
            };

            match correlator.pair(delivery) {
                Some(Ok(pair)) => discovered.push(Ok(pair)),
                Some(Err(err)) => {
                    warn!(target: "finder", %err, "Uncorrelated inbox delivery");
                    discovered.push(Err(PairFailure {
                        parent_tx_hash: err.tx_hash,
                        block_number: err.block_number,
                        sequence_number: err.sequence_number,
                        error: err.into(),
                    }));
                }
                None => {}
            }
        }
        Ok(discovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        MockChildProvider, MockParentProvider, accounting_log, delivery_log, retryable_pair,
    };
    use alloy_primitives::{B256, Bytes, ChainId, LogData};
    use core::time::Duration;
    use retryable_protocol::{InboxMessageKind, RetryableStatus};
    use rstest::rstest;

    const CHAIN_ID: ChainId = 42161;
    const INBOX: Address = Address::repeat_byte(0x11);
    const BRIDGE: Address = Address::repeat_byte(0x22);

    fn parent_with(pairs: &[RetryablePair]) -> MockParentProvider {
        let mut parent = MockParentProvider { head: 10_000, ..Default::default() };
        for pair in pairs {
            parent.push_log(INBOX, delivery_log(&pair.delivery, INBOX));
            parent.push_log(BRIDGE, accounting_log(&pair.accounting, BRIDGE));
        }
        parent
    }

    fn create_hash(pair: &RetryablePair) -> B256 {
        RetryableClassifier::new(MockChildProvider::default(), CHAIN_ID)
            .derive_create_tx(pair)
            .unwrap()
            .tx_hash()
    }

    fn finder(
        parent: MockParentProvider,
        child: MockChildProvider,
        max_concurrency: usize,
    ) -> RetryableFinder<MockParentProvider, MockChildProvider> {
        let config = FinderConfig { max_concurrency, ..FinderConfig::new(INBOX, BRIDGE) };
        RetryableFinder::new(parent, RetryableClassifier::new(child, CHAIN_ID), config)
    }

    #[tokio::test]
    async fn test_lookup_failure_is_isolated() {
        let failing = retryable_pair(1, 100);
        let healthy = retryable_pair(2, 200);
        let retry_tx_hash = B256::repeat_byte(0x42);

        let mut child = MockChildProvider::default();
        child.fail_on(create_hash(&failing));
        child.insert_redeem_scheduled(create_hash(&healthy), retry_tx_hash);
        child.insert_receipt(retry_tx_hash, true, vec![]);

        let finder = finder(parent_with(&[failing.clone(), healthy.clone()]), child, 4);
        let report = finder.find_pending_retryables(0, 1_000).await.unwrap();

        assert!(report.pending.is_empty());
        assert_eq!(report.redeemed.len(), 1);
        assert_eq!(report.redeemed[0].parent_tx_hash, healthy.delivery.tx_hash);
        assert_eq!(report.redeemed[0].retry_tx_hash, Some(retry_tx_hash));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].parent_tx_hash, failing.delivery.tx_hash);
        assert!(matches!(report.failures[0].error, PairError::LookupFailure { .. }));
    }

    #[rstest]
    #[case::sequential(1)]
    #[case::concurrent(8)]
    #[case::zero_is_sequential(0)]
    #[tokio::test]
    async fn test_report_order_independent_of_concurrency(#[case] max_concurrency: usize) {
        let pairs = vec![
            retryable_pair(1, 500),
            retryable_pair(2, 100),
            retryable_pair(3, 300),
            retryable_pair(4, 100),
        ];

        let mut child = MockChildProvider::default();
        child.insert_receipt(create_hash(&pairs[1]), false, vec![]);
        child.insert_receipt(create_hash(&pairs[2]), true, vec![]);

        let finder = finder(parent_with(&pairs), child, max_concurrency);
        let report = finder.find_pending_retryables(0, 1_000).await.unwrap();

        let summary: Vec<_> = report
            .pending
            .iter()
            .map(|r| (r.block_number, r.sequence_number.to::<u64>(), r.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                (100, 2, RetryableStatus::CreateFailed),
                (100, 4, RetryableStatus::NotCreated),
                (300, 3, RetryableStatus::NotAutoredeemed),
                (500, 1, RetryableStatus::NotCreated),
            ]
        );
    }

    #[tokio::test]
    async fn test_uncorrelated_delivery_is_reported() {
        let matched = retryable_pair(1, 10);
        let orphan = retryable_pair(2, 20);

        let mut parent = parent_with(&[matched]);
        parent.push_log(INBOX, delivery_log(&orphan.delivery, INBOX));

        let finder = finder(parent, MockChildProvider::default(), 4);
        let report = finder.find_pending_retryables(0, 100).await.unwrap();

        assert_eq!(report.pending.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0].error,
            PairError::CorrelationMismatch(err) if err.matches == 0
        ));
    }

    #[tokio::test]
    async fn test_non_retryable_messages_are_skipped() {
        let mut deposit = retryable_pair(1, 10);
        deposit.accounting.kind = InboxMessageKind::EthDeposit;

        let finder = finder(parent_with(&[deposit]), MockChildProvider::default(), 4);
        let report = finder.find_pending_retryables(0, 100).await.unwrap();
        assert!(report.is_empty());
        assert!(finder.classifier.provider.queried().is_empty());
    }

    #[tokio::test]
    async fn test_range_excludes_outside_blocks() {
        let pairs = [retryable_pair(1, 5), retryable_pair(2, 50), retryable_pair(3, 500)];
        let finder = finder(parent_with(&pairs), MockChildProvider::default(), 4);

        let report = finder.find_pending_retryables(10, 100).await.unwrap();
        assert_eq!(report.pending.len(), 1);
        assert_eq!(report.pending[0].block_number, 50);
    }

    fn undecodable_delivery(sequence_number: u64, block_number: u64) -> alloy_rpc_types_eth::Log {
        alloy_rpc_types_eth::Log {
            inner: alloy_primitives::Log {
                address: INBOX,
                data: LogData::new_unchecked(
                    vec![
                        InboxMessageDelivered::SIGNATURE_HASH,
                        U256::from(sequence_number).into(),
                    ],
                    Bytes::from(vec![0xde, 0xad]),
                ),
            },
            block_number: Some(block_number),
            transaction_hash: Some(B256::repeat_byte(0xee)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_stalled_lookup_does_not_block_siblings() {
        let pairs: Vec<_> = (1..=5).map(|seq| retryable_pair(seq, seq * 10)).collect();
        let mut child = MockChildProvider::default();
        child.stall_on(create_hash(&pairs[0]));

        let finder = finder(parent_with(&pairs), child, 2);
        let run = tokio::time::timeout(
            Duration::from_millis(500),
            finder.find_pending_retryables(0, 1_000),
        );
        assert!(run.await.is_err());

        let queried = finder.classifier.provider.queried();
        assert_eq!(queried.len(), pairs.len());
        for pair in &pairs {
            assert!(queried.contains(&create_hash(pair)));
        }
    }

    #[tokio::test]
    async fn test_undecodable_delivery_is_reported() {
        let healthy = retryable_pair(1, 10);
        let mut parent = parent_with(&[healthy.clone()]);
        parent.push_log(INBOX, undecodable_delivery(2, 11));

        let finder = finder(parent, MockChildProvider::default(), 4);
        let report = finder.find_pending_retryables(0, 100).await.unwrap();

        assert_eq!(report.pending.len(), 1);
        assert_eq!(report.pending[0].parent_tx_hash, healthy.delivery.tx_hash);

        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.parent_tx_hash, B256::repeat_byte(0xee));
        assert_eq!(failure.block_number, 11);
        assert_eq!(failure.sequence_number, U256::from(2));
        assert!(matches!(failure.error, PairError::MalformedEvent(_)));
    }

    #[tokio::test]
    async fn test_undecodable_non_retryable_delivery_is_skipped() {
        let mut deposit = retryable_pair(2, 11);
        deposit.accounting.kind = InboxMessageKind::EthDeposit;

        let mut parent = parent_with(&[retryable_pair(1, 10)]);
        parent.push_log(INBOX, undecodable_delivery(2, 11));
        parent.push_log(BRIDGE, accounting_log(&deposit.accounting, BRIDGE));

        let finder = finder(parent, MockChildProvider::default(), 4);
        let report = finder.find_pending_retryables(0, 100).await.unwrap();
        assert_eq!(report.pending.len(), 1);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_accounting_leaves_delivery_unmatched() {
        let pair = retryable_pair(1, 10);
        let mut parent = MockParentProvider::default();
        parent.push_log(INBOX, delivery_log(&pair.delivery, INBOX));
        parent.push_log(
            BRIDGE,
            alloy_rpc_types_eth::Log {
                inner: alloy_primitives::Log {
                    address: BRIDGE,
                    data: LogData::new_unchecked(
                        vec![MessageDelivered::SIGNATURE_HASH, U256::from(1).into(), B256::ZERO],
                        Bytes::new(),
                    ),
                },
                block_number: Some(10),
                transaction_hash: Some(B256::repeat_byte(0xbb)),
                ..Default::default()
            },
        );

        let finder = finder(parent, MockChildProvider::default(), 4);
        let report = finder.find_pending_retryables(0, 100).await.unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0].error,
            PairError::CorrelationMismatch(err) if err.matches == 0
        ));
    }

    #[tokio::test]
    async fn test_parent_log_failure_aborts() {
        let mut parent = parent_with(&[retryable_pair(1, 10)]);
        parent.failing.insert(BRIDGE);

        let finder = finder(parent, MockChildProvider::default(), 4);
        let err = finder.find_pending_retryables(0, 100).await.unwrap_err();
        assert!(matches!(
            err,
            FinderError::ParentLogs { event, .. } if event == MessageDelivered::SIGNATURE
        ));
    }

    #[tokio::test]
    async fn test_invalid_range() {
        let finder = finder(MockParentProvider::default(), MockChildProvider::default(), 4);
        let err = finder.find_pending_retryables(10, 9).await.unwrap_err();
        assert!(matches!(err, FinderError::InvalidRange { from: 10, to: 9 }));
    }

    #[rstest]
    #[case::defaults(None, None, 100, Ok((9_900, 10_000)))]
    #[case::explicit_from(Some(9_950), None, 100, Ok((9_950, 10_000)))]
    #[case::explicit_to(None, Some(50), 100, Ok((0, 50)))]
    #[case::explicit_both(Some(1), Some(2), 100, Ok((1, 2)))]
    #[case::inverted(Some(20), Some(10), 100, Err((20, 10)))]
    #[tokio::test]
    async fn test_resolve_range(
        #[case] from: Option<u64>,
        #[case] to: Option<u64>,
        #[case] lookback: u64,
        #[case] expected: Result<(u64, u64), (u64, u64)>,
    ) {
        let finder = finder(parent_with(&[]), MockChildProvider::default(), 4);
        let resolved = finder.resolve_range(from, to, lookback).await.map_err(|err| match err {
            FinderError::InvalidRange { from, to } => (from, to),
            other => panic!("unexpected error: {other}"),
        });
        assert_eq!(resolved, expected);
    }
}
