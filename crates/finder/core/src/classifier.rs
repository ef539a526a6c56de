//! Classifies a correlated retryable by walking its child chain receipts.

use crate::{ChildChainProvider, ChildReceipt, ClassificationResult, FinderError, PairError};
use alloc::boxed::Box;
use alloy_primitives::{B256, ChainId};
use retryable_protocol::{
    RetryablePair, RetryableStatus, RetryableSubmission, SubmitRetryableTx, find_redeem_scheduled,
};
use tracing::debug;

/// Determines how far a retryable submission progressed on the child chain.
#[derive(Debug, Clone)]
pub struct RetryableClassifier<C> {
    /// The child chain provider.
    pub provider: C,
    /// The child chain id, part of the derived transaction.
    pub chain_id: ChainId,
}

impl<C> RetryableClassifier<C>
where
    C: ChildChainProvider + Send + Sync,
{
    /// Creates a new [`RetryableClassifier`].
    pub const fn new(provider: C, chain_id: ChainId) -> Self {
        Self { provider, chain_id }
    }

    /// Creates a new [`RetryableClassifier`] for the chain the provider is connected to.
    pub async fn from_provider(provider: C) -> Result<Self, FinderError> {
        let chain_id =
            provider.chain_id().await.map_err(|err| FinderError::ChainId(Box::new(err)))?;
        Ok(Self::new(provider, chain_id))
    }

    /// Derives the child chain ticket creation transaction for the pair.
    pub fn derive_create_tx(&self, pair: &RetryablePair) -> Result<SubmitRetryableTx, PairError> {
        let RetryablePair { delivery, accounting } = pair;
        let submission = RetryableSubmission::decode(&delivery.data)
            .map_err(|source| PairError::MalformedPayload { tx_hash: delivery.tx_hash, source })?;

        Ok(SubmitRetryableTx::builder()
            .with_chain_id(self.chain_id)
            .with_request_id(accounting.sequence_number)
            .with_sender(accounting.sender)
            .with_l1_base_fee(accounting.base_fee)
            .with_submission(submission)
            .build()?)
    }

    /// Classifies the pair. The first failing step determines the status.
    pub async fn classify(&self, pair: &RetryablePair) -> Result<ClassificationResult, PairError> {
        let create_tx_hash = self.derive_create_tx(pair)?.tx_hash();
        let (status, retry_tx_hash) = self.walk_receipts(create_tx_hash).await?;

        debug!(
            target: "classifier",
            sequence_number = %pair.delivery.sequence_number,
            %create_tx_hash,
            retry_tx_hash = ?retry_tx_hash,
            %status,
            "Classified retryable"
        );
        Ok(ClassificationResult {
            parent_tx_hash: pair.delivery.tx_hash,
            block_number: pair.delivery.block_number,
            sequence_number: pair.delivery.sequence_number,
            create_tx_hash,
            retry_tx_hash,
            status,
        })
    }

    async fn walk_receipts(
        &self,
        create_tx_hash: B256,
    ) -> Result<(RetryableStatus, Option<B256>), PairError> {
        let Some(create_receipt) = self.receipt(create_tx_hash).await? else {
            return Ok((RetryableStatus::NotCreated, None));
        };
        if !create_receipt.status {
            return Ok((RetryableStatus::CreateFailed, None));
        }

        let Some(retry_tx_hash) = find_redeem_scheduled(&create_receipt.logs) else {
            return Ok((RetryableStatus::NotAutoredeemed, None));
        };

        let status = match self.receipt(retry_tx_hash).await? {
            None => RetryableStatus::AutoredeemCreateFailed,
            Some(receipt) if !receipt.status => RetryableStatus::AutoredeemFailed,
            Some(_) => RetryableStatus::Redeemed,
        };
        Ok((status, Some(retry_tx_hash)))
    }

    async fn receipt(&self, tx_hash: B256) -> Result<Option<ChildReceipt>, PairError> {
        self.provider
            .transaction_receipt(tx_hash)
            .await
            .map_err(|err| PairError::LookupFailure { tx_hash, source: Box::new(err) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockChildProvider, retryable_pair};
    use alloy_primitives::U256;
    use retryable_protocol::{RetryableDecodeError, SUBMISSION_HEADER_LEN};
    use rstest::rstest;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    const CHAIN_ID: ChainId = 42161;

    /// Collects formatted log lines.
    #[derive(Debug, Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Builds a child chain that forces the given status for `pair`.
    fn child_chain_for(pair: &RetryablePair, status: RetryableStatus) -> MockChildProvider {
        let classifier = RetryableClassifier::new(MockChildProvider::default(), CHAIN_ID);
        let create_tx_hash = classifier.derive_create_tx(pair).unwrap().tx_hash();
        let retry_tx_hash = B256::repeat_byte(0x42);

        let mut child = MockChildProvider::default();
        match status {
            RetryableStatus::NotCreated => {}
            RetryableStatus::CreateFailed => child.insert_receipt(create_tx_hash, false, vec![]),
            RetryableStatus::NotAutoredeemed => child.insert_receipt(create_tx_hash, true, vec![]),
            RetryableStatus::AutoredeemCreateFailed => {
                child.insert_redeem_scheduled(create_tx_hash, retry_tx_hash);
            }
            RetryableStatus::AutoredeemFailed => {
                child.insert_redeem_scheduled(create_tx_hash, retry_tx_hash);
                child.insert_receipt(retry_tx_hash, false, vec![]);
            }
            RetryableStatus::Redeemed => {
                child.insert_redeem_scheduled(create_tx_hash, retry_tx_hash);
                child.insert_receipt(retry_tx_hash, true, vec![]);
            }
        }
        child
    }

    #[rstest]
    #[case::not_created(RetryableStatus::NotCreated)]
    #[case::create_failed(RetryableStatus::CreateFailed)]
    #[case::not_autoredeemed(RetryableStatus::NotAutoredeemed)]
    #[case::autoredeem_create_failed(RetryableStatus::AutoredeemCreateFailed)]
    #[case::autoredeem_failed(RetryableStatus::AutoredeemFailed)]
    #[case::redeemed(RetryableStatus::Redeemed)]
    #[tokio::test]
    async fn test_classify_each_status(#[case] expected: RetryableStatus) {
        let pair = retryable_pair(7, 1_000);
        let classifier = RetryableClassifier::new(child_chain_for(&pair, expected), CHAIN_ID);

        let result = classifier.classify(&pair).await.unwrap();
        assert_eq!(result.status, expected);
        assert_eq!(result.parent_tx_hash, pair.delivery.tx_hash);
        assert_eq!(result.block_number, 1_000);
        assert_eq!(result.sequence_number, U256::from(7));

        let has_retry = matches!(
            expected,
            RetryableStatus::AutoredeemCreateFailed
                | RetryableStatus::AutoredeemFailed
                | RetryableStatus::Redeemed
        );
        assert_eq!(result.retry_tx_hash.is_some(), has_retry);
    }

    #[rstest]
    #[case::not_created(RetryableStatus::NotCreated)]
    #[case::create_failed(RetryableStatus::CreateFailed)]
    #[case::not_autoredeemed(RetryableStatus::NotAutoredeemed)]
    #[case::redeemed(RetryableStatus::Redeemed)]
    #[tokio::test]
    async fn test_classify_logs_every_status(#[case] expected: RetryableStatus) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let pair = retryable_pair(9, 1_000);
        let classifier = RetryableClassifier::new(child_chain_for(&pair, expected), CHAIN_ID);
        classifier.classify(&pair).await.unwrap();

        let logs = captured.contents();
        assert!(logs.contains("Classified retryable"), "{logs}");
        assert!(logs.contains(&format!("status={expected}")), "{logs}");
    }

    #[tokio::test]
    async fn test_classify_uses_derived_create_hash() {
        let pair = retryable_pair(3, 10);
        let classifier = RetryableClassifier::new(MockChildProvider::default(), CHAIN_ID);
        let expected = classifier.derive_create_tx(&pair).unwrap().tx_hash();

        let result = classifier.classify(&pair).await.unwrap();
        assert_eq!(result.create_tx_hash, expected);
        assert_eq!(classifier.provider.queried(), vec![expected]);
    }

    #[tokio::test]
    async fn test_from_provider_uses_chain_id() {
        let provider = MockChildProvider { chain_id: 42170, ..Default::default() };
        let classifier = RetryableClassifier::from_provider(provider).await.unwrap();
        assert_eq!(classifier.chain_id, 42170);
    }

    #[tokio::test]
    async fn test_classify_chain_id_changes_hash() {
        let pair = retryable_pair(3, 10);
        let one = RetryableClassifier::new(MockChildProvider::default(), 42161);
        let nova = RetryableClassifier::new(MockChildProvider::default(), 42170);

        assert_ne!(
            one.derive_create_tx(&pair).unwrap().tx_hash(),
            nova.derive_create_tx(&pair).unwrap().tx_hash()
        );
    }

    #[tokio::test]
    async fn test_classify_malformed_payload() {
        let mut pair = retryable_pair(1, 10);
        pair.delivery.data = pair.delivery.data.slice(..SUBMISSION_HEADER_LEN - 1);
        let classifier = RetryableClassifier::new(MockChildProvider::default(), CHAIN_ID);

        let err = classifier.classify(&pair).await.unwrap_err();
        assert!(matches!(
            err,
            PairError::MalformedPayload { source: RetryableDecodeError::HeaderTooShort(_), .. }
        ));
        assert!(classifier.provider.queried().is_empty());
    }

    #[tokio::test]
    async fn test_classify_lookup_failure() {
        let pair = retryable_pair(1, 10);
        let deriver = RetryableClassifier::new(MockChildProvider::default(), CHAIN_ID);
        let create_tx_hash = deriver.derive_create_tx(&pair).unwrap().tx_hash();

        let mut child = MockChildProvider::default();
        child.fail_on(create_tx_hash);
        let classifier = RetryableClassifier::new(child, CHAIN_ID);

        let err = classifier.classify(&pair).await.unwrap_err();
        assert!(matches!(err, PairError::LookupFailure { tx_hash, .. } if tx_hash == create_tx_hash));
    }

    #[tokio::test]
    async fn test_classify_lookup_failure_on_retry() {
        let pair = retryable_pair(1, 10);
        let retry_tx_hash = B256::repeat_byte(0x42);
        let mut child = child_chain_for(&pair, RetryableStatus::AutoredeemCreateFailed);
        child.fail_on(retry_tx_hash);
        let classifier = RetryableClassifier::new(child, CHAIN_ID);

        let err = classifier.classify(&pair).await.unwrap_err();
        assert!(matches!(err, PairError::LookupFailure { tx_hash, .. } if tx_hash == retry_tx_hash));
    }
}
