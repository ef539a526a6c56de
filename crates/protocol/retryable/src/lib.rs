#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod submission;
pub use submission::{RetryableDecodeError, RetryableSubmission, SUBMISSION_HEADER_LEN};

mod kind;
pub use kind::InboxMessageKind;

mod tx;
pub use tx::{
    DerivationError, SUBMIT_RETRYABLE_TX_TYPE, SubmitRetryableTx, SubmitRetryableTxBuilder,
};

mod events;
pub use events::{
    ARB_RETRYABLE_TX_ADDRESS, AccountingEvent, DeliveryEvent, EventDecodeError,
    InboxMessageDelivered, MessageDelivered, RedeemScheduled, find_redeem_scheduled,
};

mod correlate;
pub use correlate::{CorrelationError, Correlator, RetryablePair, correlate};

mod status;
pub use status::RetryableStatus;

pub mod networks;
pub use networks::{NITRO_CHAINS, NitroChain};
