#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

extern crate alloc;

mod traits;
pub use traits::{ChildChainProvider, ChildReceipt, ParentChainProvider};

mod errors;
pub use errors::{BoxError, FinderError, PairError};

mod report;
pub use report::{ClassificationResult, PairFailure, Report};

mod classifier;
pub use classifier::RetryableClassifier;

mod logs;
pub use logs::{block_windows, fetch_logs};

mod finder;
pub use finder::{FinderConfig, RetryableFinder, resolve_range};

mod discovery;
pub use discovery::{InboxSummary, KindCount, discover_inboxes};

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
