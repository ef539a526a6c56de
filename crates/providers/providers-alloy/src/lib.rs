#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod errors;
pub use errors::AlloyProviderError;

mod parent;
pub use parent::AlloyParentChainProvider;

mod child;
pub use child::{AlloyChildChainProvider, child_receipt};
