//! CLI flags shared by the subcommands.

mod globals;
pub use globals::GlobalArgs;

mod chain;
pub use chain::ParentChainArgs;

mod range;
pub use range::RangeArgs;
