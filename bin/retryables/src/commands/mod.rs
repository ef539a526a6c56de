//! Subcommands for the retryables CLI.

mod find;
pub use find::FindCommand;

mod discover;
pub use discover::DiscoverCommand;

mod networks;
pub use networks::NetworksCommand;
