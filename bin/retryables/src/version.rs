//! Version information for the binary.

/// The short version information.
pub(crate) const SHORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The long version information.
pub(crate) const LONG_VERSION: &str = concat!(
    "Version: ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Package: ",
    env!("CARGO_PKG_NAME"),
    "\n",
    "Repository: ",
    env!("CARGO_PKG_REPOSITORY")
);
