//! Compile-time build metadata for the `--version` output.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("CALCLINE_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("CALCLINE_BUILD_TIMESTAMP");

/// Version block shown by `calcline --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("CALCLINE_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("CALCLINE_BUILD_TIMESTAMP")
);
