// Copyright (c) 2024 Mike Tsao

//! Identifies the build that produced a rendered file, so a stimulation
//! session can be traced back to the generator version.

/// The crate version, or a version-control identifier if the build supplied
/// one through `GIT_DESCRIBE` or `GIT_REV_PARSE`.
pub fn app_version() -> &'static str {
    option_env!("GIT_DESCRIBE")
        .or(option_env!("GIT_REV_PARSE"))
        .unwrap_or(env!("CARGO_PKG_VERSION"))
}
