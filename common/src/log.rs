//! Logging macros used across the workspace.
//!
//! They forward to `tracing`, so whatever subscriber the binary installs
//! decides how events are rendered. [`success!`](crate::success) events are
//! regular `INFO` events emitted under the [`SUCCESS_TARGET`] target, which the
//! CLI formatter picks up to draw a distinct prefix.

pub const TARGET: &str = "sieve";
pub const SUCCESS_TARGET: &str = "sieve::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sieve", $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sieve::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!(target: "sieve", $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!(target: "sieve", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "sieve", $($arg)*)
    };
}
