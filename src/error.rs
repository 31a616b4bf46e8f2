//! Crate-wide error type and the `err_at!` construction macro.
//!
//! Every fallible boundary in this crate (log I/O, replay parsing, lifecycle
//! misuse, poisoned locks) funnels through [Error], constructed with
//! `err_at!` so the reported context always carries the file:line of the
//! call site that raised it.

use std::{fmt, io, result};

/// Crate-wide result alias.
pub type Result<T> = result::Result<T, Error>;

/// Crate-wide error type.
///
/// Variants map to the error kinds in the durability/lifecycle design:
/// `IOError` for log open/append/flush/close failures, `ReplayParse` for a
/// malformed log line encountered during `initialize`, `InvalidInput` for
/// caller-supplied bad arguments (empty metric name, empty time range),
/// `InvalidState` for operations attempted in the wrong lifecycle state, and
/// `PoisonedLock` when the coordinator's `RwLock` was poisoned by a panicked
/// holder.
#[derive(Debug)]
pub enum Error {
    IOError(String, io::Error),
    ReplayParse(String, usize),
    InvalidInput(String),
    InvalidState(String),
    PoisonedLock(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IOError(ctx, err) => write!(f, "{} IOError: {}", ctx, err),
            Error::ReplayParse(ctx, line_no) => {
                write!(f, "{} ReplayParse: malformed log line {}", ctx, line_no)
            }
            Error::InvalidInput(ctx) => write!(f, "{} InvalidInput", ctx),
            Error::InvalidState(ctx) => write!(f, "{} InvalidState", ctx),
            Error::PoisonedLock(ctx) => write!(f, "{} PoisonedLock", ctx),
        }
    }
}

impl std::error::Error for Error {}

/// Construct an [Error], tagging it with the call site's `file:line`.
///
/// Two forms:
///
/// * `err_at!(IOError, expr)` — `expr` is a `std::io::Result<T>`; its
///   `Err(io::Error)` is wrapped into `Error::IOError(ctx, ..)`, `Ok(t)`
///   passes `t` through unchanged.
/// * `err_at!(Kind, msg: "fmt", args...)` — directly construct `Err(Error)`
///   from a formatted message, for call sites with no underlying
///   `std::error::Error` to wrap.
#[macro_export]
macro_rules! err_at {
    (IOError, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let ctx = format!("{}:{}", file!(), line!());
                Err($crate::Error::IOError(ctx, err))
            }
        }
    }};
    (ReplayParse, $line_no:expr) => {{
        let ctx = format!("{}:{}", file!(), line!());
        Err($crate::Error::ReplayParse(ctx, $line_no))
    }};
    (InvalidInput, msg: $($arg:tt)*) => {{
        let ctx = format!("{}:{} {}", file!(), line!(), format!($($arg)*));
        Err($crate::Error::InvalidInput(ctx))
    }};
    (InvalidState, msg: $($arg:tt)*) => {{
        let ctx = format!("{}:{} {}", file!(), line!(), format!($($arg)*));
        Err($crate::Error::InvalidState(ctx))
    }};
    (PoisonedLock, msg: $($arg:tt)*) => {{
        let ctx = format!("{}:{} {}", file!(), line!(), format!($($arg)*));
        Err($crate::Error::PoisonedLock(ctx))
    }};
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
