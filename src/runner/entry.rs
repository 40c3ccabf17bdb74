//! Program entry points
//!
//! A wrapped function's return value becomes the process exit status.

use colored::Colorize;
use std::fmt::Display;
use std::process;

/// Conversion from a function result to a process exit status
pub trait IntoExitCode {
    fn into_exit_code(self) -> i32;
}

impl IntoExitCode for () {
    fn into_exit_code(self) -> i32 {
        0
    }
}

impl IntoExitCode for i32 {
    fn into_exit_code(self) -> i32 {
        self
    }
}

impl IntoExitCode for u8 {
    fn into_exit_code(self) -> i32 {
        i32::from(self)
    }
}

/// A message is printed to stderr and the status is 1
impl IntoExitCode for String {
    fn into_exit_code(self) -> i32 {
        eprintln!("{}", self);
        1
    }
}

impl IntoExitCode for &str {
    fn into_exit_code(self) -> i32 {
        self.to_string().into_exit_code()
    }
}

/// `None` is success
impl<T: IntoExitCode> IntoExitCode for Option<T> {
    fn into_exit_code(self) -> i32 {
        self.map_or(0, IntoExitCode::into_exit_code)
    }
}

impl<T: IntoExitCode, E: Display> IntoExitCode for Result<T, E> {
    fn into_exit_code(self) -> i32 {
        match self {
            Ok(value) => value.into_exit_code(),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                1
            }
        }
    }
}

/// Call `main` and exit the process with its result.
///
/// Meant to be called from the program's own `main`; nothing runs at
/// definition time.
pub fn run_main<F, R>(main: F) -> !
where
    F: FnOnce() -> R,
    R: IntoExitCode,
{
    let code = main().into_exit_code();
    tracing::debug!(code, "exiting");
    process::exit(code)
}
