//! Shared conventions for command execution results.

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line
/// tools.
pub type ExitCode = i32;

/// Exit status a child reports when the program to run could not be found
/// or executed. This is a shell convention, not the program's own status.
pub const EXIT_NOT_FOUND: ExitCode = 127;
