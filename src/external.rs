//! Launching external programs as tracked child processes.
//!
//! Resolution happens in the parent before forking: the program is located
//! on `PATH` (or taken as an absolute/relative path), and all exec material
//! is prepared up front so the child only calls `execve` or exits.

use crate::command::{EXIT_NOT_FOUND, ExitCode};
use crate::env::Environment;
use crate::jobs::{JobState, JobTable};
use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execve, fork, getpgrp, setpgid, tcsetpgrp, write};
use std::borrow::Cow;
use std::ffi::{CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Create exactly one child process running `argv[0]` with the given
/// arguments and the shell's environment table, recording it in the job
/// table as required.
///
/// Foreground launches block until the child exits or is stopped by a
/// job-control signal; a stop creates a `Stopped` job entry and prints its
/// index and pid. Background launches return immediately with a `Running`
/// entry printed right away, regardless of whether the program exists;
/// an exec failure surfaces later as the child's own exit, status 127.
///
/// An empty `argv` is a no-op. The vector is consumed and released in the
/// parent on every path.
pub(crate) fn launch(
    command_text: &str,
    argv: Vec<String>,
    background: bool,
    env: &Environment,
    jobs: &mut JobTable,
) -> Result<ExitCode> {
    if argv.is_empty() {
        return Ok(0);
    }
    let program = argv[0].clone();
    let resolved = resolve(&program, env);
    let path_c = match &resolved {
        Some(path) => Some(CString::new(path.as_os_str().as_bytes()).context("program path")?),
        None => None,
    };
    let argv_c = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .context("argument contains an interior NUL")?;
    let envp: Vec<CString> = env
        .vars
        .iter()
        .filter_map(|(key, value)| CString::new(format!("{key}={value}")).ok())
        .collect();
    let not_found = format!("gash: {program}: command not found\n").into_bytes();

    match unsafe { fork() }.context("fork")? {
        ForkResult::Child => {
            if background {
                // Own process group, so terminal-generated signals stay
                // with the shell's foreground group.
                let _ = setpgid(Pid::from_raw(0), Pid::from_raw(0));
            }
            if let Some(path) = &path_c {
                let _ = execve(path, &argv_c, &envp);
            }
            if !background {
                let _ = write(std::io::stderr(), &not_found);
            }
            unsafe { libc::_exit(EXIT_NOT_FOUND) }
        }
        ForkResult::Parent { child } => {
            log::debug!("spawned pid {child} for {program} (background: {background})");
            if background {
                let _ = setpgid(child, child);
                match jobs.add(child, command_text, JobState::Running) {
                    Some(index) => println!("[{index}] {child}"),
                    None => log::debug!("job table full, pid {child} runs untracked"),
                }
                Ok(0)
            } else {
                match wait_foreground(child).context("waitpid")? {
                    WaitStatus::Stopped(pid, _) => {
                        if let Some(index) = jobs.add(pid, command_text, JobState::Stopped) {
                            println!("\n[{index}] {pid}");
                        }
                        Ok(0)
                    }
                    WaitStatus::Exited(_, code) => Ok(code),
                    WaitStatus::Signaled(_, signal, _) => Ok(128 + signal as i32),
                    status => {
                        log::debug!("unexpected wait status: {status:?}");
                        Ok(0)
                    }
                }
            }
        }
    }
}

/// Block until `pid` exits or is stopped by a job-control signal.
pub(crate) fn wait_foreground(pid: Pid) -> nix::Result<WaitStatus> {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Err(Errno::EINTR) => continue,
            other => return other,
        }
    }
}

/// Hand foreground control of the controlling terminal to `pgrp`.
///
/// Best-effort: a job launched in the shell's own group has no group of
/// its own and the call fails; that group already owns the terminal.
pub(crate) fn give_terminal_to(pgrp: Pid) {
    if let Err(err) = tcsetpgrp(std::io::stdin(), pgrp) {
        log::debug!("tcsetpgrp to {pgrp}: {err}");
    }
}

/// Take foreground control back after a foreground job stopped or exited.
/// Requires SIGTTOU to be ignored, which the signal relay arranges.
pub(crate) fn reclaim_terminal() {
    if let Err(err) = tcsetpgrp(std::io::stdin(), getpgrp()) {
        log::debug!("tcsetpgrp to shell group: {err}");
    }
}

/// Exit code for a child that did not exit normally.
pub(crate) fn signal_exit_code(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        -1
    }
}

fn resolve(program: &str, env: &Environment) -> Option<PathBuf> {
    let search_paths = env.get_var("PATH")?;
    find_command_path(OsStr::new(&search_paths), Path::new(program)).map(Cow::into_owned)
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - `./foo` or a relative path with multiple components (e.g. `bin/sh`):
///   returns it if it exists.
/// - Single path component: search each directory in `search_paths` (PATH)
///   and return the first existing match.
/// - Empty path: returns `None`.
pub(crate) fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    if path.starts_with("./") && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(name), None) => find_in_path(search_paths, name.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(search_paths) {
        let candidate = dir.join(cmd);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
