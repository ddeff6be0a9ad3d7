//! Commands recognized and fully handled by the shell itself, never
//! becoming a separate OS process.
//!
//! Dispatch works on the trimmed command line, before any alias or home
//! expansion: each form matches either the exact line (`pwd`, `jobs`, ...)
//! or a prefix with the rest of the line taken verbatim (`cd `, `eval `,
//! ...), and the first match wins. A line that matches no form falls
//! through to the launcher.

use crate::command::ExitCode;
use crate::external;
use crate::interpreter::ShellState;
use crate::jobs::JobState;
use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use std::io::Write;
use std::process::Command;
use std::time::Instant;

/// A command form the dispatcher can recognize on the raw line.
pub(crate) trait Builtin: Sized {
    /// Match this builtin's form against a trimmed command line.
    fn parse(line: &str) -> Option<Self>;

    /// Perform the effect directly against shell-local state.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for
    /// error.
    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode>;
}

type Form = fn(&str, &mut dyn Write, &mut ShellState) -> Option<Result<ExitCode>>;

fn run<B: Builtin>(
    line: &str,
    stdout: &mut dyn Write,
    state: &mut ShellState,
) -> Option<Result<ExitCode>> {
    B::parse(line).map(|cmd| cmd.execute(stdout, state))
}

/// Recognized forms in dispatch order; first match wins.
const FORMS: &[Form] = &[
    run::<Exit>,
    run::<Pwd>,
    run::<Clear>,
    run::<Help>,
    run::<Cd>,
    run::<AliasList>,
    run::<Export>,
    run::<Eval>,
    run::<Jobs>,
    run::<Fg>,
    run::<Bg>,
    run::<Time>,
];

/// Test `line` against the builtin forms and execute the first match.
///
/// Returns `None` when the line is not a builtin and should go to the
/// launcher. Builtin failures are reported to stderr and folded into exit
/// code 1; the session always continues.
pub(crate) fn dispatch(line: &str, stdout: &mut dyn Write, state: &mut ShellState) -> Option<ExitCode> {
    for form in FORMS {
        if let Some(result) = form(line, stdout, state) {
            return Some(result.unwrap_or_else(|err| {
                eprintln!("{err:#}");
                1
            }));
        }
    }
    None
}

/// `exit`: request session termination. The loop breaks and the history
/// file is rewritten on the way out.
struct Exit;

impl Builtin for Exit {
    fn parse(line: &str) -> Option<Self> {
        (line == "exit").then_some(Exit)
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        state.env.should_exit = true;
        Ok(0)
    }
}

/// `pwd`: print the working directory, or an error line if the OS cannot
/// report it.
struct Pwd;

impl Builtin for Pwd {
    fn parse(line: &str) -> Option<Self> {
        (line == "pwd").then_some(Pwd)
    }

    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        match std::env::current_dir() {
            Ok(dir) => {
                writeln!(stdout, "{}", dir.display())?;
                state.env.current_dir = dir;
                Ok(0)
            }
            Err(_) => {
                writeln!(stdout, "pwd: error")?;
                Ok(1)
            }
        }
    }
}

/// `clear`: terminal-clear escape sequence.
struct Clear;

impl Builtin for Clear {
    fn parse(line: &str) -> Option<Self> {
        (line == "clear").then_some(Clear)
    }

    fn execute(self, stdout: &mut dyn Write, _state: &mut ShellState) -> Result<ExitCode> {
        write!(stdout, "\x1b[H\x1b[J")?;
        stdout.flush()?;
        Ok(0)
    }
}

/// `help`: fixed usage summary.
struct Help;

impl Builtin for Help {
    fn parse(line: &str) -> Option<Self> {
        (line == "help").then_some(Help)
    }

    fn execute(self, stdout: &mut dyn Write, _state: &mut ShellState) -> Result<ExitCode> {
        writeln!(stdout, "gash builtins: cd alias export eval exit help jobs fg bg time")?;
        Ok(0)
    }
}

/// `cd <path>`: the rest of the line, verbatim, is the target.
struct Cd {
    target: String,
}

impl Builtin for Cd {
    fn parse(line: &str) -> Option<Self> {
        line.strip_prefix("cd ").map(|rest| Cd {
            target: rest.to_string(),
        })
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        std::env::set_current_dir(&self.target).context("cd")?;
        state.env.current_dir = std::env::current_dir().context("cd")?;
        Ok(0)
    }
}

/// `alias`: list every entry in table order.
struct AliasList;

impl Builtin for AliasList {
    fn parse(line: &str) -> Option<Self> {
        (line == "alias").then_some(AliasList)
    }

    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        for alias in state.aliases.iter() {
            writeln!(stdout, "alias {}='{}'", alias.name, alias.expansion)?;
        }
        Ok(0)
    }
}

/// `export NAME=VALUE`: split at the first `=`; without one the line is
/// silently ignored.
struct Export {
    assignment: String,
}

impl Builtin for Export {
    fn parse(line: &str) -> Option<Self> {
        line.strip_prefix("export ").map(|rest| Export {
            assignment: rest.to_string(),
        })
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        if let Some((name, value)) = self.assignment.split_once('=') {
            state.env.set_var(name, value);
        }
        Ok(0)
    }
}

/// `eval <command>`: hand the rest of the line to the host command
/// processor, bypassing the tokenizer, launcher and job tracking. The
/// escape hatch for syntax this shell does not implement.
struct Eval {
    command: String,
}

impl Builtin for Eval {
    fn parse(line: &str) -> Option<Self> {
        line.strip_prefix("eval ").map(|rest| Eval {
            command: rest.to_string(),
        })
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        host_shell(&self.command, state)
    }
}

/// `jobs`: list every job table entry.
struct Jobs;

impl Builtin for Jobs {
    fn parse(line: &str) -> Option<Self> {
        (line == "jobs").then_some(Jobs)
    }

    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        for (index, job) in state.jobs.iter().enumerate() {
            writeln!(stdout, "[{index}] {} {}", job.state, job.command)?;
        }
        Ok(0)
    }
}

/// `fg %<index>`: hand the job's group the terminal, continue it, wait
/// until it stops or exits, reclaim the terminal, clear the stopped flag.
/// Out-of-range indices are handled silently; signal delivery to an
/// already-gone pid fails silently as well.
struct Fg {
    index: i32,
}

impl Builtin for Fg {
    fn parse(line: &str) -> Option<Self> {
        line.strip_prefix("fg %").map(|rest| Fg {
            index: leading_int(rest),
        })
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        let Some(job) = state.jobs.get(self.index) else {
            return Ok(0);
        };
        let pid = job.pid;
        external::give_terminal_to(pid);
        if let Err(err) = kill(pid, Signal::SIGCONT) {
            log::debug!("SIGCONT to {pid}: {err}");
        }
        if let Err(err) = external::wait_foreground(pid) {
            log::debug!("wait on {pid}: {err}");
        }
        external::reclaim_terminal();
        if let Some(job) = state.jobs.get_mut(self.index) {
            job.state = JobState::Running;
        }
        Ok(0)
    }
}

/// `bg %<index>`: continue a job in the background: no terminal transfer,
/// no blocking.
struct Bg {
    index: i32,
}

impl Builtin for Bg {
    fn parse(line: &str) -> Option<Self> {
        line.strip_prefix("bg %").map(|rest| Bg {
            index: leading_int(rest),
        })
    }

    fn execute(self, _stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        let Some(job) = state.jobs.get_mut(self.index) else {
            return Ok(0);
        };
        if let Err(err) = kill(job.pid, Signal::SIGCONT) {
            log::debug!("SIGCONT to {}: {err}", job.pid);
        }
        job.state = JobState::Running;
        Ok(0)
    }
}

/// `time <command>`: run via the host command processor, print wall time
/// with two decimals.
struct Time {
    command: String,
}

impl Builtin for Time {
    fn parse(line: &str) -> Option<Self> {
        line.strip_prefix("time ").map(|rest| Time {
            command: rest.to_string(),
        })
    }

    fn execute(self, stdout: &mut dyn Write, state: &mut ShellState) -> Result<ExitCode> {
        let started = Instant::now();
        let result = host_shell(&self.command, state);
        writeln!(stdout, "Execution time: {:.2}s", started.elapsed().as_secs_f64())?;
        result
    }
}

/// Run `command` through `sh -c` with the shell's environment table and
/// working directory, waiting for it to finish.
fn host_shell(command: &str, state: &ShellState) -> Result<ExitCode> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .envs(state.env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&state.env.current_dir)
        .status()
        .context("sh")?;
    Ok(status
        .code()
        .unwrap_or_else(|| external::signal_exit_code(status)))
}

/// Leading-integer parse with `atoi` semantics: optional sign, digits until
/// the first non-digit, `0` when there are none.
fn leading_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().map(|n| sign * n).unwrap_or(0)
}
