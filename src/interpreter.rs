//! The interactive loop: prompt, line acquisition, dispatch, launch.

use crate::alias::AliasTable;
use crate::config;
use crate::env::Environment;
use crate::jobs::JobTable;
use crate::signal::{Mode, SignalRelay};
use crate::{builtin, external, lexer, prompt};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use std::io;
use std::path::PathBuf;

const HISTORY_FILE: &str = ".gash_history";
const MAX_HISTORY: usize = 1000;

/// Everything a command can act on: the environment, the alias table and
/// the job table. Owned by the [`Interpreter`] and passed by reference into
/// the dispatcher and launcher; commands run one at a time, so no entry may
/// be held across loop iterations.
pub struct ShellState {
    pub env: Environment,
    pub aliases: AliasTable,
    pub jobs: JobTable,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            aliases: AliasTable::new(),
            jobs: JobTable::new(),
        }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

/// The shell's read-eval loop and the state it drives.
pub struct Interpreter {
    state: ShellState,
    relay: SignalRelay,
}

impl Interpreter {
    /// Install signal dispositions, capture the environment and load the
    /// user's configuration file.
    pub fn new() -> Result<Self> {
        let relay = SignalRelay::install()?;
        let mut state = ShellState::new();
        config::load_rc(&mut state.env, &mut state.aliases);
        Ok(Self { state, relay })
    }

    /// Run the interactive loop until `exit` or end of input.
    ///
    /// Per iteration: render the prompt, read a line, trim it, append it to
    /// the history, detect a trailing `&`, try the builtin forms, otherwise
    /// tokenize and launch. History is loaded up front and rewritten in
    /// full before returning.
    pub fn repl(&mut self) -> Result<()> {
        let config = Config::builder().max_history_size(MAX_HISTORY)?.build();
        let mut rl = DefaultEditor::with_config(config)?;
        let history = history_path();
        if let Some(path) = &history {
            if let Err(err) = rl.load_history(path) {
                log::debug!("no history loaded: {err}");
            }
        }

        loop {
            let prompt = prompt::render(&self.state.env);
            self.relay.enter(Mode::Editing);
            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                // Interrupt at the prompt: the edited line is dropped and
                // the prompt redrawn on the next iteration.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("gash: {err}");
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            rl.add_history_entry(line)?;

            let (line, background) = strip_background_marker(line);
            if let Some(code) = builtin::dispatch(line, &mut io::stdout(), &mut self.state) {
                log::trace!("builtin exited with {code}");
                if self.state.env.should_exit {
                    break;
                }
                continue;
            }

            let argv = lexer::tokenize(line, &self.state.aliases, &self.state.env);
            self.relay.enter(Mode::Waiting);
            match external::launch(line, argv, background, &self.state.env, &mut self.state.jobs) {
                Ok(code) => log::trace!("command exited with {code}"),
                Err(err) => eprintln!("gash: {err:#}"),
            }
            // An interrupt during the wait went to the foreground group;
            // the shell's copy only warrants a fresh line for the prompt.
            if self.relay.interrupted_while(Mode::Waiting) {
                println!();
            }
        }

        if let Some(path) = &history {
            if let Err(err) = rl.save_history(path) {
                log::warn!("could not save history: {err}");
            }
        }
        Ok(())
    }
}

/// Detect and strip a trailing `&`. The marker needs no preceding space;
/// the remaining text (trailing whitespace removed) is the command, which
/// may be empty.
fn strip_background_marker(line: &str) -> (&str, bool) {
    match line.strip_suffix('&') {
        Some(rest) => (rest.trim_end(), true),
        None => (line, false),
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_background_marker() {
        assert_eq!(strip_background_marker("echo hi &"), ("echo hi", true));
        assert_eq!(strip_background_marker("echo hi&"), ("echo hi", true));
        assert_eq!(strip_background_marker("echo hi"), ("echo hi", false));
        assert_eq!(strip_background_marker("&"), ("", true));
    }

    #[test]
    fn test_history_path_is_under_home() {
        if let Some(path) = history_path() {
            assert!(path.ends_with(HISTORY_FILE));
        }
    }
}
