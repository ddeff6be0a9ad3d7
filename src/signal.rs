//! Interrupt handling for the shell's own process.
//!
//! The shell suspends in exactly two places: reading a line and waiting on
//! a foreground child. An interrupt means something different in each, so
//! instead of acting inside a handler the relay latches the signal and lets
//! the main loop consult it with the current [`Mode`] in hand.

use anyhow::Result;
use nix::sys::signal::{self, SigHandler, Signal};
use signal_hook::consts::SIGINT;
use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the shell is currently blocked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// At the prompt, the line editor owns the terminal. An interrupt resets
    /// the in-progress edit and redraws the prompt.
    Editing,
    /// Blocked on a foreground child. The interrupt belongs to the child's
    /// process group; the shell only absorbs its copy.
    Waiting,
}

pub(crate) struct SignalRelay {
    interrupted: Arc<AtomicBool>,
    mode: Cell<Mode>,
}

impl SignalRelay {
    /// Install process-wide signal dispositions and return the relay.
    ///
    /// `SIGTSTP` is ignored so a terminal stop suspends the foreground
    /// child, never the shell; `SIGTTOU` is ignored so the shell can
    /// reclaim the terminal with `tcsetpgrp` after a foreground job.
    pub(crate) fn install() -> Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGINT, Arc::clone(&interrupted))?;
        unsafe {
            signal::signal(Signal::SIGTSTP, SigHandler::SigIgn)?;
            signal::signal(Signal::SIGTTOU, SigHandler::SigIgn)?;
        }
        log::debug!("signal relay installed");
        Ok(Self {
            interrupted,
            mode: Cell::new(Mode::Editing),
        })
    }

    /// Record the upcoming suspension point, dropping any stale interrupt
    /// latched during the previous one.
    pub(crate) fn enter(&self, mode: Mode) {
        self.mode.set(mode);
        self.interrupted.store(false, Ordering::SeqCst);
    }

    /// Consume a pending interrupt, but only when the shell is suspended in
    /// `mode`; in any other mode the latch is left untouched for the right
    /// consumer.
    pub(crate) fn interrupted_while(&self, mode: Mode) -> bool {
        self.mode.get() == mode && self.interrupted.swap(false, Ordering::SeqCst)
    }
}
