//! The job table: tracked child processes with a display index, the command
//! text that launched them, and a running/stopped state.

use nix::unistd::Pid;
use std::fmt;

/// Upper bound on tracked jobs. A launch past it still creates the OS
/// process; the shell merely loses the ability to `fg`/`bg` it later.
pub const MAX_JOBS: usize = 32;

/// Where a job is in its lifecycle, as far as the shell has observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Running => f.write_str("Running"),
            JobState::Stopped => f.write_str("Stopped"),
        }
    }
}

/// A tracked child process.
#[derive(Debug, Clone)]
pub struct Job {
    pub pid: Pid,
    pub command: String,
    pub state: JobState,
}

/// Bounded table of jobs. The vector index is the identifier shown to the
/// user. Entries are never removed: process exit is not reaped here, so a
/// job that terminated stays listed until the session ends.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new job and return its display index, or `None` when the
    /// table is full and the process runs untracked.
    pub fn add(&mut self, pid: Pid, command: &str, state: JobState) -> Option<usize> {
        if self.jobs.len() >= MAX_JOBS {
            return None;
        }
        self.jobs.push(Job {
            pid,
            command: command.to_string(),
            state,
        });
        Some(self.jobs.len() - 1)
    }

    /// Job at a user-supplied index; negative or out-of-range indices miss.
    pub fn get(&self, index: i32) -> Option<&Job> {
        usize::try_from(index).ok().and_then(|i| self.jobs.get(i))
    }

    pub fn get_mut(&mut self, index: i32) -> Option<&mut Job> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.jobs.get_mut(i))
    }

    /// Jobs in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_returns_display_index() {
        let mut table = JobTable::new();
        let first = table.add(Pid::from_raw(100), "sleep 100", JobState::Running);
        let second = table.add(Pid::from_raw(101), "sleep 101", JobState::Stopped);
        assert_eq!(first, Some(0));
        assert_eq!(second, Some(1));
        assert_eq!(table.get(1).map(|j| j.state), Some(JobState::Stopped));
    }

    #[test]
    fn test_capacity_degrades_silently() {
        let mut table = JobTable::new();
        for i in 0..MAX_JOBS {
            assert!(
                table
                    .add(Pid::from_raw(1000 + i as i32), "cmd", JobState::Running)
                    .is_some()
            );
        }
        assert_eq!(table.add(Pid::from_raw(9999), "cmd", JobState::Running), None);
        assert_eq!(table.len(), MAX_JOBS);
    }

    #[test]
    fn test_negative_index_misses() {
        let mut table = JobTable::new();
        table.add(Pid::from_raw(100), "cmd", JobState::Running);
        assert!(table.get(-1).is_none());
        assert!(table.get(1).is_none());
        assert!(table.get(0).is_some());
    }

    #[test]
    fn test_state_display_matches_listing_words() {
        assert_eq!(JobState::Running.to_string(), "Running");
        assert_eq!(JobState::Stopped.to_string(), "Stopped");
    }
}
