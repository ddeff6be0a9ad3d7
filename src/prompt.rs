//! Prompt rendering: a pure function from environment and process state to
//! the display string shown before each line read.

use crate::env::Environment;

/// Render the prompt for one loop iteration.
///
/// A non-empty `GASH_PROMPT` overrides everything and is shown verbatim in
/// green. Otherwise the prompt is `user@host [ipv4] cwd$`, colored, with
/// the home-directory prefix collapsed to `~`. The IPv4 address is
/// best-effort and simply omitted when none can be determined.
#[cfg(unix)]
pub(crate) fn render(env: &Environment) -> String {
    if let Some(custom) = env.get_var("GASH_PROMPT") {
        if !custom.is_empty() {
            return format!("\x1b[1;32m{custom}\x1b[0m");
        }
    }
    let user = env.get_var("USER").unwrap_or_else(|| "?".to_string());
    let host = hostname();
    let cwd = collapse_home(env);
    match local_ipv4() {
        Some(ip) => format!(
            "\x1b[1;32m{user}@{host}\x1b[0m \x1b[1;36m{ip}\x1b[0m \x1b[1;33m{cwd}\x1b[1;34m$\x1b[0m "
        ),
        None => format!("\x1b[1;32m{user}@{host}\x1b[0m \x1b[1;33m{cwd}\x1b[1;34m$\x1b[0m "),
    }
}

/// Minimal fixed prompt for targets without the identity plumbing.
#[cfg(not(unix))]
pub(crate) fn render(_env: &Environment) -> String {
    "gash> ".to_string()
}

#[cfg(unix)]
fn hostname() -> String {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "?".to_string())
}

/// Best-effort non-loopback IPv4 of this host. Connecting a UDP socket
/// sends no packets; it only asks the kernel to pick a source address.
#[cfg(unix)]
fn local_ipv4() -> Option<std::net::Ipv4Addr> {
    use std::net::{IpAddr, UdpSocket};
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:53").ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() => Some(ip),
        _ => None,
    }
}

/// The working directory as a display string, with the home-directory
/// prefix collapsed to `~`.
#[cfg(unix)]
fn collapse_home(env: &Environment) -> String {
    let display = env.current_dir.display().to_string();
    if let Some(home) = env.home() {
        if !home.is_empty() {
            if let Some(rest) = display.strip_prefix(&home) {
                return format!("~{rest}");
            }
        }
    }
    display
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env_at(dir: &str, home: &str) -> Environment {
        let mut env = Environment {
            vars: HashMap::new(),
            current_dir: PathBuf::from(dir),
            should_exit: false,
        };
        env.set_var("HOME", home);
        env
    }

    #[test]
    fn test_custom_prompt_overrides() {
        let mut env = env_at("/tmp", "/home/u");
        env.set_var("GASH_PROMPT", "mysh> ");
        let prompt = render(&env);
        assert!(prompt.contains("mysh> "));
        assert!(!prompt.contains("/tmp"));
    }

    #[test]
    fn test_home_prefix_collapses_to_tilde() {
        let env = env_at("/home/u/src/gash", "/home/u");
        assert_eq!(collapse_home(&env), "~/src/gash");
    }

    #[test]
    fn test_non_home_path_stays_verbatim() {
        let env = env_at("/var/log", "/home/u");
        assert_eq!(collapse_home(&env), "/var/log");
    }

    #[test]
    fn test_default_prompt_shows_user_and_cwd() {
        let mut env = env_at("/var/log", "/home/u");
        env.set_var("USER", "tester");
        env.set_var("GASH_PROMPT", "");
        let prompt = render(&env);
        assert!(prompt.contains("tester@"));
        assert!(prompt.contains("/var/log"));
    }
}
