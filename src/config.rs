//! Startup configuration: `~/.gashrc`, read line by line before the loop
//! begins. Recognized directives register aliases, set environment
//! variables, or set the custom prompt text; everything else is ignored.

use crate::alias::AliasTable;
use crate::env::Environment;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

static ALIAS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^alias ([^=\s]+)=(.*)$").expect("valid pattern"));
static EXPORT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export ([^=\s]+)=(.*)$").expect("valid pattern"));
static PROMPT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gash_prompt=(.*)$").expect("valid pattern"));

/// Load `~/.gashrc` into the environment and alias table. A missing or
/// unreadable file is not an error; the shell simply starts unconfigured.
pub(crate) fn load_rc(env: &mut Environment, aliases: &mut AliasTable) {
    let Some(path) = rc_path() else { return };
    let Ok(contents) = fs::read_to_string(&path) else {
        log::debug!("no config at {}", path.display());
        return;
    };
    for raw in contents.lines() {
        apply_line(raw.trim(), env, aliases);
    }
    log::debug!(
        "loaded {} with {} aliases",
        path.display(),
        aliases.len()
    );
}

/// Apply one trimmed directive line.
fn apply_line(line: &str, env: &mut Environment, aliases: &mut AliasTable) {
    if line.is_empty() {
        return;
    }
    if let Some(caps) = ALIAS_LINE.captures(line) {
        let name = &caps[1];
        // Duplicates are appended, never replaced; lookup keeps the first.
        if !aliases.define(name, strip_quotes(&caps[2])) {
            log::warn!("alias table full, dropping {name}");
        }
    } else if let Some(caps) = EXPORT_LINE.captures(line) {
        env.set_var(&caps[1], &caps[2]);
    } else if let Some(caps) = PROMPT_LINE.captures(line) {
        env.set_var("GASH_PROMPT", strip_quotes(&caps[1]));
    }
}

/// Strip at most one leading and one trailing quote character.
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['\'', '"']).unwrap_or(value);
    value.strip_suffix(['\'', '"']).unwrap_or(value)
}

fn rc_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gashrc"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fresh() -> (Environment, AliasTable) {
        let env = Environment {
            vars: HashMap::new(),
            current_dir: std::env::current_dir().unwrap(),
            should_exit: false,
        };
        (env, AliasTable::new())
    }

    #[test]
    fn test_alias_directive_with_quotes() {
        let (mut env, mut aliases) = fresh();
        apply_line("alias ll='ls -la'", &mut env, &mut aliases);
        assert_eq!(aliases.lookup("ll"), Some("ls -la"));
    }

    #[test]
    fn test_alias_directive_without_quotes() {
        let (mut env, mut aliases) = fresh();
        apply_line("alias g=git", &mut env, &mut aliases);
        assert_eq!(aliases.lookup("g"), Some("git"));
    }

    #[test]
    fn test_export_directive_sets_variable() {
        let (mut env, mut aliases) = fresh();
        apply_line("export EDITOR=vi", &mut env, &mut aliases);
        assert_eq!(env.vars.get("EDITOR").map(String::as_str), Some("vi"));
    }

    #[test]
    fn test_prompt_directive_sets_gash_prompt() {
        let (mut env, mut aliases) = fresh();
        apply_line("gash_prompt=\"work> \"", &mut env, &mut aliases);
        assert_eq!(
            env.vars.get("GASH_PROMPT").map(String::as_str),
            Some("work> ")
        );
    }

    #[test]
    fn test_unrecognized_lines_are_inert() {
        let (mut env, mut aliases) = fresh();
        apply_line("# a comment", &mut env, &mut aliases);
        apply_line("setenv FOO bar", &mut env, &mut aliases);
        apply_line("export MISSING_EQUALS", &mut env, &mut aliases);
        assert!(aliases.is_empty());
        assert!(env.vars.is_empty());
    }

    #[test]
    fn test_duplicate_aliases_append_and_first_wins() {
        let (mut env, mut aliases) = fresh();
        apply_line("alias g='git'", &mut env, &mut aliases);
        apply_line("alias g='grep'", &mut env, &mut aliases);
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.lookup("g"), Some("git"));
    }
}
