//! Tokenization of a command line into an argument vector, with
//! home-directory expansion and a single level of alias substitution.

use crate::alias::AliasTable;
use crate::env::Environment;

/// Hard cap on the argument vector; tokens past it are dropped, not
/// rejected.
pub const MAX_TOKENS: usize = 63;

/// Split `line` into an argument vector.
///
/// Per whitespace-delimited token, in order:
/// - a leading `~` is replaced with the value of `HOME` (no-op if unset);
/// - while the vector is still empty, the token is looked up in the alias
///   table; on a hit the expansion is whitespace-split and spliced in
///   literally, with no further alias or `~` expansion inside it;
/// - every other token is copied verbatim.
///
/// A whitespace-only line yields an empty vector, which the launcher treats
/// as a no-op.
pub fn tokenize(line: &str, aliases: &AliasTable, env: &Environment) -> Vec<String> {
    let mut argv = Vec::new();
    for token in line.split_whitespace() {
        if argv.len() >= MAX_TOKENS {
            break;
        }
        let token = expand_home(token, env);
        if argv.is_empty() {
            if let Some(expansion) = aliases.lookup(&token) {
                for part in expansion.split_whitespace() {
                    if argv.len() >= MAX_TOKENS {
                        break;
                    }
                    argv.push(part.to_string());
                }
                continue;
            }
        }
        argv.push(token);
    }
    argv
}

fn expand_home(token: &str, env: &Environment) -> String {
    match token.strip_prefix('~') {
        Some(rest) => match env.home() {
            Some(home) => format!("{home}{rest}"),
            None => token.to_string(),
        },
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_with_home(home: &str) -> Environment {
        let mut env = Environment {
            vars: HashMap::new(),
            current_dir: std::env::current_dir().unwrap(),
            should_exit: false,
        };
        env.set_var("HOME", home);
        env
    }

    #[test]
    fn test_plain_split() {
        let argv = tokenize("ls  -la   /tmp", &AliasTable::new(), &env_with_home("/h"));
        assert_eq!(argv, ["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_whitespace_only_yields_empty() {
        assert!(tokenize("   ", &AliasTable::new(), &env_with_home("/h")).is_empty());
    }

    #[test]
    fn test_home_expansion() {
        let argv = tokenize("ls ~/src ~", &AliasTable::new(), &env_with_home("/home/u"));
        assert_eq!(argv, ["ls", "/home/u/src", "/home/u"]);
    }

    #[test]
    fn test_first_token_alias_splice() {
        let mut aliases = AliasTable::new();
        aliases.define("ll", "ls -la");
        let argv = tokenize("ll /tmp", &aliases, &env_with_home("/h"));
        assert_eq!(argv, ["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_alias_equals_expanding_value_directly() {
        // Tokenizing `name args...` matches tokenizing `value args...`.
        let mut aliases = AliasTable::new();
        aliases.define("gl", "git log --oneline");
        let env = env_with_home("/h");
        let via_alias = tokenize("gl -n 5", &aliases, &env);
        let direct = tokenize("git log --oneline -n 5", &AliasTable::new(), &env);
        assert_eq!(via_alias, direct);
    }

    #[test]
    fn test_no_recursive_expansion() {
        let mut aliases = AliasTable::new();
        aliases.define("a", "b one");
        aliases.define("b", "c two");
        // `a` expands once; the spliced `b` is not expanded again.
        let argv = tokenize("a tail", &aliases, &env_with_home("/h"));
        assert_eq!(argv, ["b", "one", "tail"]);
    }

    #[test]
    fn test_alias_only_applies_to_first_token() {
        let mut aliases = AliasTable::new();
        aliases.define("ll", "ls -la");
        let argv = tokenize("echo ll", &aliases, &env_with_home("/h"));
        assert_eq!(argv, ["echo", "ll"]);
    }

    #[test]
    fn test_no_home_expansion_inside_alias_expansion() {
        let mut aliases = AliasTable::new();
        aliases.define("there", "cd ~/dest");
        let argv = tokenize("there", &aliases, &env_with_home("/home/u"));
        assert_eq!(argv, ["cd", "~/dest"]);
    }

    #[test]
    fn test_alias_with_five_arguments_yields_six_tokens() {
        let mut aliases = AliasTable::new();
        for i in 0..30 {
            aliases.define(format!("noise{i}"), "x");
        }
        aliases.define("a", "b one two three four five");
        let argv = tokenize("a", &aliases, &env_with_home("/h"));
        assert_eq!(argv.len(), 6);
        assert_eq!(argv[0], "b");
    }

    #[test]
    fn test_truncates_at_token_cap() {
        let line = (0..100).map(|i| format!("t{i}")).collect::<Vec<_>>().join(" ");
        let argv = tokenize(&line, &AliasTable::new(), &env_with_home("/h"));
        assert_eq!(argv.len(), MAX_TOKENS);
        assert_eq!(argv.last().map(String::as_str), Some("t62"));
    }

    #[test]
    fn test_truncation_applies_across_alias_splice() {
        let mut aliases = AliasTable::new();
        let long = (0..100).map(|i| format!("e{i}")).collect::<Vec<_>>().join(" ");
        aliases.define("big", long);
        let argv = tokenize("big extra", &aliases, &env_with_home("/h"));
        assert_eq!(argv.len(), MAX_TOKENS);
    }
}
