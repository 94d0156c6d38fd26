//! Command-line surface (§4.8, §6.5): a single flat `clap`-derived `Cli`
//! struct with just what this compiler's pipeline actually does — no emit, no watch mode, no project
//! references, just lex → parse → compile and a diagnostic report.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "asrs")]
#[command(version)]
#[command(about = "An ActionScript-flavored compiler front end", long_about = None)]
pub struct Cli {
    /// Source files to compile.
    pub files: Vec<PathBuf>,

    /// Path to the resource config file (`.rc`); overrides the normal
    /// env-var/cwd/per-user/system search order.
    #[arg(long = "rc")]
    pub rc: Option<PathBuf>,

    /// Path to the symbol database file; overrides the resource config's
    /// `db` entry.
    #[arg(long = "db")]
    pub db: Option<PathBuf>,

    /// Sets a dialect option for this run, e.g. `-Obinary=1`. Repeatable.
    #[arg(short = 'O', value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    /// Print the resolved resource config and option set without compiling.
    #[arg(long = "show-config")]
    pub show_config: bool,

    /// Write a starter `.rc` file in the current directory and exit.
    #[arg(long = "init")]
    pub init: bool,

    /// Suppress warning-level diagnostics.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Parses one `-Oname=value` override into an `(Option_, i32)` pair.
/// Returns `Err` with a human-readable message on a malformed override or
/// an unrecognized option name, for the caller to report and skip.
pub fn parse_override(raw: &str) -> Result<(crate::options::Option_, i32), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let option = crate::options::Option_::from_pragma_name(name)
        .ok_or_else(|| format!("unknown dialect option '{name}'"))?;
    let value: i32 = value
        .parse()
        .map_err(|_| format!("expected an integer value for '{name}', got '{value}'"))?;
    Ok((option, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Option_;

    #[test]
    fn parses_a_well_formed_override() {
        assert_eq!(parse_override("binary=1"), Ok((Option_::Binary, 1)));
    }

    #[test]
    fn rejects_unknown_option_names() {
        assert!(parse_override("nonsense=1").is_err());
    }

    #[test]
    fn rejects_missing_equals_sign() {
        assert!(parse_override("binary").is_err());
    }
}
