//! Resource configuration (§4.7.1, §6.2): a small permissive-JSON file the
//! compiler consults at start for its import search path, symbol database
//! location, and synthetic-variable naming prefix.

use std::path::{Path, PathBuf};

use crate::diagnostics::{Code, DiagnosticSink, Level, Message, Position};
use crate::pjson::{self, Value};

/// Name of the override environment variable (§4.7.1's "env-var
/// (project-specific)" lookup step): set to an absolute path to a `.rc`
/// file to bypass the cwd/per-user/system search entirely.
pub const RC_ENV_VAR: &str = "ASRS_RC";

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceConfig {
    pub scripts: Option<String>,
    pub db: Option<String>,
    pub temporary_variable_name: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            scripts: None,
            db: None,
            temporary_variable_name: "__temp".to_string(),
        }
    }
}

impl ResourceConfig {
    /// Locates and loads `<name>.rc` via the §4.7.1 lookup order, falling
    /// back to defaults when nothing is found. `name` is the project name
    /// the `.rc` file is named after (e.g. the directory's base name).
    pub fn load(name: &str, sink: &dyn DiagnosticSink) -> Self {
        match locate(name) {
            Some(path) => Self::load_file(&path, sink),
            None => ResourceConfig::default(),
        }
    }

    /// Loads a specific `.rc` file directly, for callers (and tests) that
    /// already know the path rather than wanting the search order applied.
    pub fn load_file(path: &Path, sink: &dyn DiagnosticSink) -> Self {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(_) => return ResourceConfig::default(),
        };
        let mut config = ResourceConfig::default();
        let report_deviation = |sink: &dyn DiagnosticSink, detail: &str| {
            Message::new(Level::Warning, Code::InvalidData, Position::new(path.display().to_string()), sink)
                .append_str(&format!("malformed resource config: {detail}"))
                .emit();
        };
        match pjson::parse(&source) {
            Ok(Value::Object(fields)) => {
                for (key, value) in &fields {
                    match key.as_str() {
                        "scripts" => config.scripts = value.as_str().map(str::to_string),
                        "db" => config.db = value.as_str().map(str::to_string),
                        "temporary_variable_name" => {
                            if let Some(name) = value.as_str() {
                                config.temporary_variable_name = name.to_string();
                            }
                        }
                        unknown => {
                            Message::new(
                                Level::Info,
                                Code::InvalidData,
                                Position::new(path.display().to_string()),
                                sink,
                            )
                            .append_str(&format!("unknown resource config key '{unknown}' ignored"))
                            .emit();
                        }
                    }
                }
            }
            Ok(Value::Null) => {}
            Ok(_) => report_deviation(sink, "top-level value is not an object or null"),
            Err(error) => report_deviation(sink, &error.to_string()),
        }
        config
    }
}

/// Resolves the `.rc` file location via the §4.7.1 order: env-var override,
/// current directory, per-user config, system config. Returns the first
/// candidate that exists on disk, or `None` if no candidate does (the
/// caller then runs with defaults, per §4.7.1's "missing file ⇒ internal
/// defaults").
fn locate(name: &str) -> Option<PathBuf> {
    let filename = format!("{name}.rc");

    if let Ok(path) = std::env::var(RC_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_candidate = PathBuf::from(&filename);
    if cwd_candidate.exists() {
        return Some(cwd_candidate);
    }

    if let Some(home) = std::env::var_os("HOME") {
        let user_candidate = PathBuf::from(home).join(".asrs").join(&filename);
        if user_candidate.exists() {
            return Some(user_candidate);
        }
    }

    let system_candidate = PathBuf::from("/etc/asrs").join(&filename);
    if system_candidate.exists() {
        return Some(system_candidate);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::global;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn write_temp(contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!("asrs-config-test-{}-{unique}.rc", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ResourceConfig::load_file(Path::new("/nonexistent/path/missing.rc"), global());
        assert_eq!(config, ResourceConfig::default());
    }

    #[test]
    fn recognized_keys_are_read_with_permissive_syntax() {
        let path = write_temp("{ 'scripts': 'lib', 'db': 'db.json', // note\n 'temporary_variable_name': '__t' }");
        let config = ResourceConfig::load_file(&path, global());
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.scripts.as_deref(), Some("lib"));
        assert_eq!(config.db.as_deref(), Some("db.json"));
        assert_eq!(config.temporary_variable_name, "__t");
    }

    #[test]
    fn unknown_keys_are_ignored_not_fatal() {
        let path = write_temp(r#"{ "mystery": 1, "scripts": "lib" }"#);
        let config = ResourceConfig::load_file(&path, global());
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.scripts.as_deref(), Some("lib"));
    }
}
