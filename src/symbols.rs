//! The on-disk symbol database (§4.7.2, §6.3): a read-mostly package →
//! element → `{type, filename, line}` map the compiler pass consults once
//! lexical scope lookup fails, and appends to as new declarations are seen.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Code, DiagnosticSink, Level, Message, Position};
use crate::pjson::{self, Value};

/// One database entry: the declaring element's type name and source
/// location, as recorded the last time it was compiled or imported.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub type_name: String,
    pub filename: String,
    pub line: i64,
}

pub type Package = BTreeMap<String, SymbolEntry>;

#[derive(Debug, Clone, Default)]
pub struct SymbolDatabase {
    packages: BTreeMap<String, Package>,
    path: Option<PathBuf>,
}

impl SymbolDatabase {
    pub fn new() -> Self {
        SymbolDatabase::default()
    }

    /// Reads `path` as permissive JSON (§6.3). A missing file is not an
    /// error at this layer (§4.7.1 treats a missing resource as "use
    /// defaults"; callers decide whether a missing DB file is fatal).
    /// Any other parse or shape deviation emits `UNEXPECTED_DATABASE` and
    /// returns an empty, still-writable database rooted at `path`.
    pub fn load(path: impl AsRef<Path>, sink: &dyn DiagnosticSink) -> Self {
        let path = path.as_ref();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(_) => {
                return SymbolDatabase {
                    packages: BTreeMap::new(),
                    path: Some(path.to_path_buf()),
                };
            }
        };
        let mut db = SymbolDatabase {
            packages: BTreeMap::new(),
            path: Some(path.to_path_buf()),
        };
        match pjson::parse(&source) {
            Ok(Value::Null) => {}
            Ok(Value::Object(packages)) => {
                for (package_name, elements) in packages {
                    match db.parse_package(&elements) {
                        Some(package) => {
                            db.packages.insert(package_name, package);
                        }
                        None => db.report_deviation(sink, path, "package is not an object of elements"),
                    }
                }
            }
            Ok(_) => db.report_deviation(sink, path, "top-level value is not an object or null"),
            Err(error) => db.report_deviation(sink, path, &error.to_string()),
        }
        db
    }

    fn parse_package(&self, value: &Value) -> Option<Package> {
        let elements = value.as_object()?;
        let mut package = Package::new();
        for (name, element) in elements {
            let object = element.as_object()?;
            let entry = SymbolEntry {
                type_name: object.get("type")?.as_str()?.to_string(),
                filename: object.get("filename")?.as_str()?.to_string(),
                line: object.get("line")?.as_i64()?,
            };
            package.insert(name.clone(), entry);
        }
        Some(package)
    }

    fn report_deviation(&self, sink: &dyn DiagnosticSink, path: &Path, detail: &str) {
        Message::new(
            Level::Warning,
            Code::UnexpectedDatabase,
            Position::new(path.display().to_string()),
            sink,
        )
        .append_str(&format!("malformed symbol database: {detail}"))
        .emit();
    }

    /// Exact-match package lookup (§4.7.2).
    pub fn get_package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Glob-match package lookup where `*` matches any run of characters.
    pub fn find_packages(&self, pattern: &str) -> Vec<&str> {
        self.packages
            .keys()
            .map(String::as_str)
            .filter(|name| glob_match(pattern, name))
            .collect()
    }

    /// Records or overwrites one element, for use at compile-pass end when
    /// new declarations are discovered (§4.7.2).
    pub fn insert(&mut self, package: impl Into<String>, element: impl Into<String>, entry: SymbolEntry) {
        self.packages
            .entry(package.into())
            .or_default()
            .insert(element.into(), entry);
    }

    /// Serializes the database back to its file (strict JSON; the
    /// permissive dialect is a read-time convenience only, §6.3).
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.to_json_value())?;
        std::fs::write(path, json)
    }

    fn to_json_value(&self) -> serde_json::Value {
        let packages = self
            .packages
            .iter()
            .map(|(package_name, elements)| {
                let members = elements
                    .iter()
                    .map(|(element_name, entry)| {
                        (
                            element_name.clone(),
                            serde_json::json!({
                                "type": entry.type_name,
                                "filename": entry.filename,
                                "line": entry.line,
                            }),
                        )
                    })
                    .collect::<serde_json::Map<_, _>>();
                (package_name.clone(), serde_json::Value::Object(members))
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(packages)
    }
}

/// Matches `name` against `pattern`, where `*` in `pattern` matches any run
/// of characters (including none) and every other character must match
/// literally.
fn glob_match(pattern: &str, name: &str) -> bool {
    fn recurse(pattern: &[char], name: &[char]) -> bool {
        match pattern.first() {
            None => name.is_empty(),
            Some('*') => {
                (0..=name.len()).any(|split| recurse(&pattern[1..], &name[split..]))
            }
            Some(c) => name.first() == Some(c) && recurse(&pattern[1..], &name[1..]),
        }
    }
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    recurse(&pattern, &name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::global;

    fn write_temp(contents: &str) -> tempfile_path::TempPath {
        tempfile_path::TempPath::write(contents)
    }

    // Minimal temp-file helper: avoids pulling in a dev-dependency just for
    // this module's tests.
    mod tempfile_path {
        use std::io::Write;
        use std::path::{Path, PathBuf};
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        pub struct TempPath(PathBuf);

        impl TempPath {
            pub fn write(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
                path.push(format!(
                    "asrs-symbols-test-{}-{unique}.json",
                    std::process::id()
                ));
                let mut file = std::fs::File::create(&path).unwrap();
                file.write_all(contents.as_bytes()).unwrap();
                TempPath(path)
            }
        }

        impl AsRef<Path> for TempPath {
            fn as_ref(&self) -> &Path {
                &self.0
            }
        }

        impl Drop for TempPath {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.0);
            }
        }
    }

    #[test]
    fn null_top_level_is_an_empty_database() {
        let path = write_temp("null");
        let db = SymbolDatabase::load(&path, global());
        assert!(db.get_package("anything").is_none());
    }

    #[test]
    fn well_formed_database_round_trips_lookups() {
        let path = write_temp(
            r#"{ "shapes": { "Circle": { "type": "Class", "filename": "shapes.as", "line": 10 } } }"#,
        );
        let db = SymbolDatabase::load(&path, global());
        let package = db.get_package("shapes").unwrap();
        assert_eq!(package.get("Circle").unwrap().line, 10);
    }

    #[test]
    fn saved_database_reloads_with_the_same_entries() {
        let path = write_temp(
            r#"{ "shapes": { "Circle": { "type": "Class", "filename": "shapes.as", "line": 10 } } }"#,
        );
        let mut db = SymbolDatabase::load(&path, global());
        db.insert(
            "shapes",
            "Square",
            SymbolEntry {
                type_name: "Class".into(),
                filename: "shapes.as".into(),
                line: 20,
            },
        );
        db.save().unwrap();

        let reloaded = SymbolDatabase::load(&path, global());
        let package = reloaded.get_package("shapes").unwrap();
        assert_eq!(package.get("Circle").unwrap().line, 10);
        assert_eq!(package.get("Square").unwrap().line, 20);
    }

    #[test]
    fn glob_pattern_matches_any_run() {
        let mut db = SymbolDatabase::new();
        db.insert(
            "shapes",
            "Circle",
            SymbolEntry {
                type_name: "Class".into(),
                filename: "shapes.as".into(),
                line: 1,
            },
        );
        db.insert(
            "shadows",
            "Blob",
            SymbolEntry {
                type_name: "Class".into(),
                filename: "shadows.as".into(),
                line: 1,
            },
        );
        let mut found = db.find_packages("sha*s");
        found.sort();
        assert_eq!(found, vec!["shadows", "shapes"]);
    }

    #[test]
    fn malformed_database_reports_and_treats_as_empty() {
        let path = write_temp("{ \"broken\": [1, 2, 3] }");
        let db = SymbolDatabase::load(&path, global());
        assert!(db.get_package("broken").is_none());
    }
}
