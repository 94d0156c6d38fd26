//! The `CompilerHost` abstraction (§4.8): the file-access surface the CLI
//! pipeline needs: the three methods a read-only front end (no emit)
//! actually calls.

use std::path::Path;

pub trait CompilerHost {
    fn read_file(&self, path: &str) -> Option<String>;
    fn file_exists(&self, path: &str) -> bool;
    fn get_current_directory(&self) -> String;
}

pub struct FileSystemCompilerHost;

impl CompilerHost for FileSystemCompilerHost {
    fn read_file(&self, path: &str) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn get_current_directory(&self) -> String {
        std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// An in-memory host for tests, per §4.8's "so tests can substitute an
    /// in-memory host" requirement.
    struct MemoryHost {
        files: HashMap<String, String>,
        cwd: String,
    }

    impl CompilerHost for MemoryHost {
        fn read_file(&self, path: &str) -> Option<String> {
            self.files.get(path).cloned()
        }

        fn file_exists(&self, path: &str) -> bool {
            self.files.contains_key(path)
        }

        fn get_current_directory(&self) -> String {
            self.cwd.clone()
        }
    }

    #[test]
    fn memory_host_serves_its_own_files() {
        let host = MemoryHost {
            files: HashMap::from([("main.as".to_string(), "var x = 1;".to_string())]),
            cwd: "/project".to_string(),
        };
        assert!(host.file_exists("main.as"));
        assert_eq!(host.read_file("main.as").as_deref(), Some("var x = 1;"));
        assert!(!host.file_exists("missing.as"));
        assert_eq!(host.get_current_directory(), "/project");
    }
}
