use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Throwaway front-end project on disk, removed when dropped.
///
/// Helpers take project-relative paths and panic on I/O failure.
pub struct TestWorkspace {
    root: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap_or_else(|e| panic!("Cannot create test project: {}", e));
        Self { root }
    }

    /// A project whose root carries a `.git` directory, so alias
    /// configuration lookups never climb out of it.
    pub fn with_repository_boundary() -> Self {
        let workspace = Self::new();
        workspace.create_directory(".git");
        workspace
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn absolute_path(&self, rel_path: &str) -> PathBuf {
        self.path().join(rel_path)
    }

    /// Write `content` to `rel_path`, creating missing directories.
    pub fn create_file(&self, rel_path: &str, content: &str) {
        let target = self.absolute_path(rel_path);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).unwrap_or_else(|e| panic!("mkdir {}: {}", dir.display(), e));
        }
        fs::write(&target, content).unwrap_or_else(|e| panic!("write {}: {}", rel_path, e));
    }

    pub fn create_directory(&self, rel_path: &str) {
        fs::create_dir_all(self.absolute_path(rel_path))
            .unwrap_or_else(|e| panic!("mkdir {}: {}", rel_path, e));
    }

    pub fn read_file(&self, rel_path: &str) -> String {
        fs::read_to_string(self.absolute_path(rel_path))
            .unwrap_or_else(|e| panic!("read {}: {}", rel_path, e))
    }

    /// True for files and directories alike
    pub fn file_exists(&self, rel_path: &str) -> bool {
        self.absolute_path(rel_path).exists()
    }

    /// Write a root `tsconfig.json` with `baseUrl: "."` and one path
    /// mapping per `(pattern, target)` pair, in the given order.
    pub fn create_tsconfig_with_paths(&self, mappings: &[(&str, &str)]) {
        // Built by hand: serde_json maps would sort the patterns
        let paths: Vec<String> = mappings
            .iter()
            .map(|(pattern, target)| {
                format!(
                    "      {}: [{}]",
                    serde_json::Value::from(*pattern),
                    serde_json::Value::from(*target)
                )
            })
            .collect();

        let tsconfig = format!(
            "{{\n  \"compilerOptions\": {{\n    \"strict\": true,\n    \"baseUrl\": \".\",\n    \"paths\": {{\n{}\n    }}\n  }},\n  \"include\": [\"src/**/*\"]\n}}\n",
            paths.join(",\n")
        );

        self.create_file("tsconfig.json", &tsconfig);
    }
}
