//! Common test utilities for kbcm integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Environment variables that would leak the caller's setup into a test run
const KBCM_ENV: [&str; 5] = [
    "KBCM_CONFIG",
    "KBCM_SPECIFICATIONS_DIR",
    "KBCM_KNOWLEDGE_BASE",
    "KBCM_KB_SOURCES_DIR",
    "RUST_LOG",
];

/// A test workspace holding kbcm.yaml, kb.yaml and local component repositories
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a workspace whose kbcm.yaml fetches from `file://` locations
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let workspace = Self { temp, path };
        workspace.write_file(
            "kbcm.yaml",
            "specifications_dir: specs\n\
             kb_sources_dir: kb\n\
             knowledge_base: kb.yaml\n\
             fetch_hosts:\n  - \"file://\"\n",
        );
        workspace
    }

    /// `kbcm` command running in the workspace
    #[allow(deprecated)]
    pub fn kbcm(&self) -> Command {
        let mut cmd = Command::cargo_bin("kbcm").expect("Failed to find kbcm binary");
        cmd.current_dir(&self.path);
        for name in KBCM_ENV {
            cmd.env_remove(name);
        }
        cmd
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Create a git repository under `repos/<name>` with one committed
    /// `<name>.scs` file plus `extra` files, and return its `file://` URL
    pub fn create_component_repo(&self, name: &str, extra: &[(&str, &str)]) -> String {
        let repo_path = self.path.join("repos").join(name);
        std::fs::create_dir_all(&repo_path).expect("Failed to create repo directory");

        let main_file = format!("{name}.scs");
        let main_content = format!("concept_{name} -> concept_reusable_component;;\n");
        let mut files: Vec<(&str, &str)> = vec![(main_file.as_str(), main_content.as_str())];
        files.extend_from_slice(extra);
        commit_files(&repo_path, &files);

        format!("file://{}", repo_path.display())
    }

    /// Remove a component repository, so any further clone of it fails
    pub fn remove_component_repo(&self, name: &str) {
        std::fs::remove_dir_all(self.path.join("repos").join(name))
            .expect("Failed to remove repo directory");
    }

    /// Write kb.yaml from entity snippets built with [`component`]
    pub fn write_knowledge_base(&self, entities: &[String]) {
        if entities.is_empty() {
            self.write_file("kb.yaml", "entities: []\n");
        } else {
            self.write_file("kb.yaml", &format!("entities:\n{}", entities.concat()));
        }
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

fn commit_files(repo_path: &Path, files: &[(&str, &str)]) {
    let repo = git2::Repository::init(repo_path).expect("Failed to init git repository");
    let mut index = repo.index().expect("Failed to open index");
    for (name, content) in files {
        let file_path = repo_path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        index.add_path(Path::new(name)).expect("Failed to stage file");
    }
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let signature =
        git2::Signature::now("Test User", "test@example.com").expect("Failed to create signature");
    repo.commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
        .expect("Failed to commit");
}

/// kb.yaml entity for a reusable component at `address`
pub fn component(id: &str, address: &str, dependencies: &[&str]) -> String {
    format!(
        "  - id: {id}\n    classes: [concept_reusable_component]\n    attributes:\n      \
         nrel_component_address: \"{address}\"\n    relations:\n      \
         nrel_installation_method: [concept_component_dependencies_installation_method]\n      \
         nrel_component_dependencies: [{}]\n",
        dependencies.join(", ")
    )
}

/// kb.yaml entity lacking the component address
pub fn component_without_address(id: &str) -> String {
    format!(
        "  - id: {id}\n    classes: [concept_reusable_component]\n    relations:\n      \
         nrel_installation_method: [concept_component_dependencies_installation_method]\n"
    )
}
