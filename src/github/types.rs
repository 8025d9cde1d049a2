// src/github/types.rs
// =============================================================================
// Shapes of the two GitHub REST responses we read.
//
// GET /repos/{owner}/{repo}/branches
//   [ { "name": "main", "commit": {...}, "protected": false }, ... ]
//
// GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1
//   { "sha": "...", "tree": [ { "path": "src/a.txt", "type": "blob", ... } ],
//     "truncated": false }
//
// Only the fields we use are declared; serde ignores the rest.
// =============================================================================

use serde::{Deserialize, Serialize};

/// A branch name from the branches endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
}

/// What a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file
    Blob,
    /// A directory
    Tree,
    /// Anything else (submodule commits)
    #[serde(other)]
    Other,
}

/// One entry of a flattened recursive tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeResponse {
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// Turns tree entries into the file list offered to the user:
/// blobs only, paths sorted lexicographically.
pub fn file_candidates(entries: &[TreeEntry]) -> Vec<String> {
    let mut files: Vec<String> = entries
        .iter()
        .filter(|entry| entry.is_blob())
        .map(|entry| entry.path.clone())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_branches() {
        let json = r#"[
            {"name": "main", "commit": {"sha": "abc"}, "protected": true},
            {"name": "dev", "commit": {"sha": "def"}, "protected": false}
        ]"#;
        let branches: Vec<Branch> = serde_json::from_str(json).unwrap();
        let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["main", "dev"]);
    }

    #[test]
    fn test_blob_and_tree_entries() {
        let json = r#"{
            "sha": "123",
            "tree": [
                {"path": "src/a.txt", "type": "blob", "mode": "100644"},
                {"path": "src", "type": "tree", "mode": "040000"}
            ]
        }"#;
        let response: TreeResponse = serde_json::from_str(json).unwrap();
        assert!(!response.truncated);
        assert_eq!(file_candidates(&response.tree), vec!["src/a.txt"]);
    }

    #[test]
    fn test_unknown_kind_is_not_a_file() {
        let json = r#"{"path": "vendor/lib", "type": "commit"}"#;
        let entry: TreeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, EntryKind::Other);
        assert!(!entry.is_blob());
    }

    #[test]
    fn test_candidates_keep_only_blobs_sorted() {
        let entry = |path: &str, kind| TreeEntry {
            path: path.to_string(),
            kind,
        };
        let entries = vec![
            entry("z.md", EntryKind::Blob),
            entry("docs", EntryKind::Tree),
            entry("a/b.rs", EntryKind::Blob),
            entry("a", EntryKind::Tree),
            entry("Cargo.toml", EntryKind::Blob),
            entry("sub", EntryKind::Other),
        ];

        let files = file_candidates(&entries);
        assert_eq!(files, vec!["Cargo.toml", "a/b.rs", "z.md"]);
    }
}
