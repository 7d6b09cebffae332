// ---------------------------------------------------------------------------
// Tree node types — files, directories and the records derived from them.
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Current time as Unix milliseconds.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub content: String,
    pub size: u64,
    /// Unix millis; never changes after creation.
    pub created_at: u64,
    /// Unix millis; advances only when the content actually changes.
    pub modified_at: u64,
}

impl File {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let now = now_millis();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
            created_at: now,
            modified_at: now,
        }
    }

    /// Replace the content, keeping `size` in sync. Supplying identical
    /// content is a no-op and does not advance `modified_at`.
    pub fn update_content(&mut self, new_content: &str) {
        if self.content != new_content {
            self.content = new_content.to_string();
            self.size = new_content.len() as u64;
            self.modified_at = now_millis();
        }
    }

    pub fn metadata(&self) -> FileMetadata {
        FileMetadata {
            name: self.name.clone(),
            size: self.size,
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub name: String,
    pub size: u64,
    pub created_at: u64,
    pub modified_at: u64,
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// A directory node owning its children outright. There are no parent
/// links; parent identity only exists during traversal. `BTreeMap` keys
/// keep listings and searches deterministically name-ordered.
///
/// Within one directory a name lives in at most one of the two maps; the
/// insert methods displace a same-named entry of the other kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub name: String,
    pub files: BTreeMap<String, File>,
    pub directories: BTreeMap<String, Directory>,
}

impl Directory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
            directories: BTreeMap::new(),
        }
    }

    /// Insert a file, last-write-wins.
    pub fn add_file(&mut self, file: File) {
        self.directories.remove(&file.name);
        self.files.insert(file.name.clone(), file);
    }

    pub fn remove_file(&mut self, name: &str) -> Option<File> {
        self.files.remove(name)
    }

    /// Insert a subdirectory, last-write-wins.
    pub fn add_directory(&mut self, dir: Directory) {
        self.files.remove(&dir.name);
        self.directories.insert(dir.name.clone(), dir);
    }

    pub fn remove_directory(&mut self, name: &str) -> Option<Directory> {
        self.directories.remove(name)
    }

    /// Snapshot of the immediate child names, sorted.
    pub fn list_contents(&self) -> Listing {
        Listing {
            files: self.files.keys().cloned().collect(),
            directories: self.directories.keys().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
