// ---------------------------------------------------------------------------
// Tree engine — the public operation set over the owned directory tree.
// ---------------------------------------------------------------------------

use serde::Serialize;

use crate::error::FsError;
use crate::node::{Directory, EntryKind, File, FileMetadata, Listing};
use crate::path;

// ---------------------------------------------------------------------------
// Public result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub name: String,
    pub kind: EntryKind,
    /// File size; `None` for directories.
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_files: u64,
    pub total_directories: u64,
    pub total_size: u64,
}

enum CopiedNode {
    File(String),
    Directory(Directory),
}

// ---------------------------------------------------------------------------
// FileSystem
// ---------------------------------------------------------------------------

/// The whole tree, exclusively owned. Designed for single-threaded,
/// synchronous use; callers wanting shared access must serialize all
/// mutating calls themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSystem {
    root: Directory,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    pub fn new() -> Self {
        Self {
            root: Directory::new("/"),
        }
    }

    pub(crate) fn from_root(root: Directory) -> Self {
        Self { root }
    }

    pub(crate) fn root(&self) -> &Directory {
        &self.root
    }

    // -- Path resolution (private) ----------------------------------------

    /// Walk from the root through named subdirectories. The root's stored
    /// name plays no part; only the path's segments do.
    fn resolve(&self, dir_path: &str) -> Option<&Directory> {
        let mut current = &self.root;
        for seg in path::segments(dir_path) {
            current = current.directories.get(seg)?;
        }
        Some(current)
    }

    fn resolve_mut(&mut self, dir_path: &str) -> Option<&mut Directory> {
        let mut current = &mut self.root;
        for seg in path::segments(dir_path) {
            current = current.directories.get_mut(seg)?;
        }
        Some(current)
    }

    /// Same walk, but missing segments are created on the way down. A file
    /// occupying a segment name is displaced by the new directory.
    fn resolve_or_create(&mut self, dir_path: &str) -> &mut Directory {
        let mut current = &mut self.root;
        for seg in path::segments(dir_path) {
            if !current.directories.contains_key(seg) {
                current.files.remove(seg);
            }
            current = current
                .directories
                .entry(seg.to_string())
                .or_insert_with(|| Directory::new(seg));
        }
        current
    }

    fn not_found(path: &str) -> FsError {
        FsError::NotFound(format!("No such file or directory: {}", path))
    }

    // -- File operations --------------------------------------------------

    /// Create a file under `dir_path`, creating missing directories along
    /// the way. An existing file of the same name is fully replaced.
    pub fn create_file(
        &mut self,
        dir_path: &str,
        name: &str,
        content: &str,
    ) -> Result<(), FsError> {
        path::validate_name(name)?;
        let dir = self.resolve_or_create(dir_path);
        dir.add_file(File::new(name, content));
        Ok(())
    }

    pub fn read_file(&self, file_path: &str) -> Result<&str, FsError> {
        let (dir_path, name) = path::split_entry(file_path)?;
        self.resolve(dir_path)
            .and_then(|dir| dir.files.get(name))
            .map(|file| file.content.as_str())
            .ok_or_else(|| Self::not_found(file_path))
    }

    /// Overwrite an existing file's content. Unlike `create_file`, the file
    /// must already exist.
    pub fn write_file(&mut self, file_path: &str, content: &str) -> Result<(), FsError> {
        let (dir_path, name) = path::split_entry(file_path)?;
        let file = self
            .resolve_mut(dir_path)
            .and_then(|dir| dir.files.get_mut(name))
            .ok_or_else(|| Self::not_found(file_path))?;
        file.update_content(content);
        Ok(())
    }

    pub fn metadata(&self, file_path: &str) -> Result<FileMetadata, FsError> {
        let (dir_path, name) = path::split_entry(file_path)?;
        self.resolve(dir_path)
            .and_then(|dir| dir.files.get(name))
            .map(File::metadata)
            .ok_or_else(|| Self::not_found(file_path))
    }

    /// Delete a file, or a directory with its entire contents. A directory
    /// delete is unconditional; there is no "not empty" guard.
    pub fn delete(&mut self, entry_path: &str) -> Result<(), FsError> {
        let (dir_path, name) = path::split_entry(entry_path)?;
        let dir = self
            .resolve_mut(dir_path)
            .ok_or_else(|| Self::not_found(entry_path))?;
        if dir.remove_file(name).is_some() || dir.remove_directory(name).is_some() {
            Ok(())
        } else {
            Err(Self::not_found(entry_path))
        }
    }

    // -- Directory operations ---------------------------------------------

    /// Immediate children of `dir_path`, sorted. A missing directory yields
    /// an empty listing rather than an error.
    pub fn list_dir(&self, dir_path: &str) -> Listing {
        self.resolve(dir_path)
            .map(Directory::list_contents)
            .unwrap_or_default()
    }

    /// Copy a file or directory subtree. The destination's parent is
    /// created if missing — even when the source turns out to be absent, in
    /// which case nothing else happens (no error). Directory copies rebuild
    /// every node; no identity is shared with the source.
    pub fn copy(&mut self, source_path: &str, dest_path: &str) -> Result<(), FsError> {
        let (src_dir_path, src_name) = path::split_entry(source_path)?;
        let (dest_dir_path, dest_name) = path::split_entry(dest_path)?;

        if path::is_strict_descendant(source_path, dest_path) {
            return Err(FsError::InvalidOperation(format!(
                "Cannot copy {:?} into its own descendant {:?}",
                source_path, dest_path
            )));
        }

        let copied = self.resolve(src_dir_path).and_then(|dir| {
            if let Some(file) = dir.files.get(src_name) {
                Some(CopiedNode::File(file.content.clone()))
            } else {
                dir.directories
                    .get(src_name)
                    .map(|sub| CopiedNode::Directory(Self::rebuild_subtree(sub, dest_name)))
            }
        });

        let dest = self.resolve_or_create(dest_dir_path);
        match copied {
            Some(CopiedNode::File(content)) => dest.add_file(File::new(dest_name, content)),
            Some(CopiedNode::Directory(subtree)) => dest.add_directory(subtree),
            None => {}
        }
        Ok(())
    }

    fn rebuild_subtree(source: &Directory, name: &str) -> Directory {
        let mut fresh = Directory::new(name);
        for file in source.files.values() {
            fresh.add_file(File::new(file.name.clone(), file.content.clone()));
        }
        for sub in source.directories.values() {
            fresh.add_directory(Self::rebuild_subtree(sub, &sub.name));
        }
        fresh
    }

    /// Move is copy followed by delete of the source. A missing source
    /// therefore surfaces as `NotFound` from the delete step.
    pub fn move_entry(&mut self, source_path: &str, dest_path: &str) -> Result<(), FsError> {
        self.copy(source_path, dest_path)?;
        self.delete(source_path)
    }

    /// Re-key a file or directory under a new name in the same parent,
    /// silently overwriting any entry already holding that name. Content,
    /// size and timestamps are untouched.
    pub fn rename(&mut self, entry_path: &str, new_name: &str) -> Result<(), FsError> {
        path::validate_name(new_name)?;
        let (dir_path, old_name) = path::split_entry(entry_path)?;
        let dir = self
            .resolve_mut(dir_path)
            .ok_or_else(|| Self::not_found(entry_path))?;
        if let Some(mut file) = dir.remove_file(old_name) {
            file.name = new_name.to_string();
            dir.add_file(file);
            Ok(())
        } else if let Some(mut sub) = dir.remove_directory(old_name) {
            sub.name = new_name.to_string();
            dir.add_directory(sub);
            Ok(())
        } else {
            Err(Self::not_found(entry_path))
        }
    }

    // -- Query operations -------------------------------------------------

    /// Collect every file and directory under `dir_path` whose name
    /// contains `term` (case-sensitive). Depth-first, files before
    /// subdirectories at each level; a matching directory never prunes the
    /// descent into it. A missing start directory yields no hits.
    pub fn search(&self, dir_path: &str, term: &str) -> Vec<SearchHit> {
        let mut results = Vec::new();
        if let Some(dir) = self.resolve(dir_path) {
            Self::search_directory(dir, term, &mut results);
        }
        results
    }

    fn search_directory(dir: &Directory, term: &str, results: &mut Vec<SearchHit>) {
        for file in dir.files.values() {
            if file.name.contains(term) {
                results.push(SearchHit {
                    name: file.name.clone(),
                    kind: EntryKind::File,
                    size: Some(file.size),
                });
            }
        }
        for sub in dir.directories.values() {
            if sub.name.contains(term) {
                results.push(SearchHit {
                    name: sub.name.clone(),
                    kind: EntryKind::Directory,
                    size: None,
                });
            }
            Self::search_directory(sub, term, results);
        }
    }

    /// Whole-tree counts. The root is a bookkeeping node and is excluded
    /// from `total_directories`.
    pub fn statistics(&self) -> Stats {
        let mut stats = Stats::default();
        Self::gather_stats(&self.root, &mut stats);
        stats.total_directories -= 1;
        stats
    }

    fn gather_stats(dir: &Directory, stats: &mut Stats) {
        stats.total_directories += 1;
        for file in dir.files.values() {
            stats.total_files += 1;
            stats.total_size += file.size;
        }
        for sub in dir.directories.values() {
            Self::gather_stats(sub, stats);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn new_fs() -> FileSystem {
        FileSystem::new()
    }

    // -- create_file / read_file --

    #[test]
    fn create_and_read_file() {
        let mut fs = new_fs();
        fs.create_file("/docs", "report.txt", "quarterly numbers").unwrap();
        assert_eq!(fs.read_file("/docs/report.txt").unwrap(), "quarterly numbers");
    }

    #[test]
    fn create_builds_missing_directories() {
        let mut fs = new_fs();
        fs.create_file("/a/b/c", "deep.txt", "x").unwrap();
        assert_eq!(fs.read_file("/a/b/c/deep.txt").unwrap(), "x");
        assert_eq!(fs.list_dir("/a").directories, vec!["b"]);
    }

    #[test]
    fn create_at_root() {
        let mut fs = new_fs();
        fs.create_file("/", "top.txt", "root file").unwrap();
        assert_eq!(fs.read_file("/top.txt").unwrap(), "root file");
        assert_eq!(fs.read_file("top.txt").unwrap(), "root file");
    }

    #[test]
    fn create_overwrites_existing_file() {
        let mut fs = new_fs();
        fs.create_file("/d", "f.txt", "old").unwrap();
        fs.create_file("/d", "f.txt", "new").unwrap();
        assert_eq!(fs.read_file("/d/f.txt").unwrap(), "new");
    }

    #[test]
    fn create_rejects_bad_names() {
        let mut fs = new_fs();
        assert!(matches!(
            fs.create_file("/d", "", "x"),
            Err(FsError::InvalidPath(_))
        ));
        assert!(matches!(
            fs.create_file("/d", "a/b", "x"),
            Err(FsError::InvalidPath(_))
        ));
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let fs = new_fs();
        assert!(matches!(fs.read_file("/nope.txt"), Err(FsError::NotFound(_))));
        assert!(matches!(
            fs.read_file("/no/dir/f.txt"),
            Err(FsError::NotFound(_))
        ));
    }

    // -- write_file --

    #[test]
    fn write_updates_existing_file() {
        let mut fs = new_fs();
        fs.create_file("/d", "f.txt", "old").unwrap();
        fs.write_file("/d/f.txt", "updated").unwrap();
        assert_eq!(fs.read_file("/d/f.txt").unwrap(), "updated");
    }

    #[test]
    fn write_requires_existing_file() {
        let mut fs = new_fs();
        assert!(matches!(
            fs.write_file("/d/f.txt", "x"),
            Err(FsError::NotFound(_))
        ));
        // write_file never creates directories either
        assert!(fs.list_dir("/").directories.is_empty());
    }

    #[test]
    fn write_keeps_size_in_sync() {
        let mut fs = new_fs();
        fs.create_file("/d", "f.txt", "four").unwrap();
        fs.write_file("/d/f.txt", "longer content").unwrap();
        assert_eq!(fs.metadata("/d/f.txt").unwrap().size, 14);
    }

    // -- metadata --

    #[test]
    fn metadata_of_missing_file() {
        let fs = new_fs();
        assert!(matches!(fs.metadata("/nope"), Err(FsError::NotFound(_))));
    }

    // -- delete --

    #[test]
    fn delete_file_then_read_fails() {
        let mut fs = new_fs();
        fs.create_file("/d", "f.txt", "x").unwrap();
        fs.delete("/d/f.txt").unwrap();
        assert!(matches!(fs.read_file("/d/f.txt"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn delete_directory_is_recursive() {
        let mut fs = new_fs();
        fs.create_file("/proj/src", "main.rs", "fn main() {}").unwrap();
        fs.create_file("/proj", "README", "docs").unwrap();
        fs.delete("/proj").unwrap();
        assert!(matches!(fs.read_file("/proj/README"), Err(FsError::NotFound(_))));
        let stats = fs.statistics();
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_directories, 0);
    }

    #[test]
    fn delete_missing_entry_is_not_found() {
        let mut fs = new_fs();
        assert!(matches!(fs.delete("/nope"), Err(FsError::NotFound(_))));
    }

    // -- list_dir --

    #[test]
    fn list_dir_snapshot() {
        let mut fs = new_fs();
        fs.create_file("/d", "b.txt", "").unwrap();
        fs.create_file("/d", "a.txt", "").unwrap();
        fs.create_file("/d/sub", "c.txt", "").unwrap();
        let listing = fs.list_dir("/d");
        assert_eq!(listing.files, vec!["a.txt", "b.txt"]);
        assert_eq!(listing.directories, vec!["sub"]);
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let fs = new_fs();
        assert_eq!(fs.list_dir("/nowhere"), Listing::default());
    }

    // -- copy --

    #[test]
    fn copy_file_is_a_deep_copy() {
        let mut fs = new_fs();
        fs.create_file("/src", "a.txt", "original").unwrap();
        fs.copy("/src/a.txt", "/dst/b.txt").unwrap();
        assert_eq!(fs.read_file("/dst/b.txt").unwrap(), "original");

        // Mutating the source must not leak into the copy.
        fs.write_file("/src/a.txt", "changed").unwrap();
        assert_eq!(fs.read_file("/dst/b.txt").unwrap(), "original");
    }

    #[test]
    fn copy_directory_rebuilds_subtree() {
        let mut fs = new_fs();
        fs.create_file("/proj/src", "main.rs", "code").unwrap();
        fs.create_file("/proj", "README", "docs").unwrap();
        fs.copy("/proj", "/backup/proj-copy").unwrap();

        assert_eq!(fs.read_file("/backup/proj-copy/README").unwrap(), "docs");
        assert_eq!(fs.read_file("/backup/proj-copy/src/main.rs").unwrap(), "code");
        // Top-level node takes the destination name.
        assert_eq!(fs.list_dir("/backup").directories, vec!["proj-copy"]);

        // Independent subtrees: deleting the source leaves the copy intact.
        fs.delete("/proj").unwrap();
        assert_eq!(fs.read_file("/backup/proj-copy/src/main.rs").unwrap(), "code");
    }

    #[test]
    fn copy_absent_source_is_a_no_op_but_creates_dest_parent() {
        let mut fs = new_fs();
        fs.copy("/ghost.txt", "/made/here.txt").unwrap();
        assert!(matches!(fs.read_file("/made/here.txt"), Err(FsError::NotFound(_))));
        // The destination parent was still created.
        assert_eq!(fs.list_dir("/").directories, vec!["made"]);
    }

    #[test]
    fn copy_into_own_descendant_is_rejected() {
        let mut fs = new_fs();
        fs.create_file("/a/b", "f.txt", "x").unwrap();
        let err = fs.copy("/a", "/a/b/a-copy").unwrap_err();
        assert!(matches!(err, FsError::InvalidOperation(_)));
        // Nothing was created under the source.
        assert_eq!(fs.list_dir("/a/b").directories, Vec::<String>::new());
    }

    // -- move_entry --

    #[test]
    fn move_is_copy_then_delete() {
        let mut fs = new_fs();
        fs.create_file("/from", "f.txt", "payload").unwrap();
        fs.move_entry("/from/f.txt", "/to/f.txt").unwrap();
        assert_eq!(fs.read_file("/to/f.txt").unwrap(), "payload");
        assert!(matches!(fs.read_file("/from/f.txt"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn move_directory() {
        let mut fs = new_fs();
        fs.create_file("/old/nested", "deep.txt", "d").unwrap();
        fs.move_entry("/old", "/archive/old").unwrap();
        assert_eq!(fs.read_file("/archive/old/nested/deep.txt").unwrap(), "d");
        assert!(!fs.list_dir("/").directories.contains(&"old".to_string()));
    }

    #[test]
    fn move_missing_source_is_not_found() {
        let mut fs = new_fs();
        assert!(matches!(
            fs.move_entry("/ghost", "/dest/ghost"),
            Err(FsError::NotFound(_))
        ));
    }

    #[test]
    fn move_into_own_descendant_is_rejected() {
        let mut fs = new_fs();
        fs.create_file("/a/b", "f.txt", "x").unwrap();
        let err = fs.move_entry("/a", "/a/b/moved").unwrap_err();
        assert!(matches!(err, FsError::InvalidOperation(_)));
        // Source untouched.
        assert_eq!(fs.read_file("/a/b/f.txt").unwrap(), "x");
    }

    // -- rename --

    #[test]
    fn rename_file_preserves_payload_and_timestamps() {
        let mut fs = new_fs();
        fs.create_file("/d", "old.txt", "content").unwrap();
        let before = fs.metadata("/d/old.txt").unwrap();
        sleep(Duration::from_millis(5));
        fs.rename("/d/old.txt", "new.txt").unwrap();

        assert!(matches!(fs.read_file("/d/old.txt"), Err(FsError::NotFound(_))));
        let after = fs.metadata("/d/new.txt").unwrap();
        assert_eq!(after.name, "new.txt");
        assert_eq!(after.size, before.size);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.modified_at, before.modified_at);
        assert_eq!(fs.read_file("/d/new.txt").unwrap(), "content");
    }

    #[test]
    fn rename_directory() {
        let mut fs = new_fs();
        fs.create_file("/old-name/sub", "f.txt", "x").unwrap();
        fs.rename("/old-name", "new-name").unwrap();
        assert_eq!(fs.read_file("/new-name/sub/f.txt").unwrap(), "x");
        assert_eq!(fs.list_dir("/new-name").directories, vec!["sub"]);
    }

    #[test]
    fn rename_overwrites_occupied_slot() {
        let mut fs = new_fs();
        fs.create_file("/d", "a.txt", "keep me? no").unwrap();
        fs.create_file("/d", "b.txt", "winner").unwrap();
        fs.rename("/d/b.txt", "a.txt").unwrap();
        assert_eq!(fs.read_file("/d/a.txt").unwrap(), "winner");
        assert_eq!(fs.list_dir("/d").files, vec!["a.txt"]);
    }

    #[test]
    fn rename_missing_entry_is_not_found() {
        let mut fs = new_fs();
        assert!(matches!(
            fs.rename("/nope.txt", "other.txt"),
            Err(FsError::NotFound(_))
        ));
    }

    #[test]
    fn rename_rejects_bad_new_name() {
        let mut fs = new_fs();
        fs.create_file("/d", "f.txt", "x").unwrap();
        assert!(matches!(fs.rename("/d/f.txt", ""), Err(FsError::InvalidPath(_))));
        assert!(matches!(
            fs.rename("/d/f.txt", "a/b"),
            Err(FsError::InvalidPath(_))
        ));
    }

    // -- search --

    #[test]
    fn search_finds_files_and_directories() {
        let mut fs = new_fs();
        fs.create_file("/logs", "app.log", "..").unwrap();
        fs.create_file("/logs/archive", "old.log", "..").unwrap();
        fs.create_file("/logs", "notes.txt", "..").unwrap();
        fs.create_file("/log-backup", "x.log", "..").unwrap();

        let hits = fs.search("/", "log");
        let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
        // DFS, files before subdirectories at each level, sorted within each kind.
        assert_eq!(names, vec!["log-backup", "x.log", "logs", "app.log", "old.log"]);
    }

    #[test]
    fn search_is_case_sensitive_substring() {
        let mut fs = new_fs();
        fs.create_file("/", "Report.txt", "").unwrap();
        fs.create_file("/", "report.txt", "").unwrap();
        let hits = fs.search("/", "Rep");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Report.txt");
        assert_eq!(hits[0].kind, EntryKind::File);
        assert_eq!(hits[0].size, Some(0));
    }

    #[test]
    fn matching_directory_does_not_prune_descent() {
        let mut fs = new_fs();
        fs.create_file("/box/box-inner", "box.txt", "").unwrap();
        let hits = fs.search("/", "box");
        let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["box", "box-inner", "box.txt"]);
    }

    #[test]
    fn search_missing_dir_is_empty() {
        let fs = new_fs();
        assert!(fs.search("/nowhere", "x").is_empty());
    }

    // -- statistics --

    #[test]
    fn statistics_on_empty_tree() {
        let fs = new_fs();
        assert_eq!(fs.statistics(), Stats::default());
    }

    #[test]
    fn statistics_excludes_root() {
        let mut fs = new_fs();
        fs.create_file("/sub", "f.txt", "12345").unwrap();
        let stats = fs.statistics();
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.total_directories, 1);
        assert_eq!(stats.total_size, 5);
    }

    #[test]
    fn statistics_counts_whole_tree() {
        let mut fs = new_fs();
        fs.create_file("/a", "one", "1").unwrap();
        fs.create_file("/a/b", "two", "22").unwrap();
        fs.create_file("/c", "three", "333").unwrap();
        let stats = fs.statistics();
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_directories, 3);
        assert_eq!(stats.total_size, 6);
    }

    // -- path edge cases --

    #[test]
    fn extra_slashes_are_tolerated() {
        let mut fs = new_fs();
        fs.create_file("//d///sub//", "f.txt", "x").unwrap();
        assert_eq!(fs.read_file("/d/sub/f.txt").unwrap(), "x");
        assert_eq!(fs.read_file("d//sub///f.txt").unwrap(), "x");
    }

    #[test]
    fn dot_segments_are_literal_names() {
        let mut fs = new_fs();
        fs.create_file("/a/..", "f.txt", "x").unwrap();
        // ".." is just a directory called "..", not navigation.
        assert_eq!(fs.list_dir("/a").directories, vec![".."]);
        assert_eq!(fs.read_file("/a/../f.txt").unwrap(), "x");
    }

    #[test]
    fn implicit_directory_displaces_file_of_same_name() {
        let mut fs = new_fs();
        fs.create_file("/", "thing", "i was a file").unwrap();
        fs.create_file("/thing", "inner.txt", "x").unwrap();
        assert!(matches!(fs.read_file("/thing"), Err(FsError::NotFound(_))));
        assert_eq!(fs.read_file("/thing/inner.txt").unwrap(), "x");
    }
}
