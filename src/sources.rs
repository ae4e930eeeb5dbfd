//
// sources.rs
// Dicom-Anonymizer-rs
//
// Expands user-supplied sources (files, directories, glob patterns) into a lazy stream of candidate files.
//
// Thales Matheus Mendonça Santos - November 2025

use std::iter;
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use tracing::warn;
use walkdir::WalkDir;

/// Lazy sequence of candidate files produced by [`expand`].
pub type Files = Box<dyn Iterator<Item = PathBuf>>;

/// How a source token is interpreted, decided by probing the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    File(PathBuf),
    Directory(PathBuf),
    Pattern(String),
}

impl SourceKind {
    /// Files win over directories, and anything that exists as neither is a glob.
    pub fn classify(source: &str) -> Self {
        let path = Path::new(source);
        if path.is_file() {
            SourceKind::File(path.to_path_buf())
        } else if path.is_dir() {
            SourceKind::Directory(path.to_path_buf())
        } else {
            SourceKind::Pattern(source.to_string())
        }
    }

    pub fn files(self) -> Files {
        match self {
            SourceKind::File(path) => Box::new(iter::once(path)),
            SourceKind::Directory(dir) => walk_directory(dir),
            SourceKind::Pattern(pattern) => expand_pattern(&pattern),
        }
    }
}

/// Expand `source` into every regular file it designates. A source that
/// resolves to nothing yields nothing; it is not an error.
pub fn expand(source: &str) -> Files {
    SourceKind::classify(source).files()
}

fn walk_directory(dir: PathBuf) -> Files {
    let files = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| {
            let file_type = entry.file_type();
            file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
        })
        .map(|entry| entry.into_path());
    Box::new(files)
}

/// Wildcards do not match a leading dot, so hidden entries need an explicit `.`.
fn expand_pattern(pattern: &str) -> Files {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let matches = match glob::glob_with(pattern, options) {
        Ok(matches) => matches,
        Err(err) => {
            warn!("Ignoring invalid pattern {:?}: {}", pattern, err);
            return Box::new(iter::empty());
        }
    };

    let files = matches
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("Skipping unreadable match: {}", err);
                None
            }
        })
        .flat_map(|path| expand_match(&path));
    Box::new(files)
}

/// Re-dispatch a glob match. Matches are never treated as patterns again, so a
/// match that is neither file nor directory (a dangling link) yields nothing.
fn expand_match(path: &Path) -> Files {
    match path.to_str().map(SourceKind::classify) {
        Some(kind @ (SourceKind::File(_) | SourceKind::Directory(_))) => kind.files(),
        Some(SourceKind::Pattern(_)) => Box::new(iter::empty()),
        None if path.is_file() => SourceKind::File(path.to_path_buf()).files(),
        None if path.is_dir() => SourceKind::Directory(path.to_path_buf()).files(),
        None => Box::new(iter::empty()),
    }
}
