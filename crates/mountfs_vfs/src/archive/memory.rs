use std::{collections::BTreeMap, io::Cursor, sync::Arc};

use super::Archive;
use crate::{path, stream::ReadStream, FileType, Metadata, Result, VfsError};

#[derive(Debug, Clone)]
enum Node {
    File {
        data: Arc<[u8]>,
        modified: Option<i64>,
    },
    Directory {
        modified: Option<i64>,
    },
}

impl Node {
    fn metadata(&self) -> Metadata {
        match self {
            Node::File { data, modified } => Metadata {
                file_type: FileType::Regular,
                size: data.len() as u64,
                modified: *modified,
                read_only: true,
            },
            Node::Directory { modified } => Metadata {
                file_type: FileType::Directory,
                size: 0,
                modified: *modified,
                read_only: true,
            },
        }
    }
}

/// A read-only tree of files kept in memory.
///
/// Parent directories are created implicitly when a file is inserted.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    nodes: BTreeMap<String, Node>,
}

impl MemoryArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a file, replacing any previous entry at the same path
    ///
    /// # Errors
    ///
    /// Will return [`VfsError::BadFilename`] if the path is invalid or names the root
    pub fn insert_file(
        &mut self,
        file_path: &str,
        data: impl Into<Arc<[u8]>>,
        modified: Option<i64>,
    ) -> Result<()> {
        let file_path = Self::entry_path(file_path)?;
        self.insert_parents(&file_path);
        self.nodes.insert(
            file_path,
            Node::File {
                data: data.into(),
                modified,
            },
        );
        Ok(())
    }

    /// Inserts a directory
    ///
    /// # Errors
    ///
    /// Will return [`VfsError::BadFilename`] if the path is invalid or names the root
    pub fn insert_dir(&mut self, dir_path: &str, modified: Option<i64>) -> Result<()> {
        let dir_path = Self::entry_path(dir_path)?;
        self.insert_parents(&dir_path);
        self.nodes.insert(dir_path, Node::Directory { modified });
        Ok(())
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| matches!(node, Node::File { .. }))
            .count()
    }

    fn entry_path(entry_path: &str) -> Result<String> {
        let sanitized = path::sanitize(entry_path)?;
        if sanitized.is_empty() {
            return Err(VfsError::BadFilename(entry_path.into()));
        }
        Ok(sanitized)
    }

    fn insert_parents(&mut self, entry_path: &str) {
        for (index, _) in entry_path.match_indices('/') {
            self.nodes
                .entry(entry_path[..index].to_string())
                .or_insert(Node::Directory { modified: None });
        }
    }
}

impl Archive for MemoryArchive {
    fn stat(&self, path: &str) -> Option<Metadata> {
        if path.is_empty() {
            return Some(Node::Directory { modified: None }.metadata());
        }
        self.nodes.get(path).map(Node::metadata)
    }

    fn open(&self, path: &str) -> Result<ReadStream> {
        match self.nodes.get(path) {
            Some(Node::File { data, .. }) => Ok(ReadStream::new(
                Cursor::new(Arc::clone(data)),
                data.len() as u64,
            )),
            Some(Node::Directory { .. }) => Err(VfsError::NotAFile(path.into())),
            None => Err(VfsError::NotFound(path.into())),
        }
    }

    fn read_dir(&self, path: &str) -> Result<Vec<String>> {
        let prefix = if path.is_empty() {
            String::new()
        } else {
            match self.nodes.get(path) {
                Some(Node::Directory { .. }) => format!("{path}/"),
                Some(Node::File { .. }) => return Err(VfsError::NotADirectory(path.into())),
                None => return Err(VfsError::NotFound(path.into())),
            }
        };

        Ok(self
            .nodes
            .range(prefix.clone()..)
            .map(|(entry_path, _)| entry_path)
            .take_while(|entry_path| entry_path.starts_with(&prefix))
            .filter_map(|entry_path| {
                let name = &entry_path[prefix.len()..];
                (!name.contains('/')).then(|| name.to_string())
            })
            .collect())
    }
}
