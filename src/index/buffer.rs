//! Owned, immutable byte buffers backing a loaded index

use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;
use tracing::warn;

use crate::error::LoadError;

/// Where a tree's bytes live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingKind {
    Mmap,
    Owned,
    None,
}

impl std::fmt::Display for BackingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackingKind::Mmap => write!(f, "mmap"),
            BackingKind::Owned => write!(f, "owned"),
            BackingKind::None => write!(f, "none"),
        }
    }
}

/// Bytes of an index file, either mapped or read into memory.
///
/// Both variants deref to the same `[u8]`, so offsets computed against one
/// are valid against the other.
pub enum IndexBuffer {
    Mapped(Mmap),
    Owned(Box<[u8]>),
}

impl IndexBuffer {
    /// Open `path`, preferring a read-only mapping.
    ///
    /// Empty files are rejected. If mapping fails (or `use_mmap` is false) the
    /// file is read into an owned buffer instead. The file handle is closed
    /// before returning.
    pub fn open(path: &Path, use_mmap: bool) -> Result<Self, LoadError> {
        let mut file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let len = file
            .metadata()
            .map_err(|source| LoadError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if len == 0 {
            return Err(LoadError::Empty(path.to_path_buf()));
        }

        if use_mmap {
            // SAFETY: index files are written once by the indexer and never
            // modified while a server has them open.
            match unsafe { Mmap::map(&file) } {
                Ok(mmap) => return Ok(IndexBuffer::Mapped(mmap)),
                Err(e) => warn!("mmap of {:?} failed ({}), reading into memory", path, e),
            }
        }

        let mut bytes = Vec::with_capacity(len as usize);
        file.read_to_end(&mut bytes)
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(LoadError::Empty(path.to_path_buf()));
        }

        Ok(IndexBuffer::Owned(bytes.into_boxed_slice()))
    }

    pub fn kind(&self) -> BackingKind {
        match self {
            IndexBuffer::Mapped(_) => BackingKind::Mmap,
            IndexBuffer::Owned(_) => BackingKind::Owned,
        }
    }
}

impl Deref for IndexBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            IndexBuffer::Mapped(mmap) => &mmap[..],
            IndexBuffer::Owned(bytes) => bytes,
        }
    }
}

impl From<Vec<u8>> for IndexBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        IndexBuffer::Owned(bytes.into_boxed_slice())
    }
}

impl std::fmt::Debug for IndexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuffer")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}
