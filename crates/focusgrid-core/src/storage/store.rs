//! Persistence providers for the session document.
//!
//! The document is always written whole. [`JsonFileStore`] writes to a
//! sibling temporary file and renames it into place, so the file on disk is
//! either the previous document or the new one, never a mix.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use super::document::SessionDocument;
use crate::error::{CoreError, Result};

pub trait SessionStore {
    /// Load the stored document. A store with nothing in it yet returns an
    /// empty document.
    ///
    /// # Errors
    /// Returns `PersistenceUnavailable` if the data exists but cannot be read
    /// or parsed.
    fn load(&self) -> Result<SessionDocument>;

    /// Replace the stored document.
    ///
    /// # Errors
    /// Returns `PersistenceUnavailable` if the write fails.
    fn save(&self, doc: &SessionDocument) -> Result<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for std::rc::Rc<T> {
    fn load(&self) -> Result<SessionDocument> {
        (**self).load()
    }

    fn save(&self, doc: &SessionDocument) -> Result<()> {
        (**self).save(doc)
    }
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "data.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<SessionDocument> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionDocument::default())
            }
            Err(e) => return Err(CoreError::persistence(&self.path, e)),
        };
        SessionDocument::from_json(&content).map_err(|e| CoreError::persistence(&self.path, e))
    }

    fn save(&self, doc: &SessionDocument) -> Result<()> {
        let json = doc
            .to_json_pretty()
            .map_err(|e| CoreError::persistence(&self.path, e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::persistence(&self.path, e))?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(|e| CoreError::persistence(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| CoreError::persistence(&self.path, e))?;
        Ok(())
    }
}

/// In-memory store. Can be told to fail, to exercise the degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: RefCell<Option<SessionDocument>>,
    fail: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: SessionDocument) -> Self {
        Self {
            doc: RefCell::new(Some(doc)),
            ..Self::default()
        }
    }

    /// Make every subsequent load and save fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn document(&self) -> Option<SessionDocument> {
        self.doc.borrow().clone()
    }

    fn unavailable() -> CoreError {
        CoreError::persistence("<memory>", "store marked as failing")
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<SessionDocument> {
        if self.fail.get() {
            return Err(Self::unavailable());
        }
        Ok(self.doc.borrow().clone().unwrap_or_default())
    }

    fn save(&self, doc: &SessionDocument) -> Result<()> {
        if self.fail.get() {
            return Err(Self::unavailable());
        }
        *self.doc.borrow_mut() = Some(doc.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
