//! Editing sessions: the commit pipeline that ties raw input, the shorthand
//! formatter and persistence together.

use crate::decorate::{Snapshot, create_snapshot};
use crate::editing::{Cmd, Document, DocumentEngine, EditError, Patch};
use crate::format::{TriggerDetector, transform};
use crate::store::{KeyValueStore, StoreError};

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "editorContent";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// A document being edited, backed by a key in a [`KeyValueStore`].
///
/// Every command goes through two phases. The raw edit is committed first and
/// shown to the shorthand detector; if a rule fires, the corrective rewrite is
/// committed as a second snapshot. The rewrite is acknowledged rather than
/// observed, so the formatter never reacts to its own output.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
    key: String,
    document: Document,
    detector: TriggerDetector,
    version: u64,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the document stored under `key`, or start empty when nothing is
    /// stored. Stored data that fails to decode is an error, not a silent
    /// reset.
    pub fn open(store: S, key: impl Into<String>) -> Result<Self, SessionError> {
        let key = key.into();
        let document = match store.get(&key)? {
            Some(raw) => Document::create_from_serialized_form(&raw)?,
            None => Document::create_empty(),
        };
        log::info!(
            "opened session {key:?} with {} block(s)",
            document.blocks().len()
        );

        let mut detector = TriggerDetector::new();
        detector.acknowledge(&document);

        Ok(Self {
            store,
            key,
            document,
            detector,
            version: 0,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Snapshots committed since the session opened or was cleared
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply a command, then run the shorthand formatter over the result
    pub fn apply(&mut self, cmd: &Cmd) -> Result<Patch, EditError> {
        let edited = self.document.apply(cmd)?;
        self.commit(edited);

        let mut fired = None;
        if let Some(detection) = self.detector.observe(&self.document)
            && let Some(rewritten) = transform(&self.document, &detection)
        {
            self.commit(rewritten);
            self.detector.acknowledge(&self.document);
            fired = Some(detection.trigger);
        }

        Ok(Patch {
            version: self.version,
            selection: self.document.selection().clone(),
            fired,
        })
    }

    /// Persist the current document under the session key
    pub fn save(&mut self) -> Result<(), SessionError> {
        let raw = self.document.serialize()?;
        self.store.set(&self.key, &raw)?;
        log::info!("saved {} bytes under {:?}", raw.len(), self.key);
        Ok(())
    }

    /// Forget the stored document and start over with an empty one
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.store.delete(&self.key)?;
        self.document = Document::create_empty();
        self.detector.reset();
        self.detector.acknowledge(&self.document);
        self.version = 0;
        log::info!("cleared {:?}", self.key);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        create_snapshot(&self.document)
    }

    fn commit(&mut self, document: Document) {
        self.document = document;
        self.version += 1;
    }
}
