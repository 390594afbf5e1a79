//! LSP backend state management.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tower_lsp::lsp_types::Url;

use lilylint_core::{Document, DocumentStore, Linter, LinterConfig, TextDocument};

/// Document content and version cache.
#[derive(Debug)]
pub(crate) struct DocumentData {
    pub text: String,
    pub version: i32,
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Document contents cache.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// Linter instance, rebuilt when the workspace config changes.
    pub linter: RwLock<Linter>,
    /// Workspace root path.
    pub workspace_root: RwLock<Option<PathBuf>>,
    /// Foreign URIs (included files) that received diagnostics on the last
    /// pass of each linted document.
    pub published: RwLock<HashMap<Url, HashSet<Url>>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("linter", &"<Linter>")
            .field("workspace_root", &self.workspace_root)
            .finish()
    }
}

impl BackendState {
    /// Creates a new state with a default-configured linter.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            linter: RwLock::new(Linter::new(LinterConfig::new())),
            workspace_root: RwLock::new(None),
            published: RwLock::new(HashMap::new()),
        }
    }

    /// Records the foreign URIs the current pass publishes for `uri` and
    /// returns the ones from the previous pass that disappeared; those need
    /// an empty publish to clear their stale diagnostics.
    pub fn replace_published(&self, uri: &Url, current: HashSet<Url>) -> Vec<Url> {
        let mut published = match self.published.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = if current.is_empty() {
            published.remove(uri).unwrap_or_default()
        } else {
            published.insert(uri.clone(), current.clone()).unwrap_or_default()
        };
        previous.difference(&current).cloned().collect()
    }

    /// Drops the publish bookkeeping for a closed document.
    pub fn forget_published(&self, uri: &Url) {
        let mut published = match self.published.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        published.remove(uri);
    }

    /// Snapshots the currently open documents, keyed by filesystem path.
    ///
    /// The snapshot owns its text so it can outlive the documents lock and
    /// cross await points.
    pub fn snapshot_open_documents(&self) -> OpenDocuments {
        let docs = match self.documents.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let by_path = docs
            .iter()
            .filter_map(|(uri, data)| {
                let path = uri.to_file_path().ok()?;
                Some((path, TextDocument::new(&data.text)))
            })
            .collect();
        OpenDocuments { by_path }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub(crate) type SharedState = Arc<BackendState>;

/// An owned snapshot of open editor buffers.
pub(crate) struct OpenDocuments {
    by_path: HashMap<PathBuf, TextDocument>,
}

impl DocumentStore for OpenDocuments {
    fn find_open_document(&self, path: &Path) -> Option<&dyn Document> {
        self.by_path.get(path).map(|doc| doc as &dyn Document)
    }
}
