//! LilyLint LSP server.
//!
//! Language Server Protocol implementation for the LilyPond linter.
//! Provides real-time diagnostics in editors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use lilylint_core::{LintOutcome, Linter, LinterConfig};

mod conversion;
mod state;

use conversion::to_lsp_diagnostic;
use state::{BackendState, DocumentData, SharedState};

/// Debounce delay for change notifications in milliseconds.
const DEBOUNCE_MS: u64 = 300;

/// The LSP backend for LilyLint.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the given client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new()),
        }
    }

    /// Validates a document and publishes diagnostics.
    async fn validate_document(&self, uri: &Url, text: &str, version: Option<i32>) {
        debug!("Validating document: {}", uri);

        let path = match uri.to_file_path() {
            Ok(p) => p,
            Err(_) => {
                debug!("Skipping validation for non-file URI: {}", uri);
                return;
            }
        };

        // Snapshot before the await: std lock guards must not cross it.
        let linter = {
            let guard = match self.state.linter.read() {
                Ok(g) => g,
                Err(e) => {
                    error!("Linter lock poisoned: {}", e);
                    return;
                }
            };
            guard.clone()
        };
        let open_documents = self.state.snapshot_open_documents();

        let outcome = match linter.check(Some(&path), text, &open_documents).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Lint error: {}", e);
                self.client
                    .publish_diagnostics(uri.clone(), vec![], version)
                    .await;
                return;
            }
        };

        // Diagnostics may point at included files. Group per target, always
        // publishing for the linted document itself so stale entries clear.
        let mut by_uri: HashMap<Url, Vec<Diagnostic>> = HashMap::new();
        by_uri.insert(uri.clone(), Vec::new());

        if let LintOutcome::Findings(diagnostics) = &outcome {
            for diag in diagnostics {
                let Ok(target) = Url::from_file_path(&diag.location.file) else {
                    debug!(
                        "Dropping diagnostic for unmappable path: {}",
                        diag.location.file.display()
                    );
                    continue;
                };
                by_uri.entry(target).or_default().push(to_lsp_diagnostic(diag));
            }
        }

        // Included files that had diagnostics last pass but not this one
        // still need an empty publish to clear them.
        let foreign: HashSet<Url> = by_uri.keys().filter(|t| *t != uri).cloned().collect();
        for stale in self.state.replace_published(uri, foreign) {
            by_uri.entry(stale).or_default();
        }

        for (target, diagnostics) in by_uri {
            let target_version = if &target == uri { version } else { None };
            self.client
                .publish_diagnostics(target, diagnostics, target_version)
                .await;
        }
    }

    /// Reloads configuration from the workspace root.
    fn reload_config(&self) {
        let root_guard = match self.state.workspace_root.read() {
            Ok(g) => g,
            Err(e) => {
                error!("Workspace root lock poisoned: {}", e);
                return;
            }
        };

        let Some(path) = root_guard.as_ref() else {
            return;
        };

        if let Some(config_path) = LinterConfig::discover(path) {
            info!("Found config file: {}", config_path.display());
            match LinterConfig::from_file(&config_path) {
                Ok(config) => match self.state.linter.write() {
                    Ok(mut linter_guard) => {
                        *linter_guard = Linter::new(config);
                        info!("Linter re-initialized with new config");
                    }
                    Err(e) => error!("Linter lock poisoned: {}", e),
                },
                Err(e) => {
                    error!("Failed to load config: {}", e);
                }
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("LilyLint LSP server initializing...");

        if let Some(path) = params.root_uri.and_then(|u| u.to_file_path().ok()) {
            match self.state.workspace_root.write() {
                Ok(mut root) => {
                    *root = Some(path);
                }
                Err(e) => {
                    error!("Workspace root lock poisoned: {}", e);
                    return Ok(InitializeResult::default());
                }
            }

            // Initial config load
            self.reload_config();
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "lilylint-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LilyLint LSP server initialized!")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("LilyLint LSP server shutting down...");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);

        {
            let mut docs = match self.state.documents.write() {
                Ok(guard) => guard,
                Err(e) => {
                    error!("Documents lock poisoned: {}", e);
                    return;
                }
            };
            docs.insert(
                params.text_document.uri.clone(),
                DocumentData {
                    text: params.text_document.text.clone(),
                    version: params.text_document.version,
                },
            );
        }

        self.validate_document(
            &params.text_document.uri,
            &params.text_document.text,
            Some(params.text_document.version),
        )
        .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        debug!("Document changed: {}", params.text_document.uri);

        // Full sync: changes apply in order, so the last one carries the
        // authoritative text.
        if let Some(change) = params.content_changes.into_iter().last() {
            let uri = params.text_document.uri.clone();
            let version = params.text_document.version;
            let text = change.text;

            {
                let mut docs = match self.state.documents.write() {
                    Ok(guard) => guard,
                    Err(e) => {
                        error!("Documents lock poisoned: {}", e);
                        return;
                    }
                };
                docs.insert(
                    uri.clone(),
                    DocumentData {
                        text: text.clone(),
                        version,
                    },
                );
            }

            // Debounce: only validate if this is still the newest version
            // once the delay elapses.
            let backend = self.clone();

            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(DEBOUNCE_MS)).await;

                let should_validate = {
                    let docs = match backend.state.documents.read() {
                        Ok(g) => g,
                        Err(e) => {
                            error!("Documents lock poisoned: {}", e);
                            return;
                        }
                    };
                    docs.get(&uri).is_some_and(|doc| doc.version == version)
                };

                if should_validate {
                    backend.validate_document(&uri, &text, Some(version)).await;
                }
            });
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);

        if let Some(text) = params.text {
            self.validate_document(&params.text_document.uri, &text, None)
                .await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        debug!("Watched files changed: {:?}", params.changes);

        let config_changed = params.changes.iter().any(|change| {
            let path = change.uri.path();
            LinterConfig::CONFIG_FILES
                .iter()
                .any(|name| path.ends_with(name))
        });

        if config_changed {
            info!("Configuration file changed, reloading...");
            self.reload_config();
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);

        {
            let mut docs = match self.state.documents.write() {
                Ok(guard) => guard,
                Err(e) => {
                    error!("Documents lock poisoned: {}", e);
                    return;
                }
            };
            docs.remove(&params.text_document.uri);
        }
        self.state.forget_published(&params.text_document.uri);

        // Clear diagnostics
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }
}

/// Starts the LSP server on stdio.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("LilyLint LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
