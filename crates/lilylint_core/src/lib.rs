//! # lilylint_core
//!
//! Diagnostic extraction engine for the LilyPond linter.
//!
//! This crate turns the unstructured stderr text of a `lilypond` invocation
//! into structured, editor-ready diagnostics:
//! - The scanner carves individual `path:line:[col:] severity: message`
//!   records out of the stderr stream.
//! - The resolver maps each record to an absolute file path and a 0-based
//!   range, expanding bare columns to word spans when the target document
//!   is open.
//!
//! The extraction itself is pure and reentrant; running the compiler (and
//! cleaning up after it) is confined to [`CompilerInvocation`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use lilylint_core::{Linter, LinterConfig, NoOpenDocuments};
//!
//! let linter = Linter::new(LinterConfig::new());
//! let outcome = linter.check(Some(path), &text, &NoOpenDocuments).await?;
//! for diag in outcome.diagnostics() {
//!     println!("{}: {}", diag.location.file.display(), diag.excerpt);
//! }
//! ```

mod compiler;
mod config;
mod diagnostic;
mod documents;
mod error;
mod linter;
mod resolver;
mod scanner;

pub use compiler::CompilerInvocation;
pub use config::LinterConfig;
pub use diagnostic::{DiagnosticRecord, Location, Point, Range, ResolvedDiagnostic, Severity};
pub use documents::{Document, DocumentStore, NoOpenDocuments, TextDocument};
pub use error::LintError;
pub use linter::{LintOutcome, Linter, extract_diagnostics};
pub use resolver::ResolveContext;
pub use scanner::{STDIN_PATH, scan};
