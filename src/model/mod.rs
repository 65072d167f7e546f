//! Document model types.
//!
//! This module defines the structured word-processing representation the
//! renderer produces: an ordered, append-only block sequence with styled
//! runs, plus the image map the renderer resolves against. Serialization to
//! a concrete file format is out of scope and attaches via [`visitor`].

mod block;
mod document;
mod resource;
mod run;
pub mod visitor;

pub use block::{DocumentBlock, ListKind, TableCell};
pub use document::{DocumentModel, StyleDefinition, StyleSheet};
pub use resource::{ImageMap, ResolvedImage};
pub use run::{MathSpan, Run, TextRun};
pub use visitor::{walk_document, DocumentVisitor, VisitorAction};
