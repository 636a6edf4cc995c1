//! Renumbering of section-scoped `TS S.BB` cross-reference labels.
//!
//! A document is a sequence of lines. Every `## ` header opens a new
//! section; every reference bullet inside a section is numbered from `00`
//! in source order and its label (`TS S.BB`) and anchors (`ts-SSBB`) are
//! rewritten to match. Everything else passes through untouched.

mod classify;
mod diff;
mod engine;
pub mod error;
mod grammar;
mod line;
mod reference;
mod source;
mod state;

pub use classify::{classify, BulletForm, LineKind, SECTION_PREFIX};
pub use diff::unified_diff;
pub use engine::{
    renumber, LineChange, RenumberOptions, RenumberOutcome, SectionSummary,
    DEFAULT_SECTION_START,
};
pub use error::{ExitCode, RenumberError, RenumberResult};
pub use grammar::Grammar;
pub use line::{split_lines, LineRecord};
pub use reference::Reference;
pub use source::{read_from_reader, InputSource};

/// Reads `source` in full, then renumbers it. Nothing is processed if the read fails.
pub fn renumber_source(
    source: &InputSource,
    options: &RenumberOptions,
) -> RenumberResult<(String, RenumberOutcome)> {
    let content = source.read()?;
    let outcome = renumber(&content, options)?;
    Ok((content, outcome))
}
