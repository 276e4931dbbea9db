//! Pipeline stages for HTML-to-DOCX conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! parse ──▶ walk ──▶ blocks ──▶ docx
//! (html5ever) │  (per node)   (zip of WordprocessingML)
//!             │      │
//!             │      ├──▶ inline  (styled runs)
//!             │      └──▶ image   (data URI / HTTP)
//!             └──────◀── pass-through containers recurse
//! ```
//!
//! 1. [`parse`] turns markup into an immutable [`parse::SourceNode`] tree.
//! 2. [`walk`] traverses in order; sibling subtrees resolve concurrently.
//! 3. [`blocks`] maps one node to zero or more document blocks.
//! 4. [`inline`] turns inline children into styled runs.
//! 5. [`image`] is the only stage with network I/O. Its failures stay local.
//! 6. [`docx`] packages blocks and the letterhead header deterministically.

pub mod blocks;
pub mod docx;
pub mod image;
pub mod inline;
pub mod parse;
pub mod walk;
