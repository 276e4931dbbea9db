//! Inline style resolution: inline-context node → ordered styled runs.
//!
//! Only the immediate children of the node are inspected. A styled wrapper
//! (`b`/`strong`, `i`/`em`, `u`) contributes one run made of its whole text
//! with that single flag set; styles nested inside it are not combined, so
//! `<b><i>x</i></b>` yields a bold-only run.

use crate::model::StyledRun;
use crate::pipeline::parse::{NodeKind, SourceNode};

/// Resolve the direct children of `node` into styled runs, in source order.
///
/// Children whose text is empty or whitespace-only produce no run. Run text
/// is kept verbatim (inner spacing like `"Discuss "` survives).
pub fn resolve_inline(node: &SourceNode) -> Vec<StyledRun> {
    node.children().iter().filter_map(inline_run).collect()
}

/// The run a single inline child contributes, if any.
pub(crate) fn inline_run(child: &SourceNode) -> Option<StyledRun> {
    let run = match child {
        SourceNode::Text(text) => StyledRun::plain(text.as_str()),
        SourceNode::Element(el) => {
            let text = child.text_content();
            match el.kind {
                NodeKind::Bold => StyledRun::bold(text),
                NodeKind::Italic => StyledRun::italic(text),
                NodeKind::Underline => StyledRun::underline(text),
                // Links, spans and other wrappers keep their text unstyled.
                _ => StyledRun::plain(text),
            }
        }
    };
    if run.text.trim().is_empty() {
        None
    } else {
        Some(run)
    }
}
