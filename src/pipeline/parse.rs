//! Fragment parsing: HTML string → immutable [`SourceNode`] tree.
//!
//! html5ever does the actual parsing (WHATWG tree building, so malformed
//! editor output is repaired the same way a browser would). The resulting
//! `RcDom` is reference-counted and not `Send`, so it is immediately lowered
//! into an owned `SourceNode` tree that the async walker can share freely.
//!
//! Only the tags the block mapper understands get their own [`NodeKind`];
//! every other element keeps its tag name in [`NodeKind::Other`] and is
//! unwrapped transparently later on.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::{debug, warn};

/// Elements nested deeper than this are flattened into their text content.
const MAX_NESTING_DEPTH: usize = 512;

/// A node of the parsed rich-text fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceNode {
    Text(String),
    Element(Element),
}

/// An element with its recognised kind and children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: NodeKind,
    pub children: Vec<SourceNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// Declared attributes of an `<img>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAttrs {
    pub src: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// The closed set of element kinds the converter distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `h1`–`h3`; the level is 1, 2 or 3.
    Heading(u8),
    Paragraph,
    List(ListKind),
    ListItem,
    Table,
    TableRow,
    /// `td` or `th`.
    TableCell,
    Image(ImageAttrs),
    LineBreak,
    /// `b` or `strong`.
    Bold,
    /// `i` or `em`.
    Italic,
    /// `u`.
    Underline,
    /// Anything else, keeping the lowercase tag name.
    Other(String),
}

impl SourceNode {
    /// Shorthand for building trees by hand.
    pub fn element(kind: NodeKind, children: Vec<SourceNode>) -> Self {
        SourceNode::Element(Element { kind, children })
    }

    pub fn text(text: impl Into<String>) -> Self {
        SourceNode::Text(text.into())
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            SourceNode::Text(t) => out.push_str(t),
            SourceNode::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn children(&self) -> &[SourceNode] {
        match self {
            SourceNode::Text(_) => &[],
            SourceNode::Element(el) => &el.children,
        }
    }

    pub fn kind(&self) -> Option<&NodeKind> {
        match self {
            SourceNode::Text(_) => None,
            SourceNode::Element(el) => Some(&el.kind),
        }
    }
}

/// Parse an HTML fragment into a tree rooted at an `Other("body")` container.
///
/// Never fails: html5ever repairs any input, and unknown markup simply
/// becomes `Other` nodes.
pub fn parse_fragment(html: &str) -> SourceNode {
    let wrapped = if html.to_ascii_lowercase().contains("<html") {
        html.to_string()
    } else {
        format!("<!doctype html><html><head><meta charset=\"utf-8\"></head><body>{html}</body></html>")
    };

    let dom = parse_document(RcDom::default(), Default::default()).one(wrapped);

    let children = match find_body(&dom.document) {
        Some(body) => lower_children(&body, 1),
        None => lower_children(&dom.document, 1),
    };
    debug!("Parsed fragment: {} top-level nodes", children.len());

    SourceNode::element(NodeKind::Other("body".into()), children)
}

fn find_body(node: &Handle) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &node.data {
        if (&*name.local).eq_ignore_ascii_case("body") {
            return Some(node.clone());
        }
    }
    node.children.borrow().iter().find_map(find_body)
}

fn lower_children(node: &Handle, depth: usize) -> Vec<SourceNode> {
    node.children
        .borrow()
        .iter()
        .filter_map(|c| lower(c, depth))
        .collect()
}

fn lower(node: &Handle, depth: usize) -> Option<SourceNode> {
    match &node.data {
        NodeData::Text { contents } => Some(SourceNode::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let tag = (&*name.local).to_ascii_lowercase();
            if depth > MAX_NESTING_DEPTH {
                warn!(
                    "Nesting depth {} exceeds {}; flattening <{}> to text",
                    depth, MAX_NESTING_DEPTH, tag
                );
                return Some(SourceNode::Text(flat_text(node)));
            }
            let kind = classify(&tag, &attrs.borrow());
            Some(SourceNode::element(kind, lower_children(node, depth + 1)))
        }
        // Comments, doctypes and processing instructions carry no content.
        _ => None,
    }
}

/// Iterative text collection for subtrees too deep to lower recursively.
fn flat_text(node: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![node.clone()];
    while let Some(n) = stack.pop() {
        if let NodeData::Text { contents } = &n.data {
            out.push_str(&contents.borrow());
        }
        stack.extend(n.children.borrow().iter().rev().cloned());
    }
    out
}

fn classify(tag: &str, attrs: &[html5ever::Attribute]) -> NodeKind {
    match tag {
        "h1" => NodeKind::Heading(1),
        "h2" => NodeKind::Heading(2),
        "h3" => NodeKind::Heading(3),
        "p" => NodeKind::Paragraph,
        "ul" => NodeKind::List(ListKind::Unordered),
        "ol" => NodeKind::List(ListKind::Ordered),
        "li" => NodeKind::ListItem,
        "table" => NodeKind::Table,
        "tr" => NodeKind::TableRow,
        "td" | "th" => NodeKind::TableCell,
        "img" => NodeKind::Image(image_attrs(attrs)),
        "br" => NodeKind::LineBreak,
        "b" | "strong" => NodeKind::Bold,
        "i" | "em" => NodeKind::Italic,
        "u" => NodeKind::Underline,
        other => NodeKind::Other(other.to_string()),
    }
}

fn image_attrs(attrs: &[html5ever::Attribute]) -> ImageAttrs {
    let get = |key: &str| {
        attrs
            .iter()
            .find(|a| (&*a.name.local).eq_ignore_ascii_case(key))
            .map(|a| a.value.to_string())
    };
    ImageAttrs {
        src: get("src").filter(|s| !s.trim().is_empty()),
        width: get("width").as_deref().and_then(parse_dimension),
        height: get("height").as_deref().and_then(parse_dimension),
    }
}

/// Parse `"300"` or `"300px"`; anything else (percentages, junk, zero) is absent.
fn parse_dimension(raw: &str) -> Option<u32> {
    let v = raw.trim();
    let v = v.strip_suffix("px").unwrap_or(v).trim();
    v.parse::<u32>().ok().filter(|n| *n > 0)
}
