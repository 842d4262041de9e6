//! AST node model produced by the (external) document parser.
//!
//! The validator never constructs or mutates these nodes; it only walks the
//! tree a parser handed it. Ownership of children is established once, at
//! construction time, via the `make_*` helpers below.
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A node's byte span in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Span { offset, length }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn contains_offset(&self, at: usize) -> bool {
        at >= self.offset && at <= self.end()
    }
}

pub type NodeRef = Rc<Node>;

/// Identity key for a node, used wherever the validator needs to key a set or
/// map by "this particular node" (evaluated-items tracking, collector
/// exclusion) without borrowing it.
pub type NodeId = usize;

pub fn node_id(node: &NodeRef) -> NodeId {
    Rc::as_ptr(node) as NodeId
}

#[derive(Debug)]
pub enum NodeKind {
    Object(Vec<NodeRef>),
    Property {
        key: NodeRef,
        colon_offset: usize,
        value: Option<NodeRef>,
    },
    Array(Vec<NodeRef>),
    String(String),
    Number {
        value: f64,
        is_integer: bool,
    },
    Boolean(bool),
    Null,
}

/// A node in the parsed document tree.
///
/// `source` is an opaque handle the parser attaches so diagnostics can be
/// traced back to the originating document (relevant when a single editor
/// session juggles multiple embedded documents, e.g. a multi-document YAML
/// stream).
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub source: Rc<str>,
    parent: RefCell<Weak<Node>>,
}

impl Node {
    fn leaf(kind: NodeKind, span: Span, source: Rc<str>) -> NodeRef {
        Rc::new(Node {
            kind,
            span,
            source,
            parent: RefCell::new(Weak::new()),
        })
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().upgrade()
    }

    pub fn offset(&self) -> usize {
        self.span.offset
    }

    pub fn length(&self) -> usize {
        self.span.length
    }

    pub fn tag(&self) -> &'static str {
        match &self.kind {
            NodeKind::Object(_) => "object",
            NodeKind::Property { .. } => "property",
            NodeKind::Array(_) => "array",
            NodeKind::String(_) => "string",
            NodeKind::Number { .. } => "number",
            NodeKind::Boolean(_) => "boolean",
            NodeKind::Null => "null",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<(f64, bool)> {
        match &self.kind {
            NodeKind::Number { value, is_integer } => Some((*value, *is_integer)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.kind {
            NodeKind::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Null)
    }

    /// Iterate an object's `property` children as `(name, value)` pairs,
    /// walking YAML merge keys (`<<`) depth-first per spec §4.3 Phase 1.
    pub fn object_properties(&self) -> Option<&[NodeRef]> {
        match &self.kind {
            NodeKind::Object(props) => Some(props),
            _ => None,
        }
    }

    pub fn array_items(&self) -> Option<&[NodeRef]> {
        match &self.kind {
            NodeKind::Array(items) => Some(items),
            _ => None,
        }
    }
}

fn attach(child: &NodeRef, parent: &NodeRef) {
    *child.parent.borrow_mut() = Rc::downgrade(parent);
}

pub fn make_object(span: Span, properties: Vec<NodeRef>, source: Rc<str>) -> NodeRef {
    let node = Node::leaf(NodeKind::Object(properties), span, source);
    if let NodeKind::Object(props) = &node.kind {
        for p in props {
            attach(p, &node);
        }
    }
    node
}

pub fn make_property(
    span: Span,
    key: NodeRef,
    colon_offset: usize,
    value: Option<NodeRef>,
    source: Rc<str>,
) -> NodeRef {
    let node = Node::leaf(
        NodeKind::Property {
            key: key.clone(),
            colon_offset,
            value: value.clone(),
        },
        span,
        source,
    );
    attach(&key, &node);
    if let Some(v) = &value {
        attach(v, &node);
    }
    node
}

pub fn make_array(span: Span, items: Vec<NodeRef>, source: Rc<str>) -> NodeRef {
    let node = Node::leaf(NodeKind::Array(items), span, source);
    if let NodeKind::Array(items) = &node.kind {
        for i in items {
            attach(i, &node);
        }
    }
    node
}

pub fn make_string(span: Span, value: String, source: Rc<str>) -> NodeRef {
    Node::leaf(NodeKind::String(value), span, source)
}

pub fn make_number(span: Span, value: f64, is_integer: bool, source: Rc<str>) -> NodeRef {
    Node::leaf(NodeKind::Number { value, is_integer }, span, source)
}

pub fn make_boolean(span: Span, value: bool, source: Rc<str>) -> NodeRef {
    Node::leaf(NodeKind::Boolean(value), span, source)
}

pub fn make_null(span: Span, source: Rc<str>) -> NodeRef {
    Node::leaf(NodeKind::Null, span, source)
}
