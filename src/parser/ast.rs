/// A block directive with a body: `{{if:...}}`, `{{elseif:...}}`, `{{else}}` or `{{for:...}}`
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// The directive exactly as written between `{{` and `}}`, used in error output
    pub source: String,
    /// What follows the `if:`/`elseif:`/`for:` marker, empty for `else`
    pub expr: String,
    /// The nodes rendered when the block is taken
    pub body: Vec<Node>,
}

impl Block {
    pub fn new(source: &str, expr: &str) -> Block {
        Block { source: source.to_string(), expr: expr.to_string(), body: Vec::new() }
    }
}

/// All Stache nodes that can be encountered.
///
/// `endif`/`endfor` only close blocks while building and never show up here.
/// `elseif` and `else` are siblings of the `if` they continue, not children.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Literal text, rendered verbatim
    Text(String),
    /// A `{{ expr|filter }}` interpolation, holding the raw directive
    Variable(String),
    If(Block),
    ElseIf(Block),
    Else(Block),
    For(Block),
}

impl Node {
    /// The directive this node was built from, `None` for text
    pub fn source(&self) -> Option<&str> {
        match *self {
            Node::Text(_) => None,
            Node::Variable(ref s) => Some(s),
            Node::If(ref b) | Node::ElseIf(ref b) | Node::Else(ref b) | Node::For(ref b) => {
                Some(&b.source)
            }
        }
    }

    /// The nested nodes of a block, empty for leaves
    pub fn body(&self) -> &[Node] {
        match *self {
            Node::Text(_) | Node::Variable(_) => &[],
            Node::If(ref b) | Node::ElseIf(ref b) | Node::Else(ref b) | Node::For(ref b) => &b.body,
        }
    }
}
