use index_vec::IndexVec;

use crate::{lexer::tokens::Token, scoper::symbols::SymbolTable, Position};

/// Stable handle of a node inside the tree arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub usize);

impl index_vec::Idx for NodeId {
    fn from_usize(idx: usize) -> Self {
        Self(idx)
    }
    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Terminal,
    Program,
    ProgramPart,
    Statement,
    Function,
    Declaration,
    Assignment,
    Expression,
    Term,
    Literal,
    BinaryOp,
    Identifier,
    Type,
    Param,
    Arg,
    CallExpr,
    CallSt,
    BreakSt,
    NextSt,
    Noop,
    IfSt,
    WhileSt,
    LoopSt,
    MatchSt,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Source token, present only on Terminal leaves.
    pub token: Option<Token>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Symbol table, present only on scope-bearing nodes once the
    /// resolver has run.
    pub symbols: Option<SymbolTable>,
}

/// Arena owning every node of the tree under construction.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: IndexVec<NodeId, Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Ast {
            nodes: IndexVec::new(),
            root: None,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Creates a terminal leaf holding the given token.
    pub fn new_leaf(&mut self, token: Token) -> NodeId {
        let id = self.nodes.next_idx();
        self.nodes.push(Node {
            id,
            kind: NodeKind::Terminal,
            token: Some(token),
            children: vec![],
            parent: None,
            symbols: None,
        });
        id
    }

    /// Creates a parent node adopting the given children, in order.
    /// Ownership of the children moves from the parse stack to the tree.
    pub fn new_parent(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let id = self.nodes.next_idx();
        self.nodes.push(Node {
            id,
            kind,
            token: None,
            children: children.clone(),
            parent: None,
            symbols: None,
        });
        for child in children {
            self.nodes[child].parent = Some(id);
        }
        id
    }

    /// Leftmost terminal underneath the node (the node itself for leaves).
    pub fn first_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&child) = self.nodes[current].children.first() {
            current = child;
        }
        current
    }

    /// Rightmost terminal underneath the node.
    pub fn last_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&child) = self.nodes[current].children.last() {
            current = child;
        }
        current
    }

    /// Source position of the node's first leaf token, when it has one.
    pub fn position_of(&self, id: NodeId) -> Option<Position> {
        self.nodes[self.first_leaf(id)]
            .token
            .as_ref()
            .map(|token| token.position())
    }

    /// Source position of the node's last leaf token, when it has one.
    pub fn last_position_of(&self, id: NodeId) -> Option<Position> {
        self.nodes[self.last_leaf(id)]
            .token
            .as_ref()
            .map(|token| token.position())
    }

    /// Ids of the subtree under `id` in postorder: children before their
    /// parent, siblings left to right.
    pub fn postorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.nodes[current].children.iter().copied());
        }

        order.reverse();
        order
    }

    /// Human-readable description of a node, used in diagnostics.
    pub fn describe(&self, id: NodeId) -> String {
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::Terminal => {
                let text = node
                    .token
                    .as_ref()
                    .map(|token| token.text.as_str())
                    .unwrap_or("");
                format!("token '{}'", text)
            }
            NodeKind::BreakSt => "'break' statement".to_string(),
            NodeKind::NextSt => "'next' statement".to_string(),
            NodeKind::IfSt => "'if' statement".to_string(),
            NodeKind::LoopSt => "'loop' statement".to_string(),
            NodeKind::WhileSt => "'while' statement".to_string(),
            NodeKind::MatchSt => "'match' statement".to_string(),
            NodeKind::Noop => "empty statement".to_string(),
            NodeKind::ProgramPart => "function declaration or statement".to_string(),
            NodeKind::Statement => "statement".to_string(),
            NodeKind::Function => "function declaration".to_string(),
            NodeKind::Expression => "expression".to_string(),
            NodeKind::Term => "term".to_string(),
            NodeKind::Literal => "literal".to_string(),
            NodeKind::BinaryOp => "binary operator".to_string(),
            NodeKind::Program => "complete program".to_string(),
            NodeKind::Type => "type".to_string(),
            NodeKind::Identifier => "identifier".to_string(),
            NodeKind::Declaration => "declaration".to_string(),
            NodeKind::Assignment => "assignment".to_string(),
            NodeKind::Param => "parameter".to_string(),
            NodeKind::Arg => "argument list".to_string(),
            NodeKind::CallExpr => "function call".to_string(),
            NodeKind::CallSt => "call statement".to_string(),
        }
    }

    /// Short node tag for stack traces at debug verbosity.
    pub fn describe_abbrev(&self, id: NodeId) -> String {
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::Terminal => node
                .token
                .as_ref()
                .map(|token| token.text.clone())
                .unwrap_or_default(),
            NodeKind::BreakSt => "BREAK st".to_string(),
            NodeKind::NextSt => "NEXT st".to_string(),
            NodeKind::IfSt => "IF st".to_string(),
            NodeKind::LoopSt => "LOOP st".to_string(),
            NodeKind::WhileSt => "WHILE st".to_string(),
            NodeKind::MatchSt => "MATCH st".to_string(),
            NodeKind::Noop => "NOOP".to_string(),
            NodeKind::ProgramPart => "PP".to_string(),
            NodeKind::Statement => "STAT".to_string(),
            NodeKind::Function => "F DECL".to_string(),
            NodeKind::Expression => "EXPR".to_string(),
            NodeKind::Term => "TERM".to_string(),
            NodeKind::Literal => "LIT".to_string(),
            NodeKind::BinaryOp => "OP".to_string(),
            NodeKind::Program => "PROGRAM".to_string(),
            NodeKind::Type => "TYPE".to_string(),
            NodeKind::Identifier => "ID".to_string(),
            NodeKind::Declaration => "DECL".to_string(),
            NodeKind::Assignment => "ASSIGN".to_string(),
            NodeKind::Param => "PARAM".to_string(),
            NodeKind::Arg => "ARGS".to_string(),
            NodeKind::CallExpr => "CALL".to_string(),
            NodeKind::CallSt => "CALL st".to_string(),
        }
    }

    /// Renders the finished tree in Graphviz dot format.
    pub fn to_graphviz(&self) -> String {
        let mut out = String::from("digraph ast {\n  node [shape=box];\n");

        if let Some(root) = self.root {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                let node = &self.nodes[id];
                let label = match &node.token {
                    Some(token) => {
                        format!("{:?}\\n{}", node.kind, token.text.replace('"', "\\\""))
                    }
                    None => format!("{:?}", node.kind),
                };
                out.push_str(&format!("  n{} [label=\"{}\"];\n", id.0, label));
                for &child in &node.children {
                    out.push_str(&format!("  n{} -> n{};\n", id.0, child.0));
                    stack.push(child);
                }
            }
        }

        out.push_str("}\n");
        out
    }
}
