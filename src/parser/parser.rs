use crate::{
    ast::ast::{Ast, NodeId, NodeKind},
    cli::cli::OutputLevel,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{is_binary_op, is_literal, is_type, Token, TokenKind},
};

use super::stack::ParseStack;

/// State of the shift-reduce engine. The token sequence is consumed left
/// to right; the stack holds the ids of every node not yet folded into a
/// larger construct.
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) next: usize,
    pub(super) ast: Ast,
    pub(super) stack: ParseStack,
    pub(super) output: OutputLevel,
}

/// Parses a token sequence into a tree with a single `Program` root.
///
/// The sequence must end with an `Eof` token, which is inspected as
/// lookahead but never shifted.
pub fn parse(tokens: Vec<Token>, output: OutputLevel) -> Result<Ast, Error> {
    let mut parser = Parser::new(tokens, output);

    while parser.has_tokens() {
        parser.shift();

        while parser.reduce()? {}
    }

    parser.finish()
}

impl Parser {
    pub fn new(tokens: Vec<Token>, output: OutputLevel) -> Self {
        Parser {
            tokens,
            next: 0,
            ast: Ast::new(),
            stack: ParseStack::new(),
            output,
        }
    }

    fn has_tokens(&self) -> bool {
        self.next < self.tokens.len() && self.tokens[self.next].kind != TokenKind::Eof
    }

    /// The next unconsumed token, inspected without shifting.
    pub(super) fn look_ahead(&self) -> &Token {
        match self.tokens.get(self.next) {
            Some(token) => token,
            None => self.tokens.last().expect("token sequence ends with Eof"),
        }
    }

    /// Pushes the next token onto the stack as a new terminal leaf.
    fn shift(&mut self) {
        let token = self.tokens[self.next].clone();
        self.next += 1;

        let id = self.ast.new_leaf(token);
        self.stack.push(id);

        if self.output <= OutputLevel::Debug {
            self.print_stack("After shift. ");
        }
    }

    pub(super) fn kind_at(&self, depth: usize) -> Option<NodeKind> {
        self.stack.peek(depth).map(|id| self.ast.kind(id))
    }

    /// Token kind of the terminal `depth` entries below the stack top, if
    /// that entry is a terminal.
    pub(super) fn terminal_kind_at(&self, depth: usize) -> Option<TokenKind> {
        self.node_terminal_kind(self.stack.peek(depth)?)
    }

    pub(super) fn node_terminal_kind(&self, id: NodeId) -> Option<TokenKind> {
        let node = self.ast.node(id);
        if node.kind == NodeKind::Terminal {
            node.token.as_ref().map(|token| token.kind)
        } else {
            None
        }
    }

    /// Replaces the stack top with a new parent node of the given kind.
    pub(super) fn single_parent(&mut self, kind: NodeKind) {
        let children = self.stack.pop_n(1);
        let id = self.ast.new_parent(kind, children);
        self.stack.push(id);
    }

    pub(super) fn error_at_first_leaf(&self, kind: ErrorImpl, id: NodeId) -> Error {
        Error::new(kind, self.ast.position_of(id))
    }

    pub(super) fn error_at_last_leaf(&self, kind: ErrorImpl, id: NodeId) -> Error {
        Error::new(kind, self.ast.last_position_of(id))
    }

    /// Attempts one reduction of the stack top. Returns whether anything
    /// changed; the caller keeps reducing until nothing applies.
    fn reduce(&mut self) -> Result<bool, Error> {
        let top = match self.stack.peek(0) {
            Some(top) => top,
            None => return Ok(false),
        };

        let reduced = match self.ast.kind(top) {
            NodeKind::ProgramPart => {
                if self.look_ahead().kind == TokenKind::Eof {
                    self.reduce_root()?;
                    true
                } else {
                    false
                }
            }
            NodeKind::Statement => self.reduce_statement()?,
            NodeKind::Function => {
                self.single_parent(NodeKind::ProgramPart);
                true
            }
            NodeKind::Declaration => {
                // top level declarations are program parts of their own;
                // inside a block they are ordinary statements
                match self.kind_at(1) {
                    None | Some(NodeKind::ProgramPart) => {
                        self.single_parent(NodeKind::ProgramPart)
                    }
                    _ => self.single_parent(NodeKind::Statement),
                }
                true
            }
            NodeKind::IfSt => {
                // an else branch may still attach
                if self.look_ahead().kind == TokenKind::Else {
                    false
                } else {
                    self.single_parent(NodeKind::Statement);
                    true
                }
            }
            NodeKind::WhileSt
            | NodeKind::LoopSt
            | NodeKind::MatchSt
            | NodeKind::BreakSt
            | NodeKind::NextSt
            | NodeKind::Noop
            | NodeKind::Assignment
            | NodeKind::CallSt => {
                self.single_parent(NodeKind::Statement);
                true
            }
            NodeKind::Expression => self.reduce_expression()?,
            NodeKind::Term => {
                self.single_parent(NodeKind::Expression);
                true
            }
            NodeKind::Literal => {
                self.single_parent(NodeKind::Term);
                true
            }
            NodeKind::CallExpr => self.reduce_call_expr(),
            NodeKind::Identifier => self.reduce_identifier(),
            NodeKind::Terminal => self.reduce_terminal(top)?,
            NodeKind::BinaryOp
            | NodeKind::Type
            | NodeKind::Param
            | NodeKind::Arg
            | NodeKind::Program => false,
        };

        if reduced && self.output <= OutputLevel::Debug {
            self.print_stack("After reduce.");
        }

        Ok(reduced)
    }

    fn reduce_terminal(&mut self, top: NodeId) -> Result<bool, Error> {
        let kind = match self.node_terminal_kind(top) {
            Some(kind) => kind,
            None => return Ok(false),
        };

        if is_binary_op(kind) {
            self.single_parent(NodeKind::BinaryOp);
            Ok(true)
        } else if is_literal(kind) {
            self.single_parent(NodeKind::Literal);
            Ok(true)
        } else if is_type(kind) {
            self.single_parent(NodeKind::Type);
            Ok(true)
        } else if kind == TokenKind::Id {
            self.single_parent(NodeKind::Identifier);
            Ok(true)
        } else if kind == TokenKind::Semi {
            self.reduce_semi()
        } else if kind == TokenKind::RPar {
            self.reduce_close_paren()
        } else if kind == TokenKind::RBrace {
            self.reduce_close_brace()
        } else {
            // keywords, openers and separators wait for a later shift
            Ok(false)
        }
    }

    /// Decides what a bare identifier is from one token of lookahead.
    fn reduce_identifier(&mut self) -> bool {
        // the name in a function header stays bare until assembly
        if self.terminal_kind_at(1) == Some(TokenKind::Fn) {
            return false;
        }

        let ahead = self.look_ahead().kind;

        // a function name: resolved when its parenthesis closes
        if ahead == TokenKind::Id
            || ahead == TokenKind::LPar
            || ahead == TokenKind::Not
            || is_literal(ahead)
        {
            return false;
        }

        // an assignment target or declaration name: resolved at the ';'
        if ahead == TokenKind::Assign {
            return false;
        }

        if self.kind_at(1) == Some(NodeKind::Type) {
            if self.type_at_statement_start() {
                // variable declaration, reduced when the ';' arrives
                return false;
            }

            // TYPE ID inside a function header
            let popped = self.stack.pop_n(2);
            let id = self.ast.new_parent(NodeKind::Param, popped);
            self.stack.push(id);
            return true;
        }

        self.single_parent(NodeKind::Term);
        true
    }

    /// Whether the type two entries down sits where a statement may
    /// begin. A comma never starts a statement: after one, TYPE ID is the
    /// next parameter of a header, not a declaration.
    fn type_at_statement_start(&self) -> bool {
        let context = match self.stack.peek(2) {
            None => return true,
            Some(context) => context,
        };

        match self.ast.kind(context) {
            NodeKind::ProgramPart | NodeKind::Statement => true,
            NodeKind::Terminal => matches!(
                self.node_terminal_kind(context),
                Some(TokenKind::LBrace | TokenKind::Colon | TokenKind::Else | TokenKind::Arrow)
            ),
            _ => false,
        }
    }

    /// A finished call becomes a term, unless it stands alone as a
    /// statement, in which case the ';' rule turns it into a `CallSt`.
    fn reduce_call_expr(&mut self) -> bool {
        if self.look_ahead().kind == TokenKind::Semi {
            let statement_position = match self.stack.peek(1) {
                None => true,
                Some(prev) => self.can_precede_statement(prev),
            };
            if statement_position {
                return false;
            }
        }

        self.single_parent(NodeKind::Term);
        true
    }

    /// Wraps the whole stack into the `Program` root. Every entry must
    /// already be a finished program part.
    fn reduce_root(&mut self) -> Result<(), Error> {
        for &id in self.stack.iter() {
            if self.ast.kind(id) != NodeKind::ProgramPart {
                return Err(self.error_at_first_leaf(
                    ErrorImpl::UnexpectedAtRootLevel {
                        construct: self.ast.describe(id),
                    },
                    id,
                ));
            }
        }

        let children = self.stack.pop_n(self.stack.len());
        let root = self.ast.new_parent(NodeKind::Program, children);
        self.stack.push(root);
        self.ast.set_root(root);
        Ok(())
    }

    /// Called once the tokens are exhausted: either the root closed over
    /// the whole stack, or something was left half-built.
    fn finish(self) -> Result<Ast, Error> {
        if self.ast.root().is_some() && self.stack.len() == 1 {
            return Ok(self.ast);
        }

        if self.stack.is_empty() {
            return Err(Error::new(ErrorImpl::EmptyProgram, None));
        }

        for &id in self.stack.iter() {
            if self.ast.kind(id) != NodeKind::ProgramPart {
                return Err(self.error_at_first_leaf(
                    ErrorImpl::UnexpectedAtRootLevel {
                        construct: self.ast.describe(id),
                    },
                    id,
                ));
            }
        }

        let position = self.tokens.last().map(|token| token.position());
        Err(Error::new(ErrorImpl::UnexpectedEndOfInput, position))
    }

    pub(super) fn print_stack(&self, prefix: &str) {
        let mut line = String::new();
        for &id in self.stack.iter() {
            line.push(' ');
            line.push_str(&self.ast.describe_abbrev(id));
        }
        println!("{} Stack:{}.", prefix, line);
    }
}
