//! Statement-level reductions: sequencing, block assembly, control-flow
//! statement assembly and the `;` rules.

use crate::{
    ast::ast::{NodeId, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

impl Parser {
    /// Whether a node may come directly before a statement.
    pub(super) fn can_precede_statement(&self, id: NodeId) -> bool {
        match self.ast.kind(id) {
            NodeKind::ProgramPart | NodeKind::Statement => true,
            NodeKind::Terminal => matches!(
                self.node_terminal_kind(id),
                Some(
                    TokenKind::Colon
                        | TokenKind::Comma
                        | TokenKind::Else
                        | TokenKind::Arrow
                        | TokenKind::LBrace
                )
            ),
            _ => false,
        }
    }

    /// Reductions for a finished statement on the stack top: first the
    /// constructs it may complete, then ordinary sequencing.
    pub(super) fn reduce_statement(&mut self) -> Result<bool, Error> {
        // if EXPR : STMT
        if self.terminal_kind_at(1) == Some(TokenKind::Colon)
            && self.kind_at(2) == Some(NodeKind::Expression)
            && self.terminal_kind_at(3) == Some(TokenKind::If)
        {
            // an else branch may still follow
            if self.look_ahead().kind == TokenKind::Else {
                return Ok(false);
            }

            let popped = self.stack.pop_n(4);
            let id = self
                .ast
                .new_parent(NodeKind::IfSt, vec![popped[0], popped[1], popped[3]]);
            self.stack.push(id);
            return Ok(true);
        }

        // if EXPR : STMT else STMT
        if self.terminal_kind_at(1) == Some(TokenKind::Else)
            && self.kind_at(2) == Some(NodeKind::Statement)
            && self.terminal_kind_at(3) == Some(TokenKind::Colon)
            && self.kind_at(4) == Some(NodeKind::Expression)
            && self.terminal_kind_at(5) == Some(TokenKind::If)
        {
            let popped = self.stack.pop_n(6);
            let id = self.ast.new_parent(
                NodeKind::IfSt,
                vec![popped[0], popped[1], popped[3], popped[5]],
            );
            self.stack.push(id);
            return Ok(true);
        }

        // while EXPR : STMT
        if self.terminal_kind_at(1) == Some(TokenKind::Colon)
            && self.kind_at(2) == Some(NodeKind::Expression)
            && self.terminal_kind_at(3) == Some(TokenKind::While)
        {
            let popped = self.stack.pop_n(4);
            let id = self
                .ast
                .new_parent(NodeKind::WhileSt, vec![popped[0], popped[1], popped[3]]);
            self.stack.push(id);
            return Ok(true);
        }

        // loop STMT
        if self.terminal_kind_at(1) == Some(TokenKind::Loop) {
            let popped = self.stack.pop_n(2);
            let id = self.ast.new_parent(NodeKind::LoopSt, popped);
            self.stack.push(id);
            return Ok(true);
        }

        // fn ID PARAM* STMT -- the body just completed
        let mut depth = 1;
        while self.kind_at(depth) == Some(NodeKind::Param) {
            depth += 1;
        }
        if self.kind_at(depth) == Some(NodeKind::Identifier)
            && self.terminal_kind_at(depth + 1) == Some(TokenKind::Fn)
        {
            let popped = self.stack.pop_n(depth + 2);
            // the fn keyword is dropped; name, params and body remain
            let children = popped[1..].to_vec();
            let id = self.ast.new_parent(NodeKind::Function, children);
            self.stack.push(id);
            return Ok(true);
        }

        // a match arm body waits for the closing ';'
        if self.terminal_kind_at(1) == Some(TokenKind::Arrow) {
            return Ok(false);
        }

        // statement sequencing
        let prev = match self.stack.peek(1) {
            None => {
                self.single_parent(NodeKind::ProgramPart);
                return Ok(true);
            }
            Some(prev) => prev,
        };

        if self.ast.kind(prev) == NodeKind::ProgramPart {
            self.single_parent(NodeKind::ProgramPart);
            Ok(true)
        } else if self.can_precede_statement(prev) {
            Ok(false)
        } else {
            Err(self.error_at_last_leaf(
                ErrorImpl::UnexpectedBeforeStatement {
                    construct: self.ast.describe(prev),
                },
                prev,
            ))
        }
    }

    /// `{ STMT* }` folds into a single block statement once the closing
    /// brace is shifted.
    pub(super) fn reduce_close_brace(&mut self) -> Result<bool, Error> {
        let rbrace = match self.stack.peek(0) {
            Some(rbrace) => rbrace,
            None => return Ok(false),
        };

        let mut depth = 1;
        loop {
            match self.stack.peek(depth) {
                None => {
                    return Err(self.error_at_first_leaf(
                        ErrorImpl::UnexpectedToken {
                            token: String::from("}"),
                        },
                        rbrace,
                    ));
                }
                Some(id) => {
                    if self.terminal_kind_at(depth) == Some(TokenKind::LBrace) {
                        break;
                    }
                    if self.ast.kind(id) != NodeKind::Statement {
                        return Err(self.error_at_first_leaf(
                            ErrorImpl::UnexpectedInBlock {
                                construct: self.ast.describe(id),
                            },
                            id,
                        ));
                    }
                    depth += 1;
                }
            }
        }

        let popped = self.stack.pop_n(depth + 1);
        let mut children: Vec<NodeId> = popped[1..popped.len() - 1].to_vec();

        if children.is_empty() {
            // {} is a block holding one empty statement
            let closing_brace = popped[popped.len() - 1];
            let noop = self.ast.new_parent(NodeKind::Noop, vec![closing_brace]);
            let statement = self.ast.new_parent(NodeKind::Statement, vec![noop]);
            children.push(statement);
        }

        let id = self.ast.new_parent(NodeKind::Statement, children);
        self.stack.push(id);
        Ok(true)
    }

    /// The `;` reductions: break/next, match closure, assignments and
    /// declarations, call statements, and the empty statement.
    pub(super) fn reduce_semi(&mut self) -> Result<bool, Error> {
        // break ; and next ;
        if let Some(kind) = self.terminal_kind_at(1) {
            if kind == TokenKind::Break || kind == TokenKind::Next {
                let node_kind = if kind == TokenKind::Break {
                    NodeKind::BreakSt
                } else {
                    NodeKind::NextSt
                };
                let popped = self.stack.pop_n(2);
                let id = self.ast.new_parent(node_kind, popped);
                self.stack.push(id);
                return Ok(true);
            }
        }

        // match EXPR : (EXPR -> STMT [,])+ ;
        if self.try_reduce_match() {
            return Ok(true);
        }

        // ID = EXPR ;  and  TYPE ID = EXPR ;
        if self.kind_at(1) == Some(NodeKind::Expression)
            && self.terminal_kind_at(2) == Some(TokenKind::Assign)
        {
            return self.reduce_assignment();
        }

        // CALL ;
        if self.kind_at(1) == Some(NodeKind::CallExpr) {
            let popped = self.stack.pop_n(2);
            let id = self.ast.new_parent(NodeKind::CallSt, popped);
            self.stack.push(id);
            return Ok(true);
        }

        // a lone ; is an empty statement
        let at_statement_start = match self.stack.peek(1) {
            None => true,
            Some(prev) => self.can_precede_statement(prev),
        };
        if at_statement_start {
            self.single_parent(NodeKind::Noop);
            return Ok(true);
        }

        Ok(false)
    }

    fn reduce_assignment(&mut self) -> Result<bool, Error> {
        if self.kind_at(3) != Some(NodeKind::Identifier) {
            return match self.stack.peek(3) {
                Some(target) => Err(self.error_at_last_leaf(
                    ErrorImpl::AssignmentToInvalidTarget {
                        construct: self.ast.describe(target),
                    },
                    target,
                )),
                None => {
                    let assign = self.stack.peek(2).expect("matched by the caller");
                    Err(self.error_at_first_leaf(
                        ErrorImpl::UnexpectedToken {
                            token: String::from("="),
                        },
                        assign,
                    ))
                }
            };
        }

        // TYPE ID = EXPR ; is a declaration
        if self.kind_at(4) == Some(NodeKind::Type) {
            let popped = self.stack.pop_n(5);
            let id = self
                .ast
                .new_parent(NodeKind::Declaration, vec![popped[0], popped[1], popped[3]]);
            self.stack.push(id);
            return Ok(true);
        }

        // a plain assignment needs a statement context before the name
        let target = self.stack.peek(3).expect("checked above");
        let context_ok = match self.stack.peek(4) {
            None => true,
            Some(context) => self.can_precede_statement(context),
        };
        if !context_ok {
            let name = self.first_leaf_text(target);
            return Err(
                self.error_at_first_leaf(ErrorImpl::AssignmentToUndeclared { name }, target)
            );
        }

        let popped = self.stack.pop_n(4);
        let id = self
            .ast
            .new_parent(NodeKind::Assignment, vec![popped[0], popped[2]]);
        self.stack.push(id);
        Ok(true)
    }

    /// Scans downward from the terminating `;` for a full run of match
    /// arms ending at the `match` keyword. Anything else is left for the
    /// other `;` rules.
    fn try_reduce_match(&mut self) -> bool {
        if self.kind_at(1) != Some(NodeKind::Statement) {
            return false;
        }

        let mut depth = 1;
        loop {
            // each arm reads STMT <- '->' <- EXPR going down
            if self.kind_at(depth) != Some(NodeKind::Statement) {
                return false;
            }
            if self.terminal_kind_at(depth + 1) != Some(TokenKind::Arrow) {
                return false;
            }
            if self.kind_at(depth + 2) != Some(NodeKind::Expression) {
                return false;
            }
            depth += 3;

            if self.terminal_kind_at(depth) == Some(TokenKind::Comma) {
                depth += 1;
            }

            if self.terminal_kind_at(depth) == Some(TokenKind::Colon) {
                if self.kind_at(depth + 1) == Some(NodeKind::Expression)
                    && self.terminal_kind_at(depth + 2) == Some(TokenKind::Match)
                {
                    break;
                }
                return false;
            }
        }

        let popped = self.stack.pop_n(depth + 3);
        // keyword and scrutinee first, then alternating arm pattern/body
        let mut children = vec![popped[0], popped[1]];
        for &id in &popped[3..popped.len() - 1] {
            match self.ast.kind(id) {
                NodeKind::Expression | NodeKind::Statement => children.push(id),
                _ => {} // arm separators
            }
        }

        let id = self.ast.new_parent(NodeKind::MatchSt, children);
        self.stack.push(id);
        true
    }

    pub(super) fn first_leaf_text(&self, id: NodeId) -> String {
        let leaf = self.ast.first_leaf(id);
        self.ast
            .node(leaf)
            .token
            .as_ref()
            .map(|token| token.text.clone())
            .unwrap_or_default()
    }
}
