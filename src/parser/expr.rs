//! Expression-level reductions: operator-precedence climbing and the
//! close-parenthesis rules (grouping, calls, parameter lists).

use crate::{
    ast::ast::{NodeId, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{is_binary_op, is_expr_terminator, precedence, TokenKind},
};

use super::parser::Parser;

impl Parser {
    /// Reduces `EXPR OP EXPR` (or `not EXPR`) when the lookahead says the
    /// pending operator may combine now: either the expression ends here,
    /// or the upcoming operator binds no tighter than the stacked one.
    pub(super) fn reduce_expression(&mut self) -> Result<bool, Error> {
        if self.kind_at(1) == Some(NodeKind::BinaryOp) {
            let operator = self.stack.peek(1).expect("kind_at checked the entry");
            if !self.should_reduce_at(self.operator_rank(operator)) {
                return Ok(false);
            }

            if self.kind_at(2) == Some(NodeKind::Expression) {
                let popped = self.stack.pop_n(3);
                let id = self.ast.new_parent(NodeKind::Expression, popped);
                self.stack.push(id);
                return Ok(true);
            }

            // an OP EXPR pair needs an expression on its left
            return match self.stack.peek(2) {
                Some(offending) => Err(self.error_at_last_leaf(
                    ErrorImpl::ExpectedExpressionBeforeOperator {
                        construct: self.ast.describe(offending),
                    },
                    offending,
                )),
                None => {
                    let text = self.first_leaf_text(operator);
                    Err(self
                        .error_at_first_leaf(ErrorImpl::UnexpectedToken { token: text }, operator))
                }
            };
        }

        // not EXPR
        if self.terminal_kind_at(1) == Some(TokenKind::Not) {
            if !self.should_reduce_at(precedence(TokenKind::Not)) {
                return Ok(false);
            }

            let popped = self.stack.pop_n(2);
            let id = self.ast.new_parent(NodeKind::Expression, popped);
            self.stack.push(id);
            return Ok(true);
        }

        Ok(false)
    }

    /// A pending reduction at `rank` fires when the lookahead terminates
    /// the expression, or is a binary operator of equal or looser binding.
    fn should_reduce_at(&self, rank: Option<u8>) -> bool {
        let ahead = self.look_ahead().kind;

        if is_expr_terminator(ahead) {
            return true;
        }

        match (is_binary_op(ahead), precedence(ahead), rank) {
            (true, Some(ahead_rank), Some(rank)) => ahead_rank >= rank,
            _ => false,
        }
    }

    fn operator_rank(&self, id: NodeId) -> Option<u8> {
        let leaf = self.ast.first_leaf(id);
        self.ast
            .node(leaf)
            .token
            .as_ref()
            .and_then(|token| precedence(token.kind))
    }

    /// Dispatches a freshly shifted `)` to the construct it closes.
    pub(super) fn reduce_close_paren(&mut self) -> Result<bool, Error> {
        let rpar = match self.stack.peek(0) {
            Some(rpar) => rpar,
            None => return Ok(false),
        };

        // find the matching opening parenthesis
        let mut lpar_depth = 1;
        loop {
            match self.stack.peek(lpar_depth) {
                None => {
                    return Err(self.error_at_first_leaf(
                        ErrorImpl::UnexpectedToken {
                            token: String::from(")"),
                        },
                        rpar,
                    ));
                }
                Some(_) => {
                    if self.terminal_kind_at(lpar_depth) == Some(TokenKind::LPar) {
                        break;
                    }
                    lpar_depth += 1;
                }
            }
        }

        let below = self.stack.peek(lpar_depth + 1);
        let below_kind = below.map(|id| self.ast.kind(id));

        if below_kind == Some(NodeKind::Identifier) {
            // fn ID ( ... ) closes a parameter list; ID ( ... ) a call
            if self.terminal_kind_at(lpar_depth + 2) == Some(TokenKind::Fn) {
                return self.reduce_parameter_list(lpar_depth);
            }
            return self.reduce_call(lpar_depth);
        }

        // ( EXPR ): the parentheses are dropped
        if lpar_depth == 2 && self.kind_at(1) == Some(NodeKind::Expression) {
            let popped = self.stack.pop_n(3);
            self.stack.push(popped[1]);
            return Ok(true);
        }

        Err(self.error_at_first_leaf(
            ErrorImpl::UnexpectedToken {
                token: String::from(")"),
            },
            rpar,
        ))
    }

    /// `fn ID ( PARAM [, PARAM]* )`: drops the parens and commas, leaving
    /// the params on the stack for function assembly at the body's end.
    fn reduce_parameter_list(&mut self, lpar_depth: usize) -> Result<bool, Error> {
        let popped = self.stack.pop_n(lpar_depth + 1);
        let inner = &popped[1..popped.len() - 1];

        let mut params = Vec::new();
        let mut expect_param = true;
        for &id in inner {
            if expect_param {
                if self.ast.kind(id) != NodeKind::Param {
                    return Err(self.error_at_first_leaf(
                        ErrorImpl::UnexpectedInParameterList {
                            construct: self.ast.describe(id),
                        },
                        id,
                    ));
                }
                params.push(id);
            } else if self.node_terminal_kind(id) != Some(TokenKind::Comma) {
                return Err(self.error_at_first_leaf(
                    ErrorImpl::UnexpectedInParameterList {
                        construct: self.ast.describe(id),
                    },
                    id,
                ));
            }
            expect_param = !expect_param;
        }

        // a trailing comma leaves the list ending on a separator
        if !inner.is_empty() && inner.len() % 2 == 0 {
            let last = inner[inner.len() - 1];
            return Err(self.error_at_first_leaf(
                ErrorImpl::UnexpectedInParameterList {
                    construct: self.ast.describe(last),
                },
                last,
            ));
        }

        for &param in &params {
            self.stack.push(param);
        }
        Ok(true)
    }

    /// `ID ( EXPR [, EXPR]* )` assembles a call expression. The argument
    /// expressions live under a single `Arg` node; a call without
    /// arguments has none.
    fn reduce_call(&mut self, lpar_depth: usize) -> Result<bool, Error> {
        let popped = self.stack.pop_n(lpar_depth + 2);
        let callee = popped[0];
        let inner = &popped[2..popped.len() - 1];

        let mut arguments = Vec::new();
        let mut expect_expression = true;
        for &id in inner {
            if expect_expression {
                if self.ast.kind(id) != NodeKind::Expression {
                    return Err(self.error_at_first_leaf(
                        ErrorImpl::UnexpectedInArgumentList {
                            construct: self.ast.describe(id),
                        },
                        id,
                    ));
                }
                arguments.push(id);
            } else if self.node_terminal_kind(id) != Some(TokenKind::Comma) {
                return Err(self.error_at_first_leaf(
                    ErrorImpl::UnexpectedInArgumentList {
                        construct: self.ast.describe(id),
                    },
                    id,
                ));
            }
            expect_expression = !expect_expression;
        }

        if !inner.is_empty() && inner.len() % 2 == 0 {
            let last = inner[inner.len() - 1];
            return Err(self.error_at_first_leaf(
                ErrorImpl::UnexpectedInArgumentList {
                    construct: self.ast.describe(last),
                },
                last,
            ));
        }

        let mut children = vec![callee];
        if !arguments.is_empty() {
            let arg = self.ast.new_parent(NodeKind::Arg, arguments);
            children.push(arg);
        }

        let id = self.ast.new_parent(NodeKind::CallExpr, children);
        self.stack.push(id);
        Ok(true)
    }
}
