use crate::{
    ast::ast::{Ast, NodeId, NodeKind},
    cli::cli::OutputLevel,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
    Position,
};

use super::symbols::{Symbol, SymbolKind, SymbolTable};

/// State of the resolver pass over one finished tree.
pub struct ScopeChecker<'ast> {
    ast: &'ast mut Ast,
    output: OutputLevel,
}

/// Entry point of the resolver: attaches symbol tables to scope-bearing
/// nodes and validates every identifier use and declaration.
pub fn check_scopes(ast: &mut Ast, output: OutputLevel) -> Result<(), Error> {
    let root = match ast.root() {
        Some(root) => root,
        None => return Err(Error::new(ErrorImpl::EmptyProgram, None)),
    };

    if output <= OutputLevel::Verbose {
        println!("Starting scope checking...");
    }

    let mut checker = ScopeChecker { ast, output };
    checker.hoist_functions(root)?;

    for id in checker.ast.postorder(root) {
        checker.resolve_scope(id)?;
    }

    if checker.output <= OutputLevel::Debug {
        checker.print_sym_tables(root);
    }

    Ok(())
}

impl<'ast> ScopeChecker<'ast> {
    /// Only the program root and statement blocks have scope. A block is
    /// a statement whose children are all statements themselves.
    fn bears_scope(&self, id: NodeId) -> bool {
        let node = self.ast.node(id);
        match node.kind {
            NodeKind::Program => true,
            NodeKind::Statement => {
                !node.children.is_empty()
                    && node
                        .children
                        .iter()
                        .all(|&child| self.ast.kind(child) == NodeKind::Statement)
            }
            _ => false,
        }
    }

    /// The nearest scope-bearing node enclosing `id`, including itself.
    fn immediate_scope(&self, id: NodeId) -> Result<NodeId, Error> {
        let mut current = id;
        loop {
            if self.bears_scope(current) {
                return Ok(current);
            }
            match self.ast.parent(current) {
                Some(parent) => current = parent,
                None => return Err(Error::new(ErrorImpl::NodeWithoutScope, None)),
            }
        }
    }

    fn find_symbol(&self, scope: NodeId, name: &str) -> Option<&Symbol> {
        self.ast.node(scope).symbols.as_ref()?.find(name)
    }

    /// Walks outward from `id` through enclosing scopes, nearest first,
    /// so inner declarations shadow outer ones.
    fn lookup_symbol(&self, id: NodeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.bears_scope(node) {
                if let Some(symbol) = self.find_symbol(node, name) {
                    return Some(symbol);
                }
            }
            current = self.ast.parent(node);
        }
        None
    }

    /// Inserts into the nearest enclosing scope, failing if the name is
    /// already taken in that same table. The same name in an outer scope
    /// is legal shadowing.
    fn try_add_symbol(
        &mut self,
        at: NodeId,
        name: &str,
        kind: SymbolKind,
        position: Option<Position>,
    ) -> Result<(), Error> {
        let scope = self.immediate_scope(at)?;

        if self.find_symbol(scope, name).is_some() {
            return Err(Error::new(
                ErrorImpl::Redeclaration {
                    name: name.to_string(),
                },
                position,
            ));
        }

        let table = self
            .ast
            .node_mut(scope)
            .symbols
            .get_or_insert_with(SymbolTable::new);
        table.insert(Symbol {
            name: name.to_string(),
            kind,
        });
        Ok(())
    }

    /// The token naming an identifier node: its single terminal child.
    fn identifier_token(&self, id: NodeId) -> Result<&Token, Error> {
        let node = self.ast.node(id);
        let child = match node.children.first() {
            Some(&child) => child,
            None => return Err(Error::new(ErrorImpl::IdentifierWithoutChild, None)),
        };
        match &self.ast.node(child).token {
            Some(token) => Ok(token),
            None => Err(Error::new(ErrorImpl::IdentifierWithoutChild, None)),
        }
    }

    /// Function names resolve ahead of body traversal, so forward
    /// references between sibling functions are legal. Only top-level
    /// functions exist; the grammar cannot nest them.
    fn hoist_functions(&mut self, root: NodeId) -> Result<(), Error> {
        let parts = self.ast.children(root).to_vec();

        for part in parts {
            let first = match self.ast.children(part).first() {
                Some(&first) => first,
                None => continue,
            };
            if self.ast.kind(first) != NodeKind::Function {
                continue;
            }

            let name_node = match self.ast.children(first).first() {
                Some(&name_node) => name_node,
                None => return Err(Error::new(ErrorImpl::FunctionMissingBody, None)),
            };
            let (name, position) = {
                let token = self.identifier_token(name_node)?;
                (token.text.clone(), Some(token.position()))
            };

            self.try_add_symbol(first, &name, SymbolKind::Function, position)?;
        }

        Ok(())
    }

    /// The body of a function node: its last child, always a statement.
    fn function_body(&self, function: NodeId) -> Result<NodeId, Error> {
        let node = self.ast.node(function);
        if node.kind != NodeKind::Function || node.children.len() < 2 {
            return Err(Error::new(ErrorImpl::FunctionMissingBody, None));
        }

        let body = node.children[node.children.len() - 1];
        if self.ast.kind(body) != NodeKind::Statement {
            return Err(Error::new(ErrorImpl::FunctionMissingBody, None));
        }
        Ok(body)
    }

    /// Visits one node of the postorder walk. Only identifiers matter;
    /// their parent decides between use and declaration.
    fn resolve_scope(&mut self, id: NodeId) -> Result<(), Error> {
        if self.ast.kind(id) != NodeKind::Identifier {
            return Ok(());
        }

        let parent = match self.ast.parent(id) {
            Some(parent) => parent,
            None => return Err(Error::new(ErrorImpl::NodeMissingParent, None)),
        };

        let (name, position) = {
            let token = self.identifier_token(id)?;
            (token.text.clone(), Some(token.position()))
        };

        match self.ast.kind(parent) {
            // identifier in use: check it is declared and of the right kind
            NodeKind::Expression
            | NodeKind::Term
            | NodeKind::Assignment
            | NodeKind::CallExpr
            | NodeKind::CallSt => {
                let is_call = matches!(
                    self.ast.kind(parent),
                    NodeKind::CallExpr | NodeKind::CallSt
                );

                match self.lookup_symbol(id, &name).map(|symbol| symbol.kind) {
                    None => return Err(Error::new(ErrorImpl::UndeclaredUse { name }, position)),
                    Some(kind) => {
                        if is_call && kind != SymbolKind::Function {
                            return Err(Error::new(
                                ErrorImpl::VariableUsedAsFunction { name },
                                position,
                            ));
                        }
                        if !is_call && kind == SymbolKind::Function {
                            return Err(Error::new(
                                ErrorImpl::FunctionUsedAsVariable { name },
                                position,
                            ));
                        }
                    }
                }
            }

            // function name: already hoisted
            NodeKind::Function => {}

            // variable declaration: global at the program level, local
            // inside a block
            NodeKind::Declaration => {
                let grandparent = match self.ast.parent(parent) {
                    Some(grandparent) => grandparent,
                    None => return Err(Error::new(ErrorImpl::NodeMissingParent, None)),
                };
                let kind = match self.ast.kind(grandparent) {
                    NodeKind::ProgramPart => SymbolKind::Global,
                    NodeKind::Statement => SymbolKind::Local,
                    _ => {
                        return Err(Error::new(
                            ErrorImpl::IdentifierInUnexpectedContext,
                            position,
                        ))
                    }
                };
                self.try_add_symbol(id, &name, kind, position)?;
            }

            // function parameter: declared inside the body's scope
            NodeKind::Param => {
                let function = match self.ast.parent(parent) {
                    Some(function) => function,
                    None => return Err(Error::new(ErrorImpl::NodeMissingParent, None)),
                };
                let body = self.function_body(function)?;
                self.try_add_symbol(body, &name, SymbolKind::Arg, position)?;
            }

            _ => {
                return Err(Error::new(
                    ErrorImpl::IdentifierInUnexpectedContext,
                    position,
                ))
            }
        }

        Ok(())
    }

    fn print_sym_tables(&self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.bears_scope(id) {
                match &self.ast.node(id).symbols {
                    None => println!("{}: no symtable.", self.ast.describe_abbrev(id)),
                    Some(table) => {
                        let mut line = format!(
                            "{}: symtable has {}.",
                            self.ast.describe_abbrev(id),
                            table.len()
                        );
                        for symbol in table.iter() {
                            line.push_str(&format!(" {} [{:?}]", symbol.name, symbol.kind));
                        }
                        println!("{}", line);
                    }
                }
            }
            stack.extend(self.ast.children(id).iter().copied());
        }
    }
}
