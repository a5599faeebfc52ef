use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A fatal compilation error: what went wrong plus, when known, where.
///
/// Every error is terminal. The passes return it up through `Result` and
/// the top-level handler formats it once and exits non-zero.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(kind: ErrorImpl, position: Option<Position>) -> Self {
        Error { kind, position }
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.kind
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            ErrorImpl::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedBeforeStatement { .. } => "UnexpectedBeforeStatement",
            ErrorImpl::ExpectedExpressionBeforeOperator { .. } => {
                "ExpectedExpressionBeforeOperator"
            }
            ErrorImpl::UnexpectedAtRootLevel { .. } => "UnexpectedAtRootLevel",
            ErrorImpl::UnexpectedInBlock { .. } => "UnexpectedInBlock",
            ErrorImpl::UnexpectedInParameterList { .. } => "UnexpectedInParameterList",
            ErrorImpl::UnexpectedInArgumentList { .. } => "UnexpectedInArgumentList",
            ErrorImpl::AssignmentToUndeclared { .. } => "AssignmentToUndeclared",
            ErrorImpl::AssignmentToInvalidTarget { .. } => "AssignmentToInvalidTarget",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::EmptyProgram => "EmptyProgram",
            ErrorImpl::Redeclaration { .. } => "Redeclaration",
            ErrorImpl::UndeclaredUse { .. } => "UndeclaredUse",
            ErrorImpl::VariableUsedAsFunction { .. } => "VariableUsedAsFunction",
            ErrorImpl::FunctionUsedAsVariable { .. } => "FunctionUsedAsVariable",
            ErrorImpl::NodeMissingParent => "NodeMissingParent",
            ErrorImpl::IdentifierWithoutChild => "IdentifierWithoutChild",
            ErrorImpl::FunctionMissingBody => "FunctionMissingBody",
            ErrorImpl::NodeWithoutScope => "NodeWithoutScope",
            ErrorImpl::IdentifierInUnexpectedContext => "IdentifierInUnexpectedContext",
        }
    }

    /// Internal-bug errors signal a violated structural invariant of the
    /// tree or traversal. They are always a defect in the parser or
    /// resolver, never bad user input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self.kind,
            ErrorImpl::NodeMissingParent
                | ErrorImpl::IdentifierWithoutChild
                | ErrorImpl::FunctionMissingBody
                | ErrorImpl::NodeWithoutScope
                | ErrorImpl::IdentifierInUnexpectedContext
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    // lexer
    #[error("unrecognised character {character:?}")]
    UnrecognisedCharacter { character: char },
    #[error("line break in the middle of a string")]
    UnterminatedString,

    // parser
    #[error("unexpected token {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected {construct} before statement")]
    UnexpectedBeforeStatement { construct: String },
    #[error("expected expression before operator, found {construct}")]
    ExpectedExpressionBeforeOperator { construct: String },
    #[error("unexpected {construct} at program root level")]
    UnexpectedAtRootLevel { construct: String },
    #[error("unexpected {construct} in statement block")]
    UnexpectedInBlock { construct: String },
    #[error("unexpected {construct} in parameter list")]
    UnexpectedInParameterList { construct: String },
    #[error("unexpected {construct} in argument list")]
    UnexpectedInArgumentList { construct: String },
    #[error("assignment to undeclared variable {name:?}")]
    AssignmentToUndeclared { name: String },
    #[error("assignment to {construct}")]
    AssignmentToInvalidTarget { construct: String },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("empty program")]
    EmptyProgram,

    // scope resolver
    #[error("redeclaration of {name:?}")]
    Redeclaration { name: String },
    #[error("use of undeclared variable or function {name:?}")]
    UndeclaredUse { name: String },
    #[error("{name:?} has previously been declared as a variable, not a function")]
    VariableUsedAsFunction { name: String },
    #[error("{name:?} has been declared as a function, not a variable")]
    FunctionUsedAsVariable { name: String },

    // structural invariant violations
    #[error("AST node missing parent")]
    NodeMissingParent,
    #[error("identifier node without child")]
    IdentifierWithoutChild,
    #[error("function node missing body")]
    FunctionMissingBody,
    #[error("AST node without enclosing scope")]
    NodeWithoutScope,
    #[error("identifier in unexpected context")]
    IdentifierInUnexpectedContext,
}
