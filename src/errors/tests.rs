//! Unit tests for error handling.

use super::errors::{Error, ErrorImpl};
use crate::Position;

#[test]
fn test_error_name() {
    let error = Error::new(
        ErrorImpl::UnrecognisedCharacter { character: '@' },
        Some(Position { line: 1, column: 9 }),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedCharacter");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::Redeclaration {
            name: "x".to_string(),
        },
        Some(Position { line: 3, column: 5 }),
    );

    let position = error.get_position().unwrap();
    assert_eq!(position.line, 3);
    assert_eq!(position.column, 5);
}

#[test]
fn test_error_without_position() {
    let error = Error::new(ErrorImpl::EmptyProgram, None);

    assert!(error.get_position().is_none());
    assert_eq!(error.get_error_name(), "EmptyProgram");
}

#[test]
fn test_error_message() {
    let error = Error::new(
        ErrorImpl::UndeclaredUse {
            name: "foo".to_string(),
        },
        None,
    );

    assert_eq!(
        error.to_string(),
        "use of undeclared variable or function \"foo\""
    );
}

#[test]
fn test_kind_mismatch_messages() {
    let error = Error::new(
        ErrorImpl::VariableUsedAsFunction {
            name: "x".to_string(),
        },
        None,
    );
    assert_eq!(
        error.to_string(),
        "\"x\" has previously been declared as a variable, not a function"
    );

    let error = Error::new(
        ErrorImpl::FunctionUsedAsVariable {
            name: "f".to_string(),
        },
        None,
    );
    assert_eq!(
        error.to_string(),
        "\"f\" has been declared as a function, not a variable"
    );
}

#[test]
fn test_user_errors_are_not_internal() {
    let error = Error::new(
        ErrorImpl::UnexpectedBeforeStatement {
            construct: "expression".to_string(),
        },
        None,
    );

    assert!(!error.is_internal());
}

#[test]
fn test_internal_errors_are_flagged() {
    assert!(Error::new(ErrorImpl::NodeMissingParent, None).is_internal());
    assert!(Error::new(ErrorImpl::IdentifierWithoutChild, None).is_internal());
    assert!(Error::new(ErrorImpl::FunctionMissingBody, None).is_internal());
    assert!(Error::new(ErrorImpl::NodeWithoutScope, None).is_internal());
}
