//! Unit tests for the shift-reduce parser.

use super::parser::parse;
use crate::ast::ast::{Ast, NodeId, NodeKind};
use crate::cli::cli::OutputLevel;
use crate::errors::errors::Error;
use crate::lexer::lexer::tokenize;

fn parse_source(source: &str) -> Result<Ast, Error> {
    let tokens = tokenize(source).unwrap();
    parse(tokens, OutputLevel::Silent)
}

fn root_parts(ast: &Ast) -> Vec<NodeId> {
    ast.children(ast.root().unwrap()).to_vec()
}

/// The single child of a ProgramPart.
fn part_content(ast: &Ast, index: usize) -> NodeId {
    let part = root_parts(ast)[index];
    assert_eq!(ast.kind(part), NodeKind::ProgramPart);
    ast.children(part)[0]
}

fn first_leaf_text(ast: &Ast, id: NodeId) -> String {
    ast.node(ast.first_leaf(id))
        .token
        .as_ref()
        .unwrap()
        .text
        .clone()
}

/// Strips Statement wrappers off a leaf statement.
fn statement_content(ast: &Ast, id: NodeId) -> NodeId {
    assert_eq!(ast.kind(id), NodeKind::Statement);
    ast.children(id)[0]
}

#[test]
fn test_parse_declaration() {
    let ast = parse_source("int x = 42;").unwrap();

    let parts = root_parts(&ast);
    assert_eq!(parts.len(), 1);

    let declaration = part_content(&ast, 0);
    assert_eq!(ast.kind(declaration), NodeKind::Declaration);

    let children = ast.children(declaration);
    assert_eq!(children.len(), 3);
    assert_eq!(ast.kind(children[0]), NodeKind::Type);
    assert_eq!(ast.kind(children[1]), NodeKind::Identifier);
    assert_eq!(ast.kind(children[2]), NodeKind::Expression);
    assert_eq!(first_leaf_text(&ast, children[1]), "x");
}

#[test]
fn test_parse_program_parts() {
    let ast = parse_source("int x = 1; int y = x; fn f() { ; }").unwrap();

    let parts = root_parts(&ast);
    assert_eq!(parts.len(), 3);
    for part in parts {
        assert_eq!(ast.kind(part), NodeKind::ProgramPart);
    }
}

#[test]
fn test_parse_noop() {
    let ast = parse_source(";").unwrap();

    let statement = part_content(&ast, 0);
    let noop = statement_content(&ast, statement);
    assert_eq!(ast.kind(noop), NodeKind::Noop);
}

#[test]
fn test_parse_empty_program() {
    let result = parse_source("");
    assert_eq!(result.err().unwrap().get_error_name(), "EmptyProgram");

    let result = parse_source("// only a comment\n");
    assert_eq!(result.err().unwrap().get_error_name(), "EmptyProgram");
}

#[test]
fn test_precedence_multiplication_binds_first() {
    let ast = parse_source("int r = a + b * c;").unwrap();

    let declaration = part_content(&ast, 0);
    let expression = ast.children(declaration)[2];

    // a + (b * c): the product is the right operand of the sum
    let children = ast.children(expression);
    assert_eq!(children.len(), 3);
    assert_eq!(first_leaf_text(&ast, children[0]), "a");
    assert_eq!(ast.kind(children[1]), NodeKind::BinaryOp);
    assert_eq!(first_leaf_text(&ast, children[1]), "+");

    let product = children[2];
    assert_eq!(ast.kind(product), NodeKind::Expression);
    let product_children = ast.children(product);
    assert_eq!(product_children.len(), 3);
    assert_eq!(first_leaf_text(&ast, product_children[0]), "b");
    assert_eq!(first_leaf_text(&ast, product_children[1]), "*");
    assert_eq!(first_leaf_text(&ast, product_children[2]), "c");
}

#[test]
fn test_left_associativity() {
    let ast = parse_source("int r = a - b - c;").unwrap();

    let declaration = part_content(&ast, 0);
    let expression = ast.children(declaration)[2];

    // (a - b) - c: the left operand is the compound
    let children = ast.children(expression);
    assert_eq!(children.len(), 3);
    assert_eq!(first_leaf_text(&ast, children[2]), "c");

    let left = children[0];
    assert_eq!(ast.kind(left), NodeKind::Expression);
    let left_children = ast.children(left);
    assert_eq!(left_children.len(), 3);
    assert_eq!(first_leaf_text(&ast, left_children[0]), "a");
    assert_eq!(first_leaf_text(&ast, left_children[2]), "b");
}

#[test]
fn test_parse_paren_grouping() {
    let ast = parse_source("int r = (a + b) * c;").unwrap();

    let declaration = part_content(&ast, 0);
    let expression = ast.children(declaration)[2];

    let children = ast.children(expression);
    assert_eq!(children.len(), 3);
    assert_eq!(first_leaf_text(&ast, children[1]), "*");

    // the parenthesized sum is the left operand, parens dropped
    let sum = children[0];
    assert_eq!(ast.kind(sum), NodeKind::Expression);
    assert_eq!(ast.children(sum).len(), 3);
    assert_eq!(first_leaf_text(&ast, ast.children(sum)[1]), "+");
}

#[test]
fn test_parse_not_expression() {
    let ast = parse_source("bool b = not x;").unwrap();

    let declaration = part_content(&ast, 0);
    let expression = ast.children(declaration)[2];

    let children = ast.children(expression);
    assert_eq!(children.len(), 2);
    assert_eq!(first_leaf_text(&ast, children[0]), "not");
    assert_eq!(ast.kind(children[1]), NodeKind::Expression);
}

#[test]
fn test_parse_if_statement() {
    let ast = parse_source("if x : { ; }").unwrap();

    let statement = part_content(&ast, 0);
    let if_st = statement_content(&ast, statement);
    assert_eq!(ast.kind(if_st), NodeKind::IfSt);

    let children = ast.children(if_st);
    assert_eq!(children.len(), 3);
    assert_eq!(first_leaf_text(&ast, children[0]), "if");
    assert_eq!(ast.kind(children[1]), NodeKind::Expression);
    assert_eq!(ast.kind(children[2]), NodeKind::Statement);
}

#[test]
fn test_parse_if_else_statement() {
    let ast = parse_source("if x : { ; } else { ; }").unwrap();

    let statement = part_content(&ast, 0);
    let if_st = statement_content(&ast, statement);
    assert_eq!(ast.kind(if_st), NodeKind::IfSt);

    let children = ast.children(if_st);
    assert_eq!(children.len(), 4);
    assert_eq!(ast.kind(children[2]), NodeKind::Statement);
    assert_eq!(ast.kind(children[3]), NodeKind::Statement);
}

#[test]
fn test_parse_else_if_chain() {
    let ast = parse_source("if x : { ; } else if y : { ; } else { ; }").unwrap();

    let statement = part_content(&ast, 0);
    let outer = statement_content(&ast, statement);
    assert_eq!(ast.kind(outer), NodeKind::IfSt);
    assert_eq!(ast.children(outer).len(), 4);

    // the else branch holds the nested if
    let else_branch = ast.children(outer)[3];
    let nested = statement_content(&ast, else_branch);
    assert_eq!(ast.kind(nested), NodeKind::IfSt);
    assert_eq!(ast.children(nested).len(), 4);
}

#[test]
fn test_parse_while_statement() {
    let ast = parse_source("while x < 3 : { ; }").unwrap();

    let statement = part_content(&ast, 0);
    let while_st = statement_content(&ast, statement);
    assert_eq!(ast.kind(while_st), NodeKind::WhileSt);

    let children = ast.children(while_st);
    assert_eq!(children.len(), 3);
    assert_eq!(ast.kind(children[1]), NodeKind::Expression);
    assert_eq!(ast.kind(children[2]), NodeKind::Statement);
}

#[test]
fn test_parse_loop_statement() {
    let ast = parse_source("loop { break; next; }").unwrap();

    let statement = part_content(&ast, 0);
    let loop_st = statement_content(&ast, statement);
    assert_eq!(ast.kind(loop_st), NodeKind::LoopSt);

    let body = ast.children(loop_st)[1];
    let inner: Vec<NodeKind> = ast
        .children(body)
        .iter()
        .map(|&id| ast.kind(statement_content(&ast, id)))
        .collect();
    assert_eq!(inner, vec![NodeKind::BreakSt, NodeKind::NextSt]);
}

#[test]
fn test_parse_match_statement() {
    let ast = parse_source("match x : 1 -> { ; } , 2 -> { ; } ;").unwrap();

    let statement = part_content(&ast, 0);
    let match_st = statement_content(&ast, statement);
    assert_eq!(ast.kind(match_st), NodeKind::MatchSt);

    // keyword, scrutinee, then alternating arm pattern and body
    let children = ast.children(match_st);
    assert_eq!(children.len(), 6);
    assert_eq!(first_leaf_text(&ast, children[0]), "match");
    assert_eq!(ast.kind(children[1]), NodeKind::Expression);
    assert_eq!(ast.kind(children[2]), NodeKind::Expression);
    assert_eq!(ast.kind(children[3]), NodeKind::Statement);
    assert_eq!(ast.kind(children[4]), NodeKind::Expression);
    assert_eq!(ast.kind(children[5]), NodeKind::Statement);
    assert_eq!(first_leaf_text(&ast, children[2]), "1");
    assert_eq!(first_leaf_text(&ast, children[4]), "2");
}

#[test]
fn test_parse_function() {
    let ast = parse_source("fn add(int a, int b) { ; }").unwrap();

    let function = part_content(&ast, 0);
    assert_eq!(ast.kind(function), NodeKind::Function);

    let children = ast.children(function);
    assert_eq!(children.len(), 4);
    assert_eq!(ast.kind(children[0]), NodeKind::Identifier);
    assert_eq!(first_leaf_text(&ast, children[0]), "add");
    assert_eq!(ast.kind(children[1]), NodeKind::Param);
    assert_eq!(ast.kind(children[2]), NodeKind::Param);
    assert_eq!(ast.kind(children[3]), NodeKind::Statement);

    let param = ast.children(children[1]);
    assert_eq!(ast.kind(param[0]), NodeKind::Type);
    assert_eq!(ast.kind(param[1]), NodeKind::Identifier);
    assert_eq!(first_leaf_text(&ast, param[1]), "a");
}

#[test]
fn test_parse_function_without_params() {
    let ast = parse_source("fn main() { ; }").unwrap();

    let function = part_content(&ast, 0);
    assert_eq!(ast.kind(function), NodeKind::Function);

    let children = ast.children(function);
    assert_eq!(children.len(), 2);
    assert_eq!(ast.kind(children[0]), NodeKind::Identifier);
    assert_eq!(ast.kind(children[1]), NodeKind::Statement);
}

#[test]
fn test_parse_empty_block() {
    let ast = parse_source("fn main() {}").unwrap();

    let function = part_content(&ast, 0);
    let body = *ast.children(function).last().unwrap();
    assert_eq!(ast.kind(body), NodeKind::Statement);

    // an empty block holds a single empty statement
    let inner = ast.children(body);
    assert_eq!(inner.len(), 1);
    assert_eq!(
        ast.kind(statement_content(&ast, inner[0])),
        NodeKind::Noop
    );
}

#[test]
fn test_parse_call_expression() {
    let ast = parse_source("x = f(1, 2);").unwrap();

    let statement = part_content(&ast, 0);
    let assignment = statement_content(&ast, statement);
    assert_eq!(ast.kind(assignment), NodeKind::Assignment);

    // unwrap EXPR -> TERM -> CALL
    let expression = ast.children(assignment)[1];
    let term = ast.children(expression)[0];
    let call = ast.children(term)[0];
    assert_eq!(ast.kind(call), NodeKind::CallExpr);

    let children = ast.children(call);
    assert_eq!(children.len(), 2);
    assert_eq!(first_leaf_text(&ast, children[0]), "f");
    assert_eq!(ast.kind(children[1]), NodeKind::Arg);
    assert_eq!(ast.children(children[1]).len(), 2);
}

#[test]
fn test_parse_call_statement() {
    let ast = parse_source("f(1);").unwrap();

    let statement = part_content(&ast, 0);
    let call_st = statement_content(&ast, statement);
    assert_eq!(ast.kind(call_st), NodeKind::CallSt);

    let call = ast.children(call_st)[0];
    assert_eq!(ast.kind(call), NodeKind::CallExpr);
    assert_eq!(ast.children(call).len(), 2);
}

#[test]
fn test_parse_call_without_arguments() {
    let ast = parse_source("f();").unwrap();

    let statement = part_content(&ast, 0);
    let call_st = statement_content(&ast, statement);
    let call = ast.children(call_st)[0];

    // no Arg node for an empty argument list
    assert_eq!(ast.children(call).len(), 1);
    assert_eq!(ast.kind(ast.children(call)[0]), NodeKind::Identifier);
}

#[test]
fn test_parse_nested_call() {
    let ast = parse_source("x = f(g(1));").unwrap();

    let statement = part_content(&ast, 0);
    let assignment = statement_content(&ast, statement);
    let expression = ast.children(assignment)[1];
    let call = ast.children(ast.children(expression)[0])[0];
    assert_eq!(ast.kind(call), NodeKind::CallExpr);

    let arg = ast.children(call)[1];
    let inner_expr = ast.children(arg)[0];
    let inner_call = ast.children(ast.children(inner_expr)[0])[0];
    assert_eq!(ast.kind(inner_call), NodeKind::CallExpr);
    assert_eq!(first_leaf_text(&ast, inner_call), "g");
}

#[test]
fn test_parse_assignment() {
    let ast = parse_source("x = 1;").unwrap();

    let statement = part_content(&ast, 0);
    let assignment = statement_content(&ast, statement);
    assert_eq!(ast.kind(assignment), NodeKind::Assignment);

    let children = ast.children(assignment);
    assert_eq!(children.len(), 2);
    assert_eq!(ast.kind(children[0]), NodeKind::Identifier);
    assert_eq!(ast.kind(children[1]), NodeKind::Expression);
}

#[test]
fn test_declaration_inside_block_is_statement() {
    let ast = parse_source("fn f() { int a = 1; }").unwrap();

    let function = part_content(&ast, 0);
    let body = *ast.children(function).last().unwrap();
    let declaration = statement_content(&ast, ast.children(body)[0]);
    assert_eq!(ast.kind(declaration), NodeKind::Declaration);
}

#[test]
fn test_error_unexpected_before_statement() {
    let result = parse_source("int x = 1 + 2 break;");

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "UnexpectedBeforeStatement");
    assert!(error.to_string().contains("expression"));
}

#[test]
fn test_error_expected_expression_before_operator() {
    let result = parse_source("int x = * 2;");

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "ExpectedExpressionBeforeOperator");
}

#[test]
fn test_error_assignment_to_literal() {
    let result = parse_source("2 = 3;");

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "AssignmentToInvalidTarget");
    assert!(error.to_string().contains("expression"));
}

#[test]
fn test_error_assignment_without_context() {
    let result = parse_source("int x = 1 y = 2;");

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "AssignmentToUndeclared");
    assert!(error.to_string().contains("y"));
}

#[test]
fn test_error_unbalanced_parenthesis() {
    let result = parse_source("int x = 1);");

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_error_trailing_expression_at_root() {
    let result = parse_source("fn f() { ; } 5");

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "UnexpectedAtRootLevel");
}

#[test]
fn test_error_unclosed_block() {
    let result = parse_source("fn f() { ;");

    assert!(result.is_err());
}

#[test]
fn test_error_trailing_comma_in_call() {
    let result = parse_source("x = f(1,);");

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "UnexpectedInArgumentList");
}

#[test]
fn test_error_unclosed_parenthesis() {
    let result = parse_source("int x = (1;");

    assert!(result.is_err());
}
