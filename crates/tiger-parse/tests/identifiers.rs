// Identifier-led expressions: the token after the identifier (and, for `[`,
// the token after the closing bracket) decides the production.

use tiger_ast::ast::{Expr, Lvalue, Program};
use tiger_parse::parse_str;

fn parse_expr(src: &str) -> Expr {
    match parse_str("<mem>", src).expect("parse ok") {
        Some(Program::Expr(e)) => e,
        other => panic!("expected expression program, got {other:?}"),
    }
}

/// Helper: `(name, index count)` for every path segment
fn shape(lv: &Lvalue) -> Vec<(&str, usize)> {
    lv.elems
        .iter()
        .map(|e| (e.name.text.as_str(), e.indices.len()))
        .collect()
}

// ============ Array creation vs indexing ============

#[test]
fn array_creation() {
    let Expr::ArrayCreate { ty, len, init } = parse_expr("a[10] of 0") else {
        panic!("expected ArrayCreate");
    };
    assert_eq!(ty.text, "a");
    assert_eq!(*len, Expr::Int(10));
    assert_eq!(*init, Expr::Int(0));
}

#[test]
fn indexing_without_of() {
    let Expr::Lvalue(lv) = parse_expr("a[10]") else {
        panic!("expected Lvalue");
    };
    assert_eq!(shape(&lv), vec![("a", 1)]);
    assert_eq!(lv.elems[0].indices[0], Expr::Int(10));
}

#[test]
fn array_creation_with_expression_length() {
    let Expr::ArrayCreate { len, init, .. } = parse_expr("intArray [n + 1] of f(0)") else {
        panic!("expected ArrayCreate");
    };
    assert!(matches!(*len, Expr::Chain(_)));
    assert!(matches!(*init, Expr::Call { .. }));
}

#[test]
fn multi_index_and_fields() {
    let Expr::Lvalue(lv) = parse_expr("a[1][2].b.c[3]") else {
        panic!("expected Lvalue");
    };
    assert_eq!(shape(&lv), vec![("a", 2), ("b", 0), ("c", 1)]);
    assert_eq!(lv.path(), "a.b.c");
}

#[test]
fn plain_path() {
    let Expr::Lvalue(lv) = parse_expr("x.y") else {
        panic!("expected Lvalue");
    };
    assert_eq!(shape(&lv), vec![("x", 0), ("y", 0)]);
    assert_eq!(lv.head().map(|h| h.text.as_str()), Some("x"));
}

// ============ Assignment ============

#[test]
fn assign_to_plain_variable() {
    let Expr::Assign { target, value } = parse_expr("x := 5") else {
        panic!("expected Assign");
    };
    assert_eq!(shape(&target), vec![("x", 0)]);
    assert_eq!(*value, Expr::Int(5));
}

#[test]
fn assign_to_indexed_field() {
    let Expr::Assign { target, .. } = parse_expr("a[i].b := nil") else {
        panic!("expected Assign");
    };
    assert_eq!(shape(&target), vec![("a", 1), ("b", 0)]);
}

#[test]
fn assign_to_index_from_bracket_branch() {
    let Expr::Assign { target, value } = parse_expr("row[3] := row[2] + 1") else {
        panic!("expected Assign");
    };
    assert_eq!(shape(&target), vec![("row", 1)]);
    assert!(matches!(*value, Expr::Chain(_)));
}

// ============ Calls ============

#[test]
fn function_call() {
    let Expr::Call { name, args } = parse_expr("f(1, g(2), \"s\")") else {
        panic!("expected Call");
    };
    assert_eq!(name.text, "f");
    assert_eq!(args.len(), 3);
    assert!(matches!(args[1], Expr::Call { .. }));
}

#[test]
fn call_without_args() {
    let Expr::Call { args, .. } = parse_expr("flush()") else {
        panic!("expected Call");
    };
    assert!(args.is_empty());
}

#[test]
fn method_call_on_variable() {
    let Expr::MethodCall {
        object,
        method,
        args,
    } = parse_expr("obj.move(1, 2)")
    else {
        panic!("expected MethodCall");
    };
    assert_eq!(shape(&object), vec![("obj", 0)]);
    assert_eq!(method.text, "move");
    assert_eq!(args.len(), 2);
}

#[test]
fn method_call_ends_the_path() {
    // `.c(` is left for the method call; a.b is the receiver
    let Expr::MethodCall { object, method, .. } = parse_expr("a.b.c()") else {
        panic!("expected MethodCall");
    };
    assert_eq!(shape(&object), vec![("a", 0), ("b", 0)]);
    assert_eq!(method.text, "c");
}

#[test]
fn method_call_on_indexed_receiver() {
    let Expr::MethodCall { object, method, .. } = parse_expr("shapes[i].area()") else {
        panic!("expected MethodCall");
    };
    assert_eq!(shape(&object), vec![("shapes", 1)]);
    assert_eq!(method.text, "area");
}

// ============ Records ============

#[test]
fn record_creation() {
    let Expr::RecordCreate(rc) = parse_expr("point { x = 1, y = 2 + 3 }") else {
        panic!("expected RecordCreate");
    };
    assert_eq!(rc.ty.text, "point");
    let names: Vec<&str> = rc.fields().iter().map(|f| f.text.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(rc.fields().len(), rc.values().len());
    assert_eq!(rc.values()[0], Expr::Int(1));
    assert!(matches!(rc.values()[1], Expr::Chain(_)));
}

#[test]
fn empty_record_creation() {
    let Expr::RecordCreate(rc) = parse_expr("unit {}") else {
        panic!("expected RecordCreate");
    };
    assert!(rc.fields().is_empty());
    assert!(rc.values().is_empty());
}

#[test]
fn nested_record_and_array() {
    let Expr::RecordCreate(rc) = parse_expr("list { head = 1, tail = list { head = 2, tail = nil } }")
    else {
        panic!("expected RecordCreate");
    };
    assert!(matches!(rc.values()[1], Expr::RecordCreate(_)));
}
