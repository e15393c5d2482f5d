//! Module: query::eval
//! Responsibility: the compiled predicate form and its evaluation against
//! records. Compilation (graph walking, type checks) lives in
//! query::criteria; this module only runs what compilation produced.

use crate::{
    query::node::Operator,
    schema::{FieldPresence, FieldValues, read_path},
    value::Value,
};
use std::cmp::Ordering;

///
/// Expr
///
/// Compiled boolean expression. Leaves carry everything needed to test one
/// field, so evaluation never touches the schema or the node graph.
///

#[derive(Clone, Debug)]
pub(crate) enum Expr {
    Const(bool),
    Leaf(Leaf),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

#[derive(Clone, Debug)]
pub(crate) struct Leaf {
    pub segments: Vec<String>,
    pub operator: Operator,
    pub value: Value,
    pub field_is_text: bool,
}

pub(crate) fn eval(expr: &Expr, record: &dyn FieldValues) -> bool {
    match expr {
        Expr::Const(constant) => *constant,
        Expr::Leaf(leaf) => eval_leaf(leaf, record),
        Expr::And(left, right) => eval(left, record) && eval(right, record),
        Expr::Or(left, right) => eval(left, record) || eval(right, record),
    }
}

// A field the record does not expose fails every test, null tests included:
// absence is not the same observation as an explicit null.
fn eval_leaf(leaf: &Leaf, record: &dyn FieldValues) -> bool {
    let field = match read_path(record, &leaf.segments) {
        FieldPresence::Present(value) => value,
        FieldPresence::Missing => return false,
    };

    match leaf.operator {
        Operator::Equal => Value::loose_eq(&field, &leaf.value),
        Operator::NotEqual => !Value::loose_eq(&field, &leaf.value),

        Operator::Contain => field.in_list(&leaf.value).unwrap_or(false),
        Operator::NotContain => !field.in_list(&leaf.value).unwrap_or(false),

        Operator::Like => text_match(leaf, &field, TextOp::Contains).unwrap_or(false),
        Operator::NotLike => !text_match(leaf, &field, TextOp::Contains).unwrap_or(false),
        Operator::StartsWith => text_match(leaf, &field, TextOp::StartsWith).unwrap_or(false),
        Operator::NotStartsWith => !text_match(leaf, &field, TextOp::StartsWith).unwrap_or(false),
        Operator::EndsWith => text_match(leaf, &field, TextOp::EndsWith).unwrap_or(false),
        Operator::NotEndsWith => !text_match(leaf, &field, TextOp::EndsWith).unwrap_or(false),

        Operator::GreaterThan => matches!(order(&field, &leaf.value), Some(Ordering::Greater)),
        Operator::GreaterThanOrEqual => matches!(
            order(&field, &leaf.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::LessThan => matches!(order(&field, &leaf.value), Some(Ordering::Less)),
        Operator::LessThanOrEqual => matches!(
            order(&field, &leaf.value),
            Some(Ordering::Less | Ordering::Equal)
        ),

        Operator::IsNull => field == Value::Null,
        Operator::IsNotNull => field != Value::Null,

        // compilation turns None into Const; a stray leaf matches nothing
        Operator::None => false,
    }
}

#[derive(Clone, Copy)]
enum TextOp {
    Contains,
    StartsWith,
    EndsWith,
}

// Textual fields match directly; any other orderable field is rendered to
// text first, with the edge relevant to the match trimmed away so a rendered
// "42" still starts with "4" after incidental whitespace.
fn text_match(leaf: &Leaf, field: &Value, op: TextOp) -> Option<bool> {
    if leaf.field_is_text {
        return match op {
            TextOp::Contains => field.text_contains(&leaf.value),
            TextOp::StartsWith => field.text_starts_with(&leaf.value),
            TextOp::EndsWith => field.text_ends_with(&leaf.value),
        };
    }

    let rendered = field.render_text()?;
    let needle = leaf.value.render_text()?;

    Some(match op {
        TextOp::Contains => rendered.trim().contains(&needle),
        TextOp::StartsWith => rendered.trim_start().starts_with(&needle),
        TextOp::EndsWith => rendered.trim_end().ends_with(&needle),
    })
}

// Relational comparisons: numeric widening when both sides are numeric,
// lexical for text, same-variant ordering otherwise (dates). Incomparable
// pairs yield no ordering and the test fails.
fn order(field: &Value, target: &Value) -> Option<Ordering> {
    if field.is_numeric() && target.is_numeric() {
        field.cmp_numeric(target)
    } else {
        Value::strict_order_cmp(field, target)
    }
}
