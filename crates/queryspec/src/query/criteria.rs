//! Module: query::criteria
//! Responsibility: the typed criteria builder and predicate compiler.
//! Builders grow the condition graph; `compile` walks it against a schema,
//! applies the operator/type rules, and produces an executable filter.

use crate::{
    error::Error,
    query::{
        eval::{Expr, Leaf, eval},
        node::{Combinator, Condition, ConditionGraph, ConditionNode, NodeId, Operator},
    },
    schema::{EntityKind, FieldType, FieldValues, ResolvedField, resolve_path},
    value::{Value, normalize},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, marker::PhantomData};

///
/// Criteria
///
/// A filter under construction, bound to the entity type `E`. Builder calls
/// validate selectors and normalize values eagerly, so a criteria that built
/// without error only fails compilation on operator/type conflicts or after
/// retargeting onto a type with different fields.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Criteria<E: EntityKind> {
    condition: Condition,

    #[serde(skip)]
    marker: PhantomData<fn() -> E>,
}

impl<E: EntityKind> Criteria<E> {
    /// The conjunction identity: compiles to a tautology, and-folds children.
    #[must_use]
    pub fn always() -> Self {
        Self::sentinel(Value::Bool(true), Combinator::And)
    }

    /// The disjunction identity: compiles to a contradiction, or-folds
    /// children.
    #[must_use]
    pub fn never() -> Self {
        Self::sentinel(Value::Bool(false), Combinator::Or)
    }

    fn sentinel(value: Value, combinator: Combinator) -> Self {
        Self {
            condition: Condition {
                entity: E::PATH.to_string(),
                graph: ConditionGraph::with_root(Operator::None, value, combinator),
            },
            marker: PhantomData,
        }
    }

    /// Append a leaf test tagged `And`.
    ///
    /// # Errors
    /// Fails when the selector does not resolve on `E`, or the value cannot
    /// be normalized to the field's type.
    pub fn and(
        self,
        selector: &str,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Result<Self, Error> {
        self.leaf(selector, operator, value.into(), Combinator::And)
    }

    /// Append a leaf test tagged `Or`.
    ///
    /// # Errors
    /// Same failure modes as [`Criteria::and`].
    pub fn or(
        self,
        selector: &str,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Result<Self, Error> {
        self.leaf(selector, operator, value.into(), Combinator::Or)
    }

    // Membership values are validated structurally at compile time instead of
    // being normalized here; everything else is coerced to the field's type.
    fn leaf(
        mut self,
        selector: &str,
        operator: Operator,
        value: Value,
        combinator: Combinator,
    ) -> Result<Self, Error> {
        let resolved = resolve_path(E::SCHEMA, selector)?;

        let value = if operator.is_membership() {
            value
        } else {
            normalize(resolved.ty, resolved.nullable, value)?
        };

        self.condition
            .graph
            .push_leaf(selector.to_string(), operator, value, combinator);

        Ok(self)
    }

    /// Attach another criteria's whole graph as one child and retag this
    /// root's fold operator to `And`.
    ///
    /// # Errors
    /// Fails with [`Error::TypeMismatch`] when the two criteria were built
    /// against different entity types.
    pub fn and_criteria(self, other: &Self) -> Result<Self, Error> {
        self.merge(other, Combinator::And)
    }

    /// Attach another criteria's whole graph as one child and retag this
    /// root's fold operator to `Or`.
    ///
    /// # Errors
    /// Same failure modes as [`Criteria::and_criteria`].
    pub fn or_criteria(self, other: &Self) -> Result<Self, Error> {
        self.merge(other, Combinator::Or)
    }

    fn merge(mut self, other: &Self, combinator: Combinator) -> Result<Self, Error> {
        if self.condition.entity != other.condition.entity {
            return Err(Error::TypeMismatch {
                expected: self.condition.entity.clone(),
                found: other.condition.entity.clone(),
            });
        }

        self.condition.graph.retag_root(combinator);
        self.condition.graph.graft(&other.condition.graph);

        Ok(self)
    }

    /// Deep-copy the graph and rebind it to another entity type. Selector
    /// resolution against `N` happens at the next compile, not here.
    #[must_use]
    pub fn retarget<N: EntityKind>(&self) -> Criteria<N> {
        Criteria {
            condition: Condition {
                entity: N::PATH.to_string(),
                graph: self.condition.graph.clone(),
            },
            marker: PhantomData,
        }
    }

    /// Compile into an executable predicate over `E`.
    ///
    /// # Errors
    /// Fails when a selector in the graph does not resolve on `E`, or an
    /// operator is applied to an incompatible field type.
    pub fn compile(&self) -> Result<Filter<E>, Error> {
        self.compile_for::<E>()
    }

    /// Compile against a different entity type, typically after loading a
    /// serialized criteria whose binding the caller knows better than the
    /// stored entity name.
    ///
    /// # Errors
    /// Same failure modes as [`Criteria::compile`].
    pub fn compile_for<D: EntityKind>(&self) -> Result<Filter<D>, Error> {
        let graph = &self.condition.graph;
        let mut visited = BTreeSet::new();
        let expr = compile_node::<D>(graph, graph.root(), &mut visited)?;

        Ok(Filter {
            expr,
            marker: PhantomData,
        })
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[cfg(test)]
    pub(crate) fn graph(&self) -> &ConditionGraph {
        &self.condition.graph
    }

    #[cfg(test)]
    pub(crate) fn graph_mut(&mut self) -> &mut ConditionGraph {
        &mut self.condition.graph
    }
}

// Compile one node: its own leaf test first, then each child folded in
// left-to-right with this node's combinator. The visited set spans one
// compile call; a child already folded under an earlier parent is skipped,
// which only shrinks the expression since AND/OR are idempotent. Under a
// `None` combinator children are marked visited but never folded.
fn compile_node<D: EntityKind>(
    graph: &ConditionGraph,
    id: NodeId,
    visited: &mut BTreeSet<NodeId>,
) -> Result<Expr, Error> {
    let node = graph.node(id).ok_or_else(|| Error::Encode {
        message: format!("condition graph references unknown node {id:?}"),
    })?;

    let mut expr = compile_leaf::<D>(node)?;

    for child in &node.children {
        if !visited.insert(*child) {
            continue;
        }

        match node.combinator {
            Combinator::And => {
                let folded = compile_node::<D>(graph, *child, visited)?;
                expr = Expr::And(Box::new(expr), Box::new(folded));
            }
            Combinator::Or => {
                let folded = compile_node::<D>(graph, *child, visited)?;
                expr = Expr::Or(Box::new(expr), Box::new(folded));
            }
            Combinator::None => {}
        }
    }

    Ok(expr)
}

fn compile_leaf<D: EntityKind>(node: &ConditionNode) -> Result<Expr, Error> {
    if node.operator == Operator::None {
        return match node.value {
            Value::Bool(constant) => Ok(Expr::Const(constant)),
            _ => Err(Error::unsupported_operator(
                Operator::None,
                node.selector.clone().unwrap_or_default(),
                "sentinel nodes require a boolean value",
            )),
        };
    }

    let selector = node
        .selector
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            Error::invalid_selector(
                node.selector.clone().unwrap_or_default(),
                D::PATH,
                "selector is empty",
            )
        })?;

    let resolved = resolve_path(D::SCHEMA, selector)?;
    check_operator(node, selector, &resolved)?;

    Ok(Expr::Leaf(Leaf {
        segments: resolved.segments,
        operator: node.operator,
        value: node.value.clone(),
        field_is_text: resolved.ty.is_text(),
    }))
}

fn check_operator(
    node: &ConditionNode,
    selector: &str,
    resolved: &ResolvedField,
) -> Result<(), Error> {
    let op = node.operator;
    let ty = resolved.ty;

    if op.is_membership() {
        if ty.is_text() {
            return Err(Error::unsupported_operator(
                op,
                selector,
                "textual membership must use the Like family",
            ));
        }
        if node.value.as_list().is_none() {
            return Err(Error::unsupported_operator(
                op,
                selector,
                "membership value must be a collection",
            ));
        }
    }

    if op.is_text_match() && !ty.is_text() && !ty.is_numeric() {
        return Err(Error::unsupported_operator(
            op,
            selector,
            "pattern matching requires a textual or numeric field",
        ));
    }

    if op.is_relational() && !is_orderable(ty) {
        return Err(Error::unsupported_operator(
            op,
            selector,
            "relational comparison requires an orderable field",
        ));
    }

    Ok(())
}

fn is_orderable(ty: FieldType) -> bool {
    ty.is_numeric() || ty.is_text() || matches!(ty, FieldType::Date | FieldType::DateTime)
}

///
/// Filter
///
/// A compiled predicate. Stateless once built, so a single filter may be
/// applied concurrently to independent records.
///

#[derive(Debug)]
pub struct Filter<E: FieldValues> {
    expr: Expr,
    marker: PhantomData<fn(&E)>,
}

impl<E: FieldValues> Filter<E> {
    #[must_use]
    pub fn matches(&self, record: &E) -> bool {
        eval(&self.expr, record)
    }

    /// Consume the filter into a plain closure for handing to an execution
    /// backend.
    pub fn into_fn(self) -> impl Fn(&E) -> bool {
        move |record| eval(&self.expr, record)
    }
}
