//! Module: query
//! Responsibility: everything between a fluent builder call and an
//! executable artifact: the condition-node graph, the criteria and sort
//! compilers, and the compiled predicate/comparator forms.

pub mod criteria;
mod eval;
pub mod node;
pub mod sort;

#[cfg(test)]
mod tests;

pub use criteria::{Criteria, Filter};
pub use node::{Combinator, Condition, ConditionGraph, ConditionNode, NodeId, Operator};
pub use sort::{Direction, SortCondition, SortItem, Sorter};
