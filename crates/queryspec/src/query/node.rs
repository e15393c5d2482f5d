//! Module: query::node
//! Responsibility: the condition-node arena: operators, combinators, node
//! storage, and graph surgery (attach/graft/copy).
//! Does not own: selector resolution or predicate compilation.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Operator
///
/// Leaf test applied at a condition node. Serialized by stable name.
/// `None` is the sentinel used by the always-true/always-false roots.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Operator {
    Equal,
    NotEqual,
    /// Collection membership; rejected on textual fields (use Like).
    Contain,
    NotContain,
    /// Substring test; numeric fields are rendered to text first.
    Like,
    NotLike,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// Null test; the stored value is ignored.
    IsNull,
    IsNotNull,
    None,
}

impl Operator {
    #[must_use]
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::Contain | Self::NotContain)
    }

    #[must_use]
    pub const fn is_text_match(self) -> bool {
        matches!(
            self,
            Self::Like
                | Self::NotLike
                | Self::StartsWith
                | Self::NotStartsWith
                | Self::EndsWith
                | Self::NotEndsWith
        )
    }

    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterThanOrEqual | Self::LessThan | Self::LessThanOrEqual
        )
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::Contain => "Contain",
            Self::NotContain => "NotContain",
            Self::Like => "Like",
            Self::NotLike => "NotLike",
            Self::StartsWith => "StartsWith",
            Self::NotStartsWith => "NotStartsWith",
            Self::EndsWith => "EndsWith",
            Self::NotEndsWith => "NotEndsWith",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanOrEqual => "GreaterThanOrEqual",
            Self::LessThan => "LessThan",
            Self::LessThanOrEqual => "LessThanOrEqual",
            Self::IsNull => "IsNull",
            Self::IsNotNull => "IsNotNull",
            Self::None => "None",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// Combinator
///
/// The logical operator a node uses to fold itself with each of its
/// children. `None` folds nothing: children are ignored.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Combinator {
    #[default]
    And,
    Or,
    None,
}

///
/// NodeId
///
/// Identity assigned at node construction, stable for the lifetime of the
/// owning graph. Used for duplicate-fold guarding and reference-preserving
/// serialization, never for equality of node contents.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub(crate) const fn get(self) -> u64 {
        self.0
    }
}

///
/// ConditionNode
///
/// One node of the boolean-expression DAG: a leaf test plus the combinator
/// governing how the node folds with its children. Children are id
/// references into the owning graph's arena, so a subtree shared by two
/// parents is stored (and serialized) once.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConditionNode {
    pub id: NodeId,
    /// Dotted field path; None for the sentinel roots.
    pub selector: Option<String>,
    pub operator: Operator,
    pub value: Value,
    /// Portable encoding of `value`, kept in sync by the constructor so the
    /// node round-trips through text even when the native value is dropped.
    pub serialized_value: String,
    pub combinator: Combinator,
    pub children: Vec<NodeId>,
}

// Value serialization cannot fail for the variants builders construct; a
// defect here degrades the portable form, never panics.
fn portable(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

///
/// ConditionGraph
///
/// Arena of condition nodes addressed by stable ids. The root is always the
/// first node, and ids handed out by the builders are monotonic. The graph
/// is a rooted DAG: a subtree may be shared across parents, but a correct
/// builder never creates a cycle.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConditionGraph {
    nodes: Vec<ConditionNode>,
    root: NodeId,
    next_id: u64,
}

impl ConditionGraph {
    /// Create a graph holding only its root node.
    pub(crate) fn with_root(operator: Operator, value: Value, combinator: Combinator) -> Self {
        let root = NodeId(0);
        let node = ConditionNode {
            id: root,
            selector: None,
            operator,
            serialized_value: portable(&value),
            value,
            combinator,
            children: Vec::new(),
        };

        Self {
            nodes: vec![node],
            root,
            next_id: 1,
        }
    }

    #[must_use]
    pub(crate) const fn root(&self) -> NodeId {
        self.root
    }

    // Linear scan rather than an index: arenas are small, and a graph
    // decoded from a foreign producer need not arrive sorted by id.
    #[must_use]
    pub(crate) fn node(&self, id: NodeId) -> Option<&ConditionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut ConditionNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a new leaf node as a child of the root.
    pub(crate) fn push_leaf(
        &mut self,
        selector: String,
        operator: Operator,
        value: Value,
        combinator: Combinator,
    ) -> NodeId {
        let id = self.allocate();
        let node = ConditionNode {
            id,
            selector: Some(selector),
            operator,
            serialized_value: portable(&value),
            value,
            combinator,
            children: Vec::new(),
        };
        self.nodes.push(node);

        let root = self.root;
        if let Some(root_node) = self.node_mut(root) {
            root_node.children.push(id);
        }

        id
    }

    /// Retag the root's fold operator.
    pub(crate) fn retag_root(&mut self, combinator: Combinator) {
        let root = self.root;
        if let Some(root_node) = self.node_mut(root) {
            root_node.combinator = combinator;
        }
    }

    /// Copy another graph's arena into this one, remapping its ids past our
    /// counter, and attach its root as a child of our root. Internal sharing
    /// inside `other` is preserved by the uniform remap.
    pub(crate) fn graft(&mut self, other: &Self) -> NodeId {
        let offset = self.next_id;
        for node in &other.nodes {
            let mut copy = node.clone();
            copy.id = NodeId(node.id.get() + offset);
            copy.children = node
                .children
                .iter()
                .map(|child| NodeId(child.get() + offset))
                .collect();
            self.nodes.push(copy);
        }
        self.next_id += other.next_id;

        let grafted_root = NodeId(other.root.get() + offset);
        let root = self.root;
        if let Some(root_node) = self.node_mut(root) {
            root_node.children.push(grafted_root);
        }

        grafted_root
    }

    /// Attach an existing node as a further child of the root, creating a
    /// shared reference. Tests use this to build the DAG shapes that foreign
    /// producers of the serialized form may emit.
    #[cfg(test)]
    pub(crate) fn attach_existing(&mut self, child: NodeId) {
        let root = self.root;
        if let Some(root_node) = self.node_mut(root) {
            root_node.children.push(child);
        }
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

///
/// Condition
///
/// A condition graph bound to the entity-type name it was built against.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Condition {
    pub entity: String,
    pub graph: ConditionGraph,
}
