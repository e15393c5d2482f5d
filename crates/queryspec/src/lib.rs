//! Serializable query specifications: typed criteria and sort builders, a
//! condition-node graph with structural sharing, and compilers that turn
//! both into executable predicates and comparators.
#![warn(unreachable_pub)]

pub mod error;
pub mod query;
pub mod schema;
pub mod spec;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains the builder vocabulary a caller needs to express a
/// specification; compiled artifacts and schema plumbing stay one module
/// level down.
///

pub mod prelude {
    pub use crate::{
        error::Error,
        query::{Combinator, Criteria, Direction, Operator, SortCondition},
        schema::{
            EntityKind, EntitySchema, FieldKind, FieldRead, FieldSchema, FieldType, FieldValues,
        },
        spec::{Pagination, Specification},
        value::Value,
    };
}
