//! Module: query::sort
//! Responsibility: ordered sort-key lists and their compilation into a
//! multi-key comparator. Selector resolution is deferred to compile, so a
//! retargeted sort only fails when the new type lacks a key's field.

use crate::{
    error::Error,
    schema::{EntityKind, FieldPresence, FieldValues, read_path, resolve_path},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, marker::PhantomData};

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

///
/// SortItem
///
/// One sort key: a field path and a direction. Items are serialized in
/// precedence order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortItem {
    pub selector: String,
    pub direction: Direction,
}

///
/// SortCondition
///
/// An ordered key list bound to the entity type `E`. The first key is the
/// primary ordering; each later key breaks ties left by the ones before it.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct SortCondition<E: EntityKind> {
    items: Vec<SortItem>,

    #[serde(skip)]
    marker: PhantomData<fn() -> E>,
}

impl<E: EntityKind> SortCondition<E> {
    /// Start a key list with one ascending key.
    ///
    /// # Errors
    /// Fails when the selector is empty.
    pub fn order_by(selector: &str) -> Result<Self, Error> {
        Self::new(selector, Direction::Asc)
    }

    /// Start a key list with one descending key.
    ///
    /// # Errors
    /// Fails when the selector is empty.
    pub fn order_by_desc(selector: &str) -> Result<Self, Error> {
        Self::new(selector, Direction::Desc)
    }

    fn new(selector: &str, direction: Direction) -> Result<Self, Error> {
        let mut this = Self {
            items: Vec::new(),
            marker: PhantomData,
        };
        this.push(selector, direction)?;

        Ok(this)
    }

    /// Append an ascending tie-breaking key.
    ///
    /// # Errors
    /// Fails when the selector is empty.
    pub fn then_by(mut self, selector: &str) -> Result<Self, Error> {
        self.push(selector, Direction::Asc)?;
        Ok(self)
    }

    /// Append a descending tie-breaking key.
    ///
    /// # Errors
    /// Fails when the selector is empty.
    pub fn then_by_desc(mut self, selector: &str) -> Result<Self, Error> {
        self.push(selector, Direction::Desc)?;
        Ok(self)
    }

    // Existence of the path is checked at compile; emptiness is a caller bug
    // surfaced immediately.
    fn push(&mut self, selector: &str, direction: Direction) -> Result<(), Error> {
        if selector.trim().is_empty() {
            return Err(Error::invalid_selector(selector, E::PATH, "selector is empty"));
        }

        self.items.push(SortItem {
            selector: selector.to_string(),
            direction,
        });

        Ok(())
    }

    /// Copy the key list and rebind it to another entity type.
    #[must_use]
    pub fn retarget<N: EntityKind>(&self) -> SortCondition<N> {
        SortCondition {
            items: self.items.clone(),
            marker: PhantomData,
        }
    }

    /// Compile into a comparator over `E`, or `None` when no keys were ever
    /// added.
    ///
    /// # Errors
    /// Fails when a key's selector does not resolve on `E`.
    pub fn compile(&self) -> Result<Option<Sorter<E>>, Error> {
        self.compile_for::<E>()
    }

    /// Compile against a different entity type.
    ///
    /// # Errors
    /// Same failure modes as [`SortCondition::compile`].
    pub fn compile_for<D: EntityKind>(&self) -> Result<Option<Sorter<D>>, Error> {
        if self.items.is_empty() {
            return Ok(None);
        }

        let mut keys = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let resolved = resolve_path(D::SCHEMA, &item.selector)?;
            keys.push(SortKey {
                segments: resolved.segments,
                direction: item.direction,
            });
        }

        Ok(Some(Sorter {
            keys,
            marker: PhantomData,
        }))
    }

    #[must_use]
    pub fn items(&self) -> &[SortItem] {
        &self.items
    }
}

#[derive(Clone, Debug)]
struct SortKey {
    segments: Vec<String>,
    direction: Direction,
}

///
/// Sorter
///
/// A compiled multi-key comparator. Missing reads order before explicit
/// nulls, which order before every present value; incomparable pairs are
/// treated as ties so sorting stays total.
///

#[derive(Debug)]
pub struct Sorter<E: FieldValues> {
    keys: Vec<SortKey>,
    marker: PhantomData<fn(&E)>,
}

impl<E: FieldValues> Sorter<E> {
    #[must_use]
    pub fn compare(&self, left: &E, right: &E) -> Ordering {
        for key in &self.keys {
            let lhs = read_path(left, &key.segments);
            let rhs = read_path(right, &key.segments);

            let mut ordering = compare_fields(&lhs, &rhs);
            if key.direction == Direction::Desc {
                ordering = ordering.reverse();
            }
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }

    /// Stable in-place sort by all keys in precedence order.
    pub fn sort(&self, records: &mut [E]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    /// Consume the sorter into a plain comparator closure.
    pub fn into_cmp(self) -> impl Fn(&E, &E) -> Ordering {
        move |a, b| self.compare(a, b)
    }
}

fn compare_fields(left: &FieldPresence, right: &FieldPresence) -> Ordering {
    match (left, right) {
        (FieldPresence::Missing, FieldPresence::Missing) => Ordering::Equal,
        (FieldPresence::Missing, FieldPresence::Present(_)) => Ordering::Less,
        (FieldPresence::Present(_), FieldPresence::Missing) => Ordering::Greater,
        (FieldPresence::Present(lhs), FieldPresence::Present(rhs)) => compare_values(lhs, rhs),
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left == &Value::Null, right == &Value::Null) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => {
            if left.is_numeric() && right.is_numeric() {
                left.cmp_numeric(right).unwrap_or(Ordering::Equal)
            } else {
                Value::strict_order_cmp(left, right).unwrap_or(Ordering::Equal)
            }
        }
    }
}
