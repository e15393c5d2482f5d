//! Module: spec
//! Responsibility: the specification facade: criteria plus optional sort,
//! pagination, and navigation-path hints, with a portable JSON form and an
//! in-memory query runner for sequences.

use crate::{
    error::Error,
    query::{Criteria, SortCondition},
    schema::EntityKind,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

///
/// Pagination
///
/// Page-window parameters. All three values clamp to a minimum of one, so a
/// caller handing over raw user input never produces an empty or negative
/// window. `page_count` widens the window to several consecutive pages.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pagination {
    pub page_size: usize,
    /// 1-based page number.
    pub page_index: usize,
    pub page_count: usize,
}

impl Pagination {
    #[must_use]
    pub fn new(page_size: usize, page_index: usize) -> Self {
        Self::spanning(page_size, page_index, 1)
    }

    #[must_use]
    pub fn spanning(page_size: usize, page_index: usize, page_count: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_index: page_index.max(1),
            page_count: page_count.max(1),
        }
    }

    // Fields are public like the rest of the facade; saturate so a window
    // built by hand with a zero index still starts at the first page.
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.page_size * self.page_index.saturating_sub(1)
    }

    #[must_use]
    pub const fn take(&self) -> usize {
        self.page_size * self.page_count
    }
}

///
/// Specification
///
/// A complete, serializable description of one query: what to keep, how to
/// order it, which page window to return, and which navigation paths an
/// execution backend should expand before filtering.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Specification<E: EntityKind> {
    pub criteria: Criteria<E>,
    pub sort: Option<SortCondition<E>>,
    pub pagination: Option<Pagination>,
    pub included_paths: Vec<String>,
}

impl<E: EntityKind> Specification<E> {
    #[must_use]
    pub fn new(criteria: Criteria<E>) -> Self {
        Self {
            criteria,
            sort: None,
            pagination: None,
            included_paths: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortCondition<E>) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Record a navigation path for the execution backend to expand. The
    /// path is carried verbatim; it is not resolved against the schema.
    #[must_use]
    pub fn include(mut self, path: &str) -> Self {
        self.included_paths.push(path.to_string());
        self
    }

    /// Rebind the whole specification to another entity type.
    #[must_use]
    pub fn retarget<N: EntityKind>(&self) -> Specification<N> {
        Specification {
            criteria: self.criteria.retarget::<N>(),
            sort: self.sort.as_ref().map(SortCondition::retarget::<N>),
            pagination: self.pagination,
            included_paths: self.included_paths.clone(),
        }
    }

    /// Encode to the portable JSON form.
    ///
    /// # Errors
    /// Fails when serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from the portable JSON form.
    ///
    /// # Errors
    /// Fails when the text is not a valid specification encoding.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the JSON form to a file.
    ///
    /// # Errors
    /// Fails on serialization or filesystem errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let json = self.to_json()?;

        std::fs::write(path, json).map_err(|err| Error::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Load a specification from a file written by [`Specification::save`].
    ///
    /// # Errors
    /// Fails on filesystem errors or an invalid encoding.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| Error::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        Self::from_json(&json)
    }

    /// Run the specification against an in-memory sequence: filter, then
    /// page, then sort the surviving window.
    ///
    /// # Errors
    /// Fails when the criteria or sort condition does not compile against
    /// `E`.
    pub fn query(&self, records: Vec<E>) -> Result<Vec<E>, Error> {
        let filter = self.criteria.compile()?;
        let sorter = match &self.sort {
            Some(sort) => sort.compile()?,
            None => None,
        };

        let filtered = records.into_iter().filter(filter.into_fn());
        let mut window: Vec<E> = match self.pagination {
            Some(pagination) => filtered
                .skip(pagination.skip())
                .take(pagination.take())
                .collect(),
            None => filtered.collect(),
        };

        if let Some(sorter) = sorter {
            sorter.sort(&mut window);
        }

        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{Criteria, Operator, SortCondition},
        test_fixtures::{Customer, Prospect},
    };

    fn crew() -> Vec<Customer> {
        vec![
            Customer::sample("Ada", "Lovelace", 36),
            Customer::sample("Alan", "Turing", 41),
            Customer::sample("Grace", "Hopper", 42),
            Customer::sample("Edsger", "Dijkstra", 29),
        ]
    }

    fn adults() -> Specification<Customer> {
        let criteria = Criteria::always()
            .and("age", Operator::GreaterThanOrEqual, 30_u64)
            .unwrap();

        Specification::new(criteria)
    }

    #[test]
    fn pagination_clamps_to_one() {
        let pagination = Pagination::spanning(0, 0, 0);
        assert_eq!(pagination.page_size, 1);
        assert_eq!(pagination.page_index, 1);
        assert_eq!(pagination.page_count, 1);

        assert_eq!(Pagination::new(10, 1).skip(), 0);
        assert_eq!(Pagination::new(10, 3).skip(), 20);
        assert_eq!(Pagination::spanning(10, 1, 2).take(), 20);
    }

    #[test]
    fn query_filters_then_pages_then_sorts() {
        // The page window is cut from the filtered stream in input order;
        // only the surviving window is sorted.
        let spec = adults()
            .with_sort(SortCondition::order_by_desc("age").unwrap())
            .with_pagination(Pagination::new(2, 1));

        let result = spec.query(crew()).unwrap();
        let names: Vec<&str> = result.iter().map(|c| c.first_name.as_str()).collect();

        assert_eq!(names, vec!["Alan", "Ada"]);
    }

    #[test]
    fn query_without_sort_or_pagination_only_filters() {
        let result = adults().query(crew()).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn pagination_beyond_the_stream_is_empty() {
        let spec = adults().with_pagination(Pagination::new(10, 5));
        assert!(spec.query(crew()).unwrap().is_empty());
    }

    #[test]
    fn json_roundtrip_queries_identically() {
        let spec = adults()
            .with_sort(SortCondition::order_by("last_name").unwrap())
            .with_pagination(Pagination::new(2, 1))
            .include("address");

        let json = spec.to_json().unwrap();
        let decoded = Specification::<Customer>::from_json(&json).unwrap();

        assert_eq!(decoded.pagination, spec.pagination);
        assert_eq!(decoded.included_paths, spec.included_paths);
        assert_eq!(decoded.query(crew()).unwrap(), spec.query(crew()).unwrap());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = std::env::temp_dir().join("queryspec-spec-roundtrip.json");
        let spec = adults().with_pagination(Pagination::new(5, 1));

        spec.save(&path).unwrap();
        let loaded = Specification::<Customer>::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.to_json().unwrap(), spec.to_json().unwrap());
    }

    #[test]
    fn load_missing_file_fails_with_io() {
        let err = Specification::<Customer>::load("/nonexistent/spec.json").unwrap_err();
        assert!(matches!(err, crate::Error::Io { .. }));
    }

    #[test]
    fn retarget_carries_every_part() {
        let spec = adults()
            .with_sort(SortCondition::order_by("age").unwrap())
            .with_pagination(Pagination::new(3, 2))
            .include("address");

        let retargeted = spec.retarget::<Prospect>();
        assert_eq!(retargeted.pagination, spec.pagination);
        assert_eq!(retargeted.included_paths, spec.included_paths);
        assert!(retargeted.criteria.compile().is_ok());
        assert!(retargeted.sort.unwrap().compile().is_ok());
    }
}
