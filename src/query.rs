//! Parameters for paged query endpoints.
//!
//! ```
//! use ctera_client::query::{FilterBuilder, QueryParam};
//!
//! let param = QueryParam::builder()
//!     .include_classname()
//!     .count_limit(1)
//!     .add_filter(FilterBuilder::new("name").eq("acme"))
//!     .or_filter(false)
//!     .build()
//!     .unwrap();
//! assert_eq!(1, param.filters().len());
//! ```

use crate::client::CteraError::InvalidInput;
use crate::pager::Paginated;
use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Field names owned by [`QueryParam`] that [`QueryParamBuilder::put()`] may not override
const RESERVED_FIELDS: &[&str] = &[
    "_classname",
    "startFrom",
    "countLimit",
    "filters",
    "orFilter",
    "includeClasses",
    "include",
    "sortBy",
];

/// Relation between a field and a value in a [`Filter`]
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Restriction {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterEquals,
    LessThan,
    LessEquals,
    Like,
    Contains,
    StartsWith,
}

/// A single `(field, restriction, value)` predicate
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Filter {
    #[serde(rename = "_classname")]
    classname: &'static str,
    field: String,
    restriction: Restriction,
    value: Value,
}

impl Filter {
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn restriction(&self) -> Restriction {
        self.restriction
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Creates [`Filter`]s on one field
pub struct FilterBuilder {
    field: String,
}

impl FilterBuilder {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    fn restrict(self, restriction: Restriction, value: impl Into<Value>) -> Filter {
        Filter {
            classname: "ValueFilter",
            field: self.field,
            restriction,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::Equals, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::NotEquals, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::GreaterThan, value)
    }

    #[must_use]
    pub fn ge(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::GreaterEquals, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::LessThan, value)
    }

    #[must_use]
    pub fn le(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::LessEquals, value)
    }

    #[must_use]
    pub fn like(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::Like, value)
    }

    #[must_use]
    pub fn contains(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::Contains, value)
    }

    #[must_use]
    pub fn starts_with(self, value: impl Into<Value>) -> Filter {
        self.restrict(Restriction::StartsWith, value)
    }
}

/// Request descriptor for a paged query endpoint
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryParam {
    #[serde(rename = "_classname")]
    classname: &'static str,
    start_from: u64,
    count_limit: u32,
    filters: Vec<Filter>,
    or_filter: bool,
    include_classes: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_by: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl QueryParam {
    #[must_use]
    pub fn builder() -> QueryParamBuilder {
        QueryParamBuilder::default()
    }

    #[must_use]
    pub fn start_from(&self) -> u64 {
        self.start_from
    }

    #[must_use]
    pub fn count_limit(&self) -> u32 {
        self.count_limit
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    #[must_use]
    pub fn is_or_filter(&self) -> bool {
        self.or_filter
    }

    #[must_use]
    pub fn includes_classname(&self) -> bool {
        self.include_classes
    }

    #[must_use]
    pub fn include(&self) -> &[String] {
        &self.include
    }

    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Endpoint-specific field set with [`QueryParamBuilder::put()`]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

impl Default for QueryParam {
    fn default() -> Self {
        Self {
            classname: "QueryParams",
            start_from: 0,
            count_limit: DEFAULT_PAGE_SIZE,
            filters: Vec::new(),
            or_filter: false,
            include_classes: false,
            include: Vec::new(),
            sort_by: None,
            extra: Map::new(),
        }
    }
}

impl Paginated for QueryParam {
    fn offset(&self) -> u64 {
        self.start_from
    }

    fn advance(&mut self) {
        self.start_from = self
            .start_from
            .saturating_add(u64::from(self.count_limit));
    }
}

/// Builder for [`QueryParam`]
///
/// Every setter consumes the builder, so a built parameter can never be changed through it.
#[derive(Default)]
pub struct QueryParamBuilder {
    param: QueryParam,
    rejected: Option<String>,
}

impl QueryParamBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the offset of the first page
    #[must_use]
    pub fn start_from(mut self, start: u64) -> Self {
        self.param.start_from = start;
        self
    }

    /// Sets the page size; must be positive
    #[must_use]
    pub fn count_limit(mut self, limit: u32) -> Self {
        self.param.count_limit = limit;
        self
    }

    #[must_use]
    pub fn add_filter(mut self, filter: Filter) -> Self {
        self.param.filters.push(filter);
        self
    }

    #[must_use]
    pub fn add_filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.param.filters.extend(filters);
        self
    }

    /// Combines filters with OR when `true`, AND otherwise
    #[must_use]
    pub fn or_filter(mut self, or_filter: bool) -> Self {
        self.param.or_filter = or_filter;
        self
    }

    /// Asks the server to tag every returned object with its class name
    #[must_use]
    pub fn include_classname(mut self) -> Self {
        self.param.include_classes = true;
        self
    }

    /// Restricts returned objects to the given attributes
    #[must_use]
    pub fn include<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param
            .include
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.param.sort_by = Some(field.into());
        self
    }

    /// Attaches an endpoint-specific field
    #[must_use]
    pub fn put(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if RESERVED_FIELDS.contains(&name.as_str()) {
            if self.rejected.is_none() {
                self.rejected = Some(format!("'{name}' cannot be set through put()"));
            }
        } else {
            self.param.extra.insert(name, value.into());
        }
        self
    }

    /// Builds the [`QueryParam`]
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Page size is zero
    /// - A reserved field name was passed to [`Self::put()`]
    pub fn build(self) -> Result<QueryParam> {
        if let Some(message) = self.rejected {
            return Err(InvalidInput(message).into());
        }
        if self.param.count_limit == 0 {
            return Err(InvalidInput("Count limit must be positive".into()).into());
        }
        Ok(self.param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CteraError;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let param = QueryParam::builder().build().unwrap();
        assert_eq!(0, param.start_from());
        assert_eq!(DEFAULT_PAGE_SIZE, param.count_limit());
        assert!(param.filters().is_empty());
        assert!(!param.is_or_filter());
        assert!(!param.includes_classname());
    }

    #[test]
    fn test_single_filter_and_semantics() {
        let param = QueryParam::builder()
            .add_filter(FilterBuilder::new("name").eq("acme"))
            .or_filter(false)
            .build()
            .unwrap();

        assert_eq!(1, param.filters().len());
        assert!(!param.is_or_filter());
        let filter = &param.filters()[0];
        assert_eq!("name", filter.field());
        assert_eq!(Restriction::Equals, filter.restriction());
        assert_eq!(&json!("acme"), filter.value());
    }

    #[test]
    fn test_filters_keep_order_and_duplicates() {
        let param = QueryParam::builder()
            .add_filter(FilterBuilder::new("name").eq("a"))
            .add_filters([
                FilterBuilder::new("name").eq("a"),
                FilterBuilder::new("size").gt(10),
            ])
            .or_filter(true)
            .build()
            .unwrap();

        let fields: Vec<_> = param
            .filters()
            .iter()
            .map(|f| (f.field(), f.restriction()))
            .collect();
        assert_eq!(
            vec![
                ("name", Restriction::Equals),
                ("name", Restriction::Equals),
                ("size", Restriction::GreaterThan)
            ],
            fields
        );
        assert!(param.is_or_filter());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let error = QueryParam::builder().count_limit(0).build().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CteraError>(),
            Some(CteraError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_put_rejects_reserved_fields() {
        let error = QueryParam::builder()
            .put("startFrom", 5)
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("startFrom"));
    }

    #[test]
    fn test_serialized_shape() {
        let param = QueryParam::builder()
            .include_classname()
            .start_from(20)
            .count_limit(10)
            .add_filter(FilterBuilder::new("name").neq("x"))
            .include(["uid", "name"])
            .sort_by("name")
            .put("allPortals", true)
            .build()
            .unwrap();

        assert_eq!(Some(&json!(true)), param.get("allPortals"));
        assert_eq!(
            json!({
                "_classname": "QueryParams",
                "startFrom": 20,
                "countLimit": 10,
                "filters": [{
                    "_classname": "ValueFilter",
                    "field": "name",
                    "restriction": "NOT_EQUALS",
                    "value": "x"
                }],
                "orFilter": false,
                "includeClasses": true,
                "include": ["uid", "name"],
                "sortBy": "name",
                "allPortals": true
            }),
            serde_json::to_value(&param).unwrap()
        );
    }

    #[test]
    fn test_advance_by_page_size() {
        let mut param = QueryParam::builder()
            .start_from(3)
            .count_limit(7)
            .build()
            .unwrap();
        param.advance();
        param.advance();
        assert_eq!(17, param.offset());
    }

    #[test]
    fn test_built_params_are_independent() {
        let first = QueryParam::builder().count_limit(5).build().unwrap();
        let mut second = first.clone();
        second.advance();
        assert_eq!(0, first.offset());
        assert_eq!(5, second.offset());
    }
}
