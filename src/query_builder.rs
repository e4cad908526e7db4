//! Query-string builder for the filtered, sorted and paged list endpoints.
//!
//! Builder methods return `&mut Self` for chaining. Blank values are skipped
//! so an empty search box never sends `filterQuery=`.
//!
//! # Example
//!
//! ```rust
//! use cable_shop::QueryBuilder;
//! let params = QueryBuilder::new()
//!     .filter("Name", "brake")
//!     .sort("Name", true)
//!     .page(2, 25)
//!     .build();
//! assert_eq!(params[0], ("filterOn".to_string(), "Name".to_string()));
//! ```

/// Builds `(key, value)` query parameters in insertion order.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw parameter; blank values are ignored.
    pub fn param(&mut self, key: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() {
            self.params.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Add `filterOn` / `filterQuery`. Both must be non-blank to take effect.
    pub fn filter(&mut self, on: &str, query: &str) -> &mut Self {
        if on.trim().is_empty() || query.trim().is_empty() {
            return self;
        }
        self.param("filterOn", on).param("filterQuery", query)
    }

    /// Add `sortBy` / `isAscending`.
    pub fn sort(&mut self, by: &str, ascending: bool) -> &mut Self {
        if by.trim().is_empty() {
            return self;
        }
        self.param("sortBy", by)
            .param("isAscending", if ascending { "true" } else { "false" })
    }

    /// Add `pageNumber` / `pageSize`. Page numbers start at 1.
    pub fn page(&mut self, number: usize, size: usize) -> &mut Self {
        let number = number.max(1).to_string();
        let size = size.max(1).to_string();
        self.param("pageNumber", &number).param("pageSize", &size)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn build(&self) -> Vec<(String, String)> {
        self.params.clone()
    }
}
