//! Typed statement builder for the platform query language.
//!
//! The platform accepts a small SQL-like grammar:
//! `SELECT <projection|*> FROM <Resource> [WHERE ...]`, with single-quoted
//! string literals and backslash escapes. Values are escaped in exactly one
//! place and column identifiers are validated before a statement renders, so
//! no caller input reaches the wire unchecked. There is no entry point for a
//! caller-supplied raw clause string.

use std::fmt::Write;

use crate::{EntityId, ResourceKind, ValidationError};

/// Default row window requested when the caller does not set a limit.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Offset/limit window forwarded alongside the rendered statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    pub const fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Window over the first `limit` rows.
    pub const fn first(limit: u32) -> Self {
        Self::new(0, limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

/// Scalar value embedded in a filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Number(i64),
    Bool(bool),
}

impl QueryValue {
    fn render(&self) -> String {
        match self {
            Self::Text(text) => quote(text),
            Self::Number(number) => number.to_string(),
            Self::Bool(flag) => flag.to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<EntityId> for QueryValue {
    // Identifiers travel as quoted digit strings in the query grammar.
    fn from(value: EntityId) -> Self {
        Self::Text(value.to_string())
    }
}

/// Filter composed of equality and membership predicates joined by `AND`,
/// rendered in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Eq {
        column: String,
        value: QueryValue,
    },
    In {
        column: String,
        values: Vec<QueryValue>,
    },
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.predicates.push(Predicate::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_in<V>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self
    where
        V: Into<QueryValue>,
    {
        self.predicates.push(Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Renders the `WHERE ...` clause, or `None` when no predicate is set.
    fn render(&self) -> Result<Option<String>, ValidationError> {
        if self.predicates.is_empty() {
            return Ok(None);
        }

        let mut clause = String::from("WHERE ");
        for (index, predicate) in self.predicates.iter().enumerate() {
            if index > 0 {
                clause.push_str(" AND ");
            }

            match predicate {
                Predicate::Eq { column, value } => {
                    validate_column(column)?;
                    let _ = write!(clause, "{column} = {}", value.render());
                }
                Predicate::In { column, values } => {
                    validate_column(column)?;
                    if values.is_empty() {
                        return Err(ValidationError::EmptyValueList);
                    }
                    let rendered = values
                        .iter()
                        .map(QueryValue::render)
                        .collect::<Vec<_>>()
                        .join(",");
                    let _ = write!(clause, "{column} IN ({rendered})");
                }
            }
        }

        Ok(Some(clause))
    }
}

/// Builder for one platform query statement, bound to a resource kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    resource: ResourceKind,
    projection: Option<Vec<String>>,
    filter: Filter,
    page: Page,
}

impl Select {
    pub fn from_resource(resource: ResourceKind) -> Self {
        Self {
            resource,
            projection: None,
            filter: Filter::new(),
            page: Page::default(),
        }
    }

    /// Restricts the projection; the default is `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.page.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.page.limit = limit;
        self
    }

    pub const fn resource(&self) -> ResourceKind {
        self.resource
    }

    pub const fn page(&self) -> Page {
        self.page
    }

    /// Renders the statement, validating every identifier it embeds.
    pub fn render(&self) -> Result<String, ValidationError> {
        let projection = match &self.projection {
            None => String::from("*"),
            Some(columns) => {
                if columns.is_empty() {
                    return Err(ValidationError::EmptyProjection);
                }
                for column in columns {
                    validate_column(column)?;
                }
                columns.join(", ")
            }
        };

        let mut statement = format!("SELECT {projection} FROM {}", self.resource.as_str());
        if let Some(clause) = self.filter.render()? {
            statement.push(' ');
            statement.push_str(&clause);
        }

        Ok(statement)
    }
}

/// Escapes a string for embedding in a single-quoted literal.
///
/// The grammar recognizes backslash escapes for the quote and the backslash
/// itself; every other character passes through.
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '\\' || ch == '\'' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn quote(raw: &str) -> String {
    format!("'{}'", escape(raw))
}

/// Column identifiers are restricted to `[A-Za-z][A-Za-z0-9_.]*`; identifiers
/// and values are the only caller-controlled statement fragments.
fn validate_column(name: &str) -> Result<(), ValidationError> {
    let Some(first) = name.chars().next() else {
        return Err(ValidationError::EmptyColumnName);
    };

    if !first.is_ascii_alphabetic() {
        return Err(ValidationError::ColumnInvalidStart {
            name: name.to_owned(),
        });
    }

    for (index, ch) in name.char_indices().skip(1) {
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '.') {
            return Err(ValidationError::ColumnInvalidChar {
                name: name.to_owned(),
                ch,
                index,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_select_star_without_filter() {
        let statement = Select::from_resource(ResourceKind::Class)
            .render()
            .expect("must render");
        assert_eq!(statement, "SELECT * FROM Class");
    }

    #[test]
    fn renders_projection_columns() {
        let statement = Select::from_resource(ResourceKind::Account)
            .columns(["Id", "Name"])
            .render()
            .expect("must render");
        assert_eq!(statement, "SELECT Id, Name FROM Account");
    }

    #[test]
    fn equality_filter_is_order_preserving() {
        let statement = Select::from_resource(ResourceKind::Class)
            .filter(Filter::new().eq("a", "x").eq("b", "y"))
            .render()
            .expect("must render");
        assert_eq!(statement, "SELECT * FROM Class WHERE a = 'x' AND b = 'y'");
    }

    #[test]
    fn in_filter_renders_supplied_values() {
        let statement = Select::from_resource(ResourceKind::Class)
            .filter(Filter::new().is_in("Name", ["A", "B"]))
            .render()
            .expect("must render");
        assert_eq!(statement, "SELECT * FROM Class WHERE Name IN ('A','B')");
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_values() {
        let statement = Select::from_resource(ResourceKind::Vendor)
            .filter(Filter::new().eq("DisplayName", "O'Brien \\ Sons"))
            .render()
            .expect("must render");
        assert_eq!(
            statement,
            "SELECT * FROM Vendor WHERE DisplayName = 'O\\'Brien \\\\ Sons'"
        );
    }

    #[test]
    fn numbers_and_booleans_render_unquoted() {
        let statement = Select::from_resource(ResourceKind::Invoice)
            .filter(Filter::new().eq("Balance", 125_i64).eq("Paid", false))
            .render()
            .expect("must render");
        assert_eq!(
            statement,
            "SELECT * FROM Invoice WHERE Balance = 125 AND Paid = false"
        );
    }

    #[test]
    fn identifiers_render_as_quoted_digit_strings() {
        let statement = Select::from_resource(ResourceKind::Customer)
            .filter(Filter::new().eq("Id", EntityId::new(42)))
            .render()
            .expect("must render");
        assert_eq!(statement, "SELECT * FROM Customer WHERE Id = '42'");
    }

    #[test]
    fn rejects_hostile_column_names() {
        let err = Select::from_resource(ResourceKind::Class)
            .filter(Filter::new().eq("Name = 'x' OR", "y"))
            .render()
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::ColumnInvalidChar { .. }));
    }

    #[test]
    fn rejects_empty_column_name() {
        let err = Select::from_resource(ResourceKind::Class)
            .filter(Filter::new().eq("", "y"))
            .render()
            .expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyColumnName);
    }

    #[test]
    fn rejects_empty_in_list() {
        let err = Select::from_resource(ResourceKind::Class)
            .filter(Filter::new().is_in("Name", Vec::<String>::new()))
            .render()
            .expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyValueList);
    }

    #[test]
    fn rejects_empty_projection() {
        let err = Select::from_resource(ResourceKind::Class)
            .columns(Vec::<String>::new())
            .render()
            .expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyProjection);
    }

    #[test]
    fn page_defaults_to_first_window() {
        let select = Select::from_resource(ResourceKind::Class);
        assert_eq!(select.page(), Page::new(0, DEFAULT_PAGE_LIMIT));

        let paged = select.offset(40).limit(20);
        assert_eq!(paged.page(), Page::new(40, 20));
    }
}
