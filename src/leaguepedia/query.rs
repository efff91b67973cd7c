use indexmap::IndexMap;

/// One result row: field name -> string value, in source field order.
///
/// Cargo echoes requested field names with underscores rendered as spaces
/// and table aliases stripped, so a query for `League_Short` comes back
/// under the key `League Short` and `MS.DateTime_UTC` under `DateTime UTC`.
/// Absent values arrive as empty strings.
pub type Row = IndexMap<String, String>;

/// A Cargo query: one or more tables (optionally joined pairwise), the
/// output fields, and optional filter/ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CargoQuery {
    pub tables: String,
    pub fields: String,
    pub join_on: Option<String>,
    pub where_clause: Option<String>,
    pub order_by: Option<String>,
}

impl CargoQuery {
    pub fn new(tables: impl Into<String>, fields: impl Into<String>) -> Self {
        Self {
            tables: tables.into(),
            fields: fields.into(),
            ..Self::default()
        }
    }

    pub fn join_on(mut self, join_on: impl Into<String>) -> Self {
        self.join_on = Some(join_on.into());
        self
    }

    /// Set the `where` expression. Interpolated values must go through
    /// [`quote_literal`].
    pub fn filter(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }
}

/// Escape a string for use inside a single-quoted Cargo `where` literal.
pub fn quote_literal(raw: &str) -> String {
    raw.replace('\'', "''")
}
