//! SQL builder with parameterized query construction.
//!
//! All filter values go through DuckDB's parameter binding (`?` placeholders)
//! as typed [`SqlValue`]s, never through string interpolation. Builder methods
//! return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use deal_valuation::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("deals")
//!     .where_gte("price", 50.0)
//!     .where_lt("price", 100.0)
//!     .order_by(&["price ASC", "seq ASC"])
//!     .limit(10)
//!     .build();
//! ```

use duckdb::types::{ToSqlOutput, Value};

// ---------------------------------------------------------------------------
// SqlValue
// ---------------------------------------------------------------------------

/// A typed bind parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl duckdb::ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Text(s) => ToSqlOutput::Owned(Value::Text(s.clone())),
            SqlValue::Integer(n) => ToSqlOutput::Owned(Value::BigInt(*n)),
            SqlValue::Real(f) => ToSqlOutput::Owned(Value::Double(*f)),
        })
    }
}

// ---------------------------------------------------------------------------
// SqlBuilder
// ---------------------------------------------------------------------------

/// Builds parameterized SQL queries safely.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<SqlValue>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    pub fn where_clause(&mut self, condition: &str, params: &[SqlValue]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params.iter().cloned());
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.push_comparison(column, "=", value.into())
    }

    /// Add a greater-than-or-equal condition: `{column} >= ?`.
    pub fn where_gte(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.push_comparison(column, ">=", value.into())
    }

    /// Add a strict less-than condition: `{column} < ?`.
    pub fn where_lt(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.push_comparison(column, "<", value.into())
    }

    /// Add an IN condition with parameterized values.
    ///
    /// Empty values list produces `FALSE`.
    pub fn where_in(&mut self, column: &str, values: &[&str]) -> &mut Self {
        if values.is_empty() {
            return self.where_false();
        }
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        self.where_clauses
            .push(format!("{} IN ({})", column, placeholders.join(", ")));
        self.params.extend(values.iter().map(|v| SqlValue::from(*v)));
        self
    }

    /// Add a condition no row satisfies.
    pub fn where_false(&mut self) -> &mut Self {
        self.where_clauses.push("FALSE".to_string());
        self
    }

    /// Add ORDER BY clauses (e.g. `"price ASC"`, `"seq ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Set the number of rows to skip before returning results.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }

    fn push_comparison(&mut self, column: &str, op: &str, value: SqlValue) -> &mut Self {
        self.where_clauses.push(format!("{} {} ?", column, op));
        self.params.push(value);
        self
    }
}
