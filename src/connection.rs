//! DuckDB connection wrapper: schema creation, bulk loading and query
//! execution.
//!
//! Records are bulk loaded by writing them as newline-delimited JSON to a
//! temp file and letting DuckDB read it with an explicit column list, so
//! column types never depend on what the sample happens to contain.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{BufWriter, Write};
use std::path::Path;

use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::config::{self, DEALS_TABLE, SALES_TABLE};
use crate::error::{DealError, Result};
use crate::models::{Deal, SaleRecord};
use crate::sql_builder::SqlValue;

/// Wraps a DuckDB connection holding the `deals` and `sales` tables.
pub struct Connection {
    conn: DuckDbConnection,
    tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Open an in-memory database with an empty schema.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_duckdb(DuckDbConnection::open_in_memory()?)
    }

    /// Open (or create) a database file. Existing tables are reused.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_duckdb(DuckDbConnection::open(path.as_ref())?)
    }

    fn from_duckdb(conn: DuckDbConnection) -> Result<Self> {
        let this = Self {
            conn,
            tables: RefCell::new(HashSet::new()),
        };
        this.create_table(DEALS_TABLE, config::deal_columns())?;
        this.create_table(SALES_TABLE, config::sale_columns())?;
        Ok(this)
    }

    fn create_table(&self, name: &str, columns: &[(&str, &str)]) -> Result<()> {
        let cols: Vec<String> = columns
            .iter()
            .map(|(col, ty)| format!("\"{}\" {}", col, ty))
            .collect();
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            name,
            cols.join(", ")
        ))?;
        self.tables.borrow_mut().insert(name.to_string());
        tracing::debug!(table = name, "table ready");
        Ok(())
    }

    // -- Loading -----------------------------------------------------------

    /// Append deals to the `deals` table. Returns the number of rows added.
    pub fn load_deals(&self, deals: &[Deal]) -> Result<usize> {
        self.load_records(DEALS_TABLE, config::deal_columns(), deals)
    }

    /// Append sales to the `sales` table. Returns the number of rows added.
    pub fn load_sales(&self, sales: &[SaleRecord]) -> Result<usize> {
        self.load_records(SALES_TABLE, config::sale_columns(), sales)
    }

    /// Append deals from a JSON file holding an array of deal objects.
    pub fn load_deals_json<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let deals: Vec<Deal> = read_json_array(path.as_ref())?;
        self.load_deals(&deals)
    }

    /// Append sales from a JSON file holding an array of sale objects.
    pub fn load_sales_json<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let sales: Vec<SaleRecord> = read_json_array(path.as_ref())?;
        self.load_sales(&sales)
    }

    /// Serialize `records` to NDJSON with a trailing `seq` column continuing
    /// the table's ingestion order, then insert them in one statement.
    pub fn load_records<T: Serialize>(
        &self,
        table: &str,
        columns: &[(&str, &str)],
        records: &[T],
    ) -> Result<usize> {
        if !self.has_table(table) {
            return Err(DealError::InvalidArgument(format!("unknown table: {table}")));
        }
        if records.is_empty() {
            return Ok(0);
        }

        let next_seq = self
            .execute_scalar(&format!("SELECT COALESCE(MAX(seq) + 1, 0) FROM {table}"), &[])?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);

        let file = NamedTempFile::new()?;
        {
            let mut out = BufWriter::new(file.as_file());
            for (i, record) in records.iter().enumerate() {
                let mut value = serde_json::to_value(record)?;
                if let serde_json::Value::Object(ref mut map) = value {
                    map.insert("seq".to_string(), (next_seq + i as i64).into());
                }
                serde_json::to_writer(&mut out, &value)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }

        let path_fwd = file.path().to_string_lossy().replace('\\', "/");
        let select_cols: Vec<String> = columns.iter().map(|(c, _)| format!("\"{}\"", c)).collect();
        let column_types: Vec<String> = columns
            .iter()
            .map(|(c, ty)| format!("'{}': '{}'", c, ty))
            .collect();
        self.conn.execute_batch(&format!(
            "INSERT INTO {table} SELECT {} FROM read_json('{}', format = 'newline_delimited', columns = {{{}}})",
            select_cols.join(", "),
            path_fwd,
            column_types.join(", ")
        ))?;

        tracing::info!(table, rows = records.len(), first_seq = next_seq, "records loaded");
        Ok(records.len())
    }

    /// Delete every row of `table`.
    pub fn clear(&self, table: &str) -> Result<()> {
        if !self.has_table(table) {
            return Err(DealError::InvalidArgument(format!("unknown table: {table}")));
        }
        self.conn.execute_batch(&format!("DELETE FROM {table}"))?;
        tracing::info!(table, "table cleared");
        Ok(())
    }

    // -- Execution ---------------------------------------------------------

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run.
        let stmt_ref = rows_result
            .as_ref()
            .ok_or_else(|| DealError::InvalidArgument("statement has no result set".into()))?;
        let column_names: Vec<String> = stmt_ref
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut out = Vec::new();
        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Run `f` inside a transaction, committing on success and rolling back
    /// on error.
    pub fn in_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        match f() {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Check whether a table exists in the schema.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.borrow().contains(name)
    }

    /// Return the names of all managed tables.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)?;
    let records: Vec<T> = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(records)
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    use serde_json::Value;

    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::Number(n.into()),
        ValueRef::SmallInt(n) => Value::Number(n.into()),
        ValueRef::Int(n) => Value::Number(n.into()),
        ValueRef::BigInt(n) => Value::Number(n.into()),
        ValueRef::UTinyInt(n) => Value::Number(n.into()),
        ValueRef::USmallInt(n) => Value::Number(n.into()),
        ValueRef::UInt(n) => Value::Number(n.into()),
        ValueRef::UBigInt(n) => Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => Value::Number(i.into()),
            Err(_) => Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        _ => Value::Null,
    }
}
