//! Row access for community tables.
//!
//! The dataset builder only needs a sequence of rows that can be queried by
//! column name, plus a way to ask whether a column exists. [`TableSource`]
//! captures that; polars data frames and in-memory [`RecordTable`]s both
//! implement it.

use crate::constants::COMMUNITY_TABLE_EXTENSION;
use crate::error::{CommunityError, Result};
use crate::models::FieldValue;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// A table of rows addressable by index and column name
pub trait TableSource {
    /// Whether the table exposes a column with this exact name
    fn has_column(&self, name: &str) -> bool;

    /// Number of data rows
    fn row_count(&self) -> usize;

    /// Cell value at `row` (0-based) in `column`
    fn value(&self, row: usize, column: &str) -> Result<FieldValue>;

    /// Iterate the rows in order
    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows {
            table: self,
            next: 0,
        }
    }
}

/// Iterator over the rows of a [`TableSource`]
#[derive(Debug)]
pub struct Rows<'a, T: TableSource> {
    table: &'a T,
    next: usize,
}

impl<'a, T: TableSource> Iterator for Rows<'a, T> {
    type Item = RowRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.table.row_count() {
            return None;
        }
        let row = RowRef {
            table: self.table,
            index: self.next,
        };
        self.next += 1;
        Some(row)
    }
}

/// One row of a table, read through typed accessors
#[derive(Debug)]
pub struct RowRef<'a, T: TableSource> {
    table: &'a T,
    index: usize,
}

impl<T: TableSource> RowRef<'_, T> {
    /// 0-based row index within the table
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based row number for messages
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.table.has_column(column)
    }

    /// Raw cell value; the column must exist
    pub fn value(&self, column: &str) -> Result<FieldValue> {
        if !self.table.has_column(column) {
            return Err(CommunityError::MissingColumn {
                column: column.to_string(),
            });
        }
        self.table.value(self.index, column)
    }

    /// Cell as text; numbers are rendered, nulls are an error
    pub fn text(&self, column: &str) -> Result<String> {
        match self.value(column)? {
            FieldValue::Null => Err(self.invalid(column, "", "value is missing")),
            FieldValue::Text(text) => Ok(text),
            other => Ok(other.to_string()),
        }
    }

    /// Cell coerced to a 64-bit integer
    pub fn int(&self, column: &str) -> Result<i64> {
        let value = self.value(column)?;
        if value.is_null() {
            return Err(self.invalid(column, "", "value is missing"));
        }
        value
            .as_i64()
            .ok_or_else(|| self.invalid(column, &value.to_string(), "not an integer"))
    }

    /// Cell coerced to a 32-bit signed integer
    pub fn i32(&self, column: &str) -> Result<i32> {
        let value = self.int(column)?;
        i32::try_from(value).map_err(|_| {
            self.invalid(column, &value.to_string(), "outside the 32-bit integer range")
        })
    }

    pub(crate) fn invalid(&self, column: &str, value: &str, reason: &str) -> CommunityError {
        CommunityError::InvalidField {
            row: self.number(),
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// An in-memory table of literal rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl RecordTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with nulls, long rows are rejected
    pub fn push_row<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let mut row: Vec<FieldValue> = values.into_iter().map(Into::into).collect();
        if row.len() > self.columns.len() {
            return Err(CommunityError::configuration(format!(
                "Row {} has {} values but the table has {} columns",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        row.resize(self.columns.len(), FieldValue::Null);
        self.rows.push(row);
        Ok(())
    }

    /// Builder-style variant of [`RecordTable::push_row`]
    pub fn with_row<I, V>(mut self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.push_row(values)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

impl TableSource for RecordTable {
    fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: &str) -> Result<FieldValue> {
        let col = self
            .column_index(column)
            .ok_or_else(|| CommunityError::MissingColumn {
                column: column.to_string(),
            })?;
        Ok(self
            .rows
            .get(row)
            .and_then(|values| values.get(col))
            .cloned()
            .unwrap_or_default())
    }
}

impl TableSource for DataFrame {
    fn has_column(&self, name: &str) -> bool {
        self.get_column_names().iter().any(|c| c.as_str() == name)
    }

    fn row_count(&self) -> usize {
        self.height()
    }

    fn value(&self, row: usize, column: &str) -> Result<FieldValue> {
        let any = self.column(column)?.get(row)?;
        Ok(field_value_from_any(&any))
    }
}

/// Convert a polars cell into a [`FieldValue`]
pub fn field_value_from_any(value: &AnyValue<'_>) -> FieldValue {
    match value {
        AnyValue::Null => FieldValue::Null,
        AnyValue::Boolean(v) => FieldValue::Bool(*v),
        AnyValue::String(v) => FieldValue::Text((*v).to_string()),
        AnyValue::StringOwned(v) => FieldValue::Text(v.to_string()),
        AnyValue::Int8(v) => FieldValue::Int(i64::from(*v)),
        AnyValue::Int16(v) => FieldValue::Int(i64::from(*v)),
        AnyValue::Int32(v) => FieldValue::Int(i64::from(*v)),
        AnyValue::Int64(v) => FieldValue::Int(*v),
        AnyValue::UInt8(v) => FieldValue::Int(i64::from(*v)),
        AnyValue::UInt16(v) => FieldValue::Int(i64::from(*v)),
        AnyValue::UInt32(v) => FieldValue::Int(i64::from(*v)),
        AnyValue::UInt64(v) => i64::try_from(*v)
            .map(FieldValue::Int)
            .unwrap_or_else(|_| FieldValue::Text(v.to_string())),
        AnyValue::Float32(v) => FieldValue::Float(f64::from(*v)),
        AnyValue::Float64(v) => FieldValue::Float(*v),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Read a community table from a `.csv` file.
///
/// Any other extension is rejected before the file is touched.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    ensure_csv_extension(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Reject paths whose extension is not `csv`
pub fn ensure_csv_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(COMMUNITY_TABLE_EXTENSION) => Ok(()),
        _ => Err(CommunityError::configuration(format!(
            "Community table {} must be a .{} file",
            path.display(),
            COMMUNITY_TABLE_EXTENSION
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_table() -> RecordTable {
        RecordTable::new(["MapCode", "SpeciesName", "CohortAge"])
            .with_row([FieldValue::Int(1), "pinus".into(), FieldValue::Int(10)])
            .unwrap()
            .with_row([FieldValue::Int(2), "NA".into()])
            .unwrap()
    }

    #[test]
    fn test_record_table_rows_and_padding() {
        let table = sample_table();
        let rows: Vec<_> = table.rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].i32("MapCode").unwrap(), 1);
        assert_eq!(rows[0].text("SpeciesName").unwrap(), "pinus");
        assert_eq!(rows[1].value("CohortAge").unwrap(), FieldValue::Null);
        assert_eq!(rows[1].number(), 2);
    }

    #[test]
    fn test_record_table_rejects_long_rows() {
        let mut table = RecordTable::new(["A"]);
        assert!(table.push_row([1i64, 2i64]).is_err());
    }

    #[test]
    fn test_missing_column_and_bad_values() {
        let table = sample_table();
        let row = table.rows().next().unwrap();

        assert!(matches!(
            row.value("CohortBiomass"),
            Err(CommunityError::MissingColumn { .. })
        ));
        match row.int("SpeciesName") {
            Err(CommunityError::InvalidField { row, column, value, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "SpeciesName");
                assert_eq!(value, "pinus");
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_i32_range_check() {
        let table = RecordTable::new(["MapCode"])
            .with_row([FieldValue::Int(i64::from(i32::MAX) + 1)])
            .unwrap();
        let row = table.rows().next().unwrap();
        assert!(matches!(
            row.i32("MapCode"),
            Err(CommunityError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_extension_policy() {
        assert!(ensure_csv_extension(Path::new("communities.csv")).is_ok());
        for path in ["communities.txt", "communities", "communities.csv.bak"] {
            assert!(
                matches!(
                    ensure_csv_extension(Path::new(path)),
                    Err(CommunityError::Configuration { .. })
                ),
                "{} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_read_csv_table_rejects_other_extensions_before_reading() {
        // The file does not exist; the extension check must fire first.
        let result = read_csv_table(Path::new("/nonexistent/communities.txt"));
        assert!(matches!(result, Err(CommunityError::Configuration { .. })));
    }

    #[test]
    fn test_read_csv_table_as_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("communities.csv");
        fs::write(
            &path,
            "MapCode,SpeciesName,CohortAge,CohortBiomass\n1,pinus,10,500\n2,NA,,\n",
        )
        .unwrap();

        let df = read_csv_table(&path).unwrap();
        assert_eq!(df.row_count(), 2);
        assert!(df.has_column("CohortBiomass"));
        assert!(!df.has_column("LeafBiomass"));

        let rows: Vec<_> = df.rows().collect();
        assert_eq!(rows[0].i32("MapCode").unwrap(), 1);
        assert_eq!(rows[0].int("CohortBiomass").unwrap(), 500);
        assert_eq!(rows[1].text("SpeciesName").unwrap(), "NA");
        assert_eq!(rows[1].value("CohortAge").unwrap(), FieldValue::Null);
    }
}
