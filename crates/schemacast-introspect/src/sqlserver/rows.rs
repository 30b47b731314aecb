use tiberius::Row;

use schemacast_core::{CatalogRow, Error, Result};

pub fn query_error(err: tiberius::error::Error) -> Error {
    Error::Query(err.to_string())
}

/// Decode a `(TABLE_NAME, COLUMN_NAME, DATA_TYPE)` row.
pub fn decode_row(row: &Row) -> Result<CatalogRow> {
    Ok(CatalogRow {
        table_name: text_column(row, 0, "TABLE_NAME")?,
        column_name: text_column(row, 1, "COLUMN_NAME")?,
        native_type: text_column(row, 2, "DATA_TYPE")?,
    })
}

fn text_column(row: &Row, idx: usize, name: &str) -> Result<String> {
    let value = row.try_get::<&str, _>(idx).map_err(query_error)?;
    required(value, name)
}

/// NULL in any catalog column is a query error, never an empty default.
fn required(value: Option<&str>, name: &str) -> Result<String> {
    value
        .map(str::to_string)
        .ok_or_else(|| Error::Query(format!("catalog returned NULL for {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_value_is_copied() {
        assert_eq!(required(Some("int"), "DATA_TYPE").unwrap(), "int");
        assert_eq!(required(Some(""), "COLUMN_NAME").unwrap(), "");
    }

    #[test]
    fn null_value_is_a_query_error() {
        for name in ["TABLE_NAME", "COLUMN_NAME", "DATA_TYPE"] {
            let err = required(None, name).unwrap_err();
            match err {
                Error::Query(message) => {
                    assert_eq!(message, format!("catalog returned NULL for {name}"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
