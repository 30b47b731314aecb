use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// One raw `(table, column, native type)` row as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub table_name: String,
    pub column_name: String,
    pub native_type: String,
}

impl CatalogRow {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        native_type: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            native_type: native_type.into(),
        }
    }
}

/// A column of one table as discovered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Type name exactly as reported by the source catalog (e.g. `int`).
    pub native_type: String,
}

/// Columns of one table in catalog row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    fn empty(name: String) -> Self {
        Self {
            name,
            columns: Vec::new(),
        }
    }
}

/// Tables keyed by name, built once from the catalog rows of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMapping {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaMapping {
    /// Fold catalog rows into per-table column lists.
    ///
    /// Column order within a table is the order rows were seen. Rows are not
    /// sorted, deduplicated or validated: a `(table, column)` pair reported
    /// twice yields two descriptors.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = CatalogRow>,
    {
        let mut tables: BTreeMap<String, TableSchema> = BTreeMap::new();

        for row in rows {
            let CatalogRow {
                table_name,
                column_name,
                native_type,
            } = row;

            let table = match tables.entry(table_name) {
                btree_map::Entry::Occupied(entry) => entry.into_mut(),
                btree_map::Entry::Vacant(entry) => {
                    let name = entry.key().clone();
                    entry.insert(TableSchema::empty(name))
                }
            };
            table.columns.push(ColumnDescriptor {
                name: column_name,
                native_type,
            });
        }

        Self { tables }
    }

    /// Flatten back into catalog rows, table by table in column-list order.
    pub fn flatten(&self) -> Vec<CatalogRow> {
        self.tables
            .values()
            .flat_map(|table| {
                table.columns.iter().map(move |column| {
                    CatalogRow::new(&table.name, &column.name, &column.native_type)
                })
            })
            .collect()
    }

    pub fn get(&self, table_name: &str) -> Option<&TableSchema> {
        self.tables.get(table_name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of column descriptors across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.values().map(|table| table.columns.len()).sum()
    }
}
