//! Tabular rendering of objects for CLI clients.

use apikit_meta::ListMeta;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    pub description: String,
    /// 0 is shown by default; higher values only in wide output.
    pub priority: u8,
}

impl TableColumnDefinition {
    #[must_use]
    pub fn string(name: &str, description: &str, priority: u8) -> Self {
        Self {
            name: name.to_owned(),
            column_type: "string".to_owned(),
            format: String::new(),
            description: description.to_owned(),
            priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub cells: Vec<String>,
    /// Name of the object the row was rendered from.
    pub object_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub metadata: ListMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_definitions: Vec<TableColumnDefinition>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Omit column definitions (the client already has them).
    pub no_headers: bool,
}

pub trait TableConvertor<T>: Send + Sync {
    fn convert_to_table(&self, obj: &T, options: TableOptions) -> Table;
}
