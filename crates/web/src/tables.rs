//! Declarative column specifications for dashboard list tables.

use serde::Serialize;

/// How a cell is rendered in the table UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Row-selection checkbox.
    Checkbox,
    /// Plain text.
    Plain,
    /// Text linking to the row's detail page.
    Link,
    /// A closed-enum choice rendered as a labelled badge.
    Choice,
    /// A boolean rendered as a yes/no mark.
    Boolean,
    /// A formatted timestamp.
    Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: CellKind,
    pub sortable: bool,
}

/// A table: the full column set plus the subset shown by default.
#[derive(Debug, Clone, Serialize)]
pub struct TableSpec {
    pub columns: Vec<Column>,
    pub default_columns: &'static [&'static str],
}

impl TableSpec {
    /// Columns in the default-visible subset, in declaration order.
    pub fn default_visible(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| self.default_columns.contains(&c.key))
            .collect()
    }
}

/// The dashboard metrics list table.
pub fn metric_table() -> TableSpec {
    TableSpec {
        columns: vec![
            Column {
                key: "pk",
                label: "",
                kind: CellKind::Checkbox,
                sortable: false,
            },
            Column {
                key: "id",
                label: "ID",
                kind: CellKind::Plain,
                sortable: true,
            },
            Column {
                key: "title",
                label: "Title",
                kind: CellKind::Link,
                sortable: true,
            },
            Column {
                key: "status",
                label: "Status",
                kind: CellKind::Choice,
                sortable: true,
            },
            Column {
                key: "visibility",
                label: "Visibility",
                kind: CellKind::Boolean,
                sortable: true,
            },
            Column {
                key: "expand",
                label: "Expand",
                kind: CellKind::Boolean,
                sortable: true,
            },
            Column {
                key: "created",
                label: "Created",
                kind: CellKind::Timestamp,
                sortable: true,
            },
            Column {
                key: "last_updated",
                label: "Last Updated",
                kind: CellKind::Timestamp,
                sortable: true,
            },
        ],
        default_columns: &["id", "title", "status", "visibility", "expand"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns_are_declared_columns() {
        let spec = metric_table();
        let keys: Vec<&str> = spec.columns.iter().map(|c| c.key).collect();
        for key in spec.default_columns {
            assert!(keys.contains(key), "default column {key} not declared");
        }
        assert_eq!(spec.default_visible().len(), spec.default_columns.len());
    }

    #[test]
    fn title_linkifies_and_status_is_choice() {
        let spec = metric_table();
        let by_key = |k: &str| spec.columns.iter().find(|c| c.key == k).unwrap();
        assert_eq!(by_key("title").kind, CellKind::Link);
        assert_eq!(by_key("status").kind, CellKind::Choice);
        assert_eq!(by_key("visibility").kind, CellKind::Boolean);
        assert!(!by_key("pk").sortable);
    }
}
