use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::TabId;
use crate::value_objects::{ColumnWidth, TabName};

/// Icon used when a tab is created without one.
pub const DEFAULT_TAB_ICON: &str = "layout-dashboard";

/// A dashboard tab on a character sheet.
///
/// Simple data struct; the tab count limit and the delete-only-when-empty rule
/// live on the character aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTab {
    pub id: TabId,
    pub name: TabName,
    pub icon: String,
    pub order: u32,
    /// Width per column index; columns without an entry use the default width.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_widths: BTreeMap<u8, ColumnWidth>,
}

impl DashboardTab {
    pub fn new(name: TabName, order: u32) -> Self {
        Self {
            id: TabId::new(),
            name,
            icon: DEFAULT_TAB_ICON.to_string(),
            order,
            column_widths: BTreeMap::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn column_width(&self, column: u8) -> ColumnWidth {
        self.column_widths.get(&column).copied().unwrap_or_default()
    }

    /// Advance a column's width one step (4 wraps to 1) and return it.
    pub fn cycle_column_width(&mut self, column: u8) -> ColumnWidth {
        let next = self.column_width(column).cycled();
        self.column_widths.insert(column, next);
        next
    }
}
