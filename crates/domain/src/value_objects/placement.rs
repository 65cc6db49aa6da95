//! Where a data item sits on the character dashboard.
//!
//! Older sheets placed items in named zones; current sheets place them in a
//! tab and column. A placement is always exactly one of the two, and the only
//! conversion offered goes zone -> tab.

use serde::{Deserialize, Serialize};

use crate::ids::TabId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Placement {
    /// Legacy zone placement.
    Zone { zone: String, order: u32 },
    /// Tab and column placement.
    #[serde(rename_all = "camelCase")]
    Tab { tab_id: TabId, column: u8, order: u32 },
}

/// The set of items an order value is relative to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlacementScope {
    Zone(String),
    Column { tab_id: TabId, column: u8 },
}

impl Placement {
    pub fn tab(tab_id: TabId, column: u8, order: u32) -> Self {
        Placement::Tab {
            tab_id,
            column,
            order,
        }
    }

    pub fn order(&self) -> u32 {
        match self {
            Placement::Zone { order, .. } | Placement::Tab { order, .. } => *order,
        }
    }

    pub fn set_order(&mut self, value: u32) {
        match self {
            Placement::Zone { order, .. } | Placement::Tab { order, .. } => *order = value,
        }
    }

    pub fn tab_id(&self) -> Option<TabId> {
        match self {
            Placement::Tab { tab_id, .. } => Some(*tab_id),
            Placement::Zone { .. } => None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Placement::Zone { .. })
    }

    pub fn scope(&self) -> PlacementScope {
        match self {
            Placement::Zone { zone, .. } => PlacementScope::Zone(zone.clone()),
            Placement::Tab { tab_id, column, .. } => PlacementScope::Column {
                tab_id: *tab_id,
                column: *column,
            },
        }
    }

    pub fn in_scope(&self, scope: &PlacementScope) -> bool {
        match (self, scope) {
            (Placement::Zone { zone, .. }, PlacementScope::Zone(target)) => zone == target,
            (
                Placement::Tab { tab_id, column, .. },
                PlacementScope::Column {
                    tab_id: target_tab,
                    column: target_column,
                },
            ) => tab_id == target_tab && column == target_column,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_matches_only_same_column() {
        let tab = TabId::new();
        let placement = Placement::tab(tab, 1, 3);
        assert!(placement.in_scope(&PlacementScope::Column { tab_id: tab, column: 1 }));
        assert!(!placement.in_scope(&PlacementScope::Column { tab_id: tab, column: 0 }));
        assert!(!placement.in_scope(&PlacementScope::Zone("main".into())));
    }

    #[test]
    fn legacy_placements_have_no_tab() {
        let placement = Placement::Zone {
            zone: "combat".into(),
            order: 2,
        };
        assert!(placement.is_legacy());
        assert_eq!(placement.tab_id(), None);
        assert_eq!(placement.order(), 2);
    }

    #[test]
    fn json_shape_names_the_scheme() {
        let placement = Placement::Zone {
            zone: "main".into(),
            order: 0,
        };
        let json = serde_json::to_value(&placement).expect("serialize");
        assert_eq!(json["scheme"], "zone");
        assert_eq!(json["zone"], "main");
    }
}
