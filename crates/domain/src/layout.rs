//! Placement and reordering rules for data items on a dashboard.
//!
//! Order values are relative to a scope (a legacy zone, or one column of one
//! tab). Appending puts an item one past the scope's current maximum; dropping
//! an item onto another renumbers the whole scope `0..n`.

use std::collections::HashMap;

use crate::entities::DataItem;
use crate::error::DomainError;
use crate::ids::{DataItemId, TabId};
use crate::value_objects::{Placement, PlacementScope};

fn index_of(items: &[DataItem], id: DataItemId) -> Result<usize, DomainError> {
    items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| DomainError::not_found("DataItem", id.to_string()))
}

fn placement_in(scope: &PlacementScope, order: u32) -> Placement {
    match scope {
        PlacementScope::Zone(zone) => Placement::Zone {
            zone: zone.clone(),
            order,
        },
        PlacementScope::Column { tab_id, column } => Placement::tab(*tab_id, *column, order),
    }
}

/// Ids of the items in `scope`, sorted by order (ties keep storage order).
pub fn scope_members(items: &[DataItem], scope: &PlacementScope) -> Vec<DataItemId> {
    let mut members: Vec<(u32, usize, DataItemId)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.placement.in_scope(scope))
        .map(|(index, item)| (item.placement.order(), index, item.id))
        .collect();
    members.sort();
    members.into_iter().map(|(_, _, id)| id).collect()
}

/// The order an item appended to `scope` receives. `exclude` skips the item
/// being moved so re-appending it does not count its own old position.
pub fn next_order(items: &[DataItem], scope: &PlacementScope, exclude: Option<DataItemId>) -> u32 {
    items
        .iter()
        .filter(|item| Some(item.id) != exclude && item.placement.in_scope(scope))
        .map(|item| item.placement.order())
        .max()
        .map_or(0, |max| max + 1)
}

/// Renumber the items of a scope `0..n` keeping their relative order.
pub fn reindex_scope(items: &mut [DataItem], scope: &PlacementScope) {
    let order: HashMap<DataItemId, u32> = scope_members(items, scope)
        .into_iter()
        .enumerate()
        .map(|(position, id)| (id, position as u32))
        .collect();
    for item in items.iter_mut() {
        if let Some(position) = order.get(&item.id) {
            item.placement.set_order(*position);
        }
    }
}

/// Append an item to the end of its current scope.
pub fn move_to_end(items: &mut [DataItem], item_id: DataItemId) -> Result<(), DomainError> {
    let index = index_of(items, item_id)?;
    let scope = items[index].placement.scope();
    let order = next_order(items, &scope, Some(item_id));
    items[index].placement.set_order(order);
    Ok(())
}

/// Move an item to column 0 of another tab, appended at the end.
///
/// A legacy zone placement is replaced by the tab placement.
pub fn move_to_tab(
    items: &mut [DataItem],
    item_id: DataItemId,
    tab_id: TabId,
) -> Result<(), DomainError> {
    let index = index_of(items, item_id)?;
    if items[index].placement.tab_id() == Some(tab_id) {
        return Ok(());
    }
    let scope = PlacementScope::Column { tab_id, column: 0 };
    let order = next_order(items, &scope, Some(item_id));
    items[index].placement = placement_in(&scope, order);
    Ok(())
}

/// Move an item to another column of the tab it is on, appended at the end.
pub fn move_to_column(
    items: &mut [DataItem],
    item_id: DataItemId,
    column: u8,
) -> Result<(), DomainError> {
    let index = index_of(items, item_id)?;
    let tab_id = items[index].placement.tab_id().ok_or_else(|| {
        DomainError::constraint("Item is in a legacy zone; move it to a tab first")
    })?;
    let scope = PlacementScope::Column { tab_id, column };
    let order = next_order(items, &scope, Some(item_id));
    items[index].placement = placement_in(&scope, order);
    Ok(())
}

/// Drop `item_id` onto `target_id`: the moved item takes the target's index in
/// the target's scope and the scope is renumbered `0..n`.
pub fn move_onto_item(
    items: &mut [DataItem],
    item_id: DataItemId,
    target_id: DataItemId,
) -> Result<(), DomainError> {
    let moved_index = index_of(items, item_id)?;
    let target_index = index_of(items, target_id)?;
    if item_id == target_id {
        return Ok(());
    }

    let scope = items[target_index].placement.scope();
    if items[target_index].placement.is_legacy() && !items[moved_index].placement.is_legacy() {
        return Err(DomainError::constraint(
            "Items cannot be moved back into a legacy zone",
        ));
    }

    let mut members = scope_members(items, &scope);
    let insert_at = members
        .iter()
        .position(|id| *id == target_id)
        .unwrap_or(members.len());
    members.retain(|id| *id != item_id);
    members.insert(insert_at.min(members.len()), item_id);

    items[moved_index].placement = placement_in(&scope, 0);
    let order: HashMap<DataItemId, u32> = members
        .into_iter()
        .enumerate()
        .map(|(position, id)| (id, position as u32))
        .collect();
    for item in items.iter_mut() {
        if let Some(position) = order.get(&item.id) {
            item.placement.set_order(*position);
        }
    }
    Ok(())
}

/// Move every legacy zone item onto `tab_id`.
///
/// Zones become columns in the order they are first seen; each zone keeps its
/// internal order and is appended after anything already in that column.
/// Returns the number of items migrated.
pub fn migrate_zones_to_tab(items: &mut [DataItem], tab_id: TabId) -> usize {
    let mut zones: Vec<String> = Vec::new();
    for item in items.iter() {
        if let Placement::Zone { zone, .. } = &item.placement {
            if !zones.contains(zone) {
                zones.push(zone.clone());
            }
        }
    }

    let mut migrated = 0;
    for (column, zone) in zones.into_iter().enumerate() {
        let zone_scope = PlacementScope::Zone(zone);
        let column_scope = PlacementScope::Column {
            tab_id,
            column: u8::try_from(column).unwrap_or(u8::MAX),
        };
        let base = next_order(items, &column_scope, None);
        for (offset, id) in scope_members(items, &zone_scope).into_iter().enumerate() {
            if let Some(item) = items.iter_mut().find(|item| item.id == id) {
                item.placement = placement_in(&column_scope, base + offset as u32);
                migrated += 1;
            }
        }
    }
    migrated
}
