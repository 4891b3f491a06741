//! Value-level diff between a projected remote record and the local mirror.

use ov_core::types::FieldMap;

/// The subset of projected fields whose values differ from the mirror.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDelta {
    pub changes: FieldMap,
}

impl FieldDelta {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Compare a projection against the mirror's current fields.
///
/// A field missing locally counts as changed; fields the adapter did not
/// project are ignored, so the adapter's projection defines the diffable
/// set. Values compare by value (`FieldValue` equality: dates by instant,
/// floats by `total_cmp`). Pure, never fails.
pub fn diff_fields(projected: &FieldMap, current: &FieldMap) -> FieldDelta {
    let mut changes = FieldMap::new();

    for (name, value) in projected {
        if current.get(name) != Some(value) {
            changes.insert(name.clone(), value.clone());
        }
    }

    FieldDelta { changes }
}
