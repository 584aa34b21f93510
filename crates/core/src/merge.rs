//! Applying field overrides to a provider's field list.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::OverrideAction;
use crate::error::{Error, Result};
use crate::field::FieldInfo;

/// Apply `overrides` to `fields`.
///
/// Fields named in `overrides` are removed, replaced or patched in place.
/// Overrides naming fields the provider did not report are appended in
/// override order, which is how fields invisible to a provider are surfaced.
pub fn merge_overrides(
    fields: Vec<FieldInfo>,
    overrides: &IndexMap<String, OverrideAction>,
) -> Result<Vec<FieldInfo>> {
    let original_names: HashSet<String> = fields.iter().map(|f| f.name.clone()).collect();
    let mut merged = Vec::with_capacity(fields.len());

    for field in fields {
        match overrides.get(&field.name) {
            None => merged.push(field),
            Some(OverrideAction::Remove) => {
                debug!(field = %field.name, "Removing field by override.");
            }
            Some(OverrideAction::Replace(replacement)) => merged.push(replacement.clone()),
            Some(OverrideAction::Merge(patch)) => merged.push(field.patched(patch)),
        }
    }

    for (name, action) in overrides {
        if original_names.contains(name) {
            continue;
        }
        match action {
            OverrideAction::Remove => {}
            OverrideAction::Replace(field) => merged.push(field.clone()),
            OverrideAction::Merge(patch) => {
                let Some(ty) = &patch.ty else {
                    return Err(Error::configuration(format!(
                        "override for field {name:?} adds a new field and must specify its type"
                    )));
                };
                merged.push(FieldInfo::new(name.clone(), ty.clone()).patched(patch));
            }
        }
    }

    let mut seen = HashSet::new();
    for field in &merged {
        if !seen.insert(field.name.as_str()) {
            return Err(Error::configuration(format!(
                "field {:?} appears more than once after applying overrides",
                field.name
            )));
        }
    }

    Ok(merged)
}
