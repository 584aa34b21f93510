//! Enumeration label lookup.

use crate::error::{Error, Result};
use crate::shape::{EnumDef, LabelSource};

/// Resolve the labels stored under `field` on `def`, in member order.
///
/// Only members with a label are returned. `None` when the source is absent or
/// labels no member; an unsupported source is a configuration error.
pub fn enum_labels(def: &EnumDef, field: &str) -> Result<Option<Vec<(String, String)>>> {
    let entries = match def.label_source(field) {
        None => return Ok(None),
        Some(LabelSource::Namespace(entries) | LabelSource::Table(entries)) => entries,
        Some(LabelSource::Unsupported(kind)) => {
            return Err(Error::configuration(format!(
                "unsupported enum labels type for {field:?}: {kind}"
            )));
        }
    };

    let labels: Vec<(String, String)> = def
        .members
        .iter()
        .filter_map(|member| {
            entries
                .iter()
                .find(|(name, _)| *name == member.name)
                .map(|(_, label)| (member.name.clone(), label.clone()))
        })
        .collect();

    Ok((!labels.is_empty()).then_some(labels))
}
