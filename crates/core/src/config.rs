//! Per-type configuration attached to a world entry.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::field::{FieldInfo, FieldPatch};

/// Default name of the enum attribute holding member labels.
pub const DEFAULT_ENUM_LABELS_FIELD: &str = "Labels";
/// Default suffix of the generated label map declaration.
pub const DEFAULT_ENUM_LABELS_SUFFIX: &str = "Labels";

/// What to do with one field before emission.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideAction {
    /// Drop the field.
    Remove,
    /// Patch some attributes of the field.
    Merge(FieldPatch),
    /// Replace the field outright, name included.
    Replace(FieldInfo),
}

impl From<FieldPatch> for OverrideAction {
    fn from(value: FieldPatch) -> Self {
        OverrideAction::Merge(value)
    }
}

impl From<FieldInfo> for OverrideAction {
    fn from(value: FieldInfo) -> Self {
        OverrideAction::Replace(value)
    }
}

/// Re-export of a type from another TypeScript module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFrom {
    pub module: String,
    pub original_name: String,
}

impl ImportFrom {
    pub fn new(module: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            original_name: original_name.into(),
        }
    }
}

/// Computes a sort key for an item; sorting with it is stable.
pub struct SortKey<T: ?Sized>(Arc<dyn Fn(&T) -> String + Send + Sync>);

impl<T: ?Sized> SortKey<T> {
    pub fn new(key: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(key))
    }

    pub fn key(&self, item: &T) -> String {
        (self.0)(item)
    }
}

impl SortKey<FieldInfo> {
    /// Order fields alphabetically by name.
    pub fn by_name() -> Self {
        Self::new(|field: &FieldInfo| field.name.clone())
    }
}

impl<T: ?Sized> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SortKey(..)")
    }
}

/// Stable sort of `items` by `key`.
pub(crate) fn sort_stable<T>(items: &mut [T], key: &SortKey<T>) {
    items.sort_by_cached_key(|item| key.key(item));
}

/// Options for one registered type.
#[derive(Debug, Clone)]
pub struct TypeConfiguration {
    /// Render the null-like scalar as `undefined` inside this type.
    pub null_is_undefined: bool,
    pub field_overrides: IndexMap<String, OverrideAction>,
    /// Emit an import instead of a declaration.
    pub import_from: Option<ImportFrom>,
    pub enum_labels_field: Option<String>,
    pub enum_labels_type_suffix: String,
    /// Mark fields with `required == false` as optional (`?`).
    pub non_required_fields_optional: bool,
    /// Overrides the writer-wide field order for this type.
    pub order_fields_by: Option<SortKey<FieldInfo>>,
}

impl Default for TypeConfiguration {
    fn default() -> Self {
        Self {
            null_is_undefined: false,
            field_overrides: IndexMap::new(),
            import_from: None,
            enum_labels_field: Some(DEFAULT_ENUM_LABELS_FIELD.to_string()),
            enum_labels_type_suffix: DEFAULT_ENUM_LABELS_SUFFIX.to_string(),
            non_required_fields_optional: true,
            order_fields_by: None,
        }
    }
}

impl TypeConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn null_is_undefined(mut self, value: bool) -> Self {
        self.null_is_undefined = value;
        self
    }

    pub fn override_field(
        mut self,
        name: impl Into<String>,
        action: impl Into<OverrideAction>,
    ) -> Self {
        self.field_overrides.insert(name.into(), action.into());
        self
    }

    pub fn remove_field(self, name: impl Into<String>) -> Self {
        self.override_field(name, OverrideAction::Remove)
    }

    pub fn import_from(mut self, module: impl Into<String>, original: impl Into<String>) -> Self {
        self.import_from = Some(ImportFrom::new(module, original));
        self
    }

    pub fn enum_labels(mut self, field: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.enum_labels_field = Some(field.into());
        self.enum_labels_type_suffix = suffix.into();
        self
    }

    pub fn non_required_fields_optional(mut self, value: bool) -> Self {
        self.non_required_fields_optional = value;
        self
    }

    pub fn order_fields_by(mut self, key: SortKey<FieldInfo>) -> Self {
        self.order_fields_by = Some(key);
        self
    }

    /// Reject combinations that cannot be honored.
    pub fn validate(&self) -> Result<()> {
        if let Some(import) = &self.import_from
            && !self.field_overrides.is_empty()
        {
            return Err(Error::configuration(format!(
                "import_from ({}, {}) cannot be combined with field_overrides",
                import.module, import.original_name
            )));
        }
        Ok(())
    }
}
