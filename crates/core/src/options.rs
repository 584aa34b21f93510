//! Writer-wide options and the TOML options file.
//!
//! ```toml
//! exported_types = ["Person", "Status"]   # or true / false
//! order_types_by = "name"                 # or "registration"
//! order_fields_by = "source"              # or "name"
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::SortKey;
use crate::error::{Error, Result};
use crate::field::FieldInfo;
use crate::world::Entry;

/// Which declarations get the `export` modifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Exports {
    #[default]
    All,
    None,
    /// Only declarations with these names.
    Only(BTreeSet<String>),
}

impl Exports {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn is_exported(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Only(names) => names.contains(name),
        }
    }
}

/// Options for one output pass.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub exported_types: Exports,
    /// Type order; registration order when unset.
    pub order_by: Option<SortKey<Entry>>,
    /// Default field order, overridable per type; source order when unset.
    pub order_fields_by: Option<SortKey<FieldInfo>>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exported_types(mut self, exports: Exports) -> Self {
        self.exported_types = exports;
        self
    }

    pub fn order_by(mut self, key: SortKey<Entry>) -> Self {
        self.order_by = Some(key);
        self
    }

    pub fn order_fields_by(mut self, key: SortKey<FieldInfo>) -> Self {
        self.order_fields_by = Some(key);
        self
    }

    /// Parse an options file.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: OptionsFile = toml::from_str(contents)
            .map_err(|err| Error::document(format!("failed to parse options file: {err}")))?;
        Ok(file.into())
    }
}

/// `exported_types` as written in the options file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportedTypes {
    Flag(bool),
    Names(Vec<String>),
}

impl Default for ExportedTypes {
    fn default() -> Self {
        Self::Flag(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeOrder {
    #[default]
    Registration,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    #[default]
    Source,
    Name,
}

/// On-disk form of [`WriteOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsFile {
    #[serde(default)]
    pub exported_types: ExportedTypes,
    #[serde(default)]
    pub order_types_by: TypeOrder,
    #[serde(default)]
    pub order_fields_by: FieldOrder,
}

impl From<OptionsFile> for WriteOptions {
    fn from(file: OptionsFile) -> Self {
        let exported_types = match file.exported_types {
            ExportedTypes::Flag(true) => Exports::All,
            ExportedTypes::Flag(false) => Exports::None,
            ExportedTypes::Names(names) => Exports::only(names),
        };
        Self {
            exported_types,
            order_by: match file.order_types_by {
                TypeOrder::Registration => None,
                TypeOrder::Name => Some(SortKey::<Entry>::by_name()),
            },
            order_fields_by: match file.order_fields_by {
                FieldOrder::Source => None,
                FieldOrder::Name => Some(SortKey::<FieldInfo>::by_name()),
            },
        }
    }
}
