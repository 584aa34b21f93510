//! Structural providers: extract an ordered field list from a host type, or decline.
//!
//! Providers are tried in order and the first one that answers wins. The
//! default chain understands plain records, keyed dictionaries and framework
//! models; callers can push their own implementations in front.

pub mod model;

use std::fmt;

use crate::error::Result;
use crate::field::FieldInfo;
use crate::shape::{HostKind, HostType};

pub use model::ModelProvider;

/// Something that can list the fields of a struct-like host type.
pub trait FieldProvider: fmt::Debug + Send + Sync {
    /// `Ok(None)` means this provider does not apply to `host`.
    fn fields(&self, host: &HostType) -> Result<Option<Vec<FieldInfo>>>;
}

/// Plain record types: fields as declared, all required unless marked otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordProvider;

impl FieldProvider for RecordProvider {
    fn fields(&self, host: &HostType) -> Result<Option<Vec<FieldInfo>>> {
        Ok(match host.kind() {
            HostKind::Record(fields) => Some(fields.clone()),
            _ => None,
        })
    }
}

/// Keyed dictionaries. A non-total dictionary makes every key optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedDictProvider;

impl FieldProvider for KeyedDictProvider {
    fn fields(&self, host: &HostType) -> Result<Option<Vec<FieldInfo>>> {
        Ok(match host.kind() {
            HostKind::KeyedDict { fields, total } => Some(
                fields
                    .iter()
                    .map(|field| {
                        if *total {
                            field.clone()
                        } else {
                            field.clone().with_required(false)
                        }
                    })
                    .collect(),
            ),
            _ => None,
        })
    }
}

/// The default provider chain, in priority order.
pub fn default_providers() -> Vec<Box<dyn FieldProvider>> {
    vec![
        Box::new(RecordProvider),
        Box::new(KeyedDictProvider),
        Box::new(ModelProvider),
    ]
}

/// Ask each provider in turn; the first that applies wins.
pub fn struct_fields(
    providers: &[Box<dyn FieldProvider>],
    host: &HostType,
) -> Result<Option<Vec<FieldInfo>>> {
    for provider in providers {
        if let Some(fields) = provider.fields(host)? {
            return Ok(Some(fields));
        }
    }
    Ok(None)
}
