#![forbid(unsafe_code)]
#![deny(unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Compile descriptions of host-language types into TypeScript declarations.
//!
//! The pipeline is:
//! 1. Describe: a front-end builds [`HostType`]s and [`TypeExpr`]s (or loads a
//!    JSON document with [`load_world`])
//! 2. Register: host types go into a [`World`], which assigns collision-free names
//! 3. Write: a [`Writer`] asks the structural providers for fields, applies
//!    overrides, renders every type through the [`Renderer`] and emits the module
//!
//! ```
//! use typegen_core::{Builtin, FieldInfo, HostType, TypeExpr, World, WriteOptions};
//!
//! let mut world = World::new();
//! world
//!     .register(HostType::record(
//!         "app.Person",
//!         vec![
//!             FieldInfo::new("name", Builtin::Str),
//!             FieldInfo::new("nickname", TypeExpr::optional(Builtin::Str)),
//!         ],
//!     ))
//!     .unwrap();
//! let code = world.to_typescript(&WriteOptions::default()).unwrap();
//! assert_eq!(
//!     code,
//!     "export interface Person {\n  name: string;\n  nickname: string | null;\n}\n"
//! );
//! ```

mod config;
mod document;
mod enums;
mod error;
mod field;
mod merge;
mod options;
pub mod provider;
mod render;
mod shape;
pub mod ts;
mod world;
mod writer;

pub use config::{
    DEFAULT_ENUM_LABELS_FIELD, DEFAULT_ENUM_LABELS_SUFFIX, ImportFrom, OverrideAction, SortKey,
    TypeConfiguration,
};
pub use document::load_world;
pub use enums::enum_labels;
pub use error::{Error, Result};
pub use field::{FieldInfo, FieldPatch};
pub use merge::merge_overrides;
pub use options::{ExportedTypes, Exports, FieldOrder, OptionsFile, TypeOrder, WriteOptions};
pub use provider::model::{ModelDef, ModelField, ModelFieldKind, RelationTarget};
pub use provider::{FieldProvider, KeyedDictProvider, ModelProvider, RecordProvider};
pub use render::Renderer;
pub use shape::{
    Builtin, EnumDef, EnumMember, HostForm, HostKind, HostRef, HostType, LabelSource,
    LiteralValue, MappingOrigin, SequenceOrigin, Signature, TypePath, TypeExpr,
};
pub use world::{Entry, EntryHandle, Registration, World};
pub use writer::{SyntaxCheck, Writer, write_typescript};
