//! TypeScript AST and emission.
//!
//! The engine never builds TypeScript text directly:
//! 1. Rendering: `TypeExpr` -> `TsType` (see `render`)
//! 2. Declarations: world entries -> `TsTypeDef` / `TsImport` (see `writer`)
//! 3. Emission: AST -> code strings via the `Emit` trait
//!
//! ## Module Structure
//!
//! - `types`: TypeScript AST (TsType, TsTypeDef, TsImport, TsModule)
//! - `emit`: TypeScript AST -> code strings
//! - `utils`: identifier quoting, comment and docstring helpers

mod emit;
mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{
    ImportItem, TsDecl, TsImport, TsLiteral, TsModule, TsParam, TsPrimitive, TsProp, TsType,
    TsTypeDef, TypeDefKind,
};
