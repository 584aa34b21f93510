//! TypeScript writer for a whole world.
//!
//! The pipeline is:
//! 1. Iterate: world entries in registration (or configured) order
//! 2. Declare: each entry -> `TsDecl`s (import, const enum, interface or alias)
//! 3. Flush: utility aliases required while rendering, sorted by name
//! 4. Emit: TsModule -> String (via Emit trait)
//!
//! Output is built in memory and only returned once the whole pass succeeded.

use tracing::{debug, info};

use crate::config::sort_stable;
use crate::enums::enum_labels;
use crate::error::{Error, Result};
use crate::field::FieldInfo;
use crate::merge::merge_overrides;
use crate::options::WriteOptions;
use crate::provider::{FieldProvider, default_providers, struct_fields};
use crate::render::{Renderer, ts_literal};
use crate::shape::{EnumDef, HostKind};
use crate::ts::{
    Emit, ImportItem, TsDecl, TsImport, TsModule, TsPrimitive, TsProp, TsType, TsTypeDef,
    TypeDefKind,
};
use crate::world::{Entry, World};

/// External validator for emitted code, e.g. a TypeScript compiler.
pub trait SyntaxCheck {
    /// `Err` carries the checker's diagnostics.
    fn check(&self, code: &str) -> std::result::Result<(), String>;
}

/// Writes the declarations of every entry in a world.
#[derive(Debug)]
pub struct Writer<'w> {
    world: &'w World,
    options: WriteOptions,
    providers: Vec<Box<dyn FieldProvider>>,
}

impl<'w> Writer<'w> {
    pub fn new(world: &'w World, options: WriteOptions) -> Self {
        Self {
            world,
            options,
            providers: default_providers(),
        }
    }

    /// Try `provider` before the built-in ones.
    pub fn with_provider(mut self, provider: impl FieldProvider + 'static) -> Self {
        self.providers.insert(0, Box::new(provider));
        self
    }

    /// Build the TypeScript module without emitting it.
    pub fn module(&self) -> Result<TsModule> {
        let mut renderer = Renderer::new(self.world);
        let mut decls = Vec::new();

        for entry in self.world.iterate(self.options.order_by.as_ref()) {
            debug!(name = %entry.name(), path = %entry.host().path(), "Writing type.");
            decls.extend(self.entry_decls(entry, &mut renderer)?);
        }

        for (name, ty) in renderer.take_utilities() {
            if self.world.is_name_taken(&name) {
                debug!(utility = %name, "Utility type name is registered, skipping.");
                continue;
            }
            decls.push(TsDecl::TypeDef(TsTypeDef {
                export: self.options.exported_types.is_exported(&name),
                name,
                kind: TypeDefKind::TypeAlias { ty },
                doc: None,
            }));
        }

        Ok(TsModule { decls })
    }

    /// Render the whole world to TypeScript source.
    pub fn write(&self) -> Result<String> {
        let code = self.module()?.emit();
        info!(types = self.world.len(), bytes = code.len(), "Generated TypeScript.");
        Ok(code)
    }

    /// Like [`Writer::write`], but run `checker` over the output first.
    pub fn write_checked(&self, checker: &impl SyntaxCheck) -> Result<String> {
        let code = self.write()?;
        checker
            .check(&code)
            .map_err(|message| Error::SyntaxCheck { message })?;
        Ok(code)
    }

    fn entry_decls(&self, entry: &Entry, renderer: &mut Renderer<'_>) -> Result<Vec<TsDecl>> {
        let config = entry.config();
        let export = self.options.exported_types.is_exported(entry.name());
        let doc = entry.doc().map(str::to_string);
        renderer.set_null_is_undefined(config.null_is_undefined);

        if let Some(import) = &config.import_from {
            let alias = (import.original_name != entry.name()).then(|| entry.name().to_string());
            return Ok(vec![TsDecl::Import(TsImport {
                items: vec![ImportItem {
                    name: import.original_name.clone(),
                    alias,
                }],
                from: import.module.clone(),
                doc,
            })]);
        }

        let host = entry.host();
        if let HostKind::Enum(def) = host.kind() {
            return enum_decls(entry, def, export, doc);
        }

        if let Some(fields) = struct_fields(&self.providers, host)? {
            let properties = self.properties(entry, fields, renderer)?;
            return Ok(vec![TsDecl::TypeDef(TsTypeDef {
                name: entry.name().to_string(),
                kind: TypeDefKind::Interface { properties },
                export,
                doc,
            })]);
        }

        let ty = renderer.render_definition(host)?;
        Ok(vec![TsDecl::TypeDef(TsTypeDef {
            name: entry.name().to_string(),
            kind: TypeDefKind::TypeAlias { ty },
            export,
            doc,
        })])
    }

    fn properties(
        &self,
        entry: &Entry,
        fields: Vec<FieldInfo>,
        renderer: &mut Renderer<'_>,
    ) -> Result<Vec<TsProp>> {
        let config = entry.config();
        let mut fields = merge_overrides(fields, &config.field_overrides)?;
        if let Some(key) = config
            .order_fields_by
            .as_ref()
            .or(self.options.order_fields_by.as_ref())
        {
            sort_stable(&mut fields, key);
        }

        fields
            .into_iter()
            .map(|field| {
                let (ty, has_undefined) = strip_undefined(renderer.render(&field.ty)?);
                let optional =
                    has_undefined || (config.non_required_fields_optional && !field.required);
                Ok(TsProp {
                    name: field.name,
                    ty,
                    optional,
                    doc: field.doc,
                })
            })
            .collect()
    }
}

fn enum_decls(entry: &Entry, def: &EnumDef, export: bool, doc: Option<String>) -> Result<Vec<TsDecl>> {
    let name = entry.name().to_string();
    let values = def
        .members
        .iter()
        .map(|member| (member.name.clone(), ts_literal(&member.value)))
        .collect();
    let mut decls = vec![TsDecl::TypeDef(TsTypeDef {
        name: name.clone(),
        kind: TypeDefKind::ConstEnum { values },
        export,
        doc,
    })];

    let config = entry.config();
    if let Some(field) = &config.enum_labels_field
        && let Some(labels) = enum_labels(def, field)?
    {
        decls.push(TsDecl::TypeDef(TsTypeDef {
            name: format!("{name}{}", config.enum_labels_type_suffix),
            kind: TypeDefKind::LabelMap {
                enum_name: name,
                complete: labels.len() == def.members.len(),
                labels,
            },
            export,
            doc: None,
        }));
    }
    Ok(decls)
}

/// Remove `undefined` from a top-level union, reporting whether it was there.
/// A lone `undefined` member is kept.
fn strip_undefined(ty: TsType) -> (TsType, bool) {
    let is_undefined = |ty: &TsType| matches!(ty, TsType::Primitive(TsPrimitive::Undefined));
    match ty {
        TsType::Union(members) if members.iter().any(is_undefined) => {
            let mut kept: Vec<TsType> = members.into_iter().filter(|m| !is_undefined(m)).collect();
            let ty = match kept.len() {
                0 => TsType::Primitive(TsPrimitive::Undefined),
                1 => kept.remove(0),
                _ => TsType::Union(kept),
            };
            (ty, true)
        }
        TsType::Commented { inner, comments } => {
            let (inner, found) = strip_undefined(*inner);
            (inner.with_comments(comments), found)
        }
        other => (other, false),
    }
}

/// Render `world` to TypeScript with `options`.
pub fn write_typescript(world: &World, options: WriteOptions) -> Result<String> {
    Writer::new(world, options).write()
}

impl World {
    /// Render this world to TypeScript.
    pub fn to_typescript(&self, options: &WriteOptions) -> Result<String> {
        write_typescript(self, options.clone())
    }
}
