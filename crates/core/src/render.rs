//! Type-mapping engine: classifies a [`TypeExpr`] and builds the TypeScript type for it.
//!
//! One [`Renderer`] is used per output pass. It borrows the [`World`] read-only
//! for by-name references and accumulates the utility aliases (UUID, ISO 8601
//! dates) that the rendered types refer to, so the writer can emit them once
//! at the end.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::shape::{
    Builtin, HostForm, HostKind, HostRef, HostType, LiteralValue, MappingOrigin, SequenceOrigin,
    TypeExpr,
};
use crate::ts::{Emit, TsLiteral, TsParam, TsPrimitive, TsType};
use crate::world::World;

/// Renders type expressions against a world for one output pass.
#[derive(Debug)]
pub struct Renderer<'w> {
    world: &'w World,
    null_is_undefined: bool,
    utilities: BTreeMap<String, TsType>,
}

impl<'w> Renderer<'w> {
    pub fn new(world: &'w World) -> Self {
        Self {
            world,
            null_is_undefined: false,
            utilities: BTreeMap::new(),
        }
    }

    /// Render the null-like scalar as `undefined` instead of `null`.
    pub fn set_null_is_undefined(&mut self, value: bool) {
        self.null_is_undefined = value;
    }

    /// Utility aliases required so far, keyed by name.
    pub fn utilities(&self) -> &BTreeMap<String, TsType> {
        &self.utilities
    }

    pub fn take_utilities(&mut self) -> BTreeMap<String, TsType> {
        std::mem::take(&mut self.utilities)
    }

    pub fn render(&mut self, expr: &TypeExpr) -> Result<TsType> {
        self.render_with(expr, Vec::new())
    }

    /// Render straight to TypeScript text.
    pub fn render_text(&mut self, expr: &TypeExpr) -> Result<String> {
        Ok(self.render(expr)?.emit())
    }

    /// Render `expr`, attaching `comments` (from enclosing annotations) to the result.
    pub fn render_with(&mut self, expr: &TypeExpr, mut comments: Vec<String>) -> Result<TsType> {
        match expr {
            TypeExpr::NewType { name, supertype } => {
                let ty = self.render(supertype)?;
                Ok(ty.with_comments(vec![name.clone()]).with_comments(comments))
            }
            TypeExpr::Annotated {
                inner,
                comments: own,
            } => {
                let mut merged = own.clone();
                merged.extend(comments);
                self.render_with(inner, merged)
            }
            TypeExpr::Host(host) => match self.world.name_of(host.path()) {
                Some(name) => Ok(TsType::Ref(name.to_string()).with_comments(comments)),
                None => self.render_unregistered_with(host, comments),
            },
            TypeExpr::Any => {
                // Caller comments explain the situation better than "any"
                if comments.is_empty() {
                    comments.push("any".to_string());
                }
                Ok(TsType::unknown().with_comments(comments))
            }
            TypeExpr::ForwardRef(name) => {
                comments.push(format!("forward reference: {name}"));
                Ok(TsType::unknown().with_comments(comments))
            }
            TypeExpr::TypeVar(name) => {
                comments.push(format!("type: ~{}", name.trim_start_matches('~')));
                Ok(TsType::unknown().with_comments(comments))
            }
            TypeExpr::Ellipsis => {
                comments.push("...".to_string());
                Ok(TsType::unknown().with_comments(comments))
            }
            TypeExpr::Builtin(builtin) => {
                let (ty, extra) = self.builtin(*builtin, builtin.name());
                comments.extend(extra);
                Ok(ty.with_comments(comments))
            }
            TypeExpr::Callable(None) => Ok(TsType::Ref("Function".to_string()).with_comments(comments)),
            TypeExpr::Callable(Some(signature)) => {
                let params = signature
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, param)| {
                        Ok(TsParam {
                            name: format!("_{i}"),
                            ty: self.render(param)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let returns = Box::new(self.render(&signature.returns)?);
                Ok(TsType::Function { params, returns }.with_comments(comments))
            }
            TypeExpr::Optional(inner) => {
                let members = [inner.as_ref().clone(), TypeExpr::Builtin(Builtin::None)];
                Ok(self.render_union(&members)?.with_comments(comments))
            }
            TypeExpr::Union(members) => Ok(self.render_union(members)?.with_comments(comments)),
            TypeExpr::Tuple(items) => Ok(self.render_tuple(items)?.with_comments(comments)),
            TypeExpr::Literal(values) => Ok(render_literal(values)?.with_comments(comments)),
            TypeExpr::Sequence { origin, item } => {
                if *origin != SequenceOrigin::List {
                    comments.insert(0, origin.name().to_string());
                }
                let inner = self.render(item)?;
                Ok(TsType::Array(Box::new(inner)).with_comments(comments))
            }
            TypeExpr::Counter(item) => {
                let key = self.render(item)?;
                Ok(TsType::Record {
                    key: Box::new(key),
                    value: Box::new(TsType::number()),
                }
                .with_comments(comments))
            }
            TypeExpr::Mapping { origin, key, value } => {
                if *origin != MappingOrigin::Dict {
                    comments.insert(0, origin.name().to_string());
                }
                let key = self.render(key)?;
                let value = self.render(value)?;
                Ok(TsType::Record {
                    key: Box::new(key),
                    value: Box::new(value),
                }
                .with_comments(comments))
            }
            TypeExpr::Generic { origin, args } => Err(Error::UnknownOrigin {
                origin: origin.clone(),
                args: format!("{args:?}"),
            }),
        }
    }

    /// Render a host reference without consulting the world.
    pub fn render_unregistered(&mut self, host: &HostRef) -> Result<TsType> {
        self.render_unregistered_with(host, Vec::new())
    }

    /// Render the definition of a host type: the right-hand side of `type Name = ...`.
    pub fn render_definition(&mut self, host: &HostType) -> Result<TsType> {
        match host.kind() {
            HostKind::Alias(target) => self.render(target),
            _ => self.render_unregistered(&host.to_ref()),
        }
    }

    fn render_unregistered_with(&mut self, host: &HostRef, mut comments: Vec<String>) -> Result<TsType> {
        match host.form() {
            HostForm::NamedTuple(slots) => {
                comments.insert(0, host.name().to_string());
                let items = slots
                    .iter()
                    .map(|slot| TsType::unknown().with_comments(vec![slot.clone()]))
                    .collect();
                Ok(TsType::Tuple(items).with_comments(comments))
            }
            HostForm::Subclass(base) => {
                let (ty, extra) = self.builtin(*base, host.name());
                comments.extend(extra);
                Ok(ty.with_comments(comments))
            }
            HostForm::Plain => Err(Error::Unreferrable {
                ty: host.path().to_string(),
            }),
        }
    }

    /// The builtin ladder. `display_name` is the name used in comments, which
    /// differs from the builtin's own name for subclasses.
    fn builtin(&mut self, builtin: Builtin, display_name: &str) -> (TsType, Vec<String>) {
        match builtin {
            Builtin::Bytes | Builtin::ByteArray | Builtin::MemoryView => {
                (TsType::unknown(), vec![display_name.to_string()])
            }
            Builtin::Bool => (TsType::Primitive(TsPrimitive::Boolean), Vec::new()),
            Builtin::Complex => (
                TsType::Tuple(vec![TsType::number(), TsType::number()]),
                vec!["complex".to_string()],
            ),
            Builtin::Path | Builtin::IpAddress | Builtin::Pattern => {
                (TsType::string(), vec![display_name.to_string()])
            }
            Builtin::Int | Builtin::Float | Builtin::Decimal | Builtin::Duration => {
                (TsType::number(), Vec::new())
            }
            Builtin::Uuid => (self.utility("UUID"), Vec::new()),
            Builtin::Str => (TsType::string(), Vec::new()),
            Builtin::None => {
                let ty = if self.null_is_undefined {
                    TsPrimitive::Undefined
                } else {
                    TsPrimitive::Null
                };
                (TsType::Primitive(ty), Vec::new())
            }
            Builtin::Date => (self.utility("ISO8601Date"), Vec::new()),
            Builtin::Time => (self.utility("ISO8601Time"), Vec::new()),
            Builtin::DateTime => (self.utility("ISO8601"), Vec::new()),
            Builtin::Counter => (
                TsType::Record {
                    key: Box::new(record_key()),
                    value: Box::new(TsType::number()),
                },
                vec!["Counter".to_string()],
            ),
            Builtin::Dict => {
                let comments = if display_name == Builtin::Dict.name() {
                    Vec::new()
                } else {
                    vec![display_name.to_string()]
                };
                (
                    TsType::Record {
                        key: Box::new(record_key()),
                        value: Box::new(TsType::unknown()),
                    },
                    comments,
                )
            }
        }
    }

    fn utility(&mut self, name: &str) -> TsType {
        if !self.utilities.contains_key(name) {
            debug!(utility = %name, "Requiring utility type.");
            self.utilities.insert(name.to_string(), TsType::string());
        }
        TsType::Ref(name.to_string())
    }

    fn render_union(&mut self, members: &[TypeExpr]) -> Result<TsType> {
        let mut seen = HashSet::new();
        let mut rendered = Vec::new();
        for member in members {
            let ty = self.render(member)?;
            // Nested unions flatten into this one
            let parts = match ty {
                TsType::Union(inner) => inner,
                other => vec![other],
            };
            for part in parts {
                let text = part.emit();
                if seen.insert(text.clone()) {
                    rendered.push(part);
                } else {
                    debug!(member = %text, "Collapsed duplicate union member.");
                }
            }
        }
        Ok(match rendered.len() {
            1 => rendered.remove(0),
            _ => TsType::Union(rendered),
        })
    }

    fn render_tuple(&mut self, items: &[TypeExpr]) -> Result<TsType> {
        if let Some((TypeExpr::Ellipsis, head)) = items.split_last() {
            return match head {
                [item] => Ok(TsType::VariadicTuple(Box::new(self.render(item)?))),
                _ => Err(Error::invalid_shape(format!(
                    "variadic tuple must have exactly one element type before `...`, got {}",
                    head.len()
                ))),
            };
        }
        if items.contains(&TypeExpr::Ellipsis) {
            return Err(Error::invalid_shape(
                "`...` is only allowed as the last element of a tuple",
            ));
        }
        let items = items
            .iter()
            .map(|item| self.render(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(TsType::Tuple(items))
    }
}

fn record_key() -> TsType {
    TsType::Union(vec![
        TsType::string(),
        TsType::number(),
        TsType::Primitive(TsPrimitive::Symbol),
    ])
}

fn render_literal(values: &[LiteralValue]) -> Result<TsType> {
    if values.is_empty() {
        return Err(Error::invalid_shape("literal type with no values"));
    }
    let mut seen = HashSet::new();
    let mut literals: Vec<TsType> = values
        .iter()
        .map(|value| TsType::Literal(ts_literal(value)))
        .filter(|ty| seen.insert(ty.emit()))
        .collect();
    Ok(match literals.len() {
        1 => literals.remove(0),
        _ => TsType::Union(literals),
    })
}

pub(crate) fn ts_literal(value: &LiteralValue) -> TsLiteral {
    match value {
        LiteralValue::Str(s) => TsLiteral::String(s.clone()),
        LiteralValue::Int(i) => TsLiteral::Int(*i),
        LiteralValue::Float(f) => TsLiteral::Number(*f),
        LiteralValue::Bool(b) => TsLiteral::Bool(*b),
        LiteralValue::None => TsLiteral::Null,
    }
}
