//! JSON type-graph documents.
//!
//! A document describes host types keyed by qualified path and the order in
//! which to register them:
//!
//! ```json
//! {
//!   "types": {
//!     "app.Person": {
//!       "kind": "record",
//!       "doc": "A person.",
//!       "fields": [
//!         { "name": "name", "type": "str" },
//!         { "name": "pets", "type": { "list": { "ref": "app.Pet" } } }
//!       ]
//!     },
//!     "app.Pet": { "kind": "opaque" }
//!   },
//!   "register": ["app.Person", { "type": "app.Pet", "name": "Animal" }]
//! }
//! ```
//!
//! Without `register`, every type is registered in document order.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{
    DEFAULT_ENUM_LABELS_FIELD, DEFAULT_ENUM_LABELS_SUFFIX, OverrideAction, SortKey,
    TypeConfiguration,
};
use crate::error::{Error, Result};
use crate::field::{FieldInfo, FieldPatch};
use crate::options::FieldOrder;
use crate::provider::model::{ModelDef, ModelField, ModelFieldKind, RelationTarget};
use crate::shape::{
    Builtin, EnumDef, EnumMember, HostKind, HostRef, HostType, LabelSource, LiteralValue,
    MappingOrigin, SequenceOrigin, Signature, TypeExpr,
};
use crate::world::{Registration, World};

/// Parse a document and build the world it describes.
pub fn load_world(json: &str) -> Result<World> {
    let document: Document = serde_json::from_str(json)
        .map_err(|err| Error::document(format!("failed to parse type document: {err}")))?;
    document.into_world()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    types: IndexMap<String, TypeDoc>,
    #[serde(default)]
    register: Option<Vec<RegisterDoc>>,
}

#[derive(Debug, Deserialize)]
struct TypeDoc {
    #[serde(default)]
    doc: Option<String>,
    #[serde(flatten)]
    kind: KindDoc,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum KindDoc {
    Record {
        fields: Vec<FieldDoc>,
    },
    KeyedDict {
        fields: Vec<FieldDoc>,
        #[serde(default = "default_true")]
        total: bool,
    },
    Model {
        fields: Vec<ModelFieldDoc>,
    },
    Enum {
        members: Vec<MemberDoc>,
        #[serde(default)]
        labels: IndexMap<String, Value>,
    },
    NamedTuple {
        slots: Vec<String>,
    },
    Subclass {
        base: String,
    },
    Alias {
        target: Value,
    },
    Opaque,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDoc {
    name: String,
    #[serde(rename = "type")]
    ty: Value,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default = "default_true")]
    required: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberDoc {
    name: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFieldDoc {
    #[serde(default)]
    name: String,
    field: String,
    #[serde(default)]
    null: bool,
    #[serde(default)]
    help_text: Option<String>,
    #[serde(default)]
    choices: Vec<Value>,
    #[serde(default = "default_true")]
    required: bool,
    /// Relation or nested serializer target; `"self"` for self-relations.
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    child: Option<Box<ModelFieldDoc>>,
    #[serde(default)]
    returns: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegisterDoc {
    Path(String),
    Full(RegistrationDoc),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistrationDoc {
    #[serde(rename = "type")]
    path: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    config: ConfigDoc,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDoc {
    #[serde(default)]
    null_is_undefined: bool,
    #[serde(default)]
    field_overrides: IndexMap<String, Value>,
    #[serde(default)]
    import_from: Option<ImportFromDoc>,
    #[serde(default = "default_labels_field")]
    enum_labels_field: Option<String>,
    #[serde(default = "default_labels_suffix")]
    enum_labels_type_suffix: String,
    #[serde(default = "default_true")]
    non_required_fields_optional: bool,
    #[serde(default)]
    order_fields_by: Option<FieldOrder>,
}

impl Default for ConfigDoc {
    fn default() -> Self {
        Self {
            null_is_undefined: false,
            field_overrides: IndexMap::new(),
            import_from: None,
            enum_labels_field: default_labels_field(),
            enum_labels_type_suffix: default_labels_suffix(),
            non_required_fields_optional: true,
            order_fields_by: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportFromDoc {
    module: String,
    name: String,
}

fn default_true() -> bool {
    true
}

fn default_labels_field() -> Option<String> {
    Some(DEFAULT_ENUM_LABELS_FIELD.to_string())
}

fn default_labels_suffix() -> String {
    DEFAULT_ENUM_LABELS_SUFFIX.to_string()
}

impl Document {
    fn into_world(self) -> Result<World> {
        let refs = self
            .types
            .iter()
            .map(|(path, doc)| Ok((path.clone(), skeleton(path, &doc.kind)?.to_ref())))
            .collect::<Result<HashMap<_, _>>>()?;
        let parser = Parser { refs: &refs };

        let mut hosts: IndexMap<String, HostType> = IndexMap::with_capacity(self.types.len());
        for (path, doc) in self.types {
            let host = parser.host_type(&path, doc)?;
            hosts.insert(path, host);
        }

        let registrations = match self.register {
            Some(registrations) => registrations,
            None => hosts.keys().cloned().map(RegisterDoc::Path).collect(),
        };

        let mut world = World::new();
        for registration in registrations {
            let (path, registration) = match registration {
                RegisterDoc::Path(path) => (path, Registration::new()),
                RegisterDoc::Full(full) => {
                    let config = parser.configuration(full.config)?;
                    let mut registration = Registration::new().config(config);
                    registration.name = full.name;
                    registration.doc = full.doc;
                    (full.path, registration)
                }
            };
            let host = hosts
                .get(&path)
                .cloned()
                .ok_or_else(|| Error::document(format!("registered type {path} is not defined")))?;
            world.register_with(host, registration)?;
        }
        debug!(types = world.len(), "Loaded type document.");
        Ok(world)
    }
}

/// A host type with just enough structure to produce a faithful reference.
fn skeleton(path: &str, kind: &KindDoc) -> Result<HostType> {
    Ok(match kind {
        KindDoc::Subclass { base } => HostType::subclass(path, builtin(base)?),
        KindDoc::NamedTuple { slots } => HostType::named_tuple(path, slots.iter().cloned()),
        _ => HostType::opaque(path),
    })
}

fn builtin(name: &str) -> Result<Builtin> {
    Builtin::from_name(name).ok_or_else(|| Error::document(format!("unknown builtin type {name:?}")))
}

struct Parser<'a> {
    refs: &'a HashMap<String, HostRef>,
}

impl Parser<'_> {
    fn host_type(&self, path: &str, doc: TypeDoc) -> Result<HostType> {
        let kind = match doc.kind {
            KindDoc::Record { fields } => HostKind::Record(self.fields(fields)?),
            KindDoc::KeyedDict { fields, total } => HostKind::KeyedDict {
                fields: self.fields(fields)?,
                total,
            },
            KindDoc::Model { fields } => HostKind::Model(ModelDef::new(
                fields
                    .into_iter()
                    .map(|field| self.model_field(field))
                    .collect::<Result<_>>()?,
            )),
            KindDoc::Enum { members, labels } => HostKind::Enum(enum_def(members, labels)?),
            KindDoc::NamedTuple { slots } => HostKind::NamedTuple(slots),
            KindDoc::Subclass { base } => HostKind::Subclass(builtin(&base)?),
            KindDoc::Alias { target } => HostKind::Alias(self.type_expr(&target)?),
            KindDoc::Opaque => HostKind::Opaque,
        };
        let host = HostType::new(path, kind);
        Ok(match doc.doc {
            Some(text) => host.with_doc(text),
            None => host,
        })
    }

    fn fields(&self, fields: Vec<FieldDoc>) -> Result<Vec<FieldInfo>> {
        fields.into_iter().map(|field| self.field(field)).collect()
    }

    fn field(&self, field: FieldDoc) -> Result<FieldInfo> {
        let mut info = FieldInfo::new(field.name, self.type_expr(&field.ty)?).with_required(field.required);
        info.doc = field.doc;
        Ok(info)
    }

    fn host_ref(&self, path: &str) -> HostRef {
        self.refs
            .get(path)
            .cloned()
            .unwrap_or_else(|| HostRef::new(path))
    }

    fn model_field(&self, doc: ModelFieldDoc) -> Result<ModelField> {
        let kind = self.model_kind(&doc)?;
        let mut field = ModelField::new(doc.name, kind)
            .choices(doc.choices.iter().map(literal).collect::<Result<Vec<_>>>()?)
            .required(doc.required);
        field.null = doc.null;
        field.help_text = doc.help_text;
        Ok(field)
    }

    fn model_kind(&self, doc: &ModelFieldDoc) -> Result<ModelFieldKind> {
        let target = || -> Result<RelationTarget> {
            match doc.to.as_deref() {
                Some("self") => Ok(RelationTarget::SelfRef),
                Some(path) => Ok(RelationTarget::Model(self.host_ref(path))),
                None => Err(Error::document(format!(
                    "{} field {:?} needs a \"to\" target",
                    doc.field, doc.name
                ))),
            }
        };
        let child = || -> Result<Box<ModelFieldKind>> {
            match &doc.child {
                Some(child) => Ok(Box::new(self.model_kind(child)?)),
                None => Err(Error::document(format!(
                    "{} field {:?} needs a \"child\" field",
                    doc.field, doc.name
                ))),
            }
        };
        Ok(match doc.field.as_str() {
            "CharField" => ModelFieldKind::Char,
            "EmailField" => ModelFieldKind::Email,
            "SlugField" => ModelFieldKind::Slug,
            "TextField" => ModelFieldKind::Text,
            "URLField" => ModelFieldKind::Url,
            "GenericIPAddressField" => ModelFieldKind::GenericIpAddress,
            "RegexField" => ModelFieldKind::Regex,
            "BinaryField" => ModelFieldKind::Binary,
            "BooleanField" => ModelFieldKind::Boolean,
            "DateField" => ModelFieldKind::Date,
            "DateTimeField" => ModelFieldKind::DateTime,
            "DecimalField" => ModelFieldKind::Decimal,
            "DurationField" => ModelFieldKind::Duration,
            "FileField" => ModelFieldKind::File,
            "ImageField" => ModelFieldKind::Image,
            "FloatField" => ModelFieldKind::Float,
            "IntegerField" => ModelFieldKind::Integer,
            "JSONField" => ModelFieldKind::Json,
            "TimeField" => ModelFieldKind::Time,
            "UUIDField" => ModelFieldKind::Uuid,
            "HyperlinkedRelatedField" => ModelFieldKind::HyperlinkedRelated,
            "PrimaryKeyRelatedField" => ModelFieldKind::PrimaryKeyRelated,
            "ReadOnlyField" => ModelFieldKind::ReadOnly,
            "ForeignKey" => ModelFieldKind::ForeignKey(target()?),
            "OneToOneField" => ModelFieldKind::OneToOne(target()?),
            "ManyToManyField" => ModelFieldKind::ManyToMany(target()?),
            "ManyToOneRel" | "ManyToManyRel" | "OneToOneRel" => ModelFieldKind::ReverseRelation,
            "ListField" | "ListSerializer" => ModelFieldKind::List(child()?),
            "DictField" => ModelFieldKind::Dict(child()?),
            "Serializer" => match target()? {
                RelationTarget::Model(model) => ModelFieldKind::Nested(model),
                RelationTarget::SelfRef => {
                    return Err(Error::document(format!(
                        "nested serializer field {:?} cannot refer to itself",
                        doc.name
                    )));
                }
            },
            "SerializerMethodField" => ModelFieldKind::Method(
                doc.returns
                    .as_ref()
                    .map(|returns| self.type_expr(returns))
                    .transpose()?,
            ),
            other => ModelFieldKind::Other(other.to_string()),
        })
    }

    fn configuration(&self, doc: ConfigDoc) -> Result<TypeConfiguration> {
        let mut config = TypeConfiguration::new()
            .null_is_undefined(doc.null_is_undefined)
            .non_required_fields_optional(doc.non_required_fields_optional);
        config.enum_labels_field = doc.enum_labels_field;
        config.enum_labels_type_suffix = doc.enum_labels_type_suffix;
        if let Some(import) = doc.import_from {
            config = config.import_from(import.module, import.name);
        }
        if doc.order_fields_by == Some(FieldOrder::Name) {
            config = config.order_fields_by(SortKey::<FieldInfo>::by_name());
        }
        for (name, value) in doc.field_overrides {
            let action = self.override_action(&name, value)?;
            config = config.override_field(name, action);
        }
        Ok(config)
    }

    fn override_action(&self, field: &str, value: Value) -> Result<OverrideAction> {
        let malformed = || {
            Error::configuration(format!(
                "override for field {field:?} must be \"remove\", {{\"replace\": field}} or a patch object"
            ))
        };
        let mut patch_doc = match value {
            Value::Null => return Ok(OverrideAction::Remove),
            Value::String(s) if s == "remove" => return Ok(OverrideAction::Remove),
            Value::Object(map) => map,
            _ => return Err(malformed()),
        };
        if let Some(replacement) = patch_doc.remove("replace") {
            if !patch_doc.is_empty() {
                return Err(malformed());
            }
            let replacement: FieldDoc = serde_json::from_value(replacement).map_err(|err| {
                Error::configuration(format!("replacement for field {field:?} is invalid: {err}"))
            })?;
            return Ok(OverrideAction::Replace(self.field(replacement)?));
        }

        let mut patch = FieldPatch::new();
        for (key, value) in patch_doc {
            match (key.as_str(), value) {
                ("name", Value::String(name)) => patch.name = Some(name),
                ("type", ty) => patch.ty = Some(self.type_expr(&ty)?),
                ("doc", Value::Null) => patch.doc = Some(None),
                ("doc", Value::String(doc)) => patch.doc = Some(Some(doc)),
                ("required", Value::Bool(required)) => patch.required = Some(required),
                _ => return Err(malformed()),
            }
        }
        Ok(OverrideAction::Merge(patch))
    }

    /// Parse a type expression.
    fn type_expr(&self, value: &Value) -> Result<TypeExpr> {
        let object = match value {
            Value::String(name) => return self.named_type(name),
            Value::Object(object) if object.len() == 1 => object,
            other => return Err(Error::document(format!("invalid type expression: {other}"))),
        };
        let Some((key, arg)) = object.iter().next() else {
            return Err(Error::document("empty type expression"));
        };

        Ok(match key.as_str() {
            "ref" => TypeExpr::Host(self.host_ref(string(arg)?)),
            "optional" => TypeExpr::optional(self.type_expr(arg)?),
            "union" => TypeExpr::Union(self.type_list(arg)?),
            "literal" => TypeExpr::Literal(array(arg)?.iter().map(literal).collect::<Result<_>>()?),
            "tuple" => TypeExpr::Tuple(self.type_list(arg)?),
            "list" => TypeExpr::list(self.type_expr(arg)?),
            "sequence" => {
                let origin_name = string(member(arg, "origin")?)?;
                let origin = SequenceOrigin::from_name(origin_name).ok_or_else(|| {
                    Error::document(format!("unknown sequence origin {origin_name:?}"))
                })?;
                TypeExpr::sequence(origin, self.type_expr(member(arg, "item")?)?)
            }
            "counter" => TypeExpr::Counter(Box::new(self.type_expr(arg)?)),
            "dict" => match self.type_list(arg)?.as_slice() {
                [key, value] => TypeExpr::dict(key.clone(), value.clone()),
                _ => return Err(Error::document("dict takes exactly a key and a value type")),
            },
            "mapping" => {
                let origin_name = string(member(arg, "origin")?)?;
                let origin = MappingOrigin::from_name(origin_name).ok_or_else(|| {
                    Error::document(format!("unknown mapping origin {origin_name:?}"))
                })?;
                TypeExpr::mapping(
                    origin,
                    self.type_expr(member(arg, "key")?)?,
                    self.type_expr(member(arg, "value")?)?,
                )
            }
            "callable" => match arg {
                Value::Null => TypeExpr::Callable(None),
                _ => TypeExpr::Callable(Some(Signature {
                    params: self.type_list(member(arg, "args")?)?,
                    returns: Box::new(self.type_expr(member(arg, "returns")?)?),
                })),
            },
            "forward_ref" => TypeExpr::ForwardRef(string(arg)?.to_string()),
            "type_var" => TypeExpr::TypeVar(string(arg)?.to_string()),
            "new_type" => TypeExpr::new_type(
                string(member(arg, "name")?)?,
                self.type_expr(member(arg, "type")?)?,
            ),
            "annotated" => TypeExpr::Annotated {
                inner: Box::new(self.type_expr(member(arg, "type")?)?),
                comments: array(member(arg, "comments")?)?
                    .iter()
                    .map(|comment| string(comment).map(str::to_string))
                    .collect::<Result<_>>()?,
            },
            "generic" => TypeExpr::Generic {
                origin: string(member(arg, "origin")?)?.to_string(),
                args: self.type_list(member(arg, "args")?)?,
            },
            other => return Err(Error::document(format!("unknown type constructor {other:?}"))),
        })
    }

    fn named_type(&self, name: &str) -> Result<TypeExpr> {
        match name {
            "Any" => Ok(TypeExpr::Any),
            "..." => Ok(TypeExpr::Ellipsis),
            "Callable" => Ok(TypeExpr::Callable(None)),
            _ => {
                if let Some(builtin) = Builtin::from_name(name) {
                    Ok(TypeExpr::Builtin(builtin))
                } else if let Some(host) = self.refs.get(name) {
                    Ok(TypeExpr::Host(host.clone()))
                } else {
                    Err(Error::document(format!("unknown type name {name:?}")))
                }
            }
        }
    }

    fn type_list(&self, value: &Value) -> Result<Vec<TypeExpr>> {
        array(value)?.iter().map(|item| self.type_expr(item)).collect()
    }
}

fn enum_def(members: Vec<MemberDoc>, labels: IndexMap<String, Value>) -> Result<EnumDef> {
    let members = members
        .into_iter()
        .map(|member| {
            Ok(EnumMember {
                value: literal(&member.value)?,
                name: member.name,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let mut def = EnumDef {
        members,
        label_sources: Vec::new(),
    };
    for (field, source) in labels {
        def = def.with_labels(field, label_source(&source));
    }
    Ok(def)
}

fn label_source(value: &Value) -> LabelSource {
    let entries = |table: &serde_json::Map<String, Value>| -> Vec<(String, String)> {
        table
            .iter()
            .filter_map(|(name, label)| match label {
                Value::Null => None,
                Value::String(s) => Some((name.clone(), s.clone())),
                other => Some((name.clone(), other.to_string())),
            })
            .collect()
    };
    match value {
        Value::Object(object) if object.len() == 1 => match object.iter().next() {
            Some((kind, Value::Object(table))) if kind == "namespace" => {
                LabelSource::Namespace(entries(table))
            }
            Some((kind, Value::Object(table))) if kind == "table" => LabelSource::Table(entries(table)),
            _ => LabelSource::Unsupported(json_kind(value).to_string()),
        },
        other => LabelSource::Unsupported(json_kind(other).to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn literal(value: &Value) -> Result<LiteralValue> {
    Ok(match value {
        Value::Null => LiteralValue::None,
        Value::Bool(b) => LiteralValue::Bool(*b),
        Value::String(s) => LiteralValue::Str(s.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => LiteralValue::Int(i),
            None => LiteralValue::Float(
                n.as_f64()
                    .ok_or_else(|| Error::document(format!("unsupported number {n}")))?,
            ),
        },
        other => return Err(Error::document(format!("literal must be a scalar, got {other}"))),
    })
}

fn string(value: &Value) -> Result<&str> {
    value
        .as_str()
        .ok_or_else(|| Error::document(format!("expected a string, got {value}")))
}

fn array(value: &Value) -> Result<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::document(format!("expected a list, got {value}")))
}

fn member<'v>(value: &'v Value, key: &str) -> Result<&'v Value> {
    value
        .get(key)
        .ok_or_else(|| Error::document(format!("missing {key:?} in {value}")))
}
