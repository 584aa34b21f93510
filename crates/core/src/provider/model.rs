//! Adapter for framework model and serializer definitions.
//!
//! Front-ends describe each framework field by its kind; this module maps the
//! kind to a [`TypeExpr`], annotating relations and honoring nullability and
//! choices.

use crate::error::{Error, Result};
use crate::field::FieldInfo;
use crate::shape::{Builtin, HostKind, HostRef, HostType, LiteralValue, TypeExpr};

use super::FieldProvider;

/// The other end of a relation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationTarget {
    /// The model the field is declared on.
    SelfRef,
    Model(HostRef),
}

/// Framework field kinds the adapter understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelFieldKind {
    Char,
    Email,
    Slug,
    Text,
    Url,
    GenericIpAddress,
    Regex,
    Binary,
    Boolean,
    Date,
    DateTime,
    Decimal,
    Duration,
    File,
    Image,
    Float,
    Integer,
    Json,
    Time,
    Uuid,
    HyperlinkedRelated,
    PrimaryKeyRelated,
    ReadOnly,
    ForeignKey(RelationTarget),
    OneToOne(RelationTarget),
    ManyToMany(RelationTarget),
    /// The implicit reverse side of a relation; never emitted.
    ReverseRelation,
    List(Box<ModelFieldKind>),
    Dict(Box<ModelFieldKind>),
    /// A nested serializer or model.
    Nested(HostRef),
    /// A computed field; `None` when the method has no return annotation.
    Method(Option<TypeExpr>),
    /// Anything else, by framework type name.
    Other(String),
}

impl ModelFieldKind {
    /// The framework's name for this kind of field.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Char => "CharField",
            Self::Email => "EmailField",
            Self::Slug => "SlugField",
            Self::Text => "TextField",
            Self::Url => "URLField",
            Self::GenericIpAddress => "GenericIPAddressField",
            Self::Regex => "RegexField",
            Self::Binary => "BinaryField",
            Self::Boolean => "BooleanField",
            Self::Date => "DateField",
            Self::DateTime => "DateTimeField",
            Self::Decimal => "DecimalField",
            Self::Duration => "DurationField",
            Self::File => "FileField",
            Self::Image => "ImageField",
            Self::Float => "FloatField",
            Self::Integer => "IntegerField",
            Self::Json => "JSONField",
            Self::Time => "TimeField",
            Self::Uuid => "UUIDField",
            Self::HyperlinkedRelated => "HyperlinkedRelatedField",
            Self::PrimaryKeyRelated => "PrimaryKeyRelatedField",
            Self::ReadOnly => "ReadOnlyField",
            Self::ForeignKey(_) => "ForeignKey",
            Self::OneToOne(_) => "OneToOneField",
            Self::ManyToMany(_) => "ManyToManyField",
            Self::ReverseRelation => "ManyToOneRel",
            Self::List(_) => "ListField",
            Self::Dict(_) => "DictField",
            Self::Nested(_) => "Serializer",
            Self::Method(_) => "SerializerMethodField",
            Self::Other(name) => name,
        }
    }
}

/// One field of a framework model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelField {
    pub name: String,
    pub kind: ModelFieldKind,
    /// The column accepts null.
    pub null: bool,
    pub help_text: Option<String>,
    /// Allowed values; when present they replace the kind's own type.
    pub choices: Vec<LiteralValue>,
    pub required: bool,
}

impl ModelField {
    pub fn new(name: impl Into<String>, kind: ModelFieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            null: false,
            help_text: None,
            choices: Vec::new(),
            required: true,
        }
    }

    pub fn null(mut self) -> Self {
        self.null = true;
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralValue>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A framework model or serializer: an unordered bag of fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelDef {
    pub fields: Vec<ModelField>,
}

impl ModelDef {
    pub fn new(fields: Vec<ModelField>) -> Self {
        Self { fields }
    }
}

/// Provides fields for [`HostKind::Model`] hosts, sorted by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelProvider;

impl FieldProvider for ModelProvider {
    fn fields(&self, host: &HostType) -> Result<Option<Vec<FieldInfo>>> {
        let HostKind::Model(model) = host.kind() else {
            return Ok(None);
        };
        model_fields(model, &host.to_ref()).map(Some)
    }
}

/// Map every field of `model`, declared on `owner`, to a field descriptor.
pub fn model_fields(model: &ModelDef, owner: &HostRef) -> Result<Vec<FieldInfo>> {
    let mut fields: Vec<&ModelField> = model.fields.iter().collect();
    fields.sort_by(|a, b| a.name.cmp(&b.name));

    let mut infos = Vec::with_capacity(fields.len());
    for field in fields {
        let Some((mut ty, comment)) = field_type(field, owner)? else {
            continue;
        };
        if field.null {
            ty = TypeExpr::optional(ty);
        }
        if let Some(comment) = comment {
            ty = TypeExpr::annotated(ty, comment);
        }
        let mut info = FieldInfo::new(field.name.clone(), ty).with_required(field.required);
        info.doc = field.help_text.clone().filter(|text| !text.is_empty());
        infos.push(info);
    }
    Ok(infos)
}

/// The type of one field and the relation comment to attach after nullability.
/// `None` for fields that are skipped.
fn field_type(field: &ModelField, owner: &HostRef) -> Result<Option<(TypeExpr, Option<&'static str>)>> {
    if !field.choices.is_empty() {
        return Ok(Some((TypeExpr::Literal(field.choices.clone()), None)));
    }
    let target = |target: &RelationTarget| -> TypeExpr {
        match target {
            RelationTarget::SelfRef => TypeExpr::Host(owner.clone()),
            RelationTarget::Model(model) => TypeExpr::Host(model.clone()),
        }
    };
    Ok(match &field.kind {
        ModelFieldKind::ReverseRelation => None,
        ModelFieldKind::ForeignKey(to) => Some((target(to), Some("foreign key relation"))),
        ModelFieldKind::OneToOne(to) => Some((target(to), Some("one-to-one relation"))),
        ModelFieldKind::ManyToMany(to) => {
            Some((TypeExpr::list(target(to)), Some("many-to-many relation")))
        }
        kind => Some((kind_type(kind, field)?, None)),
    })
}

fn kind_type(kind: &ModelFieldKind, field: &ModelField) -> Result<TypeExpr> {
    Ok(match kind {
        ModelFieldKind::Char
        | ModelFieldKind::Email
        | ModelFieldKind::Slug
        | ModelFieldKind::Text
        | ModelFieldKind::Url
        | ModelFieldKind::GenericIpAddress
        | ModelFieldKind::Regex
        | ModelFieldKind::Duration
        | ModelFieldKind::HyperlinkedRelated => Builtin::Str.into(),
        ModelFieldKind::Binary => Builtin::Bytes.into(),
        ModelFieldKind::Boolean => Builtin::Bool.into(),
        ModelFieldKind::Date => Builtin::Date.into(),
        ModelFieldKind::DateTime => Builtin::DateTime.into(),
        ModelFieldKind::Decimal => Builtin::Decimal.into(),
        ModelFieldKind::File => TypeExpr::annotated(Builtin::Str, "file field"),
        ModelFieldKind::Image => TypeExpr::annotated(Builtin::Str, "image field"),
        ModelFieldKind::Float => Builtin::Float.into(),
        ModelFieldKind::Integer => Builtin::Int.into(),
        ModelFieldKind::Json => TypeExpr::Any,
        ModelFieldKind::Time => Builtin::Time.into(),
        ModelFieldKind::Uuid => Builtin::Uuid.into(),
        ModelFieldKind::PrimaryKeyRelated => {
            TypeExpr::annotated(TypeExpr::Any, "primary key related field")
        }
        ModelFieldKind::ReadOnly => TypeExpr::annotated(TypeExpr::Any, "read only field, type unknown"),
        ModelFieldKind::List(child) => TypeExpr::list(kind_type(child, field)?),
        ModelFieldKind::Dict(child) => TypeExpr::dict(TypeExpr::Any, kind_type(child, field)?),
        ModelFieldKind::Nested(model) => TypeExpr::Host(model.clone()),
        ModelFieldKind::Method(returns) => returns.clone().unwrap_or(TypeExpr::Any),
        ModelFieldKind::ForeignKey(_)
        | ModelFieldKind::OneToOne(_)
        | ModelFieldKind::ManyToMany(_)
        | ModelFieldKind::ReverseRelation
        | ModelFieldKind::Other(_) => {
            return Err(Error::UnsupportedField {
                field: field.name.clone(),
                field_type: kind.type_name().to_string(),
                repr: format!("{field:?}"),
            });
        }
    })
}
