//! Neutral description of host types.
//!
//! A reflecting front-end describes the types it found as [`TypeExpr`] trees.
//! Nominal types (records, enums, opaque classes, ...) are described once as a
//! [`HostType`] and referenced from expressions through a cheap [`HostRef`],
//! so recursive graphs never need to own themselves.

use std::fmt;
use std::sync::Arc;

use crate::field::FieldInfo;
use crate::provider::model::ModelDef;

/// Built-in scalar and container kinds the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Bytes,
    ByteArray,
    MemoryView,
    Bool,
    Complex,
    Path,
    IpAddress,
    Pattern,
    Int,
    Float,
    Decimal,
    Duration,
    Uuid,
    Str,
    None,
    Date,
    Time,
    DateTime,
    /// Unparameterized mapping.
    Dict,
    /// Unparameterized counter.
    Counter,
}

impl Builtin {
    const ALL: [Builtin; 20] = [
        Builtin::Bytes,
        Builtin::ByteArray,
        Builtin::MemoryView,
        Builtin::Bool,
        Builtin::Complex,
        Builtin::Path,
        Builtin::IpAddress,
        Builtin::Pattern,
        Builtin::Int,
        Builtin::Float,
        Builtin::Decimal,
        Builtin::Duration,
        Builtin::Uuid,
        Builtin::Str,
        Builtin::None,
        Builtin::Date,
        Builtin::Time,
        Builtin::DateTime,
        Builtin::Dict,
        Builtin::Counter,
    ];

    /// The host-side name, used in comments and in documents.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Bytes => "bytes",
            Builtin::ByteArray => "bytearray",
            Builtin::MemoryView => "memoryview",
            Builtin::Bool => "bool",
            Builtin::Complex => "complex",
            Builtin::Path => "Path",
            Builtin::IpAddress => "IPAddress",
            Builtin::Pattern => "Pattern",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Decimal => "Decimal",
            Builtin::Duration => "timedelta",
            Builtin::Uuid => "UUID",
            Builtin::Str => "str",
            Builtin::None => "None",
            Builtin::Date => "date",
            Builtin::Time => "time",
            Builtin::DateTime => "datetime",
            Builtin::Dict => "dict",
            Builtin::Counter => "Counter",
        }
    }

    /// Inverse of [`Builtin::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// Origin of a homogeneous collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceOrigin {
    List,
    Deque,
    Set,
    FrozenSet,
    Iterable,
    Iterator,
    Sequence,
}

impl SequenceOrigin {
    const ALL: [SequenceOrigin; 7] = [
        SequenceOrigin::List,
        SequenceOrigin::Deque,
        SequenceOrigin::Set,
        SequenceOrigin::FrozenSet,
        SequenceOrigin::Iterable,
        SequenceOrigin::Iterator,
        SequenceOrigin::Sequence,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SequenceOrigin::List => "list",
            SequenceOrigin::Deque => "deque",
            SequenceOrigin::Set => "set",
            SequenceOrigin::FrozenSet => "frozenset",
            SequenceOrigin::Iterable => "Iterable",
            SequenceOrigin::Iterator => "Iterator",
            SequenceOrigin::Sequence => "Sequence",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }
}

/// Origin of a keyed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingOrigin {
    Dict,
    DefaultDict,
    Mapping,
    MutableMapping,
    OrderedDict,
}

impl MappingOrigin {
    const ALL: [MappingOrigin; 5] = [
        MappingOrigin::Dict,
        MappingOrigin::DefaultDict,
        MappingOrigin::Mapping,
        MappingOrigin::MutableMapping,
        MappingOrigin::OrderedDict,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MappingOrigin::Dict => "dict",
            MappingOrigin::DefaultDict => "defaultdict",
            MappingOrigin::Mapping => "Mapping",
            MappingOrigin::MutableMapping => "MutableMapping",
            MappingOrigin::OrderedDict => "OrderedDict",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }
}

/// A literal value, as found in literal types and enum members.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Str(value.to_string())
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Int(i64::from(value))
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

/// Positional parameters and return type of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<TypeExpr>,
    pub returns: Box<TypeExpr>,
}

/// A type expression: the thing fields are typed with.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Builtin(Builtin),
    /// Reference to a nominal host type.
    Host(HostRef),
    Any,
    ForwardRef(String),
    TypeVar(String),
    /// The variadic marker, only meaningful as the last tuple element.
    Ellipsis,
    NewType {
        name: String,
        supertype: Box<TypeExpr>,
    },
    /// A type carrying free-text comments.
    Annotated {
        inner: Box<TypeExpr>,
        comments: Vec<String>,
    },
    Optional(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Literal(Vec<LiteralValue>),
    Tuple(Vec<TypeExpr>),
    Sequence {
        origin: SequenceOrigin,
        item: Box<TypeExpr>,
    },
    Counter(Box<TypeExpr>),
    Mapping {
        origin: MappingOrigin,
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `None` means a callable without a declared signature.
    Callable(Option<Signature>),
    /// A parameterized type whose origin has no rendering rule.
    Generic {
        origin: String,
        args: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn list(item: impl Into<TypeExpr>) -> Self {
        TypeExpr::Sequence {
            origin: SequenceOrigin::List,
            item: Box::new(item.into()),
        }
    }

    pub fn sequence(origin: SequenceOrigin, item: impl Into<TypeExpr>) -> Self {
        TypeExpr::Sequence {
            origin,
            item: Box::new(item.into()),
        }
    }

    pub fn dict(key: impl Into<TypeExpr>, value: impl Into<TypeExpr>) -> Self {
        TypeExpr::mapping(MappingOrigin::Dict, key, value)
    }

    pub fn mapping(
        origin: MappingOrigin,
        key: impl Into<TypeExpr>,
        value: impl Into<TypeExpr>,
    ) -> Self {
        TypeExpr::Mapping {
            origin,
            key: Box::new(key.into()),
            value: Box::new(value.into()),
        }
    }

    pub fn optional(inner: impl Into<TypeExpr>) -> Self {
        TypeExpr::Optional(Box::new(inner.into()))
    }

    pub fn union<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeExpr>,
    {
        TypeExpr::Union(members.into_iter().map(Into::into).collect())
    }

    pub fn literal<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LiteralValue>,
    {
        TypeExpr::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn annotated(inner: impl Into<TypeExpr>, comment: impl Into<String>) -> Self {
        TypeExpr::Annotated {
            inner: Box::new(inner.into()),
            comments: vec![comment.into()],
        }
    }

    pub fn callable(params: Vec<TypeExpr>, returns: impl Into<TypeExpr>) -> Self {
        TypeExpr::Callable(Some(Signature {
            params,
            returns: Box::new(returns.into()),
        }))
    }

    pub fn new_type(name: impl Into<String>, supertype: impl Into<TypeExpr>) -> Self {
        TypeExpr::NewType {
            name: name.into(),
            supertype: Box::new(supertype.into()),
        }
    }
}

impl From<Builtin> for TypeExpr {
    fn from(value: Builtin) -> Self {
        TypeExpr::Builtin(value)
    }
}

impl From<HostRef> for TypeExpr {
    fn from(value: HostRef) -> Self {
        TypeExpr::Host(value)
    }
}

impl From<&HostType> for TypeExpr {
    fn from(value: &HostType) -> Self {
        TypeExpr::Host(value.to_ref())
    }
}

/// What the engine needs to know about a host type it cannot find in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostForm {
    Plain,
    Subclass(Builtin),
    NamedTuple(Arc<[String]>),
}

/// Reference to a nominal host type. Equality is identity: the qualified path.
#[derive(Clone)]
pub struct HostRef {
    path: Arc<str>,
    name: Arc<str>,
    form: HostForm,
}

impl HostRef {
    /// A plain reference, usable before the referenced type is described.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        Self {
            path: Arc::from(path),
            name: Arc::from(intrinsic_name(path)),
            form: HostForm::Plain,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn form(&self) -> &HostForm {
        &self.form
    }
}

impl PartialEq for HostRef {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for HostRef {}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostRef({})", self.path)
    }
}

impl fmt::Display for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A member of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: LiteralValue,
}

/// Where an enumeration keeps human-readable labels for its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    /// A nested namespace whose attributes are named after the members.
    Namespace(Vec<(String, String)>),
    /// A plain string-keyed table.
    Table(Vec<(String, String)>),
    /// Something else entirely; carries the offending type name.
    Unsupported(String),
}

/// An enumeration and the label sources attached to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumDef {
    pub members: Vec<EnumMember>,
    pub label_sources: Vec<(String, LabelSource)>,
}

impl EnumDef {
    pub fn new<I, N, V>(members: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<LiteralValue>,
    {
        Self {
            members: members
                .into_iter()
                .map(|(name, value)| EnumMember {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
            label_sources: Vec::new(),
        }
    }

    /// Attach a label source under `field`.
    pub fn with_labels(mut self, field: impl Into<String>, source: LabelSource) -> Self {
        self.label_sources.push((field.into(), source));
        self
    }

    pub fn label_source(&self, field: &str) -> Option<&LabelSource> {
        self.label_sources
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, source)| source)
    }
}

/// The structural description of a nominal host type.
#[derive(Debug, Clone)]
pub enum HostKind {
    /// A plain record type.
    Record(Vec<FieldInfo>),
    /// A dictionary type with declared keys. With `total: false` every key is optional.
    KeyedDict { fields: Vec<FieldInfo>, total: bool },
    /// A model or serializer from an external framework.
    Model(ModelDef),
    Enum(EnumDef),
    NamedTuple(Vec<String>),
    /// A nominal subtype of a builtin scalar or container.
    Subclass(Builtin),
    /// A name given to an arbitrary type expression.
    Alias(TypeExpr),
    /// A class with no structure the engine can see.
    Opaque,
}

/// A nominal host type, identified by its qualified path.
#[derive(Debug, Clone)]
pub struct HostType {
    path: String,
    name: String,
    doc: Option<String>,
    kind: HostKind,
}

impl HostType {
    pub fn new(path: impl Into<String>, kind: HostKind) -> Self {
        let path = path.into();
        let name = intrinsic_name(&path).to_string();
        Self {
            path,
            name,
            doc: None,
            kind,
        }
    }

    pub fn record(path: impl Into<String>, fields: Vec<FieldInfo>) -> Self {
        Self::new(path, HostKind::Record(fields))
    }

    pub fn keyed_dict(path: impl Into<String>, fields: Vec<FieldInfo>) -> Self {
        Self::new(
            path,
            HostKind::KeyedDict {
                fields,
                total: true,
            },
        )
    }

    pub fn model(path: impl Into<String>, model: ModelDef) -> Self {
        Self::new(path, HostKind::Model(model))
    }

    pub fn enumeration(path: impl Into<String>, def: EnumDef) -> Self {
        Self::new(path, HostKind::Enum(def))
    }

    pub fn named_tuple<I, S>(path: impl Into<String>, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            path,
            HostKind::NamedTuple(slots.into_iter().map(Into::into).collect()),
        )
    }

    pub fn subclass(path: impl Into<String>, base: Builtin) -> Self {
        Self::new(path, HostKind::Subclass(base))
    }

    /// Give a type expression a name of its own, e.g. `ListOfInts = list[int]`.
    pub fn alias(name: impl Into<String>, target: impl Into<TypeExpr>) -> Self {
        Self::new(name, HostKind::Alias(target.into()))
    }

    pub fn opaque(path: impl Into<String>) -> Self {
        Self::new(path, HostKind::Opaque)
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The intrinsic name: last segment of the path.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn kind(&self) -> &HostKind {
        &self.kind
    }

    /// A reference to this type, carrying enough to render it unregistered.
    pub fn to_ref(&self) -> HostRef {
        let form = match &self.kind {
            HostKind::Subclass(base) => HostForm::Subclass(*base),
            HostKind::NamedTuple(slots) => HostForm::NamedTuple(slots.clone().into()),
            _ => HostForm::Plain,
        };
        HostRef {
            path: Arc::from(self.path.as_str()),
            name: Arc::from(self.name.as_str()),
            form,
        }
    }
}

/// Anything that identifies a host type by path.
pub trait TypePath {
    fn type_path(&self) -> &str;
}

impl TypePath for HostType {
    fn type_path(&self) -> &str {
        self.path()
    }
}

impl TypePath for HostRef {
    fn type_path(&self) -> &str {
        self.path()
    }
}

impl TypePath for str {
    fn type_path(&self) -> &str {
        self
    }
}

/// Last segment of a `.` or `::` separated path.
fn intrinsic_name(path: &str) -> &str {
    path.rsplit(['.', ':']).next().unwrap_or(path)
}
