//! TypeScript IR types for declaration output.
//!
//! This module defines the TypeScript side of the compiler:
//! - TsType: type expressions (primitives, arrays, unions, records, ...)
//! - TsLiteral: literal values (strings, numbers, booleans)
//! - TsTypeDef / TsImport: top-level declarations
//! - TsModule: an ordered list of declarations

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, undefined, unknown, symbol
    Primitive(TsPrimitive),
    /// Array type: T[] or Array<T>
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Fixed tuple: [A, B]
    Tuple(Vec<TsType>),
    /// Variadic tuple: [...T[]]
    VariadicTuple(Box<TsType>),
    /// Record type: Record<K, V>
    Record {
        key: Box<TsType>,
        value: Box<TsType>,
    },
    /// Function type: (_0: A) => R
    Function {
        params: Vec<TsParam>,
        returns: Box<TsType>,
    },
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Named type reference: "Item", "Function"
    Ref(String),
    /// A type followed by a block comment: T /* a, b */
    Commented {
        inner: Box<TsType>,
        comments: Vec<String>,
    },
}

impl TsType {
    pub fn string() -> Self {
        TsType::Primitive(TsPrimitive::String)
    }

    pub fn number() -> Self {
        TsType::Primitive(TsPrimitive::Number)
    }

    pub fn unknown() -> Self {
        TsType::Primitive(TsPrimitive::Unknown)
    }

    /// Wrap in a comment block; blank comments are dropped and no wrapper is
    /// added when nothing remains.
    pub fn with_comments(self, comments: Vec<String>) -> Self {
        let comments: Vec<String> = comments
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if comments.is_empty() {
            return self;
        }
        match self {
            TsType::Commented {
                inner,
                comments: mut existing,
            } => {
                existing.extend(comments);
                TsType::Commented {
                    inner,
                    comments: existing,
                }
            }
            other => TsType::Commented {
                inner: Box::new(other),
                comments,
            },
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Unknown,
    Symbol,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub name: String,
    pub ty: TsType,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Null,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
    pub doc: Option<String>,
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq)]
pub struct TsImport {
    /// Items to import
    pub items: Vec<ImportItem>,
    /// Module path
    pub from: String,
    pub doc: Option<String>,
}

/// Import item
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub name: String,
    pub alias: Option<String>,
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// interface Foo { ... }
    Interface { properties: Vec<TsProp> },
    /// type Foo = ...
    TypeAlias { ty: TsType },
    /// const Foo = { ... } as const; type Foo = ...
    ConstEnum { values: Vec<(String, TsLiteral)> },
    /// const FooLabels: Record<Foo, string> = { [Foo.A]: "..." }
    LabelMap {
        enum_name: String,
        labels: Vec<(String, String)>,
        /// Every member has a label; otherwise the map is typed `Partial<...>`.
        complete: bool,
    },
}

/// Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    pub name: String,
    pub kind: TypeDefKind,
    pub export: bool,
    pub doc: Option<String>,
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum TsDecl {
    Import(TsImport),
    TypeDef(TsTypeDef),
}

/// Complete TypeScript module, in emission order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TsModule {
    pub decls: Vec<TsDecl>,
}
