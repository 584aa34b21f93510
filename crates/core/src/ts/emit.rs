//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation.

use super::types::{
    ImportItem, TsDecl, TsImport, TsLiteral, TsModule, TsParam, TsPrimitive, TsProp, TsType,
    TsTypeDef, TypeDefKind,
};
use super::utils::{
    format_doc_comment, format_member_access, is_bare_array_item, quote_if_needed,
    quote_string, sanitize_comment,
};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Undefined => "undefined".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
            TsPrimitive::Symbol => "symbol".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => quote_string(s),
            TsLiteral::Number(n) => serde_json::to_string(n).unwrap_or_else(|_| n.to_string()),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Compact suffix form only for bare identifiers
                if is_bare_array_item(&inner_str) {
                    format!("{inner_str}[]")
                } else {
                    format!("Array<{inner_str}>")
                }
            }
            TsType::Union(types) => types
                .iter()
                .map(emit_union_member)
                .collect::<Vec<_>>()
                .join(" | "),
            TsType::Tuple(types) => {
                let parts: Vec<_> = types.iter().map(|t| t.emit()).collect();
                format!("[{}]", parts.join(", "))
            }
            TsType::VariadicTuple(inner) => {
                format!("[...{}]", TsType::Array(inner.clone()).emit())
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Function { params, returns } => {
                let params_str = params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");
                format!("({params_str}) => {}", returns.emit())
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::Commented { inner, comments } => {
                format!("{}{}", inner.emit(), comment_suffix(comments))
            }
        }
    }
}

/// Emit a union member. Comments are whitespace to TypeScript, so a function
/// type is parenthesized even when comments trail it.
fn emit_union_member(ty: &TsType) -> String {
    match ty {
        TsType::Function { .. } => format!("({})", ty.emit()),
        TsType::Commented { inner, comments } => {
            format!("{}{}", emit_union_member(inner), comment_suffix(comments))
        }
        _ => ty.emit(),
    }
}

/// ` /* a, b */`, or nothing when every comment is blank.
fn comment_suffix(comments: &[String]) -> String {
    let joined = comments
        .iter()
        .map(|c| sanitize_comment(c.trim()))
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        String::new()
    } else {
        format!(" /* {joined} */")
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        format!("{}: {}", self.name, self.ty.emit())
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        let mut output = self
            .doc
            .as_deref()
            .map(|doc| format_doc_comment(doc, ""))
            .unwrap_or_default();
        let export = if self.export { "export " } else { "" };

        match &self.kind {
            TypeDefKind::Interface { properties } => {
                output.push_str(&format!("{export}interface {} {{\n", self.name));
                for prop in properties {
                    if let Some(doc) = &prop.doc {
                        output.push_str(&format_doc_comment(doc, "  "));
                    }
                    output.push_str(&format!("  {};\n", prop.emit()));
                }
                output.push_str("}\n");
            }
            TypeDefKind::TypeAlias { ty } => {
                output.push_str(&format!("{export}type {} = {};\n", self.name, ty.emit()));
            }
            TypeDefKind::ConstEnum { values } => {
                output.push_str(&format!("{export}const {} = {{\n", self.name));
                for (key, value) in values {
                    output.push_str(&format!("  {}: {},\n", quote_if_needed(key), value.emit()));
                }
                output.push_str("} as const;\n");
                output.push_str(&format!(
                    "{export}type {} = (typeof {})[keyof typeof {}];\n",
                    self.name, self.name, self.name
                ));
            }
            TypeDefKind::LabelMap {
                enum_name,
                labels,
                complete,
            } => {
                let record = format!("Record<{enum_name}, string>");
                let ty = if *complete { record } else { format!("Partial<{record}>") };
                output.push_str(&format!("{export}const {}: {ty} = {{\n", self.name));
                for (member, label) in labels {
                    output.push_str(&format!(
                        "  [{}]: {},\n",
                        format_member_access(enum_name, member),
                        quote_string(label)
                    ));
                }
                output.push_str("};\n");
            }
        }
        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for ImportItem {
    fn emit(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} as {}", self.name, alias),
            None => self.name.clone(),
        }
    }
}

impl Emit for TsImport {
    fn emit(&self) -> String {
        let mut output = self
            .doc
            .as_deref()
            .map(|doc| format_doc_comment(doc, ""))
            .unwrap_or_default();
        let items_str = self.items.iter().map(|i| i.emit()).collect::<Vec<_>>().join(", ");
        output.push_str(&format!(
            "import {{ {items_str} }} from {};\n",
            quote_string(&self.from)
        ));
        output
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsDecl {
    fn emit(&self) -> String {
        match self {
            TsDecl::Import(import) => import.emit(),
            TsDecl::TypeDef(def) => def.emit(),
        }
    }
}

impl Emit for TsModule {
    fn emit(&self) -> String {
        // One blank line between declarations
        self.decls
            .iter()
            .map(|decl| decl.emit())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prim(p: TsPrimitive) -> TsType {
        TsType::Primitive(p)
    }

    #[test]
    fn test_emit_primitive() {
        assert_eq!(TsPrimitive::String.emit(), "string");
        assert_eq!(TsPrimitive::Number.emit(), "number");
        assert_eq!(TsPrimitive::Boolean.emit(), "boolean");
        assert_eq!(TsPrimitive::Null.emit(), "null");
        assert_eq!(TsPrimitive::Undefined.emit(), "undefined");
        assert_eq!(TsPrimitive::Unknown.emit(), "unknown");
        assert_eq!(TsPrimitive::Symbol.emit(), "symbol");
    }

    #[test]
    fn test_emit_literal() {
        assert_eq!(TsLiteral::String("hello".into()).emit(), "\"hello\"");
        assert_eq!(TsLiteral::String("say \"hi\"".into()).emit(), "\"say \\\"hi\\\"\"");
        assert_eq!(TsLiteral::Number(3.25).emit(), "3.25");
        assert_eq!(TsLiteral::Int(42).emit(), "42");
        assert_eq!(TsLiteral::Bool(true).emit(), "true");
        assert_eq!(TsLiteral::Null.emit(), "null");
    }

    #[test]
    fn test_emit_array_forms() {
        let ty = TsType::Array(Box::new(TsType::string()));
        assert_eq!(ty.emit(), "string[]");

        let nested = TsType::Array(Box::new(ty));
        assert_eq!(nested.emit(), "string[][]");

        let inner = TsType::Union(vec![TsType::string(), prim(TsPrimitive::Null)]);
        assert_eq!(TsType::Array(Box::new(inner)).emit(), "Array<string | null>");
    }

    #[test]
    fn test_emit_tuples() {
        let fixed = TsType::Tuple(vec![TsType::number(), TsType::string()]);
        assert_eq!(fixed.emit(), "[number, string]");
        let variadic = TsType::VariadicTuple(Box::new(TsType::number()));
        assert_eq!(variadic.emit(), "[...number[]]");
    }

    #[test]
    fn test_emit_function_in_union_is_parenthesized() {
        let func = TsType::Function {
            params: vec![TsParam {
                name: "_0".into(),
                ty: TsType::number(),
            }],
            returns: Box::new(TsType::string()),
        };
        assert_eq!(func.emit(), "(_0: number) => string");
        let union = TsType::Union(vec![func, prim(TsPrimitive::Null)]);
        assert_eq!(union.emit(), "((_0: number) => string) | null");
    }

    #[test]
    fn test_emit_commented_function_in_union_is_parenthesized() {
        let func = TsType::Function {
            params: vec![TsParam {
                name: "_0".into(),
                ty: TsType::number(),
            }],
            returns: Box::new(TsType::string()),
        };
        let commented = func.with_comments(vec!["callback".into()]);
        assert_eq!(commented.emit(), "(_0: number) => string /* callback */");
        let union = TsType::Union(vec![commented, prim(TsPrimitive::Null)]);
        assert_eq!(union.emit(), "((_0: number) => string) /* callback */ | null");
    }

    #[test]
    fn test_emit_commented() {
        let ty = TsType::string().with_comments(vec!["Path".into(), "  ".into()]);
        assert_eq!(ty.emit(), "string /* Path */");
        let ty = ty.with_comments(vec!["extra".into()]);
        assert_eq!(ty.emit(), "string /* Path, extra */");
        assert_eq!(TsType::number().with_comments(vec![String::new()]).emit(), "number");
    }

    #[test]
    fn test_emit_type_def_interface() {
        let def = TsTypeDef {
            name: "Item".into(),
            kind: TypeDefKind::Interface {
                properties: vec![
                    TsProp {
                        name: "id".into(),
                        ty: TsType::number(),
                        optional: false,
                        doc: Some("Primary key".into()),
                    },
                    TsProp {
                        name: "display-name".into(),
                        ty: TsType::string(),
                        optional: true,
                        doc: None,
                    },
                ],
            },
            export: true,
            doc: None,
        };
        let expected = "export interface Item {\n  /** Primary key */\n  id: number;\n  \"display-name\"?: string;\n}\n";
        assert_eq!(def.emit(), expected);
    }

    #[test]
    fn test_emit_type_def_alias_with_doc() {
        let def = TsTypeDef {
            name: "ID".into(),
            kind: TypeDefKind::TypeAlias {
                ty: TsType::string(),
            },
            export: false,
            doc: Some("Identifier.".into()),
        };
        assert_eq!(def.emit(), "/** Identifier. */\ntype ID = string;\n");
    }

    #[test]
    fn test_emit_const_enum_and_labels() {
        let def = TsTypeDef {
            name: "Status".into(),
            kind: TypeDefKind::ConstEnum {
                values: vec![
                    ("ACTIVE".into(), TsLiteral::String("active".into())),
                    ("GONE".into(), TsLiteral::Int(2)),
                ],
            },
            export: true,
            doc: None,
        };
        assert_eq!(
            def.emit(),
            "export const Status = {\n  ACTIVE: \"active\",\n  GONE: 2,\n} as const;\nexport type Status = (typeof Status)[keyof typeof Status];\n"
        );

        let labels = TsTypeDef {
            name: "StatusLabels".into(),
            kind: TypeDefKind::LabelMap {
                enum_name: "Status".into(),
                labels: vec![("ACTIVE".into(), "Currently active".into())],
                complete: true,
            },
            export: true,
            doc: None,
        };
        assert_eq!(
            labels.emit(),
            "export const StatusLabels: Record<Status, string> = {\n  [Status.ACTIVE]: \"Currently active\",\n};\n"
        );

        let partial = TsTypeDef {
            kind: TypeDefKind::LabelMap {
                enum_name: "Status".into(),
                labels: vec![("ACTIVE".into(), "Currently active".into())],
                complete: false,
            },
            ..labels
        };
        assert_eq!(
            partial.emit(),
            "export const StatusLabels: Partial<Record<Status, string>> = {\n  [Status.ACTIVE]: \"Currently active\",\n};\n"
        );
    }

    #[test]
    fn test_emit_import() {
        let import = TsImport {
            items: vec![ImportItem {
                name: "WibWob".into(),
                alias: Some("Wibblewobble".into()),
            }],
            from: "./webby".into(),
            doc: None,
        };
        assert_eq!(
            import.emit(),
            "import { WibWob as Wibblewobble } from \"./webby\";\n"
        );
    }

    #[test]
    fn test_emit_module_separates_declarations() {
        let module = TsModule {
            decls: vec![
                TsDecl::TypeDef(TsTypeDef {
                    name: "A".into(),
                    kind: TypeDefKind::TypeAlias {
                        ty: TsType::number(),
                    },
                    export: true,
                    doc: None,
                }),
                TsDecl::TypeDef(TsTypeDef {
                    name: "B".into(),
                    kind: TypeDefKind::TypeAlias {
                        ty: TsType::string(),
                    },
                    export: true,
                    doc: None,
                }),
            ],
        };
        assert_eq!(module.emit(), "export type A = number;\n\nexport type B = string;\n");
    }
}
