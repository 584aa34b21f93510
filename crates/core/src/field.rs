//! Field descriptors: the neutral unit a structural provider hands to the emitter.

use crate::shape::TypeExpr;

/// One member of a struct-like type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: TypeExpr,
    pub doc: Option<String>,
    pub required: bool,
}

impl FieldInfo {
    /// A required field without documentation.
    pub fn new(name: impl Into<String>, ty: impl Into<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            doc: None,
            required: true,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    /// Apply a partial patch, replacing every attribute the patch names.
    pub fn patched(mut self, patch: &FieldPatch) -> Self {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(ty) = &patch.ty {
            self.ty = ty.clone();
        }
        if let Some(doc) = &patch.doc {
            self.doc.clone_from(doc);
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        self
    }
}

/// A partial field descriptor used by merge overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub ty: Option<TypeExpr>,
    /// `Some(None)` clears the documentation.
    pub doc: Option<Option<String>>,
    pub required: Option<bool>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn ty(mut self, ty: impl Into<TypeExpr>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(Some(doc.into()));
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Builtin;

    #[test]
    fn test_patch_replaces_only_named_attributes() {
        let original = FieldInfo::new("size", Builtin::Int).with_doc("old");
        let patched = original.patched(&FieldPatch::new().ty(Builtin::Str));
        assert_eq!(patched.name, "size");
        assert_eq!(patched.ty, TypeExpr::Builtin(Builtin::Str));
        assert_eq!(patched.doc.as_deref(), Some("old"));
        assert!(patched.required);
    }

    #[test]
    fn test_patch_can_clear_doc_and_rename() {
        let original = FieldInfo::new("size", Builtin::Int).with_doc("old");
        let patch = FieldPatch {
            name: Some("girth".into()),
            doc: Some(None),
            required: Some(false),
            ..FieldPatch::default()
        };
        let patched = original.patched(&patch);
        assert_eq!(patched.name, "girth");
        assert_eq!(patched.doc, None);
        assert!(!patched.required);
    }
}
