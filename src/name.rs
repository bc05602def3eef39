//! Qualified identifiers for elements, types, fields and primitives.

use std::fmt;

use serde::Serialize;

/// A unique, string-keyed identifier such as `hydra/lib/math.add`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split at the last `.` into a namespace and a local part.
    pub fn qualify(&self) -> QualifiedName {
        match self.0.rsplit_once('.') {
            Some((namespace, local)) if !namespace.is_empty() => QualifiedName {
                namespace: Some(Namespace(namespace.to_string())),
                local: local.to_string(),
            },
            _ => QualifiedName {
                namespace: None,
                local: self.0.clone(),
            },
        }
    }

    pub fn namespace(&self) -> Option<Namespace> {
        self.qualify().namespace
    }

    pub fn local_name(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((namespace, local)) if !namespace.is_empty() => local,
            _ => &self.0,
        }
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&Name> for Name {
    fn from(value: &Name) -> Self {
        value.clone()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of a field, unique within a record or union type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A prefix shared by related names, e.g. `hydra/lib/lists`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A name split into its optional namespace and local part.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    pub namespace: Option<Namespace>,
    pub local: String,
}

impl QualifiedName {
    pub fn unqualify(&self) -> Name {
        match &self.namespace {
            Some(namespace) => Name(format!("{}.{}", namespace.0, self.local)),
            None => Name(self.local.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualify_splits_at_last_dot() {
        let name = Name::from("hydra/lib/math.add");
        let qualified = name.qualify();
        assert_eq!(qualified.namespace, Some(Namespace::new("hydra/lib/math")));
        assert_eq!(qualified.local, "add");
        assert_eq!(name.local_name(), "add");
        assert_eq!(qualified.unqualify(), name);
    }

    #[test]
    fn unqualified_names_have_no_namespace() {
        let name = Name::from("Placeholder");
        assert_eq!(name.namespace(), None);
        assert_eq!(name.local_name(), "Placeholder");
        assert_eq!(name.qualify().unqualify(), name);
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(Name::from("a.b"), Name::new(String::from("a.b")));
        assert_ne!(Name::from("a.b"), Name::from("a.c"));
        assert_eq!(FieldName::from("x"), FieldName::new("x"));
    }
}
