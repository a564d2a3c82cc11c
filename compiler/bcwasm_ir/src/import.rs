//! Import descriptors.
//!
//! An import descriptor is the annotation data attached to a function that
//! is bound to an external import instead of being compiled from a body.
//! The writer reads the binding from it when declaring module imports.

use std::fmt;

use rustc_hash::FxHashMap;

/// A single annotation value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl AnnotationValue {
    /// The string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::Str(s) => Some(s.as_str()),
            AnnotationValue::Int(_) | AnnotationValue::Bool(_) => None,
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Str(value.to_owned())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::Str(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Str(s) => f.write_str(s),
            AnnotationValue::Int(i) => write!(f, "{i}"),
            AnnotationValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Key→value lookup describing an external import binding.
///
/// Keys are annotation element names. Lookups of missing keys yield `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportDescriptor {
    entries: FxHashMap<String, AnnotationValue>,
}

impl ImportDescriptor {
    /// Key of the import module name.
    pub const MODULE: &'static str = "module";
    /// Key of the imported field name.
    pub const NAME: &'static str = "name";

    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a descriptor binding `module.name`.
    pub fn binding(module: impl Into<String>, name: impl Into<String>) -> Self {
        let mut descriptor = Self::new();
        descriptor.insert(Self::MODULE, AnnotationValue::Str(module.into()));
        descriptor.insert(Self::NAME, AnnotationValue::Str(name.into()));
        descriptor
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AnnotationValue>,
    ) -> Option<AnnotationValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up an annotation element.
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries.get(key)
    }

    /// The import module, if given as a string.
    pub fn module(&self) -> Option<&str> {
        self.get(Self::MODULE).and_then(AnnotationValue::as_str)
    }

    /// The imported field name, if given as a string.
    pub fn name(&self) -> Option<&str> {
        self.get(Self::NAME).and_then(AnnotationValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ImportDescriptor
where
    K: Into<String>,
    V: Into<AnnotationValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
