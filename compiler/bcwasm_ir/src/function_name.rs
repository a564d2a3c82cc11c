//! Function identity.
//!
//! A [`FunctionName`] is a value type: two names are the same function iff
//! owner, member name, signature and kind all match.

use std::fmt;

/// Where a function identity comes from.
///
/// Declared after the name fields in [`FunctionName`], so ordering only
/// consults the kind when owner, name and signature tie.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FunctionKind {
    /// Read from the input program.
    Original,
    /// Generated by the compiler, not deduced from any program element.
    ///
    /// Synthetic helpers can be re-registered so that they emit after the
    /// function they supersede.
    Synthetic,
}

/// Identity of a function: owning type, member name and signature.
///
/// Equality, hashing and ordering are derived over
/// `(owner, name, signature, kind)`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionName {
    owner: String,
    name: String,
    signature: String,
    kind: FunctionKind,
}

impl FunctionName {
    /// Create the identity of a function from the input program.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            signature: signature.into(),
            kind: FunctionKind::Original,
        }
    }

    /// Create the identity of a compiler-generated function.
    pub fn synthetic(
        owner: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            kind: FunctionKind::Synthetic,
            ..Self::new(owner, name, signature)
        }
    }

    /// The owning type.
    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The member name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The signature descriptor, e.g. `(I)V`.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    #[inline]
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Returns `true` for compiler-generated functions.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.kind == FunctionKind::Synthetic
    }

    /// Fully qualified name including the signature: `owner.name(sig)`.
    ///
    /// Unique per original function; used in diagnostics and logs.
    pub fn signature_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.owner, self.name, self.signature)
    }
}

impl fmt::Debug for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FunctionKind::Original => write!(f, "FunctionName({self})"),
            FunctionKind::Synthetic => write!(f, "FunctionName(synthetic {self})"),
        }
    }
}

/// A [`FunctionName`] statically known to be [`Synthetic`](FunctionKind::Synthetic).
///
/// Only synthetic helpers may be re-registered at the end of the
/// registration order; taking this type keeps original functions out.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SyntheticName(FunctionName);

impl SyntheticName {
    /// Create the identity of a compiler-generated function.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        SyntheticName(FunctionName::synthetic(owner, name, signature))
    }

    #[inline]
    pub fn as_name(&self) -> &FunctionName {
        &self.0
    }

    #[inline]
    pub fn into_name(self) -> FunctionName {
        self.0
    }
}

impl AsRef<FunctionName> for SyntheticName {
    fn as_ref(&self) -> &FunctionName {
        &self.0
    }
}

impl From<SyntheticName> for FunctionName {
    fn from(name: SyntheticName) -> Self {
        name.0
    }
}

/// Fails with the name itself when it is an original function.
impl TryFrom<FunctionName> for SyntheticName {
    type Error = FunctionName;

    fn try_from(name: FunctionName) -> Result<Self, FunctionName> {
        if name.is_synthetic() {
            Ok(SyntheticName(name))
        } else {
            Err(name)
        }
    }
}

impl fmt::Display for SyntheticName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for SyntheticName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
