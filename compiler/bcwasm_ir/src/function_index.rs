//! Virtual-dispatch slot index.

use std::fmt;
use std::num::TryFromIntError;

/// Slot of a function in its type's virtual-dispatch table.
///
/// Pure storage: the dispatch layer assigns indices and owns their
/// uniqueness. Defaults to [`FunctionIndex::UNSET`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FunctionIndex(i32);

impl FunctionIndex {
    /// Sentinel for "no slot assigned".
    pub const UNSET: FunctionIndex = FunctionIndex(-1);

    #[inline]
    pub const fn new(raw: i32) -> Self {
        FunctionIndex(raw)
    }

    /// Get raw value, `-1` when unset.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_set(self) -> bool {
        self.0 >= 0
    }

    /// The slot, or `None` when unset.
    #[inline]
    pub fn get(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }
}

impl Default for FunctionIndex {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Fails for slots above `i32::MAX`, which have no raw representation.
impl TryFrom<u32> for FunctionIndex {
    type Error = TryFromIntError;

    fn try_from(value: u32) -> Result<Self, TryFromIntError> {
        i32::try_from(value).map(FunctionIndex)
    }
}

impl fmt::Debug for FunctionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "FunctionIndex({})", self.0)
        } else {
            f.write_str("FunctionIndex(unset)")
        }
    }
}
