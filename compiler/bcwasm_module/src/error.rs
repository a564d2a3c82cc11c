//! Registry errors.

use std::fmt;

use bcwasm_ir::FunctionName;

/// Error raised by the function registry.
///
/// Only temporal-ordering violations are errors; redundant or idempotent
/// requests are accepted silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A previously unseen function was discovered after
    /// [`prepare_finish`](crate::FunctionRegistry::prepare_finish).
    ///
    /// The discovery closure and the translator disagree about which
    /// functions are called. Compilation must abort.
    DiscoveryClosed { name: FunctionName },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DiscoveryClosed { name } => {
                write!(f, "prepare was already finished: {name}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
