//! Per-function bookkeeping.

use bcwasm_ir::{FunctionIndex, FunctionName, ImportDescriptor};

use crate::lifecycle::{Lifecycle, Transition};

/// Mutable state of one registered function.
///
/// Created lazily on first touch and owned by the
/// [`FunctionRegistry`](crate::FunctionRegistry). `B` is the method body
/// type supplied by the bytecode reader.
#[derive(Clone, Debug)]
pub struct FunctionState<B> {
    lifecycle: Lifecycle,
    /// Alternate implementation; first registration wins.
    replacement: Option<B>,
    /// Function that calls to this one are redirected to.
    alias: Option<FunctionName>,
    import: Option<ImportDescriptor>,
    function_index: FunctionIndex,
    /// Needs an implicit receiver ("this") parameter besides its signature.
    needs_receiver_parameter: bool,
}

impl<B> Default for FunctionState<B> {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Unseen,
            replacement: None,
            alias: None,
            import: None,
            function_index: FunctionIndex::UNSET,
            needs_receiver_parameter: false,
        }
    }
}

impl<B> FunctionState<B> {
    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Apply a lifecycle transition, returning the previous state.
    pub(crate) fn transition(&mut self, transition: Transition) -> Lifecycle {
        let previous = self.lifecycle;
        self.lifecycle = previous.apply(transition);
        previous
    }

    #[inline]
    pub fn replacement(&self) -> Option<&B> {
        self.replacement.as_ref()
    }

    /// Store `body` unless a replacement is already registered.
    ///
    /// Returns `false` when the candidate was dropped.
    pub(crate) fn add_replacement(&mut self, body: B) -> bool {
        if self.replacement.is_some() {
            return false;
        }
        self.replacement = Some(body);
        true
    }

    #[inline]
    pub fn alias(&self) -> Option<&FunctionName> {
        self.alias.as_ref()
    }

    /// Redirect calls to `target`. The first alias sticks.
    ///
    /// Returns `false` when an alias was already set.
    pub(crate) fn set_alias(&mut self, target: FunctionName) -> bool {
        self.transition(Transition::Alias);
        if self.alias.is_some() {
            return false;
        }
        self.alias = Some(target);
        true
    }

    #[inline]
    pub fn import(&self) -> Option<&ImportDescriptor> {
        self.import.as_ref()
    }

    pub(crate) fn set_import(&mut self, descriptor: ImportDescriptor) {
        self.import = Some(descriptor);
    }

    #[inline]
    pub fn function_index(&self) -> FunctionIndex {
        self.function_index
    }

    pub(crate) fn set_function_index(&mut self, idx: FunctionIndex) {
        self.function_index = idx;
    }

    #[inline]
    pub fn needs_receiver_parameter(&self) -> bool {
        self.needs_receiver_parameter
    }

    pub(crate) fn set_needs_receiver_parameter(&mut self, value: bool) {
        self.needs_receiver_parameter = value;
    }
}
