//! The function registry.
//!
//! Tracks every function the backend has touched, in first-touch order, and
//! answers the worklist queries that drive discovery and emission:
//!
//! 1. **Discover**: entry points and every callee found while scanning are
//!    marked needed. [`next_scan_later`](FunctionRegistry::next_scan_later)
//!    yields them one at a time until the call graph is closed.
//! 2. **Freeze**: [`prepare_finish`](FunctionRegistry::prepare_finish) closes
//!    discovery. Marking a new function needed afterwards is an error.
//! 3. **Write**: [`write_later`](FunctionRegistry::write_later) and
//!    [`needed_imports`](FunctionRegistry::needed_imports) list what the
//!    module writer must emit, in registration order.
//!
//! Insertion order is load-bearing: it fixes the order functions and imports
//! appear in the output module, which must be deterministic.
//!
//! Operations taking a name register unknown functions as `Unseen`, except
//! the read-only lookups ([`is_known`](FunctionRegistry::is_known),
//! [`lifecycle`](FunctionRegistry::lifecycle),
//! [`state`](FunctionRegistry::state)).

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use bcwasm_ir::{FunctionIndex, FunctionName, ImportDescriptor, SyntheticName};

use crate::error::RegistryError;
use crate::lifecycle::{Lifecycle, Transition};
use crate::state::FunctionState;

/// Insertion-ordered map from function identity to its state.
type StateMap<B> = IndexMap<FunctionName, FunctionState<B>, FxBuildHasher>;

/// Registry of all functions known to one compilation pass.
///
/// Owned by the compilation driver and passed by `&mut` to the scanner and
/// writer stages. `B` is the method body type used for replacements.
pub struct FunctionRegistry<B> {
    states: StateMap<B>,
    /// Discovery is closed; no new function may become needed.
    finished: bool,
}

impl<B> Default for FunctionRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> FunctionRegistry<B> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            states: StateMap::default(),
            finished: false,
        }
    }

    /// Create an empty registry sized for about `capacity` functions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: StateMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            finished: false,
        }
    }

    // Closure control

    /// Close discovery. From now on no new function may be marked needed.
    pub fn prepare_finish(&mut self) {
        if !self.finished {
            tracing::debug!(functions = self.states.len(), "function discovery closed");
        }
        self.finished = true;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // Identity and counting

    /// Number of registered functions.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether `name` has a record, in any state. Never creates one.
    pub fn is_known(&self, name: &FunctionName) -> bool {
        self.states.contains_key(name)
    }

    /// Current lifecycle of `name`, `None` if unknown. Never creates a record.
    pub fn lifecycle(&self, name: &FunctionName) -> Option<Lifecycle> {
        self.states.get(name).map(FunctionState::lifecycle)
    }

    /// State record of `name`, `None` if unknown. Never creates a record.
    pub fn state(&self, name: &FunctionName) -> Option<&FunctionState<B>> {
        self.states.get(name)
    }

    /// All registered functions in registration order.
    pub fn names(&self) -> impl Iterator<Item = &FunctionName> {
        self.states.keys()
    }

    /// Get the state of `name`, registering it as `Unseen` if unknown.
    fn get_or_create(&mut self, name: &FunctionName) -> &mut FunctionState<B> {
        let idx = match self.states.get_index_of(name) {
            Some(idx) => idx,
            None => self.states.insert_full(name.clone(), FunctionState::default()).0,
        };
        &mut self.states[idx]
    }

    // Discovery

    /// Mark `name` as called and return the function to actually call.
    ///
    /// An `Unseen` function becomes `Needed`. The result is the alias target
    /// if one is set, otherwise `name` itself.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DiscoveryClosed`] if discovery is closed and `name`
    /// was not needed before. The registry is left unchanged apart from the
    /// record being created.
    pub fn mark_as_needed(&mut self, name: &FunctionName) -> Result<FunctionName, RegistryError> {
        let finished = self.finished;
        let state = self.get_or_create(name);
        if state.lifecycle() == Lifecycle::Unseen {
            if finished {
                tracing::error!(function = %name, "function discovered after prepare finished");
                return Err(RegistryError::DiscoveryClosed { name: name.clone() });
            }
            state.transition(Transition::Need);
            tracing::debug!(function = %name, "call");
        }
        Ok(state.alias().unwrap_or(name).clone())
    }

    /// Like [`mark_as_needed`](Self::mark_as_needed), but first moves an
    /// existing record for `name` to the end of the registration order.
    ///
    /// Used for synthetic helpers that must emit after the function they
    /// supersede. The record keeps all of its fields.
    ///
    /// # Errors
    ///
    /// Same as [`mark_as_needed`](Self::mark_as_needed).
    pub fn mark_as_needed_and_replace_if_exists(
        &mut self,
        name: &SyntheticName,
    ) -> Result<FunctionName, RegistryError> {
        let name = name.as_name();
        if let Some((key, state)) = self.states.shift_remove_entry(name) {
            tracing::trace!(function = %name, "moving function to end of registration order");
            self.states.insert(key, state);
        }
        self.mark_as_needed(name)
    }

    // Import and abstract marking

    /// Bind `name` to an external import.
    ///
    /// Does not change the lifecycle: the import is only declared if the
    /// function also becomes needed.
    pub fn mark_as_import(&mut self, name: &FunctionName, descriptor: ImportDescriptor) {
        self.get_or_create(name).set_import(descriptor);
    }

    /// Mark `name` as abstract or an interface member: callable, never
    /// written as a body.
    pub fn mark_as_abstract(&mut self, name: &FunctionName) {
        let previous = self.get_or_create(name).transition(Transition::MakeAbstract);
        tracing::trace!(function = %name, ?previous, "marked abstract");
    }

    // Scanning

    /// Record that the body of `name` was analysed.
    ///
    /// `Unseen` and `Needed` advance to `Scanned`; other states keep their
    /// lifecycle. The receiver flag is always updated.
    pub fn mark_as_scanned(&mut self, name: &FunctionName, needs_receiver_parameter: bool) {
        let state = self.get_or_create(name);
        let previous = state.transition(Transition::Scan);
        state.set_needs_receiver_parameter(needs_receiver_parameter);
        tracing::trace!(
            function = %name,
            ?previous,
            needs_receiver_parameter,
            "scanned"
        );
    }

    /// First function, in registration order, that is needed but not yet
    /// scanned. `None` once discovery has reached its fixpoint.
    pub fn next_scan_later(&self) -> Option<FunctionName> {
        self.states
            .iter()
            .find(|&(_, state)| state.lifecycle().needs_scan())
            .map(|(name, _)| name.clone())
    }

    /// Whether `name` is needed but not yet scanned.
    pub fn need_to_scan(&mut self, name: &FunctionName) -> bool {
        self.get_or_create(name).lifecycle().needs_scan()
    }

    /// Whether `name` carries an implicit receiver parameter.
    pub fn needs_receiver_parameter(&mut self, name: &FunctionName) -> bool {
        self.get_or_create(name).needs_receiver_parameter()
    }

    // Emission

    /// Every function that is needed or scanned, in registration order.
    pub fn write_later(&self) -> Vec<FunctionName> {
        self.filter_names(|state| state.lifecycle().needs_write())
    }

    /// Functions that are used and need some representation, concrete body
    /// or import, whether or not it was emitted yet.
    pub fn abstracted_functions(&self) -> Vec<FunctionName> {
        self.filter_names(|state| state.lifecycle().needs_write())
    }

    /// Used functions that are bound to an import, in registration order.
    pub fn needed_imports(&self) -> Vec<FunctionName> {
        self.filter_names(|state| state.lifecycle().needs_write() && state.import().is_some())
    }

    fn filter_names(&self, filter: impl Fn(&FunctionState<B>) -> bool) -> Vec<FunctionName> {
        self.states
            .iter()
            .filter(|&(_, state)| filter(state))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Whether `name` is used but not yet written.
    pub fn need_to_write(&mut self, name: &FunctionName) -> bool {
        self.get_or_create(name).lifecycle().needs_write()
    }

    /// Record that `name` was written. Legal from any state.
    pub fn mark_as_written(&mut self, name: &FunctionName) {
        let previous = self.get_or_create(name).transition(Transition::Write);
        tracing::trace!(function = %name, ?previous, "written");
    }

    /// The import binding of `name`, if any.
    pub fn import_descriptor(&mut self, name: &FunctionName) -> Option<&ImportDescriptor> {
        self.get_or_create(name).import()
    }

    // Aliasing, replacement and dispatch index

    /// Redirect every future call of `name` to `target`.
    ///
    /// `name` becomes `Written` and is never emitted under its own name.
    /// An alias is permanent: a second call keeps the first target.
    pub fn set_alias(&mut self, name: &FunctionName, target: FunctionName) {
        let state = self.get_or_create(name);
        if state.set_alias(target) {
            tracing::debug!(function = %name, alias = ?state.alias(), "alias");
        } else {
            tracing::warn!(
                function = %name,
                alias = ?state.alias(),
                "alias already set, keeping the first target"
            );
        }
    }

    /// Register an alternate body for `name`.
    ///
    /// The first registration wins; later candidates, e.g. from a lower
    /// priority library path, are dropped.
    pub fn add_replacement(&mut self, name: &FunctionName, body: B) {
        if !self.get_or_create(name).add_replacement(body) {
            tracing::trace!(function = %name, "ignoring redefined replacement");
        }
    }

    /// The replacement body of `name`, if any.
    pub fn replacement(&mut self, name: &FunctionName) -> Option<&B> {
        self.get_or_create(name).replacement()
    }

    /// Set the virtual-dispatch slot of `name`.
    pub fn set_function_index(&mut self, name: &FunctionName, idx: FunctionIndex) {
        self.get_or_create(name).set_function_index(idx);
    }

    /// The virtual-dispatch slot of `name`, [`FunctionIndex::UNSET`] if none.
    pub fn function_index(&mut self, name: &FunctionName) -> FunctionIndex {
        self.get_or_create(name).function_index()
    }
}

impl<B: Clone> FunctionRegistry<B> {
    /// The body to translate for `name`: its replacement if registered,
    /// otherwise `current`.
    pub fn replace(&mut self, name: &FunctionName, current: B) -> B {
        match self.get_or_create(name).replacement() {
            Some(body) => body.clone(),
            None => current,
        }
    }
}

#[cfg(test)]
mod tests;
