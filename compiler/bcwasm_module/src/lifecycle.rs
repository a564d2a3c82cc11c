//! Function lifecycle state machine.
//!
//! Every registered function is in exactly one [`Lifecycle`] state. The
//! registry never assigns a state directly: each mutation names a
//! [`Transition`] and [`Lifecycle::apply`] decides the next state.
//!
//! ```text
//! Unseen ──Need──▶ Needed ──Scan──▶ Scanned ──Write──▶ Written
//! Unseen ──Scan──▶ Scanned
//! any    ──MakeAbstract──▶ Abstract
//! any    ──Write | Alias──▶ Written
//! ```

/// Lifecycle of one function in the discovery → scan → write pipeline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Registered (touched) but not known to be called.
    #[default]
    Unseen,
    /// Called from somewhere; waiting to be scanned.
    Needed,
    /// Body analysed; waiting to be written.
    Scanned,
    /// Emitted, or never to be emitted under its own name (aliased).
    Written,
    /// Interface or abstract member: callable, never emitted as a body.
    Abstract,
}

/// A requested lifecycle change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A call site references the function.
    Need,
    /// The function body was analysed.
    Scan,
    /// The function was emitted.
    Write,
    /// The function has no concrete body.
    MakeAbstract,
    /// Calls are redirected to another function.
    Alias,
}

impl Lifecycle {
    /// Next state after `transition`.
    ///
    /// Requests that do not apply to the current state leave it unchanged.
    #[must_use]
    pub fn apply(self, transition: Transition) -> Lifecycle {
        use Lifecycle::{Abstract, Needed, Scanned, Unseen, Written};

        match (self, transition) {
            (Unseen, Transition::Need) => Needed,
            (Needed | Scanned | Written | Abstract, Transition::Need) => self,

            (Unseen | Needed, Transition::Scan) => Scanned,
            (Scanned | Written | Abstract, Transition::Scan) => self,

            (_, Transition::Write | Transition::Alias) => Written,
            (_, Transition::MakeAbstract) => Abstract,
        }
    }

    /// Waiting to be scanned.
    #[inline]
    pub fn needs_scan(self) -> bool {
        self == Lifecycle::Needed
    }

    /// Used but not yet emitted: the emission worklist predicate.
    #[inline]
    pub fn needs_write(self) -> bool {
        matches!(self, Lifecycle::Needed | Lifecycle::Scanned)
    }
}
