//! Function discovery and emission for the bcwasm backend.
//!
//! The backend compiles only what is provably called. Starting from the entry
//! points, every translated body reports its call targets, which are then
//! translated in turn until no new targets appear. This crate provides the
//! bookkeeping that makes that process terminate deterministically:
//!
//! - **Lifecycle** ([`Lifecycle`], [`Transition`]): the per-function state
//!   machine `Unseen → Needed → Scanned → Written`, plus `Abstract`.
//!
//! - **Registry** ([`FunctionRegistry`]): insertion-ordered function states
//!   with worklist queries, aliasing, first-wins body replacement, import
//!   bindings, dispatch slots and the discovery freeze.
//!
//! - **Driver** ([`discover_functions`], [`write_functions`]): the
//!   scan-to-fixpoint and emission loops over the collaborator traits
//!   [`BodySource`], [`FunctionScanner`] and [`FunctionWriter`].
//!
//! # Errors
//!
//! Only one condition is an error: discovering a new function after
//! [`FunctionRegistry::prepare_finish`]. See [`RegistryError`].
//!
//! # Debugging
//!
//! Enable tracing with environment variables:
//! - `RUST_LOG=bcwasm_module=debug` - call edges and phase summaries
//! - `RUST_LOG=bcwasm_module=trace` - every lifecycle transition

mod driver;
mod error;
mod lifecycle;
mod registry;
mod state;

pub use driver::{
    discover_functions, write_functions, BodySource, FunctionScanner, FunctionToWrite,
    FunctionWriter, ScanOutcome,
};
pub use error::RegistryError;
pub use lifecycle::{Lifecycle, Transition};
pub use registry::FunctionRegistry;
pub use state::FunctionState;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
