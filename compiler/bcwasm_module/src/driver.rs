//! Discovery and emission driver.
//!
//! Runs the two phases of one compilation pass over a [`FunctionRegistry`]:
//!
//! 1. [`discover_functions`]: pull needed functions one at a time, translate
//!    their bodies (which marks callees as needed), and stop at the fixpoint.
//!    Closes the registry.
//! 2. [`write_functions`]: declare used imports, then emit every remaining
//!    needed function with its final body.
//!
//! Translation and module writing stay with the collaborators behind
//! [`FunctionScanner`] and [`FunctionWriter`]; the driver only sequences them.

use bcwasm_ir::{FunctionIndex, FunctionName, ImportDescriptor};

use crate::error::RegistryError;
use crate::registry::FunctionRegistry;

/// Source of original method bodies, usually the bytecode reader.
pub trait BodySource<B> {
    /// The body of `name` from the input program, `None` if it has none
    /// (native, imported or unknown).
    fn body(&self, name: &FunctionName) -> Option<B>;
}

/// Result of scanning one function body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// The function needs an implicit receiver parameter.
    pub needs_receiver_parameter: bool,
}

/// Translator hook for the discovery phase.
///
/// Implementations walk `body` and call
/// [`FunctionRegistry::mark_as_needed`] for every call target they find.
pub trait FunctionScanner<B> {
    type Error: From<RegistryError>;

    fn scan(
        &mut self,
        registry: &mut FunctionRegistry<B>,
        name: &FunctionName,
        body: &B,
    ) -> Result<ScanOutcome, Self::Error>;
}

/// Module writer hook for the emission phase.
pub trait FunctionWriter<B> {
    type Error;

    /// Declare `name` as a module import.
    fn write_import(
        &mut self,
        name: &FunctionName,
        descriptor: &ImportDescriptor,
    ) -> Result<(), Self::Error>;

    /// Emit the function `name`.
    ///
    /// `body` is `None` for functions without any body source.
    fn write_function(&mut self, function: FunctionToWrite<'_, B>) -> Result<(), Self::Error>;
}

/// Everything the writer needs to emit one function.
#[derive(Debug)]
pub struct FunctionToWrite<'a, B> {
    pub name: &'a FunctionName,
    /// Final body, replacement already applied.
    pub body: Option<&'a B>,
    pub needs_receiver_parameter: bool,
    pub function_index: FunctionIndex,
}

/// Body to translate for `name`: replacement first, then the original.
fn resolve_body<B: Clone>(
    registry: &mut FunctionRegistry<B>,
    source: &impl BodySource<B>,
    name: &FunctionName,
) -> Option<B> {
    match source.body(name) {
        Some(body) => Some(registry.replace(name, body)),
        None => registry.replacement(name).cloned(),
    }
}

/// Scan needed functions until no new call targets appear, then close
/// discovery.
///
/// Functions bound to an import, and functions without a body, are marked
/// scanned untranslated. Returns the number of functions scanned.
///
/// # Errors
///
/// Propagates scanner errors, including
/// [`RegistryError::DiscoveryClosed`] raised by the scanner.
pub fn discover_functions<B, S>(
    registry: &mut FunctionRegistry<B>,
    source: &impl BodySource<B>,
    scanner: &mut S,
) -> Result<usize, S::Error>
where
    B: Clone,
    S: FunctionScanner<B>,
{
    let mut scanned = 0;
    while let Some(name) = registry.next_scan_later() {
        // Imports are bound to the host; their bodies never reach the module.
        if registry.import_descriptor(&name).is_some() {
            tracing::trace!(function = %name, "import, not scanned");
            registry.mark_as_scanned(&name, false);
            scanned += 1;
            continue;
        }
        let outcome = match resolve_body(registry, source, &name) {
            Some(body) => scanner.scan(registry, &name, &body)?,
            None => {
                tracing::trace!(function = %name, "no body to scan");
                ScanOutcome::default()
            }
        };
        registry.mark_as_scanned(&name, outcome.needs_receiver_parameter);
        scanned += 1;
    }

    registry.prepare_finish();
    tracing::debug!(
        scanned,
        functions = registry.len(),
        "function discovery complete"
    );
    Ok(scanned)
}

/// Emit every used function: imports first, then bodies, both in
/// registration order. Each is marked written as it is emitted.
///
/// Closes discovery if the caller has not. Returns the number of functions
/// handed to the writer.
///
/// # Errors
///
/// Propagates the first writer error; functions before it stay written.
pub fn write_functions<B, W>(
    registry: &mut FunctionRegistry<B>,
    source: &impl BodySource<B>,
    writer: &mut W,
) -> Result<usize, W::Error>
where
    B: Clone,
    W: FunctionWriter<B>,
{
    registry.prepare_finish();
    let mut written = 0;

    for name in registry.needed_imports() {
        if let Some(descriptor) = registry.import_descriptor(&name) {
            writer.write_import(&name, descriptor)?;
        }
        registry.mark_as_written(&name);
        written += 1;
    }

    for name in registry.write_later() {
        let body = resolve_body(registry, source, &name);
        writer.write_function(FunctionToWrite {
            name: &name,
            body: body.as_ref(),
            needs_receiver_parameter: registry.needs_receiver_parameter(&name),
            function_index: registry.function_index(&name),
        })?;
        registry.mark_as_written(&name);
        written += 1;
    }

    tracing::debug!(written, "functions written");
    Ok(written)
}
