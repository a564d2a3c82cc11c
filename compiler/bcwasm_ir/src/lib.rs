//! Shared identity types for the bcwasm backend.
//!
//! This crate provides:
//!
//! - **Function identity** ([`FunctionName`]): the immutable key naming a
//!   function by owning type, member name and signature. A
//!   [`Synthetic`](FunctionKind::Synthetic) variant marks compiler-generated
//!   helpers that may later be re-registered wholesale; [`SyntheticName`]
//!   carries that guarantee in the type.
//!
//! - **Import descriptors** ([`ImportDescriptor`]): the key→value annotation
//!   lookup describing how a function binds to an external import.
//!
//! - **Dispatch slots** ([`FunctionIndex`]): the virtual-dispatch index a
//!   function occupies in its type's table.
//!
//! # Crate Dependencies
//!
//! No dependency on the registry. Readers of the bytecode produce these
//! values, `bcwasm_module` stores them.

mod function_index;
mod function_name;
mod import;

pub use function_index::FunctionIndex;
pub use function_name::{FunctionKind, FunctionName, SyntheticName};
pub use import::{AnnotationValue, ImportDescriptor};
