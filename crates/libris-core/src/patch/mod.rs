//! Partial updates: JSON Patch documents applied to representations.

pub mod engine;
pub mod operation;
pub mod pointer;

pub use engine::{apply, apply_and_validate, PatchRun, PatchState};
pub use operation::{PatchDocument, PatchFailure, PatchFailureReason, PatchOpKind, PatchOperation};
pub use pointer::JsonPointer;
