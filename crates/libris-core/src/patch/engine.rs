//! Applies an ordered list of operations to a representation.
//!
//! A run works on a scratch copy of the target and moves through
//! `Pending -> Applying(i) -> Applied | Failed`. The caller's value is
//! never touched; on failure the scratch copy is dropped.

use serde_json::Value;

use crate::errors::{LibrisError, Result};
use crate::patch::operation::{PatchFailure, PatchFailureReason, PatchOperation};
use crate::patch::pointer::{array_index, member_key, JsonPointer};
use crate::rules::validation::Validator;

/// Progress of a patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchState {
    Pending,
    /// Operation `i` is next to be applied
    Applying(usize),
    Applied,
    Failed(PatchFailure),
}

/// One application of a patch document to one target.
#[derive(Debug)]
pub struct PatchRun<'p> {
    operations: &'p [PatchOperation],
    scratch: Value,
    state: PatchState,
}

impl<'p> PatchRun<'p> {
    pub fn new(target: &Value, operations: &'p [PatchOperation]) -> Self {
        Self {
            operations,
            scratch: target.clone(),
            state: PatchState::Pending,
        }
    }

    pub fn state(&self) -> &PatchState {
        &self.state
    }

    /// Apply the next operation. Does nothing once the run is finished.
    pub fn step(&mut self) -> &PatchState {
        let index = match self.state {
            PatchState::Pending => 0,
            PatchState::Applying(i) => i,
            PatchState::Applied | PatchState::Failed(_) => return &self.state,
        };

        self.state = match self.operations.get(index) {
            None => PatchState::Applied,
            Some(operation) => match apply_operation(&mut self.scratch, operation) {
                Ok(()) if index + 1 == self.operations.len() => PatchState::Applied,
                Ok(()) => PatchState::Applying(index + 1),
                Err((path, reason)) => PatchState::Failed(PatchFailure {
                    index,
                    op: operation.kind(),
                    path,
                    reason,
                }),
            },
        };
        &self.state
    }

    /// Run to completion.
    ///
    /// # Errors
    ///
    /// `PatchFailed` carrying the index of the operation that halted the run.
    pub fn run(mut self) -> Result<Value> {
        loop {
            match self.step() {
                PatchState::Applied => return Ok(self.scratch),
                PatchState::Failed(failure) => {
                    tracing::debug!(
                        op_index = failure.index,
                        reason = %failure.reason,
                        "patch run halted"
                    );
                    return Err(LibrisError::PatchFailed(failure.clone()));
                }
                PatchState::Pending | PatchState::Applying(_) => {}
            }
        }
    }
}

/// Apply `operations` to a copy of `target`.
///
/// # Errors
///
/// `PatchFailed` on the first operation that cannot be applied.
pub fn apply(target: &Value, operations: &[PatchOperation]) -> Result<Value> {
    PatchRun::new(target, operations).run()
}

/// Apply, then validate the patched representation.
///
/// # Errors
///
/// - `PatchFailed` if an operation cannot be applied; the validator is not run
/// - `ValidationFailed` if the validator reports any field error
pub fn apply_and_validate(
    target: &Value,
    operations: &[PatchOperation],
    validator: &dyn Validator,
) -> Result<Value> {
    let patched = apply(target, operations)?;
    let errors = validator.validate(&patched);
    if !errors.is_empty() {
        return Err(LibrisError::ValidationFailed { errors });
    }
    Ok(patched)
}

type OpResult = std::result::Result<(), (String, PatchFailureReason)>;

fn pointer(raw: &str) -> std::result::Result<JsonPointer, (String, PatchFailureReason)> {
    JsonPointer::parse(raw).ok_or_else(|| (raw.to_string(), PatchFailureReason::InvalidPath))
}

fn apply_operation(doc: &mut Value, operation: &PatchOperation) -> OpResult {
    match operation {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOperation::Replace { path, value } => {
            let target = pointer(path)?
                .get_mut(doc)
                .ok_or_else(|| (path.clone(), PatchFailureReason::PathNotFound))?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            let source = pointer(from)?;
            if pointer(path)?.is_descendant_of(&source) {
                return Err((path.clone(), PatchFailureReason::InvalidPath));
            }
            if from == path {
                return source
                    .get(doc)
                    .map(|_| ())
                    .ok_or_else(|| (from.clone(), PatchFailureReason::PathNotFound));
            }
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = pointer(from)?
                .get(doc)
                .cloned()
                .ok_or_else(|| (from.clone(), PatchFailureReason::PathNotFound))?;
            add(doc, path, value)
        }
        PatchOperation::Test { path, value } => {
            let actual = pointer(path)?
                .get(doc)
                .ok_or_else(|| (path.clone(), PatchFailureReason::PathNotFound))?;
            if json_equal(actual, value) {
                Ok(())
            } else {
                Err((path.clone(), PatchFailureReason::TestFailed))
            }
        }
    }
}

fn add(doc: &mut Value, path: &str, value: Value) -> OpResult {
    let target = pointer(path)?;
    let Some((parent, last)) = target.split_last() else {
        *doc = value;
        return Ok(());
    };
    let invalid = || (path.to_string(), PatchFailureReason::InvalidPath);

    match parent.get_mut(doc).ok_or_else(invalid)? {
        Value::Object(map) => {
            let key = member_key(map, last).unwrap_or_else(|| last.to_string());
            map.insert(key, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = if last == "-" {
                items.len()
            } else {
                array_index(last).ok_or_else(invalid)?
            };
            if index > items.len() {
                return Err(invalid());
            }
            items.insert(index, value);
            Ok(())
        }
        _ => Err(invalid()),
    }
}

fn remove(doc: &mut Value, path: &str) -> std::result::Result<Value, (String, PatchFailureReason)> {
    let target = pointer(path)?;
    let (parent, last) = target
        .split_last()
        .ok_or_else(|| (path.to_string(), PatchFailureReason::InvalidPath))?;
    let missing = || (path.to_string(), PatchFailureReason::PathNotFound);

    match parent.get_mut(doc).ok_or_else(missing)? {
        Value::Object(map) => {
            let key = member_key(map, last).ok_or_else(missing)?;
            map.remove(&key).ok_or_else(missing)
        }
        Value::Array(items) => {
            let index = array_index(last).filter(|i| *i < items.len()).ok_or_else(missing)?;
            Ok(items.remove(index))
        }
        _ => Err(missing()),
    }
}

/// Structural equality where numbers compare by value, so `1` equals `1.0`.
fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) if x == y => true,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map_or(false, |w| json_equal(v, w)))
        }
        _ => a == b,
    }
}
