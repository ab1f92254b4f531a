//! Per-call binding environments.

use rustc_hash::FxHashMap;

use crate::value::Value;

/// Binding environment: argument position to concrete value.
///
/// Every call evaluation builds a fresh one scoped to that call, so nested
/// and recursive invocations never observe each other's argument values.
/// Argument nodes themselves stay value-free.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    slots: FxHashMap<usize, Value>,
}

impl Bindings {
    /// Empty environment, for trees with no free argument references.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment binding positions `0..` to `values` in order.
    #[must_use]
    pub fn of(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            slots: values.into_iter().enumerate().collect(),
        }
    }

    /// Bind one position, replacing any previous value.
    pub fn bind(&mut self, index: usize, value: Value) {
        self.slots.insert(index, value);
    }

    /// The value bound at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(&index)
    }
}
