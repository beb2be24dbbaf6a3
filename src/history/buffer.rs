use crate::UserType;

/// Fixed length window over the most recent values, oldest first.
///
/// An update rotates the window left by one and overwrites the last slot, so
/// the whole window can always be read in time order. The length is set once
/// and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer<T> {
    values: Vec<T>,
}

impl<T: UserType> HistoryBuffer<T> {
    /// Buffer of `length` default values. `length` must be at least 1.
    pub fn new(length: usize) -> Self {
        debug_assert!(length > 0, "history buffers hold at least one entry");
        Self {
            values: vec![T::default(); length],
        }
    }

    /// Drops the oldest value and appends `value` as the newest one
    pub fn push(
        &mut self,
        value: T,
    ) {
        self.values.rotate_left(1);
        if let Some(last) = self.values.last_mut() {
            *last = value;
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Newest value
    pub fn latest(&self) -> Option<&T> {
        self.values.last()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.values.clone()
    }
}
