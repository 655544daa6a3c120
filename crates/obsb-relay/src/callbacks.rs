//! Page-side callback correlation.

use std::collections::HashMap;

/// Pending script callbacks keyed by the id sent along with a request.
///
/// Ids are non-zero and handed out in increasing order, wrapping back to 1.
/// A callback is taken at most once.
#[derive(Debug)]
pub struct CallbackTable<F> {
    next_id: u32,
    pending: HashMap<u32, F>,
}

impl<F> CallbackTable<F> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: HashMap::new(),
        }
    }

    /// Store `callback` and return its id.
    pub fn register(&mut self, callback: F) -> u32 {
        let mut id = self.next_id;
        while self.pending.contains_key(&id) {
            id = Self::after(id);
        }
        self.next_id = Self::after(id);
        self.pending.insert(id, callback);
        id
    }

    fn after(id: u32) -> u32 {
        id.checked_add(1).unwrap_or(1)
    }

    /// Remove and return the callback for `id`.
    pub fn take(&mut self, id: u32) -> Option<F> {
        self.pending.remove(&id)
    }

    /// Number of callbacks awaiting an answer.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget every pending callback (script context released).
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<F> Default for CallbackTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_nonzero() {
        let mut table = CallbackTable::new();

        let a = table.register("a");
        let b = table.register("b");
        assert_ne!(a, 0);
        assert!(b > a);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_take_at_most_once() {
        let mut table = CallbackTable::new();
        let id = table.register(|json: &str| json.len());

        let callback = table.take(id).unwrap();
        assert_eq!(callback("{}"), 2);
        assert!(table.take(id).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_wraps_past_pending_ids() {
        let mut table = CallbackTable::new();
        table.next_id = u32::MAX;

        let last = table.register("last");
        let first = table.register("first");
        assert_eq!(last, u32::MAX);
        assert_eq!(first, 1);

        // Id 1 is still pending, so the next wrap skips it
        table.next_id = u32::MAX;
        table.take(last);
        assert_eq!(table.register("again"), u32::MAX);
        assert_eq!(table.register("next"), 2);
    }

    #[test]
    fn test_clear() {
        let mut table = CallbackTable::new();
        table.register(());
        table.register(());

        table.clear();
        assert!(table.is_empty());
    }
}
