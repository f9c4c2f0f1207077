//! Bounded most-recently-used ordering of window ids, head = most recent.

/// Size-bounded MRU id list. Holds no records itself; the tracker keeps the
/// id-to-record map in lockstep (every listed id has a record).
#[derive(Debug)]
pub struct FocusOrder {
    ids: Vec<i64>,
    cap: usize,
}

impl FocusOrder {
    pub fn new(cap: usize) -> Self {
        Self {
            ids: Vec::new(),
            cap,
        }
    }

    /// Move `id` to the head, removing any prior occurrence first, and trim
    /// to the cap. Returns the ids evicted from the tail.
    pub fn unshift(&mut self, id: i64) -> Vec<i64> {
        if let Some(pos) = self.ids.iter().position(|&v| v == id) {
            self.ids.remove(pos);
        }
        self.ids.insert(0, id);
        if self.ids.len() > self.cap {
            self.ids.split_off(self.cap)
        } else {
            Vec::new()
        }
    }

    /// Remove `id` regardless of position. No-op when absent.
    pub fn remove(&mut self, id: i64) {
        self.ids.retain(|&v| v != id);
    }

    pub fn get(&self, pos: usize) -> Option<i64> {
        self.ids.get(pos).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unshift_prepends() {
        let mut order = FocusOrder::new(10);
        order.unshift(1);
        order.unshift(2);
        order.unshift(3);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_refocus_moves_to_head_without_growth() {
        let mut order = FocusOrder::new(10);
        for id in [1, 2, 3] {
            order.unshift(id);
        }
        let evicted = order.unshift(1);
        assert!(evicted.is_empty());
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_no_duplicates_under_any_sequence() {
        let mut order = FocusOrder::new(5);
        for id in [1, 2, 1, 3, 2, 1, 4, 4, 5, 3] {
            order.unshift(id);
        }
        let ids: Vec<i64> = order.iter().collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn test_cap_evicts_tail() {
        let mut order = FocusOrder::new(3);
        assert!(order.unshift(1).is_empty());
        assert!(order.unshift(2).is_empty());
        assert!(order.unshift(3).is_empty());
        let evicted = order.unshift(4);
        assert_eq!(evicted, vec![1]);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![4, 3, 2]);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_never_exceeds_cap() {
        let mut order = FocusOrder::new(4);
        for id in 0..100 {
            order.unshift(id);
            assert!(order.len() <= 4);
        }
    }

    #[test]
    fn test_remove_any_position() {
        let mut order = FocusOrder::new(10);
        for id in [1, 2, 3, 4] {
            order.unshift(id);
        }
        order.remove(3);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![4, 2, 1]);
        order.remove(1);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![4, 2]);
    }

    #[test]
    fn test_remove_untracked_is_noop() {
        let mut order = FocusOrder::new(10);
        order.unshift(1);
        order.remove(99);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec![1]);
    }
}
