use std::collections::BTreeMap;

/// Counts occurrences of keys. Iteration order is the key order, so anything derived from a
/// Counter is deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct Counter<T: Ord + PartialEq + Clone> {
    map: BTreeMap<T, usize>,
    sum: usize,
}

impl<T: Ord + PartialEq + Clone> Default for Counter<T> {
    fn default() -> Counter<T> {
        Counter::new()
    }
}

impl<T: Ord + PartialEq + Clone> Counter<T> {
    pub fn new() -> Counter<T> {
        Counter {
            map: BTreeMap::new(),
            sum: 0,
        }
    }

    /// Adds `amount` to the key, returning the new count.
    pub fn add(&mut self, val: T, amount: usize) -> usize {
        let entry = self.map.entry(val).or_insert(0);
        *entry += amount;
        self.sum += amount;
        *entry
    }

    pub fn inc(&mut self, val: T) -> usize {
        self.add(val, 1)
    }

    /// If the key is missing, returns 0
    pub fn get(&self, val: T) -> usize {
        self.map.get(&val).cloned().unwrap_or(0)
    }

    pub fn sum(&self) -> usize {
        self.sum
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn borrow(&self) -> &BTreeMap<T, usize> {
        &self.map
    }

    pub fn consume(self) -> BTreeMap<T, usize> {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_sums() {
        let mut c = Counter::new();
        assert_eq!(c.inc("a"), 1);
        assert_eq!(c.add("a", 2), 3);
        assert_eq!(c.inc("b"), 1);
        assert_eq!(c.get("a"), 3);
        assert_eq!(c.get("missing"), 0);
        assert_eq!(c.sum(), 4);
        assert_eq!(c.consume().into_iter().collect::<Vec<_>>(), vec![("a", 3), ("b", 1)]);
    }
}
