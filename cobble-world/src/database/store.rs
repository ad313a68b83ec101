use std::collections::BTreeMap;

use bytes::Bytes;

/// Serialized blocks by key. Keys iterate in ascending order, so listing is
/// stable as long as the store isn't modified.
#[derive(Default, Debug, Clone)]
pub struct BlockStore {
    entries: BTreeMap<u64, Bytes>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the payload under `key`.
    pub fn put(&mut self, key: u64, payload: Bytes) {
        self.entries.insert(key, payload);
    }

    /// A missing key is not an error: the block was never saved.
    pub fn get(&self, key: u64) -> Option<Bytes> {
        self.entries.get(&key).cloned()
    }

    pub fn contains(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn all_keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::BlockStore;

    #[test]
    fn put_get_overwrite() {
        let mut store = BlockStore::new();
        assert_eq!(store.get(7), None);
        assert!(!store.contains(7));

        store.put(7, Bytes::from_static(b"first"));
        assert!(store.contains(7));
        assert_eq!(store.get(7), Some(Bytes::from_static(b"first")));

        store.put(7, Bytes::from_static(b"second"));
        assert_eq!(store.get(7), Some(Bytes::from_static(b"second")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn listing_is_stable() {
        let mut store = BlockStore::new();
        for key in [u64::MAX, 3, 0x1000, 1] {
            store.put(key, Bytes::new());
        }
        let first = store.all_keys().collect::<Vec<_>>();
        let second = store.all_keys().collect::<Vec<_>>();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn clear_empties() {
        let mut store = BlockStore::new();
        store.put(1, Bytes::from_static(b"x"));
        store.put(2, Bytes::from_static(b"y"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.all_keys().count(), 0);
    }
}
