use crate::models::{Marker, Shape};

/// Record with a storage identifier
pub trait Keyed {
    fn id(&self) -> i64;
}

impl Keyed for Marker {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Keyed for Shape {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Who assigned a record's id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Returned by the sync API
    Server,
    /// Created in-session; the id is locally generated
    Local,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    correlation: u64,
    origin: Origin,
    record: T,
}

/// In-session collection of annotations.
///
/// Every entry carries a correlation key issued on insert, so a server
/// response replaces exactly the optimistic entry it answers regardless of
/// ordering or id collisions with other entries.
#[derive(Debug, Clone)]
pub struct WorkingSet<T> {
    entries: Vec<Entry<T>>,
    next_correlation: u64,
}

impl<T> Default for WorkingSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_correlation: 0,
        }
    }
}

impl<T: Keyed> WorkingSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, origin: Origin, record: T) -> u64 {
        self.next_correlation += 1;
        let correlation = self.next_correlation;
        self.entries.push(Entry {
            correlation,
            origin,
            record,
        });
        correlation
    }

    /// Add an optimistic record and return its correlation key
    pub fn insert_local(&mut self, record: T) -> u64 {
        self.issue(Origin::Local, record)
    }

    /// Replace the entry for `correlation` with the authoritative record
    pub fn confirm(&mut self, correlation: u64, record: T) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.correlation == correlation)
        {
            Some(entry) => {
                entry.origin = Origin::Server;
                entry.record = record;
            }
            None => self.upsert_server(record),
        }
    }

    pub fn discard(&mut self, correlation: u64) {
        self.entries.retain(|e| e.correlation != correlation);
    }

    /// Store a server record, replacing any entry with the same id
    pub fn upsert_server(&mut self, record: T) {
        let id = record.id();
        match self.entries.iter_mut().find(|e| e.record.id() == id) {
            Some(entry) => {
                entry.origin = Origin::Server;
                entry.record = record;
            }
            None => {
                self.issue(Origin::Server, record);
            }
        }
    }

    /// Drop every entry and load a fresh server listing
    pub fn replace_all(&mut self, records: Vec<T>) {
        self.entries.clear();
        for record in records {
            self.issue(Origin::Server, record);
        }
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| e.record.id() == id)
            .map(|e| &e.record)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|e| e.record.id() == id)
            .map(|e| &mut e.record)
    }

    pub fn origin(&self, id: i64) -> Option<Origin> {
        self.entries
            .iter()
            .find(|e| e.record.id() == id)
            .map(|e| e.origin)
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.record.id() != id);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(i64, &'static str);

    impl Keyed for Item {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_confirm_replaces_by_correlation_not_id() {
        let mut set = WorkingSet::new();
        let first = set.insert_local(Item(1_700_000_000_000, "a"));
        let second = set.insert_local(Item(1_700_000_000_001, "b"));

        // Responses arrive out of order, and the server id collides with nothing local
        set.confirm(second, Item(8, "b"));
        set.confirm(first, Item(7, "a"));

        let items: Vec<_> = set.iter().cloned().collect();
        assert_eq!(items, vec![Item(7, "a"), Item(8, "b")]);
        assert_eq!(set.origin(7), Some(Origin::Server));
        assert_eq!(set.origin(1_700_000_000_000), None);
    }

    #[test]
    fn test_discard_and_remove() {
        let mut set = WorkingSet::new();
        let key = set.insert_local(Item(1, "a"));
        set.upsert_server(Item(2, "b"));
        assert_eq!(set.origin(1), Some(Origin::Local));

        set.discard(key);
        assert!(set.get(1).is_none());
        assert!(set.remove(2));
        assert!(!set.remove(2));
        assert!(set.is_empty());
    }

    #[test]
    fn test_upsert_server_replaces_same_id() {
        let mut set = WorkingSet::new();
        set.replace_all(vec![Item(1, "old"), Item(2, "x")]);
        set.upsert_server(Item(1, "new"));

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1), Some(&Item(1, "new")));
    }
}
