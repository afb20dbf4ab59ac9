use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locations already handed to the transport during one crawl
///
/// Keys are compared case-insensitively. Insertion is an atomic check-and-add, so two
/// pages linking to the same location can never both schedule it.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set already holding the crawl's start location
    pub fn seeded(location: &str) -> Self {
        let set = Self::new();
        set.insert(location);
        set
    }

    /// Adds a location, returning true if it was not present yet
    pub fn insert(&self, location: &str) -> bool {
        self.lock().insert(location.to_lowercase())
    }

    pub fn contains(&self, location: &str) -> bool {
        self.lock().contains(&location.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_seeded() {
        let visited = VisitedSet::seeded("http://x/Docs");
        assert!(visited.contains("http://x/docs"));
        assert!(!visited.insert("HTTP://X/DOCS"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_insert_once_across_threads() {
        let visited = Arc::new(VisitedSet::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let visited = Arc::clone(&visited);
                std::thread::spawn(move || visited.insert("http://x/page"))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&inserted| inserted)
            .count();

        assert_eq!(admitted, 1);
        assert!(!visited.is_empty());
    }
}
