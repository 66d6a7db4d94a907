use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

///
/// TypeCache
///
/// Write-once-per-key map from type path to a computed value. Values are
/// derived outside the lock; when two callers race on the same key the
/// first insert wins and the other result is dropped.
///

#[derive(Debug)]
pub(crate) struct TypeCache<T> {
    entries: RwLock<HashMap<String, T>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<T> Default for TypeCache<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }
}

impl<T: Clone> TypeCache<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, path: &str) -> Option<T> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned();

        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);

        found
    }

    /// Store `value` unless a value is already present; returns the stored one.
    pub(crate) fn insert(&self, path: &str, value: T) -> T {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_string())
            .or_insert(value)
            .clone()
    }

    /// Cached value for `path`, computing and storing it on a miss.
    pub(crate) fn get_or_try_insert<E>(
        &self,
        path: &str,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(value) = self.get(path) {
            return Ok(value);
        }

        let value = compute()?;

        Ok(self.insert(path, value))
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self
                .entries
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
        }
    }
}

///
/// CacheStats
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_wins() {
        let cache = TypeCache::new();

        assert_eq!(cache.insert("a", 1), 1);
        assert_eq!(cache.insert("a", 2), 1);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn compute_runs_once_per_key() {
        let cache = TypeCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let value: Result<_, ()> = cache.get_or_try_insert("a", || {
                calls += 1;
                Ok("x".to_string())
            });
            assert_eq!(value.unwrap(), "x");
        }

        assert_eq!(calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 1,
                size: 1
            }
        );
    }

    #[test]
    fn failed_compute_is_not_cached() {
        let cache: TypeCache<u8> = TypeCache::new();

        assert_eq!(cache.get_or_try_insert("a", || Err("boom")), Err("boom"));
        assert_eq!(cache.stats().size, 0);
    }
}
