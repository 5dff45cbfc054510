//! Ring traversal.
//!
//! Each iterator carries its own cursor and remaining count. A ring holds
//! no traversal state, so any number of iterators may walk the same ring
//! (or different rings over the same nodes) at once.

use std::iter::FusedIterator;

use skein_core::{NodeKey, RingId};
use skein_pool::{Direction, NodePool};

/// Shared cursor logic for both directions.
#[derive(Clone, Debug)]
struct Cursor<'a> {
    ring: &'a RingId,
    current: Option<NodeKey>,
    remaining: usize,
}

impl Cursor<'_> {
    fn advance<T>(&mut self, pool: &NodePool<T>, direction: Direction) -> Option<NodeKey> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.current?;
        self.remaining -= 1;
        // A broken link ends the walk instead of looping.
        self.current = pool.step(key, self.ring, direction).ok();
        if self.current.is_none() {
            self.remaining = 0;
        }
        Some(key)
    }
}

/// Forward traversal from the head. Yields node keys.
#[derive(Clone, Debug)]
pub struct Iter<'a, T> {
    pool: &'a NodePool<T>,
    cursor: Cursor<'a>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(pool: &'a NodePool<T>, ring: &'a RingId, head: Option<NodeKey>, len: usize) -> Self {
        Self {
            pool,
            cursor: Cursor {
                ring,
                current: head,
                remaining: len,
            },
        }
    }
}

impl<T> Iterator for Iter<'_, T> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        self.cursor.advance(self.pool, Direction::Next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.cursor.remaining))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Backward traversal from the tail. Yields node keys.
#[derive(Clone, Debug)]
pub struct RevIter<'a, T> {
    pool: &'a NodePool<T>,
    cursor: Cursor<'a>,
}

impl<'a, T> RevIter<'a, T> {
    pub(crate) fn new(pool: &'a NodePool<T>, ring: &'a RingId, tail: Option<NodeKey>, len: usize) -> Self {
        Self {
            pool,
            cursor: Cursor {
                ring,
                current: tail,
                remaining: len,
            },
        }
    }
}

impl<T> Iterator for RevIter<'_, T> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        self.cursor.advance(self.pool, Direction::Prev)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.cursor.remaining))
    }
}

impl<T> FusedIterator for RevIter<'_, T> {}

/// Forward traversal yielding member values.
#[derive(Clone, Debug)]
pub struct Values<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Values<'a, T> {
    pub(crate) fn new(inner: Iter<'a, T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let key = self.inner.next()?;
        self.inner.pool.value(key).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> FusedIterator for Values<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ring;

    fn assert_fused<I: FusedIterator>(_: &I) {}

    #[test]
    fn values_stay_exhausted() {
        let mut pool = NodePool::new();
        let ring = Ring::from_values(&mut pool, "r", [1, 2]).unwrap();
        let mut values = ring.values(&pool);
        assert_fused(&values);
        assert_eq!(values.next(), Some(&1));
        assert_eq!(values.next(), Some(&2));
        assert_eq!(values.next(), None);
        assert_eq!(values.next(), None);
    }
}
