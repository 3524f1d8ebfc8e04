//! The skiplist engine: an ordered map with unique keys and insert-if-absent
//! semantics.

use std::{borrow::Borrow, fmt, iter};

use crate::{
    level_generator::{CoinFlip, LevelGenerator, LevelGeneratorError},
    node::{Arena, Node, NodeId, Walk},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// The skiplist stores key-value pairs such that the keys are always sorted
/// whilst at the same time providing an efficient way to search, insert and
/// remove entries.
///
/// Keys are unique. Inserting a key which is already present is rejected and
/// leaves the stored value untouched; there is no update-in-place.
///
/// Mutable references to keys are not available at all as this could result
/// in a node being left out of the proper ordering.
///
/// The skiplist itself is not synchronised. Use [`Store`][crate::Store] to
/// share one between threads.
pub struct SkipList<K, V, G = CoinFlip> {
    // Every node, including the head sentinel at `NodeId::HEAD`.
    arena: Arena<K, V>,
    // Highest level currently holding at least one real node.
    height: usize,
    len: usize,
    level_generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipList<K, V>
where
    K: Ord,
{
    /// Create a new skiplist whose nodes reach at most `max_level`.
    ///
    /// The head sentinel is linked into every level `0..=max_level`, and
    /// `max_level` is fixed for the lifetime of the skiplist.
    ///
    /// # Errors
    ///
    /// Fails if `max_level` exceeds
    /// [`MAX_LEVEL_LIMIT`][crate::level_generator::MAX_LEVEL_LIMIT].
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let skiplist: SkipList<i64, String> = SkipList::new(6)?;
    /// assert_eq!(skiplist.max_level(), 6);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    #[inline]
    pub fn new(max_level: usize) -> Result<Self, LevelGeneratorError> {
        Ok(Self::with_level_generator(CoinFlip::new(max_level)?))
    }
}

impl<K, V, G> SkipList<K, V, G>
where
    K: Ord,
    G: LevelGenerator,
{
    /// Create a new skiplist drawing node levels from `level_generator`.
    ///
    /// The maximum level of the skiplist is that of the generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    /// use skipkv::level_generator::Geometric;
    ///
    /// let generator = Geometric::new(12, 0.25)?;
    /// let mut skiplist = SkipList::with_level_generator(generator);
    /// assert!(skiplist.insert(1, "one"));
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        SkipList {
            arena: Arena::new(level_generator.max_level()),
            height: 0,
            len: 0,
            level_generator,
        }
    }

    /// Insert the key-value pair if the key is not already present.
    ///
    /// Returns `true` if the pair was inserted, and `false` if the key was
    /// already present, in which case the skiplist is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    ///
    /// assert!(skiplist.insert(19, "f"));
    /// assert!(!skiplist.insert(19, "g"));
    /// assert_eq!(skiplist.search(&19), Some(&"f"));
    /// assert_eq!(skiplist.len(), 1);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let update = self.find_predecessors(&key);
        if self.candidate(update[0], &key).is_some() {
            log::debug!("Rejected duplicate key, len = {}", self.len);
            return false;
        }

        let level = self.level_generator.level().min(self.max_level());
        if level > self.height {
            // The frontier above the old height already points at the head,
            // which makes the new node the first entry at those levels.
            self.height = level;
        }

        // The node is allocated before any link is rewritten, so the splice
        // below cannot fail part way through.
        let id = self.arena.alloc(Node::new(key, value, level));
        for (i, &prev) in update.iter().enumerate().take(level + 1) {
            // Read the predecessor's successor before overwriting it.
            let next = self.arena.next(prev, i);
            self.arena[id].forward[i] = next;
            self.arena[prev].forward[i] = Some(id);
        }
        self.len += 1;
        debug_assert_eq!(self.arena.len(), self.len);
        log::trace!("Spliced node {id} at level {level}, height = {}", self.height);
        true
    }

    /// Removes the entry with the given key, returning its value.
    ///
    /// Returns `None` and leaves the skiplist unchanged if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.insert(3, "b");
    ///
    /// assert_eq!(skiplist.remove(&3), Some("b"));
    /// assert_eq!(skiplist.remove(&3), None);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let update = self.find_predecessors(key);
        let target = self.candidate(update[0], key)?;

        for (i, &prev) in update.iter().enumerate().take(self.height + 1) {
            // Nodes are linked into a contiguous run of levels starting at 0,
            // so once a level misses the target every higher level does too.
            if self.arena.next(prev, i) != Some(target) {
                break;
            }
            let next = self.arena.next(target, i);
            self.arena[prev].forward[i] = next;
        }

        while self.height > 0 && self.arena.next(NodeId::HEAD, self.height).is_none() {
            self.height -= 1;
        }

        self.len -= 1;
        let node = self.arena.free(target);
        debug_assert_eq!(self.arena.len(), self.len);
        log::trace!("Unlinked node {target}, height = {}", self.height);
        node.into_entry().map(|(_, value)| value)
    }

    /// Removes the entry with the given key.
    ///
    /// Returns `true` if an entry was removed and `false` if the key was
    /// absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.insert(7, "c");
    ///
    /// assert!(skiplist.delete(&7));
    /// assert!(!skiplist.delete(&7));
    /// assert!(skiplist.is_empty());
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    #[inline]
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.insert(9, String::from("e"));
    ///
    /// assert_eq!(skiplist.search(&9).map(String::as_str), Some("e"));
    /// assert_eq!(skiplist.search(&18), None);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = NodeId::HEAD;
        for level in (0..=self.height).rev() {
            current = self.advance_while_less(current, level, key);
        }
        let found = self.candidate(current, key);
        log::trace!("Search {}", if found.is_some() { "hit" } else { "miss" });
        found.and_then(|id| self.arena[id].value())
    }

    /// Returns `true` if the skiplist holds an entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(4)?;
    /// skiplist.insert(String::from("hello"), 1);
    ///
    /// assert!(skiplist.contains_key("hello"));
    /// assert!(!skiplist.contains_key("world"));
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }
}

impl<K, V, G> SkipList<K, V, G>
where
    G: LevelGenerator,
{
    /// Clears the skiplist, removing all entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.extend((0..10).map(|i| (i, i)));
    /// skiplist.clear();
    /// assert!(skiplist.is_empty());
    /// assert_eq!(skiplist.height(), 0);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.height = 0;
        self.arena.clear(self.level_generator.max_level());
    }

    /// The highest level any node may reach, fixed at construction.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.level_generator.max_level()
    }
}

impl<K, V, G> SkipList<K, V, G> {
    /// Returns the number of entries in the skiplist.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.extend((0..10).map(|i| (i, i * 10)));
    /// assert_eq!(skiplist.len(), 10);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Alias of [`len`][SkipList::len].
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skiplist contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The highest level currently populated by a real node.
    ///
    /// This is 0 for an empty skiplist, and never exceeds
    /// [`max_level`][SkipList::max_level].
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Creates an iterator over the entries of the skiplist, in ascending key
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.extend([(3, 'c'), (1, 'a'), (2, 'b')]);
    ///
    /// let entries: Vec<_> = skiplist.iter().collect();
    /// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b'), (&3, &'c')]);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            walk: self.arena.walk(0),
            remaining: self.len,
        }
    }

    /// Creates an iterator over the keys of the skiplist, in ascending order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Creates an iterator over the values of the skiplist, in ascending key
    /// order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Returns the keys linked into `level`, in ascending order.
    ///
    /// Level 0 holds every key; each level above holds a subset of the level
    /// below. Levels above [`height`][SkipList::height] are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let mut skiplist = SkipList::new(6)?;
    /// skiplist.extend((0..100).map(|i| (i, ())));
    ///
    /// let bottom: Vec<_> = skiplist.level_keys(0).copied().collect();
    /// assert_eq!(bottom, (0..100).collect::<Vec<_>>());
    /// assert_eq!(skiplist.level_keys(7).count(), 0);
    /// # Ok::<(), skipkv::level_generator::LevelGeneratorError>(())
    /// ```
    pub fn level_keys(&self, level: usize) -> impl Iterator<Item = &K> {
        let walk = (level <= self.arena[NodeId::HEAD].level()).then(|| self.arena.walk(level));
        walk.into_iter().flatten().filter_map(|(_, node)| node.key())
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<K, V, G> SkipList<K, V, G>
where
    K: Ord,
{
    /// Walk right along `level` from `from`, stopping on the last node whose
    /// key is strictly less than `key`.
    fn advance_while_less<Q>(&self, from: NodeId, level: usize, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = from;
        while let Some(next) = self.arena.next(current, level) {
            match self.arena[next].key() {
                Some(next_key) if next_key.borrow() < key => current = next,
                _ => break,
            }
        }
        current
    }

    /// Runs the top-down traversal for `key`, recording at every level the
    /// last node visited before descending.
    ///
    /// The frontier spans `0..=max_level`; levels above the current height
    /// are left pointing at the head.
    fn find_predecessors<Q>(&self, key: &Q) -> Vec<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut update = vec![NodeId::HEAD; self.arena[NodeId::HEAD].level() + 1];
        let mut current = NodeId::HEAD;
        for level in (0..=self.height).rev() {
            current = self.advance_while_less(current, level, key);
            update[level] = current;
        }
        update
    }

    /// The node right after `prev` on level 0, if it holds `key`.
    fn candidate<Q>(&self, prev: NodeId, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.arena
            .next(prev, 0)
            .filter(|&id| self.arena[id].key().is_some_and(|k| k.borrow() == key))
    }

    /// Checks the integrity of the skiplist.
    #[cfg(test)]
    pub(crate) fn check(&self) {
        let head = &self.arena[NodeId::HEAD];
        assert!(head.key().is_none());
        assert!(self.height <= head.level());
        assert_eq!(self.arena.len(), self.len);

        // Level 0 is strictly ascending and holds every entry.
        let bottom: Vec<_> = self.arena.walk(0).collect();
        assert_eq!(bottom.len(), self.len);
        for pair in bottom.windows(2) {
            assert!(pair[0].1.key() < pair[1].1.key());
        }

        // Each level is a subsequence of the one below.
        for level in 1..=head.level() {
            let mut below = self.arena.walk(level - 1).map(|(id, _)| id);
            for (id, node) in self.arena.walk(level) {
                assert!(node.level() >= level);
                assert!(below.any(|other| other == id));
            }
        }

        // The height is the top non-empty level.
        let expected = (0..=head.level())
            .rev()
            .find(|&level| head.forward[level].is_some())
            .unwrap_or(0);
        assert_eq!(self.height, expected);
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K: Ord, V> Default for SkipList<K, V> {
    #[inline]
    fn default() -> Self {
        Self::with_level_generator(CoinFlip::default())
    }
}

impl<K, V, G> Extend<(K, V)> for SkipList<K, V, G>
where
    K: Ord,
    G: LevelGenerator,
{
    /// Inserts every pair, skipping keys that are already present.
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> iter::FromIterator<(K, V)> for SkipList<K, V> {
    #[inline]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut skiplist = Self::default();
        skiplist.extend(iter);
        skiplist
    }
}

impl<K, V, G> fmt::Debug for SkipList<K, V, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Lists every populated level from the top down, one `[key:value]` per
/// entry.
impl<K, V, G> fmt::Display for SkipList<K, V, G>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "********Skiplist********")?;
        for level in (0..=self.height).rev() {
            write!(f, "Level {level}:")?;
            for (_, node) in self.arena.walk(level) {
                if let Some((key, value)) = node.entry() {
                    write!(f, " [{key}:{value}]")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a, K, V, G> IntoIterator for &'a SkipList<K, V, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Iterators
// ////////////////////////////////////////////////////////////////////////////

/// Iterator over the entries of a [`SkipList`], in ascending key order.
pub struct Iter<'a, K, V> {
    walk: Walk<'a, K, V>,
    remaining: usize,
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (_, node) = self.walk.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        node.entry()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for Iter<'a, K, V> {}

/// Iterator over the keys of a [`SkipList`], in ascending order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K: 'a, V: 'a> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// Iterator over the values of a [`SkipList`], in ascending key order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K: 'a, V: 'a> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rand::prelude::*;
    use rstest::rstest;

    use super::SkipList;
    use crate::level_generator::{CoinFlip, Geometric};

    fn seeded(max_level: usize) -> Result<SkipList<i32, &'static str>> {
        Ok(SkipList::with_level_generator(CoinFlip::seeded(
            max_level, 0x1234_abcd,
        )?))
    }

    #[test_log::test]
    fn basic_small() -> Result<()> {
        let mut sl = seeded(6)?;
        sl.check();
        assert!(!sl.delete(&1));
        sl.check();
        assert!(sl.insert(1, "a"));
        sl.check();
        assert!(!sl.insert(1, "z"));
        assert_eq!(sl.search(&1), Some(&"a"));
        sl.check();
        assert_eq!(sl.remove(&1), Some("a"));
        sl.check();
        assert!(sl.insert(1, "b"));
        assert!(sl.insert(2, "c"));
        sl.check();
        assert!(sl.delete(&1));
        assert!(sl.delete(&2));
        sl.check();
        assert!(sl.is_empty());
        assert_eq!(sl.height(), 0);
        Ok(())
    }

    #[rstest]
    fn basic_large(#[values(0, 1, 6, 16)] max_level: usize) -> Result<()> {
        let size = 5_000;
        let mut sl = SkipList::with_level_generator(CoinFlip::seeded(max_level, 7)?);
        assert!(sl.is_empty());

        for i in 0..size {
            assert!(sl.insert(i, i * 10));
            assert_eq!(sl.len(), i + 1);
        }
        sl.check();
        assert!(sl.height() <= max_level);

        for i in 0..size {
            assert_eq!(sl.remove(&i), Some(i * 10));
            assert_eq!(sl.len(), size - i - 1);
        }
        sl.check();
        assert_eq!(sl.height(), 0);
        Ok(())
    }

    #[test]
    fn random_operations_keep_invariants() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0x00c0_ffee);
        let mut sl = SkipList::with_level_generator(Geometric::seeded(10, 0.5, 11)?);
        let mut model = std::collections::BTreeMap::new();

        for round in 0..4_000 {
            let key: u16 = rng.random_range(0..512);
            if rng.random_bool(0.6) {
                let inserted = sl.insert(key, round);
                assert_eq!(inserted, !model.contains_key(&key));
                model.entry(key).or_insert(round);
            } else {
                assert_eq!(sl.remove(&key), model.remove(&key));
            }
            if round % 500 == 0 {
                sl.check();
            }
        }
        sl.check();

        let entries: Vec<_> = sl.iter().map(|(&k, &v)| (k, v)).collect();
        let expected: Vec<_> = model.into_iter().collect();
        assert_eq!(entries, expected);
        Ok(())
    }

    #[test]
    fn duplicate_insert_is_rejected() -> Result<()> {
        let mut sl = seeded(6)?;
        for i in 0..100 {
            assert!(sl.insert(i, "first"));
        }
        for i in (0..100).rev() {
            assert!(!sl.insert(i, "second"));
        }
        assert_eq!(sl.len(), 100);
        assert!(sl.values().all(|&v| v == "first"));
        sl.check();
        Ok(())
    }

    #[test_log::test]
    fn delete_missing_leaves_structure() -> Result<()> {
        let mut sl = seeded(6)?;
        sl.extend([(1, "a"), (3, "b"), (7, "c")]);
        let before = sl.to_string();

        assert!(!sl.delete(&2));
        assert!(!sl.delete(&100));
        assert_eq!(sl.len(), 3);
        assert_eq!(sl.to_string(), before);
        sl.check();
        Ok(())
    }

    #[test]
    fn height_shrinks_when_top_empties() -> Result<()> {
        let mut sl = seeded(8)?;
        sl.extend((0..64).map(|i| (i, "x")));
        sl.check();

        while !sl.is_empty() {
            let height = sl.height();
            let top: Vec<_> = sl.level_keys(height).copied().collect();
            assert!(!top.is_empty());
            for key in top {
                assert!(sl.delete(&key));
            }
            sl.check();
            if !sl.is_empty() {
                assert!(sl.height() < height || height == 0);
                assert!(sl.level_keys(sl.height()).next().is_some());
            }
        }
        assert_eq!(sl.height(), 0);
        Ok(())
    }

    #[test]
    fn levels_are_nested() -> Result<()> {
        let mut sl = seeded(6)?;
        sl.extend((0..500).map(|i| (i * 3 % 500, "v")));
        for level in 1..=sl.max_level() {
            let upper: Vec<_> = sl.level_keys(level).collect();
            let mut lower = sl.level_keys(level - 1);
            assert!(upper.iter().all(|k| lower.any(|other| other == *k)));
        }
        Ok(())
    }

    #[test]
    fn borrowed_lookup() -> Result<()> {
        let mut sl: SkipList<String, usize> = SkipList::new(4)?;
        assert!(sl.insert("b".to_owned(), 2));
        assert!(sl.insert("a".to_owned(), 1));
        assert_eq!(sl.search("a"), Some(&1));
        assert!(sl.contains_key("b"));
        assert_eq!(sl.remove("b"), Some(2));
        assert!(!sl.contains_key("b"));
        Ok(())
    }

    #[test]
    fn iterators() -> Result<()> {
        let size = 1_000;
        let sl: SkipList<_, _> = (0..size).rev().map(|x| (x, x * 2)).collect();
        assert_eq!(sl.max_level(), 16);

        let mut iter = sl.iter();
        for i in 0..size {
            assert_eq!(iter.size_hint(), (size - i, Some(size - i)));
            assert_eq!(iter.next(), Some((&i, &(i * 2))));
        }
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert!(iter.next().is_none());

        assert!(sl.keys().copied().eq(0..size));
        assert!(sl.values().copied().eq((0..size).map(|x| x * 2)));
        assert_eq!((&sl).into_iter().count(), size);
        Ok(())
    }

    #[test]
    fn clear_resets() -> Result<()> {
        let mut sl = seeded(6)?;
        sl.extend((0..100).map(|i| (i, "v")));
        sl.clear();
        sl.check();
        assert!(sl.is_empty());
        assert_eq!(sl.height(), 0);
        assert!(sl.insert(5, "again"));
        sl.check();
        Ok(())
    }

    #[test]
    fn zero_max_level_is_a_linked_list() -> Result<()> {
        let mut sl = seeded(0)?;
        sl.extend([(2, "b"), (1, "a"), (3, "c")]);
        sl.check();
        assert_eq!(sl.height(), 0);
        assert_eq!(
            sl.to_string(),
            "********Skiplist********\nLevel 0: [1:a] [2:b] [3:c]\n"
        );
        Ok(())
    }

    #[test]
    fn display_lists_every_level() -> Result<()> {
        let mut sl = seeded(6)?;
        sl.extend([(1, "a"), (3, "b"), (7, "c")]);
        let text = sl.to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "********Skiplist********");
        assert_eq!(lines.len(), sl.height() + 2);
        assert_eq!(lines[lines.len() - 1], "Level 0: [1:a] [3:b] [7:c]");
        for (offset, line) in lines[1..].iter().enumerate() {
            let level = sl.height() - offset;
            assert!(line.starts_with(&format!("Level {level}:")));
        }
        Ok(())
    }

    #[test]
    fn debug_is_a_map() -> Result<()> {
        let mut sl = seeded(3)?;
        sl.extend([(2, "b"), (1, "a")]);
        assert_eq!(format!("{sl:?}"), r#"{1: "a", 2: "b"}"#);
        Ok(())
    }
}
