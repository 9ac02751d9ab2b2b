//! Double-array trie mapping surfaces to value ids.
//!
//! The layout follows Darts: a transition from state `s` on character `c`
//! lands on `p = base[s] + c + 1` and is valid iff `check[p] == base[s]`.
//! A key ends at `s` iff the slot `b = base[s]` is owned by itself
//! (`check[b] == b`) and stores a negative base, `-(value + 1)`.
use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::TrieBuildError;

const INITIAL_ALLOC_SIZE: usize = 8192;
const DENSITY_THRESHOLD: f64 = 0.95;
const MIN_GROW_FACTOR: f64 = 1.05;

/// Double-array trie.
#[derive(Archive, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DoubleArrayTrie {
    base: Vec<i32>,
    check: Vec<u32>,
}

impl Default for DoubleArrayTrie {
    fn default() -> Self {
        Self {
            base: vec![1],
            check: vec![0],
        }
    }
}

impl DoubleArrayTrie {
    /// Builds a trie from keys sorted in ascending code-point order.
    ///
    /// When `values` is `None`, each key is mapped to its own index.
    /// Identical keys must be adjacent and resolve to the value of the first one.
    ///
    /// # Errors
    ///
    /// [`TrieBuildError`] is returned when the keys are not sorted or
    /// a value cannot be encoded.
    ///
    /// # Panics
    ///
    /// It will panic when `values` is shorter than `keys`.
    pub fn build<K>(keys: &[K], values: Option<&[u32]>) -> Result<Self, TrieBuildError>
    where
        K: AsRef<str>,
    {
        if let Some(values) = values {
            assert!(values.len() >= keys.len(), "values must cover every key");
        }
        if keys.is_empty() {
            return Ok(Self::default());
        }
        let keys: Vec<Vec<u32>> = keys
            .iter()
            .map(|k| k.as_ref().chars().map(u32::from).collect())
            .collect();

        let mut builder = Builder::new(&keys, values);
        let root = Sibling {
            code: 0,
            depth: 0,
            left: 0,
            right: keys.len(),
        };
        let siblings = builder.fetch(&root)?;
        let begin = builder.insert(&siblings)?;
        builder.base[0] = i32::try_from(begin).map_err(|_| TrieBuildError::NegativeValueIndex {
            value: u32::MAX,
        })?;

        let size = builder.size.max(1);
        let mut base = builder.base;
        let mut check = builder.check;
        base.truncate(size);
        check.truncate(size);
        log::debug!(
            "built a double-array trie of {} keys with {} states",
            keys.len(),
            size
        );
        Ok(Self { base, check })
    }

    /// Gets the number of states in the arrays.
    #[inline(always)]
    pub fn num_states(&self) -> usize {
        self.base.len()
    }

    /// Looks up the value id of exactly `key`.
    pub fn exact_match(&self, key: &str) -> Option<u32> {
        let mut b = *self.base.first()?;
        for c in key.chars() {
            b = self.transition(b, c)?;
        }
        self.terminal_value(b)
    }

    /// Creates an iterator of `(value_id, end_char)` for keys that are prefixes of `chars`,
    /// shortest first.
    pub fn common_prefix_iter<I>(&self, chars: I) -> CommonPrefixIter<'_, I::IntoIter>
    where
        I: IntoIterator<Item = char>,
    {
        CommonPrefixIter {
            trie: self,
            chars: chars.into_iter(),
            b: self.base.first().copied(),
            len: 0,
        }
    }

    /// Collects at most `limit` prefix matches of `key`, shortest first.
    pub fn common_prefix_search(&self, key: &str, limit: usize) -> Vec<(u32, usize)> {
        self.common_prefix_iter(key.chars()).take(limit).collect()
    }

    #[inline(always)]
    fn transition(&self, b: i32, c: char) -> Option<i32> {
        let b = u32::try_from(b).ok()?;
        let p = usize::try_from(b).ok()? + usize::try_from(u32::from(c)).ok()? + 1;
        if *self.check.get(p)? != b {
            return None;
        }
        self.base.get(p).copied()
    }

    #[inline(always)]
    fn terminal_value(&self, b: i32) -> Option<u32> {
        let p = usize::try_from(b).ok()?;
        let n = *self.base.get(p)?;
        if usize::try_from(*self.check.get(p)?).ok()? == p && n < 0 {
            u32::try_from(-(i64::from(n)) - 1).ok()
        } else {
            None
        }
    }
}

/// Iterator of prefix matches created by [`DoubleArrayTrie::common_prefix_iter`].
pub struct CommonPrefixIter<'a, I> {
    trie: &'a DoubleArrayTrie,
    chars: I,
    b: Option<i32>,
    len: usize,
}

impl<I> Iterator for CommonPrefixIter<'_, I>
where
    I: Iterator<Item = char>,
{
    type Item = (u32, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(b) = self.b {
            let len = self.len;
            self.b = self.chars.next().and_then(|c| self.trie.transition(b, c));
            self.len += 1;
            if let Some(value) = self.trie.terminal_value(b) {
                return Some((value, len));
            }
        }
        None
    }
}

#[derive(Debug)]
struct Sibling {
    code: usize,
    depth: usize,
    left: usize,
    right: usize,
}

struct Builder<'a> {
    keys: &'a [Vec<u32>],
    values: Option<&'a [u32]>,
    base: Vec<i32>,
    check: Vec<u32>,
    used: Vec<bool>,
    size: usize,
    next_check_pos: usize,
    progress: usize,
}

impl<'a> Builder<'a> {
    fn new(keys: &'a [Vec<u32>], values: Option<&'a [u32]>) -> Self {
        Self {
            keys,
            values,
            base: vec![0; INITIAL_ALLOC_SIZE],
            check: vec![0; INITIAL_ALLOC_SIZE],
            used: vec![false; INITIAL_ALLOC_SIZE],
            size: 0,
            next_check_pos: 0,
            progress: 0,
        }
    }

    fn resize(&mut self, new_len: usize) {
        self.base.resize(new_len, 0);
        self.check.resize(new_len, 0);
        self.used.resize(new_len, false);
    }

    fn grow_to_fit(&mut self, index: usize) {
        if index < self.base.len() {
            return;
        }
        let factor = MIN_GROW_FACTOR.max(self.keys.len() as f64 / (self.progress + 1) as f64);
        let grown = (self.base.len() as f64 * factor) as usize;
        self.resize(grown.max(index + 1));
    }

    /// Groups the keys of `parent` by their character at `parent.depth`.
    fn fetch(&self, parent: &Sibling) -> Result<Vec<Sibling>, TrieBuildError> {
        let mut siblings: Vec<Sibling> = vec![];
        let mut prev = 0;
        for i in parent.left..parent.right {
            let key = &self.keys[i];
            if key.len() < parent.depth {
                continue;
            }
            let cur = key
                .get(parent.depth)
                .map_or(0, |&c| c as usize + 1);
            if prev > cur {
                return Err(TrieBuildError::UnsortedInput { index: i });
            }
            if cur != prev || siblings.is_empty() {
                if let Some(last) = siblings.last_mut() {
                    last.right = i;
                }
                siblings.push(Sibling {
                    code: cur,
                    depth: parent.depth + 1,
                    left: i,
                    right: 0,
                });
            }
            prev = cur;
        }
        if let Some(last) = siblings.last_mut() {
            last.right = parent.right;
        }
        Ok(siblings)
    }

    /// Places `siblings` at the first free base and recurses into their children.
    fn insert(&mut self, siblings: &[Sibling]) -> Result<usize, TrieBuildError> {
        let first_code = siblings[0].code;
        let last_code = siblings[siblings.len() - 1].code;

        let mut pos = (first_code + 1).max(self.next_check_pos) - 1;
        let mut nonzero_num = 0;
        let mut first_free = true;
        let begin = 'search: loop {
            pos += 1;
            self.grow_to_fit(pos);
            if self.check[pos] != 0 {
                nonzero_num += 1;
                continue;
            } else if first_free {
                self.next_check_pos = pos;
                first_free = false;
            }

            let begin = pos - first_code;
            self.grow_to_fit(begin + last_code);
            if self.used[begin] {
                continue;
            }
            for s in &siblings[1..] {
                if self.check[begin + s.code] != 0 {
                    continue 'search;
                }
            }
            break begin;
        };

        // Skips the dense region in later searches.
        if nonzero_num as f64 / (pos - self.next_check_pos + 1) as f64 >= DENSITY_THRESHOLD {
            self.next_check_pos = pos;
        }

        self.used[begin] = true;
        self.size = self.size.max(begin + last_code + 1);
        let begin_u32 = u32::try_from(begin)
            .map_err(|_| TrieBuildError::NegativeValueIndex { value: u32::MAX })?;
        for s in siblings {
            self.check[begin + s.code] = begin_u32;
        }

        for s in siblings {
            let children = self.fetch(s)?;
            if children.is_empty() {
                let value = self.values.map_or_else(
                    || u32::try_from(s.left).unwrap_or(u32::MAX),
                    |values| values[s.left],
                );
                let encoded = i32::try_from(value)
                    .ok()
                    .and_then(|v| v.checked_neg())
                    .and_then(|v| v.checked_sub(1))
                    .ok_or(TrieBuildError::NegativeValueIndex { value })?;
                self.base[begin + s.code] = encoded;
                self.progress += 1;
            } else {
                let h = self.insert(&children)?;
                self.base[begin + s.code] = i32::try_from(h)
                    .map_err(|_| TrieBuildError::NegativeValueIndex { value: u32::MAX })?;
            }
        }
        Ok(begin)
    }
}
