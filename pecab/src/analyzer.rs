//! Analyzer memoizing tokenization results.
use std::collections::BTreeMap;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::common::DEFAULT_CACHE_CAPACITY;
use crate::token::Token;
use crate::tokenizer::Tokenizer;
use crate::tokenizer::worker::Worker;

/// Bounded cache evicting the least recently used input.
struct LruCache {
    capacity: usize,
    entries: HashMap<String, (Arc<[Token]>, u64)>,
    // Access stamp to key, oldest first.
    recency: BTreeMap<u64, String>,
    clock: u64,
}

impl LruCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            clock: 0,
        }
    }

    fn get(&mut self, key: &str) -> Option<Arc<[Token]>> {
        let (tokens, stamp) = self.entries.get_mut(key)?;
        self.clock += 1;
        if let Some(k) = self.recency.remove(stamp) {
            self.recency.insert(self.clock, k);
        }
        *stamp = self.clock;
        Some(tokens.clone())
    }

    fn insert(&mut self, key: String, tokens: Arc<[Token]>) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.clock += 1;
        self.recency.insert(self.clock, key.clone());
        self.entries.insert(key, (tokens, self.clock));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Korean morphological analyzer.
///
/// It tokenizes inputs with a [`Worker`] and memoizes the results of recent
/// inputs, so identical inputs always share one result.
///
/// # Examples
///
/// ```
/// use pecab::{Analyzer, SystemDictionaryBuilder, Tokenizer};
///
/// let dict = SystemDictionaryBuilder::from_readers(
///     "문장,1,1,1000,NNG\n이,2,2,500,JKS".as_bytes(),
///     "3 3\n1 2 -1000".as_bytes(),
///     "DEFAULT 0 1 0\nSPACE 0 1 0\n0x0020 SPACE".as_bytes(),
///     "DEFAULT,0,0,3000,SY\nSPACE,0,0,0,SP".as_bytes(),
/// )?;
/// let mut analyzer = Analyzer::new(Tokenizer::new(dict));
///
/// assert_eq!(analyzer.morphs("문장이", false), vec!["문장", "이"]);
/// assert_eq!(analyzer.nouns("문장이", false), vec!["문장"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Analyzer {
    worker: Worker,
    cache: LruCache,
}

impl Analyzer {
    /// Creates a new analyzer caching up to 5000 inputs.
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self::with_cache_capacity(tokenizer, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a new analyzer caching up to `capacity` inputs.
    ///
    /// The capacity 0 disables caching.
    pub fn with_cache_capacity(tokenizer: Tokenizer, capacity: usize) -> Self {
        Self {
            worker: tokenizer.new_worker(),
            cache: LruCache::new(capacity),
        }
    }

    /// Tokenizes `text`.
    pub fn tokenize(&mut self, text: &str) -> Arc<[Token]> {
        if let Some(tokens) = self.cache.get(text) {
            return tokens;
        }
        self.worker.reset_sentence(text);
        self.worker.tokenize();
        let tokens: Arc<[Token]> = Arc::from(self.worker.tokens());
        self.cache.insert(text.to_string(), tokens.clone());
        tokens
    }

    /// Gets the surfaces of the tokens of `text`.
    pub fn morphs(&mut self, text: &str, drop_space: bool) -> Vec<String> {
        self.filter(text, drop_space, |_| true)
            .map(|t| t.surface().to_string())
            .collect()
    }

    /// Gets the pairs of surfaces and POS tags of the tokens of `text`.
    pub fn pos(&mut self, text: &str, drop_space: bool) -> Vec<(String, String)> {
        self.filter(text, drop_space, |_| true)
            .map(|t| (t.surface().to_string(), t.pos_tag().to_string()))
            .collect()
    }

    /// Gets the surfaces of the nouns of `text`, whose POS tags start with `N`.
    pub fn nouns(&mut self, text: &str, drop_space: bool) -> Vec<String> {
        self.filter(text, drop_space, |t| t.pos_tag().starts_with('N'))
            .map(|t| t.surface().to_string())
            .collect()
    }

    /// Gets the number of cached inputs.
    pub fn num_cached(&self) -> usize {
        self.cache.len()
    }

    fn filter<F>(
        &mut self,
        text: &str,
        drop_space: bool,
        pred: F,
    ) -> impl Iterator<Item = Token> + use<F>
    where
        F: Fn(&Token) -> bool,
    {
        let tokens = self.tokenize(text);
        (0..tokens.len())
            .map(move |i| tokens[i].clone())
            .filter(move |t| !(drop_space && t.is_space()) && pred(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::SystemDictionaryBuilder;

    fn tokenizer() -> Tokenizer {
        let dict = SystemDictionaryBuilder::from_readers(
            "문장,1,1,1000,NNG\n이,2,2,500,JKS".as_bytes(),
            "3 3\n1 2 -1000".as_bytes(),
            "DEFAULT 0 1 0\nSPACE 0 1 0\n0x0020 SPACE".as_bytes(),
            "DEFAULT,0,0,3000,SY\nSPACE,0,0,0,SP".as_bytes(),
        )
        .unwrap();
        Tokenizer::new(dict)
    }

    #[test]
    fn test_views() {
        let mut analyzer = Analyzer::new(tokenizer());
        assert_eq!(analyzer.morphs("문장이 문장", false), vec!["문장", "이", " ", "문장"]);
        assert_eq!(analyzer.morphs("문장이 문장", true), vec!["문장", "이", "문장"]);
        assert_eq!(
            analyzer.pos("문장이", true),
            vec![
                ("문장".to_string(), "NNG".to_string()),
                ("이".to_string(), "JKS".to_string())
            ]
        );
        assert_eq!(analyzer.nouns("문장이 문장", false), vec!["문장", "문장"]);
    }

    #[test]
    fn test_cache_hit() {
        let mut analyzer = Analyzer::new(tokenizer());
        let first = analyzer.tokenize("문장이");
        let second = analyzer.tokenize("문장이");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(analyzer.num_cached(), 1);
    }

    #[test]
    fn test_cache_eviction() {
        let mut analyzer = Analyzer::with_cache_capacity(tokenizer(), 2);
        let a = analyzer.tokenize("문장");
        analyzer.tokenize("이");
        // Touches "문장" so that "이" is the oldest.
        analyzer.tokenize("문장");
        analyzer.tokenize("문장이");
        assert_eq!(analyzer.num_cached(), 2);
        assert!(Arc::ptr_eq(&a, &analyzer.tokenize("문장")));
    }

    #[test]
    fn test_cache_disabled() {
        let mut analyzer = Analyzer::with_cache_capacity(tokenizer(), 0);
        let first = analyzer.tokenize("문장이");
        let second = analyzer.tokenize("문장이");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(analyzer.num_cached(), 0);
    }
}
