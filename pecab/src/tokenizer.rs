//! Lattice-based tokenizer.
pub(crate) mod lattice;
mod postprocessor;
pub mod worker;

use std::sync::Arc;

use crate::Dictionary;
use crate::common::{MAX_UNKNOWN_WORD_LENGTH, MIN_RELAXATION_LENGTH, SPACE_PENALTY, SPACE_PENALTY_TAGS};
use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::{GeneralCategory, UserDictionary, general_category, is_punctuation};
use crate::errors::{PecabError, Result};
use crate::sentence::Sentence;
use crate::token::{LexType, Morpheme, PosType, Token, TokenKind};
use crate::tokenizer::lattice::{Lattice, Node, WordRef};
use crate::tokenizer::worker::Worker;

/// Tokenizer.
///
/// It is cheap to clone; the dictionaries are shared.
#[derive(Clone)]
pub struct Tokenizer {
    dict: Arc<Dictionary>,
    user_dict: Option<Arc<UserDictionary>>,
    split_compound: bool,
    max_grouping_len: usize,
    unknown_unigrams: bool,
    relax_long_unknown: usize,
}

impl Tokenizer {
    /// Creates a new tokenizer.
    ///
    /// The dictionary is moved into the tokenizer. If you need to share the dictionary
    /// among multiple tokenizers, use [`Tokenizer::from_shared_dictionary`].
    pub fn new(dict: Dictionary) -> Self {
        Self::from_shared_dictionary(Arc::new(dict))
    }

    /// Creates a new tokenizer from a shared dictionary.
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            user_dict: None,
            split_compound: false,
            max_grouping_len: MAX_UNKNOWN_WORD_LENGTH,
            unknown_unigrams: true,
            relax_long_unknown: MIN_RELAXATION_LENGTH,
        }
    }

    /// Sets a user dictionary built from `entries` with the default parameters.
    ///
    /// # Errors
    ///
    /// [`PecabError`] is returned when an entry contains whitespace, or when the
    /// default connection ids are out of range of the system dictionary.
    pub fn user_dictionary<I, S>(self, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_user_dictionary(UserDictionary::new(entries)?)
    }

    /// Sets a user dictionary.
    ///
    /// # Errors
    ///
    /// [`PecabError`] is returned when the connection ids of the entries are
    /// out of range of the system dictionary.
    pub fn with_user_dictionary(mut self, user_dict: UserDictionary) -> Result<Self> {
        if !user_dict.verify(self.dict.connector()) {
            return Err(PecabError::invalid_argument(
                "user_dict",
                "user_dict includes invalid connection ids.",
            ));
        }
        self.user_dict = Some(Arc::new(user_dict));
        Ok(self)
    }

    /// Splits compounds, inflected forms and pre-analyzed expressions into
    /// their morphemes.
    pub fn split_compound(mut self, yes: bool) -> Self {
        self.split_compound = yes;
        self
    }

    /// Specifies the maximum grouping length for unknown words.
    ///
    /// # Arguments
    ///
    ///  - `max_grouping_len`: The maximum grouping length for unknown words.
    ///    The value 0 restores the default of 1024.
    pub fn max_grouping_len(mut self, max_grouping_len: usize) -> Self {
        self.max_grouping_len = if max_grouping_len == 0 {
            MAX_UNKNOWN_WORD_LENGTH
        } else {
            max_grouping_len
        };
        self
    }

    /// Emits an unknown word as one token per character. Enabled by default.
    pub fn unknown_unigrams(mut self, yes: bool) -> Self {
        self.unknown_unigrams = yes;
        self
    }

    /// Specifies the minimum length of a lone unknown token that is split at
    /// the end of its leading run of one repeated character.
    ///
    /// The value 0 disables the relaxation. The default is 7.
    pub fn relax_long_unknown(mut self, min_len: usize) -> Self {
        self.relax_long_unknown = min_len;
        self
    }

    /// Gets the reference to the dictionary.
    #[inline(always)]
    pub(crate) fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    #[inline(always)]
    pub(crate) fn relaxation_len(&self) -> usize {
        self.relax_long_unknown
    }

    /// Creates a new worker.
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// Advances the lattice until tokens are pending or the sentence ends.
    pub(crate) fn parse(&self, sent: &Sentence, lattice: &mut Lattice) {
        let dict = self.dictionary();
        let connector = dict.connector();
        let char_prop = dict.char_prop();
        let len_char = sent.len_char();
        // End of the furthest user word inserted in this call.
        let mut user_word_end: Option<usize> = None;

        while lattice.pos < len_char {
            let start_node = lattice.pos;
            let num_nodes = lattice.num_nodes(start_node);
            if num_nodes == 0 {
                lattice.pos += 1;
                continue;
            }

            // A single node that no other node passes over can be backtraced.
            let is_frontier = lattice.next_pos() == start_node + 1;
            if start_node > lattice.last_backtrace_pos && num_nodes == 1 && is_frontier {
                log::trace!("finalized the lattice up to {start_node}");
                self.backtrace(sent, lattice, start_node, 0);
                lattice.node_mut(start_node, 0).min_cost = 0;
                if lattice.has_pending() {
                    return;
                }
            }

            let mut start_word = start_node;
            while start_word < len_char && char_prop.is_space(sent.char_info(start_word)) {
                start_word += 1;
            }
            // Does the input end with spaces?
            if start_word == len_char {
                start_word = start_node;
            }
            lattice.pos = start_word;

            let suffix = &sent.chars()[start_word..];
            let num_spaces = start_word - start_node;
            let mut has_matched = false;

            if let Some(user_dict) = self.user_dict.as_deref() {
                if let Some((entry_id, len)) = user_dict.longest_match(suffix) {
                    has_matched = true;
                    let end_word = start_word + len;
                    if user_word_end.is_none_or(|e| end_word > e) {
                        lattice.insert_node(
                            start_node,
                            start_word,
                            end_word,
                            WordRef::User(entry_id),
                            user_dict.entry(entry_id).param(),
                            Self::space_penalty(user_dict.pos_tag(), num_spaces),
                            connector,
                        );
                        user_word_end = Some(end_word);
                    }
                }
            }

            if !has_matched {
                let lexicon = dict.lexicon();
                for m in lexicon.common_prefix_iterator(suffix) {
                    debug_assert!(start_word + m.end_char <= len_char);
                    let pos_tag = lexicon.record(m.word_id).pos_tag();
                    lattice.insert_node(
                        start_node,
                        start_word,
                        start_word + m.end_char,
                        WordRef::Known(m.word_id),
                        m.word_param,
                        Self::space_penalty(pos_tag, num_spaces),
                        connector,
                    );
                    has_matched = true;
                }
            }

            let cate_id = sent.char_info(start_word).cate_id();
            if !has_matched || char_prop.is_invoke(cate_id) {
                let entry = dict.unk_handler().entry(cate_id);
                let end_word = start_word + self.unknown_word_len(sent, start_word);
                lattice.insert_node(
                    start_node,
                    start_word,
                    end_word,
                    WordRef::Unknown(cate_id),
                    entry.param(),
                    Self::space_penalty(entry.pos_tag(), num_spaces),
                    connector,
                );
            }

            lattice.pos = start_word + 1;
        }
        lattice.end = true;

        let end_pos = lattice.pos;
        if end_pos > 0 {
            match lattice.search_eos(end_pos, connector) {
                Some(idx) => self.backtrace(sent, lattice, end_pos, idx),
                None => log::warn!("no node reaches the end of the sentence: {}", sent.raw()),
            }
        }
    }

    fn space_penalty(pos_tag: &str, num_spaces: usize) -> i32 {
        if num_spaces > 0 && SPACE_PENALTY_TAGS.contains(&pos_tag) {
            SPACE_PENALTY
        } else {
            0
        }
    }

    /// Gets the number of characters grouped into an unknown word starting at `start_word`.
    fn unknown_word_len(&self, sent: &Sentence, start_word: usize) -> usize {
        let char_prop = self.dictionary().char_prop();
        if !char_prop.is_groupable(sent.char_info(start_word).cate_id()) {
            return 1;
        }
        let chars = sent.chars();
        let first = chars[start_word];
        let category = general_category(first);
        let is_punct = is_punctuation(first);

        let mut len = 1;
        for (pos, &c) in chars.iter().enumerate().skip(start_word + 1) {
            if len == self.max_grouping_len {
                break;
            }
            let next_category = general_category(c);
            let same_script = next_category == category || next_category == GeneralCategory::Mn;
            if same_script
                && is_punctuation(c) == is_punct
                && char_prop.is_groupable(sent.char_info(pos).cate_id())
            {
                len += 1;
            } else {
                break;
            }
        }
        len
    }

    /// Pushes the tokens of the best path ending at the `idx`-th node of `end_pos`
    /// in reverse order, then forgets the lattice before `end_pos`.
    fn backtrace(&self, sent: &Sentence, lattice: &mut Lattice, end_pos: usize, idx: usize) {
        let mut pos = end_pos;
        let mut best_idx = idx;

        while pos > lattice.last_backtrace_pos {
            let node = lattice.node(pos, best_idx);
            debug_assert!(node.start_node >= lattice.last_backtrace_pos);

            self.push_word_tokens(sent, lattice, &node, pos);

            if node.start_word != node.start_node {
                let range_char = node.start_node..node.start_word;
                lattice.push_pending(Token {
                    surface: sent.surface(range_char.clone()).to_string(),
                    range_byte: sent.byte_range(range_char.clone()),
                    range_char,
                    pos_tag: self.dictionary().unk_handler().space_pos_tag().to_string(),
                    pos_type: PosType::Morpheme,
                    lex_type: LexType::Unknown,
                    morphemes: None,
                    kind: TokenKind::Dictionary,
                    space: true,
                });
            }

            pos = node.start_node;
            best_idx = node.min_idx;
        }

        lattice.last_backtrace_pos = end_pos;
        lattice.free_before(end_pos);
    }

    fn push_word_tokens(&self, sent: &Sentence, lattice: &mut Lattice, node: &Node, end_word: usize) {
        let dict = self.dictionary();
        let range_char = node.start_word..end_word;

        match node.word {
            WordRef::Unknown(cate_id) => {
                let pos_tag = dict.unk_handler().entry(cate_id).pos_tag();
                let char_prop = dict.char_prop();
                let make_token = |range_char: std::ops::Range<usize>| Token {
                    space: range_char
                        .clone()
                        .all(|i| char_prop.is_space(sent.char_info(i))),
                    surface: sent.surface(range_char.clone()).to_string(),
                    range_byte: sent.byte_range(range_char.clone()),
                    range_char,
                    pos_tag: pos_tag.to_string(),
                    pos_type: PosType::Morpheme,
                    lex_type: LexType::Unknown,
                    morphemes: None,
                    kind: TokenKind::Dictionary,
                };
                if self.unknown_unigrams {
                    for i in range_char.rev() {
                        lattice.push_pending(make_token(i..i + 1));
                    }
                } else {
                    lattice.push_pending(make_token(range_char));
                }
            }
            WordRef::Known(word_id) => {
                let record = dict.lexicon().record(word_id);
                let token = Token {
                    surface: sent.surface(range_char.clone()).to_string(),
                    range_byte: sent.byte_range(range_char.clone()),
                    range_char,
                    pos_tag: record.pos_tag().to_string(),
                    pos_type: record.pos_type(),
                    lex_type: LexType::Known,
                    morphemes: record.morphemes().map(<[Morpheme]>::to_vec),
                    kind: TokenKind::Dictionary,
                    space: false,
                };
                match record.morphemes() {
                    Some(morphemes) if self.split_compound && !morphemes.is_empty() => {
                        Self::push_decompounded(sent, lattice, &token, morphemes);
                    }
                    _ => lattice.push_pending(token),
                }
            }
            WordRef::User(entry_id) => {
                let pos_tag = self.user_dict.as_deref().map_or("", UserDictionary::pos_tag);
                debug_assert!(self.user_dict.as_ref().is_some_and(|d| (entry_id as usize) < d.len()));
                lattice.push_pending(Token {
                    surface: sent.surface(range_char.clone()).to_string(),
                    range_byte: sent.byte_range(range_char.clone()),
                    range_char,
                    pos_tag: pos_tag.to_string(),
                    pos_type: PosType::Morpheme,
                    lex_type: LexType::User,
                    morphemes: None,
                    kind: TokenKind::Dictionary,
                    space: false,
                });
            }
            WordRef::Bos => {}
        }
    }

    /// Pushes the morphemes of `parent` in reverse order.
    ///
    /// Parts of a compound get their own spans, walking back from the end of
    /// the word; parts of other types share the span of the whole word.
    fn push_decompounded(sent: &Sentence, lattice: &mut Lattice, parent: &Token, morphemes: &[Morpheme]) {
        let mut end = parent.range_char.end;
        for m in morphemes.iter().rev() {
            let range_char = if parent.pos_type == PosType::Compound {
                let len = m.surface().chars().count();
                let start = end.saturating_sub(len).max(parent.range_char.start);
                let range = start..end;
                end = start;
                range
            } else {
                parent.range_char.clone()
            };
            lattice.push_pending(Token {
                surface: m.surface().to_string(),
                range_byte: sent.byte_range(range_char.clone()),
                range_char,
                pos_tag: m.pos_tag().to_string(),
                pos_type: PosType::Morpheme,
                lex_type: parent.lex_type,
                morphemes: None,
                kind: TokenKind::Decompound,
                space: false,
            });
        }
    }
}
