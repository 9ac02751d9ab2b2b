//! Provider of a routine for tokenization.
use crate::sentence::Sentence;
use crate::token::Token;
use crate::tokenizer::Tokenizer;
use crate::tokenizer::lattice::Lattice;
use crate::tokenizer::postprocessor;

/// Provider of a routine for tokenization.
///
/// It holds the internal data structures used in tokenization,
/// which can be reused to avoid unnecessary memory reallocation.
pub struct Worker {
    pub(crate) tokenizer: Tokenizer,
    pub(crate) sent: Sentence,
    // Remainder of a relaxed long unknown word.
    pub(crate) rest_sent: Sentence,
    pub(crate) lattice: Lattice,
    pub(crate) tokens: Vec<Token>,
}

impl Worker {
    /// Creates a new instance.
    pub(crate) fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            sent: Sentence::new(),
            rest_sent: Sentence::new(),
            lattice: Lattice::default(),
            tokens: vec![],
        }
    }

    /// Resets the input sentence to be tokenized.
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.sent.clear();
        self.tokens.clear();
        let input = input.as_ref();
        if !input.is_empty() {
            self.sent.set_sentence(input);
            self.sent.compile(self.tokenizer.dictionary().char_prop());
        }
    }

    /// Tokenizes the input sentence set by [`Worker::reset_sentence`].
    ///
    /// The input is kept, so calling it again gives the same tokens.
    pub fn tokenize(&mut self) {
        self.tokenize_sentence();

        let Some(split) = postprocessor::find_split(&self.tokens, self.tokenizer.relaxation_len())
        else {
            return;
        };
        let long = self.tokens.remove(0);
        let (lead, rest) = postprocessor::split_lead(&long, split);
        log::debug!("relaxed a long unknown word: {}", long.surface());

        self.rest_sent.set_sentence(rest);
        self.rest_sent.compile(self.tokenizer.dictionary().char_prop());
        std::mem::swap(&mut self.sent, &mut self.rest_sent);
        self.tokenize_sentence();
        std::mem::swap(&mut self.sent, &mut self.rest_sent);
        let (offset_char, offset_byte) = (lead.range_char.end, lead.range_byte.end);
        self.tokens.insert(0, lead);
        for token in &mut self.tokens[1..] {
            token.shift(offset_char, offset_byte);
        }
    }

    fn tokenize_sentence(&mut self) {
        self.tokens.clear();
        self.lattice.reset();
        while let Some(token) = self.increment() {
            self.tokens.push(token);
        }
    }

    /// Gets the next token, parsing as far as needed.
    fn increment(&mut self) -> Option<Token> {
        while !self.lattice.has_pending() {
            if self.lattice.end {
                return None;
            }
            self.tokenizer.parse(&self.sent, &mut self.lattice);
        }
        self.lattice.pop_pending()
    }

    /// Gets the number of resultant tokens.
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Gets the `i`-th resultant token.
    #[inline(always)]
    pub fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    /// Creates an iterator of resultant tokens.
    #[inline(always)]
    pub fn token_iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Gets the resultant tokens.
    #[inline(always)]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::SystemDictionaryBuilder;
    use crate::token::LexType;

    fn tokenizer() -> Tokenizer {
        let dict = SystemDictionaryBuilder::from_readers(
            "방,1,1,1000,NNG".as_bytes(),
            "2 2".as_bytes(),
            "DEFAULT 0 1 0\nALPHA 1 1 0\n0x0061..0x007A ALPHA".as_bytes(),
            "DEFAULT,0,0,3000,SY\nALPHA,1,1,1500,SL".as_bytes(),
        )
        .unwrap();
        Tokenizer::new(dict)
    }

    #[test]
    fn test_relax_long_unknown() {
        let tokenizer = tokenizer().unknown_unigrams(false);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("aaaaaaab");
        worker.tokenize();

        assert_eq!(worker.num_tokens(), 2);
        let lead = worker.token(0);
        assert_eq!(lead.surface(), "aaaaaaa");
        assert_eq!(lead.range_char(), 0..7);
        assert_eq!(lead.pos_tag(), "UNKNOWN");
        assert_eq!(lead.lex_type(), LexType::Unknown);
        let rest = worker.token(1);
        assert_eq!(rest.surface(), "b");
        assert_eq!(rest.range_char(), 7..8);
        assert_eq!(rest.range_byte(), 7..8);
    }

    #[test]
    fn test_tokenize_twice_after_relaxation() {
        let tokenizer = tokenizer().unknown_unigrams(false);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("aaaaaaab");
        worker.tokenize();
        let first = worker.tokens().to_vec();
        worker.tokenize();
        assert_eq!(worker.tokens(), first.as_slice());
        assert_eq!(
            worker
                .token_iter()
                .map(|t| (t.surface(), t.range_char()))
                .collect::<Vec<_>>(),
            vec![("aaaaaaa", 0..7), ("b", 7..8)]
        );
    }

    #[test]
    fn test_relax_disabled() {
        let tokenizer = tokenizer().unknown_unigrams(false).relax_long_unknown(0);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("aaaaaaab");
        worker.tokenize();
        assert_eq!(worker.num_tokens(), 1);
        assert_eq!(worker.token(0).surface(), "aaaaaaab");
    }

    #[test]
    fn test_relax_repeated_only() {
        let tokenizer = tokenizer().unknown_unigrams(false);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("aaaaaaaa");
        worker.tokenize();
        assert_eq!(worker.num_tokens(), 1);
    }

    #[test]
    fn test_tokenize_twice() {
        let tokenizer = tokenizer();
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("방ab");
        worker.tokenize();
        let first = worker.tokens().to_vec();
        worker.tokenize();
        assert_eq!(worker.tokens(), first.as_slice());
        assert_eq!(
            worker.token_iter().map(Token::surface).collect::<Vec<_>>(),
            vec!["방", "a", "b"]
        );
    }

    #[test]
    fn test_unclassifiable_character() {
        let tokenizer = tokenizer();
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("a\u{7}b");
        worker.tokenize();
        let surfaces: String = worker.token_iter().map(Token::surface).collect();
        assert_eq!(surfaces, "a\u{7}b");
    }
}
