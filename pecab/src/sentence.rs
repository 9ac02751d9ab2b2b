use std::ops::Range;

use crate::dictionary::character::{CharInfo, CharProperty};

/// Internal representation of an input sentence.
///
/// `chars` are the characters used for dictionary lookups, where characters
/// the classifier cannot handle are replaced with a space; token surfaces and
/// offsets always come from `input`.
#[derive(Default, Clone, Debug)]
pub struct Sentence {
    input: String,
    chars: Vec<char>,
    c2b: Vec<usize>,
    cinfos: Vec<CharInfo>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.input.clear();
        self.chars.clear();
        self.c2b.clear();
        self.cinfos.clear();
    }

    pub fn set_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref());
    }

    pub fn compile(&mut self, char_prop: &CharProperty) {
        for (bi, ch) in self.input.char_indices() {
            let ch = if char_prop.is_classifiable(ch) { ch } else { ' ' };
            self.chars.push(ch);
            self.c2b.push(bi);
            self.cinfos.push(char_prop.char_info(ch));
        }
        self.c2b.push(self.input.len());
    }

    #[inline(always)]
    pub fn raw(&self) -> &str {
        &self.input
    }

    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.chars.len()
    }

    #[inline(always)]
    pub fn byte_position(&self, pos_char: usize) -> usize {
        self.c2b[pos_char]
    }

    #[inline(always)]
    pub fn char_info(&self, pos_char: usize) -> CharInfo {
        self.cinfos[pos_char]
    }

    /// Gets the byte range of the character range.
    #[inline(always)]
    pub fn byte_range(&self, range_char: Range<usize>) -> Range<usize> {
        self.c2b[range_char.start]..self.c2b[range_char.end]
    }

    /// Gets the original text of the character range.
    #[inline(always)]
    pub fn surface(&self, range_char: Range<usize>) -> &str {
        &self.input[self.byte_range(range_char)]
    }
}
