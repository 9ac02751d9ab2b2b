//! Container of resultant tokens.
use std::fmt;
use std::ops::Range;

use rkyv::{Archive, Deserialize, Serialize};

/// Type of a lexicon that contains the word.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
pub enum LexType {
    /// System lexicon.
    #[default]
    Known,
    /// User lexicon.
    User,
    /// Unknown words generated from character categories.
    Unknown,
}

impl fmt::Display for LexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known => write!(f, "KNOWN"),
            Self::User => write!(f, "USER"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Morphological type of a dictionary entry.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default, Archive, Serialize, Deserialize)]
pub enum PosType {
    /// A single morpheme.
    #[default]
    Morpheme,
    /// A compound noun whose parts spell out its surface.
    Compound,
    /// An inflected form.
    Inflect,
    /// A pre-analyzed expression.
    PreAnalysis,
}

impl PosType {
    /// Maps the `type` column of mecab-ko-dic.
    pub fn from_dic_type(s: &str) -> Self {
        match s {
            "Compound" => Self::Compound,
            "Inflect" => Self::Inflect,
            "Preanalysis" => Self::PreAnalysis,
            _ => Self::Morpheme,
        }
    }
}

impl fmt::Display for PosType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Morpheme => write!(f, "MORPHEME"),
            Self::Compound => write!(f, "COMPOUND"),
            Self::Inflect => write!(f, "INFLECT"),
            Self::PreAnalysis => write!(f, "PREANALYSIS"),
        }
    }
}

/// Part of a compound, an inflected form or a pre-analyzed expression.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Archive, Serialize, Deserialize)]
pub struct Morpheme {
    surface: String,
    pos_tag: String,
}

impl Morpheme {
    /// Creates a new instance.
    pub fn new<S, T>(surface: S, pos_tag: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            surface: surface.into(),
            pos_tag: pos_tag.into(),
        }
    }

    /// Gets the surface string.
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Gets the POS tag.
    #[inline(always)]
    pub fn pos_tag(&self) -> &str {
        &self.pos_tag
    }
}

/// How a token was derived from the lattice.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum TokenKind {
    /// A word on the best path, or an inserted space.
    Dictionary,
    /// A sub-morpheme of a decompounded word.
    Decompound,
}

/// Resultant token.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Token {
    pub(crate) surface: String,
    pub(crate) range_char: Range<usize>,
    pub(crate) range_byte: Range<usize>,
    pub(crate) pos_tag: String,
    pub(crate) pos_type: PosType,
    pub(crate) lex_type: LexType,
    pub(crate) morphemes: Option<Vec<Morpheme>>,
    pub(crate) kind: TokenKind,
    pub(crate) space: bool,
}

impl Token {
    /// Gets the surface string of the token.
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Gets the position range of the token in characters.
    ///
    /// A decompounded token of an inflected or pre-analyzed word spans
    /// the whole parent word.
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        self.range_char.clone()
    }

    /// Gets the position range of the token in bytes.
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        self.range_byte.clone()
    }

    /// Gets the POS tag.
    #[inline(always)]
    pub fn pos_tag(&self) -> &str {
        &self.pos_tag
    }

    /// Gets the POS type.
    #[inline(always)]
    pub fn pos_type(&self) -> PosType {
        self.pos_type
    }

    /// Gets the lexicon type where the token is from.
    #[inline(always)]
    pub fn lex_type(&self) -> LexType {
        self.lex_type
    }

    /// Gets the sub-morphemes of the word.
    #[inline(always)]
    pub fn morphemes(&self) -> Option<&[Morpheme]> {
        self.morphemes.as_deref()
    }

    /// Gets how the token was derived.
    #[inline(always)]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Gets the position increment, which is always 1.
    #[inline(always)]
    pub const fn pos_incr(&self) -> usize {
        1
    }

    /// Gets the number of positions the token spans, which is always 1.
    #[inline(always)]
    pub const fn pos_len(&self) -> usize {
        1
    }

    /// Checks if the token covers space characters only.
    ///
    /// Control characters that the dictionary cannot classify are read as
    /// spaces, so their tokens are spaces too.
    #[inline(always)]
    pub fn is_space(&self) -> bool {
        self.space
    }

    pub(crate) fn shift(&mut self, offset_char: usize, offset_byte: usize) {
        self.range_char = self.range_char.start + offset_char..self.range_char.end + offset_char;
        self.range_byte = self.range_byte.start + offset_byte..self.range_byte.end + offset_byte;
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.surface, self.pos_tag)
    }
}
