//! Common settings in Pecab.

/// The fixed connection id of BOS/EOS.
pub const BOS_EOS_CONNECTION_ID: u16 = 0;

/// The default maximum number of characters grouped into one unknown word.
pub const MAX_UNKNOWN_WORD_LENGTH: usize = 1024;

/// The default minimum number of characters of a lone unknown token
/// that triggers the long-unknown relaxation.
pub const MIN_RELAXATION_LENGTH: usize = 7;

/// The default number of inputs memoized by [`Analyzer`](crate::Analyzer).
pub const DEFAULT_CACHE_CAPACITY: usize = 5000;

/// Extra cost charged to a particle separated from its host by whitespace.
pub const SPACE_PENALTY: i32 = 6000;

/// POS tags charged with [`SPACE_PENALTY`].
pub const SPACE_PENALTY_TAGS: &[&str] = &["JKS", "JKC", "JKG", "JKO", "JKB", "JKV", "JKQ", "JX", "JC"];

/// POS tag used for inserted space tokens when `unk.def` has no `SPACE` row.
pub const DEFAULT_SPACE_POS_TAG: &str = "SP";

/// POS tag of the leading run split off a long unknown token.
pub const RELAXED_UNKNOWN_POS_TAG: &str = "UNKNOWN";
