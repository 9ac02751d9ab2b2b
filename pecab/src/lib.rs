//! # Pecab
//!
//! Pecab is a Korean morphological analyzer based on the viterbi algorithm
//! over mecab-ko-dic style dictionaries.
//! The lattice is built incrementally in a sliding window, so the memory
//! in use is bounded by the longest unresolved span instead of the input.
//!
//! ## Examples
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pecab::{Dictionary, SystemDictionaryBuilder, Tokenizer};
//!
//! let lexicon_csv = "아버지,1,1,1000,NNG,*,F,아버지,*,*,*,*
//! 가,2,2,800,JKS,*,F,가,*,*,*,*
//! 방,1,1,1200,NNG,*,T,방,*,*,*,*
//! 에,3,3,600,JKB,*,F,에,*,*,*,*";
//! let matrix_def = "4 4\n1 2 -1000\n1 3 -1000";
//! let char_def = "DEFAULT 0 1 0\nSPACE 0 1 0\nHANGUL 0 1 2\n0x0020 SPACE\n0xAC00..0xD7A3 HANGUL";
//! let unk_def = "DEFAULT,0,0,3000,SY\nSPACE,0,0,0,SP\nHANGUL,0,0,5000,UNKNOWN";
//!
//! let dict = SystemDictionaryBuilder::from_readers(
//!     lexicon_csv.as_bytes(),
//!     matrix_def.as_bytes(),
//!     char_def.as_bytes(),
//!     unk_def.as_bytes(),
//! )?;
//!
//! let mut buffer = Vec::new();
//! dict.write(&mut buffer)?;
//! let dict = Dictionary::read(buffer.as_slice())?;
//!
//! let tokenizer = Tokenizer::new(dict);
//! let mut worker = tokenizer.new_worker();
//!
//! worker.reset_sentence("아버지가방에");
//! worker.tokenize();
//! assert_eq!(worker.num_tokens(), 4);
//!
//! let t0 = worker.token(0);
//! assert_eq!(t0.surface(), "아버지");
//! assert_eq!(t0.range_char(), 0..3);
//! assert_eq!(t0.range_byte(), 0..9);
//! assert_eq!(t0.pos_tag(), "NNG");
//!
//! let t1 = worker.token(1);
//! assert_eq!(t1.surface(), "가");
//! assert_eq!(t1.pos_tag(), "JKS");
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

pub mod analyzer;
pub mod common;
pub mod dictionary;
pub mod errors;
mod sentence;
pub mod token;
pub mod tokenizer;
mod utils;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use dictionary::{Dictionary, SystemDictionaryBuilder, UserDictionary, UserEntryParams};
pub use tokenizer::Tokenizer;

/// Version number of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
