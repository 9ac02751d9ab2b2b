//! Dictionary for tokenization.
pub mod builder;
pub(crate) mod character;
pub(crate) mod connector;
pub(crate) mod lexicon;
pub(crate) mod param;
pub mod trie;
pub(crate) mod unknown;
pub mod user;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use memmap2::Mmap;
use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{
    Archive, Deserialize, Serialize, access, api::serialize_using, ser::Serializer,
    ser::allocator::Arena, ser::sharing::Share, ser::writer::IoWriter, util::with_arena,
};

use crate::dictionary::character::CharProperty;
use crate::dictionary::connector::MatrixConnector;
use crate::dictionary::lexicon::Lexicon;
use crate::dictionary::unknown::UnkHandler;
use crate::errors::{PecabError, Result};

pub use crate::dictionary::builder::SystemDictionaryBuilder;
pub use crate::dictionary::character::{
    CharInfo, GeneralCategory, general_category, has_trailing_consonant, is_hangul,
    is_punctuation,
};
pub use crate::dictionary::param::WordParam;
pub use crate::dictionary::trie::DoubleArrayTrie;
pub use crate::dictionary::user::{UserDictionary, UserEntryParams};

/// Magic bytes identifying a Pecab dictionary file.
pub const MODEL_MAGIC: &[u8] = b"PecabDictionaryRkyv 0.1\n";

const MODEL_MAGIC_LEN: usize = MODEL_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (MODEL_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;
const DATA_START: usize = MODEL_MAGIC_LEN + PADDING_LEN;

/// Dictionary for tokenization.
///
/// It is immutable once built and can be shared among tokenizers.
#[derive(Archive, Serialize, Deserialize)]
pub struct Dictionary {
    pub(crate) lexicon: Lexicon,
    pub(crate) connector: MatrixConnector,
    pub(crate) char_prop: CharProperty,
    pub(crate) unk_handler: UnkHandler,
}

impl Dictionary {
    /// Gets the reference to the system lexicon.
    #[inline(always)]
    pub(crate) fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Gets the reference to the connection matrix.
    #[inline(always)]
    pub(crate) fn connector(&self) -> &MatrixConnector {
        &self.connector
    }

    /// Gets the reference to the character classifier.
    #[inline(always)]
    pub(crate) fn char_prop(&self) -> &CharProperty {
        &self.char_prop
    }

    /// Gets the reference to the unknown-word handler.
    #[inline(always)]
    pub(crate) fn unk_handler(&self) -> &UnkHandler {
        &self.unk_handler
    }

    /// Gets the number of records in the system lexicon.
    pub fn num_words(&self) -> usize {
        self.lexicon.num_records()
    }

    /// Exports the dictionary data.
    ///
    /// # Errors
    ///
    /// [`PecabError`] is returned when writing or serialization fails.
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;

        let padding_bytes = vec![0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;

        with_arena(|arena: &mut Arena| {
            let writer = IoWriter::new(&mut wtr);
            let mut serializer = Serializer::new(writer, arena.acquire(), Share::new());
            serialize_using::<_, Error>(self, &mut serializer)
        })
        .map_err(|e| PecabError::invalid_state("rkyv serialization failed", e.to_string()))?;

        Ok(())
    }

    /// Creates a dictionary from raw dictionary data.
    ///
    /// # Errors
    ///
    /// [`PecabError`] is returned when the data is not a dictionary of this version
    /// or is corrupted.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; MODEL_MAGIC_LEN];
        rdr.read_exact(&mut magic)?;
        if magic != MODEL_MAGIC {
            return Err(PecabError::invalid_argument(
                "rdr",
                "The magic number of the input model mismatches.",
            ));
        }

        let mut padding_buf = vec![0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf)?;

        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;

        Self::from_archived_bytes(&buffer)
    }

    /// Creates a dictionary from a file through memory mapping.
    ///
    /// # Errors
    ///
    /// [`PecabError`] is returned when the file cannot be opened, is corrupted,
    /// or is not a dictionary of this version.
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref()).map_err(|e| {
            PecabError::invalid_argument("path", format!("Failed to open dictionary file: {e}"))
        })?;
        // SAFETY: the mapping is only read while the file handle is alive in this scope.
        let mmap = unsafe { Mmap::map(&file)? };

        if !mmap.starts_with(MODEL_MAGIC) {
            return Err(PecabError::invalid_argument(
                "path",
                "The magic number of the input model mismatches.",
            ));
        }
        let Some(data_bytes) = mmap.get(DATA_START..) else {
            return Err(PecabError::invalid_argument(
                "path",
                "Dictionary file too small or corrupted.",
            ));
        };

        Self::from_archived_bytes(data_bytes)
    }

    fn from_archived_bytes(bytes: &[u8]) -> Result<Self> {
        let mut aligned_bytes = AlignedVec::<RKYV_ALIGNMENT>::with_capacity(bytes.len());
        aligned_bytes.extend_from_slice(bytes);

        let archived = access::<ArchivedDictionary, Error>(&aligned_bytes).map_err(|e| {
            PecabError::invalid_state(
                "rkyv validation failed. The dictionary file may be corrupted or incompatible.",
                e.to_string(),
            )
        })?;
        let dict = rkyv::deserialize::<Self, Error>(archived)?;
        dict.verify_ids()?;
        Ok(dict)
    }

    /// Checks that every connection id is in range of the connector.
    fn verify_ids(&self) -> Result<()> {
        if !self.lexicon.verify(&self.connector) {
            return Err(PecabError::invalid_argument(
                "dict",
                "The system lexicon includes invalid connection ids.",
            ));
        }
        if !self.unk_handler.verify(&self.connector) {
            return Err(PecabError::invalid_argument(
                "dict",
                "The unknown-word handler includes invalid connection ids.",
            ));
        }
        Ok(())
    }
}
