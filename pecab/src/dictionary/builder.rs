//! Builder of the system dictionary.
use std::io::Read;

use crate::dictionary::character::CharProperty;
use crate::dictionary::connector::{ConnectorView, MatrixConnector};
use crate::dictionary::lexicon::Lexicon;
use crate::dictionary::unknown::UnkHandler;
use crate::dictionary::Dictionary;
use crate::errors::{PecabError, Result};

/// Builder for a system dictionary from mecab-ko-dic style sources.
pub struct SystemDictionaryBuilder {}

impl SystemDictionaryBuilder {
    pub(crate) fn build(
        system_lexicon: Lexicon,
        connector: MatrixConnector,
        char_prop: CharProperty,
        unk_handler: UnkHandler,
    ) -> Result<Dictionary> {
        if !system_lexicon.verify(&connector) {
            return Err(PecabError::invalid_argument(
                "system_lexicon_rdr",
                "system_lexicon_rdr includes invalid connection ids.",
            ));
        }
        if !unk_handler.verify(&connector) {
            return Err(PecabError::invalid_argument(
                "unk_handler_rdr",
                "unk_handler_rdr includes invalid connection ids.",
            ));
        }
        log::info!(
            "built a system dictionary of {} words with a {}x{} connection matrix",
            system_lexicon.num_records(),
            connector.num_right(),
            connector.num_left(),
        );

        Ok(Dictionary {
            lexicon: system_lexicon,
            connector,
            char_prop,
            unk_handler,
        })
    }

    /// Creates a new [`Dictionary`] from readers of system entries
    /// in the format of mecab-ko-dic.
    ///
    /// # Arguments
    ///
    /// * `system_lexicon_rdr` - A reader of a lexicon file `*.csv`.
    /// * `connector_rdr` - A reader of matrix file `matrix.def`.
    /// * `char_prop_rdr` - A reader of character definition file `char.def`.
    /// * `unk_handler_rdr` - A reader of unknown definition file `unk.def`.
    ///
    /// # Errors
    ///
    /// [`PecabError`] is returned when an input format is invalid, or when
    /// an entry refers to a connection id outside of the matrix.
    pub fn from_readers<S, C, P, U>(
        system_lexicon_rdr: S,
        connector_rdr: C,
        char_prop_rdr: P,
        unk_handler_rdr: U,
    ) -> Result<Dictionary>
    where
        S: Read,
        C: Read,
        P: Read,
        U: Read,
    {
        let system_lexicon = Lexicon::from_reader(system_lexicon_rdr)?;
        let connector = MatrixConnector::from_reader(connector_rdr)?;
        let char_prop = CharProperty::from_reader(char_prop_rdr)?;
        let unk_handler = UnkHandler::from_reader(unk_handler_rdr, &char_prop)?;

        Self::build(system_lexicon, connector, char_prop, unk_handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAR_DEF: &str = "DEFAULT 0 1 0\nHANGUL 0 1 2\n0xAC00..0xD7A3 HANGUL";

    #[test]
    fn test_from_readers() {
        let dict = SystemDictionaryBuilder::from_readers(
            "가방,1,1,100,NNG".as_bytes(),
            "2 2\n0 1 5".as_bytes(),
            CHAR_DEF.as_bytes(),
            "DEFAULT,0,0,1000,SY".as_bytes(),
        )
        .unwrap();
        assert_eq!(dict.num_words(), 1);
    }

    #[test]
    fn test_invalid_lexicon_ids() {
        let result = SystemDictionaryBuilder::from_readers(
            "가방,2,1,100,NNG".as_bytes(),
            "2 2\n0 1 5".as_bytes(),
            CHAR_DEF.as_bytes(),
            "DEFAULT,0,0,1000,SY".as_bytes(),
        );
        assert!(matches!(
            result,
            Err(PecabError::InvalidArgument(ref e)) if e.arg == "system_lexicon_rdr"
        ));
    }

    #[test]
    fn test_invalid_unk_ids() {
        let result = SystemDictionaryBuilder::from_readers(
            "가방,1,1,100,NNG".as_bytes(),
            "2 2\n0 1 5".as_bytes(),
            CHAR_DEF.as_bytes(),
            "DEFAULT,0,3,1000,SY".as_bytes(),
        );
        assert!(matches!(
            result,
            Err(PecabError::InvalidArgument(ref e)) if e.arg == "unk_handler_rdr"
        ));
    }
}
