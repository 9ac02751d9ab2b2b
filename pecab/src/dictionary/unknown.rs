use std::io::{BufRead, BufReader, Read};

use rkyv::{Archive, Deserialize, Serialize};

use crate::common::DEFAULT_SPACE_POS_TAG;
use crate::dictionary::character::CharProperty;
use crate::dictionary::connector::ConnectorView;
use crate::dictionary::WordParam;
use crate::errors::{PecabError, Result};
use crate::utils::parse_csv_row;

/// Default record of unknown words in a character category.
#[derive(Archive, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UnkEntry {
    pub(crate) param: WordParam,
    pub(crate) pos_tag: String,
}

impl UnkEntry {
    #[inline(always)]
    pub fn param(&self) -> WordParam {
        self.param
    }

    #[inline(always)]
    pub fn pos_tag(&self) -> &str {
        &self.pos_tag
    }
}

/// Handler of unknown words.
#[derive(Archive, Serialize, Deserialize, Debug, Clone)]
pub struct UnkHandler {
    entries: Vec<UnkEntry>, // indexed by category id
    space_pos_tag: String,
}

impl UnkHandler {
    /// Gets the record of unknown words in `cate_id`.
    #[inline(always)]
    pub fn entry(&self, cate_id: u16) -> &UnkEntry {
        &self.entries[usize::from(cate_id)]
    }

    /// Gets the POS tag of inserted space tokens.
    #[inline(always)]
    pub fn space_pos_tag(&self) -> &str {
        &self.space_pos_tag
    }

    /// Checks if left/right-ids are valid with connector.
    pub fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        self.entries.iter().all(|e| e.param.is_valid(conn))
    }

    /// Creates a new instance from `unk.def`.
    ///
    /// The first row of a category is its record; categories without rows
    /// fall back to the record of `DEFAULT`.
    pub fn from_reader<R>(rdr: R, char_prop: &CharProperty) -> Result<Self>
    where
        R: Read,
    {
        let mut entries: Vec<Option<UnkEntry>> = vec![None; char_prop.num_categories()];
        for line in BufReader::new(rdr).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (cate_id, entry) = Self::parse_unk_entry(&line, char_prop)?;
            let slot = &mut entries[usize::from(cate_id)];
            if slot.is_some() {
                log::warn!("ignored an extra unknown-word row: {line}");
                continue;
            }
            *slot = Some(entry);
        }

        let default_id = char_prop.cate_id("DEFAULT").ok_or_else(|| {
            PecabError::invalid_argument("char_prop", "DEFAULT is not defined in char.def")
        })?;
        let default_entry = entries[usize::from(default_id)].clone().ok_or_else(|| {
            PecabError::invalid_format("unk.def", "DEFAULT must have a row")
        })?;
        let space_pos_tag = char_prop
            .cate_id("SPACE")
            .and_then(|id| entries[usize::from(id)].as_ref())
            .map_or_else(|| DEFAULT_SPACE_POS_TAG.to_string(), |e| e.pos_tag.clone());

        let entries = entries
            .into_iter()
            .map(|e| e.unwrap_or_else(|| default_entry.clone()))
            .collect();
        Ok(Self {
            entries,
            space_pos_tag,
        })
    }

    fn parse_unk_entry(line: &str, char_prop: &CharProperty) -> Result<(u16, UnkEntry)> {
        let cols = parse_csv_row(line)?;
        if cols.len() < 5 {
            let msg = format!("A row in unk.def must have five items at least, {line}");
            return Err(PecabError::invalid_format("unk.def", msg));
        }
        let cate_id = char_prop.cate_id(&cols[0]).ok_or_else(|| {
            let msg = format!("Undefined category: {}", cols[0]);
            PecabError::invalid_format("unk.def", msg)
        })?;
        let entry = UnkEntry {
            param: WordParam::new(cols[1].parse()?, cols[2].parse()?, cols[3].parse()?),
            pos_tag: cols[4].clone(),
        };
        Ok((cate_id, entry))
    }
}
