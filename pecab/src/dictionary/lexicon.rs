use std::io::Read;

use csv_core::ReadFieldResult;
use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::ConnectorView;
use crate::dictionary::trie::DoubleArrayTrie;
use crate::dictionary::WordParam;
use crate::errors::{PecabError, Result};
use crate::token::{Morpheme, PosType};
use crate::utils::FromU32;

/// Morpheme record of the system lexicon.
#[derive(Archive, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub(crate) surface: String,
    pub(crate) param: WordParam,
    pub(crate) pos_tag: String,
    pub(crate) pos_type: PosType,
    pub(crate) morphemes: Option<Vec<Morpheme>>,
}

impl WordRecord {
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    #[inline(always)]
    pub fn param(&self) -> WordParam {
        self.param
    }

    #[inline(always)]
    pub fn pos_tag(&self) -> &str {
        &self.pos_tag
    }

    #[inline(always)]
    pub fn pos_type(&self) -> PosType {
        self.pos_type
    }

    #[inline(always)]
    pub fn morphemes(&self) -> Option<&[Morpheme]> {
        self.morphemes.as_deref()
    }
}

/// Word matched in the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexMatch {
    pub word_id: u32,
    pub word_param: WordParam,
    pub end_char: usize,
}

/// System lexicon: a trie from surfaces to groups of homograph records.
#[derive(Archive, Serialize, Deserialize, Debug, Clone)]
pub struct Lexicon {
    trie: DoubleArrayTrie,
    // Records of the group i are records[groups[i]..groups[i + 1]].
    groups: Vec<u32>,
    records: Vec<WordRecord>,
}

impl Lexicon {
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = LexMatch> + 'a {
        self.trie
            .common_prefix_iter(input.iter().copied())
            .flat_map(move |(group, end_char)| {
                let group = usize::from_u32(group);
                (self.groups[group]..self.groups[group + 1]).map(move |word_id| LexMatch {
                    word_id,
                    word_param: self.records[usize::from_u32(word_id)].param,
                    end_char,
                })
            })
    }

    /// Gets the records stored for exactly `surface`.
    pub fn lookup(&self, surface: &str) -> &[WordRecord] {
        let Some(group) = self.trie.exact_match(surface) else {
            return &[];
        };
        let group = usize::from_u32(group);
        let start = usize::from_u32(self.groups[group]);
        let end = usize::from_u32(self.groups[group + 1]);
        &self.records[start..end]
    }

    #[inline(always)]
    pub fn record(&self, word_id: u32) -> &WordRecord {
        &self.records[usize::from_u32(word_id)]
    }

    #[inline(always)]
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Checks if left/right-ids are valid with connector.
    pub fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        self.records.iter().all(|r| r.param.is_valid(conn))
    }

    /// Builds a new instance from records in any order.
    ///
    /// Records sharing a surface keep their relative order inside the group.
    pub fn from_records(mut records: Vec<WordRecord>) -> Result<Self> {
        records.sort_by(|a, b| a.surface.cmp(&b.surface));

        let mut surfaces: Vec<&str> = vec![];
        let mut groups = vec![];
        for (i, r) in records.iter().enumerate() {
            if surfaces.last() != Some(&r.surface.as_str()) {
                surfaces.push(&r.surface);
                groups.push(u32::try_from(i)?);
            }
        }
        groups.push(u32::try_from(records.len())?);

        let trie = DoubleArrayTrie::build(&surfaces, None)?;
        log::debug!(
            "built a lexicon of {} records in {} groups",
            records.len(),
            surfaces.len()
        );
        Ok(Self {
            trie,
            groups,
            records,
        })
    }

    /// Creates a new instance from `lex.csv`.
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        let records = Self::parse_csv(&buf, "lex.csv")?;
        Self::from_records(records)
    }

    pub(crate) fn parse_csv(mut bytes: &[u8], name: &'static str) -> Result<Vec<WordRecord>> {
        let mut records = vec![];

        let mut rdr = csv_core::Reader::new();
        let mut output = [0; 4096];
        let mut field = vec![];
        let mut fields = vec![];

        loop {
            let (result, nin, nout) = rdr.read_field(bytes, &mut output);
            bytes = &bytes[nin..];
            field.extend_from_slice(&output[..nout]);
            match result {
                ReadFieldResult::InputEmpty => {}
                ReadFieldResult::OutputFull => {
                    return Err(PecabError::invalid_format(name, "A field is too long."));
                }
                ReadFieldResult::Field { record_end } => {
                    fields.push(std::str::from_utf8(&field)?.to_string());
                    field.clear();
                    if record_end {
                        if let Some(record) = Self::parse_record(&fields, name)? {
                            records.push(record);
                        }
                        fields.clear();
                    }
                }
                ReadFieldResult::End => break,
            }
        }
        Ok(records)
    }

    /// Parses a row `surface,left_id,right_id,word_cost,POS,...,type,first,last,expression`.
    fn parse_record(fields: &[String], name: &'static str) -> Result<Option<WordRecord>> {
        if fields.len() == 1 && fields[0].is_empty() {
            return Ok(None);
        }
        if fields.len() < 5 {
            let msg = format!(
                "A csv row of lexicon must have five items at least, {}",
                fields.join(",")
            );
            return Err(PecabError::invalid_format(name, msg));
        }
        if fields[0].is_empty() {
            log::warn!("skipped a row with an empty surface: {}", fields.join(","));
            return Ok(None);
        }
        let param = WordParam::new(fields[1].parse()?, fields[2].parse()?, fields[3].parse()?);
        let pos_type = fields.get(8).map_or(PosType::Morpheme, |t| PosType::from_dic_type(t));
        let morphemes = match fields.get(11) {
            Some(expr) => Self::parse_expression(expr, name)?,
            None => None,
        };
        Ok(Some(WordRecord {
            surface: fields[0].clone(),
            param,
            pos_tag: fields[4].clone(),
            pos_type,
            morphemes,
        }))
    }

    /// Parses an expression such as `가볍/VA/*+ᆫ/ETM/*`.
    fn parse_expression(expr: &str, name: &'static str) -> Result<Option<Vec<Morpheme>>> {
        if expr.is_empty() || expr == "*" {
            return Ok(None);
        }
        let mut morphemes = vec![];
        for item in expr.split('+') {
            let mut cols = item.split('/');
            match (cols.next(), cols.next()) {
                (Some(surface), Some(pos_tag)) if !surface.is_empty() => {
                    morphemes.push(Morpheme::new(surface, pos_tag));
                }
                _ => {
                    let msg = format!("Invalid expression: {expr}");
                    return Err(PecabError::invalid_format(name, msg));
                }
            }
        }
        Ok(Some(morphemes))
    }
}
