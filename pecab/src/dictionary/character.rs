//! Character classifier built from `char.def`.
use std::io::{BufRead, BufReader, Read};
use std::sync::LazyLock;

use regex::RegexSet;
use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{PecabError, Result};

const BMP_SIZE: usize = 0x10000;
const UNCOVERED: u16 = u16::MAX;

const HANGUL_SYLLABLE_FIRST: u32 = 0xAC00;
const HANGUL_SYLLABLE_LAST: u32 = 0xD7A3;
const NUM_TRAILING_CONSONANTS: u32 = 28;

/// Checks if `c` is a precomposed Hangul syllable.
#[inline(always)]
pub fn is_hangul(c: char) -> bool {
    (HANGUL_SYLLABLE_FIRST..=HANGUL_SYLLABLE_LAST).contains(&u32::from(c))
}

/// Checks if `c` is a Hangul syllable ending with a trailing consonant (jongseong).
#[inline(always)]
pub fn has_trailing_consonant(c: char) -> bool {
    is_hangul(c) && (u32::from(c) - HANGUL_SYLLABLE_FIRST) % NUM_TRAILING_CONSONANTS != 0
}

/// Unicode general category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum GeneralCategory {
    Lu, Ll, Lt, Lm, Lo,
    Mn, Mc, Me,
    Nd, Nl, No,
    Pc, Pd, Ps, Pe, Pi, Pf, Po,
    Sm, Sc, Sk, So,
    Zs, Zl, Zp,
    Cc, Cf, Co,
    /// Unassigned.
    Cn,
}

const ASSIGNED_CATEGORIES: [GeneralCategory; 28] = {
    use GeneralCategory::*;
    [
        Lu, Ll, Lt, Lm, Lo, Mn, Mc, Me, Nd, Nl, No, Pc, Pd, Ps, Pe, Pi, Pf, Po, Sm, Sc, Sk, So,
        Zs, Zl, Zp, Cc, Cf, Co,
    ]
};

static GENERAL_CATEGORY_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(
        ASSIGNED_CATEGORIES
            .iter()
            .map(|gc| format!(r"\A\p{{{gc:?}}}\z")),
    )
    .expect("general category classes are valid patterns")
});

/// Gets the Unicode general category of `c`.
pub fn general_category(c: char) -> GeneralCategory {
    let mut buf = [0; 4];
    GENERAL_CATEGORY_SET
        .matches(c.encode_utf8(&mut buf))
        .iter()
        .next()
        .map_or(GeneralCategory::Cn, |i| ASSIGNED_CATEGORIES[i])
}

/// Checks if `c` is a separator, a control, a punctuation or a symbol.
pub fn is_punctuation(c: char) -> bool {
    use GeneralCategory::*;
    matches!(
        general_category(c),
        Zs | Zl | Zp | Cc | Cf | Pd | Ps | Pe | Pc | Po | Sm | Sc | Sk | So | Pi | Pf
    )
}

/// Category defined in `char.def`.
#[derive(Archive, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CharCategory {
    name: String,
    invoke: bool,
    group: bool,
}

impl CharCategory {
    /// Gets the category name.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Archive, Serialize, Deserialize, Debug, Clone, Copy)]
struct CharRange {
    start: u32,
    end: u32,
    cate_id: u16,
}

/// Category information of a character.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharInfo {
    cate_id: u16,
    covered: bool,
}

impl CharInfo {
    /// Gets the primary category id.
    #[inline(always)]
    pub const fn cate_id(&self) -> u16 {
        self.cate_id
    }

    /// Checks if a range row of `char.def` covers the character.
    #[inline(always)]
    pub const fn is_covered(&self) -> bool {
        self.covered
    }
}

/// Mapping from characters to their categories.
#[derive(Archive, Serialize, Deserialize, Debug, Clone)]
pub struct CharProperty {
    categories: Vec<CharCategory>,
    bmp: Vec<u16>,
    // Rows over the supplementary planes, later rows win.
    supplementary: Vec<CharRange>,
    default_id: u16,
    space_id: Option<u16>,
}

impl CharProperty {
    /// Gets the category information of `c`.
    #[inline(always)]
    pub fn char_info(&self, c: char) -> CharInfo {
        let code = u32::from(c);
        let cate_id = match usize::try_from(code) {
            Ok(i) if i < BMP_SIZE => self.bmp[i],
            _ => self
                .supplementary
                .iter()
                .rev()
                .find(|r| r.start <= code && code <= r.end)
                .map_or(UNCOVERED, |r| r.cate_id),
        };
        if cate_id == UNCOVERED {
            CharInfo {
                cate_id: self.default_id,
                covered: false,
            }
        } else {
            CharInfo {
                cate_id,
                covered: true,
            }
        }
    }

    /// Checks if `c` can be handled by the tokenizer.
    ///
    /// Control characters no range row covers are not classifiable.
    #[inline(always)]
    pub fn is_classifiable(&self, c: char) -> bool {
        self.char_info(c).covered || !c.is_control()
    }

    /// Gets the id of the category named `name`.
    pub fn cate_id(&self, name: &str) -> Option<u16> {
        self.categories
            .iter()
            .position(|c| c.name == name)
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Gets the category of `cate_id`.
    #[inline(always)]
    pub fn category(&self, cate_id: u16) -> &CharCategory {
        &self.categories[usize::from(cate_id)]
    }

    /// Gets the number of categories.
    #[inline(always)]
    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    /// Checks if an unknown word is always generated for `cate_id`.
    #[inline(always)]
    pub fn is_invoke(&self, cate_id: u16) -> bool {
        self.category(cate_id).invoke
    }

    /// Checks if characters of `cate_id` are grouped into one unknown word.
    #[inline(always)]
    pub fn is_groupable(&self, cate_id: u16) -> bool {
        self.category(cate_id).group
    }

    /// Checks if `info` belongs to category `SPACE`.
    #[inline(always)]
    pub fn is_space(&self, info: CharInfo) -> bool {
        self.space_id == Some(info.cate_id)
    }

    /// Creates a new instance from `char.def`.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut categories: Vec<CharCategory> = vec![];
        let mut range_rows = vec![];

        for line in BufReader::new(rdr).lines() {
            let line = line?;
            let line = match line.find('#') {
                Some(i) => &line[..i],
                None => &line,
            }
            .trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("0x") {
                range_rows.push(line.to_string());
                continue;
            }
            let category = Self::parse_category(line)?;
            if categories.iter().any(|c| c.name == category.name) {
                return Err(PecabError::invalid_format(
                    "char.def",
                    format!("Category {} is defined twice", category.name),
                ));
            }
            categories.push(category);
        }

        let cate_id = |name: &str| -> Result<u16> {
            let i = categories.iter().position(|c| c.name == name).ok_or_else(|| {
                PecabError::invalid_format("char.def", format!("Undefined category: {name}"))
            })?;
            Ok(u16::try_from(i)?)
        };

        let mut bmp = vec![UNCOVERED; BMP_SIZE];
        let mut supplementary = vec![];
        for row in &range_rows {
            let (start, end, names) = Self::parse_range(row)?;
            let primary = cate_id(names[0])?;
            for &name in &names[1..] {
                cate_id(name)?;
            }
            let bmp_end = usize::try_from(end)?.min(BMP_SIZE - 1);
            for code in usize::try_from(start)?..=bmp_end {
                bmp[code] = primary;
            }
            if end >= BMP_SIZE as u32 {
                supplementary.push(CharRange {
                    start: start.max(BMP_SIZE as u32),
                    end,
                    cate_id: primary,
                });
            }
        }

        let default_id = cate_id("DEFAULT")?;
        let space_id = cate_id("SPACE").ok();
        log::debug!(
            "loaded {} character categories and {} ranges",
            categories.len(),
            range_rows.len()
        );

        Ok(Self {
            categories,
            bmp,
            supplementary,
            default_id,
            space_id,
        })
    }

    fn parse_category(line: &str) -> Result<CharCategory> {
        let cols: Vec<_> = line.split_whitespace().collect();
        if cols.len() != 4 {
            let msg = format!("A category row must consist of four items, {line}");
            return Err(PecabError::invalid_format("char.def", msg));
        }
        let invoke: u8 = cols[1].parse()?;
        let group: u8 = cols[2].parse()?;
        let _length: u16 = cols[3].parse()?;
        if invoke > 1 || group > 1 {
            let msg = format!("INVOKE and GROUP must be 0 or 1, {line}");
            return Err(PecabError::invalid_format("char.def", msg));
        }
        Ok(CharCategory {
            name: cols[0].to_string(),
            invoke: invoke == 1,
            group: group == 1,
        })
    }

    fn parse_range(line: &str) -> Result<(u32, u32, Vec<&str>)> {
        let cols: Vec<_> = line.split_whitespace().collect();
        if cols.len() < 2 {
            let msg = format!("A range row must have at least one category, {line}");
            return Err(PecabError::invalid_format("char.def", msg));
        }
        let parse_hex = |s: &str| -> Result<u32> {
            let code = u32::from_str_radix(s.trim_start_matches("0x"), 16)?;
            if code > u32::from(char::MAX) {
                let msg = format!("A code point is out of range, {line}");
                return Err(PecabError::invalid_format("char.def", msg));
            }
            Ok(code)
        };
        let (start, end) = match cols[0].split_once("..") {
            Some((s, e)) => (parse_hex(s)?, parse_hex(e)?),
            None => {
                let c = parse_hex(cols[0])?;
                (c, c)
            }
        };
        if start > end {
            let msg = format!("The range must be in ascending order, {line}");
            return Err(PecabError::invalid_format("char.def", msg));
        }
        Ok((start, end, cols[1..].to_vec()))
    }
}
