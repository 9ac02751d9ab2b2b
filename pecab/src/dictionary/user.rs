//! User dictionary of surfaces that must be kept as single words.
use hashbrown::HashMap;

use crate::dictionary::character::{has_trailing_consonant, is_hangul};
use crate::dictionary::connector::ConnectorView;
use crate::dictionary::WordParam;
use crate::errors::{Result, ValidationError};
use crate::utils::FromU32;

/// Connection ids, cost and POS tag assigned to every user entry.
///
/// The defaults are the ids of a general noun in mecab-ko-dic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntryParams {
    /// Left connection id.
    pub left_id: u16,
    /// Right connection id of entries ending with a non-Hangul character.
    pub right_id: u16,
    /// Right connection id of entries ending with a trailing consonant.
    pub right_id_coda: u16,
    /// Right connection id of entries ending with an open Hangul syllable.
    pub right_id_no_coda: u16,
    /// Word cost.
    pub word_cost: i16,
    /// POS tag.
    pub pos_tag: String,
}

impl Default for UserEntryParams {
    fn default() -> Self {
        Self {
            left_id: 1781,
            right_id: 3533,
            right_id_coda: 3535,
            right_id_no_coda: 3534,
            word_cost: -10000,
            pos_tag: "NNG".to_string(),
        }
    }
}

impl UserEntryParams {
    fn param_for(&self, surface: &str) -> WordParam {
        let right_id = match surface.chars().last() {
            Some(c) if has_trailing_consonant(c) => self.right_id_coda,
            Some(c) if is_hangul(c) => self.right_id_no_coda,
            _ => self.right_id,
        };
        WordParam::new(self.left_id, right_id, self.word_cost)
    }
}

/// Entry of a user dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    surface: String,
    param: WordParam,
}

impl UserEntry {
    /// Gets the surface string.
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Gets the connection ids and the cost.
    #[inline(always)]
    pub fn param(&self) -> WordParam {
        self.param
    }
}

/// User dictionary with longest-match lookup.
#[derive(Debug, Clone)]
pub struct UserDictionary {
    entries: Vec<UserEntry>,
    map: HashMap<String, u32>,
    max_len: usize,
    pos_tag: String,
}

impl UserDictionary {
    /// Creates a new instance with the default [`UserEntryParams`].
    ///
    /// # Errors
    ///
    /// [`ValidationError`] is returned when an entry contains whitespace.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_params(entries, UserEntryParams::default())
    }

    /// Creates a new instance assigning `params` to the entries.
    ///
    /// Entries are trimmed and sorted in descending order; empty and duplicate
    /// entries are dropped.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] is returned when an entry contains whitespace.
    pub fn with_params<I, S>(entries: I, params: UserEntryParams) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut surfaces = vec![];
        for entry in entries {
            let surface = entry.as_ref().trim();
            if surface.is_empty() {
                continue;
            }
            if surface.chars().any(char::is_whitespace) {
                return Err(ValidationError::WhitespaceInUserEntry {
                    entry: surface.to_string(),
                }
                .into());
            }
            surfaces.push(surface.to_string());
        }
        surfaces.sort_unstable_by(|a, b| b.cmp(a));
        surfaces.dedup();

        let mut map = HashMap::with_capacity(surfaces.len());
        let mut max_len = 0;
        let mut user_entries = Vec::with_capacity(surfaces.len());
        for surface in surfaces {
            max_len = max_len.max(surface.chars().count());
            map.insert(surface.clone(), u32::try_from(user_entries.len())?);
            user_entries.push(UserEntry {
                param: params.param_for(&surface),
                surface,
            });
        }
        log::debug!("built a user dictionary of {} entries", user_entries.len());

        Ok(Self {
            entries: user_entries,
            map,
            max_len,
            pos_tag: params.pos_tag,
        })
    }

    /// Finds the longest entry starting at the beginning of `input`,
    /// returning its id and length in characters.
    pub fn longest_match(&self, input: &[char]) -> Option<(u32, usize)> {
        let mut key = String::new();
        let mut result = None;
        for (i, &c) in input.iter().take(self.max_len).enumerate() {
            key.push(c);
            if let Some(&id) = self.map.get(key.as_str()) {
                result = Some((id, i + 1));
            }
        }
        result
    }

    /// Gets the entry of `id`.
    #[inline(always)]
    pub fn entry(&self, id: u32) -> &UserEntry {
        &self.entries[usize::from_u32(id)]
    }

    /// Gets the POS tag shared by all entries.
    #[inline(always)]
    pub fn pos_tag(&self) -> &str {
        &self.pos_tag
    }

    /// Gets the number of entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the dictionary has no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks if left/right-ids are valid with connector.
    pub(crate) fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        self.entries.iter().all(|e| e.param.is_valid(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::PecabError;

    #[test]
    fn test_right_id_buckets() {
        let dict = UserDictionary::new(["삼성디지털프라자", "가방", "Galaxy"]).unwrap();
        let param = |s: &str| {
            let chars: Vec<_> = s.chars().collect();
            let (id, _) = dict.longest_match(&chars).unwrap();
            dict.entry(id).param()
        };
        assert_eq!(param("삼성디지털프라자"), WordParam::new(1781, 3534, -10000));
        assert_eq!(param("가방"), WordParam::new(1781, 3535, -10000));
        assert_eq!(param("Galaxy"), WordParam::new(1781, 3533, -10000));
        assert_eq!(dict.pos_tag(), "NNG");
    }

    #[test]
    fn test_descending_order() {
        let dict = UserDictionary::new(["가", "다", "나", "다"]).unwrap();
        let surfaces: Vec<_> = (0..dict.len() as u32).map(|i| dict.entry(i).surface()).collect();
        assert_eq!(surfaces, vec!["다", "나", "가"]);
    }

    #[test]
    fn test_longest_match() {
        let dict = UserDictionary::new(["지펠", "지펠냉장고", "냉장고"]).unwrap();
        let input: Vec<_> = "지펠냉장고를".chars().collect();
        let (id, len) = dict.longest_match(&input).unwrap();
        assert_eq!(dict.entry(id).surface(), "지펠냉장고");
        assert_eq!(len, 5);
        assert_eq!(dict.longest_match(&input[1..]), None);
    }

    #[test]
    fn test_trim_and_skip_empty() {
        let dict = UserDictionary::new(["  가방 ", "", "   "]).unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.entry(0).surface(), "가방");
    }

    #[test]
    fn test_whitespace_in_entry() {
        let result = UserDictionary::new(["삼성 디지털"]);
        assert!(matches!(
            result,
            Err(PecabError::Validation(ValidationError::WhitespaceInUserEntry { ref entry }))
                if entry == "삼성 디지털"
        ));
        assert!(UserDictionary::new(["삼성\t디지털"]).is_err());
    }

    #[test]
    fn test_custom_params() {
        let params = UserEntryParams {
            left_id: 1,
            right_id: 2,
            right_id_coda: 3,
            right_id_no_coda: 4,
            word_cost: -100,
            pos_tag: "NNP".to_string(),
        };
        let dict = UserDictionary::with_params(["방"], params).unwrap();
        assert_eq!(dict.entry(0).param(), WordParam::new(1, 3, -100));
        assert_eq!(dict.pos_tag(), "NNP");
    }
}
