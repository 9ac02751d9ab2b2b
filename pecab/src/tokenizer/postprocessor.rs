//! Relaxation of a long unknown token.
use crate::common::RELAXED_UNKNOWN_POS_TAG;
use crate::token::{LexType, PosType, Token, TokenKind};

/// Finds where a lone long unknown token should be split, returning the
/// number of characters of its leading run.
///
/// `None` is returned when the relaxation does not apply, including when
/// the token repeats one character only.
pub fn find_split(tokens: &[Token], min_len: usize) -> Option<usize> {
    if min_len == 0 {
        return None;
    }
    let [token] = tokens else {
        return None;
    };
    if token.lex_type() != LexType::Unknown || token.range_char().len() < min_len {
        return None;
    }
    let mut chars = token.surface().chars();
    let first = chars.next()?;
    chars.position(|c| c != first).map(|i| i + 1)
}

/// Splits `token` into the leading run of `split` characters, tagged as an
/// unknown morpheme, and the text of the remainder.
pub fn split_lead(token: &Token, split: usize) -> (Token, String) {
    let lead_bytes = token
        .surface()
        .char_indices()
        .nth(split)
        .map_or(token.surface().len(), |(i, _)| i);
    let (lead_surface, rest) = token.surface().split_at(lead_bytes);
    let start_char = token.range_char.start;
    let start_byte = token.range_byte.start;
    let lead = Token {
        surface: lead_surface.to_string(),
        range_char: start_char..start_char + split,
        range_byte: start_byte..start_byte + lead_bytes,
        pos_tag: RELAXED_UNKNOWN_POS_TAG.to_string(),
        pos_type: PosType::Morpheme,
        lex_type: LexType::Unknown,
        morphemes: None,
        kind: TokenKind::Dictionary,
        space: token.space,
    };
    (lead, rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown(surface: &str) -> Token {
        Token {
            surface: surface.to_string(),
            range_char: 0..surface.chars().count(),
            range_byte: 0..surface.len(),
            pos_tag: "SL".to_string(),
            pos_type: PosType::Morpheme,
            lex_type: LexType::Unknown,
            morphemes: None,
            kind: TokenKind::Dictionary,
            space: false,
        }
    }

    #[test]
    fn test_find_split() {
        assert_eq!(find_split(&[unknown("aaaaaaab")], 7), Some(7));
        assert_eq!(find_split(&[unknown("aaabbbb")], 7), Some(3));
        assert_eq!(find_split(&[unknown("aaaaaaa")], 7), None);
        assert_eq!(find_split(&[unknown("aaabbb")], 7), None);
        assert_eq!(find_split(&[unknown("aaabbbb")], 0), None);
        assert_eq!(find_split(&[unknown("aaab"), unknown("bbbb")], 3), None);
    }

    #[test]
    fn test_find_split_known() {
        let mut token = unknown("aaabbbb");
        token.lex_type = LexType::Known;
        assert_eq!(find_split(&[token], 7), None);
    }

    #[test]
    fn test_split_lead() {
        let (lead, rest) = split_lead(&unknown("ㅋㅋㅋ하하하하"), 3);
        assert_eq!(lead.surface(), "ㅋㅋㅋ");
        assert_eq!(lead.range_char(), 0..3);
        assert_eq!(lead.range_byte(), 0..9);
        assert_eq!(lead.pos_tag(), "UNKNOWN");
        assert_eq!(lead.pos_type(), PosType::Morpheme);
        assert_eq!(lead.lex_type(), LexType::Unknown);
        assert!(!lead.is_space());
        assert_eq!(rest, "하하하하");
    }
}
