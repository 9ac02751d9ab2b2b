use std::sync::Arc;

use crate::dictionary::{SystemDictionaryBuilder, UserDictionary, UserEntryParams};
use crate::token::{LexType, PosType, Token, TokenKind};
use crate::{Analyzer, Dictionary, Tokenizer};

const LEX_CSV: &str = include_str!("./tests/resources/lex.csv");
const MATRIX_DEF: &str = include_str!("./tests/resources/matrix.def");
const CHAR_DEF: &str = include_str!("./tests/resources/char.def");
const UNK_DEF: &str = include_str!("./tests/resources/unk.def");

fn build_dictionary() -> Dictionary {
    SystemDictionaryBuilder::from_readers(
        LEX_CSV.as_bytes(),
        MATRIX_DEF.as_bytes(),
        CHAR_DEF.as_bytes(),
        UNK_DEF.as_bytes(),
    )
    .unwrap()
}

fn user_params() -> UserEntryParams {
    UserEntryParams {
        left_id: 1,
        right_id: 1,
        right_id_coda: 22,
        right_id_no_coda: 23,
        word_cost: -10000,
        pos_tag: "NNG".to_string(),
    }
}

fn tokenize(tokenizer: &Tokenizer, input: &str) -> Vec<Token> {
    let mut worker = tokenizer.new_worker();
    worker.reset_sentence(input);
    worker.tokenize();
    worker.tokens().to_vec()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|&(s, t)| (s.to_string(), t.to_string()))
        .collect()
}

#[track_caller]
fn assert_span_coverage(input: &str, tokens: &[Token]) {
    let mut pos_char = 0;
    let mut pos_byte = 0;
    for t in tokens {
        assert_eq!(t.range_char().start, pos_char, "gap before {t}");
        assert_eq!(t.range_byte().start, pos_byte, "gap before {t}");
        assert_eq!(&input[t.range_byte()], t.surface());
        pos_char = t.range_char().end;
        pos_byte = t.range_byte().end;
    }
    assert_eq!(pos_char, input.chars().count());
    assert_eq!(pos_byte, input.len());
}

#[test]
fn test_morphs() {
    let mut analyzer = Analyzer::new(Tokenizer::new(build_dictionary()));
    assert_eq!(
        analyzer.morphs("아버지가방에들어가시다", false),
        vec!["아버지", "가", "방", "에", "들어가", "시", "다"]
    );
}

#[test]
fn test_pos() {
    let mut analyzer = Analyzer::new(Tokenizer::new(build_dictionary()));
    assert_eq!(
        analyzer.pos("이것은 문장입니다.", true),
        pairs(&[
            ("이것", "NP"),
            ("은", "JX"),
            ("문장", "NNG"),
            ("입니다", "VCP+EF"),
            (".", "SF"),
        ])
    );
    assert_eq!(
        analyzer.pos("이것은 문장입니다.", false),
        pairs(&[
            ("이것", "NP"),
            ("은", "JX"),
            (" ", "SP"),
            ("문장", "NNG"),
            ("입니다", "VCP+EF"),
            (".", "SF"),
        ])
    );
    assert_eq!(analyzer.nouns("이것은 문장입니다.", true), vec!["이것", "문장"]);
}

#[test]
fn test_token_attributes() {
    let tokenizer = Tokenizer::new(build_dictionary());
    let tokens = tokenize(&tokenizer, "이것은 문장입니다.");

    let space = &tokens[2];
    assert_eq!(space.range_char(), 3..4);
    assert_eq!(space.range_byte(), 9..10);
    assert_eq!(space.lex_type(), LexType::Unknown);
    assert!(space.is_space());

    let inflect = &tokens[4];
    assert_eq!(inflect.surface(), "입니다");
    assert_eq!(inflect.range_char(), 6..9);
    assert_eq!(inflect.range_byte(), 16..25);
    assert_eq!(inflect.pos_type(), PosType::Inflect);
    assert_eq!(inflect.lex_type(), LexType::Known);
    assert_eq!(inflect.kind(), TokenKind::Dictionary);
    let morphemes: Vec<_> = inflect
        .morphemes()
        .unwrap()
        .iter()
        .map(|m| (m.surface(), m.pos_tag()))
        .collect();
    assert_eq!(morphemes, vec![("이", "VCP"), ("ㅂ니다", "EF")]);
    assert_eq!((inflect.pos_incr(), inflect.pos_len()), (1, 1));
    assert_eq!(inflect.to_string(), "입니다\tVCP+EF");
}

#[test]
fn test_user_dictionary() {
    let user_dict =
        UserDictionary::with_params(["삼성디지털프라자", "지펠냉장고"], user_params()).unwrap();
    let tokenizer = Tokenizer::new(build_dictionary())
        .with_user_dictionary(user_dict)
        .unwrap();
    let mut analyzer = Analyzer::new(tokenizer);

    assert_eq!(
        analyzer.pos("저는 삼성디지털프라자에서 지펠냉장고를 샀어요.", true),
        pairs(&[
            ("저", "NP"),
            ("는", "JX"),
            ("삼성디지털프라자", "NNG"),
            ("에서", "JKB"),
            ("지펠냉장고", "NNG"),
            ("를", "JKO"),
            ("샀", "VV+EP"),
            ("어요", "EF"),
            (".", "SF"),
        ])
    );
    let tokens = analyzer.tokenize("저는 삼성디지털프라자에서 지펠냉장고를 샀어요.");
    assert_eq!(tokens[3].lex_type(), LexType::User);
    assert_eq!(tokens[3].range_char(), 3..11);
}

#[test]
fn test_without_user_dictionary() {
    let mut analyzer = Analyzer::new(Tokenizer::new(build_dictionary()));
    let morphs = analyzer.morphs("저는 삼성디지털프라자에서", true);
    assert_eq!(&morphs[..4], &["저", "는", "삼성", "디지털"]);
    assert!(!morphs.contains(&"삼성디지털프라자".to_string()));
}

#[test]
fn test_user_entry_beats_system_entry() {
    let user_dict = UserDictionary::with_params(["가방"], user_params()).unwrap();
    let tokenizer = Tokenizer::new(build_dictionary())
        .with_user_dictionary(user_dict)
        .unwrap();
    let tokens = tokenize(&tokenizer, "아버지가방에");
    let result: Vec<_> = tokens.iter().map(|t| (t.surface(), t.lex_type())).collect();
    assert_eq!(
        result,
        vec![
            ("아버지", LexType::Known),
            ("가방", LexType::User),
            ("에", LexType::Known),
        ]
    );
}

#[test]
fn test_user_dictionary_invalid_ids() {
    // The default ids are out of range of the test matrix.
    let result = Tokenizer::new(build_dictionary()).user_dictionary(["가방"]);
    assert!(result.is_err());
}

#[test]
fn test_split_compound() {
    let tokenizer = Tokenizer::new(build_dictionary()).split_compound(true);
    let tokens = tokenize(&tokenizer, "가벼운 냉장고를 샀어요.");
    let result: Vec<_> = tokens
        .iter()
        .filter(|t| !t.is_space())
        .map(|t| (t.surface(), t.range_char()))
        .collect();
    assert_eq!(
        result,
        vec![
            ("가볍", 0..3),
            ("ᆫ", 0..3),
            ("냉장", 4..6),
            ("고", 6..7),
            ("를", 7..8),
            ("사", 9..10),
            ("ㅏㅆ", 9..10),
            ("어요", 10..12),
            (".", 12..13),
        ]
    );

    let compound_part = &tokens[3];
    assert_eq!(compound_part.surface(), "냉장");
    assert_eq!(compound_part.range_byte(), 10..16);
    assert_eq!(compound_part.pos_tag(), "NNG");
    assert_eq!(compound_part.pos_type(), PosType::Morpheme);
    assert_eq!(compound_part.lex_type(), LexType::Known);
    assert_eq!(compound_part.kind(), TokenKind::Decompound);
    assert_eq!(compound_part.morphemes(), None);
}

#[test]
fn test_split_inflect_shares_parent_span() {
    let tokenizer = Tokenizer::new(build_dictionary()).split_compound(true);
    let tokens = tokenize(&tokenizer, "샀어요");
    assert_eq!(tokens[0].surface(), "사");
    assert_eq!(tokens[1].surface(), "ㅏㅆ");
    assert_eq!(tokens[0].range_byte(), 0..3);
    assert_eq!(tokens[1].range_byte(), 0..3);
    assert_eq!(tokens[1].pos_tag(), "EP");
}

#[test]
fn test_no_split_by_default() {
    let mut analyzer = Analyzer::new(Tokenizer::new(build_dictionary()));
    assert_eq!(
        analyzer.morphs("가벼운 냉장고를 샀어요.", true),
        vec!["가벼운", "냉장고", "를", "샀", "어요", "."]
    );
}

#[test]
fn test_span_coverage() {
    let tokenizer = Tokenizer::new(build_dictionary());
    for input in [
        "아버지가방에들어가시다",
        "이것은 문장입니다.",
        "저는 삼성디지털프라자에서 지펠냉장고를 샀어요.",
        "  앞뒤  공백  ",
        "2024년\tabc!?",
        "가방\u{7}에",
        "ㅋㅋㅋ 😀😀",
    ] {
        assert_span_coverage(input, &tokenize(&tokenizer, input));
    }

    let tokenizer = tokenizer.split_compound(false).unknown_unigrams(false);
    for input in ["aaaaaaab", "   ", "문장   "] {
        assert_span_coverage(input, &tokenize(&tokenizer, input));
    }
}

#[test]
fn test_unclassifiable_character() {
    let tokenizer = Tokenizer::new(build_dictionary());
    let tokens = tokenize(&tokenizer, "가방\u{7}에");
    let result: Vec<_> = tokens.iter().map(|t| (t.surface(), t.pos_tag())).collect();
    assert_eq!(
        result,
        vec![("가", "JKS"), ("방", "NNG"), ("\u{7}", "SP"), ("에", "JKB")]
    );
    assert!(tokens[2].is_space());

    let mut analyzer = Analyzer::new(tokenizer);
    assert_eq!(
        analyzer.pos("가방\u{7}에", true),
        pairs(&[("가", "JKS"), ("방", "NNG"), ("에", "JKB")])
    );
    assert_eq!(analyzer.morphs("\u{7}\u{7}", true), Vec::<String>::new());
}

#[test]
fn test_unknown_words() {
    let mut analyzer = Analyzer::new(Tokenizer::new(build_dictionary()));
    assert_eq!(
        analyzer.pos("abc", false),
        pairs(&[("a", "SL"), ("b", "SL"), ("c", "SL")])
    );
    assert_eq!(
        analyzer.pos("2024년", false),
        pairs(&[
            ("2", "SN"),
            ("0", "SN"),
            ("2", "SN"),
            ("4", "SN"),
            ("년", "UNKNOWN"),
        ])
    );

    let tokenizer = Tokenizer::new(build_dictionary()).unknown_unigrams(false);
    let tokens = tokenize(&tokenizer, "abc");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].surface(), "abc");
    assert_eq!(tokens[0].lex_type(), LexType::Unknown);
}

#[test]
fn test_relax_long_unknown() {
    let tokenizer = Tokenizer::new(build_dictionary()).unknown_unigrams(false);
    let tokens = tokenize(&tokenizer, "aaaaaaab");
    let result: Vec<_> = tokens
        .iter()
        .map(|t| (t.surface(), t.pos_tag(), t.range_char()))
        .collect();
    assert_eq!(result, vec![("aaaaaaa", "UNKNOWN", 0..7), ("b", "SL", 7..8)]);

    let tokens = tokenize(&tokenizer, &"a".repeat(20));
    assert_eq!(tokens.len(), 1);
}

#[test]
fn test_spaces() {
    let tokenizer = Tokenizer::new(build_dictionary());
    assert!(tokenize(&tokenizer, "").is_empty());

    let tokens = tokenize(&tokenizer, "문장   ");
    let result: Vec<_> = tokens.iter().map(|t| (t.surface(), t.pos_tag())).collect();
    assert_eq!(
        result,
        vec![("문장", "NNG"), (" ", "SP"), (" ", "SP"), (" ", "SP")]
    );

    let tokens = tokenize(&tokenizer, "   ");
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| t.is_space() && t.pos_tag() == "SP"));

    let tokenizer = tokenizer.unknown_unigrams(false);
    let tokens = tokenize(&tokenizer, "   ");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].range_char(), 0..3);
}

#[test]
fn test_long_input() {
    let tokenizer = Tokenizer::new(build_dictionary());
    let input = "이것은 문장입니다. ".repeat(100);
    let tokens = tokenize(&tokenizer, &input);
    assert_span_coverage(&input, &tokens);
    assert_eq!(tokens.iter().filter(|t| t.surface() == "입니다").count(), 100);

    // A long unknown word keeps many positions alive at once.
    let input = "a".repeat(100);
    let tokens = tokenize(&tokenizer, &input);
    assert_eq!(tokens.len(), 100);
    assert_span_coverage(&input, &tokens);
}

#[test]
fn test_determinism() {
    let dict = Arc::new(build_dictionary());
    let input = "저는 삼성디지털프라자에서 지펠냉장고를 샀어요.";
    let first = tokenize(&Tokenizer::from_shared_dictionary(dict.clone()), input);
    let second = tokenize(&Tokenizer::from_shared_dictionary(dict), input);
    assert_eq!(first, second);

    let mut worker = Tokenizer::new(build_dictionary()).new_worker();
    worker.reset_sentence("가벼운 냉장고");
    worker.tokenize();
    worker.reset_sentence(input);
    worker.tokenize();
    assert_eq!(worker.tokens(), first.as_slice());
}

#[test]
fn test_serialized_dictionary() {
    let dict = build_dictionary();
    let mut buffer = vec![];
    dict.write(&mut buffer).unwrap();
    let restored = Dictionary::read(buffer.as_slice()).unwrap();

    let input = "가벼운 냉장고를 샀어요.";
    let expected = tokenize(&Tokenizer::new(dict).split_compound(true), input);
    let actual = tokenize(&Tokenizer::new(restored).split_compound(true), input);
    assert_eq!(expected, actual);
}
