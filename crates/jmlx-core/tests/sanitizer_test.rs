//! Integration tests for activating modeling comments lexed from source

use jmlx_core::lexer::lex;
use jmlx_core::position::Position;
use jmlx_core::token::AngleSplit;
use jmlx_core::{JavaToken, Sanitizer};

const SOURCE: &str = "class A {
    //@ requires x > 0;
    /*@ ensures \\result >= 0;
      @ pure */
    int f(int x) { return x; }
    //+debug@ assert x != 3;
    // @ not modeling
}
";

fn modeling_tokens(source: &str) -> Vec<JavaToken> {
    let (raws, errors) = lex(source);
    assert!(errors.is_empty(), "{errors:?}");
    raws.iter()
        .filter(|raw| raw.kind.is_modeling_comment())
        .map(|raw| JavaToken::from_raw(raw, AngleSplit::Whole).unwrap())
        .collect()
}

#[test]
fn keeps_every_character_in_place() {
    let tokens = modeling_tokens(SOURCE);
    let text = Sanitizer::default().sanitize_tokens(&tokens).unwrap();

    assert_eq!(text.char_at(Position::new(2, 5)), Some(' '));
    assert_eq!(text.char_at(Position::new(2, 9)), Some('r'));
    assert_eq!(text.char_at(Position::new(3, 9)), Some('e'));
    assert_eq!(text.char_at(Position::new(3, 17)), Some('\\'));
    assert_eq!(text.char_at(Position::new(4, 7)), Some(' '));
    assert_eq!(text.char_at(Position::new(4, 9)), Some('p'));
    assert!(!text.text().contains("*/"));
    assert!(!text.text().contains("not modeling"));
}

#[test]
fn tagged_comments_follow_the_keys() {
    let tokens = modeling_tokens(SOURCE);

    let plain = Sanitizer::default().sanitize_tokens(&tokens).unwrap();
    assert!(!plain.text().contains("assert"));

    let debug = Sanitizer::new(["DEBUG"]).sanitize_tokens(&tokens).unwrap();
    assert_eq!(debug.char_at(Position::new(6, 15)), Some('a'));
    assert!(debug.text().contains("assert x != 3;"));
}

#[test]
fn excluded_keys_switch_comments_off() {
    let source = "//-esc@ assert a;\n//+esc-debug@ assert b;\n";
    let tokens = modeling_tokens(source);

    let none = Sanitizer::default().sanitize_tokens(&tokens).unwrap();
    assert!(none.text().contains("assert a;"));
    assert!(!none.text().contains("assert b;"));

    let esc = Sanitizer::new(["esc"]).sanitize_tokens(&tokens).unwrap();
    assert!(!esc.text().contains("assert a;"));
    assert!(esc.text().contains("assert b;"));

    let both = Sanitizer::new(["esc", "debug"]).sanitize_tokens(&tokens).unwrap();
    assert!(both.is_blank());
}
