use html5gum_lite::{Doctype, EndTag, Error, StartTag, Token, Tokenizer};
use pretty_assertions::assert_eq;

fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}

fn strip_errors(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::Error(_)))
        .collect()
}

#[test]
fn empty_input_is_just_eof() {
    assert_eq!(tokenize(""), vec![]);
}

#[test]
fn unterminated_tag_open_emits_literal_character() {
    let tokens = strip_errors(tokenize("<"));
    assert_eq!(tokens, vec![Token::String("<".to_owned())]);
    assert!(tokenize("<").contains(&Token::Error(Error::EofBeforeTagName)));
}

#[test]
fn unterminated_end_tag_open_emits_literal_characters() {
    let tokens = strip_errors(tokenize("</"));
    assert_eq!(tokens, vec![Token::String("</".to_owned())]);
}

#[test]
fn doctype_html_is_recognized() {
    let tokens = strip_errors(tokenize("<!DOCTYPE html>"));
    assert_eq!(
        tokens,
        vec![Token::Doctype(Doctype {
            force_quirks: false,
            name: "html".to_owned(),
            public_identifier: None,
            system_identifier: None,
        })]
    );
}

#[test]
fn doctype_keyword_and_name_are_case_insensitive() {
    assert_eq!(
        strip_errors(tokenize("<!DOCTYPE html>")),
        strip_errors(tokenize("<!doctype HTML>"))
    );
}

#[test]
fn doctype_without_name_sets_force_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    assert!(tokens.contains(&Token::Error(Error::MissingDoctypeName)));
    assert!(strip_errors(tokens).contains(&Token::Doctype(Doctype {
        force_quirks: true,
        name: String::new(),
        public_identifier: None,
        system_identifier: None,
    })));
}

#[test]
fn plain_character_passes_through() {
    assert_eq!(
        strip_errors(tokenize("a")),
        vec![Token::String("a".to_owned())]
    );
}

#[test]
fn start_tag_name_is_lowercased() {
    let tokens = strip_errors(tokenize("<P>"));
    assert_eq!(
        tokens,
        vec![Token::StartTag(StartTag {
            self_closing: false,
            name: "p".to_owned(),
            attributes: vec![],
        })]
    );
}

#[test]
fn null_byte_in_tag_name_is_replaced_and_flagged() {
    let tokens = tokenize("<p\0>");
    assert!(tokens.contains(&Token::Error(Error::UnexpectedNullCharacter)));
    assert!(strip_errors(tokens).contains(&Token::StartTag(StartTag {
        self_closing: false,
        name: "p\u{fffd}".to_owned(),
        attributes: vec![],
    })));
}

#[test]
fn end_tag_is_lowercased() {
    assert_eq!(
        strip_errors(tokenize("</Html>")),
        vec![Token::EndTag(EndTag {
            name: "html".to_owned(),
        })]
    );
}

#[test]
fn adjacent_start_tags_are_both_emitted() {
    let tags: Vec<String> = strip_errors(tokenize("<a><b>"))
        .into_iter()
        .map(|t| match t {
            Token::StartTag(tag) => tag.name,
            _ => panic!("unexpected token"),
        })
        .collect();
    assert_eq!(tags, vec!["a".to_owned(), "b".to_owned()]);
}

#[test]
fn eof_inside_doctype_still_emits_force_quirks_doctype() {
    let tokens = tokenize("<!DOCTYPE");
    assert!(tokens.contains(&Token::Error(Error::EofInDoctype)));
    assert!(strip_errors(tokens).contains(&Token::Doctype(Doctype {
        force_quirks: true,
        name: String::new(),
        public_identifier: None,
        system_identifier: None,
    })));
}

#[test]
fn attribute_order_and_duplicates() {
    let tokens = strip_errors(tokenize(r#"<a href="/x" class="y" href="/z">"#));
    assert_eq!(
        tokens,
        vec![Token::StartTag(StartTag {
            self_closing: false,
            name: "a".to_owned(),
            attributes: vec![
                ("href".to_owned(), "/x".to_owned()),
                ("class".to_owned(), "y".to_owned()),
            ],
        })]
    );
}

#[test]
fn comments_are_captured() {
    assert_eq!(
        strip_errors(tokenize("<!-- hi -->")),
        vec![Token::Comment(" hi ".to_owned())]
    );
}

#[test]
fn named_character_reference_is_expanded() {
    assert_eq!(
        strip_errors(tokenize("a &amp; b")),
        vec![Token::String("a & b".to_owned())]
    );
}

#[test]
fn unterminated_reference_followed_by_alnum_is_not_expanded_in_attribute_value() {
    // "missing-semicolon-after-character-reference" flush path: `&amp` is a legal match without
    // the trailing `;`, but since it's immediately followed by an alphanumeric inside an
    // attribute value, the whole thing is flushed back out literally instead of being expanded.
    let tokens = strip_errors(tokenize(r#"<a b="&ampx">"#));
    assert_eq!(
        tokens,
        vec![Token::StartTag(StartTag {
            self_closing: false,
            name: "a".to_owned(),
            attributes: vec![("b".to_owned(), "&ampx".to_owned())],
        })]
    );
}

#[test]
fn numeric_character_reference_is_decoded() {
    assert_eq!(
        strip_errors(tokenize("&#65;")),
        vec![Token::String("A".to_owned())]
    );
}

#[test]
fn hex_character_reference_is_decoded() {
    assert_eq!(
        strip_errors(tokenize("&#x41;")),
        vec![Token::String("A".to_owned())]
    );
}

#[test]
fn script_data_is_not_tag_soup_by_default() {
    // without a tree builder telling the tokenizer it is inside a <script>, `</div>` inside
    // script text is parsed as a real end tag -- this is the documented tradeoff of running
    // the tokenizer standalone.
    let tokens = strip_errors(tokenize("<script>1 < 2</script>"));
    assert!(tokens
        .iter()
        .any(|t| matches!(t, Token::StartTag(tag) if tag.name == "script")));
}
