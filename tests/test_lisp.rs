use std::fs;
use tempfile::tempdir;
use twentyq::config::Config;
use twentyq::lisp::{self, LispParser, LispWriter, Traversal, parse_str, to_lisp};
use twentyq::model::TreeError;
use twentyq::parser::{ByteParser, ParsingErrorType};

const ANIMALS: &str = "(\"is it alive?\" (\"does it bark?\" (\"dog\") (\"cat\")) (\"rock\"))";

#[test]
fn test_basic_tree() {
    let tree = parse_str(ANIMALS).unwrap();

    assert_eq!(tree.num_nodes(), 5);
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.root().label(), "is it alive?");
    assert_eq!(tree.leaf_labels(), vec!["dog", "cat", "rock"]);

    let bark = &tree[tree.root().left().unwrap()];
    assert_eq!(bark.label(), "does it bark?");
    assert!(bark.is_internal());
    assert!(tree.verify().is_ok());
}

#[test]
fn test_leaf_forms_are_equivalent() {
    let compact = parse_str(ANIMALS).unwrap();
    let explicit = parse_str(
        "(\"is it alive?\"\n  (\"does it bark?\" (\"dog\" nil nil) (\"cat\" NIL nil))\n  (\"rock\" nil nil))",
    )
    .unwrap();
    assert!(compact.same_shape(&explicit));
}

#[test]
fn test_round_trip() {
    let tree = parse_str(ANIMALS).unwrap();

    let compact = LispWriter::new(Traversal::Prefix).with_compact_leaves(true);
    assert_eq!(compact.write(&tree), ANIMALS);

    let explicit = to_lisp(&tree, Traversal::Prefix);
    assert!(parse_str(&explicit).unwrap().same_shape(&tree));
}

#[test]
fn test_labels_taken_verbatim() {
    let tree = parse_str("(\"  spaces (and) nil  \")").unwrap();
    assert_eq!(tree.root().label(), "  spaces (and) nil  ");

    let tree = parse_str("(\"\")").unwrap();
    assert_eq!(tree.root().label(), "");
}

#[test]
fn test_empty_input_gives_placeholder() {
    for input in ["", "   \n\t", "nil", " nil \n"] {
        let tree = parse_str(input).unwrap();
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.root().label(), "unknown");
    }
}

#[test]
fn test_configured_placeholder() {
    let parser = LispParser::new().with_placeholder_label("something".to_string());
    let tree = parser.parse_tree(&mut ByteParser::for_str("")).unwrap();
    assert_eq!(tree.root().label(), "something");
}

#[test]
fn test_missing_quotes() {
    let err = parse_str("(missing_quotes)").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::MissingOpeningQuote);
    assert_eq!(err.position(), 1);
    assert!(err.is_invalid_syntax());
}

#[test]
fn test_unterminated_label() {
    let err = parse_str("(\"never closed)").unwrap_err();
    assert!(err.is_invalid_syntax());

    let long = format!("(\"{}\")", "a".repeat(150));
    let err = parse_str(&long).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnterminatedLabel(100));

    let parser = LispParser::new().with_max_label_len(200);
    assert!(parser.parse_tree(&mut ByteParser::for_str(&long)).is_ok());
}

#[test]
fn test_trailing_input() {
    let err = parse_str("(\"a\") (\"b\")").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::TrailingInput);
}

#[test]
fn test_unexpected_token() {
    let err = parse_str("(\"q\" (\"a\") null)").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnexpectedToken("null".to_string()));
}

/// Text of a chain whose innermost leaf is nested `depth` nodes below the root.
fn chain(depth: usize) -> String {
    let mut text = String::new();
    for _ in 0..depth {
        text.push_str("(\"q\" ");
    }
    text.push_str("(\"leaf\")");
    for _ in 0..depth {
        text.push_str(" (\"other\"))");
    }
    text
}

#[test]
fn test_deepest_accepted_nesting() {
    let depth = lisp::DEFAULT_MAX_DEPTH - 1;
    let text = chain(depth);

    let mut tree = parse_str(&text).unwrap();
    assert_eq!(tree.height(), depth);
    assert_eq!(tree.num_leaves(), depth + 1);
    assert!(tree.verify().is_ok());

    let compact = LispWriter::new(Traversal::Prefix).with_compact_leaves(true);
    assert_eq!(compact.write(&tree), text);
    let explicit = to_lisp(&tree, Traversal::Prefix);
    assert!(parse_str(&explicit).unwrap().same_shape(&tree));
    assert!(to_lisp(&tree, Traversal::Postfix).ends_with("\"q\")"));

    // The tree read carries the limit it was read with
    let leaf = tree.pre_order_iter().find(|n| n.label() == "leaf").unwrap().index();
    assert_eq!(
        tree.split(leaf, "kea", "can it fly?"),
        Err(TreeError::DepthExceeded(leaf, lisp::DEFAULT_MAX_DEPTH))
    );
}

#[test]
fn test_deep_nesting_rejected() {
    let err = parse_str(&chain(lisp::DEFAULT_MAX_DEPTH)).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::NestingTooDeep(lisp::DEFAULT_MAX_DEPTH));

    let parser = LispParser::new().with_max_depth(256);
    let err = parser.parse_tree(&mut ByteParser::for_str(&chain(10_000))).unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::NestingTooDeep(256));
    assert_eq!(err.position(), 256 * "(\"q\" ".len());
}

#[test]
fn test_degenerate_node_parses_but_fails_verify() {
    let tree = parse_str("(\"q\" (\"a\") nil)").unwrap();
    assert!(tree.verify().is_err());
}

#[test]
fn test_read_missing_file_gives_placeholder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");

    let tree = lisp::read_file(&path, &Config::default()).unwrap();
    assert_eq!(tree.num_nodes(), 1);
    assert_eq!(tree.root().label(), "unknown");
    assert!(!path.exists());

    let err = lisp::parse_file(&path, &Config::default()).unwrap_err();
    assert!(!err.is_invalid_syntax());
}

#[test]
fn test_write_and_read_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    let tree = parse_str(ANIMALS).unwrap();

    lisp::write_file(&path, &tree, &Config::default()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().trim_end(), ANIMALS);

    let reread = lisp::parse_file(&path, &Config::default()).unwrap();
    assert!(reread.same_shape(&tree));

    let explicit = Config {
        compact_leaves: false,
        ..Config::default()
    };
    lisp::write_file(&path, &tree, &explicit).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("(\"dog\" nil nil)"));
}
