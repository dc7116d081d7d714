use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;
use twentyq::config::Config;
use twentyq::knowledge_base::{KnowledgeBase, LoadError};
use twentyq::model::TreeError;
use twentyq::session::{
    self, IoConsole, Mode, Outcome, SessionError, compare, describe, guess,
};
use twentyq::tracer::Property;

const MINIMAL: &str = "(\"is it alive?\" (\"dog\") (\"rock\"))";
const ZOO: &str = "(\"is it alive?\" \
    (\"does it bark?\" (\"dog\") (\"does it fly?\" (\"kea\") (\"cat\"))) \
    (\"rock\"))";

type ScriptedConsole = IoConsole<Cursor<Vec<u8>>, Vec<u8>>;

fn scripted(answers: &str) -> ScriptedConsole {
    IoConsole::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}

fn output(console: ScriptedConsole) -> String {
    String::from_utf8(console.into_output()).unwrap()
}

fn write_data(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("data.txt");
    fs::write(&path, text).unwrap();
    path
}

// ============= Guess Tests =============

#[test]
fn test_guess_confirmed_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), MINIMAL);
    let mut kb = KnowledgeBase::open(&path, Config::default()).unwrap();
    let mut console = scripted("yes\nyes\n");

    assert_eq!(guess(&mut kb, &mut console).unwrap(), Outcome::Confirmed);
    assert_eq!(fs::read_to_string(&path).unwrap(), MINIMAL);

    let said = output(console);
    assert!(said.contains("is it alive?\n"));
    assert!(said.contains("Is it dog?\n"));
}

#[test]
fn test_guess_learns_and_saves() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), MINIMAL);
    let mut kb = KnowledgeBase::open(&path, Config::default()).unwrap();
    let mut console = scripted("no\nno\nbrick\nis it used in construction?\n1\n");

    assert_eq!(
        guess(&mut kb, &mut console).unwrap(),
        Outcome::Learned { persisted: true }
    );
    assert_eq!(
        fs::read_to_string(&path).unwrap().trim_end(),
        "(\"is it alive?\" (\"dog\") (\"is it used in construction?\" (\"brick\") (\"rock\")))"
    );

    let said = output(console);
    assert!(said.contains("What did you guess?"));
    assert!(said.contains("What is the difference between brick and rock?"));
    assert!(said.contains("Do you want to save edits in data base?"));

    // Reloading picks up the learned object
    let kb = KnowledgeBase::open(&path, Config::default()).unwrap();
    assert_eq!(kb.storage(), Some(path.as_path()));
    assert_eq!(kb.tree().leaf_labels(), vec!["dog", "brick", "rock"]);
}

#[test]
fn test_guess_learned_not_saved() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), MINIMAL);
    let mut kb = KnowledgeBase::open(&path, Config::default()).unwrap();
    let mut console = scripted("yes\nno\ncat\ndoes it meow?\nno\n");

    assert_eq!(
        guess(&mut kb, &mut console).unwrap(),
        Outcome::Learned { persisted: false }
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), MINIMAL);
    // The session's tree still learned
    assert_eq!(kb.tree().leaf_labels(), vec!["cat", "dog", "rock"]);
}

#[test]
fn test_guess_from_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.txt");
    let mut kb = KnowledgeBase::open(&path, Config::default()).unwrap();
    let mut console = scripted("no\ndog\nis it alive?\n1\n");

    assert_eq!(
        guess(&mut kb, &mut console).unwrap(),
        Outcome::Learned { persisted: true }
    );
    assert_eq!(
        fs::read_to_string(&path).unwrap().trim_end(),
        "(\"is it alive?\" (\"dog\") (\"unknown\"))"
    );
    assert!(output(console).contains("Is it unknown?"));
}

#[test]
fn test_guess_reasks_invalid_labels() {
    let mut kb = KnowledgeBase::from_text(MINIMAL, Config::default()).unwrap();
    let mut console = scripted("no\nno\n\nthe \"brick\"\nbrick\nis it used in construction?\n1\n");

    // No backing file, nothing to persist
    assert_eq!(
        guess(&mut kb, &mut console).unwrap(),
        Outcome::Learned { persisted: false }
    );
    assert_eq!(kb.tree().leaf_labels(), vec!["dog", "brick", "rock"]);
}

#[test]
fn test_guess_unknown_answer_then_quit() {
    let mut kb = KnowledgeBase::from_text(MINIMAL, Config::default()).unwrap();
    let mut console = scripted("maybe\nno\n");

    let err = guess(&mut kb, &mut console).unwrap_err();
    assert!(err.is_user_quit());
    assert!(output(console).contains("Unknown answer \"maybe\""));
}

#[test]
fn test_guess_end_of_input_quits() {
    let mut kb = KnowledgeBase::from_text(MINIMAL, Config::default()).unwrap();
    let mut console = scripted("no\nno\nbrick\n");

    assert!(matches!(
        guess(&mut kb, &mut console),
        Err(SessionError::UserQuit)
    ));
}

#[test]
fn test_guess_degenerate_node() {
    let mut kb = KnowledgeBase::in_memory(Config::default());
    let tree = kb.tree_mut();
    let leaf = tree.add_leaf("dog");
    let root = tree.add_node("is it alive?", Some(leaf), None);
    tree.set_root(root);

    let mut console = scripted("yes\n");
    assert!(matches!(
        guess(&mut kb, &mut console),
        Err(SessionError::Tree(TreeError::UnexpectedNode(i))) if i == root
    ));
}

// ============= Describe & Compare Tests =============

#[test]
fn test_describe() {
    let kb = KnowledgeBase::from_text(ZOO, Config::default()).unwrap();
    let mut console = scripted("Cat\n");

    let outcome = describe(&kb, &mut console).unwrap();
    assert_eq!(
        outcome,
        Outcome::Described {
            object: "cat".to_string(),
            properties: vec![
                Property { question: "is it alive?".into(), affirmed: true },
                Property { question: "does it bark?".into(), affirmed: false },
                Property { question: "does it fly?".into(), affirmed: false },
            ],
        }
    );
    assert!(output(console).contains("cat - is it alive?, not does it bark?, not does it fly?"));
}

#[test]
fn test_describe_not_found() {
    let kb = KnowledgeBase::from_text(ZOO, Config::default()).unwrap();
    let mut console = scripted("platypus\n");

    assert_eq!(
        describe(&kb, &mut console).unwrap(),
        Outcome::NotFound("platypus".to_string())
    );
}

#[test]
fn test_compare() {
    let kb = KnowledgeBase::from_text(ZOO, Config::default()).unwrap();
    let mut console = scripted("kea\ncat\n");

    let outcome = compare(&kb, &mut console).unwrap();
    let Outcome::Compared { first, second, contrast } = outcome else {
        panic!("expected comparison");
    };
    assert_eq!((first.as_str(), second.as_str()), ("kea", "cat"));
    assert_eq!(contrast.shared.len(), 2);

    let said = output(console);
    assert!(said.contains(
        "kea and cat are similar in that they both are: is it alive?, not does it bark?"
    ));
    assert!(said.contains("But kea is: does it fly?"));
    assert!(said.contains("And cat is: not does it fly?"));
}

#[test]
fn test_compare_not_found() {
    let kb = KnowledgeBase::from_text(ZOO, Config::default()).unwrap();
    let mut console = scripted("dog\nunicorn\n");

    assert_eq!(
        compare(&kb, &mut console).unwrap(),
        Outcome::NotFound("unicorn".to_string())
    );
}

// ============= Menu & Loading Tests =============

#[test]
fn test_choose_mode_and_print() {
    let mut kb = KnowledgeBase::from_text(MINIMAL, Config::default()).unwrap();
    let mut console = scripted("x\np\n");

    let mode = session::choose_mode(&mut console).unwrap();
    assert_eq!(mode, Mode::Print);
    assert_eq!(session::run(mode, &mut kb, &mut console).unwrap(), Outcome::Printed);

    let said = output(console);
    assert!(said.contains("Unknown mode \"x\""));
    assert!(said.contains("Knowledge tree with 2 objects (3 nodes total):"));
}

#[test]
fn test_quit_mode() {
    let mut kb = KnowledgeBase::in_memory(Config::default());
    let mut console = scripted("");
    assert!(
        session::run(Mode::Quit, &mut kb, &mut console)
            .unwrap_err()
            .is_user_quit()
    );
    assert!(session::choose_mode(&mut console).unwrap_err().is_user_quit());
}

#[test]
fn test_malformed_file_rejected_before_any_prompt() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), "(missing_quotes)");

    match KnowledgeBase::open(&path, Config::default()) {
        Err(LoadError::Parsing(e)) => assert!(e.is_invalid_syntax()),
        other => panic!("expected parsing error, got {other:?}"),
    }
}

#[test]
fn test_degenerate_file_rejected() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), "(\"is it alive?\" (\"dog\") nil)");

    assert!(matches!(
        KnowledgeBase::open(&path, Config::default()),
        Err(LoadError::Tree(TreeError::DegenerateNode(_)))
    ));
}

// ============= Menu Loop Tests =============

#[test]
fn test_play_rejects_malformed_file_before_menu() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), "(missing_quotes)");
    let mut console = scripted("g\nyes\n");

    match session::play(&path, &Config::default(), &mut console) {
        Err(SessionError::Parsing(e)) => assert!(e.is_invalid_syntax()),
        other => panic!("expected parsing error, got {other:?}"),
    }
    assert_eq!(output(console), "");
}

#[test]
fn test_play_rejects_degenerate_file_before_menu() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), "(\"is it alive?\" (\"dog\") nil)");
    let mut console = scripted("p\n");

    assert!(matches!(
        session::play(&path, &Config::default(), &mut console),
        Err(SessionError::Tree(TreeError::DegenerateNode(_)))
    ));
    assert!(!output(console).contains(session::MENU));
}

#[test]
fn test_play_reloads_between_rounds() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), MINIMAL);
    // Learn without saving, then print
    let mut console = scripted("g\nno\nno\nbrick\nis it used in construction?\nno\np\nq\n");

    session::play(&path, &Config::default(), &mut console).unwrap();

    let said = output(console);
    assert!(said.starts_with(session::MENU));
    assert!(said.contains("Knowledge tree with 2 objects (3 nodes total):"));
    assert!(!said.contains("\"brick\""));
    assert!(said.ends_with("Bye Bye\n"));
    assert_eq!(fs::read_to_string(&path).unwrap(), MINIMAL);
}

#[test]
fn test_play_refuses_split_below_depth_limit() {
    let dir = tempdir().unwrap();
    let path = write_data(dir.path(), MINIMAL);
    let config = Config {
        max_depth: 2,
        ..Config::default()
    };
    let mut console = scripted("g\nyes\nno\nkea\ncan it fly?\n");

    // End of input leaves the menu like quitting
    session::play(&path, &config, &mut console).unwrap();

    let said = output(console);
    assert!(said.contains("Cannot learn any more objects there"));
    assert!(said.ends_with("Bye Bye\n"));
    assert_eq!(fs::read_to_string(&path).unwrap(), MINIMAL);
}
