//! Language Integration Tests
//!
//! End-to-end runs through lexer, parser, compiler and VM, plus the program
//! files under tests/programs/.

use std::io::Write;
use std::path::PathBuf;

use tinyc_engine::{AsyncEngine, Config, Engine, Error};

fn program_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("programs")
        .join(name)
}

/// Run a program and render its report
fn run(source: &str) -> String {
    Engine::new()
        .eval(source)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", source, e))
        .to_string()
}

// Reference scenarios

#[test]
fn test_single_assignment() {
    assert_eq!(run("a=1;%"), "a = 1\n");
}

#[test]
fn test_while_loop_counts_up() {
    assert_eq!(run("i=1; while (i<5) { i=i+1; } %"), "i = 5\n");
}

#[test]
fn test_while_loop_sum() {
    assert_eq!(
        run("i=1; s=0; while (i<10) { s=s+i; i=i+1; } %"),
        "i = 10\ns = 45\n"
    );
}

#[test]
fn test_if_else() {
    assert_eq!(
        run("a=1; if (a<2) { b=1; } else { b=2; } %"),
        "a = 1\nb = 1\n"
    );
}

#[test]
fn test_do_while() {
    assert_eq!(run("i=0; do { i=i+1; } while (i<3); %"), "i = 3\n");
}

#[test]
fn test_multi_letter_word_is_lexical_error() {
    let err = Engine::new().eval("ab=1;%").unwrap_err();
    assert!(err.is_lexical(), "got {:?}", err);
}

// Properties

#[test]
fn test_runs_are_deterministic() {
    let source = "i=1; s=0; while (i<100) { s=s+i; i=i+1; } %";
    let engine = Engine::new();
    let first = engine.eval(source).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.eval(source).unwrap(), first);
    }
}

#[test]
fn test_sequence_order() {
    assert_eq!(run("a = 1; a = a + a; a = a - 3; %"), "a = -1\n");
}

#[test]
fn test_chained_assignment() {
    assert_eq!(run("a = b = 5; %"), "a = 5\nb = 5\n");
}

#[test]
fn test_chained_comparison_is_syntax_error() {
    let err = Engine::new().eval("a = 1 < 2 < 3; %").unwrap_err();
    assert!(err.is_syntax(), "got {:?}", err);
}

#[test]
fn test_zero_variables_are_not_reported() {
    assert_eq!(run("a = 5; a = a - 5; b = 0; %"), "");
}

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(run("I = 0; WHILE (i < 2) i = I + 1; %"), "i = 2\n");
}

#[test]
fn test_missing_sentinel_is_end_of_input() {
    assert_eq!(run("a = 2;"), "a = 2\n");
}

#[test]
fn test_text_after_sentinel_is_ignored() {
    assert_eq!(run("a = 2; % this is not a program ###"), "a = 2\n");
}

#[test]
fn test_first_error_wins() {
    // The lexical error comes first in source order
    let err = Engine::new().eval("a = 1 # b = ;").unwrap_err();
    assert!(err.is_lexical());

    let err = Engine::new().eval("a = ; #").unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_error_spans_point_at_source() {
    let source = "a = 1;\nb = 2 c;";
    let err = Engine::new().eval(source).unwrap_err();
    let span = err.span().unwrap();
    assert_eq!(&source[span.start..span.end], "c");
}

#[test]
fn test_nested_loops() {
    let source = "
        i = 0;
        while (i < 3) {
            j = 0;
            while (j < 4) { n = n + 1; j = j + 1; }
            i = i + 1;
        }
        %";
    assert_eq!(run(source), "i = 3\nj = 4\nn = 12\n");
}

#[test]
fn test_deep_nesting_is_rejected_not_crashed() {
    let source = format!("{}a = 1;{}", "{".repeat(10_000), "}".repeat(10_000));
    let err = Engine::new().eval(&source).unwrap_err();
    assert!(err.is_syntax());
    assert!(err.to_string().contains("nesting too deep"));

    let source = format!("a = {}1{};", "(".repeat(10_000), ")".repeat(10_000));
    assert!(Engine::new().eval(&source).unwrap_err().is_syntax());
}

#[test]
fn test_max_depth_is_configurable() {
    let source = format!("{}a = 1;{}", "{".repeat(300), "}".repeat(300));
    assert!(Engine::new().eval(&source).is_err());

    let engine = Engine::with_config(Config {
        max_depth: 1_000,
        ..Config::default()
    });
    assert_eq!(engine.eval(&source).unwrap().to_string(), "a = 1\n");
}

#[test]
fn test_step_limit_stops_infinite_loop() {
    let engine = Engine::with_config(Config {
        max_steps: Some(10_000),
        ..Config::default()
    });
    let err = engine.eval("while (1) a = a + 1; %").unwrap_err();
    assert!(matches!(err, Error::Runtime(_)));
}

// Program files

#[test]
fn test_program_files() {
    let engine = Engine::new();
    let cases = [
        ("sum.tc", "i = 10\ns = 45\n"),
        ("countdown.tc", "c = 5\n"),
        ("branches.tc", "a = 1\nb = 1\nc = 3\n"),
    ];
    for (name, expected) in cases {
        let report = engine.eval_file(program_path(name)).unwrap();
        assert_eq!(report.to_string(), expected, "{}", name);
    }
}

#[test]
fn test_program_file_with_error() {
    let err = Engine::new()
        .eval_file(program_path("bad_word.tc"))
        .unwrap_err();
    assert!(err.is_lexical());
}

#[test]
fn test_eval_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "x = 40; x = x + 2; %").unwrap();
    let report = Engine::new().eval_file(file.path()).unwrap();
    assert_eq!(report.value_of('x'), Some(42));
}

#[tokio::test]
async fn test_async_eval_program_files() {
    let engine = AsyncEngine::new();

    let report = engine.eval_file(program_path("sum.tc")).await.unwrap();
    assert_eq!(report.to_string(), "i = 10\ns = 45\n");

    let err = engine.eval_file(program_path("bad_word.tc")).await.unwrap_err();
    assert!(err.is_lexical());
}

#[tokio::test]
async fn test_async_compile_file_matches_engine() {
    let engine = AsyncEngine::new();
    let path = program_path("countdown.tc");

    let bytecode = engine.compile_file(&path).await.unwrap();
    let source = std::fs::read_to_string(&path).unwrap();
    assert_eq!(bytecode, Engine::new().compile(&source).unwrap());
}
