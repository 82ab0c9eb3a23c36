//! Tests for splitting function bodies into cells and locating functions in files.

use nbsplice::{CallableRef, Error, segment};
use pretty_assertions::assert_eq;

fn sources(code: &str) -> Vec<String> {
    segment(code, "    ")
        .unwrap()
        .into_iter()
        .map(|stmt| stmt.source)
        .collect()
}

#[test]
fn one_cell_per_statement() {
    assert_eq!(
        sources("def f(a):\n    b = a + 1\n    return b\n"),
        vec!["b = a + 1", "return b"]
    );
}

#[test]
fn compound_statements_keep_inner_indentation() {
    let code = "
def g(x):
    y = x * 2
    for i in range(3):
        if i:
            y += i
    return y
";
    assert_eq!(
        sources(code),
        vec!["y = x * 2", "for i in range(3):\n    if i:\n        y += i", "return y"]
    );
}

#[test]
fn leading_comments_and_blank_lines_travel_with_the_next_statement() {
    let code = "def g(x):
    y = x * 2

    # adjust
    y -= 1  # trailing comment
    return y
";
    assert_eq!(
        sources(code),
        vec!["y = x * 2", "\n# adjust\ny -= 1  # trailing comment", "return y"]
    );
}

#[test]
fn statements_sharing_a_line_share_a_cell() {
    assert_eq!(
        sources("def h():\n    a = 1; b = 2\n    c = 3\n"),
        vec!["a = 1; b = 2", "c = 3"]
    );
}

#[test]
fn multi_line_signature() {
    let code = "def m(
    a,
    b={'k': 1},
) -> int:
    return a + b['k']
";
    assert_eq!(sources(code), vec!["return a + b['k']"]);
}

#[test]
fn decorators_and_async() {
    assert_eq!(
        sources("@cache\nasync def d(x):\n    await x\n    return 1\n"),
        vec!["await x", "return 1"]
    );
}

#[test]
fn multi_line_expressions_are_one_cell() {
    let code = "def f():
    data = {
        'a': 1,
    }
    return data
";
    assert_eq!(sources(code), vec!["data = {\n    'a': 1,\n}", "return data"]);
}

#[test]
fn statement_line_ranges() {
    let statements = segment("def f(a):\n    b = a + 1\n\n    return b\n", "    ").unwrap();
    assert_eq!(statements[0].lines, 1..2);
    assert_eq!(statements[1].lines, 2..4);
}

#[test]
fn syntax_error_is_a_parse_error() {
    let err = segment("def broken(:\n    pass\n", "    ").unwrap_err();
    assert!(matches!(err, Error::Parse { line: 1, .. }), "{err:?}");
}

#[test]
fn source_without_a_function() {
    let err = segment("x = 1\n", "    ").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "{err:?}");
}

#[test]
fn body_on_signature_line_is_unsupported() {
    let err = segment("def f(): return 1\n", "    ").unwrap_err();
    assert!(matches!(err, Error::UnsupportedCallable { .. }), "{err:?}");
}

const MODULE: &str = "import os


@decorator
def f(a):
    b = a + 1
    return b


def g():
    pass
";

#[test]
fn locate_captures_line_ranges() {
    let callable = CallableRef::locate_in("module.py", MODULE, "f").unwrap();
    assert_eq!(callable.name(), "f");
    assert_eq!(callable.lines(), 3..7);
    assert_eq!(callable.body_lines(), 5..7);
    assert_eq!(callable.source(), "@decorator\ndef f(a):\n    b = a + 1\n    return b\n");
    assert_eq!(callable.indent(), "    ");

    let g = CallableRef::locate_in("module.py", MODULE, "g").unwrap();
    assert_eq!(g.body_lines(), 10..11);
}

#[test]
fn locate_detects_body_indentation() {
    let two = CallableRef::locate_in("m.py", "def f(x):\n  # note\n  if x:\n    y = 1\n  return x\n", "f").unwrap();
    assert_eq!(two.indent(), "  ");
    assert_eq!(
        segment(two.source(), two.indent()).unwrap().into_iter().map(|s| s.source).collect::<Vec<_>>(),
        vec!["# note\nif x:\n  y = 1", "return x"]
    );

    let tab = CallableRef::locate_in("m.py", "def f():\n\treturn 1\n", "f").unwrap();
    assert_eq!(tab.indent(), "\t");
}

#[test]
fn locate_uses_last_definition() {
    let code = "def f():\n    return 1\n\ndef f():\n    return 2\n";
    let callable = CallableRef::locate_in("m.py", code, "f").unwrap();
    assert_eq!(callable.lines(), 3..5);
}

#[test]
fn locate_ignores_methods() {
    let code = "class A:\n    def f(self):\n        return 1\n";
    let err = CallableRef::locate_in("m.py", code, "f").unwrap_err();
    assert!(matches!(err, Error::CallableNotFound { ref name, .. } if name == "f"), "{err:?}");
}

#[test]
fn locate_reads_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.py");
    std::fs::write(&path, MODULE).unwrap();
    let callable = CallableRef::locate(&path, "f").unwrap();
    assert_eq!(callable.path(), path);

    let missing = CallableRef::locate(dir.path().join("nope.py"), "f").unwrap_err();
    assert!(missing.is_not_found());
}
