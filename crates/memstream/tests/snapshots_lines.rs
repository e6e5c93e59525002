#![expect(missing_docs)]

use core::fmt::Write;

use memstream::{Separator, StringStream};

fn render_lines(input: &str, sep: Separator<'_>, limit: Option<i64>) -> String {
    let mut stream = StringStream::with_buffer(input);
    let mut out = String::new();
    while let Some(line) = stream.getline(sep, limit).expect("getline failed") {
        writeln!(out, "{} {} {:?}", stream.lineno(), stream.pos(), line).unwrap();
    }
    out
}

#[test]
fn snapshot_paragraphs() {
    let input = "\n\nfirst para\nstill first\n\n\n\nsecond\n\nthird";
    insta::assert_snapshot!(render_lines(input, Separator::Paragraph, None), @r#"
    1 26 "first para\nstill first\n\n"
    2 36 "second\n\n"
    3 41 "third"
    "#);
}

#[test]
fn snapshot_multi_byte_separator_with_limit() {
    insta::assert_snapshot!(render_lines("ab\r\ncdefg\r\n", "\r\n".into(), Some(4)), @r#"
    1 4 "ab\r\n"
    2 8 "cdef"
    3 11 "g\r\n"
    "#);
}

#[test]
fn snapshot_separator_as_long_as_the_rest() {
    insta::assert_snapshot!(render_lines("a--b-", "--".into(), None), @r#"
    1 3 "a--"
    2 5 "b-"
    "#);
}

#[test]
fn snapshot_slurp() {
    let rendered = render_lines("one\ntwo\n", Separator::Slurp, None);
    insta::assert_snapshot!(rendered, @r#"1 8 "one\ntwo\n""#);
}
