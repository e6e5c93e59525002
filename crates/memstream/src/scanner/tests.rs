use alloc::vec::Vec;

use rstest::rstest;

use super::*;

fn lines<'a>(input: &'a str, mode: ScanMode<'_>, limit: Option<usize>) -> Vec<&'a str> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(line) = scan_line(bytes, pos, limit, mode, Encoding::Utf8) {
        out.push(&input[line.start..line.end]);
        pos = line.end;
    }
    out
}

#[rstest]
#[case(b"", ScanMode::Paragraph)]
#[case(b"\n", ScanMode::Byte(b'\n'))]
#[case(b"\r\n", ScanMode::Pattern(b"\r\n"))]
#[case(b"--", ScanMode::Pattern(b"--"))]
fn separators_pick_their_algorithm(#[case] sep: &[u8], #[case] expected: ScanMode<'_>) {
    assert_eq!(ScanMode::for_separator(sep), expected);
}

#[test]
fn default_separator_resolution() {
    assert_eq!(Separator::Default.resolve(None), ScanMode::Slurp);
    assert_eq!(
        Separator::Default.resolve(Some(&b"\n"[..])),
        ScanMode::Byte(b'\n')
    );
    assert_eq!(Separator::Default.resolve(Some(&b""[..])), ScanMode::Paragraph);
    assert_eq!(Separator::Custom(b"").resolve(Some(&b"\n"[..])), ScanMode::Paragraph);
    assert_eq!(Separator::from(None::<&str>), Separator::Slurp);
}

#[test]
fn byte_mode_keeps_the_separator() {
    assert_eq!(
        lines("a\nbb\n\nccc", ScanMode::Byte(b'\n'), None),
        ["a\n", "bb\n", "\n", "ccc"]
    );
}

#[test]
fn pattern_mode_finds_multi_byte_separators() {
    assert_eq!(
        lines("abcxyzdef", ScanMode::Pattern(b"xyz"), None),
        ["abcxyz", "def"]
    );
    assert_eq!(
        lines("one\r\ntwo\r\n", ScanMode::Pattern(b"\r\n"), None),
        ["one\r\n", "two\r\n"]
    );
}

#[test]
fn pattern_not_shorter_than_window_is_not_searched() {
    // "xyz" is exactly the remaining window: no search, the window is taken.
    let line = scan_line(b"abcxyz", 3, None, ScanMode::Pattern(b"xyz"), Encoding::Utf8);
    assert_eq!(line, Some(Line { start: 3, end: 6 }));
}

#[test]
fn slurp_takes_everything_left() {
    assert_eq!(lines("a\nb\n", ScanMode::Slurp, None), ["a\nb\n"]);
}

#[test]
fn end_of_data_regardless_of_mode() {
    for mode in [
        ScanMode::Slurp,
        ScanMode::Paragraph,
        ScanMode::Byte(b'\n'),
        ScanMode::Pattern(b"ab"),
    ] {
        assert_eq!(scan_line(b"abc", 3, None, mode, Encoding::Utf8), None);
        assert_eq!(scan_line(b"abc", 10, Some(1), mode, Encoding::Utf8), None);
    }
}

#[test]
fn limit_clips_the_window() {
    let line = scan_line(b"hello\nworld", 0, Some(3), ScanMode::Byte(b'\n'), Encoding::Utf8);
    assert_eq!(line, Some(Line { start: 0, end: 3 }));
    assert_eq!(
        lines("hello\nworld", ScanMode::Byte(b'\n'), Some(3)),
        ["hel", "lo\n", "wor", "ld"]
    );
}

#[test]
fn limit_never_splits_a_character() {
    // "é" is two bytes; a one-byte limit still yields the whole character.
    assert_eq!(lines("éé", ScanMode::Slurp, Some(1)), ["é", "é"]);
    assert_eq!(lines("a€b", ScanMode::Slurp, Some(2)), ["a€", "b"]);
}

#[test]
fn limit_splits_bytes_in_binary() {
    let bytes = "é".as_bytes();
    let line = scan_line(bytes, 0, Some(1), ScanMode::Slurp, Encoding::Binary);
    assert_eq!(line, Some(Line { start: 0, end: 1 }));
}

#[test]
fn paragraph_mode_splits_at_blank_lines() {
    assert_eq!(
        lines("\n\npara one\nline two\n\n\n\npara two\n", ScanMode::Paragraph, None),
        ["para one\nline two\n\n", "para two\n"]
    );
}

#[test]
fn paragraph_mode_only_newlines_is_end_of_data() {
    assert_eq!(scan_line(b"\n\n\n", 0, None, ScanMode::Paragraph, Encoding::Utf8), None);
}

#[test]
fn paragraph_limit_counts_from_the_first_text_byte() {
    let line = scan_line(b"\n\nabcdef\n\n", 0, Some(4), ScanMode::Paragraph, Encoding::Utf8);
    assert_eq!(line, Some(Line { start: 2, end: 6 }));
}
