#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memstream::{
    Buffer, Encoding, Separator, StringStream,
    scanner::{ScanMode, scan_line},
};

#[derive(Debug, Arbitrary)]
struct Input {
    data: Vec<u8>,
    sep: Vec<u8>,
    limit: Option<u8>,
    binary: bool,
}

/// Reference splitter: end of the line is just past the first occurrence of
/// `sep`, or the end of the data.
fn naive_end(data: &[u8], pos: usize, sep: &[u8]) -> usize {
    data[pos..]
        .windows(sep.len())
        .position(|w| w == sep)
        .map_or(data.len(), |i| pos + i + sep.len())
}

fuzz_target!(|input: Input| {
    let Input {
        data,
        sep,
        limit,
        binary,
    } = input;
    // Paragraph mode has its own tests; keep this target on literal separators.
    if sep.is_empty() {
        return;
    }
    let encoding = if binary {
        Encoding::Binary
    } else {
        Encoding::Utf8
    };
    let limit = limit.map(usize::from).filter(|&n| n > 0);
    let mode = ScanMode::for_separator(&sep);

    let mut pos = 0;
    let mut ranges = Vec::new();
    while let Some(line) = scan_line(&data, pos, limit, mode, encoding) {
        assert_eq!(line.start, pos, "lines must be contiguous");
        assert!(line.end > line.start, "lines must not be empty");
        match limit {
            None => assert_eq!(line.end, naive_end(&data, pos, &sep)),
            // Widening to a character boundary adds at most three bytes.
            Some(n) => assert!(line.end - line.start <= n + 3),
        }
        ranges.push((line.start, line.end));
        pos = line.end;
    }
    assert_eq!(pos, data.len());

    // The stream must cut exactly where the scanner does.
    let buffer = Buffer::with_encoding(data.clone(), encoding);
    let mut stream = StringStream::with_buffer(buffer);
    let limit = limit.map(|n| i64::try_from(n).unwrap());
    for &(start, end) in &ranges {
        let line = stream.getline(Separator::Custom(&sep), limit).unwrap().unwrap();
        assert_eq!(&line[..], &data[start..end]);
    }
    assert!(stream.getline(Separator::Custom(&sep), limit).unwrap().is_none());
    assert!(stream.eof().unwrap());
});
