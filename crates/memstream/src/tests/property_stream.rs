use alloc::vec::Vec;

use quickcheck::QuickCheck;

use crate::{Buffer, StringStream, Whence};

fn tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: bytes written at any position read back unchanged from that
/// position, and any gap left before them reads as zeros.
#[test]
fn write_then_read_back_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(initial: Vec<u8>, pos: u8, data: Vec<u8>) -> bool {
        let pos = usize::from(pos);
        let mut stream = StringStream::with_buffer(initial.clone());
        stream.set_pos(pos as i64).unwrap();
        assert_eq!(stream.write(&data).unwrap(), data.len());

        stream.seek(pos as i64, Whence::Start).unwrap();
        let read = stream.read(Some(data.len() as i64)).unwrap();
        let read_ok = if data.is_empty() {
            read.is_some_and(|view| view.is_empty())
        } else {
            read.is_some_and(|view| view == data)
        };

        let all = stream.buffer().unwrap().to_vec();
        if data.is_empty() {
            return read_ok && all == initial;
        }
        let gap_ok = all[initial.len().min(pos)..pos].iter().all(|&b| b == 0);
        read_ok && gap_ok && all.len() == initial.len().max(pos + data.len())
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<u8>, u8, Vec<u8>) -> bool);
}

/// Property: truncating to `n` leaves exactly `n` bytes, keeps the common
/// prefix, zero-fills growth and leaves the position alone.
#[test]
fn truncate_sets_exact_length_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(initial: Vec<u8>, len: u8, pos: u8) -> bool {
        let len = usize::from(len);
        let mut stream = StringStream::with_buffer(initial.clone());
        stream.set_pos(i64::from(pos)).unwrap();
        stream.truncate(len as i64).unwrap();
        let pos_kept = stream.pos() == usize::from(pos);

        stream.rewind();
        let all = stream.read(None).unwrap().unwrap();
        let keep = initial.len().min(len);
        pos_kept
            && all.len() == len
            && all[..keep] == initial[..keep]
            && all[keep..].iter().all(|&b| b == 0)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<u8>, u8, u8) -> bool);
}

/// Property: a pushed-back byte is the next byte read, and reading it
/// restores the position (or moves past a byte prepended at 0).
#[test]
fn ungetbyte_then_getbyte_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(initial: Vec<u8>, pos: u8, byte: u8) -> bool {
        let pos = usize::from(pos);
        let mut stream = StringStream::with_buffer(initial);
        stream.set_pos(pos as i64).unwrap();
        stream.ungetbyte(byte).unwrap();
        stream.getbyte().unwrap() == Some(byte) && stream.pos() == pos.max(1)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<u8>, u8, u8) -> bool);
}

/// Property: a pushed-back sequence is what the next read returns, and it
/// replaces the bytes before the position after the buffer was zero-filled
/// to the larger of the position and the pushed length when at the end.
#[test]
fn ungetbyte_sequence_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(initial: Vec<u8>, pos: u8, pushed: Vec<u8>) -> bool {
        let pos = usize::from(pos);
        let initial_len = initial.len();
        let mut stream = StringStream::with_buffer(initial);
        stream.set_pos(pos as i64).unwrap();
        stream.ungetbyte(pushed.as_slice()).unwrap();
        if pushed.is_empty() {
            return stream.pos() == pos && stream.size().unwrap() == initial_len;
        }

        let base = if pos >= initial_len {
            pos.max(pushed.len())
        } else {
            initial_len
        };
        let start = pos.saturating_sub(pushed.len());
        let len_ok = stream.size().unwrap() == base - (pos - start) + pushed.len();
        len_ok
            && stream
                .read(Some(pushed.len() as i64))
                .unwrap()
                .is_some_and(|view| view == pushed)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<u8>, u8, Vec<u8>) -> bool);
}

/// Property: whatever was read or written, `rewind` brings position and
/// line counter back to zero.
#[test]
fn rewind_resets_cursor_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(initial: Vec<u8>, lines: u8, tail: Vec<u8>) -> bool {
        let buffer = Buffer::from(initial);
        let mut stream = StringStream::with_buffer(buffer);
        for _ in 0..lines % 8 {
            let _ = stream.gets().unwrap();
        }
        stream.seek(0, Whence::End).unwrap();
        stream.write(&tail).unwrap();
        stream.rewind();
        stream.pos() == 0 && stream.lineno() == 0
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<u8>, u8, Vec<u8>) -> bool);
}
