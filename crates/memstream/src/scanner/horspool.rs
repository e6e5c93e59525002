//! Boyer–Moore–Horspool substring search.
//!
//! Used for line separators longer than one byte. The skip table is built
//! once per search from the pattern; comparison runs right to left within
//! each alignment and a mismatch shifts by the skip entry of the haystack
//! byte under the last pattern position.

/// A compiled pattern ready to search byte slices.
///
/// ```rust
/// use memstream::search::Horspool;
///
/// let needle = Horspool::new(b"xyz");
/// assert_eq!(needle.find(b"abcxyzdef"), Some(3));
/// assert_eq!(needle.find(b"abcxy"), None);
/// ```
#[derive(Clone)]
pub struct Horspool<'p> {
    pattern: &'p [u8],
    skip: [usize; 256],
}

impl<'p> Horspool<'p> {
    #[must_use]
    pub fn new(pattern: &'p [u8]) -> Self {
        let m = pattern.len();
        let mut skip = [m; 256];
        if m > 0 {
            for (i, &b) in pattern[..m - 1].iter().enumerate() {
                skip[usize::from(b)] = m - 1 - i;
            }
        }
        Self { pattern, skip }
    }

    #[must_use]
    pub fn pattern(&self) -> &'p [u8] {
        self.pattern
    }

    /// Offset of the first occurrence of the pattern in `haystack`.
    ///
    /// An empty pattern matches at 0.
    #[must_use]
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        let m = self.pattern.len();
        if m == 0 {
            return Some(0);
        }
        if m > haystack.len() {
            return None;
        }

        let last = m - 1;
        let mut end = last;
        while end < haystack.len() {
            let mut i = end;
            let mut j = last;
            while haystack[i] == self.pattern[j] {
                if j == 0 {
                    return Some(i);
                }
                i -= 1;
                j -= 1;
            }
            end += self.skip[usize::from(haystack[end])];
        }
        None
    }
}

impl core::fmt::Debug for Horspool<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use bstr::ByteSlice;

        f.debug_struct("Horspool")
            .field("pattern", &self.pattern.as_bstr())
            .finish_non_exhaustive()
    }
}
