use bstr::BString;

use crate::encoding::Encoding;

/// Configuration options for a [`StringStream`](crate::StringStream).
///
/// Options are fixed when a stream is created and are copied into every
/// duplicate of that stream.
///
/// # Examples
///
/// ```rust
/// use memstream::{Separator, StreamConfig, StreamOptions, StringStream};
///
/// let options = StreamOptions {
///     record_separator: Some("\r\n".into()),
///     ..Default::default()
/// };
/// let mut stream = StringStream::from_config(
///     StreamConfig::FromBuffer("a\r\nb".into()),
///     options,
/// )
/// .unwrap();
/// assert_eq!(stream.getline(Separator::Default, None).unwrap().unwrap(), "a\r\n");
/// ```
///
/// # Default
///
/// Lines end at `"\n"` and fresh buffers are tagged UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamOptions {
    /// Separator used by [`Separator::Default`](crate::Separator::Default).
    ///
    /// `None` makes line reads return everything up to the end of the
    /// buffer. An empty separator selects paragraph mode, where lines end at
    /// a blank line.
    ///
    /// # Default
    ///
    /// `Some("\n")`
    pub record_separator: Option<BString>,

    /// Encoding given to the buffer created for
    /// [`StreamConfig::Empty`](crate::StreamConfig::Empty), and the fallback
    /// for [`StringStream::set_encoding`](crate::StringStream::set_encoding)
    /// when no encoding is named.
    ///
    /// # Default
    ///
    /// [`Encoding::Utf8`]
    pub default_encoding: Encoding,
}

impl StreamOptions {
    pub(crate) fn default_separator(&self) -> Option<&[u8]> {
        self.record_separator
            .as_ref()
            .map(|sep| AsRef::<[u8]>::as_ref(sep))
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            record_separator: Some(BString::from("\n")),
            default_encoding: Encoding::Utf8,
        }
    }
}
