#[allow(unused_imports)]
use std::ascii::AsciiExt;
use std::slice::Iter as SliceIter;
use std::str::from_utf8;

use httparse::Header;

use error::RejectReason;
use version::Version;

/// A borrowed view over the headers of a single request, as handed to the
/// framing selector and to `FrameControl` implementors.
///
/// This does not own the headers: it is valid only as long as the
/// underlying `httparse::Header` slice it was built from.
#[derive(Debug)]
pub struct Head<'a> {
    pub version: Version,
    pub headers: &'a [Header<'a>],
}

impl<'a> Head<'a> {
    pub fn new(version: Version, headers: &'a [Header<'a>]) -> Head<'a> {
        Head { version: version, headers: headers }
    }

    /// Iterate all values of a header, case-insensitively by name.
    ///
    /// Order of appearance in the message is preserved.
    pub fn values(&self, name: &str) -> HeaderIter<'a> {
        HeaderIter { name: name.to_string(), iter: self.headers.iter() }
    }

    /// Value of the (first) `Connection` header, if any.
    pub fn connection(&self) -> Option<&'a [u8]> {
        self.values("Connection").next()
    }

    /// Whether a `Transfer-Encoding` header is present (non-empty).
    pub fn has_transfer_encoding(&self) -> bool {
        self.values("Transfer-Encoding").next().is_some()
    }

    /// Parsed, validated `Content-Length`, if the header is present.
    ///
    /// Returns `Err` for a missing value, a non-numeric value, a negative
    /// value or an overflow.
    pub fn content_length(&self)
        -> Option<Result<u64, RejectReason>>
    {
        self.values("Content-Length").next().map(|val| {
            from_utf8(val).ok()
                .and_then(|s| {
                    let s = s.trim();
                    if s.is_empty() || s.as_bytes()[0] == b'-' {
                        return None;
                    }
                    s.parse::<u64>().ok()
                })
                .ok_or(RejectReason::InvalidContentLength)
        })
    }
}

/// Iterator over all values of a single header name, case-insensitively.
pub struct HeaderIter<'a> {
    name: String,
    iter: SliceIter<'a, Header<'a>>,
}

impl<'a> Iterator for HeaderIter<'a> {
    type Item = &'a [u8];
    fn next(&mut self) -> Option<&'a [u8]> {
        while let Some(header) = self.iter.next() {
            if header.name.eq_ignore_ascii_case(&self.name) {
                return Some(header.value);
            }
        }
        None
    }
}

// header value is byte sequence
// we need case insensitive comparison and strip out of the whitespace
pub fn is_upgrade(val: &[u8]) -> bool {
    if val.len() < "upgrade".len() {
        return false;
    }
    let mut iter = val.iter();
    for (idx, &ch) in iter.by_ref().enumerate() {
        match ch {
            b'\r' | b'\n' | b' ' | b'\t' => continue,
            b'u' | b'U' => {
                if idx + "upgrade".len() > val.len() {
                    return false;
                }
                break;
            }
            _ => return false,
        }
    }
    for (idx, ch) in iter.by_ref().take(6).enumerate() {
        if b"pgrade"[idx] != ch.to_ascii_lowercase() {
            return false;
        }
    }
    for &ch in iter {
        if !matches!(ch, b'\r' | b'\n' | b' ' | b'\t') {
            return false;
        }
    }
    return true;
}

// header value is byte sequence
// we need case insensitive comparison and strip out of the whitespace
pub fn is_keep_alive(val: &[u8]) -> bool {
    if val.len() < "keep-alive".len() {
        return false;
    }
    let mut iter = val.iter();
    for (idx, &ch) in iter.by_ref().enumerate() {
        match ch {
            b'\r' | b'\n' | b' ' | b'\t' => continue,
            b'k' | b'K' => {
                if idx + "keep-alive".len() > val.len() {
                    return false;
                }
                break;
            }
            _ => return false,
        }
    }
    for (idx, ch) in iter.by_ref().take(9).enumerate() {
        if b"eep-alive"[idx] != ch.to_ascii_lowercase() {
            return false;
        }
    }
    for &ch in iter {
        if !matches!(ch, b'\r' | b'\n' | b' ' | b'\t') {
            return false;
        }
    }
    return true;
}

#[cfg(test)]
mod test {
    use super::{is_upgrade, is_keep_alive};

    #[test]
    fn test_upgrade() {
        assert!(is_upgrade(b"upgrade"));
        assert!(is_upgrade(b"Upgrade"));
        assert!(is_upgrade(b"  UPGRADE  "));
        assert!(!is_upgrade(b"upgrade, keep-alive"));
    }

    #[test]
    fn test_keep_alive() {
        assert!(is_keep_alive(b"keep-alive"));
        assert!(is_keep_alive(b"Keep-Alive"));
        assert!(is_keep_alive(b"  KEEP-ALIVE  "));
        assert!(!is_keep_alive(b"keep-alive, upgrade"));
    }
}
