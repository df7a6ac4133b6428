//! A pure factory that inspects the request's HTTP version and headers
//! and decides which of the three body-framing modes applies.

use error::RejectReason;
use headers::{self, Head};
use version::Version;


/// Which of the three framing modes a request uses, plus the connection
/// reuse verdict that falls out of the same header scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingMode {
    /// Body runs until the peer closes; no length limit.
    RemainingData,
    /// Exactly `remaining` more bytes make up the body.
    FixedLength { remaining: u64 },
    /// `Transfer-Encoding: chunked` — the chunked decoder drives this one.
    Chunked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mode: FramingMode,
    pub keep_alive: bool,
}

/// Select a `FramingMode` for a request, per RFC 7230 §3.3.3's five-step
/// algorithm, evaluated in order.
///
/// `Transfer-Encoding` wins over `Content-Length` when both are present;
/// the order the two headers appear in the message is irrelevant, since
/// both are looked up by name rather than scanned positionally.
pub fn select(head: &Head) -> Result<Selection, RejectReason> {
    // Step 1: default keep-alive from the version.
    let mut keep_alive = head.version != Version::Http10;

    // Step 2: `Connection` header, loosely as a single token (a strict
    // implementation would tokenize a comma-separated list instead).
    if let Some(conn) = head.connection() {
        if headers::is_upgrade(conn) {
            debug!("selected RemainingData framing (Connection: upgrade)");
            return Ok(Selection {
                mode: FramingMode::RemainingData,
                keep_alive: false,
            });
        }
        keep_alive = headers::is_keep_alive(conn);
    }

    // Step 3: `Transfer-Encoding` wins over `Content-Length`.
    if head.has_transfer_encoding() {
        debug!("selected Chunked framing");
        return Ok(Selection { mode: FramingMode::Chunked, keep_alive: keep_alive });
    }

    // Step 4: `Content-Length`, parsed as a non-negative decimal integer.
    if let Some(result) = head.content_length() {
        let remaining = result.map_err(|e| {
            warn!("rejecting request: {}", e.description());
            e
        })?;
        debug!("selected FixedLength({}) framing", remaining);
        return Ok(Selection {
            mode: FramingMode::FixedLength { remaining: remaining },
            keep_alive: keep_alive,
        });
    }

    // Step 5: no body-length header at all — empty body.
    debug!("selected FixedLength(0) framing (no length header)");
    Ok(Selection {
        mode: FramingMode::FixedLength { remaining: 0 },
        keep_alive: keep_alive,
    })
}

#[cfg(test)]
mod test {
    use httparse::Header;

    use error::RejectReason;
    use version::Version;
    use headers::Head;
    use super::{select, FramingMode};

    fn head<'a>(version: Version, headers: &'a [Header<'a>]) -> Head<'a> {
        Head::new(version, headers)
    }

    #[test]
    fn no_headers_http11() {
        let h = head(Version::Http11, &[]);
        let sel = select(&h).unwrap();
        assert_eq!(sel.mode, FramingMode::FixedLength { remaining: 0 });
        assert!(sel.keep_alive);
    }

    #[test]
    fn no_headers_http10() {
        let h = head(Version::Http10, &[]);
        let sel = select(&h).unwrap();
        assert_eq!(sel.mode, FramingMode::FixedLength { remaining: 0 });
        assert!(!sel.keep_alive);
    }

    #[test]
    fn content_length_zero() {
        let headers = [Header { name: "Content-Length", value: b"0" }];
        let sel = select(&head(Version::Http11, &headers)).unwrap();
        assert_eq!(sel.mode, FramingMode::FixedLength { remaining: 0 });
        assert!(sel.keep_alive);
    }

    #[test]
    fn content_length_five() {
        let headers = [Header { name: "Content-Length", value: b"5" }];
        let sel = select(&head(Version::Http11, &headers)).unwrap();
        assert_eq!(sel.mode, FramingMode::FixedLength { remaining: 5 });
    }

    #[test]
    fn content_length_non_numeric() {
        let headers = [Header { name: "Content-Length", value: b"abc" }];
        let err = select(&head(Version::Http11, &headers)).unwrap_err();
        assert_eq!(err, RejectReason::InvalidContentLength);
    }

    #[test]
    fn content_length_negative() {
        let headers = [Header { name: "Content-Length", value: b"-5" }];
        let err = select(&head(Version::Http11, &headers)).unwrap_err();
        assert_eq!(err, RejectReason::InvalidContentLength);
    }

    #[test]
    fn content_length_overflow() {
        let headers = [Header {
            name: "Content-Length",
            value: b"999999999999999999999999999999",
        }];
        let err = select(&head(Version::Http11, &headers)).unwrap_err();
        assert_eq!(err, RejectReason::InvalidContentLength);
    }

    #[test]
    fn transfer_encoding_wins_over_content_length() {
        let headers = [
            Header { name: "Transfer-Encoding", value: b"chunked" },
            Header { name: "Content-Length", value: b"5" },
        ];
        let sel = select(&head(Version::Http11, &headers)).unwrap();
        assert_eq!(sel.mode, FramingMode::Chunked);
    }

    #[test]
    fn connection_upgrade_is_remaining_data() {
        let headers = [Header { name: "Connection", value: b"upgrade" }];
        let sel = select(&head(Version::Http11, &headers)).unwrap();
        assert_eq!(sel.mode, FramingMode::RemainingData);
        assert!(!sel.keep_alive);
    }

    #[test]
    fn connection_keep_alive() {
        let headers = [Header { name: "Connection", value: b"keep-alive" }];
        let sel = select(&head(Version::Http10, &headers)).unwrap();
        assert!(sel.keep_alive);
    }

    #[test]
    fn connection_other_token_disables_keep_alive() {
        let headers = [Header { name: "Connection", value: b"close" }];
        let sel = select(&head(Version::Http11, &headers)).unwrap();
        assert!(!sel.keep_alive);
    }
}
