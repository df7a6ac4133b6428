use std::io;

use httparse;


/// The specific protocol rejection reasons this crate can raise.
///
/// These are handed to `FrameControl::reject_request`, which turns them
/// into a 4xx response and closes the connection. Rejection is terminal:
/// once raised, no further read may be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// `Content-Length` is missing a value, non-numeric, negative, or
    /// overflows.
    InvalidContentLength,
    /// The peer closed the connection before a `FixedLength` body was
    /// fully delivered.
    UnexpectedEndOfRequestContent,
    /// The peer closed the connection while the chunked decoder was in
    /// any state other than `Complete`.
    ChunkedRequestIncomplete,
    /// Two bytes following chunk data were not exactly CR LF.
    BadChunkSuffix,
    /// The chunk-size line contained an invalid character, or the hex
    /// accumulator overflowed.
    BadChunkSizeData,
}

impl RejectReason {
    pub fn description(&self) -> &'static str {
        use self::RejectReason::*;
        match *self {
            InvalidContentLength => "invalid Content-Length",
            UnexpectedEndOfRequestContent =>
                "connection closed before the declared content length \
                 was reached",
            ChunkedRequestIncomplete =>
                "connection closed in the middle of a chunked body",
            BadChunkSuffix => "chunk data not followed by CRLF",
            BadChunkSizeData => "invalid chunk size",
        }
    }
}

quick_error! {
    /// Errors that can surface out of `peek`/`read`/`copy_to`/`drain`.
    ///
    /// Protocol rejections are signaled to the transport via
    /// `FrameControl::reject_request` and wrapped here only so a single
    /// error type can flow out of `Poll`; transport faults and
    /// cancellation propagate directly.
    #[derive(Debug)]
    pub enum Error {
        /// The pipeline (transport) failed.
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        /// Trailer header parsing failed.
        ParseError(err: httparse::Error) {
            description("trailer header parse error")
            display("trailer header parse error: {:?}", err)
            from()
        }
        /// A protocol rejection, see `RejectReason`.
        Rejected(reason: RejectReason) {
            description(reason.description())
            display("request rejected: {}", reason.description())
        }
        /// The read was canceled via the cancellation token.
        ///
        /// The reader's internal state is invalid after this; the
        /// enclosing request must be aborted.
        Cancelled {
            description("read was canceled")
        }
    }
}

impl From<RejectReason> for Error {
    fn from(reason: RejectReason) -> Error {
        Error::Rejected(reason)
    }
}
