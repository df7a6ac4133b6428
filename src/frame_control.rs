use httparse::{self, Header};

use error::{Error, RejectReason};


/// The request-context callbacks the body reader needs.
///
/// Modeled as a narrow trait passed in at construction rather than an
/// owning back-reference into the request object, avoiding a cyclic
/// back-reference — this mirrors the way `tk-http`'s `Codec`/`Dispatcher`
/// traits keep the protocol state machine decoupled from the
/// application's request type.
pub trait FrameControl {
    /// Write `HTTP/1.1 100 Continue\r\n\r\n` if appropriate.
    ///
    /// The implementor is responsible for suppressing this when the
    /// client didn't send `Expect: 100-continue` or the final response
    /// has already started — the reader calls this unconditionally on
    /// first suspension and does not inspect `Expect` itself.
    fn produce_continue(&mut self);

    /// Abort the request with a protocol-level rejection.
    ///
    /// Returns the `Error` the caller should propagate; this does not
    /// itself unwind, so the reader stays within ordinary Rust control
    /// flow rather than panicking the connection away.
    fn reject_request(&mut self, reason: RejectReason) -> Error {
        Error::Rejected(reason)
    }

    /// Parse as many trailer headers out of `buf` as `headers` has room
    /// for, exactly like `httparse::parse_headers`.
    ///
    /// Returns `httparse::Status::Complete((bytes, count))` when the
    /// trailer block's terminating CRLF CRLF was found (`bytes` is how
    /// much of `buf` to advance past, `count` how many headers were
    /// parsed), or `Status::Partial` if more bytes are needed. Returns
    /// `Error::ParseError(httparse::Error::TooManyHeaders)` if `headers`
    /// was too small, so the caller can retry with a bigger allocation.
    fn parse_trailer_headers<'b>(&mut self, buf: &'b [u8],
                                  headers: &mut [Header<'b>])
        -> Result<httparse::Status<(usize, usize)>, Error>;

    /// Append one parsed trailer header to the request's header
    /// collection. No other component reads the collection while
    /// trailers are being appended.
    fn append_trailer(&mut self, name: &str, value: &[u8]);
}
