use futures::{Async, Poll};
use tk_bufstream::ReadBuf;
use tokio_core::io::Io;

use error::Error;


/// A contiguous byte range borrowed from the pipeline's input buffer.
///
/// The segment itself carries only a length: the bytes live in
/// `PipelineInput::buffered()`, starting at the current read cursor, and
/// the segment is valid only until the next call to
/// `PipelineInput::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSegment {
    pub len: usize,
}

impl InputSegment {
    pub fn empty() -> InputSegment {
        InputSegment { len: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The pipelined, segmented byte source the body reader consumes.
///
/// Transports never mutate bytes the reader currently holds a borrow
/// over: `buffered()` hands out a zero-copy view that stays valid until
/// the next `advance`.
pub trait PipelineInput {
    /// Suspends until at least one more byte is buffered, or the
    /// connection is known to be closed (`is_completed() == true`).
    fn poll_read(&mut self) -> Poll<(), Error>;

    /// Currently buffered bytes, starting at the read cursor.
    ///
    /// This is the zero-copy view the body readers peek at; callers that
    /// need the bytes beyond the next `advance` must copy them out, as
    /// `read` does.
    fn buffered(&self) -> &[u8];

    /// True once the peer has closed the connection and no further bytes
    /// will ever be buffered.
    fn is_completed(&self) -> bool;

    /// Releases `consumed` bytes from the front of the buffer, reclaiming
    /// them for the transport. This is the single write path into the
    /// pipeline.
    fn advance(&mut self, consumed: usize);
}

/// A `PipelineInput` built over `tk-bufstream`'s buffered reader.
///
/// This is how the body reader is meant to be wired to a real socket:
/// `tk_bufstream::IoBuf::split()` yields a `ReadBuf<S>` half, which is
/// handed to `BufPipeline::new`.
pub struct BufPipeline<S> {
    io: ReadBuf<S>,
}

impl<S> BufPipeline<S> {
    pub fn new(io: ReadBuf<S>) -> BufPipeline<S> {
        BufPipeline { io: io }
    }

    /// Reclaim the underlying `ReadBuf`, e.g. once the body is drained
    /// and the connection moves on to the next pipelined request.
    pub fn into_inner(self) -> ReadBuf<S> {
        self.io
    }
}

impl<S: Io> PipelineInput for BufPipeline<S> {
    fn poll_read(&mut self) -> Poll<(), Error> {
        if self.io.in_buf.len() != 0 || self.io.done() {
            return Ok(Async::Ready(()));
        }
        match self.io.read()? {
            Async::Ready(_) => Ok(Async::Ready(())),
            Async::NotReady => Ok(Async::NotReady),
        }
    }

    fn buffered(&self) -> &[u8] {
        &self.io.in_buf[..]
    }

    fn is_completed(&self) -> bool {
        self.io.done()
    }

    fn advance(&mut self, consumed: usize) {
        self.io.in_buf.consume(consumed);
    }
}
