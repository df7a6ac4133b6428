//! `peek`/`read`/`copy_to`/`drain` built over one of the three
//! framing-mode readers, plus the shared suspension/completion/
//! 100-Continue glue that wraps all three.
//!
//! Grounded on `examples/swindon-rs-tk-http/src/body_parser.rs`'s
//! `BodyProgress` enum (`Eof`/`Fixed`/`Chunked` dispatched by a single
//! `check_buf`/`parse`/`consume` triple) — generalized here into
//! `Mode`/`try_peek_mode`/`on_consumed`, with the suspension and
//! rejection handling that `body_parser.rs` leaves to its caller pulled
//! into one place.

mod fixed;
mod identity;
mod chunked;

use std::io::Write;

use futures::{Async, Poll};

use config::Config;
use error::{Error, RejectReason};
use frame_control::FrameControl;
use framing::{FramingMode, Selection};
use pipeline::{InputSegment, PipelineInput};

use self::chunked::Chunked;
use self::fixed::FixedLength;
use self::identity::Identity;

/// Outcome of one framing mode's non-suspending attempt to produce the
/// next segment. Distinct from `Poll<InputSegment, Error>` because a
/// mode's `NeedMore` does not by itself mean "suspend" — it might mean
/// "reject", depending on whether the pipeline is completed, which only
/// `BodyReader::peek` knows how to decide uniformly across modes.
enum TryPeek {
    Ready(InputSegment),
    NeedMore,
}

#[derive(Debug)]
enum Mode {
    Identity(Identity),
    Fixed(FixedLength),
    Chunked(Chunked),
}

/// Reads a single HTTP/1.1 request body, whichever of the three framing
/// modes applies, over a shared pipelined input buffer.
#[derive(Debug)]
pub struct BodyReader {
    mode: Mode,
    keep_alive: bool,
    continue_pending: bool,
}

impl BodyReader {
    pub fn new(selection: Selection, config: &Config) -> BodyReader {
        let mode = match selection.mode {
            FramingMode::RemainingData => Mode::Identity(Identity::new()),
            FramingMode::FixedLength { remaining } =>
                Mode::Fixed(FixedLength::new(remaining)),
            FramingMode::Chunked =>
                Mode::Chunked(Chunked::new(config.get_max_trailer_headers())),
        };
        BodyReader {
            mode: mode,
            keep_alive: selection.keep_alive,
            continue_pending: true,
        }
    }

    /// Whether the connection may be reused for another request once
    /// this body is fully drained.
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// True once the body has been read to its defined end. For
    /// `RemainingData` this can only be known from the pipeline, so it
    /// always reports `false` here; callers driving that mode rely on
    /// `peek` returning an empty segment instead.
    pub fn is_complete(&self) -> bool {
        match self.mode {
            Mode::Identity(_) => false,
            Mode::Fixed(ref f) => f.remaining() == 0,
            Mode::Chunked(ref c) => c.is_complete(),
        }
    }

    fn try_peek_mode<P, F>(&mut self, pipe: &mut P, ctl: &mut F)
        -> Result<TryPeek, Error>
        where P: PipelineInput, F: FrameControl
    {
        match self.mode {
            Mode::Identity(ref i) => {
                match i.available(pipe.buffered().len(), pipe.is_completed()) {
                    Some(n) => Ok(TryPeek::Ready(InputSegment { len: n })),
                    None => Ok(TryPeek::NeedMore),
                }
            }
            Mode::Fixed(ref f) => {
                match f.available(pipe.buffered().len()) {
                    Some(n) => Ok(TryPeek::Ready(InputSegment { len: n })),
                    None => Ok(TryPeek::NeedMore),
                }
            }
            Mode::Chunked(ref mut c) => c.try_peek(pipe, ctl),
        }
    }

    /// The sole suspension point. Returns the next zero-copy segment, an
    /// empty segment at end of body, or suspends.
    ///
    /// `continue_pending` flips from `true` to `false` the first time
    /// (and only the first time) this actually suspends — never merely
    /// because a mode reported `NeedMore`, since synchronously-available
    /// data never needs to provoke a `100 Continue`.
    pub fn peek<P, F>(&mut self, pipe: &mut P, ctl: &mut F)
        -> Poll<InputSegment, Error>
        where P: PipelineInput, F: FrameControl
    {
        loop {
            match self.try_peek_mode(pipe, ctl)? {
                TryPeek::Ready(seg) => return Ok(Async::Ready(seg)),
                TryPeek::NeedMore => {
                    if pipe.is_completed() {
                        let reason = match self.mode {
                            Mode::Fixed(_) =>
                                RejectReason::UnexpectedEndOfRequestContent,
                            Mode::Chunked(_) =>
                                RejectReason::ChunkedRequestIncomplete,
                            Mode::Identity(_) =>
                                unreachable!("identity always resolves on completion"),
                        };
                        warn!("rejecting request: {}", reason.description());
                        return Err(ctl.reject_request(reason));
                    }
                    match pipe.poll_read()? {
                        Async::Ready(()) => continue,
                        Async::NotReady => {
                            if self.continue_pending {
                                ctl.produce_continue();
                                self.continue_pending = false;
                            }
                            return Ok(Async::NotReady);
                        }
                    }
                }
            }
        }
    }

    fn on_consumed(&mut self, n: usize) {
        match self.mode {
            Mode::Identity(ref mut i) => i.on_consumed(n),
            Mode::Fixed(ref mut f) => f.on_consumed(n),
            Mode::Chunked(ref mut c) => c.on_consumed(n),
        }
    }

    /// Copies up to `dst.len()` bytes of body data into `dst`, returning
    /// the number of bytes written (`0` at end of body).
    pub fn read<P, F>(&mut self, pipe: &mut P, ctl: &mut F, dst: &mut [u8])
        -> Poll<usize, Error>
        where P: PipelineInput, F: FrameControl
    {
        let seg = try_ready!(self.peek(pipe, ctl));
        let n = ::std::cmp::min(seg.len, dst.len());
        dst[..n].copy_from_slice(&pipe.buffered()[..n]);
        pipe.advance(n);
        self.on_consumed(n);
        Ok(Async::Ready(n))
    }

    /// Copies the next available segment straight into `sink` without an
    /// intermediate caller-provided buffer.
    pub fn copy_to<P, F, W>(&mut self, pipe: &mut P, ctl: &mut F, sink: &mut W)
        -> Poll<usize, Error>
        where P: PipelineInput, F: FrameControl, W: Write
    {
        let seg = try_ready!(self.peek(pipe, ctl));
        if seg.is_empty() {
            return Ok(Async::Ready(0));
        }
        let result = sink.write_all(&pipe.buffered()[..seg.len]);
        pipe.advance(seg.len);
        self.on_consumed(seg.len);
        result?;
        Ok(Async::Ready(seg.len))
    }

    /// Discards the remainder of the body without copying it anywhere,
    /// e.g. when a handler doesn't need the request content.
    pub fn drain<P, F>(&mut self, pipe: &mut P, ctl: &mut F) -> Poll<(), Error>
        where P: PipelineInput, F: FrameControl
    {
        loop {
            let seg = try_ready!(self.peek(pipe, ctl));
            if seg.is_empty() {
                return Ok(Async::Ready(()));
            }
            pipe.advance(seg.len);
            self.on_consumed(seg.len);
        }
    }
}
