//! The chunked transfer-coding decoder — the heart of the crate.
//!
//! Grounded on `examples/swindon-rs-tk-http/src/chunked.rs`'s
//! `buffered`/`pending`/`done` bookkeeping, generalized from a single
//! opaque `pending` counter built on `httparse::parse_chunk_size` into
//! seven explicit sub-states, each independently resumable byte-by-byte.

use std::cmp;

use httparse::{self, EMPTY_HEADER};

use error::{Error, RejectReason};
use frame_control::FrameControl;
use pipeline::{InputSegment, PipelineInput};

use super::TryPeek;


/// Number of trailer headers to allocate on the stack before growing to
/// a heap vector.
const MIN_TRAILER_HEADERS: usize = 16;

/// Sub-state of the chunked reader. Transitions are strictly monotonic
/// in this declaration order, except for the single reverse edge
/// `Suffix -> Prefix` that reopens a new chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChunkState {
    Prefix,
    Extension,
    Data,
    Suffix,
    Trailer,
    TrailerHeaders,
    Complete,
}

#[derive(Debug)]
pub struct Chunked {
    state: ChunkState,
    chunk_remaining: u32,
    max_trailer_headers: usize,
}

impl Chunked {
    pub fn new(max_trailer_headers: usize) -> Chunked {
        Chunked {
            state: ChunkState::Prefix,
            chunk_remaining: 0,
            max_trailer_headers: max_trailer_headers,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == ChunkState::Complete
    }

    /// Runs the state machine until it can return a non-empty data
    /// segment, needs more bytes, or has reached `Complete` (an empty
    /// segment).
    pub fn try_peek<P, F>(&mut self, pipe: &mut P, ctl: &mut F)
        -> Result<TryPeek, Error>
        where P: PipelineInput, F: FrameControl
    {
        loop {
            match self.state {
                ChunkState::Prefix => {
                    let outcome = match parse_prefix(pipe.buffered()) {
                        Ok(outcome) => outcome,
                        Err(reason) => {
                            warn!("rejecting chunked body: {}", reason.description());
                            return Err(ctl.reject_request(reason));
                        }
                    };
                    match outcome {
                        PrefixOutcome::NeedMore => return Ok(TryPeek::NeedMore),
                        PrefixOutcome::Extension { consumed, chunk_size } => {
                            pipe.advance(consumed);
                            self.chunk_remaining = chunk_size;
                            self.state = ChunkState::Extension;
                            trace!("chunk size {:#x}, extension follows", chunk_size);
                        }
                        PrefixOutcome::Done { consumed, chunk_size } => {
                            pipe.advance(consumed);
                            self.chunk_remaining = chunk_size;
                            self.state = if chunk_size > 0 {
                                ChunkState::Data
                            } else {
                                ChunkState::Trailer
                            };
                            trace!("chunk size {:#x}, entering {:?}", chunk_size, self.state);
                        }
                    }
                }
                ChunkState::Extension => {
                    match parse_extension(pipe.buffered()) {
                        ExtOutcome::NeedMore => return Ok(TryPeek::NeedMore),
                        ExtOutcome::Done { consumed } => {
                            pipe.advance(consumed);
                            self.state = if self.chunk_remaining > 0 {
                                ChunkState::Data
                            } else {
                                ChunkState::Trailer
                            };
                        }
                    }
                }
                ChunkState::Data => {
                    if self.chunk_remaining == 0 {
                        self.state = ChunkState::Suffix;
                        continue;
                    }
                    let buffered = pipe.buffered().len();
                    if buffered == 0 {
                        return Ok(TryPeek::NeedMore);
                    }
                    let n = cmp::min(buffered as u32, self.chunk_remaining);
                    return Ok(TryPeek::Ready(InputSegment { len: n as usize }));
                }
                ChunkState::Suffix => {
                    match parse_suffix(pipe.buffered()) {
                        Ok(SuffixOutcome::NeedMore) => return Ok(TryPeek::NeedMore),
                        Ok(SuffixOutcome::Done { consumed }) => {
                            pipe.advance(consumed);
                            self.state = ChunkState::Prefix;
                        }
                        Err(reason) => {
                            warn!("rejecting chunked body: {}", reason.description());
                            return Err(ctl.reject_request(reason));
                        }
                    }
                }
                ChunkState::Trailer => {
                    match parse_trailer(pipe.buffered()) {
                        TrailerOutcome::NeedMore => return Ok(TryPeek::NeedMore),
                        TrailerOutcome::NoTrailers { consumed } => {
                            pipe.advance(consumed);
                            self.state = ChunkState::Complete;
                        }
                        TrailerOutcome::HasTrailers => {
                            self.state = ChunkState::TrailerHeaders;
                        }
                    }
                }
                ChunkState::TrailerHeaders => {
                    match self.parse_trailer_headers(pipe, ctl)? {
                        TryPeek::NeedMore => return Ok(TryPeek::NeedMore),
                        TryPeek::Ready(_) => {
                            self.state = ChunkState::Complete;
                        }
                    }
                }
                ChunkState::Complete => {
                    return Ok(TryPeek::Ready(InputSegment::empty()));
                }
            }
        }
    }

    fn parse_trailer_headers<P, F>(&mut self, pipe: &mut P, ctl: &mut F)
        -> Result<TryPeek, Error>
        where P: PipelineInput, F: FrameControl
    {
        let mut small = [EMPTY_HEADER; MIN_TRAILER_HEADERS];
        let buf = pipe.buffered();
        let consumed = match ctl.parse_trailer_headers(buf, &mut small) {
            Ok(s) => {
                let (bytes, count) = match s {
                    httparse::Status::Partial => return Ok(TryPeek::NeedMore),
                    httparse::Status::Complete(x) => x,
                };
                for h in &small[..count] {
                    ctl.append_trailer(h.name, h.value);
                }
                bytes
            }
            Err(Error::ParseError(httparse::Error::TooManyHeaders)) => {
                let mut big = vec![EMPTY_HEADER; self.max_trailer_headers];
                match ctl.parse_trailer_headers(buf, &mut big)? {
                    httparse::Status::Partial => return Ok(TryPeek::NeedMore),
                    httparse::Status::Complete((bytes, count)) => {
                        for h in &big[..count] {
                            ctl.append_trailer(h.name, h.value);
                        }
                        bytes
                    }
                }
            }
            Err(e) => return Err(e),
        };
        pipe.advance(consumed);
        Ok(TryPeek::Ready(InputSegment::empty()))
    }

    pub fn on_consumed(&mut self, n: usize) {
        debug_assert!(n as u32 <= self.chunk_remaining);
        self.chunk_remaining -= n as u32;
    }
}

enum PrefixOutcome {
    NeedMore,
    Extension { consumed: usize, chunk_size: u32 },
    Done { consumed: usize, chunk_size: u32 },
}

fn hex_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'a'..=b'f' => Some((b - b'a' + 10) as u32),
        b'A'..=b'F' => Some((b - b'A' + 10) as u32),
        _ => None,
    }
}

/// Parses the chunk-size line.
///
/// At least two bytes past the last hex digit are needed to commit to a
/// decision, because a lone `\r` is ambiguous until the following byte
/// is known.
fn parse_prefix(buf: &[u8]) -> Result<PrefixOutcome, RejectReason> {
    let mut acc: u32 = 0;
    let mut idx = 0;
    while idx < buf.len() {
        let b = buf[idx];
        if let Some(d) = hex_value(b) {
            acc = acc.checked_mul(16)
                .and_then(|v| v.checked_add(d))
                .ok_or(RejectReason::BadChunkSizeData)?;
            idx += 1;
            continue;
        }
        return match b {
            b';' => Ok(PrefixOutcome::Extension {
                consumed: idx + 1,
                chunk_size: acc,
            }),
            b'\r' => {
                if idx + 1 < buf.len() {
                    if buf[idx + 1] == b'\n' {
                        Ok(PrefixOutcome::Done {
                            consumed: idx + 2,
                            chunk_size: acc,
                        })
                    } else {
                        Err(RejectReason::BadChunkSizeData)
                    }
                } else {
                    Ok(PrefixOutcome::NeedMore)
                }
            }
            _ => Err(RejectReason::BadChunkSizeData),
        };
    }
    Ok(PrefixOutcome::NeedMore)
}

enum ExtOutcome {
    NeedMore,
    Done { consumed: usize },
}

/// Skips chunk-extension text up to the terminating CRLF. A `\r` not
/// immediately followed by `\n` is treated as part of the extension text
/// and scanning continues past it, rather than rejecting outright.
fn parse_extension(buf: &[u8]) -> ExtOutcome {
    let mut from = 0;
    loop {
        match buf[from..].iter().position(|&b| b == b'\r') {
            None => return ExtOutcome::NeedMore,
            Some(rel) => {
                let cr = from + rel;
                if cr + 1 >= buf.len() {
                    return ExtOutcome::NeedMore;
                }
                if buf[cr + 1] == b'\n' {
                    return ExtOutcome::Done { consumed: cr + 2 };
                }
                from = cr + 1;
            }
        }
    }
}

enum SuffixOutcome {
    NeedMore,
    Done { consumed: usize },
}

/// Expects exactly CRLF after chunk data.
fn parse_suffix(buf: &[u8]) -> Result<SuffixOutcome, RejectReason> {
    if buf.len() < 2 {
        return Ok(SuffixOutcome::NeedMore);
    }
    if buf[0] == b'\r' && buf[1] == b'\n' {
        Ok(SuffixOutcome::Done { consumed: 2 })
    } else {
        Err(RejectReason::BadChunkSuffix)
    }
}

enum TrailerOutcome {
    NeedMore,
    NoTrailers { consumed: usize },
    HasTrailers,
}

/// Peeks two bytes after the zero-sized chunk.
fn parse_trailer(buf: &[u8]) -> TrailerOutcome {
    if buf.len() < 2 {
        return TrailerOutcome::NeedMore;
    }
    if buf[0] == b'\r' && buf[1] == b'\n' {
        TrailerOutcome::NoTrailers { consumed: 2 }
    } else {
        TrailerOutcome::HasTrailers
    }
}
