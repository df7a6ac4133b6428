//! Shared test harness for the integration suite: an in-memory
//! `PipelineInput` and a `FrameControl` fake that records what the reader
//! asked of it, so assertions can check 100-Continue timing and trailer
//! propagation from outside the crate.

extern crate futures;
extern crate httparse;
extern crate tk_bodyread;

use self::futures::{Async, Poll};
use self::tk_bodyread::{Error, FrameControl, PipelineInput, RejectReason};

pub struct FakePipeline {
    pending: Vec<u8>,
    buf: Vec<u8>,
    closed: bool,
    max_step: usize,
}

impl FakePipeline {
    pub fn new() -> FakePipeline {
        FakePipeline {
            pending: Vec::new(),
            buf: Vec::new(),
            closed: false,
            max_step: usize::max_value(),
        }
    }

    pub fn with_step(step: usize) -> FakePipeline {
        let mut p = FakePipeline::new();
        p.max_step = step;
        p
    }

    pub fn feed(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl PipelineInput for FakePipeline {
    fn poll_read(&mut self) -> Poll<(), Error> {
        if !self.buf.is_empty() {
            return Ok(Async::Ready(()));
        }
        if !self.pending.is_empty() {
            let n = self.max_step.min(self.pending.len());
            let rest = self.pending.split_off(n);
            self.buf.extend(self.pending.drain(..));
            self.pending = rest;
            return Ok(Async::Ready(()));
        }
        if self.closed {
            return Ok(Async::Ready(()));
        }
        Ok(Async::NotReady)
    }

    fn buffered(&self) -> &[u8] {
        &self.buf
    }

    fn is_completed(&self) -> bool {
        self.closed && self.pending.is_empty() && self.buf.is_empty()
    }

    fn advance(&mut self, consumed: usize) {
        assert!(consumed <= self.buf.len());
        self.buf.drain(..consumed);
    }
}

pub struct RecordingFrameControl {
    pub continues: u32,
    pub rejections: Vec<RejectReason>,
    pub trailers: Vec<(String, Vec<u8>)>,
}

impl RecordingFrameControl {
    pub fn new() -> RecordingFrameControl {
        RecordingFrameControl {
            continues: 0,
            rejections: Vec::new(),
            trailers: Vec::new(),
        }
    }
}

impl FrameControl for RecordingFrameControl {
    fn produce_continue(&mut self) {
        self.continues += 1;
    }

    fn reject_request(&mut self, reason: RejectReason) -> Error {
        self.rejections.push(reason);
        Error::Rejected(reason)
    }

    fn parse_trailer_headers<'b>(&mut self, buf: &'b [u8],
                                  headers: &mut [httparse::Header<'b>])
        -> Result<httparse::Status<(usize, usize)>, Error>
    {
        Ok(httparse::parse_headers(buf, headers)?)
    }

    fn append_trailer(&mut self, name: &str, value: &[u8]) {
        self.trailers.push((name.to_string(), value.to_vec()));
    }
}
