//! Minimal server that parses a single request's headers, picks a
//! framing mode for the body and prints the decoded bytes and any
//! trailers. No keep-alive, no pipelining: one request per connection,
//! enough to exercise `select` and `BodyReader` against a real socket.

extern crate tokio_core;
extern crate futures;
extern crate tk_bufstream;
extern crate netbuf;
extern crate httparse;
extern crate tk_bodyread;
#[macro_use] extern crate log;
extern crate env_logger;

use std::env;
use std::mem;

use futures::{Future, Stream, Async, Poll};
use tokio_core::reactor::Core;
use tokio_core::net::TcpListener;
use tokio_core::io::Io;
use tk_bufstream::{IoBuf, ReadBuf};

use tk_bodyread::{
    BodyReader, BufPipeline, Config, Error, FrameControl, Head, Version,
};

/// Reports 100-Continue and trailer activity to stdout.
struct LoggingFrameControl;

impl FrameControl for LoggingFrameControl {
    fn produce_continue(&mut self) {
        info!("would send: 100 Continue");
    }

    fn parse_trailer_headers<'b>(&mut self, buf: &'b [u8],
                                  headers: &mut [httparse::Header<'b>])
        -> Result<httparse::Status<(usize, usize)>, Error>
    {
        Ok(httparse::parse_headers(buf, headers)?)
    }

    fn append_trailer(&mut self, name: &str, value: &[u8]) {
        info!("trailer: {}: {:?}", name, String::from_utf8_lossy(value));
    }
}

enum Phase<S: Io> {
    Head(ReadBuf<S>),
    Body {
        reader: BodyReader,
        pipe: BufPipeline<S>,
        ctl: LoggingFrameControl,
        out: Vec<u8>,
    },
    Void,
}

struct ReadBodyDemo<S: Io> {
    phase: Phase<S>,
    config: Config,
}

impl<S: Io> ReadBodyDemo<S> {
    fn new(conn: S) -> ReadBodyDemo<S> {
        let (_wout, rin) = IoBuf::new(conn).split();
        ReadBodyDemo { phase: Phase::Head(rin), config: Config::new() }
    }
}

impl<S: Io> Future for ReadBodyDemo<S> {
    type Item = ();
    type Error = Error;

    fn poll(&mut self) -> Poll<(), Error> {
        loop {
            match mem::replace(&mut self.phase, Phase::Void) {
                Phase::Head(mut rin) => {
                    if rin.in_buf.len() == 0 {
                        if try_ready!(rin.read()) == 0 && rin.done() {
                            return Ok(Async::Ready(()));
                        }
                    }
                    let mut raw_headers = [httparse::EMPTY_HEADER; 32];
                    let mut req = httparse::Request::new(&mut raw_headers);
                    match req.parse(&rin.in_buf[..])? {
                        httparse::Status::Partial => {
                            self.phase = Phase::Head(rin);
                            return Ok(Async::NotReady);
                        }
                        httparse::Status::Complete(consumed) => {
                            let version = if req.version == Some(0) {
                                Version::Http10
                            } else {
                                Version::Http11
                            };
                            let head = Head::new(version, req.headers);
                            let selection = tk_bodyread::select(&head)?;
                            rin.in_buf.consume(consumed);
                            self.phase = Phase::Body {
                                reader: BodyReader::new(selection, &self.config),
                                pipe: BufPipeline::new(rin),
                                ctl: LoggingFrameControl,
                                out: Vec::new(),
                            };
                        }
                    }
                }
                Phase::Body { mut reader, mut pipe, mut ctl, mut out } => {
                    let n = try_ready!(reader.copy_to(&mut pipe, &mut ctl, &mut out));
                    if n == 0 {
                        info!("body ({} bytes): {:?}",
                              out.len(), String::from_utf8_lossy(&out));
                        return Ok(Async::Ready(()));
                    }
                    self.phase = Phase::Body { reader, pipe, ctl, out };
                }
                Phase::Void => unreachable!("polled after completion"),
            }
        }
    }
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init().expect("init logging");

    let mut lp = Core::new().unwrap();
    let addr = "0.0.0.0:8081".parse().unwrap();
    let listener = TcpListener::bind(&addr, &lp.handle()).unwrap();

    let done = listener.incoming()
        .map_err(|e| { warn!("accept error: {}", e); })
        .for_each(|(socket, _addr)| {
            ReadBodyDemo::new(socket)
                .map_err(|e| warn!("connection error: {}", e))
        });

    lp.run(done).unwrap();
}
