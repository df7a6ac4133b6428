extern crate futures;
extern crate tk_bodyread;

#[path = "common/mod.rs"]
mod common;

use futures::Async;

use tk_bodyread::{BodyReader, Config, FramingMode, Selection};

use common::{FakePipeline, RecordingFrameControl};

fn reader(remaining: u64) -> BodyReader {
    let cfg = Config::new();
    BodyReader::new(Selection {
        mode: FramingMode::FixedLength { remaining: remaining },
        keep_alive: true,
    }, &cfg)
}

#[test]
fn exact_byte_count_delivered() {
    let mut body = reader(11);
    let mut pipe = FakePipeline::new();
    pipe.feed(b"hello world");
    let mut ctl = RecordingFrameControl::new();

    let mut out = Vec::new();
    loop {
        let n = match body.copy_to(&mut pipe, &mut ctl, &mut out).unwrap() {
            Async::Ready(n) => n,
            Async::NotReady => panic!("fully buffered, should not suspend"),
        };
        if n == 0 {
            break;
        }
    }
    assert_eq!(out, b"hello world");
    assert!(body.is_complete());
}

#[test]
fn fragmentation_across_many_small_reads() {
    let mut body = reader(11);
    let mut pipe = FakePipeline::with_step(3);
    pipe.feed(b"hello world");
    let mut ctl = RecordingFrameControl::new();

    let mut out = Vec::new();
    let mut chunk = [0u8; 4];
    loop {
        let n = match body.read(&mut pipe, &mut ctl, &mut chunk).unwrap() {
            Async::Ready(n) => n,
            Async::NotReady => panic!("fake pipeline resolves without external driving"),
        };
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    assert_eq!(out, b"hello world");
}

#[test]
fn early_close_rejects() {
    let mut body = reader(20);
    let mut pipe = FakePipeline::new();
    pipe.feed(b"too short");
    pipe.close();
    let mut ctl = RecordingFrameControl::new();
    body.drain(&mut pipe, &mut ctl).unwrap_err();
    assert_eq!(ctl.rejections.len(), 1);
}

#[test]
fn zero_length_body_completes_without_reading() {
    let mut body = reader(0);
    let mut pipe = FakePipeline::new();
    let mut ctl = RecordingFrameControl::new();
    match body.drain(&mut pipe, &mut ctl).unwrap() {
        Async::Ready(()) => {}
        Async::NotReady => panic!("empty body must resolve immediately"),
    }
    assert_eq!(ctl.continues, 0);
    assert!(body.is_complete());
}

#[test]
fn drain_consumes_everything_without_copying() {
    let mut body = reader(5);
    let mut pipe = FakePipeline::new();
    pipe.feed(b"abcde");
    let mut ctl = RecordingFrameControl::new();
    body.drain(&mut pipe, &mut ctl).unwrap();
    assert_eq!(pipe.buffered().len(), 0);
    assert!(body.is_complete());
}
