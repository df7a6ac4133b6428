//! HTTP/1.1 request message-body reader for the `tokio`-rs stack.
#![recursion_limit="100"]

#[macro_use] extern crate futures;
extern crate httparse;
extern crate tokio_core;
extern crate netbuf;
extern crate tk_bufstream;
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;

mod version;
mod headers;
mod error;
mod config;
mod pipeline;
mod frame_control;
mod framing;
mod body;

pub use version::Version;
pub use headers::Head;
pub use error::{Error, RejectReason};
pub use config::Config;
pub use pipeline::{InputSegment, PipelineInput, BufPipeline};
pub use frame_control::FrameControl;
pub use framing::{FramingMode, Selection, select};
pub use body::BodyReader;
