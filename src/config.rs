use std::sync::Arc;

/// Configuration for the body reader.
///
/// Construct with `Config::new()`, chain setters (each returns
/// `&mut Self`), finish with `done()` to get an `Arc` suitable for
/// sharing across connections.
#[derive(Debug, Clone)]
pub struct Config {
    max_trailer_headers: usize,
}

impl Config {
    /// Create a config with defaults.
    pub fn new() -> Config {
        Config {
            max_trailer_headers: 1024,
        }
    }

    /// Upper bound on the number of trailer headers a single chunked
    /// request may carry, once more than `MIN_TRAILER_HEADERS` (a fixed
    /// stack-allocated batch) show up and the parser falls back to a
    /// heap-allocated vector of this size.
    pub fn max_trailer_headers(&mut self, value: usize) -> &mut Self {
        self.max_trailer_headers = value;
        self
    }

    pub fn get_max_trailer_headers(&self) -> usize {
        self.max_trailer_headers
    }

    /// Create an `Arc`'d config clone to pass to the reader constructors.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
