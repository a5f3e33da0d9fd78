//! Opening and decoding local files into `rodio` sources and sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Decode `path`, starting `start_at` into the stream.
///
/// Returns the source and the total length when the decoder knows it.
pub(super) fn open_source(
    path: &Path,
    start_at: Duration,
) -> Result<(impl Source + Send + 'static, Option<Duration>), OpenError> {
    let file = File::open(path).map_err(|source| OpenError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| OpenError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    // `skip_duration` is the seek primitive; Duration::ZERO is a no-op.
    Ok((decoder.skip_duration(start_at), total))
}

/// A paused sink on `stream` playing `path` from `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), OpenError> {
    let (source, total) = open_source(path, start_at)?;
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
