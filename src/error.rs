//! Error taxonomy for the receive pipeline.
//!
//! Fatal kinds propagate with `?` and prevent `Play` or abort a stage
//! outright. Transient kinds (`BufferOverrun`, `DeviceTimeout`) are never
//! returned from the streaming hot path; the bridge counts them and logs
//! a warning instead, per spec.

use thiserror::Error;

/// Errors raised anywhere in the receive pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// WAV header mismatch or unrecognised raw sample format. Fatal at open.
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Hardware open / sample-rate / frequency / AGC rejection. Fatal at open.
    #[error("device error: {0}")]
    DeviceError(String),

    /// FIFO was full when the producer tried to enqueue a batch.
    /// Never returned from the streaming path; logged and counted.
    #[error("buffer overrun: batch dropped")]
    BufferOverrun,

    /// Consumer wait on the FIFO condition variable timed out.
    /// Never returned from the streaming path; logged and counted.
    #[error("device timeout waiting for samples")]
    DeviceTimeout,

    /// File reader reached EOF. Triggers a graceful `Pause`, not fatal.
    #[error("end of stream")]
    EndOfStream,

    /// Input length was not a multiple of a stage's rate-change factor.
    /// A programming error / contract violation: always fatal.
    #[error("invalid batch length {len} for rate change {factor}")]
    InvalidBatchLength { len: usize, factor: usize },

    /// Propagated I/O failure from a file-backed sample source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
