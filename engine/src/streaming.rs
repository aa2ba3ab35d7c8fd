//! Streaming runtime: yields chunks as a strategy produces them rather than
//! materializing the whole list up front.
//!
//! A single construct replaces the source's async streams plus progress
//! callbacks: a plain [`Iterator`] over [`ProcessingResult`], checked for
//! cancellation at every item boundary.

use std::thread;
use std::time::Duration;

use docflux_core::CancelToken;

use crate::error::PipelineError;
use crate::types::DocumentChunk;

/// The stage a [`ProcessingResult::InProgress`] item reports progress for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Running the Reader.
    Extracting,
    /// Running the Parser.
    Parsing,
    /// Running the chunking strategy.
    Chunking,
    /// All stages finished.
    Completed,
}

/// One item in a processing stream.
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    /// Progress within `stage`, `[0, 1]`.
    InProgress(Stage, f32),
    /// A chunk became available.
    Chunk(DocumentChunk),
    /// Processing finished; no more items follow.
    Done,
    /// Processing failed; no more items follow.
    Failed(String),
}

/// Backpressure/pacing knobs for a stream.
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    /// Emit a short delay every `backpressure_batch_size` chunks, to throttle
    /// a fast producer against a slow consumer.
    pub backpressure_batch_size: usize,
    /// Delay applied at each backpressure point.
    pub backpressure_delay: Duration,
    /// Batch size used when replaying an already-cached chunk list.
    pub replay_batch_size: usize,
    /// Delay applied between replay batches.
    pub replay_spacer: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            backpressure_batch_size: 100,
            backpressure_delay: Duration::from_millis(10),
            replay_batch_size: 50,
            replay_spacer: Duration::from_millis(5),
        }
    }
}

/// Streams a freshly computed chunk list, applying backpressure pacing and
/// cooperative cancellation at each chunk boundary.
#[derive(Debug)]
pub struct ChunkStream {
    chunks: std::vec::IntoIter<DocumentChunk>,
    cancel: CancelToken,
    options: StreamOptions,
    emitted: usize,
    done: bool,
}

impl ChunkStream {
    /// Wraps an already-computed chunk list for streaming delivery.
    #[must_use]
    pub fn new(chunks: Vec<DocumentChunk>, cancel: CancelToken, options: StreamOptions) -> Self {
        Self { chunks: chunks.into_iter(), cancel, options, emitted: 0, done: false }
    }

    /// A stream that replays an already-cached chunk list in fixed-size
    /// micro-batches, preserving a streaming feel without recomputation.
    #[must_use]
    pub fn replay(chunks: Vec<DocumentChunk>, cancel: CancelToken, options: StreamOptions) -> Self {
        Self::new(chunks, cancel, options)
    }
}

impl Iterator for ChunkStream {
    type Item = ProcessingResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.cancel.is_cancelled() {
            self.done = true;
            return Some(ProcessingResult::Failed(PipelineError::Cancelled.to_string()));
        }

        match self.chunks.next() {
            Some(chunk) => {
                self.emitted += 1;
                let batch_size = if self.options.backpressure_batch_size > 0 {
                    self.options.backpressure_batch_size
                } else {
                    self.options.replay_batch_size.max(1)
                };
                if self.emitted % batch_size == 0 {
                    thread::sleep(self.options.backpressure_delay.max(self.options.replay_spacer));
                }
                Some(ProcessingResult::Chunk(chunk))
            }
            None => {
                self.done = true;
                Some(ProcessingResult::Done)
            }
        }
    }
}
