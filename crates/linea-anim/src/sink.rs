//! Rendering collaborators. The engine hands every resolved frame to a
//! [`FrameSink`]; rasterization and encoding live behind this trait.

use std::io::Write;

use linea_core::{ContentHash, ContentHasher, LineaError, LineaResult};

use crate::frame::Frame;

/// Consumes resolved frames in order, one per tick.
pub trait FrameSink {
    fn consume(&mut self, frame: &Frame) -> LineaResult<()>;

    /// Called once after the last frame of a run.
    fn finish(&mut self) -> LineaResult<()> {
        Ok(())
    }
}

/// Keeps every frame in memory. Mostly useful in tests and previews.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl FrameSink for FrameRecorder {
    fn consume(&mut self, frame: &Frame) -> LineaResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Hashes each frame and the whole run, without keeping frames.
#[derive(Clone, Default)]
pub struct HashingSink {
    overall: ContentHasher,
    frame_hashes: Vec<ContentHash>,
}

impl HashingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_hashes(&self) -> &[ContentHash] {
        &self.frame_hashes
    }

    /// Digest over every frame consumed so far.
    pub fn content_hash(&self) -> ContentHash {
        self.overall.clone().finish()
    }
}

impl FrameSink for HashingSink {
    fn consume(&mut self, frame: &Frame) -> LineaResult<()> {
        frame.hash_into(&mut self.overall);
        self.frame_hashes.push(frame.content_hash());
        Ok(())
    }
}

/// Discards frames, counting them.
#[derive(Debug, Default)]
pub struct NullSink {
    pub frames: u64,
}

impl FrameSink for NullSink {
    fn consume(&mut self, _frame: &Frame) -> LineaResult<()> {
        self.frames += 1;
        Ok(())
    }
}

/// Writes one JSON document per frame, newline separated.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn consume(&mut self, frame: &Frame) -> LineaResult<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> LineaResult<()> {
        self.writer
            .flush()
            .map_err(|e| LineaError::Sink(format!("failed to flush frames: {}", e)))
    }
}
