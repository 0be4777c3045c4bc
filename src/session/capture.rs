use crate::foundation::core::Bitmap;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// The photos of one session, in capture order (top to bottom in the strip).
///
/// Always holds the expected number of frames, all with the same pixel dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Bitmap>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Bitmap>, expected_count: usize) -> PhotoboothResult<Self> {
        if frames.len() != expected_count {
            return Err(PhotoboothError::validation(format!(
                "frame sequence has {} frames, expected {expected_count}",
                frames.len()
            )));
        }
        if let Some(first) = frames.first() {
            let dims = first.dimensions();
            if let Some((i, f)) = frames
                .iter()
                .enumerate()
                .find(|(_, f)| f.dimensions() != dims)
            {
                return Err(PhotoboothError::validation(format!(
                    "frame {i} is {}x{}, expected {}x{}",
                    f.width(),
                    f.height(),
                    dims.0,
                    dims.1
                )));
            }
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Bitmap] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bitmap> {
        self.frames.iter()
    }

    /// Shared pixel dimensions, `None` for an empty sequence.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(Bitmap::dimensions)
    }

    /// Same-length sequence produced by mapping every frame, order kept.
    pub(crate) fn map(&self, f: impl FnMut(&Bitmap) -> Bitmap) -> PhotoboothResult<Self> {
        Self::new(self.frames.iter().map(f).collect(), self.frames.len())
    }

    pub fn into_frames(self) -> Vec<Bitmap> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Bitmap;
    type IntoIter = std::slice::Iter<'a, Bitmap>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Collects shots one at a time until the session is complete.
#[derive(Clone, Debug)]
pub struct CaptureSession {
    total_shots: usize,
    frames: Vec<Bitmap>,
}

impl CaptureSession {
    pub fn new(total_shots: usize) -> PhotoboothResult<Self> {
        if total_shots == 0 {
            return Err(PhotoboothError::validation("total_shots must be > 0"));
        }
        Ok(Self {
            total_shots,
            frames: Vec::with_capacity(total_shots),
        })
    }

    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    /// 1-based number of the shot about to be taken, capped at `total_shots`.
    pub fn current_shot(&self) -> usize {
        (self.frames.len() + 1).min(self.total_shots)
    }

    pub fn captured(&self) -> usize {
        self.frames.len()
    }

    pub fn is_complete(&self) -> bool {
        self.frames.len() == self.total_shots
    }

    pub fn push(&mut self, frame: Bitmap) -> PhotoboothResult<()> {
        if self.is_complete() {
            return Err(PhotoboothError::validation(format!(
                "session already has all {} shots",
                self.total_shots
            )));
        }
        if let Some(first) = self.frames.first()
            && first.dimensions() != frame.dimensions()
        {
            return Err(PhotoboothError::validation(format!(
                "shot {} is {}x{}, earlier shots are {}x{}",
                self.frames.len() + 1,
                frame.width(),
                frame.height(),
                first.width(),
                first.height()
            )));
        }
        tracing::debug!(shot = self.frames.len() + 1, total = self.total_shots, "captured");
        self.frames.push(frame);
        Ok(())
    }

    /// Drop every shot and start over.
    pub fn reset(&mut self) {
        self.frames.clear();
    }

    pub fn finish(self) -> PhotoboothResult<FrameSequence> {
        FrameSequence::new(self.frames, self.total_shots)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/capture.rs"]
mod tests;
