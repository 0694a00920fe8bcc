//! Frame sequences and the playback cursor shared by both animation engines.

use crate::time::TimeInstant;
use crate::timing::CadenceGate;
use crate::types::SequenceError;

/// Default bitmap width in pixels.
pub const FRAME_WIDTH: u16 = 30;

/// Default bitmap height in pixels.
pub const FRAME_HEIGHT: u16 = 30;

/// Byte length of a default-sized XBM frame (rows padded to whole bytes).
pub const FRAME_LEN: usize = bitmap_len(FRAME_WIDTH, FRAME_HEIGHT);

/// A single default-sized XBM frame.
pub type Frame = [u8; FRAME_LEN];

/// Byte length of an XBM bitmap with the given dimensions.
pub const fn bitmap_len(width: u16, height: u16) -> usize {
    (width as usize).div_ceil(8) * height as usize
}

/// A validated, non-empty run of equally sized bitmaps.
///
/// Frames are stored back to back in one borrowed byte slice, typically a
/// `static` asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapSequence<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
    frame_len: usize,
}

impl<'a> BitmapSequence<'a> {
    /// Creates a sequence of default-sized (30x30) frames.
    ///
    /// # Errors
    /// * `EmptySequence` - No frames were provided
    pub fn new(frames: &'a [Frame]) -> Result<Self, SequenceError> {
        Self::from_bytes(frames.as_flattened(), FRAME_WIDTH, FRAME_HEIGHT)
    }

    /// Creates a sequence from packed frame bytes of arbitrary dimensions.
    ///
    /// # Errors
    /// * `EmptySequence` - `data` is empty or the dimensions are zero
    /// * `FrameSizeMismatch` - `data` is not a whole number of frames
    pub fn from_bytes(data: &'a [u8], width: u16, height: u16) -> Result<Self, SequenceError> {
        let frame_len = bitmap_len(width, height);
        if data.is_empty() || frame_len == 0 {
            return Err(SequenceError::EmptySequence);
        }
        if data.len() % frame_len != 0 {
            return Err(SequenceError::FrameSizeMismatch);
        }

        Ok(Self {
            data,
            width,
            height,
            frame_len,
        })
    }

    /// Returns the number of frames.
    pub fn frame_count(&self) -> usize {
        self.data.len() / self.frame_len
    }

    /// Returns the bytes of the frame at `index`.
    pub fn frame(&self, index: usize) -> Option<&'a [u8]> {
        let start = index.checked_mul(self.frame_len)?;
        self.data.get(start..start + self.frame_len)
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }
}

/// How a sequence is played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayOptions {
    /// Wrap around at the end instead of going idle.
    pub looping: bool,

    /// Start at the last frame and count down.
    pub reverse: bool,

    /// Hard limit on the job lifetime in milliseconds; 0 means no limit.
    pub duration_ms: u32,
}

impl PlayOptions {
    /// Play forward once.
    pub const ONCE: Self = Self {
        looping: false,
        reverse: false,
        duration_ms: 0,
    };

    /// Play forward, wrapping forever.
    pub const LOOP: Self = Self {
        looping: true,
        reverse: false,
        duration_ms: 0,
    };

    /// Play backward once.
    pub const REVERSE: Self = Self {
        looping: false,
        reverse: true,
        duration_ms: 0,
    };

    /// Returns a copy that plays backward.
    pub const fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Returns a copy that stops after `duration_ms` regardless of looping.
    pub const fn lasting(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Outcome of one cursor tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CursorStep {
    /// Cadence interval not yet elapsed.
    Hold,
    /// Moved to this frame.
    Frame(usize),
    /// Ran off the end without looping, or hit the lifetime limit.
    Finished,
}

/// Frame index bookkeeping for a running job.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameCursor<I: TimeInstant> {
    frame_count: usize,
    current: usize,
    options: PlayOptions,
    started_at: I,
    gate: CadenceGate<I>,
}

impl<I: TimeInstant> FrameCursor<I> {
    pub(crate) fn new(frame_count: usize, cadence_ms: u32, options: PlayOptions, now: I) -> Self {
        let current = if options.reverse {
            frame_count.saturating_sub(1)
        } else {
            0
        };

        Self {
            frame_count,
            current,
            options,
            started_at: now,
            gate: CadenceGate::new(cadence_ms, now),
        }
    }

    pub(crate) fn current(&self) -> usize {
        self.current
    }

    pub(crate) fn tick(&mut self, now: I) -> CursorStep {
        let limit = self.options.duration_ms;
        if limit > 0 && now.millis_since(self.started_at) >= u64::from(limit) {
            return CursorStep::Finished;
        }

        if !self.gate.ready(now) {
            return CursorStep::Hold;
        }

        if self.options.reverse {
            if self.current == 0 {
                if !self.options.looping {
                    return CursorStep::Finished;
                }
                self.current = self.frame_count - 1;
            } else {
                self.current -= 1;
            }
        } else {
            self.current += 1;
            if self.current >= self.frame_count {
                if !self.options.looping {
                    return CursorStep::Finished;
                }
                self.current = 0;
            }
        }

        CursorStep::Frame(self.current)
    }
}
