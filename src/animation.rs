//! Bitmap frame player for the display.
//!
//! Provides [`FrameAnimator`], which plays a [`BitmapSequence`] centered on a
//! [`Display`] at a fixed cadence. Starting a new job discards the running
//! one on the spot; there is no crossfade.

use crate::peripherals::Display;
use crate::sequence::{BitmapSequence, CursorStep, FrameCursor, PlayOptions};
use crate::time::TimeInstant;

#[derive(Debug, Clone, Copy)]
struct BitmapJob<'a, I: TimeInstant> {
    sequence: BitmapSequence<'a>,
    cursor: FrameCursor<I>,
    x: u16,
    y: u16,
}

/// Plays bitmap sequences on a display.
///
/// # Type Parameters
/// * `'a` - Lifetime of the frame data
/// * `I` - Time instant type
pub struct FrameAnimator<'a, I: TimeInstant> {
    cadence_ms: u32,
    job: Option<BitmapJob<'a, I>>,
}

impl<'a, I: TimeInstant> FrameAnimator<'a, I> {
    /// Creates an idle animator advancing one frame every `cadence_ms`.
    pub fn new(cadence_ms: u32) -> Self {
        Self {
            cadence_ms,
            job: None,
        }
    }

    /// Replaces any running job and draws the first frame immediately.
    pub fn start<D: Display>(
        &mut self,
        sequence: BitmapSequence<'a>,
        options: PlayOptions,
        now: I,
        display: &mut D,
    ) {
        if self.job.is_some() {
            debug!("frame animation replaced");
        }

        let (screen_w, screen_h) = display.size();
        let x = screen_w.saturating_sub(sequence.width()) / 2;
        let y = screen_h.saturating_sub(sequence.height()) / 2;

        let cursor = FrameCursor::new(sequence.frame_count(), self.cadence_ms, options, now);
        let job = BitmapJob {
            sequence,
            cursor,
            x,
            y,
        };
        Self::draw(&job, cursor.current(), display);
        self.job = Some(job);
    }

    /// Advances to the next frame if the cadence interval has passed.
    ///
    /// Returns true if a frame was drawn.
    pub fn advance<D: Display>(&mut self, now: I, display: &mut D) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };

        match job.cursor.tick(now) {
            CursorStep::Hold => false,
            CursorStep::Frame(index) => {
                Self::draw(job, index, display);
                true
            }
            CursorStep::Finished => {
                debug!("frame animation finished");
                self.job = None;
                false
            }
        }
    }

    /// Drops the running job. The last drawn frame stays on screen.
    pub fn stop(&mut self) {
        self.job = None;
    }

    /// Returns true while a job is playing.
    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Index of the frame currently on screen, if a job is playing.
    pub fn current_frame(&self) -> Option<usize> {
        self.job.as_ref().map(|job| job.cursor.current())
    }

    fn draw<D: Display>(job: &BitmapJob<'a, I>, index: usize, display: &mut D) {
        if let Some(bitmap) = job.sequence.frame(index) {
            display.render_bitmap(
                bitmap,
                job.x,
                job.y,
                job.sequence.width(),
                job.sequence.height(),
            );
        }
    }
}
