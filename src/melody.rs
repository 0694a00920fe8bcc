//! Note sequences for the buzzer.

use crate::peripherals::ToneOutput;
use crate::time::TimeInstant;

/// One note. A frequency of 0 is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    pub freq_hz: u16,
    pub duration_ms: u16,
}

impl Note {
    pub const fn new(freq_hz: u16, duration_ms: u16) -> Self {
        Self {
            freq_hz,
            duration_ms,
        }
    }

    pub const fn rest(duration_ms: u16) -> Self {
        Self::new(0, duration_ms)
    }
}

/// A non-empty run of notes, optionally repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Melody {
    notes: &'static [Note],
    looping: bool,
}

impl Melody {
    /// Creates a melody.
    ///
    /// # Panics
    /// Panics if `notes` is empty. In a `const` item this is a compile error.
    pub const fn new(notes: &'static [Note], looping: bool) -> Self {
        assert!(!notes.is_empty(), "melody must have at least one note");
        Self { notes, looping }
    }

    pub fn notes(&self) -> &'static [Note] {
        self.notes
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

const A2: u16 = 110;
const A3: u16 = 220;

const CLICK_NOTES: &[Note] = &[Note::new(A2, 50)];

const ALARM_NOTES: &[Note] = &[
    Note::new(A3, 50),
    Note::rest(200),
    Note::new(A3, 50),
    Note::rest(1000),
];

/// Short tick played on every accepted input.
pub const CLICK: Melody = Melody::new(CLICK_NOTES, false);

/// Repeating double beep for an expired timer.
pub const ALARM: Melody = Melody::new(ALARM_NOTES, true);

/// Steps through a [`Melody`], one note per note-duration.
pub struct MelodyPlayer<I: TimeInstant> {
    melody: Option<Melody>,
    index: usize,
    note_started: Option<I>,
}

impl<I: TimeInstant> MelodyPlayer<I> {
    pub fn new() -> Self {
        Self {
            melody: None,
            index: 0,
            note_started: None,
        }
    }

    /// Replaces whatever is playing and sounds the first note.
    pub fn start<Z: ToneOutput>(&mut self, melody: Melody, now: I, tone: &mut Z) {
        self.melody = Some(melody);
        self.index = 0;
        self.note_started = Some(now);
        Self::sound(melody.notes[0], tone);
    }

    /// Moves to the next note once the current one has run its duration.
    pub fn advance<Z: ToneOutput>(&mut self, now: I, tone: &mut Z) {
        let (Some(melody), Some(started)) = (self.melody, self.note_started) else {
            return;
        };

        let current = melody.notes[self.index];
        if now.millis_since(started) < u64::from(current.duration_ms) {
            return;
        }

        self.index += 1;
        if self.index >= melody.notes.len() {
            if !melody.looping {
                tone.stop();
                self.melody = None;
                self.note_started = None;
                return;
            }
            self.index = 0;
        }

        self.note_started = Some(now);
        Self::sound(melody.notes[self.index], tone);
    }

    /// Silences the buzzer and forgets the melody.
    pub fn stop<Z: ToneOutput>(&mut self, tone: &mut Z) {
        if self.melody.is_some() {
            tone.stop();
        }
        self.melody = None;
        self.note_started = None;
    }

    pub fn is_playing(&self) -> bool {
        self.melody.is_some()
    }

    /// The melody currently playing, if any.
    pub fn current(&self) -> Option<Melody> {
        self.melody
    }

    fn sound<Z: ToneOutput>(note: Note, tone: &mut Z) {
        if note.freq_hz == 0 {
            tone.stop();
        } else {
            tone.play_tone(note.freq_hz, note.duration_ms);
        }
    }
}

impl<I: TimeInstant> Default for MelodyPlayer<I> {
    fn default() -> Self {
        Self::new()
    }
}
