// Unicorn Logs - core/rainbow.rs
//
// Decorative heading animation. Every tick, each character of the title
// independently draws a random palette index `i` and takes colour
// `PALETTE[(i + 1) % 7]`. Nothing is carried between ticks except the
// palette itself. The title characters never change.
//
// Randomness is behind `IndexSource` so tests can drive it deterministically.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// The seven heading colours, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColour {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

/// Fixed palette order.
pub const PALETTE: [PaletteColour; 7] = [
    PaletteColour::Red,
    PaletteColour::Orange,
    PaletteColour::Yellow,
    PaletteColour::Green,
    PaletteColour::Blue,
    PaletteColour::Indigo,
    PaletteColour::Violet,
];

impl PaletteColour {
    /// Colour one step after palette index `index` (wrapping).
    pub fn after(index: usize) -> Self {
        PALETTE[(index + 1) % PALETTE.len()]
    }
}

/// Source of random palette indices.
pub trait IndexSource {
    /// Return a value in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Small xorshift64* generator. Cosmetic use only.
#[derive(Debug, Clone)]
pub struct XorShift {
    state: u64,
}

impl XorShift {
    pub fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// Seed from the wall clock.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }
}

impl IndexSource for XorShift {
    fn next_index(&mut self, bound: usize) -> usize {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) % bound as u64) as usize
    }
}

/// The animated heading: fixed text plus the colouring from the last tick.
#[derive(Debug, Clone)]
pub struct RainbowTitle {
    text: String,
    /// One colour per char; empty until the first tick.
    colours: Vec<PaletteColour>,
    interval: Duration,
    next_tick: Option<Instant>,
}

impl RainbowTitle {
    /// Create the title. The first re-colouring happens one `interval` after
    /// the first call to `tick`.
    pub fn new(text: &str, interval: Duration) -> Self {
        Self {
            text: text.to_string(),
            colours: Vec::new(),
            interval,
            next_tick: None,
        }
    }

    /// Re-colour every character from a fresh random start index.
    pub fn recolour(&mut self, rng: &mut impl IndexSource) {
        self.colours = self
            .text
            .chars()
            .map(|_| PaletteColour::after(rng.next_index(PALETTE.len())))
            .collect();
    }

    /// Advance the animation clock. Re-colours and returns `true` when a tick
    /// is due. A stalled frame loop fires one tick, not a burst of them.
    pub fn tick(&mut self, now: Instant, rng: &mut impl IndexSource) -> bool {
        match self.next_tick {
            None => {
                self.next_tick = Some(now + self.interval);
                false
            }
            Some(due) if now >= due => {
                self.recolour(rng);
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_tick = Some(next);
                true
            }
            Some(_) => false,
        }
    }

    /// When the next tick is due, for repaint scheduling.
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Characters paired with their current colour (`None` before the first
    /// tick).
    pub fn spans(&self) -> Vec<(char, Option<PaletteColour>)> {
        self.text
            .chars()
            .enumerate()
            .map(|(i, c)| (c, self.colours.get(i).copied()))
            .collect()
    }
}
