//! Sparse tick bitmap
//!
//! One bit per tick-spacing-aligned tick, grouped into 256-bit words keyed by
//! `compressed >> 8` where `compressed = tick / spacing` (floored). Only
//! non-zero words are stored, so memory and scan cost follow the number of
//! initialized words rather than the tick range.

use std::collections::BTreeMap;
use std::fmt;

use clamm_types::{ClammError, ClammResult, SwapDirection, TICKS_PER_WORD};
use ethnum::U256;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// 256-bit bitmap word, serialized as a decimal string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickWord(pub U256);

impl TickWord {
    fn is_empty(&self) -> bool {
        self.0 == U256::ZERO
    }
}

impl fmt::Display for TickWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TickWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TickWord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<U256>().map(TickWord).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickBitmap {
    words: BTreeMap<i32, TickWord>,
}

/// Word index and bit position of a compressed tick
fn position(compressed: i32) -> (i32, u32) {
    (compressed >> 8, (compressed & 0xff) as u32)
}

fn tick_at(word_pos: i32, bit: u32, tick_spacing: i32) -> i32 {
    (word_pos * TICKS_PER_WORD + bit as i32) * tick_spacing
}

fn most_significant_bit(word: U256) -> u32 {
    255 - word.leading_zeros()
}

fn least_significant_bit(word: U256) -> u32 {
    word.trailing_zeros()
}

impl TickBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the initialized bit for `tick`
    pub fn flip_tick(&mut self, tick: i32, tick_spacing: i32) -> ClammResult<()> {
        if tick_spacing <= 0 || tick % tick_spacing != 0 {
            return Err(ClammError::validation(format!(
                "tick {tick} is not aligned to spacing {tick_spacing}"
            )));
        }
        let (word_pos, bit) = position(tick / tick_spacing);
        let word = self.words.entry(word_pos).or_default();
        word.0 ^= U256::ONE << bit;
        if word.is_empty() {
            self.words.remove(&word_pos);
        }
        Ok(())
    }

    pub fn is_initialized(&self, tick: i32, tick_spacing: i32) -> bool {
        if tick_spacing <= 0 || tick % tick_spacing != 0 {
            return false;
        }
        let (word_pos, bit) = position(tick / tick_spacing);
        self.words
            .get(&word_pos)
            .map_or(false, |word| word.0 & (U256::ONE << bit) != U256::ZERO)
    }

    /// Nearest initialized tick in the swap direction
    ///
    /// ZeroForOne looks at ticks `<= tick`, OneForZero at ticks `> tick`.
    /// `None` means no initialized tick remains on that side.
    pub fn next_initialized_tick(
        &self,
        tick: i32,
        tick_spacing: i32,
        direction: SwapDirection,
    ) -> Option<i32> {
        let compressed = tick.div_euclid(tick_spacing);
        match direction {
            SwapDirection::ZeroForOne => {
                let (word_pos, bit) = position(compressed);
                // Bits at or below `bit`
                let mask = if bit == 255 {
                    U256::MAX
                } else {
                    (U256::ONE << (bit + 1)) - U256::ONE
                };
                if let Some(word) = self.words.get(&word_pos) {
                    let masked = word.0 & mask;
                    if masked != U256::ZERO {
                        return Some(tick_at(word_pos, most_significant_bit(masked), tick_spacing));
                    }
                }
                self.words
                    .range(..word_pos)
                    .next_back()
                    .map(|(pos, word)| tick_at(*pos, most_significant_bit(word.0), tick_spacing))
            }
            SwapDirection::OneForZero => {
                let (word_pos, bit) = position(compressed + 1);
                // Bits at or above `bit`
                let mask = !((U256::ONE << bit) - U256::ONE);
                if let Some(word) = self.words.get(&word_pos) {
                    let masked = word.0 & mask;
                    if masked != U256::ZERO {
                        return Some(tick_at(word_pos, least_significant_bit(masked), tick_spacing));
                    }
                }
                self.words
                    .range(word_pos + 1..)
                    .next()
                    .map(|(pos, word)| tick_at(*pos, least_significant_bit(word.0), tick_spacing))
            }
        }
    }

    /// Number of non-empty words
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
