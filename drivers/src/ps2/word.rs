//! 11-bit PS/2 wire word codec.
//!
//! | Bit  | Meaning                      |
//! |------|------------------------------|
//! | 0    | Start bit, always 0          |
//! | 1..8 | Data bits, LSB first         |
//! | 9    | Parity bit (odd parity)      |
//! | 10   | Stop bit, always 1           |

use super::WordError;

pub const START_BIT: u16 = 0;
pub const FIRST_DATA_BIT: u16 = 1;
pub const PARITY_BIT: u16 = 9;
pub const STOP_BIT: u16 = 10;

/// Number of bits in a wire word.
pub const WORD_BITS: u16 = 11;

/// Build the wire word for `byte`, with the parity bit chosen so that the
/// data bits plus parity contain an odd number of ones.
#[inline]
pub const fn encode_byte(byte: u8) -> u16 {
    let parity = byte.count_ones() % 2 == 0;
    ((byte as u16) << FIRST_DATA_BIT) | ((parity as u16) << PARITY_BIT) | (1 << STOP_BIT)
}

/// Check a received word and extract its data byte.
///
/// Bits above the stop bit are ignored.
pub const fn validate_word(word: u16) -> Result<u8, WordError> {
    if word & (1 << START_BIT) != 0 {
        return Err(WordError::StartBit);
    }
    if word & (1 << STOP_BIT) == 0 {
        return Err(WordError::StopBit);
    }
    let data = (word >> FIRST_DATA_BIT) as u8;
    let parity = (word >> PARITY_BIT) & 1;
    if (data.count_ones() + parity as u32) % 2 != 1 {
        return Err(WordError::Parity);
    }
    Ok(data)
}
