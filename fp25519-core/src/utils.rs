// fp25519, field and curve arithmetic over 2^255-19
// Copyright (C) 2025 A. Russon
// 
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
// 
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use fp25519_math::{Fe, U256};

use crate::errors::Result;

/// Hex string of `value` without leading zeros, left-padded with zeros to
/// `bits` rounded up to a whole number of bytes.
pub fn to_hex(value: &U256, bits: usize) -> String {
    let full = format!("{value:x}");
    let trimmed = match full.trim_start_matches('0') {
        "" => "0",
        s => s
    };
    let nibbles = 2 * bits.div_ceil(8);
    format!("{trimmed:0>nibbles$}")
}

/// Reverses the byte order of a hex string, e.g. "123456" into "563412".
pub fn hex_flip_endian(s: &str) -> Result<String> {
    let mut buf = hex::decode(s)?;
    buf.reverse();
    Ok(hex::encode(buf))
}

pub fn parse_uint(s: &str) -> Result<U256> {
    Ok(s.parse::<U256>()?)
}

pub fn parse_fe(s: &str) -> Result<Fe> {
    Ok(Fe::new(parse_uint(s)?))
}

// 1234567 -> "1,234,567"
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
