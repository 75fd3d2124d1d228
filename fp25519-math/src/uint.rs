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

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    InvalidDigit,
    Overflow,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Integer: empty string."),
            Self::InvalidDigit => write!(f, "Integer: invalid digit."),
            Self::Overflow => write!(f, "Integer: does not fit in 256 bits."),
        }
    }
}

/// Unsigned 256-bit integer, four little-endian 64-bit limbs.
///
/// Used for scalars, exponents and values not yet reduced modulo p.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Zeroize)]
pub struct U256(pub(crate) [u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0; 4]);
    pub const ONE: U256 = U256([1, 0, 0, 0]);
    pub const MAX: U256 = U256([u64::MAX; 4]);

    pub const fn from_limbs(limbs: [u64; 4]) -> U256 {
        U256(limbs)
    }

    pub const fn from_u64(n: u64) -> U256 {
        U256([n, 0, 0, 0])
    }

    pub fn limbs(&self) -> &[u64; 4] {
        &self.0
    }

    // 2^k, k < 256
    pub fn pow2(k: u32) -> U256 {
        assert!(k < 256, "Integer: 2^{k} does not fit in 256 bits");
        let mut out = U256::ZERO;
        out.0[(k / 64) as usize] = 1 << (k % 64);
        out
    }

    pub fn from_le_bytes(input: &[u8; 32]) -> U256 {
        let mut out = U256::ZERO;
        for (limb, chunk) in out.0.iter_mut().zip(input.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(buf);
        }
        out
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut output = [0u8; 32];
        for (chunk, limb) in output.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        output
    }

    pub fn from_be_bytes(input: &[u8; 32]) -> U256 {
        let mut le = *input;
        le.reverse();
        U256::from_le_bytes(&le)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut output = self.to_le_bytes();
        output.reverse();
        output
    }

    pub fn bit(&self, i: usize) -> u64 {
        (self.0[i / 64] >> (i % 64)) & 1
    }

    pub fn bits(&self) -> usize {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return 64 * i + 64 - self.0[i].leading_zeros() as usize;
            }
        }
        0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().fold(0, |acc, limb| acc | limb) == 0
    }

    pub fn is_even(&self) -> bool {
        self.0[0] & 1 == 0
    }

    pub fn overflowing_add(&self, rhs: &U256) -> (U256, bool) {
        let mut out = U256::ZERO;
        let mut carry = 0u64;
        for i in 0..4 {
            let (s, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (s, c2) = s.overflowing_add(carry);
            out.0[i] = s;
            carry = (c1 | c2) as u64;
        }
        (out, carry != 0)
    }

    pub fn overflowing_sub(&self, rhs: &U256) -> (U256, bool) {
        let mut out = U256::ZERO;
        let mut borrow = 0u64;
        for i in 0..4 {
            let (d, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (d, b2) = d.overflowing_sub(borrow);
            out.0[i] = d;
            borrow = (b1 | b2) as u64;
        }
        (out, borrow != 0)
    }

    /// Full 512-bit product, little-endian limbs.
    pub fn mul_wide(&self, rhs: &U256) -> [u64; 8] {
        let mut out = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u128;
            for j in 0..4 {
                let t = self.0[i] as u128 * rhs.0[j] as u128 + out[i + j] as u128 + carry;
                out[i + j] = t as u64;
                carry = t >> 64;
            }
            out[i + 4] = carry as u64;
        }
        out
    }

    // self * m + a, None on overflow
    fn mul_add_u64(&self, m: u64, a: u64) -> Option<U256> {
        let mut out = U256::ZERO;
        let mut carry = a as u128;
        for i in 0..4 {
            let t = self.0[i] as u128 * m as u128 + carry;
            out.0[i] = t as u64;
            carry = t >> 64;
        }
        match carry {
            0 => Some(out),
            _ => None,
        }
    }

    pub fn shr1(&self) -> U256 {
        let mut out = U256::ZERO;
        for i in 0..3 {
            out.0[i] = (self.0[i] >> 1) | (self.0[i + 1] << 63);
        }
        out.0[3] = self.0[3] >> 1;
        out
    }

    // returns the shifted value and the bit shifted out
    fn shl1(&self) -> (U256, bool) {
        let mut out = U256::ZERO;
        out.0[0] = self.0[0] << 1;
        for i in 1..4 {
            out.0[i] = (self.0[i] << 1) | (self.0[i - 1] >> 63);
        }
        (out, self.0[3] >> 63 == 1)
    }

    /// Quotient and remainder. Variable time, not for secret operands.
    pub fn div_rem(&self, divisor: &U256) -> (U256, U256) {
        let (q, r) = div_rem_limbs(&self.0, divisor);
        (U256(q), r)
    }

    /// `floor(self * m / divisor)`, panics when the quotient does not fit in 256 bits.
    pub fn mul_u64_div(&self, m: u64, divisor: &U256) -> U256 {
        let mut num = [0u64; 5];
        let mut carry = 0u128;
        for i in 0..4 {
            let t = self.0[i] as u128 * m as u128 + carry;
            num[i] = t as u64;
            carry = t >> 64;
        }
        num[4] = carry as u64;

        let (q, _) = div_rem_limbs(&num, divisor);
        assert_eq!(q[4], 0, "Integer: quotient does not fit in 256 bits");
        U256([q[0], q[1], q[2], q[3]])
    }

    pub fn div_rem_u64(&self, divisor: u64) -> (U256, u64) {
        assert!(divisor != 0, "Integer: division by zero");
        let d = divisor as u128;
        let mut q = U256::ZERO;
        let mut r = 0u128;
        for i in (0..4).rev() {
            let cur = (r << 64) | self.0[i] as u128;
            q.0[i] = (cur / d) as u64;
            r = cur % d;
        }
        (q, r as u64)
    }
}

/// Binary long division of an arbitrary-width numerator by a 256-bit divisor.
pub(crate) fn div_rem_limbs<const N: usize>(num: &[u64; N], divisor: &U256) -> ([u64; N], U256) {
    assert!(!divisor.is_zero(), "Integer: division by zero");
    let mut q = [0u64; N];
    let mut r = U256::ZERO;
    for i in (0..64 * N).rev() {
        // r < divisor before the shift, the carry stands for bit 256
        let (shifted, carry) = r.shl1();
        r = shifted;
        r.0[0] |= (num[i / 64] >> (i % 64)) & 1;
        if carry || r >= *divisor {
            r = r.overflowing_sub(divisor).0;
            q[i / 64] |= 1 << (i % 64);
        }
    }
    (q, r)
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ConditionallySelectable for U256 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        U256([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        U256::from_u64(value)
    }
}

/// Decimal, or hexadecimal with a `0x` prefix.
impl FromStr for U256 {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };
        if digits.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut out = U256::ZERO;
        for c in digits.chars() {
            let d = c.to_digit(radix).ok_or(ParseError::InvalidDigit)?;
            out = out.mul_add_u64(radix as u64, d as u64).ok_or(ParseError::Overflow)?;
        }
        Ok(out)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut digits = Vec::with_capacity(78);
        let mut n = *self;
        while !n.is_zero() {
            let (q, r) = n.div_rem_u64(10);
            digits.push(char::from(b'0' + r as u8));
            n = q;
        }
        let s: String = digits.iter().rev().collect();
        f.write_str(&s)
    }
}

// always 64 digits
impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}{:016x}{:016x}", self.0[3], self.0[2], self.0[1], self.0[0])
    }
}
