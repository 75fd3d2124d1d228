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

use std::fmt;
use std::ops::{
    Add, AddAssign,
    Mul, MulAssign,
    Neg,
    Sub, SubAssign,
};

use subtle::{
    Choice,
    ConditionallySelectable,
    ConstantTimeEq,
};

use crate::uint::U256;

/// Element of GF(2^255 - 19), always stored in canonical form (below p).
#[derive(Clone, Copy, Debug)]
pub struct Fe(U256);

// Constants
impl Fe {
    pub const ZERO: Fe = Fe(U256::ZERO);
    pub const ONE: Fe = Fe(U256::ONE);

    // p = 2^255 - 19
    pub const P: U256 = U256::from_limbs([
        0xffff_ffff_ffff_ffed,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0x7fff_ffff_ffff_ffff
    ]);

    // (p - 1) / 2 = 2^254 - 10, exponent of Euler's criterion
    pub(crate) const P_MINUS_1_HALF: U256 = U256::from_limbs([
        0xffff_ffff_ffff_fff6,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0x3fff_ffff_ffff_ffff
    ]);
}

// subtracts p when v >= p, v must be below 2p
fn sub_p(v: &U256) -> U256 {
    let (diff, borrow) = v.overflowing_sub(&Fe::P);
    U256::conditional_select(&diff, v, Choice::from(borrow as u8))
}

// 2^256 = 38 (mod p)
fn reduce_wide(t: &[u64; 8]) -> Fe {
    let mut out = [0u64; 4];
    let mut carry = 0u128;
    for i in 0..4 {
        let v = t[i] as u128 + 38 * t[i + 4] as u128 + carry;
        out[i] = v as u64;
        carry = v >> 64;
    }

    // carry <= 38
    let mut carry = carry * 38;
    for limb in out.iter_mut() {
        let v = *limb as u128 + carry;
        *limb = v as u64;
        carry = v >> 64;
    }

    // a last carry leaves out[0] below 38 * 39, no overflow here
    out[0] += carry as u64 * 38;
    Fe::new(U256::from_limbs(out))
}

impl Fe {
    /// Reduces any 256-bit integer modulo p.
    pub fn new(v: U256) -> Fe {
        // 2^256 < 3p
        Fe(sub_p(&sub_p(&v)))
    }

    pub fn from_u64(n: u64) -> Fe {
        Fe::new(U256::from_u64(n))
    }

    /// Little-endian bytes, all 256 bits are taken into account.
    pub fn from_bytes(input: &[u8; 32]) -> Fe {
        Fe::new(U256::from_le_bytes(input))
    }

    pub fn bytes(&self) -> [u8; 32] {
        self.0.to_le_bytes()
    }

    pub fn to_uint(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.ct_eq(&Fe::ZERO).into()
    }

    pub fn sqr(&self) -> Fe {
        self * self
    }

    /// Square-and-multiply over all 256 bits of the exponent.
    pub fn pow(&self, e: &U256) -> Fe {
        let mut acc = Fe::ONE;
        for i in (0..256).rev() {
            acc = acc.sqr();
            let t = &acc * self;
            acc = Fe::conditional_select(&acc, &t, Choice::from(e.bit(i) as u8));
        }
        acc
    }

    /// Euler's criterion, false for zero.
    pub fn is_square(&self) -> bool {
        self.pow(&Fe::P_MINUS_1_HALF) == Fe::ONE
    }

    /// Multiplicative inverse with the extended Euclidean algorithm.
    ///
    /// Zero has no inverse: calling this on zero is a bug in the caller and panics.
    pub fn invert(&self) -> Fe {
        assert!(!self.is_zero(), "Curve25519: zero has no multiplicative inverse");
        let (gcd, x) = extended_euclid(&self.0, &Fe::P);
        assert_eq!(gcd, U256::ONE, "Curve25519: inverse does not exist");
        x
    }

    /// Exchanges `self` and `other` when `swap` is set, with the same
    /// instruction sequence either way.
    pub fn cswap(&mut self, other: &mut Fe, swap: Choice) {
        let mask = (-(swap.unwrap_u8() as i64)) as u64;

        let a = &mut self.0.0;
        let b = &mut other.0.0;
        let x0 = (a[0] ^ b[0]) & mask;
        let x1 = (a[1] ^ b[1]) & mask;
        let x2 = (a[2] ^ b[2]) & mask;
        let x3 = (a[3] ^ b[3]) & mask;

        a[0] ^= x0;
        a[1] ^= x1;
        a[2] ^= x2;
        a[3] ^= x3;

        b[0] ^= x0;
        b[1] ^= x1;
        b[2] ^= x2;
        b[3] ^= x3;
    }
}

// Returns gcd(a, b) and the coefficient x of a*x + b*y = gcd, reduced mod p.
fn extended_euclid(a: &U256, b: &U256) -> (U256, Fe) {
    let (mut old_r, mut r) = (*a, *b);
    let (mut old_s, mut s) = (Fe::ONE, Fe::ZERO);

    while !r.is_zero() {
        let (quotient, rem) = old_r.div_rem(&r);
        (old_r, r) = (r, rem);
        let next_s = &old_s - &(&Fe::new(quotient) * &s);
        (old_s, s) = (s, next_s);
    }
    (old_r, old_s)
}

impl ConstantTimeEq for Fe {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.0[..].ct_eq(&other.0.0[..])
    }
}

impl PartialEq for Fe {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Fe {}

impl ConditionallySelectable for Fe {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fe(U256::conditional_select(&a.0, &b.0, choice))
    }
}

impl From<U256> for Fe {
    fn from(value: U256) -> Self {
        Fe::new(value)
    }
}

impl AddAssign<&Fe> for Fe {
    fn add_assign(&mut self, rhs: &Fe) {
        // both operands below p, the sum cannot overflow
        let (sum, _) = self.0.overflowing_add(&rhs.0);
        self.0 = sub_p(&sum);
    }
}

impl Add<&Fe> for &Fe {
    type Output = Fe;
    fn add(self, rhs: &Fe) -> Self::Output {
        let mut out = *self;
        out += rhs;
        out
    }
}

impl SubAssign<&Fe> for Fe {
    fn sub_assign(&mut self, rhs: &Fe) {
        let (diff, borrow) = self.0.overflowing_sub(&rhs.0);
        let (wrapped, _) = diff.overflowing_add(&Fe::P);
        self.0 = U256::conditional_select(&diff, &wrapped, Choice::from(borrow as u8));
    }
}

impl Sub<&Fe> for &Fe {
    type Output = Fe;
    fn sub(self, rhs: &Fe) -> Self::Output {
        let mut out = *self;
        out -= rhs;
        out
    }
}

impl Neg for &Fe {
    type Output = Fe;
    fn neg(self) -> Self::Output {
        &Fe::ZERO - self
    }
}

impl MulAssign<&Fe> for Fe {
    fn mul_assign(&mut self, rhs: &Fe) {
        *self = reduce_wide(&self.0.mul_wide(&rhs.0));
    }
}

impl Mul<&Fe> for &Fe {
    type Output = Fe;
    fn mul(self, rhs: &Fe) -> Self::Output {
        let mut output = *self;
        output *= rhs;
        output
    }
}

impl Mul<u32> for &Fe {
    type Output = Fe;
    fn mul(self, rhs: u32) -> Self::Output {
        self * &Fe::from_u64(rhs as u64)
    }
}

impl fmt::Display for Fe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Fe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rand::{RngCore, SeedableRng};
    use rand::rngs::SmallRng;
    use subtle::Choice;
    use super::Fe;
    use crate::uint::U256;

    fn random_fe(rng: &mut SmallRng) -> Fe {
        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf);
        Fe::from_bytes(&buf)
    }

    #[test]
    fn test_constants() {
        let p_minus_1 = Fe::P.overflowing_sub(&U256::ONE).0;
        assert_eq!(p_minus_1.shr1(), Fe::P_MINUS_1_HALF);
        assert_eq!(
            format!("{:x}", Fe::P),
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"
        );
    }

    #[test]
    fn test_reduce() {
        assert_eq!(Fe::new(Fe::P), Fe::ZERO);
        assert_eq!(Fe::new(Fe::P.overflowing_add(&U256::ONE).0), Fe::ONE);
        // 2^256 - 1 = 2p + 37
        assert_eq!(Fe::new(U256::MAX), Fe::from_u64(37));
        assert_eq!(Fe::from_bytes(&[0xff; 32]), Fe::from_u64(37));
    }

    #[test]
    fn test_field25519_mul() {
        let a = hex!("b1dc286313d7299a176f9374958367d4a3d56d9608c0cad7678523c802eda07f");
        let expected = hex!("ce6a443014d9739f7fc518b426243183a09c4edb1a4686297c57a8e4da052c11");
        let exponent = hex!("2f837addb1f94760139aaecb986f16159a3ce78e1c2fb7f4dc56b98caf92be79");

        let base = Fe::from_bytes(&a);
        let res = base.pow(&U256::from_be_bytes(&exponent));
        assert_eq!(res.bytes(), expected);
    }

    #[test]
    fn test_mul_32() {
        let k = hex!("dd402e186ae0662c66048a2957b882062fbdcdc682c8a7cbf1e38ea624d0635d");
        let kmul_expected = hex!(
            "3a84600e38b6ea54bab6becb8b40bd39340711ff96584cd23669c8117eaaef46"
        );

        let k = Fe::from_bytes(&k);
        let kmul = &k * 121666;
        assert_eq!(kmul.bytes(), kmul_expected);
    }

    #[test]
    fn test_small_products() {
        let six = Fe::from_u64(6);
        let seven = Fe::from_u64(7);
        assert_eq!(&six * &seven, Fe::from_u64(42));

        // (p - 1)^2 = 1
        let minus_one = -&Fe::ONE;
        assert_eq!(minus_one.sqr(), Fe::ONE);
        assert_eq!(&minus_one + &Fe::ONE, Fe::ZERO);
        assert_eq!(&Fe::ZERO - &Fe::ONE, minus_one);
    }

    #[test]
    fn test_add() {
        let mut rng = SmallRng::seed_from_u64(25519);
        let mut a = random_fe(&mut rng);
        let b = random_fe(&mut rng);

        let c = &a + &b; // a + b
        let d = &c - &b; // a
        assert_eq!(a, d);

        a += &b;
        assert_eq!(a, c);
        a -= &b;
        assert_eq!(a, d);
        assert!(a.to_uint() < Fe::P);
    }

    #[test]
    fn test_pow() {
        assert_eq!(Fe::ONE.pow(&U256::from_u64(3)), Fe::ONE);
        assert_eq!(Fe::from_u64(2).pow(&U256::from_u64(4)), Fe::from_u64(16));
        assert_eq!(Fe::from_u64(3).pow(&U256::from_u64(5)), Fe::from_u64(243));
        assert_eq!(Fe::from_u64(5).pow(&U256::ZERO), Fe::ONE);

        // Euler's criterion
        assert_eq!(Fe::from_u64(7).pow(&Fe::P_MINUS_1_HALF), -&Fe::ONE);
        assert_eq!(Fe::from_u64(9).pow(&Fe::P_MINUS_1_HALF), Fe::ONE);
        assert!(!Fe::from_u64(7).is_square());
        assert!(Fe::from_u64(9).is_square());
        assert!(!Fe::ZERO.is_square());
    }

    #[test]
    fn test_field25519_invert() {
        let check = |n: Fe| {
            let inv = n.invert();
            assert_eq!(&n * &inv, Fe::ONE, "invert({n})");
            inv
        };

        assert_eq!(check(Fe::ONE), Fe::ONE);

        // 1/2 = (p + 1) / 2
        let half = Fe::new(Fe::P.shr1().overflowing_add(&U256::ONE).0);
        assert_eq!(check(Fe::from_u64(2)), half);
        assert_eq!(check(half), Fe::from_u64(2));

        // p + 1 reduces to 1
        assert_eq!(check(Fe::new(Fe::P.overflowing_add(&U256::ONE).0)), Fe::ONE);

        // floor(sqrt(p)) and ceil(sqrt(p))
        check(Fe::new("0xb504f333f9de6484597d89b3754abe9f".parse().unwrap()));
        check(Fe::new("0xb504f333f9de6484597d89b3754abea0".parse().unwrap()));
        check(-&Fe::ONE);

        let mut rng = SmallRng::seed_from_u64(7748);
        for _ in 0..32 {
            let a = random_fe(&mut rng);
            if !a.is_zero() {
                check(a);
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_invert_zero() {
        let _ = Fe::ZERO.invert();
    }

    #[test]
    fn test_cswap() {
        let mut rng = SmallRng::seed_from_u64(1);
        let a = random_fe(&mut rng);
        let b = random_fe(&mut rng);

        let (mut x, mut y) = (a, b);
        x.cswap(&mut y, Choice::from(0));
        assert_eq!((x, y), (a, b));

        x.cswap(&mut y, Choice::from(1));
        assert_eq!((x, y), (b, a));

        // twice is the identity
        for bit in [0u8, 1] {
            let (mut x, mut y) = (a, b);
            x.cswap(&mut y, Choice::from(bit));
            x.cswap(&mut y, Choice::from(bit));
            assert_eq!((x, y), (a, b));
        }
    }
}
