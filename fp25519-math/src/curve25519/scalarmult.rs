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

use subtle::Choice;
use zeroize::Zeroize;

use crate::curve25519::field::Fe;
use crate::uint::U256;

// (A + 2) / 4
const A24_PLUS: u32 = 121666;
// (A - 2) / 4, RFC 7748 ladder constant
const A24: u32 = 121665;

#[derive(Debug, PartialEq, Eq)]
pub enum PointError {
    Infinity,
}

impl std::fmt::Display for PointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infinity => write!(f, "Curve25519: the point at infinity has no affine x-coordinate."),
        }
    }
}

/// x-coordinate of a point in the XZ coordinate system, x = X/Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XzPoint {
    pub x: Fe,
    pub z: Fe,
}

impl XzPoint {
    // infinity point, (1:0)
    pub const IDENTITY: XzPoint = XzPoint { x: Fe::ONE, z: Fe::ZERO };

    pub fn from_x(x: &Fe) -> XzPoint {
        XzPoint { x: *x, z: Fe::ONE }
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn to_affine(&self) -> Result<Fe, PointError> {
        if self.is_infinity() {
            return Err(PointError::Infinity);
        }
        Ok(&self.x * &self.z.invert())
    }
}

/// Returns `(b, a)` when `swap` is set, `(a, b)` otherwise, in constant time.
pub fn cswap(swap: Choice, a: Fe, b: Fe) -> (Fe, Fe) {
    let (mut a, mut b) = (a, b);
    a.cswap(&mut b, swap);
    (a, b)
}

/// Montgomery ladder: projective x of `n * P` where `P = (base_x : 1)`.
///
/// All 256 bits of `n` are processed, from bit 255 down to bit 0, with no
/// clamping. Control flow and memory accesses do not depend on `n`.
pub fn ladder(base_x: &Fe, n: &U256) -> XzPoint {
    let mut k = *n;

    // p: infinity point (1:0), q: the base point (x:1)
    let x1 = *base_x;
    let mut x2 = Fe::ONE;
    let mut z2 = Fe::ZERO;
    let mut x3 = x1;
    let mut z3 = Fe::ONE;

    let mut swap = 0u8;
    for i in (0..256).rev() {
        let bit = k.bit(i) as u8;
        swap ^= bit;
        x2.cswap(&mut x3, Choice::from(swap));
        z2.cswap(&mut z3, Choice::from(swap));
        swap = bit;

        // ladder step
        let a = &x2 + &z2;
        let aa = a.sqr();
        let b = &x2 - &z2;
        let bb = b.sqr();
        let e = &aa - &bb;
        let c = &x3 + &z3;
        let d = &x3 - &z3;
        let da = &d * &a;
        let cb = &c * &b;
        x3 = (&da + &cb).sqr();
        z3 = &x1 * &(&da - &cb).sqr();
        x2 = &aa * &bb;
        z2 = &e * &(&aa + &(&e * A24));
    }
    x2.cswap(&mut x3, Choice::from(swap));
    z2.cswap(&mut z3, Choice::from(swap));

    k.zeroize();

    XzPoint { x: x2, z: z2 }
}

/// X_2n = (X_n + Z_n)^2 (X_n - Z_n)^2
/// Z_2n = 4 X_n Z_n ((X_n - Z_n)^2 + ((A + 2) / 4) 4 X_n Z_n)
pub fn point_double(point: &XzPoint) -> XzPoint {
    let sum = (&point.x + &point.z).sqr();
    let diff = (&point.x - &point.z).sqr();
    let xz4 = &(&point.x * &point.z) * 4;
    XzPoint {
        x: &sum * &diff,
        z: &xz4 * &(&diff + &(&xz4 * A24_PLUS)),
    }
}

/// Differential addition: `(n + 1)P` from `nP`, `(n - 1)P` and `P`.
///
/// X_n+1 = Z_n-1 ((X_n - Z_n)(X_1 + Z_1) + (X_n + Z_n)(X_1 - Z_1))^2
/// Z_n+1 = X_n-1 ((X_n - Z_n)(X_1 + Z_1) - (X_n + Z_n)(X_1 - Z_1))^2
pub fn point_add1(current: &XzPoint, previous: &XzPoint, base: &XzPoint) -> XzPoint {
    let da = &(&current.x - &current.z) * &(&base.x + &base.z);
    let cb = &(&current.x + &current.z) * &(&base.x - &base.z);
    XzPoint {
        x: &previous.z * &(&da + &cb).sqr(),
        z: &previous.x * &(&da - &cb).sqr(),
    }
}

/// `n * P` by one doubling followed by `n - 2` differential additions.
///
/// Linear in `n` and not constant time: only meant to cross-check `ladder`.
pub fn double_then_add1(base_x: &Fe, n: u64) -> XzPoint {
    let base = XzPoint::from_x(base_x);
    match n {
        0 => return XzPoint::IDENTITY,
        1 => return base,
        _ => ()
    }

    let mut previous = base;
    let mut current = point_double(&base);
    for _ in 2..n {
        let next = point_add1(&current, &previous, &base);
        previous = current;
        current = next;
    }
    current
}

/// `2^k * P` by `k` successive doublings.
pub fn repeated_double(base_x: &Fe, k: u32) -> XzPoint {
    let mut point = XzPoint::from_x(base_x);
    for _ in 0..k {
        point = point_double(&point);
    }
    point
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rand::{RngCore, SeedableRng};
    use rand::rngs::SmallRng;
    use subtle::Choice;
    use super::{
        cswap,
        double_then_add1,
        ladder,
        point_double,
        repeated_double,
        PointError,
        XzPoint,
    };
    use crate::curve25519::field::Fe;
    use crate::uint::U256;

    fn base() -> Fe {
        Fe::from_u64(9)
    }

    fn affine(point: XzPoint) -> Fe {
        point.to_affine().unwrap()
    }

    // clamping is left to the caller
    fn x25519(k: &[u8; 32], u: &[u8; 32]) -> [u8; 32] {
        let mut k = *k;
        k[0] &= 248;
        k[31] &= 127;
        k[31] |= 64;
        let mut u = *u;
        u[31] &= 127;
        affine(ladder(&Fe::from_bytes(&u), &U256::from_le_bytes(&k))).bytes()
    }

    #[test]
    fn test_ladder_rfc7748() {
        // source: https://datatracker.ietf.org/doc/html/rfc7748#section-5.2
        let k = hex!("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
        let base = hex!("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
        let x_expected = hex!("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");
        assert_eq!(x25519(&k, &base), x_expected);

        let k = hex!("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
        let base = hex!("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
        let x_expected = hex!("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");
        assert_eq!(x25519(&k, &base), x_expected);
    }

    #[test]
    fn test_zero_key() {
        // public key of the all-zero private key, i.e. scalar 2^254 once clamped
        let expected = hex!("2fe57da347cd62431528daac5fbb290730fff684afc4cfc2ed90995f58cb3b74");
        assert_eq!(affine(repeated_double(&base(), 254)).bytes(), expected);
        assert_eq!(affine(ladder(&base(), &U256::pow2(254))).bytes(), expected);
        assert_eq!(x25519(&[0u8; 32], &base().bytes()), expected);
    }

    #[test]
    fn test_ladder_vs_add1() {
        for n in 1..=14u64 {
            let via_add1 = affine(double_then_add1(&base(), n));
            let via_ladder = affine(ladder(&base(), &U256::from_u64(n)));
            assert_eq!(via_ladder, via_add1, "{n}P");
        }
        for k in 0..=10u32 {
            let n = 1u64 << k;
            let via_add1 = affine(double_then_add1(&base(), n));
            let via_ladder = affine(ladder(&base(), &U256::pow2(k)));
            assert_eq!(via_ladder, via_add1, "{n}P");
        }
    }

    #[test]
    fn test_add1_vs_doubling() {
        for k in 0..10u32 {
            let via_doubling = affine(repeated_double(&base(), k));
            let via_add1 = affine(double_then_add1(&base(), 1 << k));
            assert_eq!(via_doubling, via_add1, "2^{k}P");
        }
    }

    #[test]
    fn test_ladder_vs_doubling() {
        for k in (0..=10u32).chain([100, 254, 255]) {
            let via_doubling = affine(repeated_double(&base(), k));
            let via_ladder = affine(ladder(&base(), &U256::pow2(k)));
            assert_eq!(via_ladder, via_doubling, "2^{k}P");
        }
    }

    #[test]
    fn test_small_multiples() {
        assert_eq!(double_then_add1(&base(), 0), XzPoint::IDENTITY);
        assert_eq!(double_then_add1(&base(), 1), XzPoint::from_x(&base()));
        assert_eq!(double_then_add1(&base(), 2), point_double(&XzPoint::from_x(&base())));

        assert!(ladder(&base(), &U256::ZERO).is_infinity());
        assert_eq!(affine(ladder(&base(), &U256::ONE)), base());
        assert_eq!(
            XzPoint::IDENTITY.to_affine(),
            Err(PointError::Infinity)
        );
        assert_eq!(point_double(&XzPoint::IDENTITY), XzPoint::IDENTITY);
    }

    #[test]
    fn test_ladder_linearity() {
        // a * (b * P) = (a * b) * P
        let a = U256::from_u64(0x1234_5678);
        let b = U256::from_u64(0x9abc_def0);
        let ab = U256::from_u64(0x1234_5678 * 0x9abc_def0);
        let bp = affine(ladder(&base(), &b));
        assert_eq!(affine(ladder(&bp, &a)), affine(ladder(&base(), &ab)));
    }

    #[test]
    fn test_cswap_involution() {
        let mut rng = SmallRng::seed_from_u64(19);
        let mut buf = [0u8; 32];
        for _ in 0..8 {
            rng.fill_bytes(&mut buf);
            let a1 = Fe::from_bytes(&buf);
            rng.fill_bytes(&mut buf);
            let a2 = Fe::from_bytes(&buf);
            for bit in [0u8, 1] {
                let (b1, b2) = cswap(Choice::from(bit), a1, a2);
                assert_eq!(cswap(Choice::from(bit), b1, b2), (a1, a2));
            }
            assert_eq!(cswap(Choice::from(1), a1, a2), (a2, a1));
            assert_eq!(cswap(Choice::from(0), a1, a2), (a1, a2));
        }
    }

    #[ignore]
    #[test]
    fn test_ladder_vs_add1_long() {
        // this test is long, so it is ignored by default
        for n in 15..2000u64 {
            let via_add1 = affine(double_then_add1(&base(), n));
            let via_ladder = affine(ladder(&base(), &U256::from_u64(n)));
            assert_eq!(via_ladder, via_add1, "{n}P");
        }
    }
}
