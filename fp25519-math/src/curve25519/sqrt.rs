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

// Tonelli-Shanks square roots in GF(p).

use std::iter::{self, Chain, Once};
use std::sync::OnceLock;

use crate::curve25519::field::Fe;
use crate::uint::U256;

/// Square roots of a quadratic residue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Roots {
    /// The only root of zero.
    Single(Fe),
    /// `r` and `p - r`.
    Pair(Fe, Fe),
}

impl Roots {
    fn pair(r: Fe) -> Roots {
        let other = -&r;
        Roots::Pair(r, other)
    }

    pub fn count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Pair(..) => 2,
        }
    }
}

impl IntoIterator for Roots {
    type Item = Fe;
    type IntoIter = Chain<Once<Fe>, std::option::IntoIter<Fe>>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::Single(r) => iter::once(r).chain(None),
            Self::Pair(r, s) => iter::once(r).chain(Some(s)),
        }
    }
}

// everything here only depends on p
struct Shanks {
    // p - 1 = q * 2^s, q odd
    q: U256,
    s: u32,
    // (q + 1) / 2
    q_plus_1_half: U256,
    // z^q for the first non-residue z
    c: Fe,
}

impl Shanks {
    fn new() -> Shanks {
        let (q, s) = shanks_partition(&Fe::P);
        let z = first_non_residue();
        Shanks {
            q,
            s,
            q_plus_1_half: q.overflowing_add(&U256::ONE).0.shr1(),
            c: z.pow(&q),
        }
    }
}

fn shanks() -> &'static Shanks {
    static SHANKS: OnceLock<Shanks> = OnceLock::new();
    SHANKS.get_or_init(Shanks::new)
}

fn shanks_partition(prime: &U256) -> (U256, u32) {
    let mut q = prime.overflowing_sub(&U256::ONE).0;
    let mut s = 0;
    while !q.is_zero() && q.is_even() {
        q = q.shr1();
        s += 1;
    }
    assert!(!q.is_zero(), "Curve25519: cannot factor out the Shanks partition");
    (q, s)
}

fn first_non_residue() -> Fe {
    let mut z = Fe::from_u64(2);
    while z.is_square() {
        z += &Fe::ONE;
    }
    z
}

impl Fe {
    /// Square roots modulo p, `None` when `self` is not a quadratic residue.
    pub fn sqrt(&self) -> Option<Roots> {
        if self.is_zero() {
            return Some(Roots::Single(Fe::ZERO));
        }
        if !self.is_square() {
            return None;
        }

        let params = shanks();
        let mut m = params.s;
        let mut c = params.c;
        let mut t = self.pow(&params.q);
        let mut r = self.pow(&params.q_plus_1_half);

        loop {
            if t.is_zero() {
                return Some(Roots::Single(Fe::ZERO));
            }
            if t == Fe::ONE {
                return Some(Roots::pair(r));
            }

            // least i, 0 < i < m, such that t^(2^i) = 1
            let mut t_2i = t;
            let i = (1..m).find(|_| {
                t_2i = t_2i.sqr();
                t_2i == Fe::ONE
            }).unwrap_or(m);
            assert!(i < m, "Curve25519: Tonelli-Shanks found no order below 2^{m}");

            let b = c.pow(&U256::pow2(m - i - 1));
            m = i;
            c = b.sqr();
            t *= &c;
            r *= &b;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng};
    use rand::rngs::SmallRng;
    use super::{first_non_residue, shanks_partition, Roots};
    use crate::curve25519::field::Fe;
    use crate::uint::U256;

    fn check_square(n: Fe) {
        let roots = n.sqrt().unwrap_or_else(|| panic!("{n} should have roots"));
        if n.is_zero() {
            assert_eq!(roots, Roots::Single(Fe::ZERO));
            return;
        }
        let Roots::Pair(r, s) = roots else {
            panic!("{n} should have two roots");
        };
        assert_ne!(r, s);
        assert_eq!(&r + &s, Fe::ZERO);
        assert_eq!(r.sqr(), n, "n={n}");
        assert_eq!(s.sqr(), n, "n={n}");
    }

    fn check_not_square(n: Fe) {
        assert_eq!(n.sqrt(), None, "n={n}");
    }

    #[test]
    fn test_partition() {
        let (q, s) = shanks_partition(&Fe::P);
        assert_eq!(s, 2);
        // q = 2^253 - 5
        let expected = U256::pow2(253).overflowing_sub(&U256::from_u64(5)).0;
        assert_eq!(q, expected);
        assert_eq!(first_non_residue(), Fe::from_u64(2));

        let (q, s) = shanks_partition(&U256::from_u64(17));
        assert_eq!((q, s), (U256::ONE, 4));
    }

    #[test]
    fn test_roots() {
        let p_half = Fe::P.shr1();
        let p_minus_1_half = Fe::P.overflowing_sub(&U256::ONE).0.shr1();

        let squares = [
            Fe::ZERO,
            Fe::from_u64(1),
            Fe::from_u64(3),
            Fe::from_u64(4),
            Fe::from_u64(5),
            Fe::from_u64(9),
            Fe::new(p_half.overflowing_add(&U256::from_u64(4)).0),
            -&Fe::ONE,
        ];
        let not_squares = [
            Fe::from_u64(2),
            Fe::from_u64(6),
            Fe::from_u64(7),
            Fe::from_u64(8),
            Fe::from_u64(10),
            Fe::from_u64(100000),
            Fe::new(p_minus_1_half.overflowing_sub(&U256::ONE).0),
            Fe::new(p_minus_1_half),
            Fe::new(p_half.overflowing_add(&U256::ONE).0),
        ];

        for n in squares {
            check_square(n);
        }
        for n in not_squares {
            check_not_square(n);
        }
    }

    #[test]
    fn test_roots_of_squares() {
        let mut rng = SmallRng::seed_from_u64(255);
        let mut buf = [0u8; 32];
        for _ in 0..32 {
            rng.fill_bytes(&mut buf);
            let a = Fe::from_bytes(&buf);
            let roots = a.sqr().sqrt().unwrap();
            assert!(roots.into_iter().any(|r| r == a));
            check_square(a.sqr());

            // exactly one of a, 2a is a square
            let twice = &a * 2;
            if !a.is_zero() {
                assert_ne!(a.sqrt().is_some(), twice.sqrt().is_some());
            }
        }
    }

    #[test]
    fn test_small_range() {
        let mut residues = 0;
        for n in 1..200u64 {
            let n = Fe::from_u64(n);
            match n.sqrt() {
                Some(roots) => {
                    residues += 1;
                    assert_eq!(roots.count(), 2);
                    check_square(n);
                },
                None => assert!(!n.is_square()),
            }
        }
        assert!(residues > 0 && residues < 199);
    }
}
