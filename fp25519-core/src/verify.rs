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

use std::ops::RangeInclusive;

use fp25519_math::{
    BASE_POINT_X,
    Fe,
    U256,
    XzPoint,
    cswap,
    double_then_add1,
    ladder,
    point_double,
    points_at,
    repeated_double
};
use rand::RngCore;
use subtle::Choice;

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::utils::{hex_flip_endian, to_hex};

/// X25519 public key of the all-zero private key, as printed by OpenSSL
/// (little-endian hex).
pub const KNOWN_ANSWER: &str = "2fe57da347cd62431528daac5fbb290730fff684afc4cfc2ed90995f58cb3b74";

// the all-zero private key clamps to the scalar 2^254
pub const KNOWN_ANSWER_DOUBLINGS: u32 = 254;

pub const LADDER_VS_ADD1: RangeInclusive<u64> = 1..=14;
pub const ADD1_EXPONENTS: RangeInclusive<u32> = 0..=10;
pub const LARGE_EXPONENTS: [u32; 2] = [254, 255];

/// Cross-checks the arithmetic against itself and against a known answer,
/// always with the base point x = 9.
///
/// Progress lines go to `log`; intermediate values only when `verbose` is set.
pub struct Verifier<F: FnMut(&str)> {
    base: Fe,
    verbose: bool,
    log: F,
    checks: usize
}

impl<F: FnMut(&str)> Verifier<F> {
    pub fn new(verbose: bool, log: F) -> Self {
        Self {
            base: Fe::from_u64(BASE_POINT_X),
            verbose,
            log,
            checks: 0
        }
    }

    /// Number of successful checks so far.
    pub fn checks(&self) -> usize {
        self.checks
    }

    fn trace(&mut self, msg: impl FnOnce() -> String) {
        if self.verbose {
            (self.log)(&msg());
        }
    }

    fn compare(&mut self, what: impl FnOnce() -> String, expected: Fe, got: Fe) -> Result<()> {
        if expected != got {
            return Err(Error::CrossCheckMismatch { what: what(), expected, got });
        }
        self.checks += 1;
        Ok(())
    }

    /// Doubles the base point 254 times and compares with the byte-reversed
    /// known answer.
    pub fn known_answer(&mut self) -> Result<Fe> {
        let want = hex_flip_endian(KNOWN_ANSWER)?;
        self.trace(|| format!("finding {want}"));

        let last = KNOWN_ANSWER_DOUBLINGS;
        let mut point = XzPoint::from_x(&self.base);
        for i in 0..=last {
            if i > 0 {
                point = point_double(&point);
            }
            if i == 5 {
                self.trace(|| "...".to_string());
            }
            if self.verbose && (i < 5 || i + 4 > last) {
                let x = point.to_affine()?;
                self.trace(|| format!("{{2^{i:03}}}P X={x:x}"));
            }
        }

        let x = point.to_affine()?;
        let got = to_hex(&x.to_uint(), 256);
        if got != want {
            return Err(Error::KnownAnswerMismatch { expected: want, got });
        }
        self.checks += 1;
        Ok(x)
    }

    /// `2^k P` by repeated doubling and by the add1 construction.
    ///
    /// The add1 side is linear in `2^k`, keep `k` small.
    pub fn add1_vs_doubling(&mut self, k: u32) -> Result<()> {
        let n = 1u64 << k;
        let via_doubling = repeated_double(&self.base, k).to_affine()?;
        let via_add1 = double_then_add1(&self.base, n).to_affine()?;
        self.trace(|| format!("{n:03}P via 2x is {via_doubling:x}"));
        self.trace(|| format!("{n:03}P via +1 is {via_add1:x}"));
        self.compare(|| format!("{n}P add1 vs doubling"), via_doubling, via_add1)
    }

    pub fn ladder_vs_add1(&mut self, n: u64) -> Result<()> {
        let expected = double_then_add1(&self.base, n).to_affine()?;
        let got = ladder(&self.base, &U256::from_u64(n)).to_affine()?;
        self.trace(|| format!("{n}P chk_X is {got:x}"));
        self.compare(|| format!("{n}P ladder vs add1"), expected, got)
    }

    pub fn ladder_vs_doubling(&mut self, k: u32) -> Result<()> {
        let expected = repeated_double(&self.base, k).to_affine()?;
        let got = ladder(&self.base, &U256::pow2(k)).to_affine()?;
        self.trace(|| format!("{{2^{k}}}P chk_X is {got:x}"));
        self.compare(|| format!("2^{k}P ladder vs doubling"), expected, got)
    }

    /// Every point of `points_at(x)` for `x` in `0..=dots` must be on the
    /// curve, and two points at the same `x` must be opposite.
    pub fn curve_points(&mut self, dots: u64) -> Result<usize> {
        let mut count = 0;
        for x in 0..=dots {
            let points = points_at(&Fe::from_u64(x));
            for point in points.iter() {
                if !point.is_on_curve() {
                    return Err(Error::CurveMembership { x: point.x, y: point.y });
                }
            }
            if let [a, b] = points.as_slice() {
                if &a.y + &b.y != Fe::ZERO {
                    return Err(Error::SquareRoot(a.y.sqr()));
                }
            }
            count += points.len();
        }
        self.checks += 1;
        self.trace(|| format!("{count} points with x in 0..={dots}"));
        Ok(count)
    }

    /// Inverse and square root of random elements, and the `cswap` involution.
    pub fn random_field_checks<R: RngCore + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R
    ) -> Result<()> {
        let mut buf = [0u8; 32];
        for _ in 0..count {
            rng.fill_bytes(&mut buf);
            let a = Fe::from_bytes(&buf);

            if !a.is_zero() && &a * &a.invert() != Fe::ONE {
                return Err(Error::Inverse(a));
            }

            let square = a.sqr();
            match square.sqrt() {
                Some(roots) if roots.into_iter().all(|r| r.sqr() == square)
                    && roots.into_iter().any(|r| r == a) => (),
                _ => return Err(Error::SquareRoot(square))
            }

            match a.sqrt() {
                Some(roots) if roots.into_iter().any(|r| r.sqr() != a) => {
                    return Err(Error::SquareRoot(a));
                },
                None if a.is_square() => return Err(Error::SquareRoot(a)),
                _ => ()
            }

            rng.fill_bytes(&mut buf);
            let b = Fe::from_bytes(&buf);
            let swap = Choice::from(buf[0] & 1);
            let (c, d) = cswap(swap, a, b);
            let (e, f) = cswap(swap, c, d);
            self.compare(|| "cswap involution".to_string(), a, e)?;
            self.compare(|| "cswap involution".to_string(), b, f)?;
        }
        self.trace(|| format!("{count} random elements checked"));
        Ok(())
    }

    /// Runs every check, stops at the first failure.
    pub fn run_suite(&mut self, config: &Config) -> Result<()> {
        self.known_answer()?;
        (self.log)(&format!("[+] known answer 2^{KNOWN_ANSWER_DOUBLINGS}P"));

        for k in ADD1_EXPONENTS {
            self.add1_vs_doubling(k)?;
        }
        (self.log)(&format!("[+] add1 vs doubling for 2^k, k in {ADD1_EXPONENTS:?}"));

        for n in LADDER_VS_ADD1 {
            self.ladder_vs_add1(n)?;
        }
        for k in ADD1_EXPONENTS {
            self.ladder_vs_add1(1 << k)?;
        }
        (self.log)(&format!(
            "[+] ladder vs add1 for n in {LADDER_VS_ADD1:?} and 2^k, k in {ADD1_EXPONENTS:?}"
        ));

        for k in ADD1_EXPONENTS.chain(LARGE_EXPONENTS) {
            self.ladder_vs_doubling(k)?;
        }
        (self.log)(&format!(
            "[+] ladder vs doubling for 2^k, k in {ADD1_EXPONENTS:?} and {LARGE_EXPONENTS:?}"
        ));

        let count = self.curve_points(config.dots())?;
        (self.log)(&format!("[+] {count} curve points for x in 0..={}", config.dots()));

        let random_checks = config.random_checks();
        self.random_field_checks(random_checks, &mut rand::rng())?;
        (self.log)(&format!("[+] {random_checks} random field elements"));

        Ok(())
    }
}
