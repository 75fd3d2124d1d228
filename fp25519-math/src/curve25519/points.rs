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

use crate::curve25519::field::Fe;

// y^2 = x^3 + A x^2 + x
pub const MONTGOMERY_A: u32 = 486662;

/// Affine point on the Montgomery curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AffinePoint {
    pub x: Fe,
    pub y: Fe,
}

impl AffinePoint {
    pub fn is_on_curve(&self) -> bool {
        self.y.sqr() == curve_rhs(&self.x)
    }
}

/// Right-hand side of the curve equation, `x^3 + A x^2 + x`.
pub fn curve_rhs(x: &Fe) -> Fe {
    let x2 = x.sqr();
    let x3 = &x2 * x;
    let ax2 = &x2 * MONTGOMERY_A;
    &(&x3 + &ax2) + x
}

/// Curve points with abscissa `x`: none when the right-hand side is not a
/// square, one when it is zero, two otherwise.
pub fn points_at(x: &Fe) -> Vec<AffinePoint> {
    let Some(roots) = curve_rhs(x).sqrt() else {
        return Vec::new();
    };

    roots
        .into_iter()
        .map(|y| {
            let point = AffinePoint { x: *x, y };
            assert!(point.is_on_curve(), "Curve25519: ({}, {}) is not on the curve", point.x, y);
            point
        })
        .collect()
}
