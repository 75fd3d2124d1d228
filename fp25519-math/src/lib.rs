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

pub mod curve25519;
pub mod uint;

pub use curve25519::{
    field::Fe,
    points::{
        AffinePoint,
        MONTGOMERY_A,
        curve_rhs,
        points_at
    },
    scalarmult::{
        PointError,
        XzPoint,
        cswap,
        double_then_add1,
        ladder,
        point_add1,
        point_double,
        repeated_double
    },
    sqrt::Roots,
};

pub use uint::{
    ParseError,
    U256
};

// x-coordinate of the Curve25519 base point
pub const BASE_POINT_X: u64 = 9;
