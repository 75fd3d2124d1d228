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

use fp25519_math::{
    Fe,
    ParseError,
    PointError
};

#[derive(Debug)]
pub enum Error {
    // common errors
    Io(std::io::Error),
    Hex(hex::FromHexError),
    Parse(ParseError),
    CannotGetHomeDir,

    // curve errors
    Point(PointError),

    // verification
    CrossCheckMismatch {
        what: String,
        expected: Fe,
        got: Fe
    },
    KnownAnswerMismatch {
        expected: String,
        got: String
    },
    CurveMembership {
        x: Fe,
        y: Fe
    },
    SquareRoot(Fe),
    Inverse(Fe),

    // configuration
    Config(&'static str),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(value: hex::FromHexError) -> Self {
        Self::Hex(value)
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<PointError> for Error {
    fn from(value: PointError) -> Self {
        Self::Point(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Hex(err) => write!(f, "Hex: {err}."),
            Self::Parse(err) => write!(f, "{err}"),
            Self::CannotGetHomeDir => write!(f, "Cannot retrieve home path."),

            Self::Point(err) => write!(f, "{err}"),

            // verification
            Self::CrossCheckMismatch { what, expected, got } => write!(
                f,
                "Verification: {what} mismatch (expected {expected:x}, got {got:x})."
            ),
            Self::KnownAnswerMismatch { expected, got } => write!(
                f,
                "Verification: known answer mismatch (expected {expected}, got {got})."
            ),
            Self::CurveMembership { x, y } => write!(
                f,
                "Verification: ({x}, {y}) is not on the curve."
            ),
            Self::SquareRoot(n) => write!(f, "Verification: bad square root of {n}."),
            Self::Inverse(n) => write!(f, "Verification: bad inverse of {n}."),

            Self::Config(s) => write!(f, "Configuration: {s}."),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
