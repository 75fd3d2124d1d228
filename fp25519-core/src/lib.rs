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

mod config;
mod utils;
pub mod errors;
pub mod plot;
pub mod verify;

pub use config::Config;

pub use utils::{
    hex_flip_endian,
    parse_fe,
    parse_uint,
    to_hex
};

pub use verify::Verifier;

#[cfg(target_family="unix")]
const CONFIGURATION_FILE: &str = ".fp25519/fp25519.conf";
#[cfg(target_family="windows")]
const CONFIGURATION_FILE: &str = "Documents/fp25519/fp25519.conf";
