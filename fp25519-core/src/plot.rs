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

use std::io::Write;

use fp25519_math::{
    AffinePoint,
    Fe,
    points_at
};

use crate::config::Config;
use crate::errors::Result;
use crate::utils::group_thousands;

/// Every curve point with an abscissa in `0..=dots`.
pub fn samples(dots: u64) -> impl Iterator<Item = AffinePoint> {
    (0..=dots).flat_map(|x| points_at(&Fe::from_u64(x)))
}

/// `floor(y * granularity / p)`, maps the field onto `0..granularity`.
pub fn rescale(y: &Fe, granularity: u64) -> u64 {
    // y < p, so the quotient is below granularity
    y.to_uint().mul_u64_div(granularity, &Fe::P).limbs()[0]
}

fn preamble(config: &Config) -> String {
    let dots = config.dots();
    let gran = config.granularity();
    format!(
        r##"
iwidth={width}
iheight={height}
set terminal pngcairo size iwidth,iheight
set border 0
unset key
unset title

xbound = {dots}
ybound = {gran}
lwidth = 3

set arrow to xbound,0 size screen 0.010,20,80 filled front linestyle 1 linetype rgb "#333333" linewidth lwidth
set arrow to 0,ybound size screen 0.010,20,80 filled front linestyle 1 linetype rgb "#333333" linewidth lwidth

set ytics ("0" 0, "p" {gran}) scale 0
set xtics ("0" 0, "{dots_label}" 0.98*{dots}) scale 0
set tics font ", 25"
set lmargin 6
set rmargin 5
set bmargin 3
set tmargin 2

plot '-' with points pt 7 lc rgb "{color}"
"##,
        width = config.width(),
        height = config.height(),
        dots_label = group_thousands(dots),
        color = config.point_color()
    )
}

/// Writes a gnuplot script plotting the curve over `0..=dots`, returns the
/// number of points written.
pub fn write_gnuplot<W: Write>(writer: &mut W, config: &Config) -> Result<usize> {
    writer.write_all(preamble(config).as_bytes())?;

    let mut count = 0;
    for point in samples(config.dots()) {
        writeln!(writer, "{} {}", point.x, rescale(&point.y, config.granularity()))?;
        count += 1;
    }
    writeln!(writer, "e")?;
    writer.flush()?;

    Ok(count)
}
