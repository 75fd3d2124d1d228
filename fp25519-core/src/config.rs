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

use std::path::{Path, PathBuf};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use crate::errors::{Error, Result};
use crate::CONFIGURATION_FILE;

pub const DEFAULT_DOTS: u64 = 100;
pub const DEFAULT_GRANULARITY: u64 = 1024 * 1024;
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 960;
pub const DEFAULT_POINT_COLOR: &str = "#006400";
pub const DEFAULT_RANDOM_CHECKS: usize = 32;

// removes quotes around the value
fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix("\"")?.strip_suffix("\"")
}

// "#rrggbb"
fn is_color(s: &str) -> bool {
    match s.strip_prefix("#") {
        Some(rgb) => rgb.len() == 6 && hex::decode(rgb).is_ok(),
        None => false
    }
}

fn get_configuration_file() -> Result<PathBuf> {
    match dirs::home_dir() {
        Some(home_path) => Ok(home_path.join(CONFIGURATION_FILE)),
        None => Err(Error::CannotGetHomeDir)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    dots: u64,
    granularity: u64,
    width: u32,
    height: u32,
    point_color: String,
    random_checks: usize
}

impl Config {
    const DOTS: &str = "dots";
    const GRANULARITY: &str = "granularity";
    const WIDTH: &str = "width";
    const HEIGHT: &str = "height";
    const POINT_COLOR: &str = "point-color";
    const RANDOM_CHECKS: &str = "random-checks";

    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            dots: DEFAULT_DOTS,
            granularity: DEFAULT_GRANULARITY,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            point_color: DEFAULT_POINT_COLOR.to_string(),
            random_checks: DEFAULT_RANDOM_CHECKS
        }
    }

    pub fn path() -> Result<PathBuf> {
        get_configuration_file()
    }

    pub fn load_config_file() -> Result<Self> {
        Self::load_from(&get_configuration_file()?)
    }

    /// A missing file gives the default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::new();
        if let Ok(file) = File::open(path) {
            let lines = BufReader::new(file).lines();
            for line in lines {
                let line = line?;
                config.parse_config_line(&line)?;
            }
        }
        Ok(config)
    }

    pub fn write_config_file(&self) -> Result<()> {
        self.write_to(&get_configuration_file()?)
    }

    /// Only values that differ from the defaults are written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut content = String::new();

        if self.dots != DEFAULT_DOTS {
            content.push_str(&format!("{} = {}\n", Self::DOTS, self.dots));
        }

        if self.granularity != DEFAULT_GRANULARITY {
            content.push_str(&format!("{} = {}\n", Self::GRANULARITY, self.granularity));
        }

        if self.width != DEFAULT_WIDTH {
            content.push_str(&format!("{} = {}\n", Self::WIDTH, self.width));
        }

        if self.height != DEFAULT_HEIGHT {
            content.push_str(&format!("{} = {}\n", Self::HEIGHT, self.height));
        }

        if self.point_color != DEFAULT_POINT_COLOR {
            content.push_str(&format!("{} = \"{}\"\n", Self::POINT_COLOR, self.point_color));
        }

        if self.random_checks != DEFAULT_RANDOM_CHECKS {
            content.push_str(&format!("{} = {}\n", Self::RANDOM_CHECKS, self.random_checks));
        }

        if content.is_empty() {
            // all defaults, no file
            if path.exists() {
                std::fs::remove_file(path)?;
            }
            return Ok(());
        }

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;

        Ok(())
    }

    pub fn dots(&self) -> u64 {
        self.dots
    }

    pub fn set_dots(&mut self, dots: u64) {
        self.dots = dots;
    }

    pub fn granularity(&self) -> u64 {
        self.granularity
    }

    pub fn set_granularity(&mut self, granularity: u64) -> Result<()> {
        if granularity == 0 {
            return Err(Error::Config("granularity must be positive"));
        }
        self.granularity = granularity;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn point_color(&self) -> &str {
        &self.point_color
    }

    pub fn random_checks(&self) -> usize {
        self.random_checks
    }

    pub fn set_random_checks(&mut self, count: usize) {
        self.random_checks = count;
    }

    fn parse_config_line(&mut self, line: &str) -> Result<()> {
        // comment or empty line
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("#") {
            return Ok(())
        }

        // key = value
        let Some((key, value)) = line.split_once("=") else {
            return Err(Error::Config("bad configuration line"));
        };

        let key = key.trim();
        let value = value.trim();
        if key == Self::DOTS {
            match value.parse::<u64>() {
                Ok(dots) => self.dots = dots,
                Err(_) => return Err(Error::Config("number of dots is not an integer"))
            }
        }
        else if key == Self::GRANULARITY {
            match value.parse::<u64>() {
                Ok(granularity) if granularity > 0 => self.granularity = granularity,
                _ => return Err(Error::Config("granularity must be a positive integer"))
            }
        }
        else if key == Self::WIDTH {
            match value.parse::<u32>() {
                Ok(width) if width > 0 => self.width = width,
                _ => return Err(Error::Config("width must be a positive integer"))
            }
        }
        else if key == Self::HEIGHT {
            match value.parse::<u32>() {
                Ok(height) if height > 0 => self.height = height,
                _ => return Err(Error::Config("height must be a positive integer"))
            }
        }
        else if key == Self::POINT_COLOR {
            match unquote(value) {
                Some(color) if is_color(color) => self.point_color = color.to_string(),
                _ => return Err(Error::Config("point color must be a quoted \"#rrggbb\" value"))
            }
        }
        else if key == Self::RANDOM_CHECKS {
            match value.parse::<usize>() {
                Ok(count) => self.random_checks = count,
                Err(_) => return Err(Error::Config("number of random checks is not an integer"))
            }
        }
        else {
            return Err(Error::Config("bad configuration line"))
        }

        Ok(())
    }
}
