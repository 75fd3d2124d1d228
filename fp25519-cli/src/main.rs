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

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use fp25519_core::{
    Config,
    Verifier,
    hex_flip_endian,
    parse_fe,
    parse_uint,
    plot,
    to_hex
};

use fp25519_math::{
    BASE_POINT_X,
    Fe,
    U256,
    double_then_add1,
    ladder,
    points_at
};

use secrecy::{
    ExposeSecret,
    SecretBox,
    SecretString
};

use clap::{
    Arg,
    ArgAction,
    ArgMatches,
    Command,
    value_parser,
};

const FP25519_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
enum CliError {
    Io(std::io::Error),
    CoreError(fp25519_core::errors::Error),
    Usage(&'static str),
    FileAlreadyExists(PathBuf),
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<fp25519_core::errors::Error> for CliError {
    fn from(value: fp25519_core::errors::Error) -> Self {
        Self::CoreError(value)
    }
}

impl From<fp25519_math::PointError> for CliError {
    fn from(value: fp25519_math::PointError) -> Self {
        Self::CoreError(value.into())
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::CoreError(e) => write!(f, "{e}"),
            Self::Usage(s) => write!(f, "{s}"),
            Self::FileAlreadyExists(p) => write!(
                f, "File \"{}\" already exists.", p.display()
            ),
        }
    }
}

type Result<T> = core::result::Result<T, CliError>;

fn number_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
}

fn main() {
    let mut cmd = Command::new("fp25519")
        .version(FP25519_VERSION)
        .about(format!(
            "fp25519: field and curve arithmetic over 2^255-19 (version {FP25519_VERSION})\n\
            Numbers are decimal, or hexadecimal with a 0x prefix."))
        .subcommand(
            Command::new("plot")
                .about("Write a gnuplot script plotting the curve over the field")
                .arg(
                    Arg::new("dots")
                        .help("Largest x to plot")
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("granularity")
                        .help("Vertical resolution, the field is mapped onto 0..granularity")
                        .long("granularity")
                        .short('g')
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("output")
                        .help("Output file path (default: standard output)")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                )
        )
        .subcommand(
            Command::new("points")
                .about("List the curve points with a given x")
                .arg(number_arg("x", "x-coordinate"))
        )
        .subcommand(
            Command::new("sqrt")
                .about("Square roots modulo p")
                .arg(number_arg("n", "Field element"))
        )
        .subcommand(
            Command::new("inverse")
                .about("Multiplicative inverse modulo p")
                .arg(number_arg("n", "Field element"))
        )
        .subcommand(
            Command::new("mult")
                .about("Affine x-coordinate of n * P")
                .arg(number_arg("scalar", "Scalar n (no clamping)"))
                .arg(
                    Arg::new("base")
                        .help(format!("x-coordinate of P (default: {BASE_POINT_X})"))
                        .long("base")
                        .short('x')
                )
                .arg(
                    Arg::new("via")
                        .help("Algorithm")
                        .long("via")
                        .value_parser(["ladder", "add1"])
                        .default_value("ladder")
                )
        )
        .subcommand(
            Command::new("verify")
                .about("Run the known-answer test and the cross-checks")
                .arg(
                    Arg::new("random")
                        .help("Number of random field elements to check")
                        .long("random")
                        .short('r')
                        .value_parser(value_parser!(usize))
                )
                .arg(
                    Arg::new("dots")
                        .help("Check curve points for x up to this value")
                        .long("dots")
                        .short('d')
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("verbose")
                        .help("Print intermediate values")
                        .long("verbose")
                        .short('v')
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("config")
                .about("Show or change the configuration")
                .arg(
                    Arg::new("dots")
                        .help("Default largest x to plot")
                        .long("dots")
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("granularity")
                        .help("Default vertical resolution")
                        .long("granularity")
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("random")
                        .help("Default number of random checks")
                        .long("random")
                        .value_parser(value_parser!(usize))
                )
                .arg(
                    Arg::new("save")
                        .help("Write the configuration file")
                        .long("save")
                        .action(ArgAction::SetTrue)
                )
        );

    let help = cmd.render_long_help();
    let mut matches = cmd.get_matches();

    // read configuration file
    let mut config = match Config::load_config_file() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("[!] {err} (using default configuration)");
            Config::new()
        }
    };

    if let Some((cmd_name, mut matches)) = matches.remove_subcommand() {
        let res = match cmd_name.as_str() {
            "plot" => plot_curve(&mut matches, &mut config),
            "points" => list_points(&matches),
            "sqrt" => sqrt(&matches),
            "inverse" => inverse(&matches),
            "mult" => mult(&mut matches),
            "verify" => verify(&matches, &mut config),
            // only "config" remains
            _ => configure(&matches, &mut config)
        };

        if let Err(err) = res {
            eprintln!("[!] {err}");
            std::process::exit(1);
        }
    }
    else {
        eprintln!("{}", &help.ansi());
    }
}

// required arguments, cannot panic
fn get_number<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.get_one::<String>(name).unwrap()
}

fn plot_curve(matches: &mut ArgMatches, config: &mut Config) -> Result<()> {
    if let Some(&dots) = matches.get_one::<u64>("dots") {
        config.set_dots(dots);
    }
    if let Some(&granularity) = matches.get_one::<u64>("granularity") {
        config.set_granularity(granularity)?;
    }

    let count = match matches.remove_one::<PathBuf>("output") {
        Some(path) => {
            if path.exists() {
                return Err(CliError::FileAlreadyExists(path));
            }
            let mut writer = BufWriter::new(File::create(&path)?);
            plot::write_gnuplot(&mut writer, config)?
        },
        None => {
            let mut writer = BufWriter::new(std::io::stdout().lock());
            plot::write_gnuplot(&mut writer, config)?
        }
    };
    eprintln!("{count} points for x in 0..={}", config.dots());
    Ok(())
}

fn list_points(matches: &ArgMatches) -> Result<()> {
    let x = parse_fe(get_number(matches, "x"))?;
    let points = points_at(&x);
    if points.is_empty() {
        println!("No point with x = {x}.");
    }
    for point in points {
        println!("({}, {})", point.x, point.y);
    }
    Ok(())
}

fn sqrt(matches: &ArgMatches) -> Result<()> {
    let n = parse_fe(get_number(matches, "n"))?;
    match n.sqrt() {
        Some(roots) => {
            for r in roots {
                println!("{r}");
            }
        },
        None => println!("{n} has no square root modulo p.")
    }
    Ok(())
}

fn checked_inverse(n: &Fe) -> Result<Fe> {
    if n.is_zero() {
        return Err(CliError::Usage("zero has no inverse"));
    }
    Ok(n.invert())
}

fn inverse(matches: &ArgMatches) -> Result<()> {
    let n = parse_fe(get_number(matches, "n"))?;
    println!("{}", checked_inverse(&n)?);
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Via {
    Ladder,
    Add1
}

/// Affine x of `n * P`, as 64 hex digits and in little-endian wire order.
fn scalar_mult_hex(base_x: &Fe, n: &U256, via: Via) -> Result<(String, String)> {
    let point = match via {
        Via::Add1 => {
            if n.bits() > 64 {
                return Err(CliError::Usage("scalar too large for the add1 construction"));
            }
            double_then_add1(base_x, n.limbs()[0])
        },
        Via::Ladder => ladder(base_x, n)
    };

    let x = point.to_affine()?;
    let x_hex = to_hex(&x.to_uint(), 256);
    let wire = hex_flip_endian(&x_hex)?;
    Ok((x_hex, wire))
}

fn mult(matches: &mut ArgMatches) -> Result<()> {
    // "scalar" is a required argument
    let scalar = SecretString::from(matches.remove_one::<String>("scalar").unwrap());
    let n = SecretBox::new(Box::new(parse_uint(scalar.expose_secret())?));

    let base_x = match matches.get_one::<String>("base") {
        Some(s) => parse_fe(s)?,
        None => Fe::from_u64(BASE_POINT_X)
    };

    // "via" has a default value
    let via = match matches.get_one::<String>("via").unwrap().as_str() {
        "add1" => Via::Add1,
        _ => Via::Ladder
    };

    let (x_hex, wire) = scalar_mult_hex(&base_x, n.expose_secret(), via)?;
    println!("x    = {x_hex}");
    println!("wire = {wire}");
    Ok(())
}

fn verify(matches: &ArgMatches, config: &mut Config) -> Result<()> {
    if let Some(&count) = matches.get_one::<usize>("random") {
        config.set_random_checks(count);
    }
    if let Some(&dots) = matches.get_one::<u64>("dots") {
        config.set_dots(dots);
    }
    let verbose = matches.get_flag("verbose");

    let mut verifier = Verifier::new(verbose, |line: &str| println!("{line}"));
    verifier.run_suite(config)?;
    println!("All {} checks passed.", verifier.checks());
    Ok(())
}

// same syntax as the configuration file
fn config_lines(config: &Config) -> Vec<String> {
    vec![
        format!("dots = {}", config.dots()),
        format!("granularity = {}", config.granularity()),
        format!("width = {}", config.width()),
        format!("height = {}", config.height()),
        format!("point-color = \"{}\"", config.point_color()),
        format!("random-checks = {}", config.random_checks()),
    ]
}

fn configure(matches: &ArgMatches, config: &mut Config) -> Result<()> {
    if let Some(&dots) = matches.get_one::<u64>("dots") {
        config.set_dots(dots);
    }
    if let Some(&granularity) = matches.get_one::<u64>("granularity") {
        config.set_granularity(granularity)?;
    }
    if let Some(&count) = matches.get_one::<usize>("random") {
        config.set_random_checks(count);
    }

    if let Ok(path) = Config::path() {
        println!("Configuration file: {}", path.display());
    }
    for line in config_lines(config) {
        println!("{line}");
    }

    if matches.get_flag("save") {
        config.write_config_file()?;
        std::io::stdout().flush()?;
        eprintln!("Configuration saved.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use fp25519_core::Config;
    use fp25519_math::{BASE_POINT_X, Fe, U256};
    use super::{CliError, Via, checked_inverse, config_lines, scalar_mult_hex};

    fn base() -> Fe {
        Fe::from_u64(BASE_POINT_X)
    }

    #[test]
    fn test_mult_base_point() {
        for via in [Via::Ladder, Via::Add1] {
            let (x_hex, wire) = scalar_mult_hex(&base(), &U256::ONE, via).unwrap();
            assert_eq!(x_hex, format!("{}9", "0".repeat(63)));
            assert_eq!(wire, format!("09{}", "0".repeat(62)));
        }
    }

    #[test]
    fn test_mult_zero_key() {
        // X25519 public key of the all-zero private key
        let (x_hex, wire) = scalar_mult_hex(&base(), &U256::pow2(254), Via::Ladder).unwrap();
        assert_eq!(x_hex, "743bcb585f9990edc2cfc4af84f6ff300729bb5facda28154362cd47a37de52f");
        assert_eq!(wire, "2fe57da347cd62431528daac5fbb290730fff684afc4cfc2ed90995f58cb3b74");
    }

    #[test]
    fn test_mult_ladder_vs_add1() {
        let n = U256::from_u64(1000);
        assert_eq!(
            scalar_mult_hex(&base(), &n, Via::Ladder).unwrap(),
            scalar_mult_hex(&base(), &n, Via::Add1).unwrap()
        );
    }

    #[test]
    fn test_mult_errors() {
        let res = scalar_mult_hex(&base(), &U256::pow2(64), Via::Add1);
        assert!(matches!(res, Err(CliError::Usage(_))));

        let res = scalar_mult_hex(&base(), &U256::ZERO, Via::Ladder);
        assert!(matches!(res, Err(CliError::CoreError(_))));
        let res = scalar_mult_hex(&base(), &U256::ZERO, Via::Add1);
        assert!(matches!(res, Err(CliError::CoreError(_))));
    }

    #[test]
    fn test_inverse() {
        assert!(matches!(checked_inverse(&Fe::ZERO), Err(CliError::Usage(_))));

        let two = Fe::from_u64(2);
        let half = checked_inverse(&two).unwrap();
        assert_eq!(&half * &two, Fe::ONE);
    }

    #[test]
    fn test_config_lines() {
        let mut config = Config::new();
        config.set_dots(20);
        let lines = config_lines(&config);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "dots = 20");
        assert_eq!(lines[4], "point-color = \"#006400\"");
    }
}
