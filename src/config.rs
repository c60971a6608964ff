use std::path::PathBuf;

use crate::tick::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

use clap::Parser;
use thiserror::Error;

pub const HELP_TEXT: &str = "\
A Snake game.

 Use arrow keys or 'w', 'a', 's', 'd' to move.
 Use Space to pause.
 Use 'q' to quit the game.

Arguments:
 -h        Print help
 -d [num]  Set difficulty (speed), 0 to 10. Default: 5";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    // Difficulty actually goes to 11
    #[error("Invalid difficulty '{0}': Must be between 0 and 10")]
    InvalidDifficulty(i64),
}

#[derive(Debug, Parser)]
#[command(name = "snake", override_help = HELP_TEXT)]
pub struct Options {
    #[arg(short = 'd', value_name = "num", default_value_t = DEFAULT_DIFFICULTY, value_parser = parse_difficulty)]
    pub difficulty: u8,

    /// Write diagnostics to this file
    #[arg(long, value_name = "PATH", env = "SNAKE_LOG")]
    pub log_file: Option<PathBuf>,
}

pub fn parse_difficulty(arg: &str) -> Result<u8, ConfigError> {
    let val = leading_int(arg);
    if (0..=MAX_DIFFICULTY as i64).contains(&val) {
        Ok(val as u8)
    } else {
        Err(ConfigError::InvalidDifficulty(val))
    }
}

// Reads an optionally signed leading integer the way C's atoi does: anything
// unparsable counts as 0.
fn leading_int(arg: &str) -> i64 {
    let s = arg.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add((d - b'0') as i64));

    if negative { -magnitude } else { magnitude }
}
