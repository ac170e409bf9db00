//! Interactive selection of the architecture and mode
//!
//! Used when neither the command line nor the config file names them.

use crate::error::{ConfigError, UdbgError};
use clap::ValueEnum;
use colored::Colorize;
use std::io::{BufRead, Write};

/// Ask the user to pick one value of `T` from a numbered list
///
/// Accepts either the list number or the value's name. Invalid answers are
/// asked again; end of input is an error.
pub fn prompt_choice<T, R, W>(hint: &str, input: &mut R, out: &mut W) -> Result<T, UdbgError>
where
    T: ValueEnum + Clone,
    R: BufRead,
    W: Write,
{
    let choices = T::value_variants();

    writeln!(out, "{} {}", "?".green().bold(), hint.bold())?;
    for (i, choice) in choices.iter().enumerate() {
        if let Some(value) = choice.to_possible_value() {
            writeln!(out, "  {:>2}) {}", i + 1, value.get_name())?;
        }
    }

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ConfigError::Invalid(format!("{}: no value selected", hint)).into());
        }
        let answer = line.trim();

        if let Ok(index) = answer.parse::<usize>() {
            if let Some(choice) = index.checked_sub(1).and_then(|i| choices.get(i)) {
                return Ok(choice.clone());
            }
        }
        if let Ok(choice) = T::from_str(answer, true) {
            return Ok(choice);
        }
        writeln!(out, "'{}' is not a valid choice", answer)?;
    }
}
