//! Prompt-and-validate input loops.
//!
//! Every question re-asks until it gets a valid answer, so the game logic
//! only ever sees in-range values. An empty answer takes the default.
//! End of input surfaces as `io::ErrorKind::UnexpectedEof`.

use std::io::{self, BufRead, Write};

use lunardome_logic::scores::sanitize_player_name;

pub const ANONYMOUS: &str = "Anonymous";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a block of text followed by a newline.
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{} ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// A whole number in `0..=max`; empty means zero.
    pub fn ask_quantity(&mut self, prompt: &str, max: i64) -> io::Result<i64> {
        loop {
            let answer = self.ask(&format!("{} [0-{}]:", prompt, max))?;
            if answer.is_empty() {
                return Ok(0);
            }
            match answer.replace(',', "").parse::<i64>() {
                Ok(n) if (0..=max).contains(&n) => return Ok(n),
                _ => self.say(&format!("Please enter a whole number from 0 to {}.", max))?,
            }
        }
    }

    /// One of `min..=max`; empty means `default`.
    pub fn ask_choice(
        &mut self,
        prompt: &str,
        min: usize,
        max: usize,
        default: usize,
    ) -> io::Result<usize> {
        loop {
            let answer = self.ask(&format!("{} [{}-{}, default {}]:", prompt, min, max, default))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                _ => self.say(&format!("Please choose a number from {} to {}.", min, max))?,
            }
        }
    }

    pub fn ask_yes_no(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.ask(&format!("{} {}", prompt, hint))?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer yes or no.")?,
            }
        }
    }

    /// A leaderboard name, already sanitized for the score file.
    pub fn ask_name(&mut self, prompt: &str) -> io::Result<String> {
        let name = sanitize_player_name(&self.ask(prompt)?);
        Ok(if name.is_empty() {
            ANONYMOUS.to_string()
        } else {
            name
        })
    }
}
