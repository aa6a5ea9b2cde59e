use std::io::{self, Write};
use std::thread;
use std::time::Duration;

pub const HEADING: &str = "Soliloquy";
const LETTER_DELAY: Duration = Duration::from_millis(100);

/// Prints the heading one letter at a time, then calls `on_complete`.
pub struct SplitHeading<'a> {
    text: &'a str,
    letter_delay: Duration,
}

impl<'a> SplitHeading<'a> {
    pub fn new(text: &'a str, animate: bool) -> Self {
        Self {
            text,
            letter_delay: if animate { LETTER_DELAY } else { Duration::ZERO },
        }
    }

    pub fn reveal<W: Write>(&self, out: &mut W, on_complete: impl FnOnce()) -> io::Result<()> {
        for ch in self.text.chars() {
            write!(out, "{ch}")?;
            out.flush()?;
            if !self.letter_delay.is_zero() {
                thread::sleep(self.letter_delay);
            }
        }
        writeln!(out)?;
        writeln!(out)?;
        on_complete();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_writes_text_and_calls_back() {
        let mut out = Vec::new();
        let mut done = false;
        SplitHeading::new(HEADING, false)
            .reveal(&mut out, || done = true)
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Soliloquy\n\n");
        assert!(done);
    }
}
