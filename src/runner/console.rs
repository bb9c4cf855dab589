use super::{ButtonState, DisplaySurface, Frame, InputEvent, InputSource, ResponseOption, Tone};
use crate::error::WagerResult;
use std::io::{BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Text rendering of frames on any writer (stdout in the binary).
pub struct ConsoleDisplay<W: Write> {
    out: W,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, fullscreen: bool) -> Self {
        if fullscreen {
            debug!("Fullscreen requested; the console surface ignores it");
        }
        Self { out }
    }
}

fn option_label(o: &ResponseOption) -> String {
    let tone = match o.tone {
        Tone::Safe => " (green)",
        Tone::Risky => " (red)",
        Tone::Neutral => "",
    };
    let key = if o.key == ' ' {
        "Enter".to_string()
    } else {
        o.key.to_string()
    };
    match o.state {
        ButtonState::Active => format!("[{}] {}{}", key, o.text, tone),
        ButtonState::Disabled => format!("[-] {}{}", o.text, tone),
    }
}

impl<W: Write> DisplaySurface for ConsoleDisplay<W> {
    fn show(&mut self, frame: &Frame<'_>) -> WagerResult<()> {
        match frame {
            Frame::Instructions(text) => writeln!(self.out, "\n{}", text)?,
            Frame::Fixation => writeln!(self.out, "        +")?,
            Frame::Study { word, stimulus } => {
                writeln!(self.out, "    {}    <{}>", word, stimulus.display())?
            }
            Frame::Decision { prompt, options } => {
                if let Some(p) = prompt {
                    writeln!(self.out, "    {}", p)?;
                }
                let line: Vec<String> = options.iter().map(option_label).collect();
                writeln!(self.out, "    {}", line.join("    "))?;
            }
            Frame::Feedback { points, total } => {
                writeln!(self.out, "    {:+} points (total {})", points, total)?
            }
            Frame::Blank => writeln!(self.out)?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn pause(&mut self, duration: Duration) -> WagerResult<()> {
        thread::sleep(duration);
        Ok(())
    }
}

/// Line-based keyboard input: type an option's key (or its name) and press
/// Enter. `q` quits; end of input also quits.
pub struct ConsoleInput<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

fn match_option<'o>(line: &str, options: &'o [ResponseOption]) -> Option<&'o ResponseOption> {
    let active = || options.iter().filter(|o| o.state == ButtonState::Active);
    if line.is_empty() {
        return active().find(|o| o.key == ' ');
    }
    let lower = line.to_lowercase();
    active().find(|o| {
        (lower.chars().count() == 1 && lower.starts_with(o.key)) || o.id.to_lowercase() == lower
    })
}

impl<R: BufRead> InputSource for ConsoleInput<R> {
    fn next_event(&mut self, options: &[ResponseOption]) -> WagerResult<InputEvent> {
        let start = Instant::now();
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(InputEvent::Quit);
            }
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                return Ok(InputEvent::Quit);
            }
            if let Some(o) = match_option(trimmed, options) {
                return Ok(InputEvent::Choice {
                    id: o.id.clone(),
                    rt_secs: start.elapsed().as_secs_f64(),
                });
            }
        }
    }
}
