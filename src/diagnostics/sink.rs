//! Log sinks.
//!
//! A [`LogSink`] receives finished lines. The primary sink is picked from
//! the [`ColorMode`] through a [`SinkFactory`], so tests can swap in fakes
//! and observe which one was chosen. [`LogBuffer`] is the optional
//! secondary sink that keeps every line for a failure dump.

use std::f64::consts::PI;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use console::{Style, Term};

use crate::config::ColorMode;

/// Destination for formatted log lines.
///
/// Implementations receive one line at a time without a trailing newline.
pub trait LogSink: Send {
    /// Write one line.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Builds the primary sink for each color mode.
pub trait SinkFactory {
    /// Passthrough sink (`--color false`).
    fn plain(&self) -> Box<dyn LogSink>;
    /// ANSI sink (`--color true`).
    fn colorized(&self) -> Box<dyn LogSink>;
    /// Rainbow sink (`--color fabulous`).
    fn decorative(&self) -> Box<dyn LogSink>;
}

/// Pick the primary sink for `mode`.
pub fn select_primary(mode: ColorMode, factory: &dyn SinkFactory) -> Box<dyn LogSink> {
    match mode {
        ColorMode::Plain => factory.plain(),
        ColorMode::Colorized => factory.colorized(),
        ColorMode::Decorative => factory.decorative(),
    }
}

/// Factory for sinks that write to the process's stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSinks;

impl SinkFactory for TerminalSinks {
    fn plain(&self) -> Box<dyn LogSink> {
        Box::new(PlainSink::new(io::stdout()))
    }

    fn colorized(&self) -> Box<dyn LogSink> {
        Box::new(ColorSink::new(Term::stdout()))
    }

    fn decorative(&self) -> Box<dyn LogSink> {
        Box::new(RainbowSink::new(io::stdout()))
    }
}

/// Writes lines untouched.
#[derive(Debug)]
pub struct PlainSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> PlainSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> LogSink for PlainSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}

/// Writes lines that already carry ANSI styling to a terminal.
///
/// The terminal handle decides whether escape codes survive; the logger
/// does the coloring.
#[derive(Debug)]
pub struct ColorSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> ColorSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> LogSink for ColorSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}

/// Paints every character along a shifting rainbow.
#[derive(Debug)]
pub struct RainbowSink<W: Write + Send> {
    out: W,
    line: usize,
}

/// How quickly the hue turns per character.
const RAINBOW_FREQUENCY: f64 = 0.1;
/// How far each new line shifts the gradient.
const RAINBOW_LINE_SPREAD: usize = 3;

impl<W: Write + Send> RainbowSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, line: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Paint `line` starting at gradient position `offset`.
    pub fn paint(line: &str, offset: usize) -> String {
        line.chars()
            .enumerate()
            .map(|(i, c)| {
                if c.is_whitespace() {
                    c.to_string()
                } else {
                    rainbow_style(offset + i).apply_to(c).to_string()
                }
            })
            .collect()
    }
}

impl<W: Write + Send> LogSink for RainbowSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let painted = Self::paint(line, self.line * RAINBOW_LINE_SPREAD);
        self.line += 1;
        writeln!(self.out, "{}", painted)?;
        self.out.flush()
    }
}

/// 256-color cube entry for a position on the gradient.
fn rainbow_color(position: usize) -> u8 {
    let angle = RAINBOW_FREQUENCY * position as f64;
    let channel = |phase: f64| -> u8 {
        let value = (angle + phase).sin() * 127.0 + 128.0;
        (value / 255.0 * 5.0).round() as u8
    };
    let (r, g, b) = (channel(0.0), channel(2.0 * PI / 3.0), channel(4.0 * PI / 3.0));
    16 + 36 * r + 6 * g + b
}

fn rainbow_style(position: usize) -> Style {
    Style::new().color256(rainbow_color(position)).force_styling(true)
}

/// Shared in-memory copy of every emitted line.
///
/// Cloning yields another handle to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        // A writer that panicked mid-push leaves whole lines behind.
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a line.
    pub fn push_line(&self, line: &str) {
        self.guard().push(line.to_string());
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    /// Captured lines joined with newlines.
    pub fn contents(&self) -> String {
        let lines = self.guard();
        let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines.iter() {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    /// Write the captured lines to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.contents())
    }
}

impl LogSink for LogBuffer {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push_line(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::thread;
    use tempfile::TempDir;

    /// Records which factory method was asked for.
    #[derive(Default)]
    struct RecordingFactory {
        calls: RefCell<Vec<&'static str>>,
    }

    impl SinkFactory for RecordingFactory {
        fn plain(&self) -> Box<dyn LogSink> {
            self.calls.borrow_mut().push("plain");
            Box::new(LogBuffer::new())
        }

        fn colorized(&self) -> Box<dyn LogSink> {
            self.calls.borrow_mut().push("colorized");
            Box::new(LogBuffer::new())
        }

        fn decorative(&self) -> Box<dyn LogSink> {
            self.calls.borrow_mut().push("decorative");
            Box::new(LogBuffer::new())
        }
    }

    #[test]
    fn select_primary_maps_each_mode() {
        let factory = RecordingFactory::default();
        let _ = select_primary(ColorMode::Plain, &factory);
        let _ = select_primary(ColorMode::Colorized, &factory);
        let _ = select_primary(ColorMode::Decorative, &factory);
        assert_eq!(
            *factory.calls.borrow(),
            vec!["plain", "colorized", "decorative"]
        );
    }

    #[test]
    fn plain_sink_appends_newline() {
        let mut sink = PlainSink::new(Vec::new());
        sink.write_line("hello").unwrap();
        sink.write_line("world").unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "hello\nworld\n");
    }

    #[test]
    fn color_sink_keeps_escape_codes() {
        let mut sink = ColorSink::new(Vec::new());
        sink.write_line("\u{1b}[32mok\u{1b}[0m").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "\u{1b}[32mok\u{1b}[0m\n");
    }

    #[test]
    fn rainbow_sink_colors_every_visible_char() {
        let mut sink = RainbowSink::new(Vec::new());
        sink.write_line("ab c").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(console::strip_ansi_codes(&out), "ab c\n");
        assert_eq!(out.matches("\u{1b}[38;5;").count(), 3);
    }

    #[test]
    fn rainbow_gradient_shifts_between_lines() {
        let first = RainbowSink::<Vec<u8>>::paint("x", 0);
        let later = RainbowSink::<Vec<u8>>::paint("x", 10 * RAINBOW_LINE_SPREAD);
        assert_ne!(first, later);
    }

    #[test]
    fn rainbow_colors_stay_in_cube() {
        for position in 0..200 {
            let color = rainbow_color(position);
            assert!((16..=231).contains(&color));
        }
    }

    #[test]
    fn buffer_handles_share_lines() {
        let buffer = LogBuffer::new();
        let handle = buffer.clone();
        handle.push_line("one");
        buffer.push_line("two");
        assert_eq!(buffer.lines(), vec!["one", "two"]);
        assert_eq!(handle.contents(), "one\ntwo\n");
        assert_eq!(handle.len(), 2);
    }

    #[test]
    fn buffer_accepts_concurrent_writers() {
        let buffer = LogBuffer::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        buffer.push_line(&format!("thread {} line {}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(buffer.len(), 400);
        assert!(buffer
            .lines()
            .iter()
            .all(|l| l.starts_with("thread ") && l.contains(" line ")));
    }

    #[test]
    fn buffer_writes_file_with_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/run.log");
        let buffer = LogBuffer::new();
        buffer.push_line("captured");
        buffer.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "captured\n");
    }

    #[test]
    fn buffer_clear_empties() {
        let buffer = LogBuffer::new();
        buffer.push_line("x");
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
