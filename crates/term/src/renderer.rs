//! TerminalRenderer: flushes rendered lines to a real terminal.
//!
//! Only rows that changed since the previous frame are rewritten.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::view::{Line, Tone};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Vec<Line>>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a frame, rewriting only the rows that differ from the last one.
    pub fn draw(&mut self, lines: Vec<Line>) -> Result<()> {
        self.buf.clear();
        match self.last.as_ref() {
            Some(prev) => encode_diff_into(prev, &lines, &mut self.buf)?,
            None => encode_full_into(&lines, &mut self.buf)?,
        }
        if !self.buf.is_empty() {
            self.flush_buf()?;
        }
        self.last = Some(lines);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(lines: &[Line], out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for (y, line) in lines.iter().enumerate() {
        encode_row_into(y as u16, line, out)?;
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the changed rows into `out`. Leaves `out` empty when nothing
/// changed.
pub fn encode_diff_into(prev: &[Line], next: &[Line], out: &mut Vec<u8>) -> Result<()> {
    let rows = changed_rows(prev, next);
    if rows.is_empty() {
        return Ok(());
    }
    for y in rows {
        match next.get(y) {
            Some(line) => encode_row_into(y as u16, line, out)?,
            None => {
                out.queue(cursor::MoveTo(0, y as u16))?;
                out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
            }
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn encode_row_into(y: u16, line: &Line, out: &mut Vec<u8>) -> Result<()> {
    out.queue(cursor::MoveTo(0, y))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(tone_color(line.tone)))?;
    match line.tone {
        Tone::Title => {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        Tone::Dim => {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        _ => {}
    }
    out.queue(Print(&line.text))?;
    Ok(())
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Normal => Color::Rgb { r: 220, g: 220, b: 220 },
        Tone::Title => Color::Rgb { r: 255, g: 255, b: 255 },
        Tone::Accent => Color::Rgb { r: 80, g: 200, b: 255 },
        Tone::Good => Color::Rgb { r: 90, g: 220, b: 120 },
        Tone::Bad => Color::Rgb { r: 255, g: 90, b: 90 },
        Tone::Warn => Color::Rgb { r: 255, g: 200, b: 60 },
        Tone::Dim => Color::Rgb { r: 140, g: 140, b: 140 },
    }
}

/// Row indices that must be rewritten to turn `prev` into `next`, including
/// rows that disappeared.
pub fn changed_rows(prev: &[Line], next: &[Line]) -> Vec<usize> {
    (0..prev.len().max(next.len()))
        .filter(|&y| prev.get(y) != next.get(y))
        .collect()
}
