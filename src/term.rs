//! Terminal display sink: clears and redraws the full row sequence each turn.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    QueueableCommand, cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::Print,
    terminal,
};

use crate::{
    renderer::Frame,
    session::{Command, Session},
};

pub struct TerminalSink {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        self.buf.clear();
        encode_frame_into(frame, &mut self.buf)?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Full clear followed by every row, without touching stdout.
pub fn encode_frame_into(frame: &Frame, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;
    for y in 0..frame.height() {
        out.queue(Print(frame.row(y)))?;
        if y + 1 < frame.height() {
            out.queue(Print("\r\n"))?;
        }
    }
    Ok(())
}

/// Turn-based loop: draw, block on a key, apply at most one command, repeat.
pub fn run(mut session: Session) -> Result<()> {
    let mut sink = TerminalSink::new();
    sink.enter()?;
    let result = play(&mut sink, &mut session);
    // Always try to restore the terminal.
    let _ = sink.exit();
    result?;

    println!("Game Over! Final Score: {}", session.score());
    Ok(())
}

fn play(sink: &mut TerminalSink, session: &mut Session) -> Result<()> {
    sink.draw(&session.frame())?;
    while !session.is_over() {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let command = match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Command::Quit)
                    }
                    KeyCode::Esc => Some(Command::Quit),
                    KeyCode::Char(ch) => Command::from_key(ch),
                    _ => None,
                };
                if let Some(command) = command {
                    if session.apply(command) {
                        sink.draw(&session.frame())?;
                    }
                }
            }
            Event::Resize(..) => sink.draw(&session.frame())?,
            _ => {}
        }
    }
    Ok(())
}
