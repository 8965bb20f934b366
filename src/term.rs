use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, ResetColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use std::time::Duration;

/// Alternate-screen session that redraws only the lines that changed.
pub(crate) struct Terminal {
    out: io::Stdout,
    prev: Vec<String>,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        Ok(Self {
            out,
            prev: Vec::new(),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn present(&mut self, lines: &[String]) -> anyhow::Result<()> {
        let (_, rows) = terminal::size()?;
        queue!(self.out, BeginSynchronizedUpdate)?;

        let total = lines.len().max(self.prev.len()).min(rows as usize);
        for y in 0..total {
            let line = lines.get(y).map(String::as_str).unwrap_or("");
            if self.prev.get(y).map(String::as_str) == Some(line) {
                continue;
            }
            queue!(
                self.out,
                cursor::MoveTo(0, y as u16),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }

        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev = lines.to_vec();
        Ok(())
    }
}

/// Drains pending key presses; true when one of them asks to quit.
pub(crate) fn quit_requested(max_wait: Duration) -> anyhow::Result<bool> {
    let timeout = std::cmp::min(Duration::from_millis(1), max_wait);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl_c =
                k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || matches!(k.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
