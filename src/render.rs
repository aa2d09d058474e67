use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::game::{Dir, Frontend, Input, Paint, Status};
use crate::grid::Pos;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Blank,
    Lattice,
    Obstacle,
    Path,
    Player,
    Start,
    Goal,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: Glyph::Blank,
    color: Color::Reset,
};

impl From<Paint> for Cell {
    fn from(paint: Paint) -> Self {
        match paint {
            Paint::Floor => Cell {
                glyph: Glyph::Lattice,
                color: Color::DarkGrey,
            },
            Paint::Obstacle => Cell {
                glyph: Glyph::Obstacle,
                color: Color::Grey,
            },
            Paint::Path => Cell {
                glyph: Glyph::Path,
                color: Color::DarkYellow,
            },
            Paint::Player => Cell {
                glyph: Glyph::Player,
                color: Color::Yellow,
            },
            Paint::Start => Cell {
                glyph: Glyph::Start,
                color: Color::Blue,
            },
            Paint::Goal => Cell {
                glyph: Glyph::Goal,
                color: Color::Blue,
            },
        }
    }
}

/// Crossterm frontend: composes each frame into a buffer and only redraws cells
/// that changed since the last presented frame.
pub struct TerminalFrontend<W: Write> {
    out: W,
    width: usize,
    height: usize,
    next: Vec<Cell>,
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    frame_time: Duration,
    frame_start: Instant,
}

impl<W: Write> TerminalFrontend<W> {
    pub fn new(out: W, width: usize, height: usize, frame_time: Duration) -> Self {
        Self {
            out,
            width,
            height,
            next: vec![BLANK; width * height],
            last: vec![BLANK; width * height],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            frame_time,
            frame_start: Instant::now(),
        }
    }

    /// Columns and rows the board and HUD need, saturating at the terminal maximum.
    fn needed_size(&self) -> (u16, u16) {
        let w = self.width.saturating_mul(CELL_W);
        let h = self.height.saturating_add(2);
        (
            u16::try_from(w).unwrap_or(u16::MAX),
            u16::try_from(h).unwrap_or(u16::MAX),
        )
    }

    /// Queues every cell that differs from the last presented frame, or all of them
    /// after a full invalidation. Returns how many were drawn.
    fn draw_changed(&mut self) -> io::Result<usize> {
        let mut drawn = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let cell = self.next[idx];
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(x, y, cell)?;
                    drawn += 1;
                }
            }
        }
        self.needs_full = false;
        Ok(drawn)
    }

    fn draw_cell(&mut self, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Blank => "  ",
            Glyph::Lattice => "· ",
            Glyph::Obstacle => "██",
            Glyph::Path => "░░",
            Glyph::Player => "😃",
            Glyph::Start => "◆ ",
            Glyph::Goal => "🏁",
        };
        let x_pos = self
            .origin_x
            .saturating_add(u16::try_from(x * CELL_W).unwrap_or(u16::MAX));
        let y_pos = self
            .origin_y
            .saturating_add(u16::try_from(y).unwrap_or(u16::MAX));
        self.out.queue(MoveTo(x_pos, y_pos))?;
        self.out.queue(SetForegroundColor(cell.color))?;
        self.out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                self.out.queue(Print(' '))?;
            }
        }
        self.out.queue(ResetColor)?;
        Ok(())
    }
}

impl<W: Write> Frontend for TerminalFrontend<W> {
    fn clear(&mut self) -> io::Result<()> {
        self.frame_start = Instant::now();
        self.next.fill(BLANK);
        Ok(())
    }

    fn draw_grid_lines(&mut self) -> io::Result<()> {
        self.next.fill(Paint::Floor.into());
        Ok(())
    }

    fn fill_cell(&mut self, pos: Pos, paint: Paint) -> io::Result<()> {
        if pos.x < self.width && pos.y < self.height {
            self.next[pos.y * self.width + pos.x] = paint.into();
        }
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Vec<Input>> {
        let mut inputs = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(input) = input_for(key) {
                        inputs.push(input);
                    }
                }
                Event::Resize(_, _) => self.needs_full = true,
                _ => {}
            }
        }
        Ok(inputs)
    }

    fn present(&mut self, status: &Status) -> io::Result<()> {
        let (needed_w, needed_h) = self.needed_size();

        self.out.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            self.out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            self.out.queue(Print(msg))?;
            self.out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            self.out.queue(Clear(ClearType::All))?;
        }

        let path = match status.path_len {
            Some(steps) => steps.to_string(),
            None => "-".to_string(),
        };
        let hud = format!(
            "Rescue Mission  Pos: {},{}  Path: {}  Moves: {}  (arrows/hjkl, q to quit)",
            status.player.x, status.player.y, path, status.moves
        );
        if self.needs_full || hud != self.last_hud {
            self.out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            self.out.queue(SetForegroundColor(Color::White))?;
            self.out.queue(Clear(ClearType::CurrentLine))?;
            self.out.queue(Print(&hud))?;
            self.out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        self.draw_changed()?;
        self.out.flush()?;
        Ok(())
    }

    fn wait_frame(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_time {
            thread::sleep(self.frame_time - elapsed);
        }
    }
}

fn input_for(key: KeyEvent) -> Option<Input> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Input::Move(Dir::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Input::Move(Dir::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Input::Move(Dir::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Input::Move(Dir::Right)),
        _ => None,
    }
}
