use std::io;

use log::{debug, info, warn};

use crate::grid::{Grid, Pos};
use crate::search::{find_path, Strategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Quit,
    Move(Dir),
}

/// What a cell is filled with. Later fills on the same cell win.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Floor,
    Obstacle,
    Path,
    Player,
    Start,
    Goal,
}

/// Per-frame drawing and input surface the loop runs against.
pub trait Frontend {
    fn clear(&mut self) -> io::Result<()>;
    fn draw_grid_lines(&mut self) -> io::Result<()>;
    fn fill_cell(&mut self, pos: Pos, paint: Paint) -> io::Result<()>;
    fn poll_input(&mut self) -> io::Result<Vec<Input>>;
    fn present(&mut self, status: &Status) -> io::Result<()>;
    fn wait_frame(&mut self);
}

/// Snapshot for the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub player: Pos,
    /// Steps left to the goal; `None` while the goal is unreachable.
    pub path_len: Option<usize>,
    pub moves: u32,
}

pub struct Game {
    grid: Grid,
    start: Pos,
    goal: Pos,
    player: Pos,
    strategy: Strategy,
    moves: u32,
    running: bool,
    reached_goal: bool,
}

impl Game {
    /// Start in the top-left corner, goal in the bottom-right one.
    pub fn new(grid: Grid, strategy: Strategy) -> Self {
        let start = Pos::new(0, 0);
        let goal = Pos::new(
            grid.width().saturating_sub(1),
            grid.height().saturating_sub(1),
        );
        Self::with_endpoints(grid, start, goal, strategy)
    }

    pub fn with_endpoints(grid: Grid, start: Pos, goal: Pos, strategy: Strategy) -> Self {
        if !grid.is_open(start) {
            warn!("start {:?} is blocked", start);
        }
        if !grid.is_open(goal) {
            warn!("goal {:?} is blocked", goal);
        }
        Self {
            grid,
            start,
            goal,
            player: start,
            strategy,
            moves: 0,
            running: true,
            reached_goal: false,
        }
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn reached_goal(&self) -> bool {
        self.reached_goal
    }

    /// Moves the player one cell, clamped to the grid, if the destination is open.
    pub fn try_move(&mut self, dir: Dir) -> bool {
        let (dx, dy) = dir.delta();
        let max_x = self.grid.width().saturating_sub(1) as isize;
        let max_y = self.grid.height().saturating_sub(1) as isize;
        let next = Pos {
            x: (self.player.x as isize + dx).clamp(0, max_x) as usize,
            y: (self.player.y as isize + dy).clamp(0, max_y) as usize,
        };
        if !self.grid.is_open(next) {
            debug!("move {:?} from {:?} rejected", dir, self.player);
            return false;
        }
        if next != self.player {
            self.moves += 1;
        }
        self.player = next;
        true
    }

    pub fn frame(&mut self, frontend: &mut impl Frontend) -> io::Result<()> {
        frontend.clear()?;
        frontend.draw_grid_lines()?;

        for pos in self.grid.blocked_cells() {
            frontend.fill_cell(pos, Paint::Obstacle)?;
        }

        let path = find_path(&self.grid, self.player, self.goal, self.strategy);
        for &pos in &path {
            frontend.fill_cell(pos, Paint::Path)?;
        }

        frontend.fill_cell(self.player, Paint::Player)?;
        frontend.fill_cell(self.start, Paint::Start)?;
        frontend.fill_cell(self.goal, Paint::Goal)?;

        if self.player == self.goal {
            info!("goal reached after {} moves", self.moves);
            self.reached_goal = true;
            self.running = false;
        }

        for input in frontend.poll_input()? {
            match input {
                Input::Quit => self.running = false,
                Input::Move(dir) => {
                    self.try_move(dir);
                }
            }
        }

        let status = Status {
            player: self.player,
            path_len: path_steps(&path, self.player),
            moves: self.moves,
        };
        frontend.present(&status)?;
        frontend.wait_frame();
        Ok(())
    }

    pub fn run(&mut self, frontend: &mut impl Frontend) -> io::Result<()> {
        while self.is_running() {
            self.frame(frontend)?;
        }
        Ok(())
    }
}

/// A found path starts at the player; the unreachable case is just `[goal]`.
fn path_steps(path: &[Pos], from: Pos) -> Option<usize> {
    match path.first() {
        Some(&first) if first == from => Some(path.len() - 1),
        _ => None,
    }
}
