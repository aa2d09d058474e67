use log::debug;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Walkable cell with the coordinates of its open neighbours.
    Open(Vec<Pos>),
    Blocked,
}

/// Fixed-size obstacle map, indexed `tiles[y][x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
}

/// Neighbour offsets in scan order: `dx` outer, `dy` inner, both -1..=1.
const OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Grid {
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Tile::Open(Vec::new()); width]; height],
        }
    }

    /// Scatters `obstacles` independent placements over an open grid. Placements may
    /// land on the same cell, so the number of blocked cells can come out lower.
    pub fn generate(rng: &mut impl Rng, width: usize, height: usize, obstacles: usize) -> Self {
        let mut grid = Self::open(width, height);
        if width == 0 || height == 0 {
            return grid;
        }
        for _ in 0..obstacles {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            grid.block(Pos { x, y });
        }
        debug!(
            "generated {}x{} map: {} placements, {} blocked cells",
            width,
            height,
            obstacles,
            grid.blocked_cells().count()
        );
        grid
    }

    /// Generates a map and links it. This is the only place setup links the grid.
    pub fn build(rng: &mut impl Rng, width: usize, height: usize, obstacles: usize) -> Self {
        let mut grid = Self::generate(rng, width, height, obstacles);
        grid.link();
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && matches!(self.tiles[pos.y][pos.x], Tile::Open(_))
    }

    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.tiles.get(pos.y).and_then(|row| row.get(pos.x))
    }

    /// Marks a cell blocked, dropping any adjacency it held. Out-of-bounds positions
    /// are ignored. Neighbour lists elsewhere are stale until the next `link`.
    pub fn block(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            self.tiles[pos.y][pos.x] = Tile::Blocked;
        }
    }

    /// Open neighbours of `pos` in link order; empty for blocked or out-of-bounds cells.
    pub fn neighbors(&self, pos: Pos) -> &[Pos] {
        match self.tile(pos) {
            Some(Tile::Open(neighbors)) => neighbors,
            _ => &[],
        }
    }

    /// Blocked cells, column by column.
    pub fn blocked_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.width)
            .flat_map(move |x| (0..self.height).map(move |y| Pos { x, y }))
            .filter(move |pos| !self.is_open(*pos))
    }

    /// Recomputes every open tile's neighbour list from the 8 surrounding cells.
    /// Lists are replaced, not appended to.
    pub fn link(&mut self) {
        let mut links = 0;
        for x in 0..self.width {
            for y in 0..self.height {
                let pos = Pos { x, y };
                if !self.is_open(pos) {
                    continue;
                }
                let found = self.open_around(pos);
                links += found.len();
                self.tiles[y][x] = Tile::Open(found);
            }
        }
        debug!("linked {}x{} map with {} directed edges", self.width, self.height, links);
    }

    fn open_around(&self, pos: Pos) -> Vec<Pos> {
        let mut found = Vec::with_capacity(OFFSETS.len());
        for (dx, dy) in OFFSETS {
            let nx = pos.x as isize + dx;
            let ny = pos.y as isize + dy;
            if nx < 0 || ny < 0 {
                continue;
            }
            let next = Pos {
                x: nx as usize,
                y: ny as usize,
            };
            if self.is_open(next) {
                found.push(next);
            }
        }
        found
    }
}
