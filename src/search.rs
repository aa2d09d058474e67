//! Uninformed search over the linked grid. Every step costs the same, so the
//! breadth-first frontier yields a fewest-steps path and the depth-first one only
//! proves reachability.

use std::collections::VecDeque;

use fxhash::FxHashMap;
use log::trace;

use crate::grid::{Grid, Pos};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Breadth-first: fewest steps.
    #[default]
    ShortestPath,
    /// Depth-first: some path, in stack order.
    AnyPath,
}

/// Result of a single search: who discovered whom.
#[derive(Debug)]
pub struct Traversal {
    /// Predecessor of every discovered cell; the start maps to `None`.
    pub came_from: FxHashMap<Pos, Option<Pos>>,
    /// Number of pushes onto the frontier, the start included.
    pub enqueued: usize,
    pub reached: bool,
}

impl Traversal {
    /// Walks predecessors back from `goal`. An undiscovered goal yields `[goal]`.
    pub fn path_to(&self, goal: Pos) -> Vec<Pos> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(pos) = current {
            path.push(pos);
            current = self.came_from.get(&pos).copied().flatten();
        }
        path.reverse();
        path
    }
}

enum Frontier {
    Queue(VecDeque<Pos>),
    Stack(Vec<Pos>),
}

impl Frontier {
    fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::ShortestPath => Frontier::Queue(VecDeque::new()),
            Strategy::AnyPath => Frontier::Stack(Vec::new()),
        }
    }

    fn push(&mut self, pos: Pos) {
        match self {
            Frontier::Queue(q) => q.push_back(pos),
            Frontier::Stack(s) => s.push(pos),
        }
    }

    fn pop(&mut self) -> Option<Pos> {
        match self {
            Frontier::Queue(q) => q.pop_front(),
            Frontier::Stack(s) => s.pop(),
        }
    }
}

pub fn search(grid: &Grid, start: Pos, goal: Pos, strategy: Strategy) -> Traversal {
    let mut frontier = Frontier::new(strategy);
    let mut came_from = FxHashMap::default();
    came_from.insert(start, None);
    frontier.push(start);
    let mut enqueued = 1;
    let mut reached = false;

    while let Some(current) = frontier.pop() {
        if current == goal {
            reached = true;
            break;
        }
        for &next in grid.neighbors(current) {
            if !came_from.contains_key(&next) {
                came_from.insert(next, Some(current));
                frontier.push(next);
                enqueued += 1;
            }
        }
    }

    if !reached {
        trace!("{:?} not reachable from {:?} ({} cells visited)", goal, start, came_from.len());
    }
    Traversal {
        came_from,
        enqueued,
        reached,
    }
}

pub fn find_path(grid: &Grid, start: Pos, goal: Pos, strategy: Strategy) -> Vec<Pos> {
    match strategy {
        Strategy::ShortestPath => bfs(grid, start, goal),
        Strategy::AnyPath => dfs(grid, start, goal),
    }
}

pub fn bfs(grid: &Grid, start: Pos, goal: Pos) -> Vec<Pos> {
    search(grid, start, goal, Strategy::ShortestPath).path_to(goal)
}

pub fn dfs(grid: &Grid, start: Pos, goal: Pos) -> Vec<Pos> {
    search(grid, start, goal, Strategy::AnyPath).path_to(goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn assert_valid_path(grid: &Grid, path: &[Pos], start: Pos, goal: Pos) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert!(grid.neighbors(pair[0]).contains(&pair[1]));
            assert!(grid.neighbors(pair[1]).contains(&pair[0]));
        }
    }

    /// Fewest steps between `start` and `goal` over all simple paths, by exhaustive
    /// enumeration.
    fn brute_force_steps(grid: &Grid, start: Pos, goal: Pos) -> Option<usize> {
        fn walk(
            grid: &Grid,
            current: Pos,
            goal: Pos,
            on_path: &mut Vec<Pos>,
            best: &mut Option<usize>,
        ) {
            let steps = on_path.len() - 1;
            if best.map_or(false, |b| steps >= b) {
                return;
            }
            if current == goal {
                *best = Some(steps);
                return;
            }
            for &next in grid.neighbors(current) {
                if on_path.contains(&next) {
                    continue;
                }
                on_path.push(next);
                walk(grid, next, goal, on_path, best);
                on_path.pop();
            }
        }
        let mut best = None;
        walk(grid, start, goal, &mut vec![start], &mut best);
        best
    }

    fn walled_goal_grid() -> Grid {
        let mut grid = Grid::open(5, 5);
        for pos in [
            Pos::new(3, 3),
            Pos::new(3, 4),
            Pos::new(4, 3),
        ] {
            grid.block(pos);
        }
        grid.link();
        grid
    }

    #[test]
    fn bfs_on_open_grid_takes_diagonals() {
        let mut grid = Grid::open(5, 5);
        grid.link();
        let path = bfs(&grid, Pos::new(0, 0), Pos::new(4, 4));
        assert_eq!(
            path,
            vec![
                Pos::new(0, 0),
                Pos::new(1, 1),
                Pos::new(2, 2),
                Pos::new(3, 3),
                Pos::new(4, 4),
            ]
        );
    }

    #[test]
    fn bfs_routes_around_a_wall() {
        let mut grid = Grid::open(5, 5);
        for y in 0..4 {
            grid.block(Pos::new(2, y));
        }
        grid.link();
        let start = Pos::new(0, 0);
        let goal = Pos::new(4, 0);
        let path = bfs(&grid, start, goal);
        assert_valid_path(&grid, &path, start, goal);
        assert!(path.contains(&Pos::new(2, 4)));
        assert_eq!(path.len() - 1, 8);
    }

    #[test]
    fn start_equal_to_goal_is_a_single_cell() {
        let mut grid = Grid::open(3, 3);
        grid.link();
        assert_eq!(bfs(&grid, Pos::new(1, 1), Pos::new(1, 1)), vec![Pos::new(1, 1)]);
        assert_eq!(dfs(&grid, Pos::new(1, 1), Pos::new(1, 1)), vec![Pos::new(1, 1)]);
    }

    #[test]
    fn bfs_matches_brute_force_on_small_grids() {
        let layouts: [&[(usize, usize)]; 4] = [
            &[],
            &[(1, 0), (1, 1)],
            &[(0, 1), (1, 1), (2, 1)],
            &[(1, 0), (2, 2), (2, 1)],
        ];
        for blocked in layouts {
            let mut grid = Grid::open(4, 3);
            for &(x, y) in blocked {
                grid.block(Pos::new(x, y));
            }
            grid.link();
            let start = Pos::new(0, 0);
            for gx in 0..4 {
                for gy in 0..3 {
                    let goal = Pos::new(gx, gy);
                    let expected = brute_force_steps(&grid, start, goal);
                    let traversal = search(&grid, start, goal, Strategy::ShortestPath);
                    assert_eq!(traversal.reached, expected.is_some());
                    if let Some(steps) = expected {
                        let path = traversal.path_to(goal);
                        assert_valid_path(&grid, &path, start, goal);
                        assert_eq!(path.len() - 1, steps);
                    }
                }
            }
        }
    }

    #[test]
    fn bfs_never_longer_than_dfs() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..500 {
            let mut grid = Grid::generate(&mut rng, 10, 10, 30);
            let start = Pos::new(0, 0);
            let goal = Pos::new(9, 9);
            grid.link();
            let traversal = search(&grid, start, goal, Strategy::ShortestPath);
            let any = search(&grid, start, goal, Strategy::AnyPath);
            assert_eq!(traversal.reached, any.reached);
            if traversal.reached {
                let shortest = traversal.path_to(goal);
                let other = any.path_to(goal);
                assert_valid_path(&grid, &shortest, start, goal);
                assert_valid_path(&grid, &other, start, goal);
                assert!(shortest.len() <= other.len());
            }
        }
    }

    #[test]
    fn each_cell_enqueued_at_most_once() {
        let mut rng = StdRng::seed_from_u64(9);
        for strategy in [Strategy::ShortestPath, Strategy::AnyPath] {
            for _ in 0..100 {
                let grid = Grid::build(&mut rng, 12, 12, 28);
                // Unreachable corner forces a full traversal.
                let traversal = search(&grid, Pos::new(0, 0), Pos::new(50, 50), strategy);
                assert!(!traversal.reached);
                assert_eq!(traversal.enqueued, traversal.came_from.len());
            }
        }
    }

    #[test]
    fn walled_off_goal_gives_degenerate_path() {
        let grid = walled_goal_grid();
        let goal = Pos::new(4, 4);
        assert_eq!(bfs(&grid, Pos::new(0, 0), goal), vec![goal]);
        assert_eq!(dfs(&grid, Pos::new(0, 0), goal), vec![goal]);
    }

    #[test]
    fn blocked_goal_or_start_does_not_panic() {
        let mut grid = Grid::open(4, 4);
        grid.block(Pos::new(3, 3));
        grid.block(Pos::new(0, 0));
        grid.link();
        assert_eq!(bfs(&grid, Pos::new(1, 1), Pos::new(3, 3)), vec![Pos::new(3, 3)]);
        let traversal = search(&grid, Pos::new(0, 0), Pos::new(2, 2), Strategy::ShortestPath);
        assert!(!traversal.reached);
        assert_eq!(traversal.came_from.len(), 1);
    }

    #[test]
    fn dfs_finds_some_path_when_reachable() {
        let mut grid = Grid::open(6, 6);
        for y in 1..6 {
            grid.block(Pos::new(3, y));
        }
        grid.link();
        let start = Pos::new(0, 5);
        let goal = Pos::new(5, 5);
        let path = dfs(&grid, start, goal);
        assert_valid_path(&grid, &path, start, goal);
        assert!(path.contains(&Pos::new(3, 0)));
    }
}
