//! Unweighted shortest path over the grid

use std::collections::{HashMap, HashSet, VecDeque};

use crate::game::{Cell, Grid};

/// Shortest path from `start` to `goal` through cells accepted by `is_free`.
///
/// The returned path excludes `start` and ends with `goal`; it is empty when
/// the goal is unreachable. The goal itself only has to be in bounds, which
/// lets callers search toward an occupied cell such as the tail. Neighbours
/// are expanded in [`Grid::neighbors`] order, so equal inputs give equal
/// paths.
pub fn shortest_path<F>(grid: &Grid, start: Cell, goal: Cell, is_free: F) -> Vec<Cell>
where
    F: Fn(Cell) -> bool,
{
    if start == goal || !grid.in_bounds(goal) {
        return Vec::new();
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut parents: HashMap<Cell, Cell> = HashMap::new();

    while let Some(node) = queue.pop_front() {
        for next in grid.neighbors(node) {
            if visited.contains(&next) || (next != goal && !is_free(next)) {
                continue;
            }
            visited.insert(next);
            parents.insert(next, node);

            if next == goal {
                return reconstruct(&parents, start, goal);
            }
            queue.push_back(next);
        }
    }

    Vec::new()
}

/// Walk parents back from `goal` to `start`, then reverse
fn reconstruct(parents: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&parent) = parents.get(&node) {
        if parent == start {
            break;
        }
        path.push(parent);
        node = parent;
    }
    path.reverse();
    path
}
