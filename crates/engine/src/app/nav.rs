use thiserror::Error;

use super::math::Vec3;

/// Navigation surface: a unit-cell grid on the XZ ground plane.
/// `origin` is the world position of cell (0,0)'s minimum corner; the
/// center of cell (x,z) is `origin + (x + 0.5, 0, z + 0.5)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NavGrid {
    width: u32,
    depth: u32,
    origin: Vec3,
    walkable: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavGridError {
    #[error("cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
}

/// Result of a path query. `corners[0]` is the center of the start
/// cell, so `corners.get(1)` is the first intermediate waypoint,
/// the one movement commits to for a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPath {
    pub corners: Vec<Vec3>,
}

impl NavPath {
    pub fn next_corner(&self) -> Option<Vec3> {
        self.corners.get(1).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Cell {
    x: u32,
    z: u32,
}

impl NavGrid {
    pub fn new(
        width: u32,
        depth: u32,
        origin: Vec3,
        walkable: Vec<bool>,
    ) -> Result<Self, NavGridError> {
        let expected = width as usize * depth as usize;
        let actual = walkable.len();
        if expected != actual {
            return Err(NavGridError::CellCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            depth,
            origin,
            walkable,
        })
    }

    /// Fully walkable grid, used by tests and the demo scenario.
    pub fn open(width: u32, depth: u32, origin: Vec3) -> Self {
        Self {
            width,
            depth,
            origin,
            walkable: vec![true; width as usize * depth as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn cell_center_world(&self, x: u32, z: u32) -> Vec3 {
        Vec3 {
            x: self.origin.x + x as f32 + 0.5,
            y: 0.0,
            z: self.origin.z + z as f32 + 0.5,
        }
    }

    fn world_to_cell(&self, world: Vec3) -> Option<Cell> {
        let cell_x = (world.x - self.origin.x).floor() as i32;
        let cell_z = (world.z - self.origin.z).floor() as i32;
        if cell_x < 0 || cell_z < 0 {
            return None;
        }
        let cell_x = cell_x as u32;
        let cell_z = cell_z as u32;
        if cell_x >= self.width || cell_z >= self.depth {
            return None;
        }
        Some(Cell {
            x: cell_x,
            z: cell_z,
        })
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        if cell.x >= self.width || cell.z >= self.depth {
            return None;
        }
        Some(cell.z as usize * self.width as usize + cell.x as usize)
    }

    fn is_walkable(&self, cell: Cell) -> bool {
        self.index_of(cell)
            .and_then(|index| self.walkable.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Synchronous path query. Off-grid or unreachable endpoints
    /// yield `None`; callers treat that as "stay idle".
    pub fn compute_path(&self, from: Vec3, to: Vec3) -> Option<NavPath> {
        let start = self.world_to_cell(from)?;
        let goal = self.world_to_cell(to)?;
        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return None;
        }

        let cells = self.find_path_cells(start, goal)?;
        let corners = cells
            .into_iter()
            .map(|cell| self.cell_center_world(cell.x, cell.z))
            .collect();
        Some(NavPath { corners })
    }

    fn find_path_cells(&self, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
        let start_index = self.index_of(start)?;
        let goal_index = self.index_of(goal)?;

        if start == goal {
            return Some(vec![start]);
        }

        let node_count = self.width as usize * self.depth as usize;
        let mut closed = vec![false; node_count];
        let mut best_g = vec![u32::MAX; node_count];
        let mut parent = vec![None::<usize>; node_count];
        let mut open = Vec::new();
        let mut next_insertion = 0u64;

        let start_h = manhattan_distance(start, goal);
        open.push(OpenNode {
            cell: start,
            h_cost: start_h,
            f_cost: start_h,
            insertion_order: next_insertion,
        });
        next_insertion = next_insertion.saturating_add(1);
        best_g[start_index] = 0;

        while !open.is_empty() {
            let best_index = pick_best_open_node_index(&open);
            let current = open.swap_remove(best_index);
            let Some(current_index) = self.index_of(current.cell) else {
                continue;
            };
            if closed[current_index] {
                continue;
            }
            closed[current_index] = true;

            if current.cell == goal {
                return self.reconstruct_cell_path(&parent, start_index, goal_index);
            }

            let current_g = best_g[current_index];
            for neighbor in self.neighbors(current.cell) {
                let Some(neighbor) = neighbor else {
                    continue;
                };
                let Some(neighbor_index) = self.index_of(neighbor) else {
                    continue;
                };
                if closed[neighbor_index] || !self.is_walkable(neighbor) {
                    continue;
                }

                let tentative_g = current_g.saturating_add(1);
                if tentative_g >= best_g[neighbor_index] {
                    continue;
                }

                best_g[neighbor_index] = tentative_g;
                parent[neighbor_index] = Some(current_index);
                let h_cost = manhattan_distance(neighbor, goal);
                open.push(OpenNode {
                    cell: neighbor,
                    h_cost,
                    f_cost: tentative_g.saturating_add(h_cost),
                    insertion_order: next_insertion,
                });
                next_insertion = next_insertion.saturating_add(1);
            }
        }

        None
    }

    fn neighbors(&self, cell: Cell) -> [Option<Cell>; 4] {
        let north = if cell.z < self.depth.saturating_sub(1) {
            Some(Cell {
                x: cell.x,
                z: cell.z + 1,
            })
        } else {
            None
        };
        let east = if cell.x < self.width.saturating_sub(1) {
            Some(Cell {
                x: cell.x + 1,
                z: cell.z,
            })
        } else {
            None
        };
        let south = if cell.z > 0 {
            Some(Cell {
                x: cell.x,
                z: cell.z - 1,
            })
        } else {
            None
        };
        let west = if cell.x > 0 {
            Some(Cell {
                x: cell.x - 1,
                z: cell.z,
            })
        } else {
            None
        };
        [north, east, south, west]
    }

    fn reconstruct_cell_path(
        &self,
        parent: &[Option<usize>],
        start_index: usize,
        goal_index: usize,
    ) -> Option<Vec<Cell>> {
        let mut cursor = goal_index;
        let mut indices = vec![cursor];

        while cursor != start_index {
            let next = parent.get(cursor).and_then(|value| *value)?;
            cursor = next;
            indices.push(cursor);
        }
        indices.reverse();
        Some(
            indices
                .into_iter()
                .map(|index| Cell {
                    x: (index as u32) % self.width,
                    z: (index as u32) / self.width,
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    cell: Cell,
    h_cost: u32,
    f_cost: u32,
    insertion_order: u64,
}

fn pick_best_open_node_index(open: &[OpenNode]) -> usize {
    let mut best_index = 0usize;
    for index in 1..open.len() {
        let current = open[index];
        let best = open[best_index];
        if open_node_order_key(current) < open_node_order_key(best) {
            best_index = index;
        }
    }
    best_index
}

fn open_node_order_key(node: OpenNode) -> (u32, u32, u32, u32, u64) {
    (
        node.f_cost,
        node.h_cost,
        node.cell.z,
        node.cell.x,
        node.insertion_order,
    )
}

fn manhattan_distance(a: Cell, b: Cell) -> u32 {
    a.x.abs_diff(b.x).saturating_add(a.z.abs_diff(b.z))
}
