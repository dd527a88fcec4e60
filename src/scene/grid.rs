use rand::Rng;

use crate::foundation::core::Canvas;
use crate::random::sampling::uniform;
use crate::scene::model::{GridCell, ShapeDescriptor};
use crate::settings::snapshot::IntRange;

/// Build `count` empty grids at random positions with random column/row counts.
pub(crate) fn sample_grids<R: Rng + ?Sized>(
    rng: &mut R,
    canvas: Canvas,
    count: usize,
    size: IntRange,
) -> Vec<GridCell> {
    (0..count)
        .map(|_| {
            let x = uniform(rng, 0, i64::from(canvas.width)) as f64;
            let y = uniform(rng, 0, i64::from(canvas.height)) as f64;
            let columns = uniform(rng, size.min, size.max).max(0) as u32;
            let rows = uniform(rng, size.min, size.max).max(0) as u32;
            GridCell::new(x, y, columns, rows)
        })
        .collect()
}

/// Snap `item` into the first grid that still has room.
///
/// The first occupant of a grid is the anchor: it moves to the grid origin and keeps its size.
/// Later occupants take the anchor's footprint and sit at `origin + (col, row) * footprint`.
/// A copy of the placed item is appended to the grid. Returns `false` when every grid is full
/// (or there are none) and the item keeps its free placement.
pub(crate) fn place_on_grid(grids: &mut [GridCell], item: &mut ShapeDescriptor) -> bool {
    let Some(grid) = grids.iter_mut().find(|g| g.has_room()) else {
        return false;
    };

    match grid.items.first().and_then(ShapeDescriptor::cell_size) {
        None => set_position(item, grid.x, grid.y),
        Some(cell) => {
            let n = grid.items.len() as u32;
            let columns = grid.columns.max(1);
            let (row, col) = (n / columns, n % columns);
            set_position(
                item,
                grid.x + f64::from(col) * cell.x,
                grid.y + f64::from(row) * cell.y,
            );
            match item {
                ShapeDescriptor::Rectangle { width, height, .. } => {
                    *width = cell.x;
                    *height = cell.y;
                }
                ShapeDescriptor::Circle { radius, .. } => *radius = cell.x.min(cell.y) / 2.0,
                _ => {}
            }
        }
    }

    grid.items.push(item.clone());
    true
}

fn set_position(item: &mut ShapeDescriptor, nx: f64, ny: f64) {
    match item {
        ShapeDescriptor::Rectangle { x, y, .. }
        | ShapeDescriptor::Circle { x, y, .. }
        | ShapeDescriptor::Text { x, y, .. }
        | ShapeDescriptor::Wave { x, y, .. } => {
            *x = nx;
            *y = ny;
        }
        ShapeDescriptor::Blob { .. } => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/grid.rs"]
mod tests;
