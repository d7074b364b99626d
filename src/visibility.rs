use crate::maze::Pos;

pub fn distance(a: Pos, b: Pos) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Whether `cell` is revealed to an observer at `observer`. The radius is inclusive.
pub fn is_visible(cell: Pos, observer: Pos, radius: f64) -> bool {
    distance(cell, observer) <= radius
}
