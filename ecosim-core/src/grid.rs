use std::collections::HashSet;

pub(crate) fn wrap(value: i32, size: i32) -> i32 {
    value.rem_euclid(size)
}

/// The 4 orthogonal neighbors in fixed order (up, down, left, right), each
/// wrapped modulo the grid size. Callers wanting unbiased choice must pick
/// randomly; the index itself imposes no randomness.
pub(crate) fn adjacent_positions((x, y): (i32, i32), size: i32) -> [(i32, i32); 4] {
    [
        (x, wrap(y - 1, size)),
        (x, wrap(y + 1, size)),
        (wrap(x - 1, size), y),
        (wrap(x + 1, size), y),
    ]
}

/// All coordinates within Manhattan distance `radius`, origin excluded,
/// wrapped and de-duplicated. Enumeration order is the fixed nested-offset
/// scan, first occurrence wins.
pub(crate) fn positions_in_radius(
    origin: (i32, i32),
    radius: i32,
    size: i32,
) -> Vec<(i32, i32)> {
    debug_assert!(radius >= 1);
    // Scanning past the wrap span only revisits cells already seen.
    let radius = radius.min(size);
    let (x, y) = origin;
    let mut seen = HashSet::new();
    let mut positions = Vec::new();
    for dx in -radius..=radius {
        let span = radius - dx.abs();
        for dy in -span..=span {
            let pos = (wrap(x + dx, size), wrap(y + dy, size));
            if pos == origin {
                continue;
            }
            if seen.insert(pos) {
                positions.push(pos);
            }
        }
    }
    positions
}
