/// Placement of glyph bitmaps in an atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packing {
    pub width: u32,
    pub height: u32,
    /// Top-left corner of each packed rectangle, in input order
    pub positions: Vec<(u32, u32)>,
}

/// Packs rectangles on shelves, left to right and top to bottom, leaving
/// `padding` pixels around each of them.
///
/// Both atlas dimensions are powers of two.
#[must_use]
pub fn pack(sizes: &[(u32, u32)], padding: u32) -> Packing {
    let area: u64 = sizes
        .iter()
        .map(|&(w, h)| u64::from(w + padding) * u64::from(h + padding))
        .sum();
    let widest = sizes.iter().map(|&(w, _)| w).max().unwrap_or(0) + 2 * padding;

    let mut width = 1u32;
    while u64::from(width) * u64::from(width) < area {
        width *= 2;
    }
    let width = width.max(widest.next_power_of_two());

    let mut positions = Vec::with_capacity(sizes.len());
    let (mut x, mut y, mut shelf_height) = (padding, padding, 0);
    for &(w, h) in sizes {
        if x + w + padding > width && x > padding {
            x = padding;
            y += shelf_height + padding;
            shelf_height = 0;
        }
        positions.push((x, y));
        x += w + padding;
        shelf_height = shelf_height.max(h);
    }

    Packing {
        width,
        height: (y + shelf_height + padding).next_power_of_two(),
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    #[test]
    fn pack_nothing() {
        let packing = pack(&[], 4);
        assert!(packing.positions.is_empty());
        assert_eq!(packing.width, 8);
        assert_eq!(packing.height, 8);
    }

    #[test]
    fn pack_single_row() {
        let packing = pack(&[(2, 2), (2, 2)], 1);
        assert_eq!(packing.width, 8);
        assert_eq!(packing.height, 4);
        assert_eq!(packing.positions, vec![(1, 1), (4, 1)]);
    }

    #[test]
    fn pack_wraps_to_next_shelf() {
        let packing = pack(&[(10, 3), (10, 5), (10, 2)], 2);
        assert_eq!(packing.width, 16);
        assert_eq!(packing.positions, vec![(2, 2), (2, 7), (2, 14)]);
        assert_eq!(packing.height, 32);
    }

    #[test]
    fn packed_rectangles_stay_inside_and_apart() {
        let sizes: Vec<(u32, u32)> = (0..60).map(|i| (3 + i % 7, 5 + i % 11)).collect();
        let padding = 2;
        let packing = pack(&sizes, padding);

        let rects: Vec<_> = packing
            .positions
            .iter()
            .zip(&sizes)
            .map(|(&(x, y), &(w, h))| (x, y, w + padding, h + padding))
            .collect();
        for (i, &(x, y, w, h)) in rects.iter().enumerate() {
            assert!(x >= padding && y >= padding);
            assert!(x + w <= packing.width);
            assert!(y + h <= packing.height);
            for &other in &rects[i + 1..] {
                assert!(!overlaps((x, y, w, h), other));
            }
        }
    }
}
