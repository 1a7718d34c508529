//! Median filtering of relevance maps

use super::ImageUtils;
use buoyscan_core::RelevanceMap;

/// Median over a `(2 * radius + 1)` square window with replicated borders.
/// A radius of 0 returns the map unchanged.
pub fn median_filter(map: &RelevanceMap, radius: u32) -> RelevanceMap {
    if radius == 0 || map.is_empty() {
        return map.clone();
    }

    let luma = ImageUtils::relevance_to_luma(map);
    let filtered = imageproc::filter::median_filter(&luma, radius, radius);
    ImageUtils::luma_to_relevance(&filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buoyscan_core::Grid;

    #[test]
    fn test_removes_isolated_speck() {
        let mut map = Grid::filled(9, 9, 10u8);
        if let Some(px) = map.get_mut(4, 4) {
            *px = 250;
        }
        let filtered = median_filter(&map, 3);
        assert!(filtered.iter().all(|&v| v == 10));
    }

    #[test]
    fn test_uniform_map_is_unchanged() {
        let map = Grid::filled(4, 4, 255u8);
        assert_eq!(median_filter(&map, 3), map);
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let map = Grid::from_fn(5, 2, |x, y| (x * 20 + y) as u8);
        assert_eq!(median_filter(&map, 0), map);
    }

    #[test]
    fn test_preserves_large_regions() {
        // left half dark, right half bright
        let map = Grid::from_fn(20, 20, |x, _| if x < 10 { 0u8 } else { 200 });
        let filtered = median_filter(&map, 3);
        assert_eq!(filtered[(2, 10)], 0);
        assert_eq!(filtered[(17, 10)], 200);
        assert_eq!(filtered.dimensions(), (20, 20));
    }

    #[test]
    fn test_border_pixels_are_replicated() {
        // bright 2-wide strip on the left edge survives: replicated columns join the window
        let map = Grid::from_fn(9, 9, |x, _| if x < 2 { 200u8 } else { 0 });
        let filtered = median_filter(&map, 3);
        assert_eq!(filtered[(0, 4)], 200);
        assert_eq!(filtered[(4, 4)], 0);
    }
}
