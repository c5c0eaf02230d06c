//! Comparators for every place the pipeline sorts or ranks lines.
//!
//! Floats are compared with `total_cmp` so that orderings are total and
//! reproducible for identical input.

use std::cmp::Ordering;

use crate::model::TextLine;

/// Reading order: page, then top edge, then left edge (all ascending).
pub fn reading_order(a: &TextLine, b: &TextLine) -> Ordering {
    a.page
        .cmp(&b.page)
        .then_with(|| a.bbox.y0.total_cmp(&b.bbox.y0))
        .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
}

/// Title preference: larger font first, then the topmost line.
pub fn title_order(a: &TextLine, b: &TextLine) -> Ordering {
    b.font_size
        .total_cmp(&a.font_size)
        .then_with(|| a.bbox.y0.total_cmp(&b.bbox.y0))
}

/// Font size keys from largest to smallest.
pub fn descending_size(a: &i32, b: &i32) -> Ordering {
    b.cmp(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn line(page: u32, y0: f32, x0: f32, size: f32) -> TextLine {
        TextLine::new("x", size, "Arial", page, BBox::new(x0, y0, x0 + 10.0, y0 + 10.0))
    }

    #[test]
    fn test_reading_order() {
        let mut lines = vec![
            line(2, 10.0, 0.0, 10.0),
            line(1, 50.0, 5.0, 10.0),
            line(1, 50.0, 1.0, 10.0),
            line(1, 20.0, 90.0, 10.0),
        ];
        lines.sort_by(reading_order);

        let keys: Vec<(u32, f32, f32)> = lines.iter().map(|l| (l.page, l.bbox.y0, l.bbox.x0)).collect();
        assert_eq!(
            keys,
            vec![(1, 20.0, 90.0), (1, 50.0, 1.0), (1, 50.0, 5.0), (2, 10.0, 0.0)]
        );
    }

    #[test]
    fn test_title_order_prefers_size_then_top() {
        let big_low = line(1, 300.0, 0.0, 24.0);
        let big_high = line(1, 40.0, 0.0, 24.0);
        let small = line(1, 10.0, 0.0, 12.0);

        assert_eq!(title_order(&big_high, &big_low), Ordering::Less);
        assert_eq!(title_order(&big_low, &small), Ordering::Less);
    }

    #[test]
    fn test_descending_size() {
        let mut keys = vec![1100, 1800, 1400];
        keys.sort_by(descending_size);
        assert_eq!(keys, vec![1800, 1400, 1100]);
    }
}
