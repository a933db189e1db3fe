//! Collection size limiting for pathological object graphs
//!
//! Providers can expose synthetic grids with millions of cells; fetching
//! them exhaustively would hang the host. A scalar limit bounds flat
//! collections (children, selections, visible children), and a
//! two-dimensional variant bounds table materialization while keeping the
//! row/column aspect ratio instead of collapsing one dimension.

/// Clamp a provider-reported element count to the configured limit.
/// Negative counts clamp to zero.
pub fn clamp_count(count: i32, limit: usize) -> usize {
    (count.max(0) as usize).min(limit)
}

/// Distribute `limit` cells over a `rows × cols` grid.
///
/// Returns `(rows', cols')` with `rows' * cols' <= limit`, each dimension
/// clamped to its original count, and the aspect ratio preserved within
/// rounding: `rows' = round(sqrt(limit * rows / cols))` (so that
/// `rows'/cols' ≈ rows/cols`), then `cols' = round(limit / rows')`, then
/// the budget freed by clamping one dimension is given back to the other.
pub fn limit_grid(rows: i32, cols: i32, limit: usize) -> (i32, i32) {
    let rows = rows.max(0) as i64;
    let cols = cols.max(0) as i64;
    let limit = limit as i64;

    if rows == 0 || cols == 0 || rows * cols <= limit {
        return (rows as i32, cols as i32);
    }

    let ideal_rows = ((limit as f64) * (rows as f64) / (cols as f64)).sqrt();
    let mut r = (ideal_rows.round() as i64).clamp(1, rows);
    let c = ((limit as f64) / (r as f64)).round() as i64;
    let c = c.clamp(1, cols);
    // Clamping one dimension can leave budget unused; hand it back to the
    // other without exceeding the original count.
    r = (limit / c).clamp(1, rows);

    (r as i32, c as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(5, 3), 3);
        assert_eq!(clamp_count(2, 3), 2);
        assert_eq!(clamp_count(-4, 3), 0);
    }

    #[test]
    fn test_square_grid_stays_square() {
        // A million-cell spreadsheet view under a 256-cell budget.
        assert_eq!(limit_grid(1000, 1000, 256), (16, 16));
    }

    #[test]
    fn test_small_grid_untouched() {
        assert_eq!(limit_grid(10, 10, 256), (10, 10));
        assert_eq!(limit_grid(0, 50, 256), (0, 50));
    }

    #[test]
    fn test_skewed_grids_keep_budget() {
        // One narrow dimension: the other absorbs the full budget.
        assert_eq!(limit_grid(1_000_000, 1, 256), (256, 1));
        assert_eq!(limit_grid(1, 1_000_000, 256), (1, 256));
    }

    #[test]
    fn test_grid_laws() {
        let cases = [
            (1000, 1000, 256),
            (5000, 10, 256),
            (10, 5000, 256),
            (123_456, 7, 100),
            (99, 101, 64),
            (3, 1_000_000, 512),
        ];
        for (rows, cols, limit) in cases {
            let (r, c) = limit_grid(rows, cols, limit);
            assert!(r >= 0 && c >= 0);
            assert!(r <= rows, "rows grew: {r} > {rows}");
            assert!(c <= cols, "cols grew: {c} > {cols}");
            assert!(
                (r as i64) * (c as i64) <= limit as i64,
                "budget exceeded for ({rows},{cols},{limit}): {r}x{c}"
            );
            // Neither dimension collapses while the other starves.
            assert!(r >= 1 && c >= 1);
        }
    }

    #[test]
    fn test_aspect_ratio_roughly_preserved() {
        let (r, c) = limit_grid(2000, 500, 400);
        // Original aspect 4:1; the limited grid should stay near it.
        let aspect = r as f64 / c as f64;
        assert!((2.0..8.0).contains(&aspect), "aspect drifted: {aspect}");
    }
}
