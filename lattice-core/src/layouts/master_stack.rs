use super::{LayoutTuning, RATIO_UNITS};
use crate::models::{Window, Xyhw};

/// Splits `area` into a master column and `stack_count` stack columns.
///
/// With `rotated` the same split is done on the transposed area, turning columns into rows.
/// Within a column every window gets an equal share, the last one taking the pixel remainder.
/// Windows with resize increments are snapped to the nearest step and the difference is
/// absorbed by the last window of the column.
pub fn update(area: Xyhw, tuning: &LayoutTuning, rotated: bool, windows: &mut [&mut Window]) {
    if windows.is_empty() {
        return;
    }
    let area = if rotated { area.transposed() } else { area };

    for (column, range) in columns(area, tuning, windows.len()) {
        fill_column(column, rotated, &mut windows[range]);
    }

    if rotated {
        for window in windows.iter_mut() {
            window.g = window.g.transposed();
        }
    }
}

/// Column rectangles and the slice of windows each one holds, in window order.
fn columns(
    area: Xyhw,
    tuning: &LayoutTuning,
    count: usize,
) -> Vec<(Xyhw, std::ops::Range<usize>)> {
    let masters = tuning.master_count.min(count);
    let stacked = count - masters;

    if masters == 0 || stacked == 0 {
        let per_column = if masters == 0 { tuning.stack_count } else { 1 };
        return split_columns(area, 0, count, per_column);
    }

    let master_w = area.w() * i32::from(tuning.master_ratio) / i32::from(RATIO_UNITS);
    let stack_w = area.w() - master_w;
    let (master_x, stack_x) = if tuning.flip {
        (area.x() + stack_w, area.x())
    } else {
        (area.x(), area.x() + master_w)
    };

    let mut out = vec![(Xyhw::new(master_x, area.y(), master_w, area.h()), 0..masters)];
    let stack_area = Xyhw::new(stack_x, area.y(), stack_w, area.h());
    out.extend(split_columns(stack_area, masters, stacked, tuning.stack_count));
    out
}

/// Spreads `count` windows (starting at `first`) across at most `wanted` columns.
/// Column sizes differ by at most one window; the leading columns take the extras.
fn split_columns(
    area: Xyhw,
    first: usize,
    count: usize,
    wanted: usize,
) -> Vec<(Xyhw, std::ops::Range<usize>)> {
    let cols = wanted.clamp(1, count.max(1));
    let base = count / cols;
    let extra = count % cols;
    let col_w = (area.w() / cols as i32).max(1);

    let mut out = Vec::with_capacity(cols);
    let mut start = first;
    let mut x = area.x();
    for i in 0..cols {
        let len = base + usize::from(i < extra);
        let w = if i + 1 == cols { (area.max_x() - x).max(1) } else { col_w };
        out.push((Xyhw::new(x, area.y(), w, area.h()), start..start + len));
        start += len;
        x += w;
    }
    out
}

fn fill_column(column: Xyhw, rotated: bool, windows: &mut [&mut Window]) {
    let count = windows.len() as i32;
    if count == 0 {
        return;
    }
    // More windows than pixels still gives every window a non-empty slice; they overlap.
    let slice = (column.h() / count).max(1);
    let end = column.max_y();
    let mut y = column.y();

    for (i, window) in windows.iter_mut().enumerate() {
        let after = count - i as i32 - 1;
        let h = if after == 0 {
            (end - y).max(1)
        } else {
            snap_to_increment(window, slice, rotated, end - y - after)
        };
        window.g = Xyhw::new(column.x(), y, column.w(), h);
        y += h;
    }
}

/// Snaps an outer length to the window's increment hint. `limit` keeps at least one
/// pixel for every window after this one.
fn snap_to_increment(window: &Window, outer: i32, rotated: bool, limit: i32) -> i32 {
    let border = window.effective_border();
    let inner = outer - 2 * border;
    // The stacking direction is the client's width when the layout is rotated.
    let snapped = if rotated {
        window.hints.nearest_width(inner)
    } else {
        window.hints.nearest_height(inner)
    } + 2 * border;
    if snapped > 0 && snapped <= limit {
        snapped
    } else {
        outer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SizeHints, WindowId, WindowInfo};
    use slotmap::SlotMap;

    fn windows(count: usize) -> Vec<Window> {
        let mut ids: SlotMap<WindowId, ()> = SlotMap::with_key();
        (0..count)
            .map(|_| Window::new(ids.insert(()), WindowInfo::default(), 0))
            .collect()
    }

    fn run(area: Xyhw, tuning: &LayoutTuning, rotated: bool, ws: &mut [Window]) -> Vec<Xyhw> {
        let mut refs: Vec<&mut Window> = ws.iter_mut().collect();
        update(area, tuning, rotated, &mut refs);
        ws.iter().map(|w| w.g).collect()
    }

    fn tuning(master_count: usize, stack_count: usize) -> LayoutTuning {
        LayoutTuning {
            master_count,
            stack_count,
            ..LayoutTuning::default()
        }
    }

    #[test]
    fn five_windows_one_master_two_stacks() {
        let area = Xyhw::new(0, 0, 1000, 600);
        let mut ws = windows(5);
        let g = run(area, &tuning(1, 2), false, &mut ws);
        assert_eq!(g[0], Xyhw::new(0, 0, 500, 600));
        assert_eq!(g[1], Xyhw::new(500, 0, 250, 300));
        assert_eq!(g[2], Xyhw::new(500, 300, 250, 300));
        assert_eq!(g[3], Xyhw::new(750, 0, 250, 300));
        assert_eq!(g[4], Xyhw::new(750, 300, 250, 300));
    }

    #[test]
    fn stack_columns_never_differ_by_more_than_one() {
        for count in 2..=12 {
            for stacks in 1..=5 {
                for masters in 0..=3 {
                    let cols = columns(Xyhw::new(0, 0, 1000, 1000), &tuning(masters, stacks), count);
                    let skip = usize::from(masters > 0 && masters < count);
                    let sizes: Vec<usize> = cols.iter().skip(skip).map(|(_, r)| r.len()).collect();
                    let min = sizes.iter().min().unwrap();
                    let max = sizes.iter().max().unwrap();
                    assert!(max - min <= 1, "{count} windows {stacks} stacks {masters} masters");
                    let total: usize = cols.iter().map(|(_, r)| r.len()).sum();
                    assert_eq!(total, count);
                }
            }
        }
    }

    #[test]
    fn last_window_absorbs_remainder() {
        let area = Xyhw::new(0, 0, 100, 100);
        let mut ws = windows(4);
        let g = run(area, &tuning(1, 1), false, &mut ws);
        assert_eq!(g[1].h(), 33);
        assert_eq!(g[2].h(), 33);
        assert_eq!(g[3].h(), 34);
        assert_eq!(g[3].max_y(), 100);
    }

    #[test]
    fn flip_puts_master_on_trailing_edge() {
        let area = Xyhw::new(0, 0, 1000, 600);
        let mut ws = windows(2);
        let flipped = LayoutTuning {
            flip: true,
            ..LayoutTuning::default()
        };
        let g = run(area, &flipped, false, &mut ws);
        assert_eq!(g[0], Xyhw::new(500, 0, 500, 600));
        assert_eq!(g[1], Xyhw::new(0, 0, 500, 600));
    }

    #[test]
    fn master_ratio_in_thirty_seconds() {
        let area = Xyhw::new(0, 0, 320, 100);
        let mut ws = windows(2);
        let wide = LayoutTuning {
            master_ratio: 24,
            ..LayoutTuning::default()
        };
        let g = run(area, &wide, false, &mut ws);
        assert_eq!(g[0].w(), 240);
        assert_eq!(g[1].w(), 80);
    }

    #[test]
    fn horizontal_is_vertical_rotated() {
        let area = Xyhw::new(10, 20, 1000, 600);
        let mut ws = windows(3);
        let g = run(area, &tuning(1, 1), true, &mut ws);
        assert_eq!(g[0], Xyhw::new(10, 20, 1000, 300));
        assert_eq!(g[1], Xyhw::new(10, 320, 500, 300));
        assert_eq!(g[2], Xyhw::new(510, 320, 500, 300));
    }

    #[test]
    fn increments_are_honoured_and_redistributed() {
        let area = Xyhw::new(0, 0, 100, 300);
        let mut ws = windows(3);
        for w in &mut ws {
            w.border = 0;
        }
        ws[1].hints = SizeHints {
            inc_h: 40,
            ..SizeHints::default()
        };
        let g = run(area, &tuning(1, 1), false, &mut ws);
        assert_eq!(g[1].h(), 160);
        assert_eq!(g[2].h(), 140);
        assert_eq!(g[2].max_y(), 300);
    }

    #[test]
    fn crowded_column_never_gets_empty_windows() {
        let area = Xyhw::new(0, 0, 3, 5);
        let mut ws = windows(9);
        let g = run(area, &tuning(1, 4), false, &mut ws);
        assert!(g.iter().all(|g| g.w() >= 1 && g.h() >= 1), "{g:?}");
    }

    #[test]
    fn single_window_takes_the_whole_area() {
        let area = Xyhw::new(0, 0, 800, 600);
        let mut ws = windows(1);
        let g = run(area, &tuning(1, 3), false, &mut ws);
        assert_eq!(g[0], area);
    }
}
