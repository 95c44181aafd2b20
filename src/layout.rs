//! Pure screen-geometry solver.
//!
//! [`compute`] maps a terminal size plus session options to a set of
//! non-overlapping regions; [`Layout::validate`] rejects geometries with no
//! room to render. Neither has side effects, so the caller recomputes on
//! every resize and before the first frame. A failure means "skip this
//! frame and wait for a larger terminal", never a fatal condition.

use std::error::Error;
use std::fmt;

use crate::config::FinderOptions;

/// Minimum usable width, in columns, for the list and preview areas.
const MIN_AREA_WIDTH: i32 = 10;

/// A rectangular area in terminal-absolute space (0,0 = top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Splits the rectangle vertically at `ratio` (left share), falling
    /// back to an even split for out-of-range ratios.
    fn split_vertical(self, ratio: f64) -> (Rect, Rect) {
        let ratio = if ratio <= 0.0 || ratio >= 1.0 { 0.5 } else { ratio };
        let split = (f64::from(self.width) * ratio) as i32;
        let left = Rect {
            width: split,
            ..self
        };
        let right = Rect {
            x: self.x + split,
            width: self.width - split,
            ..self
        };
        (left, right)
    }

    /// Shrinks the rectangle by `margin` cells on all sides.
    fn inset(self, margin: i32) -> Rect {
        Rect {
            x: self.x + margin,
            y: self.y + margin,
            width: self.width - 2 * margin,
            height: self.height - 2 * margin,
        }
    }

    /// Reports whether the rectangle has zero or negative dimensions.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// The complete region assignment for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    /// Full terminal area.
    pub terminal: Rect,
    /// Drawable area after applying explicit width/height constraints.
    pub content: Rect,
    /// Area inside the border (equal to `content` without a border).
    pub inner_content: Rect,
    /// Left column: prompt, counter, header and item rows.
    pub list: Rect,
    /// Right column for the preview panel; empty when preview is off.
    pub preview: Rect,
    /// Single prompt row at the bottom of the list area.
    pub prompt: Rect,
    /// Single header row above the counter; empty when no header is set.
    pub header: Rect,
    /// Single row showing "matched/total".
    pub counter: Rect,
    /// Remaining rows for match items, stacked bottom-up.
    pub items: Rect,
    pub has_border: bool,
    pub has_preview: bool,
    pub has_header: bool,
}

impl Layout {
    /// Checks that every region has enough space to render into.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.content.is_empty() {
            return Err(LayoutError("content area is too small"));
        }
        if self.inner_content.is_empty() {
            return Err(LayoutError(
                "inner content area is too small (border may be too large)",
            ));
        }
        if self.list.is_empty() {
            return Err(LayoutError("list area is too small"));
        }
        if self.items.is_empty() {
            return Err(LayoutError(
                "item area is too small (need at least 1 line for items)",
            ));
        }
        if self.list.width < MIN_AREA_WIDTH {
            return Err(LayoutError(
                "terminal is too narrow (need at least 10 columns for the list)",
            ));
        }
        if self.has_preview && self.preview.is_empty() {
            return Err(LayoutError("preview area is too small"));
        }
        if self.has_preview && self.preview.width < MIN_AREA_WIDTH {
            return Err(LayoutError(
                "preview area is too narrow (need at least 10 columns)",
            ));
        }
        Ok(())
    }
}

/// A layout that cannot be rendered at the current terminal size.
/// Recoverable: skip the frame and retry after the next resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutError(&'static str);

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Error for LayoutError {}

/// Computes the frame layout for the given terminal size and options.
pub fn compute(
    term_width: u16,
    term_height: u16,
    opts: &FinderOptions,
) -> Result<Layout, LayoutError> {
    let term_width = i32::from(term_width);
    let term_height = i32::from(term_height);

    let mut layout = Layout {
        terminal: Rect {
            x: 0,
            y: 0,
            width: term_width,
            height: term_height,
        },
        ..Layout::default()
    };

    // Clamp the content block to explicit width/height constraints.
    let mut content_width = term_width;
    let mut content_height = term_height;
    let mut height_constrained = false;
    if let Some(w) = opts.width {
        content_width = content_width.min(i32::from(w));
    }
    if let Some(h) = opts.height {
        if i32::from(h) < term_height {
            height_constrained = true;
        }
        content_height = content_height.min(i32::from(h));
    }

    // Center horizontally. Anchor to the bottom row when the height is
    // explicitly constrained, mirroring the convention of keeping the
    // picker near the shell prompt; otherwise occupy the full height.
    let content_x = (term_width - content_width) / 2;
    let content_y = if height_constrained {
        term_height - content_height
    } else {
        0
    };
    layout.content = Rect {
        x: content_x,
        y: content_y,
        width: content_width,
        height: content_height,
    };

    layout.has_border = opts.border;
    layout.inner_content = if opts.border {
        layout.content.inset(1)
    } else {
        layout.content
    };

    layout.has_preview = opts.preview.is_some();
    if layout.has_preview {
        let (list, preview) = layout.inner_content.split_vertical(0.5);
        layout.list = list;
        layout.preview = preview;
    } else {
        layout.list = layout.inner_content;
        layout.preview = Rect::default();
    }

    // Stack fixed-height rows bottom-up inside the list area.
    let list = layout.list;
    let row = |y: i32| Rect {
        x: list.x,
        y,
        width: list.width,
        height: 1,
    };
    let mut row_y = list.y + list.height - 1;
    let mut available = list.height;

    if available < 1 {
        return Err(LayoutError("insufficient height for the prompt line"));
    }
    layout.prompt = row(row_y);
    row_y -= 1;
    available -= 1;

    layout.has_header = !opts.header.is_empty();
    if layout.has_header {
        if available < 1 {
            return Err(LayoutError("insufficient height for the header line"));
        }
        layout.header = row(row_y);
        row_y -= 1;
        available -= 1;
    }

    if available < 1 {
        return Err(LayoutError("insufficient height for the counter line"));
    }
    layout.counter = row(row_y);
    available -= 1;

    // The item list takes what is left, minus a one-row top margin.
    if available < 2 {
        return Err(LayoutError("insufficient height for the item list"));
    }
    layout.items = Rect {
        x: list.x,
        y: list.y + 1,
        width: list.width,
        height: available - 1,
    };

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> FinderOptions {
        FinderOptions::default()
    }

    #[test]
    fn test_bare_terminal() {
        let l = compute(80, 24, &opts()).unwrap();
        l.validate().unwrap();
        assert_eq!(l.content, Rect { x: 0, y: 0, width: 80, height: 24 });
        assert_eq!(l.prompt.y, 23);
        assert_eq!(l.counter.y, 22);
        // Prompt and counter rows plus the top margin row leave 24 - 3.
        assert_eq!(l.items.height, 21);
        assert_eq!(l.items.width, 80);
        assert!(!l.has_header && !l.has_preview && !l.has_border);
    }

    #[test]
    fn test_header_costs_one_row() {
        let mut o = opts();
        o.header = "pick one".to_string();
        let l = compute(80, 24, &o).unwrap();
        l.validate().unwrap();
        assert_eq!(l.prompt.y, 23);
        assert_eq!(l.header.y, 22);
        assert_eq!(l.counter.y, 21);
        assert_eq!(l.items.height, 20);
    }

    #[test]
    fn test_border_insets_content() {
        let mut o = opts();
        o.border = true;
        let l = compute(80, 24, &o).unwrap();
        l.validate().unwrap();
        assert_eq!(l.inner_content, Rect { x: 1, y: 1, width: 78, height: 22 });
        assert_eq!(l.prompt.y, 22);
        assert_eq!(l.items.height, 19);
    }

    #[test]
    fn test_preview_splits_width_in_half() {
        let mut o = opts();
        o.preview = Some(Box::new(|_, _, _| String::new()));
        let l = compute(80, 24, &o).unwrap();
        l.validate().unwrap();
        assert_eq!(l.list.width, 40);
        assert_eq!(l.preview, Rect { x: 40, y: 0, width: 40, height: 24 });
    }

    #[test]
    fn test_narrow_preview_fails_validation() {
        let mut o = opts();
        o.preview = Some(Box::new(|_, _, _| String::new()));
        let l = compute(18, 24, &o).unwrap();
        assert!(l.validate().is_err());
    }

    #[test]
    fn test_narrow_list_fails_validation() {
        let l = compute(9, 24, &opts()).unwrap();
        assert!(l.validate().is_err());
    }

    #[test]
    fn test_constrained_height_anchors_to_bottom() {
        let mut o = opts();
        o.height = Some(10);
        let l = compute(80, 24, &o).unwrap();
        l.validate().unwrap();
        assert_eq!(l.content, Rect { x: 0, y: 14, width: 80, height: 10 });
        assert_eq!(l.prompt.y, 23);
    }

    #[test]
    fn test_constrained_width_centers() {
        let mut o = opts();
        o.width = Some(40);
        let l = compute(80, 24, &o).unwrap();
        l.validate().unwrap();
        assert_eq!(l.content, Rect { x: 20, y: 0, width: 40, height: 24 });
    }

    #[test]
    fn test_oversized_constraints_are_clamped() {
        let mut o = opts();
        o.width = Some(200);
        o.height = Some(100);
        let l = compute(80, 24, &o).unwrap();
        // Not bottom-anchored: the explicit height exceeds the terminal.
        assert_eq!(l.content, Rect { x: 0, y: 0, width: 80, height: 24 });
    }

    #[test]
    fn test_no_room_for_items() {
        // Prompt + counter + margin need four rows to leave one item row.
        assert!(compute(80, 3, &opts()).is_err());
        compute(80, 4, &opts()).unwrap().validate().unwrap();
    }

    #[test]
    fn test_split_vertical_odd_width() {
        let r = Rect { x: 0, y: 0, width: 99, height: 20 };
        let (left, right) = r.split_vertical(0.5);
        assert_eq!(left.width, 49);
        assert_eq!(right.width, 50);
        assert_eq!(right.x, 49);
    }

    #[test]
    fn test_inset_below_zero_is_empty() {
        let r = Rect { x: 0, y: 0, width: 1, height: 1 };
        assert!(r.inset(1).is_empty());
    }
}
