use serde::{Deserialize, Serialize};

use crate::constants::{
    ARROW_INSET, ARROW_OFFSET, LABEL_BASE_DY, LABEL_HEIGHT_DX, MIN_VIEW_H, MIN_VIEW_W, PAD, SCALE,
};

/// Basic two dimensional point in SVG user space (y grows downwards).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RectOutline {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub w: f64,
    pub h: f64,
}

impl Viewport {
    /// Value of the SVG `viewBox` attribute.
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.w, self.h)
    }

    /// Pixel size for raster output.
    pub fn pixels(&self) -> (u32, u32) {
        (self.w.ceil() as u32, self.h.ceil() as u32)
    }
}

/// Everything the scene needs to draw one (base, height) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub base: f64,
    pub height: f64,
    pub viewport: Viewport,
    pub triangle_a: [Point; 3],
    pub triangle_b: [Point; 3],
    pub base_guide: Segment,
    pub height_guide: Segment,
    pub base_arrow: Segment,
    pub height_arrow: Segment,
    pub label_base: Point,
    pub label_height: Point,
    pub rect_outline: RectOutline,
    /// Right-centre of triangle B; the partner flips about this point.
    pub flip_pivot: Point,
    pub area: f64,
}

/// Derive the full scene layout. Callers keep `base` in [2, 10] and
/// `height` in [2, 8]; the function itself accepts any finite input.
pub fn derive(base: f64, height: f64) -> Geometry {
    let bw = base * SCALE;
    let bh = height * SCALE;
    let w = bw + 2.0 * PAD;
    let h = bh + 2.0 * PAD;

    // Right angle at the bottom-left corner.
    let left = PAD;
    let right = PAD + bw;
    let bottom = h - PAD;
    let top = h - PAD - bh;

    let triangle_a = [
        Point { x: left, y: bottom },
        Point { x: right, y: bottom },
        Point { x: left, y: top },
    ];
    let triangle_b = [
        Point { x: right, y: bottom },
        Point { x: right, y: top },
        Point { x: left, y: top },
    ];

    let base_guide = Segment {
        from: Point { x: left, y: bottom },
        to: Point { x: right, y: bottom },
    };
    let height_guide = Segment {
        from: Point { x: left, y: bottom },
        to: Point { x: left, y: top },
    };
    let base_arrow = Segment {
        from: Point {
            x: left + ARROW_INSET,
            y: bottom + ARROW_OFFSET,
        },
        to: Point {
            x: right - ARROW_INSET,
            y: bottom + ARROW_OFFSET,
        },
    };
    let height_arrow = Segment {
        from: Point {
            x: left - ARROW_OFFSET,
            y: bottom - ARROW_INSET,
        },
        to: Point {
            x: left - ARROW_OFFSET,
            y: top + ARROW_INSET,
        },
    };

    Geometry {
        base,
        height,
        viewport: Viewport {
            w: w.max(MIN_VIEW_W),
            h: h.max(MIN_VIEW_H),
        },
        triangle_a,
        triangle_b,
        base_guide,
        height_guide,
        base_arrow,
        height_arrow,
        label_base: Point {
            x: left + bw / 2.0,
            y: bottom + LABEL_BASE_DY,
        },
        label_height: Point {
            x: left - LABEL_HEIGHT_DX,
            y: bottom - bh / 2.0,
        },
        rect_outline: RectOutline {
            x: left,
            y: top,
            w: bw,
            h: bh,
        },
        flip_pivot: Point {
            x: right,
            y: bottom - bh / 2.0,
        },
        area: base * height / 2.0,
    }
}

/// Area text as shown to the user; the only place rounding happens.
pub fn format_area(area: f64) -> String {
    format!("{:.2}", area)
}

/// Shoelace area of a polygon, in px².
pub fn polygon_area(pts: &[Point]) -> f64 {
    let n = pts.len();
    let mut acc = 0.0;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        acc += a.x * b.y - b.x * a.y;
    }
    acc.abs() / 2.0
}
