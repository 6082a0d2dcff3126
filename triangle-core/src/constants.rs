/// Scene-wide numeric constants.
/// Lengths are SVG user units (px) unless noted otherwise.
pub const PAD: f64 = 36.0;
/// Pixels per abstract unit of base/height.
pub const SCALE: f64 = 44.0;
/// Minimum canvas size, kept even for the smallest shapes.
pub const MIN_VIEW_W: f64 = 520.0;
pub const MIN_VIEW_H: f64 = 300.0;
/// Perpendicular distance between a guide and its measurement arrow.
pub const ARROW_OFFSET: f64 = 16.0;
/// Clearance between an arrow tip and the vertex it points at.
pub const ARROW_INSET: f64 = 4.0;
/// Base label sits this far below the base guide.
pub const LABEL_BASE_DY: f64 = 34.0;
/// Height label sits this far left of the height guide.
pub const LABEL_HEIGHT_DX: f64 = 24.0;

// Timeline, in milliseconds from the play invocation.
pub const REVEAL_TRIANGLE_AT_MS: u32 = 0;
pub const REVEAL_TRIANGLE_MS: u32 = 300;
pub const REVEAL_GUIDES_AT_MS: u32 = 350;
pub const REVEAL_GUIDES_MS: u32 = 250;
pub const FLIP_PARTNER_AT_MS: u32 = 900;
pub const FLIP_PARTNER_MS: u32 = 600;
pub const OUTLINE_AT_MS: u32 = 1550;
pub const OUTLINE_MS: u32 = 300;
