use std::fmt::Write as _;

use png::{BitDepth, ColorType, Encoder};
use triangle_core::{Element, Geometry, Point, Segment, ViewState, Visual};

pub const ARIA_LABEL: &str = "Two congruent right triangles folding into a rectangle";

/// Fill colors per drawable. Fixed so exported frames stay comparable.
pub fn element_color(el: Element) -> &'static str {
    match el {
        Element::TriangleA => "dodgerblue",
        Element::TriangleB => "orange",
        Element::RectOutline => "crimson",
        Element::BaseArrow | Element::HeightArrow => "#333",
        Element::BaseLabel | Element::HeightLabel => "#111",
    }
}

/// Shortest decimal form with at most two fractional digits.
fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn points_attr(pts: &[Point]) -> String {
    pts.iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Value written to the element's `opacity` attribute.
pub fn element_opacity(v: Visual) -> String {
    num(v.opacity.clamp(0.0, 1.0))
}

/// `transform` attribute for the element, `None` when untransformed.
/// Only the partner triangle is ever mirrored; it pivots on its right edge.
pub fn element_transform(g: &Geometry, el: Element, v: Visual) -> Option<String> {
    if el != Element::TriangleB || v.is_identity_transform() {
        return None;
    }
    let p = g.flip_pivot;
    Some(format!(
        "translate({} {}) scale({} 1) translate({} {})",
        num(p.x),
        num(p.y),
        num(v.scale_x),
        num(-p.x),
        num(-p.y)
    ))
}

/// Attribute values one element needs after its visual changed.
#[derive(Clone, Debug, PartialEq)]
pub struct AttrWrite {
    pub element: Element,
    pub opacity: String,
    /// `None` means the `transform` attribute is removed.
    pub transform: Option<String>,
}

/// Writes that bring a scene rendered at `applied` up to `view`.
pub fn diff_view(g: &Geometry, applied: &ViewState, view: &ViewState) -> Vec<AttrWrite> {
    view.iter()
        .filter(|&(el, v)| applied.get(el) != v)
        .map(|(el, v)| AttrWrite {
            element: el,
            opacity: element_opacity(v),
            transform: element_transform(g, el, v),
        })
        .collect()
}

fn visual_attrs(g: &Geometry, view: &ViewState, el: Element) -> String {
    let v = view.get(el);
    let mut s = format!(" id=\"{}\" opacity=\"{}\"", el.dom_id(), element_opacity(v));
    if let Some(t) = element_transform(g, el, v) {
        let _ = write!(s, " transform=\"{}\"", t);
    }
    s
}

fn line(seg: &Segment) -> String {
    format!(
        "x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
        num(seg.from.x),
        num(seg.from.y),
        num(seg.to.x),
        num(seg.to.y)
    )
}

/// Build the scene SVG. Returns (svg, width_px, height_px).
pub fn build_scene_svg(g: &Geometry, view: &ViewState) -> (String, u32, u32) {
    let (w_px, h_px) = g.viewport.pixels();
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{}\" width=\"{}\" height=\"{}\" role=\"img\" aria-label=\"{}\">",
        g.viewport.view_box(),
        num(g.viewport.w),
        num(g.viewport.h),
        ARIA_LABEL
    );
    svg.push_str(
        "<defs><marker id=\"arrowHead\" viewBox=\"0 0 10 10\" refX=\"9\" refY=\"5\" markerWidth=\"7\" markerHeight=\"7\" orient=\"auto-start-reverse\"><path d=\"M0,0 L10,5 L0,10 z\" fill=\"#333\"/></marker></defs>",
    );
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");

    // Guides stay visible; only their arrows and labels animate.
    for seg in [&g.base_guide, &g.height_guide] {
        let _ = write!(
            svg,
            "<line class=\"guide\" {} stroke=\"#999\" stroke-width=\"1.5\" stroke-dasharray=\"4 4\"/>",
            line(seg)
        );
    }

    let _ = write!(
        svg,
        "<polygon{} points=\"{}\" fill=\"{}\" fill-opacity=\"0.85\" stroke=\"#333\" stroke-width=\"1.6\"/>",
        visual_attrs(g, view, Element::TriangleA),
        points_attr(&g.triangle_a),
        element_color(Element::TriangleA)
    );
    let _ = write!(
        svg,
        "<g{}><polygon points=\"{}\" fill=\"{}\" fill-opacity=\"0.85\" stroke=\"#333\" stroke-width=\"1.6\"/></g>",
        visual_attrs(g, view, Element::TriangleB),
        points_attr(&g.triangle_b),
        element_color(Element::TriangleB)
    );
    let r = g.rect_outline;
    let _ = write!(
        svg,
        "<rect{} x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"3\"/>",
        visual_attrs(g, view, Element::RectOutline),
        num(r.x),
        num(r.y),
        num(r.w),
        num(r.h),
        element_color(Element::RectOutline)
    );

    for (el, seg) in [
        (Element::BaseArrow, &g.base_arrow),
        (Element::HeightArrow, &g.height_arrow),
    ] {
        let _ = write!(
            svg,
            "<line{} {} stroke=\"{}\" stroke-width=\"1.6\" marker-start=\"url(#arrowHead)\" marker-end=\"url(#arrowHead)\"/>",
            visual_attrs(g, view, el),
            line(seg),
            element_color(el)
        );
    }

    for (el, at, text) in [
        (Element::BaseLabel, g.label_base, "b"),
        (Element::HeightLabel, g.label_height, "h"),
    ] {
        let _ = write!(
            svg,
            "<text{} x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"sans-serif\" font-size=\"20\" font-style=\"italic\" fill=\"{}\">{}</text>",
            visual_attrs(g, view, el),
            num(at.x),
            num(at.y),
            element_color(el),
            text
        );
    }

    svg.push_str("</svg>");
    (svg, w_px, h_px)
}

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}
