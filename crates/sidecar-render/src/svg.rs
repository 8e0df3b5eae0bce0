#![forbid(unsafe_code)]

//! SVG serialization of an [`OverlayLayer`].
//!
//! Used for snapshots and debugging. Non-interactive elements carry
//! `pointer-events="none"` so a dropped-in export behaves like the live
//! overlay.

use std::fmt::Write;

use sidecar_core::geometry::{Point, Rect};
use sidecar_layout::bezier::fmt_num;

use crate::layer::{CardView, Control, DrawOp, OverlayLayer};
use crate::theme::Rgba;

/// Configuration for SVG export.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    pub font_family: String,
    pub headline_size: f64,
    pub body_size: f64,
    /// Vertical advance between text lines, in pixels.
    pub line_height: f64,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            font_family: "system-ui, sans-serif".into(),
            headline_size: 17.0,
            body_size: 14.0,
            line_height: 22.0,
        }
    }
}

impl SvgExporter {
    /// Export a layer to an SVG document string.
    pub fn export(&self, layer: &OverlayLayer) -> String {
        let bounds = layer.viewport.bounds();
        let (w, h) = (fmt_num(bounds.width), fmt_num(bounds.height));
        let mut out = String::with_capacity(2048);
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" data-z-index=\"{}\">",
            layer.z_index
        );
        for op in &layer.ops {
            match op {
                DrawOp::Scrim {
                    bounds,
                    cutout,
                    color,
                } => write_scrim(&mut out, bounds, cutout.as_ref(), *color),
                DrawOp::Ring {
                    rect,
                    radius,
                    color,
                    width,
                } => {
                    out.push_str("<rect class=\"sidecar-ring\"");
                    write_rect_attrs(&mut out, rect);
                    let _ = write!(
                        out,
                        " rx=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" pointer-events=\"none\"/>",
                        fmt_num(*radius),
                        color.to_hex(),
                        fmt_num(*width)
                    );
                }
                DrawOp::Connector {
                    curve,
                    arrow,
                    color,
                    width,
                } => {
                    let _ = write!(
                        out,
                        "<g class=\"sidecar-connector\" pointer-events=\"none\">\
                         <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\
                         <path d=\"{}\" fill=\"{}\"/></g>",
                        curve.to_svg_path(),
                        color.to_hex(),
                        fmt_num(*width),
                        arrow.to_svg_path(),
                        color.to_hex()
                    );
                }
                DrawOp::Card(card) => self.write_card(&mut out, card),
            }
        }
        out.push_str("</svg>");
        out
    }

    fn write_card(&self, out: &mut String, card: &CardView) {
        let rect = &card.rect;
        out.push_str("<g class=\"sidecar-card\" data-step=\"");
        attr_escape_into(out, card.step.as_str());
        out.push_str("\" font-family=\"");
        attr_escape_into(out, &self.font_family);
        out.push_str("\">");

        out.push_str("<rect");
        write_rect_attrs(out, rect);
        let _ = write!(
            out,
            " rx=\"10\" fill=\"{}\" stroke=\"{}\"/>",
            card.background.to_hex(),
            card.border.to_hex()
        );

        let x = rect.left + 16.0;
        let mut y = rect.top + 16.0 + self.headline_size;

        write_text(
            out,
            Point::new(x, y),
            self.body_size,
            card.muted_text,
            "sidecar-progress",
            &card.progress.label(),
        );
        y += self.line_height;
        write_text(
            out,
            Point::new(x, y),
            self.headline_size,
            card.text,
            "sidecar-headline",
            &card.headline,
        );
        y += self.line_height;
        write_text(
            out,
            Point::new(x, y),
            self.body_size,
            card.text,
            "sidecar-body",
            &card.body,
        );
        if let Some(hint) = &card.action_hint {
            y += self.line_height;
            write_text(
                out,
                Point::new(x, y),
                self.body_size,
                card.accent,
                "sidecar-hint",
                hint,
            );
        }
        if let Some(nudge) = &card.nudge {
            y += self.line_height;
            write_text(
                out,
                Point::new(x, y),
                self.body_size,
                card.nudge_color,
                "sidecar-nudge",
                nudge,
            );
        }

        for control in &card.controls {
            self.write_control(out, card, control);
        }
        out.push_str("</g>");
    }

    fn write_control(&self, out: &mut String, card: &CardView, control: &Control) {
        let _ = write!(out, "<g data-control=\"{}\"", control.kind.as_str());
        if !control.enabled {
            out.push_str(" opacity=\"0.4\" aria-disabled=\"true\"");
        }
        out.push('>');
        let rect = &control.rect;
        match control.checked {
            Some(checked) => {
                let side = rect.height.min(16.0);
                let bx = Rect::new(rect.left, rect.center_y() - side / 2.0, side, side);
                out.push_str("<rect");
                write_rect_attrs(out, &bx);
                let fill = if checked { card.accent } else { Rgba::TRANSPARENT };
                let _ = write!(
                    out,
                    " rx=\"3\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"{}\"/>",
                    fill.to_hex(),
                    fmt_num(fill.opacity()),
                    card.muted_text.to_hex()
                );
                let tx = rect.left + side + 8.0;
                let ty = rect.center_y() + self.body_size / 3.0;
                write_text(
                    out,
                    Point::new(tx, ty),
                    self.body_size,
                    card.muted_text,
                    "sidecar-label",
                    &control.label,
                );
            }
            None => {
                out.push_str("<rect");
                write_rect_attrs(out, rect);
                let _ = write!(
                    out,
                    " rx=\"6\" fill=\"{}\" stroke=\"{}\"/>",
                    card.background.to_hex(),
                    card.border.to_hex()
                );
                let tx = rect.center_x();
                let ty = rect.center_y() + self.body_size / 3.0;
                let _ = write!(
                    out,
                    "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"middle\">",
                    fmt_num(tx),
                    fmt_num(ty),
                    fmt_num(self.body_size),
                    card.text.to_hex()
                );
                svg_escape_into(out, &control.label);
                out.push_str("</text>");
            }
        }
        out.push_str("</g>");
    }
}

/// One `<text>` run with escaped content.
fn write_text(out: &mut String, at: Point, size: f64, color: Rgba, class: &str, text: &str) {
    let _ = write!(
        out,
        "<text class=\"{class}\" x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\">",
        fmt_num(at.x),
        fmt_num(at.y),
        fmt_num(size),
        color.to_hex()
    );
    svg_escape_into(out, text);
    out.push_str("</text>");
}

fn write_scrim(out: &mut String, bounds: &Rect, cutout: Option<&Rect>, color: Rgba) {
    let _ = write!(
        out,
        "<path class=\"sidecar-scrim\" d=\"{}",
        rect_path(bounds)
    );
    if let Some(hole) = cutout {
        out.push(' ');
        out.push_str(&rect_path(hole));
    }
    let _ = write!(
        out,
        "\" fill=\"{}\" fill-opacity=\"{}\" fill-rule=\"evenodd\" pointer-events=\"none\"/>",
        color.to_hex(),
        fmt_num(color.opacity())
    );
}

fn rect_path(rect: &Rect) -> String {
    format!(
        "M {} {} H {} V {} H {} Z",
        fmt_num(rect.left),
        fmt_num(rect.top),
        fmt_num(rect.right()),
        fmt_num(rect.bottom()),
        fmt_num(rect.left)
    )
}

fn write_rect_attrs(out: &mut String, rect: &Rect) {
    let _ = write!(
        out,
        " x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
        fmt_num(rect.left),
        fmt_num(rect.top),
        fmt_num(rect.width),
        fmt_num(rect.height)
    );
}

/// SVG-escape text content into the output buffer.
fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
}

/// Escape an attribute value; quotes included.
fn attr_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            _ => svg_escape_into(out, c.encode_utf8(&mut [0u8; 4])),
        }
    }
}

#[cfg(test)]
mod tests {
    use sidecar_core::step::{Step, StepRegistry};
    use sidecar_core::{LayoutConfig, TourCommand, TourState};
    use sidecar_layout::{PositionEngine, Viewport};

    use super::*;
    use crate::renderer::OverlayRenderer;

    fn layer(state: TourState, steps: &StepRegistry) -> OverlayLayer {
        OverlayRenderer::new(PositionEngine::new(LayoutConfig::default()))
            .render_state(
                steps,
                &state,
                None,
                &Viewport::new(1200.0, 800.0).with_side_region(900.0),
            )
            .unwrap()
    }

    fn steps() -> StepRegistry {
        StepRegistry::new(vec![
            Step::new("a&b", "Tips <1>", "Use \"quotes\" & more."),
            Step::new("t", "Target", "Look here.").target("x"),
        ])
        .unwrap()
    }

    #[test]
    fn svg_basic_structure() {
        let svg = SvgExporter::default().export(&layer(TourState::new(), &steps()));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("xmlns"));
        assert!(svg.contains("width=\"1200\" height=\"800\""));
        assert!(svg.contains("data-z-index=\"10000\""));
    }

    #[test]
    fn svg_escapes_text_and_attributes() {
        let svg = SvgExporter::default().export(&layer(TourState::new(), &steps()));
        assert!(svg.contains(">Tips &lt;1&gt;</text>"));
        assert!(svg.contains("Use \"quotes\" &amp; more."));
        assert!(svg.contains("data-step=\"a&amp;b\""));
    }

    #[test]
    fn scrim_is_non_interactive_and_dimmed() {
        let svg = SvgExporter::default().export(&layer(TourState::new(), &steps()));
        assert!(svg.contains("class=\"sidecar-scrim\" d=\"M 0 0 H 1200 V 800 H 0 Z\""));
        assert!(svg.contains("fill-opacity=\"0.55\""));
        assert!(svg.contains("pointer-events=\"none\""));
    }

    #[test]
    fn disabled_back_is_marked() {
        let svg = SvgExporter::default().export(&layer(TourState::new(), &steps()));
        assert!(svg.contains("<g data-control=\"back\" opacity=\"0.4\" aria-disabled=\"true\">"));
        assert!(svg.contains("<g data-control=\"next\">"));
    }

    #[test]
    fn targeted_step_exports_ring_and_connector() {
        let steps = steps();
        let state = TourState::new()
            .apply(&steps, TourCommand::Next)
            .state
            .with_target_rect(Some(Rect::new(950.0, 300.0, 120.0, 40.0)));
        let svg = SvgExporter::default().export(&layer(state, &steps));
        assert!(svg.contains("class=\"sidecar-ring\""));
        assert!(svg.contains("class=\"sidecar-connector\""));
        assert!(svg.contains(" C "));
        assert!(svg.contains("fill-rule=\"evenodd\""));
    }
}
