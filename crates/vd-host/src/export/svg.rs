//! Vector sheet writer

use std::fmt::Write;

use glam::DVec2;

use super::drawing::Drawing;

const STROKE_WIDTH: f64 = 0.01;
const FONT_SIZE: f64 = 0.12;

/// Render a drawing as an SVG document in sheet units
pub fn render_svg(drawing: &Drawing) -> Result<String, std::fmt::Error> {
    let outline = drawing.outline;
    // SVG y grows downwards, sheet y grows upwards
    let flip = |p: DVec2| DVec2::new(p.x, outline.max.y - (p.y - outline.min.y));

    let mut svg = String::new();
    writeln!(svg, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{:.4} {:.4} {:.4} {:.4}\">",
        outline.min.x,
        outline.min.y,
        outline.width(),
        outline.height()
    )?;
    writeln!(svg, "  <title>{}</title>", xml_escape(&drawing.title))?;
    writeln!(
        svg,
        "  <g fill=\"none\" stroke=\"black\" stroke-width=\"{STROKE_WIDTH}\">"
    )?;
    for stroke in &drawing.strokes {
        let (a, b) = (flip(stroke.from), flip(stroke.to));
        writeln!(
            svg,
            "    <line x1=\"{:.4}\" y1=\"{:.4}\" x2=\"{:.4}\" y2=\"{:.4}\"/>",
            a.x, a.y, b.x, b.y
        )?;
    }
    writeln!(svg, "  </g>")?;
    writeln!(
        svg,
        "  <g font-family=\"sans-serif\" font-size=\"{FONT_SIZE}\" fill=\"black\">"
    )?;
    for label in &drawing.labels {
        let p = flip(label.at);
        writeln!(
            svg,
            "    <text x=\"{:.4}\" y=\"{:.4}\">{}</text>",
            p.x,
            p.y,
            xml_escape(&label.text)
        )?;
    }
    writeln!(svg, "  </g>")?;
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::drawing::{Label, Stroke};
    use vd_core::Rect2;

    fn drawing() -> Drawing {
        Drawing {
            title: "A&B".to_string(),
            outline: Rect2::new(DVec2::ZERO, DVec2::new(10.0, 8.0)),
            strokes: vec![Stroke {
                from: DVec2::new(1.0, 1.0),
                to: DVec2::new(2.0, 1.0),
            }],
            labels: vec![Label {
                text: "<O>".to_string(),
                at: DVec2::new(1.0, 7.0),
            }],
        }
    }

    #[test]
    fn test_render_svg() {
        let svg = render_svg(&drawing()).unwrap();
        assert!(svg.contains("viewBox=\"0.0000 0.0000 10.0000 8.0000\""));
        assert!(svg.contains("<title>A&amp;B</title>"));
        // y is flipped against the outline top
        assert!(svg.contains("x1=\"1.0000\" y1=\"7.0000\" x2=\"2.0000\" y2=\"7.0000\""));
        assert!(svg.contains("<text x=\"1.0000\" y=\"1.0000\">&lt;O&gt;</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
