//! Flattening a sheet into 2D strokes and labels
//!
//! Both writers draw from the same [`Drawing`], so the vector and raster
//! outputs of one sheet always agree.

use glam::{DVec2, DVec3};

use vd_core::{Rect2, ViewKind};

use crate::host::{PlacedView, Sheet};

/// Fraction of the shorter outline side used for the isometric axis triad
const TRIAD_RATIO: f64 = 0.05;

/// A straight line in sheet coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: DVec2,
    pub to: DVec2,
}

/// Text anchored at a sheet position
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub at: DVec2,
}

/// Everything drawn on one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub title: String,
    pub outline: Rect2,
    pub strokes: Vec<Stroke>,
    pub labels: Vec<Label>,
}

impl Drawing {
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let mut drawing = Self {
            title: sheet.name.clone(),
            outline: sheet.outline,
            strokes: rect_strokes(&sheet.outline).to_vec(),
            labels: Vec::new(),
        };
        let triad = TRIAD_RATIO * sheet.outline.width().min(sheet.outline.height());
        for view in &sheet.views {
            drawing.add_view(view, triad);
        }
        drawing
    }

    fn add_view(&mut self, view: &PlacedView, triad: f64) {
        let scale = f64::from(view.spec.scale.max(1));
        match &view.spec.kind {
            ViewKind::Section(section) => {
                let plane = section.cut_plane;
                let half = DVec2::splat(plane.half_size / scale);
                let frame = Rect2::new(view.center - half, view.center + half);
                self.strokes.extend(rect_strokes(&frame));
                for marker in &section.markers {
                    let offset = marker.position - section.section_box.origin;
                    let local = DVec2::new(offset.dot(plane.right), offset.dot(plane.up));
                    self.labels.push(Label {
                        text: marker.label.clone(),
                        at: view.center + local / scale,
                    });
                }
                self.labels.push(Label {
                    text: view.spec.name.clone(),
                    at: view.center - DVec2::new(half.x, half.y * 1.2),
                });
            }
            ViewKind::Isometric(camera) => {
                let right = camera.right();
                for (axis, label) in [(DVec3::X, "X"), (DVec3::Y, "Y"), (DVec3::Z, "Z")] {
                    let tip = view.center + DVec2::new(axis.dot(right), axis.dot(camera.up)) * triad;
                    self.strokes.push(Stroke {
                        from: view.center,
                        to: tip,
                    });
                    self.labels.push(Label {
                        text: label.to_string(),
                        at: tip,
                    });
                }
                self.labels.push(Label {
                    text: view.spec.name.clone(),
                    at: view.center - DVec2::new(triad, triad * 1.2),
                });
            }
        }
    }
}

fn rect_strokes(rect: &Rect2) -> [Stroke; 4] {
    let corners = [
        rect.min,
        DVec2::new(rect.max.x, rect.min.y),
        rect.max,
        DVec2::new(rect.min.x, rect.max.y),
    ];
    std::array::from_fn(|i| Stroke {
        from: corners[i],
        to: corners[(i + 1) % 4],
    })
}
