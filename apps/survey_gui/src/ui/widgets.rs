//! Painted star widgets and the shared card frame.

use std::f32::consts::{FRAC_PI_2, PI};

use eframe::egui;

pub const STAR_LIT: egui::Color32 = egui::Color32::from_rgb(250, 204, 21);
pub const STAR_DIM: egui::Color32 = egui::Color32::from_rgb(209, 213, 219);
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(249, 115, 22);
pub const DISABLED: egui::Color32 = egui::Color32::from_rgb(209, 213, 219);
pub const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(255, 255, 255);

const INNER_RADIUS_RATIO: f32 = 0.45;

/// Outline of a five-point star, tips first, alternating outer/inner vertices.
pub fn star_points(center: egui::Pos2, outer_radius: f32) -> Vec<egui::Pos2> {
    let inner_radius = outer_radius * INNER_RADIUS_RATIO;
    (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = -FRAC_PI_2 + i as f32 * PI / 5.0;
            center + radius * egui::vec2(angle.cos(), angle.sin())
        })
        .collect()
}

fn paint_star(painter: &egui::Painter, rect: egui::Rect, filled: bool, scale: f32) {
    let outer_radius = rect.width().min(rect.height()) * 0.5 * scale;
    let center = rect.center();
    let points = star_points(center, outer_radius);
    let color = if filled { STAR_LIT } else { STAR_DIM };

    if filled {
        // The star is concave, so fill it as a fan of convex triangles.
        for (i, point) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            painter.add(egui::Shape::convex_polygon(
                vec![center, *point, next],
                color,
                egui::Stroke::NONE,
            ));
        }
    }
    painter.add(egui::Shape::closed_line(points, egui::Stroke::new(2.0, color)));
}

/// Clickable rating star; grows slightly while lit.
pub fn star_button(ui: &mut egui::Ui, lit: bool, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());
    if ui.is_rect_visible(rect) {
        let scale = if lit { 0.95 } else { 0.85 };
        paint_star(ui.painter(), rect, lit, scale);
    }
    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

pub fn star_icon(ui: &mut egui::Ui, filled: bool, size: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    if ui.is_rect_visible(rect) {
        paint_star(ui.painter(), rect, filled, 0.9);
    }
}

pub fn card_frame(corner_radius: u8) -> egui::Frame {
    egui::Frame::new()
        .fill(CARD_FILL)
        .corner_radius(egui::CornerRadius::same(corner_radius))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(230)))
        .inner_margin(egui::Margin::symmetric(24, 20))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_alternates_outer_and_inner_vertices() {
        let center = egui::pos2(10.0, 10.0);
        let points = star_points(center, 10.0);
        assert_eq!(points.len(), 10);

        for (i, point) in points.iter().enumerate() {
            let expected = if i % 2 == 0 { 10.0 } else { 10.0 * INNER_RADIUS_RATIO };
            assert!((point.distance(center) - expected).abs() < 1e-4);
        }
        // First tip points straight up.
        assert!((points[0].x - 10.0).abs() < 1e-4);
        assert!(points[0].y < center.y);
    }
}
