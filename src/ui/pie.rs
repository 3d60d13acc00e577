use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{
    Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2,
};

// ---------------------------------------------------------------------------
// Pie / donut chart drawn with the painter (egui_plot has no pie)
// ---------------------------------------------------------------------------

/// One category and its count.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub color: Color32,
}

/// A slice placed on the circle. Angles are radians clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub color: Color32,
    pub fraction: f32,
    pub start: f32,
    pub sweep: f32,
}

/// Turn counts into wedges. With `sort_by_value` the largest slice comes
/// first (ties keep their input order); otherwise input order is kept.
pub fn layout(slices: &[PieSlice], sort_by_value: bool) -> Vec<Wedge> {
    let total: usize = slices.iter().map(|s| s.value).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut ordered: Vec<&PieSlice> = slices.iter().filter(|s| s.value > 0).collect();
    if sort_by_value {
        ordered.sort_by(|a, b| b.value.cmp(&a.value));
    }

    let mut start = 0.0;
    ordered
        .into_iter()
        .map(|s| {
            let fraction = s.value as f32 / total as f32;
            let wedge = Wedge {
                label: s.label.clone(),
                color: s.color,
                fraction,
                start,
                sweep: fraction * TAU,
            };
            start += wedge.sweep;
            wedge
        })
        .collect()
}

/// Point on the circle at `angle` (clockwise from straight up, y down).
fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * Vec2::new(angle.sin(), -angle.cos())
}

/// Draw a titled pie. `hole` is the inner radius as a fraction (0 = full pie).
pub fn pie_chart(ui: &mut Ui, title: &str, slices: &[PieSlice], hole: f32, sort_by_value: bool) {
    ui.label(RichText::new(title).strong().size(18.0));

    let wedges = layout(slices, sort_by_value);
    if wedges.is_empty() {
        super::dashboard::placeholder(ui);
        return;
    }

    let side = ui.available_width().min(320.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
    let center = response.rect.center();
    let radius = side * 0.45;

    for wedge in &wedges {
        // Split into convex pieces no wider than a quarter turn.
        let pieces = (wedge.sweep / FRAC_PI_2).ceil().max(1.0) as usize;
        for p in 0..pieces {
            let a0 = wedge.start + wedge.sweep * p as f32 / pieces as f32;
            let a1 = wedge.start + wedge.sweep * (p + 1) as f32 / pieces as f32;
            let steps = 16;
            let mut points = vec![center];
            points.extend(
                (0..=steps).map(|i| polar(center, radius, a0 + (a1 - a0) * i as f32 / steps as f32)),
            );
            painter.add(Shape::convex_polygon(points, wedge.color, Stroke::NONE));
        }
    }

    if hole > 0.0 {
        painter.circle_filled(center, radius * hole, ui.visuals().panel_fill);
    }

    let label_radius = radius * (1.0 + hole) / 2.0;
    for wedge in &wedges {
        let pos = polar(center, label_radius, wedge.start + wedge.sweep / 2.0);
        painter.text(
            pos,
            Align2::CENTER_CENTER,
            format!("{}\n{:.1}%", wedge.label, wedge.fraction * 100.0),
            FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    legend(ui, &wedges);
}

fn legend(ui: &mut Ui, wedges: &[Wedge]) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for wedge in wedges {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, wedge.color);
            ui.label(RichText::new(&wedge.label).size(15.0));
        }
    });
}
