use std::collections::BTreeMap;

use eframe::egui::{Color32, Rect, RichText, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotPoints, Points};

use crate::color::{GRADE_BAR, SCATTER_BACKGROUND};
use crate::data::aggregate::SlideMean;
use crate::data::model::Grade;

use super::dashboard::placeholder;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Category axes
// ---------------------------------------------------------------------------

/// Label for an integer grid mark, blank between categories.
fn category_label(labels: &[String], mark: GridMark) -> String {
    let v = mark.value;
    if v < 0.0 || v.fract().abs() > f64::EPSILON {
        return String::new();
    }
    labels.get(v as usize).cloned().unwrap_or_default()
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(18.0));
}

// ---------------------------------------------------------------------------
// Avg time per slide, by grade (horizontal bars)
// ---------------------------------------------------------------------------

/// Bars bottom-to-top F..A so the best grade reads first.
pub fn grade_bar_chart(ui: &mut Ui, by_grade: &BTreeMap<Grade, Option<f64>>) {
    chart_title(ui, "Avg Time Spent Per Slide By Grade");

    if by_grade.values().all(Option::is_none) {
        placeholder(ui);
        return;
    }

    let labels: Vec<String> = by_grade.keys().rev().map(|g| g.to_string()).collect();
    let bars: Vec<Bar> = by_grade
        .iter()
        .rev()
        .enumerate()
        .filter_map(|(i, (grade, mean))| {
            let mean = (*mean)?;
            Some(Bar::new(i as f64, mean).name(grade).fill(GRADE_BAR).width(0.7))
        })
        .collect();

    Plot::new("grade_bar_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Avg Time Spent Per Slide (Mins)")
        .y_axis_label("Grade")
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(GRADE_BAR));
        });
}

// ---------------------------------------------------------------------------
// Avg time on each slide (vertical bars)
// ---------------------------------------------------------------------------

pub fn slide_bar_chart(ui: &mut Ui, means: &[SlideMean]) {
    chart_title(ui, "Avg Time Spent on Each Individual Slide");

    if means.iter().all(|m| m.mean.is_none()) {
        placeholder(ui);
        return;
    }

    let labels: Vec<String> = means.iter().map(|m| m.column.clone()).collect();
    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .filter_map(|(i, m)| Some(Bar::new(i as f64, m.mean?).name(&m.column).width(0.7)))
        .collect();

    Plot::new("slide_bar_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Slide Number")
        .y_axis_label("Minutes")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Grade vs study time (scatter)
// ---------------------------------------------------------------------------

pub fn grade_study_scatter(ui: &mut Ui, points: &[[f64; 2]]) {
    chart_title(ui, "Relationship Between Grade and Study Time");

    if points.is_empty() {
        placeholder(ui);
        return;
    }

    // Paint the backdrop first; the plot draws on top without its own.
    let rect = Rect::from_min_size(
        ui.cursor().min,
        Vec2::new(ui.available_width(), CHART_HEIGHT),
    );
    ui.painter().rect_filled(rect, 4.0, SCATTER_BACKGROUND);

    Plot::new("grade_study_scatter")
        .height(CHART_HEIGHT)
        .show_background(false)
        .x_axis_label("Grade (Percentage)")
        .y_axis_label("Study Time Avg (Hrs)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let series = Points::new(PlotPoints::from(points.to_vec()))
                .radius(4.0)
                .color(Color32::from_rgb(0x1f, 0x77, 0xb4))
                .name("Records");
            plot_ui.points(series);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(value: f64) -> GridMark {
        GridMark {
            value,
            step_size: 1.0,
        }
    }

    #[test]
    fn category_axis_labels_only_integer_marks() {
        let labels = vec!["F".to_string(), "B".to_string(), "A".to_string()];
        assert_eq!(category_label(&labels, mark(0.0)), "F");
        assert_eq!(category_label(&labels, mark(2.0)), "A");
        assert_eq!(category_label(&labels, mark(0.5)), "");
        assert_eq!(category_label(&labels, mark(-1.0)), "");
        assert_eq!(category_label(&labels, mark(3.0)), "");
    }
}
