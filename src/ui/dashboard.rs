use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::generate_palette;
use crate::data::aggregate::{Kpis, Summary};
use crate::data::model::{Grade, Major};
use crate::state::AppState;

use super::pie::{PieSlice, pie_chart};
use super::plot;

// ---------------------------------------------------------------------------
// Central panel – KPIs and charts
// ---------------------------------------------------------------------------

/// Render the dashboard page for the current selection.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let summary = match (&state.dataset, &state.summary) {
        (Some(_), Some(summary)) => summary,
        _ => {
            ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
                Some(msg) => ui.heading(RichText::new(msg).color(Color32::RED)),
                None => ui.heading("Open a classroom sheet to begin  (File → Open…)"),
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new("📊 Classroom Dashboard").size(32.0));
            ui.add_space(12.0);

            kpi_row(ui, &summary.kpis);
            ui.separator();
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                plot::grade_bar_chart(&mut cols[0], &summary.slide_time_by_grade);
                plot::slide_bar_chart(&mut cols[1], &summary.slide_means);
            });
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                pie_chart(&mut cols[0], "Major Percentages", &major_slices(summary), 0.4, true);
                pie_chart(&mut cols[1], "Letter Grade Percentages", &grade_slices(summary), 0.0, false);
            });
            ui.separator();

            plot::grade_study_scatter(ui, &summary.grade_vs_study);
            ui.separator();
            ui.separator();
        });
}

fn kpi_row(ui: &mut Ui, kpis: &Kpis) {
    let cells = [
        (
            "Average Grade Percentage:",
            format!("📋 {} %", format_kpi(kpis.average_grade, 0)),
        ),
        (
            "Average Study Time:",
            format!("📚 {} hours", format_kpi(kpis.average_study_hours, 1)),
        ),
        (
            "Average Time Spent on Each Slide:",
            format!("💻 {} mins", format_kpi(kpis.average_slide_minutes, 1)),
        ),
    ];
    ui.columns(3, |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(cells) {
            col.label(RichText::new(title).size(20.0).strong());
            col.label(RichText::new(value).size(20.0));
        }
    });
}

/// Fixed-decimal rendering; undefined means show a dash.
pub fn format_kpi(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "—".to_string(),
    }
}

/// Shown instead of a chart when the selection leaves nothing to draw.
pub fn placeholder(ui: &mut Ui) {
    ui.add_sized(
        [ui.available_width(), 120.0],
        egui::Label::new(RichText::new("No data for the current selection").weak()),
    );
}

// Colours are tied to the category, not the slice position, so a category
// keeps its colour as the selection changes.

fn major_slices(summary: &Summary) -> Vec<PieSlice> {
    let palette = generate_palette(Major::ALL.len());
    Major::ALL
        .iter()
        .zip(palette)
        .filter_map(|(major, color)| {
            let value = *summary.counts_by_major.get(major)?;
            Some(PieSlice {
                label: major.to_string(),
                value,
                color,
            })
        })
        .collect()
}

fn grade_slices(summary: &Summary) -> Vec<PieSlice> {
    let palette = generate_palette(Grade::ALL.len());
    Grade::ALL
        .iter()
        .zip(palette)
        .filter_map(|(grade, color)| {
            let value = *summary.counts_by_grade.get(grade)?;
            Some(PieSlice {
                label: grade.to_string(),
                value,
                color,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilteredView, Selection};
    use crate::data::filter::tests::record;
    use crate::data::model::{Dataset, Semester};

    #[test]
    fn kpis_format_with_fixed_decimals() {
        assert_eq!(format_kpi(Some(86.0), 0), "86");
        assert_eq!(format_kpi(Some(2.2), 1), "2.2");
        assert_eq!(format_kpi(Some(3.0), 1), "3.0");
        assert_eq!(format_kpi(None, 1), "—");
    }

    #[test]
    fn slices_follow_category_order_and_skip_absent() {
        let ds = Dataset::new(
            vec![
                record(Semester::Fall, Major::It, Grade::C),
                record(Semester::Fall, Major::Cps, Grade::A),
                record(Semester::Fall, Major::It, Grade::A),
            ],
            Vec::new(),
        );
        let summary = Summary::compute(&FilteredView::new(&ds, &Selection::all()));

        let majors: Vec<(String, usize)> = major_slices(&summary)
            .into_iter()
            .map(|s| (s.label, s.value))
            .collect();
        let grades: Vec<String> = grade_slices(&summary).into_iter().map(|s| s.label).collect();

        assert_eq!(majors, vec![("CPS".to_string(), 1), ("IT".to_string(), 2)]);
        assert_eq!(grades, vec!["A", "C"]);
    }
}
