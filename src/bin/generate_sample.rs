use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_xlsxwriter::{Format, Workbook};

const SLIDES: usize = 15;
const ROWS: u32 = 100;

fn letter_grade(percent: f64) -> &'static str {
    match percent {
        p if p >= 90.0 => "A",
        p if p >= 80.0 => "B",
        p if p >= 70.0 => "C",
        p if p >= 60.0 => "D",
        _ => "F",
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let semesters = ["Fall", "Spring", "Summer"];
    // CPS-heavy class, like a typical intro course.
    let majors = ["CPS", "CPS", "CPS", "IT", "IT", "Other"];

    let mut headers: Vec<String> = [
        "Semester",
        "Major",
        "Grade",
        "Grade (Percentage)",
        "Study Time Avg (Hrs)",
        "Avg Time Spent Per Slide (Mins)",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    headers.extend((1..=SLIDES).map(|n| format!("Slide #{n} (Mins)")));

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for row in 1..=ROWS {
        let study_hours = round1(rng.gen_range(0.5..6.0));
        // Study time drives the grade, with noise.
        let percent = (45.0 + study_hours * 8.5 + rng.gen_range(-12.0..12.0)).clamp(0.0, 100.0);
        let percent = percent.round();

        let engagement = 0.5 + study_hours / 3.0;
        let slides: Vec<f64> = (0..SLIDES)
            .map(|_| round1(engagement * rng.gen_range(0.4..1.6)))
            .collect();
        let avg_slide = round1(slides.iter().sum::<f64>() / SLIDES as f64);

        let semester = semesters.choose(&mut rng).copied().unwrap_or("Fall");
        let major = majors.choose(&mut rng).copied().unwrap_or("CPS");

        sheet.write_string(row, 0, semester)?;
        sheet.write_string(row, 1, major)?;
        sheet.write_string(row, 2, letter_grade(percent))?;
        sheet.write_number(row, 3, percent)?;
        sheet.write_number(row, 4, study_hours)?;
        sheet.write_number(row, 5, avg_slide)?;
        for (i, minutes) in slides.iter().enumerate() {
            sheet.write_number(row, 6 + i as u16, *minutes)?;
        }
    }

    let output_path = "data.xlsx";
    workbook
        .save(output_path)
        .with_context(|| format!("writing {output_path}"))?;

    println!(
        "Wrote {ROWS} records ({SLIDES} slide columns) to {output_path}"
    );
    Ok(())
}
