use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::{Grade, Major, Record};

// ---------------------------------------------------------------------------
// Reduction primitives
// ---------------------------------------------------------------------------

/// Running sum/count. Missing values are skipped, like a dataframe mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.sum += v;
            self.count += 1;
        }
    }

    /// `None` when nothing was pushed.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Mean of the present values, `None` if there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut acc = MeanAccumulator::default();
    values.into_iter().for_each(|v| acc.push(v));
    acc.mean()
}

/// Round half to even at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Partition by `key` and average `value` inside each partition.
/// Keys with no records do not appear.
pub fn group_mean<'r, I, K>(
    records: I,
    key: impl Fn(&Record) -> K,
    value: impl Fn(&Record) -> Option<f64>,
) -> BTreeMap<K, Option<f64>>
where
    I: IntoIterator<Item = &'r Record>,
    K: Ord,
{
    let mut groups: BTreeMap<K, MeanAccumulator> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(value(record));
    }
    groups.into_iter().map(|(k, acc)| (k, acc.mean())).collect()
}

/// Partition by `key` and count members.
pub fn group_count<'r, I, K>(records: I, key: impl Fn(&Record) -> K) -> BTreeMap<K, usize>
where
    I: IntoIterator<Item = &'r Record>,
    K: Ord,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Dashboard aggregates
// ---------------------------------------------------------------------------

/// Headline averages, already rounded for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    /// Whole percent.
    pub average_grade: Option<f64>,
    /// Hours, one decimal.
    pub average_study_hours: Option<f64>,
    /// Minutes, one decimal.
    pub average_slide_minutes: Option<f64>,
}

fn rounded_mean(
    view: &FilteredView<'_>,
    field: impl Fn(&Record) -> Option<f64>,
    decimals: i32,
) -> Option<f64> {
    mean(view.records().map(field)).map(|m| round_to(m, decimals))
}

pub fn kpis(view: &FilteredView<'_>) -> Kpis {
    Kpis {
        average_grade: rounded_mean(view, |r| r.grade_percent, 0),
        average_study_hours: rounded_mean(view, |r| r.study_hours, 1),
        average_slide_minutes: rounded_mean(view, |r| r.avg_slide_minutes, 1),
    }
}

/// Mean "Avg Time Spent Per Slide" per letter grade, two decimals.
pub fn slide_time_by_grade(view: &FilteredView<'_>) -> BTreeMap<Grade, Option<f64>> {
    group_mean(view.records(), |r| r.grade, |r| r.avg_slide_minutes)
        .into_iter()
        .map(|(grade, m)| (grade, m.map(|m| round_to(m, 2))))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideMean {
    pub column: String,
    /// Minutes, one decimal.
    pub mean: Option<f64>,
}

/// One mean per slide column, in the dataset's slide column order.
pub fn slide_means(view: &FilteredView<'_>) -> Vec<SlideMean> {
    let columns = &view.dataset().slide_columns;
    let mut accs = vec![MeanAccumulator::default(); columns.len()];
    for record in view.records() {
        for (acc, value) in accs.iter_mut().zip(&record.slide_minutes) {
            acc.push(*value);
        }
    }
    columns
        .iter()
        .zip(accs)
        .map(|(column, acc)| SlideMean {
            column: column.clone(),
            mean: acc.mean().map(|m| round_to(m, 1)),
        })
        .collect()
}

pub fn counts_by_major(view: &FilteredView<'_>) -> BTreeMap<Major, usize> {
    group_count(view.records(), |r| r.major)
}

pub fn counts_by_grade(view: &FilteredView<'_>) -> BTreeMap<Grade, usize> {
    group_count(view.records(), |r| r.grade)
}

/// (grade percentage, study hours) for records that have both.
pub fn grade_vs_study(view: &FilteredView<'_>) -> Vec<[f64; 2]> {
    view.records()
        .filter_map(|r| Some([r.grade_percent?, r.study_hours?]))
        .collect()
}

/// Everything the dashboard draws for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub record_count: usize,
    pub kpis: Kpis,
    pub slide_time_by_grade: BTreeMap<Grade, Option<f64>>,
    pub slide_means: Vec<SlideMean>,
    pub counts_by_major: BTreeMap<Major, usize>,
    pub counts_by_grade: BTreeMap<Grade, usize>,
    pub grade_vs_study: Vec<[f64; 2]>,
}

impl Summary {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        Summary {
            record_count: view.len(),
            kpis: kpis(view),
            slide_time_by_grade: slide_time_by_grade(view),
            slide_means: slide_means(view),
            counts_by_major: counts_by_major(view),
            counts_by_grade: counts_by_grade(view),
            grade_vs_study: grade_vs_study(view),
        }
    }
}
