use std::collections::BTreeSet;

use super::model::{Dataset, Grade, Major, Record, Semester};

// ---------------------------------------------------------------------------
// Selection: which category values are ticked per dimension
// ---------------------------------------------------------------------------

/// The three multi-select controls. An empty set selects nothing; there is no
/// implicit "all" fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub semesters: BTreeSet<Semester>,
    pub majors: BTreeSet<Major>,
    pub grades: BTreeSet<Grade>,
}

impl Default for Selection {
    /// Everything selected, matching the controls' initial state.
    fn default() -> Self {
        Self::all()
    }
}

impl Selection {
    pub fn all() -> Self {
        Self {
            semesters: Semester::ALL.iter().copied().collect(),
            majors: Major::ALL.iter().copied().collect(),
            grades: Grade::ALL.iter().copied().collect(),
        }
    }

    /// Whether a record passes all three membership tests.
    pub fn matches(&self, record: &Record) -> bool {
        self.semesters.contains(&record.semester)
            && self.majors.contains(&record.major)
            && self.grades.contains(&record.grade)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of the dataset
// ---------------------------------------------------------------------------

/// Records of a dataset that pass a [`Selection`], in source order.
///
/// Holds indices only; records stay owned by the dataset.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, selection: &Selection) -> Self {
        Self {
            dataset,
            indices: filtered_indices(dataset, selection),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return indices of records that pass the selection, preserving order.
pub fn filtered_indices(dataset: &Dataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(semester: Semester, major: Major, grade: Grade) -> Record {
        Record {
            semester,
            major,
            grade,
            grade_percent: Some(80.0),
            study_hours: Some(2.0),
            avg_slide_minutes: Some(1.0),
            slide_minutes: Vec::new(),
        }
    }

    fn mixed_dataset() -> Dataset {
        use Grade::*;
        Dataset::new(
            vec![
                record(Semester::Fall, Major::Cps, A),
                record(Semester::Spring, Major::It, B),
                record(Semester::Summer, Major::Cps, C),
                record(Semester::Fall, Major::It, F),
                record(Semester::Spring, Major::Cps, A),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = mixed_dataset();
        let view = FilteredView::new(&ds, &Selection::all());
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn keeps_exactly_the_matching_records_in_order() {
        let ds = mixed_dataset();
        let selection = Selection {
            semesters: [Semester::Fall, Semester::Spring].into(),
            majors: [Major::Cps].into(),
            grades: [Grade::A, Grade::C].into(),
        };

        let view = FilteredView::new(&ds, &selection);

        assert_eq!(view.indices(), &[0, 4]);
        for (i, record) in ds.records.iter().enumerate() {
            assert_eq!(view.indices().contains(&i), selection.matches(record));
        }
    }

    #[test]
    fn empty_dimension_selects_nothing() {
        let ds = mixed_dataset();
        for clear in 0..3 {
            let mut selection = Selection::all();
            match clear {
                0 => selection.semesters.clear(),
                1 => selection.majors.clear(),
                _ => selection.grades.clear(),
            }
            assert!(FilteredView::new(&ds, &selection).is_empty());
        }
    }

    #[test]
    fn value_absent_from_data_gives_empty_view() {
        let ds = mixed_dataset();
        let selection = Selection {
            majors: [Major::Other].into(),
            ..Selection::all()
        };
        let view = FilteredView::new(&ds, &selection);
        assert_eq!(view.len(), 0);
        assert_eq!(view.records().count(), 0);
    }
}
