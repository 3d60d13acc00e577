use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// Raised when a cell does not name one of the fixed category values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

/// Declares a closed set of category values with their spreadsheet spellings.
///
/// Declaration order is the sort order, which is also the order groups come
/// out of the aggregation layer.
macro_rules! category {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownCategory(other.to_string())),
                }
            }
        }
    };
}

category! {
    /// Academic term the record was collected in.
    Semester { Fall => "Fall", Spring => "Spring", Summer => "Summer" }
}

category! {
    /// Student's major.
    Major { Cps => "CPS", It => "IT", Other => "Other" }
}

category! {
    /// Letter grade.
    Grade { A => "A", B => "B", C => "C", D => "D", F => "F" }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_SEMESTER: &str = "Semester";
pub const COL_MAJOR: &str = "Major";
pub const COL_GRADE: &str = "Grade";
pub const COL_GRADE_PERCENT: &str = "Grade (Percentage)";
pub const COL_STUDY_HOURS: &str = "Study Time Avg (Hrs)";
pub const COL_AVG_SLIDE_MINUTES: &str = "Avg Time Spent Per Slide (Mins)";

/// Substring that marks a per-slide viewing time column.
pub const SLIDE_MARKER: &str = "Slide #";

// ---------------------------------------------------------------------------
// Record – one row of the sheet
// ---------------------------------------------------------------------------

/// One student/session row. Numeric fields are `None` where the cell was blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub semester: Semester,
    pub major: Major,
    pub grade: Grade,
    pub grade_percent: Option<f64>,
    pub study_hours: Option<f64>,
    pub avg_slide_minutes: Option<f64>,
    /// One entry per [`Dataset::slide_columns`], same order.
    pub slide_minutes: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table plus the slide column names found by the header scan.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Names of the "Slide #" columns, in the order they were laid out.
    pub slide_columns: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>, slide_columns: Vec<String>) -> Self {
        Dataset {
            records,
            slide_columns,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reorder slide columns by the number after `Slide #`, carrying the
    /// per-record values along. Columns without a parsable number keep their
    /// relative order after the numbered ones.
    pub fn sort_slides_numerically(&mut self) {
        let mut order: Vec<usize> = (0..self.slide_columns.len()).collect();
        order.sort_by_key(|&i| slide_number(&self.slide_columns[i]).unwrap_or(u32::MAX));

        self.slide_columns = order.iter().map(|&i| self.slide_columns[i].clone()).collect();
        for record in &mut self.records {
            record.slide_minutes = order.iter().map(|&i| record.slide_minutes[i]).collect();
        }
    }
}

/// Parse the slide index out of a header like `Slide #12 (Mins)`.
pub fn slide_number(column: &str) -> Option<u32> {
    let (_, rest) = column.split_once(SLIDE_MARKER)?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
