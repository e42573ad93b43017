use serde::{Deserialize, Serialize};
use std::fmt;

pub const CA_MAX: f64 = 30.0;
pub const EXAM_MAX: f64 = 70.0;

/// Letter grades on the 5-point scale, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

pub const GRADE_ORDER: [Grade; 6] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E, Grade::F];

impl Grade {
    pub fn point(self) -> f64 {
        match self {
            Grade::A => 5.0,
            Grade::B => 4.0,
            Grade::C => 3.0,
            Grade::D => 2.0,
            Grade::E => 1.0,
            Grade::F => 0.0,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Band thresholds are inclusive lower bounds: 70=A, 60=B, 50=C, 45=D, 40=E.
pub fn grade_for(total: f64) -> Grade {
    if total >= 70.0 {
        Grade::A
    } else if total >= 60.0 {
        Grade::B
    } else if total >= 50.0 {
        Grade::C
    } else if total >= 45.0 {
        Grade::D
    } else if total >= 40.0 {
        Grade::E
    } else {
        Grade::F
    }
}

pub fn clamp_ca(value: f64) -> f64 {
    value.clamp(0.0, CA_MAX)
}

pub fn clamp_exam(value: f64) -> f64 {
    value.clamp(0.0, EXAM_MAX)
}

/// Two-decimal rounding for GPA display (`4.3333.. -> 4.33`).
pub fn round_2dp(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// One derived grade row. Computed on demand from the stored score
/// components; never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub course_id: String,
    pub course_code: String,
    pub course_title: String,
    pub continuous_assessment: f64,
    pub exam_score: f64,
    pub total_score: f64,
    pub grade: Grade,
    pub grade_point: f64,
    pub credit_units: u32,
}

impl GradeRecord {
    pub fn derive(
        course_id: &str,
        course_code: &str,
        course_title: &str,
        ca: f64,
        exam: f64,
        credit_units: u32,
    ) -> Self {
        let total = ca + exam;
        let grade = grade_for(total);
        GradeRecord {
            course_id: course_id.to_string(),
            course_code: course_code.to_string(),
            course_title: course_title.to_string(),
            continuous_assessment: ca,
            exam_score: exam,
            total_score: total,
            grade,
            grade_point: grade.point(),
            credit_units,
        }
    }
}

/// Credit-weighted GPA. `None` when the records carry no credit units at
/// all (empty input included); callers surface that as "no grades yet"
/// rather than a number.
pub fn gpa(records: &[GradeRecord]) -> Option<f64> {
    let mut weighted = 0.0_f64;
    let mut credits = 0_u32;
    for r in records {
        weighted += r.grade_point * f64::from(r.credit_units);
        credits += r.credit_units;
    }
    if credits == 0 {
        None
    } else {
        Some(weighted / f64::from(credits))
    }
}

pub fn total_credits(records: &[GradeRecord]) -> u32 {
    records.iter().map(|r| r.credit_units).sum()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBandCount {
    pub grade: Grade,
    pub count: usize,
}

/// Per-letter counts in band order, empty bands skipped.
pub fn grade_distribution(records: &[GradeRecord]) -> Vec<GradeBandCount> {
    GRADE_ORDER
        .iter()
        .filter_map(|&g| {
            let count = records.iter().filter(|r| r.grade == g).count();
            if count > 0 {
                Some(GradeBandCount { grade: g, count })
            } else {
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Unmarked,
    Present,
    Absent,
    Late,
}

/// Tap cycle: unmarked -> present -> absent -> present -> ...
/// `Unmarked` is one-way; a fresh session is the only path back. `Late`
/// only appears in seeded data and joins the loop at `Present`.
pub fn advance(current: AttendanceStatus) -> AttendanceStatus {
    match current {
        AttendanceStatus::Unmarked => AttendanceStatus::Present,
        AttendanceStatus::Present => AttendanceStatus::Absent,
        AttendanceStatus::Absent => AttendanceStatus::Present,
        AttendanceStatus::Late => AttendanceStatus::Present,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub present_count: usize,
    pub absent_count: usize,
    pub total_marked: usize,
}

/// Single pass over the marks. Late and unmarked entries stay out of
/// `total_marked`; the save gate keys off marked rows only.
pub fn summarize<I>(marks: I) -> AttendanceSummary
where
    I: IntoIterator<Item = AttendanceStatus>,
{
    let mut present_count = 0_usize;
    let mut absent_count = 0_usize;
    for m in marks {
        match m {
            AttendanceStatus::Present => present_count += 1,
            AttendanceStatus::Absent => absent_count += 1,
            AttendanceStatus::Unmarked | AttendanceStatus::Late => {}
        }
    }
    AttendanceSummary {
        present_count,
        absent_count,
        total_marked: present_count + absent_count,
    }
}
