use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calc::{AttendanceStatus, GradeRecord};
use crate::cart::CartLine;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: String,
    pub name: String,
    pub year: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub matric_number: String,
    pub department: String,
    pub faculty: String,
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub staff_id: String,
    pub department: String,
    pub faculty: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Pdf,
    Video,
    Link,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMaterial {
    pub id: String,
    pub title: String,
    pub kind: MaterialKind,
    pub url: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub code: String,
    pub title: String,
    pub description: String,
    pub lecturer: String,
    pub lecturer_email: String,
    pub credit_units: u32,
    pub semester: String,
    #[serde(default)]
    pub materials: Vec<CourseMaterial>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: String,
    pub course_id: String,
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    Admin,
    Lecturer,
    Department,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_role: AuthorRole,
    /// "all" or a course id.
    pub target: String,
    pub is_important: bool,
    pub status: PublishStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogFormat {
    #[serde(rename = "PDF")]
    Pdf,
    Physical,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Whole naira.
    pub price: i64,
    pub format: CatalogFormat,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub course_id: Option<String>,
    pub isbn: String,
    pub in_stock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub matric_number: String,
    pub level: String,
    pub department: String,
}

impl EnrolledStudent {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub student_id: String,
    pub continuous_assessment: f64,
    pub exam_score: f64,
}

/// Per-course results sheet: one score row per roster member plus the
/// draft/published flag. Grade rows are derived on read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSheet {
    pub course_id: String,
    pub status: PublishStatus,
    pub scores: Vec<ScoreRecord>,
}

impl ScoreSheet {
    pub fn score_for(&self, student_id: &str) -> Option<&ScoreRecord> {
        self.scores.iter().find(|s| s.student_id == student_id)
    }

    pub fn score_for_mut(&mut self, student_id: &str) -> Option<&mut ScoreRecord> {
        self.scores.iter_mut().find(|s| s.student_id == student_id)
    }
}

/// One attendance-taking instance: a (course, date) pair with a status
/// mark per roster member.
#[derive(Debug, Clone)]
pub struct AttendanceSession {
    pub id: String,
    pub course_id: String,
    pub date: NaiveDate,
    pub marks: HashMap<String, AttendanceStatus>,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

/// The whole portal dataset, seeded once at startup. Nothing here ever
/// touches disk.
#[derive(Debug)]
pub struct Store {
    pub semester: Semester,
    pub student: StudentProfile,
    pub staff: StaffProfile,
    pub courses: Vec<Course>,
    pub roster: Vec<EnrolledStudent>,
    pub timetable: Vec<TimetableEntry>,
    pub announcements: Vec<Announcement>,
    pub books: Vec<Book>,
    pub users: Vec<UserAccount>,
    pub sheets: HashMap<String, ScoreSheet>,
    pub sessions: Vec<AttendanceSession>,
    pub cart: Vec<CartLine>,
}

impl Store {
    pub fn course_by_id(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn book_by_id(&self, book_id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == book_id)
    }

    pub fn roster_member(&self, student_id: &str) -> Option<&EnrolledStudent> {
        self.roster.iter().find(|s| s.id == student_id)
    }

    /// Get-or-create the results sheet for a course. Fresh sheets start
    /// as drafts with a zeroed row per roster member, matching how the
    /// results grid opens.
    pub fn sheet_mut(&mut self, course_id: &str) -> &mut ScoreSheet {
        let roster = &self.roster;
        self.sheets
            .entry(course_id.to_string())
            .or_insert_with(|| ScoreSheet {
                course_id: course_id.to_string(),
                status: PublishStatus::Draft,
                scores: roster
                    .iter()
                    .map(|s| ScoreRecord {
                        student_id: s.id.clone(),
                        continuous_assessment: 0.0,
                        exam_score: 0.0,
                    })
                    .collect(),
            })
    }

    /// Get-or-create the session for a (course, date). A fresh session
    /// marks every roster member unmarked.
    pub fn session_mut(&mut self, course_id: &str, date: NaiveDate) -> &mut AttendanceSession {
        let idx = self
            .sessions
            .iter()
            .position(|s| s.course_id == course_id && s.date == date);
        let idx = match idx {
            Some(i) => i,
            None => {
                let marks = self
                    .roster
                    .iter()
                    .map(|s| (s.id.clone(), AttendanceStatus::Unmarked))
                    .collect();
                self.sessions.push(AttendanceSession {
                    id: Uuid::new_v4().to_string(),
                    course_id: course_id.to_string(),
                    date,
                    marks,
                    saved: false,
                });
                self.sessions.len() - 1
            }
        };
        &mut self.sessions[idx]
    }

    /// Derived grade rows for the signed-in student, published sheets
    /// only, ordered by course code.
    pub fn student_grade_records(&self) -> Vec<GradeRecord> {
        let mut records: Vec<GradeRecord> = Vec::new();
        for course in &self.courses {
            let Some(sheet) = self.sheets.get(&course.id) else {
                continue;
            };
            if sheet.status != PublishStatus::Published {
                continue;
            }
            let Some(score) = sheet.score_for(&self.student.id) else {
                continue;
            };
            records.push(GradeRecord::derive(
                &course.id,
                &course.code,
                &course.title,
                score.continuous_assessment,
                score.exam_score,
                course.credit_units,
            ));
        }
        records.sort_by(|a, b| a.course_code.cmp(&b.course_code));
        records
    }

    /// Distinct book departments in catalog order, for the filter UI.
    pub fn book_departments(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for b in &self.books {
            if let Some(dept) = &b.department {
                if !seen.iter().any(|d| d == dept) {
                    seen.push(dept.clone());
                }
            }
        }
        seen
    }

    /// Drop a course and everything hanging off it: timetable entries,
    /// its results sheet, and its attendance sessions.
    pub fn remove_course(&mut self, course_id: &str) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| c.id != course_id);
        if self.courses.len() == before {
            return false;
        }
        self.timetable.retain(|t| t.course_id != course_id);
        self.sheets.remove(course_id);
        self.sessions.retain(|s| s.course_id != course_id);
        true
    }
}
