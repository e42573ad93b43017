use std::collections::HashMap;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::calc::{self, AttendanceStatus};
use crate::store::{
    Announcement, AttendanceSession, Book, Course, EnrolledStudent, ScoreSheet, Semester,
    StaffProfile, Store, StudentProfile, TimetableEntry, UserAccount,
};

/// Mock dataset compiled into the binary. There is no durable storage;
/// every run starts from this snapshot.
const SEED_JSON: &str = include_str!("../fixtures/seed.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    semester: Semester,
    student: StudentProfile,
    staff: StaffProfile,
    courses: Vec<Course>,
    roster: Vec<EnrolledStudent>,
    timetable: Vec<TimetableEntry>,
    announcements: Vec<Announcement>,
    books: Vec<Book>,
    users: Vec<UserAccount>,
    sheets: Vec<ScoreSheet>,
    sessions: Vec<SeedSession>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedSession {
    id: String,
    course_id: String,
    date: String,
    saved: bool,
    records: Vec<SeedMark>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedMark {
    student_id: String,
    status: AttendanceStatus,
}

pub fn seed_store() -> anyhow::Result<Store> {
    let seed: SeedFile =
        serde_json::from_str(SEED_JSON).context("parse embedded seed fixture")?;

    for entry in &seed.timetable {
        if !seed.courses.iter().any(|c| c.id == entry.course_id) {
            bail!("timetable entry {} references unknown course", entry.id);
        }
    }

    let mut sheets = HashMap::new();
    for mut sheet in seed.sheets {
        if !seed.courses.iter().any(|c| c.id == sheet.course_id) {
            bail!("score sheet references unknown course {}", sheet.course_id);
        }
        for score in &mut sheet.scores {
            if !seed.roster.iter().any(|s| s.id == score.student_id) {
                bail!(
                    "score sheet {} references unknown student {}",
                    sheet.course_id,
                    score.student_id
                );
            }
            // Seed values obey the same entry clamps the UI applies.
            score.continuous_assessment = calc::clamp_ca(score.continuous_assessment);
            score.exam_score = calc::clamp_exam(score.exam_score);
        }
        sheets.insert(sheet.course_id.clone(), sheet);
    }

    let mut sessions = Vec::new();
    for s in seed.sessions {
        if !seed.courses.iter().any(|c| c.id == s.course_id) {
            bail!("attendance session {} references unknown course", s.id);
        }
        let date = NaiveDate::parse_from_str(&s.date, "%Y-%m-%d")
            .with_context(|| format!("attendance session {} has a bad date", s.id))?;
        let marks = s
            .records
            .into_iter()
            .map(|m| (m.student_id, m.status))
            .collect();
        sessions.push(AttendanceSession {
            id: s.id,
            course_id: s.course_id,
            date,
            marks,
            saved: s.saved,
        });
    }

    Ok(Store {
        semester: seed.semester,
        student: seed.student,
        staff: seed.staff,
        courses: seed.courses,
        roster: seed.roster,
        timetable: seed.timetable,
        announcements: seed.announcements,
        books: seed.books,
        users: seed.users,
        sheets,
        sessions,
        cart: Vec::new(),
    })
}
