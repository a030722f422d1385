//! Seed tables for the mock directory: the subject catalog plus the
//! materials and the one verified account the demo starts with.

use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use uuid::Uuid;

use crate::models::{Material, MaterialType, Subject, User, UserRole};

lazy_static! {
    pub static ref SUBJECTS: Vec<Subject> = vec![
        subject("cs101", "Introduction to Programming", "CS101", 1),
        subject("cs201", "Data Structures", "CS201", 3),
        subject("cs301", "Algorithms", "CS301", 5),
        subject("cs401", "Operating Systems", "CS401", 6),
        subject("cs501", "Database Systems", "CS501", 7),
    ];
}

fn subject(id: &str, name: &str, code: &str, semester: u8) -> Subject {
    Subject {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        semester,
    }
}

pub fn subject_by_id(id: &str) -> Option<Subject> {
    SUBJECTS.iter().find(|s| s.id == id).cloned()
}

/// Password accepted for the seeded account. Plain text by design: there is
/// no credential security model in this demo.
pub const SEED_PASSWORD: &str = "Campus@2024";

pub fn seed_user() -> User {
    User {
        id: Uuid::new_v4(),
        name: "Jane Smith".to_string(),
        email: "jane.smith@academix.edu".to_string(),
        role: UserRole::Senior,
        college_id: Some("CS202456".to_string()),
        verified: true,
        rating: Some(4.8),
        total_ratings: Some(45),
    }
}

pub fn seed_materials() -> Vec<Material> {
    vec![
        material(
            "Data Structures Comprehensive Notes",
            "Complete semester notes covering arrays, linked lists, trees, and graphs with examples and diagrams.",
            "cs201",
            MaterialType::Notes,
            "/files/ds-notes.pdf",
            "prof.sharma",
            (2023, 10, 15),
            145,
            3_355_443,
            Some((4.9, 28)),
        ),
        material(
            "Algorithms Previous Year Question Paper 2023",
            "Mid-semester and end-semester question papers from 2023 with solution hints.",
            "cs301",
            MaterialType::Paper,
            "/files/algo-paper-2023.pdf",
            "rahul.verma",
            (2023, 12, 5),
            98,
            1_887_436,
            Some((4.7, 17)),
        ),
        material(
            "Operating Systems Reference Book",
            "Digital copy of recommended OS textbook with highlighted important sections.",
            "cs401",
            MaterialType::Book,
            "/files/os-reference.pdf",
            "prof.singh",
            (2023, 9, 20),
            210,
            13_002_342,
            Some((4.6, 32)),
        ),
        material(
            "Database Systems Assignment Examples",
            "Sample SQL queries and database design assignments with solutions.",
            "cs501",
            MaterialType::Assignment,
            "/files/db-assignments.pdf",
            "neha.gupta",
            (2023, 11, 12),
            78,
            972_800,
            None,
        ),
        material(
            "Introduction to Programming Lab Manual",
            "Practical exercises and code examples for first-year programming course.",
            "cs101",
            MaterialType::Notes,
            "/files/intro-lab-manual.pdf",
            "prof.kumar",
            (2023, 8, 28),
            187,
            2_831_155,
            None,
        ),
        material(
            "Algorithms Cheat Sheet",
            "One-page summary of key algorithms and time complexities for quick revision.",
            "cs301",
            MaterialType::Notes,
            "/files/algo-cheat-sheet.pdf",
            "amit.sharma",
            (2023, 12, 2),
            132,
            460_800,
            None,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn material(
    title: &str,
    description: &str,
    subject_id: &str,
    material_type: MaterialType,
    file_url: &str,
    uploaded_by: &str,
    (year, month, day): (i32, u32, u32),
    downloads: u32,
    size: u64,
    aggregate: Option<(f32, u32)>,
) -> Material {
    let subject = subject_by_id(subject_id).expect("seed subject in catalog");
    Material {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        subject_id: subject_id.to_string(),
        subject,
        material_type,
        file_url: file_url.to_string(),
        thumbnail_url: None,
        uploaded_by: uploaded_by.to_string(),
        uploader_id: None,
        uploaded_at: Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("seed date"),
        downloads,
        size,
        rating: aggregate.map(|(avg, _)| avg),
        total_ratings: aggregate.map(|(_, n)| n),
        user_rating: None,
    }
}
