use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Seniority classification derived from a verified college id. Steers the
/// default landing page after signup; it is not an authorization boundary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Junior,
    Senior,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Junior => write!(f, "junior"),
            UserRole::Senior => write!(f, "senior"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "junior" => Ok(UserRole::Junior),
            "senior" => Ok(UserRole::Senior),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Notes,
    Paper,
    Book,
    Assignment,
    Other,
}

impl MaterialType {
    pub fn label(&self) -> &'static str {
        match self {
            MaterialType::Notes => "Lecture Notes",
            MaterialType::Paper => "Previous Year Papers",
            MaterialType::Book => "Textbooks/References",
            MaterialType::Assignment => "Assignments",
            MaterialType::Other => "Other Materials",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MaterialType::Notes => "notes",
            MaterialType::Paper => "paper",
            MaterialType::Book => "book",
            MaterialType::Assignment => "assignment",
            MaterialType::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notes" => Ok(MaterialType::Notes),
            "paper" => Ok(MaterialType::Paper),
            "book" => Ok(MaterialType::Book),
            "assignment" => Ok(MaterialType::Assignment),
            "other" => Ok(MaterialType::Other),
            other => Err(format!("unknown material type: {other}")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub college_id: Option<String>,
    pub verified: bool,
    pub rating: Option<f32>,
    pub total_ratings: Option<u32>,
}

/// Static catalog entry. Semesters run 1-8 by convention; the value is not
/// validated anywhere.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub semester: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Material {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject_id: String,
    pub subject: Subject,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub uploaded_by: String,
    pub uploader_id: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
    pub downloads: u32,
    pub size: u64,
    pub rating: Option<f32>,
    pub total_ratings: Option<u32>,
    /// The calling user's own rating, when known. Listings leave this unset;
    /// the rating control tracks it per screen.
    pub user_rating: Option<u8>,
}

/// One rating per (user, material) pair; resubmitting overwrites the
/// previous value.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Rating {
    pub id: Uuid,
    pub material_id: Uuid,
    pub user_id: Uuid,
    pub value: u8,
    pub created_at: DateTime<Utc>,
}

/// Reference to a file attached to a form (material upload, id card scan).
/// Only metadata travels through the core; bytes stay with the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub size: u64,
    pub digest: String,
}

impl FileRef {
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        FileRef {
            name: name.to_string(),
            size: bytes.len() as u64,
            digest: format!("{:x}", hasher.finalize()),
        }
    }
}
