use std::sync::Arc;

use log::info;

use crate::directory::Directory;
use crate::errors::FlowError;
use crate::models::{FileRef, UserRole};

/// Maps a college id to a role. Injected so the placeholder prefix rule can
/// be swapped for a real verification backend without touching the flow.
pub type RoleClassifier = Box<dyn Fn(&str) -> UserRole + Send + Sync>;

/// Placeholder policy: ids starting with "CS2" belong to seniors, everything
/// else to juniors.
pub fn prefix_classifier() -> RoleClassifier {
    Box::new(|college_id| {
        if college_id.starts_with("CS2") {
            UserRole::Senior
        } else {
            UserRole::Junior
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub college_id: String,
    pub role: UserRole,
}

/// The college-id step of signup: checks the submitted id and card scan
/// locally, runs the (simulated) remote check, and classifies the role.
pub struct IdVerifier {
    directory: Arc<dyn Directory>,
    classifier: RoleClassifier,
}

impl IdVerifier {
    pub fn new(directory: Arc<dyn Directory>, classifier: RoleClassifier) -> Self {
        IdVerifier {
            directory,
            classifier,
        }
    }

    pub async fn verify(
        &self,
        college_id: &str,
        id_image: Option<&FileRef>,
    ) -> Result<Verification, FlowError> {
        if college_id.is_empty() || id_image.is_none() {
            return Err(FlowError::validation(
                "Please provide both your College ID number and an image of your ID card",
            ));
        }
        self.directory.verify_college_id(college_id).await?;
        let role = (self.classifier)(college_id);
        info!("college id verified, classified as {role}");
        Ok(Verification {
            college_id: college_id.to_string(),
            role,
        })
    }
}
