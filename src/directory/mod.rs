use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FlowError;
use crate::materials::filter::MaterialFilter;
use crate::models::{FileRef, Material, MaterialType, Subject, User, UserRole};

pub mod mock;
pub mod seed;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub college_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaterial {
    pub title: String,
    pub description: String,
    pub subject_id: String,
    pub material_type: MaterialType,
    pub file: FileRef,
    pub uploader_id: Uuid,
    pub uploaded_by: String,
}

/// Acknowledgement for an accepted rating, carrying the recomputed
/// aggregate so screens can refresh their read model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingAck {
    pub material_id: Uuid,
    pub value: u8,
    pub average: f32,
    pub total: u32,
}

/// The data-source collaborator. Every call is possibly latent and may be
/// rejected; callers treat any rejection as a recoverable failure and leave
/// their own state untouched until a call resolves.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn check_account_exists(&self, email: &str) -> Result<bool, FlowError>;
    async fn create_account(&self, account: NewAccount) -> Result<User, FlowError>;
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, FlowError>;
    /// Remote leg of the college-id check. Input presence is validated by
    /// the caller before this is reached.
    async fn verify_college_id(&self, college_id: &str) -> Result<(), FlowError>;
    async fn subjects(&self) -> Result<Vec<Subject>, FlowError>;
    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>, FlowError>;
    async fn materials_by(&self, uploader_id: Uuid) -> Result<Vec<Material>, FlowError>;
    async fn upload_material(&self, material: NewMaterial) -> Result<Material, FlowError>;
    async fn submit_rating(
        &self,
        material_id: Uuid,
        user_id: Uuid,
        value: u8,
    ) -> Result<RatingAck, FlowError>;
    async fn record_download(&self, material_id: Uuid) -> Result<Material, FlowError>;
}
