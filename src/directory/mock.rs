//! In-memory directory with simulated call latency. Stands in for the real
//! backend: data lives for the lifetime of the process and every call sleeps
//! the delay the hosted app would spend on the wire.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use metrics::counter;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use uuid::Uuid;

use crate::directory::seed;
use crate::directory::{Directory, NewAccount, NewMaterial, RatingAck};
use crate::errors::FlowError;
use crate::materials::filter::{self, MaterialFilter};
use crate::models::{Material, Rating, Subject, User};

/// Per-operation simulated delays, matching what the hosted front end used
/// for each of its fake network calls.
#[derive(Debug, Clone)]
pub struct Latency {
    pub verification: Duration,
    pub auth: Duration,
    pub upload: Duration,
    pub rating: Duration,
    pub listing: Duration,
}

impl Latency {
    pub fn scaled(scale: f32) -> Self {
        let ms = |base: u64| Duration::from_millis((base as f32 * scale) as u64);
        Latency {
            verification: ms(2000),
            auth: ms(1500),
            upload: ms(2000),
            rating: ms(800),
            listing: ms(800),
        }
    }

    pub fn none() -> Self {
        Latency::scaled(0.0)
    }
}

struct Tables {
    users: Vec<User>,
    // email -> password, plain text: mock credentials only
    credentials: HashMap<String, String>,
    materials: Vec<Material>,
    ratings: Vec<Rating>,
}

pub struct MockDirectory {
    tables: RwLock<Tables>,
    latency: Latency,
    fail_rate: f32,
    fail_next: AtomicBool,
}

impl MockDirectory {
    pub fn new(latency: Latency, fail_rate: f32) -> Self {
        let user = seed::seed_user();
        let mut credentials = HashMap::new();
        credentials.insert(user.email.to_lowercase(), seed::SEED_PASSWORD.to_string());
        MockDirectory {
            tables: RwLock::new(Tables {
                users: vec![user],
                credentials,
                materials: seed::seed_materials(),
                ratings: Vec::new(),
            }),
            latency,
            fail_rate,
            fail_next: AtomicBool::new(false),
        }
    }

    /// Zero-latency directory for tests.
    pub fn instant() -> Self {
        MockDirectory::new(Latency::none(), 0.0)
    }

    /// Force the next simulated call to fail with a `Remote` error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    async fn simulate(&self, delay: Duration) -> Result<(), FlowError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FlowError::remote("simulated outage"));
        }
        if self.fail_rate > 0.0 && rand::thread_rng().gen::<f32>() < self.fail_rate {
            return Err(FlowError::remote("simulated outage"));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().expect("directory tables poisoned")
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn check_account_exists(&self, email: &str) -> Result<bool, FlowError> {
        self.simulate(self.latency.auth).await?;
        let tables = self.lock();
        let exists = tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email));
        debug!("account check for {email}: exists={exists}");
        Ok(exists)
    }

    async fn create_account(&self, account: NewAccount) -> Result<User, FlowError> {
        self.simulate(self.latency.auth).await?;
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(FlowError::Conflict(format!(
                "an account with {} already exists",
                account.email
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: account.name,
            email: account.email,
            role: account.role,
            verified: account.college_id.is_some(),
            college_id: account.college_id,
            rating: None,
            total_ratings: None,
        };
        tables
            .credentials
            .insert(user.email.to_lowercase(), account.password);
        tables.users.push(user.clone());
        counter!("academix_account_creations_total").increment(1);
        info!("account created for {} ({})", user.email, user.role);
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, FlowError> {
        self.simulate(self.latency.auth).await?;
        let tables = self.lock();
        let user = tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| FlowError::remote("no account matches that email"))?;
        match tables.credentials.get(&user.email.to_lowercase()) {
            Some(stored) if stored == password => Ok(user.clone()),
            _ => Err(FlowError::remote("invalid credentials")),
        }
    }

    async fn verify_college_id(&self, college_id: &str) -> Result<(), FlowError> {
        self.simulate(self.latency.verification).await?;
        // The placeholder check accepts every submitted id.
        debug!("college id {college_id} accepted");
        Ok(())
    }

    async fn subjects(&self) -> Result<Vec<Subject>, FlowError> {
        Ok(seed::SUBJECTS.clone())
    }

    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>, FlowError> {
        self.simulate(self.latency.listing).await?;
        let tables = self.lock();
        Ok(filter::apply(&tables.materials, filter))
    }

    async fn materials_by(&self, uploader_id: Uuid) -> Result<Vec<Material>, FlowError> {
        self.simulate(self.latency.listing).await?;
        let tables = self.lock();
        Ok(tables
            .materials
            .iter()
            .filter(|m| m.uploader_id == Some(uploader_id))
            .cloned()
            .collect())
    }

    async fn upload_material(&self, material: NewMaterial) -> Result<Material, FlowError> {
        self.simulate(self.latency.upload).await?;
        let subject = seed::subject_by_id(&material.subject_id).ok_or_else(|| {
            FlowError::validation(format!("unknown subject: {}", material.subject_id))
        })?;
        let extension = material
            .file
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_else(|| "bin".to_string());
        let record = Material {
            id: Uuid::new_v4(),
            title: material.title,
            description: material.description,
            subject_id: material.subject_id,
            subject,
            material_type: material.material_type,
            file_url: format!("/files/{}.{extension}", &material.file.digest[..16]),
            thumbnail_url: None,
            uploaded_by: material.uploaded_by,
            uploader_id: Some(material.uploader_id),
            uploaded_at: Utc::now(),
            downloads: 0,
            size: material.file.size,
            rating: None,
            total_ratings: None,
            user_rating: None,
        };
        let mut tables = self.lock();
        tables.materials.push(record.clone());
        counter!("academix_uploads_total").increment(1);
        info!("material uploaded: {} ({})", record.title, record.id);
        Ok(record)
    }

    async fn submit_rating(
        &self,
        material_id: Uuid,
        user_id: Uuid,
        value: u8,
    ) -> Result<RatingAck, FlowError> {
        self.simulate(self.latency.rating).await?;
        let mut tables = self.lock();
        let index = tables
            .materials
            .iter()
            .position(|m| m.id == material_id)
            .ok_or_else(|| FlowError::remote("no such material"))?;

        let previous = tables
            .ratings
            .iter_mut()
            .find(|r| r.material_id == material_id && r.user_id == user_id)
            .map(|row| {
                let old = row.value;
                row.value = value;
                old
            });
        if previous.is_none() {
            tables.ratings.push(Rating {
                id: Uuid::new_v4(),
                material_id,
                user_id,
                value,
                created_at: Utc::now(),
            });
        }

        let material = &mut tables.materials[index];

        // Fold the submission into the running aggregate: resubmission swaps
        // the old value out, a first rating grows the count.
        let total = material.total_ratings.unwrap_or(0);
        let sum = material.rating.unwrap_or(0.0) * total as f32;
        let (sum, total) = match previous {
            Some(old) if total > 0 => (sum - old as f32 + value as f32, total),
            _ => (sum + value as f32, total + 1),
        };
        material.rating = Some(sum / total as f32);
        material.total_ratings = Some(total);

        counter!("academix_ratings_total").increment(1);
        Ok(RatingAck {
            material_id,
            value,
            average: sum / total as f32,
            total,
        })
    }

    async fn record_download(&self, material_id: Uuid) -> Result<Material, FlowError> {
        self.simulate(Duration::ZERO).await?;
        let mut tables = self.lock();
        let material = tables
            .materials
            .iter_mut()
            .find(|m| m.id == material_id)
            .ok_or_else(|| FlowError::remote("no such material"))?;
        material.downloads += 1;
        counter!("academix_downloads_total").increment(1);
        Ok(material.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaterialType;

    fn find_by_title(materials: &[Material], title: &str) -> Material {
        materials
            .iter()
            .find(|m| m.title == title)
            .cloned()
            .expect("seeded material")
    }

    #[tokio::test]
    async fn download_increments_counter_by_one() {
        let dir = MockDirectory::instant();
        let listed = dir.list_materials(&MaterialFilter::default()).await.unwrap();
        let before = find_by_title(&listed, "Algorithms Cheat Sheet");

        let after = dir.record_download(before.id).await.unwrap();
        assert_eq!(after.downloads, before.downloads + 1);
    }

    #[tokio::test]
    async fn rating_resubmission_overwrites_without_growing_count() {
        let dir = MockDirectory::instant();
        let listed = dir.list_materials(&MaterialFilter::default()).await.unwrap();
        // Starts with no aggregate at all.
        let target = find_by_title(&listed, "Algorithms Cheat Sheet");
        let rater = Uuid::new_v4();

        let first = dir.submit_rating(target.id, rater, 2).await.unwrap();
        assert_eq!(first.total, 1);
        assert!((first.average - 2.0).abs() < f32::EPSILON);

        let second = dir.submit_rating(target.id, rater, 5).await.unwrap();
        assert_eq!(second.total, 1);
        assert!((second.average - 5.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn rating_folds_into_seeded_aggregate() {
        let dir = MockDirectory::instant();
        let listed = dir.list_materials(&MaterialFilter::default()).await.unwrap();
        // Seeded with average 4.9 over 28 ratings.
        let target = find_by_title(&listed, "Data Structures Comprehensive Notes");

        let ack = dir.submit_rating(target.id, Uuid::new_v4(), 3).await.unwrap();
        assert_eq!(ack.total, 29);
        let expected = (4.9_f32 * 28.0 + 3.0) / 29.0;
        assert!((ack.average - expected).abs() < 1e-4);
    }

    #[tokio::test]
    async fn failed_rating_leaves_aggregate_untouched() {
        let dir = MockDirectory::instant();
        let listed = dir.list_materials(&MaterialFilter::default()).await.unwrap();
        let target = find_by_title(&listed, "Algorithms Cheat Sheet");

        dir.fail_next();
        let err = dir
            .submit_rating(target.id, Uuid::new_v4(), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Remote(_)));

        let listed = dir.list_materials(&MaterialFilter::default()).await.unwrap();
        let after = find_by_title(&listed, "Algorithms Cheat Sheet");
        assert_eq!(after.rating, None);
        assert_eq!(after.total_ratings, None);
    }

    #[tokio::test]
    async fn create_account_rejects_existing_email() {
        let dir = MockDirectory::instant();
        let err = dir
            .create_account(NewAccount {
                name: "Impostor".into(),
                email: "JANE.SMITH@academix.edu".into(),
                password: "Abcdef1!".into(),
                role: crate::models::UserRole::Junior,
                college_id: Some("EE1900001".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Conflict(_)));
    }

    #[tokio::test]
    async fn upload_appears_in_listings_with_subject_resolved() {
        let dir = MockDirectory::instant();
        let file = crate::models::FileRef::from_bytes("graphs.pdf", b"graph notes");
        let uploaded = dir
            .upload_material(NewMaterial {
                title: "Graph Theory Crash Course".into(),
                description: "Short notes on traversals and shortest paths.".into(),
                subject_id: "cs301".into(),
                material_type: MaterialType::Notes,
                file,
                uploader_id: Uuid::new_v4(),
                uploaded_by: "jane.smith".into(),
            })
            .await
            .unwrap();
        assert_eq!(uploaded.subject.code, "CS301");
        assert!(uploaded.file_url.starts_with("/files/"));
        assert!(uploaded.file_url.ends_with(".pdf"));

        let listed = dir.list_materials(&MaterialFilter::default()).await.unwrap();
        assert!(listed.iter().any(|m| m.id == uploaded.id));
    }

    #[tokio::test]
    async fn authenticate_checks_mock_credentials() {
        let dir = MockDirectory::instant();
        let user = dir
            .authenticate("jane.smith@academix.edu", seed::SEED_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.role, crate::models::UserRole::Senior);

        let err = dir
            .authenticate("jane.smith@academix.edu", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Remote(_)));
    }
}
