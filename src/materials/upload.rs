use log::warn;

use crate::directory::{Directory, NewMaterial};
use crate::models::{FileRef, Material, MaterialType, User};
use crate::notify::{Notice, Notifier};

/// Upload screen state. Every field is required before submission; a
/// successful upload resets the form, a failed one leaves it intact for
/// immediate resubmission.
#[derive(Debug, Default, Clone)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub subject_id: String,
    pub material_type: Option<MaterialType>,
    pub file: Option<FileRef>,
    submitting: bool,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, file: FileRef) {
        self.file = Some(file);
    }

    pub fn remove_file(&mut self) {
        self.file = None;
    }

    pub fn reset(&mut self) {
        *self = UploadForm::default();
    }

    fn text_fields_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty() && !self.subject_id.is_empty()
    }

    pub async fn submit(
        &mut self,
        uploader: &User,
        directory: &dyn Directory,
        notifier: &dyn Notifier,
    ) -> Option<Material> {
        if self.submitting {
            return None;
        }
        let (material_type, file) = match (self.material_type, self.file.clone()) {
            (Some(t), Some(f)) if self.text_fields_complete() => (t, f),
            _ => {
                notifier.display(Notice::destructive(
                    "Validation Error",
                    "Please fill in all required fields",
                ));
                return None;
            }
        };
        let request = NewMaterial {
            title: self.title.clone(),
            description: self.description.clone(),
            subject_id: self.subject_id.clone(),
            material_type,
            file,
            uploader_id: uploader.id,
            uploaded_by: uploader.name.clone(),
        };
        self.submitting = true;
        let outcome = directory.upload_material(request).await;
        self.submitting = false;
        match outcome {
            Ok(material) => {
                notifier.display(Notice::info(
                    "Upload Successful",
                    "Your study material has been uploaded successfully",
                ));
                self.reset();
                Some(material)
            }
            Err(err) => {
                warn!("upload failed: {err}");
                notifier.display(Notice::destructive(
                    "Upload Failed",
                    "There was an error uploading your file. Please try again.",
                ));
                None
            }
        }
    }
}
