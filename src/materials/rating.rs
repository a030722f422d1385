use log::warn;
use uuid::Uuid;

use crate::directory::{Directory, RatingAck};
use crate::notify::{Notice, Notifier};

/// Star widget state for one material: the rating currently shown for the
/// signed-in user and whether a submission is outstanding.
#[derive(Debug)]
pub struct RatingControl {
    material_id: Uuid,
    user_id: Uuid,
    current: Option<u8>,
    submitting: bool,
}

impl RatingControl {
    pub fn new(material_id: Uuid, user_id: Uuid, initial: Option<u8>) -> Self {
        RatingControl {
            material_id,
            user_id,
            current: initial,
            submitting: false,
        }
    }

    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// Submit a 1-5 star rating. The displayed value only moves once the
    /// call resolves successfully; any failure leaves it untouched and is
    /// surfaced as a recoverable notice.
    pub async fn submit(
        &mut self,
        value: u8,
        directory: &dyn Directory,
        notifier: &dyn Notifier,
    ) -> Option<RatingAck> {
        if self.submitting {
            return None;
        }
        if !(1..=5).contains(&value) {
            notifier.display(Notice::destructive(
                "Validation Error",
                "Ratings range from 1 to 5 stars",
            ));
            return None;
        }
        self.submitting = true;
        let outcome = directory
            .submit_rating(self.material_id, self.user_id, value)
            .await;
        self.submitting = false;
        match outcome {
            Ok(ack) => {
                self.current = Some(value);
                notifier.display(Notice::info(
                    "Rating Submitted",
                    format!("Thank you for rating this material with {value} stars!"),
                ));
                Some(ack)
            }
            Err(err) => {
                warn!("rating submission failed: {err}");
                notifier.display(Notice::destructive(
                    "Failed to Submit Rating",
                    "Please try again later.",
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::mock::MockDirectory;
    use crate::materials::filter::MaterialFilter;
    use crate::notify::RecordingNotifier;

    async fn any_material(dir: &MockDirectory) -> Uuid {
        dir.list_materials(&MaterialFilter::default())
            .await
            .unwrap()[0]
            .id
    }

    #[tokio::test]
    async fn successful_submission_updates_display() {
        let dir = MockDirectory::instant();
        let notifier = RecordingNotifier::new();
        let material = any_material(&dir).await;
        let mut control = RatingControl::new(material, Uuid::new_v4(), None);

        let ack = control.submit(4, &dir, &notifier).await;
        assert!(ack.is_some());
        assert_eq!(control.current(), Some(4));
        assert_eq!(notifier.titles(), vec!["Rating Submitted"]);
    }

    #[tokio::test]
    async fn failed_submission_keeps_prior_display() {
        let dir = MockDirectory::instant();
        let notifier = RecordingNotifier::new();
        let material = any_material(&dir).await;
        let mut control = RatingControl::new(material, Uuid::new_v4(), Some(3));

        dir.fail_next();
        let ack = control.submit(5, &dir, &notifier).await;
        assert!(ack.is_none());
        assert_eq!(control.current(), Some(3));
        assert_eq!(notifier.titles(), vec!["Failed to Submit Rating"]);
    }

    #[tokio::test]
    async fn out_of_range_value_never_reaches_directory() {
        let dir = MockDirectory::instant();
        let notifier = RecordingNotifier::new();
        let material = any_material(&dir).await;
        let mut control = RatingControl::new(material, Uuid::new_v4(), None);

        let ack = control.submit(6, &dir, &notifier).await;
        assert!(ack.is_none());
        assert_eq!(control.current(), None);
        assert_eq!(notifier.titles(), vec!["Validation Error"]);
    }
}
