use chrono::Utc;
use tracing::info;

use paydesk_types::models::{Review, ReviewStatus};

use crate::Store;

impl Store {
    // -- Reviews --

    /// Record a refund-request review. Write-once: no route ever transitions
    /// the status, resolution happens out of band.
    pub fn submit_review(
        &self,
        user_id: i64,
        return_number: String,
        message: String,
        screenshot: Option<String>,
    ) -> Review {
        self.with_state(|state| {
            state.next_review_id += 1;
            let review = Review {
                id: state.next_review_id,
                user_id,
                return_number,
                message,
                screenshot,
                submitted_at: Utc::now(),
                status: ReviewStatus::Pending,
            };
            state.reviews.insert(review.id, review.clone());
            info!(review_id = review.id, user_id, "review submitted");
            review
        })
    }

    pub fn list_reviews(&self) -> Vec<Review> {
        self.with_state(|state| state.reviews.values().cloned().collect())
    }
}
