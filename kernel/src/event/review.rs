use crate::entity::{Review, ReviewId};
use crate::KernelError;

/// Change of a review, emitted once the change is committed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ReviewEvent {
    Created(Review),
    Updated(Review),
    Deleted { id: ReviewId },
}

impl ReviewEvent {
    pub fn id(&self) -> &ReviewId {
        match self {
            ReviewEvent::Created(review) | ReviewEvent::Updated(review) => review.id(),
            ReviewEvent::Deleted { id } => id,
        }
    }
}

pub trait ReviewPublisher: 'static + Sync + Send {
    /// Having no subscriber is not an error.
    fn publish(&self, event: ReviewEvent) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnReviewPublisher: 'static + Sync + Send {
    type ReviewPublisher: ReviewPublisher;
    fn review_publisher(&self) -> &Self::ReviewPublisher;
}
