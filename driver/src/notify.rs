use error_stack::Report;
use kernel::interface::event::{ReviewEvent, ReviewPublisher};
use kernel::KernelError;
use tokio::sync::broadcast;
use tracing::{debug, trace};

const DEFAULT_CAPACITY: usize = 64;

/// Fans review changes out to every live subscriber. Slow subscribers skip events.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<ReviewEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> error_stack::Result<Self, KernelError> {
        if capacity == 0 {
            return Err(Report::new(KernelError::Internal)
                .attach_printable("Broadcast capacity must be positive"));
        }
        let (sender, _) = broadcast::channel(capacity);
        Ok(Self { sender })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReviewEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { sender }
    }
}

impl ReviewPublisher for BroadcastPublisher {
    fn publish(&self, event: ReviewEvent) -> error_stack::Result<(), KernelError> {
        let id = *event.id().as_ref();
        match self.sender.send(event) {
            Ok(receivers) => debug!("Published review event id: {id}, receivers: {receivers}"),
            Err(_) => trace!("No subscriber for review event id: {id}"),
        }
        Ok(())
    }
}
