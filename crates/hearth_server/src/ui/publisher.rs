use super::events::UiEvent;
use tokio::sync::broadcast;

/// Fans state-change events out to every connected dashboard listener.
///
/// Backed by a broadcast channel so `publish` can be called synchronously
/// from the command executor thread while listener tasks drain their own
/// receivers on the UI worker's loop.
#[derive(Debug, Clone)]
pub struct UiPublisher {
  sender: broadcast::Sender<UiEvent>,
}

impl UiPublisher {
  pub fn new(capacity: usize) -> Self {
    let (sender, _) = broadcast::channel(capacity);
    Self { sender }
  }

  /// Publishes to all current listeners. Having no listeners is normal;
  /// the event is simply dropped.
  pub fn publish(&self, event: UiEvent) {
    if self.sender.send(event).is_err() {
      trace!("No UI listeners connected, event dropped");
    }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
    self.sender.subscribe()
  }
}

impl Default for UiPublisher {
  fn default() -> Self {
    Self::new(256)
  }
}
