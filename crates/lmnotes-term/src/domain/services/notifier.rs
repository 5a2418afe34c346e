use tokio::sync::broadcast;

use crate::domain::models::StateChange;

const CHANNEL_CAPACITY: usize = 256;

/// Fan-out of [`StateChange`]s to whatever renders the state.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: broadcast::Sender<StateChange>,
}

impl Default for Notifier {
    fn default() -> Notifier {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Notifier { tx }
    }
}

impl Notifier {
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.tx.subscribe()
    }

    pub fn notify(&self, change: StateChange) {
        // Nobody listening is fine.
        let _ = self.tx.send(change);
    }
}
