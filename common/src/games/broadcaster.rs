use std::future::Future;

use tokio::sync::mpsc;

use super::tictactoe::SessionUpdate;

pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_update(&self, update: SessionUpdate) -> impl Future<Output = ()> + Send;
}

/// Forwards updates into a channel. A closed receiver is ignored; the
/// session notices the disconnect when its command channel closes.
#[derive(Clone)]
pub struct ChannelBroadcaster {
    tx: mpsc::Sender<SessionUpdate>,
}

impl ChannelBroadcaster {
    pub fn new(tx: mpsc::Sender<SessionUpdate>) -> Self {
        Self { tx }
    }
}

impl GameBroadcaster for ChannelBroadcaster {
    async fn broadcast_update(&self, update: SessionUpdate) {
        let _ = self.tx.send(update).await;
    }
}
