mod broadcaster;
mod session_rng;
pub mod tictactoe;

pub use broadcaster::{ChannelBroadcaster, GameBroadcaster};
pub use session_rng::SessionRng;
