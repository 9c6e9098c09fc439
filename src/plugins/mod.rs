//! Built-in site strategies, in registration order.

mod branchio;
mod niconico;
mod twitch;
mod wikipedia;
mod youtube;

pub use branchio::BranchIoStrategy;
pub use niconico::{NiconicoStrategy, NICOZON_ORIGIN};
pub use twitch::TwitchStrategy;
pub use wikipedia::WikipediaStrategy;
pub use youtube::YoutubeStrategy;

use crate::Strategy;
use std::sync::Arc;

pub fn builtin() -> Vec<Arc<dyn Strategy>> {
    vec![
        Arc::new(WikipediaStrategy),
        Arc::new(BranchIoStrategy),
        Arc::new(NiconicoStrategy::new()),
        Arc::new(YoutubeStrategy),
        Arc::new(TwitchStrategy::new()),
    ]
}
