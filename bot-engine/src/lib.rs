pub mod compose;
pub mod normalize;
pub mod supervisor;
pub mod trigger;
pub mod watcher;

pub use compose::compose_reply;
pub use normalize::normalize;
pub use supervisor::{supervise, RestartPolicy};
pub use trigger::TriggerPolicy;
pub use watcher::{ItemOutcome, ItemSource, ResponseApi, StreamWatcher};
