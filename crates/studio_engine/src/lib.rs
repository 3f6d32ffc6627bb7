//! Studio engine: effect execution, schedulers and content readers.
mod decode;
mod reader;
mod scheduler;
mod settings;
mod studio;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use reader::{ContentReader, FsContentReader, MemoryContentReader, ReadError};
pub use scheduler::{Inbox, ManualScheduler, MsgFuture, Scheduler, TokioScheduler};
pub use settings::TrackerSettings;
pub use studio::{
    placeholder_text, ExtractionCallback, Observer, Studio, SubscriptionId,
};
