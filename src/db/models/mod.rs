pub mod record;

pub use record::{EmotionRecord, ListedRecord};
