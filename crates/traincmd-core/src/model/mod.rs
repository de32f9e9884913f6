pub mod command;
pub mod response;
pub mod schedule;

pub use command::CommandRecord;
pub use response::CommandResponse;
pub use schedule::Schedule;

/// A structured JSON document: string keys mapped to arbitrary JSON values
pub type Document = serde_json::Map<String, serde_json::Value>;
