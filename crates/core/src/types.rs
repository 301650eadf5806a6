/// Document ids are MongoDB ObjectIds carried as their 24-char hex form
/// outside the persistence layer.
pub type DocId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
