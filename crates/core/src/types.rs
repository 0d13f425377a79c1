/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A calendar day without time of day, interpreted in UTC.
pub type LaunchDate = chrono::NaiveDate;

/// Today's calendar date in UTC.
pub fn today_utc() -> LaunchDate {
    chrono::Utc::now().date_naive()
}
