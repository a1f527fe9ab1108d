use chrono::{DateTime, Duration, Utc};

/**
 * A question is published once its publish time is no longer in the future
 */
pub fn is_published(publish_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    publish_time <= now
}

/**
 * Published within the trailing day ending at `now`
 *
 * The lower bound is exclusive: something published exactly one day ago is no
 * longer recent.
 */
pub fn is_recent(publish_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    // No instant a day before the earliest representable one; nothing older exists
    now.checked_sub_signed(Duration::days(1))
        .map_or(true, |start| start < publish_time)
        && is_published(publish_time, now)
}
