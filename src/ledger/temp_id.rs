use chrono::Utc;

/// Hands out temporary line item ids based on the wall clock in milliseconds.
///
/// Ids are strictly increasing within one generator: when the clock has not
/// advanced past the last id (two commits in the same millisecond, or a clock
/// step backwards) the next id is `last + 1`.
#[derive(Debug, Default)]
pub struct TempIdGenerator {
    last: i64,
}

impl TempIdGenerator {
    pub fn next_id(&mut self) -> i64 {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_millis: i64) -> i64 {
        let id = if now_millis > self.last {
            now_millis
        } else {
            self.last + 1
        };
        self.last = id;
        id
    }
}
