use chrono::Utc;

/// Suffixes at or above this are not taken as timestamps. Millisecond clocks
/// stay far below it, and `next` keeps room to count past it.
const STAMP_CEILING: i64 = i64::MAX / 2;

/// Issues `prefix-<millis>` ids. The numeric part is strictly increasing, so an
/// id is never handed out twice even when two entities are created within the
/// same millisecond or after one was deleted.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        format!("{prefix}-{}", self.last)
    }

    /// Moves the counter past an id that already exists (loaded or imported).
    pub fn observe(&mut self, id: &str) {
        if let Some(stamp) = id
            .rsplit('-')
            .next()
            .and_then(|suffix| suffix.parse::<i64>().ok())
            .filter(|stamp| *stamp < STAMP_CEILING)
        {
            self.last = self.last.max(stamp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let first = ids.next("chart");
        let second = ids.next("chart");
        assert!(first.starts_with("chart-"));
        assert_ne!(first, second);
    }

    #[test]
    fn observe_skips_past_future_ids() {
        let mut ids = IdGenerator::new();
        ids.observe("category-99999999999999");
        assert_eq!(ids.next("category"), "category-100000000000000");
        ids.observe("client");
        assert_eq!(ids.next("x"), "x-100000000000001");
    }

    #[test]
    fn oversized_suffix_does_not_exhaust_the_counter() {
        let mut ids = IdGenerator::new();
        ids.observe(&format!("chart-{}", i64::MAX));
        let first = ids.next("chart");
        let second = ids.next("chart");
        assert_ne!(first, format!("chart-{}", i64::MAX));
        assert_ne!(first, second);
    }

    #[test]
    fn counter_saturates_instead_of_wrapping() {
        let mut ids = IdGenerator { last: i64::MAX };
        assert_eq!(ids.next("chart"), format!("chart-{}", i64::MAX));
    }
}
