use std::sync::RwLock;

use chrono::{Local, NaiveDate};

/// Source of "today" for date stamps and attendance.
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> NaiveDate;
}

/// Server-local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock for tests and replaying a given day.
#[derive(Debug)]
pub struct FixedClock {
    today: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: RwLock::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        if let Ok(mut guard) = self.today.write() {
            *guard = today;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_can_be_moved() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 11).expect("valid date");
        let second = NaiveDate::from_ymd_opt(2024, 1, 13).expect("valid date");
        let clock = FixedClock::new(first);
        assert_eq!(clock.today(), first);
        clock.set(second);
        assert_eq!(clock.today(), second);
    }
}
