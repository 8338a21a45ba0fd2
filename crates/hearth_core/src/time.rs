//! Injected wall-clock abstraction so the regulation engine and the tests
//! agree on what "now" means.

use chrono::{Local, NaiveDateTime};

pub trait TimeSource: Send + Sync {
  fn now(&self) -> NaiveDateTime;
}

/// The real clock, in local time. Operating-mode schedules are defined in
/// terms of the household's wall clock, not UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
  fn now(&self) -> NaiveDateTime {
    Local::now().naive_local()
  }
}

/// A clock pinned to a single instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
  now: NaiveDateTime,
}

impl FixedTimeSource {
  pub fn new(now: NaiveDateTime) -> Self {
    Self { now }
  }
}

impl TimeSource for FixedTimeSource {
  fn now(&self) -> NaiveDateTime {
    self.now
  }
}
