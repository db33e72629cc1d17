//! ## ownkit-core::timer
//! **Named lifetime tracker**
//!
//! A `ScopedTimer` records the Unix time it was created and reports its age
//! when dropped. It follows the same ownership discipline as `BoundedBuffer`:
//! `clone` copies the name, `take` moves it out and leaves a timer that reports
//! nothing.

use chrono::Utc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedTimer {
    timestamp: i64,
    name: Option<String>,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        let timestamp = Utc::now().timestamp();
        info!(timer = name, timestamp, "timer started");
        Self {
            timestamp,
            name: Some(name.to_owned()),
        }
    }

    /// A timer with no name. It still reports its age when dropped.
    pub fn anonymous() -> Self {
        let timestamp = Utc::now().timestamp();
        info!(timer = "anonymous", timestamp, "timer started");
        Self {
            timestamp,
            name: None,
        }
    }

    /// Moves the name and timestamp out, leaving `self` silent on drop.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Move-assignment.
    pub fn assign_from(&mut self, other: &mut Self) {
        *self = other.take();
    }

    pub fn set_name(&mut self, name: &str) {
        if let Some(old) = &self.name {
            info!(from = %old, to = name, "renaming timer");
        }
        self.name = Some(name.to_owned());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Creation time in Unix seconds; zero once moved from.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    /// Seconds elapsed since creation.
    pub fn age(&self) -> i64 {
        self.age_at(Utc::now().timestamp())
    }

    pub fn age_at(&self, now: i64) -> i64 {
        now - self.timestamp
    }

    pub fn is_moved_from(&self) -> bool {
        self.name.is_none() && self.timestamp == 0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        match &self.name {
            Some(name) => info!(timer = %name, age = self.age(), "timer finished"),
            None if self.timestamp != 0 => {
                info!(timer = "anonymous", age = self.age(), "timer finished")
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_clone_copies_name() {
        let t = ScopedTimer::new("t");
        let mut t2 = t.clone();
        t2.set_name("t2");
        assert_eq!(t.name(), Some("t"));
        assert_eq!(t2.name(), Some("t2"));
        assert_eq!(t.timestamp(), t2.timestamp());
    }

    #[test]
    fn test_take_leaves_moved_from() {
        let mut moveable = ScopedTimer::new("moveable");
        let ts = moveable.timestamp();
        let mut t3 = moveable.take();
        t3.set_name("t3");
        assert!(moveable.is_moved_from());
        assert_eq!(moveable.timestamp(), 0);
        assert_eq!(t3.timestamp(), ts);
        assert_eq!(t3.name(), Some("t3"));
    }

    #[test]
    fn test_assign_from() {
        let mut src = ScopedTimer::new("src");
        let mut dst = ScopedTimer::new("dst");
        dst.assign_from(&mut src);
        assert_eq!(dst.name(), Some("src"));
        assert!(src.is_moved_from());
    }

    #[test]
    fn test_age_at() {
        let mut t = ScopedTimer::anonymous();
        t.set_timestamp(100);
        assert_eq!(t.age_at(142), 42);
        assert!(t.name().is_none());
    }

    #[traced_test]
    #[test]
    fn test_moved_from_timer_is_silent() {
        let mut t = ScopedTimer::new("quiet");
        let moved = t.take();
        drop(t);
        assert!(!logs_contain("timer finished"));
        drop(moved);
        assert!(logs_contain("timer finished"));
    }

    #[traced_test]
    #[test]
    fn test_anonymous_timer_reports() {
        let timer = ScopedTimer::anonymous();
        assert!(logs_contain("timer started"));
        drop(timer);
        assert!(logs_contain("timer finished"));
        assert!(logs_contain("anonymous"));
    }
}
