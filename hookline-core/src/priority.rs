//! Callback execution priority.

use std::fmt;

/// Execution priority of a callback within its hook.
///
/// Lower values run earlier. The three tiers are spaced apart so callers can
/// slot custom priorities between them.
///
/// ```
/// use hookline_core::Priority;
///
/// assert!(Priority::HIGH < Priority::MEDIUM);
/// assert!(Priority::new(-10) < Priority::MEDIUM);
/// assert_eq!(Priority::default(), Priority::MEDIUM);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(i32);

impl Priority {
    /// Runs first.
    pub const HIGH: Priority = Priority(-1000);
    /// The default tier.
    pub const MEDIUM: Priority = Priority(0);
    /// Runs last.
    pub const LOW: Priority = Priority(1000);

    /// Create a custom priority.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// The raw ordering value.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::MEDIUM
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Priority::HIGH => f.write_str("high"),
            Priority::MEDIUM => f.write_str("medium"),
            Priority::LOW => f.write_str("low"),
            Priority(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        let mut priorities = vec![
            Priority::LOW,
            Priority::new(500),
            Priority::HIGH,
            Priority::MEDIUM,
        ];
        priorities.sort();
        assert_eq!(
            priorities,
            vec![Priority::HIGH, Priority::MEDIUM, Priority::new(500), Priority::LOW]
        );
    }

    #[test]
    fn display_names_tiers() {
        assert_eq!(Priority::HIGH.to_string(), "high");
        assert_eq!(Priority::from(-5).to_string(), "-5");
    }
}
