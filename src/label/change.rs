//! ChangeDetector: text equality gate for label rebuilds
//!
//! Setting the same text twice must not rebuild. The decision is an exact
//! string comparison against the last text seen.

// =============================================================================
// ChangeDetector
// =============================================================================

/// Remembers the last text and counts skipped rebuilds
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_text: Option<String>,
    check_count: u64,
    skip_count: u64,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `text` differs from the last checked text.
    /// The first check always counts as changed.
    pub fn has_changed(&mut self, text: &str) -> bool {
        self.check_count += 1;

        if self.last_text.as_deref() == Some(text) {
            self.skip_count += 1;
            return false;
        }
        self.last_text = Some(text.to_string());
        true
    }

    /// Get skip rate as percentage
    pub fn skip_rate(&self) -> f64 {
        if self.check_count == 0 {
            return 0.0;
        }
        (self.skip_count as f64 / self.check_count as f64) * 100.0
    }

    pub fn check_count(&self) -> u64 {
        self.check_count
    }

    pub fn skip_count(&self) -> u64 {
        self.skip_count
    }

    /// Forget the last text so the next check counts as changed.
    /// Counters are kept.
    pub fn forget(&mut self) {
        self.last_text = None;
    }
}

// =============================================================================
// Tests
// =============================================================================
