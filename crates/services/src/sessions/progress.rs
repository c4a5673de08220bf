use qrlearn_core::time::format_clock;

use super::service::SessionPhase;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based step on screen; 0 before the first start.
    pub current_step: usize,
    pub total_steps: usize,
    /// Share of steps already passed, rounded; 100 once completed.
    pub percent: u8,
    pub score: u32,
    pub elapsed_ms: u64,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn percent_of(index: usize, total: usize, phase: SessionPhase) -> u8 {
        match phase {
            SessionPhase::Completed => 100,
            _ if total == 0 => 0,
            _ => {
                let rounded = (index.min(total) * 200 + total) / (2 * total);
                u8::try_from(rounded).unwrap_or(100)
            }
        }
    }

    /// Elapsed time as `mm:ss`.
    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format_clock(self.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_and_caps() {
        assert_eq!(SessionProgress::percent_of(0, 4, SessionPhase::Active), 0);
        assert_eq!(SessionProgress::percent_of(1, 3, SessionPhase::Active), 33);
        assert_eq!(SessionProgress::percent_of(2, 3, SessionPhase::Active), 67);
        assert_eq!(SessionProgress::percent_of(3, 4, SessionPhase::Completed), 100);
        assert_eq!(SessionProgress::percent_of(0, 0, SessionPhase::NotStarted), 0);
    }
}
