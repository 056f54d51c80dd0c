/// Default number of periodic reports augmented with XBRL facts.
pub const DEFAULT_FACT_LIMIT: usize = 3;

/// Options controlling statement augmentation of a filing list.
///
/// The limit counts only 10-K/10-Q filings. `None` means every qualifying filing is
/// fetched, which can mean hundreds of requests for a long-lived registrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactOptions {
    pub limit: Option<usize>,
}

impl Default for FactOptions {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_FACT_LIMIT),
        }
    }
}

impl FactOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of augmented reports. A limit of 0 removes the cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn unlimited() -> Self {
        Self { limit: None }
    }

    /// True once `count` qualifying filings have been processed.
    pub(crate) fn exhausted(&self, count: usize) -> bool {
        self.limit.is_some_and(|limit| count >= limit)
    }
}
