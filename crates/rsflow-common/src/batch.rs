//! Per-item outcomes for batch operations.

/// How a batch operation reacts to a failed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop at the first failed item. Items after it are not attempted.
    #[default]
    FailFast,
    /// Attempt every item and record each failure.
    Continue,
}

/// Outcome of a single batch item.
#[derive(Debug)]
pub struct ItemOutcome<K, T, E> {
    /// What was processed (a tile key, an input path, ...).
    pub key: K,
    /// The item's result.
    pub result: Result<T, E>,
}

/// Ordered per-item results of a batch operation.
///
/// Items appear in the order they were attempted, which is the input order.
#[derive(Debug)]
pub struct BatchReport<K, T, E> {
    items: Vec<ItemOutcome<K, T, E>>,
    policy: BatchPolicy,
    stopped_early: bool,
}

impl<K, T, E> BatchReport<K, T, E> {
    /// Create an empty report for a batch run under `policy`.
    pub fn new(policy: BatchPolicy) -> Self {
        Self {
            items: Vec::new(),
            policy,
            stopped_early: false,
        }
    }

    /// Record an item outcome.
    ///
    /// Returns `true` if the batch should continue with the next item.
    pub fn record(&mut self, key: K, result: Result<T, E>) -> bool {
        let failed = result.is_err();
        self.items.push(ItemOutcome { key, result });
        if failed && self.policy == BatchPolicy::FailFast {
            self.stopped_early = true;
            return false;
        }
        true
    }

    /// The policy the batch ran under.
    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Whether the fail-fast policy cut the batch short.
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }

    /// All recorded outcomes in order.
    pub fn items(&self) -> &[ItemOutcome<K, T, E>] {
        &self.items
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether every recorded item succeeded and none were skipped.
    pub fn is_complete_success(&self) -> bool {
        !self.stopped_early && self.items.iter().all(|item| item.result.is_ok())
    }

    /// Successful values in order.
    pub fn successes(&self) -> impl Iterator<Item = (&K, &T)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().ok().map(|value| (&item.key, value)))
    }

    /// Failures in order.
    pub fn failures(&self) -> impl Iterator<Item = (&K, &E)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|err| (&item.key, err)))
    }

    /// Number of failed items.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Collapse into all-or-nothing form: every value in order, or the first error.
    pub fn into_result(self) -> Result<Vec<T>, E> {
        self.items.into_iter().map(|item| item.result).collect()
    }
}
