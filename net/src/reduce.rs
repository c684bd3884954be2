//! Collective reductions (§4.H): a barrier-style reducer combining one
//! contribution per participating block associatively and commutatively,
//! then releasing every caller with the combined result.

use parking_lot::Mutex;
use tokio::sync::Notify;

struct ReducerState {
    count: usize,
    value: f64,
}

/// A single-use collective over a fixed number of participants. Each
/// participant calls [`CollectiveReducer::contribute`] exactly once; the
/// call resolves for everyone only after the last contribution arrives.
pub struct CollectiveReducer {
    expected: usize,
    combine: fn(f64, f64) -> f64,
    state: Mutex<ReducerState>,
    notify: Notify,
}

impl CollectiveReducer {
    pub fn new(expected: usize, identity: f64, combine: fn(f64, f64) -> f64) -> Self {
        Self {
            expected,
            combine,
            state: Mutex::new(ReducerState { count: 0, value: identity }),
            notify: Notify::new(),
        }
    }

    pub fn sum(expected: usize) -> Self {
        Self::new(expected, 0.0, |a, b| a + b)
    }

    pub fn max(expected: usize) -> Self {
        Self::new(expected, f64::NEG_INFINITY, f64::max)
    }

    pub async fn contribute(&self, value: f64) -> f64 {
        {
            let mut state = self.state.lock();
            state.value = (self.combine)(state.value, value);
            state.count += 1;
            if state.count >= self.expected {
                self.notify.notify_waiters();
            }
        }
        loop {
            let notified = self.notify.notified();
            {
                let state = self.state.lock();
                if state.count >= self.expected {
                    return state.value;
                }
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn sum_combines_every_contribution() {
        let reducer = Arc::new(CollectiveReducer::sum(3));
        let mut handles = Vec::new();
        for v in [1.0, 2.0, 3.0] {
            let r = reducer.clone();
            handles.push(tokio::spawn(async move { r.contribute(v).await }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap(), 6.0);
        }
    }

    #[tokio::test]
    async fn max_combines_every_contribution() {
        let reducer = Arc::new(CollectiveReducer::max(3));
        let mut handles = Vec::new();
        for v in [1.0, 5.0, 3.0] {
            let r = reducer.clone();
            handles.push(tokio::spawn(async move { r.contribute(v).await }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap(), 5.0);
        }
    }
}
