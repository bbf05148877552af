//! UCB1-tuned multi-armed bandit, grounded on the original engine's
//! `negative_feedback.hpp` `MultiArmedBandit` — exponentially
//! weighted running mean/variance, round-robin warm-up, and periodic
//! drift-driven reset, all behind a single mutex owned by the caller (here,
//! [`crate::tuner_registry::TunerRegistry`]).

/// Pulls required per arm before exploitation begins.
const WARMUP_PULLS_PER_ARM: u64 = 4;
/// Selections between drift checks / CSV heartbeat snapshots.
const HEARTBEAT_INTERVAL: u64 = 256;
/// Cap on the exponential-update weight's effective sample count.
const UPDATE_WEIGHT_CAP: u64 = 15;
/// `ε` in the UCB-tuned denominator, avoiding division by zero for
/// never-updated arms.
const EPSILON: f64 = 0.1;

/// One heartbeat snapshot, recorded every [`HEARTBEAT_INTERVAL`] selections
/// and later dumped verbatim as a CSV row by the tuner registry.
#[derive(Clone, Debug)]
pub struct HeartbeatRecord {
    pub step: u64,
    pub mean: Vec<f64>,
    pub selections: Vec<u64>,
}

/// A single bandit instance over a fixed discrete arm set, indexed 0..K.
///
/// Callers mutate through `&mut self`; mutual exclusion across concurrent
/// callers is provided by whatever holds the bandit (a
/// `Mutex<MultiArmedBandit>` in [`crate::tuner_registry::TunerRegistry`]),
/// not by this type itself.
pub struct MultiArmedBandit {
    k: usize,
    mean: Vec<f64>,
    sq_mean: Vec<f64>,
    n_update: Vec<u64>,
    total_updates: u64,
    sel_count: Vec<u64>,
    total_selections: u64,
    last_updated_arm: Option<usize>,
    last_snapshot_mean: Vec<f64>,
    history: Vec<HeartbeatRecord>,
}

impl MultiArmedBandit {
    /// Construct a bandit with `K = initial_means.len()` arms.
    pub fn new(initial_means: Vec<f64>) -> Self {
        let k = initial_means.len();
        Self {
            k,
            mean: initial_means,
            sq_mean: vec![0.0; k],
            n_update: vec![0; k],
            total_updates: 0,
            sel_count: vec![0; k],
            total_selections: 0,
            last_updated_arm: None,
            last_snapshot_mean: vec![0.0; k],
            history: Vec::new(),
        }
    }

    pub fn arm_count(&self) -> usize {
        self.k
    }

    /// Total successful `update_arm` calls since the last reset.
    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    /// Per-arm update counts since the last reset.
    pub fn update_counts(&self) -> &[u64] {
        &self.n_update
    }

    pub fn history(&self) -> &[HeartbeatRecord] {
        &self.history
    }

    /// Choose an arm. Round-robin for the first `K · S` selections, then
    /// `argmax_i (mean_i + UCB_tuned_i)` with ties broken by lowest index.
    pub fn select_arm(&mut self) -> usize {
        let warmup_selections = self.k as u64 * WARMUP_PULLS_PER_ARM;
        let arm = if self.total_selections < warmup_selections {
            (self.total_selections % self.k as u64) as usize
        } else {
            self.argmax_ucb_tuned()
        };

        self.sel_count[arm] += 1;
        self.total_selections += 1;
        if self.total_selections % HEARTBEAT_INTERVAL == 0 {
            self.heartbeat();
        }
        arm
    }

    fn argmax_ucb_tuned(&self) -> usize {
        use crate::utils::OrdF64;

        let t = (self.total_updates.max(1)) as f64;
        (0..self.k)
            .map(|i| {
                let n_i = self.n_update[i] as f64;
                let variance = self.sq_mean[i] - self.mean[i] * self.mean[i]
                    + (2.0 * t.ln() / (n_i + EPSILON)).sqrt();
                let ucb_tuned = (t.ln() / (n_i + EPSILON) * variance.min(0.25)).sqrt();
                (i, OrdF64(self.mean[i] + ucb_tuned))
            })
            // max_by_key keeps the *last* maximum on ties; reverse the
            // index so the lowest-index arm wins instead.
            .max_by_key(|&(i, score)| (score, std::cmp::Reverse(i)))
            .map(|(i, _)| i)
            .unwrap()
    }

    /// Update the running mean/variance for `arm` with an observed `reward`.
    ///
    /// `arm` out of range is a programmer error, not a recoverable failure.
    pub fn update_arm(&mut self, arm: usize, reward: f64) {
        assert!(arm < self.k, "arm index {arm} out of range (K={})", self.k);
        let n = self.n_update[arm].min(UPDATE_WEIGHT_CAP) as f64;
        let r = n / (n + 1.0);
        self.mean[arm] = r * self.mean[arm] + (1.0 - r) * reward;
        self.sq_mean[arm] = r * self.sq_mean[arm] + (1.0 - r) * reward * reward;
        self.n_update[arm] += 1;
        self.total_updates += 1;
        self.last_updated_arm = Some(arm);
    }

    /// Every `HEARTBEAT_INTERVAL` selections: snapshot for the CSV log, then
    /// check whether the last-updated arm's mean doubled or halved since the
    /// previous snapshot, resetting the bandit if so.
    fn heartbeat(&mut self) {
        self.history.push(HeartbeatRecord {
            step: self.total_selections,
            mean: self.mean.clone(),
            selections: self.sel_count.clone(),
        });

        if let Some(arm) = self.last_updated_arm {
            let prev = self.last_snapshot_mean[arm];
            let cur = self.mean[arm];
            if prev.abs() > f64::EPSILON {
                let ratio = cur / prev;
                if !(0.5..2.0).contains(&ratio) {
                    self.reset();
                    return;
                }
            }
        }
        self.last_snapshot_mean = self.mean.clone();
    }

    /// Drift-triggered reset: zero the mean/variance/update counters and
    /// restart the round-robin warm-up. The CSV history is untouched — it
    /// belongs to the tuner registry's `reset_all` lifecycle, not this one.
    fn reset(&mut self) {
        self.mean = vec![0.0; self.k];
        self.sq_mean = vec![0.0; self.k];
        self.n_update = vec![0; self.k];
        self.total_updates = 0;
        self.sel_count = vec![0; self.k];
        self.total_selections = 0;
        self.last_updated_arm = None;
        self.last_snapshot_mean = vec![0.0; self.k];
    }
}
