//! Tuner registry: maps a stable call-site identifier to a bandit instance,
//! deliberately knowing nothing about what that identifier means to the
//! engine — operator id, pipeline id, whatever the caller chooses.
//!
//! Grounded on the original engine's `CompactionController`, which is a
//! process-global singleton over `unordered_map<id, MultiArmedBandit>`
//! guarded by its own mutex; this crate makes that an explicit `Arc`-shared
//! service threaded through the query context instead of a `Get()` singleton.

use crate::bandit::MultiArmedBandit;
use crate::error::EngineError;
use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;

struct Entry {
    bandit: MultiArmedBandit,
    arm_values: Vec<i64>,
}

impl Entry {
    fn index_of(&self, arm_value: i64) -> Option<usize> {
        self.arm_values.iter().position(|&v| v == arm_value)
    }
}

/// Process-wide (or per-context — see [`crate::context::QueryContext`]) map
/// from call-site id to bandit, serialized by its own mutex.
#[derive(Default)]
pub struct TunerRegistry {
    entries: Mutex<HashMap<u64, Entry>>,
}

impl TunerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new call site with an ordered list of admissible
    /// arm-values and their initial mean-reward estimates. Fails if `id` is
    /// already registered — a double registration is fatal to tuner setup.
    pub fn register(
        &self,
        id: u64,
        arm_values: Vec<i64>,
        initial_means: Vec<f64>,
    ) -> Result<(), EngineError> {
        debug_assert_eq!(arm_values.len(), initial_means.len());
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(&id) {
            return Err(EngineError::AlreadyRegistered(format!("0x{id:x}")));
        }
        entries.insert(
            id,
            Entry {
                bandit: MultiArmedBandit::new(initial_means),
                arm_values,
            },
        );
        Ok(())
    }

    /// Select an arm-value for `id`. Panics if `id` was never registered —
    /// unlike an unknown arm-value in `update_arm`, calling `select_arm` for
    /// an unregistered call site is a caller bug, not a race to tolerate.
    pub fn select_arm(&self, id: u64) -> i64 {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .get_mut(&id)
            .unwrap_or_else(|| panic!("tuner id 0x{id:x} was never registered"));
        let idx = entry.bandit.select_arm();
        entry.arm_values[idx]
    }

    /// Report a reward for `arm_value` at call site `id`. A no-op if the
    /// arm-value is unknown — this tolerates the bandit having been reset
    /// concurrently between `select_arm` and the reward being reported.
    pub fn update_arm(&self, id: u64, arm_value: i64, reward: f64) {
        let mut entries = self.entries.lock().unwrap();
        let Some(entry) = entries.get_mut(&id) else {
            return;
        };
        let Some(idx) = entry.index_of(arm_value) else {
            return;
        };
        entry.bandit.update_arm(idx, reward);
    }

    /// Total accepted `update_arm` calls for `id` since its last reset.
    /// Intended for diagnostics/tests, not the hot path.
    pub fn total_updates(&self, id: u64) -> u64 {
        let entries = self.entries.lock().unwrap();
        entries.get(&id).map_or(0, |e| e.bandit.total_updates())
    }

    /// Drop every bandit, dumping its selection/mean history to a CSV file
    /// under a freshly created `bandit_log_0x<random hex>` directory in the
    /// current working directory. Called once per query.
    ///
    /// A CSV write failure is logged and the query continues — it never
    /// blocks or fails the caller.
    pub fn reset_all(&self) {
        let mut entries = self.entries.lock().unwrap();
        if entries.is_empty() {
            return;
        }

        let dir_name = format!("bandit_log_0x{:x}", rand::random::<u64>());
        if let Err(err) = fs::create_dir_all(&dir_name) {
            eprintln!("tuner registry: failed to create log directory {dir_name}: {err}");
            entries.clear();
            return;
        }

        for (n, (id, entry)) in entries.drain().enumerate() {
            for record in entry.bandit.history() {
                eprintln!(
                    "tuner 0x{id:x} arm {:?}: step={} means={:?}",
                    entry.arm_values, record.step, record.mean
                );
            }
            let file_name = format!("{dir_name}/0x{id:x}\tId-{n}.log");
            if let Err(err) = write_history_csv(&file_name, entry.bandit.history()) {
                eprintln!("tuner registry: failed to write {file_name}: {err}");
            }
        }
    }
}

fn write_history_csv(path: &str, history: &[crate::bandit::HeartbeatRecord]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in history {
        let mut row = vec![record.step.to_string()];
        row.extend(record.mean.iter().map(|m| m.to_string()));
        row.extend(record.selections.iter().map(|s| s.to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
