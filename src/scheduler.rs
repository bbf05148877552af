//! Role-based thread scheduler, grounded on the original engine's
//! `ThreadScheduler::Get().SetThreadSetting(workers, current_tags, next_tags,
//! exclusive)` call sites in `bushy_main.cpp` (the header defining the class
//! was filtered out of this pack): a small process-global (or per-context,
//! see [`crate::context::QueryContext`]) ordered list of substring-matching
//! rules, first match wins.

use std::sync::RwLock;

struct Rule {
    current_tags: Vec<String>,
    next_tags: Vec<String>,
    exclusive: bool,
    workers: u32,
}

impl Rule {
    fn matches(&self, current_stage: &str, next_stage: &str) -> bool {
        let current_ok = self
            .current_tags
            .iter()
            .all(|tag| current_stage.contains(tag.as_str()));
        if !current_ok {
            return false;
        }
        if self.exclusive {
            self.next_tags
                .iter()
                .all(|tag| next_stage.contains(tag.as_str()))
        } else {
            self.next_tags
                .iter()
                .all(|tag| !next_stage.contains(tag.as_str()))
        }
    }
}

/// Ordered rule table plus a fallback default parallelism, behind a
/// reader/writer lock: `lookup` (dispatch decisions) is frequent and
/// concurrent, `set_rule` (installation) happens only at query setup.
pub struct ThreadScheduler {
    rules: RwLock<Vec<Rule>>,
    default_workers: u32,
}

impl ThreadScheduler {
    pub fn new(default_workers: u32) -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
            default_workers,
        }
    }

    /// Append a rule to the end of the ordered list (first-match-wins at
    /// lookup time, so earlier registrations take priority).
    pub fn set_rule(
        &self,
        workers: u32,
        current_tags: Vec<impl Into<String>>,
        next_tags: Vec<impl Into<String>>,
        exclusive: bool,
    ) {
        let rule = Rule {
            current_tags: current_tags.into_iter().map(Into::into).collect(),
            next_tags: next_tags.into_iter().map(Into::into).collect(),
            exclusive,
            workers,
        };
        self.rules.write().unwrap().push(rule);
    }

    /// Worker count for a pipeline transition from `current_stage` to
    /// `next_stage`: the first matching rule's `workers`, or the scheduler's
    /// default if none match.
    pub fn lookup(&self, current_stage: &str, next_stage: &str) -> u32 {
        let rules = self.rules.read().unwrap();
        rules
            .iter()
            .find(|rule| rule.matches(current_stage, next_stage))
            .map(|rule| rule.workers)
            .unwrap_or(self.default_workers)
    }

    /// Drop every installed rule, restoring the scheduler to its
    /// just-constructed state.
    pub fn clear(&self) {
        self.rules.write().unwrap().clear();
    }
}
