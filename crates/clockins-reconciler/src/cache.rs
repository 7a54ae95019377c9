use clockins_core::JobDescriptor;
use dashmap::{mapref::entry::Entry, DashMap};

/// Last job state seen per identifier. In-memory only; starts empty on every
/// process start, which forces a fresh transition for each connected player.
#[derive(Debug, Default)]
pub struct JobCache {
    entries: DashMap<String, JobDescriptor>,
}

impl JobCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` for `identifier`, returning true when it differs from
    /// the cached value (or nothing was cached). Compare and store happen
    /// under the same shard lock.
    pub fn observe(&self, identifier: &str, current: &JobDescriptor) -> bool {
        match self.entries.entry(identifier.to_string()) {
            Entry::Occupied(mut e) => {
                if e.get() == current {
                    false
                } else {
                    e.insert(current.clone());
                    true
                }
            }
            Entry::Vacant(e) => {
                e.insert(current.clone());
                true
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<JobDescriptor> {
        self.entries.get(identifier).map(|e| e.value().clone())
    }

    /// Drop the cached state so the next observation counts as a transition.
    pub fn forget(&self, identifier: &str) {
        self.entries.remove(identifier);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_is_a_transition() {
        let cache = JobCache::new();
        assert!(cache.observe("A", &JobDescriptor::new("police", true)));
        assert_eq!(cache.get("A"), Some(JobDescriptor::new("police", true)));
    }

    #[test]
    fn unchanged_state_is_not_a_transition() {
        let cache = JobCache::new();
        cache.observe("A", &JobDescriptor::new("police", true));
        assert!(!cache.observe("A", &JobDescriptor::new("police", true)));
    }

    #[test]
    fn duty_flag_or_name_change_is_a_transition() {
        let cache = JobCache::new();
        cache.observe("A", &JobDescriptor::new("police", true));
        assert!(cache.observe("A", &JobDescriptor::new("police", false)));
        assert!(cache.observe("A", &JobDescriptor::new("tow", false)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn forget_resets_to_unseen() {
        let cache = JobCache::new();
        cache.observe("A", &JobDescriptor::new("police", true));
        cache.forget("A");
        assert!(cache.is_empty());
        assert!(cache.observe("A", &JobDescriptor::new("police", true)));
    }
}
