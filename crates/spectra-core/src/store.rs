use chrono::{DateTime, Utc};

use crate::models::{
    AnalysisFilter, AnalysisTaskBasic, BuildStatus, ChannelInSet, ChannelsSet, SetPatch,
};

/// In-memory collection of channel sets, de-duplicated by id.
///
/// This is the single shared cache every view reads from; the synchronizer
/// in `spectra-client` is the only writer. Ordering is insertion order, and
/// rollback helpers restore entities at their original positions so a
/// failed operation leaves the collection byte-for-byte as it was.
#[derive(Debug, Default)]
pub struct SetsStore {
    sets: Vec<ChannelsSet>,
}

impl SetsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reads ───────────────────────────────────────────────────

    pub fn all(&self) -> &[ChannelsSet] {
        &self.sets
    }

    pub fn get(&self, id: &str) -> Option<&ChannelsSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sets.iter().position(|s| s.id == id)
    }

    /// Clone of the entity, captured as a rollback snapshot.
    pub fn snapshot(&self, id: &str) -> Option<ChannelsSet> {
        self.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    // ── Whole-entity writes ─────────────────────────────────────

    /// Replace the cached collection with a fresh server listing.
    pub fn replace_all(&mut self, sets: Vec<ChannelsSet>) {
        self.sets = sets;
    }

    /// Replace the entity with the same id, or append if absent.
    pub fn upsert(&mut self, set: ChannelsSet) {
        match self.position(&set.id) {
            Some(pos) => self.sets[pos] = set,
            None => self.sets.push(set),
        }
    }

    /// Append a provisional entity (optimistic create).
    pub fn insert(&mut self, set: ChannelsSet) {
        self.sets.push(set);
    }

    /// Swap a provisional entity for the authoritative one, matching by the
    /// temporary id. Appends if the provisional entry is already gone.
    pub fn reconcile_created(&mut self, temp_id: &str, set: ChannelsSet) {
        match self.position(temp_id) {
            Some(pos) => self.sets[pos] = set,
            None => self.sets.push(set),
        }
    }

    /// Remove the entity, returning it with its position for rollback.
    pub fn remove(&mut self, id: &str) -> Option<(usize, ChannelsSet)> {
        let pos = self.position(id)?;
        Some((pos, self.sets.remove(pos)))
    }

    /// Re-insert a removed entity at its original position.
    pub fn restore_at(&mut self, pos: usize, set: ChannelsSet) {
        let pos = pos.min(self.sets.len());
        self.sets.insert(pos, set);
    }

    /// Overwrite the entity matching the snapshot's id with the snapshot.
    pub fn restore(&mut self, snapshot: ChannelsSet) {
        self.upsert(snapshot);
    }

    // ── Field & membership writes ───────────────────────────────

    /// Shallow-merge a patch into the entity (optimistic update-set apply).
    pub fn apply_patch(&mut self, id: &str, patch: &SetPatch) {
        if let Some(pos) = self.position(id) {
            self.sets[pos].apply_patch(patch);
        }
    }

    pub fn set_build_status(&mut self, id: &str, status: BuildStatus) {
        if let Some(pos) = self.position(id) {
            self.sets[pos].build_status = Some(status);
        }
    }

    /// Append membership records for the given usernames, skipping any
    /// already present (usernames are unique within a set). Returns the
    /// usernames actually appended, for rollback.
    pub fn append_channels(
        &mut self,
        id: &str,
        usernames: &[String],
        added_at: DateTime<Utc>,
    ) -> Vec<String> {
        let Some(pos) = self.position(id) else {
            return Vec::new();
        };
        let set = &mut self.sets[pos];
        let mut appended = Vec::new();
        for username in usernames {
            if set.contains_channel(username) || appended.contains(username) {
                continue;
            }
            set.channels.push(ChannelInSet {
                username: username.clone(),
                is_parsed: false,
                added_at,
            });
            appended.push(username.clone());
        }
        set.recount();
        appended
    }

    /// Drop membership records by username (rollback of an optimistic add).
    pub fn drop_channels(&mut self, id: &str, usernames: &[String]) {
        if let Some(pos) = self.position(id) {
            let set = &mut self.sets[pos];
            set.channels.retain(|c| !usernames.contains(&c.username));
            set.recount();
        }
    }

    /// Remove the named channels, returning the exact records with their
    /// original positions so rollback can restore the original order.
    pub fn remove_channels(&mut self, id: &str, usernames: &[String]) -> Vec<(usize, ChannelInSet)> {
        let Some(pos) = self.position(id) else {
            return Vec::new();
        };
        let set = &mut self.sets[pos];
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(set.channels.len());
        for (idx, channel) in set.channels.drain(..).enumerate() {
            if usernames.contains(&channel.username) {
                removed.push((idx, channel));
            } else {
                kept.push(channel);
            }
        }
        set.channels = kept;
        set.recount();
        removed
    }

    /// Re-insert previously removed records at their original positions.
    /// Records whose username reappeared in the meantime are skipped so the
    /// uniqueness invariant holds even under interleaved mutations.
    pub fn restore_channels(&mut self, id: &str, removed: Vec<(usize, ChannelInSet)>) {
        if let Some(pos) = self.position(id) {
            let set = &mut self.sets[pos];
            // Ascending index order keeps later insertion points valid.
            for (idx, channel) in removed {
                if set.contains_channel(&channel.username) {
                    continue;
                }
                let idx = idx.min(set.channels.len());
                set.channels.insert(idx, channel);
            }
            set.recount();
        }
    }
}

/// In-memory collection of analysis filters (system and custom).
#[derive(Debug, Default)]
pub struct FiltersStore {
    filters: Vec<AnalysisFilter>,
}

impl FiltersStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[AnalysisFilter] {
        &self.filters
    }

    pub fn get(&self, id: &str) -> Option<&AnalysisFilter> {
        self.filters.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.filters.iter().position(|f| f.id == id)
    }

    pub fn replace_all(&mut self, filters: Vec<AnalysisFilter>) {
        self.filters = filters;
    }

    pub fn insert(&mut self, filter: AnalysisFilter) {
        self.filters.push(filter);
    }

    /// Swap a provisional filter for the server one, matching by temp id.
    pub fn reconcile_created(&mut self, temp_id: &str, filter: AnalysisFilter) {
        match self.position(temp_id) {
            Some(pos) => self.filters[pos] = filter,
            None => self.filters.push(filter),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<(usize, AnalysisFilter)> {
        let pos = self.position(id)?;
        Some((pos, self.filters.remove(pos)))
    }

    pub fn restore_at(&mut self, pos: usize, filter: AnalysisFilter) {
        let pos = pos.min(self.filters.len());
        self.filters.insert(pos, filter);
    }
}

/// In-memory collection of analysis task list rows.
#[derive(Debug, Default)]
pub struct TasksStore {
    tasks: Vec<AnalysisTaskBasic>,
}

impl TasksStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[AnalysisTaskBasic] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&AnalysisTaskBasic> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn replace_all(&mut self, tasks: Vec<AnalysisTaskBasic>) {
        self.tasks = tasks;
    }

    pub fn upsert(&mut self, task: AnalysisTaskBasic) {
        match self.tasks.iter().position(|t| t.id == task.id) {
            Some(pos) => self.tasks[pos] = task,
            None => self.tasks.push(task),
        }
    }
}
