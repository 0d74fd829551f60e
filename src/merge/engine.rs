//! Collapsing duplicate groups into single records.

use crate::index::ContactIndex;
use crate::models::{Record, RecordKey};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// How a merge pass treats groups that share records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Coalesce overlapping groups into one before merging, so no two merged
    /// records in a pass are built from the same original.
    #[default]
    Transitive,

    /// Merge each group on its own, in the order given.
    PerGroup,
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transitive" => Ok(Self::Transitive),
            "per_group" | "per-group" => Ok(Self::PerGroup),
            other => Err(format!(
                "expected \"transitive\" or \"per_group\", got: {}",
                other
            )),
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transitive => write!(f, "transitive"),
            Self::PerGroup => write!(f, "per_group"),
        }
    }
}

/// Outcome of a merge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Records folded away: group size minus one, summed over applied groups
    pub merged: usize,

    /// Groups left untouched because their merged key belongs to a record
    /// outside the group
    pub skipped: usize,

    /// The records inserted by this pass, one per applied group
    pub records: Vec<Record>,
}

/// Fold a group left to right with [`Record::merge_with`].
///
/// Returns `None` for an empty group.
pub fn merge_group(group: &[Record]) -> Option<Record> {
    let (first, rest) = group.split_first()?;
    Some(
        rest.iter()
            .fold(first.clone(), |merged, record| merged.merge_with(record)),
    )
}

/// Applies duplicate groups to an index.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    strategy: MergeStrategy,
}

impl MergeEngine {
    /// Create an engine with the given strategy.
    pub fn new(strategy: MergeStrategy) -> Self {
        Self { strategy }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Merge every group of two or more records into the index.
    ///
    /// For each group the members are deleted by exact key and the merged
    /// record is inserted. Groups of fewer than two records are ignored. A
    /// group is skipped before anything is deleted, and counted in
    /// [`MergeReport::skipped`], when its merged key belongs to a record
    /// outside the group or when it shares a key with a group already
    /// applied in this pass.
    pub fn merge_duplicates(&self, index: &mut ContactIndex, groups: &[Vec<Record>]) -> MergeReport {
        let groups = match self.strategy {
            MergeStrategy::Transitive => coalesce(groups),
            MergeStrategy::PerGroup => groups.to_vec(),
        };

        let mut report = MergeReport::default();
        // Keys deleted or inserted by earlier groups of this pass
        let mut touched: HashSet<RecordKey> = HashSet::new();
        for group in groups.iter().filter(|group| group.len() > 1) {
            let Some(merged) = merge_group(group) else {
                continue;
            };

            let merged_key = merged.key();
            let stale = touched.contains(&merged_key)
                || group.iter().any(|member| touched.contains(&member.key()));
            let collides = stale
                || (index.contains(&merged_key)
                    && !group.iter().any(|member| member.same_key(&merged)));
            if collides {
                tracing::warn!(
                    key = %merged_key,
                    members = group.len(),
                    "Merge skipped: merged key belongs to another contact"
                );
                report.skipped += 1;
                continue;
            }

            for member in group {
                index.delete(&member.name, &member.phone, &member.email);
                touched.insert(member.key());
            }
            index.insert(merged.clone());
            touched.insert(merged_key.clone());

            tracing::debug!(key = %merged_key, members = group.len(), "Merged duplicate group");
            report.merged += group.len() - 1;
            report.records.push(merged);
        }

        tracing::info!(
            strategy = %self.strategy,
            merged = report.merged,
            skipped = report.skipped,
            "Merge pass completed"
        );
        report
    }
}

/// Union groups that share any record (by exact key).
///
/// Each resulting group lists its members in order of first appearance
/// across the input, and groups come out in order of their first member.
pub fn coalesce(groups: &[Vec<Record>]) -> Vec<Vec<Record>> {
    let mut ids: HashMap<RecordKey, usize> = HashMap::new();
    let mut members: Vec<&Record> = Vec::new();
    let mut sets = DisjointSets::default();

    for group in groups {
        let mut first_id = None;
        for record in group {
            let id = *ids.entry(record.key()).or_insert_with(|| {
                members.push(record);
                sets.make_set()
            });
            match first_id {
                None => first_id = Some(id),
                Some(first) => sets.union(first, id),
            }
        }
    }

    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut coalesced: Vec<Vec<Record>> = Vec::new();
    for (id, record) in members.into_iter().enumerate() {
        let root = sets.find(id);
        let slot = *slots.entry(root).or_insert_with(|| {
            coalesced.push(Vec::new());
            coalesced.len() - 1
        });
        coalesced[slot].push(record.clone());
    }
    coalesced
}

/// Union-find over dense ids.
#[derive(Debug, Default)]
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn make_set(&mut self) -> usize {
        self.parent.push(self.parent.len());
        self.parent.len() - 1
    }

    fn find(&mut self, mut id: usize) -> usize {
        while self.parent[id] != id {
            self.parent[id] = self.parent[self.parent[id]];
            id = self.parent[id];
        }
        id
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a != b {
            // keep the earlier id as root so output order follows first appearance
            let (root, child) = if a < b { (a, b) } else { (b, a) };
            self.parent[child] = root;
        }
    }
}
