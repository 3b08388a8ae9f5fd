//! Feature dependency graph for a single roadmap.
//!
//! Each feature lists the ids of the features it depends on. Edges run from
//! the dependency to the dependent feature. Two analyses are provided:
//!
//! - [`analyze`] splits features into "ready to start" and "blocked".
//! - [`critical_path`] finds the longest dependency chain. It uses
//!   memoized DFS with path-local marking, so each node is expanded once
//!   (O(V+E)) and a cycle stops the walk with [`CoreError::DependencyCycle`].
//!
//! References to ids outside the supplied feature set are dangling. They are
//! reported back to the caller and otherwise ignored.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roadmap::FEATURE_STATUS_COMPLETED;
use crate::types::DbId;

/// The slice of a feature the graph needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureNode {
    pub id: DbId,
    pub status: String,
    pub effort: i32,
    pub dependencies: Vec<DbId>,
}

/// A dependency id that does not resolve to a feature in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub feature_id: DbId,
    pub missing_id: DbId,
}

/// A feature waiting on at least one unfinished dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedFeature {
    pub feature_id: DbId,
    /// Existing dependencies whose status is not `completed`.
    pub blocking: Vec<DbId>,
}

/// Readiness split of a roadmap's features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyAnalysis {
    pub ready: Vec<DbId>,
    pub blocked: Vec<BlockedFeature>,
    pub dangling: Vec<DanglingReference>,
}

/// Longest chain of dependency edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    /// Feature ids from the root of the chain to its end.
    pub features: Vec<DbId>,
    pub edge_count: usize,
    /// Sum of `effort` along the chain.
    pub total_effort: i64,
    pub dangling: Vec<DanglingReference>,
}

/// Classify every feature as ready or blocked.
///
/// A feature is ready when its dependency list is empty or every existing
/// dependency is completed. It is blocked when at least one existing
/// dependency is not completed. The feature's own status plays no part.
pub fn analyze(features: &[FeatureNode]) -> DependencyAnalysis {
    let status_by_id: HashMap<DbId, &str> = features
        .iter()
        .map(|f| (f.id, f.status.as_str()))
        .collect();

    let mut ready = Vec::new();
    let mut blocked = Vec::new();
    let mut dangling = Vec::new();

    for feature in features {
        let mut blocking = Vec::new();
        for dep in unique(&feature.dependencies) {
            match status_by_id.get(&dep) {
                None => dangling.push(DanglingReference {
                    feature_id: feature.id,
                    missing_id: dep,
                }),
                Some(status) if *status != FEATURE_STATUS_COMPLETED => blocking.push(dep),
                Some(_) => {}
            }
        }

        if blocking.is_empty() {
            ready.push(feature.id);
        } else {
            blocked.push(BlockedFeature {
                feature_id: feature.id,
                blocking,
            });
        }
    }

    DependencyAnalysis {
        ready,
        blocked,
        dangling,
    }
}

/// Features that `completed_id` was the last unfinished dependency of.
///
/// `before` is the feature set prior to the status change. Used to announce
/// features that just became ready.
pub fn newly_ready(before: &[FeatureNode], completed_id: DbId) -> Vec<DbId> {
    let after: Vec<FeatureNode> = before
        .iter()
        .map(|f| {
            let mut f = f.clone();
            if f.id == completed_id {
                f.status = FEATURE_STATUS_COMPLETED.to_string();
            }
            f
        })
        .collect();

    let was_blocked: HashSet<DbId> = analyze(before)
        .blocked
        .into_iter()
        .map(|b| b.feature_id)
        .collect();

    analyze(&after)
        .ready
        .into_iter()
        .filter(|id| was_blocked.contains(id))
        .collect()
}

/// Compute the longest dependency chain among `features`.
///
/// Returns `CoreError::DependencyCycle` listing the features on the first
/// cycle found. An empty feature set yields an empty path.
pub fn critical_path(features: &[FeatureNode]) -> Result<CriticalPath, CoreError> {
    let graph = Graph::build(features);
    let n = features.len();

    let mut marks = vec![Mark::Unvisited; n];
    let mut longest = vec![Longest::default(); n];
    let mut trail = Vec::new();

    for node in 0..n {
        if marks[node] == Mark::Unvisited {
            graph
                .visit(node, &mut marks, &mut longest, &mut trail)
                .map_err(|cycle| CoreError::DependencyCycle {
                    cycle: cycle.into_iter().map(|idx| features[idx].id).collect(),
                })?;
        }
    }

    // In an acyclic graph the longest chain always starts at a root.
    let start = (0..n)
        .filter(|&idx| graph.in_degree[idx] == 0)
        .fold(None::<usize>, |best, idx| match best {
            Some(b) if longest[b].nodes >= longest[idx].nodes => Some(b),
            _ => Some(idx),
        });

    let mut path = Vec::new();
    let mut cursor = start;
    while let Some(idx) = cursor {
        path.push(idx);
        cursor = longest[idx].next;
    }

    Ok(CriticalPath {
        features: path.iter().map(|&idx| features[idx].id).collect(),
        edge_count: path.len().saturating_sub(1),
        total_effort: path.iter().map(|&idx| i64::from(features[idx].effort)).sum(),
        dangling: graph.dangling,
    })
}

/* --------------------------------------------------------------------------
Graph internals
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Longest chain starting at a node: node count and the next hop.
#[derive(Debug, Clone, Copy)]
struct Longest {
    nodes: usize,
    next: Option<usize>,
}

impl Default for Longest {
    fn default() -> Self {
        Self {
            nodes: 1,
            next: None,
        }
    }
}

struct Graph {
    /// `dependents[i]` holds the indices of features that depend on feature `i`.
    dependents: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    dangling: Vec<DanglingReference>,
}

impl Graph {
    fn build(features: &[FeatureNode]) -> Self {
        let index: HashMap<DbId, usize> = features
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.id, idx))
            .collect();

        let mut dependents = vec![Vec::new(); features.len()];
        let mut in_degree = vec![0; features.len()];
        let mut dangling = Vec::new();

        for (idx, feature) in features.iter().enumerate() {
            for dep in unique(&feature.dependencies) {
                match index.get(&dep) {
                    Some(&dep_idx) => {
                        dependents[dep_idx].push(idx);
                        in_degree[idx] += 1;
                    }
                    None => dangling.push(DanglingReference {
                        feature_id: feature.id,
                        missing_id: dep,
                    }),
                }
            }
        }

        Self {
            dependents,
            in_degree,
            dangling,
        }
    }

    /// Fill `longest[node]`, recursing into dependents.
    ///
    /// `trail` is the current DFS path; meeting a node still on it is a
    /// cycle, returned as the slice of the trail from that node onward.
    ///
    /// Recursion depth equals the longest chain, bounded by the number of
    /// features in one roadmap. Chains of many thousands of links would need
    /// an explicit stack instead.
    fn visit(
        &self,
        node: usize,
        marks: &mut [Mark],
        longest: &mut [Longest],
        trail: &mut Vec<usize>,
    ) -> Result<(), Vec<usize>> {
        marks[node] = Mark::OnPath;
        trail.push(node);

        let mut best = Longest::default();
        for &child in &self.dependents[node] {
            match marks[child] {
                Mark::OnPath => {
                    let from = trail.iter().position(|&n| n == child).unwrap_or(0);
                    return Err(trail[from..].to_vec());
                }
                Mark::Unvisited => self.visit(child, marks, longest, trail)?,
                Mark::Done => {}
            }
            if longest[child].nodes + 1 > best.nodes {
                best = Longest {
                    nodes: longest[child].nodes + 1,
                    next: Some(child),
                };
            }
        }

        longest[node] = best;
        marks[node] = Mark::Done;
        trail.pop();
        Ok(())
    }
}

/// Dependencies with duplicates removed, first occurrence kept.
fn unique(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
