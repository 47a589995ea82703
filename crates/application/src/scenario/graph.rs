//! Scenario dependency graph
//!
//! Resolved once per suite, before anything runs. The plan fixes the
//! execution order, the transitive dependents of every scenario and the
//! chains (connected components) that are handed to workers.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

/// Reasons a suite cannot be planned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two scenarios share a name.
    #[error("suite '{suite}' declares scenario '{name}' more than once")]
    DuplicateScenario {
        /// Suite name.
        suite: String,
        /// Repeated scenario name.
        name: String,
    },

    /// A scenario depends on a name that is not declared.
    #[error("scenario '{scenario}' in suite '{suite}' depends on unknown scenario '{dependency}'")]
    UnknownDependency {
        /// Suite name.
        suite: String,
        /// Declaring scenario.
        scenario: String,
        /// Missing predecessor.
        dependency: String,
    },

    /// The dependencies loop.
    #[error("suite '{suite}' has a dependency cycle through: {}", scenarios.join(", "))]
    Cycle {
        /// Suite name.
        suite: String,
        /// Scenarios that could not be ordered, in declaration order.
        scenarios: Vec<String>,
    },
}

/// The resolved execution plan of one suite.
///
/// Scenarios are referred to by their declaration index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    order: Vec<usize>,
    dependents: Vec<Vec<usize>>,
    chains: Vec<Vec<usize>>,
}

impl ExecutionPlan {
    /// Resolves `(name, predecessors)` pairs given in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate names, unknown predecessors or cycles.
    pub fn resolve<'a, I>(suite: &str, nodes: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let nodes: Vec<(&str, &[String])> = nodes.into_iter().collect();
        let n = nodes.len();

        let mut index = HashMap::with_capacity(n);
        for (i, (name, _)) in nodes.iter().enumerate() {
            if index.insert(*name, i).is_some() {
                return Err(GraphError::DuplicateScenario {
                    suite: suite.to_string(),
                    name: (*name).to_string(),
                });
            }
        }

        let mut direct = vec![Vec::new(); n];
        let mut indegree = vec![0usize; n];
        let mut components = UnionFind::new(n);
        for (i, (name, deps)) in nodes.iter().enumerate() {
            for dep in *deps {
                let &d = index
                    .get(dep.as_str())
                    .ok_or_else(|| GraphError::UnknownDependency {
                        suite: suite.to_string(),
                        scenario: (*name).to_string(),
                        dependency: dep.clone(),
                    })?;
                direct[d].push(i);
                indegree[i] += 1;
                components.union(d, i);
            }
        }

        // Kahn's algorithm; the lowest declaration index wins among ready nodes.
        let mut remaining = indegree.clone();
        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| remaining[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop_first() {
            order.push(i);
            for &d in &direct[i] {
                remaining[d] -= 1;
                if remaining[d] == 0 {
                    ready.insert(d);
                }
            }
        }
        if order.len() < n {
            return Err(GraphError::Cycle {
                suite: suite.to_string(),
                scenarios: (0..n)
                    .filter(|&i| remaining[i] > 0)
                    .map(|i| nodes[i].0.to_string())
                    .collect(),
            });
        }

        let mut position = vec![0usize; n];
        for (pos, &i) in order.iter().enumerate() {
            position[i] = pos;
        }

        let dependents = (0..n)
            .map(|i| {
                let mut seen = BTreeSet::new();
                let mut stack = direct[i].clone();
                while let Some(d) = stack.pop() {
                    if seen.insert(d) {
                        stack.extend(direct[d].iter().copied());
                    }
                }
                let mut all: Vec<usize> = seen.into_iter().collect();
                all.sort_by_key(|&d| position[d]);
                all
            })
            .collect();

        let mut chain_of_root: HashMap<usize, usize> = HashMap::new();
        let mut chains: Vec<Vec<usize>> = Vec::new();
        for &i in &order {
            let root = components.find(i);
            let chain = *chain_of_root.entry(root).or_insert_with(|| {
                chains.push(Vec::new());
                chains.len() - 1
            });
            chains[chain].push(i);
        }

        Ok(Self {
            order,
            dependents,
            chains,
        })
    }

    /// Every scenario in execution order.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Scenarios that directly or indirectly depend on `index`, in execution
    /// order.
    #[must_use]
    pub fn dependents(&self, index: usize) -> &[usize] {
        self.dependents.get(index).map_or(&[], Vec::as_slice)
    }

    /// Independent groups of scenarios, each in execution order.
    #[must_use]
    pub fn chains(&self) -> &[Vec<usize>] {
        &self.chains
    }

    /// Number of scenarios in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the suite has no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan(nodes: &[(&str, &[&str])]) -> Result<ExecutionPlan, GraphError> {
        let owned: Vec<(&str, Vec<String>)> = nodes
            .iter()
            .map(|(name, deps)| (*name, deps.iter().map(|d| (*d).to_string()).collect()))
            .collect();
        ExecutionPlan::resolve("Suite", owned.iter().map(|(n, d)| (*n, d.as_slice())))
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        let plan = plan(&[
            ("get_user", &["create_user"]),
            ("list", &[]),
            ("create_user", &[]),
        ])
        .unwrap();

        assert_eq!(plan.order(), &[1, 2, 0]);
    }

    #[test]
    fn test_transitive_dependents() {
        let plan = plan(&[
            ("create", &[]),
            ("get", &["create"]),
            ("update", &["create"]),
            ("delete", &["update"]),
            ("list", &[]),
        ])
        .unwrap();

        assert_eq!(plan.dependents(0), &[1, 2, 3]);
        assert_eq!(plan.dependents(2), &[3]);
        assert!(plan.dependents(4).is_empty());
        assert!(plan.dependents(99).is_empty());
    }

    #[test]
    fn test_chains_are_connected_components() {
        let plan = plan(&[
            ("create", &[]),
            ("get", &["create"]),
            ("list", &[]),
            ("update", &["create"]),
            ("by_status", &[]),
            ("delete", &["update"]),
        ])
        .unwrap();

        assert_eq!(plan.chains(), &[vec![0, 1, 3, 5], vec![2], vec![4]]);
        assert_eq!(plan.len(), 6);
    }

    #[test]
    fn test_diamond_joins_one_chain() {
        let plan = plan(&[
            ("a", &[]),
            ("b", &[]),
            ("c", &["a", "b"]),
        ])
        .unwrap();

        assert_eq!(plan.chains(), &[vec![0, 1, 2]]);
        assert_eq!(plan.dependents(1), &[2]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let err = plan(&[("a", &[]), ("a", &[])]).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateScenario {
                suite: "Suite".to_string(),
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_dependency_is_rejected() {
        let err = plan(&[("a", &["ghost"])]).unwrap_err();
        assert!(matches!(err, GraphError::UnknownDependency { dependency, .. } if dependency == "ghost"));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let err = plan(&[("a", &["c"]), ("b", &[]), ("c", &["a"])]).unwrap_err();
        assert_eq!(
            err,
            GraphError::Cycle {
                suite: "Suite".to_string(),
                scenarios: vec!["a".to_string(), "c".to_string()]
            }
        );
        assert!(err.to_string().contains("a, c"));
    }

    #[test]
    fn test_empty_suite() {
        let plan = plan(&[]).unwrap();
        assert!(plan.is_empty());
        assert!(plan.chains().is_empty());
    }
}
