//! Generated unit plans and their construction-time validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stride_core::TaskDifficulty;

/// Errors from plan generation or validation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The generator returned no units
    #[error("generated plan contains no units")]
    EmptyPlan,

    /// A prerequisite index points outside the plan
    #[error("unit {index} references unknown prerequisite index {reference}")]
    UnknownPrerequisite {
        /// Position of the referencing unit
        index: usize,
        /// The out-of-range reference
        reference: usize,
    },

    /// A unit lists itself as a prerequisite
    #[error("unit {index} depends on itself")]
    SelfDependency {
        /// Position of the offending unit
        index: usize,
    },

    /// The prerequisite graph contains a cycle. Cyclic input is a fatal
    /// construction error, never a runtime condition to resolve.
    #[error("prerequisite cycle through unit indices {chain:?}")]
    CyclicDependencies {
        /// Unit indices forming the cycle
        chain: Vec<usize>,
    },

    /// The content service failed or returned garbage
    #[error("content service error: {0}")]
    Service(String),
}

/// One unit in a generated plan, before ids are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDraft {
    /// Short imperative title (or concept name for path nodes)
    pub title: String,

    /// What to do or learn
    pub description: String,

    /// Estimated minutes
    pub estimated_minutes: u32,

    /// Difficulty tier
    pub difficulty: TaskDifficulty,

    /// Prerequisites as indices into the plan's unit list
    pub prerequisites: Vec<usize>,

    /// Helpful links or resource references
    pub resources: Vec<String>,
}

/// An ordered unit plan produced by a generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlan {
    /// Generator's explanation of the split
    pub rationale: String,

    /// Units in display order; prerequisites reference earlier (or later)
    /// entries by index
    pub units: Vec<UnitDraft>,
}

impl GeneratedPlan {
    /// Sum of the units' estimated minutes.
    pub fn total_estimated_minutes(&self) -> u32 {
        self.units.iter().map(|u| u.estimated_minutes).sum()
    }

    /// Validate the plan: non-empty, all prerequisite references in range,
    /// no self-references, and the reference graph is acyclic.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.units.is_empty() {
            return Err(GenerationError::EmptyPlan);
        }

        for (index, unit) in self.units.iter().enumerate() {
            for &reference in &unit.prerequisites {
                if reference >= self.units.len() {
                    return Err(GenerationError::UnknownPrerequisite { index, reference });
                }
                if reference == index {
                    return Err(GenerationError::SelfDependency { index });
                }
            }
        }

        // DFS with a recursion stack over the index graph.
        let mut visited: HashSet<usize> = HashSet::new();
        let mut stack: HashSet<usize> = HashSet::new();
        for start in 0..self.units.len() {
            if !visited.contains(&start) {
                if let Some(chain) =
                    self.find_cycle(start, &mut visited, &mut stack, &mut Vec::new())
                {
                    return Err(GenerationError::CyclicDependencies { chain });
                }
            }
        }

        Ok(())
    }

    fn find_cycle(
        &self,
        node: usize,
        visited: &mut HashSet<usize>,
        stack: &mut HashSet<usize>,
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        visited.insert(node);
        stack.insert(node);
        path.push(node);

        for &dep in &self.units[node].prerequisites {
            if !visited.contains(&dep) {
                if let Some(chain) = self.find_cycle(dep, visited, stack, path) {
                    return Some(chain);
                }
            } else if stack.contains(&dep) {
                let cycle_start = path.iter().position(|&i| i == dep).unwrap_or(0);
                return Some(path[cycle_start..].to_vec());
            }
        }

        path.pop();
        stack.remove(&node);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(prerequisites: Vec<usize>) -> UnitDraft {
        UnitDraft {
            title: "step".to_string(),
            description: "do the step".to_string(),
            estimated_minutes: 10,
            difficulty: TaskDifficulty::Medium,
            prerequisites,
            resources: vec![],
        }
    }

    fn plan(units: Vec<UnitDraft>) -> GeneratedPlan {
        GeneratedPlan {
            rationale: "test".to_string(),
            units,
        }
    }

    #[test]
    fn empty_plan_is_rejected() {
        assert!(matches!(
            plan(vec![]).validate(),
            Err(GenerationError::EmptyPlan)
        ));
    }

    #[test]
    fn valid_chain_passes() {
        let p = plan(vec![draft(vec![]), draft(vec![0]), draft(vec![1])]);
        assert!(p.validate().is_ok());
        assert_eq!(p.total_estimated_minutes(), 30);
    }

    #[test]
    fn out_of_range_reference_is_rejected() {
        let p = plan(vec![draft(vec![]), draft(vec![7])]);
        assert!(matches!(
            p.validate(),
            Err(GenerationError::UnknownPrerequisite {
                index: 1,
                reference: 7
            })
        ));
    }

    #[test]
    fn self_dependency_is_rejected() {
        let p = plan(vec![draft(vec![0])]);
        assert!(matches!(
            p.validate(),
            Err(GenerationError::SelfDependency { index: 0 })
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        // 0 -> 1 -> 2 -> 0
        let p = plan(vec![draft(vec![2]), draft(vec![0]), draft(vec![1])]);
        match p.validate() {
            Err(GenerationError::CyclicDependencies { chain }) => {
                assert!(!chain.is_empty());
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        // 1 and 2 both depend on 0; 3 depends on both.
        let p = plan(vec![
            draft(vec![]),
            draft(vec![0]),
            draft(vec![0]),
            draft(vec![1, 2]),
        ]);
        assert!(p.validate().is_ok());
    }
}
