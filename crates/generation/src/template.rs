//! Deterministic template generator.
//!
//! The fallback when the content service is unavailable, and the fixture
//! generator for tests and the CLI. Plans come out as simple prerequisite
//! chains; the adaptive machinery downstream does not care how the graph was
//! produced.

use crate::plan::{GeneratedPlan, GenerationError, UnitDraft};
use crate::UnitGenerator;
use async_trait::async_trait;
use stride_core::TaskDifficulty;

/// Which template family to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Concept chain for a learning path
    ConceptPath,
    /// Work steps for a task breakdown
    TaskSteps,
}

/// Deterministic plan generator.
pub struct TemplateGenerator {
    kind: TemplateKind,
}

impl TemplateGenerator {
    /// Generator for learning-path concept chains.
    pub fn concept_path() -> Self {
        Self {
            kind: TemplateKind::ConceptPath,
        }
    }

    /// Generator for task-breakdown work steps.
    pub fn task_steps() -> Self {
        Self {
            kind: TemplateKind::TaskSteps,
        }
    }

    fn concept_plan(subject: &str) -> GeneratedPlan {
        let steps = [
            (
                format!("{} fundamentals", subject),
                30u32,
                TaskDifficulty::Easy,
            ),
            (
                format!("Core techniques in {}", subject),
                45,
                TaskDifficulty::Medium,
            ),
            (format!("Applying {}", subject), 45, TaskDifficulty::Medium),
            (format!("{} mastery check", subject), 30, TaskDifficulty::Hard),
        ];

        GeneratedPlan {
            rationale: format!(
                "Concept chain for {}: fundamentals first, then technique, application and a mastery check",
                subject
            ),
            units: chain(
                steps
                    .into_iter()
                    .map(|(title, minutes, difficulty)| UnitDraft {
                        description: format!("Study: {}", title),
                        title,
                        estimated_minutes: minutes,
                        difficulty,
                        prerequisites: vec![],
                        resources: vec![],
                    })
                    .collect(),
            ),
        }
    }

    fn steps_plan(description: &str) -> GeneratedPlan {
        let steps = [
            ("Review task requirements", 5u32, TaskDifficulty::Easy),
            ("Gather necessary materials", 10, TaskDifficulty::Easy),
            ("Complete main work", 30, TaskDifficulty::Medium),
            ("Review and check work", 10, TaskDifficulty::Medium),
            ("Final polish and submission", 5, TaskDifficulty::Easy),
        ];

        GeneratedPlan {
            rationale: format!(
                "Task '{}' broken down into manageable steps based on complexity",
                description
            ),
            units: chain(
                steps
                    .into_iter()
                    .map(|(title, minutes, difficulty)| UnitDraft {
                        title: title.to_string(),
                        description: format!("Step: {}", title),
                        estimated_minutes: minutes,
                        difficulty,
                        prerequisites: vec![],
                        resources: vec![],
                    })
                    .collect(),
            ),
        }
    }
}

/// Turn an ordered draft list into a strict prerequisite chain.
fn chain(mut units: Vec<UnitDraft>) -> Vec<UnitDraft> {
    for index in 1..units.len() {
        units[index].prerequisites = vec![index - 1];
    }
    units
}

#[async_trait]
impl UnitGenerator for TemplateGenerator {
    async fn generate(&self, description: &str) -> Result<GeneratedPlan, GenerationError> {
        let plan = match self.kind {
            TemplateKind::ConceptPath => Self::concept_plan(description),
            TemplateKind::TaskSteps => Self::steps_plan(description),
        };
        plan.validate()?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn task_steps_template_is_a_five_step_chain() {
        let plan = TemplateGenerator::task_steps()
            .generate("history essay")
            .await
            .unwrap();

        assert_eq!(plan.units.len(), 5);
        assert!(plan.units[0].prerequisites.is_empty());
        for index in 1..plan.units.len() {
            assert_eq!(plan.units[index].prerequisites, vec![index - 1]);
        }
        assert_eq!(plan.total_estimated_minutes(), 60);
    }

    #[tokio::test]
    async fn concept_path_template_names_the_subject() {
        let plan = TemplateGenerator::concept_path()
            .generate("algebra")
            .await
            .unwrap();

        assert_eq!(plan.units.len(), 4);
        assert!(plan.units[0].title.contains("algebra"));
        assert_eq!(plan.units[3].difficulty, TaskDifficulty::Hard);
    }
}
