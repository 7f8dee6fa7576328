use leia_models::{Criteria, MessageRequest, SchemaDetails, TransformationTarget};
use serde_json::Value;
use tracing::warn;

use crate::path::CompiledPath;

/// Decides whether a transformation target applies to a request.
pub trait TargetValidator: Send + Sync {
    fn validate(
        &self,
        target: &TransformationTarget,
        request: &MessageRequest,
        source: &SchemaDetails,
    ) -> bool;
}

/// Every target is eligible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEligible;

impl TargetValidator for AlwaysEligible {
    fn validate(&self, _: &TransformationTarget, _: &MessageRequest, _: &SchemaDetails) -> bool {
        true
    }
}

/// [`Criteria`] with every path compiled.
#[derive(Debug, Clone)]
pub enum CompiledCriteria {
    And(Vec<CompiledCriteria>),
    Or(Vec<CompiledCriteria>),
    Not(Box<CompiledCriteria>),
    Equals { path: CompiledPath, value: Value },
    Exists { path: CompiledPath },
    In { path: CompiledPath, values: Vec<Value> },
}

impl CompiledCriteria {
    /// Compile every path of `criteria` with `compile`, stopping at the first failure.
    pub fn compile<E, F>(criteria: &Criteria, compile: &F) -> Result<Self, E>
    where
        F: Fn(&str) -> Result<CompiledPath, E>,
    {
        let all = |criteria: &[Criteria]| {
            criteria
                .iter()
                .map(|nested| Self::compile(nested, compile))
                .collect::<Result<Vec<_>, E>>()
        };
        Ok(match criteria {
            Criteria::And { criteria } => CompiledCriteria::And(all(criteria)?),
            Criteria::Or { criteria } => CompiledCriteria::Or(all(criteria)?),
            Criteria::Not { criteria } => {
                CompiledCriteria::Not(Box::new(Self::compile(criteria, compile)?))
            }
            Criteria::Equals { path, value } => CompiledCriteria::Equals {
                path: compile(path)?,
                value: value.clone(),
            },
            Criteria::Exists { path } => CompiledCriteria::Exists {
                path: compile(path)?,
            },
            Criteria::In { path, values } => CompiledCriteria::In {
                path: compile(path)?,
                values: values.clone(),
            },
        })
    }

    pub fn matches(&self, message: &Value) -> bool {
        match self {
            CompiledCriteria::And(criteria) => criteria.iter().all(|c| c.matches(message)),
            CompiledCriteria::Or(criteria) => criteria.iter().any(|c| c.matches(message)),
            CompiledCriteria::Not(criteria) => !criteria.matches(message),
            CompiledCriteria::Equals { path, value } => {
                path.extract(message).is_some_and(|found| found == *value)
            }
            CompiledCriteria::Exists { path } => path.extract(message).is_some(),
            CompiledCriteria::In { path, values } => path
                .extract(message)
                .is_some_and(|found| values.contains(&found)),
        }
    }
}

/// Evaluates a target's [`Criteria`] against the source message.
///
/// A target without criteria is eligible. Paths are compiled on every call;
/// the multiplexing client evaluates the criteria it compiled at setup instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaTargetValidator;

impl CriteriaTargetValidator {
    pub fn evaluate(criteria: &Criteria, message: &Value) -> bool {
        match CompiledCriteria::compile(criteria, &|expression: &str| {
            CompiledPath::compile(expression).map_err(|err| (expression.to_owned(), err))
        }) {
            Ok(compiled) => compiled.matches(message),
            Err((expression, err)) => {
                warn!(
                    expression = %expression,
                    error = %err,
                    "criteria path does not compile, treating as no match"
                );
                false
            }
        }
    }
}

impl TargetValidator for CriteriaTargetValidator {
    fn validate(
        &self,
        target: &TransformationTarget,
        request: &MessageRequest,
        _: &SchemaDetails,
    ) -> bool {
        target
            .criteria
            .as_ref()
            .is_none_or(|criteria| Self::evaluate(criteria, &request.message))
    }
}
