use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Admin,
    Evaluator,
    Evaluatee,
}

impl UserRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Evaluator => "evaluator",
            Self::Evaluatee => "evaluatee",
        }
    }
}

/// Lifecycle of a result row: seeded as `draft`, `submitted` once the evaluatee
/// scores it, `evaluated` once an evaluator has scored it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "resultstatus", rename_all = "lowercase")]
pub(crate) enum ResultStatus {
    Draft,
    Submitted,
    Evaluated,
}

/// Which column of a result row a score write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScoreKind {
    SelfScore,
    EvaluatorScore,
}

impl ScoreKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::SelfScore => "self_score",
            Self::EvaluatorScore => "evaluator_score",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_value(UserRole::Evaluatee).unwrap(), "evaluatee");
        let role: UserRole = serde_json::from_value(serde_json::json!("admin")).unwrap();
        assert_eq!(role, UserRole::Admin);
        assert!(serde_json::from_value::<UserRole>(serde_json::json!("teacher")).is_err());
    }

    #[test]
    fn result_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ResultStatus::Draft).unwrap(), "draft");
        assert_eq!(serde_json::to_value(ResultStatus::Evaluated).unwrap(), "evaluated");
    }
}
