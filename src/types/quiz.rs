use serde::{Deserialize, Serialize};

use crate::types::question::QuestionId;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct QuizId(pub i32);

/// A titled snapshot of question ids.
///
/// The ids are soft references into the question service. Nothing keeps
/// them alive there, so a later lookup may find a question gone.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    pub questions: Vec<QuestionId>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    pub category: String,
    pub no_of_questions: u32,
    pub title: String,
}
