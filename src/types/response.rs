use serde::{Deserialize, Serialize};

use crate::types::question::QuestionId;

/// A user's chosen option for one question.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: QuestionId,
    pub response_status: String,
}
