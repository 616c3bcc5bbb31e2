use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct QuestionId(pub i32);

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub difficulty_level: String,
    pub category: String,
    #[serde(rename = "correctAns", alias = "correctAnswer")]
    pub correct_answer: String,
}

/// Body of an add request. The id is assigned by the store.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub question: Option<String>,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub difficulty_level: String,
    pub category: String,
    #[serde(rename = "correctAns", alias = "correctAnswer")]
    pub correct_answer: String,
}

/// Partial update. `None` leaves the stored field alone.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    pub question: Option<String>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub option4: Option<String>,
    pub difficulty_level: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "correctAns", alias = "correctAnswer")]
    pub correct_answer: Option<String>,
}

/// One field of a question that an update would rewrite, with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Question(String),
    Option1(String),
    Option2(String),
    Option3(String),
    Option4(String),
    DifficultyLevel(String),
    Category(String),
    CorrectAnswer(String),
}

impl QuestionUpdate {
    /// Every supplied field whose value differs from `current`.
    ///
    /// Fields are compared independently and `current` is left untouched.
    pub fn diff(&self, current: &Question) -> Vec<FieldChange> {
        fn changed(patch: &Option<String>, stored: &str) -> Option<String> {
            patch.as_deref().filter(|value| *value != stored).map(str::to_owned)
        }

        [
            changed(&self.question, &current.question).map(FieldChange::Question),
            changed(&self.option1, &current.option1).map(FieldChange::Option1),
            changed(&self.option2, &current.option2).map(FieldChange::Option2),
            changed(&self.option3, &current.option3).map(FieldChange::Option3),
            changed(&self.option4, &current.option4).map(FieldChange::Option4),
            changed(&self.category, &current.category).map(FieldChange::Category),
            changed(&self.difficulty_level, &current.difficulty_level).map(FieldChange::DifficultyLevel),
            changed(&self.correct_answer, &current.correct_answer).map(FieldChange::CorrectAnswer),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Question {
    pub fn apply(&mut self, changes: Vec<FieldChange>) {
        for change in changes {
            match change {
                FieldChange::Question(value) => self.question = value,
                FieldChange::Option1(value) => self.option1 = value,
                FieldChange::Option2(value) => self.option2 = value,
                FieldChange::Option3(value) => self.option3 = value,
                FieldChange::Option4(value) => self.option4 = value,
                FieldChange::DifficultyLevel(value) => self.difficulty_level = value,
                FieldChange::Category(value) => self.category = value,
                FieldChange::CorrectAnswer(value) => self.correct_answer = value,
            }
        }
    }
}

/// Answer-free view of a question, safe to hand to quiz takers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QuestionWrapper {
    pub id: QuestionId,
    pub question: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
}

impl From<Question> for QuestionWrapper {
    fn from(q: Question) -> Self {
        QuestionWrapper {
            id: q.id,
            question: q.question,
            option1: q.option1,
            option2: q.option2,
            option3: q.option3,
            option4: q.option4,
        }
    }
}
