use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::types::{
    question::{NewQuestion, Question, QuestionId},
    quiz::{Quiz, QuizId},
};

/// Persistence seam for questions. Every call can fail.
#[async_trait]
pub trait QuestionRepository: Clone + Send + Sync + 'static {
    async fn all(&self) -> Result<Vec<Question>, Error>;
    async fn by_category(&self, category: &str) -> Result<Vec<Question>, Error>;
    async fn by_difficulty(&self, level: &str) -> Result<Vec<Question>, Error>;
    async fn by_category_and_difficulty(
        &self,
        category: &str,
        level: &str,
    ) -> Result<Vec<Question>, Error>;
    async fn exists(&self, id: QuestionId) -> Result<bool, Error>;
    async fn exists_by_text(&self, text: &str) -> Result<bool, Error>;
    async fn get(&self, id: QuestionId) -> Result<Option<Question>, Error>;
    async fn insert(&self, text: String, question: NewQuestion) -> Result<Question, Error>;
    async fn save(&self, question: Question) -> Result<(), Error>;
    async fn delete(&self, id: QuestionId) -> Result<(), Error>;
    /// Up to `count` distinct ids from `category`, chosen uniformly.
    async fn random_ids(&self, category: &str, count: usize) -> Result<Vec<QuestionId>, Error>;
}

#[derive(Clone)]
pub struct Store {
    pub questions: Arc<RwLock<HashMap<QuestionId, Question>>>,
    // wider than the id so the counter itself never wraps
    next_id: Arc<AtomicI64>,
}

impl Store {
    pub fn new() -> Self {
        Store::with_questions(Vec::new())
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        let next_id = i64::from(Store::highest_id(&questions)) + 1;
        Store {
            questions: Arc::new(RwLock::new(
                questions.into_iter().map(|q| (q.id, q)).collect(),
            )),
            next_id: Arc::new(AtomicI64::new(next_id)),
        }
    }

    /// Loads a JSON array of questions.
    ///
    /// Fails when the highest seeded id leaves no id for new questions.
    pub fn from_seed(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = std::fs::read_to_string(path).map_err(Error::Seed)?;
        let questions: Vec<Question> = serde_json::from_str(&file).map_err(Error::SeedFormat)?;
        let highest = Store::highest_id(&questions);
        if highest.checked_add(1).is_none() {
            return Err(Error::SeedIdOverflow(QuestionId(highest)));
        }
        Ok(Store::with_questions(questions))
    }

    fn highest_id(questions: &[Question]) -> i32 {
        questions.iter().map(|q| q.id.0).max().unwrap_or(0)
    }

    async fn filtered<F>(&self, keep: F) -> Vec<Question>
    where
        F: Fn(&Question) -> bool + Send,
    {
        let mut res: Vec<Question> = self
            .questions
            .read()
            .await
            .values()
            .filter(|q| keep(q))
            .cloned()
            .collect();
        res.sort_by_key(|q| q.id);
        res
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

#[async_trait]
impl QuestionRepository for Store {
    async fn all(&self) -> Result<Vec<Question>, Error> {
        Ok(self.filtered(|_| true).await)
    }

    async fn by_category(&self, category: &str) -> Result<Vec<Question>, Error> {
        Ok(self.filtered(|q| q.category == category).await)
    }

    async fn by_difficulty(&self, level: &str) -> Result<Vec<Question>, Error> {
        Ok(self.filtered(|q| q.difficulty_level == level).await)
    }

    async fn by_category_and_difficulty(
        &self,
        category: &str,
        level: &str,
    ) -> Result<Vec<Question>, Error> {
        Ok(self
            .filtered(|q| q.category == category && q.difficulty_level == level)
            .await)
    }

    async fn exists(&self, id: QuestionId) -> Result<bool, Error> {
        Ok(self.questions.read().await.contains_key(&id))
    }

    async fn exists_by_text(&self, text: &str) -> Result<bool, Error> {
        Ok(self
            .questions
            .read()
            .await
            .values()
            .any(|q| q.question == text))
    }

    async fn get(&self, id: QuestionId) -> Result<Option<Question>, Error> {
        Ok(self.questions.read().await.get(&id).cloned())
    }

    async fn insert(&self, text: String, question: NewQuestion) -> Result<Question, Error> {
        let id = i32::try_from(self.next_id.fetch_add(1, Ordering::SeqCst))
            .map_err(|_| Error::StoreFailure("question ids exhausted".to_string()))?;
        let question = Question {
            id: QuestionId(id),
            question: text,
            option1: question.option1,
            option2: question.option2,
            option3: question.option3,
            option4: question.option4,
            difficulty_level: question.difficulty_level,
            category: question.category,
            correct_answer: question.correct_answer,
        };
        self.questions
            .write()
            .await
            .insert(question.id, question.clone());
        Ok(question)
    }

    async fn save(&self, question: Question) -> Result<(), Error> {
        self.questions.write().await.insert(question.id, question);
        Ok(())
    }

    async fn delete(&self, id: QuestionId) -> Result<(), Error> {
        self.questions.write().await.remove(&id);
        Ok(())
    }

    async fn random_ids(&self, category: &str, count: usize) -> Result<Vec<QuestionId>, Error> {
        let ids: Vec<QuestionId> = self
            .questions
            .read()
            .await
            .values()
            .filter(|q| q.category == category)
            .map(|q| q.id)
            .collect();
        Ok(ids
            .choose_multiple(&mut rand::thread_rng(), count)
            .copied()
            .collect())
    }
}

#[derive(Clone)]
pub struct QuizStore {
    pub quizzes: Arc<RwLock<HashMap<QuizId, Quiz>>>,
    next_id: Arc<AtomicI32>,
}

impl QuizStore {
    pub fn new() -> Self {
        QuizStore {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }

    pub async fn exists(&self, id: QuizId) -> bool {
        self.quizzes.read().await.contains_key(&id)
    }

    pub async fn get(&self, id: QuizId) -> Option<Quiz> {
        self.quizzes.read().await.get(&id).cloned()
    }

    pub async fn insert(&self, title: String, questions: Vec<QuestionId>) -> Quiz {
        let quiz = Quiz {
            id: QuizId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            title,
            questions,
        };
        self.quizzes.write().await.insert(quiz.id, quiz.clone());
        quiz
    }
}

impl Default for QuizStore {
    fn default() -> Self {
        QuizStore::new()
    }
}
