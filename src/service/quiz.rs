use std::sync::Arc;

use crate::client::QuestionClient;
use crate::error::Error;
use crate::store::QuizStore;
use crate::types::{
    question::QuestionWrapper,
    quiz::{Quiz, QuizId, QuizRequest},
    response::Response,
};

pub struct QuizService<C> {
    quizzes: QuizStore,
    questions: Arc<C>,
}

impl<C> Clone for QuizService<C> {
    fn clone(&self) -> Self {
        QuizService {
            quizzes: self.quizzes.clone(),
            questions: self.questions.clone(),
        }
    }
}

impl<C: QuestionClient> QuizService<C> {
    pub fn new(quizzes: QuizStore, questions: C) -> Self {
        QuizService {
            quizzes,
            questions: Arc::new(questions),
        }
    }

    /// The sampled id list may be shorter than requested.
    pub async fn create_quiz(&self, request: QuizRequest) -> Result<Quiz, Error> {
        let ids = self
            .questions
            .generate(&request.category, request.no_of_questions)
            .await?;
        if ids.len() < request.no_of_questions as usize {
            log::info!(
                "category {} only had {} of {} requested questions",
                request.category,
                ids.len(),
                request.no_of_questions
            );
        }
        let quiz = self.quizzes.insert(request.title, ids).await;
        log::info!("created quiz {} with {} questions", quiz.id.0, quiz.questions.len());
        Ok(quiz)
    }

    pub async fn get_quiz_questions(&self, id: QuizId) -> Result<Vec<QuestionWrapper>, Error> {
        let quiz = self.find(id).await?;
        self.questions.resolve(&quiz.questions).await
    }

    /// Every response must answer one of the quiz's own questions.
    pub async fn calculate_results(&self, id: QuizId, responses: Vec<Response>) -> Result<u32, Error> {
        let quiz = self.find(id).await?;
        if let Some(stray) = responses.iter().find(|r| !quiz.questions.contains(&r.id)) {
            return Err(Error::ResponseNotInQuiz(stray.id));
        }
        self.questions.score(&responses).await
    }

    async fn find(&self, id: QuizId) -> Result<Quiz, Error> {
        if !self.quizzes.exists(id).await {
            return Err(Error::QuizNotFound(id));
        }
        // quizzes are never deleted, so the fetch after the check cannot miss
        self.quizzes.get(id).await.ok_or(Error::QuizNotFound(id))
    }
}
