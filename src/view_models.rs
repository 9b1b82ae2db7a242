// src/view_models.rs

use crate::model::{QuestionAttempt, QuizResult};
use crate::rewards::GamificationService;
use crate::session::QuizSession;
use crate::storage::SessionStorage;

#[derive(Clone, Debug)]
pub struct OptionRow {
    pub number: usize, // 1-based, as typed by the player
    pub text: String,
    pub selected: bool,
}

/// The question being shown
#[derive(Clone, Debug)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub multi: bool,
    pub options: Vec<OptionRow>,
    pub image: Option<String>,
}

/// One line of the post-quiz review
#[derive(Clone, Debug)]
pub struct QuestionRow {
    pub number: usize,
    pub prompt: String,
    pub selected: Vec<String>,
    pub correct: Vec<String>,
    pub is_correct: bool,
    pub time_spent_secs: Option<u64>,
    pub explanation: Option<String>,
}

impl QuestionView {
    pub fn from_session<S, G>(session: &QuizSession<S, G>) -> Option<Self>
    where
        S: SessionStorage,
        G: GamificationService,
    {
        let index = session.current_question();
        let question = session.current()?;
        let answer = session.selected_answers().get(index).and_then(Option::as_ref);

        Some(Self {
            number: index + 1,
            total: session.quiz().questions.len(),
            prompt: question.prompt.clone(),
            multi: question.is_multi_answer(),
            options: question
                .options
                .iter()
                .enumerate()
                .map(|(i, text)| OptionRow {
                    number: i + 1,
                    text: text.clone(),
                    selected: answer.is_some_and(|a| a.contains(text)),
                })
                .collect(),
            image: question.image.clone(),
        })
    }

    pub fn header(&self) -> String {
        if self.multi {
            format!("Question {}/{} (select all that apply)", self.number, self.total)
        } else {
            format!("Question {}/{}", self.number, self.total)
        }
    }
}

impl OptionRow {
    pub fn label(&self) -> String {
        let mark = if self.selected { "x" } else { " " };
        format!("[{mark}] {}. {}", self.number, self.text)
    }
}

impl QuestionRow {
    pub fn label(&self) -> String {
        let icon = if self.is_correct { "✅" } else { "❌" };
        let time = self
            .time_spent_secs
            .map(|t| format!(" ({t}s)"))
            .unwrap_or_default();
        format!("{icon} {}. {}{time}", self.number, self.prompt)
    }
}

/// Review rows for a completed quiz, in question order
pub fn review_rows<S, G>(session: &QuizSession<S, G>) -> Vec<QuestionRow>
where
    S: SessionStorage,
    G: GamificationService,
{
    let attempts = session.attempts();
    session
        .quiz()
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| QuestionRow {
            number: i + 1,
            prompt: q.prompt.clone(),
            selected: session
                .selected_answers()
                .get(i)
                .and_then(Option::as_ref)
                .map(|a| a.as_slice().to_vec())
                .unwrap_or_default(),
            correct: q.correct_answer.as_slice().to_vec(),
            is_correct: session.is_answer_correct(i),
            time_spent_secs: attempt_for(attempts, i).map(|a| a.time_spent_secs),
            explanation: q.explanation.clone(),
        })
        .collect()
}

fn attempt_for(attempts: &[QuestionAttempt], index: usize) -> Option<&QuestionAttempt> {
    attempts.iter().find(|a| a.question_index == index)
}

pub fn score_line(result: &QuizResult) -> String {
    format!(
        "{}: {}/{} correct ({:.0}%), +{} XP",
        result.quiz_title, result.score, result.total_questions, result.percentage, result.xp_earned
    )
}
