use super::*;
use crate::model::Question;
use std::collections::BTreeSet;

impl<S, G> QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    /// Multi-answer questions need exactly the correct set, single-answer
    /// questions the exact option. Unanswered or unknown questions are wrong.
    pub fn is_answer_correct(&self, index: usize) -> bool {
        let (Some(question), Some(Some(answer))) = (
            self.quiz.questions.get(index),
            self.selected_answers.get(index),
        ) else {
            return false;
        };

        let correct = question.correct_answer.as_slice();
        if question.is_multi_answer() {
            let selected: BTreeSet<&str> = answer.as_slice().iter().map(String::as_str).collect();
            let expected: BTreeSet<&str> = correct.iter().map(String::as_str).collect();
            selected == expected
        } else {
            match answer {
                Answer::Single(s) => correct.len() == 1 && *s == correct[0],
                Answer::Multiple(_) => false,
            }
        }
    }

    pub fn score(&self) -> usize {
        (0..self.quiz.questions.len())
            .filter(|&i| self.is_answer_correct(i))
            .count()
    }

    pub fn current(&self) -> Option<&Question> {
        self.quiz.questions.get(self.current_question)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question + 1 == self.quiz.questions.len()
    }

    /// Questions with a non-empty answer
    pub fn answered_count(&self) -> usize {
        self.selected_answers
            .iter()
            .flatten()
            .filter(|a| !a.as_slice().is_empty())
            .count()
    }
}
