use super::*;

impl<S, G> QuizSession<S, G>
where
    S: SessionStorage,
    G: GamificationService,
{
    /// Records an answer for question `index`.
    ///
    /// Single-answer questions keep only the latest answer. Multi-answer
    /// questions toggle `answer` in or out of the selection.
    pub fn handle_answer(&mut self, index: usize, answer: &str) -> Result<()> {
        self.ensure_in_progress()?;
        self.check_index(index)?;

        let question = &self.quiz.questions[index];
        if !question.options.iter().any(|o| o == answer) {
            return Err(Error::UnknownOption {
                index,
                option: answer.to_string(),
            });
        }

        let slot = &mut self.selected_answers[index];
        if question.is_multi_answer() {
            let mut selected = slot
                .take()
                .map(|a| a.as_slice().to_vec())
                .unwrap_or_default();
            if let Some(pos) = selected.iter().position(|s| s == answer) {
                selected.remove(pos);
            } else {
                selected.push(answer.to_string());
            }
            *slot = Some(Answer::Multiple(selected));
        } else {
            *slot = Some(Answer::Single(answer.to_string()));
        }

        let answers = self.selected_answers.clone();
        self.store(StorageSlot::Answers, &answers);
        Ok(())
    }

    /// Picks option number `option` (0-based) of question `index`
    pub fn handle_answer_option(&mut self, index: usize, option: usize) -> Result<()> {
        self.check_index(index)?;
        let answer = self.quiz.questions[index]
            .options
            .get(option)
            .cloned()
            .ok_or_else(|| Error::UnknownOption {
                index,
                option: format!("#{}", option.saturating_add(1)),
            })?;
        self.handle_answer(index, &answer)
    }
}
