//! Scoring reduction over a finished quiz.

use crate::question::{Answers, Question};

/// Correct count out of the total number of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// Percentage rounded half up, or `None` for an empty quiz.
    #[must_use]
    pub fn percentage(self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let correct = self.correct.min(self.total);
        // round(100 * c / t) with halves rounded up, in integers.
        let rounded = (200 * correct + self.total) / (2 * self.total);
        Some(rounded as u8)
    }

    #[must_use]
    pub fn status_tier(self) -> Option<StatusTier> {
        self.percentage().map(StatusTier::from_percentage)
    }
}

/// Coarse banding of the final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTier {
    High,
    Mid,
    Low,
}

impl StatusTier {
    #[must_use]
    pub const fn from_percentage(percentage: u8) -> Self {
        if percentage >= 80 {
            Self::High
        } else if percentage >= 50 {
            Self::Mid
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::High => "Excellent! You've mastered this topic.",
            Self::Mid => "Good job! You have a solid understanding.",
            Self::Low => "Keep practicing! You'll get better with time.",
        }
    }
}

/// Counts questions whose recorded answer equals the correct key.
#[must_use]
pub fn score(questions: &[Question], answers: &Answers) -> Score {
    let correct = questions
        .iter()
        .filter(|q| q.is_correct(answers.get(q.id()).copied()))
        .count();
    Score {
        correct,
        total: questions.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Score, StatusTier, score};
    use crate::question::{Answers, CorrectAnswer, OptionKey, Question, QuestionDraft};
    use crate::sample_question;

    fn pct(correct: usize, total: usize) -> Option<u8> {
        Score { correct, total }.percentage()
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(pct(1, 3), Some(33));
        assert_eq!(pct(2, 3), Some(67));
        assert_eq!(pct(3, 5), Some(60));
        assert_eq!(pct(5, 5), Some(100));
        assert_eq!(pct(0, 5), Some(0));
    }

    #[test]
    fn percentage_rounds_halves_up() {
        assert_eq!(pct(1, 8), Some(13));
        assert_eq!(pct(1, 200), Some(1));
    }

    #[test]
    fn empty_quiz_has_no_percentage() {
        assert_eq!(pct(0, 0), None);
        assert_eq!(Score::default().status_tier(), None);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(StatusTier::from_percentage(100), StatusTier::High);
        assert_eq!(StatusTier::from_percentage(80), StatusTier::High);
        assert_eq!(StatusTier::from_percentage(79), StatusTier::Mid);
        assert_eq!(StatusTier::from_percentage(50), StatusTier::Mid);
        assert_eq!(StatusTier::from_percentage(49), StatusTier::Low);
        assert_eq!(StatusTier::from_percentage(0), StatusTier::Low);
    }

    #[test]
    fn tier_messages() {
        assert_eq!(
            StatusTier::Mid.message(),
            "Good job! You have a solid understanding."
        );
        assert!(StatusTier::High.message().starts_with("Excellent!"));
        assert!(StatusTier::Low.message().starts_with("Keep practicing!"));
    }

    #[test]
    fn score_counts_matching_answers_only() {
        let questions = vec![
            sample_question(0, OptionKey::A),
            sample_question(1, OptionKey::B),
            sample_question(2, OptionKey::C),
        ];
        let mut answers = Answers::new();
        answers.insert(questions[0].id().clone(), OptionKey::A);
        answers.insert(questions[1].id().clone(), OptionKey::D);

        let result = score(&questions, &answers);
        assert_eq!(result, Score { correct: 1, total: 3 });
        assert_eq!(result.percentage(), Some(33));
        assert_eq!(result.status_tier(), Some(StatusTier::Low));
    }

    #[test]
    fn unrecognized_correct_answer_scores_as_wrong() {
        let draft = QuestionDraft {
            question: "Q".to_string(),
            options: sample_question(0, OptionKey::A).options().clone(),
            correct_answer: CorrectAnswer::from("E".to_string()),
            explanation: String::new(),
        };
        let question = Question::from_draft(crate::QuestionId::new("q-9"), draft);
        let mut answers = Answers::new();
        answers.insert(question.id().clone(), OptionKey::A);

        assert_eq!(score(&[question], &answers).correct, 0);
    }
}
