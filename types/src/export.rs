//! Plain-text renderings of a quiz for the clipboard and print sinks.

use crate::question::{Answers, Question};
use crate::score::score;

/// Flat transcript of every question with its answer key.
///
/// Each block is `Q{n}: prompt`, the four options, `Correct:` and
/// `Explanation:` lines, then a blank line.
#[must_use]
pub fn transcript(questions: &[Question]) -> String {
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        out.push_str(&format!("Q{}: {}\n", i + 1, q.prompt()));
        for (key, text) in q.options().iter() {
            out.push_str(&format!("{key}) {text}\n"));
        }
        out.push_str(&format!("Correct: {}\n", q.correct_answer()));
        out.push_str(&format!("Explanation: {}\n\n", q.explanation()));
    }
    out
}

/// Printable summary of a finished quiz followed by a per-question review.
#[must_use]
pub fn results_report(topic: &str, questions: &[Question], answers: &Answers) -> String {
    let result = score(questions, answers);
    let mut out = String::new();

    out.push_str("Quiz Complete!\n");
    out.push_str(&format!("Topic: \"{topic}\"\n\n"));
    out.push_str(&format!("Correct: {} / {}\n", result.correct, result.total));
    if let Some(percentage) = result.percentage() {
        out.push_str(&format!("Score: {percentage}%\n"));
    }
    if let Some(tier) = result.status_tier() {
        out.push_str(&format!("Status: {}\n", tier.message()));
    }

    out.push_str("\nDetailed Review\n");
    out.push_str("===============\n");
    for (i, q) in questions.iter().enumerate() {
        let selected = answers.get(q.id()).copied();
        out.push_str(&format!("\n{}. {}\n", i + 1, q.prompt()));
        for (key, text) in q.options().iter() {
            let marker = if q.correct_answer().matches(key) {
                "+"
            } else if selected == Some(key) {
                "x"
            } else {
                " "
            };
            out.push_str(&format!("  [{marker}] {key}) {text}\n"));
        }
        let chosen = selected.map_or_else(|| "-".to_string(), |key| key.to_string());
        out.push_str(&format!(
            "  Your answer: {chosen}  Correct answer: {}\n",
            q.correct_answer()
        ));
        out.push_str(&format!("  Explanation: {}\n", q.explanation()));
    }
    out
}
