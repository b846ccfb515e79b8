use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::pool::{
    AGGREGATE_PROMPT_MARKERS, INCORRECT_PROMPT_MARKERS, NEGATED_INCORRECT_MARKERS,
};
use crate::errors::QuizError;

pub use crate::types::{CategoryId, ItemId, QuestionId, Statement, TopicId};

/// One true/false statement eligible for inclusion in a quiz.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Unique key within a pool; never selected twice per sampling call.
    pub id: ItemId,
    /// Assertion to be judged true or false.
    pub statement: Statement,
    /// Ground truth for `statement`.
    pub answer: bool,
    /// Exam relevance of the item's topic in [0, 1] (higher = tested more often).
    pub topic_weight: f64,
    /// Question the statement was derived from.
    pub question_id: QuestionId,
    /// Exam category the question belongs to.
    pub category: CategoryId,
    /// Topic used for weighting and skew metrics.
    pub topic: TopicId,
    /// Commentary shown after answering, when the bank has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Which choice a multiple-choice prompt asks the examinee to pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionPolarity {
    /// "正しいものはどれか": the keyed choice is the only true statement.
    SelectCorrect,
    /// "誤っているものはどれか": the keyed choice is the only false statement.
    SelectIncorrect,
}

impl QuestionPolarity {
    /// Infer polarity from prompt wording, defaulting to `SelectCorrect`.
    ///
    /// Negated wording such as "誤りのないもの" asks for a true statement and
    /// does not count as an incorrect marker.
    pub fn infer(prompt: &str) -> Self {
        let mut lowered = prompt.to_lowercase();
        for negated in NEGATED_INCORRECT_MARKERS {
            lowered = lowered.replace(negated, " ");
        }
        if INCORRECT_PROMPT_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            QuestionPolarity::SelectIncorrect
        } else {
            QuestionPolarity::SelectCorrect
        }
    }

    /// Truth value of choice `idx` given the keyed `correct_choice`.
    pub fn choice_truth(self, idx: usize, correct_choice: usize) -> bool {
        match self {
            QuestionPolarity::SelectCorrect => idx == correct_choice,
            QuestionPolarity::SelectIncorrect => idx != correct_choice,
        }
    }
}

/// A past-exam style multiple-choice question.
///
/// Single-answer questions key one choice with `correct_choice`. Count
/// (個数問題) and combination (組合せ問題) questions key an aggregate answer
/// instead; for those, `choices` holds the individual statements (ア, イ, …)
/// and `truths` gives each statement's truth directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    /// Unique question id, prefix of every derived item id.
    pub id: QuestionId,
    /// Exam category used to group quizzes.
    pub category: CategoryId,
    /// Topic looked up in the frequency table.
    pub topic: TopicId,
    /// Exam year, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// Question stem.
    pub prompt: String,
    /// Explicit polarity; inferred from `prompt` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polarity: Option<QuestionPolarity>,
    /// Choice texts, optionally labeled (`1`, `(2)`, `ア`, `③`).
    pub choices: Vec<String>,
    /// Zero-based index of the keyed choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_choice: Option<usize>,
    /// Per-choice truth values; take precedence over `correct_choice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truths: Option<Vec<bool>>,
    /// Commentary copied onto every derived item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl MultipleChoiceQuestion {
    /// Explicit polarity, or the one inferred from the prompt.
    pub fn polarity(&self) -> QuestionPolarity {
        self.polarity
            .unwrap_or_else(|| QuestionPolarity::infer(&self.prompt))
    }

    /// Whether the prompt asks for a count or a combination of statements.
    pub fn is_aggregate(&self) -> bool {
        AGGREGATE_PROMPT_MARKERS
            .iter()
            .any(|marker| self.prompt.contains(marker))
    }

    /// Truth value of every choice, in choice order.
    ///
    /// Explicit `truths` win. Otherwise the truths follow from `polarity()`
    /// and `correct_choice`, which count and combination questions cannot
    /// provide.
    pub fn choice_truths(&self) -> Result<Vec<bool>, QuizError> {
        if let Some(truths) = &self.truths {
            if truths.len() != self.choices.len() {
                return Err(self.invalid(format!(
                    "{} truths given for {} choices",
                    truths.len(),
                    self.choices.len()
                )));
            }
            return Ok(truths.clone());
        }
        if self.is_aggregate() {
            return Err(self.invalid(
                "count and combination questions need per-choice truths".to_string(),
            ));
        }
        let Some(correct) = self.correct_choice else {
            return Err(self.invalid("neither correct_choice nor truths given".to_string()));
        };
        if correct >= self.choices.len() {
            return Err(self.invalid(format!(
                "correct_choice {correct} out of range for {} choices",
                self.choices.len()
            )));
        }
        let polarity = self.polarity();
        Ok((0..self.choices.len())
            .map(|idx| polarity.choice_truth(idx, correct))
            .collect())
    }

    fn invalid(&self, reason: String) -> QuizError {
        QuizError::InvalidQuestion {
            question_id: self.id.clone(),
            reason,
        }
    }
}

/// A list of multiple-choice questions loaded from JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    /// Questions in file order.
    pub questions: Vec<MultipleChoiceQuestion>,
}

impl QuestionBank {
    /// Wrap already-built questions.
    pub fn new(questions: Vec<MultipleChoiceQuestion>) -> Self {
        Self { questions }
    }

    /// Parse a JSON array of questions.
    pub fn from_json_str(raw: &str) -> Result<Self, QuizError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a JSON array of questions from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the bank holds no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_inferred_from_incorrect_markers() {
        assert_eq!(
            QuestionPolarity::infer("次の記述のうち、誤っているものはどれか。"),
            QuestionPolarity::SelectIncorrect
        );
        assert_eq!(
            QuestionPolarity::infer("宅建業法の規定に違反するものはどれか。"),
            QuestionPolarity::SelectIncorrect
        );
        assert_eq!(
            QuestionPolarity::infer("Which statement is INCORRECT?"),
            QuestionPolarity::SelectIncorrect
        );
        assert_eq!(
            QuestionPolarity::infer("次の記述のうち、正しいものはどれか。"),
            QuestionPolarity::SelectCorrect
        );
    }

    #[test]
    fn choice_truth_flips_with_polarity() {
        assert!(QuestionPolarity::SelectCorrect.choice_truth(2, 2));
        assert!(!QuestionPolarity::SelectCorrect.choice_truth(1, 2));
        assert!(!QuestionPolarity::SelectIncorrect.choice_truth(2, 2));
        assert!(QuestionPolarity::SelectIncorrect.choice_truth(0, 2));
    }

    #[test]
    fn explicit_polarity_overrides_prompt() {
        let question = MultipleChoiceQuestion {
            id: "q1".into(),
            category: "kenri".into(),
            topic: "借地借家法".into(),
            year: None,
            prompt: "誤っているものはどれか。".into(),
            polarity: Some(QuestionPolarity::SelectCorrect),
            choices: vec!["a".into(), "b".into()],
            correct_choice: Some(0),
            truths: None,
            explanation: None,
        };
        assert_eq!(question.polarity(), QuestionPolarity::SelectCorrect);
    }

    fn question(
        prompt: &str,
        correct_choice: Option<usize>,
        truths: Option<Vec<bool>>,
    ) -> MultipleChoiceQuestion {
        MultipleChoiceQuestion {
            id: "r4-q28".into(),
            category: "takkengyoho".into(),
            topic: "重要事項説明".into(),
            year: Some(2022),
            prompt: prompt.into(),
            polarity: None,
            choices: vec!["ア a".into(), "イ b".into(), "ウ c".into(), "エ d".into()],
            correct_choice,
            truths,
            explanation: None,
        }
    }

    #[test]
    fn negated_incorrect_marker_selects_correct() {
        for prompt in [
            "次の記述のうち、誤りのないものはどれか。",
            "次の記述のうち、誤っていないものはどれか。",
            "宅建業法の規定に違反しないものはどれか。",
        ] {
            assert_eq!(
                QuestionPolarity::infer(prompt),
                QuestionPolarity::SelectCorrect,
                "{prompt}"
            );
        }
        let truths = question("次の記述のうち、誤りのないものはどれか。", Some(1), None)
            .choice_truths()
            .expect("truths");
        assert_eq!(truths, vec![false, true, false, false]);
    }

    #[test]
    fn keyed_choice_derives_truths_from_polarity() {
        let truths = question("誤っているものはどれか。", Some(3), None)
            .choice_truths()
            .expect("truths");
        assert_eq!(truths, vec![true, true, true, false]);
    }

    #[test]
    fn count_and_combination_questions_need_explicit_truths() {
        for prompt in [
            "次の記述のうち、正しいものはいくつあるか。",
            "次の記述のうち、正しいものの組合せはどれか。",
            "誤っているものの組み合わせとして、正しいものはどれか。",
        ] {
            // Correct choice "2" of a count question is an answer count, not a statement.
            let err = question(prompt, Some(1), None).choice_truths().unwrap_err();
            assert!(matches!(err, QuizError::InvalidQuestion { .. }), "{prompt}");

            let explicit = vec![true, false, true, false];
            let truths = question(prompt, None, Some(explicit.clone()))
                .choice_truths()
                .expect("explicit truths");
            assert_eq!(truths, explicit);
        }
    }

    #[test]
    fn truths_must_cover_every_choice() {
        let err = question("正しいものはいくつあるか。", None, Some(vec![true, false]))
            .choice_truths()
            .unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuestion { .. }));
    }

    #[test]
    fn missing_or_out_of_range_key_is_invalid() {
        for correct in [None, Some(4)] {
            let err = question("正しいものはどれか。", correct, None)
                .choice_truths()
                .unwrap_err();
            assert!(matches!(err, QuizError::InvalidQuestion { .. }));
        }
    }

    #[test]
    fn bank_parses_truths_without_key() {
        let raw = r#"[{
            "id": "r3-q35",
            "category": "takkengyoho",
            "topic": "37条書面",
            "prompt": "正しいものはいくつあるか。",
            "choices": ["ア 一", "イ 二", "ウ 三"],
            "truths": [false, true, true]
        }]"#;
        let bank = QuestionBank::from_json_str(raw).expect("bank");
        assert_eq!(bank.questions[0].correct_choice, None);
        assert!(bank.questions[0].is_aggregate());
        assert_eq!(
            bank.questions[0].choice_truths().expect("truths"),
            vec![false, true, true]
        );
    }

    #[test]
    fn bank_parses_minimal_json() {
        let raw = r#"[{
            "id": "r5-q1",
            "category": "takkengyoho",
            "topic": "重要事項説明",
            "prompt": "正しいものはどれか。",
            "choices": ["一", "二", "三", "四"],
            "correct_choice": 3
        }]"#;
        let bank = QuestionBank::from_json_str(raw).expect("bank");
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.questions[0].year, None);
        assert_eq!(bank.questions[0].polarity(), QuestionPolarity::SelectCorrect);
        assert_eq!(bank.questions[0].correct_choice, Some(3));
    }

    #[test]
    fn bank_rejects_malformed_json() {
        let err = QuestionBank::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, QuizError::Parse(_)));
    }
}
