use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::PoolConfig;
use crate::constants::pool::{ITEM_ID_DELIMITER, MIN_CHOICES};
use crate::data::{CandidateItem, MultipleChoiceQuestion, QuestionBank};
use crate::errors::QuizError;
use crate::frequency::TopicFrequencyTable;
use crate::source::CandidateSource;
use crate::types::{CategoryId, SourceId};
use crate::utils::strip_choice_labels;

/// Derives true/false statements from a multiple-choice question bank.
///
/// Every choice of a question becomes one candidate. Its truth follows the
/// question's polarity and keyed choice (or its explicit per-choice truths),
/// and its weight is the question topic's historical frequency weight.
pub struct QuestionBankSource {
    id: SourceId,
    bank: QuestionBank,
    frequencies: TopicFrequencyTable,
    config: PoolConfig,
}

impl QuestionBankSource {
    /// Validate the bank and build a source over it.
    pub fn new(
        id: impl Into<SourceId>,
        bank: QuestionBank,
        frequencies: TopicFrequencyTable,
        config: PoolConfig,
    ) -> Result<Self, QuizError> {
        config.validate()?;
        for question in &bank.questions {
            validate_question(question)?;
        }
        Ok(Self {
            id: id.into(),
            bank,
            frequencies,
            config,
        })
    }

    /// Validated questions backing this source.
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    fn derive(
        &self,
        question: &MultipleChoiceQuestion,
        out: &mut Vec<CandidateItem>,
    ) -> Result<(), QuizError> {
        let truths = question.choice_truths()?;
        let topic_weight = self
            .frequencies
            .weight(&question.topic, self.config.unknown_topic_weight);
        let statements = strip_choice_labels(&question.choices);
        for (idx, (statement, answer)) in statements.into_iter().zip(truths).enumerate() {
            if statement.is_empty() {
                warn!(
                    source = %self.id,
                    question = %question.id,
                    choice = idx + 1,
                    "skipping empty choice text"
                );
                continue;
            }
            out.push(CandidateItem {
                id: format!("{}{}{}", question.id, ITEM_ID_DELIMITER, idx + 1),
                statement,
                answer,
                topic_weight,
                question_id: question.id.clone(),
                category: question.category.clone(),
                topic: question.topic.clone(),
                explanation: question.explanation.clone(),
            });
        }
        Ok(())
    }
}

impl CandidateSource for QuestionBankSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn categories(&self) -> Vec<CategoryId> {
        self.bank
            .questions
            .iter()
            .map(|question| question.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn candidates(&self, category: &str) -> Result<Vec<CandidateItem>, QuizError> {
        let mut items = Vec::new();
        let mut questions = 0usize;
        for question in self
            .bank
            .questions
            .iter()
            .filter(|question| question.category == category)
        {
            questions += 1;
            self.derive(question, &mut items)?;
        }
        debug!(
            source = %self.id,
            category,
            questions,
            candidates = items.len(),
            "derived true/false candidates"
        );
        Ok(items)
    }
}

fn validate_question(question: &MultipleChoiceQuestion) -> Result<(), QuizError> {
    if question.choices.len() < MIN_CHOICES {
        return Err(QuizError::InvalidQuestion {
            question_id: question.id.clone(),
            reason: format!(
                "needs at least {MIN_CHOICES} choices, has {}",
                question.choices.len()
            ),
        });
    }
    question.choice_truths().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuestionPolarity;

    fn question(id: &str, topic: &str, prompt: &str, correct: usize) -> MultipleChoiceQuestion {
        MultipleChoiceQuestion {
            id: id.to_string(),
            category: "takkengyoho".to_string(),
            topic: topic.to_string(),
            year: Some(2023),
            prompt: prompt.to_string(),
            polarity: None,
            choices: vec![
                "1. 第一の記述".to_string(),
                "2. 第二の記述".to_string(),
                "3. 第三の記述".to_string(),
                "4. 第四の記述".to_string(),
            ],
            correct_choice: Some(correct),
            truths: None,
            explanation: Some("解説".to_string()),
        }
    }

    fn frequencies() -> TopicFrequencyTable {
        [("重要事項説明", 10), ("報酬", 4)].into_iter().collect()
    }

    #[test]
    fn select_correct_marks_only_keyed_choice_true() {
        let bank = QuestionBank::new(vec![question("q1", "報酬", "正しいものはどれか。", 2)]);
        let source =
            QuestionBankSource::new("bank", bank, frequencies(), PoolConfig::default())
                .expect("source");
        let items = source.candidates("takkengyoho").expect("items");
        let answers: Vec<bool> = items.iter().map(|item| item.answer).collect();
        assert_eq!(answers, vec![false, false, true, false]);
        assert_eq!(items[0].id, "q1::1");
        assert_eq!(items[0].statement, "第一の記述");
        assert!((items[0].topic_weight - 0.4).abs() < 1e-12);
        assert_eq!(items[0].explanation.as_deref(), Some("解説"));
    }

    #[test]
    fn select_incorrect_marks_keyed_choice_false() {
        let bank = QuestionBank::new(vec![question(
            "q2",
            "重要事項説明",
            "誤っているものはどれか。",
            0,
        )]);
        let source =
            QuestionBankSource::new("bank", bank, frequencies(), PoolConfig::default())
                .expect("source");
        let items = source.candidates("takkengyoho").expect("items");
        let answers: Vec<bool> = items.iter().map(|item| item.answer).collect();
        assert_eq!(answers, vec![false, true, true, true]);
        assert!(items.iter().all(|item| (item.topic_weight - 1.0).abs() < 1e-12));
    }

    #[test]
    fn unknown_topic_uses_configured_weight() {
        let bank = QuestionBank::new(vec![question("q3", "農地法", "正しいものはどれか。", 0)]);
        let config = PoolConfig {
            unknown_topic_weight: 0.25,
        };
        let source = QuestionBankSource::new("bank", bank, frequencies(), config).expect("source");
        let items = source.candidates("takkengyoho").expect("items");
        assert!(items.iter().all(|item| (item.topic_weight - 0.25).abs() < 1e-12));
    }

    #[test]
    fn empty_choices_are_skipped() {
        let mut q = question("q4", "報酬", "正しいものはどれか。", 0);
        q.choices[3] = "4.  ".to_string();
        q.polarity = Some(QuestionPolarity::SelectCorrect);
        let source = QuestionBankSource::new(
            "bank",
            QuestionBank::new(vec![q]),
            frequencies(),
            PoolConfig::default(),
        )
        .expect("source");
        let items = source.candidates("takkengyoho").expect("items");
        assert_eq!(items.len(), 3);
        assert_eq!(items.last().map(|item| item.id.as_str()), Some("q4::3"));
    }

    #[test]
    fn out_of_range_key_is_rejected() {
        let bank = QuestionBank::new(vec![question("bad", "報酬", "正しいものはどれか。", 4)]);
        let err = QuestionBankSource::new("bank", bank, frequencies(), PoolConfig::default())
            .err()
            .expect("invalid question");
        assert!(matches!(
            err,
            QuizError::InvalidQuestion { ref question_id, .. } if question_id == "bad"
        ));
    }

    #[test]
    fn count_question_without_truths_is_rejected() {
        // Keyed choice 2 means "two statements are correct", not statement 2.
        let bank = QuestionBank::new(vec![question(
            "count",
            "報酬",
            "次の記述のうち、正しいものはいくつあるか。",
            1,
        )]);
        let err = QuestionBankSource::new("bank", bank, frequencies(), PoolConfig::default())
            .err()
            .expect("invalid question");
        assert!(matches!(
            err,
            QuizError::InvalidQuestion { ref question_id, .. } if question_id == "count"
        ));
    }

    #[test]
    fn explicit_truths_drive_combination_question_answers() {
        let mut q = question("combo", "報酬", "正しいものの組合せはどれか。", 0);
        q.correct_choice = None;
        q.choices = vec![
            "ア 第一の記述".to_string(),
            "イ 第二の記述".to_string(),
            "ウ 第三の記述".to_string(),
            "エ 第四の記述".to_string(),
        ];
        q.truths = Some(vec![true, false, false, true]);
        let source = QuestionBankSource::new(
            "bank",
            QuestionBank::new(vec![q]),
            frequencies(),
            PoolConfig::default(),
        )
        .expect("source");
        let items = source.candidates("takkengyoho").expect("items");
        let answers: Vec<bool> = items.iter().map(|item| item.answer).collect();
        assert_eq!(answers, vec![true, false, false, true]);
        assert_eq!(items[3].statement, "第四の記述");
    }

    #[test]
    fn negated_incorrect_prompt_keys_a_true_statement() {
        let bank = QuestionBank::new(vec![question(
            "neg",
            "報酬",
            "次の記述のうち、誤りのないものはどれか。",
            3,
        )]);
        let source =
            QuestionBankSource::new("bank", bank, frequencies(), PoolConfig::default())
                .expect("source");
        let items = source.candidates("takkengyoho").expect("items");
        let answers: Vec<bool> = items.iter().map(|item| item.answer).collect();
        assert_eq!(answers, vec![false, false, false, true]);
    }

    #[test]
    fn unlabeled_numeric_choices_keep_their_numbers() {
        let mut q = question("num", "報酬", "正しいものはどれか。", 0);
        q.choices = vec![
            "3.5%の報酬を受領できる".to_string(),
            "30 日以内に報告する".to_string(),
        ];
        let source = QuestionBankSource::new(
            "bank",
            QuestionBank::new(vec![q]),
            frequencies(),
            PoolConfig::default(),
        )
        .expect("source");
        let statements: Vec<String> = source
            .candidates("takkengyoho")
            .expect("items")
            .into_iter()
            .map(|item| item.statement)
            .collect();
        assert_eq!(statements, vec!["3.5%の報酬を受領できる", "30 日以内に報告する"]);
    }

    #[test]
    fn single_choice_question_is_rejected() {
        let mut q = question("short", "報酬", "正しいものはどれか。", 0);
        q.choices.truncate(1);
        let result = QuestionBankSource::new(
            "bank",
            QuestionBank::new(vec![q]),
            frequencies(),
            PoolConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        let mut other = question("q5", "報酬", "正しいものはどれか。", 0);
        other.category = "kenri".to_string();
        let bank = QuestionBank::new(vec![
            question("q6", "報酬", "正しいものはどれか。", 0),
            other,
            question("q7", "報酬", "正しいものはどれか。", 1),
        ]);
        let source =
            QuestionBankSource::new("bank", bank, frequencies(), PoolConfig::default())
                .expect("source");
        assert_eq!(source.categories(), vec!["kenri", "takkengyoho"]);
        assert!(source.candidates("zei").expect("items").is_empty());
    }
}
