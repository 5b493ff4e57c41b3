//! Question Generator
//!
//! Converts a word list plus a configuration into an ordered list of exam
//! questions.
//!
//! Core principles:
//! - Selection without replacement: shuffle the full word list, take the
//!   first `count` (a word appears at most once per exam)
//! - Output order is the shuffle order, no additional reordering
//! - Direction applies uniformly to the whole exam; `mixed` mode resolves
//!   the question type per question with a fair coin
//! - Multiple-choice questions carry exactly 4 options with the correct
//!   answer at a uniformly random position

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::shuffle::{default_rng, shuffle_with};
use crate::types::{
    ExamDirection, ExamError, ExamMode, ExamQuestion, QuestionType, WordItem, DISTRACTOR_COUNT,
    MIN_QUESTION_COUNT,
};

// ==================== Word-Source Boundary ====================

/// 过滤存储层投影中的无效单词
///
/// 丢弃 id、word、meaning 任一字段为空白的条目，保持原有顺序。
pub fn sanitize_word_list(words: &[WordItem]) -> Vec<WordItem> {
    words.iter().filter(|w| w.is_valid()).cloned().collect()
}

// ==================== Main Implementation ====================

/// Question generator with an owned random source
///
/// `new()` seeds from system time; `with_seed` makes every generated exam
/// fully deterministic, which tests rely on.
pub struct QuestionGenerator {
    rng: ChaCha8Rng,
}

impl QuestionGenerator {
    /// Create a generator seeded from system time
    pub fn new() -> Self {
        Self { rng: default_rng() }
    }

    /// Create a generator with a specific seed (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate `count` questions over `words`
    ///
    /// Fails with `ExamError::InvalidConfig` when the word list is empty,
    /// `count` is zero, or `count` exceeds the word list length. On error
    /// nothing is drawn from the random source beyond the failed check.
    pub fn generate(
        &mut self,
        words: &[WordItem],
        mode: ExamMode,
        direction: ExamDirection,
        count: usize,
    ) -> Result<Vec<ExamQuestion>, ExamError> {
        if words.is_empty() {
            return Err(ExamError::InvalidConfig("单词列表为空".to_string()));
        }
        if count < MIN_QUESTION_COUNT {
            return Err(ExamError::InvalidConfig(format!(
                "题目数至少为 {}，实际为 {}",
                MIN_QUESTION_COUNT, count
            )));
        }
        if count > words.len() {
            return Err(ExamError::InvalidConfig(format!(
                "题目数 {} 超过单词数 {}",
                count,
                words.len()
            )));
        }

        let selected = {
            let shuffled = shuffle_with(words, &mut self.rng);
            shuffled.into_iter().take(count).collect::<Vec<_>>()
        };

        // 干扰项跨题复用池（小词表时兜底）
        let mut seen_distractors: Vec<String> = Vec::new();

        let mut questions = Vec::with_capacity(count);
        for word in &selected {
            let question_type = match mode {
                ExamMode::MultipleChoice => QuestionType::MultipleChoice,
                ExamMode::ShortAnswer => QuestionType::ShortAnswer,
                ExamMode::Mixed => {
                    if self.rng.gen_bool(0.5) {
                        QuestionType::MultipleChoice
                    } else {
                        QuestionType::ShortAnswer
                    }
                }
            };

            let (prompt, correct_answer) = match direction {
                ExamDirection::Forward => (word.word.clone(), word.meaning.clone()),
                ExamDirection::Reverse => (word.meaning.clone(), word.word.clone()),
            };

            let choices = match question_type {
                QuestionType::MultipleChoice => Some(self.build_choices(
                    words,
                    &word.id,
                    &correct_answer,
                    direction,
                    &mut seen_distractors,
                )),
                QuestionType::ShortAnswer => None,
            };

            questions.push(ExamQuestion {
                word_id: word.id.clone(),
                question_type,
                prompt,
                choices,
                correct_answer: correct_answer.clone(),
            });
        }

        Ok(questions)
    }

    // ==================== Distractor Construction ====================

    /// Build the 4-option choice list for one multiple-choice question
    ///
    /// Distractors come from the other words' answer-side field, shuffled
    /// and deduplicated against the correct answer and each other. When the
    /// pool runs short the question borrows distractors already used by
    /// earlier questions; when the word list itself has too few distinct
    /// values the existing distractors are cycled so the list is always
    /// exactly 4 long.
    fn build_choices(
        &mut self,
        words: &[WordItem],
        word_id: &str,
        correct_answer: &str,
        direction: ExamDirection,
        seen_distractors: &mut Vec<String>,
    ) -> Vec<String> {
        let pool: Vec<String> = words
            .iter()
            .filter(|w| w.id != word_id)
            .map(|w| match direction {
                ExamDirection::Forward => w.meaning.clone(),
                ExamDirection::Reverse => w.word.clone(),
            })
            .collect();
        let pool = shuffle_with(&pool, &mut self.rng);

        let mut distractors: Vec<String> = Vec::with_capacity(DISTRACTOR_COUNT);
        for candidate in pool {
            if distractors.len() == DISTRACTOR_COUNT {
                break;
            }
            if candidate != correct_answer && !distractors.contains(&candidate) {
                distractors.push(candidate);
            }
        }

        // 候选不足：复用之前题目出现过的干扰项
        if distractors.len() < DISTRACTOR_COUNT {
            for candidate in seen_distractors.iter() {
                if distractors.len() == DISTRACTOR_COUNT {
                    break;
                }
                if candidate != correct_answer && !distractors.contains(candidate) {
                    distractors.push(candidate.clone());
                }
            }
        }

        // 词表可选值耗尽：循环已有干扰项，保证固定 4 个选项
        while distractors.len() < DISTRACTOR_COUNT {
            let filler = distractors
                .first()
                .cloned()
                .unwrap_or_else(|| correct_answer.to_string());
            distractors.push(filler);
        }

        for d in &distractors {
            if !seen_distractors.contains(d) {
                seen_distractors.push(d.clone());
            }
        }

        let insert_at = self.rng.gen_range(0..=distractors.len());
        let mut choices = distractors;
        choices.insert(insert_at, correct_answer.to_string());
        choices
    }
}

// ==================== Tests ====================
