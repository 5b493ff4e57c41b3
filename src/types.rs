//! Common Types and Constants
//!
//! Shared data structures used across all exam modules.
//!
//! Persisted shapes serialize with the exact field names of the stored
//! record format (camelCase), so a snapshot written by one session can be
//! restored byte-compatibly by another.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==================== Constants ====================

/// Fixed textual prefix for persisted session keys
pub const STORAGE_KEY_PREFIX: &str = "exam-session:";

/// Number of options in a multiple-choice question
pub const CHOICE_COUNT: usize = 4;

/// Number of distractors per multiple-choice question
pub const DISTRACTOR_COUNT: usize = CHOICE_COUNT - 1;

/// Minimum allowed question count in a config
pub const MIN_QUESTION_COUNT: usize = 1;

// ==================== Error Types ====================

/// 测验模块错误类型
#[derive(Error, Debug)]
pub enum ExamError {
    #[error("无效的测验配置: {0}")]
    InvalidConfig(String),

    #[error("题目总数为零，无法计算得分")]
    DivisionByZero,

    #[error("存储操作失败: {0}")]
    Storage(String),
}

// ==================== Word Types ====================

/// Immutable projection of a persisted word
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    /// Word unique id
    pub id: String,
    /// The word itself
    pub word: String,
    /// Its meaning
    pub meaning: String,
}

impl WordItem {
    pub fn new(
        id: impl Into<String>,
        word: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            meaning: meaning.into(),
        }
    }

    /// 转换自存储层的单词必须三个字段均非空
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.word.trim().is_empty() && !self.meaning.trim().is_empty()
    }
}

// ==================== Config Types ====================

/// 出题模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamMode {
    /// 选择题
    MultipleChoice,
    /// 填空题
    ShortAnswer,
    /// 混合（逐题随机）
    Mixed,
}

impl ExamMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::ShortAnswer => "short-answer",
            Self::Mixed => "mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "multiple-choice" => Some(Self::MultipleChoice),
            "short-answer" => Some(Self::ShortAnswer),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// 提问方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamDirection {
    /// 给出单词，询问释义
    Forward,
    /// 给出释义，询问单词
    Reverse,
}

impl ExamDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "forward" => Some(Self::Forward),
            "reverse" => Some(Self::Reverse),
            _ => None,
        }
    }
}

/// Exam configuration collected from the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamConfig {
    pub mode: ExamMode,
    pub direction: ExamDirection,
    pub question_count: usize,
}

// ==================== Question Types ====================

/// 单题题型（mixed 模式在生成时逐题落定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::ShortAnswer => "short-answer",
        }
    }
}

/// A single generated exam question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestion {
    /// Source word id
    pub word_id: String,
    /// Question type
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Text shown to the user
    pub prompt: String,
    /// Present iff `question_type` is multiple-choice: 4 options, the
    /// correct answer at a randomized position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Expected answer
    pub correct_answer: String,
}

/// One recorded submission (append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnswer {
    /// Question position at submission time
    pub question_index: usize,
    /// Raw user input
    pub user_answer: String,
    /// Verdict after normalization
    pub is_correct: bool,
}

// ==================== Result Types ====================

/// Scorer output (duration is the session's job)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Whole-number percentage in [0, 100], rounded half-up
    pub percentage: f64,
}

/// Final exam result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub percentage: f64,
    /// Milliseconds between start and finish
    pub duration: i64,
}

// ==================== Session State ====================

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamStatus {
    Config,
    InProgress,
    Completed,
}

impl ExamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

/// Full session state, the unit of persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSessionState {
    /// Owning word set
    pub word_set_id: String,
    /// Set by `start_exam`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExamMode>,
    /// Set by `start_exam`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<ExamDirection>,
    /// Generated questions, already in randomized order
    pub questions: Vec<ExamQuestion>,
    /// Cursor in [0, |questions|]
    pub current_index: usize,
    /// Append-only submissions
    pub answers: Vec<ExamAnswer>,
    /// Epoch milliseconds at `start_exam`
    pub start_time: i64,
    /// Lifecycle phase
    pub status: ExamStatus,
}

impl ExamSessionState {
    /// 创建 config 状态的空白会话
    pub fn new(word_set_id: impl Into<String>) -> Self {
        Self {
            word_set_id: word_set_id.into(),
            mode: None,
            direction: None,
            questions: Vec::new(),
            current_index: 0,
            answers: Vec::new(),
            start_time: 0,
            status: ExamStatus::Config,
        }
    }

    /// 恢复持久化快照前的不变量检查
    ///
    /// 不满足不变量的快照一律弃用，重建空白会话。
    pub fn is_valid(&self) -> bool {
        if self.word_set_id.is_empty() {
            return false;
        }
        if self.answers.len() > self.questions.len() {
            return false;
        }
        match self.status {
            ExamStatus::Config => self.questions.is_empty() && self.answers.is_empty(),
            ExamStatus::InProgress => {
                !self.questions.is_empty() && self.current_index < self.questions.len()
            }
            ExamStatus::Completed => !self.questions.is_empty(),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    // ============ WordItem 测试 ============

    #[test]
    fn test_word_item_valid() {
        let w = WordItem::new("w1", "apple", "苹果");
        assert!(w.is_valid());
    }

    #[test]
    fn test_word_item_blank_fields_invalid() {
        assert!(!WordItem::new("", "apple", "苹果").is_valid());
        assert!(!WordItem::new("w1", "  ", "苹果").is_valid());
        assert!(!WordItem::new("w1", "apple", "").is_valid());
        assert!(!WordItem::new(" \t", "apple", "苹果").is_valid());
    }

    // ============ 枚举字符串形式测试 ============

    #[test]
    fn test_exam_mode_round_trip() {
        for mode in [ExamMode::MultipleChoice, ExamMode::ShortAnswer, ExamMode::Mixed] {
            assert_eq!(ExamMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(ExamMode::from_str("multiple_choice"), None);
        assert_eq!(ExamMode::from_str(""), None);
    }

    #[test]
    fn test_exam_direction_round_trip() {
        for dir in [ExamDirection::Forward, ExamDirection::Reverse] {
            assert_eq!(ExamDirection::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(ExamDirection::from_str("backward"), None);
    }

    #[test]
    fn test_enum_serde_string_forms() {
        assert_eq!(
            serde_json::to_string(&ExamMode::MultipleChoice).unwrap(),
            "\"multiple-choice\""
        );
        assert_eq!(
            serde_json::to_string(&ExamStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&ExamDirection::Reverse).unwrap(),
            "\"reverse\""
        );
    }

    // ============ 持久化字段名测试 ============

    #[test]
    fn test_question_serializes_with_original_field_names() {
        let q = ExamQuestion {
            word_id: "w1".to_string(),
            question_type: QuestionType::MultipleChoice,
            prompt: "apple".to_string(),
            choices: Some(vec![
                "苹果".to_string(),
                "香蕉".to_string(),
                "橙子".to_string(),
                "葡萄".to_string(),
            ]),
            correct_answer: "苹果".to_string(),
        };
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"wordId\""));
        assert!(json.contains("\"type\":\"multiple-choice\""));
        assert!(json.contains("\"correctAnswer\""));
    }

    #[test]
    fn test_short_answer_question_omits_choices() {
        let q = ExamQuestion {
            word_id: "w1".to_string(),
            question_type: QuestionType::ShortAnswer,
            prompt: "苹果".to_string(),
            choices: None,
            correct_answer: "apple".to_string(),
        };
        let json = serde_json::to_string(&q).unwrap();
        assert!(!json.contains("choices"));
    }

    #[test]
    fn test_session_state_serializes_with_original_field_names() {
        let state = ExamSessionState::new("set-1");
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"wordSetId\":\"set-1\""));
        assert!(json.contains("\"currentIndex\":0"));
        assert!(json.contains("\"startTime\":0"));
        assert!(json.contains("\"status\":\"config\""));
        // mode/direction 在 config 阶段不写出
        assert!(!json.contains("\"mode\""));
        assert!(!json.contains("\"direction\""));
    }

    #[test]
    fn test_session_state_round_trip() {
        let mut state = ExamSessionState::new("set-1");
        state.mode = Some(ExamMode::Mixed);
        state.direction = Some(ExamDirection::Forward);
        state.status = ExamStatus::InProgress;
        state.start_time = 1_700_000_000_000;
        state.questions.push(ExamQuestion {
            word_id: "w1".to_string(),
            question_type: QuestionType::ShortAnswer,
            prompt: "apple".to_string(),
            choices: None,
            correct_answer: "苹果".to_string(),
        });
        state.answers.push(ExamAnswer {
            question_index: 0,
            user_answer: "苹果".to_string(),
            is_correct: true,
        });

        let json = serde_json::to_string(&state).unwrap();
        let back: ExamSessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    // ============ 不变量检查测试 ============

    #[test]
    fn test_fresh_state_is_valid() {
        assert!(ExamSessionState::new("set-1").is_valid());
    }

    #[test]
    fn test_empty_word_set_id_invalid() {
        assert!(!ExamSessionState::new("").is_valid());
    }

    #[test]
    fn test_in_progress_requires_index_in_bounds() {
        let mut state = ExamSessionState::new("set-1");
        state.status = ExamStatus::InProgress;
        // 没有题目的 in-progress 非法
        assert!(!state.is_valid());

        state.questions.push(ExamQuestion {
            word_id: "w1".to_string(),
            question_type: QuestionType::ShortAnswer,
            prompt: "apple".to_string(),
            choices: None,
            correct_answer: "苹果".to_string(),
        });
        state.current_index = 0;
        assert!(state.is_valid());

        state.current_index = 1;
        assert!(!state.is_valid());
    }

    #[test]
    fn test_more_answers_than_questions_invalid() {
        let mut state = ExamSessionState::new("set-1");
        state.answers.push(ExamAnswer {
            question_index: 0,
            user_answer: String::new(),
            is_correct: false,
        });
        assert!(!state.is_valid());
    }

    #[test]
    fn test_config_with_leftover_questions_invalid() {
        let mut state = ExamSessionState::new("set-1");
        state.questions.push(ExamQuestion {
            word_id: "w1".to_string(),
            question_type: QuestionType::ShortAnswer,
            prompt: "apple".to_string(),
            choices: None,
            correct_answer: "苹果".to_string(),
        });
        assert!(!state.is_valid());
    }

    // ============ 错误显示测试 ============

    #[test]
    fn test_error_display() {
        let err = ExamError::InvalidConfig("题目数超过单词数".to_string());
        assert!(err.to_string().contains("无效的测验配置"));
        assert!(ExamError::DivisionByZero.to_string().contains("题目总数为零"));
    }
}
