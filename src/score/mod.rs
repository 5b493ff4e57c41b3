//! Scorer
//!
//! Aggregates submitted answers into a result summary. Duration is the
//! caller's job (`now - startTime`), not the scorer's.

use crate::types::{ExamAnswer, ExamError, ScoreSummary};

/// 汇总答题记录
///
/// `correct_count` 为判对的提交数，`incorrect_count` 为其余提交数；
/// 未作答的题目不计入任何一边（调用方应保证交卷前每题恰有一条记录）。
/// 百分比按四舍五入取整。`total_questions` 为零时返回
/// `ExamError::DivisionByZero`，属于调用方不变量被破坏。
pub fn score(answers: &[ExamAnswer], total_questions: usize) -> Result<ScoreSummary, ExamError> {
    if total_questions == 0 {
        return Err(ExamError::DivisionByZero);
    }

    let correct_count = answers.iter().filter(|a| a.is_correct).count();
    let incorrect_count = answers.len() - correct_count;
    let percentage = (correct_count as f64 / total_questions as f64 * 100.0).round();

    Ok(ScoreSummary {
        correct_count,
        incorrect_count,
        percentage,
    })
}

// ==================== Tests ====================
