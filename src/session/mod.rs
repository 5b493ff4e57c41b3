//! 测验会话状态机
//!
//! 持有一次测验从 config 到 in-progress 再到 completed 的完整生命周期，
//! 协调出题、判题和计分，并在每次状态变更后尽力持久化，使会话可以在
//! 页面重载后恢复。
//!
//! 设计要点：
//! - 会话是调用方显式持有的结构体，存储协作方通过 [`KeyValueStore`]
//!   注入，没有任何全局可变状态
//! - 每个词集同一时刻只有一个会话，持久化键由词集 id 派生
//! - 无效配置同步报错；其余操作在非法状态下一律幂等无操作，因为它们
//!   由 UI 事件驱动，无法保证前置条件
//! - 存储失败只记录日志，内存状态始终是权威副本

use chrono::Utc;

use crate::generator::{sanitize_word_list, QuestionGenerator};
use crate::score::score;
use crate::storage::{session_key, KeyValueStore};
use crate::types::{
    ExamAnswer, ExamConfig, ExamError, ExamQuestion, ExamResult, ExamSessionState, ExamStatus,
    WordItem,
};
use crate::validate::validate;

// ============================================================
// ExamSession - 测验会话
// ============================================================

/// 单个词集的测验会话
pub struct ExamSession<S: KeyValueStore> {
    state: ExamSessionState,
    store: S,
    generator: QuestionGenerator,
}

impl<S: KeyValueStore> ExamSession<S> {
    /// 创建 config 状态的新会话
    pub fn new(word_set_id: impl Into<String>, store: S) -> Self {
        Self {
            state: ExamSessionState::new(word_set_id),
            store,
            generator: QuestionGenerator::new(),
        }
    }

    /// 创建固定随机种子的会话（用于测试）
    pub fn with_seed(word_set_id: impl Into<String>, store: S, seed: u64) -> Self {
        Self {
            state: ExamSessionState::new(word_set_id),
            store,
            generator: QuestionGenerator::with_seed(seed),
        }
    }

    /// 从存储恢复会话
    ///
    /// 读取失败、解析失败或快照不满足不变量时记录日志并重建空白会话，
    /// 绝不信任坏快照。
    pub fn restore(word_set_id: impl Into<String>, store: S) -> Self {
        let word_set_id = word_set_id.into();

        let restored = match store.get(&session_key(&word_set_id)) {
            Ok(Some(json)) => match serde_json::from_str::<ExamSessionState>(&json) {
                Ok(state) if state.word_set_id == word_set_id && state.is_valid() => Some(state),
                Ok(_) => {
                    log::warn!("持久化会话不满足不变量，弃用: {}", word_set_id);
                    None
                }
                Err(e) => {
                    log::warn!("持久化会话解析失败: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("读取持久化会话失败: {}", e);
                None
            }
        };

        Self {
            state: restored.unwrap_or_else(|| ExamSessionState::new(word_set_id)),
            store,
            generator: QuestionGenerator::new(),
        }
    }

    // ========== 只读访问 ==========

    /// 当前完整状态
    pub fn state(&self) -> &ExamSessionState {
        &self.state
    }

    /// 当前生命周期阶段
    pub fn status(&self) -> ExamStatus {
        self.state.status
    }

    /// 当前题目；config 阶段或越界时为 `None`
    pub fn current_question(&self) -> Option<&ExamQuestion> {
        self.state.questions.get(self.state.current_index)
    }

    /// 所属词集 id
    pub fn word_set_id(&self) -> &str {
        &self.state.word_set_id
    }

    // ========== 状态迁移 ==========

    /// 开始测验：config -> in-progress
    ///
    /// 先清洗词表再同步出题。配置无效时返回错误且状态不发生任何变化；
    /// 非 config 状态下调用是幂等无操作。
    pub fn start_exam(&mut self, words: &[WordItem], config: ExamConfig) -> Result<(), ExamError> {
        if self.state.status != ExamStatus::Config {
            return Ok(());
        }

        let words = sanitize_word_list(words);
        let questions = self.generator.generate(
            &words,
            config.mode,
            config.direction,
            config.question_count,
        )?;

        self.state.mode = Some(config.mode);
        self.state.direction = Some(config.direction);
        self.state.questions = questions;
        self.state.current_index = 0;
        self.state.answers = Vec::new();
        self.state.start_time = now_ms();
        self.state.status = ExamStatus::InProgress;
        self.persist();

        log::info!(
            "测验开始: 词集 {}，共 {} 题",
            self.state.word_set_id,
            self.state.questions.len()
        );
        Ok(())
    }

    /// 提交当前题目的答案，返回判题结果
    ///
    /// 仅在 in-progress 状态下生效，否则返回 `None`。不自动推进题目
    /// 游标，留给 UI 先展示反馈再翻页。同一题重复提交是无操作。
    pub fn submit_answer(&mut self, text: &str) -> Option<bool> {
        if self.state.status != ExamStatus::InProgress {
            return None;
        }
        let index = self.state.current_index;
        if self.state.answers.iter().any(|a| a.question_index == index) {
            return None;
        }
        let question = self.state.questions.get(index)?;

        let is_correct = validate(text, &question.correct_answer);
        self.state.answers.push(ExamAnswer {
            question_index: index,
            user_answer: text.to_string(),
            is_correct,
        });
        self.persist();
        Some(is_correct)
    }

    /// 前进到下一题，末题处钳制
    pub fn next_question(&mut self) {
        if self.state.status != ExamStatus::InProgress {
            return;
        }
        if self.state.current_index + 1 < self.state.questions.len() {
            self.state.current_index += 1;
            self.persist();
        }
    }

    /// 退回到上一题，首题处钳制
    pub fn prev_question(&mut self) {
        if self.state.status != ExamStatus::InProgress {
            return;
        }
        if self.state.current_index > 0 {
            self.state.current_index -= 1;
            self.persist();
        }
    }

    /// 交卷：in-progress -> completed，返回测验结果
    ///
    /// 非 in-progress 状态下返回 `None`。
    pub fn finish_exam(&mut self) -> Option<ExamResult> {
        if self.state.status != ExamStatus::InProgress {
            return None;
        }

        // start_exam 保证题目非空，这里的 ok()? 只是防御
        let summary = score(&self.state.answers, self.state.questions.len()).ok()?;
        let duration = (now_ms() - self.state.start_time).max(0);

        self.state.status = ExamStatus::Completed;
        self.persist();

        log::info!(
            "测验完成: 词集 {}，{}/{} 答对",
            self.state.word_set_id,
            summary.correct_count,
            self.state.questions.len()
        );

        Some(ExamResult {
            correct_count: summary.correct_count,
            incorrect_count: summary.incorrect_count,
            percentage: summary.percentage,
            duration,
        })
    }

    /// 重置：任意状态 -> config，并删除持久化副本
    pub fn reset_exam(&mut self) {
        let word_set_id = std::mem::take(&mut self.state.word_set_id);
        self.state = ExamSessionState::new(word_set_id);

        if let Err(e) = self.store.remove(&session_key(&self.state.word_set_id)) {
            log::warn!("删除持久化会话失败: {}", e);
        }
    }

    // ========== 持久化 ==========

    /// 尽力而为地写出当前状态
    ///
    /// 任何失败只记录日志，不向调用方传播。
    fn persist(&self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("序列化会话状态失败: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .store
            .set(&session_key(&self.state.word_set_id), &json)
        {
            log::warn!("持久化会话状态失败，降级为仅内存运行: {}", e);
        }
    }
}

/// 当前时刻的 epoch 毫秒
fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// ============================================================
// 测试
// ============================================================
