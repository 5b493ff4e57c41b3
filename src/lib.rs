//! # danci-exam - 词汇测验引擎
//!
//! 本 crate 提供纯 Rust 实现的测验子系统:
//!
//! - **Question Generator** - 把词表变成一份随机化试卷
//! - **Answer Validator** - 归一化比较用户答案
//! - **Scorer** - 汇总答题记录并计算得分
//! - **Exam Session** - config -> in-progress -> completed 生命周期，
//!   跨重载恢复
//!
//! ## 设计理念
//!
//! 本 crate 的设计目标:
//! - **纯 Rust** - 单线程同步核心，无内部挂起点
//! - **可注入** - 存储协作方与随机源均由调用方注入，单测无需任何环境
//! - **充分测试** - 所有组件都有完整的单元测试
//! - **降级友好** - 存储失败只降级为仅内存运行，绝不影响测验结果
//!
//! ## 模块结构
//!
//! - [`shuffle`] - Fisher-Yates 洗牌工具
//! - [`generator`] - 出题器 (选词、定题型、构造干扰项)
//! - [`validate`] - 判题 (去空白、忽略大小写)
//! - [`score`] - 计分
//! - [`session`] - 测验会话状态机
//! - [`storage`] - 存储协作方接口与实现
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use danci_exam::{
//!     ExamConfig, ExamDirection, ExamMode, ExamSession, MemoryStore, WordItem,
//! };
//!
//! let words = vec![
//!     WordItem::new("w1", "apple", "苹果"),
//!     WordItem::new("w2", "banana", "香蕉"),
//!     WordItem::new("w3", "cherry", "樱桃"),
//! ];
//!
//! let mut session = ExamSession::new("my-word-set", MemoryStore::new());
//! session
//!     .start_exam(
//!         &words,
//!         ExamConfig {
//!             mode: ExamMode::ShortAnswer,
//!             direction: ExamDirection::Forward,
//!             question_count: 3,
//!         },
//!     )
//!     .expect("配置有效");
//!
//! while let Some(question) = session.current_question() {
//!     let answer = question.correct_answer.clone();
//!     if session.submit_answer(&answer).is_none() {
//!         break;
//!     }
//!     session.next_question();
//! }
//!
//! let result = session.finish_exam().expect("测验进行中");
//! assert_eq!(result.correct_count, 3);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod generator;
pub mod score;
pub mod session;
pub mod shuffle;
pub mod storage;
pub mod types;
pub mod validate;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出洗牌工具
pub use shuffle::{is_permutation_different, shuffle, shuffle_with};

/// 重新导出出题器
pub use generator::{sanitize_word_list, QuestionGenerator};

/// 重新导出判题函数
pub use validate::{normalize, validate};

/// 重新导出计分函数
pub use score::score;

/// 重新导出会话状态机
pub use session::ExamSession;

/// 重新导出存储接口与实现
pub use storage::{session_key, KeyValueStore, MemoryStore, SqliteStore};
