//! Shuffle Utility
//!
//! Fisher-Yates randomization, the foundation for question ordering and
//! distractor selection.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 以系统时间作为种子返回一个默认随机数生成器
pub(crate) fn default_rng() -> ChaCha8Rng {
    use std::time::{SystemTime, UNIX_EPOCH};
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42);
    ChaCha8Rng::seed_from_u64(seed)
}

/// 返回输入序列的一个均匀随机排列，不修改原序列
///
/// 空序列和单元素序列原样复制返回。
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    let mut rng = default_rng();
    shuffle_with(items, &mut rng)
}

/// Fisher-Yates shuffle with a caller-supplied generator
///
/// Iterates `i` from `len - 1` down to `1`, draws `j` uniformly from
/// `[0, i]`, and swaps. Deterministic for a seeded generator.
pub fn shuffle_with<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out: Vec<T> = items.to_vec();
    if out.len() < 2 {
        return out;
    }
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// 两个等长序列是否至少有一个位置不同
///
/// 仅用于测试洗牌确定性，不参与正确性判断。
pub fn is_permutation_different<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).any(|(x, y)| x != y)
}

// ==================== Tests ====================
