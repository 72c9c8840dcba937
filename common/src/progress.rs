//! 演出用の進捗スケジュール
//!
//! 解析待ちの間に表示する固定ラベル列。実際の処理進捗とは連動しない。
//! 実完了のシグナル（受信中・完了）はスケジュールと別に固定。

use crate::types::ProgressState;
use std::time::Duration;

/// 各ステージの表示時間
pub const DEFAULT_STAGE_DELAY: Duration = Duration::from_millis(400);

pub const RECEIVING_PERCENT: u8 = 98;
pub const COMPLETE_PERCENT: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSchedule {
    pub stages: Vec<ProgressState>,
    /// ステージごとの待ち時間
    pub delay: Duration,
}

impl ProgressSchedule {
    /// 既定の6段階（10/25/50/65/80/95%）
    pub fn scripted() -> Self {
        let stages = [
            (10, "Preprocessing document image..."),
            (25, "Sending to Gemini AI for analysis..."),
            (50, "Running multi-language OCR..."),
            (65, "Analyzing security features..."),
            (80, "Validating document structure..."),
            (95, "Compiling verification report..."),
        ]
        .into_iter()
        .map(|(percent, text)| ProgressState::new(percent, text))
        .collect();

        Self {
            stages,
            delay: DEFAULT_STAGE_DELAY,
        }
    }

    /// 演出なし（受信中・完了のみ通知）
    pub fn disabled() -> Self {
        Self {
            stages: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.stages.is_empty()
    }

    /// 演出全体の所要時間
    pub fn total_delay(&self) -> Duration {
        self.delay * self.stages.len() as u32
    }

    pub fn receiving() -> ProgressState {
        ProgressState::new(RECEIVING_PERCENT, "Receiving results from Gemini...")
    }

    pub fn complete() -> ProgressState {
        ProgressState::new(COMPLETE_PERCENT, "Analysis complete.")
    }
}

impl Default for ProgressSchedule {
    fn default() -> Self {
        Self::scripted()
    }
}
