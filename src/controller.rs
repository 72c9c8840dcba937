//! Verification Flow Controller
//!
//! 1回の検証試行（Attempt）のライフサイクルを管理する状態機械:
//! Idle → Running → Settled
//!
//! - 試行開始時に前回の状態をすべてクリア
//! - 演出用の進捗スケジュールを順に通知
//! - 画像をBase64化してAnalysis Clientを呼び出す
//! - 成功なら結果、失敗なら "Verification Failed: ..." をエラーとして保持

use crate::analyzer::DocumentAnalyzer;
use crate::document::preview_reference;
use crate::error::{Result, VerifyError};
use base64::prelude::*;
use doc_verify_common::{ProgressSchedule, ProgressState, UploadedFile, VerificationResultData};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 試行の状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Settled,
}

/// Controllerが保持するUI状態
///
/// resultとerrorは同時に埋まらない
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationState {
    pub file: Option<UploadedFile>,
    pub preview_url: Option<String>,
    pub result: Option<VerificationResultData>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub progress: ProgressState,
    pub phase: Phase,
}

struct Inner {
    state: VerificationState,
    /// reset/submitのたびに進む。古い試行の書き込みを捨てるのに使う
    generation: u64,
}

pub struct VerificationController<A> {
    analyzer: A,
    schedule: ProgressSchedule,
    inner: Mutex<Inner>,
}

impl<A: DocumentAnalyzer> VerificationController<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            schedule: ProgressSchedule::scripted(),
            inner: Mutex::new(Inner {
                state: VerificationState::default(),
                generation: 0,
            }),
        }
    }

    /// 演出スケジュールを差し替える
    pub fn with_schedule(mut self, schedule: ProgressSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn schedule(&self) -> &ProgressSchedule {
        &self.schedule
    }

    /// 検証試行を1回実行する
    ///
    /// `Err`を返すのは試行が始まらなかった場合のみ（APIキー未設定・実行中）。
    /// 試行中の失敗は状態の`error`に格納され、`Ok(())`で返る。
    pub async fn submit<F>(&self, file: UploadedFile, on_progress: F) -> Result<()>
    where
        F: Fn(&ProgressState),
    {
        self.analyzer.ensure_configured()?;

        let media_type = file.media_type.clone();
        let bytes = file.bytes.clone();
        let generation = {
            let mut inner = self.lock();
            if inner.state.phase == Phase::Running {
                log::warn!("submit rejected: attempt already running");
                return Err(VerifyError::AttemptInProgress);
            }
            inner.generation += 1;
            log::info!(
                "attempt #{} started: {} ({}, {} bytes)",
                inner.generation,
                file.file_name,
                file.media_type,
                file.len()
            );
            inner.state = VerificationState {
                preview_url: Some(preview_reference(&file)),
                file: Some(file),
                is_loading: true,
                phase: Phase::Running,
                ..Default::default()
            };
            inner.generation
        };
        // settle前にfutureが破棄されたらRunningを解除する
        let _guard = AttemptGuard {
            inner: &self.inner,
            generation,
        };

        if !self.schedule.is_disabled() {
            log::debug!(
                "scripted progress: {} stages over {:?}",
                self.schedule.stages.len(),
                self.schedule.total_delay()
            );
        }

        for stage in &self.schedule.stages {
            if !self.apply_progress(generation, stage.clone(), &on_progress) {
                return Ok(());
            }
            tokio::time::sleep(self.schedule.delay).await;
        }

        let outcome = match encode_base64(bytes).await {
            Ok(encoded) => {
                if !self.apply_progress(generation, ProgressSchedule::receiving(), &on_progress) {
                    return Ok(());
                }
                self.analyzer.analyze(&encoded, &media_type).await
            }
            Err(err) => Err(err),
        };

        self.settle(generation, outcome, &on_progress);
        Ok(())
    }

    /// すべての状態を初期値へ戻す
    ///
    /// 実行中の試行があれば以後その書き込みは捨てられる
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = VerificationState::default();
        log::debug!("state reset (generation {})", inner.generation);
    }

    pub fn snapshot(&self) -> VerificationState {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading
    }

    pub fn result(&self) -> Option<VerificationResultData> {
        self.lock().state.result.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 進捗を反映して通知。試行がresetで破棄済みならfalse
    fn apply_progress<F>(&self, generation: u64, progress: ProgressState, on_progress: &F) -> bool
    where
        F: Fn(&ProgressState),
    {
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                log::debug!("attempt #{} abandoned after reset", generation);
                return false;
            }
            inner.state.progress = progress.clone();
        }
        log::debug!("progress {}%: {}", progress.percent, progress.text);
        on_progress(&progress);
        true
    }

    fn settle<F>(&self, generation: u64, outcome: Result<VerificationResultData>, on_progress: &F)
    where
        F: Fn(&ProgressState),
    {
        let complete = ProgressSchedule::complete();
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                log::debug!("attempt #{} settled after reset, discarding outcome", generation);
                return;
            }
            let state = &mut inner.state;
            match outcome {
                Ok(result) => {
                    log::info!(
                        "attempt #{} settled: {} ({:.2})",
                        generation,
                        result.overall_status.as_str(),
                        result.confidence_score
                    );
                    state.result = Some(result);
                    state.error = None;
                }
                Err(err) => {
                    log::warn!("attempt #{} failed: {}", generation, err);
                    state.error = Some(err.to_failure_message());
                    state.result = None;
                }
            }
            state.progress = complete.clone();
            state.is_loading = false;
            state.phase = Phase::Settled;
        }
        on_progress(&complete);
    }
}

/// 実行中の試行を見張るガード
///
/// submitのfutureがtimeout・select!などで途中破棄された場合に、
/// 世代が一致していれば状態をIdleへ戻す
struct AttemptGuard<'a> {
    inner: &'a Mutex<Inner>,
    generation: u64,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.generation != self.generation || inner.state.phase != Phase::Running {
            return;
        }
        log::warn!("attempt #{} dropped before completion", self.generation);
        inner.state.is_loading = false;
        inner.state.phase = Phase::Idle;
    }
}

/// Base64エンコード（ブロッキングプールで実行）
async fn encode_base64(bytes: Vec<u8>) -> Result<String> {
    if bytes.is_empty() {
        return Err(VerifyError::Encoding("file is empty".into()));
    }
    tokio::task::spawn_blocking(move || BASE64_STANDARD.encode(&bytes))
        .await
        .map_err(|e| {
            log::error!("encoding task failed: {}", e);
            VerifyError::Unknown
        })
}
