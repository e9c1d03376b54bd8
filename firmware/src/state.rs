//! グローバル共有状態管理
//!
//! タスク間で共有される状態をMutexで保護して管理します。
//! 割り込みと共有するカウンタは `hall_tim` のアトミック変数を参照してください。

use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

/// 駆動フェーズ（LED表示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrivePhase {
    /// 起動直後、全ゲートオフ
    Idle,
    /// ロータアライメント中
    Aligning,
    /// 始動ランプ中
    Ramping,
    /// Hall転流で運転中
    Running,
    /// 設定エラー、全ゲートオフ
    Fault,
}

/// 運転ステータス（ランウィンドウごとに更新）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveStatus {
    pub phase: DrivePhase,
    /// 現在のDuty（制御側単位）
    pub duty: u16,
    /// 最後の電流サンプル [A]
    pub current: f32,
    pub overcurrent: bool,
    pub hall_edges: u32,
    pub invalid_codes: u32,
    /// 最後に転流したセクター（0 = 不正/無効）
    pub sector: u8,
}

impl DriveStatus {
    pub const fn new() -> Self {
        Self {
            phase: DrivePhase::Idle,
            duty: 0,
            current: 0.0,
            overcurrent: false,
            hall_edges: 0,
            invalid_codes: 0,
            sector: 0,
        }
    }
}

/// 運転ステータス
pub static DRIVE_STATUS: Mutex<ThreadModeRawMutex, DriveStatus> = Mutex::new(DriveStatus::new());

/// 駆動フェーズ変化の通知（LEDタスク用）
pub static DRIVE_PHASE: Signal<ThreadModeRawMutex, DrivePhase> = Signal::new();

/// フェーズを更新してLEDタスクに通知
pub async fn set_drive_phase(phase: DrivePhase) {
    DRIVE_STATUS.lock().await.phase = phase;
    DRIVE_PHASE.signal(phase);
}
