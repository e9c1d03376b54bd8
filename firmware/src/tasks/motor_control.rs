//! モーター制御タスク
//!
//! 設定検証 → アライメント → Hall転流開始 → 始動ランプ → 運転（電流制限ウィンドウの繰り返し）

use core::sync::atomic::Ordering;

use embassy_futures::yield_now;
use hall_bldc::control::{align, CurrentLimitedRamp};
use hall_bldc::motor_driver::DutyActuator;

use crate::config::{self, DriveConfig};
use crate::hall_tim;
use crate::motor_driver::BoardDrive;
use crate::state::{set_drive_phase, DrivePhase, DRIVE_STATUS};

/// モーター制御タスク
///
/// アライメントとランプはブロッキングで実行される（その間は他タスクは動かない）。
/// 運転中はウィンドウごとに一度yieldする。
#[embassy_executor::task]
pub async fn motor_control_task(mut drive: BoardDrive, drive_config: DriveConfig) {
    info!("Motor control task started (Hall six-step)");

    // 1. 全ゲートオフ、設定検証
    hall_tim::disable_commutation();
    drive.stop();

    if let Err(e) = drive_config.validate() {
        error!("Invalid drive configuration: {}", e);
        set_drive_phase(DrivePhase::Fault).await;
        return;
    }
    hall_tim::set_hall_table(drive_config.hall_table);
    drive.sensor().calibrate();

    // 2. ロータアライメント（転流割り込みは無効のまま）
    set_drive_phase(DrivePhase::Aligning).await;
    align(&mut drive, &drive_config.align);

    // 3. Hall転流開始（Duty 0から）
    let ramp_config = drive_config.ramp;
    let mut ramp = CurrentLimitedRamp::new(ramp_config.duty_max);
    drive.write_duty_cycle(ramp.duty());
    hall_tim::reset_counters();
    hall_tim::enable_commutation();
    info!("Hall commutation enabled");

    // 4. 始動ランプ
    set_drive_phase(DrivePhase::Ramping).await;
    let current = ramp.run(
        &mut drive,
        ramp_config.duration_ticks,
        ramp_config.current_ceiling,
    );
    info!(
        "Startup ramp done: duty={}/{}, current={}A, edges={}",
        ramp.duty(),
        ramp.duty_max(),
        current,
        hall_tim::HALL_EDGES.load(Ordering::Relaxed)
    );

    // 5. 運転
    set_drive_phase(DrivePhase::Running).await;
    let mut window: u32 = 0;
    loop {
        let current = ramp.run(
            &mut drive,
            ramp_config.run_window_ticks,
            ramp_config.run_current_ceiling,
        );

        let status = {
            let mut status = DRIVE_STATUS.lock().await;
            status.duty = ramp.duty();
            status.current = current;
            status.overcurrent = drive.sensor().state().overcurrent;
            status.hall_edges = hall_tim::HALL_EDGES.load(Ordering::Relaxed);
            status.invalid_codes = hall_tim::INVALID_CODES.load(Ordering::Relaxed);
            status.sector = hall_tim::LAST_SECTOR.load(Ordering::Relaxed);
            *status
        };

        window = window.wrapping_add(1);
        if window % config::status::LOG_EVERY_WINDOWS == 0 {
            info!(
                "[Run] duty={}, current={}A, sector={}, edges={}, invalid={}",
                status.duty,
                status.current,
                status.sector,
                status.hall_edges,
                status.invalid_codes
            );
        }

        yield_now().await;
    }
}
