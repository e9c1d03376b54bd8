//! LED制御タスク
//!
//! 駆動フェーズをLEDで表示します。
//!
//! | フェーズ | LED1 | LED2 | LED3 |
//! |---|---|---|---|
//! | Idle | 点灯 | - | - |
//! | Aligning | 点滅 | - | - |
//! | Ramping | - | 点滅 | - |
//! | Running | - | 点灯 | - |
//! | Fault | - | - | 点滅 |

use embassy_futures::select::{select, Either};
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};

use crate::config;
use crate::state::{DrivePhase, DRIVE_PHASE};

/// 点灯パターン
#[derive(Clone, Copy)]
enum Pattern {
    Solid,
    Blink,
}

fn pattern_for(phase: DrivePhase) -> (usize, Pattern) {
    match phase {
        DrivePhase::Idle => (0, Pattern::Solid),
        DrivePhase::Aligning => (0, Pattern::Blink),
        DrivePhase::Ramping => (1, Pattern::Blink),
        DrivePhase::Running => (1, Pattern::Solid),
        DrivePhase::Fault => (2, Pattern::Blink),
    }
}

/// LED制御タスク
///
/// フェーズが変わるまで現在のパターンを繰り返します。
#[embassy_executor::task]
pub async fn led_task(led1: Output<'static>, led2: Output<'static>, led3: Output<'static>) {
    info!("LED task started");

    let mut leds = [led1, led2, led3];
    let mut phase = DrivePhase::Idle;
    let mut lit = true;
    let half_period = Duration::from_millis(config::led::BLINK_HALF_PERIOD_MS);

    loop {
        let (index, pattern) = pattern_for(phase);
        for (i, led) in leds.iter_mut().enumerate() {
            let on = i == index && (lit || matches!(pattern, Pattern::Solid));
            if on {
                led.set_high();
            } else {
                led.set_low();
            }
        }

        match select(DRIVE_PHASE.wait(), Timer::after(half_period)).await {
            Either::First(next) => {
                debug!("LED: phase {:?}", next);
                phase = next;
                lit = true;
            }
            Either::Second(()) => lit = !lit,
        }
    }
}
