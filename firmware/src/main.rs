#![no_std]
#![no_main]

mod fmt;

mod config;
mod hall_tim;
mod hardware;
mod motor_driver;
mod state;
mod tasks;

#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_time::{Duration, Timer};

use config::DriveConfig;
use motor_driver::BoardDrive;
use tasks::{led_task, motor_control_task};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // ハードウェア初期化
    let config = hardware::create_clock_config();
    let p = embassy_stm32::init(config);

    info!("═══════════════════════════════════════════════════════════════════");
    info!("        Hall BLDC six-step driver • STM32G431VB @ 170MHz");
    info!("═══════════════════════════════════════════════════════════════════");

    // ゲートを最初に安全な状態にする（ハイサイドLow、ローサイド無効）
    unsafe {
        hardware::init_high_side_gates();
    }
    let pwm = hardware::init_low_side_pwm(p.TIM1, p.PE8, p.PE10, p.PE12);

    // LED初期化＆タスク起動
    let led1 = Output::new(p.PC13, Level::High, Speed::Low);
    let led2 = Output::new(p.PC14, Level::Low, Speed::Low);
    let led3 = Output::new(p.PC15, Level::Low, Speed::Low);
    spawner.spawn(led_task(led1, led2, led3)).unwrap();

    // 電流センサー（PA0 = ADC1_IN1）
    let sensor = hardware::init_current_sensor(p.ADC1, p.PA0);
    info!("Current sensing on PA0 (ADC1_IN1)");

    // TIM4 Hallセンサーインターフェース初期化（転流はまだ無効）
    unsafe {
        hardware::init_hall_sensor();
    }

    let drive_config = DriveConfig::default();
    let drive = BoardDrive::new(pwm, sensor, drive_config.ramp.duty_max);

    info!("Starting Hall six-step motor control...");
    spawner.spawn(motor_control_task(drive, drive_config)).unwrap();

    loop {
        Timer::after(Duration::from_millis(1000)).await;
    }
}
