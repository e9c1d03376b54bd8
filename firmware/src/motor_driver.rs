//! モータードライバー抽象化レイヤー
//!
//! `hall_bldc` のハードウェアトレイトをSTM32G431のペリフェラルに結び付けます。
//!
//! - ハイサイド: PE9/PE11/PE13（GPIO、BSRR）
//! - ローサイド: TIM1 CH1N/CH2N/CH3N（PE8/PE10/PE12）
//! - Hall: PB6/PB7/PB8
//! - 電流: ADC1 PA0（シャントアンプ出力）

use embassy_stm32::{
    adc::{Adc, AnyAdcChannel},
    pac, peripherals,
    timer::{complementary_pwm::ComplementaryPwm, Channel},
};
use embassy_time::Instant;
use hall_bldc::current_sense::{CurrentMonitor, CurrentMonitorState};
use hall_bldc::motor_driver::{
    CurrentSense, DutyActuator, HallInputs, Phase, PhaseDriver, TickTimer,
};

use crate::hardware::HIGH_SIDE_PINS;

/// 1ティック = 10μs
const MICROS_PER_TICK: u64 = 10;

/// ゲートとHall入力（レジスタ直接操作、状態を持たない）
///
/// 割り込みとタスクの両方から使用する。どちらが使うかは
/// `hall_tim::COMMUTATION_ENABLED` で切り替える。
pub struct BoardGates;

impl BoardGates {
    fn set_low_side(&mut self, phase: Phase, mode: pac::timer::vals::Ocm, enable: bool) {
        let tim1 = pac::TIM1;
        let ch = phase.index();
        tim1.ccmr_output(ch / 2).modify(|w| w.set_ocm(ch % 2, mode));
        tim1.ccer().modify(|w| w.set_ccne(ch, enable));
    }

    /// 全ローサイドを強制インアクティブ・出力無効にする
    pub fn disable_all_low_sides(&mut self) {
        for phase in Phase::ALL {
            self.phase_low_pwm_disable(phase);
        }
    }
}

impl PhaseDriver for BoardGates {
    fn phase_high_enable(&mut self, phase: Phase) {
        pac::GPIOE
            .bsrr()
            .write(|w| w.set_bs(HIGH_SIDE_PINS[phase.index()], true));
    }

    fn phase_high_disable(&mut self, phase: Phase) {
        pac::GPIOE
            .bsrr()
            .write(|w| w.set_br(HIGH_SIDE_PINS[phase.index()], true));
    }

    fn phase_low_pwm_enable(&mut self, phase: Phase) {
        self.set_low_side(phase, pac::timer::vals::Ocm::PWM_MODE1, true);
    }

    fn phase_low_pwm_disable(&mut self, phase: Phase) {
        self.set_low_side(phase, pac::timer::vals::Ocm::FORCE_INACTIVE, false);
    }

    fn phase_low_hard_enable(&mut self, phase: Phase) {
        // PWMを経由せず常時オン（OCxREF強制High）
        self.set_low_side(phase, pac::timer::vals::Ocm::FORCE_ACTIVE, true);
    }
}

impl HallInputs for BoardGates {
    fn hall_lines(&mut self) -> u8 {
        let idr = pac::GPIOB.idr().read();
        let h1 = idr.idr(6) as u8; // PB6
        let h2 = idr.idr(7) as u8; // PB7
        let h3 = idr.idr(8) as u8; // PB8
        (h3 << 2) | (h2 << 1) | h1
    }
}

/// シャント電流センサー（ADC1 + フィルタ）
pub struct ShuntCurrentSensor {
    adc: Adc<'static, peripherals::ADC1>,
    channel: AnyAdcChannel<peripherals::ADC1>,
    monitor: CurrentMonitor,
}

impl ShuntCurrentSensor {
    pub fn new(
        adc: Adc<'static, peripherals::ADC1>,
        channel: AnyAdcChannel<peripherals::ADC1>,
    ) -> Self {
        Self {
            adc,
            channel,
            monitor: CurrentMonitor::default(),
        }
    }

    /// 初回ADC読み取りでフィルタを初期化（起動時の過渡を防ぐ）
    pub fn calibrate(&mut self) -> CurrentMonitorState {
        let raw = self.adc.blocking_read(&mut self.channel);
        self.monitor.initialize_with_adc(raw);
        let state = self.monitor.state();
        info!(
            "Initial current: {}A (ADC raw: {}), OC={}",
            state.current, raw, state.overcurrent
        );
        state
    }

    pub fn state(&self) -> CurrentMonitorState {
        self.monitor.state()
    }
}

impl CurrentSense for ShuntCurrentSensor {
    fn read_current(&mut self) -> f32 {
        let raw = self.adc.blocking_read(&mut self.channel);
        self.monitor.update(raw).current
    }
}

/// 駆動系一式（ゲート、PWM、電流センサー、ティックタイマー）
pub struct BoardDrive {
    gates: BoardGates,
    pwm: ComplementaryPwm<'static, peripherals::TIM1>,
    max_duty: u16,
    duty_max: u16,
    sensor: ShuntCurrentSensor,
    origin: Instant,
}

impl BoardDrive {
    /// # 引数
    /// * `pwm` - ローサイドPWM（TIM1）
    /// * `sensor` - 電流センサー
    /// * `duty_max` - 制御側のDuty上限（この値でTIM1の最大値になる）
    pub fn new(
        pwm: ComplementaryPwm<'static, peripherals::TIM1>,
        sensor: ShuntCurrentSensor,
        duty_max: u16,
    ) -> Self {
        let max_duty = pwm.get_max_duty();
        Self {
            gates: BoardGates,
            pwm,
            max_duty,
            duty_max,
            sensor,
            origin: Instant::now(),
        }
    }

    pub fn sensor(&mut self) -> &mut ShuntCurrentSensor {
        &mut self.sensor
    }

    /// 制御側Duty → TIM1比較値
    fn scale_duty(&self, duty: u16) -> u16 {
        let duty = duty.min(self.duty_max) as u32;
        (duty * self.max_duty as u32 / self.duty_max.max(1) as u32) as u16
    }

    /// Duty 0、全ゲートオフ
    pub fn stop(&mut self) {
        self.write_duty_cycle(0);
        self.gates.disable_all();
    }
}

impl PhaseDriver for BoardDrive {
    fn phase_high_enable(&mut self, phase: Phase) {
        self.gates.phase_high_enable(phase);
    }

    fn phase_high_disable(&mut self, phase: Phase) {
        self.gates.phase_high_disable(phase);
    }

    fn phase_low_pwm_enable(&mut self, phase: Phase) {
        self.gates.phase_low_pwm_enable(phase);
    }

    fn phase_low_pwm_disable(&mut self, phase: Phase) {
        self.gates.phase_low_pwm_disable(phase);
    }

    fn phase_low_hard_enable(&mut self, phase: Phase) {
        self.gates.phase_low_hard_enable(phase);
    }
}

impl TickTimer for BoardDrive {
    fn elapsed_ticks(&mut self) -> u32 {
        let ticks = self.origin.elapsed().as_micros() / MICROS_PER_TICK;
        ticks.min(u32::MAX as u64) as u32
    }

    fn reset_ticks(&mut self) {
        self.origin = Instant::now();
    }
}

impl CurrentSense for BoardDrive {
    fn read_current(&mut self) -> f32 {
        self.sensor.read_current()
    }
}

impl DutyActuator for BoardDrive {
    fn write_duty_cycle(&mut self, duty: u16) {
        let compare = self.scale_duty(duty);
        self.pwm.set_duty(Channel::Ch1, compare);
        self.pwm.set_duty(Channel::Ch2, compare);
        self.pwm.set_duty(Channel::Ch3, compare);
    }
}
