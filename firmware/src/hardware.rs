//! ハードウェア初期化モジュール
//!
//! ペリフェラルの初期化ロジックを集約します。

use embassy_stm32::{
    adc::{Adc, AdcChannel},
    gpio::OutputType,
    pac,
    peripherals,
    timer::{
        complementary_pwm::{ComplementaryPwm, ComplementaryPwmPin},
        low_level::CountingMode,
        Channel,
    },
    Config, Peri,
};

use crate::config;
use crate::hall_tim;
use crate::motor_driver::{BoardGates, ShuntCurrentSensor};

/// ハイサイドゲート（GPIOE、BSRRで直接駆動）
pub const HIGH_SIDE_PINS: [usize; 3] = [9, 11, 13];

/// RCCクロック設定を初期化
///
/// HSI → PLL（÷4 × 85 ÷ 2）で170MHz生成
pub fn create_clock_config() -> Config {
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::mux::{Adcsel, ClockMux};
        use embassy_stm32::rcc::{Pll, PllMul, PllPreDiv, PllRDiv, PllSource, Sysclk};

        config.rcc.hsi = true;
        config.rcc.pll = Some(Pll {
            source: PllSource::HSI,
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL85,
            divp: None,
            divq: None,
            divr: Some(PllRDiv::DIV2),
        });
        config.rcc.sys = Sysclk::PLL1_R; // システムクロックをPLLに設定

        let mut clock_mux = ClockMux::default();
        clock_mux.adc12sel = Adcsel::SYS;
        config.rcc.mux = clock_mux;
    }
    config
}

/// ハイサイドゲート出力の初期化（PE9/PE11/PE13、初期値Low）
///
/// # Safety
/// PACを使用した直接レジスタ操作を含む
pub unsafe fn init_high_side_gates() {
    let rcc = pac::RCC;
    let gpioe = pac::GPIOE;

    rcc.ahb2enr().modify(|w| w.set_gpioeen(true));

    for pin in HIGH_SIDE_PINS {
        // 出力に切り替える前にLowを確定させる
        gpioe.bsrr().write(|w| w.set_br(pin, true));
        gpioe
            .otyper()
            .modify(|w| w.set_ot(pin, pac::gpio::vals::Ot::PUSH_PULL));
        gpioe
            .ospeedr()
            .modify(|w| w.set_ospeedr(pin, pac::gpio::vals::Ospeedr::VERY_HIGH_SPEED));
        gpioe
            .moder()
            .modify(|w| w.set_moder(pin, pac::gpio::vals::Moder::OUTPUT));
    }
}

/// ローサイドPWM初期化（TIM1 CH1N/CH2N/CH3N = PE8/PE10/PE12）
///
/// 正相出力は使用しない（ハイサイドはGPIO駆動）。
/// 全チャネルを強制インアクティブ・出力無効の状態で返す。
pub fn init_low_side_pwm(
    tim1: Peri<'static, peripherals::TIM1>,
    pe8: Peri<'static, peripherals::PE8>,
    pe10: Peri<'static, peripherals::PE10>,
    pe12: Peri<'static, peripherals::PE12>,
) -> ComplementaryPwm<'static, peripherals::TIM1> {
    let mut pwm = ComplementaryPwm::new(
        tim1,
        None,
        Some(ComplementaryPwmPin::new(pe8, OutputType::PushPull)),
        None,
        Some(ComplementaryPwmPin::new(pe10, OutputType::PushPull)),
        None,
        Some(ComplementaryPwmPin::new(pe12, OutputType::PushPull)),
        None,
        None,
        config::pwm::DEFAULT_FREQUENCY,
        CountingMode::EdgeAlignedUp,
    );
    pwm.set_dead_time(config::pwm::DEFAULT_DEAD_TIME);
    for ch in [Channel::Ch1, Channel::Ch2, Channel::Ch3] {
        pwm.disable(ch);
        pwm.set_duty(ch, 0);
    }

    // CCxE=0 のままにしておくこと: CHxN が OCxREF をそのまま出力する
    BoardGates.disable_all_low_sides();

    info!(
        "TIM1 low-side PWM initialized: max_duty={}",
        pwm.get_max_duty()
    );
    pwm
}

/// 電流センサー初期化（ADC1、PA0）
pub fn init_current_sensor(
    adc1: Peri<'static, peripherals::ADC1>,
    pa0: Peri<'static, peripherals::PA0>,
) -> ShuntCurrentSensor {
    let mut adc = Adc::new(adc1);
    adc.set_sample_time(config::adc::SAMPLE_TIME);
    ShuntCurrentSensor::new(adc, pa0.degrade_adc())
}

/// TIM4 Hallセンサーインターフェース初期化
///
/// PB6=H1、PB7=H2、PB8=H3（XORモード）
///
/// # Safety
/// PACを使用した直接レジスタ操作を含む
pub unsafe fn init_hall_sensor() {
    info!("Initializing TIM4 Hall Sensor Interface (XOR mode)...");
    hall_tim::init_hall_timer();
    info!("TIM4 Hall Sensor Interface initialized");
}
