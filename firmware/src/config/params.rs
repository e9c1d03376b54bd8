//! ボードとタスクの設定パラメータ

/// PWM設定（TIM1、ローサイドCH1N/CH2N/CH3N）
pub mod pwm {
    use embassy_stm32::time::Hertz;

    /// PWM周波数（20kHz）（デフォルト値）
    pub const DEFAULT_FREQUENCY: Hertz = Hertz(20_000);

    /// デッドタイム（デフォルト値）
    pub const DEFAULT_DEAD_TIME: u16 = 1;
}

/// TIM4 Hallセンサーインターフェース設定
pub mod hall {
    /// NVIC優先度（Embassyタスクより高優先度）
    pub const IRQ_PRIORITY: u8 = 0x20;

    /// 自動リロード値
    /// 170MHz、PSC=0 → 約385μsごとにUPDATE（エッジが無い場合の定周期転流）
    pub const AUTO_RELOAD: u32 = 0xFFFF;
}

/// 電流センサー設定（ADC1、PA0）
pub mod adc {
    use embassy_stm32::adc::SampleTime;

    /// サンプリング時間（制御ループ内で毎回読むため短め）
    pub const SAMPLE_TIME: SampleTime = SampleTime::CYCLES47_5;
}

/// ステータス出力
pub mod status {
    /// 何ウィンドウごとにログを出すか（100ms × 10 = 約1秒）
    pub const LOG_EVERY_WINDOWS: u32 = 10;
}

/// LED表示
pub mod led {
    /// 点滅周期の半分 [ms]
    pub const BLINK_HALF_PERIOD_MS: u64 = 250;
}
