//! TIM4ベースのHallセンサーインターフェースと転流割り込み
//!
//! STM32のハードウェアHall Sensor Interface Mode（XORモード）を使用して、
//! Hallエッジごとに割り込みを発生させ、その場で6ステップ転流を更新します。
//!
//! ## ハードウェア構成
//! - TIM4_CH1 (PB6): Hall H1（A相）
//! - TIM4_CH2 (PB7): Hall H2（B相）
//! - TIM4_CH3 (PB8): Hall H3（C相）
//! - クロック: 170MHz (APB1)
//!
//! ## 動作
//! 1. 3つのHall入力がXORされてTI1に接続される（CR2.TI1S=1）
//! 2. TI1のエッジでカウンターがリセットされ、CC1割り込みが発生
//! 3. エッジが無い間は約385μsごとにUPDATE割り込みが発生
//! 4. どちらの割り込みでも、転流有効時は `commutate` を実行

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use embassy_stm32::pac;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use hall_bldc::commutation::{commutate, HallTable};

use crate::config;
use crate::motor_driver::BoardGates;

/// 転流有効フラグ（アライメント中はfalse、ゲートはタスク側が所有）
pub static COMMUTATION_ENABLED: AtomicBool = AtomicBool::new(false);

/// 割り込みで使用するHallテーブル
static HALL_TABLE: Mutex<CriticalSectionRawMutex, Cell<HallTable>> =
    Mutex::new(Cell::new(HallTable::DEFAULT));

/// Hallエッジ数（CC1割り込み回数）
pub static HALL_EDGES: AtomicU32 = AtomicU32::new(0);

/// 不正Hallコード検出回数
pub static INVALID_CODES: AtomicU32 = AtomicU32::new(0);

/// 最後に転流したセクター番号（1-6、不正/無効時は0）
pub static LAST_SECTOR: AtomicU8 = AtomicU8::new(0);

/// TIM4 Hall Sensor Interface の初期化
///
/// # Safety
/// PACを使用した直接的なレジスタ操作を含むため、unsafe
pub unsafe fn init_hall_timer() {
    let rcc = pac::RCC;
    let tim4 = pac::TIM4;
    let gpiob = pac::GPIOB;

    // 1. クロック有効化
    rcc.ahb2enr().modify(|w| w.set_gpioben(true)); // GPIOB
    rcc.apb1enr1().modify(|w| w.set_tim4en(true)); // TIM4

    // 2. GPIO設定（PB6/PB7/PB8をAlternate Function AF2に設定）
    // 外部プルアップ抵抗があるため内部プルアップは使用しない
    for pin in [6usize, 7, 8] {
        gpiob
            .moder()
            .modify(|w| w.set_moder(pin, pac::gpio::vals::Moder::ALTERNATE));
        gpiob
            .afr(pin / 8)
            .modify(|w| w.set_afr(pin % 8, 2)); // AF2 (PB8はAFRH[0])
        gpiob
            .pupdr()
            .modify(|w| w.set_pupdr(pin, pac::gpio::vals::Pupdr::FLOATING));
        gpiob
            .ospeedr()
            .modify(|w| w.set_ospeedr(pin, pac::gpio::vals::Ospeedr::VERY_HIGH_SPEED));
    }

    // 3. TIM4設定
    tim4.cr1().modify(|w| w.set_cen(false));
    tim4.psc().write_value(0); // PSC = 0（170MHz）
    tim4.arr()
        .write_value(pac::timer::regs::ArrCore(config::hall::AUTO_RELOAD));

    // 4. Hall Sensor Interface Mode設定
    // CR2.TI1S = XOR: CH1/CH2/CH3をXOR -> TI1
    tim4.cr2().modify(|w| {
        w.set_ti1s(pac::timer::vals::Ti1s::XOR);
    });

    // SMCR: TI1のエッジ検出をトリガーにして、カウンターをリセット
    tim4.smcr().modify(|w| {
        w.set_ts(pac::timer::vals::Ts::TI1F_ED);
        w.set_sms(pac::timer::vals::Sms::RESET_MODE);
    });

    // 5. Input Capture設定（CC1S=TRC、8サイクルフィルタ）
    tim4.ccmr_input(0).modify(|w| {
        w.set_ccs(0, pac::timer::vals::CcmrInputCcs::TRC);
        w.set_icf(0, pac::timer::vals::FilterValue::FCK_INT_N8);
    });

    // 6. CCER: CC1E=1（キャプチャ有効）
    // TI1F_EDトリガーにより両エッジが検出される
    tim4.ccer().modify(|w| {
        w.set_cce(0, true);
        w.set_ccp(0, false);
    });

    // 7. 割り込み設定: CC1IE（Hallエッジ）、UIE（定周期）
    tim4.dier().modify(|w| {
        w.set_ccie(0, true);
        w.set_uie(true);
    });

    // 8. NVIC有効化（Embassyタスクより高優先度）
    unsafe {
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIM4);
        let mut cp = cortex_m::Peripherals::steal();
        cp.NVIC
            .set_priority(pac::Interrupt::TIM4, config::hall::IRQ_PRIORITY);
    }

    // 9. カウンタをリセットしてタイマー開始
    tim4.cnt().write_value(pac::timer::regs::CntCore(0));
    tim4.sr().write(|w| w.0 = 0);
    tim4.egr().write(|w| w.set_ug(true));

    tim4.cr1().modify(|w| {
        w.set_cen(true);
        w.set_urs(pac::timer::vals::Urs::COUNTER_ONLY);
    });
}

/// TIM4割り込みハンドラー（Capture/Compare 1 + Update）
///
/// # Safety
/// 割り込みコンテキストで実行されるため、処理は最小限にする
#[inline(always)]
pub unsafe fn tim4_irq_handler() {
    let tim4 = pac::TIM4;
    let sr = tim4.sr().read();

    if sr.uif() {
        tim4.sr().modify(|w| w.set_uif(false));
    }

    if sr.ccif(0) {
        tim4.sr().modify(|w| w.set_ccif(0, false));
        HALL_EDGES.fetch_add(1, Ordering::Relaxed);
    }

    if !(sr.uif() || sr.ccif(0)) || !COMMUTATION_ENABLED.load(Ordering::Acquire) {
        return;
    }

    let table = HALL_TABLE.lock(|t| t.get());
    let sector = commutate(&mut BoardGates, &table);
    if !sector.is_valid() {
        INVALID_CODES.fetch_add(1, Ordering::Relaxed);
    }
    LAST_SECTOR.store(sector.number().unwrap_or(0), Ordering::Relaxed);
}

/// TIM4割り込みのRust側エントリーポイント
#[allow(non_snake_case)]
#[no_mangle]
pub unsafe extern "C" fn TIM4() {
    tim4_irq_handler();
}

/// 割り込みで使うHallテーブルを設定（転流有効化の前に呼ぶ）
pub fn set_hall_table(table: HallTable) {
    HALL_TABLE.lock(|t| t.set(table));
}

/// Hall転流を開始
///
/// 最初のエッジを待たずに現在位置で一度転流する。
pub fn enable_commutation() {
    let table = HALL_TABLE.lock(|t| t.get());
    cortex_m::interrupt::free(|_| {
        commutate(&mut BoardGates, &table);
        COMMUTATION_ENABLED.store(true, Ordering::Release);
    });
}

/// Hall転流を停止し、全ゲートをオフにする
pub fn disable_commutation() {
    cortex_m::interrupt::free(|_| {
        COMMUTATION_ENABLED.store(false, Ordering::Release);
        hall_bldc::commutation::disable(&mut BoardGates);
    });
    LAST_SECTOR.store(0, Ordering::Relaxed);
}

/// カウンタをリセット
pub fn reset_counters() {
    HALL_EDGES.store(0, Ordering::Relaxed);
    INVALID_CODES.store(0, Ordering::Relaxed);
}
