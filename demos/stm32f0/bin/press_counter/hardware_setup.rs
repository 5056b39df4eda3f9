use cortex_m::peripheral::NVIC;
use rtt_target::rprintln;
use stm32f0xx_hal::{
    gpio::{Output, PushPull, gpioa},
    pac,
    prelude::*,
};

use stm32f0_demos::button::UserButton;
use stm32f0_demos::exti::ExtiLine13;
use stm32f0_demos::flash_store::{FlashStore, FlashWriteDone};
use stm32f0_demos::indicator::BoardLed;
use stm32f0_demos::tick_timer::Tim14Tick;
use tick_debounce::{BuildConfig, InterruptHandlers};

/// Primary LED (PA5, onboard LD2)
pub type PrimaryLed = BoardLed<gpioa::PA5<Output<PushPull>>>;

/// Secondary LED (PA6)
pub type SecondaryLed = BoardLed<gpioa::PA6<Output<PushPull>>>;

/// Everything the interrupt vectors service
pub type Handlers = InterruptHandlers<Tim14Tick, ExtiLine13, UserButton, SecondaryLed, FlashWriteDone>;

/// Container for all initialized hardware peripherals
pub struct HardwareContext {
    pub button: UserButton,
    pub exti: ExtiLine13,
    pub primary_led: PrimaryLed,
    pub secondary_led: SecondaryLed,
    pub timer: Tim14Tick,
    pub store: FlashStore,
    pub write_done: FlashWriteDone,
}

/// Initialize all hardware peripherals
///
/// Interrupts stay masked in the NVIC until [`enable_interrupts`] is called,
/// so the handlers can be installed first.
pub fn init_hardware(config: &BuildConfig) -> HardwareContext {
    let mut dp = pac::Peripherals::take().unwrap();

    let mut rcc = dp.RCC.configure().freeze(&mut dp.FLASH);
    let pclk_hz = rcc.clocks.pclk().0;
    rprintln!("System clock configured: {} Hz", rcc.clocks.sysclk().0);

    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpioc = dp.GPIOC.split(&mut rcc);

    let (primary, secondary, button) = cortex_m::interrupt::free(|cs| {
        (
            gpioa.pa5.into_push_pull_output(cs),
            gpioa.pa6.into_push_pull_output(cs),
            gpioc.pc13.into_pull_up_input(cs),
        )
    });
    rprintln!("LEDs on PA5/PA6, button on PC13");

    let exti = ExtiLine13::new(dp.EXTI, dp.SYSCFG);
    rprintln!("EXTI13 configured for both edges");

    let timer = Tim14Tick::new(dp.TIM14, pclk_hz, config.tick_period_us());
    rprintln!("TIM14 tick every {} us", config.tick_period_us());

    let store = FlashStore::new(dp.FLASH);
    let write_done = FlashWriteDone::new(&store);
    rprintln!("Flash store: {} free records", store.free_records());

    HardwareContext {
        button: UserButton::new(button),
        exti,
        primary_led: BoardLed::new(primary),
        secondary_led: BoardLed::new(secondary),
        timer,
        store,
        write_done,
    }
}

/// Unmask the tick timer, pin-change and flash interrupts
pub fn enable_interrupts() {
    unsafe {
        NVIC::unmask(pac::Interrupt::TIM14);
        NVIC::unmask(pac::Interrupt::EXTI4_15);
        NVIC::unmask(pac::Interrupt::FLASH);
    }
    rprintln!("Interrupts enabled");
}
