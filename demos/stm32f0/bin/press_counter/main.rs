#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m_rt::entry;
use critical_section::Mutex;
use panic_halt as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f0xx_hal::pac::interrupt;

use tick_debounce::{App, BuildConfig, InterruptHandlers, SharedState, WaitMode};

mod hardware_setup;

use hardware_setup::Handlers;

/// Fuses, timer and debounce settings for this board
const CONFIG: BuildConfig = BuildConfig::DEFAULT;

/// Poll once per tick rather than free-running
const WAIT_MODE: WaitMode = WaitMode::BusySpin;

static SHARED: SharedState = SharedState::new();
static HANDLERS: Mutex<RefCell<Option<Handlers>>> = Mutex::new(RefCell::new(None));

/// Common service routine behind every vector
///
/// Checks all three sources on every entry. Running inside the critical
/// section keeps handlers from nesting.
fn service_interrupts() {
    critical_section::with(|cs| {
        if let Some(handlers) = HANDLERS.borrow_ref_mut(cs).as_mut() {
            handlers.service(&SHARED);
        }
    });
}

#[interrupt]
fn TIM14() {
    service_interrupts();
}

#[interrupt]
fn EXTI4_15() {
    service_interrupts();
}

#[interrupt]
fn FLASH() {
    service_interrupts();
}

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("=== Press Counter ===");

    if let Err(error) = CONFIG.validate() {
        panic!("invalid build configuration: {}", error);
    }
    rprintln!(
        "Config word 0x{:04X}, tick {} us, debounce {} ticks",
        CONFIG.config_word(),
        CONFIG.tick_period_us(),
        CONFIG.debounce_period
    );

    let hw = hardware_setup::init_hardware(&CONFIG);

    let handlers = InterruptHandlers::new(
        hw.timer,
        hw.exti,
        hw.button,
        hw.secondary_led,
        hw.write_done,
    );
    let mut app = App::new(
        &SHARED,
        &CONFIG,
        hw.button,
        hw.primary_led,
        hw.exti,
        hw.store,
    );
    rprintln!("Press count at boot: {}", app.press_count());

    critical_section::with(|cs| {
        HANDLERS.borrow(cs).replace(Some(handlers));
    });
    hardware_setup::enable_interrupts();

    rprintln!("=== System Ready ===");
    app.run(&SHARED, WAIT_MODE)
}
