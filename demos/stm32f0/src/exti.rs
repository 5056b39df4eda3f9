use stm32f0xx_hal::pac;
use tick_debounce::ChangeInterrupt;

/// EXTI line 13 routed to PC13, triggering on both edges
///
/// The interrupt handler disarms the line and the foreground re-arms it, so
/// this is a `Copy` handle over the EXTI registers.
#[derive(Clone, Copy)]
pub struct ExtiLine13 {
    _private: (),
}

impl ExtiLine13 {
    /// Routes PC13 to EXTI13 and selects both edges. The line starts masked.
    ///
    /// Takes ownership of EXTI and SYSCFG so nothing else reconfigures them.
    pub fn new(exti: pac::EXTI, syscfg: pac::SYSCFG) -> Self {
        // SYSCFG clock, not managed by the HAL RCC driver
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

        // Port C is source 0b0010
        syscfg
            .exticr4
            .modify(|_, w| unsafe { w.exti13().bits(0b0010) });

        exti.imr.modify(|_, w| w.mr13().clear_bit());
        exti.rtsr.modify(|_, w| w.tr13().set_bit());
        exti.ftsr.modify(|_, w| w.tr13().set_bit());
        exti.pr.write(|w| w.pr13().set_bit());

        Self { _private: () }
    }

    fn regs() -> &'static pac::exti::RegisterBlock {
        unsafe { &*pac::EXTI::ptr() }
    }
}

impl ChangeInterrupt for ExtiLine13 {
    fn is_armed(&self) -> bool {
        Self::regs().imr.read().mr13().bit_is_set()
    }

    fn is_pending(&self) -> bool {
        Self::regs().pr.read().pr13().bit_is_set()
    }

    fn arm(&self) {
        // Only the foreground arms, and only while the line is masked, so the
        // handler cannot interleave with this read-modify-write.
        Self::regs().imr.modify(|_, w| w.mr13().set_bit());
    }

    fn disarm(&self) {
        Self::regs().imr.modify(|_, w| w.mr13().clear_bit());
    }

    fn clear_pending(&self) {
        // Write one to clear; zeros leave other lines alone
        Self::regs().pr.write(|w| w.pr13().set_bit());
    }
}
