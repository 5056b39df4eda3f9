use stm32f0xx_hal::pac;
use tick_debounce::CountdownTimer;

/// TIM14 as the system tick timer
///
/// The prescaler makes the counter run at 1 MHz, so the auto-reload value is
/// the tick period in microseconds.
pub struct Tim14Tick {
    tim: pac::TIM14,
    reload: u16,
}

impl Tim14Tick {
    /// Starts TIM14 with an update interrupt every `tick_period_us`.
    ///
    /// # Arguments
    /// * `tim` - TIM14 peripheral
    /// * `pclk_hz` - APB clock feeding the timer
    /// * `tick_period_us` - Tick period, clamped to the 16-bit counter range
    pub fn new(tim: pac::TIM14, pclk_hz: u32, tick_period_us: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim14en().set_bit());

        let prescaler = (pclk_hz / 1_000_000).max(1) - 1;
        let reload = tick_period_us.clamp(2, u16::MAX as u32 + 1) - 1;
        let reload = reload as u16;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc.write(|w| unsafe { w.psc().bits(prescaler as u16) });
        tim.arr.write(|w| unsafe { w.arr().bits(reload) });
        // Latch PSC and ARR, then drop the update flag UG raised
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());
        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim, reload }
    }
}

impl CountdownTimer for Tim14Tick {
    fn is_enabled(&self) -> bool {
        self.tim.dier.read().uie().bit_is_set()
    }

    fn is_pending(&self) -> bool {
        self.tim.sr.read().uif().bit_is_set()
    }

    fn reload(&mut self) {
        // Auto-reload restarts the count in hardware; keep ARR pinned to the
        // configured period.
        let reload = self.reload;
        self.tim.arr.write(|w| unsafe { w.arr().bits(reload) });
    }

    fn clear_pending(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }
}
