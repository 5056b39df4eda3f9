//! Build-time configuration: device fuses, clock source and timer constants.
//!
//! Nothing here changes at runtime. The board picks a [`BuildConfig`] constant,
//! validates it once at boot, and derives the timer settings from it.

/// Oscillator selection (the FOSC fuse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// Low-power crystal.
    Lp,
    /// Crystal or resonator.
    Xt,
    /// High-speed crystal or resonator.
    Hs,
    /// External resistor/capacitor network.
    ExtRc,
}

impl Oscillator {
    const fn fuse_bits(self) -> u16 {
        match self {
            Oscillator::Lp => 0b00,
            Oscillator::Xt => 0b01,
            Oscillator::Hs => 0b10,
            Oscillator::ExtRc => 0b11,
        }
    }
}

/// Timer prescaler ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

impl Prescaler {
    /// Number of instruction cycles per timer count.
    pub const fn ratio(self) -> u32 {
        match self {
            Prescaler::Div2 => 2,
            Prescaler::Div4 => 4,
            Prescaler::Div8 => 8,
            Prescaler::Div16 => 16,
            Prescaler::Div32 => 32,
            Prescaler::Div64 => 64,
            Prescaler::Div128 => 128,
            Prescaler::Div256 => 256,
        }
    }

    /// Value of the three PS2:PS0 select bits.
    pub const fn select_bits(self) -> u8 {
        match self {
            Prescaler::Div2 => 0b000,
            Prescaler::Div4 => 0b001,
            Prescaler::Div8 => 0b010,
            Prescaler::Div16 => 0b011,
            Prescaler::Div32 => 0b100,
            Prescaler::Div64 => 0b101,
            Prescaler::Div128 => 0b110,
            Prescaler::Div256 => 0b111,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock frequency of zero.
    ZeroClock,

    /// Debounce period of zero ticks, which would disable the cooldown gate.
    ZeroDebouncePeriod,

    /// Tick period or debounce window longer than `u32::MAX` microseconds.
    TimingOverflow,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroClock => write!(f, "clock frequency must be non-zero"),
            ConfigError::ZeroDebouncePeriod => {
                write!(f, "debounce period must be at least one tick")
            }
            ConfigError::TimingOverflow => {
                write!(f, "debounce window does not fit in 32-bit microseconds")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Frequency of an external RC oscillator, `1 / (2RC)`, in hertz.
///
/// Component tolerances (typically 10% for R and 20% for C) make this an
/// estimate; boards usually measure the clock and store that in
/// [`BuildConfig::clock_hz`] instead.
pub const fn rc_oscillator_hz(ohms: u32, picofarads: u32) -> u32 {
    let rc = 2 * ohms as u64 * picofarads as u64;
    if rc == 0 {
        return 0;
    }
    (1_000_000_000_000u64 / rc) as u32
}

/// Complete build-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuildConfig {
    pub oscillator: Oscillator,
    pub watchdog: bool,
    pub power_up_timer: bool,
    pub code_protect: bool,
    /// Oscillator frequency in hertz.
    pub clock_hz: u32,
    pub prescaler: Prescaler,
    /// Value loaded into the 8-bit up-counter on every expiry; the timer
    /// overflows after `256 - reload_value` counts.
    pub reload_value: u8,
    /// Ticks the debouncer waits after each advance.
    pub debounce_period: u8,
}

impl BuildConfig {
    /// RC oscillator from 6.8k and 100pF, measured at 740 kHz, ÷256
    /// prescaler, reload 248 (8 counts, ~11 ms ticks), 2-tick debounce.
    pub const DEFAULT: BuildConfig = BuildConfig {
        oscillator: Oscillator::ExtRc,
        watchdog: false,
        power_up_timer: false,
        code_protect: false,
        clock_hz: 740_000,
        prescaler: Prescaler::Div256,
        reload_value: 248,
        debounce_period: 2,
    };

    pub const fn with_oscillator(mut self, oscillator: Oscillator, clock_hz: u32) -> Self {
        self.oscillator = oscillator;
        self.clock_hz = clock_hz;
        self
    }

    pub const fn with_watchdog(mut self, enabled: bool) -> Self {
        self.watchdog = enabled;
        self
    }

    pub const fn with_power_up_timer(mut self, enabled: bool) -> Self {
        self.power_up_timer = enabled;
        self
    }

    pub const fn with_code_protect(mut self, enabled: bool) -> Self {
        self.code_protect = enabled;
        self
    }

    pub const fn with_timer(mut self, prescaler: Prescaler, reload_value: u8) -> Self {
        self.prescaler = prescaler;
        self.reload_value = reload_value;
        self
    }

    pub const fn with_debounce_period(mut self, ticks: u8) -> Self {
        self.debounce_period = ticks;
        self
    }

    /// Checks the configuration for values that would stall the system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.debounce_period == 0 {
            return Err(ConfigError::ZeroDebouncePeriod);
        }
        // The window is never shorter than one tick
        if self.debounce_window_us_wide() > u32::MAX as u64 {
            return Err(ConfigError::TimingOverflow);
        }
        Ok(())
    }

    /// Timer counts between two expiries.
    pub const fn counts_per_tick(&self) -> u32 {
        256 - self.reload_value as u32
    }

    /// Duration of one timer count in nanoseconds (`prescaler * 4 / Fosc`).
    pub const fn count_period_ns(&self) -> u64 {
        if self.clock_hz == 0 {
            return 0;
        }
        self.prescaler.ratio() as u64 * 4 * 1_000_000_000 / self.clock_hz as u64
    }

    const fn tick_period_us_wide(&self) -> u64 {
        self.count_period_ns() * self.counts_per_tick() as u64 / 1_000
    }

    const fn debounce_window_us_wide(&self) -> u64 {
        self.tick_period_us_wide() * self.debounce_period as u64
    }

    /// Duration of one system tick in microseconds.
    ///
    /// Saturates at `u32::MAX`; [`validate`](Self::validate) rejects such
    /// configurations.
    pub const fn tick_period_us(&self) -> u32 {
        saturate_u32(self.tick_period_us_wide())
    }

    /// Minimum time between two debouncer advances, in microseconds.
    ///
    /// Saturates like [`tick_period_us`](Self::tick_period_us).
    pub const fn debounce_window_us(&self) -> u32 {
        saturate_u32(self.debounce_window_us_wide())
    }

    /// 14-bit device configuration word.
    ///
    /// FOSC in bits 1:0, WDTE in bit 2, PWRTE (active low) in bit 3 and CP
    /// (active low) in bits 13:4.
    pub const fn config_word(&self) -> u16 {
        let mut word = self.oscillator.fuse_bits();
        if self.watchdog {
            word |= 1 << 2;
        }
        if !self.power_up_timer {
            word |= 1 << 3;
        }
        if !self.code_protect {
            word |= 0x3FF << 4;
        }
        word
    }
}

const fn saturate_u32(value: u64) -> u32 {
    if value > u32::MAX as u64 {
        u32::MAX
    } else {
        value as u32
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
