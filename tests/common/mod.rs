//! Shared test infrastructure for tick-debounce integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::{Cell, RefCell};

use tick_debounce::{
    App, BuildConfig, ButtonInput, ChangeInterrupt, CountdownTimer, Indicator, InterruptHandlers,
    NonVolatileStore, PollOutcome, SharedState, Transition, WriteCompletion,
};

// ============================================================================
// Mock Board
// ============================================================================

/// Simulated indicator LED state
#[derive(Default)]
pub struct LedState {
    pub on: Cell<bool>,
    pub toggles: Cell<u32>,
}

/// Simulated board. Every mock peripheral is a view onto one of these fields,
/// so the interrupt side and the foreground side can share a pin the way
/// real hardware does.
pub struct MockBoard {
    pub button_pressed: Cell<bool>,
    pub primary: LedState,
    pub secondary: LedState,

    pub timer_enabled: Cell<bool>,
    pub timer_pending: Cell<bool>,
    pub timer_reloads: Cell<u32>,

    pub change_armed: Cell<bool>,
    pub change_pending: Cell<bool>,

    pub memory: RefCell<[u8; 64]>,
    pub reads: Cell<u32>,
    pub in_flight: Cell<Option<(u8, u8)>>,
    pub write_history: RefCell<heapless::Vec<(u8, u8), 64>>,
    pub write_enabled: Cell<bool>,
    pub write_pending: Cell<bool>,
}

impl MockBoard {
    /// Creates a board whose store holds `stored_count` at address 0.
    pub fn new(stored_count: u8) -> Self {
        let mut memory = [0xFF; 64];
        memory[0] = stored_count;

        Self {
            button_pressed: Cell::new(false),
            primary: LedState::default(),
            secondary: LedState::default(),
            timer_enabled: Cell::new(true),
            timer_pending: Cell::new(false),
            timer_reloads: Cell::new(0),
            change_armed: Cell::new(false),
            change_pending: Cell::new(false),
            memory: RefCell::new(memory),
            reads: Cell::new(0),
            in_flight: Cell::new(None),
            write_history: RefCell::new(heapless::Vec::new()),
            write_enabled: Cell::new(true),
            write_pending: Cell::new(false),
        }
    }

    pub fn handlers(&self) -> TestHandlers<'_> {
        InterruptHandlers::new(
            MockTimer(self),
            MockExti(self),
            MockButton(self),
            MockLed(&self.secondary),
            MockWriteDone(self),
        )
    }

    pub fn app(&self, shared: &SharedState) -> TestApp<'_> {
        self.app_with(shared, &BuildConfig::DEFAULT)
    }

    pub fn app_with(&self, shared: &SharedState, config: &BuildConfig) -> TestApp<'_> {
        App::new(
            shared,
            config,
            MockButton(self),
            MockLed(&self.primary),
            MockExti(self),
            MockEeprom(self),
        )
    }

    /// Sets the pin level without raising a change interrupt.
    pub fn set_pressed(&self, pressed: bool) {
        self.button_pressed.set(pressed);
    }

    /// Moves the pin and latches the change flag if the level changed.
    pub fn edge(&self, pressed: bool) {
        if self.button_pressed.get() != pressed {
            self.change_pending.set(true);
        }
        self.button_pressed.set(pressed);
    }

    /// Latches a timer expiry.
    pub fn expire_timer(&self) {
        self.timer_pending.set(true);
    }

    /// Finishes the in-flight store write and latches its completion flag.
    pub fn complete_write(&self) {
        if let Some((address, value)) = self.in_flight.take() {
            self.memory.borrow_mut()[address as usize] = value;
            self.write_pending.set(true);
        }
    }

    /// Drops any in-flight write, as a power loss would.
    pub fn lose_power(&self) {
        self.in_flight.set(None);
    }

    pub fn stored(&self, address: u8) -> u8 {
        self.memory.borrow()[address as usize]
    }
}

// ============================================================================
// Mock Peripherals
// ============================================================================

pub struct MockButton<'a>(&'a MockBoard);

impl ButtonInput for MockButton<'_> {
    fn is_pressed(&self) -> bool {
        self.0.button_pressed.get()
    }
}

pub struct MockLed<'a>(&'a LedState);

impl Indicator for MockLed<'_> {
    fn set(&mut self, on: bool) {
        self.0.on.set(on);
    }

    fn toggle(&mut self) {
        self.0.on.set(!self.0.on.get());
        self.0.toggles.set(self.0.toggles.get() + 1);
    }
}

pub struct MockTimer<'a>(&'a MockBoard);

impl CountdownTimer for MockTimer<'_> {
    fn is_enabled(&self) -> bool {
        self.0.timer_enabled.get()
    }

    fn is_pending(&self) -> bool {
        self.0.timer_pending.get()
    }

    fn reload(&mut self) {
        self.0.timer_reloads.set(self.0.timer_reloads.get() + 1);
    }

    fn clear_pending(&mut self) {
        self.0.timer_pending.set(false);
    }
}

pub struct MockExti<'a>(&'a MockBoard);

impl ChangeInterrupt for MockExti<'_> {
    fn is_armed(&self) -> bool {
        self.0.change_armed.get()
    }

    fn is_pending(&self) -> bool {
        self.0.change_pending.get()
    }

    fn arm(&self) {
        self.0.change_armed.set(true);
    }

    fn disarm(&self) {
        self.0.change_armed.set(false);
    }

    fn clear_pending(&self) {
        self.0.change_pending.set(false);
    }
}

pub struct MockEeprom<'a>(&'a MockBoard);

impl NonVolatileStore for MockEeprom<'_> {
    fn read(&mut self, address: u8) -> u8 {
        self.0.reads.set(self.0.reads.get() + 1);
        self.0.stored(address)
    }

    fn write(&mut self, address: u8, value: u8) {
        // A new write can only start once the previous one has landed.
        self.0.complete_write();
        self.0.in_flight.set(Some((address, value)));
        let _ = self.0.write_history.borrow_mut().push((address, value));
    }
}

pub struct MockWriteDone<'a>(&'a MockBoard);

impl WriteCompletion for MockWriteDone<'_> {
    fn is_enabled(&self) -> bool {
        self.0.write_enabled.get()
    }

    fn is_pending(&self) -> bool {
        self.0.write_pending.get()
    }

    fn clear_pending(&mut self) {
        self.0.write_pending.set(false);
    }
}

pub type TestApp<'a> = App<MockButton<'a>, MockLed<'a>, MockExti<'a>, MockEeprom<'a>>;

pub type TestHandlers<'a> =
    InterruptHandlers<MockTimer<'a>, MockExti<'a>, MockButton<'a>, MockLed<'a>, MockWriteDone<'a>>;

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Latches a timer expiry and runs the interrupt service routine once
pub fn fire_timer(board: &MockBoard, handlers: &mut TestHandlers<'_>, shared: &SharedState) {
    board.expire_timer();
    handlers.service(shared);
}

/// Sets the pin level, then fires timer interrupts until a poll gets through
/// the gate. Returns the transition made by that poll.
pub fn sample(
    board: &MockBoard,
    handlers: &mut TestHandlers<'_>,
    app: &mut TestApp<'_>,
    shared: &SharedState,
    pressed: bool,
) -> Transition {
    board.set_pressed(pressed);
    loop {
        match app.poll(shared) {
            PollOutcome::Advanced(transition) => return transition,
            PollOutcome::Gated(_) => fire_timer(board, handlers, shared),
        }
    }
}

/// Deterministic pseudo-random pin levels (true = pressed), with runs long
/// enough to exercise both confirmed presses and single-sample blips
pub fn pin_levels(seed: u32, len: usize) -> heapless::Vec<bool, 512> {
    let mut state = seed;
    let mut levels = heapless::Vec::new();
    let mut level = false;
    while levels.len() < len {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        if (state >> 16) % 3 == 0 {
            level = !level;
        }
        let _ = levels.push(level);
    }
    levels
}
