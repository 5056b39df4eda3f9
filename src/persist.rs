//! Press counter persisted to a non-volatile byte store.
//!
//! Writes are fire-and-forget: [`NonVolatileStore::write`] starts the
//! hardware write and returns, and the write-complete interrupt only clears
//! its flag. A power loss inside the write window can lose the most recent
//! increment; nothing detects or repairs that.

/// Address of the press counter in the non-volatile store.
pub const PRESS_COUNT_ADDRESS: u8 = 0;

/// Trait for abstracting a byte-addressed non-volatile store.
pub trait NonVolatileStore {
    /// Reads the byte at `address`.
    fn read(&mut self, address: u8) -> u8;

    /// Starts writing `value` to `address` without waiting for completion.
    fn write(&mut self, address: u8, value: u8);
}

/// Trait for abstracting the write-complete interrupt of the store.
pub trait WriteCompletion {
    /// Returns true if the write-complete interrupt is enabled.
    fn is_enabled(&self) -> bool;

    /// Returns true if a write has finished and its interrupt is pending.
    fn is_pending(&self) -> bool;

    /// Clears the pending flag.
    fn clear_pending(&mut self);
}

/// Press counter with an in-memory shadow of the stored byte.
pub struct PressCounter<S: NonVolatileStore> {
    store: S,
    address: u8,
    count: u8,
}

impl<S: NonVolatileStore> PressCounter<S> {
    /// Loads the counter from `address`. Called once at boot.
    pub fn load(mut store: S, address: u8) -> Self {
        let count = store.read(address);
        info!("press count loaded: {}", count);

        Self {
            store,
            address,
            count,
        }
    }

    /// Increments the count, wrapping at 256, and writes it back.
    pub fn record_press(&mut self) -> u8 {
        self.count = self.count.wrapping_add(1);
        self.store.write(self.address, self.count);
        self.count
    }

    /// Returns the shadow count.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Returns the address the counter lives at.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Interrupt-side handler for the write-complete interrupt.
pub struct WriteCompleteHandler<W: WriteCompletion> {
    completion: W,
}

impl<W: WriteCompletion> WriteCompleteHandler<W> {
    pub fn new(completion: W) -> Self {
        Self { completion }
    }

    /// Clears a pending write-complete flag. Returns true if one was serviced.
    pub fn service(&mut self) -> bool {
        if !(self.completion.is_enabled() && self.completion.is_pending()) {
            return false;
        }

        self.completion.clear_pending();
        true
    }
}
