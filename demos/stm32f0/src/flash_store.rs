//! Byte store emulated in the last two flash pages.
//!
//! One page is active at a time. Its first half-word holds the page status,
//! the second a copy-complete marker, and the rest half-word records
//! `address << 8 | value`; a read returns the newest record for an address.
//!
//! When the active page fills up, the spare page is marked
//! [`Receiving`](PageStatus::Receiving) and the newest value of every address
//! below [`EMULATED_BYTES`] plus the incoming record are copied into it. The
//! copy-complete marker is programmed next, then the old page erase is started
//! without waiting for it. Once the erase has finished, the next store
//! operation marks the new page [`Valid`](PageStatus::Valid).
//!
//! At boot an unmarked receiving page is discarded and a marked one replaces
//! the old page, so a power loss at any point costs at most the record being
//! written.
//!
//! Appending a record starts the program operation and returns. The flash
//! end-of-operation interrupt reports completion through [`FlashWriteDone`].

use core::ptr;

use stm32f0xx_hal::pac;
use tick_debounce::{NonVolatileStore, WriteCompletion};

/// The last two 2 KiB pages of the STM32F072's 128 KiB flash.
pub const PAGE_ADDRESSES: [u32; 2] = [0x0801_F000, 0x0801_F800];
pub const PAGE_SIZE: u32 = 2048;

/// Addresses carried over when the active page is compacted.
pub const EMULATED_BYTES: usize = 8;

const RECORD_SIZE: u32 = 2;
const COPY_DONE_OFFSET: u32 = 2;
const HEADER_SIZE: u32 = 4;
const ERASED: u16 = 0xFFFF;
const RECEIVING: u16 = 0xEEEE;
// Zero can be programmed over any half-word
const VALID: u16 = 0x0000;
const KEY1: u32 = 0x4567_0123;
const KEY2: u32 = 0xCDEF_89AB;

/// Status half-word at the start of each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Erased,
    Receiving,
    Valid,
    Corrupt,
}

impl PageStatus {
    fn of(page: u32) -> Self {
        match read_half_word(page) {
            ERASED => PageStatus::Erased,
            RECEIVING => PageStatus::Receiving,
            VALID => PageStatus::Valid,
            _ => PageStatus::Corrupt,
        }
    }
}

/// What boot has to do to end up with exactly one valid page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    /// Nothing interrupted; use this page.
    Use(usize),
    /// Copy into `discard` was cut short; erase it and keep `keep`.
    RollBack { keep: usize, discard: usize },
    /// Copy into `new` finished; erase `old` if needed and mark `new` valid.
    Complete { old: usize, new: usize },
    /// No usable page; erase both and start over on page 0.
    Format,
}

impl Recovery {
    fn plan(statuses: [PageStatus; 2], copy_done: [bool; 2]) -> Self {
        use PageStatus::*;

        match statuses {
            [Valid, Erased] => Recovery::Use(0),
            [Erased, Valid] => Recovery::Use(1),
            [old, Receiving] | [Receiving, old] => {
                let new = if statuses[1] == Receiving { 1 } else { 0 };
                let old_index = 1 - new;
                if copy_done[new] {
                    Recovery::Complete { old: old_index, new }
                } else if old == Valid {
                    Recovery::RollBack { keep: old_index, discard: new }
                } else {
                    Recovery::Format
                }
            }
            _ => Recovery::Format,
        }
    }
}

fn copy_done(page: u32) -> bool {
    read_half_word(page + COPY_DONE_OFFSET) == VALID
}

fn read_half_word(address: u32) -> u16 {
    // Memory-mapped flash inside the reserved pages
    unsafe { ptr::read_volatile(address as *const u16) }
}

/// Foreground handle to the emulated store.
pub struct FlashStore {
    flash: pac::FLASH,
    active: usize,
    next_record: u32,
    /// The old page erase has started and the active page still reads
    /// `Receiving`.
    promote_pending: bool,
}

impl FlashStore {
    /// Enables the end-of-operation interrupt, recovers from an interrupted
    /// compaction and locates the first free record.
    pub fn new(flash: pac::FLASH) -> Self {
        let mut store = Self {
            flash,
            active: 0,
            next_record: PAGE_ADDRESSES[0] + HEADER_SIZE,
            promote_pending: false,
        };

        store.unlock();
        store.flash.cr.modify(|_, w| w.eopie().set_bit());
        store.flash.cr.modify(|_, w| w.lock().set_bit());

        store.active = store.recover();
        store.next_record = store.page() + HEADER_SIZE;
        while store.next_record < store.page() + PAGE_SIZE
            && read_half_word(store.next_record) != ERASED
        {
            store.next_record += RECORD_SIZE;
        }

        store
    }

    /// Picks the active page from the two page headers, completing or rolling
    /// back an interrupted compaction.
    fn recover(&mut self) -> usize {
        let statuses = PAGE_ADDRESSES.map(PageStatus::of);
        let copy_done = PAGE_ADDRESSES.map(copy_done);

        match Recovery::plan(statuses, copy_done) {
            Recovery::Use(page) => page,
            Recovery::RollBack { keep, discard } => {
                self.erase_page(PAGE_ADDRESSES[discard]);
                self.finish();
                keep
            }
            Recovery::Complete { old, new } => {
                // The old page erase may have been cut short
                if !Self::is_blank(PAGE_ADDRESSES[old]) {
                    self.erase_page(PAGE_ADDRESSES[old]);
                }
                self.program(PAGE_ADDRESSES[new], VALID);
                self.finish();
                new
            }
            Recovery::Format => {
                self.format();
                0
            }
        }
    }

    fn format(&mut self) {
        for page in PAGE_ADDRESSES {
            if !Self::is_blank(page) {
                self.erase_page(page);
            }
        }
        self.program(PAGE_ADDRESSES[0], VALID);
        self.finish();
    }

    fn is_blank(page: u32) -> bool {
        (page..page + PAGE_SIZE)
            .step_by(RECORD_SIZE as usize)
            .all(|address| read_half_word(address) == ERASED)
    }

    fn page(&self) -> u32 {
        PAGE_ADDRESSES[self.active]
    }

    fn spare(&self) -> usize {
        1 - self.active
    }

    fn latest(&self, address: u8) -> Option<u8> {
        let mut value = None;
        let mut cursor = self.page() + HEADER_SIZE;
        while cursor < self.next_record {
            let record = read_half_word(cursor);
            if (record >> 8) as u8 == address {
                value = Some(record as u8);
            }
            cursor += RECORD_SIZE;
        }
        value
    }

    fn unlock(&mut self) {
        if self.flash.cr.read().lock().bit_is_set() {
            self.flash.keyr.write(|w| unsafe { w.fkeyr().bits(KEY1) });
            self.flash.keyr.write(|w| unsafe { w.fkeyr().bits(KEY2) });
        }
    }

    /// Waits for the previous operation, ends programming mode and relocks.
    fn finish(&mut self) {
        while self.flash.sr.read().bsy().bit_is_set() {}
        self.flash
            .cr
            .modify(|_, w| w.pg().clear_bit().per().clear_bit().lock().set_bit());
    }

    /// Starts programming one half-word and returns without waiting.
    fn program(&mut self, address: u32, half_word: u16) {
        self.finish();
        self.unlock();
        self.flash.cr.modify(|_, w| w.pg().set_bit());
        // Half-word write into the unlocked page
        unsafe { ptr::write_volatile(address as *mut u16, half_word) };
    }

    /// Starts erasing a page and returns without waiting.
    fn erase_page(&mut self, page: u32) {
        self.finish();
        self.unlock();
        self.flash.cr.modify(|_, w| w.per().set_bit());
        self.flash.ar.write(|w| unsafe { w.far().bits(page) });
        self.flash.cr.modify(|_, w| w.strt().set_bit());
    }

    fn append(&mut self, address: u8, value: u8) {
        let record = (address as u16) << 8 | value as u16;
        self.program(self.next_record, record);
        self.next_record += RECORD_SIZE;
    }

    /// Marks the active page valid once the old page erase has finished.
    fn promote(&mut self) {
        if self.promote_pending {
            self.program(self.page(), VALID);
            self.promote_pending = false;
        }
    }

    /// Moves the live values and the incoming record to the spare page, then
    /// starts erasing the old one.
    fn compact(&mut self, address: u8, value: u8) {
        let mut values = [None; EMULATED_BYTES];
        for (slot, latest) in values.iter_mut().enumerate() {
            *latest = self.latest(slot as u8);
        }
        if let Some(slot) = values.get_mut(address as usize) {
            *slot = None;
        }

        let old = self.page();
        self.active = self.spare();
        self.next_record = self.page() + HEADER_SIZE;
        self.program(self.page(), RECEIVING);

        for (slot, latest) in values.iter().enumerate() {
            if let Some(latest) = latest {
                self.append(slot as u8, *latest);
            }
        }
        self.append(address, value);
        self.program(self.page() + COPY_DONE_OFFSET, VALID);

        self.erase_page(old);
        self.promote_pending = true;
    }

    /// Records still free before the next compaction.
    pub fn free_records(&self) -> u32 {
        (self.page() + PAGE_SIZE - self.next_record) / RECORD_SIZE
    }
}

impl NonVolatileStore for FlashStore {
    /// Returns the newest value for `address`, or 0xFF if never written.
    fn read(&mut self, address: u8) -> u8 {
        self.latest(address).unwrap_or(0xFF)
    }

    /// Address 0xFF is reserved; a record for it with value 0xFF would read
    /// back as erased flash.
    fn write(&mut self, address: u8, value: u8) {
        self.promote();
        if self.next_record >= self.page() + PAGE_SIZE {
            self.compact(address, value);
        } else {
            self.append(address, value);
        }
    }
}

/// Interrupt-side handle to the flash end-of-operation flag.
#[derive(Clone, Copy)]
pub struct FlashWriteDone {
    _private: (),
}

impl FlashWriteDone {
    /// Created from the store so the interrupt is known to be enabled.
    pub fn new(_store: &FlashStore) -> Self {
        Self { _private: () }
    }

    fn regs() -> &'static pac::flash::RegisterBlock {
        unsafe { &*pac::FLASH::ptr() }
    }
}

impl WriteCompletion for FlashWriteDone {
    fn is_enabled(&self) -> bool {
        Self::regs().cr.read().eopie().bit_is_set()
    }

    fn is_pending(&self) -> bool {
        Self::regs().sr.read().eop().bit_is_set()
    }

    fn clear_pending(&mut self) {
        // Write one to clear
        Self::regs().sr.write(|w| w.eop().set_bit());
    }
}
