//! Segment geometry backed by eight bytes of persistent storage.

use crate::segment::{Channel, SegmentSpec, Segments, CHANNELS};
use crate::{Error, Result};

/// Marks a storage byte that was never written
pub const EEPROM_ADDRESS_EMPTY: u8 = 255;

/// Byte-addressed persistent storage (EEPROM on the board)
pub trait Storage {
    fn read_byte(&mut self, address: u16) -> u8;

    /// Write unconditionally
    fn write_byte(&mut self, address: u16, value: u8);

    /// Write only if the stored byte differs, saving erase cycles
    fn update_byte(&mut self, address: u16, value: u8) {
        if self.read_byte(address) != value {
            self.write_byte(address, value);
        }
    }
}

const fn count_address(channel: Channel) -> u16 {
    match channel {
        Channel::Nav => 0,
        Channel::Strobe => 1,
        Channel::Beacon => 2,
        Channel::Landing => 3,
    }
}

const fn start_index_address(channel: Channel) -> u16 {
    count_address(channel) + 4
}

pub struct SegmentStore<E: Storage> {
    storage: E,
    segments: Segments,
}

impl<E: Storage> SegmentStore<E> {
    pub fn new(storage: E) -> Self {
        Self {
            storage,
            segments: Segments::defaults(),
        }
    }

    /// Write the compiled default into every address still holding the
    /// sentinel. Returns how many addresses were written.
    pub fn seed_defaults(&mut self) -> u8 {
        let mut written = 0;
        for channel in CHANNELS.iter().copied() {
            let default = channel.default_spec();
            if self.seed_address(count_address(channel), default.count) {
                written += 1;
            }
            if self.seed_address(start_index_address(channel), default.start_index) {
                written += 1;
            }
        }
        written
    }

    fn seed_address(&mut self, address: u16, value: u8) -> bool {
        if self.storage.read_byte(address) == EEPROM_ADDRESS_EMPTY {
            self.storage.write_byte(address, value);
            true
        } else {
            false
        }
    }

    /// Read all eight fields into memory. A count outside its channel's range
    /// is replaced by the default spec and reported; the rest still loads.
    pub fn load(&mut self) -> Result<()> {
        let mut result = Ok(());
        for channel in CHANNELS.iter().copied() {
            let count = self.storage.read_byte(count_address(channel));
            let start_index = self.storage.read_byte(start_index_address(channel));

            if count == 0 || count > channel.max_count() {
                self.segments.set(channel, channel.default_spec());
                result = Err(Error::InvalidSegment(channel));
            } else {
                self.segments
                    .set(channel, SegmentSpec::new(count, start_index));
            }
        }
        result
    }

    /// Write all eight fields back, skipping bytes that did not change
    pub fn commit(&mut self) {
        for channel in CHANNELS.iter().copied() {
            let spec = self.segments.get(channel);
            self.storage.update_byte(count_address(channel), spec.count);
            self.storage
                .update_byte(start_index_address(channel), spec.start_index);
        }
    }

    /// Restore the compiled defaults and persist them
    pub fn factory_reset(&mut self) {
        self.segments = Segments::defaults();
        self.commit();
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut Segments {
        &mut self.segments
    }

    pub fn storage(&self) -> &E {
        &self.storage
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct MemoryStorage {
        pub bytes: [u8; 8],
        pub writes: usize,
    }

    impl MemoryStorage {
        pub fn blank() -> Self {
            Self {
                bytes: [EEPROM_ADDRESS_EMPTY; 8],
                writes: 0,
            }
        }
    }

    impl Storage for MemoryStorage {
        fn read_byte(&mut self, address: u16) -> u8 {
            self.bytes[address as usize]
        }

        fn write_byte(&mut self, address: u16, value: u8) {
            self.writes += 1;
            self.bytes[address as usize] = value;
        }
    }

    #[test]
    fn seeding_twice_writes_only_once() {
        let mut store = SegmentStore::new(MemoryStorage::blank());
        assert_eq!(store.seed_defaults(), 8);
        assert_eq!(store.storage().writes, 8);

        assert_eq!(store.seed_defaults(), 0);
        assert_eq!(store.storage().writes, 8);
        assert_eq!(store.storage().bytes, [1, 1, 1, 2, 0, 1, 0, 0]);
    }

    #[test]
    fn seeding_leaves_written_addresses_alone() {
        let mut storage = MemoryStorage::blank();
        storage.bytes[3] = 3;
        let mut store = SegmentStore::new(storage);
        assert_eq!(store.seed_defaults(), 7);
        store.load().unwrap();
        assert_eq!(store.segments().count(Channel::Landing), 3);
    }

    #[test]
    fn load_reads_all_fields() {
        let storage = MemoryStorage {
            bytes: [2, 2, 1, 3, 0, 2, 0, 0],
            writes: 0,
        };
        let mut store = SegmentStore::new(storage);
        store.load().unwrap();
        assert_eq!(store.segments().get(Channel::Nav), SegmentSpec::new(2, 0));
        assert_eq!(
            store.segments().get(Channel::Strobe),
            SegmentSpec::new(2, 2)
        );
        assert_eq!(store.segments().nav_strip_len(), 4);
    }

    #[test]
    fn load_repairs_out_of_range_count() {
        let storage = MemoryStorage {
            bytes: [1, 1, 7, 2, 0, 1, 0, 0],
            writes: 0,
        };
        let mut store = SegmentStore::new(storage);
        assert_eq!(store.load(), Err(Error::InvalidSegment(Channel::Beacon)));
        assert_eq!(store.segments().count(Channel::Beacon), 1);
        assert_eq!(store.segments().count(Channel::Landing), 2);
    }

    #[test]
    fn commit_only_writes_changed_bytes() {
        let mut store = SegmentStore::new(MemoryStorage::blank());
        store.seed_defaults();
        store.load().unwrap();

        store.commit();
        assert_eq!(store.storage().writes, 8);

        store.segments_mut().increment(Channel::Nav);
        store.commit();
        // nav count and strobe start index
        assert_eq!(store.storage().writes, 10);
        assert_eq!(store.storage().bytes[0], 2);
        assert_eq!(store.storage().bytes[5], 2);
    }

    #[test]
    fn factory_reset_restores_and_persists_defaults() {
        let storage = MemoryStorage {
            bytes: [2, 2, 2, 3, 0, 2, 0, 0],
            writes: 0,
        };
        let mut store = SegmentStore::new(storage);
        store.load().unwrap();
        store.factory_reset();

        assert_eq!(*store.segments(), Segments::defaults());
        assert_eq!(store.storage().bytes, [1, 1, 1, 2, 0, 1, 0, 0]);
    }
}
