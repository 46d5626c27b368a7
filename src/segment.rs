use ufmt::derive::uDebug;
use ufmt::{uDebug, uDisplay, uWrite, Formatter};

/// One lighting function; each owns a contiguous run of pixels on its strip
#[derive(Copy, Clone, Debug, PartialEq, Eq, uDebug)]
pub enum Channel {
    Nav,
    Strobe,
    Beacon,
    Landing,
}

pub const CHANNELS: [Channel; 4] = [
    Channel::Nav,
    Channel::Strobe,
    Channel::Beacon,
    Channel::Landing,
];

impl Channel {
    pub const fn max_count(self) -> u8 {
        match self {
            Channel::Nav => 2,
            Channel::Strobe => 2,
            Channel::Beacon => 2,
            Channel::Landing => 3,
        }
    }

    pub const fn default_spec(self) -> SegmentSpec {
        match self {
            Channel::Nav => SegmentSpec::new(1, 0),
            // Strobe follows the nav pixels on the same strip
            Channel::Strobe => SegmentSpec::new(1, 1),
            Channel::Beacon => SegmentSpec::new(1, 0),
            Channel::Landing => SegmentSpec::new(2, 0),
        }
    }

    const fn index(self) -> usize {
        match self {
            Channel::Nav => 0,
            Channel::Strobe => 1,
            Channel::Beacon => 2,
            Channel::Landing => 3,
        }
    }
}

impl uDisplay for Channel {
    #[inline(always)]
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        <Channel as uDebug>::fmt(self, f)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, uDebug)]
pub struct SegmentSpec {
    pub count: u8,
    pub start_index: u8,
}

impl SegmentSpec {
    pub const fn new(count: u8, start_index: u8) -> Self {
        Self { count, start_index }
    }
}

/// In-memory segment geometry of all four channels
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segments {
    specs: [SegmentSpec; 4],
}

impl Segments {
    pub const fn defaults() -> Self {
        Self {
            specs: [
                Channel::Nav.default_spec(),
                Channel::Strobe.default_spec(),
                Channel::Beacon.default_spec(),
                Channel::Landing.default_spec(),
            ],
        }
    }

    pub fn get(&self, channel: Channel) -> SegmentSpec {
        self.specs[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, spec: SegmentSpec) {
        self.specs[channel.index()] = spec;
    }

    pub fn count(&self, channel: Channel) -> u8 {
        self.get(channel).count
    }

    /// Add one pixel to the channel's segment, wrapping past the maximum back
    /// to a single pixel. Returns the new count.
    pub fn increment(&mut self, channel: Channel) -> u8 {
        let spec = &mut self.specs[channel.index()];
        spec.count = if spec.count >= channel.max_count() {
            1
        } else {
            spec.count + 1
        };
        let count = spec.count;

        if channel == Channel::Nav {
            self.specs[Channel::Strobe.index()].start_index = count;
        }
        count
    }

    /// Length of the port and starboard strips, which carry nav and strobe
    pub fn nav_strip_len(&self) -> usize {
        self.count(Channel::Nav) as usize + self.count(Channel::Strobe) as usize
    }

    pub fn beacon_strip_len(&self) -> usize {
        self.count(Channel::Beacon) as usize
    }

    pub fn landing_strip_len(&self) -> usize {
        self.count(Channel::Landing) as usize
    }
}

impl Default for Segments {
    fn default() -> Self {
        Self::defaults()
    }
}
