use crate::color::{Color, BLUE, GREEN, PURPLE, RED, YELLOW};
use crate::segment::Channel;
use crate::CONFIG_MENU_ITEM_DURATION_MS;
use ufmt::derive::uDebug;
use ufmt::{uDebug, uDisplay, uWrite, Formatter};

/// Editable items of the configuration menu
#[derive(Copy, Clone, Debug, PartialEq, Eq, uDebug)]
pub enum ConfigItem {
    Nav,
    Strobe,
    Beacon,
    Landing,
    FactoryReset,
}

/// Menu order. The ring wraps from the last item back to the first.
pub const CONFIG_RING: [ConfigItem; 5] = [
    ConfigItem::Nav,
    ConfigItem::Strobe,
    ConfigItem::Beacon,
    ConfigItem::Landing,
    ConfigItem::FactoryReset,
];

/// Time for an idle walk once around the whole menu
pub const fn config_cycle_duration_ms() -> u32 {
    CONFIG_RING.len() as u32 * CONFIG_MENU_ITEM_DURATION_MS
}

impl ConfigItem {
    pub fn position(self) -> usize {
        CONFIG_RING
            .iter()
            .position(|item| *item == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> ConfigItem {
        CONFIG_RING[(self.position() + 1) % CONFIG_RING.len()]
    }

    /// The segment this item edits; factory reset edits none
    pub const fn channel(self) -> Option<Channel> {
        match self {
            ConfigItem::Nav => Some(Channel::Nav),
            ConfigItem::Strobe => Some(Channel::Strobe),
            ConfigItem::Beacon => Some(Channel::Beacon),
            ConfigItem::Landing => Some(Channel::Landing),
            ConfigItem::FactoryReset => None,
        }
    }

    /// Color of the marker pixel while this item is selected
    pub const fn marker_color(self) -> Color {
        match self {
            ConfigItem::Nav => GREEN,
            ConfigItem::Strobe => BLUE,
            ConfigItem::Beacon => RED,
            ConfigItem::Landing => YELLOW,
            ConfigItem::FactoryReset => PURPLE,
        }
    }
}

impl uDisplay for ConfigItem {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(match self {
            ConfigItem::Nav => "NAV",
            ConfigItem::Strobe => "STROBE",
            ConfigItem::Beacon => "BEACON",
            ConfigItem::Landing => "LANDING",
            ConfigItem::FactoryReset => "FACTORY_RESET",
        })
    }
}

/// The three ways the rig can be lit outside of configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq, uDebug)]
pub enum DisplayMode {
    Normal,
    Rainbow,
    Chase,
}

impl DisplayMode {
    /// Order of the single-click cycle
    pub const fn next(self) -> DisplayMode {
        match self {
            DisplayMode::Normal => DisplayMode::Rainbow,
            DisplayMode::Rainbow => DisplayMode::Chase,
            DisplayMode::Chase => DisplayMode::Normal,
        }
    }
}

impl uDisplay for DisplayMode {
    #[inline(always)]
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        <DisplayMode as uDebug>::fmt(self, f)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperationState {
    Init,
    /// Menu item selected, marker shown
    ConfigMain(ConfigItem),
    /// Menu item being edited
    ConfigIn(ConfigItem),
    Normal,
    Rainbow,
    Chase,
}

impl OperationState {
    pub const fn from_display_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Normal => OperationState::Normal,
            DisplayMode::Rainbow => OperationState::Rainbow,
            DisplayMode::Chase => OperationState::Chase,
        }
    }

    pub const fn display_mode(self) -> Option<DisplayMode> {
        match self {
            OperationState::Normal => Some(DisplayMode::Normal),
            OperationState::Rainbow => Some(DisplayMode::Rainbow),
            OperationState::Chase => Some(DisplayMode::Chase),
            _ => None,
        }
    }

    pub const fn is_config(self) -> bool {
        matches!(
            self,
            OperationState::ConfigMain(_) | OperationState::ConfigIn(_)
        )
    }
}

impl uDisplay for OperationState {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            OperationState::Init => f.write_str("INIT"),
            OperationState::ConfigMain(item) => {
                f.write_str("CONFIG_MAIN_ON_")?;
                <ConfigItem as uDisplay>::fmt(item, f)
            }
            OperationState::ConfigIn(item) => {
                f.write_str("CONFIG_IN_")?;
                <ConfigItem as uDisplay>::fmt(item, f)
            }
            OperationState::Normal => f.write_str("NORMAL"),
            OperationState::Rainbow => f.write_str("RAINBOW"),
            OperationState::Chase => f.write_str("CHASE"),
        }
    }
}
