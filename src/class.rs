//! Event classes competing for the indicator LEDs.

use core::ops::{Index, IndexMut};

const CLASS_NAME_USB: &str = "usb";
const CLASS_NAME_BLE: &str = "ble";
const CLASS_NAME_BATTERY: &str = "battery";

/// Independent source of status information.
///
/// Every class owns exactly one pending selector, one last-shown selector
/// and one loop timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EventClass {
    /// USB link state
    Usb = 0,
    /// Bluetooth LE wireless link state
    Ble = 1,
    /// Battery charge level
    Battery = 2,
}

impl EventClass {
    /// Number of event classes.
    pub const COUNT: usize = 3;

    /// Every class in index order.
    ///
    /// Ties between equal priorities are resolved in this order.
    pub const ALL: [Self; Self::COUNT] = [Self::Usb, Self::Ble, Self::Battery];

    /// Deterministic index for [`ClassMap`] lookups.
    pub const fn as_index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Usb),
            1 => Some(Self::Ble),
            2 => Some(Self::Battery),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usb => CLASS_NAME_USB,
            Self::Ble => CLASS_NAME_BLE,
            Self::Battery => CLASS_NAME_BATTERY,
        }
    }
}

/// Fixed-size map with one slot per [`EventClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassMap<T>([T; EventClass::COUNT]);

impl<T> ClassMap<T> {
    /// Build a map from one value per class, in [`EventClass::ALL`] order.
    pub const fn from_array(slots: [T; EventClass::COUNT]) -> Self {
        Self(slots)
    }

    /// Iterate over `(class, slot)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (EventClass, &T)> {
        EventClass::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T: Copy> ClassMap<T> {
    /// Build a map with every slot set to `value`.
    pub const fn splat(value: T) -> Self {
        Self([value; EventClass::COUNT])
    }
}

impl<T> Index<EventClass> for ClassMap<T> {
    type Output = T;

    fn index(&self, class: EventClass) -> &T {
        &self.0[class.as_index()]
    }
}

impl<T> IndexMut<EventClass> for ClassMap<T> {
    fn index_mut(&mut self, class: EventClass) -> &mut T {
        &mut self.0[class.as_index()]
    }
}
