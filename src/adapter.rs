//! Event adapter
//!
//! Translates status notifications into `(class, selector)` requests.

use crate::class::EventClass;
use crate::config::LOW_BATTERY_THRESHOLD;
use crate::logging::log;

/// Selector values produced by [`EventAdapter`].
pub mod selector {
    pub const USB_CONNECTED: u8 = 0;
    pub const USB_DISCONNECTED: u8 = 1;
    pub const BLE_CONNECTED: u8 = 0;
    pub const BLE_DISCONNECTED: u8 = 1;
    pub const BATTERY_NORMAL: u8 = 0;
    pub const BATTERY_LOW: u8 = 1;
}

/// USB connection state as reported by the USB stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbConnState {
    /// Not attached
    None,
    /// Attached to power only
    Powered,
    /// Enumerated as a HID device
    Hid,
}

/// Status change notification from one of the producers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    UsbConnChanged(UsbConnState),
    /// Active BLE profile changed; carries the link state at that moment
    BleProfileChanged { connected: bool },
    BatteryChanged { state_of_charge: u8 },
}

impl StatusEvent {
    /// Build a BLE notification by asking the stack for its link state.
    ///
    /// Profile change notifications do not carry the connection state, so it
    /// is sampled when the notification is raised.
    pub fn ble_profile_changed(is_connected: impl FnOnce() -> bool) -> Self {
        Self::BleProfileChanged {
            connected: is_connected(),
        }
    }
}

/// Request for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorRequest {
    pub class: EventClass,
    pub selector: u8,
}

/// Maps [`StatusEvent`]s to [`IndicatorRequest`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventAdapter {
    low_battery_threshold: u8,
}

impl EventAdapter {
    pub const fn new(low_battery_threshold: u8) -> Self {
        Self {
            low_battery_threshold,
        }
    }

    pub const fn low_battery_threshold(&self) -> u8 {
        self.low_battery_threshold
    }

    pub fn map(&self, event: StatusEvent) -> IndicatorRequest {
        match event {
            StatusEvent::UsbConnChanged(state) => {
                let connected = state == UsbConnState::Hid;
                log!(
                    "[EventAdapter.map] USB: {}",
                    if connected { "connected" } else { "disconnected" }
                );
                IndicatorRequest {
                    class: EventClass::Usb,
                    selector: if connected {
                        selector::USB_CONNECTED
                    } else {
                        selector::USB_DISCONNECTED
                    },
                }
            }
            StatusEvent::BleProfileChanged { connected } => {
                log!(
                    "[EventAdapter.map] BLE: {}",
                    if connected { "connected" } else { "disconnected" }
                );
                IndicatorRequest {
                    class: EventClass::Ble,
                    selector: if connected {
                        selector::BLE_CONNECTED
                    } else {
                        selector::BLE_DISCONNECTED
                    },
                }
            }
            StatusEvent::BatteryChanged { state_of_charge } => {
                log!("[EventAdapter.map] Battery: {}%", state_of_charge);
                IndicatorRequest {
                    class: EventClass::Battery,
                    selector: if state_of_charge < self.low_battery_threshold {
                        selector::BATTERY_LOW
                    } else {
                        selector::BATTERY_NORMAL
                    },
                }
            }
        }
    }
}

impl Default for EventAdapter {
    fn default() -> Self {
        Self::new(LOW_BATTERY_THRESHOLD)
    }
}
