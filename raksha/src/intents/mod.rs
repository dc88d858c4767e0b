//! Outbound intent dispatch
//!
//! User taps on a service become fire-and-forget dispatches to the host
//! environment: a telephony intent for one-tap calling and a maps deep
//! link for directions. The engine never awaits their completion and
//! processes nothing further after dispatch.

use crate::geo::Coordinate;

/// Trait for dispatching outbound intents to the host environment.
pub trait IntentDispatcher: Send + Sync {
    /// Dispatch a call intent; fire-and-forget.
    fn call_service(&self, phone: &str);

    /// Dispatch a directions intent; fire-and-forget.
    fn get_directions(&self, from: Coordinate, to: Coordinate);
}

/// Default dispatcher that builds deep-link URLs and hands them to the log.
///
/// Host environments with real telephony or maps integration supply their
/// own [`IntentDispatcher`]; this one makes the CLI and tests observable.
#[derive(Debug, Default)]
pub struct DeepLinkDispatcher;

impl DeepLinkDispatcher {
    /// Create a new dispatcher.
    pub fn new() -> Self {
        Self
    }
}

impl IntentDispatcher for DeepLinkDispatcher {
    fn call_service(&self, phone: &str) {
        tracing::info!(url = %tel_url(phone), "Dispatching call intent");
    }

    fn get_directions(&self, from: Coordinate, to: Coordinate) {
        tracing::info!(url = %directions_url(from, to), "Dispatching directions intent");
    }
}

/// Build a telephony deep link.
pub fn tel_url(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{}", digits)
}

/// Build a Google Maps directions deep link.
pub fn directions_url(from: Coordinate, to: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={:.6},{:.6}&destination={:.6},{:.6}",
        from.latitude, from.longitude, to.latitude, to.longitude
    )
}
