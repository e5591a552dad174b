// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Safety profile - per-user identity, contacts, and known-safe zones

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An emergency contact reachable by the alert dispatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Display name
    pub name: String,
    /// Delivery address (phone number, short code, etc.)
    pub phone: String,
}

impl Contact {
    /// Create a contact
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// A geographic zone considered safe for the monitored person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeZone {
    /// Zone label ("Home", "Office", ...)
    pub name: String,
    /// Center latitude in degrees
    pub latitude: f64,
    /// Center longitude in degrees
    pub longitude: f64,
    /// Zone radius in meters
    pub radius_m: f64,
}

impl SafeZone {
    /// Create a zone centered on the given coordinate
    pub fn new(name: &str, latitude: f64, longitude: f64, radius_m: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            radius_m,
        }
    }

    /// Great-circle distance from the zone center to a coordinate, in meters
    pub fn distance_m(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_m(self.latitude, self.longitude, latitude, longitude)
    }

    /// Whether a coordinate falls inside the zone
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.distance_m(latitude, longitude) <= self.radius_m
    }
}

/// Static per-user configuration bound at activation.
///
/// Immutable for the lifetime of a monitoring session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyProfile {
    /// Monitored person's name
    pub name: String,
    /// Monitored person's own number
    pub phone: String,
    /// Contacts notified on escalation, in priority order
    pub emergency_contacts: Vec<Contact>,
    /// Known-safe geographic zones
    pub safe_zones: Vec<SafeZone>,
}

impl SafetyProfile {
    /// Create a profile with no contacts or zones
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            emergency_contacts: Vec::new(),
            safe_zones: Vec::new(),
        }
    }

    /// Add an emergency contact (builder style)
    pub fn with_contact(mut self, name: &str, phone: &str) -> Self {
        self.emergency_contacts.push(Contact::new(name, phone));
        self
    }

    /// Add a safe zone (builder style)
    pub fn with_safe_zone(mut self, zone: SafeZone) -> Self {
        self.safe_zones.push(zone);
        self
    }

    /// Validate the profile before binding it to a session
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("profile name is empty");
        }
        if self.emergency_contacts.is_empty() {
            warn!("profile '{}' has no emergency contacts", self.name);
        }
        for zone in &self.safe_zones {
            if !zone.latitude.is_finite() || !zone.longitude.is_finite() {
                bail!("safe zone '{}' has non-finite coordinates", zone.name);
            }
            if !zone.radius_m.is_finite() || zone.radius_m < 0.0 {
                bail!("safe zone '{}' has invalid radius", zone.name);
            }
        }
        Ok(())
    }
}

/// Haversine great-circle distance in meters
fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
