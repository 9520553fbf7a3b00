//! Driver records and the marker types derived from them.

use crate::Coordinate;

/// Raw driver data as supplied by the upstream driver listing.
///
/// Records carry identity and display fields only; the listing has no live
/// position for a driver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverRecord {
    /// Stable driver identifier.
    pub id: u64,
    /// Given name shown on the marker.
    pub first_name: String,
    /// Family name shown on the marker.
    pub last_name: String,
    /// Avatar URL, if the driver uploaded one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub profile_image_url: Option<String>,
    /// Vehicle photo URL, if available.
    #[cfg_attr(feature = "serde", serde(default))]
    pub car_image_url: Option<String>,
    /// Passenger seats in the vehicle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub car_seats: u8,
    /// Average rider rating.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rating: f32,
}

impl DriverRecord {
    /// Construct a record with the required identity fields and no extras.
    ///
    /// # Examples
    /// ```
    /// use ride_core::DriverRecord;
    ///
    /// let driver = DriverRecord::new(7, "Ada", "Lovelace");
    /// assert_eq!(driver.display_name(), "Ada Lovelace");
    /// ```
    #[must_use]
    pub fn new(id: u64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            profile_image_url: None,
            car_image_url: None,
            car_seats: 0,
            rating: 0.0,
        }
    }

    /// First and last name joined by a single space.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A driver record placed on the map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// The source record.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub driver: DriverRecord,
    /// Rendered position of the driver.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub position: Coordinate,
    /// Marker label.
    pub title: String,
}

impl Marker {
    /// Place `driver` at `position`, titling the marker with the driver's name.
    #[must_use]
    pub fn new(driver: DriverRecord, position: Coordinate) -> Self {
        let title = driver.display_name();
        Self {
            driver,
            position,
            title,
        }
    }

    /// Identifier of the underlying driver.
    #[must_use]
    pub const fn driver_id(&self) -> u64 {
        self.driver.id
    }
}

/// A marker annotated with a trip estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnrichedMarker {
    /// The marker the estimate was computed for.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub marker: Marker,
    /// Pickup plus drop-off travel time in minutes.
    #[cfg_attr(feature = "serde", serde(alias = "time"))]
    pub estimated_minutes: f64,
    /// Fare with exactly two decimal places.
    pub price: String,
}
