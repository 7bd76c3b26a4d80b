//! Vendor shop profiles.

use core::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::{Coordinates, CoordinatesError, OwnerId, VendorId};

// =============================================================================
// Category
// =============================================================================

/// Shop category shown in the directory.
///
/// Unknown stored values read back as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Grocery,
    Clothing,
    Electronics,
    Services,
    #[default]
    Other,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Food,
        Self::Grocery,
        Self::Clothing,
        Self::Electronics,
        Self::Services,
        Self::Other,
    ];

    /// Stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Grocery => "Grocery",
            Self::Clothing => "Clothing",
            Self::Electronics => "Electronics",
            Self::Services => "Services",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or(Self::Other)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_owned()
    }
}

// =============================================================================
// Opening hours
// =============================================================================

/// Errors that can occur when parsing a [`ShopHours`] time.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time {0:?}, expected HH:MM")]
pub struct ShopHoursError(String);

/// A time of day for opening or closing, stored as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShopHours(NaiveTime);

impl ShopHours {
    const FORMAT: &'static str = "%H:%M";

    /// Parse `HH:MM` (seconds are accepted and dropped).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid 24-hour time.
    pub fn parse(s: &str) -> Result<Self, ShopHoursError> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, Self::FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map(|t| Self(t.with_second(0).unwrap_or(t)))
            .map_err(|_| ShopHoursError(s.to_owned()))
    }

    /// The time of day.
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ShopHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl TryFrom<String> for ShopHours {
    type Error = ShopHoursError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopHours> for String {
    fn from(hours: ShopHours) -> Self {
        hours.to_string()
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Errors that can occur when building a [`VendorProfile`] from an update.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VendorProfileError {
    /// A required field is absent on a new profile.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// A required text field is blank.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    /// Latitude or longitude out of range.
    #[error(transparent)]
    Coordinates(#[from] CoordinatesError),
    /// Opening or closing time did not parse.
    #[error("{field}: {source}")]
    Hours {
        /// Which field failed.
        field: &'static str,
        /// Parse failure.
        source: ShopHoursError,
    },
}

/// The editable part of a vendor's shop record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub shop_name: String,
    pub category: Category,
    /// Phone number or other contact handle, free-form.
    pub contact: String,
    #[serde(flatten)]
    pub location: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_time: Option<ShopHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<ShopHours>,
}

/// A vendor's shop as stored in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    pub id: VendorId,
    pub owner_id: OwnerId,
    #[serde(flatten)]
    pub profile: VendorProfile,
}

/// A partial set of profile fields submitted by the owner.
///
/// Absent fields are retained on merge. For the optional text fields an
/// empty string clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfileUpdate {
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
}

impl VendorProfileUpdate {
    /// Merge this update into `base`, or build a new profile when there is
    /// no base.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is invalid, or if a required field is
    /// missing when creating a new profile.
    pub fn apply(self, base: Option<VendorProfile>) -> Result<VendorProfile, VendorProfileError> {
        let (shop_name, category, contact, location, description, opening_time, closing_time) =
            match base {
                Some(p) => (
                    Some(p.shop_name),
                    Some(p.category),
                    Some(p.contact),
                    Some(p.location),
                    p.description,
                    p.opening_time,
                    p.closing_time,
                ),
                None => (None, None, None, None, None, None, None),
            };

        let shop_name = required_text(self.shop_name, shop_name, "shopName")?;
        let contact = required_text(self.contact, contact, "contact")?;
        let category = self
            .category
            .or(category)
            .ok_or(VendorProfileError::MissingField("category"))?;

        let lat = self.lat.or(location.map(|l| l.latitude));
        let lng = self.lng.or(location.map(|l| l.longitude));
        let location = match (lat, lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng)?,
            (None, _) => return Err(VendorProfileError::MissingField("lat")),
            (_, None) => return Err(VendorProfileError::MissingField("lng")),
        };

        let description = match self.description {
            Some(d) => non_blank(d),
            None => description,
        };
        let opening_time = merge_hours(self.opening_time, opening_time, "openingTime")?;
        let closing_time = merge_hours(self.closing_time, closing_time, "closingTime")?;

        Ok(VendorProfile {
            shop_name,
            category,
            contact,
            location,
            description,
            opening_time,
            closing_time,
        })
    }
}

impl From<VendorProfile> for VendorProfileUpdate {
    fn from(profile: VendorProfile) -> Self {
        Self {
            shop_name: Some(profile.shop_name),
            category: Some(profile.category),
            contact: Some(profile.contact),
            lat: Some(profile.location.latitude),
            lng: Some(profile.location.longitude),
            description: Some(profile.description.unwrap_or_default()),
            opening_time: Some(profile.opening_time.map(String::from).unwrap_or_default()),
            closing_time: Some(profile.closing_time.map(String::from).unwrap_or_default()),
        }
    }
}

/// Form defaults for a vendor who has not saved a profile yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDraft {
    /// Pre-filled shop location.
    #[serde(flatten)]
    pub location: Coordinates,
    /// `false` when the location is the built-in fallback.
    pub from_device: bool,
}

fn required_text(
    update: Option<String>,
    current: Option<String>,
    field: &'static str,
) -> Result<String, VendorProfileError> {
    let value = update
        .or(current)
        .ok_or(VendorProfileError::MissingField(field))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(VendorProfileError::EmptyField(field));
    }
    Ok(value.to_owned())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn merge_hours(
    update: Option<String>,
    current: Option<ShopHours>,
    field: &'static str,
) -> Result<Option<ShopHours>, VendorProfileError> {
    match update {
        None => Ok(current),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => ShopHours::parse(&raw)
            .map(Some)
            .map_err(|source| VendorProfileError::Hours { field, source }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tea_stall() -> VendorProfileUpdate {
        VendorProfileUpdate {
            shop_name: Some("Tea Stall".to_string()),
            category: Some(Category::Food),
            contact: Some("9999999999".to_string()),
            lat: Some(28.6),
            lng: Some(77.2),
            ..Default::default()
        }
    }

    #[test]
    fn test_category_from_unknown_is_other() {
        assert_eq!(Category::from("Jewellery".to_string()), Category::Other);
        assert_eq!(Category::from("grocery".to_string()), Category::Grocery);
    }

    #[test]
    fn test_shop_hours_parse() {
        assert_eq!(ShopHours::parse("09:30").unwrap().to_string(), "09:30");
        assert_eq!(ShopHours::parse("21:15:42").unwrap().to_string(), "21:15");
        assert!(ShopHours::parse("25:00").is_err());
        assert!(ShopHours::parse("morning").is_err());
    }

    #[test]
    fn test_apply_creates_profile() {
        let profile = tea_stall().apply(None).unwrap();
        assert_eq!(profile.shop_name, "Tea Stall");
        assert_eq!(profile.location, Coordinates::new(28.6, 77.2).unwrap());
        assert_eq!(profile.description, None);
    }

    #[test]
    fn test_apply_new_requires_fields() {
        let update = VendorProfileUpdate {
            shop_name: Some("Tea Stall".to_string()),
            ..Default::default()
        };
        assert_eq!(
            update.apply(None),
            Err(VendorProfileError::MissingField("contact"))
        );
    }

    #[test]
    fn test_apply_merge_retains_unspecified() {
        let mut initial = tea_stall();
        initial.description = Some("Best chai in town".to_string());
        initial.opening_time = Some("07:00".to_string());
        let base = initial.apply(None).unwrap();

        let update = VendorProfileUpdate {
            contact: Some("8888888888".to_string()),
            ..Default::default()
        };
        let merged = update.apply(Some(base.clone())).unwrap();

        assert_eq!(merged.contact, "8888888888");
        assert_eq!(merged.shop_name, base.shop_name);
        assert_eq!(merged.description, base.description);
        assert_eq!(merged.opening_time, base.opening_time);
    }

    #[test]
    fn test_apply_empty_string_clears_optional() {
        let mut initial = tea_stall();
        initial.description = Some("Old".to_string());
        let base = initial.apply(None).unwrap();

        let update = VendorProfileUpdate {
            description: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(update.apply(Some(base)).unwrap().description, None);
    }

    #[test]
    fn test_apply_rejects_blank_required() {
        let mut update = tea_stall();
        update.shop_name = Some("   ".to_string());
        assert_eq!(
            update.apply(None),
            Err(VendorProfileError::EmptyField("shopName"))
        );
    }

    #[test]
    fn test_apply_rejects_bad_hours() {
        let mut update = tea_stall();
        update.closing_time = Some("late".to_string());
        assert!(matches!(
            update.apply(None),
            Err(VendorProfileError::Hours {
                field: "closingTime",
                ..
            })
        ));
    }

    #[test]
    fn test_record_serde_shape() {
        let record = VendorRecord {
            id: VendorId::new("v1"),
            owner_id: OwnerId::new("u1"),
            profile: tea_stall().apply(None).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "v1");
        assert_eq!(json["ownerId"], "u1");
        assert_eq!(json["shopName"], "Tea Stall");
        assert_eq!(json["category"], "Food");
        assert_eq!(json["lat"], 28.6);
        assert!(json.get("description").is_none());
    }
}
