use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Width of a county FIPS code; numeric codes shorter than this lost their leading zeros.
const FIPS_COUNTY_LEN: usize = 5;

/// Width of the state prefix of a county FIPS code.
const FIPS_STATE_LEN: usize = 2;

/// Stable key for a reporting unit (county, riding, ...).
/// Keeps the original code text (with leading zeros) without repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(Arc<str>);

/// Stable key for the region enclosing a set of units (e.g. a state or province).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(Arc<str>);

impl UnitId {
    pub fn new(id: impl AsRef<str>) -> Self { Self(Arc::from(id.as_ref().trim())) }

    /// Build a unit id from a numeric code, restoring leading zeros lost in transit.
    pub fn from_number(code: u64) -> Self {
        Self(Arc::from(format!("{code:0>width$}", width = FIPS_COUNTY_LEN)))
    }

    #[inline] pub fn id(&self) -> &str { &self.0 }

    /// Returns the region this unit belongs to when the source does not name one.
    /// Five-digit numeric codes are county FIPS codes, whose first two digits are the state.
    pub fn to_region(&self) -> RegionId {
        let id = self.id();
        if id.len() == FIPS_COUNTY_LEN && id.bytes().all(|b| b.is_ascii_digit()) {
            RegionId::new(&id[..FIPS_STATE_LEN])
        } else {
            RegionId::new(id)
        }
    }
}

impl RegionId {
    pub fn new(id: impl AsRef<str>) -> Self { Self(Arc::from(id.as_ref().trim())) }

    #[inline] pub fn id(&self) -> &str { &self.0 }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for UnitId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self { Self::new(id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn county_fips_maps_to_state() {
        assert_eq!(UnitId::new("06037").to_region(), RegionId::new("06"));
        assert_eq!(UnitId::new("48201").to_region().id(), "48");
    }

    #[test]
    fn non_fips_code_is_its_own_region() {
        assert_eq!(UnitId::new("ON-35001").to_region(), RegionId::new("ON-35001"));
        assert_eq!(UnitId::new("123").to_region(), RegionId::new("123"));
    }

    #[test]
    fn numeric_codes_are_zero_padded() {
        assert_eq!(UnitId::from_number(6037).id(), "06037");
        assert_eq!(UnitId::from_number(48201).id(), "48201");
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(UnitId::new(" 06037 "), UnitId::new("06037"));
    }
}
