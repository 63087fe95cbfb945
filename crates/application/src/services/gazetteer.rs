//! Built-in place and junction tables for Bangalore
//!
//! Lookups run on trimmed, lower-cased names. Partial matching scans the
//! gazetteer in table order, so earlier entries win.

use domain::GeoLocation;

/// A known place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazetteerEntry {
    /// Lower-cased lookup key
    pub key: &'static str,
    /// Coordinates
    pub location: GeoLocation,
    /// Display name
    pub display: &'static str,
}

const fn entry(key: &'static str, lat: f64, lon: f64, display: &'static str) -> GazetteerEntry {
    GazetteerEntry {
        key,
        location: GeoLocation::new_unchecked(lat, lon),
        display,
    }
}

/// Known Bangalore localities
pub const GAZETTEER: &[GazetteerEntry] = &[
    entry("btm layout", 12.9166, 77.6101, "BTM Layout"),
    entry("mg road", 12.9716, 77.5946, "MG Road"),
    entry("jp nagar", 12.9067, 77.5858, "JP Nagar"),
    entry("richmond road", 12.9500, 77.6000, "Richmond Road"),
    entry("lalbagh", 12.9507, 77.5848, "Lalbagh"),
    entry("indiranagar", 12.9784, 77.6408, "Indiranagar"),
    entry("koramangala", 12.9352, 77.6245, "Koramangala"),
    entry("whitefield", 12.9698, 77.7499, "Whitefield"),
    entry("marathahalli", 12.9592, 77.6974, "Marathahalli"),
    entry("hebbal", 13.0358, 77.5970, "Hebbal"),
    entry("electronic city", 12.8456, 77.6633, "Electronic City"),
    entry("cubbon park", 12.9716, 77.5946, "Cubbon Park"),
    entry("ulsoor", 12.9784, 77.6408, "Ulsoor"),
    entry("malleshwaram", 13.0050, 77.5610, "Malleshwaram"),
    entry("rajajinagar", 12.9784, 77.5510, "Rajajinagar"),
];

/// A well-known road junction used to shape synthetic routes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Junction {
    /// Name used by the corridor rules
    pub name: &'static str,
    /// Coordinates
    pub location: GeoLocation,
    /// Display name
    pub display: &'static str,
}

const fn junction(name: &'static str, lat: f64, lon: f64, display: &'static str) -> Junction {
    Junction {
        name,
        location: GeoLocation::new_unchecked(lat, lon),
        display,
    }
}

/// Junction coordinates
pub const JUNCTIONS: &[Junction] = &[
    junction("Silk Board", 12.9176, 77.6233, "Silk Board Junction"),
    junction("Dairy Circle", 12.9385, 77.6015, "Dairy Circle"),
    junction("Richmond Circle", 12.9600, 77.5969, "Richmond Circle"),
    junction("Sony World", 12.9352, 77.6245, "Sony World Junction"),
    junction("Tin Factory", 12.9940, 77.6800, "Tin Factory"),
];

/// Normalize a place name for lookups
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive exact lookup
#[must_use]
pub fn lookup_exact(name: &str) -> Option<&'static GazetteerEntry> {
    let key = normalize(name);
    GAZETTEER.iter().find(|e| e.key == key)
}

/// Substring lookup in either direction, first entry in table order wins
///
/// Empty input never matches.
#[must_use]
pub fn lookup_partial(name: &str) -> Option<&'static GazetteerEntry> {
    let key = normalize(name);
    if key.is_empty() {
        return None;
    }
    GAZETTEER
        .iter()
        .find(|e| e.key.contains(key.as_str()) || key.contains(e.key))
}

/// Find a junction by its rule name
#[must_use]
pub fn find_junction(name: &str) -> Option<&'static Junction> {
    JUNCTIONS.iter().find(|j| j.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_is_case_insensitive() {
        let entry = lookup_exact("  BTM Layout ").unwrap();
        assert_eq!(entry.display, "BTM Layout");
        assert!((entry.location.latitude() - 12.9166).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_lookup_both_directions() {
        assert_eq!(lookup_partial("btm").unwrap().display, "BTM Layout");
        assert_eq!(
            lookup_partial("near koramangala 5th block").unwrap().display,
            "Koramangala"
        );
        assert!(lookup_partial("").is_none());
        assert!(lookup_partial("   ").is_none());
        assert!(lookup_partial("visakhapatnam").is_none());
    }

    #[test]
    fn partial_lookup_respects_table_order() {
        // "road" is contained in both "mg road" and "richmond road"
        assert_eq!(lookup_partial("road").unwrap().display, "MG Road");
    }

    #[test]
    fn all_coordinates_are_valid() {
        for e in GAZETTEER {
            assert!(GeoLocation::new(e.location.latitude(), e.location.longitude()).is_ok());
            assert_eq!(e.key, normalize(e.key));
        }
        for j in JUNCTIONS {
            assert!(GeoLocation::new(j.location.latitude(), j.location.longitude()).is_ok());
        }
    }

    #[test]
    fn junction_lookup() {
        assert_eq!(find_junction("Silk Board").unwrap().display, "Silk Board Junction");
        assert!(find_junction("Hosur Road").is_none());
    }
}
