use serde::{Deserialize, Serialize};
use std::fmt;

/// Meteorological season. Variant order is the output sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Map a calendar month to its season. December belongs to Winter.
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse latitude band. Variant order runs south to north and is the output
/// sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Antarctica,
    Southern,
    #[serde(rename = "Tropical S")]
    TropicalSouth,
    #[serde(rename = "Tropical N")]
    TropicalNorth,
    Northern,
    Arctic,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Antarctica,
        Region::Southern,
        Region::TropicalSouth,
        Region::TropicalNorth,
        Region::Northern,
        Region::Arctic,
    ];

    /// Map a latitude to its band.
    ///
    /// Bins are upper-bound inclusive: [-90,-60], (-60,-30], (-30,0), [0,30],
    /// (30,60], (60,90]. The equator belongs to Tropical N. Latitudes outside
    /// [-90, 90] (or NaN) have no region.
    pub fn from_latitude(latitude: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return None;
        }

        let region = if latitude <= -60.0 {
            Region::Antarctica
        } else if latitude <= -30.0 {
            Region::Southern
        } else if latitude < 0.0 {
            Region::TropicalSouth
        } else if latitude <= 30.0 {
            Region::TropicalNorth
        } else if latitude <= 60.0 {
            Region::Northern
        } else {
            Region::Arctic
        };

        Some(region)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Antarctica => "Antarctica",
            Region::Southern => "Southern",
            Region::TropicalSouth => "Tropical S",
            Region::TropicalNorth => "Tropical N",
            Region::Northern => "Northern",
            Region::Arctic => "Arctic",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_mapping() {
        assert_eq!(Season::from_month(12), Some(Season::Winter));
        assert_eq!(Season::from_month(1), Some(Season::Winter));
        assert_eq!(Season::from_month(2), Some(Season::Winter));
        assert_eq!(Season::from_month(3), Some(Season::Spring));
        assert_eq!(Season::from_month(5), Some(Season::Spring));
        assert_eq!(Season::from_month(6), Some(Season::Summer));
        assert_eq!(Season::from_month(8), Some(Season::Summer));
        assert_eq!(Season::from_month(9), Some(Season::Fall));
        assert_eq!(Season::from_month(11), Some(Season::Fall));
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn test_every_month_has_a_season() {
        for month in 1..=12 {
            assert!(Season::from_month(month).is_some(), "month {}", month);
        }
    }

    #[test]
    fn test_region_mapping() {
        assert_eq!(Region::from_latitude(-90.0), Some(Region::Antarctica));
        assert_eq!(Region::from_latitude(-60.0), Some(Region::Antarctica));
        assert_eq!(Region::from_latitude(-59.9), Some(Region::Southern));
        assert_eq!(Region::from_latitude(-30.0), Some(Region::Southern));
        assert_eq!(Region::from_latitude(-0.1), Some(Region::TropicalSouth));
        assert_eq!(Region::from_latitude(0.0), Some(Region::TropicalNorth));
        assert_eq!(Region::from_latitude(30.0), Some(Region::TropicalNorth));
        assert_eq!(Region::from_latitude(45.0), Some(Region::Northern));
        assert_eq!(Region::from_latitude(60.0), Some(Region::Northern));
        assert_eq!(Region::from_latitude(60.1), Some(Region::Arctic));
        assert_eq!(Region::from_latitude(90.0), Some(Region::Arctic));
    }

    #[test]
    fn test_region_out_of_range() {
        assert_eq!(Region::from_latitude(-90.5), None);
        assert_eq!(Region::from_latitude(90.5), None);
        assert_eq!(Region::from_latitude(f64::NAN), None);
    }

    #[test]
    fn test_labels_match_serialized_names() {
        assert_eq!(Region::TropicalSouth.to_string(), "Tropical S");
        assert_eq!(Region::TropicalNorth.to_string(), "Tropical N");
        assert_eq!(Season::Fall.to_string(), "Fall");
        assert_eq!(
            serde_json::to_string(&Region::TropicalNorth).unwrap(),
            "\"Tropical N\""
        );
    }

    #[test]
    fn test_sort_order() {
        let mut regions = vec![Region::Arctic, Region::TropicalSouth, Region::Antarctica];
        regions.sort();
        assert_eq!(
            regions,
            vec![Region::Antarctica, Region::TropicalSouth, Region::Arctic]
        );
    }
}
