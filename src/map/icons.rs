/// Marker icon registry.
///
/// One icon per hazard type plus the volunteer icon. This is the single
/// source of truth for marker artwork; other modules look icons up here
/// rather than hardcoding URLs.

use crate::model::HazardType;

/// Artwork for a map marker.
#[derive(Debug, PartialEq, Eq)]
pub struct MarkerIcon {
    pub url: &'static str,
    /// Width and height in pixels.
    pub size_px: (u32, u32),
}

pub struct HazardIcon {
    pub hazard: HazardType,
    pub icon: MarkerIcon,
}

pub static HAZARD_ICONS: &[HazardIcon] = &[
    HazardIcon {
        hazard: HazardType::Flood,
        icon: MarkerIcon {
            url: "https://cdn-icons-png.flaticon.com/512/727/727790.png",
            size_px: (32, 32),
        },
    },
    HazardIcon {
        hazard: HazardType::Fire,
        icon: MarkerIcon {
            url: "https://cdn-icons-png.flaticon.com/512/9356/9356286.png",
            size_px: (32, 32),
        },
    },
    HazardIcon {
        hazard: HazardType::Earthquake,
        icon: MarkerIcon {
            url: "https://cdn-icons-png.flaticon.com/512/7606/7606169.png",
            size_px: (32, 32),
        },
    },
    HazardIcon {
        hazard: HazardType::Cyclone,
        icon: MarkerIcon {
            url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRiVWWiXSAxEk4PQ9kqLvtkVJaUUCkOHfS25A&s",
            size_px: (32, 32),
        },
    },
    HazardIcon {
        hazard: HazardType::Other,
        icon: MarkerIcon {
            url: "https://cdn-icons-png.flaticon.com/512/854/854878.png",
            size_px: (32, 32),
        },
    },
];

pub static VOLUNTEER_ICON: MarkerIcon = MarkerIcon {
    url: "https://cdn-icons-png.flaticon.com/512/4329/4329445.png",
    size_px: (28, 28),
};

/// Icon for a hazard type; anything missing from the table uses `Other`'s.
pub fn icon_for(hazard: HazardType) -> &'static MarkerIcon {
    HAZARD_ICONS
        .iter()
        .find(|entry| entry.hazard == hazard)
        .or_else(|| HAZARD_ICONS.iter().find(|entry| entry.hazard == HazardType::Other))
        .map(|entry| &entry.icon)
        .unwrap_or(&VOLUNTEER_ICON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hazard_type_has_exactly_one_icon() {
        for hazard in HazardType::ALL {
            let count = HAZARD_ICONS.iter().filter(|e| e.hazard == hazard).count();
            assert_eq!(count, 1, "hazard {} should have exactly one icon", hazard);
        }
    }

    #[test]
    fn test_hazard_icons_are_distinct_from_volunteer_icon() {
        for hazard in HazardType::ALL {
            assert_ne!(icon_for(hazard).url, VOLUNTEER_ICON.url);
            assert_eq!(icon_for(hazard).size_px, (32, 32));
        }
        assert_eq!(VOLUNTEER_ICON.size_px, (28, 28));
    }

    #[test]
    fn test_icon_urls_are_https() {
        for entry in HAZARD_ICONS {
            assert!(entry.icon.url.starts_with("https://"), "icon for {} is not https", entry.hazard);
        }
    }
}
