//! Major footfall points of the hub, shown on the map tab.

use crate::domain::Hotspot;

pub const HOTSPOTS: [Hotspot; 5] = [
    Hotspot {
        name: "Grande Arche",
        lat: 48.8925,
        lon: 2.2397,
        flux: 4500,
        kind: "Transport",
    },
    Hotspot {
        name: "CNIT",
        lat: 48.8935,
        lon: 2.2405,
        flux: 3200,
        kind: "Commerce/Transport",
    },
    Hotspot {
        name: "Esplanade",
        lat: 48.8881,
        lon: 2.2495,
        flux: 1500,
        kind: "Entrée Piétonne",
    },
    Hotspot {
        name: "Westfield 4 Temps",
        lat: 48.8905,
        lon: 2.2375,
        flux: 5000,
        kind: "Commerce",
    },
    Hotspot {
        name: "Coeur Transport",
        lat: 48.8915,
        lon: 2.2415,
        flux: 6000,
        kind: "Hub Bus",
    },
];

/// `(lon, lat)` bounds of all hotspots, padded by `pad` degrees on each side.
pub fn bounds(hotspots: &[Hotspot], pad: f64) -> Option<([f64; 2], [f64; 2])> {
    let first = hotspots.first()?;
    let (mut lon0, mut lon1, mut lat0, mut lat1) = (first.lon, first.lon, first.lat, first.lat);
    for h in hotspots {
        lon0 = lon0.min(h.lon);
        lon1 = lon1.max(h.lon);
        lat0 = lat0.min(h.lat);
        lat1 = lat1.max(h.lat);
    }
    Some(([lon0 - pad, lon1 + pad], [lat0 - pad, lat1 + pad]))
}

/// Marker size in `1..=max_size`, proportional to flux relative to the busiest
/// hotspot.
pub fn marker_size(hotspot: &Hotspot, hotspots: &[Hotspot], max_size: u32) -> u32 {
    let busiest = hotspots.iter().map(|h| h.flux).max().unwrap_or(0);
    if busiest == 0 || max_size == 0 {
        return 1;
    }
    let scaled = (f64::from(hotspot.flux) / f64::from(busiest) * f64::from(max_size)).round() as u32;
    scaled.clamp(1, max_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_every_hotspot() {
        let ([lon0, lon1], [lat0, lat1]) = bounds(&HOTSPOTS, 0.0).unwrap();
        assert_eq!(lon0, 2.2375);
        assert_eq!(lon1, 2.2495);
        assert_eq!(lat0, 48.8881);
        assert_eq!(lat1, 48.8935);
        assert!(bounds(&[], 0.1).is_none());

        let ([plon0, plon1], [plat0, plat1]) = bounds(&HOTSPOTS, 0.001).unwrap();
        assert!(plon0 < lon0 && plon1 > lon1 && plat0 < lat0 && plat1 > lat1);
    }

    #[test]
    fn marker_size_scales_with_flux() {
        let busiest = &HOTSPOTS[4];
        let quietest = &HOTSPOTS[2];
        assert_eq!(marker_size(busiest, &HOTSPOTS, 4), 4);
        assert_eq!(marker_size(quietest, &HOTSPOTS, 4), 1);
        assert_eq!(marker_size(quietest, &HOTSPOTS, 0), 1);
    }
}
