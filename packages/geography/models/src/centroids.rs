//! Representative coordinates for the 50 US states + DC.
//!
//! Each entry is the approximate geographic center of the state. They are
//! only good enough to drop an incident with an unknown location somewhere
//! inside the right state on a map.

/// `(abbreviation, latitude, longitude)` for the 50 states + DC.
pub const STATE_CENTROIDS: &[(&str, f64, f64)] = &[
    ("AK", 63.588_753, -154.493_062),
    ("AL", 32.318_231, -86.902_298),
    ("AR", 35.201_050, -91.831_833),
    ("AZ", 34.048_928, -111.093_731),
    ("CA", 36.778_261, -119.417_932),
    ("CO", 39.550_051, -105.782_067),
    ("CT", 41.603_221, -73.087_749),
    ("DC", 38.905_985, -77.033_418),
    ("DE", 38.910_832, -75.527_670),
    ("FL", 27.664_827, -81.515_754),
    ("GA", 32.157_435, -82.907_123),
    ("HI", 19.898_682, -155.665_857),
    ("IA", 41.878_003, -93.097_702),
    ("ID", 44.068_202, -114.742_041),
    ("IL", 40.633_125, -89.398_528),
    ("IN", 40.551_217, -85.602_364),
    ("KS", 39.011_902, -98.484_246),
    ("KY", 37.839_333, -84.270_018),
    ("LA", 31.244_823, -92.145_024),
    ("MA", 42.407_211, -71.382_437),
    ("MD", 39.045_755, -76.641_271),
    ("ME", 45.253_783, -69.445_469),
    ("MI", 44.314_844, -85.602_364),
    ("MN", 46.729_553, -94.685_900),
    ("MO", 37.964_253, -91.831_833),
    ("MS", 32.354_668, -89.398_528),
    ("MT", 46.879_682, -110.362_566),
    ("NC", 35.759_573, -79.019_300),
    ("ND", 47.551_493, -101.002_012),
    ("NE", 41.492_537, -99.901_813),
    ("NH", 43.193_852, -71.572_395),
    ("NJ", 40.058_324, -74.405_661),
    ("NM", 34.972_730, -105.032_363),
    ("NV", 38.802_610, -116.419_389),
    ("NY", 43.299_428, -74.217_933),
    ("OH", 40.417_287, -82.907_123),
    ("OK", 35.007_752, -97.092_877),
    ("OR", 43.804_133, -120.554_201),
    ("PA", 41.203_322, -77.194_525),
    ("RI", 41.580_095, -71.477_429),
    ("SC", 33.836_081, -81.163_725),
    ("SD", 43.969_515, -99.901_813),
    ("TN", 35.517_491, -86.580_447),
    ("TX", 31.968_599, -99.901_813),
    ("UT", 39.320_980, -111.093_731),
    ("VA", 37.431_573, -78.656_894),
    ("VT", 44.558_803, -72.577_841),
    ("WA", 47.751_074, -120.740_139),
    ("WI", 43.784_440, -88.787_868),
    ("WV", 38.597_626, -80.454_903),
    ("WY", 43.075_968, -107.290_284),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_count() {
        assert_eq!(STATE_CENTROIDS.len(), 51);
    }

    #[test]
    fn abbreviations_are_unique_and_uppercase() {
        let mut abbrs: Vec<&str> = STATE_CENTROIDS.iter().map(|(a, _, _)| *a).collect();
        for abbr in &abbrs {
            assert_eq!(abbr.len(), 2, "bad abbreviation: {abbr}");
            assert_eq!(*abbr, abbr.to_uppercase());
        }
        abbrs.sort_unstable();
        abbrs.dedup();
        assert_eq!(abbrs.len(), 51);
    }

    #[test]
    fn centroids_lie_within_us_bounds() {
        for (abbr, lat, lon) in STATE_CENTROIDS {
            assert!((18.0..72.0).contains(lat), "{abbr} latitude {lat}");
            assert!((-180.0..-66.0).contains(lon), "{abbr} longitude {lon}");
        }
    }
}
