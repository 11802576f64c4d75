//! Delivery fee zoning by great-circle distance

use sushi_types::Coordinate;

use crate::model::{FeeQuote, ZoneTable};

/// Zone name reported when no destination is known
pub const NO_LOCATION_ZONE: &str = "no location";

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometres
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can push h slightly past 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Prices delivery from a fixed store origin
#[derive(Debug, Clone)]
pub struct GeoZoneFeeCalculator {
    origin: Coordinate,
    zones: ZoneTable,
}

impl GeoZoneFeeCalculator {
    /// Calculator for a store at `origin`
    pub fn new(origin: Coordinate, zones: ZoneTable) -> Self {
        Self { origin, zones }
    }

    /// Store location
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Zone table used for pricing
    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    /// Fee for delivering to `destination`; a missing destination is free
    pub fn compute_fee(&self, destination: Option<&Coordinate>) -> FeeQuote {
        compute_fee(&self.origin, destination, &self.zones)
    }
}

/// Fee quote from `origin` to `destination` under `zones`
pub fn compute_fee(origin: &Coordinate, destination: Option<&Coordinate>, zones: &ZoneTable) -> FeeQuote {
    let Some(destination) = destination else {
        return FeeQuote {
            fee: 0,
            zone_name: NO_LOCATION_ZONE.to_string(),
            distance_km: 0.0,
        };
    };

    let distance_km = haversine_km(origin, destination);
    let zone = zones.lookup(distance_km);
    FeeQuote {
        fee: zone.fee,
        zone_name: zone.name.clone(),
        distance_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Zone;

    fn plaza_de_armas() -> Coordinate {
        Coordinate::new(-33.4378, -70.6505)
    }

    fn calculator() -> GeoZoneFeeCalculator {
        GeoZoneFeeCalculator::new(plaza_de_armas(), ZoneTable::default())
    }

    /// Point `km` kilometres due north of `origin`
    fn north_of(origin: &Coordinate, km: f64) -> Coordinate {
        let d_lat = (km / EARTH_RADIUS_KM).to_degrees();
        Coordinate::new(origin.latitude + d_lat, origin.longitude)
    }

    #[test]
    fn test_no_destination() {
        let quote = calculator().compute_fee(None);
        assert_eq!(quote.fee, 0);
        assert_eq!(quote.zone_name, "no location");
        assert_eq!(quote.distance_km, 0.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = plaza_de_armas();
        assert!(haversine_km(&p, &p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = plaza_de_armas();
        let b = Coordinate::new(-33.4150, -70.6040);
        assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // Santiago to Valparaiso is roughly 98-100 km in a straight line
        let santiago = Coordinate::new(-33.4489, -70.6693);
        let valparaiso = Coordinate::new(-33.0472, -71.6127);
        let d = haversine_km(&santiago, &valparaiso);
        assert!(d > 95.0 && d < 105.0, "got {}", d);
    }

    #[test]
    fn test_north_offset_matches_distance() {
        let origin = plaza_de_armas();
        let d = haversine_km(&origin, &north_of(&origin, 5.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_zone_selection() {
        let calc = calculator();
        let origin = plaza_de_armas();

        let near = calc.compute_fee(Some(&north_of(&origin, 1.2)));
        assert_eq!(near.zone_name, "Zona 1");
        assert_eq!(near.fee, 1_500);

        let mid = calc.compute_fee(Some(&north_of(&origin, 4.5)));
        assert_eq!(mid.zone_name, "Zona 2");

        let far = calc.compute_fee(Some(&north_of(&origin, 40.0)));
        assert_eq!(far.zone_name, "Zona extendida");
        assert_eq!(far.fee, 5_000);
    }

    #[test]
    fn test_fee_non_decreasing_with_distance() {
        let calc = calculator();
        let origin = plaza_de_armas();
        let mut last_fee = 0;
        for step in 0..60 {
            let km = step as f64 * 0.25;
            let quote = calc.compute_fee(Some(&north_of(&origin, km)));
            assert!(quote.fee >= last_fee, "fee dropped at {} km", km);
            last_fee = quote.fee;
        }
    }

    #[test]
    fn test_first_covering_zone_wins() {
        let zones = ZoneTable::new(vec![
            Zone::bounded("Cerca", 2.0, 1_000),
            Zone::bounded("Media", 5.0, 2_000),
            Zone::catch_all("Lejos", 4_000),
        ])
        .unwrap();
        let origin = plaza_de_armas();
        for (km, expected) in [(0.5, "Cerca"), (1.99, "Cerca"), (2.5, "Media"), (4.9, "Media"), (5.5, "Lejos")] {
            let quote = compute_fee(&origin, Some(&north_of(&origin, km)), &zones);
            assert_eq!(quote.zone_name, expected, "at {} km", km);
        }
    }
}
