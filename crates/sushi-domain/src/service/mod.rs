//! Domain services

pub mod format;
pub mod geo_zone;
pub mod rut;
pub mod station_load;

pub use format::{format_clp, normalize_phone};
pub use geo_zone::{haversine_km, GeoZoneFeeCalculator, NO_LOCATION_ZONE};
pub use rut::{format_rut, validate_rut, Rut};
pub use station_load::{
    classify_station, sum_load_by_station, EtaEstimate, StationClassifier, StationLoad,
    StationLoadEstimator, MIN_ETA_MINUTES,
};
