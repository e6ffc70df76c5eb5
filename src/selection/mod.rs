pub mod geolocation;
pub mod sync;

pub use geolocation::{
    locate, GeoFix, GeolocationError, GeolocationErrorCode, Geolocator, LocateRequest,
    LocateState, StaticGeolocator,
};
pub use sync::{ActiveSelection, SelectionSync, SyncUpdate};
