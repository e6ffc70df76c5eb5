use async_trait::async_trait;
use parkmap::{prelude::*, selection::geolocation::locate};
use std::{collections::VecDeque, sync::Mutex};

#[cfg(test)]
mod geolocation_tests {
    use super::*;

    /// Answers from a script and remembers the options of every request
    struct ScriptedGeolocator {
        answers: Mutex<VecDeque<std::result::Result<GeoFix, GeolocationError>>>,
        requests: Mutex<Vec<PositionOptions>>,
    }

    impl ScriptedGeolocator {
        fn new(answers: Vec<std::result::Result<GeoFix, GeolocationError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<PositionOptions> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geolocator for ScriptedGeolocator {
        async fn current_position(
            &self,
            options: &PositionOptions,
        ) -> std::result::Result<GeoFix, GeolocationError> {
            self.requests.lock().unwrap().push(*options);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GeolocationError::new(GeolocationErrorCode::Unknown(0))))
        }
    }

    fn fix() -> GeoFix {
        GeoFix::new(LatLng::new(37.2935, 127.2031), Some(18.0))
    }

    fn timeout() -> GeolocationError {
        GeolocationError::new(GeolocationErrorCode::Timeout)
    }

    fn map_on(profile: PlatformProfile) -> FacilityMap {
        let mut config = ParkMapConfig::default();
        config.geolocation.profile = profile;
        FacilityMap::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_ios_retries_once_with_coarse_options() {
        let geolocator = ScriptedGeolocator::new(vec![Err(timeout()), Ok(fix())]);
        let result = locate(&geolocator, &PlatformProfile::Ios.resolve()).await;

        assert_eq!(result, Ok(fix()));
        let requests = geolocator.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].enable_high_accuracy);
        assert!(!requests[1].enable_high_accuracy);
        assert!(requests[1].maximum_age_ms > 0);
    }

    #[tokio::test]
    async fn test_ios_fallback_failure_is_final() {
        let geolocator = ScriptedGeolocator::new(vec![
            Err(timeout()),
            Err(GeolocationError::from_code(2, "kCLErrorLocationUnknown")),
            Ok(fix()),
        ]);
        let result = locate(&geolocator, &PlatformProfile::Ios.resolve()).await;

        assert_eq!(
            result.map_err(|e| e.code),
            Err(GeolocationErrorCode::PositionUnavailable)
        );
        assert_eq!(geolocator.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_desktop_permission_denied_has_no_fallback() {
        let geolocator =
            ScriptedGeolocator::new(vec![Err(GeolocationError::from_code(1, "denied")), Ok(fix())]);
        let mut map = map_on(PlatformProfile::Desktop);
        let mut presenter = RecordingPresenter::new();

        presenter.present_all(&map.locate(&geolocator).await);

        assert_eq!(geolocator.requests().len(), 1);
        assert_eq!(presenter.take_alerts(), vec!["請允許此網站使用定位功能。".to_string()]);
        assert!(presenter.overlay.is_none());
    }

    #[tokio::test]
    async fn test_fix_places_marker_and_recenters() {
        let geolocator = ScriptedGeolocator::new(vec![Err(timeout()), Ok(fix())]);
        let mut map = map_on(PlatformProfile::Ios);
        let mut presenter = RecordingPresenter::new();

        presenter.present_all(&map.locate(&geolocator).await);

        match &presenter.overlay {
            Some(Overlay::PositionFix { marker, circle }) => {
                assert_eq!(marker.style(), MarkerStyle::UserLocation);
                assert_eq!(circle.center, fix().position);
                assert_eq!(circle.radius_m, 18.0);
            }
            other => panic!("expected a position fix, got {:?}", other),
        }
        assert_eq!(map.viewport.center, fix().position);
        assert!(presenter.take_alerts().is_empty());
    }

    #[tokio::test]
    async fn test_second_fix_replaces_first() {
        let first = GeoFix::new(LatLng::new(37.29, 127.20), None);
        let geolocator = ScriptedGeolocator::new(vec![Ok(first), Ok(fix())]);
        let mut map = map_on(PlatformProfile::Android);
        let mut presenter = RecordingPresenter::new();

        presenter.present_all(&map.locate(&geolocator).await);
        assert!(matches!(
            &presenter.overlay,
            Some(Overlay::PositionFix { circle, .. }) if circle.radius_m == 30.0
        ));

        let effects = map.locate(&geolocator).await;
        assert_eq!(effects[0], UiEffect::ClearOverlay);
        presenter.present_all(&effects);
        assert!(matches!(
            &presenter.overlay,
            Some(Overlay::PositionFix { circle, .. }) if circle.center == fix().position
        ));
    }
}
