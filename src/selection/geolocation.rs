//! Locate-me flow: error taxonomy, the one-shot fallback state machine and
//! the platform seam.

use crate::core::{
    config::{GeolocationOptions, PositionOptions},
    geo::LatLng,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Platform geolocation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeolocationErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown(u16),
}

impl GeolocationErrorCode {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::PermissionDenied => 1,
            Self::PositionUnavailable => 2,
            Self::Timeout => 3,
            Self::Unknown(code) => *code,
        }
    }

    /// Text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "請允許此網站使用定位功能。",
            Self::PositionUnavailable => "目前無法取得位置資訊。",
            Self::Timeout => "定位逾時，請稍後再試。",
            Self::Unknown(_) => "定位時發生未知錯誤。",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", .code.message())]
pub struct GeolocationError {
    pub code: GeolocationErrorCode,
    /// Platform-provided detail, logged but not shown
    pub detail: Option<String>,
}

impl GeolocationError {
    pub fn new(code: GeolocationErrorCode) -> Self {
        Self { code, detail: None }
    }

    pub fn from_code(code: u16, detail: impl Into<String>) -> Self {
        Self {
            code: GeolocationErrorCode::from_code(code),
            detail: Some(detail.into()),
        }
    }
}

/// Successful position report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub position: LatLng,
    /// Reported accuracy in metres, if any
    pub accuracy_m: Option<f64>,
}

impl GeoFix {
    pub fn new(position: LatLng, accuracy_m: Option<f64>) -> Self {
        Self {
            position,
            accuracy_m,
        }
    }

    /// Circle radius: the reported accuracy, or `default_m` when absent or non-positive
    pub fn radius_m(&self, default_m: f64) -> f64 {
        self.accuracy_m
            .filter(|a| a.is_finite() && *a > 0.0)
            .unwrap_or(default_m)
    }
}

/// The platform's position provider
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<GeoFix, GeolocationError>;
}

/// Provider that always answers the same way
#[derive(Debug, Clone)]
pub struct StaticGeolocator {
    result: std::result::Result<GeoFix, GeolocationError>,
}

impl StaticGeolocator {
    pub fn at(fix: GeoFix) -> Self {
        Self { result: Ok(fix) }
    }

    pub fn failing(code: GeolocationErrorCode) -> Self {
        Self {
            result: Err(GeolocationError::new(code)),
        }
    }
}

#[async_trait]
impl Geolocator for StaticGeolocator {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> std::result::Result<GeoFix, GeolocationError> {
        self.result.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocateState {
    AwaitingPrimary,
    AwaitingFallback,
    Done(GeoFix),
    Failed(GeolocationError),
}

/// One locate request.
///
/// `AwaitingPrimary → Done | AwaitingFallback → Done | Failed`; the fallback
/// branch exists only when the options carry fallback settings and is taken
/// at most once.
#[derive(Debug, Clone)]
pub struct LocateRequest {
    options: GeolocationOptions,
    state: LocateState,
    fallback_used: bool,
}

impl LocateRequest {
    pub fn new(options: GeolocationOptions) -> Self {
        Self {
            options,
            state: LocateState::AwaitingPrimary,
            fallback_used: false,
        }
    }

    pub fn state(&self) -> &LocateState {
        &self.state
    }

    pub fn fallback_used(&self) -> bool {
        self.fallback_used
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, LocateState::Done(_) | LocateState::Failed(_))
    }

    /// Options for the attempt the machine is waiting on, `None` once terminal
    pub fn pending_options(&self) -> Option<PositionOptions> {
        match self.state {
            LocateState::AwaitingPrimary => Some(self.options.primary),
            LocateState::AwaitingFallback => self.options.fallback,
            _ => None,
        }
    }

    pub fn on_success(&mut self, fix: GeoFix) -> &LocateState {
        if !self.is_terminal() {
            self.state = LocateState::Done(fix);
        }
        &self.state
    }

    pub fn on_failure(&mut self, error: GeolocationError) -> &LocateState {
        self.state = match self.state {
            LocateState::AwaitingPrimary
                if self.options.fallback.is_some() && !self.fallback_used =>
            {
                log::info!(
                    "primary position request failed ({}), retrying at lower accuracy",
                    error.code.code()
                );
                self.fallback_used = true;
                LocateState::AwaitingFallback
            }
            LocateState::AwaitingPrimary | LocateState::AwaitingFallback => {
                LocateState::Failed(error)
            }
            ref terminal => terminal.clone(),
        };
        &self.state
    }
}

/// Drives a [`LocateRequest`] against the platform until it settles
pub async fn locate(
    geolocator: &dyn Geolocator,
    options: &GeolocationOptions,
) -> std::result::Result<GeoFix, GeolocationError> {
    let mut request = LocateRequest::new(options.clone());

    while let Some(attempt) = request.pending_options() {
        match geolocator.current_position(&attempt).await {
            Ok(fix) => {
                request.on_success(fix);
            }
            Err(error) => {
                if let Some(detail) = &error.detail {
                    log::warn!("geolocation error {}: {}", error.code.code(), detail);
                }
                request.on_failure(error);
            }
        }
    }

    match request.state {
        LocateState::Done(fix) => Ok(fix),
        LocateState::Failed(error) => Err(error),
        LocateState::AwaitingPrimary | LocateState::AwaitingFallback => {
            Err(GeolocationError::new(GeolocationErrorCode::Unknown(0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PlatformProfile;

    fn fix() -> GeoFix {
        GeoFix::new(LatLng::new(37.29, 127.20), Some(12.0))
    }

    #[test]
    fn test_error_taxonomy() {
        assert_eq!(GeolocationErrorCode::from_code(1).message(), "請允許此網站使用定位功能。");
        assert_eq!(GeolocationErrorCode::from_code(2), GeolocationErrorCode::PositionUnavailable);
        assert_eq!(GeolocationErrorCode::from_code(3), GeolocationErrorCode::Timeout);
        assert_eq!(GeolocationErrorCode::from_code(9), GeolocationErrorCode::Unknown(9));
        assert_eq!(GeolocationErrorCode::from_code(9).code(), 9);
        assert_eq!(
            GeolocationError::new(GeolocationErrorCode::Timeout).to_string(),
            "定位逾時，請稍後再試。"
        );
    }

    #[test]
    fn test_radius_falls_back_to_default() {
        assert_eq!(fix().radius_m(30.0), 12.0);
        assert_eq!(GeoFix::new(LatLng::default(), None).radius_m(30.0), 30.0);
        assert_eq!(GeoFix::new(LatLng::default(), Some(0.0)).radius_m(30.0), 30.0);
        assert_eq!(GeoFix::new(LatLng::default(), Some(-5.0)).radius_m(30.0), 30.0);
        assert_eq!(GeoFix::new(LatLng::default(), Some(f64::NAN)).radius_m(30.0), 30.0);
    }

    #[test]
    fn test_without_fallback_first_failure_is_terminal() {
        let mut request = LocateRequest::new(PlatformProfile::Desktop.resolve());
        let state =
            request.on_failure(GeolocationError::new(GeolocationErrorCode::PermissionDenied));

        assert!(matches!(
            state,
            LocateState::Failed(e) if e.code == GeolocationErrorCode::PermissionDenied
        ));
        assert!(!request.fallback_used());
        assert!(request.pending_options().is_none());
    }

    #[test]
    fn test_fallback_fires_at_most_once() {
        let mut request = LocateRequest::new(PlatformProfile::Ios.resolve());
        assert!(request.pending_options().unwrap().enable_high_accuracy);

        request.on_failure(GeolocationError::new(GeolocationErrorCode::Timeout));
        assert_eq!(request.state(), &LocateState::AwaitingFallback);
        assert!(!request.pending_options().unwrap().enable_high_accuracy);

        request.on_failure(GeolocationError::new(GeolocationErrorCode::PositionUnavailable));
        assert!(matches!(
            request.state(),
            LocateState::Failed(e) if e.code == GeolocationErrorCode::PositionUnavailable
        ));

        // further reports cannot revive the request
        request.on_failure(GeolocationError::new(GeolocationErrorCode::Timeout));
        request.on_success(fix());
        assert!(matches!(request.state(), LocateState::Failed(_)));
    }

    #[test]
    fn test_fallback_success() {
        let mut request = LocateRequest::new(PlatformProfile::Ios.resolve());
        request.on_failure(GeolocationError::new(GeolocationErrorCode::Timeout));
        assert_eq!(request.on_success(fix()), &LocateState::Done(fix()));
        assert!(request.fallback_used());
    }

    #[tokio::test]
    async fn test_locate_with_static_provider() {
        let ok = StaticGeolocator::at(fix());
        assert_eq!(locate(&ok, &PlatformProfile::Desktop.resolve()).await, Ok(fix()));

        let denied = StaticGeolocator::failing(GeolocationErrorCode::PermissionDenied);
        let err = locate(&denied, &PlatformProfile::Ios.resolve()).await.unwrap_err();
        assert_eq!(err.code, GeolocationErrorCode::PermissionDenied);
    }
}
