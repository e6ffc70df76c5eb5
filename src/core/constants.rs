//! Engine-wide constants for the facility map and the PDF label viewer.
//! Keeping them in a single place makes it easier to tweak magic numbers and UI strings.

/// Raw category code marking a restaurant record.
pub const RESTAURANT_CATEGORY_CODE: &str = "04";

/// Zone bucket for codes missing from the zone table.
pub const OTHER_ZONE_NAME: &str = "其他區域";

/// Zone filter entry that matches every zone.
pub const ALL_ZONES_LABEL: &str = "全部區域";

/// Prefix for location labels of multi-location facilities ("地點 1", "地點 2", ...).
pub const LOCATION_LABEL_PREFIX: &str = "地點";

/// Empty-state text for the facility list.
pub const EMPTY_FACILITY_LIST: &str = "目前沒有可顯示的設施。";

/// Empty-state text for the PDF label list.
pub const EMPTY_LABEL_LIST: &str = "目前沒有可顯示的標籤。";

/// Default theme-park center (Everland, Yongin).
pub const DEFAULT_CENTER: (f64, f64) = (37.2939, 127.2025);

/// Default map zoom level.
pub const DEFAULT_ZOOM: f64 = 16.0;

/// Zoom used when jumping to a facility or a geolocation fix.
pub const FOCUS_ZOOM: f64 = 18.0;

/// Accuracy circle radius in metres when the platform reports none.
pub const DEFAULT_ACCURACY_RADIUS_M: f64 = 30.0;

/// Default PDF map source.
pub const DEFAULT_PDF_URL: &str = "https://www.everland.com/static/files/chnt_everland.pdf";

/// Text fragments shorter than this (in characters) never become labels.
pub const MIN_LABEL_LENGTH: usize = 2;

/// Zoom button step for the PDF view.
pub const SCALE_STEP: f64 = 0.2;

/// Lower clamp for the PDF render scale.
pub const MIN_SCALE: f64 = 0.6;

/// Upper clamp for the PDF render scale.
pub const MAX_SCALE: f64 = 2.6;

/// Initial PDF render scale.
pub const INITIAL_SCALE: f64 = 1.4;

/// Currency prefix for menu prices.
pub const PRICE_PREFIX: &str = "₩";

/// Prefix for the list-area message when the dataset cannot be fetched.
pub const DATASET_LOAD_FAILED: &str = "設施資料載入失敗：";

/// PDF status while a document is being fetched and rendered.
pub const STATUS_LOADING: &str = "載入地圖中…";

/// PDF status after a successful load.
pub const STATUS_READY: &str = "完成載入，可搜尋或點選左側清單。";

/// Hint appended to load failures of the default PDF source.
pub const HINT_DEFAULT_SOURCE: &str = "（可能是原始網站暫時無法連線或需要透過代理）";

/// Hint appended to load failures of any other PDF source.
pub const HINT_OTHER_SOURCE: &str = "（請確認網址是否支援跨來源存取，或改用本機檔案）";
