/// DOM ids the host page provides. Everything except the stage is optional.
pub const STAGE_ID: &str = "stage";
pub const BASE_INPUT_ID: &str = "base";
pub const HEIGHT_INPUT_ID: &str = "height";
pub const BASE_VALUE_ID: &str = "baseValue";
pub const HEIGHT_VALUE_ID: &str = "heightValue";
pub const AREA_ID: &str = "area";
pub const PLAY_ID: &str = "play";
pub const EXPORT_SVG_ID: &str = "exportSvg";

/// Query parameters that seed the sliders, e.g. `?b=5.4&h=3`.
pub const BASE_QUERY_KEY: &str = "b";
pub const HEIGHT_QUERY_KEY: &str = "h";
