//! Typed command parameters.
//!
//! One struct per parameter shape, deserialized from the request's raw JSON
//! params. Field names follow the wire format (camelCase).

use serde::Deserialize;
use serde_json::{Map, Number, Value};

#[derive(Debug, Deserialize)]
pub struct OnOffParams {
    pub on: bool,
}

#[derive(Debug, Deserialize)]
pub struct BrightnessParams {
    pub brightness: Number,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmDisarmParams {
    pub arm: Option<bool>,
    #[serde(default)]
    pub cancel: bool,
    pub arm_level: Option<String>,
}

/// Exactly one of the three variants must be supplied.
#[derive(Debug, Deserialize)]
pub struct ColorParams {
    pub color: ColorValue,
}

#[derive(Debug, Deserialize)]
pub struct ColorValue {
    #[serde(rename = "spectrumRGB")]
    pub spectrum_rgb: Option<i64>,
    #[serde(rename = "spectrumHSV")]
    pub spectrum_hsv: Option<Value>,
    pub temperature: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanSpeedParams {
    pub fan_speed: String,
}

#[derive(Debug, Deserialize)]
pub struct LocateParams {
    #[serde(default)]
    pub silent: bool,
}

#[derive(Debug, Deserialize)]
pub struct LockUnlockParams {
    pub lock: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetModesParams {
    pub update_mode_settings: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCloseParams {
    pub open_percent: Number,
    pub open_direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivateSceneParams {
    #[serde(default)]
    pub deactivate: bool,
}

#[derive(Debug, Deserialize)]
pub struct StartStopParams {
    pub start: bool,
}

#[derive(Debug, Deserialize)]
pub struct PauseUnpauseParams {
    pub pause: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetTemperatureParams {
    pub temperature: Number,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatSetpointParams {
    pub thermostat_temperature_setpoint: Number,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatSetRangeParams {
    pub thermostat_temperature_setpoint_low: Number,
    pub thermostat_temperature_setpoint_high: Number,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatSetModeParams {
    pub thermostat_mode: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerParams {
    pub timer_time_sec: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTogglesParams {
    pub update_toggle_settings: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arm_disarm_optional_fields() {
        let p: ArmDisarmParams = serde_json::from_value(json!({"cancel": true})).unwrap();
        assert_eq!(p.arm, None);
        assert!(p.cancel);
        assert_eq!(p.arm_level, None);

        let p: ArmDisarmParams =
            serde_json::from_value(json!({"arm": true, "armLevel": "L2"})).unwrap();
        assert_eq!(p.arm, Some(true));
        assert!(!p.cancel);
        assert_eq!(p.arm_level.as_deref(), Some("L2"));
    }

    #[test]
    fn test_color_wire_casing() {
        let p: ColorParams =
            serde_json::from_value(json!({"color": {"spectrumRGB": 16711680}})).unwrap();
        assert_eq!(p.color.spectrum_rgb, Some(16711680));
        assert!(p.color.spectrum_hsv.is_none());
        assert!(p.color.temperature.is_none());
    }

    #[test]
    fn test_missing_required_param_is_an_error() {
        assert!(serde_json::from_value::<OnOffParams>(json!({})).is_err());
        assert!(serde_json::from_value::<TimerParams>(json!({"timerTimeSec": "x"})).is_err());
    }

    #[test]
    fn test_open_close_direction() {
        let p: OpenCloseParams =
            serde_json::from_value(json!({"openPercent": 50, "openDirection": "UP"})).unwrap();
        assert_eq!(p.open_percent.as_i64(), Some(50));
        assert_eq!(p.open_direction.as_deref(), Some("UP"));
    }
}
