//! Per-command handlers.
//!
//! Each handler is a pure function over `(snapshot, attributes, params)`
//! producing an [`Outcome`]: the minimal store patch plus the minimal result
//! payload echoed to the caller. Handlers read only the slice of prior state
//! they need; several intentionally echo unchanged sibling fields so the
//! caller's local model of a multi-field trait stays consistent without a
//! second read.

use serde_json::{json, Map, Value};

use homegrid_core::{ResultState, StatePatch, StateSnapshot, TIMER_NONE};

use crate::command::CommandKind;
use crate::error::ExecuteError;
use crate::params::*;

/// Static URL handed out for camera stream requests. Opaque to the engine
/// and never persisted.
const CAMERA_STREAM_ACCESS_URL: &str = "https://cam.homegrid.dev/streams/preview.m3u8";

/// What one command produces: the fields to persist and the fields to
/// report back.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// Partial update written to the store. Empty for read-only commands.
    pub patch: StatePatch,
    /// Subset of fields confirmed to the caller.
    pub result: ResultState,
}

impl Outcome {
    fn new() -> Self {
        Self::default()
    }

    /// Persist a field and report it back.
    fn write(mut self, field: &str, value: Value) -> Self {
        self.patch.insert(field.to_string(), value.clone());
        self.result.insert(field.to_string(), value);
        self
    }

    /// Persist a field without reporting it.
    fn persist(mut self, field: &str, value: Value) -> Self {
        self.patch.insert(field.to_string(), value);
        self
    }

    /// Report a field without persisting it.
    fn report(mut self, field: &str, value: Value) -> Self {
        self.result.insert(field.to_string(), value);
        self
    }

    /// Report a field's pre-update value, if the snapshot carries it.
    fn echo(self, snapshot: &StateSnapshot, field: &str) -> Self {
        match snapshot.field(field) {
            Some(value) => {
                let value = value.clone();
                self.report(field, value)
            }
            None => self,
        }
    }
}

/// Decode typed parameters from the raw request value. Absent params decode
/// as an empty object so all-optional shapes still parse. A failure means a
/// required parameter variant is absent or malformed.
fn decode<T: serde::de::DeserializeOwned>(params: &Value) -> Result<T, ExecuteError> {
    let value = match params {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(value).map_err(|err| {
        tracing::debug!(error = %err, "command parameter decode failed");
        ExecuteError::NotSupported
    })
}

impl CommandKind {
    /// Run this command's handler over the pre-update snapshot.
    ///
    /// Pure: no I/O, no mutation of the snapshot. The executor persists the
    /// returned patch afterwards.
    pub fn apply(
        &self,
        snapshot: &StateSnapshot,
        attributes: &Map<String, Value>,
        params: &Value,
    ) -> Result<Outcome, ExecuteError> {
        match self {
            CommandKind::ArmDisarm => arm_disarm(snapshot, decode(params)?),
            CommandKind::BrightnessAbsolute => Ok(brightness_absolute(decode(params)?)),
            CommandKind::GetCameraStream => Ok(get_camera_stream()),
            CommandKind::ColorAbsolute => color_absolute(decode(params)?),
            CommandKind::Dock => Ok(dock()),
            CommandKind::SetFanSpeed => Ok(set_fan_speed(decode(params)?)),
            CommandKind::Reverse => Ok(reverse()),
            CommandKind::Locate => Ok(locate(decode(params)?)),
            CommandKind::LockUnlock => Ok(lock_unlock(decode(params)?)),
            CommandKind::SetModes => Ok(set_modes(snapshot, decode(params)?)),
            CommandKind::OnOff => Ok(on_off(decode(params)?)),
            CommandKind::OpenClose => Ok(open_close(snapshot, attributes, decode(params)?)),
            CommandKind::ActivateScene => Ok(activate_scene(decode(params)?)),
            CommandKind::StartStop => Ok(start_stop(snapshot, decode(params)?)),
            CommandKind::PauseUnpause => Ok(pause_unpause(snapshot, decode(params)?)),
            CommandKind::SetTemperature => Ok(set_temperature(snapshot, decode(params)?)),
            CommandKind::ThermostatTemperatureSetpoint => {
                Ok(thermostat_setpoint(snapshot, decode(params)?))
            }
            CommandKind::ThermostatTemperatureSetRange => {
                Ok(thermostat_set_range(snapshot, decode(params)?))
            }
            CommandKind::ThermostatSetMode => Ok(thermostat_set_mode(snapshot, decode(params)?)),
            CommandKind::TimerStart => Ok(timer_start(decode(params)?)),
            CommandKind::TimerAdjust => timer_adjust(snapshot, decode(params)?),
            CommandKind::TimerPause => timer_pause(snapshot),
            CommandKind::TimerResume => timer_resume(snapshot),
            CommandKind::TimerCancel => timer_cancel(snapshot),
            CommandKind::SetToggles => Ok(set_toggles(snapshot, decode(params)?)),
        }
    }
}

fn arm_disarm(snapshot: &StateSnapshot, p: ArmDisarmParams) -> Result<Outcome, ExecuteError> {
    // `arm` present XOR `cancel` truthy; cancel toggles relative to the
    // current armed state.
    let is_armed = match (p.arm, p.cancel) {
        (Some(arm), false) => arm,
        (None, true) => !snapshot.bool_field("isArmed").unwrap_or(false),
        _ => return Err(ExecuteError::NotSupported),
    };

    let mut outcome = Outcome::new().write("isArmed", json!(is_armed));
    if let Some(level) = p.arm_level {
        outcome = outcome.write("currentArmLevel", json!(level));
    }
    Ok(outcome)
}

fn brightness_absolute(p: BrightnessParams) -> Outcome {
    Outcome::new().write("brightness", Value::Number(p.brightness))
}

fn get_camera_stream() -> Outcome {
    Outcome::new().report("cameraStreamAccessUrl", json!(CAMERA_STREAM_ACCESS_URL))
}

fn color_absolute(p: ColorParams) -> Result<Outcome, ExecuteError> {
    let color = match (p.color.spectrum_rgb, p.color.spectrum_hsv, p.color.temperature) {
        (Some(rgb), None, None) => json!({ "spectrumRgb": rgb }),
        (None, Some(hsv), None) => json!({ "spectrumHsv": hsv }),
        (None, None, Some(kelvin)) => json!({ "temperatureK": kelvin }),
        _ => return Err(ExecuteError::NotSupported),
    };
    Ok(Outcome::new().write("color", color))
}

fn dock() -> Outcome {
    Outcome::new().write("isDocked", json!(true))
}

fn set_fan_speed(p: FanSpeedParams) -> Outcome {
    Outcome::new().write("currentFanSpeedSetting", json!(p.fan_speed))
}

fn reverse() -> Outcome {
    Outcome::new().persist("currentFanSpeedReverse", json!(true))
}

fn locate(p: LocateParams) -> Outcome {
    Outcome::new()
        .persist("silent", json!(p.silent))
        .write("generatedAlert", json!(true))
}

fn lock_unlock(p: LockUnlockParams) -> Outcome {
    Outcome::new().write("isLocked", json!(p.lock))
}

/// Merge named sub-settings into an existing settings map: existing keys are
/// preserved, named keys overwritten.
fn merge_settings(
    snapshot: &StateSnapshot,
    field: &str,
    updates: Map<String, Value>,
) -> Outcome {
    let mut merged = snapshot
        .field(field)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (key, value) in updates {
        merged.insert(key, value);
    }
    Outcome::new().write(field, Value::Object(merged))
}

fn set_modes(snapshot: &StateSnapshot, p: SetModesParams) -> Outcome {
    merge_settings(snapshot, "currentModeSettings", p.update_mode_settings)
}

fn set_toggles(snapshot: &StateSnapshot, p: SetTogglesParams) -> Outcome {
    merge_settings(snapshot, "currentToggleSettings", p.update_toggle_settings)
}

fn on_off(p: OnOffParams) -> Outcome {
    Outcome::new().write("on", json!(p.on))
}

fn open_close(
    snapshot: &StateSnapshot,
    attributes: &Map<String, Value>,
    p: OpenCloseParams,
) -> Outcome {
    if attributes.contains_key("openDirection") {
        // Multi-directional device: update only the matching entry in the
        // openState list; no scalar result in this case.
        let mut entries = snapshot
            .field("openState")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for entry in entries.iter_mut() {
            let direction = entry.get("openDirection").and_then(Value::as_str);
            if direction == p.open_direction.as_deref() {
                if let Some(obj) = entry.as_object_mut() {
                    obj.insert(
                        "openPercent".to_string(),
                        Value::Number(p.open_percent.clone()),
                    );
                }
            }
        }
        Outcome::new().persist("openState", Value::Array(entries))
    } else {
        Outcome::new().write("openPercent", Value::Number(p.open_percent))
    }
}

fn activate_scene(p: ActivateSceneParams) -> Outcome {
    // Scenes report no state back.
    Outcome::new().persist("deactivate", json!(p.deactivate))
}

fn start_stop(snapshot: &StateSnapshot, p: StartStopParams) -> Outcome {
    Outcome::new()
        .write("isRunning", json!(p.start))
        .echo(snapshot, "isPaused")
}

fn pause_unpause(snapshot: &StateSnapshot, p: PauseUnpauseParams) -> Outcome {
    Outcome::new()
        .write("isPaused", json!(p.pause))
        .echo(snapshot, "isRunning")
}

fn set_temperature(snapshot: &StateSnapshot, p: SetTemperatureParams) -> Outcome {
    Outcome::new()
        .write("temperatureSetpointCelsius", Value::Number(p.temperature))
        .echo(snapshot, "temperatureAmbientCelsius")
}

fn thermostat_setpoint(snapshot: &StateSnapshot, p: ThermostatSetpointParams) -> Outcome {
    Outcome::new()
        .write(
            "thermostatTemperatureSetpoint",
            Value::Number(p.thermostat_temperature_setpoint),
        )
        .echo(snapshot, "thermostatMode")
        .echo(snapshot, "thermostatTemperatureAmbient")
        .echo(snapshot, "thermostatHumidityAmbient")
}

fn thermostat_set_range(snapshot: &StateSnapshot, p: ThermostatSetRangeParams) -> Outcome {
    Outcome::new()
        .write(
            "thermostatTemperatureSetpointLow",
            Value::Number(p.thermostat_temperature_setpoint_low),
        )
        .write(
            "thermostatTemperatureSetpointHigh",
            Value::Number(p.thermostat_temperature_setpoint_high),
        )
        .echo(snapshot, "thermostatMode")
        .echo(snapshot, "thermostatTemperatureAmbient")
        .echo(snapshot, "thermostatHumidityAmbient")
}

fn thermostat_set_mode(snapshot: &StateSnapshot, p: ThermostatSetModeParams) -> Outcome {
    Outcome::new()
        .write("thermostatMode", json!(p.thermostat_mode))
        .echo(snapshot, "thermostatTemperatureSetpoint")
        .echo(snapshot, "thermostatTemperatureAmbient")
        .echo(snapshot, "thermostatHumidityAmbient")
}

fn timer_start(p: TimerParams) -> Outcome {
    Outcome::new().write("timerRemainingSec", json!(p.timer_time_sec))
}

/// Current timer value; an absent field counts as "no timer".
fn timer_remaining(snapshot: &StateSnapshot) -> i64 {
    snapshot.i64_field("timerRemainingSec").unwrap_or(TIMER_NONE)
}

fn timer_adjust(snapshot: &StateSnapshot, p: TimerParams) -> Result<Outcome, ExecuteError> {
    let remaining = timer_remaining(snapshot);
    if remaining == TIMER_NONE {
        return Err(ExecuteError::NoTimerExists);
    }
    let adjusted = remaining + p.timer_time_sec;
    if adjusted < 0 {
        return Err(ExecuteError::ValueOutOfRange);
    }
    Ok(Outcome::new().write("timerRemainingSec", json!(adjusted)))
}

fn timer_pause(snapshot: &StateSnapshot) -> Result<Outcome, ExecuteError> {
    if timer_remaining(snapshot) == TIMER_NONE {
        return Err(ExecuteError::NoTimerExists);
    }
    Ok(Outcome::new().write("timerPaused", json!(true)))
}

fn timer_resume(snapshot: &StateSnapshot) -> Result<Outcome, ExecuteError> {
    if timer_remaining(snapshot) == TIMER_NONE {
        return Err(ExecuteError::NoTimerExists);
    }
    Ok(Outcome::new().write("timerPaused", json!(false)))
}

fn timer_cancel(snapshot: &StateSnapshot) -> Result<Outcome, ExecuteError> {
    if timer_remaining(snapshot) == TIMER_NONE {
        return Err(ExecuteError::NoTimerExists);
    }
    // The sentinel is persisted; the caller sees zero remaining.
    Ok(Outcome::new()
        .persist("timerRemainingSec", json!(TIMER_NONE))
        .report("timerRemainingSec", json!(0)))
}
