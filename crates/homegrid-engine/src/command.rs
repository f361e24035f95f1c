//! Command identifiers and request structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Common prefix of every device command identifier.
pub const COMMAND_PREFIX: &str = "action.devices.commands.";

/// One remote-control command against one device.
///
/// Immutable; one per execution call. The parameter shape depends on the
/// command identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Command identifier, e.g. `action.devices.commands.OnOff`.
    pub command: String,
    /// Command parameters.
    #[serde(default)]
    pub params: Value,
}

impl CommandRequest {
    /// Create a request with empty parameters.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            params: Value::Null,
        }
    }

    /// Set command parameters.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

/// The closed, versioned set of supported command kinds.
///
/// Dispatch over this enum is exhaustive; adding a command without a handler
/// is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ArmDisarm,
    BrightnessAbsolute,
    GetCameraStream,
    ColorAbsolute,
    Dock,
    SetFanSpeed,
    Reverse,
    Locate,
    LockUnlock,
    SetModes,
    OnOff,
    OpenClose,
    ActivateScene,
    StartStop,
    PauseUnpause,
    SetTemperature,
    ThermostatTemperatureSetpoint,
    ThermostatTemperatureSetRange,
    ThermostatSetMode,
    TimerStart,
    TimerAdjust,
    TimerPause,
    TimerResume,
    TimerCancel,
    SetToggles,
}

impl CommandKind {
    /// Every supported command kind.
    pub const ALL: &'static [CommandKind] = &[
        CommandKind::ArmDisarm,
        CommandKind::BrightnessAbsolute,
        CommandKind::GetCameraStream,
        CommandKind::ColorAbsolute,
        CommandKind::Dock,
        CommandKind::SetFanSpeed,
        CommandKind::Reverse,
        CommandKind::Locate,
        CommandKind::LockUnlock,
        CommandKind::SetModes,
        CommandKind::OnOff,
        CommandKind::OpenClose,
        CommandKind::ActivateScene,
        CommandKind::StartStop,
        CommandKind::PauseUnpause,
        CommandKind::SetTemperature,
        CommandKind::ThermostatTemperatureSetpoint,
        CommandKind::ThermostatTemperatureSetRange,
        CommandKind::ThermostatSetMode,
        CommandKind::TimerStart,
        CommandKind::TimerAdjust,
        CommandKind::TimerPause,
        CommandKind::TimerResume,
        CommandKind::TimerCancel,
        CommandKind::SetToggles,
    ];

    /// Short command name, the part after the identifier prefix.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::ArmDisarm => "ArmDisarm",
            CommandKind::BrightnessAbsolute => "BrightnessAbsolute",
            CommandKind::GetCameraStream => "GetCameraStream",
            CommandKind::ColorAbsolute => "ColorAbsolute",
            CommandKind::Dock => "Dock",
            CommandKind::SetFanSpeed => "SetFanSpeed",
            CommandKind::Reverse => "Reverse",
            CommandKind::Locate => "Locate",
            CommandKind::LockUnlock => "LockUnlock",
            CommandKind::SetModes => "SetModes",
            CommandKind::OnOff => "OnOff",
            CommandKind::OpenClose => "OpenClose",
            CommandKind::ActivateScene => "ActivateScene",
            CommandKind::StartStop => "StartStop",
            CommandKind::PauseUnpause => "PauseUnpause",
            CommandKind::SetTemperature => "SetTemperature",
            CommandKind::ThermostatTemperatureSetpoint => "ThermostatTemperatureSetpoint",
            CommandKind::ThermostatTemperatureSetRange => "ThermostatTemperatureSetRange",
            CommandKind::ThermostatSetMode => "ThermostatSetMode",
            CommandKind::TimerStart => "TimerStart",
            CommandKind::TimerAdjust => "TimerAdjust",
            CommandKind::TimerPause => "TimerPause",
            CommandKind::TimerResume => "TimerResume",
            CommandKind::TimerCancel => "TimerCancel",
            CommandKind::SetToggles => "SetToggles",
        }
    }

    /// Full command identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            CommandKind::ArmDisarm => "action.devices.commands.ArmDisarm",
            CommandKind::BrightnessAbsolute => "action.devices.commands.BrightnessAbsolute",
            CommandKind::GetCameraStream => "action.devices.commands.GetCameraStream",
            CommandKind::ColorAbsolute => "action.devices.commands.ColorAbsolute",
            CommandKind::Dock => "action.devices.commands.Dock",
            CommandKind::SetFanSpeed => "action.devices.commands.SetFanSpeed",
            CommandKind::Reverse => "action.devices.commands.Reverse",
            CommandKind::Locate => "action.devices.commands.Locate",
            CommandKind::LockUnlock => "action.devices.commands.LockUnlock",
            CommandKind::SetModes => "action.devices.commands.SetModes",
            CommandKind::OnOff => "action.devices.commands.OnOff",
            CommandKind::OpenClose => "action.devices.commands.OpenClose",
            CommandKind::ActivateScene => "action.devices.commands.ActivateScene",
            CommandKind::StartStop => "action.devices.commands.StartStop",
            CommandKind::PauseUnpause => "action.devices.commands.PauseUnpause",
            CommandKind::SetTemperature => "action.devices.commands.SetTemperature",
            CommandKind::ThermostatTemperatureSetpoint => {
                "action.devices.commands.ThermostatTemperatureSetpoint"
            }
            CommandKind::ThermostatTemperatureSetRange => {
                "action.devices.commands.ThermostatTemperatureSetRange"
            }
            CommandKind::ThermostatSetMode => "action.devices.commands.ThermostatSetMode",
            CommandKind::TimerStart => "action.devices.commands.TimerStart",
            CommandKind::TimerAdjust => "action.devices.commands.TimerAdjust",
            CommandKind::TimerPause => "action.devices.commands.TimerPause",
            CommandKind::TimerResume => "action.devices.commands.TimerResume",
            CommandKind::TimerCancel => "action.devices.commands.TimerCancel",
            CommandKind::SetToggles => "action.devices.commands.SetToggles",
        }
    }

    /// Whether the handler branches on device attributes, requiring an
    /// extra attributes read before dispatch.
    pub fn needs_attributes(&self) -> bool {
        matches!(self, CommandKind::OpenClose)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
