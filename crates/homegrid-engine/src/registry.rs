//! Command registry.
//!
//! Static table associating each supported command identifier with its
//! handler specification. Immutable after initialization, process-wide
//! read-only; lookup is O(1). An unrecognized identifier is a registry miss,
//! surfaced by the executor as `actionNotAvailable`.

use std::collections::HashMap;

use crate::command::CommandKind;

/// Handler specification: parameter names and the state fields a command
/// reads for validation/echo and writes on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub required_params: &'static [&'static str],
    pub optional_params: &'static [&'static str],
    /// Fields read from the pre-update snapshot.
    pub reads: &'static [&'static str],
    /// Fields the patch may touch.
    pub writes: &'static [&'static str],
}

impl CommandKind {
    /// The handler specification for this command kind.
    pub fn spec(&self) -> CommandSpec {
        match self {
            CommandKind::ArmDisarm => CommandSpec {
                required_params: &[],
                optional_params: &["arm", "cancel", "armLevel"],
                reads: &["isArmed"],
                writes: &["isArmed", "currentArmLevel"],
            },
            CommandKind::BrightnessAbsolute => CommandSpec {
                required_params: &["brightness"],
                optional_params: &[],
                reads: &[],
                writes: &["brightness"],
            },
            CommandKind::GetCameraStream => CommandSpec {
                required_params: &[],
                optional_params: &[],
                reads: &[],
                writes: &[],
            },
            CommandKind::ColorAbsolute => CommandSpec {
                required_params: &["color"],
                optional_params: &[],
                reads: &[],
                writes: &["color"],
            },
            CommandKind::Dock => CommandSpec {
                required_params: &[],
                optional_params: &[],
                reads: &[],
                writes: &["isDocked"],
            },
            CommandKind::SetFanSpeed => CommandSpec {
                required_params: &["fanSpeed"],
                optional_params: &[],
                reads: &[],
                writes: &["currentFanSpeedSetting"],
            },
            CommandKind::Reverse => CommandSpec {
                required_params: &[],
                optional_params: &[],
                reads: &[],
                writes: &["currentFanSpeedReverse"],
            },
            CommandKind::Locate => CommandSpec {
                required_params: &[],
                optional_params: &["silent"],
                reads: &[],
                writes: &["silent", "generatedAlert"],
            },
            CommandKind::LockUnlock => CommandSpec {
                required_params: &["lock"],
                optional_params: &[],
                reads: &[],
                writes: &["isLocked"],
            },
            CommandKind::SetModes => CommandSpec {
                required_params: &["updateModeSettings"],
                optional_params: &[],
                reads: &["currentModeSettings"],
                writes: &["currentModeSettings"],
            },
            CommandKind::OnOff => CommandSpec {
                required_params: &["on"],
                optional_params: &[],
                reads: &[],
                writes: &["on"],
            },
            CommandKind::OpenClose => CommandSpec {
                required_params: &["openPercent"],
                optional_params: &["openDirection"],
                reads: &["openState"],
                writes: &["openState", "openPercent"],
            },
            CommandKind::ActivateScene => CommandSpec {
                required_params: &[],
                optional_params: &["deactivate"],
                reads: &[],
                writes: &["deactivate"],
            },
            CommandKind::StartStop => CommandSpec {
                required_params: &["start"],
                optional_params: &[],
                reads: &["isPaused"],
                writes: &["isRunning"],
            },
            CommandKind::PauseUnpause => CommandSpec {
                required_params: &["pause"],
                optional_params: &[],
                reads: &["isRunning"],
                writes: &["isPaused"],
            },
            CommandKind::SetTemperature => CommandSpec {
                required_params: &["temperature"],
                optional_params: &[],
                reads: &["temperatureAmbientCelsius"],
                writes: &["temperatureSetpointCelsius"],
            },
            CommandKind::ThermostatTemperatureSetpoint => CommandSpec {
                required_params: &["thermostatTemperatureSetpoint"],
                optional_params: &[],
                reads: &[
                    "thermostatMode",
                    "thermostatTemperatureAmbient",
                    "thermostatHumidityAmbient",
                ],
                writes: &["thermostatTemperatureSetpoint"],
            },
            CommandKind::ThermostatTemperatureSetRange => CommandSpec {
                required_params: &[
                    "thermostatTemperatureSetpointLow",
                    "thermostatTemperatureSetpointHigh",
                ],
                optional_params: &[],
                reads: &[
                    "thermostatMode",
                    "thermostatTemperatureAmbient",
                    "thermostatHumidityAmbient",
                ],
                writes: &[
                    "thermostatTemperatureSetpointLow",
                    "thermostatTemperatureSetpointHigh",
                ],
            },
            CommandKind::ThermostatSetMode => CommandSpec {
                required_params: &["thermostatMode"],
                optional_params: &[],
                reads: &[
                    "thermostatTemperatureSetpoint",
                    "thermostatTemperatureAmbient",
                    "thermostatHumidityAmbient",
                ],
                writes: &["thermostatMode"],
            },
            CommandKind::TimerStart => CommandSpec {
                required_params: &["timerTimeSec"],
                optional_params: &[],
                reads: &[],
                writes: &["timerRemainingSec"],
            },
            CommandKind::TimerAdjust => CommandSpec {
                required_params: &["timerTimeSec"],
                optional_params: &[],
                reads: &["timerRemainingSec"],
                writes: &["timerRemainingSec"],
            },
            CommandKind::TimerPause => CommandSpec {
                required_params: &[],
                optional_params: &[],
                reads: &["timerRemainingSec"],
                writes: &["timerPaused"],
            },
            CommandKind::TimerResume => CommandSpec {
                required_params: &[],
                optional_params: &[],
                reads: &["timerRemainingSec"],
                writes: &["timerPaused"],
            },
            CommandKind::TimerCancel => CommandSpec {
                required_params: &[],
                optional_params: &[],
                reads: &["timerRemainingSec"],
                writes: &["timerRemainingSec"],
            },
            CommandKind::SetToggles => CommandSpec {
                required_params: &["updateToggleSettings"],
                optional_params: &[],
                reads: &["currentToggleSettings"],
                writes: &["currentToggleSettings"],
            },
        }
    }
}

/// Identifier → kind lookup table.
pub struct CommandRegistry {
    table: HashMap<&'static str, CommandKind>,
}

impl CommandRegistry {
    /// Build the registry over the full command set.
    pub fn new() -> Self {
        let mut table = HashMap::with_capacity(CommandKind::ALL.len());
        for kind in CommandKind::ALL {
            table.insert(kind.identifier(), *kind);
        }
        Self { table }
    }

    /// Resolve a command identifier. `None` is a registry miss.
    pub fn lookup(&self, identifier: &str) -> Option<CommandKind> {
        self.table.get(identifier).copied()
    }

    /// All registered kinds, in identifier order.
    pub fn commands(&self) -> Vec<CommandKind> {
        let mut kinds: Vec<CommandKind> = self.table.values().copied().collect();
        kinds.sort_by_key(|k| k.identifier());
        kinds
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let registry = CommandRegistry::new();
        assert_eq!(
            registry.lookup("action.devices.commands.OnOff"),
            Some(CommandKind::OnOff)
        );
        assert_eq!(
            registry.lookup("action.devices.commands.TimerCancel"),
            Some(CommandKind::TimerCancel)
        );
    }

    #[test]
    fn test_lookup_miss() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.lookup("action.devices.commands.Nope"), None);
        assert_eq!(registry.lookup(""), None);
    }

    #[test]
    fn test_registry_covers_all_kinds() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.len(), CommandKind::ALL.len());
        for kind in CommandKind::ALL {
            assert_eq!(registry.lookup(kind.identifier()), Some(*kind));
        }
    }

    #[test]
    fn test_specs_are_consistent() {
        for kind in CommandKind::ALL {
            let spec = kind.spec();
            // A command that reads nothing and writes nothing must be one of
            // the known read-only kinds.
            if spec.writes.is_empty() {
                assert_eq!(*kind, CommandKind::GetCameraStream);
            }
        }
    }
}
