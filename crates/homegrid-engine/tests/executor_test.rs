//! Executor integration tests against an in-memory store.
//!
//! A counting wrapper around the store proves that failed validations issue
//! zero writes and that successful commands issue exactly one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use homegrid_core::store::Result as StoreResult;
use homegrid_core::{Device, DeviceName, StatePatch, StateSnapshot, StateStore, TIMER_NONE};
use homegrid_engine::{CommandExecutor, CommandRequest, ExecuteError};
use homegrid_storage::{DeviceDirectory, MemoryBackend};

/// Store wrapper that counts state writes.
struct CountingStore {
    inner: Arc<DeviceDirectory>,
    writes: Arc<AtomicUsize>,
}

#[async_trait]
impl StateStore for CountingStore {
    async fn device_state(&self, user_id: &str, device_id: &str) -> StoreResult<StateSnapshot> {
        self.inner.device_state(user_id, device_id).await
    }

    async fn device_attributes(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> StoreResult<Map<String, Value>> {
        self.inner.device_attributes(user_id, device_id).await
    }

    async fn update_device_state(
        &self,
        user_id: &str,
        device_id: &str,
        patch: &StatePatch,
    ) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_device_state(user_id, device_id, patch).await
    }
}

struct Fixture {
    directory: Arc<DeviceDirectory>,
    writes: Arc<AtomicUsize>,
    executor: CommandExecutor,
}

impl Fixture {
    fn new() -> Self {
        let directory = Arc::new(DeviceDirectory::new(Arc::new(MemoryBackend::new())));
        let writes = Arc::new(AtomicUsize::new(0));
        let executor = CommandExecutor::new(Arc::new(CountingStore {
            inner: directory.clone(),
            writes: writes.clone(),
        }));
        Self {
            directory,
            writes,
            executor,
        }
    }

    fn seed(&self, device_id: &str, state: StateSnapshot) {
        self.seed_device(Device::new(device_id, "LIGHT", DeviceName::new(device_id)), state);
    }

    fn seed_device(&self, device: Device, state: StateSnapshot) {
        self.directory.register_device("alice", device, state).unwrap();
    }

    async fn execute(
        &self,
        device_id: &str,
        command: &str,
        params: Value,
    ) -> Result<Map<String, Value>, ExecuteError> {
        let request = CommandRequest::new(command).with_params(params);
        self.executor.execute("alice", device_id, &request).await
    }

    fn state(&self, device_id: &str) -> StateSnapshot {
        self.directory.device("alice", device_id).unwrap().states
    }

    fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

const ON_OFF: &str = "action.devices.commands.OnOff";

#[tokio::test]
async fn test_offline_device_fails_with_zero_writes() {
    let fx = Fixture::new();
    fx.seed("light-1", StateSnapshot::new(false).with_field("on", json!(false)));

    let err = fx.execute("light-1", ON_OFF, json!({"on": true})).await.unwrap_err();
    assert!(matches!(err, ExecuteError::DeviceOffline));
    assert_eq!(err.error_code(), "deviceOffline");
    assert_eq!(fx.write_count(), 0);
    assert_eq!(fx.state("light-1").bool_field("on"), Some(false));
}

#[tokio::test]
async fn test_missing_device_fails_with_zero_writes() {
    let fx = Fixture::new();

    let err = fx.execute("ghost", ON_OFF, json!({"on": true})).await.unwrap_err();
    assert!(matches!(err, ExecuteError::DeviceNotFound));
    assert_eq!(err.error_code(), "deviceNotFound");
    assert_eq!(fx.write_count(), 0);
}

#[tokio::test]
async fn test_unknown_command_is_action_not_available() {
    let fx = Fixture::new();
    fx.seed("light-1", StateSnapshot::new(true));

    let err = fx
        .execute("light-1", "action.devices.commands.SelfDestruct", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::ActionNotAvailable));
    assert_eq!(err.error_code(), "actionNotAvailable");
    assert_eq!(fx.write_count(), 0);
}

#[tokio::test]
async fn test_color_absolute_empty_object_not_supported() {
    let fx = Fixture::new();
    fx.seed("light-1", StateSnapshot::new(true));

    let err = fx
        .execute(
            "light-1",
            "action.devices.commands.ColorAbsolute",
            json!({"color": {}}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::NotSupported));
    assert_eq!(err.error_code(), "notSupported");
    assert_eq!(fx.write_count(), 0);
}

#[tokio::test]
async fn test_timer_adjust_guards() {
    let fx = Fixture::new();
    fx.seed(
        "oven-1",
        StateSnapshot::new(true).with_field("timerRemainingSec", json!(TIMER_NONE)),
    );

    let err = fx
        .execute(
            "oven-1",
            "action.devices.commands.TimerAdjust",
            json!({"timerTimeSec": 30}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::NoTimerExists));

    fx.seed(
        "oven-2",
        StateSnapshot::new(true).with_field("timerRemainingSec", json!(10)),
    );
    let err = fx
        .execute(
            "oven-2",
            "action.devices.commands.TimerAdjust",
            json!({"timerTimeSec": -20}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExecuteError::ValueOutOfRange));

    assert_eq!(fx.write_count(), 0);
    assert_eq!(fx.state("oven-2").i64_field("timerRemainingSec"), Some(10));
}

#[tokio::test]
async fn test_timer_cancel_persists_sentinel_reports_zero() {
    let fx = Fixture::new();
    fx.seed(
        "oven-1",
        StateSnapshot::new(true).with_field("timerRemainingSec", json!(120)),
    );

    let result = fx
        .execute("oven-1", "action.devices.commands.TimerCancel", Value::Null)
        .await
        .unwrap();

    assert_eq!(result["timerRemainingSec"], 0);
    assert_eq!(fx.write_count(), 1);
    assert_eq!(
        fx.state("oven-1").i64_field("timerRemainingSec"),
        Some(TIMER_NONE)
    );
}

#[tokio::test]
async fn test_on_off_writes_and_confirms() {
    let fx = Fixture::new();
    fx.seed("light-1", StateSnapshot::new(true).with_field("on", json!(false)));

    let result = fx.execute("light-1", ON_OFF, json!({"on": true})).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result["on"], true);
    assert_eq!(fx.write_count(), 1);
    assert_eq!(fx.state("light-1").bool_field("on"), Some(true));
}

#[tokio::test]
async fn test_on_off_is_idempotent() {
    let fx = Fixture::new();
    fx.seed("light-1", StateSnapshot::new(true).with_field("on", json!(false)));

    let first = fx.execute("light-1", ON_OFF, json!({"on": true})).await.unwrap();
    let state_after_first = fx.state("light-1");

    let second = fx.execute("light-1", ON_OFF, json!({"on": true})).await.unwrap();
    let state_after_second = fx.state("light-1");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&state_after_first).unwrap(),
        serde_json::to_value(&state_after_second).unwrap()
    );
    assert_eq!(fx.write_count(), 2);
}

#[tokio::test]
async fn test_start_stop_echoes_unchanged_pause_state() {
    let fx = Fixture::new();
    fx.seed(
        "washer-1",
        StateSnapshot::new(true)
            .with_field("isRunning", json!(false))
            .with_field("isPaused", json!(true)),
    );

    let result = fx
        .execute(
            "washer-1",
            "action.devices.commands.StartStop",
            json!({"start": true}),
        )
        .await
        .unwrap();

    assert_eq!(result["isRunning"], true);
    assert_eq!(result["isPaused"], true);
    // The echoed sibling is not written back.
    assert_eq!(fx.state("washer-1").bool_field("isPaused"), Some(true));
    assert_eq!(fx.state("washer-1").bool_field("isRunning"), Some(true));
}

#[tokio::test]
async fn test_arm_disarm_cancel_toggles_current_state() {
    let fx = Fixture::new();
    fx.seed(
        "alarm-1",
        StateSnapshot::new(true).with_field("isArmed", json!(true)),
    );

    let result = fx
        .execute(
            "alarm-1",
            "action.devices.commands.ArmDisarm",
            json!({"cancel": true}),
        )
        .await
        .unwrap();

    assert_eq!(result["isArmed"], false);
    assert_eq!(fx.state("alarm-1").bool_field("isArmed"), Some(false));
}

#[tokio::test]
async fn test_camera_stream_is_read_only() {
    let fx = Fixture::new();
    fx.seed("cam-1", StateSnapshot::new(true));

    let result = fx
        .execute("cam-1", "action.devices.commands.GetCameraStream", Value::Null)
        .await
        .unwrap();

    assert!(result["cameraStreamAccessUrl"].is_string());
    assert_eq!(fx.write_count(), 0);
    assert!(fx.state("cam-1").field("cameraStreamAccessUrl").is_none());
}

#[tokio::test]
async fn test_open_close_uses_device_attributes() {
    let fx = Fixture::new();
    let blinds = Device::new("blinds-1", "BLINDS", DeviceName::new("Blinds"))
        .with_trait("action.devices.traits.OpenClose")
        .with_attribute("openDirection", json!(["UP", "DOWN"]));
    fx.seed_device(
        blinds,
        StateSnapshot::new(true).with_field(
            "openState",
            json!([
                {"openDirection": "UP", "openPercent": 0},
                {"openDirection": "DOWN", "openPercent": 0},
            ]),
        ),
    );

    let result = fx
        .execute(
            "blinds-1",
            "action.devices.commands.OpenClose",
            json!({"openPercent": 80, "openDirection": "UP"}),
        )
        .await
        .unwrap();

    assert!(result.is_empty());
    let entries = fx.state("blinds-1");
    let open_state = entries.field("openState").unwrap().as_array().unwrap().clone();
    assert_eq!(open_state[0]["openPercent"], 80);
    assert_eq!(open_state[1]["openPercent"], 0);
}

#[tokio::test]
async fn test_set_modes_preserves_existing_settings() {
    let fx = Fixture::new();
    fx.seed(
        "washer-1",
        StateSnapshot::new(true)
            .with_field("currentModeSettings", json!({"load": "small", "temp": "cold"})),
    );

    let result = fx
        .execute(
            "washer-1",
            "action.devices.commands.SetModes",
            json!({"updateModeSettings": {"temp": "hot"}}),
        )
        .await
        .unwrap();

    assert_eq!(result["currentModeSettings"]["load"], "small");
    assert_eq!(result["currentModeSettings"]["temp"], "hot");
    let stored = fx.state("washer-1");
    assert_eq!(stored.field("currentModeSettings").unwrap()["temp"], "hot");
}
