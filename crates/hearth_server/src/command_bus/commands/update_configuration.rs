use super::EvaluateDevice;
use crate::command_bus::{Command, CommandError, ExecutionContext};
use crate::ui::UiEvent;
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode, PowerStatus};
use hearth_storage::repositories::{away_status, device_control, threshold_temperature};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use strum::IntoEnumIterator;

/// Configuration changes a dashboard can request. Kinds arrive as their
/// wire codes in string keys, modes as `day`/`night`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationPayload {
  pub is_away: Option<bool>,
  pub threshold_temperature: Option<HashMap<String, HashMap<String, f32>>>,
  pub control_measures: Option<HashMap<String, HashMap<String, Vec<u8>>>>,
}

/// Applies a dashboard configuration payload, then re-evaluates every
/// device against the new rules.
pub struct UpdateConfiguration {
  payload: ConfigurationPayload,
}

impl UpdateConfiguration {
  pub fn new(payload: ConfigurationPayload) -> Self {
    Self { payload }
  }

  fn parse_device_key(key: &str) -> Option<DeviceKind> {
    let kind = key.parse::<u8>().ok().and_then(DeviceKind::from_address);
    if kind.is_none() {
      warn!("Ignoring configuration for unknown device kind {:?}", key);
    }
    kind
  }

  fn parse_mode_key(key: &str) -> Option<OperatingMode> {
    let mode = key.parse::<OperatingMode>().ok();
    if mode.is_none() {
      warn!("Ignoring configuration for unknown operating mode {:?}", key);
    }
    mode
  }
}

impl Command for UpdateConfiguration {
  fn name(&self) -> &'static str {
    "UpdateConfiguration"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    if let Some(is_away) = self.payload.is_away {
      if is_away != away_status::is_away(context.db)? {
        let status = if is_away {
          PowerStatus::TurnedOn
        } else {
          PowerStatus::TurnedOff
        };
        away_status::set_away_status(context.db, context.clock.now(), status)?;
        context
          .publisher
          .publish(UiEvent::AwayStatusUpdate(away_status::is_away(context.db)?));
      }
    }

    if let Some(thresholds) = &self.payload.threshold_temperature {
      for (device_key, modes) in thresholds {
        let Some(device_kind) = Self::parse_device_key(device_key) else {
          continue;
        };
        for (mode_key, temperature) in modes {
          let Some(mode) = Self::parse_mode_key(mode_key) else {
            continue;
          };
          let threshold = threshold_temperature::set_threshold_temperature(
            context.db,
            device_kind,
            mode,
            *temperature,
          )?;
          debug!(
            "Threshold {} temperature in {} set to {:.2}",
            device_kind,
            mode,
            threshold.temperature()
          );
          context.publisher.publish(UiEvent::ThresholdTemperatureUpdate {
            kind: device_kind,
            mode,
            temperature: threshold.temperature(),
          });
        }
      }
    }

    if let Some(control_measures) = &self.payload.control_measures {
      for (device_key, modes) in control_measures {
        let Some(device_kind) = Self::parse_device_key(device_key) else {
          continue;
        };
        for (mode_key, measure_codes) in modes {
          let Some(mode) = Self::parse_mode_key(mode_key) else {
            continue;
          };
          let measures: Vec<MeasureKind> = measure_codes
            .iter()
            .filter_map(|code| MeasureKind::from_address(*code))
            .collect();
          device_control::set_controlling_measures(context.db, device_kind, mode, &measures)?;
          debug!(
            "Device {} at {} is now controlled by {} measures",
            device_kind,
            mode,
            measures.len()
          );
        }

        let mut controlled_by: BTreeMap<OperatingMode, Vec<MeasureKind>> =
          OperatingMode::iter().map(|mode| (mode, vec![])).collect();
        for control in device_control::get_measures_controlling(context.db, device_kind, None)? {
          controlled_by
            .entry(control.operating_mode())
            .or_default()
            .push(control.measure_kind());
        }
        context.publisher.publish(UiEvent::DeviceControlUpdate {
          device_kind,
          controlled_by,
        });
      }
    }

    for kind in DeviceKind::iter() {
      context.enqueue(Box::new(EvaluateDevice::new(kind)));
    }
    Ok(())
  }
}
