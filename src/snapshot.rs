//! Typed snapshots of the testbed endpoints and the decoders that validate
//! raw JSON payloads into them.
//!
//! Decoding is explicit over `serde_json::Value` so a malformed payload
//! fails with the first missing or mistyped field named, instead of a
//! generic deserialization error.

use serde::Serialize;
use serde_json::Value;

use crate::error::DecodeError;

/// One decoded, immutable result of a single poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Snapshot {
    Plc(PlcSnapshot),
    HouseholdPair(HouseholdPairSnapshot),
    PowerMeter(PowerMeterSnapshot),
    TransferSwitch(TransferSwitchSnapshot),
}

/// PLC register/coil state for one household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlcSnapshot {
    pub holding_registers: Vec<i64>,
    pub coil_state: bool,
}

impl PlcSnapshot {
    /// Current power-meter reading in mW (holding register 0).
    pub fn meter_reading(&self) -> i64 {
        self.holding_registers[0]
    }

    /// Source-switching threshold in mW (holding register 1).
    pub fn switching_threshold(&self) -> i64 {
        self.holding_registers[1]
    }
}

/// Aggregate payload for the two-household HMI dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdPairSnapshot {
    pub household1: PlcSnapshot,
    pub household2: PlcSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerMeterSnapshot {
    /// Minutes since simulation-day start; wraps at 1440.
    pub elapsed_minutes: u32,
    pub reading: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferSwitchSnapshot {
    /// true = solar panel, false = mains.
    pub active_source: bool,
}

/// A payload validator for one endpoint type.
pub type Decoder = fn(&Value) -> std::result::Result<Snapshot, DecodeError>;

pub fn decode_plc(value: &Value) -> Result<Snapshot, DecodeError> {
    Ok(Snapshot::Plc(plc_fields(value, "")?))
}

pub fn decode_household_pair(value: &Value) -> Result<Snapshot, DecodeError> {
    let household1 = plc_fields(require(value, "", "household1")?, "household1.")?;
    let household2 = plc_fields(require(value, "", "household2")?, "household2.")?;
    Ok(Snapshot::HouseholdPair(HouseholdPairSnapshot {
        household1,
        household2,
    }))
}

pub fn decode_power_meter(value: &Value) -> Result<Snapshot, DecodeError> {
    let elapsed = require(value, "", "elapsedMinutes")?;
    let elapsed_minutes = elapsed
        .as_u64()
        .and_then(|m| u32::try_from(m).ok())
        .ok_or_else(|| DecodeError::mistyped("elapsedMinutes", "non-negative integer"))?;
    let reading = require(value, "", "reading")?
        .as_f64()
        .ok_or_else(|| DecodeError::mistyped("reading", "number"))?;
    Ok(Snapshot::PowerMeter(PowerMeterSnapshot {
        elapsed_minutes,
        reading,
    }))
}

pub fn decode_transfer_switch(value: &Value) -> Result<Snapshot, DecodeError> {
    let active_source = require(value, "", "activeSource")?
        .as_bool()
        .ok_or_else(|| DecodeError::mistyped("activeSource", "boolean"))?;
    Ok(Snapshot::TransferSwitch(TransferSwitchSnapshot {
        active_source,
    }))
}

/// Extract the PLC fields from `value`, prefixing error paths with `prefix`
/// so nested household failures name the full field path.
fn plc_fields(value: &Value, prefix: &str) -> Result<PlcSnapshot, DecodeError> {
    let regs = require(value, prefix, "holdingRegisters")?;
    let regs = regs
        .as_array()
        .ok_or_else(|| DecodeError::mistyped(format!("{prefix}holdingRegisters"), "array"))?;

    let mut holding_registers = Vec::with_capacity(regs.len());
    for (i, reg) in regs.iter().enumerate() {
        let n = reg.as_i64().ok_or_else(|| {
            DecodeError::mistyped(format!("{prefix}holdingRegisters[{i}]"), "integer")
        })?;
        holding_registers.push(n);
    }
    // Registers 0 and 1 carry the reading and the threshold.
    if holding_registers.len() < 2 {
        return Err(DecodeError::missing(format!(
            "{prefix}holdingRegisters[{}]",
            holding_registers.len()
        )));
    }

    let coil_state = require(value, prefix, "coilState")?
        .as_bool()
        .ok_or_else(|| DecodeError::mistyped(format!("{prefix}coilState"), "boolean"))?;

    Ok(PlcSnapshot {
        holding_registers,
        coil_state,
    })
}

fn require<'a>(value: &'a Value, prefix: &str, field: &str) -> Result<&'a Value, DecodeError> {
    match value.get(field) {
        Some(v) => Ok(v),
        None => Err(DecodeError::missing(format!("{prefix}{field}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_plc_well_formed() {
        let payload = json!({"holdingRegisters": [500, 800], "coilState": true});
        let snapshot = decode_plc(&payload).unwrap();

        match snapshot {
            Snapshot::Plc(plc) => {
                assert_eq!(plc.holding_registers, vec![500, 800]);
                assert_eq!(plc.meter_reading(), 500);
                assert_eq!(plc.switching_threshold(), 800);
                assert!(plc.coil_state);
            }
            other => panic!("expected Plc snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_plc_missing_coil() {
        let payload = json!({"holdingRegisters": [500, 800]});
        let err = decode_plc(&payload).unwrap_err();
        assert_eq!(err.field, "coilState");
        assert_eq!(err.reason, "missing field");
    }

    #[test]
    fn test_decode_plc_short_register_array() {
        let payload = json!({"holdingRegisters": [500], "coilState": false});
        let err = decode_plc(&payload).unwrap_err();
        assert_eq!(err.field, "holdingRegisters[1]");
    }

    #[test]
    fn test_decode_plc_mistyped_register() {
        let payload = json!({"holdingRegisters": [500, "high"], "coilState": false});
        let err = decode_plc(&payload).unwrap_err();
        assert_eq!(err.field, "holdingRegisters[1]");
        assert_eq!(err.reason, "expected integer");
    }

    #[test]
    fn test_decode_plc_names_first_bad_field() {
        // holdingRegisters is checked before coilState; both are bad here.
        let payload = json!({"holdingRegisters": true, "coilState": 7});
        let err = decode_plc(&payload).unwrap_err();
        assert_eq!(err.field, "holdingRegisters");
    }

    #[test]
    fn test_decode_household_pair() {
        let payload = json!({
            "household1": {"holdingRegisters": [500, 800], "coilState": true},
            "household2": {"holdingRegisters": [120, 800], "coilState": false},
        });
        let snapshot = decode_household_pair(&payload).unwrap();

        match snapshot {
            Snapshot::HouseholdPair(pair) => {
                assert_eq!(pair.household1.meter_reading(), 500);
                assert!(pair.household1.coil_state);
                assert_eq!(pair.household2.meter_reading(), 120);
                assert!(!pair.household2.coil_state);
            }
            other => panic!("expected HouseholdPair snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_household_pair_nested_error_path() {
        let payload = json!({
            "household1": {"holdingRegisters": [500, 800], "coilState": true},
            "household2": {"holdingRegisters": [120, 800]},
        });
        let err = decode_household_pair(&payload).unwrap_err();
        assert_eq!(err.field, "household2.coilState");
    }

    #[test]
    fn test_decode_household_pair_missing_household() {
        let payload = json!({
            "household1": {"holdingRegisters": [500, 800], "coilState": true},
        });
        let err = decode_household_pair(&payload).unwrap_err();
        assert_eq!(err.field, "household2");
    }

    #[test]
    fn test_decode_power_meter() {
        let payload = json!({"elapsedMinutes": 375, "reading": 842.5});
        let snapshot = decode_power_meter(&payload).unwrap();
        assert_eq!(
            snapshot,
            Snapshot::PowerMeter(PowerMeterSnapshot {
                elapsed_minutes: 375,
                reading: 842.5,
            })
        );
    }

    #[test]
    fn test_decode_power_meter_integral_reading() {
        // An integer reading is still a number.
        let payload = json!({"elapsedMinutes": 0, "reading": 842});
        let snapshot = decode_power_meter(&payload).unwrap();
        match snapshot {
            Snapshot::PowerMeter(pm) => assert_eq!(pm.reading, 842.0),
            other => panic!("expected PowerMeter snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_power_meter_rejects_negative_minutes() {
        let payload = json!({"elapsedMinutes": -5, "reading": 842.5});
        let err = decode_power_meter(&payload).unwrap_err();
        assert_eq!(err.field, "elapsedMinutes");
    }

    #[test]
    fn test_decode_power_meter_missing_reading() {
        let payload = json!({"elapsedMinutes": 375});
        let err = decode_power_meter(&payload).unwrap_err();
        assert_eq!(err.field, "reading");
        assert_eq!(err.reason, "missing field");
    }

    #[test]
    fn test_decode_transfer_switch() {
        let payload = json!({"activeSource": true});
        assert_eq!(
            decode_transfer_switch(&payload).unwrap(),
            Snapshot::TransferSwitch(TransferSwitchSnapshot {
                active_source: true
            })
        );

        let payload = json!({"activeSource": false});
        assert_eq!(
            decode_transfer_switch(&payload).unwrap(),
            Snapshot::TransferSwitch(TransferSwitchSnapshot {
                active_source: false
            })
        );
    }

    #[test]
    fn test_decode_transfer_switch_mistyped() {
        let payload = json!({"activeSource": "solar"});
        let err = decode_transfer_switch(&payload).unwrap_err();
        assert_eq!(err.field, "activeSource");
        assert_eq!(err.reason, "expected boolean");
    }

    #[test]
    fn test_decode_is_deterministic() {
        let payload = json!({"holdingRegisters": [500, 800], "coilState": true});
        assert_eq!(decode_plc(&payload).unwrap(), decode_plc(&payload).unwrap());

        let bad = json!({"coilState": true});
        assert_eq!(decode_plc(&bad).unwrap_err(), decode_plc(&bad).unwrap_err());
    }
}
