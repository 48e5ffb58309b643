use planner_derive::KvDisplay;

use crate::{Error, Result};

/// Vehicle capabilities. Immutable once validated.
#[derive(Clone, Copy, Debug, PartialEq, KvDisplay)]
pub struct HardwareSpec {
    /// UAV cruise speed, `uA_max`.
    pub uav_max_speed: f64,
    /// UGV speed, `uG_max`.
    pub ugv_max_speed: f64,
    /// UAV battery capacity, `e`.
    pub uav_max_energy: f64,
    /// Energy used per unit of flight time, `B-`.
    pub uav_depletion_rate: f64,
    /// Energy regained per unit of charging time, `B+`. Not used by feasibility.
    pub uav_charge_rate: f64,
    /// Side of the detection footprint, `d`. Not used by feasibility.
    pub detection_footprint: f64,
    /// Number of UAVs, `n`.
    pub uav_count: usize,
    /// Number of UGVs, `m`. Only a single UGV is supported.
    pub ugv_count: usize,
}

impl Default for HardwareSpec {
    fn default() -> Self {
        Self {
            uav_max_speed: 1.0,
            ugv_max_speed: 0.5,
            uav_max_energy: 10.0,
            uav_depletion_rate: 1.0,
            uav_charge_rate: 1.0,
            detection_footprint: 1.0,
            uav_count: 4,
            ugv_count: 1,
        }
    }
}

impl HardwareSpec {
    pub fn validate(&self) -> Result<()> {
        positive("uav_max_speed", self.uav_max_speed)?;
        positive("ugv_max_speed", self.ugv_max_speed)?;
        positive("uav_max_energy", self.uav_max_energy)?;
        non_negative("uav_depletion_rate", self.uav_depletion_rate)?;
        non_negative("uav_charge_rate", self.uav_charge_rate)?;
        non_negative("detection_footprint", self.detection_footprint)?;
        if self.uav_count == 0 {
            return Err(Error::invalid_config("uav_count must be > 0"));
        }
        if self.ugv_count != 1 {
            return Err(Error::invalid_config(format!(
                "ugv_count must be 1 (got {}); multiple ground vehicles are not supported",
                self.ugv_count
            )));
        }
        Ok(())
    }

    pub fn uav_flight_time(&self, length: f64) -> f64 {
        length / self.uav_max_speed
    }

    pub fn ugv_drive_time(&self, length: f64) -> f64 {
        length / self.ugv_max_speed
    }

    /// Energy burned flying `length` at cruise speed.
    pub fn uav_energy_used(&self, length: f64) -> f64 {
        self.uav_flight_time(length) * self.uav_depletion_rate
    }

    /// Whether a charged UAV can fly `length` and land with energy to spare.
    pub fn uav_can_cover(&self, length: f64) -> bool {
        self.uav_max_energy - self.uav_energy_used(length) > 0.0
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_config(format!("{name} must be > 0 (got {value})")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_config(format!("{name} must be >= 0 (got {value})")))
    }
}
