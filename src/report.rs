//! Fleet report assembly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battery::charge_time::charge_time;
use crate::cost::{self, Tariff};
use crate::error::EngineError;

/// Fleet parameters for one report computation.
///
/// Deserialized from an external request or built from a scenario config;
/// immutable for the duration of one computation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetInput {
    /// Number of vehicles in the fleet.
    pub num_ev: u32,
    /// Daily mileage per vehicle (mi).
    pub daily_mileage_mi: f32,
    /// Battery capacity per vehicle (kWh).
    pub battery_capacity_kwh: f32,
    /// Charger power rating (kW).
    pub charge_power_kw: f32,
    /// Vehicle efficiency (mi/kWh).
    pub efficiency_mi_per_kwh: f32,
    /// Usable SOC band as percentages, ascending.
    pub battery_dod: [f32; 2],
    /// Daily operating window as hours of day, ascending.
    pub working_hours: [f32; 2],
}

impl FleetInput {
    /// Validates every field, failing fast on the first violation.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.num_ev == 0 {
            return Err(EngineError::invalid("num_ev", "must be > 0"));
        }
        if self.daily_mileage_mi <= 0.0 {
            return Err(EngineError::invalid("daily_mileage_mi", "must be > 0"));
        }
        if self.battery_capacity_kwh <= 0.0 {
            return Err(EngineError::invalid("battery_capacity_kwh", "must be > 0"));
        }
        if self.charge_power_kw < 0.0 {
            return Err(EngineError::invalid("charge_power_kw", "must be >= 0"));
        }
        if self.efficiency_mi_per_kwh <= 0.0 {
            return Err(EngineError::invalid("efficiency_mi_per_kwh", "must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.battery_dod[0])
            || !(0.0..=100.0).contains(&self.battery_dod[1])
        {
            return Err(EngineError::invalid(
                "battery_dod",
                "bounds must be in [0, 100] percent",
            ));
        }
        if self.battery_dod[0] >= self.battery_dod[1] {
            return Err(EngineError::invalid(
                "battery_dod",
                "lower bound must be < upper bound",
            ));
        }
        if !(0.0..=24.0).contains(&self.working_hours[0])
            || !(0.0..=24.0).contains(&self.working_hours[1])
        {
            return Err(EngineError::invalid(
                "working_hours",
                "hours must be in [0, 24]",
            ));
        }
        if self.working_hours[0] >= self.working_hours[1] {
            return Err(EngineError::invalid(
                "working_hours",
                "start hour must be < end hour",
            ));
        }
        Ok(())
    }

    /// Usable capacity of the configured SOC band (kWh).
    pub fn usable_capacity_kwh(&self) -> f32 {
        (self.battery_dod[1] - self.battery_dod[0]) / 100.0 * self.battery_capacity_kwh
    }
}

/// Aggregated fleet charging report.
///
/// Echoes the input record plus all derived scalars. Owned by the caller;
/// the engine never persists reports itself.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// The input record this report was computed from.
    #[serde(flatten)]
    pub input: FleetInput,
    /// Usable capacity of the SOC band (kWh).
    pub usable_capacity_kwh: f32,
    /// Daily energy consumption per vehicle (kWh).
    pub daily_energy_consumption_per_ev_kwh: f32,
    /// Time to charge across the SOC band (hours).
    pub charge_time_per_ev_hr: f32,
    /// Range gained from one full pass through the band (mi).
    pub mileage_per_charge_mi: f32,
    /// Daily energy demand across the whole fleet (kWh).
    pub total_fleet_energy_demand_kwh: f32,
    /// Daily per-vehicle charging cost at the flat rate.
    pub total_charging_cost: f32,
    /// Daily per-vehicle charging cost with off-peak charging.
    pub reduced_charging_cost: f32,
    /// Full passes through the usable band per year.
    pub num_discharge_cycles_per_year: f32,
}

impl Report {
    /// Assembles the full fleet report.
    ///
    /// Validation runs first and short-circuits before any model is
    /// invoked; no partial report is ever returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for out-of-range fields and
    /// `NumericDegeneracy` when a derived value would be non-finite (a DOD
    /// band reaching 100% SOC, or a zero-power charge-time request).
    pub fn from_input(
        input: &FleetInput,
        tariff: &Tariff,
        charge_efficiency: f32,
    ) -> Result<Self, EngineError> {
        input.validate()?;

        let usable_capacity_kwh = input.usable_capacity_kwh();
        let daily_energy_kwh = input.daily_mileage_mi / input.efficiency_mi_per_kwh;

        let charge_time_per_ev_hr = charge_time(
            input.battery_dod[0] / 100.0,
            input.battery_dod[1] / 100.0,
            input.battery_capacity_kwh,
            input.charge_power_kw,
            charge_efficiency,
        )?;

        let total_charging_cost = cost::charge_cost(daily_energy_kwh, tariff.flat_rate);
        let reduced_charging_cost =
            cost::reduced_daily_cost(daily_energy_kwh, usable_capacity_kwh, tariff)?;
        let num_discharge_cycles_per_year =
            cost::discharge_cycles_per_year(daily_energy_kwh, usable_capacity_kwh)?;

        Ok(Self {
            input: input.clone(),
            usable_capacity_kwh,
            daily_energy_consumption_per_ev_kwh: daily_energy_kwh,
            charge_time_per_ev_hr,
            mileage_per_charge_mi: usable_capacity_kwh * input.efficiency_mi_per_kwh,
            total_fleet_energy_demand_kwh: input.num_ev as f32 * daily_energy_kwh,
            total_charging_cost,
            reduced_charging_cost,
            num_discharge_cycles_per_year,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Fleet Charging Report ---")?;
        writeln!(f, "Fleet size:              {} EVs", self.input.num_ev)?;
        writeln!(
            f,
            "Daily energy per EV:     {:.2} kWh",
            self.daily_energy_consumption_per_ev_kwh
        )?;
        writeln!(
            f,
            "Charge time per EV:      {:.2} h ({:.0}% to {:.0}%)",
            self.charge_time_per_ev_hr, self.input.battery_dod[0], self.input.battery_dod[1]
        )?;
        writeln!(
            f,
            "Mileage per charge:      {:.1} mi",
            self.mileage_per_charge_mi
        )?;
        writeln!(
            f,
            "Fleet energy demand:     {:.1} kWh/day",
            self.total_fleet_energy_demand_kwh
        )?;
        writeln!(
            f,
            "Charging cost per EV:    {:.2}/day flat, {:.2}/day off-peak",
            self.total_charging_cost, self.reduced_charging_cost
        )?;
        write!(
            f,
            "Discharge cycles:        {:.1} per year",
            self.num_discharge_cycles_per_year
        )
    }
}
