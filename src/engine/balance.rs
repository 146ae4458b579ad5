//! Annual energy balance estimation.
//!
//! This is the aggregate model: a fixed direct-use share plus a
//! one-cycle-per-day battery contribution. The monthly/hourly simulators in
//! [`crate::series`] use a deliberately simpler flat self-use share for
//! shaped curves; the two models are not meant to agree exactly.

/// Fraction of annual load assumed matched to simultaneous generation when
/// a battery shifts the load profile.
const DIRECT_SHARE_WITH_BATTERY: f32 = 0.45;
/// Direct-use fraction without storage.
const DIRECT_SHARE_WITHOUT_BATTERY: f32 = 0.35;
/// Direct use never exceeds this share of generation (curtailment and
/// profile mismatch).
const DIRECT_USE_GENERATION_CAP: f32 = 0.9;
/// Usable depth of discharge of the battery.
const BATTERY_USABLE_DOD: f32 = 0.7;
/// Battery round-trip efficiency.
const BATTERY_ROUNDTRIP_EFFICIENCY: f32 = 0.85;
/// At most this share of the EV charge is assumed servable from storage.
const EV_FROM_BATTERY_EV_SHARE: f32 = 0.5;
/// At most this share of delivered battery energy goes to the EV.
const EV_FROM_BATTERY_DELIVERY_SHARE: f32 = 0.4;

/// Annual energy balance for one PV/battery/load combination.
///
/// Pure function output with no identity; all values in kWh per year except
/// the autarky percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    /// Annual PV generation.
    pub pv_generation_kwh: f32,
    /// Generation consumed at the moment of production.
    pub direct_self_use_kwh: f32,
    /// Generation consumed via the battery, after round-trip losses.
    pub battery_delivered_kwh: f32,
    /// Total on-site consumption (direct + battery).
    pub self_use_kwh: f32,
    /// Load not covered on-site.
    pub grid_import_kwh: f32,
    /// Generation exported to the grid.
    pub feed_in_kwh: f32,
    /// Share of load covered on-site, 0 to 100.
    pub autarky_pct: f32,
    /// Diagnostic: EV charge assumed covered from the battery. Not fed back
    /// into the balance.
    pub ev_from_battery_kwh: f32,
}

/// Estimates the annual balance between PV generation, battery storage, and
/// household load.
///
/// Negative capacities are treated as zero; otherwise the function is pure
/// arithmetic with no failure modes.
///
/// # Arguments
///
/// * `pv_kwp` - Installed PV capacity (kWp)
/// * `battery_kwh` - Battery capacity (kWh), 0 for none
/// * `annual_load_kwh` - Total annual electric load (kWh)
/// * `pv_yield_per_kwp` - Specific annual yield (kWh per kWp)
/// * `has_ev` - Whether a wallbox EV is part of the load
/// * `ev_load_kwh` - Annual EV charging load contained in `annual_load_kwh`
pub fn estimate_balance(
    pv_kwp: f32,
    battery_kwh: f32,
    annual_load_kwh: f32,
    pv_yield_per_kwp: f32,
    has_ev: bool,
    ev_load_kwh: f32,
) -> EnergyBalance {
    let battery_kwh = battery_kwh.max(0.0);
    let annual_load_kwh = annual_load_kwh.max(0.0);
    let pv_generation = pv_kwp.max(0.0) * pv_yield_per_kwp;

    let direct_share = if battery_kwh > 0.0 {
        DIRECT_SHARE_WITH_BATTERY
    } else {
        DIRECT_SHARE_WITHOUT_BATTERY
    };
    let direct_self_use =
        (annual_load_kwh * direct_share).min(pv_generation * DIRECT_USE_GENERATION_CAP);
    let pv_surplus = (pv_generation - direct_self_use).max(0.0);

    // One full charge/discharge cycle per day caps the battery contribution
    // even when the surplus is larger.
    let battery_delivered = if battery_kwh > 0.0 {
        let annual_usable = battery_kwh * BATTERY_USABLE_DOD * 365.0;
        pv_surplus.min(annual_usable) * BATTERY_ROUNDTRIP_EFFICIENCY
    } else {
        0.0
    };

    let self_use = annual_load_kwh.min(direct_self_use + battery_delivered);
    let feed_in = (pv_generation - self_use).max(0.0);
    let grid_import = (annual_load_kwh - self_use).max(0.0);

    let ev_from_battery = if has_ev && battery_kwh > 0.0 {
        (ev_load_kwh * EV_FROM_BATTERY_EV_SHARE)
            .min(battery_delivered * EV_FROM_BATTERY_DELIVERY_SHARE)
    } else {
        0.0
    };

    let autarky_pct = if annual_load_kwh > 0.0 {
        self_use / annual_load_kwh * 100.0
    } else {
        0.0
    };

    EnergyBalance {
        pv_generation_kwh: pv_generation,
        direct_self_use_kwh: direct_self_use,
        battery_delivered_kwh: battery_delivered,
        self_use_kwh: self_use,
        grid_import_kwh: grid_import,
        feed_in_kwh: feed_in,
        autarky_pct,
        ev_from_battery_kwh: ev_from_battery,
    }
}
