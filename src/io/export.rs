//! CSV export for scenario comparisons and chart series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::engine::types::Scenario;
use crate::series::MonthPoint;

/// Column header for the scenario comparison export.
const SCENARIO_HEADER: &str = "scenario,pv_kwp,battery_kwh,heatpump_kw,electric_load_kwh,\
                               gas_load_kwh,pv_generation_kwh,self_use_kwh,grid_import_kwh,\
                               feed_in_kwh,autarky_pct,invest_eur,operating_eur,savings_eur,\
                               break_even_years,co2_today_kg,co2_after_kg";

/// Column header for the monthly series export.
const SERIES_HEADER: &str = "month,pv_kwh,consumption_kwh,self_use_kwh,grid_import_kwh,feed_in_kwh";

/// Exports the scenario comparison to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_scenarios_csv(scenarios: &[Scenario], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_scenarios_csv(scenarios, buf)
}

/// Writes the scenario comparison as CSV to any writer, one row per
/// scenario in engine order. Produces deterministic output for identical
/// inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_scenarios_csv(scenarios: &[Scenario], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(SCENARIO_HEADER.split(',').map(str::trim))?;

    for s in scenarios {
        wtr.write_record(&[
            s.kind.label().to_string(),
            format!("{:.1}", s.pv_kwp),
            format!("{:.1}", s.battery_kwh),
            format!("{:.1}", s.heatpump_power_kw),
            format!("{:.0}", s.electric_load_kwh),
            format!("{:.0}", s.gas_load_kwh),
            format!("{:.0}", s.pv_generation_kwh),
            format!("{:.0}", s.self_use_kwh),
            format!("{:.0}", s.grid_import_kwh),
            format!("{:.0}", s.feed_in_kwh),
            format!("{:.1}", s.autarky.electric_pct),
            format!("{:.0}", s.costs.total_eur),
            format!("{:.0}", s.annual_operating_cost_eur),
            format!("{:.0}", s.annual_savings_eur),
            s.break_even_years
                .map(|y| y.to_string())
                .unwrap_or_default(),
            format!("{:.0}", s.co2_today_kg),
            format!("{:.0}", s.co2_after_kg),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a monthly series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(points: &[MonthPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_series_csv(points, buf)
}

/// Writes a monthly series as CSV to any writer, one row per month.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(points: &[MonthPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(SERIES_HEADER.split(','))?;

    for p in points {
        wtr.write_record(&[
            p.month.to_string(),
            format!("{:.1}", p.pv_kwh),
            format!("{:.1}", p.consumption_kwh),
            format!("{:.1}", p.self_use_kwh),
            format!("{:.1}", p.grid_import_kwh),
            format!("{:.1}", p.feed_in_kwh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceData;
    use crate::engine::evaluate;
    use crate::params::HouseholdParameters;
    use crate::series::simulate_year;

    fn scenarios() -> Vec<Scenario> {
        evaluate(&HouseholdParameters::starter(), &ReferenceData::default())
            .unwrap()
            .scenarios
    }

    #[test]
    fn scenario_header_and_row_count() {
        let mut buf = Vec::new();
        write_scenarios_csv(&scenarios(), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 3 scenarios
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("scenario,pv_kwp,battery_kwh"));
        assert!(lines[1].starts_with("PV only,"));
    }

    #[test]
    fn unreachable_break_even_exports_as_empty_field() {
        let mut scenarios = scenarios();
        scenarios[0].break_even_years = None;
        let mut buf = Vec::new();
        write_scenarios_csv(&scenarios, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let row = output.as_deref().unwrap_or("").lines().nth(1).unwrap_or("");
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields[14], "");
    }

    #[test]
    fn scenario_rows_round_trip_through_csv_reader() {
        let mut buf = Vec::new();
        write_scenarios_csv(&scenarios(), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(17));
        let mut rows = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            // numeric columns parse as f32
            for i in 1..14 {
                let val: Result<f32, _> = rec.as_ref().unwrap()[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f32");
            }
            rows += 1;
        }
        assert_eq!(rows, 3);
    }

    #[test]
    fn series_export_has_twelve_rows() {
        let scenarios = scenarios();
        let points = simulate_year(&scenarios[1]);
        let mut buf = Vec::new();
        write_series_csv(&points, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], SERIES_HEADER);
    }

    #[test]
    fn deterministic_output() {
        let scenarios = scenarios();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_scenarios_csv(&scenarios, &mut buf1).ok();
        write_scenarios_csv(&scenarios, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }
}
