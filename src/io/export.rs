//! CSV and JSON export of calculation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::accounting::MonthlyEnergy;
use crate::calc::CalcResults;
use crate::finance::CashFlowYear;
use crate::sim::types::SeasonalProfile;

const DISPATCH_HEADER: &str = "season,hour,load_kw,solar_kw,charge_kw,discharge_kw,\
                               diesel_kw,curtailed_kw,unserved_kw,soc_pct";

const MONTHLY_HEADER: &str = "month,name,peak_sun_hours,solar_kwh,diesel_kwh,load_kwh,\
                              fuel_litres,fuel_cost,renewable_fraction";

const CASHFLOW_HEADER: &str = "year,hybrid_nominal,diesel_nominal,hybrid_discounted,\
                               diesel_discounted,hybrid_cumulative,diesel_cumulative,\
                               cumulative_savings,battery_replacement";

fn header(columns: &str) -> impl Iterator<Item = &str> {
    columns.split(',').map(str::trim)
}

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

/// Writes the four seasonal dispatch days as one CSV table (96 rows).
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_dispatch_csv(seasons: &[SeasonalProfile], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(DISPATCH_HEADER))?;
    for profile in seasons {
        for h in &profile.hours {
            wtr.write_record(&[
                profile.season.name().to_string(),
                h.hour.to_string(),
                format!("{:.3}", h.load_kw),
                format!("{:.3}", h.solar_kw),
                format!("{:.3}", h.charge_kw),
                format!("{:.3}", h.discharge_kw),
                format!("{:.3}", h.diesel_kw),
                format!("{:.3}", h.curtailed_kw),
                format!("{:.3}", h.unserved_kw),
                format!("{:.2}", h.soc_pct),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the 12-row monthly energy table.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(monthly: &[MonthlyEnergy], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(MONTHLY_HEADER))?;
    for m in monthly {
        wtr.write_record(&[
            m.month.to_string(),
            m.name.to_string(),
            format!("{:.2}", m.peak_sun_hours),
            format!("{:.1}", m.solar_kwh),
            format!("{:.1}", m.diesel_kwh),
            format!("{:.1}", m.load_kwh),
            format!("{:.1}", m.fuel_litres),
            format!("{:.2}", m.fuel_cost),
            format!("{:.4}", m.renewable_fraction),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the cash-flow table, year 0 first.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cashflow_csv(cash_flows: &[CashFlowYear], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(CASHFLOW_HEADER))?;
    for y in cash_flows {
        wtr.write_record(&[
            y.year.to_string(),
            format!("{:.2}", y.hybrid_nominal),
            format!("{:.2}", y.diesel_nominal),
            format!("{:.2}", y.hybrid_discounted),
            format!("{:.2}", y.diesel_discounted),
            format!("{:.2}", y.hybrid_cumulative),
            format!("{:.2}", y.diesel_cumulative),
            format!("{:.2}", y.cumulative_savings),
            y.battery_replacement.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the full results as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json(results: &CalcResults, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, results)?;
    writeln!(writer)?;
    writer.flush()
}

/// Exports the dispatch table to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_dispatch_csv(seasons: &[SeasonalProfile], path: &Path) -> io::Result<()> {
    write_dispatch_csv(seasons, create(path)?)
}

/// Exports the monthly table to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(monthly: &[MonthlyEnergy], path: &Path) -> io::Result<()> {
    write_monthly_csv(monthly, create(path)?)
}

/// Exports the cash-flow table to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cashflow_csv(cash_flows: &[CashFlowYear], path: &Path) -> io::Result<()> {
    write_cashflow_csv(cash_flows, create(path)?)
}

/// Exports the full results as JSON to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_json(results: &CalcResults, path: &Path) -> io::Result<()> {
    write_json(results, create(path)?)
}
