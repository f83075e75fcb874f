//! Plain-text travel summary

use std::fmt::{Display, Write};

use crate::aggregate::TravelStats;
use crate::measure::Kilometers;
use crate::route::{LegKind, Route};

/// Render a summary of `stats`, with distances shown in unit `T`.
pub fn travel_report<T>(stats: &TravelStats) -> Result<String, std::fmt::Error>
where
    T: From<Kilometers<f64>> + Display,
{
    let mut r = String::new();
    writeln!(
        &mut r,
        "Trips: {} ({} on the map, {} completed)",
        stats.total_trips, stats.geo_trips, stats.completed_trips
    )?;
    writeln!(&mut r, "Unique destinations: {}", stats.unique_destinations)?;
    writeln!(
        &mut r,
        "Traveled: {}",
        T::from(stats.traveled_route.total_distance)
    )?;
    writeln!(
        &mut r,
        "Planned: {}",
        T::from(stats.planned_route.total_distance)
    )?;
    write_legs::<T>(&mut r, &stats.planned_route)?;
    Ok(r)
}

fn write_legs<T>(r: &mut String, route: &Route) -> std::fmt::Result
where
    T: From<Kilometers<f64>> + Display,
{
    if route.is_empty() {
        return Ok(());
    }
    writeln!(r, "\nPlanned route:")?;
    for (i, leg) in route.legs.iter().enumerate() {
        let mode = leg.mode.map(|m| m.to_string()).unwrap_or_default();
        writeln!(
            r,
            "{:>3}. {:<10} {:<6} ({:.4}, {:.4}) -> ({:.4}, {:.4})  {}",
            i + 1,
            leg.kind,
            mode,
            leg.from.lat().0,
            leg.from.lon().0,
            leg.to.lat().0,
            leg.to.lon().0,
            T::from(leg.distance)
        )?;
    }
    let returns = route
        .legs
        .iter()
        .filter(|l| l.kind == LegKind::Return)
        .count();
    writeln!(r, "     {} return(s) home", returns)?;
    Ok(())
}
