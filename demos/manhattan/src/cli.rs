use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use eta_core::GeoPoint;
use eta_spatial::{DistanceMetric, RoutingConfig, SnapStrategy};
use eta_trip::RideInfo;

#[derive(Parser)]
#[command(version, about = "Route a taxi trip over a street graph and estimate its duration", long_about = None)]
pub struct Cli {
    /// Pickup point as "lat,lon".  Defaults to a corner of the built-in grid.
    #[arg(long, value_name = "lat,lon")]
    pub pickup: Option<GeoPoint>,

    /// Dropoff point as "lat,lon".  Defaults to a corner of the built-in grid.
    #[arg(long, value_name = "lat,lon")]
    pub dropoff: Option<GeoPoint>,

    #[arg(long, default_value_t = 1)]
    pub passengers: u8,

    #[arg(long, default_value_t = 1)]
    pub vendor: u8,

    /// Pickup hour, 0-23
    #[arg(long, default_value_t = 9)]
    pub hour: u8,

    /// Pickup weekday, 0 = Monday .. 6 = Sunday
    #[arg(long, default_value_t = 0)]
    pub weekday: u8,

    /// nodes.csv (id,lat,lon); requires --edges
    #[arg(long, requires = "edges")]
    pub nodes: Option<PathBuf>,

    /// edges.csv (from,to,length_m[,oneway]); requires --nodes
    #[arg(long, requires = "nodes")]
    pub edges: Option<PathBuf>,

    /// OSM PBF extract to load the drive network from
    #[cfg(feature = "osm")]
    #[arg(long, conflicts_with = "nodes")]
    pub osm: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Metric::GreatCircle)]
    pub metric: Metric,

    #[arg(long, value_enum, default_value_t = Snap::Indexed)]
    pub snap: Snap,

    /// Abort the route search after this many milliseconds
    #[arg(long, value_name = "ms")]
    pub timeout_ms: Option<u64>,

    /// Average speed of the fallback duration model
    #[arg(long, default_value_t = 18.0)]
    pub speed_kmh: f64,

    /// Fixed per-trip overhead of the fallback duration model
    #[arg(long, default_value_t = 120.0)]
    pub overhead_secs: f64,

    /// Print the route polyline, one "lat,lon" per line
    #[arg(long)]
    pub print_route: bool,
}

#[derive(Copy, Clone, ValueEnum)]
pub enum Metric {
    GreatCircle,
    EdgeLength,
}

#[derive(Copy, Clone, ValueEnum)]
pub enum Snap {
    Indexed,
    Linear,
}

impl Cli {
    pub fn routing_config(&self) -> RoutingConfig {
        RoutingConfig {
            snap: match self.snap {
                Snap::Indexed => SnapStrategy::Indexed,
                Snap::Linear => SnapStrategy::Linear,
            },
            metric: match self.metric {
                Metric::GreatCircle => DistanceMetric::GreatCircle,
                Metric::EdgeLength => DistanceMetric::EdgeLength,
            },
            timeout_ms: self.timeout_ms,
            ..RoutingConfig::default()
        }
    }

    /// Ride attributes; range errors surface later from the estimator.
    pub fn ride(&self) -> RideInfo {
        RideInfo {
            passenger_count: self.passengers,
            vendor_id:       self.vendor,
            hour_of_day:     self.hour,
            day_of_week:     self.weekday,
        }
    }
}
