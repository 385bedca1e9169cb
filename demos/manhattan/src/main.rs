//! manhattan — command-line front end for the rust_eta trip estimator.
//!
//! Loads a street graph (a built-in Midtown grid, a CSV pair, or an OSM
//! extract with the `osm` feature), routes pickup → dropoff with A*, and
//! feeds the routed distance to a duration model.
//!
//! Run with:
//!   RUST_LOG=debug cargo run -p manhattan -- \
//!       --pickup 40.7540,-73.9905 --dropoff 40.7690,-73.9790 --hour 18 --weekday 4

mod cli;
mod network;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use eta_core::GeoPoint;
use eta_spatial::{AStarRouter, RoadNetwork, RoutePlanner, load_network_csv};
use eta_trip::{ConstantSpeedModel, TripEstimator, TripSession};

use cli::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // 1. Road network and default endpoints.
    let t0 = Instant::now();
    let (network, default_endpoints) = load_network(&cli)?;
    println!(
        "Road network: {} nodes, {} edges ({:.1?})",
        network.node_count(),
        network.edge_count(),
        t0.elapsed()
    );

    // 2. Selection, as a map UI would hold it.
    let (pickup, dropoff) = match (cli.pickup, cli.dropoff, default_endpoints) {
        (Some(p), Some(d), _) => (p, d),
        (p, d, Some((dp, dd))) => (p.unwrap_or(dp), d.unwrap_or(dd)),
        _ => anyhow::bail!("--pickup and --dropoff are required with an external graph"),
    };
    let mut session = TripSession::new();
    session.set_pickup(pickup);
    session.set_dropoff(dropoff);

    // 3. Estimate.
    let model = ConstantSpeedModel::new(cli.speed_kmh, cli.overhead_secs)?;
    let planner = RoutePlanner::new(&network, &AStarRouter, cli.routing_config());
    let estimator = TripEstimator::new(planner, &model);

    let ride = cli.ride();
    println!("Pickup:  {pickup}");
    println!("Dropoff: {dropoff}");

    let t1 = Instant::now();
    match estimator.estimate_session(&session, &ride) {
        Ok(est) => {
            println!("Route:   {} nodes, {}", est.route.nodes.len(), est.route.stats);
            println!(
                "         {:.2} km great-circle, {:.2} km along edges ({:.1?})",
                est.route.great_circle_m / 1_000.0,
                est.route.edge_length_m / 1_000.0,
                t1.elapsed()
            );
            println!("Estimate: {est}");
            if cli.print_route {
                for p in &est.route.coords {
                    println!("{:.6},{:.6}", p.lat, p.lon);
                }
            }
        }
        // A failed estimate is an answer, not a crash.
        Err(e) => {
            println!("No route or prediction available: {e}");
        }
    }

    Ok(())
}

type Endpoints = Option<(GeoPoint, GeoPoint)>;

fn load_network(cli: &Cli) -> Result<(RoadNetwork, Endpoints)> {
    #[cfg(feature = "osm")]
    {
        if let Some(path) = &cli.osm {
            let net = eta_spatial::osm::load_from_pbf(path)
                .with_context(|| format!("loading {}", path.display()))?;
            return Ok((net, None));
        }
    }

    if let (Some(nodes), Some(edges)) = (&cli.nodes, &cli.edges) {
        let loaded = load_network_csv(nodes, edges)
            .with_context(|| format!("loading {} / {}", nodes.display(), edges.display()))?;
        return Ok((loaded.network, None));
    }

    let (net, grid) = network::build_grid().context("building the built-in grid")?;
    let pickup = net.coordinates_of(grid[2][1])?;
    let dropoff = net.coordinates_of(grid[24][5])?;
    Ok((net, Some((pickup, dropoff))))
}
