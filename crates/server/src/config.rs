use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use bus_tracker_transit::TrackerConfig;
use bus_tracker_transit::spatial::DEFAULT_AVERAGE_SPEED_KMPH;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bus-tracker-server",
    version,
    about = "Live bus tracking API for drivers, riders and the admin console"
)]
pub struct Args {
    /// Port to listen on
    #[arg(long, env = "BUS_TRACKER_PORT", default_value_t = 4000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "BUS_TRACKER_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// JSON file with stops, routes, buses and drivers.
    /// The built-in six-stop network is used when omitted.
    #[arg(long, env = "BUS_TRACKER_SEED")]
    pub seed: Option<PathBuf>,

    /// Assumed average bus speed for ETAs, in km/h
    #[arg(
        long,
        env = "BUS_TRACKER_AVERAGE_SPEED_KMPH",
        default_value_t = DEFAULT_AVERAGE_SPEED_KMPH
    )]
    pub average_speed_kmph: f64,
}

impl Args {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn tracker_config(&self) -> eyre::Result<TrackerConfig> {
        eyre::ensure!(
            self.average_speed_kmph.is_finite() && self.average_speed_kmph > 0.0,
            "average speed must be a positive number of km/h, got {}",
            self.average_speed_kmph
        );

        Ok(TrackerConfig {
            average_speed_kmph: self.average_speed_kmph,
        })
    }
}
