//! Converts a street-graph extract into a road network mesh asset.

#[macro_use]
extern crate log;

use anyhow::{bail, Result};
use structopt::StructOpt;

use abstutil::Timer;
use geom::{Distance, Earcut, GeoUnion, HaversineProjection};
use road_mesh::Options;

#[derive(StructOpt)]
#[structopt(name = "road_mesh", about = "Builds a road network mesh from a street graph")]
struct Flags {
    /// Overpass JSON file to read
    #[structopt(long)]
    input: String,
    /// Where to write the text asset
    #[structopt(long)]
    output: String,
    /// JSON file with `Options`. Flags below override it.
    #[structopt(long)]
    options: Option<String>,
    /// Width of a two-way road, in meters
    #[structopt(long)]
    width: Option<f64>,
    /// One-way roads are this fraction of the two-way width
    #[structopt(long = "one_way_ratio")]
    one_way_ratio: Option<f64>,
    /// Also dump the network surface as GeoJSON here, for debugging
    #[structopt(long)]
    geojson: Option<String>,
    /// Fail instead of keeping the largest piece when the network falls apart
    #[structopt(long = "fail_on_disconnected")]
    fail_on_disconnected: bool,
}

impl Flags {
    fn options(&self) -> Result<Options> {
        let mut opts = match self.options {
            Some(ref path) => Options::load(path)?,
            None => Options::default(),
        };
        if let Some(width) = self.width {
            if !width.is_finite() {
                bail!("--width must be a number of meters, not {}", width);
            }
            opts.two_way_width = Distance::meters(width);
        }
        if let Some(ratio) = self.one_way_ratio {
            opts.one_way_ratio = ratio;
        }
        opts.validate()?;
        Ok(opts)
    }
}

fn main() -> Result<()> {
    abstutil::logger::setup();
    let flags = Flags::from_args();
    let opts = flags.options()?;

    let mut timer = Timer::new(format!("convert {}", flags.input));
    let doc = convert_osm::read(&flags.input, &mut timer)?;
    let result = road_mesh::convert(
        &doc,
        &opts,
        &HaversineProjection,
        &GeoUnion,
        &Earcut,
        &mut timer,
    )?;
    let report = &result.report;
    info!(
        "Composed {} road polygons ({} invalid) into {} pieces",
        report.input_polygons, report.discarded_invalid, report.components
    );
    if report.is_disconnected() && flags.fail_on_disconnected {
        bail!(
            "Network is disconnected: {} pieces, {:.1} m^2 dropped",
            report.components,
            report.discarded_area
        );
    }

    if let Some(ref path) = flags.geojson {
        fs_err::write(path, serde_json::to_string_pretty(&result.surface.to_geojson())?)?;
        info!("Wrote {}", path);
    }

    result.asset.write(&flags.output)?;
    timer.done();
    Ok(())
}
