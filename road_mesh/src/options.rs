use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use geom::{Distance, EPSILON_DIST, MIN_CAP_RESOLUTION};

/// Tunes how roads get thickened and merged. Every field is optional in the JSON form; missing
/// ones take the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Full width of a two-way road
    pub two_way_width: Distance,
    /// One-way roads are this fraction of `two_way_width`
    pub one_way_ratio: f64,
    /// Steps over the half circle of each round end cap. Never fewer than `MIN_CAP_RESOLUTION`.
    pub cap_resolution: usize,
    /// Road endpoints closer than this are the same place
    pub merge_epsilon: Distance,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            two_way_width: Distance::meters(6.0),
            one_way_ratio: 0.6,
            cap_resolution: 16,
            merge_epsilon: EPSILON_DIST,
        }
    }
}

impl Options {
    pub fn load(path: &str) -> Result<Options> {
        let raw = fs_err::read_to_string(path)?;
        let opts: Options =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.two_way_width <= Distance::ZERO {
            bail!("two_way_width must be positive, not {}", self.two_way_width);
        }
        if !(self.one_way_ratio > 0.0 && self.one_way_ratio <= 1.0) {
            bail!("one_way_ratio must be in (0, 1], not {}", self.one_way_ratio);
        }
        if self.merge_epsilon < Distance::ZERO {
            bail!("merge_epsilon can't be negative");
        }
        if self.cap_resolution < MIN_CAP_RESOLUTION {
            warn!(
                "cap_resolution {} is too coarse, using {}",
                self.cap_resolution, MIN_CAP_RESOLUTION
            );
        }
        Ok(())
    }

    pub fn width(&self, oneway: bool) -> Distance {
        if oneway {
            self.two_way_width * self.one_way_ratio
        } else {
            self.two_way_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let opts: Options = serde_json::from_str(r#"{"two_way_width": 10.0}"#).unwrap();
        assert_eq!(opts.two_way_width, Distance::meters(10.0));
        assert_eq!(opts.cap_resolution, 16);
        assert_eq!(opts.width(true), Distance::meters(6.0));
        assert_eq!(opts.width(false), Distance::meters(10.0));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn bad_values() {
        let mut opts = Options::default();
        opts.one_way_ratio = 0.0;
        assert!(opts.validate().is_err());

        let mut opts = Options::default();
        opts.two_way_width = Distance::ZERO;
        assert!(opts.validate().is_err());

        let mut opts = Options::default();
        opts.merge_epsilon = Distance::meters(-0.1);
        assert!(opts.validate().is_err());
        // Exact matching is allowed
        opts.merge_epsilon = Distance::ZERO;
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join("road_mesh_options_test.json");
        fs_err::write(&path, r#"{"one_way_ratio": 0.5, "cap_resolution": 32}"#).unwrap();
        let opts = Options::load(path.to_str().unwrap()).unwrap();
        assert_eq!(opts.one_way_ratio, 0.5);
        assert_eq!(opts.cap_resolution, 32);
        assert_eq!(opts.two_way_width, Distance::meters(6.0));
        fs_err::remove_file(&path).unwrap();
    }
}
