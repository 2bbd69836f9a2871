//! Command-line argument parsing for the viewer
//!
//! Supports:
//! - Opening a CSV/TSV file
//! - Generating a random sample dataset
//! - Starting with an empty grid of a given size
//! - Overriding display settings from the config file

use clap::Parser;
use std::path::PathBuf;

use crate::config::EngineConfig;

/// A spreadsheet-style grid viewer
#[derive(Parser, Debug)]
#[command(name = "gridview", version, about = "A spreadsheet-style grid viewer")]
pub struct CliArgs {
    /// CSV or TSV file to open
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Generate a random dataset of ROWS × COLS
    #[arg(long, num_args = 2, value_names = ["ROWS", "COLS"], conflicts_with = "path")]
    pub sample: Option<Vec<usize>>,

    /// Start with an empty dataset of ROWS × COLS
    #[arg(long, num_args = 2, value_names = ["ROWS", "COLS"], conflicts_with_all = ["path", "sample"])]
    pub empty: Option<Vec<usize>>,

    /// Seed for --sample
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Significant digits for floats below 1, decimals otherwise
    #[arg(long, value_name = "N")]
    pub precision: Option<usize>,

    /// Theme id (e.g. default-dark, default-light)
    #[arg(long, value_name = "ID")]
    pub theme: Option<String>,

    /// TTF/OTF font used for cell text
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Print the available theme ids and exit
    #[arg(long, conflicts_with_all = ["path", "sample", "empty"])]
    pub list_themes: bool,
}

/// Where the initial dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Sample { rows: usize, cols: usize, seed: u64 },
    Empty { rows: usize, cols: usize },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub source: DataSource,
    pub precision: Option<usize>,
    pub theme: Option<String>,
    pub font: Option<PathBuf>,
    pub list_themes: bool,
}

/// Grid shown when nothing is requested
const DEFAULT_EMPTY: (usize, usize) = (20, 8);

fn dimensions(values: &[usize], flag: &str) -> Result<(usize, usize), String> {
    match values {
        [rows, cols] => Ok((*rows, *cols)),
        _ => Err(format!("--{} expects ROWS and COLS", flag)),
    }
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let source = if let Some(path) = self.path {
            DataSource::File(path)
        } else if let Some(values) = &self.sample {
            let (rows, cols) = dimensions(values, "sample")?;
            DataSource::Sample {
                rows,
                cols,
                seed: self.seed,
            }
        } else if let Some(values) = &self.empty {
            let (rows, cols) = dimensions(values, "empty")?;
            DataSource::Empty { rows, cols }
        } else {
            DataSource::Empty {
                rows: DEFAULT_EMPTY.0,
                cols: DEFAULT_EMPTY.1,
            }
        };

        Ok(StartupConfig {
            source,
            precision: self.precision,
            theme: self.theme,
            font: self.font,
            list_themes: self.list_themes,
        })
    }
}

impl StartupConfig {
    /// Layer the command-line overrides on top of the loaded config
    pub fn apply_to(&self, config: &mut EngineConfig) {
        if let Some(precision) = self.precision {
            config.float_precision = precision;
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.to_string_lossy().into_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<StartupConfig, String> {
        let args = CliArgs::try_parse_from(std::iter::once("gridview").chain(args.iter().copied()))
            .map_err(|e| e.to_string())?;
        args.into_config()
    }

    #[test]
    fn test_no_args_gives_default_empty_grid() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.source, DataSource::Empty { rows: 20, cols: 8 });
    }

    #[test]
    fn test_path_opens_file() {
        let config = parse(&["data.csv"]).unwrap();
        assert_eq!(config.source, DataSource::File(PathBuf::from("data.csv")));
    }

    #[test]
    fn test_sample_with_seed() {
        let config = parse(&["--sample", "1000", "12", "--seed", "7"]).unwrap();
        assert_eq!(
            config.source,
            DataSource::Sample {
                rows: 1000,
                cols: 12,
                seed: 7
            }
        );
    }

    #[test]
    fn test_empty_dimensions() {
        let config = parse(&["--empty", "5", "3"]).unwrap();
        assert_eq!(config.source, DataSource::Empty { rows: 5, cols: 3 });
    }

    #[test]
    fn test_sample_conflicts_with_path() {
        assert!(parse(&["data.csv", "--sample", "5", "5"]).is_err());
    }

    #[test]
    fn test_list_themes_flag() {
        assert!(parse(&["--list-themes"]).unwrap().list_themes);
        assert!(!parse(&[]).unwrap().list_themes);
        assert!(parse(&["data.csv", "--list-themes"]).is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let config = parse(&["--precision", "5", "--theme", "default-light"]).unwrap();
        let mut engine = EngineConfig::default();
        config.apply_to(&mut engine);
        assert_eq!(engine.float_precision, 5);
        assert_eq!(engine.theme, "default-light");
        assert_eq!(engine.font_path, None);
    }
}
