use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use gridview::cli::{CliArgs, DataSource};
use gridview::data::{csv, sample, DataFrame};
use gridview::theme::{list_available_themes, load_theme, Theme, ThemeSource};
use gridview::{EngineConfig, TabularModel};

mod runtime;
mod view;

use runtime::App;

fn load_source(source: &DataSource) -> Result<(DataFrame, Option<PathBuf>)> {
    match source {
        DataSource::File(path) => {
            let model = csv::load_file(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok((model, Some(path.clone())))
        }
        DataSource::Sample { rows, cols, seed } => Ok((sample::generate(*rows, *cols, *seed), None)),
        DataSource::Empty { rows, cols } => Ok((DataFrame::empty(*rows, *cols), None)),
    }
}

fn print_themes() {
    for theme in list_available_themes() {
        let origin = match theme.source {
            ThemeSource::User => " (user)",
            ThemeSource::Builtin => "",
        };
        println!("{:<20} {}{}", theme.id, theme.name, origin);
    }
}

fn main() -> Result<()> {
    gridview::tracing::init();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(|e| anyhow::anyhow!(e))?;

    if startup.list_themes {
        print_themes();
        return Ok(());
    }

    let mut config = EngineConfig::load();
    startup.apply_to(&mut config);

    let theme = load_theme(&config.theme).unwrap_or_else(|e| {
        tracing::warn!("Theme '{}' unavailable ({}), using default", config.theme, e);
        Theme::default()
    });

    let (model, path) = load_source(&startup.source)?;
    tracing::info!(
        "Starting with {} rows × {} columns",
        model.row_count(),
        model.column_count()
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(model, path, config, theme);
    event_loop.run_app(&mut app)?;
    Ok(())
}
