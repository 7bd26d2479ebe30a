use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Registry, fmt, reload};

use karnaugh_editor::color::{ColorCycle, Rgb};
use karnaugh_editor::config::EditorConfig;
use karnaugh_editor::export::export_png;
use karnaugh_editor::map::{CellValue, Group, KarnaughMap};
use karnaugh_editor::persistence::{load_map, save_map};

#[derive(Parser)]
#[command(name = "karnaugh", version, about = "Create, edit and export Karnaugh maps")]
struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create an empty map file
    New {
        file: PathBuf,
        /// Number of variables (1-6); defaults to the configured count
        #[arg(long)]
        vars: Option<usize>,
        /// Comma-separated variable names
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the grid, its groups and the function it describes
    Show { file: PathBuf },
    /// Set the output of one cell
    Set {
        file: PathBuf,
        col: usize,
        row: usize,
        /// 0, 1 or - (don't care)
        value: CellValue,
    },
    /// Advance a cell through 0 -> 1 -> don't care -> 0
    Toggle { file: PathBuf, col: usize, row: usize },
    /// Change the number of variables, keeping values whose inputs survive
    Vars {
        file: PathBuf,
        count: usize,
        /// Comma-separated variable names; existing names are kept otherwise
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,
    },
    /// Edit groups
    Group {
        file: PathBuf,
        #[command(subcommand)]
        action: GroupCmd,
    },
    /// Render the map to a PNG image
    Export {
        file: PathBuf,
        output: PathBuf,
        #[arg(long)]
        cell_size: Option<u32>,
        #[arg(long)]
        border: Option<u32>,
        /// Background color such as #ffffff; transparent by default
        #[arg(long, value_parser = parse_color)]
        background: Option<Rgb>,
        /// TrueType font for labels and values
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum GroupCmd {
    /// Add a group walking from the start cell to the end cell, wrapping past
    /// the grid edge when end < start
    Add {
        start_col: usize,
        start_row: usize,
        end_col: usize,
        end_row: usize,
        /// Defaults to the next palette color
        #[arg(long, value_parser = parse_color)]
        color: Option<Rgb>,
    },
    /// Remove the topmost group covering a cell
    Remove { col: usize, row: usize },
    /// Remove every group
    Clear,
    /// Change the color of a group by index
    Recolor {
        index: usize,
        #[arg(value_parser = parse_color)]
        color: Rgb,
    },
}

fn parse_color(input: &str) -> Result<Rgb, String> {
    Rgb::parse(input).ok_or_else(|| format!("invalid color '{input}' (expected #rgb or #rrggbb)"))
}

/// Level named by `LOG_LEVEL` or the config file; unknown names mean info
fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

type LevelHandle = reload::Handle<LevelFilter, Registry>;

/// Install the subscriber before anything logs. Without `LOG_LEVEL` it starts
/// at info and is switched to the config's level once that is loaded.
fn init_tracing(env_level: Option<&str>) -> Result<LevelHandle> {
    let (filter, handle) = reload::Layer::new(parse_level(env_level.unwrap_or("info")));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    Ok(handle)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // LOG_LEVEL from the environment wins over the config file
    let env_level = std::env::var("LOG_LEVEL").ok();
    let level_handle = init_tracing(env_level.as_deref())?;

    let config = match &cli.config {
        Some(path) => EditorConfig::load_from(path)?,
        None => EditorConfig::load()?,
    };
    if env_level.is_none() {
        level_handle
            .reload(parse_level(&config.log_level))
            .context("Failed to apply configured log level")?;
    }

    match cli.command {
        Cmd::New {
            file,
            vars,
            names,
            force,
        } => {
            if file.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", file.display());
            }
            let count = vars.unwrap_or(config.variable_count);
            let names = if names.is_empty() {
                config.names_for(count)
            } else {
                names
            };
            let map = KarnaughMap::new(count, &names)?;
            save_map(&map, &file)?;
        }
        Cmd::Show { file } => {
            let map = load_map(&file)?;
            print!("{}", describe(&map));
        }
        Cmd::Set {
            file,
            col,
            row,
            value,
        } => edit(&file, |map| Ok(map.set_output_at(col, row, value)?))?,
        Cmd::Toggle { file, col, row } => edit(&file, |map| {
            let value = map.toggle_output_at(col, row)?;
            println!("({col}, {row}) = {value}");
            Ok(())
        })?,
        Cmd::Vars { file, count, names } => edit(&file, |map| {
            let names = if names.is_empty() {
                carried_names(map.variables(), &config.variable_names, count)
            } else {
                names
            };
            Ok(map.change_variables(count, &names)?)
        })?,
        Cmd::Group { file, action } => edit(&file, |map| run_group(map, action, &config))?,
        Cmd::Export {
            file,
            output,
            cell_size,
            border,
            background,
            font,
        } => {
            let map = load_map(&file)?;
            let mut settings = config.export.clone();
            if let Some(cell_size) = cell_size {
                settings.cell_size = cell_size;
            }
            if let Some(border) = border {
                settings.border_width = border;
            }
            if background.is_some() {
                settings.background = background;
            }
            if font.is_some() {
                settings.font_path = font;
            }
            // Command-line overrides go through the same clamping as the file
            settings.validate_and_clamp();
            export_png(&map, &settings, &output)?;
        }
    }
    Ok(())
}

/// Load a map, apply `change`, and save it back only if the change succeeded
fn edit(file: &Path, change: impl FnOnce(&mut KarnaughMap) -> Result<()>) -> Result<()> {
    let mut map = load_map(file)?;
    change(&mut map)?;
    save_map(&map, file)
}

fn run_group(map: &mut KarnaughMap, action: GroupCmd, config: &EditorConfig) -> Result<()> {
    match action {
        GroupCmd::Add {
            start_col,
            start_row,
            end_col,
            end_row,
            color,
        } => {
            let color = color.unwrap_or_else(|| palette_color(config, map.groups().len()));
            let group = Group::new(
                (start_col, start_row).into(),
                (end_col, end_row).into(),
                color,
            );
            let index = map.add_group(group)?;
            println!("added group {index} ({color})");
        }
        GroupCmd::Remove { col, row } => {
            let group = map.remove_group_at(col, row)?;
            println!("removed group {}..{} ({})", group.start(), group.end(), group.color());
        }
        GroupCmd::Clear => map.clear_groups(),
        GroupCmd::Recolor { index, color } => map.recolor_group(index, color)?,
    }
    Ok(())
}

/// Color the `n`th group of a session would get
fn palette_color(config: &EditorConfig, n: usize) -> Rgb {
    match n.checked_sub(1) {
        None => config.initial_group_color,
        Some(step) => ColorCycle::new()
            .nth(step)
            .unwrap_or(config.initial_group_color),
    }
}

/// Current names, then configured defaults for positions the map never had
fn carried_names(current: &[String], configured: &[String], count: usize) -> Vec<String> {
    (0..count)
        .filter_map(|i| current.get(i).or_else(|| configured.get(i)).cloned())
        .collect()
}

/// Grid with gray-code headers, the group list and the function in
/// sum-of-minterms form
fn describe(map: &KarnaughMap) -> String {
    let (width, height) = map.grid_size();
    let corner = format!("{}\\{}", map.row_variables().concat(), map.column_variables().concat());
    let col_width = map.column_label(0).len().max(1) + 2;
    let row_width = corner.len().max(map.row_label(0).len());

    let mut out = String::new();
    let _ = write!(out, "{corner:>row_width$}");
    for col in 0..width {
        let _ = write!(out, "{:>col_width$}", map.column_label(col));
    }
    out.push('\n');

    for row in 0..height {
        let _ = write!(out, "{:>row_width$}", map.row_label(row));
        for col in 0..width {
            let value = map.cell_value(col, row).unwrap_or_default();
            let _ = write!(out, "{value:>col_width$}");
        }
        out.push('\n');
    }

    let shape = map.shape();
    if !map.groups().is_empty() {
        out.push_str("\ngroups:\n");
        for (index, group) in map.groups().iter().enumerate() {
            let _ = writeln!(
                out,
                "  {index}: {}..{}  {}x{}  {}",
                group.start(),
                group.end(),
                group.width(shape),
                group.height(shape),
                group.color()
            );
        }
    }

    let list = |value: CellValue| {
        map.cells()
            .minterms(value)
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = write!(out, "\nF({}) = Σm({})", map.variables().join(", "), list(CellValue::One));
    let dont_cares = list(CellValue::DontCare);
    if !dont_cares.is_empty() {
        let _ = write!(out, " + d({dont_cares})");
    }
    out.push('\n');

    info!(variables = map.variable_count(), "Described map");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_two_variables() {
        let mut map = KarnaughMap::with_variable_count(2).unwrap();
        map.set_output_at(1, 0, CellValue::One).unwrap();
        map.set_output_at(0, 1, CellValue::DontCare).unwrap();
        map.add_group(Group::new((1, 0).into(), (1, 1).into(), Rgb::new(255, 0, 0)))
            .unwrap();

        let text = describe(&map);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A\\B  0  1");
        assert_eq!(lines[1], "  0  0  1");
        assert_eq!(lines[2], "  1  -  0");
        assert!(text.contains("  0: (1, 0)..(1, 1)  1x2  #ff0000"));
        assert!(text.ends_with("F(A, B) = Σm(1) + d(2)\n"));
    }

    #[test]
    fn test_describe_without_dont_cares() {
        let map = KarnaughMap::with_variable_count(1).unwrap();
        let text = describe(&map);
        assert!(text.starts_with("\\A  0  1\n"));
        assert!(text.ends_with("F(A) = Σm()\n"));
        assert!(!text.contains("groups"));
    }

    #[test]
    fn test_carried_names() {
        let current = vec!["P".to_string(), "Q".to_string()];
        let configured: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        assert_eq!(carried_names(&current, &configured, 4), vec!["P", "Q", "C", "D"]);
        assert_eq!(carried_names(&current, &configured, 1), vec!["P"]);
    }

    #[test]
    fn test_palette_color_starts_with_configured_color() {
        let config = EditorConfig::default();
        assert_eq!(palette_color(&config, 0), config.initial_group_color);
        assert_eq!(palette_color(&config, 1), ColorCycle::new().next().unwrap());
        assert_ne!(palette_color(&config, 1), palette_color(&config, 2));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_level("verbose"), LevelFilter::INFO);
    }
}
