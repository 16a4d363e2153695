//! # Fabricalc CLI
//!
//! Terminal front end for the textile QC calculators. One subcommand per
//! tool, a JSON `eval` entry point and the theme preference.
//!
//! ```text
//! fabric gsm --length 25 --width 25 --weight 31.3
//! fabric shrinkage --length 70 66.1 --width 140 133 --weight 120
//! fabric blend --mode weight --row body=420:100 --row fancy1=30:0
//! echo '{"tool":"Dilution","stock_concentration":"100","target_concentration":"10","target_volume":"1000"}' | fabric eval
//! fabric --json convert force 1 kgf N
//! ```

mod report;

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fabric_core::calculations::blend::{BlendInput, BlendMode, RowData};
use fabric_core::calculations::{
    ConversionInput, DilutionInput, Fiber, FiberInput, GsmInput, LintLossInput, MeasurementPair, PieceWeightInput,
    Ply, ShrinkageInput, SolutionInput, YarnCountInput,
};
use fabric_core::file_io::{default_preferences_path, load_or_default, preferences_path_in, save_preferences};
use fabric_core::units::{Category, LinearUnit, SampleUnit, VolumeUnit};
use fabric_core::{CalcError, CalcResult, CalculationItem, Theme};

/// Textile quality-control calculators
#[derive(Parser)]
#[command(name = "fabric")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print results as pretty JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding fabricalc/preferences.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fabric weight per square meter from a cut sample
    Gsm {
        #[arg(long, default_value = "")]
        length: String,
        #[arg(long, default_value = "")]
        width: String,
        /// Sample weight (g)
        #[arg(long, default_value = "")]
        weight: String,
        /// mm, cm, m, in, ft or yd
        #[arg(long, default_value = "cm")]
        unit: String,
    },

    /// Weight of a piece from its size and GSM
    PieceWeight {
        #[arg(long, default_value = "")]
        length: String,
        #[arg(long, default_value = "")]
        width: String,
        #[arg(long, default_value = "")]
        gsm: String,
        #[arg(long, default_value = "cm")]
        unit: String,
    },

    /// Wash shrinkage with body/trim differentials
    Shrinkage {
        /// cm or in
        #[arg(long, default_value = "cm")]
        unit: String,
        #[arg(long, num_args = 2, value_names = ["BEFORE", "AFTER"])]
        length: Vec<String>,
        #[arg(long, num_args = 2, value_names = ["BEFORE", "AFTER"])]
        width: Vec<String>,
        #[arg(long, num_args = 2, value_names = ["BEFORE", "AFTER"])]
        border1: Vec<String>,
        #[arg(long, num_args = 2, value_names = ["BEFORE", "AFTER"])]
        border2: Vec<String>,
        #[arg(long, num_args = 2, value_names = ["BEFORE", "AFTER"])]
        end1: Vec<String>,
        #[arg(long, num_args = 2, value_names = ["BEFORE", "AFTER"])]
        end2: Vec<String>,
        /// Unwashed sample weight (g), enables auto GSM
        #[arg(long, default_value = "")]
        weight: String,
    },

    /// Two-fiber composition by dissolution
    Fiber {
        /// Conditioned weight before dissolving (g)
        #[arg(long, default_value = "")]
        before: String,
        /// Residue weight after dissolving (g)
        #[arg(long, default_value = "")]
        after: String,
        #[arg(long, default_value = "cotton")]
        dissolved: String,
        #[arg(long, default_value = "polyester")]
        residue: String,
    },

    /// Lint loss across washes
    Lint {
        /// Initial sample weight (g)
        #[arg(long, default_value = "")]
        initial: String,
        /// Lint collected in one wash (g); repeat per wash, in order
        #[arg(long = "wash", value_name = "GRAMS")]
        washes: Vec<String>,
    },

    /// Chemical mass for a dosage and volume
    Solution {
        /// Dosage (g/L)
        #[arg(long, default_value = "")]
        dosage: String,
        #[arg(long, default_value = "")]
        volume: String,
        /// L, ml or gal
        #[arg(long, default_value = "L")]
        unit: String,
    },

    /// Stock and water volumes for a target concentration
    Dilution {
        /// Stock concentration (%)
        #[arg(long, default_value = "")]
        stock: String,
        /// Target concentration (%)
        #[arg(long, default_value = "")]
        target: String,
        /// Target volume (ml)
        #[arg(long, default_value = "")]
        volume: String,
    },

    /// Cotton/polyester blend of a towel
    Blend {
        /// ratio or weight
        #[arg(long, default_value = "ratio")]
        mode: String,
        /// Row data as ID=INPUT:COTTON_PERCENT (e.g. pile=3:100)
        #[arg(long = "row", value_name = "ROW")]
        rows: Vec<String>,
    },

    /// Ne count and twist multiplier
    Yarn {
        /// Wrapped length (cm)
        #[arg(long, default_value = "")]
        length: String,
        #[arg(long, default_value = "1")]
        threads: String,
        /// Wrapping weight (g)
        #[arg(long, default_value = "")]
        weight: String,
        /// Single..Quintuple or 1..5
        #[arg(long, default_value = "single")]
        ply: String,
        /// Twist per inch
        #[arg(long, default_value = "")]
        tpi: String,
    },

    /// Convert between units of one category
    Convert {
        /// length, weight, area or force
        category: String,
        /// Defaults to 1
        value: Option<String>,
        /// Defaults to the category's first unit
        from: Option<String>,
        /// Defaults to the category's second unit
        to: Option<String>,
    },

    /// Evaluate tagged JSON calculation items from a file or stdin
    Eval {
        /// JSON file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Set the theme
    Set {
        /// light or dark
        theme: String,
    },
    /// Switch between light and dark
    Toggle,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report::print_error(&e, cli.json);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> CalcResult<()> {
    match &cli.command {
        Commands::Eval { file } => eval(file.as_ref(), cli.json),
        Commands::Theme { action } => theme(action.as_ref(), cli),
        command => {
            let item = build_item(command)?;
            evaluate(&item, cli.json)
        }
    }
}

fn evaluate(item: &CalculationItem, json: bool) -> CalcResult<()> {
    let output = item.calculate()?;
    debug!(tool = item.tool_name(), "calculated");
    if json {
        report::print_json(&output)
    } else {
        report::print_output(item, &output);
        Ok(())
    }
}

fn build_item(command: &Commands) -> CalcResult<CalculationItem> {
    let item = match command {
        Commands::Gsm {
            length,
            width,
            weight,
            unit,
        } => CalculationItem::Gsm(GsmInput {
            length: length.clone(),
            width: width.clone(),
            weight: weight.clone(),
            unit: LinearUnit::from_str_flexible(unit)?,
        }),
        Commands::PieceWeight {
            length,
            width,
            gsm,
            unit,
        } => CalculationItem::PieceWeight(PieceWeightInput {
            length: length.clone(),
            width: width.clone(),
            gsm: gsm.clone(),
            unit: LinearUnit::from_str_flexible(unit)?,
        }),
        Commands::Shrinkage {
            unit,
            length,
            width,
            border1,
            border2,
            end1,
            end2,
            weight,
        } => CalculationItem::Shrinkage(ShrinkageInput {
            unit: SampleUnit::from_str_flexible(unit)?,
            length: pair(length),
            width: pair(width),
            border1: pair(border1),
            border2: pair(border2),
            end1: pair(end1),
            end2: pair(end2),
            weight: weight.clone(),
        }),
        Commands::Fiber {
            before,
            after,
            dissolved,
            residue,
        } => CalculationItem::FiberComposition(FiberInput {
            before_weight: before.clone(),
            after_weight: after.clone(),
            dissolved: Fiber::from_str_flexible(dissolved)?,
            residue: Fiber::from_str_flexible(residue)?,
        }),
        Commands::Lint { initial, washes } => CalculationItem::LintLoss(LintLossInput {
            initial_weight: initial.clone(),
            wash_weights: if washes.is_empty() {
                vec![String::new()]
            } else {
                washes.clone()
            },
        }),
        Commands::Solution { dosage, volume, unit } => CalculationItem::Solution(SolutionInput {
            dosage: dosage.clone(),
            volume: volume.clone(),
            unit: VolumeUnit::from_str_flexible(unit)?,
        }),
        Commands::Dilution { stock, target, volume } => CalculationItem::Dilution(DilutionInput {
            stock_concentration: stock.clone(),
            target_concentration: target.clone(),
            target_volume: volume.clone(),
        }),
        Commands::Blend { mode, rows } => CalculationItem::Blend(BlendInput {
            mode: BlendMode::from_str_flexible(mode)?,
            rows: parse_rows(rows)?,
        }),
        Commands::Yarn {
            length,
            threads,
            weight,
            ply,
            tpi,
        } => CalculationItem::YarnCount(YarnCountInput {
            length_cm: length.clone(),
            threads: threads.clone(),
            weight_g: weight.clone(),
            ply: Ply::from_str_flexible(ply)?,
            tpi: tpi.clone(),
        }),
        Commands::Convert {
            category,
            value,
            from,
            to,
        } => {
            let mut input = ConversionInput::for_category(Category::from_str_flexible(category)?);
            if let Some(value) = value {
                input.value = value.clone();
            }
            if let Some(from) = from {
                input.from = from.clone();
            }
            if let Some(to) = to {
                input.to = to.clone();
            }
            CalculationItem::UnitConversion(input)
        }
        Commands::Eval { .. } | Commands::Theme { .. } => {
            return Err(CalcError::invalid_input("command", "", "Not a calculator"));
        }
    };
    Ok(item)
}

fn pair(values: &[String]) -> MeasurementPair {
    match values {
        [before, after] => MeasurementPair::new(before.as_str(), after.as_str()),
        _ => MeasurementPair::default(),
    }
}

/// `pile=3:100` -> ("pile", RowData { input: "3", cotton_percent: "100" })
fn parse_rows(entries: &[String]) -> CalcResult<BTreeMap<String, RowData>> {
    entries
        .iter()
        .map(|entry| {
            let (id, values) = entry
                .split_once('=')
                .ok_or_else(|| CalcError::invalid_input("row", entry.as_str(), "Expected ID=INPUT:COTTON_PERCENT"))?;
            let (input, cotton) = values.split_once(':').unwrap_or((values, ""));
            Ok((id.trim().to_string(), RowData::new(input, cotton)))
        })
        .collect()
}

/// A single item, or a list of items when the document opens with `[`
fn parse_eval_document(contents: &str) -> CalcResult<Vec<CalculationItem>> {
    if contents.trim_start().starts_with('[') {
        Ok(serde_json::from_str(contents)?)
    } else {
        Ok(vec![serde_json::from_str(contents)?])
    }
}

fn eval(file: Option<&PathBuf>, json: bool) -> CalcResult<()> {
    let contents = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CalcError::file_error("read", "<stdin>", e.to_string()))?;
            buffer
        }
    };

    let items = parse_eval_document(&contents)?;
    debug!(count = items.len(), "eval");

    if json {
        let outputs = items.iter().map(|i| i.calculate()).collect::<CalcResult<Vec<_>>>()?;
        return report::print_json(&outputs);
    }
    for item in &items {
        evaluate(item, false)?;
    }
    Ok(())
}

fn theme(action: Option<&ThemeAction>, cli: &Cli) -> CalcResult<()> {
    let path = match &cli.config_dir {
        Some(dir) => preferences_path_in(dir),
        None => default_preferences_path()?,
    };
    let mut prefs = load_or_default(&path)?;

    match action {
        None | Some(ThemeAction::Show) => {}
        Some(ThemeAction::Set { theme }) => {
            prefs.set_theme(Theme::from_str_flexible(theme)?);
            save_preferences(&prefs, &path)?;
        }
        Some(ThemeAction::Toggle) => {
            prefs.toggle_theme();
            save_preferences(&prefs, &path)?;
        }
    }

    if cli.json {
        report::print_json(&prefs)
    } else {
        println!("Theme: {}", prefs.theme);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows(&["pile=3:100".to_string(), "weft=1".to_string()]).unwrap();
        assert_eq!(rows["pile"], RowData::new("3", "100"));
        assert_eq!(rows["weft"], RowData::new("1", ""));
        assert!(parse_rows(&["pile".to_string()]).is_err());
    }

    #[test]
    fn test_shrinkage_command_builds_pairs() {
        let cli = Cli::try_parse_from([
            "fabric", "shrinkage", "--length", "70", "66.1", "--weight", "120", "--unit", "in",
        ])
        .unwrap();
        match build_item(&cli.command).unwrap() {
            CalculationItem::Shrinkage(input) => {
                assert_eq!(input.length, MeasurementPair::new("70", "66.1"));
                assert_eq!(input.width, MeasurementPair::default());
                assert_eq!(input.unit, SampleUnit::In);
            }
            _ => panic!("expected shrinkage"),
        }
    }

    #[test]
    fn test_convert_defaults_to_category_pair() {
        let cli = Cli::try_parse_from(["fabric", "--json", "convert", "weight"]).unwrap();
        assert!(cli.json);
        match build_item(&cli.command).unwrap() {
            CalculationItem::UnitConversion(input) => {
                assert_eq!(input.category, Category::Weight);
                assert_eq!(input.value, "1");
            }
            _ => panic!("expected conversion"),
        }
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let cli = Cli::try_parse_from(["fabric", "gsm", "--unit", "furlong"]).unwrap();
        assert!(build_item(&cli.command).is_err());
    }

    #[test]
    fn test_eval_document_accepts_one_or_many() {
        let one = r#"{"tool":"YarnCount","length_cm":"100","weight_g":"2"}"#;
        assert_eq!(parse_eval_document(one).unwrap().len(), 1);
        let many = format!("  \n[{},{}]", one, one);
        assert_eq!(parse_eval_document(&many).unwrap().len(), 2);
    }

    #[test]
    fn test_eval_document_reports_field_error() {
        let err = parse_eval_document(r#"{"tool":"Gsm","length":5}"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let message = err.to_string();
        assert!(message.contains("invalid type"), "{}", message);
        assert!(!message.contains("did not match any variant"), "{}", message);

        let err = parse_eval_document(r#"[{"tool":"Gsm","width":[]}]"#).unwrap_err();
        assert!(err.to_string().contains("invalid type"));
    }
}
