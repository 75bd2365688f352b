use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ifc_checker::check::{CheckOptions, CheckReport, Session};
use ifc_checker::export::{export_csv, export_json};
use ifc_checker::scope::AmbiguityPolicy;
use ifc_checker::ui::App;

#[derive(Parser, Debug)]
#[command(name = "ifc-checker")]
#[command(about = "IFC Checker - find elements missing required properties")]
#[command(version)]
struct Args {
    /// Path to the serialized property graph (JSON)
    #[arg(required = true)]
    graph: PathBuf,

    /// Path to the requirements file (JSON)
    #[arg(short, long, value_name = "FILE")]
    requirements: Option<PathBuf>,

    /// Only check elements of this storey
    #[arg(short, long, value_name = "NAME")]
    storey: Option<String>,

    /// What to do when several storeys share the selected name
    #[arg(long, value_enum, default_value_t = AmbiguityPolicy::Error)]
    ambiguous_storeys: AmbiguityPolicy,

    /// Print storey names and exit
    #[arg(long)]
    list_storeys: bool,

    /// Export to CSV (optional output path)
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export to JSON (optional output path)
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Print a plain-text report instead of opening the browser
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut session = Session::new();
    session.load_graph(&args.graph)?;

    if args.list_storeys {
        for name in session.storey_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    if let Some(requirements) = &args.requirements {
        session.load_requirements(requirements)?;
    }

    let options = CheckOptions {
        storey: args.storey,
        ambiguity: args.ambiguous_storeys,
    };

    if args.csv.is_none() && args.json.is_none() && !args.summary {
        let terminal = ratatui::init();
        let result = App::new(session, options).run(terminal);
        ratatui::restore();
        return result;
    }

    let report = session.run(&options)?;

    if let Some(csv_path) = &args.csv {
        export_csv(&report, csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    if let Some(json_path) = &args.json {
        export_json(&report, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
    }

    if args.summary {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &CheckReport) {
    let scope = report.storey.as_deref().unwrap_or("all storeys");
    println!(
        "Checked {} elements ({scope}) against {} requirements ({} skipped)",
        report.elements_checked, report.requirements_checked, report.requirements_skipped
    );

    if report.is_compliant() {
        println!("All checked elements comply.");
        return;
    }

    println!("{} failing elements:", report.failing_ids.len());
    for element in &report.elements {
        println!("  #{} {} '{}'", element.id, element.entity_type, element.name);
        for missing in &element.missing {
            println!("      missing {missing}");
        }
    }
}
