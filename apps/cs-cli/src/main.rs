use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use cs_app::{
    AnalysisOutcome, AppError, AppResult, Command, SeriesKind, Session, analyze_batch,
    analyze_file, outcome_json, render_report, series_csv, write_output,
};
use cs_model::{ControllerKind, PlantMethod};
use cs_project::params::{default_controller, default_plant, specs_for_tag};
use cs_project::schema::AnalysisRequest;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(about = "Control response analyzer - closed-loop time and frequency analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a request file
    Validate {
        /// Path to the request YAML/JSON file
        request_path: PathBuf,
    },
    /// Analyze a request and print the key metrics
    Analyze {
        /// Path to the request YAML/JSON file
        request_path: PathBuf,
        /// Print the full outcome as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Write the text report for a request
    Report {
        /// Path to the request YAML/JSON file
        request_path: PathBuf,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a computed series as CSV
    ExportSeries {
        /// Path to the request YAML/JSON file
        request_path: PathBuf,
        /// Series name: step, impulse, time or bode
        series: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-express the plant in another parameterization
    Convert {
        /// Path to the request YAML/JSON file
        request_path: PathBuf,
        /// Target plant method
        #[arg(long, value_enum)]
        to: MethodArg,
        /// Output request file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List editable parameters with ranges and defaults
    Params {
        /// Plant method or controller type tag (all tables when omitted)
        tag: Option<String>,
    },
    /// Analyze several requests in parallel
    Batch {
        /// Request files
        #[arg(required = true)]
        request_paths: Vec<PathBuf>,
    },
    /// Write a default request file
    Init {
        /// Destination path
        path: PathBuf,
        /// Start from this plant method's defaults
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
        /// Start from this controller type's defaults
        #[arg(long)]
        controller: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    TimeConstant,
    NaturalFrequency,
    Ode,
    Laplace,
    StateSpace,
}

impl From<MethodArg> for PlantMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::TimeConstant => PlantMethod::TimeConstant,
            MethodArg::NaturalFrequency => PlantMethod::NaturalFrequency,
            MethodArg::Ode => PlantMethod::Ode,
            MethodArg::Laplace => PlantMethod::Laplace,
            MethodArg::StateSpace => PlantMethod::StateSpace,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { request_path } => cmd_validate(&request_path),
        Commands::Analyze { request_path, json } => cmd_analyze(&request_path, json),
        Commands::Report {
            request_path,
            output,
        } => cmd_report(&request_path, output.as_deref()),
        Commands::ExportSeries {
            request_path,
            series,
            output,
        } => cmd_export_series(&request_path, &series, output.as_deref()),
        Commands::Convert {
            request_path,
            to,
            output,
        } => cmd_convert(&request_path, to.into(), output.as_deref()),
        Commands::Params { tag } => cmd_params(tag.as_deref()),
        Commands::Batch { request_paths } => cmd_batch(&request_paths),
        Commands::Init {
            path,
            method,
            controller,
        } => cmd_init(&path, method.map(Into::into), controller.as_deref()),
    }
}

fn cmd_validate(request_path: &Path) -> AppResult<()> {
    println!("Validating request: {}", request_path.display());
    let request = cs_project::load(request_path)?;
    println!("✓ Request '{}' is valid", request.name);
    Ok(())
}

fn cmd_analyze(request_path: &Path, json: bool) -> AppResult<()> {
    let (request, outcome) = analyze_file(request_path)?;
    if json {
        println!("{}", outcome_json(&outcome)?);
        return Ok(());
    }

    println!("Analysis: {}", request.name);
    print_summary(&outcome);
    for warning in &outcome.warnings {
        println!("  ! {}", warning);
    }
    Ok(())
}

fn print_summary(outcome: &AnalysisOutcome) {
    let perf = &outcome.performance;
    println!(
        "  Stability:       {}",
        if perf.is_stable { "STABLE" } else { "UNSTABLE" }
    );
    println!("  CL ωn:           {:.4} rad/s", perf.cl_wn);
    println!("  CL ζ:            {:.4}", perf.cl_zeta);
    println!("  Regime:          {:?}", outcome.regime);
    println!("  Overshoot:       {}", fmt_opt(perf.overshoot_pct, "%"));
    println!("  Settling (4%):   {}", fmt_opt(perf.settling_time_s, "s"));
    println!(
        "  Bandwidth:       {}",
        fmt_opt(outcome.crossovers.bandwidth, "rad/s")
    );
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.4} {}", v, unit),
        None => "N/A".to_string(),
    }
}

fn cmd_report(request_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let (request, outcome) = analyze_file(request_path)?;
    let report = render_report(&request, &outcome);
    match output {
        Some(path) => {
            write_output(path, &report)?;
            println!("✓ Report written to {}", path.display());
        }
        None => print!("{}", report),
    }
    Ok(())
}

fn cmd_export_series(request_path: &Path, series: &str, output: Option<&Path>) -> AppResult<()> {
    let kind = SeriesKind::from_name(series)?;
    let (_request, outcome) = analyze_file(request_path)?;
    let csv = series_csv(&outcome, kind);

    if let Some(path) = output {
        write_output(path, &csv)?;
        println!(
            "✓ Exported {} data points to {}",
            csv.lines().count().saturating_sub(1),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_convert(request_path: &Path, method: PlantMethod, output: Option<&Path>) -> AppResult<()> {
    let request = cs_project::load(request_path)?;
    let mut session = Session::new(request);
    let from = session.plant_method();
    session.apply(Command::SetPlantMethod(method))?;
    tracing::info!(%from, to = %method, "converted plant");

    match output {
        Some(path) => {
            cs_project::save_yaml(path, session.request())?;
            println!("✓ Converted request written to {}", path.display());
        }
        None => print!("{}", to_yaml(session.request())?),
    }
    Ok(())
}

fn cmd_params(tag: Option<&str>) -> AppResult<()> {
    let tags: Vec<&str> = match tag {
        Some(t) => vec![t],
        None => PlantMethod::ALL
            .iter()
            .map(|m| m.tag())
            .chain(ControllerKind::ALL.iter().map(|k| k.tag()))
            .collect(),
    };

    for tag in tags {
        let specs = specs_for_tag(tag)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown method or controller '{}'", tag)))?;
        println!("{}:", tag);
        if specs.is_empty() {
            println!("  (no parameters)");
        }
        for spec in specs {
            println!(
                "  {:<6} {:<28} default {:<8} range [{}, {}] step {}",
                spec.name, spec.label, spec.default, spec.min, spec.max, spec.step
            );
        }
    }
    Ok(())
}

fn cmd_batch(request_paths: &[PathBuf]) -> AppResult<()> {
    let mut requests = Vec::with_capacity(request_paths.len());
    for path in request_paths {
        requests.push(cs_project::load(path)?);
    }

    let results = analyze_batch(&requests);
    let mut failures = 0;
    for (path, result) in request_paths.iter().zip(results) {
        match result {
            Ok(outcome) => println!(
                "{:<40} {:<9} ωn={:.4} ζ={:.4} bw={}",
                path.display(),
                if outcome.performance.is_stable {
                    "STABLE"
                } else {
                    "UNSTABLE"
                },
                outcome.performance.cl_wn,
                outcome.performance.cl_zeta,
                fmt_opt(outcome.crossovers.bandwidth, "rad/s"),
            ),
            Err(e) => {
                failures += 1;
                println!("{:<40} ERROR {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(AppError::Analysis(format!(
            "{} of {} requests failed",
            failures,
            request_paths.len()
        )));
    }
    Ok(())
}

fn cmd_init(path: &Path, method: Option<PlantMethod>, controller: Option<&str>) -> AppResult<()> {
    let mut request = AnalysisRequest::default();
    if let Some(method) = method {
        request.plant = default_plant(method)?;
    }
    if let Some(tag) = controller {
        let kind = ControllerKind::from_tag(tag)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown controller '{}'", tag)))?;
        request.controller = default_controller(kind)?;
    }
    cs_project::save_yaml(path, &request)?;
    println!("✓ Default request written to {}", path.display());
    Ok(())
}

fn to_yaml(request: &AnalysisRequest) -> AppResult<String> {
    serde_yaml::to_string(request).map_err(|e| AppError::Serialization(e.to_string()))
}
