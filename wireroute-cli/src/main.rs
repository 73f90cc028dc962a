//! WireRoute CLI - check and repair wiring diagram routes from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use wireroute::geometry::{is_orth45_polyline, Point};
use wireroute::schema::anchors::AnchorResolver;
use wireroute::schema::{DiagramDto, PartLibrary, Wire};
use wireroute::{can_connect, DiagramSnapshot, RouterConfig, RoutingCore, WireRouteError};

#[derive(Parser)]
#[command(name = "wireroute")]
#[command(about = "Wiring diagram route checking and repair tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a diagram for routing problems without modifying it
    Check {
        /// Path to the diagram JSON document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the part-definition library JSON
        #[arg(short, long, value_name = "FILE")]
        parts: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if issues found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,
    },

    /// Clean every wire path and re-sync pairs, writing the repaired diagram
    Clean {
        /// Path to the diagram JSON document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the part-definition library JSON
        #[arg(short, long, value_name = "FILE")]
        parts: PathBuf,

        /// Where to write the repaired document (defaults to in place)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Grid cell size in pixels
        #[arg(long, default_value_t = 16.0)]
        grid: f64,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Error,
    Warning,
}

#[derive(Debug)]
struct Issue {
    severity: Severity,
    message: String,
    wire: Option<String>,
    component: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check {
            file,
            parts,
            format,
            fail_on,
        } => handle_check(&file, &parts, format, fail_on),
        Commands::Clean {
            file,
            parts,
            output,
            grid,
        } => handle_clean(&file, &parts, output.as_deref(), grid),
    };

    process::exit(exit_code);
}

fn load_inputs(file: &Path, parts: &Path) -> Result<(DiagramDto, PartLibrary), WireRouteError> {
    let diagram = wireroute::load_diagram(file)?;
    let text = std::fs::read_to_string(parts)?;
    let library = wireroute::library_from_json(&text)?;
    Ok((diagram, library))
}

fn handle_check(
    file: &Path,
    parts: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
) -> i32 {
    let (diagram, library) = match load_inputs(file, parts) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let issues = check_diagram(&diagram, &library, &RouterConfig::default());
    match format {
        OutputFormat::Human => output_human(file, &issues),
        OutputFormat::Json => output_json(file, &issues),
    }

    match fail_on {
        Some(FailOnSeverity::Error) if issues.iter().any(|i| i.severity == Severity::Error) => 1,
        Some(FailOnSeverity::Warning) if !issues.is_empty() => 1,
        _ => 0,
    }
}

fn handle_clean(file: &Path, parts: &Path, output: Option<&Path>, grid: f64) -> i32 {
    let (mut diagram, library) = match load_inputs(file, parts) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut config = RouterConfig::default();
    config.grid_size = grid;
    diagram.snap_all(grid);
    let snapshot = DiagramSnapshot {
        components: &diagram.components,
        wires: &diagram.wires,
        library: &library,
    };
    let cleaned = RoutingCore::clean_all_wires(snapshot, &config);
    let changed = diagram
        .wires
        .iter()
        .zip(&cleaned)
        .filter(|(before, after)| before.control_points != after.control_points)
        .count();
    diagram.wires = cleaned;

    let target = output.unwrap_or(file);
    if let Err(e) = wireroute::save_diagram(target, &diagram) {
        eprintln!("Error: {}", e);
        return 1;
    }
    println!(
        "Cleaned {} wires ({} changed), wrote {}",
        diagram.wires.len(),
        changed,
        target.display()
    );
    0
}

/// Validate a diagram against its part library: dangling references and
/// incompatible endpoints are errors; geometry drift (off-grid points, skew
/// segments, desynced pairs) is a warning the `clean` command can repair.
fn check_diagram(diagram: &DiagramDto, library: &PartLibrary, config: &RouterConfig) -> Vec<Issue> {
    let mut issues = Vec::new();

    for component in &diagram.components {
        if library.get(&component.part_key).is_none() {
            issues.push(Issue {
                severity: Severity::Error,
                message: format!("unknown part key: {}", component.part_key),
                wire: None,
                component: Some(component.id.clone()),
            });
        }
    }

    for wire in &diagram.wires {
        let a = AnchorResolver::resolve(&wire.from, &diagram.components, library);
        let b = AnchorResolver::resolve(&wire.to, &diagram.components, library);
        let (Some(a), Some(b)) = (a, b) else {
            issues.push(Issue {
                severity: Severity::Error,
                message: "dangling terminal reference".to_string(),
                wire: Some(wire.id.clone()),
                component: None,
            });
            continue;
        };

        if !can_connect(a.terminal_type, b.terminal_type) {
            issues.push(Issue {
                severity: Severity::Error,
                message: format!(
                    "incompatible terminals: {} -> {}",
                    a.terminal_type.tag(),
                    b.terminal_type.tag()
                ),
                wire: Some(wire.id.clone()),
                component: None,
            });
        }

        for p in &wire.control_points {
            if *p != p.snapped(config.grid_size) {
                issues.push(Issue {
                    severity: Severity::Warning,
                    message: format!("off-grid control point ({}, {})", p.x, p.y),
                    wire: Some(wire.id.clone()),
                    component: None,
                });
                break;
            }
        }

        let polyline = full_polyline(wire, a.position, b.position);
        if !is_orth45_polyline(&polyline) {
            issues.push(Issue {
                severity: Severity::Warning,
                message: "path has segments that are not horizontal, vertical, or 45 degrees"
                    .to_string(),
                wire: Some(wire.id.clone()),
                component: None,
            });
        }
    }

    let synced = RoutingCore::sync_pairs(&diagram.wires);
    for (before, after) in diagram.wires.iter().zip(&synced) {
        if before.control_points != after.control_points {
            issues.push(Issue {
                severity: Severity::Warning,
                message: "paired wire is out of sync with its canonical".to_string(),
                wire: Some(before.id.clone()),
                component: None,
            });
        }
    }

    issues
}

fn full_polyline(wire: &Wire, from: Point, to: Point) -> Vec<Point> {
    let mut pts = Vec::with_capacity(wire.control_points.len() + 2);
    pts.push(from);
    pts.extend(wire.control_points.iter().copied());
    pts.push(to);
    pts
}

fn output_human(file: &Path, issues: &[Issue]) {
    println!("\nFile: {}", file.display());
    println!("{}", "─".repeat(60));

    if issues.is_empty() {
        println!("  No issues found");
        return;
    }

    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .collect();
    let warnings: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .collect();

    if !errors.is_empty() {
        println!("\n  ERRORS:");
        for issue in &errors {
            println!("    - {}", issue.message);
            if let Some(ref wire) = issue.wire {
                println!("      Wire: {}", wire);
            }
            if let Some(ref comp) = issue.component {
                println!("      Component: {}", comp);
            }
        }
    }
    if !warnings.is_empty() {
        println!("\n  WARNINGS:");
        for issue in &warnings {
            println!("    - {}", issue.message);
            if let Some(ref wire) = issue.wire {
                println!("      Wire: {}", wire);
            }
        }
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", errors.len());
    println!("    Warnings: {}", warnings.len());
}

fn output_json(file: &Path, issues: &[Issue]) {
    let output = serde_json::json!({
        "file": file.display().to_string(),
        "issues": issues.iter().map(|i| {
            serde_json::json!({
                "severity": match i.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                },
                "message": i.message,
                "wire": i.wire,
                "component": i.component,
            })
        }).collect::<Vec<_>>(),
        "summary": {
            "errors": issues.iter().filter(|i| i.severity == Severity::Error).count(),
            "warnings": issues.iter().filter(|i| i.severity == Severity::Warning).count(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
