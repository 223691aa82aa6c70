//! AppHost CLI - generate Aspire AppHost programs from JSON manifests
//!
//! Commands:
//!   apphost generate <manifest>  - Write the AppHost program
//!   apphost check <manifest>     - Validate a manifest without writing anything
//!   apphost catalog              - List factories, methods and options

use std::path::{Path, PathBuf};

use anyhow::Context;
use apphost::catalog::{enums, Member};
use apphost::resolve::{Param, Shape};
use apphost::{Catalog, Manifest, ResourceKind};
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "apphost")]
#[command(about = "Generate .NET Aspire AppHost programs", long_about = None)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the AppHost program described by a manifest
    Generate {
        /// Path to the JSON manifest
        manifest: PathBuf,

        /// Directory to write into, overriding the manifest settings
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,

        /// SDK version for the `#:sdk` and `#:package` lines
        #[arg(long)]
        sdk_version: Option<String>,

        /// Print the program instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Resolve every call in a manifest without writing anything
    Check {
        /// Path to the JSON manifest
        manifest: PathBuf,
    },

    /// List factories and the members of every resource type
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            manifest,
            output_dir,
            sdk_version,
            stdout,
        } => generate_command(&manifest, output_dir, sdk_version, stdout),
        Commands::Check { manifest } => check_command(&manifest),
        Commands::Catalog { json } => {
            if json {
                print_catalog_json()
            } else {
                print_catalog();
                Ok(())
            }
        }
    }
}

fn load(path: &Path) -> anyhow::Result<Manifest> {
    Manifest::from_path(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn generate_command(
    path: &Path,
    output_dir: Option<PathBuf>,
    sdk_version: Option<String>,
    stdout: bool,
) -> anyhow::Result<()> {
    let mut manifest = load(path)?;
    if let Some(dir) = output_dir {
        manifest.settings.output_dir = Some(dir);
    }
    if let Some(version) = sdk_version {
        manifest.settings.sdk_version = version;
    }

    let mut composition = manifest
        .compose()
        .with_context(|| format!("Failed to compose {}", path.display()))?;

    if stdout {
        print!("{}", composition.render());
    } else {
        let apphost = composition.build().context("Failed to write AppHost program")?;
        println!("{}", apphost.path.display());
    }
    Ok(())
}

fn check_command(path: &Path) -> anyhow::Result<()> {
    let manifest = load(path)?;
    let composition = manifest
        .compose()
        .with_context(|| format!("Failed to compose {}", path.display()))?;
    println!(
        "ok: {} resources, {} bytes",
        composition.resources().len(),
        composition.render().len()
    );
    Ok(())
}

fn print_catalog() {
    let catalog = Catalog::get();

    println!("factories:");
    for factory in catalog.factories() {
        println!("  {} -> {}", factory.name, factory.produces);
        for shape in &factory.shapes {
            println!("    {}", format_shape(shape));
        }
    }

    for kind in ResourceKind::ALL {
        println!("{kind}:");
        for member in catalog.members(kind) {
            println!("  {}", format_member(member));
        }
    }
}

fn format_member(member: &Member) -> String {
    let mut names = Vec::new();
    if let Some(method) = member.method {
        names.push(format!("{method}()"));
    }
    if let Some(option) = member.option {
        names.push(format!("{option}="));
    }
    let mut line = format!("{} [{}]", member.target, names.join(", "));
    if let Some(code) = member.experimental {
        line.push_str(&format!(" experimental {code}"));
    }
    line
}

fn format_shape(shape: &Shape) -> String {
    let mut parts = Vec::new();
    let mut keyword_marker = false;
    for param in &shape.params {
        if param.keyword_only && !keyword_marker {
            parts.push("*".to_string());
            keyword_marker = true;
        }
        parts.push(format_param(param));
    }
    format!("({})", parts.join(", "))
}

fn format_param(param: &Param) -> String {
    match &param.default {
        Some(default) => format!("{}: {} = {}", param.name, param.desc, default),
        None => format!("{}: {}", param.name, param.desc),
    }
}

fn print_catalog_json() -> anyhow::Result<()> {
    let catalog = Catalog::get();
    let output = serde_json::json!({
        "factories": catalog.factories().iter().map(|f| serde_json::json!({
            "name": f.name,
            "target": f.target,
            "produces": f.produces.type_name(),
            "experimental": f.experimental,
            "shapes": f.shapes.iter().map(shape_to_json).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "resources": ResourceKind::ALL.iter().map(|&kind| serde_json::json!({
            "type": kind.type_name(),
            "package": kind.package(),
            "capabilities": kind.capabilities().to_string(),
            "members": catalog.members(kind).iter().map(member_to_json).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "enumerations": enums::ALL.iter().map(|e| serde_json::json!({
            "name": e.name,
            "members": e.members,
        })).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn member_to_json(member: &Member) -> serde_json::Value {
    serde_json::json!({
        "target": member.target,
        "method": member.method,
        "option": member.option,
        "experimental": member.experimental,
        "accepts": member.forms.iter().map(|f| f.accepts.to_string()).collect::<Vec<_>>(),
        "shapes": member.shapes.iter().map(shape_to_json).collect::<Vec<_>>(),
    })
}

fn shape_to_json(shape: &Shape) -> serde_json::Value {
    serde_json::Value::Array(
        shape
            .params
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "type": p.desc.to_string(),
                    "keyword_only": p.keyword_only,
                    "default": p.default.as_ref().map(|d| d.to_string()),
                })
            })
            .collect(),
    )
}
