//! `plan-copy`: copy and normalize plans in a patient record snapshot

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgMatches, Command};
use plancopy_model::{InMemoryHost, PatientRecord, PlanHost};
use plancopy_normalizer::{copy_and_normalize, Normalizer, NormalizerConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn record_arg() -> Arg {
    Arg::new("record")
        .long("record")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Patient record JSON snapshot")
}

fn out_arg() -> Arg {
    Arg::new("out")
        .long("out")
        .value_parser(value_parser!(PathBuf))
        .help("Where to write the updated record (defaults to --record)")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Normalizer TOML configuration")
}

fn cli() -> Command {
    Command::new("plan-copy")
        .version(plancopy_normalizer::VERSION)
        .about("Copy treatment plans while keeping source naming and unique beam numbers")
        .subcommand_required(true)
        .subcommand(
            Command::new("copy")
                .about("Copy a plan and normalize the copy")
                .arg(record_arg())
                .arg(
                    Arg::new("plan")
                        .long("plan")
                        .required(true)
                        .help("Name of the plan to copy"),
                )
                .arg(out_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("normalize")
                .about("Normalize an existing copy against its source")
                .arg(record_arg())
                .arg(
                    Arg::new("source")
                        .long("source")
                        .required(true)
                        .help("Name of the source plan"),
                )
                .arg(
                    Arg::new("copy")
                        .long("copy")
                        .required(true)
                        .help("Name of the copied plan"),
                )
                .arg(out_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print plans, beam sets, isocenters, and beams")
                .arg(record_arg()),
        )
}

fn required<'a, T: Clone + Send + Sync + 'static>(
    args: &'a ArgMatches,
    name: &str,
) -> anyhow::Result<&'a T> {
    args.get_one::<T>(name)
        .with_context(|| format!("missing --{name}"))
}

fn load_record(path: &Path) -> anyhow::Result<PatientRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading record {}", path.display()))?;
    PatientRecord::from_json(&json).with_context(|| format!("parsing record {}", path.display()))
}

fn save_record(record: &PatientRecord, path: &Path) -> anyhow::Result<()> {
    let json = record.to_json().context("serializing record")?;
    std::fs::write(path, json).with_context(|| format!("writing record {}", path.display()))
}

fn load_config(args: &ArgMatches) -> anyhow::Result<NormalizerConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => NormalizerConfig::load(path).context("loading normalizer config"),
        None => Ok(NormalizerConfig::default()),
    }
}

fn output_path<'a>(args: &'a ArgMatches, record: &'a Path) -> &'a Path {
    args.get_one::<PathBuf>("out").map_or(record, PathBuf::as_path)
}

fn run_copy(args: &ArgMatches) -> anyhow::Result<()> {
    let record_path = required::<PathBuf>(args, "record")?;
    let plan_name = required::<String>(args, "plan")?;
    let config = load_config(args)?;

    let record = load_record(record_path)?;
    let Some(source) = record.plan_by_name(plan_name).map(|p| p.id) else {
        bail!("no plan named {plan_name:?}");
    };

    let mut host = InMemoryHost::new(record);
    let outcome = copy_and_normalize(&mut host, source, &config)
        .with_context(|| format!("copying {plan_name:?}"))?;

    println!("Created {:?}", outcome.name);
    print_report(&outcome.report);
    save_record(&host.into_record(), output_path(args, record_path))
}

fn run_normalize(args: &ArgMatches) -> anyhow::Result<()> {
    let record_path = required::<PathBuf>(args, "record")?;
    let source_name = required::<String>(args, "source")?;
    let copy_name = required::<String>(args, "copy")?;
    let config = load_config(args)?;

    let record = load_record(record_path)?;
    let find = |name: &str| {
        record
            .plan_by_name(name)
            .map(|p| p.id)
            .with_context(|| format!("no plan named {name:?}"))
    };
    let source = find(source_name.as_str())?;
    let copy = find(copy_name.as_str())?;

    let mut host = InMemoryHost::new(record);
    let report = Normalizer::new(config)
        .normalize(&mut host, source, copy)
        .with_context(|| format!("normalizing {copy_name:?} against {source_name:?}"))?;

    print_report(&report);
    save_record(&host.into_record(), output_path(args, record_path))
}

fn run_inspect(args: &ArgMatches) -> anyhow::Result<()> {
    let record = load_record(required::<PathBuf>(args, "record")?)?;
    let host = InMemoryHost::new(record);

    for plan in &host.patient().plans {
        println!("{}", plan.name);
        for beam_set in &plan.beam_sets {
            println!("  beam set {}", beam_set.name);
            for beam in &beam_set.beams {
                let kind = if beam.is_setup { "setup" } else { "beam" };
                println!("    {kind} #{} {:?}", beam.number, beam.name);
            }
        }
        for isocenter in &plan.isocenters {
            println!("  isocenter {}", isocenter.name);
        }
    }
    println!("Highest beam number: {}", host.patient().max_beam_number());
    Ok(())
}

fn print_report(report: &plancopy_normalizer::NormalizationReport) {
    println!("  Beam sets renamed: {}", report.beam_sets_renamed);
    println!("  Isocenters renamed: {}", report.isocenters_renamed);
    println!("  Beams renumbered: {}", report.beams_renumbered);
    if let (Some(first), Some(last)) = (report.first_number, report.last_number) {
        println!("  Numbers: {first}..={last}");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let result = match matches.subcommand() {
        Some(("copy", args)) => run_copy(args),
        Some(("normalize", args)) => run_normalize(args),
        Some(("inspect", args)) => run_inspect(args),
        _ => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
