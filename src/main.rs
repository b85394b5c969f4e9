use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use gdat_tools::cli::{
    Cli, Commands, CompareArgs, ConcentrationArgs, GroupStatArgs, MarkdownArgs, MeanArgs,
    OverviewArgs, StyleArg, SweepArgs, TracesArgs,
};
use gdat_tools::ctx::{Ctx, GroupSpec, TraceOptions};
use gdat_tools::io;
use gdat_tools::overview;
use gdat_tools::pipeline::Pipeline;
use gdat_tools::plot::palette::Palette;
use gdat_tools::plot::traces::{ColorBy, TraceStyle};
use gdat_tools::schema::v1::Analysis;
use gdat_tools::sweep::{self, CommandRunner, ParamGrid};
use gdat_tools::units;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Traces(args) => handle_traces(args)?,
        Commands::Mean(args) => handle_mean(args)?,
        Commands::Compare(args) => handle_compare(args)?,
        Commands::Normality(args) => {
            let mut ctx = stat_ctx(Analysis::Normality, args)?;
            run_analysis(&mut ctx)?;
        }
        Commands::Anova(args) => {
            let mut ctx = stat_ctx(Analysis::Anova, args)?;
            run_analysis(&mut ctx)?;
        }
        Commands::Ttest(args) => {
            if args.common.group.len() != 2 {
                bail!(
                    "ttest needs exactly two --group values, got {}",
                    args.common.group.len()
                );
            }
            let mut ctx = stat_ctx(Analysis::Ttest, args.common)?;
            ctx.welch = args.welch;
            run_analysis(&mut ctx)?;
        }
        Commands::Overview(args) => handle_overview(args)?,
        Commands::Markdown(args) => handle_markdown(args)?,
        Commands::Sweep(args) => handle_sweep(args)?,
        Commands::Concentration(args) => handle_concentration(args),
    }

    Ok(())
}

fn run_analysis(ctx: &mut Ctx) -> Result<()> {
    Pipeline::standard().run(ctx)?;
    print!("{}", io::summary::format_summary(ctx));
    print_warnings(&ctx.warnings);
    Ok(())
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
}

fn handle_traces(args: TracesArgs) -> Result<()> {
    let palette = Palette::with_overlay(args.colors.as_deref())?;
    let out = args.out.unwrap_or_else(|| args.input.clone());
    let group = folder_group(&args.input);
    let mut ctx = Ctx::new(Analysis::Traces, vec![group], out, palette, VERSION);
    ctx.variables = args.variables;
    ctx.write_json = args.json;
    ctx.traces = TraceOptions {
        title: args
            .title
            .unwrap_or_else(|| "Time series of all variables".to_string()),
        style: match args.style {
            StyleArg::Line => TraceStyle::Line,
            StyleArg::Step => TraceStyle::Step,
        },
        color_by: match args.color_by {
            None => ColorBy::Variable,
            Some(param) if args.color_thresholds.is_empty() => ColorBy::Continuous { param },
            Some(param) => ColorBy::Thresholds {
                param,
                thresholds: args.color_thresholds,
            },
        },
        legend_params: args.params,
    };
    run_analysis(&mut ctx)
}

fn handle_mean(args: MeanArgs) -> Result<()> {
    let palette = Palette::with_overlay(args.colors.as_deref())?;
    let out = args.out.unwrap_or_else(|| args.input.clone());
    let group = folder_group(&args.input);
    let mut ctx = Ctx::new(Analysis::Mean, vec![group], out, palette, VERSION);
    ctx.variables = args.variables;
    ctx.write_json = args.json;
    ctx.plot = !args.no_plot;
    run_analysis(&mut ctx)
}

fn handle_compare(args: CompareArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        Analysis::Compare,
        args.group,
        args.out,
        Palette::builtin()?,
        VERSION,
    );
    ctx.variables = args.variables;
    ctx.write_json = args.json;
    ctx.plot = !args.no_plot;
    run_analysis(&mut ctx)
}

fn stat_ctx(analysis: Analysis, args: GroupStatArgs) -> Result<Ctx> {
    let mut ctx = Ctx::new(analysis, args.group, args.out, Palette::builtin()?, VERSION);
    ctx.variables = vec![args.variable];
    ctx.stat = args.stat;
    ctx.write_json = args.json;
    ctx.plot = !args.no_plot;
    Ok(ctx)
}

fn handle_overview(args: OverviewArgs) -> Result<()> {
    let mut overview = overview::build_overview(&args.base, &args.variable, args.stat)?;
    overview.kd = args.kd;
    overview::write_overview_csv(&args.out, &overview)?;
    println!("overview: {} runs", overview.rows.len());
    println!("csv: {}", args.out.display());
    if let Some(path) = args.markdown {
        let table = io::markdown::csv_to_markdown(&overview.to_csv())?;
        io::markdown::write_markdown(&path, &table)?;
        println!("markdown: {}", path.display());
    }
    print_warnings(&overview.warnings);
    Ok(())
}

fn handle_markdown(args: MarkdownArgs) -> Result<()> {
    let mut warnings = Vec::new();
    let content = if args.params {
        let file = io::params::read_params(&args.input)?;
        warnings = file.warnings;
        io::markdown::params_to_markdown(&file.record)
    } else {
        let csv = std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?;
        io::markdown::csv_to_markdown(&csv)?
    };
    io::markdown::write_markdown(&args.out, &content)?;
    println!("markdown: {}", args.out.display());
    print_warnings(&warnings);
    Ok(())
}

fn handle_sweep(args: SweepArgs) -> Result<()> {
    let mut grid = ParamGrid::new();
    for spec in &args.param {
        grid.push_spec(spec)?;
    }
    let known = match &args.known_params {
        Some(path) => {
            let file = io::params::read_params(path)?;
            Some(file.record.names().map(str::to_string).collect::<Vec<_>>())
        }
        None => None,
    };

    if args.dry_run {
        if let Some(known) = &known {
            sweep::validate_overrides(&grid, known)?;
        }
        let combinations = grid.combinations();
        println!("sweep: {} combinations", combinations.len());
        for (i, overrides) in combinations.iter().enumerate() {
            println!("{:>4}  {}", i + 1, sweep::describe(overrides));
        }
        return Ok(());
    }

    let Some((program, rest)) = args.command.split_first() else {
        bail!("sweep needs a model command after `--`");
    };
    let mut runner = CommandRunner::new(program.clone(), rest.to_vec(), args.work_dir.clone());
    let completed = sweep::run_sweep(&grid, &mut runner, known.as_deref())?;
    println!("sweep: {} runs completed", completed);
    println!("work dir: {}", args.work_dir.display());
    Ok(())
}

fn handle_concentration(args: ConcentrationArgs) {
    let micromolar = units::molecules_to_micromolar(args.molecules, args.volume_um3);
    println!(
        "{} molecules in {} µm³ = {:.4} µM",
        args.molecules, args.volume_um3, micromolar
    );
}

fn folder_group(input: &Path) -> GroupSpec {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("runs")
        .to_string();
    GroupSpec {
        name,
        root: PathBuf::from(input),
    }
}
