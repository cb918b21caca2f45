use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use nis_shader_gen::build_tasks::{self, Config, DEFAULT_INPUT_DIR};
use nis_shader_gen::shaders::ShaderGenError;
use nis_shader_gen::shaders::compiler::{SlangcCompiler, resolve_slangc};
use nis_shader_gen::shaders::profile::ModernFallbackPolicy;

/// Compiles NIS shader permutations and generates NIS_shaders.h
#[derive(Parser)]
#[command(name = "nis-compile")]
#[command(version)]
struct Args {
    /// Path to slangc, or the directory containing it (defaults to slangc on PATH)
    #[arg(long)]
    slangc: Option<PathBuf>,

    /// Path to dxc; without it hlsl 5.0 is used instead of 6.2
    #[arg(long = "dxc_path")]
    dxc_path: Option<PathBuf>,

    /// Directory containing NIS_Main.hlsl
    #[arg(long = "input_path", default_value = DEFAULT_INPUT_DIR)]
    input_path: PathBuf,

    /// Directory to write NIS_shaders.h into
    #[arg(long = "output_path", default_value = ".")]
    output_path: PathBuf,

    /// How to build the shader model 6 permutations when dxc is missing
    #[arg(long = "modern_fallback", value_enum, default_value_t)]
    modern_fallback: ModernFallbackPolicy,

    /// Print the permutation matrix as json instead of compiling
    #[arg(long = "print_matrix")]
    print_matrix: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if args.print_matrix {
        let matrix = build_tasks::permutation_matrix(args.dxc_path.as_deref(), args.modern_fallback);
        println!("{}", serde_json::to_string_pretty(&matrix)?);
        return Ok(ExitCode::SUCCESS);
    }

    let slangc = match resolve_slangc(args.slangc.as_deref()) {
        Ok(slangc) => slangc,
        Err(err) => {
            log::error!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    log::info!("slangc : {}", slangc.display());
    match &args.dxc_path {
        Some(dxc_path) => log::info!("dxc_path : {}", dxc_path.display()),
        None => log::info!("dxc_path : None"),
    }
    log::info!("input_path : {}", args.input_path.display());
    log::info!("output_path : {}", args.output_path.display());

    if args.dxc_path.is_none() {
        log::warn!("dxc-path not specified. hlsl 5.0 will be used instead of 6.2");
    }

    let config = Config {
        input_dir: args.input_path,
        output_dir: args.output_path,
        dxc_path: args.dxc_path,
        modern_fallback: args.modern_fallback,
    };
    let compiler = SlangcCompiler::new(slangc);

    match build_tasks::write_shader_header(&config, &compiler) {
        Ok(summary) => {
            log::info!(
                "embedded {} shaders, skipped {}, omitted {}",
                summary.embedded.len(),
                summary.skipped.len(),
                summary.omitted.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        // already logged by the sweep
        Err(ShaderGenError::CompilerLaunch { .. }) => Ok(ExitCode::FAILURE),
        Err(err) => Err(err.into()),
    }
}
