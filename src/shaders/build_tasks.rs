use std::path::{Path, PathBuf};

use serde::Serialize;

use super::ShaderGenError;
use super::compiler::{CompileInvocation, ShaderCompiler};
use super::emit::append_artifact;
use super::permutations::{PermutationKey, all_permutations};
use super::profile::{CompilerProfile, ModernFallbackPolicy};

pub const SHADER_SOURCE_FILE_NAME: &str = "NIS_Main.hlsl";
pub const HEADER_FILE_NAME: &str = "NIS_shaders.h";
pub const DEFAULT_INPUT_DIR: &str = "NIS";

pub struct Config {
    /// the directory containing NIS_Main.hlsl
    pub input_dir: PathBuf,
    /// the directory to write the header (and temporary binaries) into
    pub output_dir: PathBuf,
    /// enables dxil output for the modern permutations
    pub dxc_path: Option<PathBuf>,
    pub modern_fallback: ModernFallbackPolicy,
}

impl Config {
    pub fn input_shader(&self) -> PathBuf {
        self.input_dir.join(SHADER_SOURCE_FILE_NAME)
    }

    pub fn header_path(&self) -> PathBuf {
        self.output_dir.join(HEADER_FILE_NAME)
    }
}

#[derive(Debug, Default)]
pub struct SweepSummary {
    /// symbols written to the header, in header order
    pub embedded: Vec<String>,
    /// permutations that produced no binary, or whose binary could not be embedded
    pub skipped: Vec<String>,
    /// modern permutations left out by the fallback policy
    pub omitted: Vec<String>,
}

/// One row of the resolved permutation matrix.
#[derive(Debug, Serialize)]
pub struct MatrixEntry {
    pub key: PermutationKey,
    pub file_name: String,
    pub symbol: String,
    /// None when the fallback policy leaves the permutation out
    pub profile: Option<CompilerProfile>,
}

pub fn permutation_matrix(
    dxc_path: Option<&Path>,
    modern_fallback: ModernFallbackPolicy,
) -> Vec<MatrixEntry> {
    all_permutations()
        .into_iter()
        .map(|key| MatrixEntry {
            key,
            file_name: key.artifact_file_name(),
            symbol: key.symbol(),
            profile: CompilerProfile::derive(&key, dxc_path, modern_fallback),
        })
        .collect()
}

/// Compiles every permutation and writes the embedded binaries to NIS_shaders.h.
///
/// The header is recreated empty before the first compile. A compiler that
/// can't be launched aborts the sweep; a permutation that produces no binary
/// is skipped.
pub fn write_shader_header(
    config: &Config,
    compiler: &impl ShaderCompiler,
) -> Result<SweepSummary, ShaderGenError> {
    let header_path = config.header_path();
    let input_shader = config.input_shader();

    std::fs::create_dir_all(&config.output_dir).map_err(ShaderGenError::io(&config.output_dir))?;
    std::fs::File::create(&header_path).map_err(ShaderGenError::io(&header_path))?;

    let mut summary = SweepSummary::default();

    for entry in permutation_matrix(config.dxc_path.as_deref(), config.modern_fallback) {
        let Some(profile) = entry.profile else {
            log::debug!("omitting {} without dxc", entry.file_name);
            summary.omitted.push(entry.symbol);
            continue;
        };

        let output = entry.key.artifact_path(&config.output_dir);
        let invocation = CompileInvocation::new(entry.key, &profile, &input_shader, output);

        remove_stale_artifact(&invocation.output);

        log::debug!("{}", invocation.command_line(compiler.program()));
        if let Err(err) = compiler.compile(&invocation) {
            log::error!("{err}");
            return Err(err);
        }

        if !invocation.output.exists() {
            log::debug!("no output for {}", entry.file_name);
            summary.skipped.push(entry.symbol);
            continue;
        }

        log::info!("{}", entry.file_name);
        match append_artifact(&header_path, &invocation.output, &entry.symbol) {
            Ok(()) => {
                summary.embedded.push(entry.symbol);
                if let Err(err) = std::fs::remove_file(&invocation.output) {
                    log::warn!(
                        "failed to remove '{}': {err}",
                        invocation.output.display()
                    );
                }
            }
            Err(err) => {
                log::warn!("{err}");
                summary.skipped.push(entry.symbol);
            }
        }
    }

    log::info!("Output header file : {}", header_path.display());

    Ok(summary)
}

/// A binary left behind by an interrupted run must not be mistaken for fresh output.
fn remove_stale_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("removed stale '{}'", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("failed to remove stale '{}': {err}", path.display()),
    }
}
