use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::util::executable_file_name;

use super::ShaderGenError;
use super::permutations::PermutationKey;
use super::profile::CompilerProfile;

pub const SLANGC: &str = "slangc";

/// One compiler run for one permutation.
#[derive(Debug)]
pub struct CompileInvocation {
    pub key: PermutationKey,
    /// where the compiler is expected to write the binary
    pub output: PathBuf,
    pub args: Vec<OsString>,
}

impl CompileInvocation {
    pub fn new(key: PermutationKey, profile: &CompilerProfile, input: &Path, output: PathBuf) -> Self {
        let args = slangc_arguments(&key, profile, input, &output);

        Self { key, output, args }
    }

    pub fn command_line(&self, program: &Path) -> String {
        let mut line = program.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }

        line
    }
}

pub trait ShaderCompiler {
    fn program(&self) -> &Path;

    /// Runs the compiler to completion.
    /// Only fails when the compiler could not be run at all;
    /// a failed compilation shows up as a missing output file.
    fn compile(&self, invocation: &CompileInvocation) -> Result<(), ShaderGenError>;
}

pub struct SlangcCompiler {
    program: PathBuf,
}

impl SlangcCompiler {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl ShaderCompiler for SlangcCompiler {
    fn program(&self) -> &Path {
        &self.program
    }

    fn compile(&self, invocation: &CompileInvocation) -> Result<(), ShaderGenError> {
        let status = Command::new(&self.program)
            .args(&invocation.args)
            .status()
            .map_err(|source| ShaderGenError::CompilerLaunch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            log::warn!(
                "slangc exited with {status} for {}",
                invocation.key.artifact_file_name()
            );
        }

        Ok(())
    }
}

/// Finds slangc from an explicit path (the executable or its directory),
/// falling back to a PATH lookup.
pub fn resolve_slangc(slangc: Option<&Path>) -> Result<PathBuf, ShaderGenError> {
    let Some(slangc) = slangc else {
        return which::which(SLANGC).map_err(|_| ShaderGenError::CompilerNotFound);
    };

    let candidate = if slangc.is_dir() {
        slangc.join(executable_file_name(SLANGC))
    } else {
        slangc.to_path_buf()
    };

    if candidate.is_file() {
        return Ok(candidate);
    }

    which::which(&candidate).map_err(|_| ShaderGenError::CompilerNotFound)
}

fn define(name: &str, value: impl std::fmt::Display) -> [OsString; 2] {
    ["-D".into(), format!("{name}={value}").into()]
}

fn flag(value: bool) -> u32 {
    u32::from(value)
}

/// The slangc command line for one permutation, excluding the program itself.
pub fn slangc_arguments(
    key: &PermutationKey,
    profile: &CompilerProfile,
    input: &Path,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![];

    args.extend(["-target".into(), profile.target_format.slangc_name().into()]);
    if let Some(dxc_path) = &profile.dxc_path {
        args.extend(["-dxc-path".into(), dxc_path.clone().into_os_string()]);
    }

    if profile.requires_unroll_workaround {
        args.extend(define("NIS_UNROLL_INNER", ""));
    }

    args.extend(define("NIS_SCALER", flag(key.scaling)));
    args.extend(define("NIS_GLSL", 0));
    args.extend(define("NIS_BLOCK_WIDTH", profile.block_width));
    args.extend(define("NIS_BLOCK_HEIGHT", profile.block_height));
    args.extend(define("NIS_THREAD_GROUP_SIZE", profile.thread_group_size));
    args.extend(define("NIS_VIEWPORT_SUPPORT", flag(key.viewport)));
    args.extend(define("NIS_HDR_MODE", key.hdr.define_value()));
    args.extend(define("NIS_HLSL_6_2", flag(profile.is_hlsl_6_2())));
    args.extend(define("NIS_DXC", flag(profile.uses_explicit_bindings)));
    args.extend(define(
        "NIS_USE_HALF_PRECISION",
        flag(profile.uses_half_precision),
    ));

    args.extend([
        "-entry".into(),
        "main".into(),
        "-stage".into(),
        "compute".into(),
        "-profile".into(),
        profile.shader_model.profile_name().into(),
        "-O3".into(),
        "-o".into(),
        output.as_os_str().to_owned(),
        input.as_os_str().to_owned(),
    ]);

    args
}
