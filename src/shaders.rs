pub mod build_tasks;
pub mod compiler;
pub mod emit;
pub mod permutations;
pub mod profile;

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ShaderGenError {
    #[error("slangc not found")]
    CompilerNotFound,

    #[error("failed to launch shader compiler '{}': {source}", program.display())]
    CompilerLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShaderGenError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io { path, source }
    }
}
