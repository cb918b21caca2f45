use std::path::{Path, PathBuf};

use serde::Serialize;

use super::permutations::{PermutationKey, TargetKind};

/// A profile bucket for the block and thread group sizing heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArchClass {
    NvidiaGeneric,
    NvidiaGenericFp16,
    AmdGeneric,
    IntelGeneric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimalArguments {
    pub block_width: u32,
    pub block_height: u32,
    pub thread_group_size: u32,
}

/// Sizing for one architecture class, per scaling mode.
struct ArchTableRow {
    arch: ArchClass,
    scaling: OptimalArguments,
    sharpen: OptimalArguments,
}

const fn args(block_height: u32, thread_group_size: u32) -> OptimalArguments {
    OptimalArguments {
        block_width: 32,
        block_height,
        thread_group_size,
    }
}

/// One row per class, in `ArchClass` declaration order.
const ARCH_TABLE: [ArchTableRow; 4] = [
    ArchTableRow {
        arch: ArchClass::NvidiaGeneric,
        scaling: args(24, 128),
        sharpen: args(32, 128),
    },
    ArchTableRow {
        arch: ArchClass::NvidiaGenericFp16,
        scaling: args(32, 128),
        sharpen: args(32, 128),
    },
    ArchTableRow {
        arch: ArchClass::AmdGeneric,
        scaling: args(24, 256),
        sharpen: args(24, 256),
    },
    ArchTableRow {
        arch: ArchClass::IntelGeneric,
        scaling: args(24, 256),
        sharpen: args(24, 256),
    },
];

pub fn optimal_arguments(arch: ArchClass, scaling: bool) -> OptimalArguments {
    let row = &ARCH_TABLE[arch as usize];
    debug_assert_eq!(row.arch, arch);
    if scaling { row.scaling } else { row.sharpen }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetFormat {
    Dxbc,
    Dxil,
    Spirv,
}

impl TargetFormat {
    pub fn slangc_name(self) -> &'static str {
        match self {
            TargetFormat::Dxbc => "dxbc",
            TargetFormat::Dxil => "dxil",
            TargetFormat::Spirv => "spirv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShaderModel {
    Sm5_0,
    Sm6_2,
}

impl ShaderModel {
    pub fn profile_name(self) -> &'static str {
        match self {
            ShaderModel::Sm5_0 => "sm_5_0",
            ShaderModel::Sm6_2 => "sm_6_2",
        }
    }
}

/// What to do with modern (DXIL) permutations when no dxc is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum ModernFallbackPolicy {
    /// compile with the legacy settings, keeping the modern file extension
    #[default]
    Legacy,
    /// leave modern permutations out of the header
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerProfile {
    pub arch: ArchClass,
    pub target_format: TargetFormat,
    pub shader_model: ShaderModel,
    pub block_width: u32,
    pub block_height: u32,
    pub thread_group_size: u32,
    pub uses_half_precision: bool,
    pub uses_explicit_bindings: bool,
    pub requires_unroll_workaround: bool,
    /// passed through to slangc for dxil output
    pub dxc_path: Option<PathBuf>,
}

impl CompilerProfile {
    /// Returns None when the permutation should not be compiled at all.
    pub fn derive(
        key: &PermutationKey,
        dxc_path: Option<&Path>,
        policy: ModernFallbackPolicy,
    ) -> Option<Self> {
        let profile = match (key.target, dxc_path) {
            (TargetKind::Legacy, _) => Self::legacy(key.scaling),
            (TargetKind::Modern, Some(dxc_path)) => {
                let arch = ArchClass::NvidiaGenericFp16;
                Self {
                    target_format: TargetFormat::Dxil,
                    shader_model: ShaderModel::Sm6_2,
                    uses_half_precision: true,
                    uses_explicit_bindings: false,
                    requires_unroll_workaround: false,
                    dxc_path: Some(dxc_path.to_path_buf()),
                    ..Self::for_arch(arch, key.scaling)
                }
            }
            (TargetKind::Modern, None) => match policy {
                ModernFallbackPolicy::Legacy => Self::legacy(key.scaling),
                ModernFallbackPolicy::Skip => return None,
            },
            (TargetKind::Portable, _) => {
                let arch = ArchClass::NvidiaGenericFp16;
                Self {
                    target_format: TargetFormat::Spirv,
                    shader_model: ShaderModel::Sm6_2,
                    uses_half_precision: true,
                    uses_explicit_bindings: true,
                    requires_unroll_workaround: false,
                    dxc_path: None,
                    ..Self::for_arch(arch, key.scaling)
                }
            }
        };

        Some(profile)
    }

    fn legacy(scaling: bool) -> Self {
        Self {
            target_format: TargetFormat::Dxbc,
            shader_model: ShaderModel::Sm5_0,
            uses_half_precision: false,
            uses_explicit_bindings: false,
            requires_unroll_workaround: true,
            dxc_path: None,
            ..Self::for_arch(ArchClass::NvidiaGeneric, scaling)
        }
    }

    fn for_arch(arch: ArchClass, scaling: bool) -> Self {
        let OptimalArguments {
            block_width,
            block_height,
            thread_group_size,
        } = optimal_arguments(arch, scaling);

        Self {
            arch,
            target_format: TargetFormat::Dxbc,
            shader_model: ShaderModel::Sm5_0,
            block_width,
            block_height,
            thread_group_size,
            uses_half_precision: false,
            uses_explicit_bindings: false,
            requires_unroll_workaround: false,
            dxc_path: None,
        }
    }

    pub fn is_hlsl_6_2(&self) -> bool {
        self.shader_model == ShaderModel::Sm6_2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::shaders::permutations::all_permutations;

    #[test]
    fn table_rows_follow_class_order() {
        let classes = [
            ArchClass::NvidiaGeneric,
            ArchClass::NvidiaGenericFp16,
            ArchClass::AmdGeneric,
            ArchClass::IntelGeneric,
        ];

        for class in classes {
            assert_eq!(ARCH_TABLE[class as usize].arch, class);
        }
    }

    #[test]
    fn lookup_table() {
        use ArchClass::*;

        assert_eq!(optimal_arguments(NvidiaGeneric, true), args(24, 128));
        assert_eq!(optimal_arguments(NvidiaGeneric, false), args(32, 128));
        for scaling in [false, true] {
            assert_eq!(optimal_arguments(NvidiaGenericFp16, scaling), args(32, 128));
            assert_eq!(optimal_arguments(AmdGeneric, scaling), args(24, 256));
            assert_eq!(optimal_arguments(IntelGeneric, scaling), args(24, 256));
        }
    }

    #[test]
    fn every_permutation_matches_lookup_table() {
        let dxc = PathBuf::from("/opt/dxc/bin");
        for dxc_path in [None, Some(dxc.as_path())] {
            for key in all_permutations() {
                let profile =
                    CompilerProfile::derive(&key, dxc_path, ModernFallbackPolicy::Legacy).unwrap();

                let expected = match (profile.arch, key.scaling) {
                    (ArchClass::NvidiaGeneric, true) => args(24, 128),
                    (ArchClass::NvidiaGeneric, false) => args(32, 128),
                    (ArchClass::NvidiaGenericFp16, _) => args(32, 128),
                    (_, _) => args(24, 256),
                };

                let actual = OptimalArguments {
                    block_width: profile.block_width,
                    block_height: profile.block_height,
                    thread_group_size: profile.thread_group_size,
                };
                assert_eq!(actual, expected, "{}", key.symbol());
            }
        }
    }

    #[test]
    fn target_settings() {
        let dxc = PathBuf::from("/opt/dxc/bin");
        let keys = all_permutations();
        let [legacy, modern, portable] = [keys[0], keys[1], keys[2]];

        let profile = CompilerProfile::derive(&legacy, None, ModernFallbackPolicy::Legacy).unwrap();
        assert_eq!(profile.target_format, TargetFormat::Dxbc);
        assert_eq!(profile.shader_model, ShaderModel::Sm5_0);
        assert!(profile.requires_unroll_workaround);
        assert!(!profile.uses_half_precision);

        let profile =
            CompilerProfile::derive(&modern, Some(dxc.as_path()), ModernFallbackPolicy::Legacy).unwrap();
        assert_eq!(profile.target_format, TargetFormat::Dxil);
        assert_eq!(profile.shader_model, ShaderModel::Sm6_2);
        assert_eq!(profile.dxc_path.as_deref(), Some(dxc.as_path()));
        assert!(profile.uses_half_precision);
        assert!(!profile.uses_explicit_bindings);

        let profile =
            CompilerProfile::derive(&portable, None, ModernFallbackPolicy::Legacy).unwrap();
        assert_eq!(profile.target_format, TargetFormat::Spirv);
        assert!(profile.uses_explicit_bindings);
        assert!(profile.uses_half_precision);
        assert!(profile.is_hlsl_6_2());
    }

    #[test]
    fn modern_without_dxc_uses_legacy_settings() {
        for key in all_permutations() {
            if key.target != TargetKind::Modern {
                continue;
            }

            let legacy_key = PermutationKey {
                target: TargetKind::Legacy,
                ..key
            };
            let fallback = CompilerProfile::derive(&key, None, ModernFallbackPolicy::Legacy);
            let legacy = CompilerProfile::derive(&legacy_key, None, ModernFallbackPolicy::Legacy);
            assert_eq!(fallback, legacy);
            assert!(key.artifact_file_name().ends_with(".cs6"));

            assert_eq!(
                CompilerProfile::derive(&key, None, ModernFallbackPolicy::Skip),
                None
            );
        }
    }
}
