use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HdrMode {
    None,
    Linear,
    Pq,
}

impl HdrMode {
    pub const ALL: [HdrMode; 3] = [HdrMode::None, HdrMode::Linear, HdrMode::Pq];

    /// the value of the NIS_HDR_MODE define
    pub fn define_value(self) -> u32 {
        match self {
            HdrMode::None => 0,
            HdrMode::Linear => 1,
            HdrMode::Pq => 2,
        }
    }
}

/// The kind of compiled output a permutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetKind {
    /// DXBC for shader model 5
    Legacy,
    /// DXIL for shader model 6, compiled through dxc
    Modern,
    /// SPIR-V
    Portable,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Legacy, TargetKind::Modern, TargetKind::Portable];

    pub fn extension(self) -> &'static str {
        match self {
            TargetKind::Legacy => "cs",
            TargetKind::Modern => "cs6",
            TargetKind::Portable => "spv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermutationKey {
    pub scaling: bool,
    pub viewport: bool,
    pub hdr: HdrMode,
    pub target: TargetKind,
}

impl PermutationKey {
    /// ie 'NIS_Scaler_V1_H2'
    pub fn base_name(&self) -> String {
        output_filename(self.scaling, self.viewport, self.hdr)
    }

    /// the array symbol in the generated header, ie 'NIS_Scaler_V1_H2_cs6'
    pub fn symbol(&self) -> String {
        format!("{}_{}", self.base_name(), self.target.extension())
    }

    /// the name of the compiled binary, ie 'NIS_Scaler_V1_H2.cs6'
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{}", self.base_name(), self.target.extension())
    }

    pub fn artifact_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.artifact_file_name())
    }
}

pub fn output_filename(scaling: bool, viewport: bool, hdr: HdrMode) -> String {
    let mode = if scaling { "Scaler" } else { "Sharpen" };
    let viewport = u32::from(viewport);
    let hdr = hdr.define_value();

    format!("NIS_{mode}_V{viewport}_H{hdr}")
}

/// Every permutation, in sweep order: scaling, then viewport, then hdr, then target.
pub fn all_permutations() -> Vec<PermutationKey> {
    let mut keys = Vec::with_capacity(36);
    for scaling in [false, true] {
        for viewport in [false, true] {
            for hdr in HdrMode::ALL {
                for target in TargetKind::ALL {
                    keys.push(PermutationKey {
                        scaling,
                        viewport,
                        hdr,
                        target,
                    });
                }
            }
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_filenames() {
        assert_eq!(output_filename(true, true, HdrMode::Pq), "NIS_Scaler_V1_H2");
        assert_eq!(output_filename(false, false, HdrMode::None), "NIS_Sharpen_V0_H0");
    }

    #[test]
    fn thirty_six_unique_permutations() {
        let keys = all_permutations();
        assert_eq!(keys.len(), 36);

        let mut symbols: Vec<String> = keys.iter().map(PermutationKey::symbol).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), 36);
    }

    #[test]
    fn enumeration_order() {
        let names: Vec<String> = all_permutations()
            .iter()
            .take(7)
            .map(PermutationKey::artifact_file_name)
            .collect();

        assert_eq!(
            names,
            [
                "NIS_Sharpen_V0_H0.cs",
                "NIS_Sharpen_V0_H0.cs6",
                "NIS_Sharpen_V0_H0.spv",
                "NIS_Sharpen_V0_H1.cs",
                "NIS_Sharpen_V0_H1.cs6",
                "NIS_Sharpen_V0_H1.spv",
                "NIS_Sharpen_V0_H2.cs",
            ]
        );

        let last = all_permutations().last().copied().unwrap();
        assert_eq!(last.symbol(), "NIS_Scaler_V1_H2_spv");
    }
}
