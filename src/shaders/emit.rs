use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use askama::Template;

const BYTES_PER_LINE: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to read compiled shader '{}': {source}", path.display())]
    ReadArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to header '{}': {source}", path.display())]
    WriteHeader {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] askama::Error),
}

#[derive(Template)]
#[template(path = "byte_array.h.askama", escape = "none")]
struct ByteArrayBlock<'a> {
    symbol: &'a str,
    lines: Vec<String>,
    len: usize,
}

/// Renders the hex body of the array, 16 values to a line.
/// Every line but the last ends with a comma.
fn hex_lines(bytes: &[u8]) -> Vec<String> {
    let line_count = bytes.len().div_ceil(BYTES_PER_LINE);

    bytes
        .chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(index, chunk)| {
            let values: Vec<String> = chunk.iter().map(|byte| format!("0x{byte:02x}")).collect();
            let separator = if index + 1 < line_count { "," } else { "" };
            format!("  {}{separator}", values.join(", "))
        })
        .collect()
}

/// The C declarations for one embedded binary: the array and its '_len',
/// followed by a blank line.
pub fn render_byte_array(symbol: &str, bytes: &[u8]) -> Result<String, EmitError> {
    let block = ByteArrayBlock {
        symbol,
        lines: hex_lines(bytes),
        len: bytes.len(),
    };

    let mut rendered = block.render()?;
    rendered.push_str("\n\n");

    Ok(rendered)
}

/// Reads a compiled binary and appends its declarations to the header.
pub fn append_artifact(header: &Path, artifact: &Path, symbol: &str) -> Result<(), EmitError> {
    let bytes = std::fs::read(artifact).map_err(|source| EmitError::ReadArtifact {
        path: artifact.to_path_buf(),
        source,
    })?;

    let block = render_byte_array(symbol, &bytes)?;

    let write_header = |source: std::io::Error| EmitError::WriteHeader {
        path: header.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(header)
        .map_err(write_header)?;
    file.write_all(block.as_bytes()).map_err(write_header)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::util::tmp_dir;

    #[test]
    fn seventeen_bytes() {
        let bytes: Vec<u8> = (0..17).map(|i| i * 15).collect();

        let block = render_byte_array("X_bin", &bytes).unwrap();

        insta::assert_snapshot!(block.trim_end(), @r"
        unsigned char X_bin[] = {
          0x00, 0x0f, 0x1e, 0x2d, 0x3c, 0x4b, 0x5a, 0x69, 0x78, 0x87, 0x96, 0xa5, 0xb4, 0xc3, 0xd2, 0xe1,
          0xf0
        };
        unsigned int X_bin_len = 17;
        ");
    }

    #[test]
    fn exact_formatting() {
        let block = render_byte_array("X_bin", &[0xab; 17]).unwrap();

        let row = ["0xab"; 16].join(", ");
        let expected = format!(
            "unsigned char X_bin[] = {{\n  {row},\n  0xab\n}};\nunsigned int X_bin_len = 17;\n\n"
        );
        assert_eq!(block, expected);
    }

    #[test]
    fn full_final_line_has_no_trailing_comma() {
        let block = render_byte_array("Y_spv", &[1; 32]).unwrap();
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[1].ends_with("0x01,"));
        assert!(lines[2].ends_with("0x01"));
        assert!(lines.iter().all(|line| !line.ends_with(' ')));
    }

    #[test]
    fn empty_artifact() {
        let block = render_byte_array("Z_cs", &[]).unwrap();

        assert_eq!(block, "unsigned char Z_cs[] = {\n};\nunsigned int Z_cs_len = 0;\n\n");
    }

    #[test]
    fn appends_to_existing_header() {
        let dir = tmp_dir("emit-append");
        let header = dir.join("NIS_shaders.h");
        let first = dir.join("A.cs");
        let second = dir.join("B.cs");
        std::fs::write(&first, [0x01, 0x02]).unwrap();
        std::fs::write(&second, [0xff]).unwrap();

        append_artifact(&header, &first, "A_cs").unwrap();
        append_artifact(&header, &second, "B_cs").unwrap();

        let content = std::fs::read_to_string(&header).unwrap();
        assert_eq!(
            content,
            "unsigned char A_cs[] = {\n  0x01, 0x02\n};\nunsigned int A_cs_len = 2;\n\n\
             unsigned char B_cs[] = {\n  0xff\n};\nunsigned int B_cs_len = 1;\n\n"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unreadable_artifact() {
        let dir = tmp_dir("emit-missing");
        let header = dir.join("NIS_shaders.h");

        let result = append_artifact(&header, &dir.join("missing.spv"), "missing_spv");

        assert!(matches!(result, Err(EmitError::ReadArtifact { .. })));
        assert!(!header.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
