use std::fs;
use std::path::Path;
use std::time::Instant;

use dafsa_compiler::{parse_word_list, DafsaBuilder};
use dafsa_core::Dafsa;

#[derive(Debug, Clone)]
pub struct CompileStats {
    pub lines: usize,
    pub entries: usize,
    pub words: usize,
    pub parse_ms: f64,
    pub build_ms: f64,
}

/// Parse every input list and compile the union into one graph.
pub fn compile_graph_bytes(
    inputs: &[String],
    reversed: bool,
    verbose: bool,
) -> Result<(Vec<u8>, CompileStats), String> {
    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    let start = Instant::now();
    let mut builder = DafsaBuilder::new().reversed(reversed);
    let mut lines = 0usize;
    let mut entries = 0usize;

    for (list_id, path) in inputs.iter().enumerate() {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
        let parsed = parse_word_list(&content).map_err(|e| format!("{}: {}", path, e))?;

        let line_count = content.lines().count();
        lines += line_count;
        entries += parsed.len();

        if verbose {
            println!(
                "  [{}] {} - {} lines, {} words",
                list_id,
                Path::new(path).file_name().unwrap_or_default().to_string_lossy(),
                line_count,
                parsed.len()
            );
        }

        builder
            .extend_entries(&parsed)
            .map_err(|e| format!("{}: {}", path, e))?;
    }

    let parse_time = start.elapsed();
    let build_start = Instant::now();
    let bytes = builder.build().map_err(|e| e.to_string())?;
    let build_time = build_start.elapsed();

    Dafsa::new(&bytes).map_err(|e| format!("Generated graph failed validation: {}", e))?;

    let stats = CompileStats {
        lines,
        entries,
        words: builder.len(),
        parse_ms: parse_time.as_secs_f64() * 1000.0,
        build_ms: build_time.as_secs_f64() * 1000.0,
    };
    Ok((bytes, stats))
}

pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
    }
    fs::write(path, bytes).map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

pub fn read_graph(path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("dafsa-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_compile_merges_lists() {
        let first = temp_path("first.gperf");
        let second = temp_path("second.gperf");
        fs::write(&first, "%%\ncom, 0\nco.uk, 0\n%%\n").unwrap();
        fs::write(&second, "blogspot.com, 4\ncom, 0\n").unwrap();

        let inputs = vec![
            first.display().to_string(),
            second.display().to_string(),
        ];
        let (bytes, stats) = compile_graph_bytes(&inputs, true, false).unwrap();
        assert_eq!(stats.entries, 4);
        assert_eq!(stats.words, 3);

        let dafsa = Dafsa::new(&bytes).unwrap();
        assert_eq!(dafsa.lookup_suffix(true, "x.blogspot.com").length, 12);
        assert_eq!(dafsa.lookup_suffix(false, "x.blogspot.com").length, 3);

        let out = temp_path("out/graph.dafsa");
        write_output(&out, &bytes).unwrap();
        assert_eq!(read_graph(&out).unwrap(), bytes);

        let _ = fs::remove_file(first);
        let _ = fs::remove_file(second);
        let _ = fs::remove_dir_all(out.parent().unwrap());
    }

    #[test]
    fn test_compile_reports_conflicts() {
        let path = temp_path("conflict.gperf");
        fs::write(&path, "com, 0\ncom, 1\n").unwrap();

        let err = compile_graph_bytes(&[path.display().to_string()], false, false).unwrap_err();
        assert!(err.contains("conflicting"), "{err}");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_compile_requires_input() {
        assert!(compile_graph_bytes(&[], false, false).is_err());
    }
}
