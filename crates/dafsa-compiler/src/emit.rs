//! Rust source output for compiled graphs.

use std::fmt::Write;

const BYTES_PER_LINE: usize = 12;

/// Render `bytes` as a `pub static` byte array named `name`, ready to be
/// `include!`d and passed to `Dafsa::from_trusted`.
pub fn emit_rust_source(name: &str, bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 6 + 128);
    out.push_str("// Generated by dafsa-compiler. Do not edit.\n\n");
    let _ = writeln!(out, "pub static {name}: [u8; {}] = [", bytes.len());
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|b| format!("0x{b:02X},")).collect();
        let _ = writeln!(out, "    {}", line.join(" "));
    }
    out.push_str("];\n");
    out
}
