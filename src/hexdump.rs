// Author: Lukas Bower
// Purpose: Render abbreviated hex dumps of memory windows.

//! Hex dump formatting with repeated-row elision.

use core::fmt::{self, Write};

fn hex_half(row: &[u8]) -> String {
    let parts: Vec<String> = row.iter().map(|byte| format!("{byte:02x}")).collect();
    parts.join(" ")
}

fn ascii_gutter(row: &[u8]) -> String {
    row.iter()
        .map(|&byte| {
            if (0x20..0x7f).contains(&byte) {
                byte as char
            } else {
                '.'
            }
        })
        .collect()
}

/// Write a hex dump of `bytes` to `out`, 16 bytes per row with an ASCII
/// gutter. `base` offsets the printed addresses. Runs of identical rows
/// collapse to a single `*` line.
pub fn hexdump_into<W: Write>(out: &mut W, bytes: &[u8], base: u64) -> fmt::Result {
    let mut previous: Option<&[u8]> = None;
    let mut elided = false;
    for (at, row) in bytes.chunks(16).enumerate() {
        let addr = base + (at as u64) * 16;
        if previous == Some(row) {
            if !elided {
                writeln!(out, "{addr:08x}  *")?;
                elided = true;
            }
            continue;
        }
        previous = Some(row);
        elided = false;
        let head = &row[..row.len().min(8)];
        let tail = row.get(8..).unwrap_or(&[]);
        writeln!(
            out,
            "{addr:08x}  {:<23}  {:<23}  |{:<16}|",
            hex_half(head),
            hex_half(tail),
            ascii_gutter(row)
        )?;
    }
    Ok(())
}

/// Render a hex dump of `bytes` into a `String`.
#[must_use]
pub fn hexdump(bytes: &[u8], base: u64) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = hexdump_into(&mut out, bytes, base);
    out
}
