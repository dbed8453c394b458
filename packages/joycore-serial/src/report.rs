//! Human-readable rendering of config blobs and their decoded form.

use std::io::{self, Write};

use crate::config::{
    config::{AXES_OFFSET, COUNTS_OFFSET, USB_OFFSET},
    AxisSlot, DecodedConfig, InputSource, LogicalInput, SlotState,
};

const ROW_LEN: usize = 16;

/// Formats `data` as rows of 16 bytes, labelled with offsets starting at
/// `base`:
///
/// ```text
/// 0000: 43 59 4F 4A 07 00 E0 00 ...                    CYOJ....
/// ```
pub fn hex_dump(data: &[u8], base: usize) -> String {
    data.chunks(ROW_LEN)
        .enumerate()
        .map(|(row, chunk)| {
            let hex = (0..ROW_LEN)
                .map(|i| match chunk.get(i) {
                    Some(byte) => format!("{byte:02X}"),
                    None => "  ".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            let ascii: String = chunk
                .iter()
                .map(|&b| if (32..=126).contains(&b) { b as char } else { '.' })
                .collect();

            format!("{:04X}: {hex:<48} {ascii}", base + row * ROW_LEN)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hex dumps of the header, USB descriptor, counts and the first two axis
/// windows. Sections past the end of `blob` come out empty.
pub fn write_key_sections(out: &mut impl Write, blob: &[u8]) -> io::Result<()> {
    let sections = [
        ("Header", 0..USB_OFFSET),
        ("USB Descriptor", USB_OFFSET..COUNTS_OFFSET),
        ("Counts", COUNTS_OFFSET..AXES_OFFSET),
        ("Axis 0", AXES_OFFSET..AXES_OFFSET + ROW_LEN),
        ("Axis 1", AXES_OFFSET + ROW_LEN..AXES_OFFSET + 2 * ROW_LEN),
    ];

    writeln!(out, "\n=== HEX DUMP OF KEY SECTIONS ===")?;
    for (i, (name, range)) in sections.into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{name} (0x{:02X}-0x{:02X}):", range.start, range.end - 1)?;

        let bytes = &blob[range.start.min(blob.len())..range.end.min(blob.len())];
        if !bytes.is_empty() {
            writeln!(out, "{}", hex_dump(bytes, range.start))?;
        }
    }
    writeln!(out, "=== END HEX DUMP ===")
}

/// The status label of an axis slot in the debug view.
pub fn slot_label(state: SlotState) -> String {
    match state {
        SlotState::Enabled => "ENABLED".to_string(),
        SlotState::Disabled => "disabled".to_string(),
        SlotState::Uninitialized => "UNINIT(0xFF)".to_string(),
        SlotState::Suspicious(value) => format!("INVALID({value:02X})"),
    }
}

/// Writes the full configuration report.
pub fn write_config(out: &mut impl Write, config: &DecodedConfig) -> io::Result<()> {
    writeln!(out, "\n=== CONFIGURATION DECODE ===")?;

    let info = &config.header;
    let header = &info.header;
    writeln!(out, "\nHEADER:")?;
    writeln!(
        out,
        "  Magic: 0x{:08X} ('{}') - {}",
        header.magic,
        header.magic_str(),
        if info.is_valid() { "VALID" } else { "INVALID" }
    )?;
    writeln!(out, "  Version: {}", header.version)?;
    if config.declared_size_matches() {
        writeln!(out, "  Size: {} bytes", header.size)?;
    } else {
        writeln!(
            out,
            "  Size: {} bytes (blob is {} bytes)",
            header.size, config.total_size
        )?;
    }
    writeln!(
        out,
        "  Checksum: 0x{:08X} ({}, computed 0x{:08X})",
        header.checksum,
        if config.checksum_matches() { "match" } else { "MISMATCH" },
        config.computed_checksum
    )?;
    if let Some(err) = &info.magic_error {
        writeln!(out, "  ERROR: {err}")?;
    }

    if let Some(usb) = &config.usb {
        writeln!(out, "\nUSB DESCRIPTOR:")?;
        writeln!(out, "  VID: 0x{:04X}", usb.vendor_id)?;
        writeln!(out, "  PID: 0x{:04X}", usb.product_id)?;
        writeln!(out, "  Manufacturer: '{}'", usb.manufacturer.to_string_lossy())?;
        writeln!(out, "  Product: '{}'", usb.product.to_string_lossy())?;
    }

    let counts = &config.counts;
    writeln!(out, "\nCOUNTS:")?;
    writeln!(out, "  Pin Map Entries: {}", counts.pin_map_count)?;
    writeln!(out, "  Logical Inputs: {}", counts.logical_input_count)?;
    writeln!(out, "  Shift Registers: {}", counts.shift_reg_count)?;
    if !config.counts_within_limits() {
        writeln!(out, "  WARNING: counts exceed firmware limits")?;
    }

    let enabled: Vec<&AxisSlot> = config.enabled_axes().collect();
    if !enabled.is_empty() {
        writeln!(out, "\nAXES ({} enabled):", enabled.len())?;
        for slot in enabled {
            write_axis(out, slot)?;
        }
    }

    if !config.all_axes.is_empty() {
        writeln!(out, "\nDEBUG - ALL AXES RAW DATA:")?;
        for slot in &config.all_axes {
            writeln!(
                out,
                "  Axis {} [{}]: enabled={:02X} pin={:02X}",
                slot.index,
                slot_label(slot.state),
                slot.config.enabled,
                slot.config.pin.0
            )?;
            writeln!(out, "       Raw: {}", hex::encode(slot.raw))?;
        }
    }

    if !config.pin_map.is_empty() {
        writeln!(out, "\nPIN MAP ({} entries):", config.pin_map.len())?;
        for (i, entry) in config.pin_map.iter().enumerate() {
            writeln!(
                out,
                "  [{i}] Pin '{}': {} (name hex: {})",
                entry.name.to_string_lossy(),
                entry.pin_type,
                hex::encode(entry.name.as_bytes())
            )?;
        }
    }

    if !config.logical_inputs.is_empty() {
        writeln!(out, "\nLOGICAL INPUTS ({} entries):", config.logical_inputs.len())?;
        for (i, input) in config.logical_inputs.iter().enumerate() {
            write_logical_input(out, i, input)?;
        }
    }

    writeln!(
        out,
        "\nTOTAL SIZE: {} bytes (parsed: {} bytes, expected: {} bytes)",
        config.total_size,
        config.parsed_size,
        config.expected_size()
    )?;
    if config.unparsed_bytes() > 0 {
        writeln!(out, "  {} trailing bytes not parsed", config.unparsed_bytes())?;
    }
    if !config.short_reads.is_empty() {
        writeln!(out, "\nSHORT READS:")?;
        for short in &config.short_reads {
            writeln!(out, "  {short}")?;
        }
    }

    writeln!(out, "\n=== END CONFIGURATION ===")
}

fn write_axis(out: &mut impl Write, slot: &AxisSlot) -> io::Result<()> {
    let axis = &slot.config;

    match slot.state {
        SlotState::Suspicious(value) => writeln!(
            out,
            "  Axis {}: (suspicious enabled value 0x{value:02X})",
            slot.index
        )?,
        _ => writeln!(out, "  Axis {}:", slot.index)?,
    }
    writeln!(out, "    Pin: {} ({})", axis.pin, axis.pin.0)?;
    writeln!(out, "    Range: {} - {}", axis.min_value, axis.max_value)?;
    writeln!(
        out,
        "    Filter: {} (ewmaAlpha={})",
        axis.filter_level, axis.ewma_alpha
    )?;
    writeln!(out, "    Deadband: {}", axis.deadband)?;
    writeln!(out, "    Curve: {}", axis.curve)
}

fn write_logical_input(out: &mut impl Write, index: usize, input: &LogicalInput) -> io::Result<()> {
    writeln!(out, "  [{index}] {}:", input.input_type())?;

    write!(
        out,
        "    Button ID: {}, Behavior: {} ({}), Reverse: {}",
        input.joy_button_id,
        input.behavior.raw(),
        input.behavior,
        input.reverse
    )?;
    if let Some(latch) = input.latch_mode() {
        write!(out, ", LatchMode: {} ({latch})", latch.raw())?;
    }
    writeln!(out)?;

    match input.source {
        InputSource::Pin { pin } => writeln!(out, "    Pin: {pin}"),
        InputSource::Matrix { row, col } => writeln!(out, "    Matrix[{row},{col}]"),
        InputSource::ShiftReg {
            reg_index,
            bit_index,
        } => writeln!(out, "    ShiftReg[{reg_index}].bit{bit_index}"),
        InputSource::Encoder { data } => writeln!(out, "    Encoder data: {}", hex::encode(data)),
        InputSource::Unknown { data, .. } => writeln!(out, "    Raw data: {}", hex::encode(data)),
    }
}
