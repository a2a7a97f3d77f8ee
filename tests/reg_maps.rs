// CLASSIFICATION: COMMUNITY
// Filename: reg_maps.rs v0.2
// Date Modified: 2026-01-19
// Author: Lukas Bower

//! Register-map integration over the RAM reference backend.

use std::sync::Arc;

use socmap::{
    Axis, MemBackend, RamBackend, RegMap, RegMapLayout, RegisterLayout, TracedBackend, Width,
};

fn msg_reg() -> Arc<RegisterLayout> {
    Arc::new(
        RegisterLayout::builder("MSG", Width::W64)
            .bits("TYPE", 55, 48)
            .bits("PAYLOAD", 47, 0)
            .build()
            .expect("valid layout"),
    )
}

fn irq_reg() -> Arc<RegisterLayout> {
    Arc::new(
        RegisterLayout::builder("IRQ_CFG", Width::W32)
            .bit("EN", 31)
            .bits("TARGET", 3, 0)
            .build()
            .expect("valid layout"),
    )
}

fn soc_layout() -> RegMapLayout {
    RegMapLayout::builder()
        .reg("MBOX_SEND", 0x8000, &msg_reg())
        .reg("MBOX_RECV", 0x8008, &msg_reg())
        .array("IRQ_CFG", [Axis::new(0x0, 0x40)], &irq_reg())
        .array(
            "CPU_MBOX",
            [Axis::counted(0x4000, 4, 0x100), Axis::counted(0x0, 2, 0x8)],
            &msg_reg(),
        )
        .build()
        .expect("valid map")
}

#[test]
fn field_writes_reach_backend_bits() {
    let ram = RamBackend::new(0x10000);
    let map = soc_layout();
    let regs = RegMap::bind(&map, &ram, 0x0);

    let send = regs.reg("MBOX_SEND").expect("declared");
    send.update(|reg| {
        reg.set_field("TYPE", 8);
    })
    .expect("update");

    let reg = send.read().expect("read");
    assert_eq!(reg.field("TYPE"), 8);
    assert_eq!(reg.field("PAYLOAD"), 0);
    assert_eq!(reg.raw(), 8 << 48);
    // Little-endian byte 6 holds bits 55:48.
    assert_eq!(ram.snapshot()[0x8006], 8);

    send.update(|reg| {
        reg.set_field("PAYLOAD", 0xdead_beef);
    })
    .expect("update");
    let reg = send.read().expect("read");
    assert_eq!(reg.field("TYPE"), 8);
    assert_eq!(reg.field("PAYLOAD"), 0xdead_beef);
}

#[test]
fn array_elements_resolve_by_index_tuple() {
    let ram = RamBackend::new(0x10000);
    let map = soc_layout();
    let regs = RegMap::bind(&map, &ram, 0x0);

    let irqs = regs.array("IRQ_CFG").expect("declared");
    assert_eq!(irqs.len(), 16);
    for line in 0..16usize {
        irqs.at(&[line])
            .expect("in range")
            .update(|reg| {
                reg.set_field("EN", 1).set_field("TARGET", (line % 4) as u64);
            })
            .expect("update");
    }
    let third = irqs.at(&[3]).expect("in range");
    assert_eq!(third.addr(), 0xc);
    assert_eq!(third.read().expect("read").field("TARGET"), 3);
    assert!(irqs.at(&[16]).is_err());

    let mbox = regs.array("CPU_MBOX").expect("declared");
    let elem = mbox.at(&[2, 1]).expect("in range");
    assert_eq!(elem.addr(), 0x4000 + 2 * 0x100 + 8);
    elem.write_raw(0x1234).expect("write");
    assert_eq!(elem.read_raw().expect("read"), 0x1234);
    assert!(mbox.at(&[2]).is_err());
    assert!(mbox.at(&[4, 0]).is_err());
}

#[test]
fn addresses_reverse_map_to_logical_names() {
    let ram = RamBackend::new(0x10000);
    let map = soc_layout();
    let regs = RegMap::bind(&map, &ram, 0x1_0000);

    assert_eq!(regs.name_at(0x1_8000).as_deref(), Some("MBOX_SEND"));
    assert_eq!(regs.name_at(0x1_000c).as_deref(), Some("IRQ_CFG[3]"));
    assert_eq!(regs.name_at(0x1_4208).as_deref(), Some("CPU_MBOX[2, 1]"));
    assert_eq!(regs.name_at(0x1_4004), None);
    assert_eq!(regs.name_at(0x9000), None);

    let (name, index, layout) = map.lookup_offset(0x4108).expect("covered");
    assert_eq!(name, "CPU_MBOX");
    assert_eq!(index, Some(&[1u32, 1][..]));
    assert_eq!(layout.width(), Width::W64);
}

#[test]
fn dump_lists_every_entry_in_address_order() {
    let ram = RamBackend::new(0x10000);
    let map = soc_layout();
    let regs = RegMap::bind(&map, &ram, 0x0);

    regs.reg("MBOX_SEND")
        .expect("declared")
        .write_raw(0x8 << 48)
        .expect("write");

    let dump = regs.dump().expect("dump");
    let lines: Vec<&str> = dump.lines().collect();
    // 16 IRQ lines, 8 mailbox elements, 2 scalars.
    assert_eq!(lines.len(), 26);
    assert!(lines[0].starts_with("0x0+000000 IRQ_CFG[0]"), "{}", lines[0]);
    assert!(lines[16].starts_with("0x0+004000 CPU_MBOX[0, 0]"), "{}", lines[16]);
    assert!(lines[24].contains("MBOX_SEND"), "{}", lines[24]);
    assert!(lines[24].contains("TYPE=0x8"), "{}", lines[24]);
    assert!(lines[25].contains("MBOX_RECV"), "{}", lines[25]);
}

#[test]
fn traced_backend_is_transparent_to_accessors() {
    let traced = TracedBackend::new("soc", RamBackend::new(0x10000));
    let map = soc_layout();
    let regs = RegMap::bind(&map, &traced, 0x0);

    let recv = regs.reg("MBOX_RECV").expect("declared");
    recv.write_raw(0x42).expect("write");
    assert_eq!(recv.read_raw().expect("read"), 0x42);
    assert_eq!(traced.read(0x8008, Width::W64).expect("read"), 0x42);
}

#[cfg(feature = "serde")]
#[test]
fn declarative_types_externalize() {
    use socmap::{FieldSpec, Zone};

    let spec = FieldSpec::Bits { msb: 55, lsb: 48 };
    let json = serde_json::to_string(&spec).expect("serialize");
    let back: FieldSpec = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, spec);

    let zone = Zone::new(0x4000, 0x8000);
    let json = serde_json::to_string(&zone).expect("serialize");
    let back: Zone = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, zone);
}
