use crate::common::{addr, Bench};

#[test]
fn word_registers_read_back() {
    let mut bench = Bench::new();

    bench.poke_word(addr::TILTACUML, 0x125a);
    assert_eq!(bench.peek(addr::TILTACUML), 0x5a);
    assert_eq!(bench.peek(addr::TILTACUMH), 0x12);
}

#[test]
fn low_byte_write_clears_high_byte() {
    let mut bench = Bench::new();

    bench.poke(addr::HOFFH, 0x12);
    bench.poke(addr::HOFFL, 0x34);

    assert_eq!(bench.peek(addr::HOFFL), 0x34);
    assert_eq!(bench.peek(addr::HOFFH), 0x00);
}

#[test]
fn high_byte_write_preserves_low_byte() {
    let mut bench = Bench::new();

    bench.poke(addr::VOFFL, 0x34);
    bench.poke(addr::VOFFH, 0x12);

    assert_eq!(bench.peek(addr::VOFFL), 0x34);
    assert_eq!(bench.peek(addr::VOFFH), 0x12);
}

#[test]
fn only_the_low_address_byte_selects() {
    let mut bench = Bench::new();

    bench.poke(0xfc04, 0x77);
    assert_eq!(bench.peek(addr::HOFFL), 0x77);
    assert_eq!(bench.peek(0x1234_fc04), 0x77);
}

#[test]
fn reset_state() {
    let mut bench = Bench::new();

    // Size offsets power on at 0x007F.
    assert_eq!(bench.peek(addr::HSIZOFFL), 0x7f);
    assert_eq!(bench.peek(addr::HSIZOFFH), 0x00);
    assert_eq!(bench.peek(addr::VSIZOFFL), 0x7f);
    assert_eq!(bench.peek(addr::VSIZOFFH), 0x00);

    // Math registers power on all-ones.
    for a in [
        addr::MATHA,
        addr::MATHB,
        addr::MATHC,
        addr::MATHD,
        addr::MATHE,
        addr::MATHF,
        addr::MATHG,
        addr::MATHH,
        addr::MATHJ,
        addr::MATHK,
        addr::MATHL,
        addr::MATHM,
        addr::MATHN,
        addr::MATHP,
    ] {
        assert_eq!(bench.peek(a), 0xff);
    }

    // Pens power on as the identity mapping.
    let state = bench.suzy.save_state();
    let expected: Vec<u8> = (0..16).collect();
    assert_eq!(state.pens, expected);
}

#[test]
fn hardware_revision_reads_one() {
    let mut bench = Bench::new();
    assert_eq!(bench.peek(addr::SUZYHREV), 0x01);
}

#[test]
fn unmapped_addresses_float_high() {
    let mut bench = Bench::new();

    assert_eq!(bench.peek(0x40), 0xff);
    assert_eq!(bench.peek(0xff), 0xff);

    // Unmapped writes are ignored without disturbing anything.
    bench.poke(0x40, 0x55);
    assert_eq!(bench.peek(0x40), 0xff);
}

#[test]
fn write_only_registers_read_zero() {
    let mut bench = Bench::new();

    bench.poke(addr::SPRCTL0, 0xc4);
    bench.poke(addr::SPRCTL1, 0xff);
    bench.poke(addr::SPRINIT, 0xfc);
    bench.poke(addr::SUZYBUSEN, 0x01);
    bench.poke(addr::SPRGO, 0x01);

    assert_eq!(bench.peek(addr::SPRCTL0), 0x00);
    assert_eq!(bench.peek(addr::SPRCTL1), 0x00);
    assert_eq!(bench.peek(addr::SPRINIT), 0x00);
    assert_eq!(bench.peek(addr::SUZYBUSEN), 0x00);
    assert_eq!(bench.peek(addr::SPRGO), 0x00);
}

#[test]
fn read_only_registers_ignore_writes() {
    let mut bench = Bench::new();

    bench.poke(addr::SUZYHREV, 0x55);
    assert_eq!(bench.peek(addr::SUZYHREV), 0x01);

    bench.suzy.set_joystick(0x00);
    bench.poke(addr::JOYSTICK, 0xff);
    assert_eq!(bench.peek(addr::JOYSTICK), 0x00);
}

#[test]
fn sprsys_reports_engine_pending_from_the_scheduler() {
    let mut bench = Bench::new();

    assert_eq!(bench.peek(addr::SPRSYS) & 0x01, 0);
    bench.done_time = 120;
    assert_ne!(bench.peek(addr::SPRSYS) & 0x01, 0);
}

#[test]
fn sprsys_flags_read_back() {
    let mut bench = Bench::new();

    // vstretch + signed math.
    bench.poke(addr::SPRSYS, 0x90);
    let value = bench.peek(addr::SPRSYS);
    assert_ne!(value & 0x10, 0);
    // Bit 7 reads math-in-progress, not the signed-math setting.
    assert_eq!(value & 0x80, 0);
    assert!(bench.suzy.save_state().signed_math);
}

#[test]
fn joystick_swaps_directions_unless_left_handed() {
    let mut bench = Bench::new();

    bench.suzy.set_joystick(0b1010_0101);

    // Right-handed (default): left/right and up/down pairs swap.
    assert_eq!(bench.peek(addr::JOYSTICK), 0b0101_0101);

    // Left-handed: raw latch.
    bench.poke(addr::SPRSYS, 0x08);
    assert_eq!(bench.peek(addr::JOYSTICK), 0b1010_0101);
}

#[test]
fn switches_read_back_raw() {
    let mut bench = Bench::new();

    bench.suzy.set_switches(0x05);
    assert_eq!(bench.peek(addr::SWITCHES), 0x05);
}

#[test]
fn cartridge_ports_delegate_to_the_cart() {
    let mut bench = Bench::new();

    bench.poke(addr::RCART0, 0x11);
    bench.poke(addr::RCART1, 0x22);
    assert_eq!(bench.cart.bank0_writes, vec![0x11]);
    assert_eq!(bench.cart.bank1_writes, vec![0x22]);

    assert_eq!(bench.peek(addr::RCART0), 0xab);
    assert_eq!(bench.peek(addr::RCART1), 0xcd);
}

#[test]
fn save_and_restore_round_trip() {
    let mut bench = Bench::new();

    bench.poke_word(addr::VIDBASL, 0x2000);
    bench.poke_word(addr::COLLBASL, 0x3000);
    bench.poke(addr::SPRSYS, 0x80);
    bench.poke(addr::MATHD, 0x34);
    bench.poke(addr::MATHC, 0x12);
    bench.suzy.set_joystick(0x42);

    let state = bench.suzy.save_state();

    let mut restored = Bench::new();
    restored.suzy.restore_state(&state).unwrap();

    assert_eq!(restored.peek(addr::VIDBASL), bench.peek(addr::VIDBASL));
    assert_eq!(restored.peek(addr::VIDBASH), 0x20);
    assert_eq!(restored.peek(addr::COLLBASH), 0x30);
    assert_eq!(restored.peek(addr::MATHC), bench.peek(addr::MATHC));
    assert_eq!(restored.peek(addr::MATHD), bench.peek(addr::MATHD));
    assert!(restored.suzy.save_state().signed_math);
    bench.poke(addr::SPRSYS, 0x08);
    restored.poke(addr::SPRSYS, 0x08);
    assert_eq!(restored.peek(addr::JOYSTICK), bench.peek(addr::JOYSTICK));
}

#[test]
fn restore_rejects_malformed_pen_count() {
    let mut bench = Bench::new();

    let mut state = bench.suzy.save_state();
    state.pens.pop();
    assert!(bench.suzy.restore_state(&state).is_err());
}
