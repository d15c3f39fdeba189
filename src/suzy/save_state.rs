use nanoserde::{DeRon, SerRon};

use crate::suzy::control::{CollisionControl, Control0, Control1};
use crate::suzy::joypad::{Joystick, Switches};
use crate::suzy::line::LineType;
use crate::suzy::registers::Reg16;
use crate::suzy::Suzy;

/// Everything needed to reconstruct the chip mid-frame: the register
/// window, the math unit and its sign tracks, the decomposed control
/// flags, and the sprite engine's line-decoder working state. The shared
/// RAM is the machine's to save, not Suzy's.
#[derive(SerRon, DeRon)]
pub struct SuzyState {
    pub tmpadr: u16,
    pub tiltacum: u16,
    pub hoff: u16,
    pub voff: u16,
    pub vidbas: u16,
    pub collbas: u16,
    pub vidadr: u16,
    pub colladr: u16,
    pub scbnext: u16,
    pub sprdline: u16,
    pub hposstrt: u16,
    pub vposstrt: u16,
    pub sprhsiz: u16,
    pub sprvsiz: u16,
    pub stretch: u16,
    pub tilt: u16,
    pub sprdoff: u16,
    pub sprvpos: u16,
    pub colloff: u16,
    pub vsizacum: u16,
    pub hsizacum: u16,
    pub hsizoff: u16,
    pub vsizoff: u16,
    pub scbadr: u16,
    pub procadr: u16,

    pub abcd: u32,
    pub efgh: u32,
    pub jklm: u32,
    pub np: u16,
    pub ab_sign: i8,
    pub cd_sign: i8,
    pub efgh_sign: i8,

    pub sprctl0: u8,
    pub sprctl1: u8,
    pub sprcoll: u8,
    pub sprinit: u8,

    pub stop_on_current: bool,
    pub unsafe_access: bool,
    pub left_hand: bool,
    pub vstretch: bool,
    pub no_collide: bool,
    pub accumulate: bool,
    pub signed_math: bool,
    pub engine_busy: bool,
    pub last_carry: bool,
    pub mathbit: bool,
    pub math_in_progress: bool,

    pub bus_enable: bool,
    pub sprite_go: bool,
    pub everon: bool,

    pub pens: Vec<u8>,
    pub joystick: u8,
    pub switches: u8,

    pub line_type: LineType,
    pub line_shift_reg: u32,
    pub line_shift_count: u32,
    pub line_repeat_count: u32,
    pub line_pixel: u32,
    pub line_packet_bits_left: u32,
    pub line_base: u16,
    pub line_coll: u16,

    pub collision: u8,
    pub hquadoff: i32,
    pub vquadoff: i32,
}

impl SuzyState {
    pub fn capture(suzy: &Suzy) -> Self {
        Self {
            tmpadr: suzy.tmpadr.value(),
            tiltacum: suzy.tiltacum.value(),
            hoff: suzy.hoff.value(),
            voff: suzy.voff.value(),
            vidbas: suzy.vidbas.value(),
            collbas: suzy.collbas.value(),
            vidadr: suzy.vidadr.value(),
            colladr: suzy.colladr.value(),
            scbnext: suzy.scbnext.value(),
            sprdline: suzy.sprdline.value(),
            hposstrt: suzy.hposstrt.value(),
            vposstrt: suzy.vposstrt.value(),
            sprhsiz: suzy.sprhsiz.value(),
            sprvsiz: suzy.sprvsiz.value(),
            stretch: suzy.stretch.value(),
            tilt: suzy.tilt.value(),
            sprdoff: suzy.sprdoff.value(),
            sprvpos: suzy.sprvpos.value(),
            colloff: suzy.colloff.value(),
            vsizacum: suzy.vsizacum.value(),
            hsizacum: suzy.hsizacum.value(),
            hsizoff: suzy.hsizoff.value(),
            vsizoff: suzy.vsizoff.value(),
            scbadr: suzy.scbadr.value(),
            procadr: suzy.procadr.value(),

            abcd: suzy.math.abcd(),
            efgh: suzy.math.efgh(),
            jklm: suzy.math.jklm(),
            np: suzy.math.np(),
            ab_sign: suzy.math.ab_sign,
            cd_sign: suzy.math.cd_sign,
            efgh_sign: suzy.math.efgh_sign,

            sprctl0: suzy.control0.0,
            sprctl1: suzy.control1.0,
            sprcoll: suzy.spr_coll.0,
            sprinit: suzy.sprinit,

            stop_on_current: suzy.sys.stop_on_current,
            unsafe_access: suzy.sys.unsafe_access,
            left_hand: suzy.sys.left_hand,
            vstretch: suzy.sys.vstretch,
            no_collide: suzy.sys.no_collide,
            accumulate: suzy.sys.accumulate,
            signed_math: suzy.sys.signed_math,
            engine_busy: suzy.sys.engine_busy,
            last_carry: suzy.sys.last_carry,
            mathbit: suzy.sys.mathbit,
            math_in_progress: suzy.sys.math_in_progress,

            bus_enable: suzy.bus_enable,
            sprite_go: suzy.sprite_go,
            everon: suzy.everon,

            pens: suzy.pens.pens().to_vec(),
            joystick: suzy.joystick.0,
            switches: suzy.switches.0,

            line_type: suzy.decoder.line_type,
            line_shift_reg: suzy.decoder.shift_reg,
            line_shift_count: suzy.decoder.shift_count,
            line_repeat_count: suzy.decoder.repeat_count,
            line_pixel: suzy.decoder.pixel,
            line_packet_bits_left: suzy.decoder.packet_bits_left,
            line_base: suzy.line_base,
            line_coll: suzy.line_coll,

            collision: suzy.collision,
            hquadoff: suzy.hquadoff,
            vquadoff: suzy.vquadoff,
        }
    }
}

impl Suzy {
    pub fn save_state(&self) -> SuzyState {
        SuzyState::capture(self)
    }

    pub fn restore_state(&mut self, state: &SuzyState) -> Result<(), String> {
        let pens: [u8; 16] = state
            .pens
            .as_slice()
            .try_into()
            .map_err(|_| format!("Save state has {} pens, expected 16", state.pens.len()))?;

        self.tmpadr = Reg16::new(state.tmpadr);
        self.tiltacum = Reg16::new(state.tiltacum);
        self.hoff = Reg16::new(state.hoff);
        self.voff = Reg16::new(state.voff);
        self.vidbas = Reg16::new(state.vidbas);
        self.collbas = Reg16::new(state.collbas);
        self.vidadr = Reg16::new(state.vidadr);
        self.colladr = Reg16::new(state.colladr);
        self.scbnext = Reg16::new(state.scbnext);
        self.sprdline = Reg16::new(state.sprdline);
        self.hposstrt = Reg16::new(state.hposstrt);
        self.vposstrt = Reg16::new(state.vposstrt);
        self.sprhsiz = Reg16::new(state.sprhsiz);
        self.sprvsiz = Reg16::new(state.sprvsiz);
        self.stretch = Reg16::new(state.stretch);
        self.tilt = Reg16::new(state.tilt);
        self.sprdoff = Reg16::new(state.sprdoff);
        self.sprvpos = Reg16::new(state.sprvpos);
        self.colloff = Reg16::new(state.colloff);
        self.vsizacum = Reg16::new(state.vsizacum);
        self.hsizacum = Reg16::new(state.hsizacum);
        self.hsizoff = Reg16::new(state.hsizoff);
        self.vsizoff = Reg16::new(state.vsizoff);
        self.scbadr = Reg16::new(state.scbadr);
        self.procadr = Reg16::new(state.procadr);

        self.math
            .set_registers(state.abcd, state.efgh, state.jklm, state.np);
        self.math.ab_sign = state.ab_sign;
        self.math.cd_sign = state.cd_sign;
        self.math.efgh_sign = state.efgh_sign;

        self.control0 = Control0(state.sprctl0);
        self.control1 = Control1(state.sprctl1);
        self.spr_coll = CollisionControl(state.sprcoll);
        self.sprinit = state.sprinit;

        self.sys.stop_on_current = state.stop_on_current;
        self.sys.unsafe_access = state.unsafe_access;
        self.sys.left_hand = state.left_hand;
        self.sys.vstretch = state.vstretch;
        self.sys.no_collide = state.no_collide;
        self.sys.accumulate = state.accumulate;
        self.sys.signed_math = state.signed_math;
        self.sys.engine_busy = state.engine_busy;
        self.sys.last_carry = state.last_carry;
        self.sys.mathbit = state.mathbit;
        self.sys.math_in_progress = state.math_in_progress;

        self.bus_enable = state.bus_enable;
        self.sprite_go = state.sprite_go;
        self.everon = state.everon;

        self.pens.set_pens(pens);
        self.joystick = Joystick(state.joystick);
        self.switches = Switches(state.switches);

        self.decoder.line_type = state.line_type;
        self.decoder.shift_reg = state.line_shift_reg;
        self.decoder.shift_count = state.line_shift_count;
        self.decoder.repeat_count = state.line_repeat_count;
        self.decoder.pixel = state.line_pixel;
        self.decoder.packet_bits_left = state.line_packet_bits_left;
        self.line_base = state.line_base;
        self.line_coll = state.line_coll;

        self.collision = state.collision;
        self.hquadoff = state.hquadoff;
        self.vquadoff = state.vquadoff;

        Ok(())
    }
}
