//! The Suzy coprocessor: a memory-mapped hardware block providing the
//! console's multiply/divide unit and its sprite engine. The CPU talks to
//! it through a 256-byte register window (`peek`/`poke`); the sprite
//! engine talks to the rest of the machine by reading and writing the
//! shared 64 KiB RAM directly (`paint_sprites`).

use control::{CollisionControl, Control0, Control1, PenPalette, SystemFlags};
use engine::Config;
use joypad::{Joystick, Switches};
use line::LineDecoder;
use math::MathUnit;
use memory::Bus;
use registers::{ByteHalf, MappedAddress, Reg16, WordReg};

pub mod control;
pub mod engine;
pub mod joypad;
pub mod line;
pub mod math;
pub mod memory;
pub mod pixels;
pub mod registers;
pub mod save_state;

pub const SCREEN_WIDTH: i32 = 160;
pub const SCREEN_HEIGHT: i32 = 102;

/// RAM cycles charged per byte the sprite engine reads or writes.
pub const SPR_RDWR_CYC: u32 = 3;

pub struct Suzy {
    // The 16-bit register window, in address order.
    pub(crate) tmpadr: Reg16,
    pub(crate) tiltacum: Reg16,
    pub(crate) hoff: Reg16,
    pub(crate) voff: Reg16,
    pub(crate) vidbas: Reg16,
    pub(crate) collbas: Reg16,
    pub(crate) vidadr: Reg16,
    pub(crate) colladr: Reg16,
    pub(crate) scbnext: Reg16,
    pub(crate) sprdline: Reg16,
    pub(crate) hposstrt: Reg16,
    pub(crate) vposstrt: Reg16,
    pub(crate) sprhsiz: Reg16,
    pub(crate) sprvsiz: Reg16,
    pub(crate) stretch: Reg16,
    pub(crate) tilt: Reg16,
    pub(crate) sprdoff: Reg16,
    pub(crate) sprvpos: Reg16,
    pub(crate) colloff: Reg16,
    pub(crate) vsizacum: Reg16,
    /// Horizontal scaling accumulator; engine-internal, not in the window.
    pub(crate) hsizacum: Reg16,
    pub(crate) hsizoff: Reg16,
    pub(crate) vsizoff: Reg16,
    pub(crate) scbadr: Reg16,
    pub(crate) procadr: Reg16,

    pub(crate) math: MathUnit,
    /// Tick cost of the last multiply or divide, for the host scheduler.
    pub(crate) math_ticks: u32,

    pub(crate) control0: Control0,
    pub(crate) control1: Control1,
    pub(crate) spr_coll: CollisionControl,
    pub(crate) sys: SystemFlags,
    pub(crate) sprinit: u8,
    pub(crate) bus_enable: bool,
    pub(crate) sprite_go: bool,
    pub(crate) everon: bool,

    pub(crate) pens: PenPalette,
    pub(crate) joystick: Joystick,
    pub(crate) switches: Switches,

    // Sprite engine working state.
    pub(crate) decoder: LineDecoder,
    pub(crate) line_base: u16,
    pub(crate) line_coll: u16,
    /// Largest collision number seen while painting the current sprite.
    pub(crate) collision: u8,
    /// Reference draw signs from the first rendered quadrant.
    pub(crate) hquadoff: i32,
    pub(crate) vquadoff: i32,
    pub(crate) cycles_used: u32,

    pub config: Config,
}

impl Suzy {
    pub fn new() -> Self {
        Self {
            tmpadr: Reg16::default(),
            tiltacum: Reg16::default(),
            hoff: Reg16::default(),
            voff: Reg16::default(),
            vidbas: Reg16::default(),
            collbas: Reg16::default(),
            vidadr: Reg16::default(),
            colladr: Reg16::default(),
            scbnext: Reg16::default(),
            sprdline: Reg16::default(),
            hposstrt: Reg16::default(),
            vposstrt: Reg16::default(),
            sprhsiz: Reg16::default(),
            sprvsiz: Reg16::default(),
            stretch: Reg16::default(),
            tilt: Reg16::default(),
            sprdoff: Reg16::default(),
            sprvpos: Reg16::default(),
            colloff: Reg16::default(),
            vsizacum: Reg16::default(),
            hsizacum: Reg16::default(),
            hsizoff: Reg16::new(0x007f),
            vsizoff: Reg16::new(0x007f),
            scbadr: Reg16::default(),
            procadr: Reg16::default(),

            math: MathUnit::new(),
            math_ticks: 0,

            control0: Control0::default(),
            control1: Control1::default(),
            spr_coll: CollisionControl::default(),
            sys: SystemFlags::new(),
            sprinit: 0,
            bus_enable: false,
            sprite_go: false,
            everon: false,

            pens: PenPalette::identity(),
            joystick: Joystick::default(),
            switches: Switches::default(),

            decoder: LineDecoder::new(),
            line_base: 0,
            line_coll: 0,
            collision: 0,
            hquadoff: 0,
            vquadoff: 0,
            cycles_used: 0,

            config: Config::default(),
        }
    }

    pub fn reset(&mut self) {
        let config = self.config;
        *self = Self::new();
        self.config = config;
    }

    /// Read one register-window slot. Only the low byte of `addr`
    /// selects; unmapped slots float high, write-only slots read zero.
    pub fn peek(&self, bus: &mut Bus, addr: u32) -> u8 {
        match MappedAddress::map(addr) {
            MappedAddress::Word(reg, half) => {
                let word = self.word(reg);
                match half {
                    ByteHalf::Low => word.low(),
                    ByteHalf::High => word.high(),
                }
            }
            MappedAddress::Math(byte) => self.math.byte(byte),

            MappedAddress::HardwareRevision => 0x01,
            MappedAddress::System => self.sys.read(bus.done_time != 0),
            MappedAddress::Joystick => self.joystick.read(self.sys.left_hand),
            MappedAddress::Switches => self.switches.0,

            MappedAddress::CartBank0 => bus.cart.peek_bank0(),
            MappedAddress::CartBank1 => bus.cart.peek_bank1(),

            // Write-only registers.
            MappedAddress::Control0
            | MappedAddress::Control1
            | MappedAddress::Collision
            | MappedAddress::Init
            | MappedAddress::BusEnable
            | MappedAddress::SpriteGo => 0x00,

            MappedAddress::Leds
            | MappedAddress::ParallelStatus
            | MappedAddress::ParallelData
            | MappedAddress::Howie
            | MappedAddress::Unmapped => 0xff,
        }
    }

    /// Write one register-window slot. Math trigger registers run their
    /// operation synchronously before this returns.
    pub fn poke(&mut self, bus: &mut Bus, addr: u32, data: u8) {
        match MappedAddress::map(addr) {
            MappedAddress::Word(reg, ByteHalf::Low) => self.word_mut(reg).set_low(data),
            MappedAddress::Word(reg, ByteHalf::High) => self.word_mut(reg).set_high(data),
            MappedAddress::Math(byte) => self.poke_math(byte, data),

            MappedAddress::Control0 => self.control0 = Control0(data),
            MappedAddress::Control1 => self.control1 = Control1(data),
            MappedAddress::Collision => self.spr_coll = CollisionControl(data),
            MappedAddress::Init => self.sprinit = data,
            MappedAddress::BusEnable => self.bus_enable = data & 0x01 != 0,
            MappedAddress::SpriteGo => {
                self.sprite_go = data & 0x01 != 0;
                self.everon = data & 0x04 != 0;
            }
            MappedAddress::System => self.sys.write(data),

            MappedAddress::CartBank0 => bus.cart.poke_bank0(data),
            MappedAddress::CartBank1 => bus.cart.poke_bank1(data),

            // Mapped but inert.
            MappedAddress::Leds
            | MappedAddress::ParallelStatus
            | MappedAddress::ParallelData
            | MappedAddress::Howie => {}

            // Read-only registers.
            MappedAddress::HardwareRevision
            | MappedAddress::Joystick
            | MappedAddress::Switches => {}

            MappedAddress::Unmapped => {}
        }
    }

    /// Tick cost of the most recent multiply or divide. Reported for the
    /// scheduler; never added to the sprite engine's cycle count.
    pub fn math_ticks(&self) -> u32 {
        self.math_ticks
    }

    /// Latch the raw joystick byte from the host's input layer.
    pub fn set_joystick(&mut self, data: u8) {
        self.joystick = Joystick(data);
    }

    /// Latch the console switches byte from the host's input layer.
    pub fn set_switches(&mut self, data: u8) {
        self.switches = Switches(data);
    }

    fn word(&self, reg: WordReg) -> &Reg16 {
        match reg {
            WordReg::Tmpadr => &self.tmpadr,
            WordReg::Tiltacum => &self.tiltacum,
            WordReg::Hoff => &self.hoff,
            WordReg::Voff => &self.voff,
            WordReg::Vidbas => &self.vidbas,
            WordReg::Collbas => &self.collbas,
            WordReg::Vidadr => &self.vidadr,
            WordReg::Colladr => &self.colladr,
            WordReg::ScbNext => &self.scbnext,
            WordReg::SprDLine => &self.sprdline,
            WordReg::HposStrt => &self.hposstrt,
            WordReg::VposStrt => &self.vposstrt,
            WordReg::SprHSiz => &self.sprhsiz,
            WordReg::SprVSiz => &self.sprvsiz,
            WordReg::Stretch => &self.stretch,
            WordReg::Tilt => &self.tilt,
            WordReg::SprDOff => &self.sprdoff,
            WordReg::SprVPos => &self.sprvpos,
            WordReg::CollOff => &self.colloff,
            WordReg::VSizAcum => &self.vsizacum,
            WordReg::HSizOff => &self.hsizoff,
            WordReg::VSizOff => &self.vsizoff,
            WordReg::ScbAdr => &self.scbadr,
            WordReg::ProcAdr => &self.procadr,
        }
    }

    fn word_mut(&mut self, reg: WordReg) -> &mut Reg16 {
        match reg {
            WordReg::Tmpadr => &mut self.tmpadr,
            WordReg::Tiltacum => &mut self.tiltacum,
            WordReg::Hoff => &mut self.hoff,
            WordReg::Voff => &mut self.voff,
            WordReg::Vidbas => &mut self.vidbas,
            WordReg::Collbas => &mut self.collbas,
            WordReg::Vidadr => &mut self.vidadr,
            WordReg::Colladr => &mut self.colladr,
            WordReg::ScbNext => &mut self.scbnext,
            WordReg::SprDLine => &mut self.sprdline,
            WordReg::HposStrt => &mut self.hposstrt,
            WordReg::VposStrt => &mut self.vposstrt,
            WordReg::SprHSiz => &mut self.sprhsiz,
            WordReg::SprVSiz => &mut self.sprvsiz,
            WordReg::Stretch => &mut self.stretch,
            WordReg::Tilt => &mut self.tilt,
            WordReg::SprDOff => &mut self.sprdoff,
            WordReg::SprVPos => &mut self.sprvpos,
            WordReg::CollOff => &mut self.colloff,
            WordReg::VSizAcum => &mut self.vsizacum,
            WordReg::HSizOff => &mut self.hsizoff,
            WordReg::VSizOff => &mut self.vsizoff,
            WordReg::ScbAdr => &mut self.scbadr,
            WordReg::ProcAdr => &mut self.procadr,
        }
    }
}

impl Default for Suzy {
    fn default() -> Self {
        Self::new()
    }
}
