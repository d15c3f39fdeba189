use crate::suzy::control::{CollisionControl, Control0, Control1};
use crate::suzy::line::LINE_END;
use crate::suzy::memory::Bus;
use crate::suzy::{Suzy, SCREEN_HEIGHT, SCREEN_WIDTH, SPR_RDWR_CYC};

/// Behaviour switches for quirks the hardware leaves ambiguous.
#[derive(Clone, Copy, Default)]
pub struct Config {
    /// Route sprites whose origin lies outside the visible window through
    /// the half-plane clip path. The hardware test for this is disputed
    /// (it breaks at least one title), so it defaults to off and every
    /// quadrant renders.
    pub origin_offscreen_test: bool,
}

// Clip-path quadrant remaps for the mirror flips.
const VQUADFLIP: [usize; 4] = [1, 0, 3, 2];
const HQUADFLIP: [usize; 4] = [3, 2, 1, 0];

impl Suzy {
    /// Walk the SCB chain from SCBNEXT and paint every sprite in it,
    /// running to completion. Returns the RAM cycles consumed, for the
    /// caller to charge against the CPU. A chain that fails to terminate
    /// within 4096 SCBs raises the bus halt signal and returns 0.
    pub fn paint_sprites(&mut self, bus: &mut Bus) -> u32 {
        if !self.bus_enable || !self.sprite_go {
            return 0;
        }

        self.cycles_used = 0;
        let mut scb_count = 0;

        loop {
            let mut ever_on_screen = false;

            // Only the high byte of SCBNEXT terminates the chain; the
            // hardware never checks the low byte.
            if self.scbnext.value() & 0xff00 == 0 {
                self.sys.engine_busy = false;
                self.sprite_go = false;
                break;
            }
            self.sys.engine_busy = true;

            self.tmpadr.set(self.scbnext.value());
            self.scbadr.set(self.scbnext.value());

            self.control0 = Control0(bus.ram.peek(self.tmpadr.value()));
            self.tmpadr.advance(1);

            self.control1 = Control1(bus.ram.peek(self.tmpadr.value()));
            self.tmpadr.advance(1);

            self.spr_coll = CollisionControl(bus.ram.peek(self.tmpadr.value()));
            self.tmpadr.advance(1);

            self.scbnext.set(bus.ram.peek_word(self.tmpadr.value()));
            self.tmpadr.advance(2);

            self.cycles_used += 5 * SPR_RDWR_CYC;

            self.collision = 0;

            if !self.control1.skip_sprite() {
                self.load_sprite_parameters(bus);
                self.render_quadrants(bus, &mut ever_on_screen);

                // Deposit the accumulated collision number back into the
                // SCB for the CPU to pick up.
                if self.collisions_enabled() && self.control0.sprite_type().deposits_collision() {
                    let deposit = self.scbadr.value().wrapping_add(self.colloff.value());
                    bus.ram.poke(deposit, self.collision);
                }

                // In EVERON mode bit 7 of the deposit byte reports whether
                // any pixel of this sprite landed on screen (0 = yes).
                if self.everon {
                    let deposit = self.scbadr.value().wrapping_add(self.colloff.value());
                    let mut data = bus.ram.peek(deposit);
                    if !ever_on_screen {
                        data |= 0x80;
                    } else {
                        data &= 0x7f;
                    }
                    bus.ram.poke(deposit, data);
                }
            }

            scb_count += 1;

            // A chain longer than this has looped back on itself. Stop
            // the whole machine, otherwise the caller would come straight
            // back in.
            if scb_count > 4096 {
                *bus.halt = true;
                return 0;
            }
        }

        self.cycles_used
    }

    /// Read the positional and optional reload sections of the current
    /// SCB, leaving TMPADR past everything consumed.
    fn load_sprite_parameters(&mut self, bus: &mut Bus) {
        self.sprdline.set(bus.ram.peek_word(self.tmpadr.value()));
        self.tmpadr.advance(2);

        self.hposstrt.set(bus.ram.peek_word(self.tmpadr.value()));
        self.tmpadr.advance(2);

        self.vposstrt.set(bus.ram.peek_word(self.tmpadr.value()));
        self.tmpadr.advance(2);

        self.cycles_used += 6 * SPR_RDWR_CYC;

        match self.control1.reload_depth() {
            1 => {
                self.sprhsiz.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.sprvsiz.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.cycles_used += 4 * SPR_RDWR_CYC;
            }
            2 => {
                self.sprhsiz.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.sprvsiz.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.stretch.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.cycles_used += 6 * SPR_RDWR_CYC;
            }
            3 => {
                self.sprhsiz.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.sprvsiz.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.stretch.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.tilt.set(bus.ram.peek_word(self.tmpadr.value()));
                self.tmpadr.advance(2);

                self.cycles_used += 8 * SPR_RDWR_CYC;
            }
            _ => {}
        }

        if !self.control1.reload_palette() {
            for slot in 0..8 {
                let data = bus.ram.peek(self.tmpadr.value());
                self.tmpadr.advance(1);
                self.pens.set_pair(slot, data);
            }
            self.cycles_used += 8 * SPR_RDWR_CYC;
        }
    }

    /// Render the sprite's four quadrants in hardware order, starting
    /// from the quadrant selected by SPRCTL1.
    fn render_quadrants(&mut self, bus: &mut Bus, ever_on_screen: &mut bool) {
        // Stretch and tilt apply only when the SCB reloaded them.
        let enable_stretch = self.control1.reload_depth() >= 2;
        let enable_tilt = self.control1.reload_depth() == 3;

        let screen_h_start = self.hoff.signed() as i32;
        let screen_h_end = screen_h_start + SCREEN_WIDTH;
        let screen_v_start = self.voff.signed() as i32;
        let screen_v_end = screen_v_start + SCREEN_HEIGHT;

        // World midpoints for the clip path's half-plane tests.
        let world_h_mid = screen_h_start + 0x8000 + SCREEN_WIDTH / 2;
        let world_v_mid = screen_v_start + 0x8000 + SCREEN_HEIGHT / 2;

        // Drawing order is SE, NE, NW, SW from whichever quadrant the
        // sprite starts in:
        //
        //      2 | 1
        //     -------
        //      3 | 0
        let mut quadrant: usize = match (self.control1.start_left(), self.control1.start_up()) {
            (false, false) => 0,
            (false, true) => 1,
            (true, true) => 2,
            (true, false) => 3,
        };

        let superclip = self.config.origin_offscreen_test && {
            let h = self.hposstrt.signed() as i32;
            let v = self.vposstrt.signed() as i32;
            h < screen_h_start || h >= screen_h_end || v < screen_v_start || v >= screen_v_end
        };

        'quadrants: for pass in 0..4 {
            // The origin in unsigned world coordinates, for the clip test.
            let sprite_h = self.hposstrt.value() as i32;
            let sprite_v = self.vposstrt.value() as i32;

            // Draw direction for this quadrant; the mirror flips invert it.
            let mut hsign: i32 = if quadrant == 0 || quadrant == 1 { 1 } else { -1 };
            let mut vsign: i32 = if quadrant == 0 || quadrant == 3 { 1 } else { -1 };

            if self.control0.vflip() {
                vsign = -vsign;
            }
            if self.control0.hflip() {
                hsign = -hsign;
            }

            // On the fast path every quadrant renders and clipping happens
            // per pixel. On the clip path a whole quadrant is skipped when
            // the screen cannot intersect it, judged against the world
            // midpoints with the flips folded into the quadrant number.
            let render = if superclip {
                let mut modquad = quadrant;
                if self.control0.vflip() {
                    modquad = VQUADFLIP[modquad];
                }
                if self.control0.hflip() {
                    modquad = HQUADFLIP[modquad];
                }

                match modquad {
                    3 => {
                        (sprite_h >= screen_h_start || sprite_h < world_h_mid)
                            && (sprite_v < screen_v_end || sprite_v > world_v_mid)
                    }
                    2 => {
                        (sprite_h >= screen_h_start || sprite_h < world_h_mid)
                            && (sprite_v >= screen_v_start || sprite_v < world_v_mid)
                    }
                    1 => {
                        (sprite_h < screen_h_end || sprite_h > world_h_mid)
                            && (sprite_v >= screen_v_start || sprite_v < world_v_mid)
                    }
                    _ => {
                        (sprite_h < screen_h_end || sprite_h > world_h_mid)
                            && (sprite_v < screen_v_end || sprite_v > world_v_mid)
                    }
                }
            } else {
                true
            };

            if render {
                let mut voff = self.vposstrt.signed() as i32 - screen_v_start;

                self.tiltacum.set(0);

                if vsign == 1 {
                    self.vsizacum.set(self.vsizoff.value());
                } else {
                    self.vsizacum.set(0);
                }

                // The first rendered quadrant fixes the reference sign;
                // quadrants drawing the other way start one pixel over.
                // Without this, multi-quadrant sprites double their centre
                // row and column and look squashed.
                if pass == 0 {
                    self.vquadoff = vsign;
                }
                if vsign != self.vquadoff {
                    voff += vsign;
                }

                loop {
                    // Vertical scaling: whole destination lines carried by
                    // the accumulator's high byte.
                    self.vsizacum.advance(self.sprvsiz.value());
                    let pixel_height = self.vsizacum.take_high() as i32;

                    let offset = self.line_init(bus.ram, 0) as u16;
                    self.sprdoff.set(offset);

                    if self.sprdoff.value() == 1 {
                        // End of quadrant.
                        self.sprdline.advance(1);
                        break;
                    }
                    if self.sprdoff.value() == 0 {
                        // End of sprite data.
                        break 'quadrants;
                    }

                    for _ in 0..pixel_height {
                        // The sprite has moved past the screen edge in the
                        // draw direction; the rest of the quadrant cannot
                        // come back.
                        if vsign == 1 && voff >= SCREEN_HEIGHT {
                            break;
                        }
                        if vsign == -1 && voff < 0 {
                            break;
                        }

                        if voff >= 0 && voff < SCREEN_HEIGHT {
                            self.render_line(bus, voff, hsign, pass, screen_h_start, ever_on_screen);
                        }

                        voff += vsign;

                        // Per destination line the stretch and tilt
                        // accumulators walk the size and skew.
                        if enable_stretch {
                            self.sprhsiz.advance(self.stretch.value());
                        }
                        if enable_tilt {
                            self.tiltacum.advance(self.tilt.value());
                        }
                    }

                    // Vertical stretch is documented per destination line
                    // but takes effect when the source line is read.
                    if self.sys.vstretch {
                        self.sprvsiz
                            .advance(self.stretch.value().wrapping_mul(pixel_height as u16));
                    }

                    self.sprdline.advance(self.sprdoff.value());
                }
            } else {
                // Not rendering this quadrant: still walk the line offsets
                // to find where the next quadrant's data starts.
                loop {
                    let offset = self.line_init(bus.ram, 0) as u16;
                    self.sprdoff.set(offset);
                    self.sprdline.advance(offset);

                    if self.sprdoff.value() == 1 {
                        break;
                    }
                    if self.sprdoff.value() == 0 {
                        break 'quadrants;
                    }
                }
            }

            quadrant = (quadrant + 1) & 0x03;
        }
    }

    /// Decode one source line into one destination row, scaling each
    /// source pixel horizontally by the size accumulator.
    fn render_line(
        &mut self,
        bus: &mut Bus,
        voff: i32,
        hsign: i32,
        pass: u32,
        screen_h_start: i32,
        ever_on_screen: &mut bool,
    ) {
        // Horizontal start is the sprite origin plus the accumulated
        // tilt, whole pixels only; the fraction stays behind.
        let tilt_step = (self.tiltacum.signed() >> 8) as u16;
        self.hposstrt.advance(tilt_step);
        self.tiltacum.clear_high();

        let mut hoff = self.hposstrt.signed() as i32 - screen_h_start;

        if hsign == 1 {
            self.hsizacum.set(self.hsizoff.value());
        } else {
            self.hsizacum.set(0);
        }

        // Same one-pixel anchor correction as the vertical axis.
        if pass == 0 {
            self.hquadoff = hsign;
        }
        if hsign != self.hquadoff {
            hoff += hsign;
        }

        self.line_init(bus.ram, voff as u32);
        let mut on_screen = false;

        loop {
            let pixel = self.line_get_pixel(bus.ram);
            if pixel == LINE_END {
                break;
            }

            self.hsizacum.advance(self.sprhsiz.value());
            let pixel_width = self.hsizacum.take_high() as i32;

            for _ in 0..pixel_width {
                if hoff >= 0 && hoff < SCREEN_WIDTH {
                    self.process_pixel(bus.ram, hoff as u32, pixel);
                    on_screen = true;
                    *ever_on_screen = true;
                } else if on_screen {
                    // Walked off the far edge; nothing further on this
                    // run can land back on screen.
                    break;
                }
                hoff += hsign;
            }
        }
    }
}
