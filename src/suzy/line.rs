use nanoserde::{DeRon, SerRon};

use crate::suzy::memory::Ram;
use crate::suzy::{Suzy, SCREEN_WIDTH, SPR_RDWR_CYC};

/// Sentinel returned by the pixel stream when the current line is done.
/// Outside the 0-15 pen range, so it can never collide with real data.
pub const LINE_END: u32 = 0x8000_0000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, SerRon, DeRon)]
pub enum LineType {
    /// No packet decoded yet (or the stream is in a broken state).
    Error,
    /// The whole line is one literal packet; the pixel count comes from
    /// the line's byte length rather than a packet header.
    AbsoluteLiteral,
    /// Tagged packet: an explicit pixel per repeat.
    Literal,
    /// Tagged packet: one pixel repeated.
    Packed,
}

/// Bitstream state for the line currently being decoded. Bits shift in
/// at the bottom of `shift_reg` 24 at a time and leave from the top.
/// The RAM cursor itself is the TMPADR register on the chip.
#[derive(Clone)]
pub struct LineDecoder {
    pub line_type: LineType,
    pub shift_reg: u32,
    /// Valid bits currently loaded, counted from the MSB end.
    pub shift_count: u32,
    /// Pixels remaining in the current packet.
    pub repeat_count: u32,
    /// Most recent pixel, already mapped through the pen palette.
    pub pixel: u32,
    /// Bits this line's packets may still consume before the line ends.
    pub packet_bits_left: u32,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            line_type: LineType::Error,
            shift_reg: 0,
            shift_count: 0,
            repeat_count: 0,
            pixel: 0,
            packet_bits_left: 0,
        }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Suzy {
    /// Reset the decoder onto the line at SPRDLINE and read its offset
    /// byte (the distance to the next line; 1 ends the quadrant, 0 ends
    /// the sprite). Also latches the framebuffer and collision base
    /// addresses for destination row `voff`.
    pub(crate) fn line_init(&mut self, ram: &Ram, voff: u32) -> u32 {
        self.decoder = LineDecoder::new();
        // The offset byte itself is read through the shift register, so
        // the budget has to be open until the real one is known.
        self.decoder.packet_bits_left = 0xffff;

        self.tmpadr.set(self.sprdline.value());

        let offset = self.line_get_bits(ram, 8);

        // Maximum bits the packets of this line may use. A packet can
        // terminate the line early but can never read past this; the
        // budget counts down inside line_get_bits.
        self.decoder.packet_bits_left = offset.wrapping_sub(1).wrapping_mul(8);

        // Literal sprites have no packet headers; the pixel count for the
        // whole line comes straight from its byte length.
        if self.control1.literal() {
            self.decoder.line_type = LineType::AbsoluteLiteral;
            self.decoder.repeat_count =
                offset.wrapping_sub(1).wrapping_mul(8) / self.control0.pixel_bits();
        }

        // Out-of-range rows clamp to row zero rather than faulting.
        let voff = if voff > 101 { 0 } else { voff };

        let row_offset = (voff * (SCREEN_WIDTH as u32 / 2)) as u16;
        self.line_base = self.vidbas.value().wrapping_add(row_offset);
        self.line_coll = self.collbas.value().wrapping_add(row_offset);

        offset
    }

    /// Pull `bits` (1-24) from the MSB end of the shift register,
    /// refilling 24 bits from RAM when short. Requests that meet or
    /// exceed the packet budget return zero and consume nothing: the
    /// hardware compares with `<=` where `<` would be expected.
    pub(crate) fn line_get_bits(&mut self, ram: &Ram, bits: u32) -> u32 {
        if self.decoder.packet_bits_left <= bits {
            return 0;
        }

        if self.decoder.shift_count < bits {
            self.decoder.shift_reg <<= 24;
            for shift in [16, 8, 0] {
                self.decoder.shift_reg |= (ram.peek(self.tmpadr.value()) as u32) << shift;
                self.tmpadr.advance(1);
            }
            self.decoder.shift_count += 24;

            self.cycles_used += 3 * SPR_RDWR_CYC;
        }

        let value = (self.decoder.shift_reg >> (self.decoder.shift_count - bits)) & ((1 << bits) - 1);

        self.decoder.shift_count -= bits;
        self.decoder.packet_bits_left -= bits;

        value
    }

    /// Produce the next pixel of the current line, already pen-mapped,
    /// or LINE_END when the line's packets are exhausted.
    pub(crate) fn line_get_pixel(&mut self, ram: &Ram) -> u32 {
        if self.decoder.repeat_count == 0 {
            // Tagged sprites fetch their counts per packet; a set tag bit
            // means literal, clear means packed.
            if self.decoder.line_type != LineType::AbsoluteLiteral {
                self.decoder.line_type = if self.line_get_bits(ram, 1) != 0 {
                    LineType::Literal
                } else {
                    LineType::Packed
                };
            }

            match self.decoder.line_type {
                LineType::AbsoluteLiteral => {
                    // Ran out of line-length pixels: end of line.
                    self.decoder.pixel = LINE_END;
                    return LINE_END;
                }
                LineType::Literal => {
                    self.decoder.repeat_count = self.line_get_bits(ram, 4) + 1;
                }
                LineType::Packed => {
                    // A packed header of zero is the only in-band line
                    // terminator for tagged sprites.
                    self.decoder.repeat_count = self.line_get_bits(ram, 4);
                    if self.decoder.repeat_count == 0 {
                        self.decoder.pixel = LINE_END;
                    } else {
                        let raw = self.line_get_bits(ram, self.control0.pixel_bits());
                        self.decoder.pixel = self.pens.pen(raw) as u32;
                    }
                    self.decoder.repeat_count += 1;
                }
                LineType::Error => return 0,
            }
        }

        if self.decoder.pixel != LINE_END {
            self.decoder.repeat_count -= 1;

            match self.decoder.line_type {
                LineType::AbsoluteLiteral => {
                    let raw = self.line_get_bits(ram, self.control0.pixel_bits());
                    // A zero in the last pixel slot ends the line instead.
                    if self.decoder.repeat_count == 0 && raw == 0 {
                        self.decoder.pixel = LINE_END;
                    } else {
                        self.decoder.pixel = self.pens.pen(raw) as u32;
                    }
                }
                LineType::Literal => {
                    let raw = self.line_get_bits(ram, self.control0.pixel_bits());
                    self.decoder.pixel = self.pens.pen(raw) as u32;
                }
                LineType::Packed => {}
                LineType::Error => return 0,
            }
        }

        self.decoder.pixel
    }
}
