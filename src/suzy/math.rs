use crate::suzy::control::SystemFlags;
use crate::suzy::registers::MathByte;
use crate::suzy::Suzy;

//    AB                                    EFGH
//  * CD                                  /   NP
// -------                            -----------
//  EFGH                                    ABCD
// Accumulate in JKLM         Remainder in (JK)LM

/// The 16x16 multiply / 32/16 divide unit. The four working registers are
/// addressed through big-endian byte aliases (A is the most significant
/// byte of ABCD). Operand signs are tracked out-of-band: the hardware
/// converts signed operands to magnitude form as they are written, then
/// fixes up the product sign afterwards.
pub struct MathUnit {
    abcd: u32,
    efgh: u32,
    jklm: u32,
    np: u16,

    /// +1 or -1, set when the upper operand byte is written in signed mode.
    pub ab_sign: i8,
    pub cd_sign: i8,
    /// Sum of the operand signs at the last multiply; zero means the
    /// product was negated.
    pub efgh_sign: i8,
}

impl MathUnit {
    /// Power-on state is all-ones. Some titles run their first multiply
    /// before initialising every operand byte and depend on the sign
    /// conversion seeing this pattern.
    pub fn new() -> Self {
        Self {
            abcd: 0xffff_ffff,
            efgh: 0xffff_ffff,
            jklm: 0xffff_ffff,
            np: 0xffff,
            ab_sign: 1,
            cd_sign: 1,
            efgh_sign: 1,
        }
    }

    pub fn abcd(&self) -> u32 {
        self.abcd
    }

    pub fn efgh(&self) -> u32 {
        self.efgh
    }

    pub fn jklm(&self) -> u32 {
        self.jklm
    }

    pub fn np(&self) -> u16 {
        self.np
    }

    pub fn set_registers(&mut self, abcd: u32, efgh: u32, jklm: u32, np: u16) {
        self.abcd = abcd;
        self.efgh = efgh;
        self.jklm = jklm;
        self.np = np;
    }

    pub fn byte(&self, byte: MathByte) -> u8 {
        match byte {
            MathByte::A => (self.abcd >> 24) as u8,
            MathByte::B => (self.abcd >> 16) as u8,
            MathByte::C => (self.abcd >> 8) as u8,
            MathByte::D => self.abcd as u8,
            MathByte::E => (self.efgh >> 24) as u8,
            MathByte::F => (self.efgh >> 16) as u8,
            MathByte::G => (self.efgh >> 8) as u8,
            MathByte::H => self.efgh as u8,
            MathByte::J => (self.jklm >> 24) as u8,
            MathByte::K => (self.jklm >> 16) as u8,
            MathByte::L => (self.jklm >> 8) as u8,
            MathByte::M => self.jklm as u8,
            MathByte::N => (self.np >> 8) as u8,
            MathByte::P => self.np as u8,
        }
    }

    fn set_byte(&mut self, byte: MathByte, data: u8) {
        fn splice(word: u32, shift: u32, data: u8) -> u32 {
            (word & !(0xff << shift)) | ((data as u32) << shift)
        }
        match byte {
            MathByte::A => self.abcd = splice(self.abcd, 24, data),
            MathByte::B => self.abcd = splice(self.abcd, 16, data),
            MathByte::C => self.abcd = splice(self.abcd, 8, data),
            MathByte::D => self.abcd = splice(self.abcd, 0, data),
            MathByte::E => self.efgh = splice(self.efgh, 24, data),
            MathByte::F => self.efgh = splice(self.efgh, 16, data),
            MathByte::G => self.efgh = splice(self.efgh, 8, data),
            MathByte::H => self.efgh = splice(self.efgh, 0, data),
            MathByte::J => self.jklm = splice(self.jklm, 24, data),
            MathByte::K => self.jklm = splice(self.jklm, 16, data),
            MathByte::L => self.jklm = splice(self.jklm, 8, data),
            MathByte::M => self.jklm = splice(self.jklm, 0, data),
            MathByte::N => self.np = (self.np & 0x00ff) | ((data as u16) << 8),
            MathByte::P => self.np = (self.np & 0xff00) | data as u16,
        }
    }

    fn ab(&self) -> u16 {
        (self.abcd >> 16) as u16
    }

    fn cd(&self) -> u16 {
        self.abcd as u16
    }

    /// Signed-mode magnitude conversion. The hardware tests `(value - 1)`
    /// rather than `value`, so 0x8000 converts as positive and 0x0000 as
    /// negative. Deliberate: games initialise the unit in an order that
    /// depends on it.
    fn convert(value: u16) -> (u16, i8) {
        if value.wrapping_sub(1) & 0x8000 != 0 {
            ((value ^ 0xffff).wrapping_add(1), -1)
        } else {
            (value, 1)
        }
    }

    pub fn convert_ab_sign(&mut self) {
        let (magnitude, sign) = Self::convert(self.ab());
        self.ab_sign = sign;
        self.abcd = (self.abcd & 0x0000_ffff) | ((magnitude as u32) << 16);
    }

    pub fn convert_cd_sign(&mut self) {
        let (magnitude, sign) = Self::convert(self.cd());
        self.cd_sign = sign;
        self.abcd = (self.abcd & 0xffff_0000) | magnitude as u32;
    }

    /// EFGH := AB * CD. The multiply itself is always unsigned; in signed
    /// mode the result is negated when exactly one operand was negative
    /// (the sign sum is zero). Returns the tick cost for the scheduler.
    pub fn multiply(&mut self, sys: &mut SystemFlags) -> u32 {
        sys.mathbit = false;

        self.efgh = (self.ab() as u32).wrapping_mul(self.cd() as u32);

        if sys.signed_math {
            self.efgh_sign = self.ab_sign + self.cd_sign;
            if self.efgh_sign == 0 {
                self.efgh = (self.efgh ^ 0xffff_ffff).wrapping_add(1);
            }
        }

        // No overflow detection on the accumulate; the hardware documents
        // it but the silicon never sets a flag.
        if sys.accumulate {
            self.jklm = self.jklm.wrapping_add(self.efgh);
        }

        if sys.signed_math || sys.accumulate {
            54
        } else {
            44
        }
    }

    /// ABCD := EFGH / NP, JKLM := EFGH mod NP, always unsigned. Dividing
    /// by zero leaves all-ones in the quotient, zero in the remainder,
    /// and raises the sticky math error bit. Returns the tick cost:
    /// 176 + 14 per leading zero of the divisor.
    pub fn divide(&mut self, sys: &mut SystemFlags) -> u32 {
        sys.mathbit = false;

        if self.np != 0 {
            self.abcd = self.efgh / self.np as u32;
            self.jklm = self.efgh % self.np as u32;
        } else {
            self.abcd = 0xffff_ffff;
            self.jklm = 0;
            sys.mathbit = true;
        }

        176 + 14 * self.np.leading_zeros()
    }
}

impl Suzy {
    /// Math register writes carry the unit's trigger logic: storing the
    /// low byte of a 16-bit half clears the byte above it, storing an
    /// upper operand byte performs the sign conversion, and MATHA / MATHE
    /// start the multiply / divide synchronously.
    pub(crate) fn poke_math(&mut self, byte: MathByte, data: u8) {
        use MathByte::*;
        match byte {
            // Rewriting D re-runs the CD sign conversion with C forced to
            // zero. Without this, a stale sign from the previous result
            // survives a low-byte-only operand update.
            D => {
                self.math.set_byte(D, data);
                self.poke_math(C, 0);
            }
            C => {
                self.math.set_byte(C, data);
                if self.sys.signed_math {
                    self.math.convert_cd_sign();
                }
            }
            B => {
                self.math.set_byte(B, data);
                self.math.set_byte(A, 0);
            }
            A => {
                self.math.set_byte(A, data);
                if self.sys.signed_math {
                    self.math.convert_ab_sign();
                }
                self.math_ticks = self.math.multiply(&mut self.sys);
            }

            P => {
                self.math.set_byte(P, data);
                self.math.set_byte(N, 0);
            }
            N => self.math.set_byte(N, data),

            H => {
                self.math.set_byte(H, data);
                self.math.set_byte(G, 0);
            }
            G => self.math.set_byte(G, data),
            F => {
                self.math.set_byte(F, data);
                self.math.set_byte(E, 0);
            }
            E => {
                self.math.set_byte(E, data);
                self.math_ticks = self.math.divide(&mut self.sys);
            }

            M => {
                self.math.set_byte(M, data);
                self.math.set_byte(L, 0);
                self.sys.mathbit = false;
            }
            L => self.math.set_byte(L, data),
            K => {
                self.math.set_byte(K, data);
                self.math.set_byte(J, 0);
            }
            J => self.math.set_byte(J, data),
        }
    }
}
