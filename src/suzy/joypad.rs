use bitflags::bitflags;

/// The joystick port latch. The host's input layer stores the raw button
/// state here; reads through the register window apply handedness.
#[derive(Clone, Copy, Default)]
pub struct Joystick(pub u8);

bitflags! {
    impl Joystick: u8 {
        const DOWN    = 0b1000_0000;
        const UP      = 0b0100_0000;
        const RIGHT   = 0b0010_0000;
        const LEFT    = 0b0001_0000;
        const OPTION1 = 0b0000_1000;
        const OPTION2 = 0b0000_0100;
        const B       = 0b0000_0010;
        const A       = 0b0000_0001;
    }
}

impl Joystick {
    /// The console can be held either way up. In the default (right-hand)
    /// orientation the direction pairs read swapped; left-hand mode
    /// returns the latch as stored.
    pub fn read(&self, left_hand: bool) -> u8 {
        if left_hand {
            return self.0;
        }

        let mut adjusted = *self;
        adjusted.set(Self::LEFT, self.contains(Self::RIGHT));
        adjusted.set(Self::RIGHT, self.contains(Self::LEFT));
        adjusted.set(Self::UP, self.contains(Self::DOWN));
        adjusted.set(Self::DOWN, self.contains(Self::UP));
        adjusted.0
    }
}

/// The console switches latch (pause button and cartridge sense lines).
#[derive(Clone, Copy, Default)]
pub struct Switches(pub u8);

bitflags! {
    impl Switches: u8 {
        const CART1_SENSE = 0b0000_0100;
        const CART0_SENSE = 0b0000_0010;
        const PAUSE       = 0b0000_0001;
    }
}
