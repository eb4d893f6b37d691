use serde::{Deserialize, Serialize};

/// Packs four byte lanes into one integer, lane `i` at bits `[8i, 8i + 8)`.
#[inline]
pub const fn pack(v0: u8, v1: u8, v2: u8, v3: u8) -> u32 {
    (v0 as u32) | (v1 as u32) << 8 | (v2 as u32) << 16 | (v3 as u32) << 24
}

#[inline]
pub const fn unpack(value: u32) -> [u8; 4] {
    [
        (value & 0xFF) as u8,
        (value >> 8 & 0xFF) as u8,
        (value >> 16 & 0xFF) as u8,
        (value >> 24) as u8,
    ]
}

/// Font index in the top byte, code point in the low 24 bits.
/// Code points above 24 bits are truncated.
#[inline]
pub const fn pack_char_ref(font: u8, code_point: u32) -> u32 {
    (font as u32) << 24 | (code_point & 0x00FF_FFFF)
}

#[inline]
pub const fn unpack_char_ref(value: u32) -> (u8, u32) {
    ((value >> 24) as u8, value & 0x00FF_FFFF)
}

/// One grid cell: char, foreground and background palette indices.
///
/// The fourth lane is reserved and always written as 0 by the constructors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpix(u32);

impl Cpix {
    pub const EMPTY: Cpix = Cpix(0);

    /// Builds a cell and enforces the glyph coupling: a char without a
    /// foreground (or the reverse) can't be displayed, so both become 0.
    pub const fn new(ch: u8, fg: u8, bg: u8) -> Self {
        if ch == 0 || fg == 0 {
            Cpix(pack(0, 0, bg, 0))
        } else {
            Cpix(pack(ch, fg, bg, 0))
        }
    }

    pub const fn from_raw(value: u32) -> Self {
        Cpix(value)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn ch(self) -> u8 {
        unpack(self.0)[0]
    }

    pub const fn fg(self) -> u8 {
        unpack(self.0)[1]
    }

    pub const fn bg(self) -> u8 {
        unpack(self.0)[2]
    }

    pub const fn lanes(self) -> [u8; 3] {
        let [ch, fg, bg, _] = unpack(self.0);
        [ch, fg, bg]
    }

    pub const fn has_glyph(self) -> bool {
        self.ch() > 0 && self.fg() > 0
    }

    /// A cell is drawn if it shows a glyph or a background.
    pub const fn is_visible(self) -> bool {
        self.has_glyph() || self.bg() > 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Re-applies the glyph coupling to a value that came from raw data.
    pub const fn normalized(self) -> Self {
        Cpix::new(self.ch(), self.fg(), self.bg())
    }
}

impl From<u32> for Cpix {
    fn from(value: u32) -> Self {
        Cpix(value)
    }
}

impl From<Cpix> for u32 {
    fn from(value: Cpix) -> Self {
        value.0
    }
}

/// The value held by a char palette slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharRef(u32);

impl CharRef {
    pub const fn new(font: u8, code_point: u32) -> Self {
        CharRef(pack_char_ref(font, code_point))
    }

    pub fn from_char(font: u8, ch: char) -> Self {
        CharRef::new(font, ch as u32)
    }

    pub const fn from_raw(value: u32) -> Self {
        CharRef(value)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn font(self) -> u8 {
        unpack_char_ref(self.0).0
    }

    pub const fn code_point(self) -> u32 {
        unpack_char_ref(self.0).1
    }

    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.code_point())
    }
}

impl std::fmt::Display for CharRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_char() {
            Some(ch) => write!(f, "{ch:?}@{}", self.font()),
            None => write!(f, "U+{:06X}@{}", self.code_point(), self.font()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_layout() {
        assert_eq!(0x0403_0201, pack(1, 2, 3, 4));
        assert_eq!([1, 2, 3, 4], unpack(0x0403_0201));
        assert_eq!([0xFF, 0, 0, 0xFF], unpack(pack(0xFF, 0, 0, 0xFF)));
    }

    #[test]
    fn test_char_ref_layout() {
        let value = pack_char_ref(3, 'K' as u32);
        assert_eq!(0x0300_004B, value);
        assert_eq!((3, 'K' as u32), unpack_char_ref(value));

        // code points wider than 24 bits wrap into the low lanes
        assert_eq!((1, 0x23_4567), unpack_char_ref(pack_char_ref(1, 0x0123_4567)));
    }

    #[test]
    fn test_cpix_glyph_coupling() {
        assert_eq!(Cpix::new(0, 0, 7), Cpix::new(5, 0, 7));
        assert_eq!(Cpix::new(0, 0, 7), Cpix::new(0, 2, 7));
        let cpix = Cpix::new(5, 2, 7);
        assert_eq!([5, 2, 7], cpix.lanes());
        assert!(cpix.has_glyph());
    }

    #[test]
    fn test_cpix_visibility() {
        assert!(!Cpix::EMPTY.is_visible());
        assert!(Cpix::new(0, 0, 1).is_visible());
        assert!(Cpix::new(1, 1, 0).is_visible());
        // raw data may still carry an uncoupled char
        let raw = Cpix::from_raw(pack(4, 0, 0, 0));
        assert!(!raw.is_visible());
        assert!(raw.normalized().is_empty());
    }

    #[test]
    fn test_char_ref_accessors() {
        let ch = CharRef::from_char(2, 'é');
        assert_eq!(2, ch.font());
        assert_eq!(Some('é'), ch.to_char());
    }
}
