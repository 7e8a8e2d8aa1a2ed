//! External surfaces a field may be visible to, and their bitset encoding.

use std::fmt;

/// One external surface. Declaration position `i` is bit `i` of a
/// [`SyntaxSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Syntax {
    Json,
    Html,
    /// The binary wire codec.
    Wire,
}

impl Syntax {
    pub const ALL: [Syntax; 3] = [Syntax::Json, Syntax::Html, Syntax::Wire];

    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Syntax::Json => "json",
            Syntax::Html => "html",
            Syntax::Wire => "wire",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SyntaxSet(u32);

impl SyntaxSet {
    pub const NONE: SyntaxSet = SyntaxSet(0);
    pub const ALL: SyntaxSet = SyntaxSet(Syntax::Json.bit() | Syntax::Html.bit() | Syntax::Wire.bit());

    pub fn of(syntaxes: &[Syntax]) -> Self {
        Self(Self::encode(syntaxes))
    }

    pub fn encode(syntaxes: &[Syntax]) -> u32 {
        syntaxes.iter().fold(0, |bits, s| bits | s.bit())
    }

    /// Unknown high bits are ignored.
    pub fn decode(bits: u32) -> Vec<Syntax> {
        Syntax::ALL
            .into_iter()
            .filter(|s| bits & s.bit() != 0)
            .collect()
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, syntax: Syntax) -> bool {
        self.0 & syntax.bit() != 0
    }

    #[must_use]
    pub const fn with(self, syntax: Syntax) -> Self {
        Self(self.0 | syntax.bit())
    }

    #[must_use]
    pub const fn without(self, syntax: Syntax) -> Self {
        Self(self.0 & !syntax.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = Syntax> {
        Syntax::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl fmt::Debug for SyntaxSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Syntax> for SyntaxSet {
    fn from_iter<I: IntoIterator<Item = Syntax>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}
