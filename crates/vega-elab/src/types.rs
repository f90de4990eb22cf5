use smallvec::SmallVec;
use vega_syntax::{IntegralKeyword, RangeSyntax, Signing};

/// A constant range `[msb:lsb]` with known bounds.
///
/// `[3:0]` is little endian (descending), `[0:3]` is big endian
/// (ascending). Instance-array elements are stored in declaration order
/// (msb bound first), so `declaration_index` is the single translation
/// needed when slicing arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantRange {
    pub msb: i32,
    pub lsb: i32,
}

impl ConstantRange {
    pub fn new(msb: i32, lsb: i32) -> Self {
        Self { msb, lsb }
    }

    pub fn width(&self) -> u32 {
        self.msb.abs_diff(self.lsb) + 1
    }

    pub fn lower(&self) -> i32 {
        self.msb.min(self.lsb)
    }

    pub fn upper(&self) -> i32 {
        self.msb.max(self.lsb)
    }

    pub fn is_little_endian(&self) -> bool {
        self.msb >= self.lsb
    }

    pub fn contains(&self, index: i32) -> bool {
        self.lower() <= index && index <= self.upper()
    }

    /// Zero-based position of `index` in declaration order (msb bound
    /// first). `[3:0]` puts index 3 at position 0; `[0:3]` puts index 0
    /// at position 0.
    pub fn declaration_index(&self, index: i32) -> usize {
        if self.is_little_endian() {
            (self.msb - index) as usize
        } else {
            (index - self.msb) as usize
        }
    }

    /// Index values in declaration order, msb bound first.
    pub fn iter_decl_order(&self) -> impl Iterator<Item = i32> + use<> {
        let (msb, lsb) = (self.msb, self.lsb);
        let step: i32 = if msb <= lsb { 1 } else { -1 };
        (0..self.width()).map(move |i| msb + step * i as i32)
    }
}

impl From<RangeSyntax> for ConstantRange {
    fn from(r: RangeSyntax) -> Self {
        Self {
            msb: r.msb,
            lsb: r.lsb,
        }
    }
}

/// An integral (packed) type: a bit vector with signing and 2/4-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegralTy {
    pub width: u32,
    pub four_state: bool,
    pub signed: bool,
}

impl IntegralTy {
    /// One four-state unsigned bit.
    pub const LOGIC: IntegralTy = IntegralTy {
        width: 1,
        four_state: true,
        signed: false,
    };
}

/// The type of a value symbol or port.
///
/// `Void` is the sentinel for an empty port; `Error` propagates through
/// downstream passes without re-triggering diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Error,
    Void,
    Integral(IntegralTy),
    /// Unpacked array over an element type.
    Array {
        elem: Box<Ty>,
        dims: SmallVec<[ConstantRange; 2]>,
    },
}

impl Ty {
    /// One four-state unsigned bit -- the default for `logic` and for
    /// implicitly typed variables.
    pub fn logic() -> Self {
        Ty::Integral(IntegralTy::LOGIC)
    }

    /// Constructor for the packed concatenation type of a multi-port.
    pub fn concat(width: u32, four_state: bool) -> Self {
        Ty::Integral(IntegralTy {
            width,
            four_state,
            signed: false,
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Ty::Void)
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, Ty::Integral(_))
    }

    pub fn bit_width(&self) -> Option<u32> {
        match self {
            Ty::Integral(i) => Some(i.width),
            _ => None,
        }
    }

    pub fn is_four_state(&self) -> bool {
        matches!(self, Ty::Integral(i) if i.four_state)
    }

    /// Type equivalence: the strict requirement used by implicit named
    /// port connections. Structural equality, with unpacked dimensions
    /// compared by width.
    pub fn is_equivalent(&self, other: &Ty) -> bool {
        match (self, other) {
            (Ty::Integral(a), Ty::Integral(b)) => a == b,
            (
                Ty::Array { elem: ea, dims: da },
                Ty::Array { elem: eb, dims: db },
            ) => {
                da.len() == db.len()
                    && da.iter().zip(db.iter()).all(|(x, y)| x.width() == y.width())
                    && ea.is_equivalent(eb)
            }
            (Ty::Void, Ty::Void) => true,
            // Error is equivalent to nothing, including itself.
            _ => false,
        }
    }

    /// Human-readable rendering for diagnostics.
    pub fn pretty(&self) -> String {
        match self {
            Ty::Error => "<error>".into(),
            Ty::Void => "void".into(),
            Ty::Integral(i) => {
                let base = if i.four_state { "logic" } else { "bit" };
                let sign = if i.signed { " signed" } else { "" };
                if i.width == 1 {
                    format!("{base}{sign}")
                } else {
                    format!("{base}{sign} [{}:0]", i.width - 1)
                }
            }
            Ty::Array { elem, dims } => {
                let mut s = elem.pretty();
                for d in dims {
                    s.push_str(&format!(" [{}:{}]", d.msb, d.lsb));
                }
                s
            }
        }
    }
}

/// Width, four-state, and default signing of an integral keyword type.
pub(crate) fn integral_keyword_info(kw: IntegralKeyword) -> IntegralTy {
    let (width, four_state, signed) = match kw {
        IntegralKeyword::Logic | IntegralKeyword::Reg => (1, true, false),
        IntegralKeyword::Bit => (1, false, false),
        IntegralKeyword::Int => (32, false, true),
        IntegralKeyword::Integer => (32, true, true),
        IntegralKeyword::Byte => (8, false, true),
        IntegralKeyword::ShortInt => (16, false, true),
        IntegralKeyword::LongInt => (64, false, true),
    };
    IntegralTy {
        width,
        four_state,
        signed,
    }
}

/// Fold packed dimensions and a signing keyword over a base integral type.
pub(crate) fn apply_packed(
    base: IntegralTy,
    signing: Option<Signing>,
    packed_dims: &[RangeSyntax],
) -> IntegralTy {
    let mut width = base.width;
    for dim in packed_dims {
        width *= ConstantRange::from(*dim).width();
    }
    let signed = match signing {
        Some(Signing::Signed) => true,
        Some(Signing::Unsigned) => false,
        None => base.signed,
    };
    IntegralTy {
        width,
        four_state: base.four_state,
        signed,
    }
}

/// Wrap `ty` in an unpacked array if `dims` is non-empty.
pub(crate) fn wrap_unpacked(ty: Ty, dims: &[RangeSyntax]) -> Ty {
    if dims.is_empty() {
        return ty;
    }
    Ty::Array {
        elem: Box::new(ty),
        dims: dims.iter().map(|d| ConstantRange::from(*d)).collect(),
    }
}
