//! Legacy blend-factor codes
//!
//! Effect files store their blend factors as the legacy 1-based
//! enumeration. The renderer works with OpenGL blend-factor enumerants;
//! this module is the translation between the two.

/// Renderer blend factor
///
/// Discriminants are the matching OpenGL enumerants, so `gl_constant`
/// can be handed straight to `glBlendFunc`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendFactor {
    /// `GL_ZERO`
    Zero = 0x0000,
    /// `GL_ONE`
    One = 0x0001,
    /// `GL_SRC_COLOR`
    SrcColor = 0x0300,
    /// `GL_ONE_MINUS_SRC_COLOR`
    OneMinusSrcColor = 0x0301,
    /// `GL_SRC_ALPHA`
    SrcAlpha = 0x0302,
    /// `GL_ONE_MINUS_SRC_ALPHA`
    OneMinusSrcAlpha = 0x0303,
    /// `GL_DST_ALPHA`
    DstAlpha = 0x0304,
    /// `GL_ONE_MINUS_DST_ALPHA`
    OneMinusDstAlpha = 0x0305,
    /// `GL_DST_COLOR`
    DstColor = 0x0306,
    /// `GL_ONE_MINUS_DST_COLOR`
    OneMinusDstColor = 0x0307,
    /// `GL_SRC_ALPHA_SATURATE`
    SrcAlphaSaturate = 0x0308,
}

impl BlendFactor {
    /// Factor used for codes outside the legacy table
    pub const FALLBACK: Self = Self::SrcAlpha;

    /// All factors in legacy code order (code 1 first)
    pub const ALL: [Self; 11] = [
        Self::Zero,
        Self::One,
        Self::SrcColor,
        Self::OneMinusSrcColor,
        Self::SrcAlpha,
        Self::OneMinusSrcAlpha,
        Self::DstAlpha,
        Self::OneMinusDstAlpha,
        Self::DstColor,
        Self::OneMinusDstColor,
        Self::SrcAlphaSaturate,
    ];

    /// Translate a legacy blend code; unknown codes map to source alpha
    pub fn from_legacy_code(code: i32) -> Self {
        match code {
            1 => Self::Zero,
            2 => Self::One,
            3 => Self::SrcColor,
            4 => Self::OneMinusSrcColor,
            5 => Self::SrcAlpha,
            6 => Self::OneMinusSrcAlpha,
            7 => Self::DstAlpha,
            8 => Self::OneMinusDstAlpha,
            9 => Self::DstColor,
            10 => Self::OneMinusDstColor,
            11 => Self::SrcAlphaSaturate,
            _ => {
                log::trace!("Unknown blend code {}, using source alpha", code);
                Self::FALLBACK
            }
        }
    }

    /// Legacy code of this factor
    pub fn legacy_code(self) -> i32 {
        match self {
            Self::Zero => 1,
            Self::One => 2,
            Self::SrcColor => 3,
            Self::OneMinusSrcColor => 4,
            Self::SrcAlpha => 5,
            Self::OneMinusSrcAlpha => 6,
            Self::DstAlpha => 7,
            Self::OneMinusDstAlpha => 8,
            Self::DstColor => 9,
            Self::OneMinusDstColor => 10,
            Self::SrcAlphaSaturate => 11,
        }
    }

    /// OpenGL enumerant of this factor
    pub fn gl_constant(self) -> u32 {
        self as u32
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::SrcColor => "source color",
            Self::OneMinusSrcColor => "inverse source color",
            Self::SrcAlpha => "source alpha",
            Self::OneMinusSrcAlpha => "inverse source alpha",
            Self::DstAlpha => "destination alpha",
            Self::OneMinusDstAlpha => "inverse destination alpha",
            Self::DstColor => "destination color",
            Self::OneMinusDstColor => "inverse destination color",
            Self::SrcAlphaSaturate => "source alpha saturate",
        }
    }
}

impl From<i32> for BlendFactor {
    fn from(code: i32) -> Self {
        Self::from_legacy_code(code)
    }
}

impl From<BlendFactor> for i32 {
    fn from(factor: BlendFactor) -> Self {
        factor.legacy_code()
    }
}

impl std::fmt::Display for BlendFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Source/destination blend pair of a sub-effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendState {
    /// Factor applied to the incoming fragment
    pub src: BlendFactor,
    /// Factor applied to the framebuffer contents
    pub dst: BlendFactor,
}

impl BlendState {
    /// Standard alpha blending
    pub const ALPHA: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };

    /// Build from the two legacy codes
    pub fn from_codes(src: i32, dst: i32) -> Self {
        Self {
            src: BlendFactor::from_legacy_code(src),
            dst: BlendFactor::from_legacy_code(dst),
        }
    }

    /// Whether the pair adds onto the framebuffer without darkening it
    pub fn is_additive(&self) -> bool {
        self.dst == BlendFactor::One
    }
}

impl Default for BlendState {
    fn default() -> Self {
        Self::ALPHA
    }
}
