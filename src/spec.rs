//! Badge input model.
//!
//! A [`BadgeSpec`] captures everything the renderer needs in a format that can
//! be serialized to JSON and sent between a host UI and this library.
//!
//! # Example
//!
//! ```
//! use badge_renderer::{BadgeSpec, BadgeBackground, PatternKind};
//!
//! let spec = BadgeSpec::new("#042", "Ada", "Engineer")
//!     .with_last_name("Lovelace")
//!     .with_background(BadgeBackground {
//!         pattern: PatternKind::Grid,
//!         ..BadgeBackground::default()
//!     });
//!
//! let json = spec.to_json().unwrap();
//! let restored = BadgeSpec::from_json(&json).unwrap();
//! assert_eq!(restored.first_name, "Ada");
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Color palette
// ============================================================================

/// The five named colors a badge is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeColors {
    /// Canvas fill and the light half of the QR code.
    pub surface: String,
    /// Primary text, frame strokes, and the dark half of the QR code.
    pub on_surface: String,
    /// Corner accents and the brand square.
    pub accent: String,
    /// Secondary text (badge number, role, subtitle).
    pub muted: String,
    /// Tertiary text.
    pub muted_on_surface: String,
}

impl Default for BadgeColors {
    fn default() -> Self {
        Self {
            surface: "#FAFAFA".into(),
            on_surface: "#0A0A0A".into(),
            accent: "#00FF7F".into(),
            muted: "#666666".into(),
            muted_on_surface: "#999999".into(),
        }
    }
}

// ============================================================================
// Branding
// ============================================================================

/// Branding text drawn in the lower block of the badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeBranding {
    /// Large brand title.
    pub title: String,
    /// Small tracked-out subtitle under the title.
    pub subtitle: String,
    /// Organization name shown right-aligned beside the identity block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// Second organization line, bold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_subtitle: Option<String>,
    /// Trusted SVG markup fragment for a logo, emitted verbatim inside the
    /// organization block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Default for BadgeBranding {
    fn default() -> Self {
        Self {
            title: "100 DAYS".into(),
            subtitle: "OF SHIPPING".into(),
            organization_name: None,
            organization_subtitle: None,
            logo: None,
        }
    }
}

impl BadgeBranding {
    /// Returns true if the badge should draw the organization block at all.
    pub fn has_organization_block(&self) -> bool {
        self.organization_name.is_some() || self.logo.is_some()
    }
}

// ============================================================================
// Background
// ============================================================================

/// The fixed set of background pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    None,
    #[default]
    Radial,
    Grid,
    Dots,
    Waves,
    Hexagons,
    Circuits,
}

/// Background description: solid color, optional gradient, optional image,
/// and a pattern layer on top. Pattern and gradient/image compose; they are
/// not mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeBackground {
    /// Pattern kind drawn above the fill layers.
    pub pattern: PatternKind,
    /// Pattern layer opacity (0-1).
    pub pattern_opacity: f32,
    /// Pattern color override; defaults to the on-surface color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_color: Option<String>,
    /// Full-bleed background image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Background image opacity (0-1).
    pub image_opacity: f32,
    /// Linear gradient stops; the gradient layer is active only with two or
    /// more stops, otherwise the solid surface color is used.
    pub gradient: Vec<String>,
    /// Gradient direction in degrees.
    pub gradient_angle: f32,
}

impl Default for BadgeBackground {
    fn default() -> Self {
        Self {
            pattern: PatternKind::Radial,
            pattern_opacity: 0.08,
            pattern_color: None,
            image_url: None,
            image_opacity: 0.3,
            gradient: Vec::new(),
            gradient_angle: 135.0,
        }
    }
}

impl BadgeBackground {
    /// Returns true if enough gradient stops were supplied to draw a gradient.
    pub fn has_gradient(&self) -> bool {
        self.gradient.len() >= 2
    }
}

// ============================================================================
// BadgeSpec
// ============================================================================

/// Complete input to the badge renderer.
///
/// Identity fields are required; everything else falls back to documented
/// defaults. The renderer does not validate identity content (an empty name
/// renders as an empty name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeSpec {
    /// Badge/member number, usually of the form `#001`.
    pub badge_number: String,
    /// First name, drawn uppercased.
    pub first_name: String,
    /// Optional last name, drawn uppercased on its own line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Role or title line.
    pub job_title: String,
    /// Profile picture reference (URL or data URI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    /// QR target override; defaults to `{origin}/p/{number}` with the
    /// leading `#` stripped from the number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
    /// Color palette.
    #[serde(default)]
    pub colors: BadgeColors,
    /// Branding block.
    #[serde(default)]
    pub branding: BadgeBranding,
    /// Background layers.
    #[serde(default)]
    pub background: BadgeBackground,
}

impl BadgeSpec {
    /// Creates a spec with the required identity fields and default styling.
    pub fn new(
        badge_number: impl Into<String>,
        first_name: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Self {
        Self {
            badge_number: badge_number.into(),
            first_name: first_name.into(),
            last_name: None,
            job_title: job_title.into(),
            profile_picture_url: None,
            qr_code_url: None,
            colors: BadgeColors::default(),
            branding: BadgeBranding::default(),
            background: BadgeBackground::default(),
        }
    }

    /// Sets the last name.
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the profile picture reference.
    pub fn with_profile_picture(mut self, url: impl Into<String>) -> Self {
        self.profile_picture_url = Some(url.into());
        self
    }

    /// Overrides the QR target URL.
    pub fn with_qr_code_url(mut self, url: impl Into<String>) -> Self {
        self.qr_code_url = Some(url.into());
        self
    }

    /// Sets the color palette.
    pub fn with_colors(mut self, colors: BadgeColors) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the branding block.
    pub fn with_branding(mut self, branding: BadgeBranding) -> Self {
        self.branding = branding;
        self
    }

    /// Sets the background description.
    pub fn with_background(mut self, background: BadgeBackground) -> Self {
        self.background = background;
        self
    }

    /// Serializes the spec to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a spec from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
