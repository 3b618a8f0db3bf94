//! Static font metrics and page geometry for the headless measurement path.
//!
//! Character widths are in em units (relative to font size). One measured table
//! (Inter) covers ASCII 0x20..=0x7E; the other families are approximated by a
//! uniform width scale against it. This is an intentional approximation: it
//! is close enough to decide page breaks for typical résumé text, and a
//! browser-backed oracle replaces it wherever exact layout matters.
//!
//! Index = (char as usize) - 32.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pagination::PageCapacity;

/// PostScript points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The supported résumé font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Clean humanist sans-serif. The reference table.
    Inter,
    /// Old-style serif. Approx. 85% of Inter.
    EbGaramond,
    /// Geometric humanist sans-serif. Approx. 105% of Inter.
    Lato,
    /// Condensed display sans-serif. Approx. 68% of Inter.
    Oswald,
    /// Traditional TeX font. Approx. 90% of Inter.
    ComputerModern,
}

impl FontFamily {
    /// Width of this family relative to Inter at the same point size.
    pub fn width_scale(self) -> f32 {
        match self {
            FontFamily::Inter => 1.0,
            FontFamily::EbGaramond => 0.85,
            FontFamily::Lato => 1.05,
            FontFamily::Oswald => 0.68,
            FontFamily::ComputerModern => 0.90,
        }
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "inter" => Ok(FontFamily::Inter),
            "eb_garamond" | "garamond" => Ok(FontFamily::EbGaramond),
            "lato" => Ok(FontFamily::Lato),
            "oswald" => Ok(FontFamily::Oswald),
            "computer_modern" | "cm" => Ok(FontFamily::ComputerModern),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paper and page configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    /// 8.5" × 11"
    Letter,
    /// 210mm × 297mm
    A4,
}

impl PaperSize {
    /// (width, height) in inches.
    pub fn dimensions_in(self) -> (f32, f32) {
        match self {
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::A4 => (8.27, 11.69),
        }
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" | "us_letter" => Ok(PaperSize::Letter),
            "a4" => Ok(PaperSize::A4),
            other => Err(format!("unknown paper size '{other}'")),
        }
    }
}

/// Geometry and typography of one résumé page. Every page of a document shares it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub font: FontFamily,
    pub font_size_pt: f32,
    pub paper: PaperSize,
    pub margin_top_in: f32,
    pub margin_bottom_in: f32,
    pub margin_left_in: f32,
    pub margin_right_in: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub line_height: f32,
    /// Vertical gap after every row (entry, card, chip group).
    pub row_spacing_pt: f32,
    /// Section title size as a multiple of the body font size.
    pub title_scale: f32,
    /// Name line size in the header as a multiple of the body font size.
    pub name_scale: f32,
}

/// Returns the default page config for the given font family.
///
/// Assumes: US letter, 11pt body, 1.0" margins all sides, 1.25 line height.
pub fn default_page_config(font: FontFamily) -> PageConfig {
    PageConfig {
        font,
        font_size_pt: 11.0,
        paper: PaperSize::Letter,
        margin_top_in: 1.0,
        margin_bottom_in: 1.0,
        margin_left_in: 1.0,
        margin_right_in: 1.0,
        line_height: 1.25,
        row_spacing_pt: 6.0,
        title_scale: 1.3,
        name_scale: 2.0,
    }
}

impl PageConfig {
    /// Page height minus top and bottom margins, in points.
    pub fn usable_height_pt(&self) -> f32 {
        let (_, height) = self.paper.dimensions_in();
        (height - self.margin_top_in - self.margin_bottom_in) * POINTS_PER_INCH
    }

    /// Usable text width in em units at the body font size.
    /// Letter, 1" margins, 11pt → 6.5" × 72 ÷ 11 ≈ 42.5em.
    pub fn text_width_em(&self) -> f32 {
        let (width, _) = self.paper.dimensions_in();
        (width - self.margin_left_in - self.margin_right_in) * POINTS_PER_INCH / self.font_size_pt
    }

    /// Height of one body line in points.
    pub fn line_height_pt(&self) -> f32 {
        self.font_size_pt * self.line_height
    }
}

impl PageCapacity for PageConfig {
    fn usable_height(&self) -> f32 {
        self.usable_height_pt()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Inter advance widths for ASCII 0x20 (space) through 0x7E (~), in em.
///
/// ```text
/// [0]=sp  [1..15]=punctuation  [16..25]=0-9  [26..32]=:;<=>?@
/// [33..58]=A-Z  [59..64]=[\]^_`  [65..90]=a-z  [91..94]={|}~
/// ```
#[rustfmt::skip]
static INTER_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // 0-9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A-M
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    // N-Z
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [     \     ]     ^     _     `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a-m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    // n-z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.59,
];

const INTER_AVERAGE_WIDTH: f32 = 0.52;

/// Width measurements for one font family.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub font: FontFamily,
    scale: f32,
}

impl FontMetrics {
    pub fn for_family(font: FontFamily) -> Self {
        FontMetrics {
            font,
            scale: font.width_scale(),
        }
    }

    /// Fallback width for non-ASCII characters.
    pub fn average_char_width(&self) -> f32 {
        INTER_AVERAGE_WIDTH * self.scale
    }

    pub fn space_width(&self) -> f32 {
        INTER_WIDTHS[0] * self.scale
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    INTER_WIDTHS[code - 32] * self.scale
                } else {
                    self.average_char_width()
                }
            })
            .sum()
    }

    /// Number of lines `s` occupies when greedily word-wrapped at `max_width_em`.
    /// Blank text occupies zero lines. A single word wider than the line still
    /// takes one line.
    pub fn wrapped_lines(&self, s: &str, max_width_em: f32) -> u32 {
        let mut words = s.split_whitespace();
        let Some(first) = words.next() else {
            return 0;
        };
        let space = self.space_width();
        let mut lines = 1u32;
        let mut current = self.measure_str(first);

        for word in words {
            let word_w = self.measure_str(word);
            if current + space + word_w > max_width_em {
                lines += 1;
                current = word_w;
            } else {
                current += space + word_w;
            }
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
