//! Static font-metric tables for the resume theme fonts.
//!
//! Widths are in em units relative to the font size. One measured base table
//! (a humanist sans) is scaled per family; this is an approximation, but it is
//! stable, which is what the layout contract needs: identical text always
//! wraps identically.
//!
//! The base table covers ASCII 0x20..=0x7E. Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    Inter,
    EbGaramond,
    Lato,
    Oswald,
    ComputerModern,
}

/// Layout parameters for one printed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub font_size_pt: u8,
    /// Usable text width in em units. US letter, 0.75" margins, 11pt ≈ 46em.
    pub text_width_em: f32,
    /// Line slots on one page, headings and spacers included.
    pub lines_per_page: u16,
    /// Indent applied to bullet text, in em.
    pub bullet_indent_em: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            font_size_pt: 11,
            text_width_em: 46.0,
            lines_per_page: 52,
            bullet_indent_em: 1.2,
        }
    }
}

#[rustfmt::skip]
static BASE_WIDTHS: [f32; 95] = [
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

const BASE_AVERAGE_WIDTH: f32 = 0.52;

pub struct FontMetrics {
    pub font: FontFamily,
    /// Multiplier applied to every base width.
    scale: f32,
}

impl FontMetrics {
    pub fn for_font(font: FontFamily) -> Self {
        let scale = match font {
            FontFamily::Inter => 1.0,
            FontFamily::EbGaramond => 0.85,
            FontFamily::Lato => 1.05,
            FontFamily::Oswald => 0.68,
            FontFamily::ComputerModern => 0.90,
        };
        FontMetrics { font, scale }
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        let base = if (32..=126).contains(&code) {
            BASE_WIDTHS[code - 32]
        } else {
            BASE_AVERAGE_WIDTH
        };
        base * self.scale
    }

    pub fn space_width(&self) -> f32 {
        self.char_width(' ')
    }

    /// Rendered width of a string in em.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Greedy word-wrap at `max_width_em`.
    ///
    /// A single word wider than the line keeps a line of its own rather than
    /// being split. Empty or whitespace-only input yields no lines.
    pub fn wrap(&self, text: &str, max_width_em: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;
        let space_w = self.space_width();

        for word in text.split_whitespace() {
            let word_w = self.measure_str(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + space_w + word_w > max_width_em {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str() {
        let metrics = FontMetrics::for_font(FontFamily::Inter);
        assert_eq!(metrics.measure_str(""), 0.0);
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00
        assert!((metrics.measure_str("Rust") - 2.00).abs() < 1e-3);
        // Non-ASCII falls back to the average width.
        assert!((metrics.measure_str("é") - BASE_AVERAGE_WIDTH).abs() < 1e-4);
    }

    #[test]
    fn test_condensed_font_is_narrower() {
        let text = "Architected distributed caching layer";
        let oswald = FontMetrics::for_font(FontFamily::Oswald).measure_str(text);
        let lato = FontMetrics::for_font(FontFamily::Lato).measure_str(text);
        assert!(oswald < lato);
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let metrics = FontMetrics::for_font(FontFamily::Inter);
        assert_eq!(metrics.wrap("  Built   things ", 46.0), vec!["Built things".to_string()]);
        assert!(metrics.wrap("   ", 46.0).is_empty());
    }

    #[test]
    fn test_wrap_respects_width() {
        let metrics = FontMetrics::for_font(FontFamily::Inter);
        let text = "word ".repeat(40);
        let lines = metrics.wrap(&text, 20.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.measure_str(line) <= 20.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.trim());
    }

    #[test]
    fn test_overlong_word_gets_own_line() {
        let metrics = FontMetrics::for_font(FontFamily::Inter);
        let long = "x".repeat(200);
        let lines = metrics.wrap(&format!("a {long} b"), 10.0);
        assert_eq!(lines, vec!["a".to_string(), long, "b".to_string()]);
    }

    #[test]
    fn test_font_family_wire_names() {
        let family: FontFamily = serde_json::from_str("\"eb-garamond\"").unwrap();
        assert_eq!(family, FontFamily::EbGaramond);
        assert_eq!(serde_json::to_string(&FontFamily::ComputerModern).unwrap(), "\"computer-modern\"");
    }
}
