//! Headless measurement oracle — estimates unit heights from text metrics.
//!
//! Every text field is word-wrapped with the static width tables and turned
//! into lines; lines become points via the page's line height. Deterministic
//! for a given `PageConfig`, which is all the paginator needs.

use crate::layout::font_metrics::{FontMetrics, PageConfig};
use crate::models::{Row, SectionType};
use crate::pagination::{MeasureError, MeasurementOracle, Unit};

/// Space between a section title and its rule line, in points.
const TITLE_RULE_PT: f32 = 4.0;
/// Bullet text starts this far in from the left edge.
const BULLET_INDENT_EM: f32 = 1.5;
/// Horizontal padding inside a tag chip.
const CHIP_PADDING_EM: f32 = 1.0;
const CHIP_GAP_EM: f32 = 0.5;
/// Chip rows are taller than text rows because of their border and padding.
const CHIP_LINE_FACTOR: f32 = 1.3;
const CONTACT_SEPARATOR: &str = " | ";

pub struct TextMetricsOracle {
    config: PageConfig,
    metrics: FontMetrics,
}

impl TextMetricsOracle {
    pub fn new(config: PageConfig) -> Self {
        let metrics = FontMetrics::for_family(config.font);
        TextMetricsOracle { config, metrics }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn title_height(&self, title: &str) -> f32 {
        let scale = self.config.title_scale;
        let lines = self
            .metrics
            .wrapped_lines(title, self.config.text_width_em() / scale);
        lines as f32 * self.config.line_height_pt() * scale + TITLE_RULE_PT
    }

    pub fn row_height(&self, section_type: SectionType, row: &Row) -> f32 {
        let content = match section_type {
            SectionType::Header => self.header_height(row),
            _ => self.entry_height(row),
        };
        content + self.config.row_spacing_pt
    }

    // ── row layouts ─────────────────────────────────────────────────────────

    /// Name line at `name_scale`, then subtitle, contact line and any text.
    fn header_height(&self, row: &Row) -> f32 {
        let width = self.config.text_width_em();
        let scale = self.config.name_scale;
        let name_lines = row
            .title
            .as_deref()
            .map_or(0, |name| self.metrics.wrapped_lines(name, width / scale));

        let contact = row.tags.join(CONTACT_SEPARATOR);
        let body_lines = self.optional_lines(row.subtitle.as_deref(), width)
            + self.metrics.wrapped_lines(&contact, width)
            + self.optional_lines(row.text.as_deref(), width);

        name_lines as f32 * self.config.line_height_pt() * scale
            + body_lines as f32 * self.config.line_height_pt()
    }

    /// Heading (title and dates on one line), subtitle, text, bullets, chips.
    fn entry_height(&self, row: &Row) -> f32 {
        let width = self.config.text_width_em();

        let heading = match (row.title.as_deref(), row.date_range.as_deref()) {
            (Some(title), Some(dates)) => format!("{title}  {dates}"),
            (Some(title), None) => title.to_string(),
            (None, Some(dates)) => dates.to_string(),
            (None, None) => String::new(),
        };

        let mut lines = self.metrics.wrapped_lines(&heading, width)
            + self.optional_lines(row.subtitle.as_deref(), width)
            + self.optional_lines(row.text.as_deref(), width);
        lines += row
            .bullets
            .iter()
            .map(|b| self.metrics.wrapped_lines(b, width - BULLET_INDENT_EM))
            .sum::<u32>();

        lines as f32 * self.config.line_height_pt() + self.chip_height(&row.tags, width)
    }

    fn optional_lines(&self, text: Option<&str>, width_em: f32) -> u32 {
        text.map_or(0, |t| self.metrics.wrapped_lines(t, width_em))
    }

    /// Flow-wraps tags as chips and returns the block height in points.
    fn chip_height(&self, tags: &[String], width_em: f32) -> f32 {
        let mut chips = tags.iter().filter(|t| !t.trim().is_empty());
        let Some(first) = chips.next() else {
            return 0.0;
        };
        let chip_width = |tag: &str| self.metrics.measure_str(tag.trim()) + CHIP_PADDING_EM;

        let mut rows = 1u32;
        let mut current = chip_width(first.as_str());
        for tag in chips {
            let w = chip_width(tag.as_str());
            if current + CHIP_GAP_EM + w > width_em {
                rows += 1;
                current = w;
            } else {
                current += CHIP_GAP_EM + w;
            }
        }
        rows as f32 * self.config.line_height_pt() * CHIP_LINE_FACTOR
    }
}

impl MeasurementOracle for TextMetricsOracle {
    fn measure(&mut self, unit: &Unit<'_>) -> Result<f32, MeasureError> {
        Ok(match unit {
            Unit::Title { section, .. } => self.title_height(&section.section_title),
            Unit::Row { section, row, .. } => self.row_height(section.section_type, row),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{default_page_config, FontFamily};
    use crate::models::{Document, Section};
    use crate::pagination::{paginate, PageCapacity};

    fn oracle() -> TextMetricsOracle {
        TextMetricsOracle::new(default_page_config(FontFamily::Inter))
    }

    fn job(bullets: usize) -> Row {
        Row {
            title: Some("Senior Engineer, Acme Corp".to_string()),
            date_range: Some("2019 – 2023".to_string()),
            subtitle: Some("Berlin".to_string()),
            bullets: (0..bullets)
                .map(|i| {
                    format!(
                        "Built and operated service {i} handling fifty thousand requests per second \
                         across three regions with automated failover and zero-downtime deploys"
                    )
                })
                .collect(),
            ..Row::default()
        }
    }

    #[test]
    fn test_title_height_is_one_scaled_line_plus_rule() {
        let oracle = oracle();
        // 13.75pt × 1.3 + 4
        assert!((oracle.title_height("Experience") - 21.875).abs() < 1e-3);
    }

    #[test]
    fn test_more_bullets_are_taller() {
        let oracle = oracle();
        let short = oracle.row_height(SectionType::Experience, &job(1));
        let long = oracle.row_height(SectionType::Experience, &job(4));
        assert!(long > short);
    }

    #[test]
    fn test_empty_row_is_only_spacing() {
        let oracle = oracle();
        let height = oracle.row_height(SectionType::Custom, &Row::default());
        assert!((height - oracle.config().row_spacing_pt).abs() < 1e-4);
    }

    #[test]
    fn test_header_name_uses_name_scale() {
        let oracle = oracle();
        let header = Row {
            title: Some("Ada Lovelace".to_string()),
            tags: vec!["ada@example.com".to_string(), "London".to_string()],
            ..Row::default()
        };
        let config = oracle.config();
        // name (2× line) + contact line + spacing
        let expected = config.line_height_pt() * config.name_scale + config.line_height_pt() + config.row_spacing_pt;
        assert!((oracle.row_height(SectionType::Header, &header) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_chips_wrap_into_rows() {
        let oracle = oracle();
        let few = Row {
            tags: vec!["Rust".to_string(), "Go".to_string()],
            ..Row::default()
        };
        let many = Row {
            tags: (0..40).map(|i| format!("Technology {i}")).collect(),
            ..Row::default()
        };
        let few_h = oracle.row_height(SectionType::Skills, &few);
        let many_h = oracle.row_height(SectionType::Skills, &many);
        assert!(many_h > few_h * 2.0);
    }

    #[test]
    fn test_condensed_font_needs_less_height() {
        let wide = TextMetricsOracle::new(default_page_config(FontFamily::Lato));
        let narrow = TextMetricsOracle::new(default_page_config(FontFamily::Oswald));
        // ≈ 43em in Inter: wraps in Lato, fits one line in Oswald.
        let row = Row::with_text("word ".repeat(18));
        assert!(
            narrow.row_height(SectionType::Experience, &row)
                < wide.row_height(SectionType::Experience, &row)
        );
    }

    #[test]
    fn test_long_resume_spans_pages_within_capacity() {
        let config = default_page_config(FontFamily::Inter);
        let capacity = config.usable_height();
        let doc = Document::new(vec![
            Section::new(
                SectionType::Header,
                "",
                vec![Row {
                    title: Some("Ada Lovelace".to_string()),
                    tags: vec!["ada@example.com".to_string()],
                    ..Row::default()
                }],
            ),
            Section::new(SectionType::Experience, "Experience", (0..12).map(|_| job(4)).collect()),
        ]);

        let mut oracle = TextMetricsOracle::new(config.clone());
        let pages = paginate(&doc, &config, &mut oracle).unwrap();

        assert!(pages.len() >= 2, "twelve long jobs should not fit on one page");
        for page in &pages {
            assert!(page.content_height <= capacity);
        }
        let placed: usize = pages.iter().map(|p| p.row_count()).sum();
        assert_eq!(placed, 13);
    }
}
