use crate::surface::{Segment, SuggestionItem};
use egui::text::LayoutJob;
use egui::{Color32, Stroke, TextFormat};

pub struct SuggestionLayout;

impl SuggestionLayout {
    /// Builds one egui text job per suggestion row, one section per segment.
    pub fn format_item(item: &SuggestionItem, highlighted: bool) -> LayoutJob {
        let mut job = LayoutJob::default();
        let background = if highlighted {
            Color32::from_rgb(50, 60, 80) // Selection slate
        } else {
            Color32::TRANSPARENT
        };

        for segment in &item.segments {
            job.append(&segment.text, 0.0, Self::format_for(segment, background));
        }

        job
    }

    fn format_for(segment: &Segment, background: Color32) -> TextFormat {
        if segment.emphasized {
            TextFormat {
                font_id: egui::FontId::proportional(13.0),
                color: Color32::WHITE,
                background,
                underline: Stroke::new(1.0, Color32::from_rgb(150, 170, 255)),
                ..Default::default()
            }
        } else {
            TextFormat {
                font_id: egui::FontId::proportional(13.0),
                color: Color32::from_rgb(160, 170, 180),
                background,
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_section_per_segment() {
        let item = SuggestionItem {
            value: "MANIJA".into(),
            segments: vec![Segment::emphasized("MA"), Segment::plain("NIJA")],
        };
        let job = SuggestionLayout::format_item(&item, true);
        assert_eq!(job.text, "MANIJA");
        assert_eq!(job.sections.len(), 2);
        assert_eq!(job.sections[0].format.color, Color32::WHITE);
        assert_eq!(job.sections[1].byte_range, 2..6);
        assert_eq!(job.sections[1].format.background, Color32::from_rgb(50, 60, 80));
    }
}
