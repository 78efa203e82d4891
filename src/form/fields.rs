use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::client::models::CaptionRequest;

/// Mood the captions should convey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Happy,
    Excited,
    Funny,
    Sarcastic,
    Professional,
    Sad,
    Inspiring,
    Calm,
    Witty,
    Nostalgic,
}

impl Tone {
    pub const ALL: [Tone; 10] = [
        Tone::Happy,
        Tone::Excited,
        Tone::Funny,
        Tone::Sarcastic,
        Tone::Professional,
        Tone::Sad,
        Tone::Inspiring,
        Tone::Calm,
        Tone::Witty,
        Tone::Nostalgic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Happy => "Happy",
            Tone::Excited => "Excited",
            Tone::Funny => "Funny",
            Tone::Sarcastic => "Sarcastic",
            Tone::Professional => "Professional",
            Tone::Sad => "Sad",
            Tone::Inspiring => "Inspiring",
            Tone::Calm => "Calm",
            Tone::Witty => "Witty",
            Tone::Nostalgic => "Nostalgic",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .iter()
            .copied()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown tone '{}'. Use one of: {}", s, join_names(Tone::ALL.iter().map(Tone::as_str))))
    }
}

/// Writing style of the captions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WritingStyle {
    #[default]
    Casual,
    Formal,
    Poetic,
    Narrative,
    Conversational,
    Persuasive,
}

impl WritingStyle {
    pub const ALL: [WritingStyle; 6] = [
        WritingStyle::Casual,
        WritingStyle::Formal,
        WritingStyle::Poetic,
        WritingStyle::Narrative,
        WritingStyle::Conversational,
        WritingStyle::Persuasive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WritingStyle::Casual => "Casual",
            WritingStyle::Formal => "Formal",
            WritingStyle::Poetic => "Poetic",
            WritingStyle::Narrative => "Narrative",
            WritingStyle::Conversational => "Conversational",
            WritingStyle::Persuasive => "Persuasive",
        }
    }
}

impl fmt::Display for WritingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WritingStyle::ALL
            .iter()
            .copied()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown writing style '{}'. Use one of: {}",
                    s,
                    join_names(WritingStyle::ALL.iter().map(WritingStyle::as_str))
                )
            })
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// The editable fields of the caption form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    /// Short description of the image, required before submitting
    pub description: String,
    pub tone: Tone,
    pub style: WritingStyle,
    /// Free text such as location or event; empty means none
    pub additional_context: String,
    pub emojis: bool,
    pub hashtags: bool,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            description: String::new(),
            tone: Tone::Happy,
            style: WritingStyle::Casual,
            additional_context: String::new(),
            emojis: true,
            hashtags: true,
        }
    }
}

impl FormFields {
    /// Builds the request body for the caption endpoint
    pub fn to_request(&self) -> CaptionRequest {
        CaptionRequest {
            description: self.description.clone(),
            tone: self.tone,
            style: self.style,
            additional_context: if self.additional_context.is_empty() {
                None
            } else {
                Some(self.additional_context.clone())
            },
            emojis: self.emojis,
            hashtags: self.hashtags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let fields = FormFields::default();
        assert_eq!(fields.tone, Tone::Happy);
        assert_eq!(fields.style, WritingStyle::Casual);
        assert!(fields.description.is_empty());
        assert!(fields.additional_context.is_empty());
        assert!(fields.emojis);
        assert!(fields.hashtags);
    }

    #[test]
    fn test_parse_names_ignoring_case() {
        assert_eq!("witty".parse::<Tone>().unwrap(), Tone::Witty);
        assert_eq!(" NOSTALGIC ".parse::<Tone>().unwrap(), Tone::Nostalgic);
        assert_eq!("poetic".parse::<WritingStyle>().unwrap(), WritingStyle::Poetic);
        assert!("grumpy".parse::<Tone>().is_err());
        assert!("haiku".parse::<WritingStyle>().is_err());
    }

    #[test]
    fn test_empty_context_becomes_none() {
        let mut fields = FormFields {
            description: "A dog on a beach".to_string(),
            ..FormFields::default()
        };
        assert_eq!(fields.to_request().additional_context, None);

        fields.additional_context = "Sunset in Malibu".to_string();
        assert_eq!(
            fields.to_request().additional_context.as_deref(),
            Some("Sunset in Malibu")
        );
    }
}
