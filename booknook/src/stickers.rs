//! Journal stickers
//!
//! Stickers are decorative emoji tags attached to a journal entry. The
//! entry schema has no column for them, so they travel inside the entry
//! content as a trailer:
//!
//! ```text
//! <visible text>\n\n<!--stickers:["heart1","flower2"]-->
//! ```
//!
//! The trailer is only recognised as the very end of the content. A
//! marker typed in the middle of an entry is plain text.

use crate::config::MAX_STICKERS;
use serde::Serialize;

const TRAILER_PREFIX: &str = "<!--stickers:";
const TRAILER_SUFFIX: &str = "-->";
const TRAILER_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerCategory {
    Hearts,
    Stars,
    Sparkles,
    Animals,
    Flowers,
    Food,
    Emotions,
}

impl StickerCategory {
    pub const ALL: [StickerCategory; 7] = [
        StickerCategory::Hearts,
        StickerCategory::Stars,
        StickerCategory::Sparkles,
        StickerCategory::Animals,
        StickerCategory::Flowers,
        StickerCategory::Food,
        StickerCategory::Emotions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hearts => "Hearts",
            Self::Stars => "Stars",
            Self::Sparkles => "Sparkles",
            Self::Animals => "Animals",
            Self::Flowers => "Flowers",
            Self::Food => "Food",
            Self::Emotions => "Emotions",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Hearts => "💖",
            Self::Stars => "⭐",
            Self::Sparkles => "✨",
            Self::Animals => "🦋",
            Self::Flowers => "🌸",
            Self::Food => "🧁",
            Self::Emotions => "🥰",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sticker {
    pub id: &'static str,
    pub emoji: &'static str,
    pub name: &'static str,
    pub category: StickerCategory,
}

macro_rules! sticker {
    ($id:literal, $emoji:literal, $name:literal, $cat:ident) => {
        Sticker {
            id: $id,
            emoji: $emoji,
            name: $name,
            category: StickerCategory::$cat,
        }
    };
}

pub const STICKERS: &[Sticker] = &[
    sticker!("heart1", "💖", "Pink Heart", Hearts),
    sticker!("heart2", "💕", "Two Hearts", Hearts),
    sticker!("heart3", "💗", "Growing Heart", Hearts),
    sticker!("heart4", "💝", "Gift Heart", Hearts),
    sticker!("heart5", "💞", "Revolving Hearts", Hearts),
    sticker!("heart6", "🩷", "Light Pink Heart", Hearts),
    sticker!("heart7", "🩵", "Light Blue Heart", Hearts),
    sticker!("heart8", "💜", "Purple Heart", Hearts),
    sticker!("star1", "⭐", "Star", Stars),
    sticker!("star2", "🌟", "Glowing Star", Stars),
    sticker!("star3", "✨", "Sparkles", Sparkles),
    sticker!("star4", "💫", "Dizzy", Sparkles),
    sticker!("star5", "🌠", "Shooting Star", Stars),
    sticker!("star6", "⚡", "Lightning", Sparkles),
    sticker!("animal1", "🦋", "Butterfly", Animals),
    sticker!("animal2", "🐱", "Cat", Animals),
    sticker!("animal3", "🐰", "Bunny", Animals),
    sticker!("animal4", "🦄", "Unicorn", Animals),
    sticker!("animal5", "🐻", "Bear", Animals),
    sticker!("animal6", "🐼", "Panda", Animals),
    sticker!("animal7", "🦊", "Fox", Animals),
    sticker!("animal8", "🐶", "Dog", Animals),
    sticker!("flower1", "🌸", "Cherry Blossom", Flowers),
    sticker!("flower2", "🌷", "Tulip", Flowers),
    sticker!("flower3", "🌹", "Rose", Flowers),
    sticker!("flower4", "🌺", "Hibiscus", Flowers),
    sticker!("flower5", "🌻", "Sunflower", Flowers),
    sticker!("flower6", "💐", "Bouquet", Flowers),
    sticker!("flower7", "🪻", "Hyacinth", Flowers),
    sticker!("flower8", "🌼", "Blossom", Flowers),
    sticker!("food1", "🍰", "Cake", Food),
    sticker!("food2", "🧁", "Cupcake", Food),
    sticker!("food3", "🍩", "Donut", Food),
    sticker!("food4", "🍪", "Cookie", Food),
    sticker!("food5", "🍓", "Strawberry", Food),
    sticker!("food6", "🍒", "Cherries", Food),
    sticker!("food7", "☕", "Coffee", Food),
    sticker!("food8", "🧋", "Boba Tea", Food),
    sticker!("emotion1", "🥰", "Love Face", Emotions),
    sticker!("emotion2", "😊", "Happy", Emotions),
    sticker!("emotion3", "🤗", "Hugging", Emotions),
    sticker!("emotion4", "😍", "Heart Eyes", Emotions),
    sticker!("emotion5", "🥺", "Pleading", Emotions),
    sticker!("emotion6", "😇", "Angel", Emotions),
    sticker!("emotion7", "🤩", "Star Eyes", Emotions),
    sticker!("emotion8", "😸", "Happy Cat", Emotions),
];

/// Look up a sticker by id
pub fn find(id: &str) -> Option<&'static Sticker> {
    STICKERS.iter().find(|s| s.id == id)
}

/// Stickers belonging to one picker category, in catalog order
pub fn in_category(category: StickerCategory) -> impl Iterator<Item = &'static Sticker> {
    STICKERS.iter().filter(move |s| s.category == category)
}

/// Emoji for the known ids in `ids`, skipping unknown ones
pub fn emojis(ids: &[String]) -> String {
    ids.iter().filter_map(|id| find(id)).map(|s| s.emoji).collect()
}

/// Ordered set of sticker ids chosen for one entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StickerSelection {
    ids: Vec<String>,
}

impl StickerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored ids, dropping duplicates and anything past the cap
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for id in ids {
            let id = id.into();
            if !selection.contains(&id) && selection.ids.len() < MAX_STICKERS {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Add `id` if absent, remove it if present.
    ///
    /// Returns `false` when the add was refused because the selection is full.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            return true;
        }
        if self.ids.len() >= MAX_STICKERS {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_STICKERS
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

/// Entry content split into what the reader sees and its stickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    pub text: String,
    pub stickers: Vec<String>,
}

/// Append the sticker trailer to `text`.
///
/// With no stickers the text is returned as is, unless it already ends in
/// something that would parse as a trailer; then an empty trailer is
/// appended so the text survives [`parse_content`] unchanged.
pub fn encode_content(text: &str, stickers: &[String]) -> String {
    if stickers.is_empty() && split_trailer(text).is_none() {
        return text.to_string();
    }

    // A list of strings always serializes
    let json = serde_json::to_string(stickers).unwrap_or_else(|_| "[]".to_string());
    format!(
        "{}{}{}{}{}",
        text, TRAILER_SEPARATOR, TRAILER_PREFIX, json, TRAILER_SUFFIX
    )
}

/// Split stored content into visible text and sticker ids.
///
/// Content without a well-formed trailing marker is returned whole with
/// no stickers.
pub fn parse_content(raw: &str) -> ParsedContent {
    match split_trailer(raw) {
        Some((text, stickers)) => ParsedContent {
            text: text.to_string(),
            stickers,
        },
        None => ParsedContent {
            text: raw.to_string(),
            stickers: Vec::new(),
        },
    }
}

fn split_trailer(raw: &str) -> Option<(&str, Vec<String>)> {
    let body = raw.strip_suffix(TRAILER_SUFFIX)?;
    let start = body.rfind(TRAILER_PREFIX)?;
    let json = &body[start + TRAILER_PREFIX.len()..];
    if !json.starts_with('[') {
        return None;
    }

    let stickers: Vec<String> = match serde_json::from_str(json) {
        Ok(stickers) => stickers,
        Err(e) => {
            tracing::debug!("Ignoring malformed sticker trailer: {}", e);
            return None;
        }
    };

    let before = &raw[..start];
    let text = before.strip_suffix(TRAILER_SEPARATOR).unwrap_or(before);
    Some((text, stickers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(STICKERS.len(), 46);
        assert_eq!(in_category(StickerCategory::Hearts).count(), 8);
        assert_eq!(in_category(StickerCategory::Sparkles).count(), 3);
        assert_eq!(find("flower1").unwrap().emoji, "🌸");
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut seen = std::collections::HashSet::new();
        for sticker in STICKERS {
            assert!(seen.insert(sticker.id), "duplicate id {}", sticker.id);
        }
    }

    #[test]
    fn test_encode_matches_stored_format() {
        let encoded = encode_content("Loved it", &ids(&["heart1", "star2"]));
        assert_eq!(encoded, "Loved it\n\n<!--stickers:[\"heart1\",\"star2\"]-->");
    }

    #[test]
    fn test_encode_without_stickers_is_identity() {
        assert_eq!(encode_content("Plain thoughts", &[]), "Plain thoughts");
    }

    #[test]
    fn test_round_trip() {
        let text = "Chapter 3 made me cry.\n\nThen laugh.";
        let stickers = ids(&["emotion5", "heart2", "food7"]);

        let parsed = parse_content(&encode_content(text, &stickers));
        assert_eq!(parsed.text, text);
        assert_eq!(parsed.stickers, stickers);
    }

    #[test]
    fn test_parse_without_trailer() {
        let parsed = parse_content("Just words");
        assert_eq!(parsed.text, "Just words");
        assert!(parsed.stickers.is_empty());
    }

    #[test]
    fn test_parse_invalid_json_keeps_content() {
        let raw = "Words\n\n<!--stickers:[heart1]-->";
        let parsed = parse_content(raw);
        assert_eq!(parsed.text, raw);
        assert!(parsed.stickers.is_empty());
    }

    #[test]
    fn test_marker_mid_text_is_plain_text() {
        let raw = "I typed <!--stickers:[\"heart1\"]--> on purpose, then kept going";
        let parsed = parse_content(raw);
        assert_eq!(parsed.text, raw);
        assert!(parsed.stickers.is_empty());
    }

    #[test]
    fn test_marker_in_text_survives_round_trip() {
        let text = "Tricky ending <!--stickers:[\"star1\"]-->";

        let encoded = encode_content(text, &[]);
        assert_ne!(encoded, text);

        let parsed = parse_content(&encoded);
        assert_eq!(parsed.text, text);
        assert!(parsed.stickers.is_empty());

        let with = parse_content(&encode_content(text, &ids(&["heart3"])));
        assert_eq!(with.text, text);
        assert_eq!(with.stickers, ids(&["heart3"]));
    }

    #[test]
    fn test_selection_toggle_and_cap() {
        let mut selection = StickerSelection::new();
        for id in ["heart1", "heart2", "heart3", "heart4", "heart5"] {
            assert!(selection.toggle(id));
        }
        assert!(selection.is_full());
        assert!(!selection.toggle("star1"));
        assert!(!selection.contains("star1"));

        assert!(selection.toggle("heart2"));
        assert_eq!(selection.len(), 4);
        assert!(selection.toggle("star1"));
        assert_eq!(
            selection.ids(),
            &ids(&["heart1", "heart3", "heart4", "heart5", "star1"])[..]
        );
    }

    #[test]
    fn test_selection_from_ids_dedupes() {
        let selection = StickerSelection::from_ids(["a", "b", "a", "c"]);
        assert_eq!(selection.ids(), &ids(&["a", "b", "c"])[..]);
    }

    #[test]
    fn test_emojis_skip_unknown() {
        assert_eq!(emojis(&ids(&["animal2", "mystery", "flower5"])), "🐱🌻");
    }
}
