use std::borrow::Cow;
use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Aliases with no GitHub shortcode, mostly CLDR names.
const EXTRA_ALIASES: &[(&str, &str)] = &[
    ("check_mark_button", "✅"),
    ("cross_mark", "❌"),
    ("face_with_tears_of_joy", "😂"),
    ("grinning_face", "😀"),
    ("high_voltage", "⚡"),
    ("information", "ℹ️"),
    ("light_bulb", "💡"),
    ("party_popper", "🎉"),
    ("red_heart", "❤️"),
    ("red_question_mark", "❓"),
    ("rolling_on_the_floor_laughing", "🤣"),
    ("thumbs_down", "👎"),
    ("thumbs_up", "👍"),
];

/// GitHub shortcodes first, then the extra names.
pub fn emoji_for_alias(alias: &str) -> Option<&'static str> {
    lazy_static! {
        static ref EXTRAS: HashMap<&'static str, &'static str> = EXTRA_ALIASES.iter().copied().collect();
    }
    match emojis::get_by_shortcode(alias) {
        Some(emoji) => Some(emoji.as_str()),
        None => EXTRAS.get(alias).copied(),
    }
}

/// Replaces `:alias:` with its glyph. Unknown aliases stay as they are.
pub fn emojize(content: &str) -> Cow<'_, str> {
    lazy_static! {
        static ref ALIAS_REGEX: Regex = Regex::new(r":([a-zA-Z0-9_+\-]+):").unwrap();
    }

    ALIAS_REGEX.replace_all(content, |caps: &Captures| {
        match emoji_for_alias(&caps[1]) {
            Some(glyph) => glyph.to_string(),
            None => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emojize() {
        assert_eq!(emojize("Ship it :rocket:"), "Ship it 🚀");
        assert_eq!(emojize(":fire::fire:"), "🔥🔥");
        assert_eq!(emojize("nice :+1: work"), "nice 👍 work");
    }

    #[test]
    fn test_github_shortcodes() {
        assert_eq!(emojize(":arrow_right: next"), "➡️ next");
        assert_eq!(emojize(":green_heart::sparkling_heart:"), "💚💖");
        assert_eq!(emojize(":tv: :star2:"), "📺 🌟");
        assert_eq!(emoji_for_alias("heavy_exclamation_mark"), Some("❗"));
    }

    #[test]
    fn test_extra_aliases() {
        assert_eq!(emojize("great :thumbs_up:"), "great 👍");
        assert_eq!(emoji_for_alias("party_popper"), Some("🎉"));
    }

    #[test]
    fn test_unknown_alias_is_kept() {
        assert_eq!(emojize("what :not_an_emoji: is"), "what :not_an_emoji: is");
        assert_eq!(emojize("at 10:30:45 sharp"), "at 10:30:45 sharp");
    }
}
