use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::scoring::LeaderboardEntry;

pub const EMBED_COLOR: u32 = 0xFFD700;
/// Discord rejects embeds with more than 25 fields
pub const MAX_EMBED_FIELDS: usize = 25;

const BLANK: &str = "\u{200B}";
const THUMBNAIL_URL: &str = "https://i.imgur.com/HzTLxpF.png?size=80";
const FOOTER_ICON_URL: &str = "https://i.imgur.com/9Iaiwje.png";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub thumbnail: EmbedImage,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

/// Message body carrying the leaderboard embed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePayload {
    pub embeds: Vec<Embed>,
}

pub fn rank_emoji(rank: usize) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "🎖️",
    }
}

pub fn render_leaderboard(
    entries: &[LeaderboardEntry],
    size: usize,
    refreshed_at: DateTime<Utc>,
) -> MessagePayload {
    let mut fields = vec![EmbedField {
        name: BLANK.to_string(),
        value: BLANK.to_string(),
        inline: false,
    }];
    fields.extend(
        entries
            .iter()
            .take(MAX_EMBED_FIELDS - 1)
            .map(|entry| EmbedField {
                name: format!("{} Rang {}", rank_emoji(entry.rank), entry.rank),
                value: format!(
                    "**{}** - {} {}",
                    entry.name,
                    entry.points,
                    if entry.points == 1 {
                        "Garrison"
                    } else {
                        "Garrisons"
                    }
                ),
                inline: true,
            }),
    );

    MessagePayload {
        embeds: vec![Embed {
            title: format!("🏆 Top {} Officers in Garrison Building 🏆", size),
            description: "Best Garrison Builders of the Day!".to_string(),
            color: EMBED_COLOR,
            thumbnail: EmbedImage {
                url: THUMBNAIL_URL.to_string(),
            },
            fields,
            footer: EmbedFooter {
                text: "Last Refresh".to_string(),
                icon_url: FOOTER_ICON_URL.to_string(),
            },
            timestamp: refreshed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }],
    }
}
