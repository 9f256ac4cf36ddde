//! Mapping strategies
//!
//! Produces a [`GroupPlan`] for one remote group: the local folder name, the
//! `original -> new` file mappings, the expected total and whether sidecar
//! metadata was used.
//!
//! Two strategies exist. **Structured** renames files from sidecar rows
//! (movie and show programs); **passthrough** keeps remote names verbatim.
//! Both are pure over their inputs; the caller lists keys and fetches the
//! sidecar through the store port.

use std::collections::HashSet;

use reelsync_core::domain::filter::{is_syncable_object, is_visible_object, MEDIA_EXTENSION};
use reelsync_core::domain::mapping::MappingSet;
use reelsync_core::domain::newtypes::{GroupPrefix, ObjectKey};

use crate::normalize::{extract_language, normalize};
use crate::sidecar::{SidecarRow, SIDECAR_EXTENSION};

/// The three fixed poster columns and their destination suffixes
const POSTER_FIELDS: [(&str, &str); 3] = [
    ("key_art_16_9_filename", "-poster.(16x9).jpg"),
    ("key_art_2_3_filename", "-poster.(2x3).jpg"),
    ("key_art_3_4_filename", "-poster.(3x4).jpg"),
];

/// Refresh-time output for one group
#[derive(Debug, Clone)]
pub struct GroupPlan {
    /// The group's remote prefix
    pub prefix: GroupPrefix,
    /// Local folder name the group's files are placed under
    pub local_name: String,
    /// Rename rules, unique by original
    pub mappings: MappingSet,
    /// Expected object count: mapping count, or the filtered raw key count
    /// when no mappings were produced
    pub total: u64,
    /// Whether sidecar rows were parsed for this group
    pub data_parsed: bool,
}

/// Finds the sidecar key within a group listing
///
/// Returns the first visible (non-marker, non-hidden) key with the sidecar
/// extension, in the store's listing order. The media-inclusion flag is not
/// consulted here.
#[must_use]
pub fn locate_sidecar<'a>(prefix: &GroupPrefix, keys: &'a [ObjectKey]) -> Option<&'a ObjectKey> {
    keys.iter()
        .find(|key| is_visible_object(key, prefix) && key.has_extension(SIDECAR_EXTENSION))
}

/// Builds a passthrough plan: every syncable key maps to itself
#[must_use]
pub fn passthrough_plan(prefix: &GroupPrefix, keys: &[ObjectKey], include_mp4: bool) -> GroupPlan {
    let mut mappings = MappingSet::new();
    for key in keys {
        if !is_syncable_object(key, prefix, include_mp4) {
            continue;
        }
        let relative = prefix.relative_of(key);
        mappings.insert(relative, relative);
    }

    let total = mappings.len() as u64;
    let data_parsed = !mappings.is_empty();
    GroupPlan {
        local_name: prefix.display_name().to_string(),
        prefix: prefix.clone(),
        mappings,
        total,
        data_parsed,
    }
}

/// Builds a structured plan from parsed sidecar rows
///
/// With zero rows the plan degrades to the raw filtered key count and
/// `data_parsed = false`. With rows but no resulting mappings (for example
/// every program type is unknown), the raw count is kept as the total while
/// `data_parsed` stays true.
#[must_use]
pub fn structured_plan(
    prefix: &GroupPrefix,
    keys: &[ObjectKey],
    rows: &[SidecarRow],
    include_mp4: bool,
) -> GroupPlan {
    let raw_total = keys
        .iter()
        .filter(|key| is_syncable_object(key, prefix, include_mp4))
        .count() as u64;
    let default_local = prefix.display_name();

    if rows.is_empty() {
        return GroupPlan {
            prefix: prefix.clone(),
            local_name: default_local.to_string(),
            mappings: MappingSet::new(),
            total: raw_total,
            data_parsed: false,
        };
    }

    let mappings = build_structured_mappings(rows, include_mp4);
    let local_name = derive_local_name(&rows[0], default_local);
    let total = if mappings.is_empty() {
        raw_total
    } else {
        mappings.len() as u64
    };

    GroupPlan {
        prefix: prefix.clone(),
        local_name,
        mappings,
        total,
        data_parsed: true,
    }
}

/// Derives the local folder name from the first sidecar row:
/// `normalize(title).(normalize(year))`, with the group's trailing path
/// segment standing in when the title column is absent.
fn derive_local_name(first_row: &SidecarRow, default_local: &str) -> String {
    let title = first_row.get("movie_show_title").unwrap_or(default_local);
    let year = first_row.field("production_year");
    format!("{}.({})", normalize(title, '.'), normalize(year, '.'))
}

/// Builds mappings across all sidecar rows
///
/// The uniqueness of `original` is global across the group (the
/// [`MappingSet`] drops duplicates); the subtitle language dedup for shows
/// is per row. Movies intentionally apply no language dedup.
fn build_structured_mappings(rows: &[SidecarRow], include_mp4: bool) -> MappingSet {
    let mut mappings = MappingSet::new();

    for row in rows {
        let mut lang_seen: HashSet<String> = HashSet::new();

        match row.field("program_type").to_lowercase().as_str() {
            "movie" => {
                let title = row.field("movie_show_title");
                let year = row.field("production_year");
                let base = normalize(&format!("{title}.({year})"), '.');

                let feature = row.field("movie_filename");
                if !feature.is_empty() && include_mp4 {
                    mappings.insert(feature, format!("{base}{MEDIA_EXTENSION}"));
                }

                let trailer = row.field("trailer_filename");
                if !trailer.is_empty() && include_mp4 {
                    mappings.insert(trailer, format!("{base}-trailer{MEDIA_EXTENSION}"));
                }

                for (field, suffix) in POSTER_FIELDS {
                    let original = row.field(field);
                    if !original.is_empty() {
                        mappings.insert(original, format!("{base}{suffix}"));
                    }
                }

                let subtitles = row.field("movie_subtitles_captions_filenames");
                for subtitle in subtitles.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if mappings.contains(subtitle) {
                        continue;
                    }
                    let lang = extract_language(subtitle);
                    mappings.insert(subtitle, format!("{base}.{lang}.srt"));
                }
            }
            "show" => {
                let series = row.field("movie_show_title");
                let year = row.field("production_year");
                let season: u32 = row.field("season_number").parse().unwrap_or(0);
                let episode: u32 = row.field("episode_number").parse().unwrap_or(0);

                let series_base = normalize(&format!("{series}.({year})"), '.');
                let episode_base = format!(
                    "{series_base}.s{season:02}e{episode:02}.{}",
                    normalize(row.field("episode_name"), '.')
                );

                let feature = row.field("episode_filename");
                if !feature.is_empty() && include_mp4 {
                    mappings.insert(feature, format!("{episode_base}{MEDIA_EXTENSION}"));
                }

                // Trailer is keyed off the series, not the episode
                let trailer = row.field("trailer_filename");
                if !trailer.is_empty() && include_mp4 {
                    mappings.insert(trailer, format!("{series_base}-trailer{MEDIA_EXTENSION}"));
                }

                for (field, suffix) in POSTER_FIELDS {
                    let original = row.field(field);
                    if !original.is_empty() {
                        mappings.insert(original, format!("{episode_base}{suffix}"));
                    }
                }

                // Only the first subtitle per distinct language per row is kept
                let subtitles = row.field("episode_subtitles_captions_filenames");
                for subtitle in subtitles.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if mappings.contains(subtitle) {
                        continue;
                    }
                    let lang = extract_language(subtitle);
                    if lang_seen.contains(&lang) {
                        continue;
                    }
                    if mappings.insert(subtitle, format!("{episode_base}.{lang}.srt")) {
                        lang_seen.insert(lang);
                    }
                }
            }
            // Unknown program types contribute no mappings
            _ => {}
        }
    }

    mappings
}
