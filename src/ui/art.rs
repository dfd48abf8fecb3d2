use rust_embed::Embed;

use crate::session::character::CharacterId;
use crate::session::presenter::ScreenVariant;

#[derive(Embed)]
#[folder = "assets/art/"]
struct ArtAssets;

/// Text art lines for `asset_id`, or a one-line placeholder if the asset is
/// missing or not UTF-8.
pub fn lines(asset_id: &str) -> Vec<String> {
    let filename = format!("{asset_id}.txt");
    let Some(file) = ArtAssets::get(&filename) else {
        log::warn!("missing art asset {filename}");
        return vec![format!("[{asset_id}]")];
    };
    match std::str::from_utf8(file.data.as_ref()) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(_) => vec![format!("[{asset_id}]")],
    }
}

pub fn character(id: CharacterId) -> Vec<String> {
    lines(id.asset_id())
}

pub fn state_icon(variant: ScreenVariant) -> Vec<String> {
    match variant {
        ScreenVariant::Correct => lines("correct"),
        ScreenVariant::Incorrect => lines("incorrect"),
    }
}
