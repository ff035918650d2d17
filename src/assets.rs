use std::borrow::Cow;

use gpui::{AssetSource, SharedString};
use rust_embed::RustEmbed;

/// Everything under `assets/`: the site profile and the page icons.
#[derive(RustEmbed)]
#[folder = "assets"]
pub struct Assets;

impl Assets {
    pub const SITE_PROFILE: &'static str = "site.toml";

    pub fn text(path: &str) -> Option<String> {
        let file = Self::get(path)?;
        String::from_utf8(file.data.into_owned()).ok()
    }
}

impl AssetSource for Assets {
    fn load(&self, path: &str) -> gpui::Result<Option<Cow<'static, [u8]>>> {
        Ok(Self::get(path).map(|file| file.data))
    }

    fn list(&self, path: &str) -> gpui::Result<Vec<SharedString>> {
        Ok(Self::iter()
            .filter(|entry| entry.starts_with(path))
            .map(|entry| SharedString::from(entry.into_owned()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use gpui::AssetSource;

    use super::Assets;

    #[test]
    fn page_icons_are_embedded() {
        let icons = Assets.list("icons/").expect("list icons");
        for name in ["github", "linkedin", "mail", "map-pin", "loader", "handshake"] {
            let path = format!("icons/{name}.svg");
            assert!(
                icons.iter().any(|entry| entry.as_ref() == path),
                "missing {path}"
            );
        }
    }

    #[test]
    fn missing_asset_loads_as_none() {
        assert!(Assets.load("icons/nope.svg").expect("load").is_none());
    }
}
