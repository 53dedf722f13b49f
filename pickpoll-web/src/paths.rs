//! Helpers for constructing URLs to static assets that respect the deployment base path.
///
/// When `PUBLIC_URL` is set at compile time (e.g., `/poll` for GitHub Pages),
/// generated URLs are prefixed accordingly. Local builds without `PUBLIC_URL`
/// fall back to root-anchored paths.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    asset_path_with_base(relative, option_env!("PUBLIC_URL").unwrap_or(""))
}

/// URL for an item's image reference (`./img/bag.jpg` style refs are rebased).
#[must_use]
pub fn image_src(image_ref: &str) -> String {
    if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
        return image_ref.to_string();
    }
    asset_path(image_ref.trim_start_matches("./"))
}

/// Base path for the router (e.g., `/poll` when hosted under a subdirectory).
///
/// Returns `None` when no base path is configured so the router falls back to root.
#[must_use]
pub fn router_base() -> Option<String> {
    router_base_with_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

fn asset_path_with_base(relative: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = relative.trim_start_matches('/');

    if base.is_empty() {
        format!("/{rel}")
    } else {
        format!("{base}/{rel}")
    }
}

fn router_base_with_base(base: &str) -> Option<String> {
    let base = base.trim_end_matches('/').trim();
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{image_src, router_base};

    #[test]
    fn rebases_relative_image_refs() {
        assert_eq!(image_src("./img/bag.jpg"), "/img/bag.jpg");
        assert_eq!(image_src("img/sweep.png"), "/img/sweep.png");
        assert_eq!(
            image_src("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn builds_paths_with_public_base() {
        assert_eq!(
            super::asset_path_with_base("img/bag.jpg", "/poll"),
            "/poll/img/bag.jpg"
        );
        assert_eq!(
            super::asset_path_with_base("/img/bag.jpg", "/poll/"),
            "/poll/img/bag.jpg"
        );
    }

    #[test]
    fn router_base_is_none_by_default() {
        assert_eq!(router_base(), None);
    }

    #[test]
    fn router_base_returns_trimmed_value() {
        assert_eq!(
            super::router_base_with_base("/poll/"),
            Some(String::from("/poll"))
        );
    }
}
