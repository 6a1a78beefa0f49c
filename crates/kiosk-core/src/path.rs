#![forbid(unsafe_code)]

//! Route composition under a deployment prefix.
//!
//! The application may be served from a sub-path (`/bimba`, `/app/`), so
//! absolute routes are always built as `root + "/" + segment` with slashes
//! normalized at the seam.

/// Normalize the configured application root.
///
/// Trailing slashes are stripped; an unset root yields the empty string.
#[must_use]
pub fn resolve_root(configured: Option<&str>) -> String {
    configured
        .map(|root| root.trim_end_matches('/').to_owned())
        .unwrap_or_default()
}

/// Join `segment` onto `base` with exactly one slash between them.
///
/// An empty `base` yields `"/" + segment`.
#[must_use]
pub fn join(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    if base.is_empty() {
        format!("/{segment}")
    } else {
        format!("{base}/{segment}")
    }
}

/// Strip trailing slashes from a location path (`"/kiosk/"` -> `"/kiosk"`).
#[must_use]
pub fn normalize_location(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Canonical kiosk routes resolved against the application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskPaths {
    root: String,
    home: String,
    products: String,
}

impl KioskPaths {
    /// Resolve the routes for `root` using the given home and products segments.
    #[must_use]
    pub fn new(root: &str, home_segment: &str, products_segment: &str) -> Self {
        let root = resolve_root(Some(root));
        let home = normalize_location(&join(&root, home_segment)).to_owned();
        let products = normalize_location(&join(&root, products_segment)).to_owned();
        Self {
            root,
            home,
            products,
        }
    }

    /// The normalized application root.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// `{root}/kiosk`
    #[must_use]
    pub fn home(&self) -> &str {
        &self.home
    }

    /// `{root}/kiosk/products`
    #[must_use]
    pub fn products(&self) -> &str {
        &self.products
    }

    /// Whether `location` (trailing slash tolerated) is the home or products screen.
    #[must_use]
    pub fn is_idle_guarded(&self, location: &str) -> bool {
        let location = normalize_location(location);
        location == self.home || location == self.products
    }
}

impl Default for KioskPaths {
    fn default() -> Self {
        Self::new("", "kiosk", "kiosk/products")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_root_strips_trailing_slash() {
        assert_eq!(resolve_root(Some("/bimba/")), "/bimba");
        assert_eq!(resolve_root(Some("/bimba")), "/bimba");
        assert_eq!(resolve_root(Some("/")), "");
        assert_eq!(resolve_root(None), "");
    }

    #[test]
    fn join_collapses_slashes_at_the_seam() {
        assert_eq!(join("/kiosk/", "/products"), "/kiosk/products");
        assert_eq!(join("/kiosk", "products"), "/kiosk/products");
        assert_eq!(join("", "kiosk"), "/kiosk");
        assert_eq!(join("", "/kiosk"), "/kiosk");
        assert_eq!(join("/app//", "//kiosk"), "/app/kiosk");
    }

    #[test]
    fn kiosk_paths_under_prefix() {
        let paths = KioskPaths::new("/bimba/", "/kiosk", "/kiosk/products");
        assert_eq!(paths.root(), "/bimba");
        assert_eq!(paths.home(), "/bimba/kiosk");
        assert_eq!(paths.products(), "/bimba/kiosk/products");
    }

    #[test]
    fn idle_guard_matches_home_and_products_only() {
        let paths = KioskPaths::default();
        assert!(paths.is_idle_guarded("/kiosk"));
        assert!(paths.is_idle_guarded("/kiosk/"));
        assert!(paths.is_idle_guarded("/kiosk/products/"));
        assert!(!paths.is_idle_guarded("/kiosk/cart"));
        assert!(!paths.is_idle_guarded("/"));
        assert!(!paths.is_idle_guarded("/admin/kiosk"));
    }
}
