// src/site/locate.rs
// =============================================================================
// Finds the build configuration that governs a document.
//
// Docs sites keep their config at `<site root>/config/config.toml`, and a
// document can sit any number of folders below the site root. So we walk
// upward from the document's folder and probe that fixed path at each level:
//
//   /repo/widget/content/en/setup/page.md
//   /repo/widget/content/en/setup/config/config.toml   no
//   /repo/widget/content/en/config/config.toml         no
//   /repo/widget/content/config/config.toml            no
//   /repo/widget/config/config.toml                    yes -> stop
//
// The filesystem root itself is not probed.
// =============================================================================

use std::path::{Path, PathBuf};

/// Returns the nearest `config/config.toml` above `document`, if any.
pub fn find_config_file(document: &Path) -> Option<PathBuf> {
    let start = document.parent()?;

    let found = start
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .map(|dir| dir.join("config").join("config.toml"))
        .find(|candidate| candidate.is_file());

    match &found {
        Some(path) => tracing::debug!("Found build config: {}", path.display()),
        None => tracing::debug!("No build config above {}", document.display()),
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_finds_config_several_levels_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("widget/config/config.toml");
        let page = dir.path().join("widget/content/en/setup/page.md");
        touch(&config);
        touch(&page);

        assert_eq!(find_config_file(&page), Some(config));
    }

    #[test]
    fn test_nearest_config_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("config/config.toml"));
        let inner = dir.path().join("widget/config/config.toml");
        let page = dir.path().join("widget/content/page.md");
        touch(&inner);
        touch(&page);

        assert_eq!(find_config_file(&page), Some(inner));
    }

    #[test]
    fn test_config_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("site/config/config.toml")).unwrap();
        let page = dir.path().join("site/content/page.md");
        touch(&page);

        // a directory named config.toml doesn't count
        let found = find_config_file(&page);
        assert!(found.map_or(true, |p| !p.starts_with(dir.path())));
    }

    #[test]
    fn test_bare_file_name_has_nothing_to_search() {
        assert_eq!(find_config_file(Path::new("page.md")), None);
    }
}
