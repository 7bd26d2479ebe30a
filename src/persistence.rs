use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::map::KarnaughMap;

/// Write a map snapshot to `path`, creating parent directories
pub fn save_map(map: &KarnaughMap, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let text = map.serialize().context("Failed to serialize map")?;
    fs::write(path, text).with_context(|| format!("Failed to write map to {:?}", path))?;

    info!(
        path = %path.display(),
        variables = map.variable_count(),
        groups = map.groups().len(),
        "Saved map"
    );
    Ok(())
}

/// Read a map snapshot from `path`
pub fn load_map(path: &Path) -> Result<KarnaughMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map from {:?}", path))?;
    let map = KarnaughMap::from_text(&text)
        .with_context(|| format!("Failed to load map from {:?}", path))?;
    info!(path = %path.display(), "Loaded map");
    Ok(map)
}

/// Replace `map`'s contents with the snapshot at `path`.
///
/// Either the whole file is applied or `map` is left untouched; the layout
/// always survives.
pub fn reload_map(map: &mut KarnaughMap, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map from {:?}", path))?;
    map.deserialize(&text)
        .with_context(|| format!("Failed to load map from {:?}", path))?;
    info!(path = %path.display(), "Reloaded map");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::map::{CellValue, Group, MapLayout, Point};

    fn sample() -> KarnaughMap {
        let mut map = KarnaughMap::new(3, &["X", "Y", "Z"]).unwrap();
        map.set_output_at(1, 0, CellValue::One).unwrap();
        map.set_output_at(2, 1, CellValue::DontCare).unwrap();
        map.add_group(Group::new((3, 0).into(), (0, 1).into(), Rgb::new(10, 20, 30)))
            .unwrap();
        map
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("f.json");

        save_map(&sample(), &path).unwrap();
        assert_eq!(load_map(&path).unwrap(), sample());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_map(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_reload_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        save_map(&sample(), &good).unwrap();
        fs::write(&bad, r#"{ "format": "karnaugh-map", "version": 1, "variable_count": 2 }"#).unwrap();

        let mut map = KarnaughMap::default();
        map.layout = MapLayout::new(Point::new(1.0, 2.0), 50.0);
        let before = map.clone();

        assert!(reload_map(&mut map, &bad).is_err());
        assert_eq!(map, before);

        reload_map(&mut map, &good).unwrap();
        assert_eq!(map.variables(), &["X", "Y", "Z"]);
        assert_eq!(map.groups(), sample().groups());
        assert_eq!(map.layout, before.layout);
    }
}
