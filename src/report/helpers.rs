use std::fs;
use std::path::Path;

use crate::error::Result;

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::{format_percent, write_string};
    use uuid::Uuid;

    #[test]
    fn writes_into_missing_directories() {
        let tmp = std::env::temp_dir().join(format!("insights-write-{}", Uuid::new_v4()));
        let target = tmp.join("a").join("b").join("out.txt");
        write_string(&target, "hello").expect("write");
        assert_eq!(std::fs::read_to_string(&target).expect("read"), "hello");
        let _ = std::fs::remove_dir_all(tmp);
    }

    #[test]
    fn percentages_have_one_decimal() {
        assert_eq!(format_percent(66.666), "66.7%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
