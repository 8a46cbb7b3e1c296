use crate::error::{XlError, XlResult};
use std::path::{Component, Path, PathBuf};

/// Derive the text file path for one worksheet of a workbook
///
/// `folder/[relDir/]<workbook stem>.<worksheet>.<extension>`, where `relDir` is the
/// directory part of `workbook`. The same inputs always give the same path.
///
/// `relDir` is kept only when it stays below `folder`: an absolute directory or
/// one climbing out with `..` is dropped and the file lands directly in `folder`.
pub fn build_path(
    folder: Option<&Path>,
    workbook: Option<&str>,
    worksheet: Option<&str>,
    extension: &str,
) -> XlResult<PathBuf> {
    let workbook = workbook
        .ok_or_else(|| XlError::MissingArgument("build_path: workbook name".to_string()))?;
    let folder = folder.ok_or_else(|| {
        XlError::MissingArgument(format!("build_path({}): folder", workbook))
    })?;
    let worksheet = worksheet.ok_or_else(|| {
        XlError::MissingArgument(format!("build_path({}): worksheet name", workbook))
    })?;

    let workbook_path = Path::new(workbook);
    let stem = workbook_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut path = folder.to_path_buf();
    if let Some(rel_dir) = workbook_path.parent().filter(|p| is_nested(p)) {
        path.push(rel_dir);
    }
    path.push(format!("{}.{}.{}", stem, worksheet, extension));

    Ok(path)
}

fn is_nested(dir: &Path) -> bool {
    !dir.as_os_str().is_empty()
        && dir
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_path_same_folder() {
        let path = build_path(
            Some(Path::new("/data")),
            Some("report.xlsx"),
            Some("Sheet1"),
            "txt",
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/data/report.Sheet1.txt"));
    }

    #[test]
    fn test_build_path_keeps_relative_dir() {
        let path = build_path(
            Some(Path::new("/data")),
            Some("Attendance/GMeet Attendance Report.xlsx"),
            Some("Week 1"),
            "txt",
        )
        .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/data/Attendance/GMeet Attendance Report.Week 1.txt")
        );
    }

    #[test]
    fn test_build_path_stays_inside_folder() {
        let folder = Path::new("/out");
        for workbook in ["/abs/src/book.xlsx", "../up/book.xlsx", "in/../../book.xlsx"] {
            let path = build_path(Some(folder), Some(workbook), Some("S"), "txt").unwrap();
            assert_eq!(path, PathBuf::from("/out/book.S.txt"), "{}", workbook);
        }
    }

    #[test]
    fn test_build_path_is_deterministic_and_distinct() {
        let folder = Path::new("out");
        let a1 = build_path(Some(folder), Some("x.xlsx"), Some("A"), "txt").unwrap();
        let a2 = build_path(Some(folder), Some("x.xlsx"), Some("A"), "txt").unwrap();
        let b = build_path(Some(folder), Some("x.xlsx"), Some("B"), "txt").unwrap();
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }

    #[test]
    fn test_build_path_missing_arguments() {
        let folder = Path::new("out");
        for result in [
            build_path(None, Some("x.xlsx"), Some("A"), "txt"),
            build_path(Some(folder), None, Some("A"), "txt"),
            build_path(Some(folder), Some("x.xlsx"), None, "txt"),
        ] {
            assert!(matches!(result, Err(XlError::MissingArgument(_))));
        }
    }
}
