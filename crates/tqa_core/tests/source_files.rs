use std::fs;

use tqa_core::bibliography::Bibliography;
use tqa_core::chunks::read_chunk_source;

#[test]
fn missing_chunk_source_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = read_chunk_source(&dir.path().join("chunks.txt")).expect_err("missing");
    assert_eq!(err.code, "CHUNKS_SOURCE_NOT_FOUND");
}

#[test]
fn chunk_source_drops_short_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chunks.txt");
    fs::write(
        &path,
        "\\section{Introduction} dimensionality reduction\nhi\nUMAP preserves more global structure than t-SNE.\n",
    )
    .expect("write");

    let src = read_chunk_source(&path).expect("read");
    assert_eq!(src.lines_read, 3);
    assert_eq!(src.chunks.len(), 2);
    assert_eq!(src.chunks[0].id, "0");
    assert_eq!(src.chunks[1].id, "1");
    assert_eq!(src.lines_skipped(), 1);
}

#[test]
fn bibliography_load_errors_are_classified() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("bib_entries.json");
    assert_eq!(
        Bibliography::load(&missing).expect_err("missing").code,
        "BIB_NOT_FOUND"
    );

    fs::write(&missing, "{not json").expect("write");
    let err = Bibliography::load(&missing).expect_err("malformed");
    assert_eq!(err.code, "BIB_PARSE_FAILED");
    let details = err.details.unwrap_or_default();
    assert!(details.contains("bib_entries.json"), "{details}");
    // The decoder's own message (with its position) survives alongside the path.
    assert!(details.contains("line 1 column"), "{details}");
}

#[test]
fn bibliography_loads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bib_entries.json");
    fs::write(
        &path,
        r#"{"vandermaaten2008": "L. van der Maaten and G. Hinton. Visualizing Data using t-SNE. JMLR, 2008."}"#,
    )
    .expect("write");

    let bib = Bibliography::load(&path).expect("load");
    assert_eq!(bib.len(), 1);
    assert!(bib.get("vandermaaten2008").unwrap_or_default().contains("t-SNE"));
}
