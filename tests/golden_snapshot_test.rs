mod common;

use common::fixture_odt;
use odftools::{container, ConvertOptions, OdfConverter, OutputFormat};
use pretty_assertions::assert_eq;

const HTML: &str = include_str!("golden/fixture.html");
const TEXT: &str = include_str!("golden/fixture.txt");

#[test]
fn golden_snapshot_html() {
    let doc = container::loads(&fixture_odt()).unwrap();
    let html = doc.to_html("fixture.odt").unwrap();
    assert_eq!(html, HTML.trim_end());
}

#[test]
fn golden_snapshot_text() {
    let doc = container::loads(&fixture_odt()).unwrap();
    let text = doc.to_text(true);
    assert_eq!(text.lines().collect::<Vec<_>>(), TEXT.lines().collect::<Vec<_>>());
}

#[test]
fn golden_snapshot_converter_matches_facade() {
    let doc = container::loads(&fixture_odt()).unwrap();
    let converter = OdfConverter::new(ConvertOptions {
        html_title: "fixture.odt".to_string(),
        ..Default::default()
    });
    assert_eq!(
        converter.convert_document(&doc, OutputFormat::Html).unwrap(),
        HTML.trim_end()
    );
}
