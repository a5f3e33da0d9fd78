use std::fs;

use super::*;
use crate::catalog::CatalogError;
use crate::config::{Settings, SiteVariant};
use crate::probe::{CoverArt, TrackRecord};

fn record(file: &str, title: &str, artist: &str) -> TrackRecord {
    TrackRecord {
        filename: file.into(),
        title: title.into(),
        artist: artist.into(),
        cover: None,
    }
}

#[test]
fn data_resource_has_one_record_per_line() {
    let data = render_data(&[record("a.mp3", "Song A", "X"), record("b.mp3", "B=C", "Y")]);
    assert_eq!(data, "(a.mp3=Song A=X=none)\n(b.mp3=B_EQUAL_C=Y=none)\n");
    assert_eq!(render_data(&[]), "");
}

#[test]
fn write_site_produces_all_files_and_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("public");
    let mut covered = record("b.mp3", "Song B", "Artist Y");
    covered.cover = Some(CoverArt {
        mime: "image/jpeg".into(),
        bytes: vec![0xff, 0xd8, 0xff, 0xe0],
    });
    let records = vec![record("a.mp3", "Song A", "Artist X"), covered];
    let settings = Settings::default();

    let summary = write_site(&out, &records, &settings).unwrap();
    assert_eq!(summary.tracks, 2);
    assert_eq!(summary.files.len(), 5);
    for name in ["index.html", "player.js", "player.css", "data.txt", "count.txt"] {
        assert!(out.join(name).is_file(), "{name} missing");
    }
    assert_eq!(fs::read_to_string(out.join("count.txt")).unwrap(), "2\n");

    let catalog = load_site_catalog(&out, &settings.site).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.tracks()[0].title, "Song A");
    assert_eq!(
        catalog.tracks()[1].cover_image.as_deref(),
        Some("data:image/jpeg;base64,/9j/4A==")
    );
}

#[test]
fn empty_build_is_reported_as_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::default();
    write_site(dir.path(), &[], &settings).unwrap();
    assert!(matches!(
        load_site_catalog(dir.path(), &settings.site),
        Err(CatalogError::EmptyCatalog)
    ));
}

#[test]
fn missing_site_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_site_catalog(&dir.path().join("nope"), &Settings::default().site).unwrap_err();
    assert!(matches!(err, CatalogError::CatalogUnavailable(_)));
}

#[test]
fn custom_resource_names_are_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.site.data_file = "tracks.txt".into();
    settings.site.count_file = "n.txt".into();

    write_site(dir.path(), &[record("a.mp3", "A", "X")], &settings).unwrap();
    assert!(dir.path().join("tracks.txt").is_file());
    assert!(!dir.path().join("data.txt").exists());

    let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(html.contains(r#""dataUrl":"tracks.txt""#));
    assert!(html.contains(r#""countUrl":"n.txt""#));
}

#[test]
fn page_config_follows_variant() {
    let mut settings = Settings::default();
    let page = PageConfig::from_settings(&settings);
    assert_eq!(page.variant, "standard");
    assert_eq!(page.storage_namespace, "sitecast");
    assert_eq!(page.default_repeat, "off");
    assert_eq!(page.error_skip_delay_ms, 1000);

    settings.site.variant = SiteVariant::Radio;
    let page = PageConfig::from_settings(&settings);
    assert_eq!(page.variant, "radio");
    assert_eq!(page.storage_namespace, "sitecast-radio");
}

#[test]
fn index_escapes_title_and_embeds_config() {
    let mut settings = Settings::default();
    settings.site.title = "Tom & Jerry's </script> mix".into();
    settings.site.audio_base_url = "https://cdn.example/songs/".into();
    let html = render_index(&PageConfig::from_settings(&settings)).unwrap();

    assert!(html.contains("<title>Tom &amp; Jerry&#39;s &lt;/script&gt; mix</title>"));
    assert!(html.contains(r#"<body class="variant-standard">"#));
    assert!(html.contains(r#""audioBaseUrl":"https://cdn.example/songs/""#));
    // Only the template's own closing tags remain.
    assert_eq!(html.matches("</script>").count(), 2);
    assert!(!html.contains("{{"));

    let start = html.find(r#"type="application/json">"#).unwrap() + 24;
    let end = start + html[start..].find("</script>").unwrap();
    let json: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();
    assert_eq!(json["title"], "Tom & Jerry's </script> mix");
    assert_eq!(json["defaultVolume"], 1.0);
}

#[test]
fn site_settings_come_from_the_generated_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut built = Settings::default();
    built.site.variant = SiteVariant::Radio;
    built.site.audio_base_url = "https://cdn.example/a".into();
    built.site.data_file = "meta.txt".into();
    write_site(dir.path(), &[record("a.mp3", "A", "X")], &built).unwrap();

    let read = read_site_settings(dir.path(), &Settings::default());
    assert_eq!(read.site.variant, SiteVariant::Radio);
    assert_eq!(read.site.audio_base_url, "https://cdn.example/a");
    assert_eq!(read.site.data_file, "meta.txt");
    assert_eq!(read.site.namespace(), "sitecast-radio");
    assert_eq!(load_site_catalog(dir.path(), &read.site).unwrap().len(), 1);
}

#[test]
fn site_settings_fall_back_without_a_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut base = Settings::default();
    base.site.title = "Mine".into();
    assert_eq!(read_site_settings(dir.path(), &base).site.title, "Mine");

    std::fs::write(dir.path().join(INDEX_FILE), "<html></html>").unwrap();
    assert_eq!(read_site_settings(dir.path(), &base).site.title, "Mine");
}
