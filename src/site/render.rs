use serde::{Deserialize, Serialize};

use crate::config::{Settings, SiteVariant};
use crate::player::RepeatMode;

const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");
const CONFIG_OPEN: &str = r#"<script id="sitecast-config" type="application/json">"#;

/// Settings the page script reads from the embedded JSON block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub title: String,
    pub variant: &'static str,
    pub audio_base_url: String,
    pub data_url: String,
    pub count_url: String,
    pub storage_namespace: String,
    pub error_skip_delay_ms: u64,
    pub default_volume: f32,
    pub default_shuffle: bool,
    pub default_repeat: &'static str,
}

impl PageConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let site = &settings.site;
        let playback = &settings.playback;
        Self {
            title: site.title.clone(),
            variant: site.variant.as_str(),
            audio_base_url: site.audio_base_url.clone(),
            data_url: site.data_file.clone(),
            count_url: site.count_file.clone(),
            storage_namespace: site.namespace(),
            error_skip_delay_ms: playback.error_skip_delay_ms,
            default_volume: playback.volume,
            default_shuffle: playback.shuffle,
            default_repeat: RepeatMode::from(playback.repeat).as_str(),
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON safe to inline in a `<script>` element.
fn script_json(config: &PageConfig) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(config)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

pub fn render_index(config: &PageConfig) -> Result<String, serde_json::Error> {
    Ok(INDEX_TEMPLATE
        .replace("{{config}}", &script_json(config)?)
        .replace("{{title}}", &escape_html(&config.title))
        .replace("{{variant}}", config.variant))
}

/// Fields of an embedded page configuration that describe the site itself.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EmbeddedConfig {
    title: Option<String>,
    variant: Option<SiteVariant>,
    audio_base_url: Option<String>,
    data_url: Option<String>,
    count_url: Option<String>,
    storage_namespace: Option<String>,
}

/// Overlay the configuration embedded in a generated `index.html` onto
/// `settings.site`. Returns `false` when the page carries no config block.
pub fn apply_embedded_config(html: &str, settings: &mut Settings) -> Result<bool, serde_json::Error> {
    let Some(start) = html.find(CONFIG_OPEN).map(|i| i + CONFIG_OPEN.len()) else {
        return Ok(false);
    };
    let Some(len) = html[start..].find("</script>") else {
        return Ok(false);
    };
    let embedded: EmbeddedConfig = serde_json::from_str(&html[start..start + len])?;

    let site = &mut settings.site;
    if let Some(v) = embedded.title {
        site.title = v;
    }
    if let Some(v) = embedded.variant {
        site.variant = v;
    }
    if let Some(v) = embedded.audio_base_url {
        site.audio_base_url = v;
    }
    if let Some(v) = embedded.data_url {
        site.data_file = v;
    }
    if let Some(v) = embedded.count_url {
        site.count_file = v;
    }
    if let Some(v) = embedded.storage_namespace {
        site.storage_namespace = v;
    }
    Ok(true)
}
