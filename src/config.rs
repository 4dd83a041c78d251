use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// What happens to the body of an inline reference such as `{@link Foo}`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InlineBodyPolicy {
    /// The whole body is excluded from checking.
    Exclude,
    /// The first token is a target and is excluded; the rest is a visible
    /// label and is checked.
    Label,
    /// The whole body is checked.
    Prose,
}

/// HTML elements that start a new prose region, as in the CommonMark list of
/// block-level tags.
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "caption",
    "center",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "legend",
    "li",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "ul",
];

/// Elements whose content is code or raw text, never prose.
const VERBATIM_ELEMENTS: &[&str] = &["pre", "code", "script", "style", "textarea"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTML elements whose opening or closing tag ends the current prose region.
    pub block_elements: Vec<String>,
    /// HTML elements whose content is excluded from prose.
    pub verbatim_elements: Vec<String>,
    /// Per inline tag name overrides of the default body policy.
    pub inline_tags: BTreeMap<String, InlineBodyPolicy>,
    /// Whether an inline reference ends the current prose region.
    pub inline_tags_break_regions: bool,
    /// Whether a blank line ends the current prose region. When disabled,
    /// paragraphs are joined like wrapped lines.
    pub blank_lines_break_regions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_elements: BLOCK_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            verbatim_elements: VERBATIM_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            inline_tags: BTreeMap::new(),
            inline_tags_break_regions: false,
            blank_lines_break_regions: true,
        }
    }
}

impl Config {
    pub fn is_block_element(&self, name: &str) -> bool {
        self.block_elements
            .iter()
            .any(|e| e.eq_ignore_ascii_case(name))
    }

    pub fn is_verbatim_element(&self, name: &str) -> bool {
        self.verbatim_elements
            .iter()
            .any(|e| e.eq_ignore_ascii_case(name))
    }

    /// Body policy for an inline tag: a configured override, else the
    /// built-in default for that tag.
    pub fn inline_policy(&self, tag: &str) -> InlineBodyPolicy {
        if let Some(policy) = self.inline_tags.get(tag) {
            return *policy;
        }
        match tag {
            "summary" | "return" => InlineBodyPolicy::Prose,
            _ => InlineBodyPolicy::Exclude,
        }
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn block_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.block_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    pub fn verbatim_elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.verbatim_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    pub fn inline_tag(mut self, name: impl Into<String>, policy: InlineBodyPolicy) -> Self {
        self.config.inline_tags.insert(name.into(), policy);
        self
    }

    pub fn inline_tags_break_regions(mut self, enabled: bool) -> Self {
        self.config.inline_tags_break_regions = enabled;
        self
    }

    pub fn blank_lines_break_regions(mut self, enabled: bool) -> Self {
        self.config.blank_lines_break_regions = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".docprose.toml", "docprose.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("docprose").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    if let Ok(home) = env::var("HOME") {
        let p = Path::new(&home)
            .join(".config")
            .join("docprose")
            .join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .docprose.toml, docprose.toml
/// 3) XDG: $XDG_CONFIG_HOME/docprose/config.toml or ~/.config/docprose/config.toml
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir)
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    if let Some(p) = xdg_config_path()
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
