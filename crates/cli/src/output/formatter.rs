//! Terminal output for `ell`
//!
//! Human output is styled text; `--json` makes every command print a single
//! JSON document on stdout. Failures always go to stderr.

use comfy_table::{ContentArrangement, Table, presets};
use console::Style;
use serde::Serialize;

use super::OutputConfig;

/// Styles for the values `ell` prints
#[derive(Debug, Clone)]
struct Palette {
    object: Style,
    url: Style,
    size: Style,
    key: Style,
    present: Style,
    missing: Style,
    notice: Style,
}

impl Palette {
    fn new(colored: bool) -> Self {
        let pick = |style: Style| if colored { style } else { Style::new() };
        Self {
            object: pick(Style::new().bold()),
            url: pick(Style::new().cyan().underlined()),
            size: pick(Style::new().green()),
            key: pick(Style::new().cyan()),
            present: pick(Style::new().green()),
            missing: pick(Style::new().red()),
            notice: pick(Style::new().yellow()),
        }
    }
}

/// Renders command results according to `--json`, `--quiet` and `--no-color`
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
    palette: Palette,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        let palette = Palette::new(!config.no_color && !config.json);
        Self { config, palette }
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    fn colored(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Object name
    pub fn object(&self, name: &str) -> String {
        self.palette.object.apply_to(name).to_string()
    }

    pub fn url(&self, url: &str) -> String {
        self.palette.url.apply_to(url).to_string()
    }

    /// Byte count in decimal units, e.g. `1.50 kB`
    pub fn size(&self, bytes: u64) -> String {
        let text = humansize::format_size(bytes, humansize::DECIMAL);
        self.palette.size.apply_to(text).to_string()
    }

    /// Settings key right-aligned to `width` columns
    ///
    /// Padding happens before styling so escape codes do not count
    /// towards the width.
    pub fn key(&self, key: &str, width: usize) -> String {
        self.palette.key.apply_to(format!("{key:>width$}")).to_string()
    }

    /// Confirmation of a completed change, on stdout
    pub fn done(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{} {message}", self.palette.present.apply_to("✓"));
    }

    /// Failure report, on stderr; printed even in quiet mode
    pub fn fail(&self, message: &str) {
        if self.config.json {
            let body = serde_json::json!({ "error": message });
            eprintln!("{body}");
        } else {
            eprintln!("{} {message}", self.palette.missing.apply_to("✗"));
        }
    }

    /// Non-fatal remark, on stderr
    pub fn notice(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        eprintln!("{} {message}", self.palette.notice.apply_to("!"));
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => self.fail(&format!("cannot encode output: {e}")),
        }
    }

    /// Plain result line on stdout, suppressed by `--quiet`
    pub fn line(&self, text: &str) {
        if !self.config.quiet {
            println!("{text}");
        }
    }

    /// One row per object: name and whether it was found
    pub fn exists_table<'a, I>(&self, rows: I) -> String
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Name", "Exists"]);
        if !self.colored() {
            table.force_no_tty();
        }

        for (name, found) in rows {
            let mark = if found {
                self.palette.present.apply_to("yes")
            } else {
                self.palette.missing.apply_to("no")
            };
            table.add_row(vec![self.object(name), mark.to_string()]);
        }

        table.to_string()
    }
}
