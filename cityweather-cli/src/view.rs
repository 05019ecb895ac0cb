use cityweather_core::{DisplayModel, Units, WeatherView};

/// Prints results to stdout and failures to stderr.
#[derive(Debug)]
pub struct TerminalView {
    units: Units,
    json: bool,
    pub failed: bool,
}

impl TerminalView {
    pub fn new(units: Units, json: bool) -> Self {
        Self { units, json, failed: false }
    }
}

impl WeatherView for TerminalView {
    fn on_fetch_succeeded(&mut self, display: &DisplayModel, country: Option<&str>) {
        self.failed = false;

        if self.json {
            let doc = serde_json::json!({
                "display": display,
                "country": country,
                "units": self.units.as_str(),
            });
            println!("{doc}");
            return;
        }

        for line in render_lines(display, country, self.units) {
            println!("{line}");
        }
    }

    fn on_fetch_failed(&mut self, message: &str) {
        self.failed = true;

        if self.json {
            eprintln!("{}", serde_json::json!({ "error": message }));
        } else {
            eprintln!("{message}");
        }
    }

    fn on_status(&mut self, message: &str) {
        if !self.json {
            eprintln!("{message}");
        }
    }
}

pub fn render_lines(display: &DisplayModel, country: Option<&str>, units: Units) -> Vec<String> {
    let mut lines = vec![
        format!("{}{}", display.temperature_text, units.temperature_suffix()),
        display.emoji.glyph().to_string(),
        display.description_text.clone(),
        display.humidity_text.clone(),
    ];

    if let Some(country) = country {
        lines.push(format!("Country: {country}"));
    }

    lines
}
