use crate::utils::fit_width;
use crate::{Diagnostics, SummaryError, SummaryResult};
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

#[derive(Debug)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: String,
    pub console_output: bool,
    pub file_output: bool,
    /// One JSON object per line on the console instead of the pretty format.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".into(),
            log_level: "info".into(),
            console_output: true,
            file_output: false,
            json: false,
        }
    }
}

fn wrap_text(text: &str, width: usize) -> String {
    let mut wrapped = String::new();
    let mut line_length = 0;

    for word in text.split_whitespace() {
        if line_length + word.len() + 1 > width {
            wrapped.push('\n');
            wrapped.push_str("  ");
            wrapped.push_str(word);
            line_length = word.len() + 2;
        } else {
            if line_length > 0 {
                wrapped.push(' ');
                line_length += 1;
            }
            wrapped.push_str(word);
            line_length += word.len();
        }
    }
    wrapped
}

pub fn log_summary_card(result: &SummaryResult, diagnostics: &Diagnostics) {
    const CARD_WIDTH: usize = 80;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 2;

    let field = |value: Option<&str>, label_width: usize| {
        wrap_text(value.unwrap_or("N/A"), CONTENT_WIDTH - label_width)
    };

    let horizontal_line = "═".repeat(CARD_WIDTH - 2);

    info!(
        request_id = ?diagnostics.request_id,
        strategy = ?diagnostics.strategy,
        "\n╔{}╗\n\
         URL: {}\n\
         Title: {}\n\
         Desc: {}\n\
         Thumbnail: {}\n\
         Player: {}\n\
         Site: {}\n\
         ╚{}╝",
        horizontal_line,
        field(Some(result.url.as_str()), 5),
        field(result.title.as_deref(), 7),
        field(result.description.as_deref(), 6),
        field(result.thumbnail.as_deref(), 11),
        field(result.player.url.as_deref(), 8),
        field(result.sitename.as_deref(), 6),
        horizontal_line,
    );
}

pub fn log_error_card(error: &SummaryError, diagnostics: &Diagnostics) {
    const CARD_WIDTH: usize = 70;
    const CONTENT_WIDTH: usize = CARD_WIDTH - 8;

    let top_bottom = "═".repeat(CARD_WIDTH - 2);
    let middle = "─".repeat(CARD_WIDTH - 2);
    let url = diagnostics
        .resolved_url
        .as_deref()
        .unwrap_or(&diagnostics.requested_url);

    error!(
        request_id = ?diagnostics.request_id,
        kind = error.kind(),
        "\n╔═{}═╗\n\
         ║ URL: {:<width$} ║\n\
         ║{}║\n\
         ║ Error: {:<width$} ║\n\
         ╚═{}═╝",
        top_bottom,
        fit_width(url, CONTENT_WIDTH),
        middle,
        fit_width(&error.to_string(), CONTENT_WIDTH),
        top_bottom,
        width = CONTENT_WIDTH
    );
}

pub fn setup_logging(config: LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let mut layers = Vec::new();

    if config.console_output {
        let console_layer = subscriber_fmt::layer().with_target(true).with_line_number(true);
        if config.json {
            layers.push(console_layer.json().boxed());
        } else {
            layers.push(console_layer.pretty().boxed());
        }
    }

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir).expect("Failed to create log directory");

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "url-summary.log");

        let file_layer = subscriber_fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_file(true)
            .with_writer(file_appender);

        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .expect("Failed to set global default subscriber");

    debug!("Logging system initialized with config: {:?}", config);
}
