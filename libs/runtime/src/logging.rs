//! Subscriber setup driven by the `logging:` config section.
//!
//! Every section key other than `default` is a target prefix (`users`, `sqlx`,
//! `api_ingress::request_id`, ...). A record takes the levels of the longest
//! prefix that matches its target, or of `default` when none does. Console
//! output is plain text; file output is JSON, one rotating file per section.

use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::FilterFn, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// `None` means the output is off for that section.
fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// `users` matches `users` and `users::api`, never `users_server`.
fn matches_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn has_file(section: &Section) -> bool {
    !section.file.trim().is_empty()
}

/// Per-target maximum level for one output.
#[derive(Clone, Debug)]
struct LevelTable {
    default: Option<Level>,
    /// Longest prefix first.
    by_prefix: Vec<(String, Option<Level>)>,
}

impl LevelTable {
    fn from_sections(cfg: &LoggingConfig, pick: impl Fn(&Section) -> Option<Level>) -> Self {
        let mut by_prefix: Vec<_> = cfg
            .iter()
            .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
            .map(|(name, section)| (name.clone(), pick(section)))
            .collect();
        by_prefix.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            default: cfg.get(DEFAULT_SECTION).and_then(&pick),
            by_prefix,
        }
    }

    fn level_for(&self, target: &str) -> Option<Level> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_prefix(target, prefix))
            .map_or(self.default, |(_, level)| *level)
    }

    fn enabled(&self, meta: &Metadata<'_>) -> bool {
        self.level_for(meta.target())
            .is_some_and(|max| *meta.level() <= max)
    }

    fn is_off(&self) -> bool {
        self.default.is_none() && self.by_prefix.iter().all(|(_, level)| level.is_none())
    }
}

// -------- rotating files --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl RotatingFile {
    fn open(path: &Path, section: &Section) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
        let rot = FileRotate::new(
            path,
            AppendTimestamp::default(FileLimit::MaxFiles(section.max_backups.unwrap_or(3))),
            ContentLimit::BytesSurpassed(max_bytes as usize),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rot))))
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file writer poisoned"))?
            .flush()
    }
}

/// Relative paths live under `home_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Writer for a single record; `None` discards it.
struct RoutedWriter(Option<RotatingFile>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Sends each record to the file of the section that owns its target.
#[derive(Clone)]
struct FileRouter {
    default: Option<RotatingFile>,
    /// Longest prefix first; `None` for console-only sections.
    by_prefix: Vec<(String, Option<RotatingFile>)>,
}

impl FileRouter {
    fn open(cfg: &LoggingConfig, base_dir: &Path) -> Self {
        let open = |name: &str, section: &Section| -> Option<RotatingFile> {
            if !has_file(section) {
                return None;
            }
            let path = resolve_log_path(&section.file, base_dir);
            RotatingFile::open(&path, section)
                .map_err(|e| {
                    // No subscriber exists yet.
                    eprintln!("Failed to open log file for '{name}' at {}: {e}", path.display());
                })
                .ok()
        };

        let mut by_prefix: Vec<_> = cfg
            .iter()
            .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
            .map(|(name, section)| (name.clone(), open(name, section)))
            .collect();
        by_prefix.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            default: cfg.get(DEFAULT_SECTION).and_then(|s| open(DEFAULT_SECTION, s)),
            by_prefix,
        }
    }

    fn route(&self, target: &str) -> Option<RotatingFile> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_prefix(target, prefix))
            .map_or_else(|| self.default.clone(), |(_, file)| file.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.iter().all(|(_, file)| file.is_none())
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.route(meta.target()))
    }
}

// -------- layers --------

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = LevelTable::from_sections(cfg, |s| parse_level(&s.console_level));
    if !console.is_off() {
        layers.push(
            fmt::layer()
                .with_ansi(std::io::stdout().is_terminal())
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(FilterFn::new(move |meta| console.enabled(meta)))
                .boxed(),
        );
    }

    let router = FileRouter::open(cfg, base_dir);
    if !router.is_empty() {
        let files = LevelTable::from_sections(cfg, |s| {
            has_file(s).then(|| parse_level(&s.file_level)).flatten()
        });
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router)
                .with_filter(FilterFn::new(move |meta| files.enabled(meta)))
                .boxed(),
        );
    }

    layers
}

/// Install the global subscriber.
/// `base_dir` resolves relative log file paths (normally `server.home_dir`).
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // `log` records from dependencies go through tracing too.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = Registry::default().with(build_layers(cfg, base_dir)).try_init();
}
