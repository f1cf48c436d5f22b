use std::io::Write;

// Colored `file:line message` log lines for `env_logger`.
pub fn format_log(
  buf: &mut env_logger::fmt::Formatter,
  record: &log::Record,
) -> std::io::Result<()> {
  let mut style = buf.style();
  use env_logger::fmt::Color::*;
  use log::Level::*;
  style.set_color(match record.level() {
    Error => Red,
    Warn => Yellow,
    Info => Green,
    Debug => Magenta,
    Trace => Blue,
  });

  let location = format!("{}:{}", record.file().unwrap_or("?"), record.line().unwrap_or(0));
  let s = format!("{:30}{}", location, record.args());
  writeln!(buf, "{}", style.value(s))
}

// Logs at `level` unless overridden by `RUST_LOG`.
pub fn init_logging(level: log::LevelFilter) {
  env_logger::Builder::new()
    .filter_level(level)
    .parse_default_env()
    .format(format_log)
    .init();
}
