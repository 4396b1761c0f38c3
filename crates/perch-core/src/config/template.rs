/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `perch init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# Perch configuration
# Location: ~/.config/perch/config.toml

[widget]
# Exact title of the window to turn into a desktop widget.
title = "Zeeho Widget"
# How long to wait for the window to appear, in milliseconds.
ready_timeout_ms = 10000

[desktop]
# Make the widget slightly transparent when attached to the desktop.
translucent = true
# Overall opacity when translucent, from 1 (invisible) to 255 (opaque).
opacity = 230

[monitor]
# Extra window titles that count as "the desktop has focus". The widget
# floats above everything while one of these is in the foreground.
# extra_system_titles = ["Start", "Search"]
extra_system_titles = []

[logging]
# Enable file logging to ~/.config/perch/logs/perch.log.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation (1 to 1024).
max_file_mb = 10
"##
    .to_string()
}
