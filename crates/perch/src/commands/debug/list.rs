use perch_core::PerchResult;

/// Prints every top-level window and marks the desktop containers.
///
/// Only looks: the shell is never asked to spawn its containers, so the
/// icon host shows up only if it already exists.
pub fn execute() -> PerchResult<()> {
    #[cfg(windows)]
    {
        windows_impl::run()
    }
    #[cfg(not(windows))]
    {
        Err(perch_core::PerchError::Unsupported {
            operation: "listing desktop windows",
        })
    }
}

#[cfg(windows)]
mod windows_impl {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, ContentArrangement, Table};

    use perch_core::hierarchy::PRIMARY_SHELL_CLASS;
    use perch_core::{DesktopHierarchyResolver, PerchResult, ShellHierarchy};
    use perch_windows::Win32Desktop;

    pub fn run() -> PerchResult<()> {
        let desktop = Win32Desktop::new();
        let windows = perch_windows::snapshot()?;
        let icon_host = DesktopHierarchyResolver::new(&desktop, &desktop).find_icon_host();
        let primary = desktop.find_window_by_class(PRIMARY_SHELL_CLASS);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("HWND"),
                Cell::new("Class"),
                Cell::new("Title"),
                Cell::new("Visible"),
                Cell::new("Desktop"),
            ]);

        for window in &windows {
            let handle = window.handle();
            let role = if Some(handle) == icon_host {
                "icon host"
            } else if Some(handle) == primary {
                "primary shell"
            } else {
                ""
            };

            table.add_row(vec![
                Cell::new(handle),
                Cell::new(window.class()),
                Cell::new(window.title()),
                Cell::new(if window.is_visible() { "yes" } else { "no" }),
                Cell::new(role),
            ]);
        }

        println!("{table}");
        println!("\n{} windows found", windows.len());
        if icon_host.is_none() {
            println!("No icon host yet; `perch attach` asks the shell to create one.");
        }
        Ok(())
    }
}
